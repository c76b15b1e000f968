// ABOUTME: End-to-end source-to-value tests exercising the full pipeline

use sonar::value::Value;
use sonar::{run_source, Outcome};

fn eval_ok(src: &str) -> Value {
    match run_source(src) {
        Outcome::Value(v) => v,
        Outcome::ParseErrors(errs) => panic!("unexpected parse errors: {errs:?}"),
    }
}

#[test]
fn arithmetic_respects_precedence() {
    assert_eq!(eval_ok("1 + 2 * 3;"), Value::Integer(7));
    assert_eq!(eval_ok("(1 + 2) * 3;"), Value::Integer(9));
    assert_eq!(eval_ok("10 - 2 - 3;"), Value::Integer(5));
}

#[test]
fn float_and_integer_arithmetic_mix() {
    assert_eq!(eval_ok("1 + 2.5;"), Value::Float(3.5));
    assert_eq!(eval_ok("10 / 4;"), Value::Float(2.5));
}

#[test]
fn string_concatenation_and_comparison() {
    assert_eq!(
        eval_ok(r#""foo" + "bar";"#),
        Value::string("foobar".to_string())
    );
    assert_eq!(eval_ok(r#""abc" == "abc";"#), Value::Boolean(true));
}

#[test]
fn let_bindings_persist_across_statements() {
    assert_eq!(eval_ok("let x = 5; let y = x * 2; y;"), Value::Integer(10));
}

#[test]
fn if_expression_returns_branch_value() {
    assert_eq!(eval_ok("if (true) { 1; } else { 2; }"), Value::Integer(1));
    assert_eq!(eval_ok("if (false) { 1; } else { 2; }"), Value::Integer(2));
}

#[test]
fn function_closures_capture_environment() {
    let src = r#"
        let makeAdder = func(x) {
            return func(y) { return x + y; };
        };
        let addFive = makeAdder(5);
        addFive(3);
    "#;
    assert_eq!(eval_ok(src), Value::Integer(8));
}

#[test]
fn while_loop_accumulates() {
    let src = r#"
        let i = 0;
        let total = 0;
        while (i < 5) {
            total = total + i;
            i = i + 1;
        }
        total;
    "#;
    assert_eq!(eval_ok(src), Value::Integer(10));
}

#[test]
fn for_loop_over_array_sums_elements() {
    let src = r#"
        let total = 0;
        for (i, v in [1, 2, 3, 4]) {
            total = total + v;
        }
        total;
    "#;
    assert_eq!(eval_ok(src), Value::Integer(10));
}

#[test]
fn for_loop_over_map_binds_key_directly() {
    let src = r#"
        let keys = [];
        for (k, v in {"a": 1, "b": 2}) {
            keys = push(keys, k);
        }
        len(keys);
    "#;
    assert_eq!(eval_ok(src), Value::Integer(2));
}

#[test]
fn break_and_continue_control_loop_flow() {
    let src = r#"
        let total = 0;
        for (i, v in range(0, 10)) {
            if (v == 5) { break; }
            if (v == 2) { continue; }
            total = total + v;
        }
        total;
    "#;
    assert_eq!(eval_ok(src), Value::Integer(0 + 1 + 3 + 4));
}

#[test]
fn array_indexing_and_mutation_builtins() {
    let src = r#"
        let arr = [1, 2, 3];
        arr = push(arr, 4);
        let last = pop(arr);
        last;
    "#;
    assert_eq!(eval_ok(src), Value::Integer(4));
}

#[test]
fn array_negative_index_reads_from_end() {
    assert_eq!(eval_ok("let a = [1, 2, 3]; a[-1];"), Value::Integer(3));
}

#[test]
fn out_of_range_index_is_reference_error() {
    match run_source("let a = [1, 2, 3]; a[10];") {
        Outcome::Value(Value::Error(e)) => {
            assert_eq!(e.kind_name(), "ReferenceError");
        }
        other => panic!("expected Error value, got {other:?}"),
    }
}

#[test]
fn slice_with_negative_step_is_runtime_error() {
    match run_source("let a = [1, 2, 3, 4, 5]; slice(a, 4, 0, -1);") {
        Outcome::Value(Value::Error(e)) => {
            assert_eq!(e.kind_name(), "RuntimeError");
        }
        other => panic!("expected Error value, got {other:?}"),
    }
}

#[test]
fn map_literal_and_builtins_round_trip() {
    let src = r#"
        let m = {"a": 1, "b": 2};
        len(mapKeys(m));
    "#;
    assert_eq!(eval_ok(src), Value::Integer(2));
}

#[test]
fn assignment_operators_mutate_in_place() {
    let src = r#"
        let x = 10;
        x += 5;
        x -= 2;
        x *= 2;
        x /= 2;
        x;
    "#;
    assert_eq!(eval_ok(src), Value::Integer(13));
}

#[test]
fn postfix_increment_and_decrement() {
    assert_eq!(eval_ok("let x = 1; x++; x;"), Value::Integer(2));
    assert_eq!(eval_ok("let x = 1; x--; x;"), Value::Integer(0));
}

#[test]
fn undeclared_compound_assignment_is_reference_error() {
    match run_source("x += 1;") {
        Outcome::Value(Value::Error(e)) => {
            assert_eq!(e.kind_name(), "ReferenceError");
        }
        other => panic!("expected Error value, got {other:?}"),
    }
}

#[test]
fn calling_builtin_with_wrong_arity_is_arity_error() {
    match run_source("sort([1, 2], [3, 4]);") {
        Outcome::Value(Value::Error(e)) => {
            assert_eq!(e.kind_name(), "ArityError");
        }
        other => panic!("expected Error value, got {other:?}"),
    }
}

#[test]
fn calling_function_with_missing_arguments_binds_them_to_null() {
    let src = r#"
        let first = func(a, b) { return b; };
        first(1);
    "#;
    assert_eq!(eval_ok(src), Value::Null);
}

#[test]
fn type_mismatch_in_infix_is_an_error_value() {
    match run_source(r#"1 + "a";"#) {
        Outcome::Value(Value::Error(_)) => {}
        other => panic!("expected Error value, got {other:?}"),
    }
}

#[test]
fn syntax_errors_accumulate_and_are_all_returned() {
    match run_source("let = 5; let y = ;") {
        Outcome::ParseErrors(errs) => assert!(errs.len() >= 2),
        Outcome::Value(v) => panic!("expected parse errors, got {v:?}"),
    }
}

#[test]
fn builtin_type_reports_value_kind() {
    assert_eq!(eval_ok(r#"type(1);"#), Value::string("integer".to_string()));
    assert_eq!(eval_ok(r#"type("s");"#), Value::string("string".to_string()));
}

#[test]
fn convert_builtins_change_value_kind() {
    assert_eq!(eval_ok(r#"int("42");"#), Value::Integer(42));
    assert_eq!(eval_ok("float(3);"), Value::Float(3.0));
    assert_eq!(eval_ok(r#"str(42);"#), Value::string("42".to_string()));
}

#[test]
fn print_builtin_joins_arguments_with_comma_space() {
    // print returns Null; this only exercises that it does not error.
    assert_eq!(eval_ok(r#"print("a", "b", 1);"#), Value::Null);
}

#[test]
fn recursive_function_computes_factorial() {
    let src = r#"
        let fact = func(n) {
            if (n == 0) { return 1; }
            return n * fact(n - 1);
        };
        fact(5);
    "#;
    assert_eq!(eval_ok(src), Value::Integer(120));
}
