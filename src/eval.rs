// ABOUTME: Recursive tree-walking evaluator implementing Sonar's operational semantics

use crate::ast::{AssignOp, Expression, Location, PostfixOp, Program, Statement};
use crate::builtins;
use crate::env::Environment;
use crate::error::SonarError;
use crate::value::{FunctionValue, Value};
use std::rc::Rc;

fn err(e: SonarError) -> Value {
    Value::Error(Box::new(e))
}

fn is_error(v: &Value) -> bool {
    matches!(v, Value::Error(_))
}

/// Evaluates a whole program. Unwraps a top-level `return`; an `Error`
/// anywhere short-circuits and becomes the program's result.
pub fn eval_program(program: &Program, env: &Rc<Environment>) -> Value {
    let mut result = Value::Null;
    for stmt in &program.statements {
        result = eval_statement(stmt, env);
        match result {
            Value::Return(inner) => return *inner,
            Value::Error(_) => return result,
            _ => {}
        }
    }
    result
}

fn eval_block(statements: &[Statement], env: &Rc<Environment>) -> Value {
    let mut result = Value::Null;
    for stmt in statements {
        result = eval_statement(stmt, env);
        if matches!(
            result,
            Value::Return(_) | Value::Error(_) | Value::Break | Value::Continue
        ) {
            return result;
        }
    }
    result
}

fn eval_statement(stmt: &Statement, env: &Rc<Environment>) -> Value {
    match stmt {
        Statement::Let { name, value, loc } => {
            if env.has_local(name) {
                return err(SonarError::reference(format!(
                    "Identifier '{name}' has already been declared in this scope"
                ))
                .with_location(*loc));
            }
            let v = eval_expression(value, env);
            if is_error(&v) {
                return v;
            }
            env.define(name.clone(), v);
            Value::Null
        }
        Statement::Return { value, loc: _ } => match value {
            Some(expr) => {
                let v = eval_expression(expr, env);
                if is_error(&v) {
                    v
                } else {
                    Value::Return(Box::new(v))
                }
            }
            None => Value::Return(Box::new(Value::Null)),
        },
        Statement::Expression { value, .. } => eval_expression(value, env),
        Statement::Block { statements, .. } => eval_block(statements, env),
        Statement::While { condition, body, .. } => eval_while(condition, body, env),
        Statement::For {
            counter,
            value,
            iterable,
            body,
            loc,
        } => eval_for(counter, value, iterable, body, env, *loc),
        Statement::Break { .. } => Value::Break,
        Statement::Continue { .. } => Value::Continue,
    }
}

fn eval_while(condition: &Expression, body: &Statement, env: &Rc<Environment>) -> Value {
    loop {
        let cond = eval_expression(condition, env);
        if is_error(&cond) {
            return cond;
        }
        if !cond.is_truthy() {
            return Value::Null;
        }
        let result = eval_statement(body, env);
        match result {
            Value::Error(_) | Value::Return(_) => return result,
            Value::Break => return Value::Null,
            Value::Continue => continue,
            _ => continue,
        }
    }
}

fn iteration_pairs(iterable: &Value) -> Vec<(Value, Value)> {
    match iterable {
        Value::String(s) => s
            .chars()
            .enumerate()
            .map(|(i, c)| (Value::Integer(i as i64), Value::string(c.to_string())))
            .collect(),
        Value::Array(items) => items
            .borrow()
            .iter()
            .enumerate()
            .map(|(i, v)| (Value::Integer(i as i64), v.clone()))
            .collect(),
        Value::Map(pairs) => pairs
            .borrow()
            .values()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        _ => Vec::new(),
    }
}

fn eval_for(
    counter: &str,
    value_name: &str,
    iterable: &Expression,
    body: &Statement,
    env: &Rc<Environment>,
    loc: Location,
) -> Value {
    let iter_val = eval_expression(iterable, env);
    if is_error(&iter_val) {
        return iter_val;
    }
    if !iter_val.is_iterable() {
        return err(SonarError::reference(format!(
            "type {} is not iterable",
            iter_val.type_name()
        ))
        .with_location(loc));
    }

    let loop_env = Environment::with_loop_scope(env.clone(), &[counter, value_name]);
    for (k, v) in iteration_pairs(&iter_val) {
        loop_env.clear_readonly();
        loop_env.define(counter, k);
        loop_env.define(value_name, v);
        loop_env.set_readonly(&[counter, value_name]);

        let result = eval_statement(body, &loop_env);
        match result {
            Value::Error(_) | Value::Return(_) => return result,
            Value::Break => return Value::Null,
            Value::Continue => continue,
            _ => continue,
        }
    }
    Value::Null
}

fn eval_expression(expr: &Expression, env: &Rc<Environment>) -> Value {
    match expr {
        Expression::IntegerLit { value, .. } => Value::Integer(*value),
        Expression::FloatLit { value, .. } => Value::Float(*value),
        Expression::StringLit { value, .. } => Value::string(value.clone()),
        Expression::BooleanLit { value, .. } => Value::Boolean(*value),
        Expression::NullLit { .. } => Value::Null,
        Expression::Identifier { name, loc } => eval_identifier(name, env, *loc),
        Expression::Prefix { operator, right, loc } => {
            let r = eval_expression(right, env);
            if is_error(&r) {
                return r;
            }
            eval_prefix(operator, r, *loc)
        }
        Expression::Infix {
            left,
            operator,
            right,
            loc,
        } => {
            let l = eval_expression(left, env);
            if is_error(&l) {
                return l;
            }
            let r = eval_expression(right, env);
            if is_error(&r) {
                return r;
            }
            eval_infix(operator, l, r, *loc)
        }
        Expression::Postfix { operand, operator, loc } => eval_postfix(operand, operator, env, *loc),
        Expression::If {
            condition,
            consequence,
            alternative,
            ..
        } => {
            let cond = eval_expression(condition, env);
            if is_error(&cond) {
                return cond;
            }
            if cond.is_truthy() {
                eval_statement(consequence, env)
            } else if let Some(alt) = alternative {
                eval_statement(alt, env)
            } else {
                Value::Null
            }
        }
        Expression::FunctionLit { parameters, body, .. } => Value::Function(Rc::new(FunctionValue {
            parameters: parameters.clone(),
            body: (**body).clone(),
            env: env.clone(),
        })),
        Expression::Call {
            function,
            arguments,
            loc,
        } => eval_call(function, arguments, env, *loc),
        Expression::ArrayLit { elements, .. } => {
            let mut values = Vec::with_capacity(elements.len());
            for e in elements {
                let v = eval_expression(e, env);
                if is_error(&v) {
                    return v;
                }
                values.push(v);
            }
            Value::array(values)
        }
        Expression::IndexExpr { left, index, loc } => {
            let l = eval_expression(left, env);
            if is_error(&l) {
                return l;
            }
            let i = eval_expression(index, env);
            if is_error(&i) {
                return i;
            }
            eval_index(l, i, *loc)
        }
        Expression::HashLit { pairs, loc } => {
            let mut map = std::collections::HashMap::new();
            for (k_expr, v_expr) in pairs {
                let k = eval_expression(k_expr, env);
                if is_error(&k) {
                    return k;
                }
                let v = eval_expression(v_expr, env);
                if is_error(&v) {
                    return v;
                }
                match k.hash_key() {
                    Some(hk) => {
                        map.insert(hk, (k, v));
                    }
                    None => {
                        return err(SonarError::type_error(format!(
                            "type {} cannot be used as a map key",
                            k.type_name()
                        ))
                        .with_location(*loc))
                    }
                }
            }
            Value::map(map)
        }
        Expression::Assignment {
            name,
            operator,
            value,
            loc,
        } => eval_assignment(name, operator, value, env, *loc),
        Expression::IndexAssign {
            target,
            key,
            value,
            loc,
        } => eval_index_assign(target, key, value, env, *loc),
    }
}

fn eval_identifier(name: &str, env: &Rc<Environment>, loc: Location) -> Value {
    if let Some(v) = env.get(name) {
        return v;
    }
    if let Some(b) = builtins::lookup(name) {
        return Value::Builtin(b);
    }
    err(SonarError::reference(format!("Identifier '{name}' has not been defined")).with_location(loc))
}

fn eval_prefix(operator: &str, right: Value, loc: Location) -> Value {
    match operator {
        "!" => Value::Boolean(!right.is_truthy()),
        "-" => match right {
            Value::Integer(i) => Value::Integer(-i),
            Value::Float(f) => Value::Float(-f),
            other => err(SonarError::syntax(format!(
                "unknown operator: -{}",
                other.type_name()
            ))
            .with_location(loc)),
        },
        other => err(SonarError::syntax(format!("unknown prefix operator: {other}")).with_location(loc)),
    }
}

fn eval_postfix(operand: &Expression, operator: &PostfixOp, env: &Rc<Environment>, loc: Location) -> Value {
    let delta: i64 = match operator {
        PostfixOp::Increment => 1,
        PostfixOp::Decrement => -1,
    };
    match operand {
        Expression::Identifier { name, .. } => {
            let current = match env.get(name) {
                Some(v) => v,
                None => {
                    return err(SonarError::reference(format!(
                        "Identifier '{name}' has not been defined"
                    ))
                    .with_location(loc))
                }
            };
            match current {
                Value::Integer(i) => {
                    if let Err(e) = env.set(name, Value::Integer(i + delta)) {
                        return err(e.with_location(loc));
                    }
                    Value::Integer(i)
                }
                other => err(SonarError::syntax(format!(
                    "postfix operator requires an integer, got {}",
                    other.type_name()
                ))
                .with_location(loc)),
            }
        }
        Expression::IntegerLit { value, .. } => Value::Integer(*value),
        _ => err(SonarError::syntax("postfix operator requires an identifier or integer literal").with_location(loc)),
    }
}

fn eval_assignment(
    name: &str,
    operator: &AssignOp,
    value_expr: &Expression,
    env: &Rc<Environment>,
    loc: Location,
) -> Value {
    let rhs = eval_expression(value_expr, env);
    if is_error(&rhs) {
        return rhs;
    }
    let new_value = match operator {
        AssignOp::Assign => rhs,
        AssignOp::Plus | AssignOp::Minus | AssignOp::Asterisk | AssignOp::Slash => {
            let current = match env.get(name) {
                Some(v) => v,
                None => {
                    return err(SonarError::reference(format!(
                        "Identifier '{name}' has not been defined"
                    ))
                    .with_location(loc))
                }
            };
            let op_str = match operator {
                AssignOp::Plus => "+",
                AssignOp::Minus => "-",
                AssignOp::Asterisk => "*",
                AssignOp::Slash => "/",
                AssignOp::Assign => unreachable!(),
            };
            eval_infix(op_str, current, rhs, loc)
        }
    };
    if is_error(&new_value) {
        return new_value;
    }
    match env.set(name, new_value.clone()) {
        Ok(()) => new_value,
        Err(e) => err(e.with_location(loc)),
    }
}

fn eval_call(function: &Expression, arguments: &[Expression], env: &Rc<Environment>, loc: Location) -> Value {
    let callee = eval_expression(function, env);
    if is_error(&callee) {
        return callee;
    }
    let mut args = Vec::with_capacity(arguments.len());
    for a in arguments {
        let v = eval_expression(a, env);
        if is_error(&v) {
            return v;
        }
        args.push(v);
    }
    apply_function(callee, &args, loc)
}

fn apply_function(callee: Value, args: &[Value], loc: Location) -> Value {
    match callee {
        Value::Function(f) => {
            let call_env = Environment::with_outer(f.env.clone());
            for (i, param) in f.parameters.iter().enumerate() {
                let v = args.get(i).cloned().unwrap_or(Value::Null);
                call_env.define(param.clone(), v);
            }
            let result = eval_statement(&f.body, &call_env);
            match result {
                Value::Return(inner) => *inner,
                other => other,
            }
        }
        Value::Builtin(b) => match (b.func)(args) {
            Ok(v) => v,
            Err(e) => err(e.with_location(loc)),
        },
        other => err(SonarError::runtime(format!("type {} is not callable", other.type_name())).with_location(loc)),
    }
}

fn eval_index(left: Value, index: Value, loc: Location) -> Value {
    match (&left, &index) {
        (Value::Array(items), Value::Integer(i)) => {
            let items = items.borrow();
            match resolve_index(*i, items.len()) {
                Some(idx) => items[idx].clone(),
                None => err(SonarError::reference(format!(
                    "Index '{i}' out of range [{}]",
                    items.len()
                ))
                .with_location(loc)),
            }
        }
        (Value::String(s), Value::Integer(i)) => {
            let chars: Vec<char> = s.chars().collect();
            match resolve_index(*i, chars.len()) {
                Some(idx) => Value::string(chars[idx].to_string()),
                None => err(SonarError::reference(format!(
                    "Index '{i}' out of range [{}]",
                    chars.len()
                ))
                .with_location(loc)),
            }
        }
        (Value::Map(pairs), key) => match key.hash_key() {
            Some(hk) => pairs
                .borrow()
                .get(&hk)
                .map(|(_, v)| v.clone())
                .unwrap_or(Value::Null),
            None => err(SonarError::reference(format!(
                "type {} cannot be used as a map key",
                key.type_name()
            ))
            .with_location(loc)),
        },
        _ => err(SonarError::reference(format!(
            "index operator not supported for type {}",
            left.type_name()
        ))
        .with_location(loc)),
    }
}

/// Resolves a possibly-negative index against `len`, returning `None` when
/// out of range (both negative-out-of-range and positive-out-of-range).
fn resolve_index(i: i64, len: usize) -> Option<usize> {
    let len_i = len as i64;
    let actual = if i < 0 { len_i + i } else { i };
    if actual < 0 || actual >= len_i {
        None
    } else {
        Some(actual as usize)
    }
}

fn eval_index_assign(
    target: &Expression,
    key_expr: &Expression,
    value_expr: &Expression,
    env: &Rc<Environment>,
    loc: Location,
) -> Value {
    let target_val = eval_expression(target, env);
    if is_error(&target_val) {
        return target_val;
    }
    let key = eval_expression(key_expr, env);
    if is_error(&key) {
        return key;
    }
    let value = eval_expression(value_expr, env);
    if is_error(&value) {
        return value;
    }

    match (&target_val, &key) {
        (Value::Array(items), Value::Integer(i)) => {
            let mut items = items.borrow_mut();
            let len_i = items.len() as i64;
            let actual = if *i < 0 { len_i + *i } else { *i };
            if actual < 0 || actual > len_i {
                return err(SonarError::reference(format!(
                    "Index '{i}' out of range [{}]",
                    items.len()
                ))
                .with_location(loc));
            }
            let idx = actual as usize;
            if idx == items.len() {
                items.push(value.clone());
            } else {
                items[idx] = value.clone();
            }
            value
        }
        (Value::Map(pairs), key_val) => match key_val.hash_key() {
            Some(hk) => {
                pairs.borrow_mut().insert(hk, (key_val.clone(), value.clone()));
                value
            }
            None => err(SonarError::type_error(format!(
                "type {} cannot be used as a map key",
                key_val.type_name()
            ))
            .with_location(loc)),
        },
        _ => err(SonarError::reference(format!(
            "index assignment not supported for type {}",
            target_val.type_name()
        ))
        .with_location(loc)),
    }
}

fn eval_infix(operator: &str, left: Value, right: Value, loc: Location) -> Value {
    if operator == "and" {
        return Value::Boolean(left.is_truthy() && right.is_truthy());
    }
    if operator == "or" {
        return Value::Boolean(left.is_truthy() || right.is_truthy());
    }

    match (&left, &right) {
        (Value::Integer(a), Value::Integer(b)) => eval_integer_infix(operator, *a, *b, loc),
        (Value::Float(a), Value::Float(b)) => eval_numeric_infix(operator, *a, *b, loc),
        (Value::Integer(a), Value::Float(b)) => eval_numeric_infix(operator, *a as f64, *b, loc),
        (Value::Float(a), Value::Integer(b)) => eval_numeric_infix(operator, *a, *b as f64, loc),

        (Value::String(a), Value::String(b)) => eval_string_infix(operator, a, b, loc),

        (Value::Array(a), Value::Array(b)) => eval_array_array_infix(operator, a, b, loc),
        (Value::Array(a), Value::Integer(n)) => eval_array_int_infix(operator, a, *n, loc),

        (Value::Map(map), _) if operator == "-" => {
            let target_inspect = right.inspect();
            let mut map_ref = map.borrow_mut();
            let doomed: Option<crate::value::HashKey> = map_ref
                .iter()
                .find(|(_, (k, _))| k.inspect() == target_inspect)
                .map(|(hk, _)| *hk);
            if let Some(hk) = doomed {
                map_ref.remove(&hk);
            }
            drop(map_ref);
            left
        }
        (Value::Map(_), _) => err(SonarError::syntax(format!(
            "unknown operator: MAP {operator} {}",
            right.type_name()
        ))
        .with_location(loc)),

        (Value::Function(a), Value::Function(b)) if operator == "==" || operator == "!=" => {
            let equal = Rc::ptr_eq(a, b);
            Value::Boolean(if operator == "==" { equal } else { !equal })
        }
        (Value::Builtin(a), Value::Builtin(b)) if operator == "==" || operator == "!=" => {
            let equal = std::ptr::eq(*a, *b);
            Value::Boolean(if operator == "==" { equal } else { !equal })
        }

        _ if operator == "==" || operator == "!=" => {
            let equal = left.type_name() == right.type_name() && left.inspect() == right.inspect();
            Value::Boolean(if operator == "==" { equal } else { !equal })
        }
        _ => err(SonarError::syntax(format!(
            "type mismatch: {} {} {}",
            left.type_name(),
            operator,
            right.type_name()
        ))
        .with_location(loc)),
    }
}

/// True int64 arithmetic for `+`/`-`/`*`/comparisons, matching the Go
/// original's `evalIntegerInfixExpression` — no float round-trip for operands
/// beyond 2^53. Division alone promotes through `f64` (spec.md §4.3.1: the
/// result is Integer iff the mathematical result has no fractional part).
fn eval_integer_infix(operator: &str, a: i64, b: i64, loc: Location) -> Value {
    match operator {
        "+" => Value::Integer(a + b),
        "-" => Value::Integer(a - b),
        "*" => Value::Integer(a * b),
        "/" => {
            if b == 0 {
                return err(SonarError::runtime(format!("Division by zero ({a}/0)")).with_location(loc));
            }
            to_value_division(divide(a as f64, b as f64))
        }
        "<" => Value::Boolean(a < b),
        ">" => Value::Boolean(a > b),
        "<=" => Value::Boolean(a <= b),
        ">=" => Value::Boolean(a >= b),
        "==" => Value::Boolean(a == b),
        "!=" => Value::Boolean(a != b),
        other => err(SonarError::syntax(format!("unknown operator: {other}")).with_location(loc)),
    }
}

/// `a / b` with left-zero-divided-by-negative normalised to positive zero
/// (spec.md §4.3.1: `0/-1 → 0`, not `-0`).
fn divide(a: f64, b: f64) -> f64 {
    let result = a / b;
    if result == 0.0 {
        0.0
    } else {
        result
    }
}

fn to_value_division(f: f64) -> Value {
    if f.fract() == 0.0 && f.is_finite() {
        Value::Integer(f as i64)
    } else {
        Value::Float(f)
    }
}

fn eval_numeric_infix(operator: &str, a: f64, b: f64, loc: Location) -> Value {
    match operator {
        "+" => Value::Float(a + b),
        "-" => Value::Float(a - b),
        "*" => Value::Float(a * b),
        "/" => {
            if b == 0.0 {
                return err(SonarError::runtime(format!("Division by zero ({}/0)", a)).with_location(loc));
            }
            to_value_division(divide(a, b))
        }
        "<" => Value::Boolean(a < b),
        ">" => Value::Boolean(a > b),
        "<=" => Value::Boolean(a <= b),
        ">=" => Value::Boolean(a >= b),
        "==" => Value::Boolean(a == b),
        "!=" => Value::Boolean(a != b),
        other => err(SonarError::syntax(format!("unknown operator: {other}")).with_location(loc)),
    }
}

fn eval_string_infix(operator: &str, a: &str, b: &str, loc: Location) -> Value {
    match operator {
        "+" => Value::string(format!("{a}{b}")),
        "-" => Value::string(a.replace(b, "")),
        "<" => Value::Boolean(a < b),
        ">" => Value::Boolean(a > b),
        "<=" => Value::Boolean(a <= b),
        ">=" => Value::Boolean(a >= b),
        "==" => Value::Boolean(a == b),
        "!=" => Value::Boolean(a != b),
        other => err(SonarError::syntax(format!("unknown operator: STRING {other} STRING")).with_location(loc)),
    }
}

fn eval_array_array_infix(
    operator: &str,
    a: &Rc<std::cell::RefCell<Vec<Value>>>,
    b: &Rc<std::cell::RefCell<Vec<Value>>>,
    loc: Location,
) -> Value {
    match operator {
        "+" => {
            let mut combined = a.borrow().clone();
            combined.extend(b.borrow().iter().cloned());
            Value::array(combined)
        }
        "==" => Value::Boolean(arrays_equal(&a.borrow(), &b.borrow())),
        "!=" => Value::Boolean(!arrays_equal(&a.borrow(), &b.borrow())),
        other => err(SonarError::syntax(format!("unknown operator: ARRAY {other} ARRAY")).with_location(loc)),
    }
}

fn arrays_equal(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|(x, y)| x.type_name() == y.type_name() && x.inspect() == y.inspect())
}

fn eval_array_int_infix(operator: &str, arr: &Rc<std::cell::RefCell<Vec<Value>>>, n: i64, loc: Location) -> Value {
    match operator {
        "/" => {
            if n <= 0 {
                return err(SonarError::runtime("chunk size must be a positive integer").with_location(loc));
            }
            let items = arr.borrow();
            let chunks: Vec<Value> = items
                .chunks(n as usize)
                .map(|chunk| Value::array(chunk.to_vec()))
                .collect();
            Value::array(chunks)
        }
        "-" => {
            let mut items = arr.borrow().clone();
            if n < 0 || n as usize >= items.len() {
                return err(SonarError::reference(format!("Index '{n}' out of range [{}]", items.len()))
                    .with_location(loc));
            }
            items.remove(n as usize);
            Value::array(items)
        }
        "*" => {
            if n < 0 {
                return err(SonarError::runtime("repeat count must not be negative").with_location(loc));
            }
            let repeated: Vec<Value> = (0..n).map(|_| Value::Array(arr.clone())).collect();
            Value::array(repeated)
        }
        other => err(SonarError::syntax(format!("unknown operator: ARRAY {other} INTEGER")).with_location(loc)),
    }
}
