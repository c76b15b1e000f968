//! Array operations: push, pop, slice, sort, reverse, range
//!
//! Grounded on `examples/original_source/.../evaluator/array.go` and
//! `.../utils/slice.go`.

use crate::error::SonarError;
use crate::value::{Builtin, Value};

/// New array with the given values appended.
fn builtin_push(args: &[Value]) -> Result<Value, SonarError> {
    if args.is_empty() {
        return Err(SonarError::requires_at_least_n_args("push", 1, args.len()));
    }
    match &args[0] {
        Value::Array(items) => {
            let mut new_items = items.borrow().clone();
            new_items.extend_from_slice(&args[1..]);
            Ok(Value::array(new_items))
        }
        other => Err(SonarError::type_error(format!(
            "'push' requires an array, got {}",
            other.type_name()
        ))),
    }
}

/// Removes and returns the element at index i (default: last), mutating
/// `arr` in place.
fn builtin_pop(args: &[Value]) -> Result<Value, SonarError> {
    if args.is_empty() || args.len() > 2 {
        return Err(SonarError::arity(format!(
            "'pop' requires 1 or 2 arguments, {} given",
            args.len()
        )));
    }
    match &args[0] {
        Value::Array(items) => {
            let mut items = items.borrow_mut();
            if items.is_empty() {
                return Err(SonarError::reference("Index '0' out of range [0]"));
            }
            let idx = match args.get(1) {
                None => items.len() - 1,
                Some(Value::Integer(i)) => {
                    let len_i = items.len() as i64;
                    let actual = if *i < 0 { len_i + *i } else { *i };
                    if actual < 0 || actual >= len_i {
                        return Err(SonarError::reference(format!(
                            "Index '{i}' out of range [{}]",
                            items.len()
                        )));
                    }
                    actual as usize
                }
                Some(other) => {
                    return Err(SonarError::type_error(format!(
                        "'pop' index must be an integer, got {}",
                        other.type_name()
                    )))
                }
            };
            Ok(items.remove(idx))
        }
        other => Err(SonarError::type_error(format!(
            "'pop' requires an array, got {}",
            other.type_name()
        ))),
    }
}

/// Normalizes an optional slice bound: negative indices wrap by `len`, and
/// the result is clamped to `[0, len]`.
fn normalize_bound(v: Option<&Value>, len: i64, default: i64) -> Result<i64, SonarError> {
    match v {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Integer(i)) => {
            let mut idx = *i;
            if idx < 0 {
                idx += len;
            }
            Ok(idx.clamp(0, len))
        }
        Some(other) => Err(SonarError::type_error(format!(
            "'slice' bounds must be integers, got {}",
            other.type_name()
        ))),
    }
}

/// Python-style slice of an array or string: negative indices wrap by
/// length, an omitted end means length, step selects every k-th element.
/// A negative step is rejected outright (see DESIGN.md).
fn builtin_slice(args: &[Value]) -> Result<Value, SonarError> {
    if args.is_empty() || args.len() > 4 {
        return Err(SonarError::arity(format!(
            "'slice' requires 1 to 4 arguments, {} given",
            args.len()
        )));
    }
    let step = match args.get(3) {
        None | Some(Value::Null) => 1i64,
        Some(Value::Integer(s)) => *s,
        Some(other) => {
            return Err(SonarError::type_error(format!(
                "'slice' step must be an integer, got {}",
                other.type_name()
            )))
        }
    };
    if step <= 0 {
        return Err(SonarError::runtime("slice step must be a positive integer"));
    }

    match &args[0] {
        Value::Array(items) => {
            let items = items.borrow();
            let len = items.len() as i64;
            let start = normalize_bound(args.get(1), len, 0)?;
            let end = normalize_bound(args.get(2), len, len)?;
            if end < start {
                return Err(SonarError::reference("Invalid range: end is less than start"));
            }
            let mut result = Vec::new();
            let mut i = start;
            while i < end {
                result.push(items[i as usize].clone());
                i += step;
            }
            Ok(Value::array(result))
        }
        Value::String(s) => {
            let chars: Vec<char> = s.chars().collect();
            let len = chars.len() as i64;
            let start = normalize_bound(args.get(1), len, 0)?;
            let end = normalize_bound(args.get(2), len, len)?;
            if end < start {
                return Err(SonarError::reference("Invalid range: end is less than start"));
            }
            let mut result = String::new();
            let mut i = start;
            while i < end {
                result.push(chars[i as usize]);
                i += step;
            }
            Ok(Value::string(result))
        }
        other => Err(SonarError::type_error(format!(
            "'slice' requires an array or string, got {}",
            other.type_name()
        ))),
    }
}

/// New array sorted by each element's printed form.
fn builtin_sort(args: &[Value]) -> Result<Value, SonarError> {
    if args.len() != 1 {
        return Err(SonarError::requires_n_args("sort", 1, args.len()));
    }
    match &args[0] {
        Value::Array(items) => {
            let mut sorted = items.borrow().clone();
            sorted.sort_by(|a, b| a.inspect().cmp(&b.inspect()));
            Ok(Value::array(sorted))
        }
        other => Err(SonarError::type_error(format!(
            "'sort' requires an array, got {}",
            other.type_name()
        ))),
    }
}

/// New array with elements in reverse order.
fn builtin_reverse(args: &[Value]) -> Result<Value, SonarError> {
    if args.len() != 1 {
        return Err(SonarError::requires_n_args("reverse", 1, args.len()));
    }
    match &args[0] {
        Value::Array(items) => {
            let mut reversed = items.borrow().clone();
            reversed.reverse();
            Ok(Value::array(reversed))
        }
        other => Err(SonarError::type_error(format!(
            "'reverse' requires an array, got {}",
            other.type_name()
        ))),
    }
}

fn expect_int(name: &str, v: &Value) -> Result<i64, SonarError> {
    match v {
        Value::Integer(i) => Ok(*i),
        other => Err(SonarError::type_error(format!(
            "'{name}' requires integer arguments, got {}",
            other.type_name()
        ))),
    }
}

/// Integer array from start toward end by step (default 1); empty when the
/// direction of travel disagrees with the sign of step.
fn builtin_range(args: &[Value]) -> Result<Value, SonarError> {
    if args.len() < 2 || args.len() > 3 {
        return Err(SonarError::arity(format!(
            "'range' requires 2 or 3 arguments, {} given",
            args.len()
        )));
    }
    let start = expect_int("range", &args[0])?;
    let end = expect_int("range", &args[1])?;
    let step = match args.get(2) {
        None => 1,
        Some(v) => expect_int("range", v)?,
    };
    if step == 0 {
        return Err(SonarError::runtime("'range' step must not be zero"));
    }

    let mut result = Vec::new();
    if step > 0 {
        let mut i = start;
        while i < end {
            result.push(Value::Integer(i));
            i += step;
        }
    } else {
        let mut i = start;
        while i > end {
            result.push(Value::Integer(i));
            i += step;
        }
    }
    Ok(Value::array(result))
}

pub static ENTRIES: &[Builtin] = &[
    Builtin { name: "push", func: builtin_push },
    Builtin { name: "pop", func: builtin_pop },
    Builtin { name: "slice", func: builtin_slice },
    Builtin { name: "sort", func: builtin_sort },
    Builtin { name: "reverse", func: builtin_reverse },
    Builtin { name: "range", func: builtin_range },
];
