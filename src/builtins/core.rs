//! Core operations: len, print, type, copy, contains, index
//!
//! General-purpose built-ins that apply across more than one value kind,
//! grounded on `examples/original_source/.../evaluator/builtins.go`.

use crate::error::SonarError;
use crate::value::{Builtin, Value};

/// Length of a string (characters, not bytes), an array, or a map.
fn builtin_len(args: &[Value]) -> Result<Value, SonarError> {
    if args.len() != 1 {
        return Err(SonarError::requires_n_args("len", 1, args.len()));
    }
    match &args[0] {
        Value::String(s) => Ok(Value::Integer(s.chars().count() as i64)),
        Value::Array(items) => Ok(Value::Integer(items.borrow().len() as i64)),
        Value::Map(pairs) => Ok(Value::Integer(pairs.borrow().len() as i64)),
        other => Err(SonarError::type_error(format!(
            "'len' is not supported for type {}",
            other.type_name()
        ))),
    }
}

/// Prints every argument's formatted-inspect form, joined by `", "`, and
/// returns null. The only built-in that performs I/O.
fn builtin_print(args: &[Value]) -> Result<Value, SonarError> {
    let parts: Vec<String> = args.iter().map(Value::formatted_inspect).collect();
    println!("{}", parts.join(", "));
    Ok(Value::Null)
}

/// The name of x's kind, as a lowercase string.
fn builtin_type(args: &[Value]) -> Result<Value, SonarError> {
    if args.len() != 1 {
        return Err(SonarError::requires_n_args("type", 1, args.len()));
    }
    Ok(Value::string(args[0].type_name().to_lowercase()))
}

/// Shallow copy of a scalar, string, array, map, or function. A genuinely
/// independent copy for arrays/maps (a new `Rc<RefCell<_>>`), unlike the
/// reference-aliasing `copy` in the source this crate was distilled from.
fn builtin_copy(args: &[Value]) -> Result<Value, SonarError> {
    if args.len() != 1 {
        return Err(SonarError::requires_n_args("copy", 1, args.len()));
    }
    match &args[0] {
        Value::Integer(_)
        | Value::Float(_)
        | Value::Boolean(_)
        | Value::Null
        | Value::String(_) => Ok(args[0].clone()),
        Value::Array(items) => Ok(Value::array(items.borrow().clone())),
        Value::Map(pairs) => Ok(Value::map(pairs.borrow().clone())),
        Value::Function(f) => Ok(Value::Function(f.clone())),
        other => Err(SonarError::runtime(format!(
            "type {} cannot be copied",
            other.type_name()
        ))),
    }
}

/// Array membership by (kind, inspect-string), or a substring test for strings.
fn builtin_contains(args: &[Value]) -> Result<Value, SonarError> {
    if args.len() != 2 {
        return Err(SonarError::requires_n_args("contains", 2, args.len()));
    }
    match &args[0] {
        Value::Array(items) => {
            let target_kind = args[1].type_name();
            let target_inspect = args[1].inspect();
            let found = items
                .borrow()
                .iter()
                .any(|v| v.type_name() == target_kind && v.inspect() == target_inspect);
            Ok(Value::Boolean(found))
        }
        Value::String(s) => match &args[1] {
            Value::String(needle) => Ok(Value::Boolean(s.contains(needle.as_ref()))),
            other => Err(SonarError::type_error(format!(
                "'contains' on a string requires a string argument, got {}",
                other.type_name()
            ))),
        },
        other => Err(SonarError::type_error(format!(
            "'contains' is not supported for type {}",
            other.type_name()
        ))),
    }
}

/// Index of the first element/substring matching e in c, or -1.
fn builtin_index(args: &[Value]) -> Result<Value, SonarError> {
    if args.len() != 2 {
        return Err(SonarError::requires_n_args("index", 2, args.len()));
    }
    match &args[0] {
        Value::Array(items) => {
            let target_kind = args[1].type_name();
            let target_inspect = args[1].inspect();
            let pos = items
                .borrow()
                .iter()
                .position(|v| v.type_name() == target_kind && v.inspect() == target_inspect);
            Ok(Value::Integer(pos.map(|p| p as i64).unwrap_or(-1)))
        }
        Value::String(s) => match &args[1] {
            Value::String(needle) => {
                let pos = s
                    .find(needle.as_ref())
                    .map(|byte_idx| s[..byte_idx].chars().count() as i64)
                    .unwrap_or(-1);
                Ok(Value::Integer(pos))
            }
            other => Err(SonarError::type_error(format!(
                "'index' on a string requires a string argument, got {}",
                other.type_name()
            ))),
        },
        other => Err(SonarError::type_error(format!(
            "'index' is not supported for type {}",
            other.type_name()
        ))),
    }
}

pub static ENTRIES: &[Builtin] = &[
    Builtin { name: "len", func: builtin_len },
    Builtin { name: "print", func: builtin_print },
    Builtin { name: "type", func: builtin_type },
    Builtin { name: "copy", func: builtin_copy },
    Builtin { name: "contains", func: builtin_contains },
    Builtin { name: "index", func: builtin_index },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_counts_characters_not_bytes() {
        let r = builtin_len(&[Value::string("héllo")]).unwrap();
        assert!(matches!(r, Value::Integer(5)));
    }

    #[test]
    fn len_rejects_unsupported_kind() {
        assert!(builtin_len(&[Value::Integer(1)]).is_err());
    }

    #[test]
    fn type_name_is_lowercase() {
        assert_eq!(builtin_type(&[Value::Integer(1)]).unwrap().inspect(), "integer");
    }

    #[test]
    fn copy_of_array_is_independent() {
        let arr = Value::array(vec![Value::Integer(1)]);
        let copy = builtin_copy(&[arr.clone()]).unwrap();
        if let (Value::Array(a), Value::Array(b)) = (&arr, &copy) {
            b.borrow_mut().push(Value::Integer(2));
            assert_eq!(a.borrow().len(), 1);
        } else {
            panic!("expected arrays");
        }
    }

    #[test]
    fn contains_matches_by_kind_and_inspect() {
        let arr = Value::array(vec![Value::Integer(1), Value::string("1")]);
        assert!(matches!(
            builtin_contains(&[arr.clone(), Value::Integer(1)]).unwrap(),
            Value::Boolean(true)
        ));
        assert!(matches!(
            builtin_contains(&[arr, Value::Integer(2)]).unwrap(),
            Value::Boolean(false)
        ));
    }

    #[test]
    fn index_returns_negative_one_when_absent() {
        let arr = Value::array(vec![Value::Integer(1)]);
        assert!(matches!(
            builtin_index(&[arr, Value::Integer(9)]).unwrap(),
            Value::Integer(-1)
        ));
    }
}
