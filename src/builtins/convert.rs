//! Conversion operations: int, float, str, convertable
//!
//! Grounded on `examples/original_source/.../evaluator/types.go`.

use crate::error::SonarError;
use crate::value::{Builtin, Value};

/// Converts x to an integer: truncates floats, maps booleans to 0/1, and
/// parses strings. Anything else is a RuntimeError.
fn builtin_int(args: &[Value]) -> Result<Value, SonarError> {
    if args.len() != 1 {
        return Err(SonarError::requires_n_args("int", 1, args.len()));
    }
    match &args[0] {
        Value::Integer(i) => Ok(Value::Integer(*i)),
        Value::Float(f) => Ok(Value::Integer(*f as i64)),
        Value::Boolean(b) => Ok(Value::Integer(if *b { 1 } else { 0 })),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| SonarError::runtime(format!("cannot convert '{s}' to an integer"))),
        other => Err(SonarError::runtime(format!(
            "type {} cannot be converted to an integer",
            other.type_name()
        ))),
    }
}

/// Converts x to a float: widens integers, maps booleans to 0.0/1.0, and
/// parses strings.
fn builtin_float(args: &[Value]) -> Result<Value, SonarError> {
    if args.len() != 1 {
        return Err(SonarError::requires_n_args("float", 1, args.len()));
    }
    match &args[0] {
        Value::Integer(i) => Ok(Value::Float(*i as f64)),
        Value::Float(f) => Ok(Value::Float(*f)),
        Value::Boolean(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| SonarError::runtime(format!("cannot convert '{s}' to a float"))),
        other => Err(SonarError::runtime(format!(
            "type {} cannot be converted to a float",
            other.type_name()
        ))),
    }
}

/// Converts x to its printed string form (x's inspect string, unquoted).
fn builtin_str(args: &[Value]) -> Result<Value, SonarError> {
    if args.len() != 1 {
        return Err(SonarError::requires_n_args("str", 1, args.len()));
    }
    Ok(Value::string(args[0].inspect()))
}

fn is_convertible_to(value: &Value, kind: &str) -> bool {
    match kind {
        "INTEGER" => match value {
            Value::Integer(_) | Value::Float(_) | Value::Boolean(_) => true,
            Value::String(s) => s.trim().parse::<i64>().is_ok(),
            _ => false,
        },
        "FLOAT" => match value {
            Value::Integer(_) | Value::Float(_) | Value::Boolean(_) => true,
            Value::String(s) => s.trim().parse::<f64>().is_ok(),
            _ => false,
        },
        "STRING" => true,
        "MAP" => matches!(value, Value::Array(_)),
        _ => false,
    }
}

/// True if v can be converted to the kind named by kindName (e.g. "INTEGER",
/// "FLOAT", "STRING", "MAP").
fn builtin_convertable(args: &[Value]) -> Result<Value, SonarError> {
    if args.len() != 2 {
        return Err(SonarError::requires_n_args("convertable", 2, args.len()));
    }
    let kind = match &args[1] {
        Value::String(s) => s.to_uppercase(),
        other => {
            return Err(SonarError::type_error(format!(
                "'convertable' requires a string kind name, got {}",
                other.type_name()
            )))
        }
    };
    Ok(Value::Boolean(is_convertible_to(&args[0], &kind)))
}

pub static ENTRIES: &[Builtin] = &[
    Builtin { name: "int", func: builtin_int },
    Builtin { name: "float", func: builtin_float },
    Builtin { name: "str", func: builtin_str },
    Builtin { name: "convertable", func: builtin_convertable },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_truncates_float() {
        assert!(matches!(builtin_int(&[Value::Float(2.9)]).unwrap(), Value::Integer(2)));
    }

    #[test]
    fn int_parses_string() {
        assert!(matches!(
            builtin_int(&[Value::string(" 42 ")]).unwrap(),
            Value::Integer(42)
        ));
    }

    #[test]
    fn int_on_unparsable_string_is_runtime_error() {
        assert!(builtin_int(&[Value::string("nope")]).is_err());
    }

    #[test]
    fn float_widens_integer() {
        match builtin_float(&[Value::Integer(3)]).unwrap() {
            Value::Float(f) => assert_eq!(f, 3.0),
            other => panic!("expected float, got {other:?}"),
        }
    }

    #[test]
    fn str_is_unquoted_inspect() {
        assert_eq!(builtin_str(&[Value::string("hi")]).unwrap().inspect(), "hi");
    }

    #[test]
    fn convertable_checks_kind() {
        assert!(matches!(
            builtin_convertable(&[Value::string("42"), Value::string("integer")]).unwrap(),
            Value::Boolean(true)
        ));
        assert!(matches!(
            builtin_convertable(&[Value::string("nope"), Value::string("integer")]).unwrap(),
            Value::Boolean(false)
        ));
    }
}
