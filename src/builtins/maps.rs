//! Map operations: mapKeys, mapValues, mapEntries, map
//!
//! Grounded on `examples/original_source/.../evaluator/map.go`.

use crate::error::SonarError;
use crate::value::{Builtin, Value};
use std::collections::HashMap;

/// Array of m's keys, in no particular order (maps don't preserve insertion order).
fn builtin_map_keys(args: &[Value]) -> Result<Value, SonarError> {
    if args.len() != 1 {
        return Err(SonarError::requires_n_args("mapKeys", 1, args.len()));
    }
    match &args[0] {
        Value::Map(pairs) => Ok(Value::array(
            pairs.borrow().values().map(|(k, _)| k.clone()).collect(),
        )),
        other => Err(SonarError::type_error(format!(
            "'mapKeys' requires a map, got {}",
            other.type_name()
        ))),
    }
}

/// Array of m's values.
fn builtin_map_values(args: &[Value]) -> Result<Value, SonarError> {
    if args.len() != 1 {
        return Err(SonarError::requires_n_args("mapValues", 1, args.len()));
    }
    match &args[0] {
        Value::Map(pairs) => Ok(Value::array(
            pairs.borrow().values().map(|(_, v)| v.clone()).collect(),
        )),
        other => Err(SonarError::type_error(format!(
            "'mapValues' requires a map, got {}",
            other.type_name()
        ))),
    }
}

/// Array of `[key, value]` two-element arrays.
fn builtin_map_entries(args: &[Value]) -> Result<Value, SonarError> {
    if args.len() != 1 {
        return Err(SonarError::requires_n_args("mapEntries", 1, args.len()));
    }
    match &args[0] {
        Value::Map(pairs) => Ok(Value::array(
            pairs
                .borrow()
                .values()
                .map(|(k, v)| Value::array(vec![k.clone(), v.clone()]))
                .collect(),
        )),
        other => Err(SonarError::type_error(format!(
            "'mapEntries' requires a map, got {}",
            other.type_name()
        ))),
    }
}

/// Converts an array to a map keyed by integer index.
fn builtin_map(args: &[Value]) -> Result<Value, SonarError> {
    if args.len() != 1 {
        return Err(SonarError::requires_n_args("map", 1, args.len()));
    }
    match &args[0] {
        Value::Array(items) => {
            let mut pairs = HashMap::new();
            for (i, v) in items.borrow().iter().enumerate() {
                let key = Value::Integer(i as i64);
                pairs.insert(key.hash_key().expect("integers are hashable"), (key, v.clone()));
            }
            Ok(Value::map(pairs))
        }
        other => Err(SonarError::type_error(format!(
            "'map' requires an array, got {}",
            other.type_name()
        ))),
    }
}

pub static ENTRIES: &[Builtin] = &[
    Builtin { name: "mapKeys", func: builtin_map_keys },
    Builtin { name: "mapValues", func: builtin_map_values },
    Builtin { name: "mapEntries", func: builtin_map_entries },
    Builtin { name: "map", func: builtin_map },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> Value {
        let mut pairs = HashMap::new();
        let key = Value::string("a");
        pairs.insert(key.hash_key().unwrap(), (key, Value::Integer(1)));
        Value::map(pairs)
    }

    #[test]
    fn map_keys_returns_the_keys() {
        let keys = builtin_map_keys(&[sample_map()]).unwrap();
        assert_eq!(keys.inspect(), "[a]");
    }

    #[test]
    fn map_values_returns_the_values() {
        let values = builtin_map_values(&[sample_map()]).unwrap();
        assert_eq!(values.inspect(), "[1]");
    }

    #[test]
    fn map_entries_returns_key_value_pairs() {
        let entries = builtin_map_entries(&[sample_map()]).unwrap();
        assert_eq!(entries.inspect(), "[['a', 1]]");
    }

    #[test]
    fn map_converts_array_to_integer_keyed_map() {
        let arr = Value::array(vec![Value::string("x"), Value::string("y")]);
        let m = builtin_map(&[arr]).unwrap();
        if let Value::Map(pairs) = &m {
            let pairs = pairs.borrow();
            assert_eq!(pairs.len(), 2);
            assert_eq!(
                pairs.get(&Value::Integer(0).hash_key().unwrap()).unwrap().1.inspect(),
                "x"
            );
            assert_eq!(
                pairs.get(&Value::Integer(1).hash_key().unwrap()).unwrap().1.inspect(),
                "y"
            );
        } else {
            panic!("expected map");
        }
    }
}
