//! Help system: help
//!
//! Per-builtin documentation, surfaced as the `help(name)` builtin and the
//! CLI's usage text. Grounded on the shape of the starting point's
//! `src/help.rs`/`src/builtins/help.rs` (name/signature/description entries),
//! simplified to a static table since this registry has no runtime mutation.

use crate::error::SonarError;
use crate::value::{Builtin, Value};

/// (name, signature, one-line description) for every built-in in the registry.
const DOCS: &[(&str, &str, &str)] = &[
    ("len", "len(x)", "Length of a string, array, or map."),
    (
        "print",
        "print(x, ...)",
        "Prints values separated by \", \"; strings print quoted. Returns null.",
    ),
    ("type", "type(x)", "Name of x's kind, as a lowercase string."),
    (
        "copy",
        "copy(x)",
        "Shallow copy of a scalar, string, array, map, or function.",
    ),
    (
        "contains",
        "contains(c, e)",
        "True if array c contains e, or string c contains substring e.",
    ),
    ("index", "index(c, e)", "Index of the first occurrence of e in c, or -1."),
    ("push", "push(arr, v, ...)", "New array with the given values appended."),
    (
        "pop",
        "pop(arr, i?)",
        "Removes and returns the element at i (default last), mutating arr in place.",
    ),
    (
        "slice",
        "slice(x, start?, end?, step?)",
        "Python-style slice of an array or string.",
    ),
    ("sort", "sort(arr)", "New array sorted by each element's printed form."),
    ("reverse", "reverse(arr)", "New array with elements in reverse order."),
    (
        "range",
        "range(start, end, step?)",
        "Integer array from start toward end by step (default 1).",
    ),
    ("mapKeys", "mapKeys(m)", "Array of m's keys."),
    ("mapValues", "mapValues(m)", "Array of m's values."),
    ("mapEntries", "mapEntries(m)", "Array of [key, value] pairs."),
    ("map", "map(arr)", "Converts an array to a map keyed by integer index."),
    ("int", "int(x)", "Converts x to an integer."),
    ("float", "float(x)", "Converts x to a float."),
    ("str", "str(x)", "Converts x to its printed string form."),
    (
        "convertable",
        "convertable(v, kindName)",
        "True if v can be converted to the kind named by kindName.",
    ),
    (
        "help",
        "help(name?)",
        "Help text for a built-in, or a list of all built-in names with none given.",
    ),
];

pub fn description_for(name: &str) -> Option<&'static str> {
    DOCS.iter().find(|(n, _, _)| *n == name).map(|(_, _, d)| *d)
}

pub fn signature_for(name: &str) -> Option<&'static str> {
    DOCS.iter().find(|(n, _, _)| *n == name).map(|(_, sig, _)| *sig)
}

/// All registered built-in names, in table order.
pub fn all_names() -> Vec<&'static str> {
    DOCS.iter().map(|(n, _, _)| *n).collect()
}

fn builtin_help(args: &[Value]) -> Result<Value, SonarError> {
    match args.first() {
        None => Ok(Value::string(all_names().join(", "))),
        Some(Value::String(name)) => match description_for(name) {
            Some(desc) => Ok(Value::string(format!(
                "{} — {desc}",
                signature_for(name).unwrap_or(name)
            ))),
            None => Err(SonarError::reference(format!("no help found for '{name}'"))),
        },
        Some(other) => Err(SonarError::type_error(format!(
            "'help' requires a string name, got {}",
            other.type_name()
        ))),
    }
}

pub static ENTRIES: &[Builtin] = &[Builtin { name: "help", func: builtin_help }];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_with_no_args_lists_every_name() {
        let r = builtin_help(&[]).unwrap();
        let s = r.inspect();
        assert!(s.contains("len"));
        assert!(s.contains("push"));
    }

    #[test]
    fn help_for_known_builtin_includes_signature() {
        let r = builtin_help(&[Value::string("len")]).unwrap();
        assert!(r.inspect().contains("len(x)"));
    }

    #[test]
    fn help_for_unknown_name_is_reference_error() {
        assert!(builtin_help(&[Value::string("nope")]).is_err());
    }
}
