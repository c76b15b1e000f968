// ABOUTME: Lexically-scoped environments, including the loop-scope allow/readonly mechanism

use crate::error::SonarError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// An allow-list plus readonly-set restricting which identifiers a loop
/// body may write locally. Names outside the allow-list delegate to the
/// outer environment instead of shadowing locally.
#[derive(Debug)]
struct LoopScope {
    allow: HashSet<String>,
    readonly: RefCell<HashSet<String>>,
}

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    outer: Option<Rc<Environment>>,
    loop_scope: Option<LoopScope>,
}

impl Environment {
    /// Creates a new global environment with no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: None,
            loop_scope: None,
        })
    }

    /// Creates a plain enclosed environment (function call frame).
    pub fn with_outer(outer: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: Some(outer),
            loop_scope: None,
        })
    }

    /// Creates an ephemeral loop scope whose allow-list is exactly `names`.
    pub fn with_loop_scope(outer: Rc<Environment>, names: &[&str]) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: Some(outer),
            loop_scope: Some(LoopScope {
                allow: names.iter().map(|s| s.to_string()).collect(),
                readonly: RefCell::new(HashSet::new()),
            }),
        })
    }

    /// Defines a binding in THIS scope (used by `let` and loop-scope setup).
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    /// True if `name` is bound in THIS frame only (used by `let` redeclaration checks).
    pub fn has_local(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }

    /// Looks up a name in this scope then outward through the chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.outer.as_ref().and_then(|outer| outer.get(name))
    }

    /// Marks `names` readonly in this loop scope for the current iteration.
    pub fn set_readonly(&self, names: &[&str]) {
        if let Some(scope) = &self.loop_scope {
            let mut readonly = scope.readonly.borrow_mut();
            for n in names {
                readonly.insert(n.to_string());
            }
        }
    }

    /// Clears the readonly set, e.g. between loop iterations.
    pub fn clear_readonly(&self) {
        if let Some(scope) = &self.loop_scope {
            scope.readonly.borrow_mut().clear();
        }
    }

    /// Assigns to an existing binding. Plain frames write locally if the name
    /// already exists there, else delegate outward (matching `let`-declared
    /// bindings shadowing, and bare assignment reaching an enclosing scope).
    /// Loop scopes additionally enforce: readonly names refuse the write;
    /// allow-listed names write locally; everything else delegates outward,
    /// bypassing the loop scope's own storage entirely.
    pub fn set(&self, name: &str, value: Value) -> Result<(), SonarError> {
        if let Some(scope) = &self.loop_scope {
            if scope.readonly.borrow().contains(name) {
                return Err(SonarError::assignment(format!(
                    "Illegal assignment to constant '{name}'"
                )));
            }
            if scope.allow.contains(name) {
                self.bindings.borrow_mut().insert(name.to_string(), value);
                return Ok(());
            }
            return match &self.outer {
                Some(outer) => outer.set(name, value),
                None => Err(SonarError::reference(format!(
                    "Identifier '{name}' has not been defined"
                ))),
            };
        }

        if self.bindings.borrow().contains_key(name) {
            self.bindings.borrow_mut().insert(name.to_string(), value);
            return Ok(());
        }

        match &self.outer {
            Some(outer) => outer.set(name, value),
            None => Err(SonarError::reference(format!(
                "Identifier '{name}' has not been defined"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_get() {
        let env = Environment::new();
        env.define("x", Value::Integer(42));
        assert!(matches!(env.get("x"), Some(Value::Integer(42))));
    }

    #[test]
    fn undefined_symbol_is_none() {
        let env = Environment::new();
        assert!(env.get("undefined").is_none());
    }

    #[test]
    fn shadowing_in_child_scope() {
        let parent = Environment::new();
        parent.define("x", Value::Integer(1));
        let child = Environment::with_outer(parent);
        child.define("x", Value::Integer(2));
        assert!(matches!(child.get("x"), Some(Value::Integer(2))));
    }

    #[test]
    fn set_on_plain_scope_reaches_enclosing_binding() {
        let parent = Environment::new();
        parent.define("x", Value::Integer(1));
        let child = Environment::with_outer(parent.clone());
        child.set("x", Value::Integer(5)).unwrap();
        assert!(matches!(parent.get("x"), Some(Value::Integer(5))));
    }

    #[test]
    fn set_on_undefined_name_is_reference_error() {
        let env = Environment::new();
        let err = env.set("missing", Value::Integer(1)).unwrap_err();
        assert!(matches!(err, SonarError::ReferenceError { .. }));
    }

    #[test]
    fn loop_scope_allows_local_write_to_allow_listed_names() {
        let outer = Environment::new();
        let loop_env = Environment::with_loop_scope(outer.clone(), &["i", "v"]);
        loop_env.define("i", Value::Integer(0));
        loop_env.set("i", Value::Integer(1)).unwrap();
        assert!(matches!(loop_env.get("i"), Some(Value::Integer(1))));
        assert!(outer.get("i").is_none());
    }

    #[test]
    fn loop_scope_readonly_rejects_writes_during_iteration() {
        let outer = Environment::new();
        let loop_env = Environment::with_loop_scope(outer, &["i", "v"]);
        loop_env.define("i", Value::Integer(0));
        loop_env.set_readonly(&["i", "v"]);
        let err = loop_env.set("i", Value::Integer(1)).unwrap_err();
        assert!(matches!(err, SonarError::AssignmentError { .. }));
    }

    #[test]
    fn loop_scope_delegates_other_names_outward() {
        let outer = Environment::new();
        outer.define("total", Value::Integer(0));
        let loop_env = Environment::with_loop_scope(outer.clone(), &["i", "v"]);
        loop_env.define("i", Value::Integer(0));
        loop_env.set("total", Value::Integer(10)).unwrap();
        assert!(matches!(outer.get("total"), Some(Value::Integer(10))));
        assert!(loop_env.has_local("total") == false);
    }

    #[test]
    fn readonly_clears_between_iterations() {
        let outer = Environment::new();
        let loop_env = Environment::with_loop_scope(outer, &["i"]);
        loop_env.define("i", Value::Integer(0));
        loop_env.set_readonly(&["i"]);
        assert!(loop_env.set("i", Value::Integer(1)).is_err());
        loop_env.clear_readonly();
        assert!(loop_env.set("i", Value::Integer(1)).is_ok());
    }
}
