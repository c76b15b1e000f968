// ABOUTME: Structured error kinds for lexing, parsing, and evaluation failures

use crate::ast::Location;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SonarError {
    /// Lexical/parsing problems, unknown-operator usage, type mismatch across an operator.
    #[error("{message}")]
    SyntaxError {
        message: String,
        location: Option<Location>,
    },

    /// Identifier not defined, out-of-range index, invalid range, index on unsupported kind.
    #[error("{message}")]
    ReferenceError {
        message: String,
        location: Option<Location>,
    },

    /// Illegal type conversion, uncopyable type, division by zero.
    #[error("{message}")]
    RuntimeError {
        message: String,
        location: Option<Location>,
    },

    /// Attempted write to a readonly binding (loop counter/value during its iteration).
    #[error("{message}")]
    AssignmentError {
        message: String,
        location: Option<Location>,
    },

    /// Wrong number of arguments to a built-in.
    #[error("{message}")]
    ArityError {
        message: String,
        location: Option<Location>,
    },

    /// Convertibility and value-kind mismatches in built-ins.
    #[error("{message}")]
    TypeError {
        message: String,
        location: Option<Location>,
    },
}

impl SonarError {
    pub fn syntax(message: impl Into<String>) -> Self {
        SonarError::SyntaxError {
            message: message.into(),
            location: None,
        }
    }

    pub fn syntax_at(message: impl Into<String>, location: Location) -> Self {
        SonarError::SyntaxError {
            message: message.into(),
            location: Some(location),
        }
    }

    pub fn reference(message: impl Into<String>) -> Self {
        SonarError::ReferenceError {
            message: message.into(),
            location: None,
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        SonarError::RuntimeError {
            message: message.into(),
            location: None,
        }
    }

    pub fn assignment(message: impl Into<String>) -> Self {
        SonarError::AssignmentError {
            message: message.into(),
            location: None,
        }
    }

    pub fn arity(message: impl Into<String>) -> Self {
        SonarError::ArityError {
            message: message.into(),
            location: None,
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        SonarError::TypeError {
            message: message.into(),
            location: None,
        }
    }

    pub fn requires_n_args(name: &str, expected: usize, given: usize) -> Self {
        SonarError::arity(format!(
            "'{name}' requires {expected} argument{}, {given} given",
            if expected == 1 { "" } else { "s" }
        ))
    }

    pub fn requires_at_least_n_args(name: &str, expected: usize, given: usize) -> Self {
        SonarError::arity(format!(
            "'{name}' requires at least {expected} argument{}, {given} given",
            if expected == 1 { "" } else { "s" }
        ))
    }

    pub fn requires_at_most_n_args(name: &str, expected: usize, given: usize) -> Self {
        SonarError::arity(format!(
            "'{name}' requires at most {expected} argument{}, {given} given",
            if expected == 1 { "" } else { "s" }
        ))
    }

    /// Human-facing error kind name, used by the CLI diagnostic formatter.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SonarError::SyntaxError { .. } => "SyntaxError",
            SonarError::ReferenceError { .. } => "ReferenceError",
            SonarError::RuntimeError { .. } => "RuntimeError",
            SonarError::AssignmentError { .. } => "AssignmentError",
            SonarError::ArityError { .. } => "ArityError",
            SonarError::TypeError { .. } => "TypeError",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            SonarError::SyntaxError { message, .. }
            | SonarError::ReferenceError { message, .. }
            | SonarError::RuntimeError { message, .. }
            | SonarError::AssignmentError { message, .. }
            | SonarError::ArityError { message, .. }
            | SonarError::TypeError { message, .. } => message,
        }
    }

    pub fn location(&self) -> Option<Location> {
        match self {
            SonarError::SyntaxError { location, .. }
            | SonarError::ReferenceError { location, .. }
            | SonarError::RuntimeError { location, .. }
            | SonarError::AssignmentError { location, .. }
            | SonarError::ArityError { location, .. }
            | SonarError::TypeError { location, .. } => *location,
        }
    }

    pub fn with_location(self, location: Location) -> Self {
        match self {
            SonarError::SyntaxError { message, .. } => SonarError::SyntaxError {
                message,
                location: Some(location),
            },
            SonarError::ReferenceError { message, .. } => SonarError::ReferenceError {
                message,
                location: Some(location),
            },
            SonarError::RuntimeError { message, .. } => SonarError::RuntimeError {
                message,
                location: Some(location),
            },
            SonarError::AssignmentError { message, .. } => SonarError::AssignmentError {
                message,
                location: Some(location),
            },
            SonarError::ArityError { message, .. } => SonarError::ArityError {
                message,
                location: Some(location),
            },
            SonarError::TypeError { message, .. } => SonarError::TypeError {
                message,
                location: Some(location),
            },
        }
    }

    /// Extra guidance shown only when `SONAR_MODE=DEV`.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            SonarError::ReferenceError { message, .. } if message.contains("has not been defined") => {
                Some("check for typos, or a missing `let` declaration")
            }
            SonarError::RuntimeError { message, .. } if message.contains("Division by zero") => {
                Some("division by zero is always an error here, not infinity or NaN")
            }
            SonarError::AssignmentError { .. } => {
                Some("loop counter/value bindings are readonly for the duration of each iteration")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_are_distinct() {
        let kinds = [
            SonarError::syntax("x").kind_name(),
            SonarError::reference("x").kind_name(),
            SonarError::runtime("x").kind_name(),
            SonarError::assignment("x").kind_name(),
            SonarError::arity("x").kind_name(),
            SonarError::type_error("x").kind_name(),
        ];
        let unique: std::collections::HashSet<_> = kinds.iter().collect();
        assert_eq!(unique.len(), kinds.len());
    }

    #[test]
    fn dev_hint_present_for_reference_errors() {
        let err = SonarError::reference("Identifier 'x' has not been defined");
        assert!(err.hint().is_some());
    }
}
