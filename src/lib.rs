// ABOUTME: Library root — wires the lexer/parser/evaluator pipeline into one entry point

pub mod ast;
pub mod builtins;
pub mod config;
pub mod diagnostics;
pub mod env;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod token;
pub mod value;

use env::Environment;
use error::SonarError;
use std::rc::Rc;
use value::Value;

/// The result of running a complete source string: either the evaluated
/// value (itself possibly a `Value::Error` produced during evaluation), or
/// every syntax error the parser accumulated.
pub enum Outcome {
    Value(Value),
    ParseErrors(Vec<SonarError>),
}

/// Parses and evaluates `source` in a fresh top-level environment.
pub fn run_source(source: &str) -> Outcome {
    let env = Environment::new();
    run_source_in(source, &env)
}

/// Parses and evaluates `source` in an existing environment, letting callers
/// (the REPL) share one environment across multiple calls.
pub fn run_source_in(source: &str, env: &Rc<Environment>) -> Outcome {
    match parser::parse(source) {
        Ok(program) => Outcome::Value(eval::eval_program(&program, env)),
        Err(errors) => Outcome::ParseErrors(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_source_evaluates_a_program() {
        match run_source("1 + 2;") {
            Outcome::Value(Value::Integer(3)) => {}
            _ => panic!("expected Integer(3)"),
        }
    }

    #[test]
    fn run_source_surfaces_parse_errors() {
        match run_source("let = ;") {
            Outcome::ParseErrors(errs) => assert!(!errs.is_empty()),
            Outcome::Value(_) => panic!("expected parse errors"),
        }
    }

    #[test]
    fn run_source_in_shares_environment_across_calls() {
        let env = Environment::new();
        run_source_in("let x = 5;", &env);
        match run_source_in("x + 1;", &env) {
            Outcome::Value(Value::Integer(6)) => {}
            _ => panic!("expected Integer(6)"),
        }
    }
}
