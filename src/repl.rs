// ABOUTME: Interactive read-eval-print loop over one shared environment

use crate::config::{WELCOME_MESSAGE, WELCOME_SUBTITLE};
use crate::diagnostics::format_error;
use crate::env::Environment;
use crate::value::Value;
use crate::{run_source_in, Outcome};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const HISTORY_FILE: &str = ".sonar_history";

/// Runs the REPL until `Ctrl-D`/`Ctrl-C` or the user exits. Every line is
/// parsed and evaluated in the same environment, so `let` bindings persist
/// across lines; the evaluated result is printed for every successful line
/// (not only errors — this is the REPL's one difference from `-f`/`-text`
/// mode, per spec.md §6).
pub fn run() -> rustyline::Result<()> {
    let mut rl = DefaultEditor::new()?;
    let _ = rl.load_history(HISTORY_FILE);

    println!("{WELCOME_MESSAGE}");
    println!("{WELCOME_SUBTITLE}");

    let env = Environment::new();

    loop {
        match rl.readline("sonar> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                match run_source_in(&line, &env) {
                    Outcome::Value(Value::Error(e)) => {
                        eprintln!("{}", format_error(&e, &line, None));
                    }
                    Outcome::Value(result) => {
                        println!("{}", result.inspect());
                    }
                    Outcome::ParseErrors(errors) => {
                        for e in &errors {
                            eprintln!("{}", format_error(e, &line, None));
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(HISTORY_FILE);
    Ok(())
}
