// ABOUTME: CLI entry point — dispatches to file/text evaluation or the REPL

use clap::Parser;
use sonar::diagnostics::format_error;
use sonar::value::Value;
use sonar::{run_source, Outcome};
use std::path::PathBuf;

/// Sonar: a dynamically-typed, expression-oriented scripting language.
#[derive(Parser, Debug)]
#[command(name = "sonar", version = sonar::config::VERSION)]
#[command(about = "A dynamically-typed, expression-oriented scripting language")]
#[command(long_about = sonar::config::HELP_TEXT)]
struct CliArgs {
    /// Evaluate the program in the file at PATH
    #[arg(short = 'f', value_name = "PATH")]
    file: Option<PathBuf>,

    /// Evaluate SRC as a program
    #[arg(short = 't', long = "text", value_name = "SRC")]
    text: Option<String>,
}

fn main() {
    // spec.md §6 spells the text flag as a single-dash `-text`, not the
    // double-dash long form clap derives by default; rewrite it so both
    // spellings work without hand-rolling the rest of the argument parsing.
    let raw: Vec<String> = std::env::args()
        .map(|a| if a == "-text" { "--text".to_string() } else { a })
        .collect();
    let args = CliArgs::parse_from(raw);

    if let Some(path) = &args.file {
        run_file(path);
        return;
    }
    if let Some(src) = &args.text {
        report(src, None, run_source(src));
        return;
    }

    if let Err(e) = sonar::repl::run() {
        eprintln!("REPL error: {e}");
    }
}

fn run_file(path: &PathBuf) {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Cannot read file {}: {e}", path.display());
            return;
        }
    };
    let file_name = path.display().to_string();
    report(&source, Some(file_name.as_str()), run_source(&source));
}

/// Prints parser errors (all of them, per spec.md §4.2's accumulate-and-
/// return-all contract) or a single evaluation error. A successful
/// evaluation prints nothing in file/text mode (spec.md §6: only the REPL
/// echoes every result).
fn report(source: &str, file: Option<&str>, outcome: Outcome) {
    match outcome {
        Outcome::ParseErrors(errors) => {
            for e in &errors {
                eprintln!("{}", format_error(e, source, file));
            }
        }
        Outcome::Value(Value::Error(e)) => {
            eprintln!("{}", format_error(&e, source, file));
        }
        Outcome::Value(_) => {}
    }
}
