// ABOUTME: Version/welcome text and process-wide configuration constants

pub const VERSION: &str = "0.1.0";
pub const WELCOME_MESSAGE: &str = "Sonar v0.1.0";
pub const WELCOME_SUBTITLE: &str = "A dynamically-typed, expression-oriented scripting language";

/// Name of the environment variable that enables the extra `[Hint] …` line
/// on errors (see `crate::diagnostics`).
pub const DEV_MODE_VAR: &str = "SONAR_MODE";
pub const DEV_MODE_VALUE: &str = "DEV";

pub const HELP_TEXT: &str = r#"
Usage: sonar [OPTIONS]

With no arguments, starts an interactive REPL reading from stdin.

Options:
  -f <PATH>        Evaluate the program in the file at PATH
  -text <SRC>      Evaluate SRC as a program
  -h, --help       Print this message

Set SONAR_MODE=DEV to see an additional [Hint] line on errors.
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_mode_constants_match_spec_env_var() {
        assert_eq!(DEV_MODE_VAR, "SONAR_MODE");
        assert_eq!(DEV_MODE_VALUE, "DEV");
    }
}
