// ABOUTME: Renders a SonarError into the CLI/REPL diagnostic shape from spec.md §6

use crate::ast::Location;
use crate::config::{DEV_MODE_VALUE, DEV_MODE_VAR};
use crate::error::SonarError;

/// Formats a single error for terminal output:
///
/// ```text
/// File <path>, line <L>:<C>
///
///     <source line>
///     <caret pointing at column>
/// <ErrorKind>: <message>
/// ```
///
/// The `File …` line (and its blank-line separator) is omitted when `file`
/// is `None`. The source-line/caret block is omitted entirely when the
/// error carries no location. A trailing `[Hint] …` line is appended only
/// when `SONAR_MODE=DEV` and the error kind has a hint.
pub fn format_error(err: &SonarError, source: &str, file: Option<&str>) -> String {
    let mut out = String::new();

    if let Some(loc) = err.location() {
        if let Some(file) = file {
            out.push_str(&format!("File {file}, line {}:{}\n\n", loc.line, loc.column));
        }
        push_source_context(&mut out, source, loc);
    }

    out.push_str(&format!("{}: {}", err.kind_name(), err.message()));

    if dev_mode_enabled() {
        if let Some(hint) = err.hint() {
            out.push_str(&format!("\n[Hint] {hint}"));
        }
    }

    out
}

fn push_source_context(out: &mut String, source: &str, loc: Location) {
    if let Some(line_text) = source.lines().nth(loc.line.saturating_sub(1)) {
        out.push_str(&format!("    {line_text}\n"));
        let caret_col = loc.column.saturating_sub(1);
        out.push_str(&format!("    {}^\n", " ".repeat(caret_col)));
    }
}

/// Whether `SONAR_MODE=DEV` is set, enabling the extra `[Hint] …` line.
pub fn dev_mode_enabled() -> bool {
    std::env::var(DEV_MODE_VAR)
        .map(|v| v == DEV_MODE_VALUE)
        .unwrap_or(false)
}
