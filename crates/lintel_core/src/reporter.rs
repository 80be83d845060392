//! Plain-text rendering of single results.

use std::io::{self, Write};

use crate::result::{LintResult, Outcome};

/// Renders one result as a single line, without a trailing newline.
///
/// Violations render as `path@line:column rule: message`. Errors render as
/// `path: error`, followed by `: trace` when `verbose` is set.
pub fn format_result(result: &LintResult, verbose: bool) -> String {
    let path = result.path.display();
    match &result.outcome {
        Outcome::Violation(v) => format!(
            "{}@{}:{} {}: {}",
            path, v.range.start.line, v.range.start.column, v.rule_name, v.message
        ),
        Outcome::Error(e) if verbose => format!("{}: {}: {}", path, e, e.trace()),
        Outcome::Error(e) => format!("{}: {}", path, e),
    }
}

/// Writes [`format_result`] plus a newline.
pub fn write_result<W: Write + ?Sized>(
    out: &mut W,
    result: &LintResult,
    verbose: bool,
) -> io::Result<()> {
    writeln!(out, "{}", format_result(result, verbose))
}
