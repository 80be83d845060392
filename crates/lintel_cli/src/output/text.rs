//! Text output formatter

use std::io::Write;

use lintel_core::{LintResult, LintSummary, LinterError, reporter};
use miette::{IntoDiagnostic, Result};

/// Prints each result as soon as it arrives, then a summary line.
pub fn output_text<W, I>(out: &mut W, results: I, debug: bool) -> Result<LintSummary>
where
    W: Write,
    I: Iterator<Item = Result<LintResult, LinterError>>,
{
    let mut summary = LintSummary::new();
    for result in results {
        let result = result.into_diagnostic()?;
        summary.record(&result);
        reporter::write_result(out, &result, debug).into_diagnostic()?;
    }

    if summary.has_findings() {
        writeln!(out).into_diagnostic()?;
    }
    writeln!(
        out,
        "Found {} violations and {} errors in {} files",
        summary.violations, summary.errors, summary.files_with_results
    )
    .into_diagnostic()?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintel_core::{CodeRange, LintViolation};
    use std::path::PathBuf;

    #[test]
    fn test_output_text_lines_and_summary() {
        let results = vec![
            Ok(LintResult::violation(
                PathBuf::from("a.txt"),
                LintViolation::new("no-todo", CodeRange::on_line(2, 0, 4), "todo"),
            )),
            Ok(LintResult::error(PathBuf::from("b.txt"), LinterError::parse("bad"))),
        ];

        let mut out = Vec::new();
        let summary = output_text(&mut out, results.into_iter(), false).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a.txt@2:0 no-todo: todo\n\
             b.txt: Parse error: bad\n\
             \n\
             Found 1 violations and 1 errors in 2 files\n"
        );
        assert_eq!(summary.violations, 1);
        assert_eq!(summary.errors, 1);
    }

    #[test]
    fn test_output_text_stops_at_pipeline_error() {
        let results = vec![
            Ok(LintResult::error(PathBuf::from("b.txt"), LinterError::parse("bad"))),
            Err(LinterError::dispatch("pool gone")),
        ];

        let mut out = Vec::new();
        assert!(output_text(&mut out, results.into_iter(), false).is_err());
        assert_eq!(String::from_utf8(out).unwrap(), "b.txt: Parse error: bad\n");
    }
}
