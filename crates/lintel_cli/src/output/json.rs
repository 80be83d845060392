//! JSON output formatter

use std::io::Write;

use lintel_core::{LintResult, LintSummary, LinterError, Outcome};
use miette::{IntoDiagnostic, Result};

/// Collects every result and prints them as one JSON array.
pub fn output_json<W, I>(out: &mut W, results: I, debug: bool) -> Result<LintSummary>
where
    W: Write,
    I: Iterator<Item = Result<LintResult, LinterError>>,
{
    let mut summary = LintSummary::new();
    let mut output = Vec::new();
    for result in results {
        let result = result.into_diagnostic()?;
        summary.record(&result);
        output.push(to_json(&result, debug)?);
    }

    writeln!(
        out,
        "{}",
        serde_json::to_string_pretty(&output).into_diagnostic()?
    )
    .into_diagnostic()?;
    Ok(summary)
}

fn to_json(result: &LintResult, debug: bool) -> Result<serde_json::Value> {
    let path = result.path.display().to_string();
    let value = match &result.outcome {
        Outcome::Violation(violation) => serde_json::json!({
            "path": path,
            "violation": serde_json::to_value(violation).into_diagnostic()?,
        }),
        Outcome::Error(error) if debug => serde_json::json!({
            "path": path,
            "error": { "message": error.to_string(), "trace": error.trace() },
        }),
        Outcome::Error(error) => serde_json::json!({
            "path": path,
            "error": { "message": error.to_string() },
        }),
    };
    Ok(value)
}
