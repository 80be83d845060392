//! Output formatting module

mod json;
mod text;

use std::io;

use lintel_core::{LintResult, LintSummary, LinterError};
use miette::Result;

use crate::cli::OutputFormat;

/// Writes every result to stdout in `format` and returns the run summary.
///
/// A pipeline error ends the output and is returned after the results that
/// were already received have been written.
pub fn output_results<I>(results: I, format: OutputFormat, debug: bool) -> Result<LintSummary>
where
    I: Iterator<Item = Result<LintResult, LinterError>>,
{
    let mut out = io::stdout().lock();
    match format {
        OutputFormat::Json => json::output_json(&mut out, results, debug),
        OutputFormat::Text => text::output_text(&mut out, results, debug),
    }
}
