//! Lint command implementation

use lintel_core::{Linter, StaticResolver, WalkConfig};
use miette::{IntoDiagnostic, Result};
use tracing::{debug, info};

use crate::cli::LintArgs;
use crate::output::output_results;

/// Lints `args.paths`, printing results as they arrive.
///
/// Returns whether any violation or error result was reported. Only
/// pipeline failures are returned as `Err`.
pub fn run_lint(args: &LintArgs) -> Result<bool> {
    let walk_config = args.exclude.iter().fold(
        WalkConfig::new()
            .include_hidden(args.hidden)
            .respect_gitignore(!args.no_gitignore),
        |config, glob| config.exclude(glob),
    );

    let mut builder = Linter::builder().jobs(args.jobs).walk_config(walk_config);
    if let Some(path) = &args.config {
        info!("Using config: {}", path.display());
        builder = builder.resolver(StaticResolver::from_file(path).into_diagnostic()?);
    } else {
        debug!("Discovering configuration per directory");
    }
    let linter = builder.build();

    let stream = linter.lint_paths(&args.paths).into_diagnostic()?;
    let summary = output_results(stream, args.format, args.debug)?;

    Ok(summary.has_findings())
}
