//! Lint result types.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{CapturedError, LinterError};
use crate::types::LintViolation;

/// What happened for one [`LintResult`].
#[derive(Debug)]
pub enum Outcome {
    /// The file parsed and a rule fired.
    Violation(LintViolation),
    /// Processing the file failed.
    Error(CapturedError),
}

/// One unit of pipeline output.
///
/// A clean file produces no `LintResult` at all.
#[derive(Debug)]
pub struct LintResult {
    /// Path to the linted file.
    pub path: PathBuf,

    pub outcome: Outcome,
}

impl LintResult {
    /// Creates a result carrying a violation.
    pub fn violation(path: PathBuf, violation: LintViolation) -> Self {
        Self {
            path,
            outcome: Outcome::Violation(violation),
        }
    }

    /// Creates a result carrying a file-scoped error, capturing its trace now.
    pub fn error(path: PathBuf, error: LinterError) -> Self {
        Self {
            path,
            outcome: Outcome::Error(CapturedError::capture(error)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the violation, if this result carries one.
    pub fn as_violation(&self) -> Option<&LintViolation> {
        match &self.outcome {
            Outcome::Violation(v) => Some(v),
            Outcome::Error(_) => None,
        }
    }

    /// Returns the captured error, if this result carries one.
    pub fn as_error(&self) -> Option<&CapturedError> {
        match &self.outcome {
            Outcome::Error(e) => Some(e),
            Outcome::Violation(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }
}

/// Summary of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LintSummary {
    /// Total violation results.
    pub violations: usize,

    /// Total error results.
    pub errors: usize,

    /// Distinct files that produced at least one result.
    pub files_with_results: usize,

    seen: HashSet<PathBuf>,
}

impl LintSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts for one result.
    pub fn record(&mut self, result: &LintResult) {
        match result.outcome {
            Outcome::Violation(_) => self.violations += 1,
            Outcome::Error(_) => self.errors += 1,
        }
        if self.seen.insert(result.path.clone()) {
            self.files_with_results += 1;
        }
    }

    /// Creates a summary from results.
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a LintResult>) -> Self {
        let mut summary = Self::default();
        for result in results {
            summary.record(result);
        }
        summary
    }

    /// Returns true if any violation or error was seen.
    pub fn has_findings(&self) -> bool {
        self.violations > 0 || self.errors > 0
    }
}
