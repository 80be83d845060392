//! Linter error types.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as _;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during linting.
///
/// File-scoped variants end up inside a [`CapturedError`] on a
/// [`LintResult`](crate::LintResult). `Dispatch` is the only variant that
/// aborts a whole run.
#[derive(Debug, Error)]
pub enum LinterError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The file could not be read.
    #[error("Failed to read {}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exceeds the configured size limit.
    #[error("File size {size} exceeds limit of {limit} bytes: {}", path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A rule selector did not match any registered rule.
    #[error("Unknown rule '{0}'")]
    UnknownRule(String),

    /// Rule options failed to deserialize.
    #[error("Invalid options for rule '{rule}': {message}")]
    RuleOptions { rule: String, message: String },

    /// A rule panicked while checking a file.
    #[error("Rule '{rule}' panicked: {message}")]
    RulePanic { rule: String, message: String },

    /// A rule reported a failure.
    #[error("Rule '{rule}' failed: {message}")]
    Rule { rule: String, message: String },

    /// The worker pool could not be started or lost a worker.
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LinterError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates a rule failure.
    pub fn rule(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rule {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Creates a dispatch error.
    pub fn dispatch(message: impl Into<String>) -> Self {
        Self::Dispatch(message.into())
    }
}

/// A file-scoped failure together with the trace rendered when it was caught.
///
/// The trace is produced once, at capture time, and kept verbatim so it can
/// be shown later without re-raising anything.
///
/// Capture happens when the failure is turned into a result, on the thread
/// that pulls the file's results. The backtrace therefore shows the lint
/// pipeline, not the failing rule or read. Where the failure happened is
/// carried by the error itself: the rule name and panic message for
/// [`LinterError::RulePanic`], the path and I/O cause for
/// [`LinterError::File`].
#[derive(Debug)]
pub struct CapturedError {
    error: LinterError,
    trace: String,
}

impl CapturedError {
    /// Captures `error`, rendering its cause chain and, when enabled through
    /// `RUST_BACKTRACE`/`RUST_LIB_BACKTRACE`, the current backtrace.
    pub fn capture(error: LinterError) -> Self {
        let mut trace = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            trace.push_str("\ncaused by: ");
            trace.push_str(&cause.to_string());
            source = cause.source();
        }

        let backtrace = Backtrace::capture();
        if backtrace.status() == BacktraceStatus::Captured {
            trace.push_str("\nstack backtrace:\n");
            trace.push_str(&backtrace.to_string());
        }

        Self { error, trace }
    }

    /// The captured error.
    pub fn error(&self) -> &LinterError {
        &self.error
    }

    /// The rendered trace.
    pub fn trace(&self) -> &str {
        &self.trace
    }

    pub fn into_error(self) -> LinterError {
        self.error
    }
}

impl fmt::Display for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl From<LinterError> for CapturedError {
    fn from(error: LinterError) -> Self {
        Self::capture(error)
    }
}
