//! # lintel_core
//!
//! Core engine for the lintel line linter.
//!
//! This crate provides:
//! - The `Linter` orchestrator and its fault-isolated result stream
//! - Per-directory configuration discovery
//! - File discovery
//! - The rule interface and the built-in rules
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use lintel_core::{Linter, reporter};
//!
//! let linter = Linter::new();
//! for result in linter.lint_paths(&[PathBuf::from(".")])? {
//!     println!("{}", reporter::format_result(&result?, false));
//! }
//! # Ok::<(), lintel_core::LinterError>(())
//! ```
//!
//! A file that cannot be read, configured or parsed, or whose rules crash,
//! shows up as an error result for that file; the rest of the run goes on.

mod config;
pub mod engine;
mod error;
mod file_linter;
mod linter;
mod parallel_linter;
pub mod reporter;
pub mod resolver;
mod result;
pub mod rule;
mod rule_loader;
pub mod rules;
pub mod source;
mod types;
pub mod walker;

pub use config::{CONFIG_FILE_NAMES, Config, ConfigFile, DEFAULT_MAX_FILE_SIZE, LinterOptions};
pub use engine::{RuleEngine, ViolationCollector, Violations};
pub use error::{CapturedError, LinterError};
pub use file_linter::{FileLinter, FileResults};
pub use linter::{Linter, LinterBuilder};
pub use parallel_linter::ResultStream;
pub use resolver::{ConfigResolver, HierarchicalResolver, StaticResolver};
pub use result::{LintResult, LintSummary, Outcome};
pub use rule::{LintRule, RuleContext, RuleSet};
pub use rule_loader::{BUILTIN_GROUP, RuleRegistry};
pub use source::{Line, SourceFile};
pub use types::{CodePosition, CodeRange, FileContent, Fix, LintViolation};
pub use walker::{ParallelWalker, PathExpander, WalkConfig};
