//! The linter entry point.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::config::{Config, LinterOptions};
use crate::engine::{RuleEngine, ViolationCollector};
use crate::error::LinterError;
use crate::file_linter::{FileLinter, FileResults};
use crate::parallel_linter::ResultStream;
use crate::resolver::{ConfigResolver, HierarchicalResolver};
use crate::rule_loader::RuleRegistry;
use crate::types::FileContent;
use crate::walker::{ParallelWalker, PathExpander, WalkConfig};

/// Orchestrates path expansion, per-file linting and result streaming.
///
/// ```rust,no_run
/// use std::path::PathBuf;
/// use lintel_core::Linter;
///
/// let linter = Linter::builder().jobs(4).build();
/// for result in linter.lint_paths(&[PathBuf::from("src")])? {
///     let result = result?;
///     println!("{}", lintel_core::reporter::format_result(&result, false));
/// }
/// # Ok::<(), lintel_core::LinterError>(())
/// ```
pub struct Linter {
    files: FileLinter,
    expander: Arc<dyn PathExpander>,
    options: LinterOptions,
}

impl Linter {
    /// Creates a linter with the built-in rules, per-directory configuration
    /// discovery and the default walker.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> LinterBuilder {
        LinterBuilder::default()
    }

    pub fn registry(&self) -> &RuleRegistry {
        self.files.registry()
    }

    pub fn options(&self) -> &LinterOptions {
        &self.options
    }

    /// Expands `roots` into files and lints them.
    pub fn lint_paths(&self, roots: &[PathBuf]) -> Result<ResultStream, LinterError> {
        let files = self.expander.expand(roots);
        info!("Linting {} files from {} roots", files.len(), roots.len());
        self.lint_files(files)
    }

    /// Lints an already expanded list of files.
    ///
    /// No files gives an empty stream. One file is linted on the calling
    /// thread as the stream is pulled, so its results keep their exact
    /// order and arrive one by one. More files are spread over a worker
    /// pool.
    pub fn lint_files(&self, mut files: Vec<PathBuf>) -> Result<ResultStream, LinterError> {
        match files.len() {
            0 => Ok(ResultStream::empty()),
            1 => {
                let path = files.remove(0);
                Ok(ResultStream::single(self.files.lint_file(&path)))
            }
            _ => ResultStream::parallel(self.files.clone(), files, self.options.jobs),
        }
    }

    /// Lints one file on the calling thread.
    pub fn lint_file(&self, path: &Path) -> FileResults {
        self.files.lint_file(path)
    }

    /// Lints in-memory content as if it were `path`, with a given config.
    pub fn lint_bytes(&self, path: PathBuf, content: FileContent, config: &Config) -> FileResults {
        self.files.lint_bytes(path, content, config)
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Linter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linter")
            .field("files", &self.files)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Linter`]. Every collaborator has a default.
#[derive(Default)]
pub struct LinterBuilder {
    resolver: Option<Arc<dyn ConfigResolver>>,
    registry: Option<RuleRegistry>,
    collector: Option<Arc<dyn ViolationCollector>>,
    expander: Option<Arc<dyn PathExpander>>,
    walk_config: WalkConfig,
    options: LinterOptions,
}

impl LinterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolver(mut self, resolver: impl ConfigResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    pub fn registry(mut self, registry: RuleRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn collector(mut self, collector: impl ViolationCollector + 'static) -> Self {
        self.collector = Some(Arc::new(collector));
        self
    }

    /// Replaces the walker. `walk_config` is ignored afterwards.
    pub fn expander(mut self, expander: impl PathExpander + 'static) -> Self {
        self.expander = Some(Arc::new(expander));
        self
    }

    pub fn walk_config(mut self, config: WalkConfig) -> Self {
        self.walk_config = config;
        self
    }

    pub fn options(mut self, options: LinterOptions) -> Self {
        self.options = options;
        self
    }

    /// Worker threads for multi-file runs. 0 uses all CPUs.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.options.jobs = jobs;
        self
    }

    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.options.max_file_size = bytes;
        self
    }

    pub fn build(self) -> Linter {
        let files = FileLinter::new(
            self.resolver
                .unwrap_or_else(|| Arc::new(HierarchicalResolver::new())),
            Arc::new(self.registry.unwrap_or_else(RuleRegistry::builtin)),
            self.collector.unwrap_or_else(|| Arc::new(RuleEngine)),
        )
        .with_max_file_size(self.options.max_file_size);

        let walk_config = self.walk_config;
        let expander = self
            .expander
            .unwrap_or_else(|| Arc::new(ParallelWalker::new(walk_config)));

        Linter {
            files,
            expander,
            options: self.options,
        }
    }
}
