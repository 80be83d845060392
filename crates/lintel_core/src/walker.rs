//! Path expansion: turns input roots into the list of files to lint.
//!
//! The default [`ParallelWalker`] walks directories with
//! `ignore::WalkBuilder::build_parallel`, so `.gitignore` files and hidden
//! entries are handled the same way as in other ripgrep-family tools.

use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, ParallelVisitor, ParallelVisitorBuilder, WalkBuilder, WalkState};
use tracing::{debug, info, warn};

use crate::file_linter::canonical_path;

/// Expands input paths (files or directories) into a deduplicated list of
/// regular files.
///
/// A root that does not exist or cannot be traversed is skipped; it must not
/// prevent the remaining roots from being expanded.
pub trait PathExpander: Send + Sync {
    fn expand(&self, roots: &[PathBuf]) -> Vec<PathBuf>;
}

/// Options for [`ParallelWalker`].
#[derive(Debug, Clone)]
pub struct WalkConfig {
    /// Honor `.gitignore`, global git excludes and `.git/info/exclude`.
    pub respect_gitignore: bool,
    /// Descend into and yield entries whose name starts with `.`.
    pub include_hidden: bool,
    /// Walker threads. 0 lets `ignore` decide.
    pub threads: usize,
    pub follow_links: bool,
    pub max_depth: Option<usize>,
    /// When non-empty, only files matching one of these globs are kept.
    pub include_patterns: Vec<String>,
    /// Files matching any of these globs are dropped.
    pub exclude_patterns: Vec<String>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            respect_gitignore: true,
            include_hidden: false,
            threads: 0,
            follow_links: false,
            max_depth: None,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl WalkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respect_gitignore(mut self, yes: bool) -> Self {
        self.respect_gitignore = yes;
        self
    }

    pub fn include_hidden(mut self, yes: bool) -> Self {
        self.include_hidden = yes;
        self
    }

    pub fn threads(mut self, n: usize) -> Self {
        self.threads = n;
        self
    }

    pub fn follow_links(mut self, yes: bool) -> Self {
        self.follow_links = yes;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Adds an include glob, e.g. `*.rs`.
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_patterns.push(pattern.into());
        self
    }

    /// Adds an exclude glob, e.g. `**/target/**`.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }
}

/// The default [`PathExpander`].
#[derive(Debug, Clone, Default)]
pub struct ParallelWalker {
    config: WalkConfig,
}

impl ParallelWalker {
    pub fn new(config: WalkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Walks `roots` and returns every matching file in canonical form,
    /// sorted and deduplicated. Roots that overlap or spell the same
    /// directory differently yield each file once.
    pub fn walk(&self, roots: &[PathBuf]) -> Vec<PathBuf> {
        let roots: Vec<&PathBuf> = roots
            .iter()
            .filter(|root| match root.symlink_metadata() {
                Ok(_) => true,
                Err(e) => {
                    warn!("Skipping {}: {}", root.display(), e);
                    false
                }
            })
            .collect();

        let Some((first, rest)) = roots.split_first() else {
            return Vec::new();
        };

        let mut builder = WalkBuilder::new(first);
        for root in rest {
            builder.add(root);
        }
        builder
            .git_ignore(self.config.respect_gitignore)
            .git_global(self.config.respect_gitignore)
            .git_exclude(self.config.respect_gitignore)
            .hidden(!self.config.include_hidden)
            .follow_links(self.config.follow_links)
            .max_depth(self.config.max_depth)
            .threads(self.config.threads);

        let filter = PathFilter::new(&self.config.include_patterns, &self.config.exclude_patterns);

        // Unbounded, so visitors never block on a receiver that only starts
        // draining after the walk has finished.
        let (tx, rx) = crossbeam_channel::unbounded();
        builder.build_parallel().visit(&mut CollectorBuilder {
            tx,
            filter: &filter,
        });

        let mut files: Vec<PathBuf> = rx.into_iter().collect();
        files.sort();
        files.dedup();

        info!("Discovered {} files", files.len());
        files
    }

    pub fn walk_path(&self, path: impl AsRef<Path>) -> Vec<PathBuf> {
        self.walk(&[path.as_ref().to_path_buf()])
    }
}

impl PathExpander for ParallelWalker {
    fn expand(&self, roots: &[PathBuf]) -> Vec<PathBuf> {
        self.walk(roots)
    }
}

struct CollectorBuilder<'f> {
    tx: Sender<PathBuf>,
    filter: &'f PathFilter,
}

impl<'s, 'f: 's> ParallelVisitorBuilder<'s> for CollectorBuilder<'f> {
    fn build(&mut self) -> Box<dyn ParallelVisitor + 's> {
        Box::new(Collector {
            tx: self.tx.clone(),
            filter: self.filter,
        })
    }
}

struct Collector<'f> {
    tx: Sender<PathBuf>,
    filter: &'f PathFilter,
}

impl ParallelVisitor for Collector<'_> {
    fn visit(&mut self, entry: Result<DirEntry, ignore::Error>) -> WalkState {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Walk error: {}", e);
                return WalkState::Continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            return WalkState::Continue;
        }

        let path = entry.path();
        if !self.filter.matches(path) {
            debug!("Filtered out {}", path.display());
            return WalkState::Continue;
        }

        if self.tx.send(canonical_path(path)).is_err() {
            return WalkState::Quit;
        }
        WalkState::Continue
    }
}

/// Include/exclude glob filter. Exclusion wins.
struct PathFilter {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl PathFilter {
    fn new(include: &[String], exclude: &[String]) -> Self {
        Self {
            include: build_globset(include, "include"),
            exclude: build_globset(exclude, "exclude"),
        }
    }

    fn matches(&self, path: &Path) -> bool {
        if let Some(exclude) = &self.exclude
            && exclude.is_match(path)
        {
            return false;
        }
        match &self.include {
            Some(include) => include.is_match(path),
            None => true,
        }
    }
}

/// Invalid patterns are logged and skipped. `None` when nothing usable is left.
fn build_globset(patterns: &[String], kind: &str) -> Option<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    let mut added = 0;
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
                added += 1;
            }
            Err(e) => warn!("Invalid {} pattern {:?}: {}", kind, pattern, e),
        }
    }
    if added == 0 {
        return None;
    }
    builder
        .build()
        .inspect_err(|e| warn!("Failed to build {} patterns: {}", kind, e))
        .ok()
}
