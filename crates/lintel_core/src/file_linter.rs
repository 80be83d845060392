//! Single file linting logic.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{Span, debug, debug_span};

use crate::config::{Config, DEFAULT_MAX_FILE_SIZE};
use crate::engine::{Violations, ViolationCollector, panic_message};
use crate::error::LinterError;
use crate::resolver::ConfigResolver;
use crate::result::LintResult;
use crate::rule_loader::RuleRegistry;
use crate::types::FileContent;

/// The per-file pipeline: read, resolve configuration, load rules, collect
/// violations, and turn every outcome into a [`LintResult`].
///
/// Holds only shared, immutable collaborators, so one instance can serve
/// many worker threads.
#[derive(Clone)]
pub struct FileLinter {
    resolver: Arc<dyn ConfigResolver>,
    registry: Arc<RuleRegistry>,
    collector: Arc<dyn ViolationCollector>,
    max_file_size: u64,
}

impl FileLinter {
    pub fn new(
        resolver: Arc<dyn ConfigResolver>,
        registry: Arc<RuleRegistry>,
        collector: Arc<dyn ViolationCollector>,
    ) -> Self {
        Self {
            resolver,
            registry,
            collector,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Lints a single file on disk.
    ///
    /// Reading and configuration happen before this returns; violations are
    /// computed as the returned iterator is pulled. Never fails: every
    /// file-scoped problem becomes an error result, including a panic in the
    /// resolver, a rule factory or the collector.
    pub fn lint_file(&self, path: &Path) -> FileResults {
        let path = canonical_path(path);
        let span = debug_span!("lint_file", path = %path.display());

        let state = span.in_scope(|| {
            debug!("Linting {}", path.display());
            self.read(&path)
                .and_then(|content| {
                    let config = contained("config resolver", || self.resolver.resolve(&path))?;
                    self.start(&path, content, &config)
                })
                .unwrap_or_else(State::Failed)
        });

        FileResults { path, state, span }
    }

    /// Lints raw content representing `path`, using the given configuration.
    pub fn lint_bytes(&self, path: PathBuf, content: FileContent, config: &Config) -> FileResults {
        let span = debug_span!("lint_file", path = %path.display());
        let state = span.in_scope(|| {
            self.start(&path, content, config)
                .unwrap_or_else(State::Failed)
        });

        FileResults { path, state, span }
    }

    /// Loads the rule set and hands the content to the collector.
    fn start(
        &self,
        path: &Path,
        content: FileContent,
        config: &Config,
    ) -> Result<State, LinterError> {
        let rules = contained("rule loader", || {
            self.registry
                .collect_rules(&config.enable, &config.disable, &config.options)
        })?;
        debug!("Running {} rules on {}", rules.len(), path.display());

        let violations = contained("collector", || {
            Ok(self.collector.collect(content, rules, config))
        })?;
        Ok(State::Streaming(violations))
    }

    fn read(&self, path: &Path) -> Result<FileContent, LinterError> {
        let metadata = fs::metadata(path).map_err(|source| LinterError::File {
            path: path.to_path_buf(),
            source,
        })?;

        if !metadata.is_file() {
            return Err(LinterError::File {
                path: path.to_path_buf(),
                source: std::io::Error::other("not a regular file"),
            });
        }

        if metadata.len() > self.max_file_size {
            return Err(LinterError::FileTooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit: self.max_file_size,
            });
        }

        fs::read(path).map_err(|source| LinterError::File {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl std::fmt::Debug for FileLinter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLinter")
            .field("registry", &self.registry)
            .field("max_file_size", &self.max_file_size)
            .finish_non_exhaustive()
    }
}

/// Runs one pipeline stage, turning a panic into an [`LinterError::Internal`].
fn contained<T>(
    stage: &str,
    f: impl FnOnce() -> Result<T, LinterError>,
) -> Result<T, LinterError> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        Err(LinterError::Internal(format!(
            "{stage} panicked: {}",
            panic_message(payload.as_ref())
        )))
    })
}

/// Absolute, canonical form of `path`; falls back to an absolute path when
/// the file does not exist, so the failure is still reported under a
/// stable name.
pub(crate) fn canonical_path(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// The results for one file, in the order they were produced.
///
/// After an error result the sequence ends; violations already yielded stay
/// valid. Pulling results re-enters the file's `lint_file` span, so rule
/// evaluation is logged under it.
pub struct FileResults {
    path: PathBuf,
    state: State,
    span: Span,
}

enum State {
    Failed(LinterError),
    Streaming(Violations),
    Done,
}

impl FileResults {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for FileResults {
    type Item = LintResult;

    fn next(&mut self) -> Option<LintResult> {
        let _enter = self.span.enter();
        match std::mem::replace(&mut self.state, State::Done) {
            State::Done => None,
            State::Failed(error) => {
                debug!("Exception while linting {}: {}", self.path.display(), error);
                Some(LintResult::error(self.path.clone(), error))
            }
            State::Streaming(mut violations) => {
                let next = panic::catch_unwind(AssertUnwindSafe(|| violations.next()));
                match next {
                    Ok(Some(Ok(violation))) => {
                        self.state = State::Streaming(violations);
                        Some(LintResult::violation(self.path.clone(), violation))
                    }
                    Ok(Some(Err(error))) => {
                        debug!("Exception while linting {}: {}", self.path.display(), error);
                        Some(LintResult::error(self.path.clone(), error))
                    }
                    Ok(None) => None,
                    Err(payload) => {
                        let error = LinterError::Internal(format!(
                            "collector panicked: {}",
                            panic_message(payload.as_ref())
                        ));
                        Some(LintResult::error(self.path.clone(), error))
                    }
                }
            }
        }
    }
}

impl std::iter::FusedIterator for FileResults {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RuleEngine;
    use crate::resolver::{HierarchicalResolver, StaticResolver};
    use crate::rule::{LintRule, RuleContext};
    use crate::source::Line;
    use crate::types::{CodePosition, CodeRange};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn linter_with(config: Config) -> FileLinter {
        FileLinter::new(
            Arc::new(StaticResolver::new(config)),
            Arc::new(RuleRegistry::builtin()),
            Arc::new(RuleEngine),
        )
    }

    fn only(rules: &[&str]) -> Config {
        let mut config = Config::new(PathBuf::new());
        config.enable = rules.iter().map(|s| s.to_string()).collect();
        config
    }

    struct PanickyCollector;

    impl ViolationCollector for PanickyCollector {
        fn collect(&self, _: FileContent, _: crate::rule::RuleSet, _: &Config) -> Violations {
            let mut emitted = false;
            Box::new(std::iter::from_fn(move || {
                if emitted {
                    panic!("collector exploded");
                }
                emitted = true;
                Some(Ok(crate::types::LintViolation::new(
                    "first",
                    CodeRange::on_line(1, 0, 1),
                    "first",
                )))
            }))
        }
    }

    struct Explode;

    impl LintRule for Explode {
        fn name(&self) -> &str {
            "explode"
        }

        fn check_line(
            &mut self,
            line: &Line<'_>,
            ctx: &mut RuleContext<'_>,
        ) -> Result<(), LinterError> {
            if line.text == "bang" {
                panic!("explode");
            }
            ctx.report(CodeRange::on_line(line.number, 0, line.width()), "seen");
            Ok(())
        }
    }

    #[test]
    fn test_clean_file_yields_no_results() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("clean.txt");
        fs::write(&file, "nothing to see\n").unwrap();

        let results: Vec<_> = linter_with(only(&["builtin"])).lint_file(&file).collect();
        assert!(results.is_empty());
    }

    #[test]
    fn test_missing_file_yields_single_error() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("missing.txt");

        let results: Vec<_> = linter_with(only(&["builtin"])).lint_file(&file).collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].as_violation().is_none());
        let error = results[0].as_error().unwrap();
        assert!(matches!(error.error(), LinterError::File { .. }));
        assert!(results[0].path.is_absolute());
        assert!(results[0].path.ends_with("missing.txt"));
    }

    #[test]
    fn test_directory_is_not_a_regular_file() {
        let temp = TempDir::new().unwrap();
        let results: Vec<_> = linter_with(only(&["builtin"]))
            .lint_file(temp.path())
            .collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_error());
    }

    #[test]
    fn test_two_violations_in_line_order() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("two.txt");
        fs::write(&file, "a\nb\nTODO\nc\nd\ne\nFIXME\n").unwrap();

        let results: Vec<_> = linter_with(only(&["no-todo"])).lint_file(&file).collect();
        let lines: Vec<u32> = results
            .iter()
            .map(|r| r.as_violation().unwrap().range.start.line)
            .collect();
        assert_eq!(lines, vec![3, 7]);
        assert!(results.iter().all(|r| r.path == file.canonicalize().unwrap()));
    }

    #[test]
    fn test_file_too_large() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("big.txt");
        fs::write(&file, "0123456789").unwrap();

        let results: Vec<_> = linter_with(only(&["builtin"]))
            .with_max_file_size(4)
            .lint_file(&file)
            .collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(
            results[0].as_error().unwrap().error(),
            LinterError::FileTooLarge { size: 10, limit: 4, .. }
        ));
    }

    #[test]
    fn test_config_failure_yields_single_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".lintel.json"), "{ \"root\": true, \"bogus\": 1 }").unwrap();
        let file = temp.path().join("a.txt");
        fs::write(&file, "TODO\n").unwrap();

        let linter = FileLinter::new(
            Arc::new(HierarchicalResolver::new()),
            Arc::new(RuleRegistry::builtin()),
            Arc::new(RuleEngine),
        );
        let results: Vec<_> = linter.lint_file(&file).collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(
            results[0].as_error().unwrap().error(),
            LinterError::Config(_)
        ));
    }

    #[test]
    fn test_unknown_rule_yields_single_error() {
        let results: Vec<_> = linter_with(only(&["builtin"]))
            .lint_bytes(PathBuf::from("x.txt"), b"TODO\n".to_vec(), &only(&["nope"]))
            .collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(
            results[0].as_error().unwrap().error(),
            LinterError::UnknownRule(_)
        ));
    }

    #[test]
    fn test_rule_crash_after_violations_keeps_them() {
        let mut registry = RuleRegistry::new();
        registry
            .register("explode", "test", |_| Ok(Box::new(Explode) as Box<dyn LintRule>))
            .unwrap();
        let linter = FileLinter::new(
            Arc::new(StaticResolver::default()),
            Arc::new(registry),
            Arc::new(RuleEngine),
        );

        let results: Vec<_> = linter
            .lint_bytes(
                PathBuf::from("x.txt"),
                b"one\ntwo\nbang\nnever\n".to_vec(),
                &only(&["explode"]),
            )
            .collect();

        assert_eq!(results.len(), 3);
        assert!(results[..2].iter().all(|r| r.as_violation().is_some()));
        let error = results[2].as_error().unwrap();
        assert!(matches!(error.error(), LinterError::RulePanic { .. }));
        // The origin survives in the trace even though it is captured later.
        assert!(
            error.trace().starts_with("Rule 'explode' panicked: explode"),
            "{}",
            error.trace()
        );
    }

    #[test]
    fn test_collector_panic_is_contained() {
        let linter = FileLinter::new(
            Arc::new(StaticResolver::default()),
            Arc::new(RuleRegistry::builtin()),
            Arc::new(PanickyCollector),
        );
        let mut results = linter.lint_bytes(PathBuf::from("x.txt"), Vec::new(), &only(&[]));

        assert!(results.next().unwrap().as_violation().is_some());
        let error = results.next().unwrap();
        assert_eq!(
            error.as_error().unwrap().to_string(),
            "Internal error: collector panicked: collector exploded"
        );
        assert!(results.next().is_none());
        assert!(results.next().is_none());
    }

    struct PanickyResolver;

    impl ConfigResolver for PanickyResolver {
        fn resolve(&self, _: &Path) -> Result<Config, LinterError> {
            panic!("resolver exploded");
        }
    }

    /// Panics before producing any violation sequence.
    struct CollectPanics;

    impl ViolationCollector for CollectPanics {
        fn collect(&self, _: FileContent, _: crate::rule::RuleSet, _: &Config) -> Violations {
            panic!("collect exploded");
        }
    }

    fn single_error(results: FileResults) -> String {
        let results: Vec<LintResult> = results.collect();
        assert_eq!(results.len(), 1);
        let error = results[0].as_error().unwrap();
        assert!(matches!(error.error(), LinterError::Internal(_)));
        error.to_string()
    }

    #[test]
    fn test_resolver_panic_yields_single_error() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        fs::write(&file, "TODO\n").unwrap();

        let linter = FileLinter::new(
            Arc::new(PanickyResolver),
            Arc::new(RuleRegistry::builtin()),
            Arc::new(RuleEngine),
        );
        assert_eq!(
            single_error(linter.lint_file(&file)),
            "Internal error: config resolver panicked: resolver exploded"
        );
    }

    #[test]
    fn test_rule_factory_panic_yields_single_error() {
        let mut registry = RuleRegistry::new();
        registry
            .register("fragile", "test", |_| panic!("factory exploded"))
            .unwrap();
        let linter = FileLinter::new(
            Arc::new(StaticResolver::default()),
            Arc::new(registry),
            Arc::new(RuleEngine),
        );

        let config = only(&["fragile"]);
        let results = linter.lint_bytes(PathBuf::from("x.txt"), b"x\n".to_vec(), &config);
        assert_eq!(
            single_error(results),
            "Internal error: rule loader panicked: factory exploded"
        );
    }

    #[test]
    fn test_collect_panic_yields_single_error() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        fs::write(&file, "TODO\n").unwrap();

        let linter = FileLinter::new(
            Arc::new(StaticResolver::default()),
            Arc::new(RuleRegistry::builtin()),
            Arc::new(CollectPanics),
        );
        let results = linter.lint_file(&file);
        assert_eq!(results.path(), file.canonicalize().unwrap());
        assert_eq!(
            single_error(results),
            "Internal error: collector panicked: collect exploded"
        );
    }

    /// Has no name of its own and reports its ranges end-first.
    struct Sloppy;

    impl LintRule for Sloppy {
        fn name(&self) -> &str {
            ""
        }

        fn check_file(
            &mut self,
            _: &crate::source::SourceFile,
            ctx: &mut RuleContext<'_>,
        ) -> Result<(), LinterError> {
            ctx.report(
                CodeRange {
                    start: CodePosition::new(6, 0),
                    end: CodePosition::new(1, 0),
                },
                "whole file",
            );
            Ok(())
        }
    }

    #[test]
    fn test_violations_carry_registered_name_and_ordered_range() {
        let mut registry = RuleRegistry::new();
        registry
            .register("sloppy", "test", |_| Ok(Box::new(Sloppy) as Box<dyn LintRule>))
            .unwrap();
        let linter = FileLinter::new(
            Arc::new(StaticResolver::default()),
            Arc::new(registry),
            Arc::new(RuleEngine),
        );

        let results: Vec<_> = linter
            .lint_bytes(PathBuf::from("x.txt"), b"a\nb\n".to_vec(), &only(&["sloppy"]))
            .collect();
        assert_eq!(results.len(), 1);
        let violation = results[0].as_violation().unwrap();
        assert_eq!(violation.rule_name, "sloppy");
        assert_eq!(violation.range.start, CodePosition::new(1, 0));
        assert_eq!(violation.range.end, CodePosition::new(6, 0));
    }

    #[test]
    fn test_same_input_same_output() {
        let linter = linter_with(only(&["builtin"]));
        let content = b"TODO  \nx\nlast".to_vec();
        let config = only(&["builtin"]);

        let render = |results: FileResults| -> Vec<String> {
            results.map(|r| format!("{:?}", r.as_violation())).collect()
        };
        let first = render(linter.lint_bytes(PathBuf::from("a"), content.clone(), &config));
        let second = render(linter.lint_bytes(PathBuf::from("a"), content, &config));
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }
}
