//! Multi-file dispatch and result streaming.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use crossbeam_channel::Receiver;
use rayon::ThreadPool;
use rayon::prelude::*;
use tracing::{debug, error};

use crate::engine::panic_message;
use crate::error::LinterError;
use crate::file_linter::{FileLinter, FileResults};
use crate::result::LintResult;

/// A single, flattened stream of results for a whole run.
///
/// Results of one file are always contiguous and in the order they were
/// produced. With more than one file, files arrive in worker completion
/// order. An `Err` item is a pipeline failure and is always the last item.
pub struct ResultStream {
    inner: Inner,
}

enum Inner {
    Empty,
    Single(FileResults),
    Parallel(PoolStream),
}

impl ResultStream {
    pub(crate) fn empty() -> Self {
        Self { inner: Inner::Empty }
    }

    pub(crate) fn single(results: FileResults) -> Self {
        Self {
            inner: Inner::Single(results),
        }
    }

    /// Lints `paths` on a dedicated pool of `jobs` threads (0 = all CPUs).
    ///
    /// Each worker collects one file's results completely before handing
    /// them back, since the lazy per-file sequence cannot leave the worker.
    pub(crate) fn parallel(
        linter: FileLinter,
        paths: Vec<PathBuf>,
        jobs: usize,
    ) -> Result<Self, LinterError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .thread_name(|i| format!("lintel-worker-{i}"))
            .panic_handler(|payload| {
                error!(
                    "Lint worker panicked: {}",
                    panic_message(payload.as_ref())
                );
            })
            .build()
            .map_err(|e| LinterError::dispatch(format!("Failed to start worker pool: {e}")))?;

        let expected = paths.len();
        debug!(
            "Dispatching {} files to {} workers",
            expected,
            pool.current_num_threads()
        );

        let (tx, rx) = crossbeam_channel::unbounded::<Vec<LintResult>>();
        pool.spawn(move || {
            paths.into_par_iter().for_each_with(tx, |tx, path| {
                let results = lint_isolated(&linter, &path);
                // The receiver only goes away when the caller stopped reading.
                let _ = tx.send(results);
            });
        });

        Ok(Self {
            inner: Inner::Parallel(PoolStream {
                _pool: pool,
                rx,
                expected,
                received: 0,
                current: Vec::new().into_iter(),
                finished: false,
            }),
        })
    }
}

/// Lints one file to completion. A panic is reported against that file
/// alone, so it never takes other files' results with it.
fn lint_isolated(linter: &FileLinter, path: &Path) -> Vec<LintResult> {
    panic::catch_unwind(AssertUnwindSafe(|| linter.lint_file(path).collect::<Vec<_>>()))
        .unwrap_or_else(|payload| {
            let error = LinterError::Internal(format!(
                "lint task panicked: {}",
                panic_message(payload.as_ref())
            ));
            vec![LintResult::error(path.to_path_buf(), error)]
        })
}

impl Iterator for ResultStream {
    type Item = Result<LintResult, LinterError>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::Empty => None,
            Inner::Single(results) => results.next().map(Ok),
            Inner::Parallel(stream) => stream.next(),
        }
    }
}

impl std::iter::FusedIterator for ResultStream {}

struct PoolStream {
    // Kept alive until the stream is dropped so queued work still runs.
    _pool: ThreadPool,
    rx: Receiver<Vec<LintResult>>,
    expected: usize,
    received: usize,
    current: std::vec::IntoIter<LintResult>,
    finished: bool,
}

impl PoolStream {
    fn next(&mut self) -> Option<Result<LintResult, LinterError>> {
        loop {
            if let Some(result) = self.current.next() {
                return Some(Ok(result));
            }
            if self.finished || self.received == self.expected {
                return None;
            }
            match self.rx.recv() {
                Ok(batch) => {
                    self.received += 1;
                    self.current = batch.into_iter();
                }
                Err(_) => {
                    self.finished = true;
                    return Some(Err(LinterError::dispatch(format!(
                        "Worker pool stopped after {} of {} files",
                        self.received, self.expected
                    ))));
                }
            }
        }
    }
}
