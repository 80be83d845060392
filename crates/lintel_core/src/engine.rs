//! Violation collection: runs a rule set over one file's content.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};

use tracing::debug;

use crate::config::Config;
use crate::error::LinterError;
use crate::rule::{RuleContext, RuleSet};
use crate::source::{Line, SourceFile};
use crate::types::{FileContent, LintViolation};

/// Inline marker that suppresses findings on its own line and the next one.
pub const SUPPRESSION_MARKER: &str = "lintel-ignore";

/// A lazy sequence of violations. An `Err` item is the last item.
pub type Violations = Box<dyn Iterator<Item = Result<LintViolation, LinterError>> + Send>;

/// Turns file content and a rule set into a lazy sequence of violations.
///
/// Implementations must yield an empty sequence for a clean file and may
/// yield an `Err` at any point to signal an unrecoverable parse or rule
/// failure.
pub trait ViolationCollector: Send + Sync {
    fn collect(&self, content: FileContent, rules: RuleSet, config: &Config) -> Violations;
}

/// The default collector.
///
/// Parses on the first pull, then walks lines in order, running every rule
/// on each line and yielding that line's findings before moving on. File
/// level checks run after the last line.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ViolationCollector for RuleEngine {
    fn collect(&self, content: FileContent, rules: RuleSet, config: &Config) -> Violations {
        Box::new(EngineRun {
            content: Some(content),
            source: None,
            names: rules.iter().map(|r| r.name().to_string()).collect(),
            rules,
            allow_suppressions: config.allow_suppressions,
            next_line: 1,
            file_checked: false,
            pending: VecDeque::new(),
            failure: None,
            done: false,
        })
    }
}

struct EngineRun {
    content: Option<FileContent>,
    source: Option<SourceFile>,
    rules: RuleSet,
    names: Vec<String>,
    allow_suppressions: bool,
    next_line: u32,
    file_checked: bool,
    pending: VecDeque<LintViolation>,
    failure: Option<LinterError>,
    done: bool,
}

impl EngineRun {
    /// Runs one step: a line, or the file-level checks. Returns false once
    /// there is nothing left to run.
    fn step(&mut self) -> bool {
        let Some(source) = self.source.as_ref() else {
            return false;
        };

        let mut found = Vec::new();
        let result = if let Some(line) = source.line(self.next_line) {
            self.next_line += 1;
            run_guarded(&mut self.rules, &self.names, &mut found, |rule, ctx| {
                rule.check_line(&line, ctx)
            })
        } else if !self.file_checked {
            self.file_checked = true;
            run_guarded(&mut self.rules, &self.names, &mut found, |rule, ctx| {
                rule.check_file(source, ctx)
            })
        } else {
            return false;
        };

        let allow_suppressions = self.allow_suppressions;
        self.pending.extend(
            found
                .into_iter()
                .filter(|v| !(allow_suppressions && is_suppressed(source, v))),
        );
        if let Err(e) = result {
            self.failure = Some(e);
        }
        true
    }
}

impl Iterator for EngineRun {
    type Item = Result<LintViolation, LinterError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(violation) = self.pending.pop_front() {
                return Some(Ok(violation));
            }
            if self.done {
                return None;
            }
            if let Some(error) = self.failure.take() {
                self.done = true;
                return Some(Err(error));
            }
            if let Some(content) = self.content.take() {
                match SourceFile::parse(content) {
                    Ok(source) => {
                        debug!("Parsed {} lines", source.line_count());
                        self.source = Some(source);
                    }
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                }
            }
            if !self.step() {
                self.done = true;
            }
        }
    }
}

/// Runs `check` for every rule, stopping at the first failure. Panics are
/// converted into [`LinterError::RulePanic`].
fn run_guarded<F>(
    rules: &mut RuleSet,
    names: &[String],
    out: &mut Vec<LintViolation>,
    mut check: F,
) -> Result<(), LinterError>
where
    F: FnMut(&mut dyn crate::rule::LintRule, &mut RuleContext<'_>) -> Result<(), LinterError>,
{
    for (rule, name) in rules.iter_mut().zip(names) {
        let mut ctx = RuleContext::new(name, out);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| check(rule.as_mut(), &mut ctx)));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(payload) => {
                return Err(LinterError::RulePanic {
                    rule: name.clone(),
                    message: panic_message(payload.as_ref()),
                });
            }
        }
    }
    Ok(())
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Returns true if a suppression comment on the violation's line or the
/// line above covers its rule.
fn is_suppressed(source: &SourceFile, violation: &LintViolation) -> bool {
    let line = violation.range.start.line;
    [line, line.saturating_sub(1)]
        .into_iter()
        .filter_map(|n| source.line(n))
        .any(|l| suppression_covers(&l, &violation.rule_name))
}

fn suppression_covers(line: &Line<'_>, rule: &str) -> bool {
    let Some(index) = line.text.find(SUPPRESSION_MARKER) else {
        return false;
    };
    let rest = &line.text[index + SUPPRESSION_MARKER.len()..];
    match rest.strip_prefix(':') {
        Some(list) => list
            .split(',')
            .map(|name| name.trim().trim_end_matches("*/").trim())
            .any(|name| name == rule),
        None => true,
    }
}
