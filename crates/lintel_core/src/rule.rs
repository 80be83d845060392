//! The rule interface.

use crate::error::LinterError;
use crate::source::{Line, SourceFile};
use crate::types::{CodeRange, Fix, LintViolation};

/// A pluggable unit of analysis.
///
/// The engine visits lines in order and calls [`check_line`](Self::check_line)
/// on every rule for each of them, then [`check_file`](Self::check_file) once
/// per rule. Instances are created fresh for every file, so a rule may keep
/// state between calls.
pub trait LintRule: Send {
    /// Identifier reported on every violation.
    fn name(&self) -> &str;

    fn check_line(
        &mut self,
        _line: &Line<'_>,
        _ctx: &mut RuleContext<'_>,
    ) -> Result<(), LinterError> {
        Ok(())
    }

    fn check_file(
        &mut self,
        _source: &SourceFile,
        _ctx: &mut RuleContext<'_>,
    ) -> Result<(), LinterError> {
        Ok(())
    }
}

/// Ordered rule instances resolved for one file.
pub type RuleSet = Vec<Box<dyn LintRule>>;

/// Sink for violations, stamped with the reporting rule's name.
pub struct RuleContext<'a> {
    rule: &'a str,
    out: &'a mut Vec<LintViolation>,
}

impl<'a> RuleContext<'a> {
    pub fn new(rule: &'a str, out: &'a mut Vec<LintViolation>) -> Self {
        Self { rule, out }
    }

    pub fn rule_name(&self) -> &str {
        self.rule
    }

    /// Records a violation. Ranges given end-first are put back in order.
    pub fn report(&mut self, range: CodeRange, message: impl Into<String>) {
        self.out
            .push(LintViolation::new(self.rule, range.ordered(), message));
    }

    pub fn report_with_fix(&mut self, range: CodeRange, message: impl Into<String>, fix: Fix) {
        let fix = Fix {
            range: fix.range.ordered(),
            ..fix
        };
        self.out
            .push(LintViolation::new(self.rule, range.ordered(), message).with_fix(fix));
    }

    /// Shorthand for a rule failure attributed to this rule.
    pub fn fail(&self, message: impl Into<String>) -> LinterError {
        LinterError::rule(self.rule, message)
    }
}
