//! final-newline rule: Require a newline at the end of non-empty files.

use crate::error::LinterError;
use crate::rule::{LintRule, RuleContext};
use crate::source::SourceFile;
use crate::types::{CodeRange, Fix};

pub const RULE_NAME: &str = "final-newline";

#[derive(Debug, Default)]
pub struct FinalNewline;

impl FinalNewline {
    pub fn new(options: Option<&serde_json::Value>) -> Result<Self, LinterError> {
        match options {
            None | Some(serde_json::Value::Null) => Ok(Self),
            Some(_) => Err(LinterError::RuleOptions {
                rule: RULE_NAME.to_string(),
                message: "rule takes no options".to_string(),
            }),
        }
    }
}

impl LintRule for FinalNewline {
    fn name(&self) -> &str {
        RULE_NAME
    }

    fn check_file(
        &mut self,
        source: &SourceFile,
        ctx: &mut RuleContext<'_>,
    ) -> Result<(), LinterError> {
        if source.text().is_empty() || source.ends_with_newline() {
            return Ok(());
        }
        let end = source.end_position();
        let range = CodeRange::new(end, end);
        ctx.report_with_fix(range, "Missing newline at end of file", Fix::new(range, "\n"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::run_rule;
    use crate::types::CodePosition;

    #[test]
    fn test_missing_newline() {
        let mut rule = FinalNewline;
        let found = run_rule(&mut rule, "a\nlast");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].range.start, CodePosition::new(2, 4));
        assert_eq!(found[0].fix.as_ref().unwrap().replacement, "\n");
    }

    #[test]
    fn test_present_newline_and_empty_file() {
        let mut rule = FinalNewline;
        assert!(run_rule(&mut rule, "a\n").is_empty());
        assert!(run_rule(&mut rule, "").is_empty());
    }
}
