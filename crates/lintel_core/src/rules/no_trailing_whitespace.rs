//! no-trailing-whitespace rule: Report whitespace at the end of a line.
//!
//! Each violation carries a fix deleting the whitespace.

use crate::error::LinterError;
use crate::rule::{LintRule, RuleContext};
use crate::source::Line;
use crate::types::Fix;

pub const RULE_NAME: &str = "no-trailing-whitespace";

#[derive(Debug, Default)]
pub struct NoTrailingWhitespace;

impl NoTrailingWhitespace {
    pub fn new(options: Option<&serde_json::Value>) -> Result<Self, LinterError> {
        match options {
            None | Some(serde_json::Value::Null) => Ok(Self),
            Some(serde_json::Value::Object(map)) if map.is_empty() => Ok(Self),
            Some(_) => Err(LinterError::RuleOptions {
                rule: RULE_NAME.to_string(),
                message: "rule takes no options".to_string(),
            }),
        }
    }
}

impl LintRule for NoTrailingWhitespace {
    fn name(&self) -> &str {
        RULE_NAME
    }

    fn check_line(
        &mut self,
        line: &Line<'_>,
        ctx: &mut RuleContext<'_>,
    ) -> Result<(), LinterError> {
        let trimmed = line.text.trim_end();
        if trimmed.len() < line.text.len() {
            let range = line.range(trimmed.len(), line.text.len());
            ctx.report_with_fix(range, "Trailing whitespace", Fix::delete(range));
        }
        Ok(())
    }
}
