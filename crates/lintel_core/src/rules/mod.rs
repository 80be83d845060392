//! Built-in rules.

mod final_newline;
mod max_line_length;
mod no_todo;
mod no_trailing_whitespace;

use serde::de::DeserializeOwned;

use crate::error::LinterError;

pub use final_newline::{FinalNewline, RULE_NAME as FINAL_NEWLINE};
pub use max_line_length::{MaxLineLength, RULE_NAME as MAX_LINE_LENGTH};
pub use no_todo::{NoTodo, RULE_NAME as NO_TODO};
pub use no_trailing_whitespace::{NoTrailingWhitespace, RULE_NAME as NO_TRAILING_WHITESPACE};

/// Deserializes rule options, falling back to defaults when none are given.
pub(crate) fn parse_options<T>(
    rule: &str,
    options: Option<&serde_json::Value>,
) -> Result<T, LinterError>
where
    T: DeserializeOwned + Default,
{
    match options {
        None | Some(serde_json::Value::Null) => Ok(T::default()),
        Some(value) => T::deserialize(value).map_err(|e| LinterError::RuleOptions {
            rule: rule.to_string(),
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::rule::{LintRule, RuleContext};
    use crate::source::SourceFile;
    use crate::types::LintViolation;

    /// Runs a single rule over `text` the same way the engine does.
    pub fn run_rule(rule: &mut dyn LintRule, text: &str) -> Vec<LintViolation> {
        let source = SourceFile::from_text(text);
        let name = rule.name().to_string();
        let mut out = Vec::new();
        for line in source.lines() {
            let mut ctx = RuleContext::new(&name, &mut out);
            rule.check_line(&line, &mut ctx).unwrap();
        }
        let mut ctx = RuleContext::new(&name, &mut out);
        rule.check_file(&source, &mut ctx).unwrap();
        out
    }
}
