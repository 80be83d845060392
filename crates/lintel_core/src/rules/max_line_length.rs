//! max-line-length rule: Report lines longer than a limit.
//!
//! # Configuration
//!
//! | Option | Type | Default | Description |
//! |--------|------|---------|-------------|
//! | max | number | 100 | Maximum line length in characters |

use serde::Deserialize;

use crate::error::LinterError;
use crate::rule::{LintRule, RuleContext};
use crate::source::Line;
use crate::types::CodeRange;

pub const RULE_NAME: &str = "max-line-length";

const DEFAULT_MAX_LENGTH: u32 = 100;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Options {
    #[serde(default = "default_max")]
    max: u32,
}

fn default_max() -> u32 {
    DEFAULT_MAX_LENGTH
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max: DEFAULT_MAX_LENGTH,
        }
    }
}

pub struct MaxLineLength {
    max: u32,
}

impl MaxLineLength {
    pub fn new(options: Option<&serde_json::Value>) -> Result<Self, LinterError> {
        let options: Options = super::parse_options(RULE_NAME, options)?;
        if options.max == 0 {
            return Err(LinterError::RuleOptions {
                rule: RULE_NAME.to_string(),
                message: "max must be greater than 0".to_string(),
            });
        }
        Ok(Self { max: options.max })
    }
}

impl LintRule for MaxLineLength {
    fn name(&self) -> &str {
        RULE_NAME
    }

    fn check_line(
        &mut self,
        line: &Line<'_>,
        ctx: &mut RuleContext<'_>,
    ) -> Result<(), LinterError> {
        let width = line.width();
        if width > self.max {
            ctx.report(
                CodeRange::on_line(line.number, self.max, width),
                format!("Line is {} characters long (max {})", width, self.max),
            );
        }
        Ok(())
    }
}
