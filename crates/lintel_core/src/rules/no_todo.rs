//! no-todo rule: Disallow TODO/FIXME markers.
//!
//! # Configuration
//!
//! | Option | Type | Default | Description |
//! |--------|------|---------|-------------|
//! | patterns | string[] | ["TODO", "FIXME", "XXX"] | Markers to detect |
//! | case_sensitive | boolean | false | Case-sensitive matching |

use serde::Deserialize;

use crate::error::LinterError;
use crate::rule::{LintRule, RuleContext};
use crate::source::Line;

pub const RULE_NAME: &str = "no-todo";

const DEFAULT_PATTERNS: &[&str] = &["TODO", "FIXME", "XXX"];

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Options {
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default)]
    case_sensitive: bool,
}

pub struct NoTodo {
    patterns: Vec<String>,
    case_sensitive: bool,
}

impl NoTodo {
    pub fn new(options: Option<&serde_json::Value>) -> Result<Self, LinterError> {
        let options: Options = super::parse_options(RULE_NAME, options)?;
        let patterns = if options.patterns.is_empty() {
            DEFAULT_PATTERNS.iter().map(|s| (*s).to_string()).collect()
        } else {
            options.patterns
        };
        let patterns = patterns
            .into_iter()
            .filter(|p| !p.is_empty())
            .map(|p| {
                if options.case_sensitive {
                    p
                } else {
                    p.to_ascii_lowercase()
                }
            })
            .collect();

        Ok(Self {
            patterns,
            case_sensitive: options.case_sensitive,
        })
    }
}

impl LintRule for NoTodo {
    fn name(&self) -> &str {
        RULE_NAME
    }

    fn check_line(
        &mut self,
        line: &Line<'_>,
        ctx: &mut RuleContext<'_>,
    ) -> Result<(), LinterError> {
        // ASCII folding only, so byte offsets stay valid for `line.text`.
        let haystack = if self.case_sensitive {
            line.text.to_string()
        } else {
            line.text.to_ascii_lowercase()
        };

        let mut matches: Vec<(usize, &str)> = self
            .patterns
            .iter()
            .flat_map(|p| haystack.match_indices(p.as_str()).map(move |(i, _)| (i, p.as_str())))
            .collect();
        matches.sort_unstable();

        for (start, pattern) in matches {
            let end = start + pattern.len();
            let found = line.text.get(start..end).unwrap_or(pattern);
            ctx.report(
                line.range(start, end),
                format!("Found '{}' marker. Consider resolving it.", found),
            );
        }
        Ok(())
    }
}
