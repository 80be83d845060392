//! Positions, ranges and violations.

use serde::{Deserialize, Serialize};

/// Raw bytes of one file.
pub type FileContent = Vec<u8>;

/// A point in source text.
///
/// Lines are 1-indexed, columns are 0-indexed and counted in Unicode scalar
/// values. Ordering is lexicographic on `(line, column)`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CodePosition {
    pub line: u32,
    pub column: u32,
}

impl CodePosition {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A span between two positions with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CodeRange {
    pub start: CodePosition,
    pub end: CodePosition,
}

impl CodeRange {
    /// Creates a range, swapping the endpoints if they are given in reverse.
    pub fn new(start: CodePosition, end: CodePosition) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// A range on a single line spanning `start..end` columns.
    pub fn on_line(line: u32, start: u32, end: u32) -> Self {
        Self::new(CodePosition::new(line, start), CodePosition::new(line, end))
    }

    /// The same span with `start <= end`, for ranges built field by field.
    pub fn ordered(self) -> Self {
        Self::new(self.start, self.end)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A suggested replacement for a range of source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fix {
    pub range: CodeRange,
    pub replacement: String,
}

impl Fix {
    pub fn new(range: CodeRange, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    /// A fix that removes `range`.
    pub fn delete(range: CodeRange) -> Self {
        Self::new(range, "")
    }
}

/// A single finding reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LintViolation {
    /// The rule that fired.
    pub rule_name: String,
    pub range: CodeRange,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl LintViolation {
    pub fn new(rule_name: impl Into<String>, range: CodeRange, message: impl Into<String>) -> Self {
        Self {
            rule_name: rule_name.into(),
            range,
            message: message.into(),
            fix: None,
        }
    }

    /// Attaches a fix.
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }
}
