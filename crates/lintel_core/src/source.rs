//! Parsed source representation handed to rules.

use crate::error::LinterError;
use crate::types::{CodePosition, CodeRange};

/// One line of a [`SourceFile`], without its line terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-indexed line number.
    pub number: u32,
    pub text: &'a str,
}

impl<'a> Line<'a> {
    /// Number of columns on this line.
    pub fn width(&self) -> u32 {
        self.text.chars().count() as u32
    }

    /// Converts a byte offset within the line into a column.
    pub fn column_at(&self, byte_offset: usize) -> u32 {
        self.text
            .get(..byte_offset)
            .map_or_else(|| self.width(), |prefix| prefix.chars().count() as u32)
    }

    /// A range covering `start..end` byte offsets within this line.
    pub fn range(&self, start: usize, end: usize) -> CodeRange {
        CodeRange::on_line(self.number, self.column_at(start), self.column_at(end))
    }
}

/// UTF-8 decoded file content with a line index.
#[derive(Debug)]
pub struct SourceFile {
    text: String,
    /// Byte offset of each line start.
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Decodes raw bytes. Invalid UTF-8 is a parse error pointing at the
    /// first offending byte.
    pub fn parse(content: Vec<u8>) -> Result<Self, LinterError> {
        let text = String::from_utf8(content).map_err(|e| {
            let valid_up_to = e.utf8_error().valid_up_to();
            let prefix = &e.as_bytes()[..valid_up_to];
            // The prefix is valid UTF-8 by construction.
            let prefix = std::str::from_utf8(prefix).unwrap_or_default();
            let line = prefix.matches('\n').count() + 1;
            let column = prefix.rsplit('\n').next().map_or(0, |l| l.chars().count());
            LinterError::parse(format!(
                "invalid UTF-8 at line {}, column {}",
                line, column
            ))
        })?;
        Ok(Self::from_text(text))
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1)
                .filter(|&start| start < text.len()),
        );
        if text.is_empty() {
            line_starts.clear();
        }
        Self { text, line_starts }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the 1-indexed line `number`.
    pub fn line(&self, number: u32) -> Option<Line<'_>> {
        let index = (number as usize).checked_sub(1)?;
        let start = *self.line_starts.get(index)?;
        let end = self
            .line_starts
            .get(index + 1)
            .copied()
            .unwrap_or(self.text.len());
        let raw = &self.text[start..end];
        let text = raw
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(raw);
        Some(Line { number, text })
    }

    pub fn lines(&self) -> impl Iterator<Item = Line<'_>> {
        (1..=self.line_count() as u32).filter_map(|n| self.line(n))
    }

    /// Returns true if the text is non-empty and ends with a newline.
    pub fn ends_with_newline(&self) -> bool {
        self.text.ends_with('\n')
    }

    /// Position just past the last character.
    pub fn end_position(&self) -> CodePosition {
        match self.line(self.line_count() as u32) {
            Some(last) if !self.ends_with_newline() => CodePosition::new(last.number, last.width()),
            _ => CodePosition::new(self.line_count() as u32 + 1, 0),
        }
    }
}
