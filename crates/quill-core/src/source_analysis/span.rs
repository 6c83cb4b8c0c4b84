// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source location tracking.
//!
//! Every token, script AST node and DOM element region carries a `Span`
//! giving its position in the source file. Line and column numbers are not
//! stored; they are derived on demand through a [`LineIndex`], which the
//! writer uses to preserve deliberate blank lines between statements.

use std::ops::Range;

/// A span of source code, represented as a byte offset range.
///
/// # Examples
///
/// ```
/// use quill_core::source_analysis::Span;
///
/// let span = Span::new(0, 10);
/// assert_eq!(span.start(), 0);
/// assert_eq!(span.end(), 10);
/// assert_eq!(span.len(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: u32,
    end: u32,
}

impl Span {
    /// Creates a new span from start and end byte offsets.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Returns the start byte offset.
    #[must_use]
    pub const fn start(self) -> u32 {
        self.start
    }

    /// Returns the end byte offset (exclusive).
    #[must_use]
    pub const fn end(self) -> u32 {
        self.end
    }

    /// Returns the length of the span in bytes.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    /// Returns true if the span is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Returns true if `other` is fully contained within `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Creates a span that covers both `self` and `other`.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }

    /// Shifts both offsets by `delta` bytes. Used when mapping diagnostics
    /// out of a synthetic wrapper back into user coordinates.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "negative offsets clamp to zero; files over 4GB are not supported"
    )]
    pub const fn shifted(self, delta: i64) -> Self {
        let start = self.start as i64 + delta;
        let end = self.end as i64 + delta;
        Self {
            start: if start < 0 { 0 } else { start as u32 },
            end: if end < 0 { 0 } else { end as u32 },
        }
    }

    /// Converts to a `Range<usize>` for indexing into source text.
    #[must_use]
    pub const fn as_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl From<Range<u32>> for Span {
    fn from(range: Range<u32>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<Range<usize>> for Span {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start as u32, range.end as u32)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.as_range()
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start as usize, span.len() as usize).into()
    }
}

/// Precomputed line-start table for a source buffer.
///
/// Maps byte offsets to zero-based line numbers in O(log n). Built once per
/// parse and consulted by the reformatter when deciding whether two
/// statements were separated by a blank line in the original file.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    /// Builds the index for `source`. `\r\n` counts as a single line break.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        let bytes = source.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => line_starts.push(u32::try_from(i + 1).unwrap_or(u32::MAX)),
                b'\r' => {
                    if i + 1 >= bytes.len() || bytes[i + 1] != b'\n' {
                        line_starts.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
                    }
                }
                _ => {}
            }
            i += 1;
        }
        Self { line_starts }
    }

    /// Returns the zero-based line containing `offset`.
    #[must_use]
    pub fn line(&self, offset: u32) -> u32 {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => u32::try_from(line).unwrap_or(u32::MAX),
            Err(next) => u32::try_from(next - 1).unwrap_or(u32::MAX),
        }
    }

    /// Returns the zero-based `(line, column)` of `offset`. The column is a
    /// byte offset within the line.
    #[must_use]
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line = self.line(offset);
        let start = self.line_starts[line as usize];
        (line, offset - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_new_and_accessors() {
        let span = Span::new(5, 15);
        assert_eq!(span.start(), 5);
        assert_eq!(span.end(), 15);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
    }

    #[test]
    fn span_merge() {
        let a = Span::new(5, 10);
        let b = Span::new(15, 20);
        let merged = a.merge(b);
        assert_eq!(merged.start(), 5);
        assert_eq!(merged.end(), 20);
    }

    #[test]
    fn span_shifted_clamps_at_zero() {
        let span = Span::new(2, 6);
        assert_eq!(span.shifted(-4), Span::new(0, 2));
        assert_eq!(span.shifted(3), Span::new(5, 9));
    }

    #[test]
    fn line_index_lines() {
        let idx = LineIndex::new("ab\ncd\r\nef\n");
        assert_eq!(idx.line(0), 0);
        assert_eq!(idx.line(2), 0);
        assert_eq!(idx.line(3), 1);
        assert_eq!(idx.line(7), 2);
        assert_eq!(idx.line_col(8), (2, 1));
    }

    #[test]
    fn line_index_old_mac_endings() {
        let idx = LineIndex::new("a\rb\rc");
        assert_eq!(idx.line(0), 0);
        assert_eq!(idx.line(2), 1);
        assert_eq!(idx.line(4), 2);
    }
}
