// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Low-level line assembly for the writer.
//!
//! [`LineWriter`] buffers the line currently being written and commits it to
//! the output text when a newline arrives. Committing is where line endings
//! are normalized to the configured style and where trailing whitespace is
//! dropped — except on *protected* lines, which belong to multi-line string
//! or template literals and must survive byte-for-byte.
//!
//! Indentation, regions, autospacers and everything else stateful live one
//! level up in [`OutWriter`](super::OutWriter); this type only knows about
//! text.

use ecow::EcoString;

/// Line ending style for written output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndOfLine {
    #[default]
    Unix,
    Windows,
    OldMacOs,
}

impl EndOfLine {
    pub fn as_str(self) -> &'static str {
        match self {
            EndOfLine::Unix => "\n",
            EndOfLine::Windows => "\r\n",
            EndOfLine::OldMacOs => "\r",
        }
    }

    /// Guesses the style from the first line break found in `source`,
    /// defaulting to Unix when there is none.
    pub fn detect(source: &str) -> Self {
        let bytes = source.as_bytes();
        for (i, &b) in bytes.iter().enumerate() {
            if b == b'\n' {
                if i > 0 && bytes[i - 1] == b'\r' {
                    return EndOfLine::Windows;
                }
                return EndOfLine::Unix;
            }
            if b == b'\r' && bytes.get(i + 1) != Some(&b'\n') {
                return EndOfLine::OldMacOs;
            }
        }
        EndOfLine::Unix
    }
}

/// Whether object attributes are written in canonical order or in the order
/// they appeared in the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributesOrder {
    /// id, enums, property definitions, signals, methods, bindings,
    /// children — each group sorted by name.
    #[default]
    Normalize,
    /// Sort by original source offset, with a fixed per-kind precedence as
    /// tie-break; preserves the author's layout.
    Preserve,
}

/// Options controlling write-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineWriterOptions {
    /// Text prepended once per indent level. Defaults to four spaces.
    pub indent: EcoString,
    pub end_of_line: EndOfLine,
    pub attributes_order: AttributesOrder,
    /// Extra blank line between consecutive child objects.
    pub objects_spacing: bool,
    /// Extra blank line between consecutive methods.
    pub functions_spacing: bool,
    /// Record script expressions whose formatted text differs from their
    /// original code, for callers that diff or patch incrementally.
    pub update_expressions: bool,
}

impl Default for LineWriterOptions {
    fn default() -> Self {
        Self {
            indent: EcoString::from("    "),
            end_of_line: EndOfLine::Unix,
            attributes_order: AttributesOrder::Normalize,
            objects_spacing: false,
            functions_spacing: false,
            update_expressions: true,
        }
    }
}

/// Accumulates output text line by line.
#[derive(Debug)]
pub struct LineWriter {
    text: String,
    line: String,
    line_protected: bool,
    options: LineWriterOptions,
    lines_committed: u32,
}

impl LineWriter {
    pub fn new(options: LineWriterOptions) -> Self {
        Self {
            text: String::new(),
            line: String::new(),
            line_protected: false,
            options,
            lines_committed: 0,
        }
    }

    pub fn options(&self) -> &LineWriterOptions {
        &self.options
    }

    /// Appends text to the current line. Must not contain line breaks;
    /// callers split on `\n` and use [`commit_line`](Self::commit_line).
    pub fn append(&mut self, s: &str) {
        debug_assert!(
            !s.contains('\n') && !s.contains('\r'),
            "append must not receive line breaks: {s:?}"
        );
        self.line.push_str(s);
    }

    /// Ends the current line, normalizing the line ending and trimming
    /// trailing whitespace unless the line is protected.
    pub fn commit_line(&mut self) {
        if !self.line_protected {
            let trimmed = self.line.trim_end_matches([' ', '\t']).len();
            self.line.truncate(trimmed);
        }
        self.text.push_str(&self.line);
        self.text.push_str(self.options.end_of_line.as_str());
        self.line.clear();
        self.line_protected = false;
        self.lines_committed += 1;
    }

    /// Marks the current line as raw literal content: no trailing-whitespace
    /// trim on commit.
    pub fn protect_line(&mut self) {
        self.line_protected = true;
    }

    /// Byte offset the next write will land at. Offsets on the current line
    /// may shift if the line is later trimmed; see `OutWriter::finish`.
    pub fn current_offset(&self) -> usize {
        self.text.len() + self.line.len()
    }

    /// Byte length of the current line so far.
    pub fn column(&self) -> usize {
        self.line.len()
    }

    pub fn is_line_empty(&self) -> bool {
        self.line.is_empty()
    }

    /// True when the current line holds only spaces and tabs. Protected
    /// lines never count as blank; their whitespace is literal content.
    pub fn is_line_blank(&self) -> bool {
        !self.line_protected
            && !self.line.is_empty()
            && self.line.bytes().all(|b| b == b' ' || b == b'\t')
    }

    /// Drops a blank line's whitespace so the arriving content lays the
    /// line out from column zero again.
    pub fn discard_blank_line(&mut self) {
        debug_assert!(self.is_line_blank(), "line has visible content");
        self.line.clear();
    }

    /// True when nothing at all has been written yet.
    pub fn at_start(&self) -> bool {
        self.text.is_empty() && self.line.is_empty()
    }

    /// Number of trailing whitespace bytes at the end of the current line.
    pub fn trailing_space(&self) -> usize {
        self.line.len() - self.line.trim_end_matches([' ', '\t']).len()
    }

    /// How many line breaks the output currently ends with. Zero whenever
    /// the current line has content.
    pub fn trailing_newlines(&self) -> u32 {
        if !self.line.is_empty() {
            return 0;
        }
        let eol = self.options.end_of_line.as_str();
        let mut tail = self.text.as_str();
        let mut count = 0;
        while let Some(rest) = tail.strip_suffix(eol) {
            count += 1;
            tail = rest;
        }
        count
    }

    pub fn lines_committed(&self) -> u32 {
        self.lines_committed
    }

    /// Commits any pending line content and returns the assembled text.
    pub fn finalize(mut self) -> String {
        if !self.line.is_empty() {
            self.commit_line();
            // commit_line appends a line ending; a caller that wants a
            // trailing newline asks for it explicitly, so take it back off.
            let eol = self.options.end_of_line.as_str();
            self.text.truncate(self.text.len() - eol.len());
        }
        self.text
    }

    /// Read-only view of the committed text, for resolving recorded spans.
    pub fn committed(&self) -> &str {
        &self.text
    }
}
