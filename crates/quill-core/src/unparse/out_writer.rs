// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Stateful output writer for document and script emission.
//!
//! [`OutWriter`] sits between the element writers / script reformatter and
//! the raw [`LineWriter`]. It owns everything contextual:
//!
//! - **Indentation** is counted, not guessed: `increase_indent` returns the
//!   previous level and `decrease_indent` asserts the level it expects to
//!   land on, so a writer that forgets a decrease fails loudly in debug
//!   builds. New lines are auto-indented unless `indent_next_lines` is
//!   cleared, which is how multi-line string and template literals keep
//!   their raw layout.
//! - **Autospacers** insert a blank line between two groups only if both
//!   groups actually wrote something: the first group registers the spacer,
//!   and it fires lazily on the next visible write.
//! - **Item frames and regions** record where each element and each named
//!   region of it landed in the output, keyed by canonical [`Path`].
//! - **Expression records** capture script expressions whose reformatted
//!   text differs from their original code, resolved when the writer is
//!   finished.
//!
//! Local failures (an empty binding value, a script that failed to parse)
//! are collected instead of propagated; write-out is best effort and the
//! caller decides what to do with a partial result.

use ecow::EcoString;

use crate::dom::{FileRegion, Path, PathStep};
use crate::source_analysis::Span;

use super::line_writer::{LineWriter, LineWriterOptions};

/// Where a named region of an element landed in the written output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRegion {
    pub path: Path,
    pub region: FileRegion,
    pub span: Span,
}

/// A script expression whose formatted text differs from its source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReformattedExpression {
    pub path: Path,
    /// The expression text as it now reads in the output.
    pub code: EcoString,
}

/// A local problem encountered during write-out. The output is still
/// produced; the failure tells the caller which part to distrust.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatFailure {
    pub path: Path,
    pub message: EcoString,
}

impl std::fmt::Display for FormatFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Identifier of a pending autospacer, for cancelling it.
pub type SpacerId = usize;

/// Everything a finished write-out produced.
#[derive(Debug)]
pub struct WriteOutcome {
    pub text: String,
    pub reformatted_expressions: Vec<ReformattedExpression>,
    pub failures: Vec<FormatFailure>,
    pub regions: Vec<RecordedRegion>,
}

#[derive(Debug)]
struct ItemFrame {
    path: Path,
    start: usize,
    regions: Vec<(FileRegion, Span)>,
}

#[derive(Debug)]
struct ExpressionRecord {
    path: Path,
    start: usize,
    end: usize,
    original: EcoString,
}

/// The writer handed to element `write_out` methods and the reformatter.
#[derive(Debug)]
pub struct OutWriter {
    lw: LineWriter,
    /// When set, a line that starts receiving text is first given the
    /// current indent. Cleared while raw literal text is emitted.
    pub indent_next_lines: bool,
    /// Suppresses comment emission entirely (used when rendering synthetic
    /// fragments where attached comments would be wrong).
    pub skip_comments: bool,
    indent_level: u32,
    counter: u32,
    spacers: Vec<Option<u32>>,
    frames: Vec<ItemFrame>,
    regions: Vec<RecordedRegion>,
    expression_records: Vec<ExpressionRecord>,
    failures: Vec<FormatFailure>,
}

impl OutWriter {
    pub fn new(options: LineWriterOptions) -> Self {
        Self {
            lw: LineWriter::new(options),
            indent_next_lines: true,
            skip_comments: false,
            indent_level: 0,
            counter: 0,
            spacers: Vec::new(),
            frames: Vec::new(),
            regions: Vec::new(),
            expression_records: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn options(&self) -> &LineWriterOptions {
        self.lw.options()
    }

    /// Monotonic write counter. Group writers compare snapshots of it to
    /// learn whether anything was emitted in between.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn indent_level(&self) -> u32 {
        self.indent_level
    }

    /// Byte offset the next write will land at.
    pub fn current_offset(&self) -> usize {
        self.lw.current_offset()
    }

    // ── Text emission ────────────────────────────────────────────────────

    /// Writes text, splitting on line breaks and indenting fresh lines.
    pub fn write(&mut self, text: &str) -> &mut Self {
        self.write_tracked(text);
        self
    }

    /// Writes a single space.
    pub fn space(&mut self) -> &mut Self {
        self.write(" ")
    }

    /// Makes sure the current line ends with at least one space. Does
    /// nothing on a fresh line, where indentation will separate anyway.
    pub fn ensure_space(&mut self) -> &mut Self {
        if !self.lw.is_line_empty() && self.lw.trailing_space() == 0 {
            self.write(" ");
        }
        self
    }

    /// Makes sure the given whitespace run is present at the end of the
    /// current line, writing only the part that is missing. A fresh line is
    /// left alone; its leading whitespace is the indent's business.
    pub fn ensure_space_text(&mut self, space: &str) -> &mut Self {
        if space.is_empty() || self.lw.is_line_empty() {
            return self;
        }
        let have = self.lw.trailing_space();
        if have < space.len() {
            let missing = space[have..].to_owned();
            self.write(&missing);
        }
        self
    }

    /// Unconditionally ends the current line.
    pub fn newline(&mut self) -> &mut Self {
        self.lw.commit_line();
        self
    }

    /// Makes sure the output ends with `n` line breaks. At the very start
    /// of the output this is a no-op, so a file never opens with blank
    /// lines.
    pub fn ensure_newline(&mut self, n: u32) -> &mut Self {
        if self.lw.at_start() {
            return self;
        }
        let have = self.lw.trailing_newlines();
        for _ in have..n {
            self.lw.commit_line();
        }
        self
    }

    // ── Indentation ──────────────────────────────────────────────────────

    /// Raises the indent by `n` levels and returns the previous level, to
    /// be passed back to [`decrease_indent`](Self::decrease_indent).
    pub fn increase_indent(&mut self, n: u32) -> u32 {
        let previous = self.indent_level;
        self.indent_level += n;
        previous
    }

    /// Lowers the indent by `n` levels. `expected` is the level the caller
    /// believes it is returning to; a mismatch means an unbalanced
    /// increase/decrease pair somewhere in the writer above.
    pub fn decrease_indent(&mut self, n: u32, expected: u32) {
        debug_assert!(self.indent_level >= n, "indent underflow");
        self.indent_level = self.indent_level.saturating_sub(n);
        debug_assert_eq!(self.indent_level, expected, "unbalanced indent");
    }

    // ── Autospacers ──────────────────────────────────────────────────────

    /// Registers a blank-line request that fires just before the next
    /// visible write, or never if nothing more is written. Returns an id
    /// usable with [`remove_text_add_callback`](Self::remove_text_add_callback).
    pub fn add_newlines_autospacer(&mut self, n: u32) -> SpacerId {
        self.spacers.push(Some(n));
        self.spacers.len() - 1
    }

    /// Cancels a pending autospacer. Ids of already-fired spacers are
    /// accepted and ignored.
    pub fn remove_text_add_callback(&mut self, id: SpacerId) {
        if let Some(slot) = self.spacers.get_mut(id) {
            *slot = None;
        }
    }

    fn fire_spacers(&mut self) {
        if self.spacers.iter().all(Option::is_none) {
            return;
        }
        let pending: Vec<u32> = self.spacers.iter_mut().filter_map(Option::take).collect();
        for n in pending {
            self.ensure_newline(n);
        }
    }

    // ── Regions and item frames ──────────────────────────────────────────

    /// Opens an item frame: everything written until the matching
    /// [`item_end`](Self::item_end) belongs to the element reached by
    /// `steps` from the enclosing frame's path.
    pub fn item_start(&mut self, steps: impl IntoIterator<Item = PathStep>) {
        let mut path = self
            .frames
            .last()
            .map_or_else(Path::root, |frame| frame.path.clone());
        for step in steps {
            path.push(step);
        }
        self.frames.push(ItemFrame {
            path,
            start: self.lw.current_offset(),
            regions: Vec::new(),
        });
    }

    /// Closes the innermost item frame, recording its `Main` region and any
    /// named regions written inside it.
    pub fn item_end(&mut self) {
        let Some(frame) = self.frames.pop() else {
            debug_assert!(false, "item_end without item_start");
            return;
        };
        let end = self.lw.current_offset();
        self.regions.push(RecordedRegion {
            path: frame.path.clone(),
            region: FileRegion::Main,
            span: Span::from(frame.start..end),
        });
        for (region, span) in frame.regions {
            self.regions.push(RecordedRegion {
                path: frame.path.clone(),
                region,
                span,
            });
        }
    }

    /// Canonical path of the innermost open item frame.
    pub fn current_path(&self) -> Path {
        self.frames
            .last()
            .map_or_else(Path::root, |frame| frame.path.clone())
    }

    /// Writes a region's canonical text (its keyword or punctuation) and
    /// records where it landed.
    pub fn write_region(&mut self, region: FileRegion) -> &mut Self {
        let text = region.canonical_text();
        debug_assert!(text.is_some(), "region {region} has no canonical text");
        self.write_region_text(region, text.unwrap_or_default())
    }

    /// Writes `text` as the given region of the current element.
    pub fn write_region_text(&mut self, region: FileRegion, text: &str) -> &mut Self {
        let span = self.write_tracked(text);
        if let Some(frame) = self.frames.last_mut() {
            frame.regions.push((region, span));
        } else {
            self.regions.push(RecordedRegion {
                path: Path::root(),
                region,
                span,
            });
        }
        self
    }

    // ── Script expression records ────────────────────────────────────────

    /// Marks the start of a script expression whose output text should be
    /// compared against its original code. Pair with
    /// [`record_reformatted_expression`](Self::record_reformatted_expression).
    pub fn begin_expression_record(&mut self) -> usize {
        self.lw.current_offset()
    }

    /// Records the text written since `start` as the new rendering of an
    /// expression that originally read `original`. Differences are reported
    /// in [`WriteOutcome::reformatted_expressions`].
    pub fn record_reformatted_expression(&mut self, start: usize, original: &str) {
        self.expression_records.push(ExpressionRecord {
            path: self.current_path(),
            start,
            end: self.lw.current_offset(),
            original: original.into(),
        });
    }

    // ── Failures ─────────────────────────────────────────────────────────

    /// Notes a local problem at the current path without aborting.
    pub fn add_failure(&mut self, message: impl Into<EcoString>) {
        self.failures.push(FormatFailure {
            path: self.current_path(),
            message: message.into(),
        });
    }

    // ── Finishing ────────────────────────────────────────────────────────

    /// Finishes writing and resolves expression records against the final
    /// text.
    pub fn finish(self) -> WriteOutcome {
        debug_assert!(self.frames.is_empty(), "unclosed item frame");
        let text = self.lw.finalize();
        let mut reformatted = Vec::new();
        for record in self.expression_records {
            // Trailing trims can pull the end of the last line in; clamp
            // rather than slicing past it.
            let end = record.end.min(text.len());
            let start = record.start.min(end);
            let code = &text[start..end];
            if code != record.original {
                reformatted.push(ReformattedExpression {
                    path: record.path,
                    code: code.into(),
                });
            }
        }
        WriteOutcome {
            text,
            reformatted_expressions: reformatted,
            failures: self.failures,
            regions: self.regions,
        }
    }

    fn write_tracked(&mut self, text: &str) -> Span {
        self.fire_spacers();
        let mut start: Option<usize> = None;
        let mut rest = text;
        while !rest.is_empty() {
            match rest.find(['\n', '\r']) {
                None => {
                    self.write_segment(rest, &mut start);
                    break;
                }
                Some(i) => {
                    let (segment, tail) = rest.split_at(i);
                    self.write_segment(segment, &mut start);
                    if start.is_none() {
                        start = Some(self.lw.current_offset());
                    }
                    self.lw.commit_line();
                    rest = if let Some(after) = tail.strip_prefix("\r\n") {
                        after
                    } else {
                        &tail[1..]
                    };
                }
            }
        }
        let begin = start.unwrap_or_else(|| self.lw.current_offset());
        Span::from(begin..self.lw.current_offset())
    }

    fn write_segment(&mut self, segment: &str, start: &mut Option<usize>) {
        if segment.is_empty() {
            return;
        }
        if self.indent_next_lines {
            // A line holding only leftover whitespace (a comment's trailing
            // run, say) is re-laid-out from the counted indent instead.
            if self.lw.is_line_blank() {
                self.lw.discard_blank_line();
            }
            if self.lw.is_line_empty() {
                let indent = self.lw.options().indent.clone();
                for _ in 0..self.indent_level {
                    self.lw.append(&indent);
                }
            }
        } else {
            self.lw.protect_line();
        }
        if start.is_none() {
            *start = Some(self.lw.current_offset());
        }
        self.lw.append(segment);
        self.counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::fields;

    fn writer() -> OutWriter {
        OutWriter::new(LineWriterOptions::default())
    }

    #[test]
    fn indents_fresh_lines() {
        let mut ow = writer();
        ow.write("{");
        let base = ow.increase_indent(1);
        ow.ensure_newline(1);
        ow.write("a");
        ow.decrease_indent(1, base);
        ow.ensure_newline(1);
        ow.write("}");
        assert_eq!(ow.finish().text, "{\n    a\n}");
    }

    #[test]
    fn suspended_indent_keeps_raw_lines() {
        let mut ow = writer();
        ow.increase_indent(1);
        ow.write("let s = ");
        ow.write("`");
        ow.indent_next_lines = false;
        ow.write("line one\n  line two   \n`");
        ow.indent_next_lines = true;
        // the raw lines are neither re-indented nor trimmed
        assert_eq!(ow.finish().text, "    let s = `line one\n  line two   \n`");
    }

    #[test]
    fn content_reindents_a_blank_line() {
        let mut ow = writer();
        ow.write("a");
        ow.newline();
        ow.write("  ");
        let base = ow.increase_indent(1);
        ow.write("b");
        ow.decrease_indent(1, base);
        assert_eq!(ow.finish().text, "a\n    b");
    }

    #[test]
    fn ensure_newline_is_idempotent_and_silent_at_start() {
        let mut ow = writer();
        ow.ensure_newline(2);
        ow.write("a");
        ow.ensure_newline(1);
        ow.ensure_newline(1);
        ow.write("b");
        assert_eq!(ow.finish().text, "a\nb");
    }

    #[test]
    fn autospacer_fires_only_before_later_content() {
        let mut ow = writer();
        ow.write("first");
        ow.ensure_newline(1);
        ow.add_newlines_autospacer(2);
        ow.write("second");
        assert_eq!(ow.finish().text, "first\n\nsecond");
    }

    #[test]
    fn unused_autospacer_leaves_no_trace() {
        let mut ow = writer();
        ow.write("only");
        ow.ensure_newline(1);
        ow.add_newlines_autospacer(2);
        assert_eq!(ow.finish().text, "only\n");
    }

    #[test]
    fn cancelled_autospacer_does_not_fire() {
        let mut ow = writer();
        ow.write("a");
        ow.ensure_newline(1);
        let spacer = ow.add_newlines_autospacer(2);
        ow.remove_text_add_callback(spacer);
        ow.write("b");
        assert_eq!(ow.finish().text, "a\nb");
    }

    #[test]
    fn ensure_space_text_writes_missing_tail() {
        let mut ow = writer();
        ow.write("a();");
        ow.ensure_space_text("  ");
        ow.write("// done");
        assert_eq!(ow.finish().text, "a();  // done");
    }

    #[test]
    fn ensure_space_text_respects_existing_whitespace() {
        let mut ow = writer();
        ow.write("a(); ");
        ow.ensure_space_text(" ");
        ow.write("b");
        assert_eq!(ow.finish().text, "a(); b");
    }

    #[test]
    fn regions_record_output_spans() {
        let mut ow = writer();
        ow.item_start([PathStep::Field(fields::BINDINGS)]);
        ow.write_region_text(FileRegion::Identifier, "width");
        ow.write_region(FileRegion::ColonToken);
        ow.space();
        ow.write("5");
        ow.item_end();
        let outcome = ow.finish();
        assert_eq!(outcome.text, "width: 5");
        let main = outcome
            .regions
            .iter()
            .find(|r| r.region == FileRegion::Main)
            .unwrap();
        assert_eq!(main.span, Span::new(0, 8));
        let colon = outcome
            .regions
            .iter()
            .find(|r| r.region == FileRegion::ColonToken)
            .unwrap();
        assert_eq!(colon.span, Span::new(5, 6));
        assert_eq!(colon.path.to_string(), "$doc.bindings");
    }

    #[test]
    fn expression_records_report_changed_text_only() {
        let mut ow = writer();
        let unchanged = ow.begin_expression_record();
        ow.write("1 + 2");
        ow.record_reformatted_expression(unchanged, "1 + 2");
        ow.write(" ");
        let changed = ow.begin_expression_record();
        ow.write("3 + 4");
        ow.record_reformatted_expression(changed, "3+4");
        let outcome = ow.finish();
        assert_eq!(outcome.reformatted_expressions.len(), 1);
        assert_eq!(outcome.reformatted_expressions[0].code, "3 + 4");
    }

    #[test]
    fn counter_reflects_visible_writes() {
        let mut ow = writer();
        let before = ow.counter();
        ow.ensure_newline(1);
        assert_eq!(ow.counter(), before);
        ow.write("x");
        assert!(ow.counter() > before);
    }
}
