// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Comment representation and the containers that tie comments to code.
//!
//! Comments carry no meaning for execution, so the only good thing a tool
//! can do with them is keep them: keep their text, keep their spacing, and
//! keep them next to the construct their author put them next to. A
//! [`Comment`] stores the raw source slice (comment markers, the spacing
//! just before them on the same line, and the line break after) plus the
//! number of newlines that preceded it, so a blank line deliberately left
//! above a comment survives reformatting.
//!
//! Attachment lives in two containers. [`RegionComments`] hangs comments
//! off the named regions of a DOM element (a comment right before the `:`
//! of a binding belongs to its colon region). [`AstComments`] maps script
//! AST nodes, by id, to their [`CommentedElement`]. Both split comments
//! into *pre* (written before the construct) and *post* (written after),
//! and both are filled by [`collector`].

pub mod collector;

use std::collections::BTreeMap;
use std::collections::HashMap;

use ecow::EcoString;

use crate::ast::NodeId;
use crate::dom::FileRegion;
use crate::source_analysis::Span;
use crate::unparse::OutWriter;

pub use collector::{
    collect_document_comments, collect_expression_comments, collect_script_comments,
    CollectedComments,
};

/// Whether a comment precedes or follows the construct it is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Pre,
    Post,
}

/// A single source comment, stored raw.
///
/// `raw` is the comment exactly as it appeared: optional spaces or tabs
/// before the marker, the marker and body, and trailing whitespace up to
/// and including the line break(s) after it. `newlines_before` records how
/// many line breaks separated it from the previous content (capped at two
/// by the collector, so at most one blank line is preserved).
#[derive(Debug, Clone, Eq)]
pub struct Comment {
    raw: EcoString,
    span: Span,
    newlines_before: u32,
    kind: CommentKind,
}

impl Comment {
    pub fn new(
        raw: impl Into<EcoString>,
        span: Span,
        newlines_before: u32,
        kind: CommentKind,
    ) -> Self {
        Self {
            raw: raw.into(),
            span,
            newlines_before,
            kind,
        }
    }

    /// The raw text, including surrounding whitespace and markers.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Location of the raw text in the source it was collected from.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn newlines_before(&self) -> u32 {
        self.newlines_before
    }

    /// Adjusts the leading newline count; used when write-out moves a
    /// comment into a context with different spacing.
    pub fn set_newlines_before(&mut self, n: u32) {
        self.newlines_before = n;
    }

    pub fn kind(&self) -> CommentKind {
        self.kind
    }

    /// Splits the raw text into whitespace, markers and body.
    pub fn info(&self) -> CommentInfo<'_> {
        CommentInfo::new(&self.raw)
    }

    /// Re-emits the comment: leading newlines, then the original spacing
    /// before the marker, then the body with auto-indent suspended after
    /// the first character so multi-line block comments keep their inner
    /// layout, then the trailing whitespace (which carries the line break
    /// for line comments).
    pub fn write(&self, ow: &mut OutWriter) {
        if self.newlines_before > 0 {
            ow.ensure_newline(self.newlines_before);
        }
        let info = self.info();
        ow.ensure_space_text(info.pre_whitespace());
        let body = info.comment();
        if !body.is_empty() {
            let first_len = body.chars().next().map_or(0, char::len_utf8);
            let (first, rest) = body.split_at(first_len);
            ow.write(first);
            let indent_on = ow.indent_next_lines;
            ow.indent_next_lines = false;
            ow.write(rest);
            ow.indent_next_lines = indent_on;
        }
        ow.write(info.post_whitespace());
    }
}

/// Equality is structural: same text, same leading newlines. The span is
/// deliberately ignored so comments can be compared across parses.
impl PartialEq for Comment {
    fn eq(&self, other: &Self) -> bool {
        self.newlines_before == other.newlines_before && self.raw == other.raw
    }
}

/// Pieces of a raw comment string.
///
/// `rawComment` mixes four things: whitespace before the marker, the
/// marker itself (`//`, `/*` or `#`), the body, and whitespace after.
/// This type finds the boundaries once so callers can ask for each piece.
#[derive(Debug, Clone)]
pub struct CommentInfo<'a> {
    raw: &'a str,
    comment_begin: usize,
    comment_end: usize,
    content_begin: usize,
    content_end: usize,
    start_marker: &'a str,
    end_marker: &'a str,
    has_start_newline: bool,
    has_end_newline: bool,
    content_newlines: u32,
    warnings: Vec<EcoString>,
}

impl<'a> CommentInfo<'a> {
    pub fn new(raw: &'a str) -> Self {
        let bytes = raw.as_bytes();
        let mut info = CommentInfo {
            raw,
            comment_begin: 0,
            comment_end: 0,
            content_begin: 0,
            content_end: 0,
            start_marker: "",
            end_marker: "",
            has_start_newline: false,
            has_end_newline: false,
            content_newlines: 0,
            warnings: Vec::new(),
        };

        let mut begin = 0;
        while begin < bytes.len() && bytes[begin].is_ascii_whitespace() {
            if bytes[begin] == b'\n' {
                info.has_start_newline = true;
            }
            begin += 1;
        }
        info.comment_begin = begin;
        if begin == bytes.len() {
            info.comment_end = begin;
            info.content_begin = begin;
            info.content_end = begin;
            return info;
        }

        // Marker detection. Only ASCII is examined, so byte indexing is
        // safe here; an unknown first character is sliced on its own char
        // boundary.
        let line_ending_terminated;
        match bytes[begin] {
            b'/' if bytes.get(begin + 1) == Some(&b'*') => {
                info.start_marker = "/*";
                line_ending_terminated = false;
            }
            b'/' if bytes.get(begin + 1) == Some(&b'/') => {
                info.start_marker = "//";
                line_ending_terminated = true;
            }
            b'#' => {
                info.start_marker = "#";
                line_ending_terminated = true;
            }
            _ => {
                let first_len = raw[begin..].chars().next().map_or(0, char::len_utf8);
                info.start_marker = &raw[begin..begin + first_len];
                info.warnings.push(
                    format!("unexpected comment start {:?}", info.start_marker).into(),
                );
                line_ending_terminated = true;
            }
        }

        let body_start = begin + info.start_marker.len();
        let mut end = bytes.len();
        if line_ending_terminated {
            // The terminating newline is not part of the comment; it goes
            // to the post whitespace.
            if let Some(pos) = raw[body_start..].find(['\n', '\r']) {
                end = body_start + pos;
            }
        } else if let Some(pos) = raw[body_start..].find("*/") {
            end = body_start + pos + 2;
            info.end_marker = "*/";
        } else {
            info.warnings.push("unterminated comment".into());
        }
        info.comment_end = end;

        let inner_end = end - info.end_marker.len();
        let inner = &raw[body_start..inner_end];
        let newline_count = inner.bytes().filter(|&b| b == b'\n').count();
        info.content_newlines = u32::try_from(newline_count).unwrap_or(u32::MAX);
        let trimmed_front = inner.len() - inner.trim_start().len();
        let trimmed_back = inner.len() - inner.trim_end().len();
        info.content_begin = body_start + trimmed_front;
        info.content_end = inner_end - trimmed_back.min(inner.len() - trimmed_front);

        let mut i = end;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            if bytes[i] == b'\n' || bytes[i] == b'\r' {
                info.has_end_newline = true;
            }
            i += 1;
        }
        if i < bytes.len() {
            let trailing = raw[i..].chars().next().unwrap_or(' ');
            info.warnings.push(
                format!("non whitespace char {trailing:?} after comment end at {i}").into(),
            );
        }
        info
    }

    /// Spaces and tabs before the marker (the original spacing on the
    /// line, preserved for inline comments).
    pub fn pre_whitespace(&self) -> &'a str {
        &self.raw[..self.comment_begin]
    }

    /// The comment itself, marker(s) included, line break excluded.
    pub fn comment(&self) -> &'a str {
        &self.raw[self.comment_begin..self.comment_end]
    }

    /// Whitespace after the comment, including its terminating line break.
    pub fn post_whitespace(&self) -> &'a str {
        &self.raw[self.comment_end..]
    }

    /// The body between the markers, trimmed.
    pub fn content(&self) -> &'a str {
        &self.raw[self.content_begin..self.content_end]
    }

    pub fn start_marker(&self) -> &'a str {
        self.start_marker
    }

    pub fn end_marker(&self) -> &'a str {
        self.end_marker
    }

    pub fn is_block(&self) -> bool {
        self.start_marker == "/*"
    }

    pub fn is_line(&self) -> bool {
        matches!(self.start_marker, "//" | "#")
    }

    pub fn has_start_newline(&self) -> bool {
        self.has_start_newline
    }

    pub fn has_end_newline(&self) -> bool {
        self.has_end_newline
    }

    /// Newlines inside the body (only block comments can have any).
    pub fn content_newlines(&self) -> u32 {
        self.content_newlines
    }

    pub fn warnings(&self) -> &[EcoString] {
        &self.warnings
    }
}

/// The comments attached to one element or one AST node.
///
/// Append-only during collection; comments keep source order within each
/// list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentedElement {
    pre_comments: Vec<Comment>,
    post_comments: Vec<Comment>,
}

impl CommentedElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pre(&mut self, mut comment: Comment) {
        comment.kind = CommentKind::Pre;
        self.pre_comments.push(comment);
    }

    pub fn add_post(&mut self, mut comment: Comment) {
        comment.kind = CommentKind::Post;
        self.post_comments.push(comment);
    }

    pub fn add(&mut self, kind: CommentKind, comment: Comment) {
        match kind {
            CommentKind::Pre => self.add_pre(comment),
            CommentKind::Post => self.add_post(comment),
        }
    }

    pub fn pre_comments(&self) -> &[Comment] {
        &self.pre_comments
    }

    pub fn post_comments(&self) -> &[Comment] {
        &self.post_comments
    }

    pub fn pre_comments_mut(&mut self) -> &mut [Comment] {
        &mut self.pre_comments
    }

    pub fn post_comments_mut(&mut self) -> &mut [Comment] {
        &mut self.post_comments
    }

    pub fn is_empty(&self) -> bool {
        self.pre_comments.is_empty() && self.post_comments.is_empty()
    }

    /// Writes all pre comments, honouring the writer's comment-skip flag.
    pub fn write_pre(&self, ow: &mut OutWriter) {
        if ow.skip_comments {
            return;
        }
        for comment in &self.pre_comments {
            comment.write(ow);
        }
    }

    /// Writes all post comments.
    pub fn write_post(&self, ow: &mut OutWriter) {
        if ow.skip_comments {
            return;
        }
        for comment in &self.post_comments {
            comment.write(ow);
        }
    }
}

/// Comments attached to a DOM element, grouped by named region.
///
/// Most comments sit on [`FileRegion::Main`]; a comment wedged against an
/// inner token lands on that token's region instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionComments {
    regions: BTreeMap<FileRegion, CommentedElement>,
}

impl RegionComments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, region: FileRegion) -> Option<&CommentedElement> {
        self.regions.get(&region)
    }

    pub fn region_mut(&mut self, region: FileRegion) -> &mut CommentedElement {
        self.regions.entry(region).or_default()
    }

    pub fn add_pre(&mut self, region: FileRegion, comment: Comment) {
        self.region_mut(region).add_pre(comment);
    }

    pub fn add_post(&mut self, region: FileRegion, comment: Comment) {
        self.region_mut(region).add_post(comment);
    }

    pub fn is_empty(&self) -> bool {
        self.regions.values().all(CommentedElement::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FileRegion, &CommentedElement)> {
        self.regions.iter().map(|(&region, element)| (region, element))
    }

    pub fn write_pre(&self, ow: &mut OutWriter, region: FileRegion) {
        if let Some(element) = self.regions.get(&region) {
            element.write_pre(ow);
        }
    }

    pub fn write_post(&self, ow: &mut OutWriter, region: FileRegion) {
        if let Some(element) = self.regions.get(&region) {
            element.write_post(ow);
        }
    }

    /// Writes a region's fixed token wrapped in the comments attached to
    /// that region.
    pub fn write_region(&self, ow: &mut OutWriter, region: FileRegion) {
        self.write_pre(ow, region);
        ow.write_region(region);
        self.write_post(ow, region);
    }

    /// Writes `text` as `region`, wrapped in the comments attached to it.
    pub fn write_region_text(&self, ow: &mut OutWriter, region: FileRegion, text: &str) {
        self.write_pre(ow, region);
        ow.write_region_text(region, text);
        self.write_post(ow, region);
    }
}

/// Comments attached to script AST nodes, keyed by node id.
///
/// One instance belongs to one parse: node ids are only meaningful against
/// the AST they were assigned in, so the map lives and dies with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AstComments {
    nodes: HashMap<NodeId, CommentedElement>,
}

impl AstComments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: NodeId) -> Option<&CommentedElement> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut CommentedElement {
        self.nodes.entry(id).or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.values().all(CommentedElement::is_empty)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &CommentedElement)> {
        self.nodes.iter().map(|(&id, element)| (id, element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unparse::LineWriterOptions;

    #[test]
    fn line_comment_info_splits_pieces() {
        let info = CommentInfo::new("  // a note\n");
        assert_eq!(info.pre_whitespace(), "  ");
        assert_eq!(info.comment(), "// a note");
        assert_eq!(info.post_whitespace(), "\n");
        assert_eq!(info.content(), "a note");
        assert_eq!(info.start_marker(), "//");
        assert!(info.is_line());
        assert!(info.has_end_newline());
        assert!(info.warnings().is_empty());
    }

    #[test]
    fn block_comment_info_keeps_end_marker() {
        let info = CommentInfo::new("/* one\n two */\n\n");
        assert_eq!(info.comment(), "/* one\n two */");
        assert_eq!(info.end_marker(), "*/");
        assert_eq!(info.content(), "one\n two");
        assert_eq!(info.content_newlines(), 1);
        assert!(info.is_block());
        assert!(info.has_end_newline());
    }

    #[test]
    fn hash_comment_is_a_line_comment() {
        let info = CommentInfo::new("# directive\n");
        assert_eq!(info.start_marker(), "#");
        assert_eq!(info.comment(), "# directive");
        assert!(info.is_line());
    }

    #[test]
    fn unexpected_marker_warns() {
        let info = CommentInfo::new("-- nope");
        assert_eq!(info.warnings().len(), 1);
        assert!(info.warnings()[0].contains("unexpected comment start"));
    }

    #[test]
    fn unterminated_block_warns() {
        let info = CommentInfo::new("/* never closed");
        assert_eq!(info.end_marker(), "");
        assert!(info.warnings().iter().any(|w| w.contains("unterminated")));
    }

    #[test]
    fn trailing_garbage_warns() {
        let info = CommentInfo::new("// fine\n  x");
        assert!(info
            .warnings()
            .iter()
            .any(|w| w.contains("after comment end")));
    }

    #[test]
    fn comment_equality_is_structural() {
        let a = Comment::new("// hi\n", Span::new(0, 6), 1, CommentKind::Pre);
        let b = Comment::new("// hi\n", Span::new(40, 46), 1, CommentKind::Post);
        let c = Comment::new("// hi\n", Span::new(0, 6), 2, CommentKind::Pre);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn write_indents_own_line_comment() {
        let mut ow = OutWriter::new(LineWriterOptions::default());
        ow.write("{");
        let base = ow.increase_indent(1);
        let comment = Comment::new("  // why\n", Span::new(0, 9), 1, CommentKind::Pre);
        comment.write(&mut ow);
        ow.write("a()");
        ow.decrease_indent(1, base);
        ow.ensure_newline(1);
        ow.write("}");
        // own-line comments take the writer's indent, not their original
        // column
        assert_eq!(ow.finish().text, "{\n    // why\n    a()\n}");
    }

    #[test]
    fn write_preserves_inline_spacing() {
        let mut ow = OutWriter::new(LineWriterOptions::default());
        ow.write("a();");
        let comment = Comment::new(" // done\n", Span::new(0, 9), 0, CommentKind::Post);
        comment.write(&mut ow);
        assert_eq!(ow.finish().text, "a(); // done\n");
    }

    #[test]
    fn write_keeps_block_comment_inner_layout() {
        let mut ow = OutWriter::new(LineWriterOptions::default());
        ow.increase_indent(2);
        ow.write("x");
        let comment = Comment::new(" /* a\n    b */", Span::new(0, 14), 0, CommentKind::Post);
        comment.write(&mut ow);
        assert_eq!(ow.finish().text, "        x /* a\n    b */");
    }

    #[test]
    fn commented_element_sets_kind_on_insert() {
        let mut element = CommentedElement::new();
        element.add_pre(Comment::new("// a\n", Span::new(0, 5), 1, CommentKind::Post));
        element.add_post(Comment::new("// b\n", Span::new(6, 11), 0, CommentKind::Pre));
        assert_eq!(element.pre_comments()[0].kind(), CommentKind::Pre);
        assert_eq!(element.post_comments()[0].kind(), CommentKind::Post);
    }

    #[test]
    fn skip_comments_suppresses_output() {
        let mut ow = OutWriter::new(LineWriterOptions::default());
        ow.skip_comments = true;
        let mut element = CommentedElement::new();
        element.add_pre(Comment::new("// gone\n", Span::new(0, 8), 1, CommentKind::Pre));
        ow.write("a");
        element.write_pre(&mut ow);
        ow.write("b");
        assert_eq!(ow.finish().text, "ab");
    }
}
