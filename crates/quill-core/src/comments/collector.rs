// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Assigns each lexed comment to the element or AST node that owns it.
//!
//! The lexer strips comments out of the token stream and hands back bare
//! content spans. To survive a rewrite a comment needs more than that: its
//! markers and surrounding spacing must be recovered, and it must be
//! attached to a construct that will still exist after the tree is edited,
//! on the right side of it (pre or post).
//!
//! Attachment is decided from two ordered maps built over the whole input:
//! one of every offset where an attachable extent starts, one of every
//! offset where one ends. An extent is a script AST node or a named region
//! of a declarative element; where several extents share an offset, the
//! first one recorded wins, and the walks record outer extents first so
//! ties keep the largest one. For each comment the maps answer what ends
//! just before it and what starts just after it, and a few rules pick
//! between those candidates:
//!
//! - a comment on the same line as preceding code becomes a post comment
//!   of the extent that ends there, but only when nothing except
//!   whitespace separates them. `a + //c\n b` must not attach to `a`,
//!   because writing it back after `a` would move the `+` past the line
//!   break and change the parse.
//! - a comment on its own line becomes a pre comment of the next extent
//!   to start, as long as no extent ends in between.
//! - a comment inside an extent with no boundary on either side attaches
//!   as a pre comment of the smallest enclosing extent.
//! - anything still unassigned goes to the root: the document's main
//!   region, or the root node of a standalone script.
//!
//! A run of post comments chains: once a comment has attached as a post
//! comment, a following comment separated from it only by whitespace may
//! attach to the same element even though the first comment's text now
//! sits between them.

use std::collections::{BTreeMap, HashMap};

use crate::ast::{Expression, NodeId, Statement};
use crate::ast_walker;
use crate::dom::elements::{Binding, BindingValue, Component, EnumDecl, MethodInfo, QmlObject};
use crate::dom::script::{ScriptAst, ScriptExpression};
use crate::dom::{Document, FileRegion, RegionLocations};
use crate::source_analysis::{Diagnostic, Span};

use super::{AstComments, Comment, CommentKind, RegionComments};

/// Result of collecting the comments of a standalone script fragment.
#[derive(Debug)]
pub struct CollectedComments {
    pub comments: AstComments,
    /// Malformed comment text and comments that had nothing to attach to.
    pub warnings: Vec<Diagnostic>,
}

/// Attaches `comment_spans` to the nodes of a single expression.
///
/// `source` is the text the expression and the spans were parsed from;
/// node spans and comment spans must be offsets into it.
pub fn collect_expression_comments(
    source: &str,
    expression: &Expression,
    comment_spans: &[Span],
) -> CollectedComments {
    let mut ranges = ExtentRanges::new();
    ast_walker::walk_expression(expression, &mut |id, span| ranges.add(id, span));
    collect_script(source, comment_spans, &ranges, Some(expression.id()))
}

/// Attaches `comment_spans` to the nodes of a statement list.
///
/// Comments in a fragment with no statements at all have nothing to hold
/// on to; they are reported as warnings and not collected.
pub fn collect_script_comments(
    source: &str,
    statements: &[Statement],
    comment_spans: &[Span],
) -> CollectedComments {
    let mut ranges = ExtentRanges::new();
    ast_walker::walk_statements(statements, &mut |id, span| ranges.add(id, span));
    collect_script(
        source,
        comment_spans,
        &ranges,
        statements.first().map(Statement::id),
    )
}

fn collect_script(
    source: &str,
    comment_spans: &[Span],
    ranges: &ExtentRanges<NodeId>,
    root: Option<NodeId>,
) -> CollectedComments {
    let (placements, warnings) = place_comments(source, comment_spans, ranges, root);
    let mut comments = AstComments::new();
    for placement in placements {
        comments
            .node_mut(placement.target)
            .add(placement.kind, placement.comment);
    }
    CollectedComments { comments, warnings }
}

/// Attaches `comment_spans` to a parsed document, in place.
///
/// Declarative elements receive comments on their recorded regions;
/// comments inside embedded scripts land in each script's own node map.
/// Returned warnings describe malformed comment text.
pub fn collect_document_comments(
    document: &mut Document,
    comment_spans: &[Span],
) -> Vec<Diagnostic> {
    let source = document.source.clone();
    let mut recorder = RangeRecorder {
        ranges: ExtentRanges::new(),
    };
    visit_attachable(document, &mut recorder);

    let root = DocumentTarget::Region {
        slot: 0,
        region: FileRegion::Main,
    };
    let (placements, warnings) =
        place_comments(&source, comment_spans, &recorder.ranges, Some(root));

    let mut pending: HashMap<u32, Vec<Placement<DocumentTarget>>> = HashMap::new();
    for placement in placements {
        let (DocumentTarget::Node { slot, .. } | DocumentTarget::Region { slot, .. }) =
            placement.target;
        pending.entry(slot).or_default().push(placement);
    }
    let mut applier = CommentApplier { pending };
    visit_attachable(document, &mut applier);
    warnings
}

/// What a document comment can attach to: a node of one of the embedded
/// scripts, or a region of one of the declarative elements. The slot is
/// the element's position in the fixed traversal order, so the second
/// traversal can deliver the comment without holding a reference.
#[derive(Clone, Copy)]
enum DocumentTarget {
    Node { slot: u32, id: NodeId },
    Region { slot: u32, region: FileRegion },
}

/// One end of an attachable extent.
#[derive(Clone, Copy)]
struct ExtentRef<T> {
    target: T,
    size: u32,
}

/// Ordered start and end offsets of every attachable extent.
struct ExtentRanges<T> {
    starts: BTreeMap<u32, ExtentRef<T>>,
    ends: BTreeMap<u32, ExtentRef<T>>,
}

impl<T: Copy> ExtentRanges<T> {
    fn new() -> Self {
        Self {
            starts: BTreeMap::new(),
            ends: BTreeMap::new(),
        }
    }

    /// Records an extent. At each offset the first recording wins, so
    /// callers must record outer extents before inner ones.
    fn add(&mut self, target: T, span: Span) {
        let extent = ExtentRef {
            target,
            size: span.len(),
        };
        self.starts.entry(span.start()).or_insert(extent);
        self.ends.entry(span.end()).or_insert(extent);
    }
}

/// A classified comment, ready to be delivered to its target.
struct Placement<T> {
    target: T,
    kind: CommentKind,
    comment: Comment,
}

/// Classifies every comment span against the recorded extents.
fn place_comments<T: Copy>(
    code: &str,
    comment_spans: &[Span],
    ranges: &ExtentRanges<T>,
    root: Option<T>,
) -> (Vec<Placement<T>>, Vec<Diagnostic>) {
    let bytes = code.as_bytes();
    let mut placements = Vec::with_capacity(comment_spans.len());
    let mut warnings = Vec::new();
    // End of the raw text of the most recent post comment. A later comment
    // that begins inside or right after that text may chain onto the same
    // element even though the earlier comment's body is "in the way".
    let mut last_post_end = 0u32;

    for &content in comment_spans {
        let (raw_span, newlines_before) = expand_comment(bytes, content);
        let begin = content.start();

        let entry = |(&key, &extent): (&u32, &ExtentRef<T>)| (key, extent);
        let next_start = ranges.starts.range(begin..).next().map(entry);
        let next_end = ranges.ends.range(begin..).next().map(entry);
        let prev_start = ranges.starts.range(..begin).next_back().map(entry);
        let prev_end = ranges.ends.range(..begin).next_back().map(entry);

        let preceding = attach_to_preceding(
            bytes,
            raw_span.start(),
            prev_start.map(|(key, _)| key),
            prev_end,
            next_end.is_some(),
            last_post_end,
        )
        .map(|extent| (extent, CommentKind::Post));
        let following =
            attach_to_following(next_start, next_end.map(|(key, _)| key), prev_start.is_some())
                .map(|extent| (extent, CommentKind::Pre));

        // On the same line as code, the comment belongs to that code; on
        // its own line, to whatever follows it.
        let attachment = if newlines_before == 0 {
            preceding.or(following)
        } else {
            following.or(preceding)
        }
        .or_else(|| {
            attach_to_enclosing(next_start, prev_start, next_end)
                .map(|extent| (extent, CommentKind::Pre))
        });

        let (target, kind) = match attachment {
            Some((extent, kind)) => (extent.target, kind),
            None => match root {
                Some(target) => (target, CommentKind::Pre),
                None => {
                    warnings.push(Diagnostic::warning(
                        "comment has no element to attach to",
                        raw_span,
                    ));
                    continue;
                }
            },
        };
        if kind == CommentKind::Post {
            last_post_end = raw_span.end() + 1;
        }

        let comment = Comment::new(&code[raw_span.as_range()], raw_span, newlines_before, kind);
        for warning in comment.info().warnings() {
            warnings.push(Diagnostic::warning(warning.clone(), raw_span));
        }
        placements.push(Placement {
            target,
            kind,
            comment,
        });
    }
    (placements, warnings)
}

/// Widens a bare content span to the comment's full raw text: the spacing
/// before the marker on its line, the marker, the body, the end marker,
/// and trailing whitespace through at most two line breaks. Also counts
/// the line breaks before the comment, capped at two so a blank line above
/// it survives as exactly one blank line. The start of input counts as a
/// line break.
fn expand_comment(bytes: &[u8], content: Span) -> (Span, u32) {
    let mut raw_start = content.start() as usize;
    let mut newlines_before = 0u32;
    // Second byte of the start marker, once it has been re-absorbed.
    let mut marker: Option<u8> = None;

    while raw_start > 0 {
        let c = bytes[raw_start - 1];
        if !c.is_ascii_whitespace() {
            if marker.is_none()
                && (c == b'*' || c == b'/')
                && raw_start >= 2
                && bytes[raw_start - 2] == b'/'
            {
                marker = Some(c);
                raw_start -= 1;
            } else {
                break;
            }
        } else if c == b'\n' || c == b'\r' {
            newlines_before = 1;
            let mut i = raw_start - 1;
            if c == b'\n' && i > 0 && bytes[i - 1] == b'\r' {
                i -= 1;
            }
            while i > 0 {
                i -= 1;
                if !bytes[i].is_ascii_whitespace() {
                    break;
                }
                if bytes[i] == b'\n' || bytes[i] == b'\r' {
                    newlines_before = 2;
                    break;
                }
            }
            break;
        }
        raw_start -= 1;
    }
    if raw_start == 0 {
        newlines_before = 1;
    }

    let mut raw_end = content.end() as usize;
    let mut newlines_after = 0u32;
    while raw_end < bytes.len() {
        let c = bytes[raw_end];
        if !c.is_ascii_whitespace() {
            if marker == Some(b'*') && c == b'*' && bytes.get(raw_end + 1) == Some(&b'/') {
                marker = None;
                raw_end += 1;
            } else {
                break;
            }
        } else if c == b'\n' {
            newlines_after += 1;
            if bytes.get(raw_end + 1) == Some(&b'\n') {
                raw_end += 1;
                newlines_after += 1;
            }
        } else if c == b'\r' && bytes.get(raw_end + 1) == Some(&b'\n') {
            raw_end += 1;
            newlines_after += 1;
        }
        raw_end += 1;
        if newlines_after > 1 {
            break;
        }
    }

    (Span::from(raw_start..raw_end), newlines_before)
}

/// Post comment of the extent ending last before the comment.
///
/// Refused when an extent opens between that end and the comment (the
/// comment is then inside something newer), and when any non-whitespace
/// text sits between the end and the comment's raw text. Re-emitting the
/// comment directly after the extent would move that text past the
/// comment's line break and could change the parse, so those comments
/// attach forward instead. Text belonging to an earlier post comment is
/// allowed, and so is any text when no extent ends later (nothing after
/// the comment could take it).
fn attach_to_preceding<T: Copy>(
    bytes: &[u8],
    raw_start: u32,
    prev_start_key: Option<u32>,
    prev_end: Option<(u32, ExtentRef<T>)>,
    has_following_end: bool,
    last_post_end: u32,
) -> Option<ExtentRef<T>> {
    let (prev_end_key, extent) = prev_end?;
    if prev_start_key.is_some_and(|key| key >= prev_end_key) {
        return None;
    }
    let mut i = raw_start as usize;
    while i != 0 {
        i -= 1;
        if !bytes[i].is_ascii_whitespace() {
            break;
        }
    }
    if i <= prev_end_key as usize || i < last_post_end as usize || !has_following_end {
        Some(extent)
    } else {
        None
    }
}

/// Pre comment of the next extent to start, provided no extent ends
/// between the comment and that start. A comment before the very first
/// extent always attaches to it.
fn attach_to_following<T: Copy>(
    next_start: Option<(u32, ExtentRef<T>)>,
    next_end_key: Option<u32>,
    has_preceding_start: bool,
) -> Option<ExtentRef<T>> {
    let (start_key, extent) = next_start?;
    if next_end_key.is_none_or(|key| key > start_key) {
        return Some(extent);
    }
    if !has_preceding_start {
        return Some(extent);
    }
    None
}

/// Fallback for a comment strictly inside overlapping extents: pre
/// comment of the smaller of the last extent to open and the first to
/// close. The size tie-break matters because at a shared offset only the
/// largest extent was recorded.
fn attach_to_enclosing<T: Copy>(
    next_start: Option<(u32, ExtentRef<T>)>,
    prev_start: Option<(u32, ExtentRef<T>)>,
    next_end: Option<(u32, ExtentRef<T>)>,
) -> Option<ExtentRef<T>> {
    let Some((_, open)) = prev_start else {
        return next_start.map(|(_, extent)| extent);
    };
    let (_, close) = next_end?;
    Some(if open.size > close.size { close } else { open })
}

/// Visitor over everything in a document a comment can attach to.
///
/// [`visit_attachable`] calls it in a fixed order, handing each element a
/// stable slot number, so one traversal can record extents and a second
/// can deliver the classified comments to the same slots.
trait AttachableVisitor {
    fn element(&mut self, slot: u32, locations: &RegionLocations, comments: &mut RegionComments);
    fn script(&mut self, slot: u32, script: &mut ScriptExpression);
}

fn visit_attachable(document: &mut Document, visitor: &mut impl AttachableVisitor) {
    let mut slot = 0u32;
    visit_element(
        &mut slot,
        &document.locations,
        &mut document.comments,
        visitor,
    );
    for pragma in &mut document.pragmas {
        visit_element(&mut slot, &pragma.locations, &mut pragma.comments, visitor);
    }
    for import in &mut document.imports {
        visit_element(&mut slot, &import.locations, &mut import.comments, visitor);
    }
    for component in &mut document.components {
        visit_component(&mut slot, component, visitor);
    }
}

fn visit_element(
    slot: &mut u32,
    locations: &RegionLocations,
    comments: &mut RegionComments,
    visitor: &mut impl AttachableVisitor,
) {
    visitor.element(*slot, locations, comments);
    *slot += 1;
}

fn visit_script(slot: &mut u32, script: &mut ScriptExpression, visitor: &mut impl AttachableVisitor) {
    visitor.script(*slot, script);
    *slot += 1;
}

fn visit_component(slot: &mut u32, component: &mut Component, visitor: &mut impl AttachableVisitor) {
    visit_element(
        slot,
        &component.locations,
        &mut component.comments,
        visitor,
    );
    for object in &mut component.objects {
        visit_object(slot, object, visitor);
    }
    for enumeration in &mut component.enumerations {
        visit_enumeration(slot, enumeration, visitor);
    }
    for sub_component in &mut component.sub_components {
        visit_component(slot, sub_component, visitor);
    }
}

fn visit_enumeration(
    slot: &mut u32,
    enumeration: &mut EnumDecl,
    visitor: &mut impl AttachableVisitor,
) {
    visit_element(
        slot,
        &enumeration.locations,
        &mut enumeration.comments,
        visitor,
    );
    for item in &mut enumeration.values {
        visit_element(slot, &item.locations, &mut item.comments, visitor);
    }
}

fn visit_object(slot: &mut u32, object: &mut QmlObject, visitor: &mut impl AttachableVisitor) {
    visit_element(slot, &object.locations, &mut object.comments, visitor);
    if let Some(id) = &mut object.id {
        visit_element(slot, &id.locations, &mut id.comments, visitor);
    }
    for definition in &mut object.property_defs {
        visit_element(
            slot,
            &definition.locations,
            &mut definition.comments,
            visitor,
        );
    }
    for binding in &mut object.bindings {
        visit_binding(slot, binding, visitor);
    }
    for method in &mut object.methods {
        visit_method(slot, method, visitor);
    }
    for child in &mut object.children {
        visit_object(slot, child, visitor);
    }
}

fn visit_binding(slot: &mut u32, binding: &mut Binding, visitor: &mut impl AttachableVisitor) {
    visit_element(slot, &binding.locations, &mut binding.comments, visitor);
    match &mut binding.value {
        BindingValue::Empty => {}
        BindingValue::Script(script) => visit_script(slot, script, visitor),
        BindingValue::Object(object) => visit_object(slot, object, visitor),
        BindingValue::Array(objects) => {
            for object in objects {
                visit_object(slot, object, visitor);
            }
        }
    }
}

fn visit_method(slot: &mut u32, method: &mut MethodInfo, visitor: &mut impl AttachableVisitor) {
    visit_element(slot, &method.locations, &mut method.comments, visitor);
    for parameter in &mut method.parameters {
        visit_element(slot, &parameter.locations, &mut parameter.comments, visitor);
        if let Some(value) = &mut parameter.value {
            visit_script(slot, value, visitor);
        }
        if let Some(default_value) = &mut parameter.default_value {
            visit_script(slot, default_value, visitor);
        }
    }
    if let Some(body) = &mut method.body {
        visit_script(slot, body, visitor);
    }
}

/// First traversal: records every element region and script node span.
struct RangeRecorder {
    ranges: ExtentRanges<DocumentTarget>,
}

impl AttachableVisitor for RangeRecorder {
    fn element(&mut self, slot: u32, locations: &RegionLocations, _comments: &mut RegionComments) {
        for (region, span) in locations.iter() {
            self.ranges.add(DocumentTarget::Region { slot, region }, span);
        }
    }

    fn script(&mut self, slot: u32, script: &mut ScriptExpression) {
        let ranges = &mut self.ranges;
        match script.ast() {
            ScriptAst::Expression(expression) => {
                ast_walker::walk_expression(expression, &mut |id, span| {
                    ranges.add(DocumentTarget::Node { slot, id }, span);
                });
            }
            ScriptAst::Statements(statements) => {
                ast_walker::walk_statements(statements, &mut |id, span| {
                    ranges.add(DocumentTarget::Node { slot, id }, span);
                });
            }
        }
    }
}

/// Second traversal: hands each slot the comments classified for it.
struct CommentApplier {
    pending: HashMap<u32, Vec<Placement<DocumentTarget>>>,
}

impl AttachableVisitor for CommentApplier {
    fn element(&mut self, slot: u32, _locations: &RegionLocations, comments: &mut RegionComments) {
        for placement in self.pending.remove(&slot).unwrap_or_default() {
            if let DocumentTarget::Region { region, .. } = placement.target {
                comments
                    .region_mut(region)
                    .add(placement.kind, placement.comment);
            }
        }
    }

    fn script(&mut self, slot: u32, script: &mut ScriptExpression) {
        for placement in self.pending.remove(&slot).unwrap_or_default() {
            if let DocumentTarget::Node { id, .. } = placement.target {
                script
                    .comments_mut()
                    .node_mut(id)
                    .add(placement.kind, placement.comment);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expression, Statement};
    use crate::source_analysis::{parse_expression_script, parse_script};

    fn collect(source: &str) -> (Vec<Statement>, CollectedComments) {
        let parsed = parse_script(source);
        assert!(parsed.is_clean(), "parse failed: {:?}", parsed.diagnostics);
        let collected = collect_script_comments(source, &parsed.statements, &parsed.comments);
        (parsed.statements, collected)
    }

    #[test]
    fn same_line_comment_attaches_after_statement() {
        let (statements, collected) = collect("a = 1; // done\nb = 2;");
        let element = collected.comments.get(statements[0].id()).unwrap();
        assert_eq!(element.post_comments().len(), 1);
        let comment = &element.post_comments()[0];
        assert_eq!(comment.raw(), " // done\n");
        assert_eq!(comment.newlines_before(), 0);
        assert!(collected.comments.get(statements[1].id()).is_none());
        assert!(collected.warnings.is_empty());
    }

    #[test]
    fn own_line_comment_attaches_to_following_statement() {
        let (statements, collected) = collect("a = 1;\n// next\nb = 2;");
        let element = collected.comments.get(statements[1].id()).unwrap();
        assert_eq!(element.pre_comments().len(), 1);
        let comment = &element.pre_comments()[0];
        assert_eq!(comment.raw(), "// next\n");
        assert_eq!(comment.newlines_before(), 1);
        assert!(collected.comments.get(statements[0].id()).is_none());
    }

    #[test]
    fn blank_line_before_comment_is_kept_once() {
        let (statements, collected) = collect("a = 1;\n\n\n\n// next\nb = 2;");
        let element = collected.comments.get(statements[1].id()).unwrap();
        assert_eq!(element.pre_comments()[0].newlines_before(), 2);
    }

    #[test]
    fn file_header_attaches_to_first_statement() {
        let (statements, collected) = collect("// header\na = 1;");
        let element = collected.comments.get(statements[0].id()).unwrap();
        assert_eq!(element.pre_comments().len(), 1);
        assert_eq!(element.pre_comments()[0].raw(), "// header\n");
        assert_eq!(element.pre_comments()[0].newlines_before(), 1);
    }

    #[test]
    fn trailing_comment_attaches_after_last_statement() {
        let (statements, collected) = collect("a = 1;\n// done");
        let element = collected.comments.get(statements[0].id()).unwrap();
        assert_eq!(element.post_comments().len(), 1);
        assert_eq!(element.post_comments()[0].raw(), "// done");
        assert_eq!(element.post_comments()[0].newlines_before(), 1);
    }

    #[test]
    fn comment_never_splits_an_expression() {
        // Attaching to `a` would re-emit as `a // now\n + b` and change
        // the parse, so the comment must go before `b`.
        let (statements, collected) = collect("a + // now\nb;");
        let Statement::Expression(statement) = &statements[0] else {
            panic!("expected an expression statement");
        };
        let Expression::Binary { left, right, .. } = &statement.expression else {
            panic!("expected a binary expression");
        };
        assert!(collected.comments.get(left.id()).is_none());
        let element = collected.comments.get(right.id()).unwrap();
        assert_eq!(element.pre_comments().len(), 1);
        assert_eq!(element.pre_comments()[0].newlines_before(), 0);
    }

    #[test]
    fn inline_block_comment_keeps_markers_and_spacing() {
        let (statements, collected) = collect("a = /* mid */ 1;");
        let Statement::Expression(statement) = &statements[0] else {
            panic!("expected an expression statement");
        };
        let Expression::Binary { right, .. } = &statement.expression else {
            panic!("expected an assignment");
        };
        let element = collected.comments.get(right.id()).unwrap();
        assert_eq!(element.pre_comments().len(), 1);
        assert_eq!(element.pre_comments()[0].raw(), " /* mid */ ");
    }

    #[test]
    fn run_of_trailing_comments_stays_on_one_statement() {
        // The second comment follows the first one's text, not the
        // statement, and still chains onto the statement as a post
        // comment instead of drifting inside the block.
        let (statements, collected) = collect("{\n    a = 1; // one\n    // two\n}");
        let Statement::Block(block) = &statements[0] else {
            panic!("expected a block");
        };
        let element = collected
            .comments
            .get(block.statements[0].id())
            .unwrap();
        assert_eq!(element.post_comments().len(), 2);
        assert!(element.post_comments()[1].raw().contains("// two"));
        assert!(collected.comments.get(block.id).is_none());
    }

    #[test]
    fn expression_comments_attach_to_expression_nodes() {
        let source = "width /* px */";
        let parsed = parse_expression_script(source);
        let collected = collect_expression_comments(source, &parsed.expression, &parsed.comments);
        let element = collected.comments.get(parsed.expression.id()).unwrap();
        assert_eq!(element.post_comments().len(), 1);
        assert_eq!(element.post_comments()[0].raw(), " /* px */");
    }

    #[test]
    fn comment_in_empty_script_becomes_warning() {
        let parsed = parse_script("// only this");
        assert!(parsed.statements.is_empty());
        let collected = collect_script_comments("// only this", &parsed.statements, &parsed.comments);
        assert!(collected.comments.is_empty());
        assert_eq!(collected.warnings.len(), 1);
    }

    #[test]
    fn malformed_comment_text_is_reported() {
        let parsed = parse_script("a = 1; /* open");
        let collected = collect_script_comments("a = 1; /* open", &parsed.statements, &parsed.comments);
        let element = collected.comments.get(parsed.statements[0].id()).unwrap();
        assert_eq!(element.post_comments().len(), 1);
        assert!(collected
            .warnings
            .iter()
            .any(|warning| warning.message.contains("unterminated")));
    }

    #[test]
    fn crlf_line_endings_count_as_single_breaks() {
        let (statements, collected) = collect("a = 1;\r\n\r\n// next\r\nb = 2;");
        let element = collected.comments.get(statements[1].id()).unwrap();
        assert_eq!(element.pre_comments().len(), 1);
        assert_eq!(element.pre_comments()[0].newlines_before(), 2);
    }
}
