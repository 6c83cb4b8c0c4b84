// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The document object model: a parsed Quill file as an element tree.
//!
//! A [`Document`] owns everything parsed from one file: pragmas, imports,
//! the root [`Component`](elements::Component) with its object tree, the
//! comments attached throughout, and the diagnostics the parse produced.
//! Parsing never fails; a broken file yields a partial tree plus errors.
//!
//! The tree writes itself back to text through an [`OutWriter`]. Each
//! element re-emits its keywords and names through named [`FileRegion`]s so
//! the comments attached to those regions come along, and embedded script
//! fragments are reformatted from their ASTs. [`Document::reformat`] wires
//! the two together and is the one call most tools need.

pub mod elements;
mod path;
pub mod regions;
pub mod script;

#[cfg(test)]
mod property_tests;

use camino::Utf8PathBuf;
use ecow::EcoString;

use crate::comments::{collect_document_comments, RegionComments};
use crate::source_analysis::{parse_document, Diagnostic, Severity, Span};
use crate::unparse::{LineWriterOptions, OutWriter, WriteOutcome};

use elements::{write_element, Component, Import, Pragma};

pub use path::{fields, Path, PathStep};
pub use regions::{FileRegion, RegionLocations};

/// A parsed document: the element tree of one Quill file.
///
/// The document keeps its source text alongside the tree. Element regions
/// and the spans of embedded script nodes are byte offsets into that text,
/// which is what lets comment attachment and source-order write-out reason
/// about the original layout after parsing.
#[derive(Debug, Clone)]
pub struct Document {
    /// Where the source came from. Only the file stem is interpreted (it
    /// names the components); the path is otherwise carried for callers.
    pub path: Utf8PathBuf,
    pub source: EcoString,
    pub pragmas: Vec<Pragma>,
    pub imports: Vec<Import>,
    /// The root component, when the file has one. Inline components are
    /// nested under it.
    pub components: Vec<Component>,
    /// Region locations of the document itself: a single `Main` region
    /// spanning the whole source.
    pub locations: RegionLocations,
    /// Comments attached to the document rather than to any element, such
    /// as the contents of an otherwise empty file.
    pub comments: RegionComments,
    pub diagnostics: Vec<Diagnostic>,
}

impl Document {
    /// Parses `source` into a document and attaches its comments.
    ///
    /// Never fails: parse and attachment problems end up in
    /// [`diagnostics`](Self::diagnostics) and the tree is as complete as
    /// the input allowed. The file stem of `path` names the root component;
    /// inline components hang off it as `Stem.Name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill_core::dom::Document;
    ///
    /// let document = Document::parse("Main.qml", "Item { width: 300 }");
    /// assert!(document.is_clean());
    /// assert_eq!(document.root_component().unwrap().name, "Main");
    /// ```
    #[must_use]
    pub fn parse(path: impl Into<Utf8PathBuf>, source: impl Into<EcoString>) -> Self {
        let source: EcoString = source.into();
        let parsed = parse_document(&source);
        let mut locations = RegionLocations::new();
        locations.record(FileRegion::Main, Span::from(0..source.len()));
        let mut document = Self {
            path: path.into(),
            source,
            pragmas: parsed.pragmas,
            imports: parsed.imports,
            components: parsed.components,
            locations,
            comments: RegionComments::new(),
            diagnostics: parsed.diagnostics,
        };
        document.name_components();
        let warnings = collect_document_comments(&mut document, &parsed.comments);
        document.diagnostics.extend(warnings);
        document
    }

    // The parser leaves component names open: the root is unnamed and
    // inline components carry a leading dot. The file stem fills the gap.
    fn name_components(&mut self) {
        let stem = self.path.file_stem().unwrap_or("");
        for component in &mut self.components {
            component.name = stem.into();
            for sub_component in &mut component.sub_components {
                sub_component.name = format!("{stem}{}", sub_component.name).into();
            }
        }
    }

    /// The root component, when the file has one.
    #[must_use]
    pub fn root_component(&self) -> Option<&Component> {
        self.components.first()
    }

    /// Returns true if the document parsed without errors. Warnings do not
    /// count; a document with only warnings still writes out faithfully.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics
            .iter()
            .all(|d| d.severity != Severity::Error)
    }

    /// Writes the document: pragmas, imports, a blank line, then the root
    /// component, ending with a final newline.
    pub fn write_out(&self, ow: &mut OutWriter) {
        write_element(ow, [], &self.comments, |ow| {
            let counter = ow.counter();
            for (index, pragma) in self.pragmas.iter().enumerate() {
                write_element(
                    ow,
                    [PathStep::Field(fields::PRAGMAS), PathStep::Index(index)],
                    &pragma.comments,
                    |ow| pragma.write_out(ow),
                );
            }
            for (index, import) in self.imports.iter().enumerate() {
                write_element(
                    ow,
                    [PathStep::Field(fields::IMPORTS), PathStep::Index(index)],
                    &import.comments,
                    |ow| import.write_out(ow),
                );
            }
            let mut spacer = None;
            if counter != ow.counter() {
                spacer = Some(ow.add_newlines_autospacer(2));
            }
            for (index, component) in self.components.iter().enumerate() {
                write_element(
                    ow,
                    [PathStep::Field(fields::COMPONENTS), PathStep::Index(index)],
                    &component.comments,
                    |ow| component.write_out(ow, &self.source),
                );
            }
            if let Some(id) = spacer.take() {
                ow.remove_text_add_callback(id);
            }
        });
        ow.ensure_newline(1);
    }

    /// Formats the document to text in one call.
    ///
    /// Best effort: local problems (a binding with no value, a script that
    /// never parsed) become entries in [`WriteOutcome::failures`] while the
    /// rest of the file is still written.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill_core::dom::Document;
    /// use quill_core::unparse::LineWriterOptions;
    ///
    /// let document = Document::parse("Main.qml", "Item{width:640}");
    /// let outcome = document.reformat(&LineWriterOptions::default());
    /// assert_eq!(outcome.text, "Item {\n    width: 640\n}\n");
    /// ```
    #[must_use]
    pub fn reformat(&self, options: &LineWriterOptions) -> WriteOutcome {
        let mut ow = OutWriter::new(options.clone());
        self.write_out(&mut ow);
        ow.finish()
    }
}
