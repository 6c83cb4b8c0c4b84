// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Named sub-regions of declarative constructs.
//!
//! A DOM element covers a span of source, but callers frequently need to talk
//! about a smaller piece of it: the `:` of a binding, the `property` keyword
//! of a property definition, the closing brace of an object. [`FileRegion`]
//! enumerates every such position, and [`RegionLocations`] records where each
//! region of one element actually sits in the source text.
//!
//! Regions serve two masters. The document parser records them so that
//! write-out ordering and comment attachment can work from real source
//! offsets, and [`OutWriter::write_region`](crate::unparse::OutWriter)
//! re-emits the fixed tokens (keywords, punctuation) from the same table so
//! output and attachment stay in sync.

use std::collections::BTreeMap;
use std::fmt;

use crate::source_analysis::Span;

/// A named sub-position inside a declarative construct.
///
/// `Main` is special: it always denotes the full span of the element and is
/// present for every element the parser produced. All other regions are
/// optional and only meaningful relative to the construct kind (`OnTarget`
/// makes sense for a binding, `EnumValue` for an enum item, and so on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileRegion {
    /// The whole element, start of first token to end of last.
    Main,
    AsToken,
    ColonToken,
    CommaToken,
    ComponentKeyword,
    ComponentName,
    DefaultKeyword,
    EllipsisToken,
    EnumKeyword,
    EnumValue,
    EqualToken,
    FunctionKeyword,
    IdColonToken,
    IdName,
    IdToken,
    /// The element's own name: binding name, property name, method name.
    Identifier,
    ImportKeyword,
    ImportUri,
    LeftBrace,
    LeftBracket,
    LeftParen,
    OnToken,
    OnTarget,
    PragmaKeyword,
    PragmaValues,
    PropertyKeyword,
    ReadonlyKeyword,
    RequiredKeyword,
    RightBrace,
    RightBracket,
    RightParen,
    SignalKeyword,
    TypeIdentifier,
    Version,
}

impl FileRegion {
    /// The fixed source text of this region, for regions that always spell
    /// the same way (keywords and punctuation). Name-like regions return
    /// `None`; their text comes from the element that owns them.
    pub fn canonical_text(self) -> Option<&'static str> {
        match self {
            FileRegion::AsToken => Some("as"),
            FileRegion::ColonToken | FileRegion::IdColonToken => Some(":"),
            FileRegion::CommaToken => Some(","),
            FileRegion::ComponentKeyword => Some("component"),
            FileRegion::DefaultKeyword => Some("default"),
            FileRegion::EllipsisToken => Some("..."),
            FileRegion::EnumKeyword => Some("enum"),
            FileRegion::EqualToken => Some("="),
            FileRegion::FunctionKeyword => Some("function"),
            FileRegion::IdToken => Some("id"),
            FileRegion::ImportKeyword => Some("import"),
            FileRegion::LeftBrace => Some("{"),
            FileRegion::LeftBracket => Some("["),
            FileRegion::LeftParen => Some("("),
            FileRegion::OnToken => Some("on"),
            FileRegion::PragmaKeyword => Some("pragma"),
            FileRegion::PropertyKeyword => Some("property"),
            FileRegion::ReadonlyKeyword => Some("readonly"),
            FileRegion::RequiredKeyword => Some("required"),
            FileRegion::RightBrace => Some("}"),
            FileRegion::RightBracket => Some("]"),
            FileRegion::RightParen => Some(")"),
            FileRegion::SignalKeyword => Some("signal"),
            FileRegion::Main
            | FileRegion::ComponentName
            | FileRegion::EnumValue
            | FileRegion::Identifier
            | FileRegion::IdName
            | FileRegion::ImportUri
            | FileRegion::OnTarget
            | FileRegion::PragmaValues
            | FileRegion::TypeIdentifier
            | FileRegion::Version => None,
        }
    }

    /// Stable lower-camel name, used in diagnostics and dumps.
    pub fn name(self) -> &'static str {
        match self {
            FileRegion::Main => "main",
            FileRegion::AsToken => "asToken",
            FileRegion::ColonToken => "colonToken",
            FileRegion::CommaToken => "commaToken",
            FileRegion::ComponentKeyword => "componentKeyword",
            FileRegion::ComponentName => "componentName",
            FileRegion::DefaultKeyword => "defaultKeyword",
            FileRegion::EllipsisToken => "ellipsisToken",
            FileRegion::EnumKeyword => "enumKeyword",
            FileRegion::EnumValue => "enumValue",
            FileRegion::EqualToken => "equalToken",
            FileRegion::FunctionKeyword => "functionKeyword",
            FileRegion::IdColonToken => "idColonToken",
            FileRegion::IdName => "idName",
            FileRegion::IdToken => "idToken",
            FileRegion::Identifier => "identifier",
            FileRegion::ImportKeyword => "importKeyword",
            FileRegion::ImportUri => "importUri",
            FileRegion::LeftBrace => "leftBrace",
            FileRegion::LeftBracket => "leftBracket",
            FileRegion::LeftParen => "leftParen",
            FileRegion::OnToken => "onToken",
            FileRegion::OnTarget => "onTarget",
            FileRegion::PragmaKeyword => "pragmaKeyword",
            FileRegion::PragmaValues => "pragmaValues",
            FileRegion::PropertyKeyword => "propertyKeyword",
            FileRegion::ReadonlyKeyword => "readonlyKeyword",
            FileRegion::RequiredKeyword => "requiredKeyword",
            FileRegion::RightBrace => "rightBrace",
            FileRegion::RightBracket => "rightBracket",
            FileRegion::RightParen => "rightParen",
            FileRegion::SignalKeyword => "signalKeyword",
            FileRegion::TypeIdentifier => "typeIdentifier",
            FileRegion::Version => "version",
        }
    }
}

impl fmt::Display for FileRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source locations of the regions of one DOM element.
///
/// Filled in by the document parser as it consumes tokens. At most one span
/// per region; re-recording a region keeps the first span, which matters for
/// repeated regions like the commas of a parameter list (the first one is as
/// good an anchor as any).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionLocations {
    regions: BTreeMap<FileRegion, Span>,
}

impl RegionLocations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records where a region landed. First write wins.
    pub fn record(&mut self, region: FileRegion, span: Span) {
        self.regions.entry(region).or_insert(span);
    }

    /// Re-records the full span of the element, widening if already present.
    pub fn extend_main(&mut self, span: Span) {
        self.regions
            .entry(FileRegion::Main)
            .and_modify(|main| *main = main.merge(span))
            .or_insert(span);
    }

    pub fn get(&self, region: FileRegion) -> Option<Span> {
        self.regions.get(&region).copied()
    }

    /// The full span of the element, if the parser recorded one.
    pub fn main(&self) -> Option<Span> {
        self.get(FileRegion::Main)
    }

    /// Start offset of the element in the original source. Elements created
    /// programmatically (never parsed) have no location and sort last in
    /// preserve-order write-out.
    pub fn start_offset(&self) -> u32 {
        self.main().map_or(u32::MAX, |span| span.start())
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FileRegion, Span)> + '_ {
        self.regions.iter().map(|(&region, &span)| (region, span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_text_covers_fixed_tokens() {
        assert_eq!(FileRegion::ColonToken.canonical_text(), Some(":"));
        assert_eq!(FileRegion::LeftBrace.canonical_text(), Some("{"));
        assert_eq!(FileRegion::PropertyKeyword.canonical_text(), Some("property"));
        assert_eq!(FileRegion::Identifier.canonical_text(), None);
        assert_eq!(FileRegion::Main.canonical_text(), None);
    }

    #[test]
    fn record_keeps_first_span() {
        let mut locations = RegionLocations::new();
        locations.record(FileRegion::CommaToken, Span::new(4, 5));
        locations.record(FileRegion::CommaToken, Span::new(9, 10));
        assert_eq!(locations.get(FileRegion::CommaToken), Some(Span::new(4, 5)));
    }

    #[test]
    fn extend_main_widens() {
        let mut locations = RegionLocations::new();
        locations.extend_main(Span::new(10, 20));
        locations.extend_main(Span::new(5, 15));
        assert_eq!(locations.main(), Some(Span::new(5, 20)));
        assert_eq!(locations.start_offset(), 5);
    }

    #[test]
    fn missing_main_sorts_last() {
        let locations = RegionLocations::new();
        assert_eq!(locations.start_offset(), u32::MAX);
    }
}
