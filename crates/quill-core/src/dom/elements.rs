// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Structured elements of a declarative document.
//!
//! A parsed document decomposes into [`Pragma`]s, [`Import`]s and
//! [`Component`]s; each component holds a tree of [`QmlObject`]s carrying
//! [`PropertyDefinition`]s, [`Binding`]s, [`MethodInfo`]s, enumerations and
//! child objects. Every element knows how to write itself back to source
//! through an [`OutWriter`], re-emitting the comments attached to its
//! regions as it goes.
//!
//! Object attributes are written in one of two orders, selected by
//! [`AttributesOrder`]: the canonical grouping (id, enumerations, property
//! definitions, signals, methods, bindings, children), with blank lines
//! inserted between groups through the writer's autospacers, or the order
//! the attributes had in the original source, with blank lines recovered by
//! looking at the text above each element. In both modes a property
//! definition and a compatible binding of the same name collapse into a
//! single `property type name: value` line.

use std::collections::BTreeMap;

use ecow::EcoString;

use crate::comments::RegionComments;
use crate::unparse::{AttributesOrder, OutWriter, SpacerId};

use super::path::{fields, PathStep};
use super::regions::{FileRegion, RegionLocations};
use super::script::ScriptExpression;

/// Writes one element: opens an item frame for it, emits the comments
/// attached before it, the body, and the comments attached after it.
pub(crate) fn write_element(
    ow: &mut OutWriter,
    steps: impl IntoIterator<Item = PathStep>,
    comments: &RegionComments,
    body: impl FnOnce(&mut OutWriter),
) {
    ow.item_start(steps);
    comments.write_pre(ow, FileRegion::Main);
    body(ow);
    comments.write_post(ow, FileRegion::Main);
    ow.item_end();
}

/// Position of an element within the group of same-named siblings that
/// precede it, used as the index step of its canonical path.
fn index_in_group<T>(items: &[T], position: usize, name: fn(&T) -> &str) -> usize {
    let target = name(&items[position]);
    items[..position]
        .iter()
        .filter(|item| name(item) == target)
        .count()
}

/// The `id: name` attribute of an object.
#[derive(Debug, Clone, Default)]
pub struct Id {
    pub name: EcoString,
    pub locations: RegionLocations,
    pub comments: RegionComments,
}

impl Id {
    pub fn new(name: impl Into<EcoString>) -> Self {
        Self {
            name: name.into(),
            locations: RegionLocations::new(),
            comments: RegionComments::new(),
        }
    }
}

/// A `pragma Name` or `pragma Name: value, value` directive.
#[derive(Debug, Clone, Default)]
pub struct Pragma {
    pub name: EcoString,
    pub values: Vec<EcoString>,
    pub locations: RegionLocations,
    pub comments: RegionComments,
}

impl Pragma {
    pub fn new(name: impl Into<EcoString>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            locations: RegionLocations::new(),
            comments: RegionComments::new(),
        }
    }

    pub fn write_out(&self, ow: &mut OutWriter) {
        ow.ensure_newline(1);
        self.comments.write_region(ow, FileRegion::PragmaKeyword);
        ow.space();
        self.comments
            .write_region_text(ow, FileRegion::Identifier, &self.name);
        for (i, value) in self.values.iter().enumerate() {
            if i == 0 {
                self.comments
                    .write_region_text(ow, FileRegion::ColonToken, ": ");
            } else {
                self.comments
                    .write_region_text(ow, FileRegion::CommaToken, ", ");
            }
            self.comments
                .write_region_text(ow, FileRegion::PragmaValues, value);
        }
        ow.ensure_newline(1);
    }
}

/// A module version as spelled after an import uri.
///
/// Negative components carry meaning: `LATEST` stands for an import with
/// no version tokens at all, `UNDEFINED` for a component that was left
/// out, as in `import Shapes 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: i32,
    pub minor: i32,
}

impl Version {
    pub const UNDEFINED: i32 = -1;
    pub const LATEST: i32 = -2;

    pub fn new(major: i32, minor: i32) -> Self {
        Self { major, minor }
    }

    pub fn latest() -> Self {
        Self::new(Self::LATEST, Self::LATEST)
    }

    /// Parses `"2.15"`, `"2"` or `""` (meaning latest). Components that
    /// fail to parse become `UNDEFINED`.
    pub fn from_string(text: &str) -> Self {
        if text.is_empty() {
            return Self::latest();
        }
        let mut parts = text.splitn(2, '.');
        let major = parts
            .next()
            .and_then(|part| part.parse().ok())
            .unwrap_or(Self::UNDEFINED);
        let minor = parts
            .next()
            .and_then(|part| part.parse().ok())
            .unwrap_or(Self::UNDEFINED);
        Self::new(major, minor)
    }

    pub fn is_latest(&self) -> bool {
        self.major == Self::LATEST && self.minor == Self::LATEST
    }

    pub fn is_valid(&self) -> bool {
        self.major >= 0 && self.minor >= 0
    }

    /// The source spelling: empty for latest, `"2"` when only the major
    /// component is known, `"2.15"` when both are.
    pub fn string_value(&self) -> EcoString {
        if self.is_latest() {
            return EcoString::new();
        }
        if self.minor < 0 {
            if self.major < 0 {
                return ".".into();
            }
            return format!("{}", self.major).into();
        }
        if self.major < 0 {
            return format!(".{}", self.minor).into();
        }
        format!("{}.{}", self.major, self.minor).into()
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::new(Self::UNDEFINED, Self::UNDEFINED)
    }
}

/// What an import names: a dotted module identifier or a quoted directory
/// path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportUri {
    Module(EcoString),
    Directory(EcoString),
}

impl ImportUri {
    /// Classifies the uri as it appeared in source: quoted text is a
    /// directory path (quotes and escapes removed), anything else a
    /// module identifier.
    pub fn from_import_text(text: &str) -> Self {
        if let Some(inner) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
            ImportUri::Directory(inner.replace("\\\"", "\"").replace("\\\\", "\\").into())
        } else {
            ImportUri::Module(text.into())
        }
    }

    pub fn is_module(&self) -> bool {
        matches!(self, ImportUri::Module(_))
    }
}

impl std::fmt::Display for ImportUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportUri::Module(uri) => f.write_str(uri),
            ImportUri::Directory(path) => {
                write!(f, "\"{}\"", path.replace("\\", "\\\\").replace("\"", "\\\""))
            }
        }
    }
}

/// An `import` statement.
///
/// Implicit imports (the surrounding directory, built-in modules) exist as
/// elements so tooling can see them, but are skipped on write-out.
#[derive(Debug, Clone)]
pub struct Import {
    pub uri: ImportUri,
    pub version: Version,
    /// The alias after `as`, if any.
    pub import_id: Option<EcoString>,
    pub implicit: bool,
    pub locations: RegionLocations,
    pub comments: RegionComments,
}

impl Import {
    pub fn module(uri: impl Into<EcoString>, version: Version) -> Self {
        Self {
            uri: ImportUri::Module(uri.into()),
            version,
            import_id: None,
            implicit: false,
            locations: RegionLocations::new(),
            comments: RegionComments::new(),
        }
    }

    pub fn directory(path: impl Into<EcoString>) -> Self {
        Self {
            uri: ImportUri::Directory(path.into()),
            version: Version::latest(),
            import_id: None,
            implicit: false,
            locations: RegionLocations::new(),
            comments: RegionComments::new(),
        }
    }

    pub fn write_out(&self, ow: &mut OutWriter) {
        if self.implicit {
            return;
        }
        ow.ensure_newline(1);
        self.comments.write_region(ow, FileRegion::ImportKeyword);
        ow.space();
        self.comments
            .write_region_text(ow, FileRegion::ImportUri, &self.uri.to_string());
        if self.uri.is_module() {
            let version = self.version.string_value();
            if !version.is_empty() {
                ow.space();
                ow.write(&version);
            }
        }
        if let Some(alias) = &self.import_id {
            ow.space();
            self.comments.write_region(ow, FileRegion::AsToken);
            ow.space();
            self.comments
                .write_region_text(ow, FileRegion::Identifier, alias);
        }
    }
}

/// One name of an enumeration, with its resolved value.
#[derive(Debug, Clone, Default)]
pub struct EnumItem {
    pub name: EcoString,
    pub value: i64,
    pub locations: RegionLocations,
    pub comments: RegionComments,
}

impl EnumItem {
    pub fn new(name: impl Into<EcoString>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
            locations: RegionLocations::new(),
            comments: RegionComments::new(),
        }
    }

    /// Writes `Name`, `Name = value` or `Name,`. The explicit value is
    /// suppressed when it is the one the position implies anyway (zero
    /// for the first item, predecessor plus one after that).
    pub fn write_out(&self, ow: &mut OutWriter, previous_value: Option<i64>, is_last: bool) {
        ow.ensure_newline(1);
        self.comments
            .write_region_text(ow, FileRegion::Identifier, &self.name);
        let implied = previous_value.map_or(self.value == 0, |previous| {
            previous.checked_add(1) == Some(self.value)
        });
        if !implied {
            ow.space();
            self.comments.write_region(ow, FileRegion::EqualToken);
            ow.space();
            self.comments
                .write_region_text(ow, FileRegion::EnumValue, &self.value.to_string());
        }
        if !is_last {
            self.comments.write_region(ow, FileRegion::CommaToken);
        }
    }
}

/// An `enum Name { ... }` declaration.
#[derive(Debug, Clone, Default)]
pub struct EnumDecl {
    pub name: EcoString,
    pub values: Vec<EnumItem>,
    pub locations: RegionLocations,
    pub comments: RegionComments,
}

impl EnumDecl {
    pub fn new(name: impl Into<EcoString>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            locations: RegionLocations::new(),
            comments: RegionComments::new(),
        }
    }

    pub fn write_out(&self, ow: &mut OutWriter) {
        self.comments.write_region(ow, FileRegion::EnumKeyword);
        ow.space();
        self.comments
            .write_region_text(ow, FileRegion::Identifier, &self.name);
        ow.space();
        self.comments.write_region(ow, FileRegion::LeftBrace);
        let base = ow.increase_indent(1);
        let count = self.values.len();
        for (i, item) in self.values.iter().enumerate() {
            ow.ensure_newline(1);
            let previous_value = (i > 0).then(|| self.values[i - 1].value);
            write_element(
                ow,
                [PathStep::Field(fields::VALUES), PathStep::Index(i)],
                &item.comments,
                |ow| item.write_out(ow, previous_value, i + 1 == count),
            );
        }
        ow.decrease_indent(1, base);
        ow.ensure_newline(1);
        self.comments.write_region(ow, FileRegion::RightBrace);
    }
}

/// A `property` declaration, without its value.
///
/// The value, when one was given on the same line, is a separate
/// [`Binding`] of the same name; write-out merges the two back together.
#[derive(Debug, Clone, Default)]
pub struct PropertyDefinition {
    pub name: EcoString,
    /// Declared type, empty for bare `required name` forms.
    pub type_name: EcoString,
    pub is_default_member: bool,
    pub is_required: bool,
    pub is_readonly: bool,
    pub locations: RegionLocations,
    pub comments: RegionComments,
}

impl PropertyDefinition {
    pub fn new(name: impl Into<EcoString>, type_name: impl Into<EcoString>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_default_member: false,
            is_required: false,
            is_readonly: false,
            locations: RegionLocations::new(),
            comments: RegionComments::new(),
        }
    }

    /// A generic type like `list<Item>`. Parametric types bind arrays,
    /// plain object types bind single objects; the merge rules differ.
    pub fn is_parametric_type(&self) -> bool {
        self.type_name.contains('<')
    }

    pub fn write_out(&self, ow: &mut OutWriter) {
        ow.ensure_newline(1);
        if self.is_default_member {
            self.comments.write_region(ow, FileRegion::DefaultKeyword);
            ow.space();
        }
        if self.is_required {
            self.comments.write_region(ow, FileRegion::RequiredKeyword);
            ow.space();
        }
        if self.is_readonly {
            self.comments.write_region(ow, FileRegion::ReadonlyKeyword);
            ow.space();
        }
        if !self.type_name.is_empty() {
            self.comments.write_region(ow, FileRegion::PropertyKeyword);
            ow.space();
            self.comments
                .write_region_text(ow, FileRegion::TypeIdentifier, &self.type_name);
            ow.space();
        }
        self.comments
            .write_region_text(ow, FileRegion::Identifier, &self.name);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodType {
    Signal,
    Method,
}

/// One parameter of a method or signal.
///
/// Either `name` is set (with optional type, rest marker and default
/// value) or `value` holds a destructuring pattern.
#[derive(Debug, Clone)]
pub struct MethodParameter {
    pub name: EcoString,
    pub type_name: EcoString,
    pub is_rest: bool,
    pub default_value: Option<ScriptExpression>,
    /// Destructuring pattern for nameless parameters.
    pub value: Option<ScriptExpression>,
    pub locations: RegionLocations,
    pub comments: RegionComments,
}

impl MethodParameter {
    pub fn new(name: impl Into<EcoString>, type_name: impl Into<EcoString>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_rest: false,
            default_value: None,
            value: None,
            locations: RegionLocations::new(),
            comments: RegionComments::new(),
        }
    }

    pub fn write_out(&self, ow: &mut OutWriter) {
        if !self.name.is_empty() {
            if self.is_rest {
                self.comments.write_region(ow, FileRegion::EllipsisToken);
            }
            self.comments
                .write_region_text(ow, FileRegion::Identifier, &self.name);
            if !self.type_name.is_empty() {
                self.comments.write_region(ow, FileRegion::ColonToken);
                ow.space();
                self.comments
                    .write_region_text(ow, FileRegion::TypeIdentifier, &self.type_name);
            }
            if let Some(default_value) = &self.default_value {
                ow.space();
                self.comments.write_region(ow, FileRegion::EqualToken);
                ow.space();
                ow.item_start([PathStep::Field(fields::DEFAULT_VALUE)]);
                default_value.write_out(ow);
                ow.item_end();
            }
        } else if let Some(value) = &self.value {
            ow.item_start([PathStep::Field(fields::VALUE)]);
            value.write_out(ow);
            ow.item_end();
        }
    }

    /// Signal parameters spell as `type name`; they carry no default
    /// values or patterns.
    pub fn write_out_signal(&self, ow: &mut OutWriter) {
        if !self.type_name.is_empty() {
            self.comments
                .write_region_text(ow, FileRegion::TypeIdentifier, &self.type_name);
            ow.space();
        }
        self.comments
            .write_region_text(ow, FileRegion::Identifier, &self.name);
    }
}

/// A `signal name(...)` or `function name(...) { ... }` member.
#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub name: EcoString,
    /// Return type for methods, empty when none was declared.
    pub type_name: EcoString,
    pub method_type: MethodType,
    pub parameters: Vec<MethodParameter>,
    pub body: Option<ScriptExpression>,
    pub locations: RegionLocations,
    pub comments: RegionComments,
}

impl MethodInfo {
    pub fn new(name: impl Into<EcoString>, method_type: MethodType) -> Self {
        Self {
            name: name.into(),
            type_name: EcoString::new(),
            method_type,
            parameters: Vec::new(),
            body: None,
            locations: RegionLocations::new(),
            comments: RegionComments::new(),
        }
    }

    pub fn write_out(&self, ow: &mut OutWriter) {
        match self.method_type {
            MethodType::Signal => {
                if self.body.is_some() {
                    ow.add_failure(format!("signal {} should not have a body", self.name));
                }
                self.comments.write_region(ow, FileRegion::SignalKeyword);
                ow.space();
                self.comments
                    .write_region_text(ow, FileRegion::Identifier, &self.name);
                if self.parameters.is_empty() {
                    return;
                }
                self.comments.write_region(ow, FileRegion::LeftParen);
                let base = ow.increase_indent(1);
                for (i, parameter) in self.parameters.iter().enumerate() {
                    if i > 0 {
                        ow.write(", ");
                    }
                    write_element(
                        ow,
                        [PathStep::Field(fields::PARAMETERS), PathStep::Index(i)],
                        &parameter.comments,
                        |ow| parameter.write_out_signal(ow),
                    );
                }
                self.comments.write_region(ow, FileRegion::RightParen);
                ow.decrease_indent(1, base);
            }
            MethodType::Method => {
                self.comments.write_region(ow, FileRegion::FunctionKeyword);
                ow.space();
                self.comments
                    .write_region_text(ow, FileRegion::Identifier, &self.name);
                self.comments.write_region(ow, FileRegion::LeftParen);
                for (i, parameter) in self.parameters.iter().enumerate() {
                    if i > 0 {
                        ow.write(", ");
                    }
                    write_element(
                        ow,
                        [PathStep::Field(fields::PARAMETERS), PathStep::Index(i)],
                        &parameter.comments,
                        |ow| parameter.write_out(ow),
                    );
                }
                self.comments.write_region(ow, FileRegion::RightParen);
                if !self.type_name.is_empty() {
                    self.comments.write_region(ow, FileRegion::ColonToken);
                    ow.space();
                    self.comments
                        .write_region_text(ow, FileRegion::TypeIdentifier, &self.type_name);
                }
                ow.ensure_space();
                self.comments.write_region(ow, FileRegion::LeftBrace);
                let base = ow.increase_indent(1);
                if let Some(body) = &self.body {
                    ow.ensure_newline(1);
                    ow.item_start([PathStep::Field(fields::BODY)]);
                    body.write_out(ow);
                    ow.item_end();
                }
                ow.decrease_indent(1, base);
                ow.ensure_newline(1);
                self.comments.write_region(ow, FileRegion::RightBrace);
            }
        }
    }
}

/// How a binding was spelled: `name: value` or `Type on name { ... }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingType {
    Normal,
    On,
}

/// The right-hand side of a binding. Exactly one payload is live.
#[derive(Debug, Clone, Default)]
pub enum BindingValue {
    #[default]
    Empty,
    Object(Box<QmlObject>),
    Script(ScriptExpression),
    Array(Vec<QmlObject>),
}

impl BindingValue {
    /// Whether this value may be folded onto a property definition of the
    /// same name during write-out. Script values always merge; arrays only
    /// onto parametric types, single objects only onto plain ones, and
    /// never onto the default member.
    fn merges_with(&self, definition: &PropertyDefinition) -> bool {
        match self {
            BindingValue::Script(_) => true,
            BindingValue::Array(_) => {
                !definition.is_default_member && definition.is_parametric_type()
            }
            BindingValue::Object(_) => {
                !definition.is_default_member && !definition.is_parametric_type()
            }
            BindingValue::Empty => false,
        }
    }
}

/// A binding of a value to a property or signal handler name.
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: EcoString,
    pub value: BindingValue,
    pub binding_type: BindingType,
    pub locations: RegionLocations,
    pub comments: RegionComments,
}

impl Binding {
    pub fn new(name: impl Into<EcoString>, value: BindingValue, binding_type: BindingType) -> Self {
        Self {
            name: name.into(),
            value,
            binding_type,
            locations: RegionLocations::new(),
            comments: RegionComments::new(),
        }
    }

    /// True for handler names like `onClicked` (or `Keys.onPressed`): an
    /// `on` prefix followed by an uppercase letter.
    pub fn is_signal_handler(&self) -> bool {
        let name = self.name.rsplit('.').next().unwrap_or("");
        let mut chars = name.chars();
        chars.next() == Some('o')
            && chars.next() == Some('n')
            && chars.next().is_some_and(char::is_uppercase)
    }

    pub fn write_out(&self, ow: &mut OutWriter, source: &str) {
        ow.ensure_newline(1);
        match self.binding_type {
            BindingType::Normal => {
                self.comments
                    .write_region_text(ow, FileRegion::Identifier, &self.name);
                self.comments.write_region(ow, FileRegion::ColonToken);
                ow.space();
                self.write_out_value(ow, source);
            }
            BindingType::On => match &self.value {
                BindingValue::Object(object) => {
                    write_element(
                        ow,
                        [PathStep::Field(fields::VALUE)],
                        &object.comments,
                        |ow| object.write_out(ow, source, None, Some(&self.name)),
                    );
                }
                _ => {
                    ow.add_failure(format!(
                        "on binding {} requires an object value",
                        self.name
                    ));
                }
            },
        }
    }

    /// Writes just the value, as used both after `name:` and after a
    /// merged property definition. An empty value becomes a `{}`
    /// placeholder so the output stays parseable.
    pub fn write_out_value(&self, ow: &mut OutWriter, source: &str) {
        match &self.value {
            BindingValue::Empty => {
                ow.add_failure(format!("writing of empty binding {}", self.name));
                ow.write("{}");
            }
            BindingValue::Script(script) => {
                ow.item_start([PathStep::Field(fields::VALUE)]);
                script.write_out(ow);
                ow.item_end();
            }
            BindingValue::Object(object) => {
                write_element(
                    ow,
                    [PathStep::Field(fields::VALUE)],
                    &object.comments,
                    |ow| object.write_out(ow, source, None, None),
                );
            }
            BindingValue::Array(objects) => {
                self.comments.write_region(ow, FileRegion::LeftBracket);
                let base = ow.increase_indent(1);
                for (i, object) in objects.iter().enumerate() {
                    if i > 0 {
                        ow.write(",");
                    }
                    ow.ensure_newline(1);
                    write_element(
                        ow,
                        [PathStep::Field(fields::VALUE), PathStep::Index(i)],
                        &object.comments,
                        |ow| object.write_out(ow, source, None, None),
                    );
                }
                ow.decrease_indent(1, base);
                ow.ensure_newline(1);
                self.comments.write_region(ow, FileRegion::RightBracket);
            }
        }
    }
}

/// Extra context handed to the root object of a component: the
/// enumerations and inline sub-components declared at component level are
/// written inside the root object's braces.
#[derive(Debug, Clone, Copy)]
pub struct RootContext<'a> {
    pub enumerations: &'a [EnumDecl],
    pub sub_components: &'a [Component],
}

/// One attribute of an object, unified for source-order write-out.
enum Attribute<'a> {
    Enumeration { index: usize, decl: &'a EnumDecl },
    PropertyDef { index: usize, def: &'a PropertyDefinition },
    Binding { index: usize, binding: &'a Binding },
    Method { index: usize, method: &'a MethodInfo },
    Child { index: usize, object: &'a QmlObject },
    SubComponent { index: usize, component: &'a Component },
}

impl Attribute<'_> {
    /// Tie-break for attributes at the same source offset (in practice:
    /// elements added programmatically, which have none). Follows the
    /// canonical group order.
    fn precedence(&self) -> u8 {
        match self {
            Attribute::Enumeration { .. } => 0,
            Attribute::PropertyDef { .. } => 1,
            Attribute::Method { .. } => 2,
            Attribute::Binding { .. } => 3,
            Attribute::Child { .. } => 4,
            Attribute::SubComponent { .. } => 5,
        }
    }
}

/// Line breaks to put before an element when preserving source order: what
/// the original text had, capped at one blank line, and at least one line
/// break for elements with no source position.
fn preserved_newlines_before(source: &str, offset: u32) -> u32 {
    let mut newlines = 0;
    if offset != u32::MAX && source.len() >= offset as usize {
        let bytes = source.as_bytes();
        let mut i = offset as usize;
        while i > 0 {
            i -= 1;
            if bytes[i] == b'\n' {
                newlines += 1;
                if newlines == 2 {
                    break;
                }
            } else if !bytes[i].is_ascii_whitespace() {
                break;
            }
        }
    }
    newlines.max(1)
}

/// An object instantiation: `Rectangle { ... }`.
#[derive(Debug, Clone)]
pub struct QmlObject {
    /// The instantiated type name.
    pub name: EcoString,
    pub id: Option<Id>,
    pub property_defs: Vec<PropertyDefinition>,
    pub bindings: Vec<Binding>,
    pub methods: Vec<MethodInfo>,
    pub children: Vec<QmlObject>,
    pub locations: RegionLocations,
    pub comments: RegionComments,
}

impl QmlObject {
    pub fn new(name: impl Into<EcoString>) -> Self {
        Self {
            name: name.into(),
            id: None,
            property_defs: Vec::new(),
            bindings: Vec::new(),
            methods: Vec::new(),
            children: Vec::new(),
            locations: RegionLocations::new(),
            comments: RegionComments::new(),
        }
    }

    /// The first binding of `name` spelled with a colon, along with its
    /// position among same-named bindings. Merge candidates are looked up
    /// here; an incompatible first candidate blocks the merge entirely.
    fn first_normal_binding(&self, name: &str) -> Option<(usize, &Binding)> {
        let mut index = 0;
        for binding in &self.bindings {
            if binding.name != name {
                continue;
            }
            if binding.binding_type == BindingType::Normal {
                return Some((index, binding));
            }
            index += 1;
        }
        None
    }

    /// Writes the object. `source` is the text of the file the object was
    /// parsed from, consulted to recover blank lines in source-order mode;
    /// pass an empty string for objects built programmatically. `root` is
    /// only given to the root object of a component, `on_target` only by
    /// an `on` binding.
    pub fn write_out(
        &self,
        ow: &mut OutWriter,
        source: &str,
        root: Option<RootContext<'_>>,
        on_target: Option<&str>,
    ) {
        self.comments
            .write_region_text(ow, FileRegion::Identifier, &self.name);
        if let Some(target) = on_target {
            ow.space();
            self.comments.write_region(ow, FileRegion::OnToken);
            ow.space();
            self.comments
                .write_region_text(ow, FileRegion::OnTarget, target);
        }
        ow.ensure_space();
        self.comments.write_region(ow, FileRegion::LeftBrace);
        ow.newline();
        let base_indent = ow.increase_indent(1);
        self.write_id(ow);
        let counter = ow.counter();
        if ow.options().attributes_order == AttributesOrder::Preserve {
            self.write_attributes_source_order(ow, source, root);
        } else {
            self.write_attributes_normalized(ow, source, counter, root);
        }
        ow.decrease_indent(1, base_indent);
        ow.ensure_newline(1);
        self.comments.write_region(ow, FileRegion::RightBrace);
    }

    // The id always goes first, whatever the attribute order.
    fn write_id(&self, ow: &mut OutWriter) {
        let Some(id) = &self.id else { return };
        ow.item_start([PathStep::Field(fields::ID)]);
        id.comments.write_pre(ow, FileRegion::Main);
        ow.ensure_newline(1);
        id.comments.write_region(ow, FileRegion::IdToken);
        id.comments.write_region(ow, FileRegion::IdColonToken);
        ow.space();
        id.comments
            .write_region_text(ow, FileRegion::IdName, &id.name);
        if ow.options().attributes_order == AttributesOrder::Normalize {
            ow.ensure_newline(2);
        }
        id.comments.write_post(ow, FileRegion::Main);
        ow.item_end();
    }

    #[allow(clippy::too_many_lines)] // three ordered runs with merge handling in between
    fn write_attributes_normalized(
        &self,
        ow: &mut OutWriter,
        source: &str,
        counter: u32,
        root: Option<RootContext<'_>>,
    ) {
        let mut spacer: Option<SpacerId> = None;

        if let Some(root) = root {
            let mut enum_groups: BTreeMap<&str, Vec<&EnumDecl>> = BTreeMap::new();
            for decl in root.enumerations {
                enum_groups.entry(decl.name.as_str()).or_default().push(decl);
            }
            for (name, group) in &enum_groups {
                for (index, decl) in group.iter().enumerate() {
                    ow.ensure_newline(1);
                    write_element(
                        ow,
                        [
                            PathStep::Field(fields::ENUMERATIONS),
                            PathStep::Key(EcoString::from(*name)),
                            PathStep::Index(index),
                        ],
                        &decl.comments,
                        |ow| decl.write_out(ow),
                    );
                    ow.ensure_newline(1);
                }
            }
        }

        // Property definitions, each merged with its binding when one
        // qualifies. A blank line separates them from the id or the
        // enumerations above, but only if something actually follows.
        if counter != ow.counter() || self.id.is_some() {
            spacer = Some(ow.add_newlines_autospacer(2));
        }
        let mut merged_names: Vec<EcoString> = Vec::new();
        let mut def_groups: BTreeMap<&str, Vec<&PropertyDefinition>> = BTreeMap::new();
        for def in &self.property_defs {
            def_groups.entry(def.name.as_str()).or_default().push(def);
        }
        for (name, defs) in &def_groups {
            let unique_name = defs.len() == 1;
            for (def_index, def) in defs.iter().enumerate() {
                let mut merge = None;
                if unique_name && !def.is_required {
                    if let Some((binding_index, binding)) = self.first_normal_binding(name) {
                        if binding.value.merges_with(def) {
                            merge = Some((binding_index, binding));
                        }
                    }
                }
                match merge {
                    Some((binding_index, binding)) => {
                        merged_names.push(binding.name.clone());
                        write_merged_property(ow, source, def, binding, binding_index);
                    }
                    None => {
                        write_element(
                            ow,
                            [
                                PathStep::Field(fields::PROPERTY_DEFS),
                                PathStep::Key(EcoString::from(*name)),
                                PathStep::Index(def_index),
                            ],
                            &def.comments,
                            |ow| def.write_out(ow),
                        );
                    }
                }
            }
        }
        if let Some(id) = spacer.take() {
            ow.remove_text_add_callback(id);
        }

        let mut method_groups: BTreeMap<&str, Vec<&MethodInfo>> = BTreeMap::new();
        for method in &self.methods {
            method_groups
                .entry(method.name.as_str())
                .or_default()
                .push(method);
        }
        let mut signals = Vec::new();
        let mut functions = Vec::new();
        for (name, group) in &method_groups {
            for (index, method) in group.iter().enumerate() {
                match method.method_type {
                    MethodType::Signal => signals.push((*name, index, *method)),
                    MethodType::Method => functions.push((*name, index, *method)),
                }
            }
        }

        if counter != ow.counter() {
            spacer = Some(ow.add_newlines_autospacer(2));
        }
        for &(name, index, signal) in &signals {
            ow.ensure_newline(1);
            write_element(
                ow,
                [
                    PathStep::Field(fields::METHODS),
                    PathStep::Key(EcoString::from(name)),
                    PathStep::Index(index),
                ],
                &signal.comments,
                |ow| signal.write_out(ow),
            );
            ow.ensure_newline(1);
        }
        if let Some(id) = spacer.take() {
            ow.remove_text_add_callback(id);
        }

        if counter != ow.counter() {
            spacer = Some(ow.add_newlines_autospacer(2));
        }
        let mut first = true;
        for &(name, index, method) in &functions {
            if !first && ow.options().functions_spacing {
                ow.newline();
            }
            ow.ensure_newline(1);
            first = false;
            write_element(
                ow,
                [
                    PathStep::Field(fields::METHODS),
                    PathStep::Key(EcoString::from(name)),
                    PathStep::Index(index),
                ],
                &method.comments,
                |ow| method.write_out(ow),
            );
            ow.ensure_newline(1);
        }
        if let Some(id) = spacer.take() {
            ow.remove_text_add_callback(id);
        }

        // Bindings split into three runs: plain values, object and array
        // values, signal handlers. The first normal binding of each merged
        // name was already written next to its property definition.
        let mut binding_groups: BTreeMap<&str, Vec<&Binding>> = BTreeMap::new();
        for binding in &self.bindings {
            binding_groups
                .entry(binding.name.as_str())
                .or_default()
                .push(binding);
        }
        let mut normal = Vec::new();
        let mut delayed = Vec::new();
        let mut handlers = Vec::new();
        for (name, group) in &binding_groups {
            let mut skip_first_normal = merged_names.iter().any(|merged| merged.as_str() == *name);
            for (index, binding) in group.iter().enumerate() {
                if skip_first_normal && binding.binding_type == BindingType::Normal {
                    skip_first_normal = false;
                    continue;
                }
                let entry = (*name, index, *binding);
                if matches!(binding.value, BindingValue::Array(_) | BindingValue::Object(_)) {
                    delayed.push(entry);
                } else if binding.is_signal_handler() {
                    handlers.push(entry);
                } else {
                    normal.push(entry);
                }
            }
        }
        for list in [&normal, &delayed, &handlers] {
            if counter != ow.counter() {
                spacer = Some(ow.add_newlines_autospacer(2));
            }
            for &(name, index, binding) in list {
                write_element(
                    ow,
                    [
                        PathStep::Field(fields::BINDINGS),
                        PathStep::Key(EcoString::from(name)),
                        PathStep::Index(index),
                    ],
                    &binding.comments,
                    |ow| binding.write_out(ow, source),
                );
            }
            if let Some(id) = spacer.take() {
                ow.remove_text_add_callback(id);
            }
        }

        if counter != ow.counter() {
            spacer = Some(ow.add_newlines_autospacer(2));
        }
        let mut first = true;
        for (index, child) in self.children.iter().enumerate() {
            if !first && ow.options().objects_spacing {
                ow.newline().newline();
            }
            first = false;
            ow.ensure_newline(1);
            write_element(
                ow,
                [PathStep::Field(fields::CHILDREN), PathStep::Index(index)],
                &child.comments,
                |ow| child.write_out(ow, source, None, None),
            );
        }
        if let Some(id) = spacer.take() {
            ow.remove_text_add_callback(id);
        }

        if let Some(root) = root {
            if counter != ow.counter() {
                spacer = Some(ow.add_newlines_autospacer(2));
            }
            for (index, component) in root.sub_components.iter().enumerate() {
                ow.ensure_newline(1);
                write_element(
                    ow,
                    [PathStep::Field(fields::COMPONENTS), PathStep::Index(index)],
                    &component.comments,
                    |ow| component.write_out(ow, source),
                );
            }
            if let Some(id) = spacer.take() {
                ow.remove_text_add_callback(id);
            }
        }
    }

    #[allow(clippy::too_many_lines)] // interleaves every attribute kind by source position
    fn write_attributes_source_order(
        &self,
        ow: &mut OutWriter,
        source: &str,
        root: Option<RootContext<'_>>,
    ) {
        let mut attributes: Vec<(u32, Attribute<'_>)> = Vec::new();
        if let Some(root) = root {
            for (i, decl) in root.enumerations.iter().enumerate() {
                let index = index_in_group(root.enumerations, i, |d| d.name.as_str());
                attributes.push((
                    decl.locations.start_offset(),
                    Attribute::Enumeration { index, decl },
                ));
            }
        }
        for (i, def) in self.property_defs.iter().enumerate() {
            let index = index_in_group(&self.property_defs, i, |d| d.name.as_str());
            attributes.push((
                def.locations.start_offset(),
                Attribute::PropertyDef { index, def },
            ));
        }
        for (i, binding) in self.bindings.iter().enumerate() {
            let index = index_in_group(&self.bindings, i, |b| b.name.as_str());
            attributes.push((
                binding.locations.start_offset(),
                Attribute::Binding { index, binding },
            ));
        }
        for (i, method) in self.methods.iter().enumerate() {
            let index = index_in_group(&self.methods, i, |m| m.name.as_str());
            attributes.push((
                method.locations.start_offset(),
                Attribute::Method { index, method },
            ));
        }
        for (index, object) in self.children.iter().enumerate() {
            attributes.push((
                object.locations.start_offset(),
                Attribute::Child { index, object },
            ));
        }
        if let Some(root) = root {
            for (index, component) in root.sub_components.iter().enumerate() {
                attributes.push((
                    component.locations.start_offset(),
                    Attribute::SubComponent { index, component },
                ));
            }
        }
        attributes.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| a.1.precedence().cmp(&b.1.precedence()))
        });

        let mut i = 0;
        while i < attributes.len() {
            let (offset, attribute) = &attributes[i];
            i += 1;
            ow.ensure_newline(preserved_newlines_before(source, *offset));
            // A definition followed by a binding of the same name whose
            // source span starts inside the definition's was a single
            // `property type name: value` line originally; put it back
            // together.
            if let Attribute::PropertyDef { def, .. } = attribute {
                if *offset != u32::MAX && i < attributes.len() {
                    let def_end = def.locations.main().map_or(0, |span| span.end());
                    if let (next_offset, Attribute::Binding { index, binding }) = &attributes[i] {
                        if *next_offset < def_end && binding.name == def.name {
                            i += 1;
                            write_merged_property(ow, source, def, binding, *index);
                            continue;
                        }
                    }
                }
            }
            match attribute {
                Attribute::Enumeration { index, decl } => {
                    write_element(
                        ow,
                        [
                            PathStep::Field(fields::ENUMERATIONS),
                            PathStep::Key(decl.name.clone()),
                            PathStep::Index(*index),
                        ],
                        &decl.comments,
                        |ow| decl.write_out(ow),
                    );
                }
                Attribute::PropertyDef { index, def } => {
                    write_element(
                        ow,
                        [
                            PathStep::Field(fields::PROPERTY_DEFS),
                            PathStep::Key(def.name.clone()),
                            PathStep::Index(*index),
                        ],
                        &def.comments,
                        |ow| def.write_out(ow),
                    );
                }
                Attribute::Binding { index, binding } => {
                    write_element(
                        ow,
                        [
                            PathStep::Field(fields::BINDINGS),
                            PathStep::Key(binding.name.clone()),
                            PathStep::Index(*index),
                        ],
                        &binding.comments,
                        |ow| binding.write_out(ow, source),
                    );
                }
                Attribute::Method { index, method } => {
                    write_element(
                        ow,
                        [
                            PathStep::Field(fields::METHODS),
                            PathStep::Key(method.name.clone()),
                            PathStep::Index(*index),
                        ],
                        &method.comments,
                        |ow| method.write_out(ow),
                    );
                }
                Attribute::Child { index, object } => {
                    write_element(
                        ow,
                        [PathStep::Field(fields::CHILDREN), PathStep::Index(*index)],
                        &object.comments,
                        |ow| object.write_out(ow, source, None, None),
                    );
                }
                Attribute::SubComponent { index, component } => {
                    write_element(
                        ow,
                        [PathStep::Field(fields::COMPONENTS), PathStep::Index(*index)],
                        &component.comments,
                        |ow| component.write_out(ow, source),
                    );
                }
            }
        }
    }
}

/// Writes `property type name: value` for a definition and the binding
/// merged onto it. The output is recorded under the binding's path; the
/// definition's tokens land inside that frame.
fn write_merged_property(
    ow: &mut OutWriter,
    source: &str,
    def: &PropertyDefinition,
    binding: &Binding,
    binding_index: usize,
) {
    ow.item_start([
        PathStep::Field(fields::BINDINGS),
        PathStep::Key(binding.name.clone()),
        PathStep::Index(binding_index),
    ]);
    binding.comments.write_pre(ow, FileRegion::Main);
    def.comments.write_pre(ow, FileRegion::Main);
    def.write_out(ow);
    def.comments.write_post(ow, FileRegion::Main);
    ow.write(": ");
    binding.write_out_value(ow, source);
    binding.comments.write_post(ow, FileRegion::Main);
    ow.item_end();
}

/// A component: the top-level unit of a document, or an inline
/// `component Name: ...` declaration nested in one.
///
/// Inline components keep a dotted name (`Main.Button`) recording the
/// component they were declared in; the dotted form is also how write-out
/// tells them apart from the file's root component.
#[derive(Debug, Clone)]
pub struct Component {
    pub name: EcoString,
    pub objects: Vec<QmlObject>,
    pub enumerations: Vec<EnumDecl>,
    pub sub_components: Vec<Component>,
    pub locations: RegionLocations,
    pub comments: RegionComments,
}

impl Component {
    pub fn new(name: impl Into<EcoString>) -> Self {
        Self {
            name: name.into(),
            objects: Vec::new(),
            enumerations: Vec::new(),
            sub_components: Vec::new(),
            locations: RegionLocations::new(),
            comments: RegionComments::new(),
        }
    }

    /// The root object of the component, when it has one.
    pub fn root_object(&self) -> Option<&QmlObject> {
        self.objects.first()
    }

    pub fn write_out(&self, ow: &mut OutWriter, source: &str) {
        if self.name.contains('.') {
            ow.ensure_newline(1);
            self.comments
                .write_region(ow, FileRegion::ComponentKeyword);
            ow.space();
            let short_name = self.name.rsplit('.').next().unwrap_or("");
            self.comments
                .write_region_text(ow, FileRegion::ComponentName, short_name);
            self.comments.write_region(ow, FileRegion::ColonToken);
            ow.space();
        }
        if let Some(object) = self.objects.first() {
            let root = RootContext {
                enumerations: &self.enumerations,
                sub_components: &self.sub_components,
            };
            write_element(
                ow,
                [PathStep::Field(fields::OBJECTS), PathStep::Index(0)],
                &object.comments,
                |ow| object.write_out(ow, source, Some(root), None),
            );
        }
    }
}
