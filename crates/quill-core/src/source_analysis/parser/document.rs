// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The declarative document grammar: objects, bindings and type members.
//!
//! A document is pragmas, imports and a single root object. Object bodies
//! mix script bindings (`width: 5`), object and array bindings, child
//! objects, property, signal and function declarations, enumerations and
//! inline components. The parser builds DOM elements directly instead of
//! an intermediate tree; embedded script values go through the script
//! grammar and are wrapped in [`ScriptExpression`] so the reformatter can
//! rewrite them later.
//!
//! Token regions are recorded on every element as it is parsed. They serve
//! two purposes: comment attachment binds comments to them, and write-out
//! re-emits keywords and names through them so attached comments travel
//! with their token.
//!
//! Recovery follows the script parser: a bad member becomes a diagnostic
//! and the parser skips ahead, so broken documents still produce a usable
//! element tree.

use ecow::EcoString;

use crate::ast::Statement;
use crate::comments::AstComments;
use crate::dom::elements::{
    Binding, BindingType, BindingValue, Component, EnumDecl, EnumItem, Id, Import, ImportUri,
    MethodInfo, MethodParameter, MethodType, Pragma, PropertyDefinition, QmlObject, Version,
};
use crate::dom::regions::FileRegion;
use crate::dom::script::{ExpressionType, ScriptAst, ScriptExpression};
use crate::source_analysis::{lex_source, Span, TokenKind};

use super::{Diagnostic, Parser, Severity};

/// The result of parsing a full document.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub pragmas: Vec<Pragma>,
    pub imports: Vec<Import>,
    /// The root component, when the source has one. Inline components are
    /// nested under it; their names carry a leading `.` until the document
    /// is given a name.
    pub components: Vec<Component>,
    /// Content spans of comments, in source order, for comment attachment.
    pub comments: Vec<Span>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedDocument {
    /// Returns true if the document parsed without errors.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics
            .iter()
            .all(|d| d.severity != Severity::Error)
    }
}

/// Parses a document: pragmas, imports and the root object with all of its
/// members. Lexer errors are folded into the returned diagnostics.
///
/// # Examples
///
/// ```
/// use quill_core::source_analysis::parse_document;
///
/// let document = parse_document("Item { width: 300 }");
/// assert!(document.is_clean());
/// let root = document.components[0].root_object().unwrap();
/// assert_eq!(root.name, "Item");
/// assert_eq!(root.bindings.len(), 1);
/// ```
#[must_use]
pub fn parse_document(source: &str) -> ParsedDocument {
    let lexed = lex_source(source);
    let mut diagnostics: Vec<Diagnostic> = lexed.errors.iter().map(Diagnostic::from).collect();
    let mut parser = Parser::new(lexed.tokens);
    let mut walker = DocumentParser {
        parser: &mut parser,
        source: source.into(),
    };
    let mut pragmas = Vec::new();
    let mut imports = Vec::new();
    let mut components: Vec<Component> = Vec::new();
    while !walker.parser.is_at_end() {
        while walker.parser.match_token(&TokenKind::Semicolon) {}
        if walker.parser.is_at_end() {
            break;
        }
        let before = walker.parser.position();
        let diagnostics_before = walker.parser.diagnostics.len();
        if walker.parser.check_contextual("pragma") && walker.parser.peek_kind(1).is_identifier() {
            pragmas.push(walker.parse_pragma());
        } else if walker.parser.check(&TokenKind::Import) {
            if let Some(import) = walker.parse_import() {
                imports.push(import);
            }
        } else if walker.parser.current_kind().is_identifier() {
            let span = walker.parser.current_span();
            if let Some(component) = walker.parse_root_component() {
                if components.is_empty() {
                    components.push(component);
                } else {
                    walker
                        .parser
                        .error_at("a document has a single root object", span);
                }
            }
        }
        if walker.parser.position() == before {
            if walker.parser.diagnostics.len() == diagnostics_before {
                walker
                    .parser
                    .error("expected a pragma, an import or the root object");
            }
            walker.parser.advance();
        }
    }
    diagnostics.extend(parser.diagnostics);
    ParsedDocument {
        pragmas,
        imports,
        components,
        comments: lexed.comments,
        diagnostics,
    }
}

/// Document-level parsing state: the shared token parser plus the source
/// text, which embedded scripts keep a handle on.
struct DocumentParser<'a> {
    parser: &'a mut Parser,
    source: EcoString,
}

impl DocumentParser<'_> {
    fn parse_pragma(&mut self) -> Pragma {
        let keyword = self.parser.advance();
        let mut pragma = Pragma::new("");
        pragma
            .locations
            .record(FileRegion::PragmaKeyword, keyword.span());
        pragma.locations.extend_main(keyword.span());
        if let Some(name) = self.parser.expect_identifier("expected a pragma name") {
            pragma.name = name;
            pragma
                .locations
                .record(FileRegion::Identifier, self.parser.previous_span());
            pragma.locations.extend_main(self.parser.previous_span());
        }
        if self.parser.check(&TokenKind::Colon) {
            let colon = self.parser.advance();
            pragma.locations.record(FileRegion::ColonToken, colon.span());
            loop {
                let Some(value) = self.parser.expect_identifier("expected a pragma value") else {
                    break;
                };
                pragma.values.push(value);
                pragma
                    .locations
                    .record(FileRegion::PragmaValues, self.parser.previous_span());
                pragma.locations.extend_main(self.parser.previous_span());
                if !self.parser.check(&TokenKind::Comma) {
                    break;
                }
                let comma = self.parser.advance();
                pragma.locations.record(FileRegion::CommaToken, comma.span());
            }
        }
        self.parser.match_token(&TokenKind::Semicolon);
        pragma
    }

    fn parse_import(&mut self) -> Option<Import> {
        let keyword = self.parser.advance();
        let directory = match self.parser.current_kind() {
            TokenKind::String(raw) => Some(raw.clone()),
            _ => None,
        };
        let mut import = if let Some(text) = directory {
            let token = self.parser.advance();
            let mut import = Import::directory("");
            import.uri = ImportUri::from_import_text(&text);
            import.locations.record(FileRegion::ImportUri, token.span());
            import.locations.extend_main(token.span());
            import
        } else if self.parser.current_kind().is_identifier() {
            let (name, name_span) = self.parse_dotted_name("expected a module name")?;
            let mut import = Import::module(name, Version::latest());
            import.locations.record(FileRegion::ImportUri, name_span);
            import.locations.extend_main(name_span);
            import
        } else {
            self.parser
                .error("expected a module name or directory string after 'import'");
            return None;
        };
        import
            .locations
            .record(FileRegion::ImportKeyword, keyword.span());
        import.locations.extend_main(keyword.span());
        let version = match self.parser.current_kind() {
            TokenKind::Number(text) => Some(Version::from_string(text)),
            _ => None,
        };
        if let Some(version) = version {
            let token = self.parser.advance();
            import.version = version;
            import.locations.record(FileRegion::Version, token.span());
            import.locations.extend_main(token.span());
        }
        if self.parser.check_contextual("as") {
            let as_token = self.parser.advance();
            import.locations.record(FileRegion::AsToken, as_token.span());
            if let Some(alias) = self.parser.expect_identifier("expected a name after 'as'") {
                import
                    .locations
                    .record(FileRegion::Identifier, self.parser.previous_span());
                import.locations.extend_main(self.parser.previous_span());
                import.import_id = Some(alias);
            }
        }
        self.parser.match_token(&TokenKind::Semicolon);
        Some(import)
    }

    fn parse_root_component(&mut self) -> Option<Component> {
        let (name, name_span) = self.parse_dotted_name("expected a type name")?;
        let mut component = Component::new("");
        let mut object = QmlObject::new(name);
        object.locations.record(FileRegion::Identifier, name_span);
        object.locations.extend_main(name_span);
        self.parse_object_body(&mut object, Some(&mut component));
        if let Some(span) = object.locations.main() {
            component.locations.extend_main(span);
        }
        component.objects.push(object);
        Some(component)
    }

    /// Parses `{ members... }` into the object. `component` is the
    /// enclosing component when the object is its root; enumerations and
    /// inline components attach there and are rejected anywhere else.
    fn parse_object_body(&mut self, object: &mut QmlObject, component: Option<&mut Component>) {
        let span = self.parser.current_span();
        if self.parser.enter_nesting(span).is_err() {
            self.skip_object_body();
            return;
        }
        stacker::maybe_grow(32 * 1024, 256 * 1024, || {
            self.parse_object_body_inner(object, component);
        });
        self.parser.leave_nesting();
    }

    fn parse_object_body_inner(
        &mut self,
        object: &mut QmlObject,
        mut component: Option<&mut Component>,
    ) {
        if let Some(open) = self
            .parser
            .expect(&TokenKind::LeftBrace, "expected '{' to open the object body")
        {
            object.locations.record(FileRegion::LeftBrace, open.span());
            object.locations.extend_main(open.span());
        }
        loop {
            while self.parser.match_token(&TokenKind::Semicolon) {}
            if matches!(
                self.parser.current_kind(),
                TokenKind::RightBrace | TokenKind::Eof
            ) {
                break;
            }
            let before = self.parser.position();
            let diagnostics_before = self.parser.diagnostics.len();
            self.parse_member(object, component.as_deref_mut());
            if self.parser.position() == before {
                if self.parser.diagnostics.len() == diagnostics_before {
                    self.parser.error("expected an object member");
                }
                self.parser.advance();
            }
        }
        if let Some(close) = self.parser.expect(
            &TokenKind::RightBrace,
            "expected '}' to close the object body",
        ) {
            object.locations.record(FileRegion::RightBrace, close.span());
            object.locations.extend_main(close.span());
        }
    }

    /// Skips a balanced `{ ... }` without building anything. Used when the
    /// nesting limit cuts off a too-deep object tree.
    fn skip_object_body(&mut self) {
        if !self.parser.match_token(&TokenKind::LeftBrace) {
            return;
        }
        let mut depth = 1u32;
        while depth > 0 && !self.parser.is_at_end() {
            match self.parser.current_kind() {
                TokenKind::LeftBrace => depth += 1,
                TokenKind::RightBrace => depth -= 1,
                _ => {}
            }
            self.parser.advance();
        }
    }

    fn parse_member(&mut self, object: &mut QmlObject, component: Option<&mut Component>) {
        if self.parser.check(&TokenKind::Enum) {
            let span = self.parser.current_span();
            if let Some(declaration) = self.parse_enum() {
                match component {
                    Some(component) => component.enumerations.push(declaration),
                    None => self
                        .parser
                        .error_at("enumerations are only allowed in the root object", span),
                }
            }
            return;
        }
        if self.parser.check(&TokenKind::Function) {
            self.parse_method(object);
            return;
        }
        if self.parser.check(&TokenKind::Default)
            || self.parser.check_contextual("required")
            || self.parser.check_contextual("readonly")
            || self.parser.check_contextual("property")
        {
            self.parse_property_member(object);
            return;
        }
        if self.parser.check_contextual("signal") && self.parser.peek_kind(1).is_identifier() {
            self.parse_signal(object);
            return;
        }
        if self.parser.check_contextual("component")
            && self.parser.peek_kind(1).is_identifier()
            && matches!(self.parser.peek_kind(2), TokenKind::Colon)
        {
            match component {
                Some(component) => self.parse_inline_component(component),
                None => {
                    let span = self.parser.current_span();
                    self.parser
                        .error_at("nested inline components are not supported", span);
                    let mut scratch = Component::new("");
                    self.parse_inline_component(&mut scratch);
                }
            }
            return;
        }
        if self.parser.check_contextual("id") && matches!(self.parser.peek_kind(1), TokenKind::Colon)
        {
            self.parse_id_attribute(object);
            return;
        }
        if self.parser.check(&TokenKind::Import) {
            self.parser
                .error("imports are only allowed at the top of the document");
            self.parser.synchronize();
            return;
        }
        if self.parser.current_kind().is_identifier() {
            self.parse_object_member(object);
        }
        // Anything else is reported by the member loop.
    }

    /// A member that starts with a (possibly dotted) name: a binding, a
    /// child object or an `on` binding.
    fn parse_object_member(&mut self, object: &mut QmlObject) {
        let Some((name, name_span)) = self.parse_dotted_name("expected an attribute or type name")
        else {
            return;
        };
        if self.parser.check(&TokenKind::Colon) {
            let colon = self.parser.advance();
            let mut binding = Binding::new(name, BindingValue::Empty, BindingType::Normal);
            binding.locations.record(FileRegion::Identifier, name_span);
            binding.locations.record(FileRegion::ColonToken, colon.span());
            binding.locations.extend_main(name_span);
            self.parse_binding_value(&mut binding);
            object.bindings.push(binding);
        } else if self.parser.check(&TokenKind::LeftBrace) {
            let mut child = QmlObject::new(name);
            child.locations.record(FileRegion::Identifier, name_span);
            child.locations.extend_main(name_span);
            self.parse_object_body(&mut child, None);
            object.children.push(child);
        } else if self.parser.check_contextual("on") {
            let on_token = self.parser.advance();
            let mut value = QmlObject::new(name);
            value.locations.record(FileRegion::Identifier, name_span);
            value.locations.record(FileRegion::OnToken, on_token.span());
            value.locations.extend_main(name_span);
            let Some((target, target_span)) = self.parse_dotted_name("expected a property after 'on'")
            else {
                return;
            };
            value.locations.record(FileRegion::OnTarget, target_span);
            self.parse_object_body(&mut value, None);
            let mut binding = Binding::new(target, BindingValue::Empty, BindingType::On);
            binding.locations.extend_main(name_span);
            if let Some(span) = value.locations.main() {
                binding.locations.extend_main(span);
            }
            binding.value = BindingValue::Object(Box::new(value));
            object.bindings.push(binding);
        } else {
            self.parser.error("expected ':', '{' or 'on' after the name");
        }
    }

    /// Decides between the three binding value forms. `[Type {` opens an
    /// object array, `Type {` an object value, everything else is script.
    fn parse_binding_value(&mut self, binding: &mut Binding) {
        if self.peek_object_array() {
            let open = self.parser.advance();
            binding.locations.record(FileRegion::LeftBracket, open.span());
            let mut objects = Vec::new();
            while !matches!(
                self.parser.current_kind(),
                TokenKind::RightBracket | TokenKind::Eof
            ) {
                let Some((name, name_span)) = self.parse_dotted_name("expected a type name") else {
                    break;
                };
                let mut object = QmlObject::new(name);
                object.locations.record(FileRegion::Identifier, name_span);
                object.locations.extend_main(name_span);
                self.parse_object_body(&mut object, None);
                objects.push(object);
                if !self.parser.match_token(&TokenKind::Comma) {
                    break;
                }
            }
            if let Some(close) = self.parser.expect(
                &TokenKind::RightBracket,
                "expected ']' to close the array binding",
            ) {
                binding
                    .locations
                    .record(FileRegion::RightBracket, close.span());
                binding.locations.extend_main(close.span());
            }
            binding.value = BindingValue::Array(objects);
        } else if self.peek_object_value() {
            let Some((name, name_span)) = self.parse_dotted_name("expected a type name") else {
                return;
            };
            let mut object = QmlObject::new(name);
            object.locations.record(FileRegion::Identifier, name_span);
            object.locations.extend_main(name_span);
            self.parse_object_body(&mut object, None);
            if let Some(span) = object.locations.main() {
                binding.locations.extend_main(span);
            }
            binding.value = BindingValue::Object(Box::new(object));
        } else {
            let (script, span) = self.parse_binding_script();
            binding.locations.extend_main(span);
            binding.value = BindingValue::Script(script);
        }
    }

    /// Parses one statement as a binding value. A plain expression
    /// statement is unwrapped so the span excludes any trailing semicolon.
    fn parse_binding_script(&mut self) -> (ScriptExpression, Span) {
        let diagnostics_start = self.parser.diagnostics.len();
        let statement = self.parser.parse_statement();
        let script_diagnostics = self.parser.diagnostics[diagnostics_start..].to_vec();
        let (ast, span) = match statement {
            Statement::Expression(statement) => {
                let span = statement.expression.span();
                (ScriptAst::Expression(statement.expression), span)
            }
            statement => {
                let span = statement.span();
                (ScriptAst::Statements(vec![statement]), span)
            }
        };
        let script = ScriptExpression::new(
            ExpressionType::BindingExpression,
            self.source.clone(),
            span,
            ast,
            AstComments::new(),
            script_diagnostics,
        );
        (script, span)
    }

    fn parse_id_attribute(&mut self, object: &mut QmlObject) {
        let id_token = self.parser.advance();
        let colon = self.parser.advance();
        if self.parser.current_kind().is_identifier() {
            let Some(name) = self.parser.expect_identifier("expected an id name") else {
                return;
            };
            let name_span = self.parser.previous_span();
            if !is_valid_id_name(&name) {
                self.parser.error_at(
                    format!(
                        "id attributes should be a lower case letter followed by letters, \
                         numbers or underscores, not {name}"
                    ),
                    name_span,
                );
            }
            let mut id = Id::new(name);
            id.locations.record(FileRegion::IdToken, id_token.span());
            id.locations.record(FileRegion::IdColonToken, colon.span());
            id.locations.record(FileRegion::IdName, name_span);
            id.locations.extend_main(id_token.span().merge(name_span));
            self.parser.match_token(&TokenKind::Semicolon);
            if object.id.is_some() {
                self.parser.error_at("object already has an id", name_span);
            } else {
                object.id = Some(id);
            }
        } else {
            // Not an identifier: keep the member as an ordinary binding so
            // broken code still round-trips.
            self.parser
                .error_at("id attributes must be identifiers", self.parser.current_span());
            let mut binding = Binding::new("id", BindingValue::Empty, BindingType::Normal);
            binding
                .locations
                .record(FileRegion::Identifier, id_token.span());
            binding.locations.record(FileRegion::ColonToken, colon.span());
            binding.locations.extend_main(id_token.span());
            self.parse_binding_value(&mut binding);
            object.bindings.push(binding);
        }
    }

    /// Property declarations: any mix of `default`, `required` and
    /// `readonly` modifiers, then either a full `property type name` with
    /// an optional value, or the bare `required name` form.
    fn parse_property_member(&mut self, object: &mut QmlObject) {
        let start_span = self.parser.current_span();
        let mut def = PropertyDefinition::new("", "");
        loop {
            if self.parser.check(&TokenKind::Default) {
                let token = self.parser.advance();
                def.is_default_member = true;
                def.locations.record(FileRegion::DefaultKeyword, token.span());
            } else if self.parser.check_contextual("required") {
                let token = self.parser.advance();
                def.is_required = true;
                def.locations
                    .record(FileRegion::RequiredKeyword, token.span());
            } else if self.parser.check_contextual("readonly") {
                let token = self.parser.advance();
                def.is_readonly = true;
                def.locations
                    .record(FileRegion::ReadonlyKeyword, token.span());
            } else {
                break;
            }
        }
        def.locations.extend_main(start_span);
        if self.parser.check_contextual("property") {
            let keyword = self.parser.advance();
            def.locations
                .record(FileRegion::PropertyKeyword, keyword.span());
            let Some((type_name, type_span)) = self.parse_type_name("expected a property type")
            else {
                return;
            };
            def.type_name = type_name;
            def.locations.record(FileRegion::TypeIdentifier, type_span);
            let Some(name) = self.parser.expect_identifier("expected a property name") else {
                return;
            };
            let name_span = self.parser.previous_span();
            if name == "id" {
                self.parser.diagnostics.push(Diagnostic::warning(
                    "id is a special attribute and should not be used as a property name",
                    name_span,
                ));
            }
            def.name = name.clone();
            def.locations.record(FileRegion::Identifier, name_span);
            def.locations.extend_main(name_span);
            if self.parser.check(&TokenKind::Colon) {
                let colon = self.parser.advance();
                let mut binding = Binding::new(name, BindingValue::Empty, BindingType::Normal);
                binding.locations.record(FileRegion::Identifier, name_span);
                binding.locations.record(FileRegion::ColonToken, colon.span());
                binding.locations.extend_main(name_span);
                self.parse_binding_value(&mut binding);
                object.bindings.push(binding);
            } else {
                self.parser.match_token(&TokenKind::Semicolon);
            }
            object.property_defs.push(def);
        } else if def.is_required
            && !def.is_default_member
            && !def.is_readonly
            && self.parser.current_kind().is_identifier()
        {
            // `required name` marks an inherited property as required.
            let Some(name) = self.parser.expect_identifier("expected a property name") else {
                return;
            };
            def.name = name;
            def.locations
                .record(FileRegion::Identifier, self.parser.previous_span());
            def.locations.extend_main(self.parser.previous_span());
            self.parser.match_token(&TokenKind::Semicolon);
            object.property_defs.push(def);
        } else {
            self.parser
                .error("expected 'property' after the attribute modifiers");
        }
    }

    fn parse_signal(&mut self, object: &mut QmlObject) {
        let keyword = self.parser.advance();
        let mut method = MethodInfo::new("", MethodType::Signal);
        method
            .locations
            .record(FileRegion::SignalKeyword, keyword.span());
        method.locations.extend_main(keyword.span());
        let Some(name) = self.parser.expect_identifier("expected a signal name") else {
            return;
        };
        method.name = name;
        method
            .locations
            .record(FileRegion::Identifier, self.parser.previous_span());
        method.locations.extend_main(self.parser.previous_span());
        if self.parser.check(&TokenKind::LeftParen) {
            let open = self.parser.advance();
            method.locations.record(FileRegion::LeftParen, open.span());
            while !matches!(
                self.parser.current_kind(),
                TokenKind::RightParen | TokenKind::Eof
            ) {
                if let Some(parameter) = self.parse_signal_parameter() {
                    method.parameters.push(parameter);
                }
                if !self.parser.match_token(&TokenKind::Comma) {
                    break;
                }
            }
            if let Some(close) = self
                .parser
                .expect(&TokenKind::RightParen, "expected ')' after the parameters")
            {
                method.locations.record(FileRegion::RightParen, close.span());
                method.locations.extend_main(close.span());
            }
        }
        self.parser.match_token(&TokenKind::Semicolon);
        object.methods.push(method);
    }

    /// Signal parameters come in three spellings: `type name`, `name: type`
    /// and a bare `name`.
    fn parse_signal_parameter(&mut self) -> Option<MethodParameter> {
        if self.parser.check(&TokenKind::Var) {
            let token = self.parser.advance();
            let mut parameter = MethodParameter::new("", "var");
            parameter
                .locations
                .record(FileRegion::TypeIdentifier, token.span());
            parameter.locations.extend_main(token.span());
            let name = self.parser.expect_identifier("expected a parameter name")?;
            parameter.name = name;
            parameter
                .locations
                .record(FileRegion::Identifier, self.parser.previous_span());
            parameter.locations.extend_main(self.parser.previous_span());
            return Some(parameter);
        }
        let (first, first_span) = self.parse_dotted_name("expected a signal parameter")?;
        if self.parser.check(&TokenKind::Lt) || self.parser.current_kind().is_identifier() {
            let mut type_name = first;
            let mut type_span = first_span;
            if self.parser.match_token(&TokenKind::Lt) {
                if let Some((inner, _)) = self.parse_dotted_name("expected a type parameter") {
                    type_name = format!("{type_name}<{inner}>").into();
                    if let Some(close) = self
                        .parser
                        .expect(&TokenKind::Gt, "expected '>' after the type parameter")
                    {
                        type_span = type_span.merge(close.span());
                    }
                }
            }
            let mut parameter = MethodParameter::new("", type_name);
            parameter
                .locations
                .record(FileRegion::TypeIdentifier, type_span);
            parameter.locations.extend_main(type_span);
            let name = self.parser.expect_identifier("expected a parameter name")?;
            parameter.name = name;
            parameter
                .locations
                .record(FileRegion::Identifier, self.parser.previous_span());
            parameter.locations.extend_main(self.parser.previous_span());
            Some(parameter)
        } else if self.parser.check(&TokenKind::Colon) {
            let colon = self.parser.advance();
            let mut parameter = MethodParameter::new(first, "");
            parameter.locations.record(FileRegion::Identifier, first_span);
            parameter.locations.record(FileRegion::ColonToken, colon.span());
            parameter.locations.extend_main(first_span);
            if let Some((type_name, type_span)) = self.parse_type_name("expected a parameter type")
            {
                parameter.type_name = type_name;
                parameter
                    .locations
                    .record(FileRegion::TypeIdentifier, type_span);
                parameter.locations.extend_main(type_span);
            }
            Some(parameter)
        } else {
            let mut parameter = MethodParameter::new(first, "");
            parameter.locations.record(FileRegion::Identifier, first_span);
            parameter.locations.extend_main(first_span);
            Some(parameter)
        }
    }

    fn parse_method(&mut self, object: &mut QmlObject) {
        let keyword = self.parser.advance();
        let mut method = MethodInfo::new("", MethodType::Method);
        method
            .locations
            .record(FileRegion::FunctionKeyword, keyword.span());
        method.locations.extend_main(keyword.span());
        let Some(name) = self.parser.expect_identifier("expected a function name") else {
            return;
        };
        method.name = name;
        method
            .locations
            .record(FileRegion::Identifier, self.parser.previous_span());
        let Some(open) = self.parser.expect(
            &TokenKind::LeftParen,
            "expected '(' after the function name",
        ) else {
            return;
        };
        method.locations.record(FileRegion::LeftParen, open.span());
        while !matches!(
            self.parser.current_kind(),
            TokenKind::RightParen | TokenKind::Eof
        ) {
            if let Some(parameter) = self.parse_method_parameter() {
                method.parameters.push(parameter);
            }
            if !self.parser.match_token(&TokenKind::Comma) {
                break;
            }
        }
        if let Some(close) = self
            .parser
            .expect(&TokenKind::RightParen, "expected ')' after the parameters")
        {
            method.locations.record(FileRegion::RightParen, close.span());
        }
        if self.parser.check(&TokenKind::Colon) {
            let colon = self.parser.advance();
            method.locations.record(FileRegion::ColonToken, colon.span());
            if let Some((type_name, type_span)) = self.parse_type_name("expected a return type") {
                method.type_name = type_name;
                method.locations.record(FileRegion::TypeIdentifier, type_span);
            }
        }
        let Some(open) = self.parser.expect(
            &TokenKind::LeftBrace,
            "expected '{' to open the function body",
        ) else {
            return;
        };
        method.locations.record(FileRegion::LeftBrace, open.span());
        let diagnostics_start = self.parser.diagnostics.len();
        let statements = self.parser.parse_statement_list(&TokenKind::RightBrace);
        let script_diagnostics = self.parser.diagnostics[diagnostics_start..].to_vec();
        if let (Some(first), Some(last)) = (statements.first(), statements.last()) {
            let span = first.span().merge(last.span());
            method.body = Some(ScriptExpression::new(
                ExpressionType::FunctionBody,
                self.source.clone(),
                span,
                ScriptAst::Statements(statements),
                AstComments::new(),
                script_diagnostics,
            ));
        }
        if let Some(close) = self.parser.expect(
            &TokenKind::RightBrace,
            "expected '}' to close the function body",
        ) {
            method.locations.record(FileRegion::RightBrace, close.span());
            method.locations.extend_main(close.span());
        }
        object.methods.push(method);
    }

    fn parse_method_parameter(&mut self) -> Option<MethodParameter> {
        match self.parser.current_kind() {
            TokenKind::Ellipsis => {
                let token = self.parser.advance();
                let mut parameter = MethodParameter::new("", "");
                parameter.is_rest = true;
                parameter
                    .locations
                    .record(FileRegion::EllipsisToken, token.span());
                parameter.locations.extend_main(token.span());
                let name = self.parser.expect_identifier("expected a parameter name after '...'")?;
                parameter.name = name;
                parameter
                    .locations
                    .record(FileRegion::Identifier, self.parser.previous_span());
                parameter.locations.extend_main(self.parser.previous_span());
                Some(parameter)
            }
            TokenKind::LeftBrace | TokenKind::LeftBracket => {
                // A destructuring pattern, kept whole as an expression.
                let diagnostics_start = self.parser.diagnostics.len();
                let expression = self.parser.parse_assignment(false);
                let script_diagnostics = self.parser.diagnostics[diagnostics_start..].to_vec();
                let span = expression.span();
                let mut parameter = MethodParameter::new("", "");
                parameter.locations.extend_main(span);
                parameter.value = Some(ScriptExpression::new(
                    ExpressionType::ArgumentInitializer,
                    self.source.clone(),
                    span,
                    ScriptAst::Expression(expression),
                    AstComments::new(),
                    script_diagnostics,
                ));
                Some(parameter)
            }
            kind if kind.is_identifier() => {
                let name = self.parser.expect_identifier("expected a parameter name")?;
                let mut parameter = MethodParameter::new(name, "");
                parameter
                    .locations
                    .record(FileRegion::Identifier, self.parser.previous_span());
                parameter.locations.extend_main(self.parser.previous_span());
                if self.parser.check(&TokenKind::Colon) {
                    let colon = self.parser.advance();
                    parameter.locations.record(FileRegion::ColonToken, colon.span());
                    if let Some((type_name, type_span)) =
                        self.parse_type_name("expected a parameter type")
                    {
                        parameter.type_name = type_name;
                        parameter
                            .locations
                            .record(FileRegion::TypeIdentifier, type_span);
                        parameter.locations.extend_main(type_span);
                    }
                }
                if self.parser.check(&TokenKind::Eq) {
                    let equal = self.parser.advance();
                    parameter.locations.record(FileRegion::EqualToken, equal.span());
                    let diagnostics_start = self.parser.diagnostics.len();
                    let expression = self.parser.parse_assignment(false);
                    let script_diagnostics = self.parser.diagnostics[diagnostics_start..].to_vec();
                    let span = expression.span();
                    parameter.locations.extend_main(span);
                    parameter.default_value = Some(ScriptExpression::new(
                        ExpressionType::ArgumentInitializer,
                        self.source.clone(),
                        span,
                        ScriptAst::Expression(expression),
                        AstComments::new(),
                        script_diagnostics,
                    ));
                }
                Some(parameter)
            }
            _ => {
                self.parser.error("expected a parameter name");
                while !matches!(
                    self.parser.current_kind(),
                    TokenKind::Comma | TokenKind::RightParen | TokenKind::Eof
                ) {
                    self.parser.advance();
                }
                None
            }
        }
    }

    fn parse_enum(&mut self) -> Option<EnumDecl> {
        let keyword = self.parser.advance();
        let mut declaration = EnumDecl::new("");
        declaration
            .locations
            .record(FileRegion::EnumKeyword, keyword.span());
        declaration.locations.extend_main(keyword.span());
        let name = self.parser.expect_identifier("expected an enumeration name")?;
        declaration.name = name;
        declaration
            .locations
            .record(FileRegion::Identifier, self.parser.previous_span());
        if let Some(open) = self.parser.expect(
            &TokenKind::LeftBrace,
            "expected '{' to open the enumeration",
        ) {
            declaration.locations.record(FileRegion::LeftBrace, open.span());
        }
        let mut previous: Option<i64> = None;
        while !matches!(
            self.parser.current_kind(),
            TokenKind::RightBrace | TokenKind::Eof
        ) {
            let Some(name) = self
                .parser
                .expect_identifier("expected an enumeration value name")
            else {
                break;
            };
            let name_span = self.parser.previous_span();
            let mut item = EnumItem::new(name, previous.map_or(0, |value| value.saturating_add(1)));
            item.locations.record(FileRegion::Identifier, name_span);
            item.locations.extend_main(name_span);
            if self.parser.check(&TokenKind::Eq) {
                let equal = self.parser.advance();
                item.locations.record(FileRegion::EqualToken, equal.span());
                if let Some((value, span)) = self.parse_enum_value() {
                    item.value = value;
                    item.locations.record(FileRegion::EnumValue, span);
                    item.locations.extend_main(span);
                }
            }
            previous = Some(item.value);
            if self.parser.check(&TokenKind::Comma) {
                let comma = self.parser.advance();
                item.locations.record(FileRegion::CommaToken, comma.span());
                declaration.values.push(item);
            } else {
                declaration.values.push(item);
                break;
            }
        }
        if let Some(close) = self.parser.expect(
            &TokenKind::RightBrace,
            "expected '}' to close the enumeration",
        ) {
            declaration.locations.record(FileRegion::RightBrace, close.span());
            declaration.locations.extend_main(close.span());
        }
        Some(declaration)
    }

    fn parse_enum_value(&mut self) -> Option<(i64, Span)> {
        let negative = self.parser.match_token(&TokenKind::Minus);
        let start = if negative {
            self.parser.previous_span()
        } else {
            self.parser.current_span()
        };
        let text = match self.parser.current_kind() {
            TokenKind::Number(text) => text.clone(),
            _ => {
                self.parser.error("expected a number as the enumeration value");
                return None;
            }
        };
        let token = self.parser.advance();
        let Some(value) = parse_integer(&text) else {
            self.parser
                .error_at("enumeration values must be integers", token.span());
            return None;
        };
        let value = if negative { -value } else { value };
        Some((value, start.merge(token.span())))
    }

    fn parse_inline_component(&mut self, parent: &mut Component) {
        let keyword = self.parser.advance();
        let mut component = Component::new("");
        component
            .locations
            .record(FileRegion::ComponentKeyword, keyword.span());
        component.locations.extend_main(keyword.span());
        let Some(name) = self.parser.expect_identifier("expected a component name") else {
            return;
        };
        component.name = format!("{}.{}", parent.name, name).into();
        component
            .locations
            .record(FileRegion::ComponentName, self.parser.previous_span());
        if let Some(colon) = self
            .parser
            .expect(&TokenKind::Colon, "expected ':' after the component name")
        {
            component.locations.record(FileRegion::ColonToken, colon.span());
        }
        let Some((type_name, type_span)) = self.parse_dotted_name("expected a type name") else {
            parent.sub_components.push(component);
            return;
        };
        let mut object = QmlObject::new(type_name);
        object.locations.record(FileRegion::Identifier, type_span);
        object.locations.extend_main(type_span);
        self.parse_object_body(&mut object, Some(&mut component));
        if let Some(span) = object.locations.main() {
            component.locations.extend_main(span);
        }
        component.objects.push(object);
        parent.sub_components.push(component);
    }

    /// A type for a property, parameter or return value: `var`, a dotted
    /// name, or a parameterized `list<T>`.
    fn parse_type_name(&mut self, message: &str) -> Option<(EcoString, Span)> {
        if self.parser.check(&TokenKind::Var) {
            let token = self.parser.advance();
            return Some(("var".into(), token.span()));
        }
        let (mut name, mut span) = self.parse_dotted_name(message)?;
        if self.parser.match_token(&TokenKind::Lt) {
            if let Some((inner, _)) = self.parse_dotted_name("expected a type parameter") {
                name = format!("{name}<{inner}>").into();
                if let Some(close) = self
                    .parser
                    .expect(&TokenKind::Gt, "expected '>' after the type parameter")
                {
                    span = span.merge(close.span());
                }
            }
        }
        Some((name, span))
    }

    fn parse_dotted_name(&mut self, message: &str) -> Option<(EcoString, Span)> {
        let first = self.parser.expect_identifier(message)?;
        let mut span = self.parser.previous_span();
        let mut name = first;
        while self.parser.check(&TokenKind::Dot) && self.parser.peek_kind(1).is_identifier() {
            self.parser.advance();
            if let Some(part) = self.parser.expect_identifier("expected a name after '.'") {
                name = format!("{name}.{part}").into();
                span = span.merge(self.parser.previous_span());
            }
        }
        Some((name, span))
    }

    /// Offset just past a dotted name starting at token offset `start`, or
    /// `None` when there is no name there.
    fn dotted_name_end(&self, start: usize) -> Option<usize> {
        if !self.parser.peek_kind(start).is_identifier() {
            return None;
        }
        let mut offset = start + 1;
        while matches!(self.parser.peek_kind(offset), TokenKind::Dot)
            && self.parser.peek_kind(offset + 1).is_identifier()
        {
            offset += 2;
        }
        Some(offset)
    }

    /// True when the tokens ahead spell `Type {`, i.e. an object value
    /// rather than a script expression.
    fn peek_object_value(&self) -> bool {
        self.dotted_name_end(0)
            .is_some_and(|end| matches!(self.parser.peek_kind(end), TokenKind::LeftBrace))
    }

    /// True when the tokens ahead spell `[Type {`, i.e. an object array
    /// rather than a script array literal.
    fn peek_object_array(&self) -> bool {
        matches!(self.parser.current_kind(), TokenKind::LeftBracket)
            && self
                .dotted_name_end(1)
                .is_some_and(|end| matches!(self.parser.peek_kind(end), TokenKind::LeftBrace))
    }
}

/// Ids must be a lower case letter followed by letters, digits or
/// underscores.
fn is_valid_id_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_integer(text: &str) -> Option<i64> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_clean(source: &str) -> ParsedDocument {
        let document = parse_document(source);
        assert!(
            document.is_clean(),
            "unexpected diagnostics: {:?}",
            document.diagnostics
        );
        document
    }

    fn root_object(document: &ParsedDocument) -> &QmlObject {
        document.components[0].root_object().expect("root object")
    }

    #[test]
    fn parses_a_minimal_document() {
        let document = parse_clean("Item {}\n");
        assert!(document.pragmas.is_empty());
        assert!(document.imports.is_empty());
        assert_eq!(document.components.len(), 1);
        assert_eq!(root_object(&document).name, "Item");
    }

    #[test]
    fn parses_pragmas_and_imports() {
        let document = parse_clean(
            "pragma Singleton\nimport QtQuick 2.15\nimport \"../shared\" as Shared\nItem {}\n",
        );
        assert_eq!(document.pragmas.len(), 1);
        assert_eq!(document.pragmas[0].name, "Singleton");
        assert_eq!(document.imports.len(), 2);
        let qt = &document.imports[0];
        assert_eq!(qt.uri, ImportUri::Module("QtQuick".into()));
        assert_eq!(qt.version, Version::new(2, 15));
        let shared = &document.imports[1];
        assert_eq!(shared.uri, ImportUri::Directory("../shared".into()));
        assert_eq!(shared.import_id.as_deref(), Some("Shared"));
    }

    #[test]
    fn parses_pragma_values() {
        let document = parse_clean("pragma ComponentBehavior: Bound\nItem {}\n");
        assert_eq!(document.pragmas[0].name, "ComponentBehavior");
        assert_eq!(document.pragmas[0].values, ["Bound"]);
    }

    #[test]
    fn import_without_minor_version() {
        let document = parse_clean("import QtQuick 2\nItem {}\n");
        assert_eq!(document.imports[0].version.major, 2);
        assert_eq!(document.imports[0].version.minor, Version::UNDEFINED);
    }

    #[test]
    fn script_binding_span_excludes_the_semicolon() {
        let document = parse_clean("Item { width: parent.width; }");
        let binding = &root_object(&document).bindings[0];
        assert_eq!(binding.name, "width");
        let BindingValue::Script(script) = &binding.value else {
            panic!("expected a script value");
        };
        assert_eq!(script.code(), "parent.width");
    }

    #[test]
    fn block_bindings_stay_statements() {
        let document = parse_clean("Item { width: { return 5 } }");
        let BindingValue::Script(script) = &root_object(&document).bindings[0].value else {
            panic!("expected a script value");
        };
        assert!(matches!(script.ast(), ScriptAst::Statements(_)));
    }

    #[test]
    fn records_binding_regions() {
        let source = "Item {\n    width: 5\n}\n";
        let document = parse_clean(source);
        let binding = &root_object(&document).bindings[0];
        let name = binding.locations.get(FileRegion::Identifier).unwrap();
        assert_eq!(&source[name.as_range()], "width");
        let colon = binding.locations.get(FileRegion::ColonToken).unwrap();
        assert_eq!(&source[colon.as_range()], ":");
    }

    #[test]
    fn parses_an_object_binding() {
        let document = parse_clean("Item { contentItem: Rectangle { } }");
        let binding = &root_object(&document).bindings[0];
        assert_eq!(binding.binding_type, BindingType::Normal);
        let BindingValue::Object(object) = &binding.value else {
            panic!("expected an object value");
        };
        assert_eq!(object.name, "Rectangle");
    }

    #[test]
    fn parses_an_object_array_binding() {
        let document = parse_clean("Item { states: [ State { }, State { } ] }");
        let BindingValue::Array(objects) = &root_object(&document).bindings[0].value else {
            panic!("expected an array value");
        };
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].name, "State");
    }

    #[test]
    fn empty_array_binding_is_script() {
        let document = parse_clean("Item { states: [] }");
        let BindingValue::Script(script) = &root_object(&document).bindings[0].value else {
            panic!("expected a script value");
        };
        assert_eq!(script.code(), "[]");
    }

    #[test]
    fn parses_an_on_binding() {
        let document = parse_clean("Item { Behavior on opacity { } }");
        let binding = &root_object(&document).bindings[0];
        assert_eq!(binding.name, "opacity");
        assert_eq!(binding.binding_type, BindingType::On);
        let BindingValue::Object(object) = &binding.value else {
            panic!("expected an object value");
        };
        assert_eq!(object.name, "Behavior");
    }

    #[test]
    fn lowercase_object_definitions_are_children() {
        let document = parse_clean("Item { anchors { } }");
        let object = root_object(&document);
        assert!(object.bindings.is_empty());
        assert_eq!(object.children.len(), 1);
        assert_eq!(object.children[0].name, "anchors");
    }

    #[test]
    fn property_value_creates_a_paired_binding() {
        let document = parse_clean("Item { property int width: 5 }");
        let object = root_object(&document);
        assert_eq!(object.property_defs.len(), 1);
        assert_eq!(object.property_defs[0].type_name, "int");
        assert_eq!(object.bindings.len(), 1);
        assert_eq!(object.bindings[0].name, "width");
    }

    #[test]
    fn parses_property_modifiers() {
        let document = parse_clean(
            "Item {\n    default property Item content\n    readonly property int count: 0\n}",
        );
        let object = root_object(&document);
        assert!(object.property_defs[0].is_default_member);
        assert!(object.property_defs[1].is_readonly);
    }

    #[test]
    fn parses_the_bare_required_form() {
        let document = parse_clean("Item { required model }");
        let def = &root_object(&document).property_defs[0];
        assert!(def.is_required);
        assert_eq!(def.name, "model");
        assert!(def.type_name.is_empty());
    }

    #[test]
    fn parses_a_list_property_type() {
        let document = parse_clean("Item { property list<Item> extras }");
        let def = &root_object(&document).property_defs[0];
        assert_eq!(def.type_name, "list<Item>");
    }

    #[test]
    fn parses_the_id_attribute() {
        let document = parse_clean("Item { id: root }");
        let id = root_object(&document).id.as_ref().expect("id");
        assert_eq!(id.name, "root");
    }

    #[test]
    fn rejects_an_upper_case_id() {
        let document = parse_document("Item { id: Root }");
        assert!(!document.is_clean());
        // The id is still kept so the document round-trips.
        assert_eq!(root_object(&document).id.as_ref().unwrap().name, "Root");
    }

    #[test]
    fn non_identifier_id_becomes_a_binding() {
        let document = parse_document("Item { id: \"root\" }");
        assert!(!document.is_clean());
        let object = root_object(&document);
        assert!(object.id.is_none());
        assert_eq!(object.bindings[0].name, "id");
    }

    #[test]
    fn parses_signal_declarations() {
        let document = parse_clean("Item {\n    signal clicked\n    signal moved(int x, y: real)\n}");
        let object = root_object(&document);
        assert_eq!(object.methods.len(), 2);
        let moved = &object.methods[1];
        assert_eq!(moved.method_type, MethodType::Signal);
        assert_eq!(moved.parameters[0].name, "x");
        assert_eq!(moved.parameters[0].type_name, "int");
        assert_eq!(moved.parameters[1].name, "y");
        assert_eq!(moved.parameters[1].type_name, "real");
    }

    #[test]
    fn parses_a_function_with_types_and_body() {
        let document = parse_clean("Item { function area(w: int, h: int): int { return w * h } }");
        let method = &root_object(&document).methods[0];
        assert_eq!(method.method_type, MethodType::Method);
        assert_eq!(method.name, "area");
        assert_eq!(method.type_name, "int");
        assert_eq!(method.parameters.len(), 2);
        let body = method.body.as_ref().expect("body");
        assert_eq!(body.code(), "return w * h");
    }

    #[test]
    fn parses_rest_and_default_parameters() {
        let document = parse_clean("Item { function log(level = 0, ...messages) { } }");
        let method = &root_object(&document).methods[0];
        let level = &method.parameters[0];
        assert_eq!(level.default_value.as_ref().expect("default").code(), "0");
        assert!(method.parameters[1].is_rest);
        assert!(method.body.is_none());
    }

    #[test]
    fn parses_an_enumeration() {
        let document = parse_clean("Item { enum Kind { A, B = 4, C } }");
        let declaration = &document.components[0].enumerations[0];
        assert_eq!(declaration.name, "Kind");
        let values: Vec<i64> = declaration.values.iter().map(|v| v.value).collect();
        assert_eq!(values, [0, 4, 5]);
    }

    #[test]
    fn rejects_an_enumeration_in_a_child_object() {
        let document = parse_document("Item { Rectangle { enum Kind { A } } }");
        assert!(!document.is_clean());
        assert!(document.components[0].enumerations.is_empty());
    }

    #[test]
    fn parses_an_inline_component() {
        let document = parse_clean("Item { component Badge: Rectangle { radius: 4 } }");
        let badge = &document.components[0].sub_components[0];
        assert_eq!(badge.name, ".Badge");
        let object = badge.root_object().expect("root object");
        assert_eq!(object.name, "Rectangle");
        assert_eq!(object.bindings.len(), 1);
    }

    #[test]
    fn collects_comment_spans() {
        let source = "// header\nItem {\n    width: 5 // trailing\n}\n";
        let document = parse_clean(source);
        assert_eq!(document.comments.len(), 2);
    }

    #[test]
    fn reports_multiple_root_objects() {
        let document = parse_document("Item {}\nText {}\n");
        assert_eq!(document.components.len(), 1);
        assert!(!document.is_clean());
    }

    #[test]
    fn recovers_from_a_broken_member() {
        let document = parse_document("Item {\n    42\n    width: 5\n}");
        assert!(!document.is_clean());
        assert_eq!(root_object(&document).bindings.len(), 1);
    }

    #[test]
    fn cuts_off_a_too_deep_object_tree() {
        let depth = 200;
        let mut source = "Item{".repeat(depth);
        source.push_str(&"}".repeat(depth));
        let document = parse_document(&source);
        assert!(!document.is_clean());
        assert!(document
            .diagnostics
            .iter()
            .any(|d| d.message.contains("nested too deeply")));
    }

    #[test]
    fn script_parse_errors_reach_the_document() {
        let document = parse_document("Item { width: (1 + }");
        assert!(!document.is_clean());
        let BindingValue::Script(script) = &root_object(&document).bindings[0].value else {
            panic!("expected a script value");
        };
        assert!(!script.is_clean());
    }

    #[test]
    fn dotted_names_parse_as_one_binding() {
        let document = parse_clean("Item { anchors.fill: parent }");
        let binding = &root_object(&document).bindings[0];
        assert_eq!(binding.name, "anchors.fill");
    }
}
