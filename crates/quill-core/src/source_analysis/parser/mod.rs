// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Quill documents and their embedded scripts.
//!
//! The parser is split across submodules by grammar layer:
//!
//! - [`mod@self`] — parser state, diagnostics, token management, recovery
//! - `expressions` — the script expression grammar (precedence climbing)
//! - `statements` — the script statement grammar
//! - `document` — the declarative outer grammar, producing DOM elements
//!
//! # Design Principles
//!
//! 1. **Never panic on malformed input** — errors become diagnostics and
//!    error nodes, and parsing continues
//! 2. **Spans everywhere** — every node and diagnostic carries a source span
//! 3. **Bounded recursion** — deeply nested input is cut off with an error
//!    node instead of overflowing the stack
//!
//! # Error Recovery
//!
//! On an unexpected token the parser records a diagnostic and either
//! produces an [`Expression::Error`] node or skips to the next statement
//! boundary ([`Parser::synchronize`]). A script with diagnostics still
//! yields a tree; callers decide whether a partial tree is usable (the
//! reformatter refuses to rewrite scripts that did not parse cleanly).

mod document;
mod expressions;
mod statements;

#[cfg(test)]
mod property_tests;

pub use document::{parse_document, ParsedDocument};

use ecow::EcoString;

use crate::ast::{Expression, NodeId, Statement};
use crate::source_analysis::{lex_source, LexError, Span, Token, TokenKind};

/// Maximum expression/statement nesting depth before the parser gives up.
///
/// Each recursion level is guarded by [`stacker::maybe_grow`], so the limit
/// exists to bound pathological input, not to protect the stack.
pub(crate) const MAX_NESTING_DEPTH: u32 = 64;

/// Severity of a parse diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A diagnostic produced while parsing, with a location and optional hint.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: EcoString,
    pub span: Span,
    pub hint: Option<EcoString>,
}

impl Diagnostic {
    /// Creates an error diagnostic.
    #[must_use]
    pub fn error(message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// Creates a warning diagnostic.
    #[must_use]
    pub fn warning(message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// Attaches a hint suggesting how to fix the problem.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<EcoString>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Renders this diagnostic as a [`miette::MietteDiagnostic`] with a
    /// labeled span, for report output.
    #[must_use]
    pub fn to_miette(&self) -> miette::MietteDiagnostic {
        let severity = match self.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        };
        let label = match self.severity {
            Severity::Error => "error here",
            Severity::Warning => "warning here",
        };
        let mut rendered = miette::MietteDiagnostic::new(self.message.to_string())
            .with_severity(severity)
            .with_label(miette::LabeledSpan::new_primary_with_span(
                Some(label.to_string()),
                self.span,
            ));
        if let Some(hint) = &self.hint {
            rendered = rendered.with_help(hint.to_string());
        }
        rendered
    }
}

impl From<&LexError> for Diagnostic {
    fn from(error: &LexError) -> Self {
        Self::error(error.to_string(), error.span)
    }
}

/// The result of parsing a standalone script fragment.
#[derive(Debug, Clone)]
pub struct ParsedScript {
    pub statements: Vec<Statement>,
    /// Content spans of comments, in source order, for comment attachment.
    pub comments: Vec<Span>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedScript {
    /// Returns true if the script parsed without errors.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics
            .iter()
            .all(|d| d.severity != Severity::Error)
    }
}

/// Parses a script fragment: a statement list running to end of input.
///
/// A bare expression parses as a single expression statement, so this one
/// entry point serves binding values, function bodies and standalone code.
/// Lexer errors are folded into the returned diagnostics.
///
/// # Examples
///
/// ```
/// use quill_core::source_analysis::parse_script;
///
/// let script = parse_script("width + height");
/// assert_eq!(script.statements.len(), 1);
/// assert!(script.is_clean());
/// ```
#[must_use]
pub fn parse_script(source: &str) -> ParsedScript {
    let lexed = lex_source(source);
    let mut diagnostics: Vec<Diagnostic> = lexed.errors.iter().map(Diagnostic::from).collect();
    let mut parser = Parser::new(lexed.tokens);
    let statements = parser.parse_statement_list(&TokenKind::Eof);
    diagnostics.extend(parser.diagnostics);
    ParsedScript {
        statements,
        comments: lexed.comments,
        diagnostics,
    }
}

/// The result of parsing a source that must be a single expression.
#[derive(Debug, Clone)]
pub struct ParsedExpression {
    pub expression: Expression,
    /// Content spans of comments, in source order, for comment attachment.
    pub comments: Vec<Span>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses a source that consists of exactly one expression, as binding
/// values and argument initializers do. Anything left over after the
/// expression is an error.
#[must_use]
pub fn parse_expression_script(source: &str) -> ParsedExpression {
    let lexed = lex_source(source);
    let mut diagnostics: Vec<Diagnostic> = lexed.errors.iter().map(Diagnostic::from).collect();
    let mut parser = Parser::new(lexed.tokens);
    let expression = parser.parse_expression(false);
    if !parser.is_at_end() {
        let span = parser.current_span();
        parser
            .diagnostics
            .push(Diagnostic::error("unexpected tokens after expression", span));
    }
    diagnostics.extend(parser.diagnostics);
    ParsedExpression {
        expression,
        comments: lexed.comments,
        diagnostics,
    }
}

/// Parser state shared by the document and script grammars.
pub(crate) struct Parser {
    tokens: Vec<Token>,
    current: usize,
    pub(crate) diagnostics: Vec<Diagnostic>,
    nesting_depth: u32,
    next_node_id: u32,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        let mut tokens = tokens;
        if tokens.is_empty() {
            tokens.push(Token::new(TokenKind::Eof, Span::new(0, 0), false));
        }
        Self {
            tokens,
            current: 0,
            diagnostics: Vec::new(),
            nesting_depth: 0,
            next_node_id: 0,
        }
    }

    /// Mints the identity for a node about to be built.
    pub(crate) fn fresh_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    // ── Token management ──────────────────────────────────────────────────

    /// Index of the current token. Loops compare positions before and after
    /// a parse step to detect a step that consumed nothing.
    pub(crate) fn position(&self) -> usize {
        self.current
    }

    /// Returns the current token, or the final token when past the end.
    pub(crate) fn current_token(&self) -> &Token {
        self.tokens
            .get(self.current)
            .unwrap_or_else(|| self.tokens.last().expect("token stream is never empty"))
    }

    pub(crate) fn current_kind(&self) -> &TokenKind {
        self.current_token().kind()
    }

    pub(crate) fn current_span(&self) -> Span {
        self.current_token().span()
    }

    /// Returns the token kind `offset` tokens ahead of the current one.
    pub(crate) fn peek_kind(&self, offset: usize) -> &TokenKind {
        self.tokens
            .get(self.current + offset)
            .map_or(&TokenKind::Eof, Token::kind)
    }

    /// Span of the most recently consumed token.
    pub(crate) fn previous_span(&self) -> Span {
        let index = self.current.saturating_sub(1).min(self.tokens.len() - 1);
        self.tokens[index].span()
    }

    /// Widens `start` to cover everything up to the previous token.
    pub(crate) fn span_from(&self, start: Span) -> Span {
        Span::new(start.start(), self.previous_span().end().max(start.end()))
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Consumes and returns the current token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if self.current < self.tokens.len() - 1 {
            self.current += 1;
        }
        token
    }

    /// Returns true if the current token has the same kind, ignoring any
    /// payload (an `Identifier("x")` matches an `Identifier("y")`).
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    /// Consumes the current token if it matches `kind`.
    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes a token of the given kind or records an error diagnostic.
    pub(crate) fn expect(&mut self, kind: &TokenKind, message: &str) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            self.error(message);
            None
        }
    }

    /// Returns true if the current token is an identifier with this exact
    /// text. Used for the contextual keywords (`of`, `as`, `from`, `get`,
    /// `set`, `static`) that are ordinary identifiers elsewhere.
    pub(crate) fn check_contextual(&self, word: &str) -> bool {
        matches!(self.current_kind(), TokenKind::Identifier(name) if name == word)
    }

    pub(crate) fn match_contextual(&mut self, word: &str) -> bool {
        if self.check_contextual(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes an identifier token and returns its text.
    pub(crate) fn expect_identifier(&mut self, message: &str) -> Option<EcoString> {
        match self.current_kind() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ => {
                self.error(message);
                None
            }
        }
    }

    // ── Diagnostics ───────────────────────────────────────────────────────

    /// Records an error diagnostic at the current token.
    pub(crate) fn error(&mut self, message: impl Into<EcoString>) {
        let span = self.current_span();
        self.error_at(message, span);
    }

    pub(crate) fn error_at(&mut self, message: impl Into<EcoString>, span: Span) {
        self.diagnostics.push(Diagnostic::error(message, span));
    }

    /// Builds an error expression node and records the diagnostic for it.
    pub(crate) fn error_expression(&mut self, message: impl Into<EcoString>) -> Expression {
        let message = message.into();
        let span = self.current_span();
        self.error_at(message.clone(), span);
        Expression::Error {
            id: self.fresh_id(),
            span,
            message,
        }
    }

    // ── Nesting guard ─────────────────────────────────────────────────────

    /// Enters one nesting level, or produces an error expression when the
    /// input is nested too deeply to be worth parsing further.
    pub(crate) fn enter_nesting(&mut self, span: Span) -> Result<(), Expression> {
        if self.nesting_depth >= MAX_NESTING_DEPTH {
            let message: EcoString = "input is nested too deeply".into();
            self.error_at(message.clone(), span);
            return Err(Expression::Error {
                id: self.fresh_id(),
                span,
                message,
            });
        }
        self.nesting_depth += 1;
        Ok(())
    }

    pub(crate) fn leave_nesting(&mut self) {
        debug_assert!(self.nesting_depth > 0, "unbalanced leave_nesting");
        self.nesting_depth = self.nesting_depth.saturating_sub(1);
    }

    // ── Recovery ──────────────────────────────────────────────────────────

    /// Skips tokens until a likely statement boundary.
    pub(crate) fn synchronize(&mut self) {
        while !self.is_at_end() {
            if matches!(self.current_kind(), TokenKind::Semicolon) {
                self.advance();
                return;
            }
            if self.at_recovery_point() {
                return;
            }
            self.advance();
        }
    }

    fn at_recovery_point(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::LeftBrace
                | TokenKind::RightBrace
                | TokenKind::Var
                | TokenKind::Let
                | TokenKind::Const
                | TokenKind::If
                | TokenKind::Do
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Continue
                | TokenKind::Break
                | TokenKind::Return
                | TokenKind::Switch
                | TokenKind::Throw
                | TokenKind::Try
                | TokenKind::Function
                | TokenKind::Class
                | TokenKind::Import
                | TokenKind::Export
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_script_bare_expression() {
        let script = parse_script("width + height");
        assert_eq!(script.statements.len(), 1);
        assert!(script.is_clean());
        assert!(matches!(script.statements[0], Statement::Expression(_)));
    }

    #[test]
    fn parse_script_collects_comment_spans() {
        let script = parse_script("// note\nx = 1;");
        assert_eq!(script.comments.len(), 1);
        assert!(script.is_clean());
    }

    #[test]
    fn lexer_errors_become_diagnostics() {
        let script = parse_script("let s = \"open");
        assert!(!script.is_clean());
        assert!(script
            .diagnostics
            .iter()
            .any(|d| d.message.contains("unterminated string")));
    }

    #[test]
    fn deep_nesting_is_cut_off() {
        let depth = 200;
        let mut source = String::new();
        source.push_str(&"(".repeat(depth));
        source.push('1');
        source.push_str(&")".repeat(depth));
        let script = parse_script(&source);
        assert!(!script.is_clean());
        assert!(script
            .diagnostics
            .iter()
            .any(|d| d.message.contains("nested too deeply")));
    }

    #[test]
    fn diagnostic_hint() {
        let diagnostic = Diagnostic::error("expected ';'", Span::new(0, 1))
            .with_hint("statements are separated by semicolons or newlines");
        assert_eq!(diagnostic.severity, Severity::Error);
        assert!(diagnostic.hint.is_some());
    }

    #[test]
    fn diagnostic_renders_to_miette() {
        let diagnostic = Diagnostic::error("expected ';'", Span::new(4, 5))
            .with_hint("statements are separated by semicolons or newlines");
        let rendered = diagnostic.to_miette();
        assert_eq!(rendered.message, "expected ';'");
        assert_eq!(rendered.severity, Some(miette::Severity::Error));
        assert_eq!(
            rendered.help.as_deref(),
            Some("statements are separated by semicolons or newlines")
        );
        let labels = rendered.labels.unwrap();
        assert_eq!(labels[0].offset(), 4);
        assert_eq!(labels[0].len(), 1);
    }

    #[test]
    fn empty_token_stream_is_tolerated() {
        let mut parser = Parser::new(Vec::new());
        assert!(parser.is_at_end());
        let statements = parser.parse_statement_list(&TokenKind::Eof);
        assert!(statements.is_empty());
    }
}
