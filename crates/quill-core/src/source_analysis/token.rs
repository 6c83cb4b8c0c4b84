// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types for Quill lexical analysis.
//!
//! This module defines the tokens produced by the lexer for both the outer
//! declarative document grammar and the embedded script sub-language.
//!
//! # Token Structure
//!
//! Each token consists of:
//! - A [`TokenKind`] indicating the type of token
//! - A [`Span`] indicating its location in source
//! - A `newline_before` flag recording whether a line terminator preceded it
//!   (consumed by the parser's semicolon inference)
//!
//! Comments are not tokens: the lexer accumulates their spans separately so
//! the comment collector can attach them to syntax positionally.
//!
//! # Contextual keywords
//!
//! The declarative layer's vocabulary (`property`, `signal`, `component`,
//! `required`, `readonly`, `on`, `pragma`, `as`, and friends) stays valid as
//! script identifiers, so those words lex as [`TokenKind::Identifier`] and
//! the document parser matches them by text.

use ecow::EcoString;

use super::Span;

/// The kind of token, not including source location.
///
/// Tokens are cheap to clone ([`EcoString`] for string data). Literal kinds
/// keep the raw source text, quotes and exponents included, because the
/// reformatter re-emits literals byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Identifiers and literals ===
    /// An identifier: `width`, `root`, `Rectangle`
    Identifier(EcoString),

    /// A numeric literal, raw text: `42`, `0xFF`, `2.5e10`
    Number(EcoString),

    /// A string literal, raw text including quotes: `"hi"`, `'hi'`
    String(EcoString),

    /// A regular expression literal, raw text: `/a.b/g`
    Regex(EcoString),

    /// A template literal without substitutions: `` `text` ``
    TemplateComplete(EcoString),

    /// Head of a substituted template: `` `text${ ``
    TemplateHead(EcoString),

    /// Middle chunk between substitutions: `}text${`
    TemplateMiddle(EcoString),

    /// Tail chunk closing the template: `` }text` ``
    TemplateTail(EcoString),

    // === Keywords (script) ===
    Break,
    Case,
    Catch,
    Class,
    Const,
    Continue,
    Default,
    Delete,
    Do,
    Else,
    Enum,
    Export,
    Extends,
    False,
    Finally,
    For,
    Function,
    If,
    Import,
    In,
    InstanceOf,
    Let,
    New,
    Null,
    Return,
    Super,
    Switch,
    This,
    Throw,
    True,
    Try,
    TypeOf,
    Var,
    Void,
    While,
    With,
    Yield,

    // === Punctuation ===
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    Colon,
    Question,
    Arrow,

    // === Operators ===
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    LtLt,
    GtGt,
    GtGtGt,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Not,
    Lt,
    Gt,
    Le,
    Ge,
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    AmpAmp,
    PipePipe,
    QuestionQuestion,

    // === Assignment operators ===
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    StarStarEq,
    SlashEq,
    PercentEq,
    LtLtEq,
    GtGtEq,
    GtGtGtEq,
    AmpEq,
    PipeEq,
    CaretEq,

    // === Special ===
    /// End of file
    Eof,

    /// Invalid/error token (preserves unparseable text for error recovery)
    Error(EcoString),
}

impl TokenKind {
    /// Looks up a reserved word, or `None` if `word` is an ordinary
    /// identifier.
    #[must_use]
    pub fn keyword(word: &str) -> Option<Self> {
        let kind = match word {
            "break" => Self::Break,
            "case" => Self::Case,
            "catch" => Self::Catch,
            "class" => Self::Class,
            "const" => Self::Const,
            "continue" => Self::Continue,
            "default" => Self::Default,
            "delete" => Self::Delete,
            "do" => Self::Do,
            "else" => Self::Else,
            "enum" => Self::Enum,
            "export" => Self::Export,
            "extends" => Self::Extends,
            "false" => Self::False,
            "finally" => Self::Finally,
            "for" => Self::For,
            "function" => Self::Function,
            "if" => Self::If,
            "import" => Self::Import,
            "in" => Self::In,
            "instanceof" => Self::InstanceOf,
            "let" => Self::Let,
            "new" => Self::New,
            "null" => Self::Null,
            "return" => Self::Return,
            "super" => Self::Super,
            "switch" => Self::Switch,
            "this" => Self::This,
            "throw" => Self::Throw,
            "true" => Self::True,
            "try" => Self::Try,
            "typeof" => Self::TypeOf,
            "var" => Self::Var,
            "void" => Self::Void,
            "while" => Self::While,
            "with" => Self::With,
            "yield" => Self::Yield,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns `true` if this token is a literal value.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Number(_)
                | Self::String(_)
                | Self::Regex(_)
                | Self::TemplateComplete(_)
                | Self::True
                | Self::False
                | Self::Null
        )
    }

    /// Returns `true` if this token is a plain identifier.
    #[must_use]
    pub const fn is_identifier(&self) -> bool {
        matches!(self, Self::Identifier(_))
    }

    /// Returns `true` if this token may be used as a member or property
    /// name (identifiers plus reserved words, as in `style.default`).
    #[must_use]
    pub fn is_identifier_name(&self) -> bool {
        self.is_identifier() || self.reserved_word_text().is_some()
    }

    /// Returns `true` for the assignment operator family, `=` included.
    #[must_use]
    pub const fn is_assign_op(&self) -> bool {
        matches!(
            self,
            Self::Eq
                | Self::PlusEq
                | Self::MinusEq
                | Self::StarEq
                | Self::StarStarEq
                | Self::SlashEq
                | Self::PercentEq
                | Self::LtLtEq
                | Self::GtGtEq
                | Self::GtGtGtEq
                | Self::AmpEq
                | Self::PipeEq
                | Self::CaretEq
        )
    }

    /// Returns `true` if this is the end-of-file marker.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Returns `true` if this is an error token.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns the source text of a reserved word token.
    #[must_use]
    pub const fn reserved_word_text(&self) -> Option<&'static str> {
        let text = match self {
            Self::Break => "break",
            Self::Case => "case",
            Self::Catch => "catch",
            Self::Class => "class",
            Self::Const => "const",
            Self::Continue => "continue",
            Self::Default => "default",
            Self::Delete => "delete",
            Self::Do => "do",
            Self::Else => "else",
            Self::Enum => "enum",
            Self::Export => "export",
            Self::Extends => "extends",
            Self::False => "false",
            Self::Finally => "finally",
            Self::For => "for",
            Self::Function => "function",
            Self::If => "if",
            Self::Import => "import",
            Self::In => "in",
            Self::InstanceOf => "instanceof",
            Self::Let => "let",
            Self::New => "new",
            Self::Null => "null",
            Self::Return => "return",
            Self::Super => "super",
            Self::Switch => "switch",
            Self::This => "this",
            Self::Throw => "throw",
            Self::True => "true",
            Self::Try => "try",
            Self::TypeOf => "typeof",
            Self::Var => "var",
            Self::Void => "void",
            Self::While => "while",
            Self::With => "with",
            Self::Yield => "yield",
            _ => return None,
        };
        Some(text)
    }

    /// Returns the string content if this token carries one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Identifier(s)
            | Self::Number(s)
            | Self::String(s)
            | Self::Regex(s)
            | Self::TemplateComplete(s)
            | Self::TemplateHead(s)
            | Self::TemplateMiddle(s)
            | Self::TemplateTail(s)
            | Self::Error(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(text) = self.reserved_word_text() {
            return write!(f, "{text}");
        }
        match self {
            Self::Identifier(s)
            | Self::Number(s)
            | Self::String(s)
            | Self::Regex(s)
            | Self::TemplateComplete(s)
            | Self::TemplateHead(s)
            | Self::TemplateMiddle(s)
            | Self::TemplateTail(s) => write!(f, "{s}"),
            Self::Error(s) => write!(f, "<error: {s}>"),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::LeftBracket => write!(f, "["),
            Self::RightBracket => write!(f, "]"),
            Self::LeftBrace => write!(f, "{{"),
            Self::RightBrace => write!(f, "}}"),
            Self::Semicolon => write!(f, ";"),
            Self::Comma => write!(f, ","),
            Self::Dot => write!(f, "."),
            Self::Ellipsis => write!(f, "..."),
            Self::Colon => write!(f, ":"),
            Self::Question => write!(f, "?"),
            Self::Arrow => write!(f, "=>"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::StarStar => write!(f, "**"),
            Self::Slash => write!(f, "/"),
            Self::Percent => write!(f, "%"),
            Self::PlusPlus => write!(f, "++"),
            Self::MinusMinus => write!(f, "--"),
            Self::LtLt => write!(f, "<<"),
            Self::GtGt => write!(f, ">>"),
            Self::GtGtGt => write!(f, ">>>"),
            Self::Amp => write!(f, "&"),
            Self::Pipe => write!(f, "|"),
            Self::Caret => write!(f, "^"),
            Self::Tilde => write!(f, "~"),
            Self::Not => write!(f, "!"),
            Self::Lt => write!(f, "<"),
            Self::Gt => write!(f, ">"),
            Self::Le => write!(f, "<="),
            Self::Ge => write!(f, ">="),
            Self::EqEq => write!(f, "=="),
            Self::NotEq => write!(f, "!="),
            Self::EqEqEq => write!(f, "==="),
            Self::NotEqEq => write!(f, "!=="),
            Self::AmpAmp => write!(f, "&&"),
            Self::PipePipe => write!(f, "||"),
            Self::QuestionQuestion => write!(f, "??"),
            Self::Eq => write!(f, "="),
            Self::PlusEq => write!(f, "+="),
            Self::MinusEq => write!(f, "-="),
            Self::StarEq => write!(f, "*="),
            Self::StarStarEq => write!(f, "**="),
            Self::SlashEq => write!(f, "/="),
            Self::PercentEq => write!(f, "%="),
            Self::LtLtEq => write!(f, "<<="),
            Self::GtGtEq => write!(f, ">>="),
            Self::GtGtGtEq => write!(f, ">>>="),
            Self::AmpEq => write!(f, "&="),
            Self::PipeEq => write!(f, "|="),
            Self::CaretEq => write!(f, "^="),
            Self::Eof => write!(f, "<eof>"),
            _ => unreachable!("reserved words are handled above"),
        }
    }
}

/// A token with its source location.
///
/// # Examples
///
/// ```
/// use quill_core::source_analysis::{Span, Token, TokenKind};
///
/// let token = Token::new(TokenKind::Identifier("width".into()), Span::new(0, 5), false);
/// assert!(matches!(token.kind(), TokenKind::Identifier(_)));
/// assert_eq!(token.span().len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    span: Span,
    newline_before: bool,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, span: Span, newline_before: bool) -> Self {
        Self {
            kind,
            span,
            newline_before,
        }
    }

    /// Returns the kind of this token.
    #[must_use]
    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Consumes the token and returns its kind.
    #[must_use]
    pub fn into_kind(self) -> TokenKind {
        self.kind
    }

    /// Returns the source span of this token.
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns `true` if a line terminator separated this token from the
    /// previous one. Drives semicolon inference and the restricted
    /// productions (`return`, postfix `++`/`--`).
    #[must_use]
    pub fn newline_before(&self) -> bool {
        self.newline_before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup() {
        assert_eq!(TokenKind::keyword("function"), Some(TokenKind::Function));
        assert_eq!(TokenKind::keyword("instanceof"), Some(TokenKind::InstanceOf));
        assert_eq!(TokenKind::keyword("property"), None);
        assert_eq!(TokenKind::keyword("signal"), None);
        assert_eq!(TokenKind::keyword("on"), None);
    }

    #[test]
    fn token_kind_display() {
        assert_eq!(TokenKind::Identifier("width".into()).to_string(), "width");
        assert_eq!(TokenKind::Number("0x10".into()).to_string(), "0x10");
        assert_eq!(TokenKind::String("\"hi\"".into()).to_string(), "\"hi\"");
        assert_eq!(TokenKind::Arrow.to_string(), "=>");
        assert_eq!(TokenKind::Ellipsis.to_string(), "...");
        assert_eq!(TokenKind::GtGtGtEq.to_string(), ">>>=");
        assert_eq!(TokenKind::InstanceOf.to_string(), "instanceof");
    }

    #[test]
    fn token_kind_predicates() {
        assert!(TokenKind::Number("1".into()).is_literal());
        assert!(TokenKind::True.is_literal());
        assert!(!TokenKind::Identifier("x".into()).is_literal());

        assert!(TokenKind::Identifier("x".into()).is_identifier_name());
        assert!(TokenKind::Default.is_identifier_name());
        assert!(!TokenKind::LeftBrace.is_identifier_name());

        assert!(TokenKind::Eq.is_assign_op());
        assert!(TokenKind::GtGtGtEq.is_assign_op());
        assert!(!TokenKind::EqEq.is_assign_op());

        assert!(TokenKind::Eof.is_eof());
        assert!(TokenKind::Error("bad".into()).is_error());
    }

    #[test]
    fn token_accessors() {
        let token = Token::new(TokenKind::Semicolon, Span::new(3, 4), true);
        assert_eq!(token.kind(), &TokenKind::Semicolon);
        assert_eq!(token.span().start(), 3);
        assert!(token.newline_before());
    }
}
