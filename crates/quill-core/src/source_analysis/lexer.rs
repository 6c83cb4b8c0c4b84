// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Quill source code.
//!
//! This module converts source text into a stream of [`Token`]s. The lexer
//! is hand-written for maximum control over error recovery and the
//! context-sensitive corners of the script sub-language.
//!
//! # Design Principles
//!
//! - **Error recovery**: Never panic on malformed input; emit
//!   [`TokenKind::Error`] and keep going
//! - **Comment preservation**: Comment content spans are collected on the
//!   side so the comment collector can attach them to syntax
//! - **Precise spans**: Every token carries its exact source location
//!
//! # Context sensitivity
//!
//! Two constructs cannot be lexed without context. A `/` starts a regular
//! expression literal unless the previous token could end an expression, in
//! which case it is division. And template literals interleave raw chunks
//! with arbitrary expressions, so the lexer keeps a stack of open `${`
//! substitutions and splits the template into
//! [`TemplateHead`](TokenKind::TemplateHead) /
//! [`TemplateMiddle`](TokenKind::TemplateMiddle) /
//! [`TemplateTail`](TokenKind::TemplateTail) chunks around them.
//!
//! # Example
//!
//! ```
//! use quill_core::source_analysis::{Lexer, TokenKind};
//!
//! let tokens: Vec<_> = Lexer::new("x + 1").collect();
//! assert_eq!(tokens.len(), 3); // x, +, 1 (EOF excluded from iterator)
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use super::{LexError, Span, Token, TokenKind};

/// An open `${` template substitution: the brace depth inside it plus the
/// offset of the backtick that opened the template, for error reporting.
struct OpenTemplate {
    brace_depth: u32,
    start: u32,
}

/// A lexer that tokenizes Quill source code.
///
/// The lexer produces tokens with their source spans and a `newline_before`
/// flag used by the parser's semicolon inference. It implements [`Iterator`]
/// for easy consumption.
///
/// # Error Recovery
///
/// The lexer never fails completely. Unknown characters produce
/// [`TokenKind::Error`] tokens and unterminated literals are closed at the
/// end of input, allowing parsing to continue. Everything it recovers from
/// is also recorded as a [`LexError`].
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// Character iterator with byte positions.
    chars: Peekable<CharIndices<'src>>,
    /// Current byte position in source.
    position: usize,
    /// Set when a line terminator was crossed since the previous token.
    newline_pending: bool,
    /// Whether a `/` at the current position starts a regular expression.
    regex_allowed: bool,
    /// Stack of open `${` template substitutions.
    open_templates: Vec<OpenTemplate>,
    /// Content spans of comments seen so far, in source order.
    comments: Vec<Span>,
    /// Recovered lexical errors, in source order.
    errors: Vec<LexError>,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.position)
            .field("remaining", &self.source.get(self.position..).unwrap_or(""))
            .finish()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            position: 0,
            newline_pending: false,
            regex_allowed: true,
            open_templates: Vec::new(),
            comments: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peeks `n+1` characters ahead without consuming (n=0 is same as
    /// `peek_char`, n=1 returns the second character, etc.).
    fn peek_char_n(&self, n: usize) -> Option<char> {
        let mut iter = self.chars.clone();
        for _ in 0..n {
            iter.next();
        }
        iter.next().map(|(_, c)| c)
    }

    /// Consumes the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        Some(c)
    }

    /// Consumes characters while the predicate is true.
    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// Returns the current byte position.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn current_position(&self) -> u32 {
        self.position as u32
    }

    /// Creates a span from start to current position.
    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.current_position())
    }

    /// Extracts source text for a span.
    fn text_for(&self, span: Span) -> &'src str {
        &self.source[span.as_range()]
    }

    fn is_identifier_start(c: char) -> bool {
        c.is_alphabetic() || c == '_' || c == '$'
    }

    fn is_identifier_continue(c: char) -> bool {
        c.is_alphanumeric() || c == '_' || c == '$'
    }

    /// Skips whitespace and comments, recording comment content spans and
    /// whether a line terminator was crossed.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ' | '\t') => {
                    self.advance();
                }
                Some('\n' | '\r') => {
                    self.advance();
                    self.newline_pending = true;
                }
                Some('/') if self.peek_char_n(1) == Some('/') => {
                    self.lex_line_comment();
                }
                Some('/') if self.peek_char_n(1) == Some('*') => {
                    self.lex_block_comment();
                }
                _ => break,
            }
        }
    }

    /// Lexes a line comment: `// ...`
    ///
    /// The recorded span covers the content only, after the `//` marker and
    /// before the line terminator.
    fn lex_line_comment(&mut self) {
        self.advance(); // /
        self.advance(); // /
        let content_start = self.current_position();
        self.advance_while(|c| !matches!(c, '\n' | '\r'));
        self.comments.push(self.span_from(content_start));
    }

    /// Lexes a block comment: `/* ... */`
    ///
    /// The recorded span covers the content only, between the `/*` and `*/`
    /// markers. A line terminator inside the comment still counts as a
    /// newline before the next token.
    fn lex_block_comment(&mut self) {
        let open = self.current_position();
        self.advance(); // /
        self.advance(); // *
        let content_start = self.current_position();

        loop {
            match self.peek_char() {
                None => {
                    // Unterminated - recover by closing at end of input
                    self.errors
                        .push(LexError::unterminated_comment(self.span_from(open)));
                    self.comments.push(self.span_from(content_start));
                    return;
                }
                Some('*') if self.peek_char_n(1) == Some('/') => {
                    let content_end = self.current_position();
                    self.advance(); // *
                    self.advance(); // /
                    self.comments.push(Span::new(content_start, content_end));
                    return;
                }
                Some('\n' | '\r') => {
                    self.advance();
                    self.newline_pending = true;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Lexes the next token.
    fn lex_token(&mut self) -> Token {
        self.skip_trivia();
        let newline_before = std::mem::take(&mut self.newline_pending);

        let start = self.current_position();
        let kind = match self.peek_char() {
            None => {
                // A template still open at end of input never saw its tail
                if let Some(open_start) = self.open_templates.first().map(|t| t.start) {
                    let span = self.span_from(open_start);
                    self.errors.push(LexError::unterminated_template(span));
                    self.open_templates.clear();
                }
                TokenKind::Eof
            }
            Some(c) => self.lex_token_kind(c, start),
        };
        let span = self.span_from(start);

        self.regex_allowed = !matches!(
            kind,
            TokenKind::Identifier(_)
                | TokenKind::Number(_)
                | TokenKind::String(_)
                | TokenKind::Regex(_)
                | TokenKind::TemplateComplete(_)
                | TokenKind::TemplateTail(_)
                | TokenKind::RightParen
                | TokenKind::RightBracket
                | TokenKind::This
                | TokenKind::Super
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
        );

        Token::new(kind, span, newline_before)
    }

    /// Lexes a token kind based on the first character.
    #[allow(clippy::too_many_lines)] // one arm per token start
    fn lex_token_kind(&mut self, c: char, start: u32) -> TokenKind {
        match c {
            // Identifiers and keywords
            c if Self::is_identifier_start(c) => self.lex_identifier_or_keyword(),

            // Numbers
            '0'..='9' => self.lex_number(),

            // Strings (both quote styles; may span lines)
            '"' | '\'' => self.lex_string(c, start),

            // Template literals
            '`' => {
                self.advance(); // `
                self.lex_template_chunk(start, true)
            }

            // Regular expression, or division below
            '/' if self.regex_allowed => self.lex_regex(start),

            '.' => {
                if self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit()) {
                    return self.lex_number();
                }
                self.advance();
                if self.peek_char() == Some('.') && self.peek_char_n(1) == Some('.') {
                    self.advance();
                    self.advance();
                    TokenKind::Ellipsis
                } else {
                    TokenKind::Dot
                }
            }

            '(' => {
                self.advance();
                TokenKind::LeftParen
            }
            ')' => {
                self.advance();
                TokenKind::RightParen
            }
            '[' => {
                self.advance();
                TokenKind::LeftBracket
            }
            ']' => {
                self.advance();
                TokenKind::RightBracket
            }
            '{' => {
                self.advance();
                if let Some(open) = self.open_templates.last_mut() {
                    open.brace_depth += 1;
                }
                TokenKind::LeftBrace
            }
            '}' => {
                // A `}` at substitution depth zero resumes the template
                if self.open_templates.last().is_some_and(|t| t.brace_depth == 0) {
                    self.advance(); // }
                    return self.lex_template_chunk(start, false);
                }
                if let Some(open) = self.open_templates.last_mut() {
                    open.brace_depth -= 1;
                }
                self.advance();
                TokenKind::RightBrace
            }
            ';' => {
                self.advance();
                TokenKind::Semicolon
            }
            ',' => {
                self.advance();
                TokenKind::Comma
            }
            ':' => {
                self.advance();
                TokenKind::Colon
            }
            '?' => {
                self.advance();
                if self.peek_char() == Some('?') {
                    self.advance();
                    TokenKind::QuestionQuestion
                } else {
                    TokenKind::Question
                }
            }
            '~' => {
                self.advance();
                TokenKind::Tilde
            }

            '+' => self.lex_operator(
                &[("++", TokenKind::PlusPlus), ("+=", TokenKind::PlusEq)],
                TokenKind::Plus,
            ),
            '-' => self.lex_operator(
                &[("--", TokenKind::MinusMinus), ("-=", TokenKind::MinusEq)],
                TokenKind::Minus,
            ),
            '*' => self.lex_operator(
                &[
                    ("**=", TokenKind::StarStarEq),
                    ("**", TokenKind::StarStar),
                    ("*=", TokenKind::StarEq),
                ],
                TokenKind::Star,
            ),
            '/' => self.lex_operator(&[("/=", TokenKind::SlashEq)], TokenKind::Slash),
            '%' => self.lex_operator(&[("%=", TokenKind::PercentEq)], TokenKind::Percent),
            '<' => self.lex_operator(
                &[
                    ("<<=", TokenKind::LtLtEq),
                    ("<<", TokenKind::LtLt),
                    ("<=", TokenKind::Le),
                ],
                TokenKind::Lt,
            ),
            '>' => self.lex_operator(
                &[
                    (">>>=", TokenKind::GtGtGtEq),
                    (">>>", TokenKind::GtGtGt),
                    (">>=", TokenKind::GtGtEq),
                    (">>", TokenKind::GtGt),
                    (">=", TokenKind::Ge),
                ],
                TokenKind::Gt,
            ),
            '=' => self.lex_operator(
                &[
                    ("===", TokenKind::EqEqEq),
                    ("==", TokenKind::EqEq),
                    ("=>", TokenKind::Arrow),
                ],
                TokenKind::Eq,
            ),
            '!' => self.lex_operator(
                &[("!==", TokenKind::NotEqEq), ("!=", TokenKind::NotEq)],
                TokenKind::Not,
            ),
            '&' => self.lex_operator(
                &[("&&", TokenKind::AmpAmp), ("&=", TokenKind::AmpEq)],
                TokenKind::Amp,
            ),
            '|' => self.lex_operator(
                &[("||", TokenKind::PipePipe), ("|=", TokenKind::PipeEq)],
                TokenKind::Pipe,
            ),
            '^' => self.lex_operator(&[("^=", TokenKind::CaretEq)], TokenKind::Caret),

            // Unknown character - error recovery
            _ => {
                self.advance();
                let span = self.span_from(start);
                self.errors.push(LexError::unexpected_char(c, span));
                TokenKind::Error(self.text_for(span).into())
            }
        }
    }

    /// Lexes a multi-character operator by longest match, falling back to
    /// the single-character form.
    fn lex_operator(&mut self, longer: &[(&str, TokenKind)], single: TokenKind) -> TokenKind {
        for (text, kind) in longer {
            let matched = text
                .chars()
                .enumerate()
                .skip(1)
                .all(|(i, c)| self.peek_char_n(i) == Some(c));
            if matched {
                for _ in 0..text.chars().count() {
                    self.advance();
                }
                return kind.clone();
            }
        }
        self.advance();
        single
    }

    /// Lexes an identifier or reserved word.
    ///
    /// The declarative vocabulary (`property`, `signal`, `on`, ...) is not
    /// reserved, so those words come out as plain identifiers.
    fn lex_identifier_or_keyword(&mut self) -> TokenKind {
        let start = self.current_position();
        self.advance_while(Self::is_identifier_continue);
        let text = self.text_for(self.span_from(start));
        TokenKind::keyword(text).unwrap_or_else(|| TokenKind::Identifier(text.into()))
    }

    /// Lexes a numeric literal, keeping the raw source text.
    ///
    /// Handles decimal, leading-dot, hex (`0x`), octal (`0o`) and binary
    /// (`0b`) forms plus fractions and exponents.
    fn lex_number(&mut self) -> TokenKind {
        let start = self.current_position();

        if self.peek_char() == Some('0')
            && matches!(self.peek_char_n(1), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B'))
        {
            self.advance(); // 0
            self.advance(); // radix marker
            self.advance_while(|c| c.is_ascii_alphanumeric());
            return TokenKind::Number(self.text_for(self.span_from(start)).into());
        }

        self.advance_while(|c| c.is_ascii_digit());
        if self.peek_char() == Some('.') {
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let sign = usize::from(matches!(self.peek_char_n(1), Some('+' | '-')));
            if self.peek_char_n(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                self.advance(); // e
                if sign == 1 {
                    self.advance();
                }
                self.advance_while(|c| c.is_ascii_digit());
            }
        }
        TokenKind::Number(self.text_for(self.span_from(start)).into())
    }

    /// Lexes a string literal, keeping the raw source text with quotes.
    ///
    /// Strings may span lines; the line terminators stay inside the token
    /// and do not count as a newline before the next one.
    fn lex_string(&mut self, quote: char, start: u32) -> TokenKind {
        self.advance(); // opening quote
        loop {
            match self.peek_char() {
                None => {
                    self.errors
                        .push(LexError::unterminated_string(self.span_from(start)));
                    break;
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
        TokenKind::String(self.text_for(self.span_from(start)).into())
    }

    /// Lexes one raw chunk of a template literal, the opening delimiter
    /// (`` ` `` or the `}` closing a substitution) already consumed.
    ///
    /// Returns the chunk kind determined by what ends it: a backtick closes
    /// the template, `${` opens a substitution.
    fn lex_template_chunk(&mut self, start: u32, opens: bool) -> TokenKind {
        loop {
            match self.peek_char() {
                None => {
                    self.errors
                        .push(LexError::unterminated_template(self.span_from(start)));
                    if !opens {
                        self.open_templates.pop();
                    }
                    let text = self.text_for(self.span_from(start));
                    return if opens {
                        TokenKind::TemplateComplete(text.into())
                    } else {
                        TokenKind::TemplateTail(text.into())
                    };
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('`') => {
                    self.advance();
                    let text = self.text_for(self.span_from(start));
                    return if opens {
                        TokenKind::TemplateComplete(text.into())
                    } else {
                        self.open_templates.pop();
                        TokenKind::TemplateTail(text.into())
                    };
                }
                Some('$') if self.peek_char_n(1) == Some('{') => {
                    self.advance(); // $
                    self.advance(); // {
                    let text = self.text_for(self.span_from(start));
                    if opens {
                        self.open_templates.push(OpenTemplate {
                            brace_depth: 0,
                            start,
                        });
                        return TokenKind::TemplateHead(text.into());
                    }
                    // still inside the same substitution slot
                    return TokenKind::TemplateMiddle(text.into());
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Lexes a regular expression literal: `/pattern/flags`
    ///
    /// Inside a character class a `/` does not terminate the pattern. A line
    /// terminator inside the pattern is an error; the literal is closed there.
    fn lex_regex(&mut self, start: u32) -> TokenKind {
        self.advance(); // /
        let mut in_class = false;
        loop {
            match self.peek_char() {
                None | Some('\n' | '\r') => {
                    self.errors
                        .push(LexError::unterminated_regex(self.span_from(start)));
                    return TokenKind::Regex(self.text_for(self.span_from(start)).into());
                }
                Some('\\') => {
                    self.advance();
                    if !matches!(self.peek_char(), None | Some('\n' | '\r')) {
                        self.advance();
                    }
                }
                Some('[') => {
                    in_class = true;
                    self.advance();
                }
                Some(']') => {
                    in_class = false;
                    self.advance();
                }
                Some('/') if !in_class => {
                    self.advance();
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
        self.advance_while(Self::is_identifier_continue);
        TokenKind::Regex(self.text_for(self.span_from(start)).into())
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.lex_token();
        if token.kind().is_eof() {
            None
        } else {
            Some(token)
        }
    }
}

/// The complete result of lexing a source text.
///
/// Comments are not part of the token stream: their content spans (marker
/// characters excluded) are collected on the side for the comment collector.
#[derive(Debug, Clone)]
pub struct LexedSource {
    /// All tokens, ending with an EOF token.
    pub tokens: Vec<Token>,
    /// Content spans of every comment, in source order.
    pub comments: Vec<Span>,
    /// Lexical errors the lexer recovered from.
    pub errors: Vec<LexError>,
}

/// Convenience function to lex source into a vector of tokens (excluding EOF).
///
/// For most use cases, prefer [`lex_source`], which also yields comment
/// spans and recovered errors.
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Lexes source completely, returning tokens (EOF included), comment
/// content spans and recovered errors.
///
/// # Examples
///
/// ```
/// use quill_core::source_analysis::lex_source;
///
/// let lexed = lex_source("x = 1 // set x\n");
/// assert_eq!(lexed.tokens.len(), 4); // x, =, 1, EOF
/// assert_eq!(lexed.comments.len(), 1);
/// assert!(lexed.errors.is_empty());
/// ```
#[must_use]
pub fn lex_source(source: &str) -> LexedSource {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.lex_token();
        let is_eof = token.kind().is_eof();
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    LexedSource {
        tokens,
        comments: lexer.comments,
        errors: lexer.errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to lex and extract just the token kinds.
    fn lex_kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(Token::into_kind).collect()
    }

    #[test]
    fn lex_empty() {
        assert!(lex("").is_empty());
        assert!(lex("   ").is_empty());
        assert!(lex("// comment").is_empty());
        assert!(lex("/* comment */").is_empty());
    }

    #[test]
    fn lex_identifiers_and_keywords() {
        assert_eq!(
            lex_kinds("width if property on readonly"),
            vec![
                TokenKind::Identifier("width".into()),
                TokenKind::If,
                TokenKind::Identifier("property".into()),
                TokenKind::Identifier("on".into()),
                TokenKind::Identifier("readonly".into()),
            ]
        );
        assert_eq!(
            lex_kinds("$root _x a1"),
            vec![
                TokenKind::Identifier("$root".into()),
                TokenKind::Identifier("_x".into()),
                TokenKind::Identifier("a1".into()),
            ]
        );
    }

    #[test]
    fn lex_numbers() {
        assert_eq!(
            lex_kinds("42 0xFF 0b1010 0o755 2.5 .5 1e10 2.5e-3 1."),
            vec![
                TokenKind::Number("42".into()),
                TokenKind::Number("0xFF".into()),
                TokenKind::Number("0b1010".into()),
                TokenKind::Number("0o755".into()),
                TokenKind::Number("2.5".into()),
                TokenKind::Number(".5".into()),
                TokenKind::Number("1e10".into()),
                TokenKind::Number("2.5e-3".into()),
                TokenKind::Number("1.".into()),
            ]
        );
    }

    #[test]
    fn lex_strings() {
        assert_eq!(
            lex_kinds(r#""hi" 'there' "esc\"aped""#),
            vec![
                TokenKind::String("\"hi\"".into()),
                TokenKind::String("'there'".into()),
                TokenKind::String("\"esc\\\"aped\"".into()),
            ]
        );
    }

    #[test]
    fn lex_multiline_string() {
        let lexed = lex_source("\"line one\nline two\" x");
        assert_eq!(
            lexed.tokens[0].kind(),
            &TokenKind::String("\"line one\nline two\"".into())
        );
        // the newline belongs to the string, not the gap before `x`
        assert!(!lexed.tokens[1].newline_before());
        assert!(lexed.errors.is_empty());
    }

    #[test]
    fn lex_template_complete() {
        assert_eq!(
            lex_kinds("`hello`"),
            vec![TokenKind::TemplateComplete("`hello`".into())]
        );
    }

    #[test]
    fn lex_template_with_substitutions() {
        assert_eq!(
            lex_kinds("`a${x}b${y}c`"),
            vec![
                TokenKind::TemplateHead("`a${".into()),
                TokenKind::Identifier("x".into()),
                TokenKind::TemplateMiddle("}b${".into()),
                TokenKind::Identifier("y".into()),
                TokenKind::TemplateTail("}c`".into()),
            ]
        );
    }

    #[test]
    fn lex_template_with_braces_in_substitution() {
        assert_eq!(
            lex_kinds("`v${ {a: 1}.a }w`"),
            vec![
                TokenKind::TemplateHead("`v${".into()),
                TokenKind::LeftBrace,
                TokenKind::Identifier("a".into()),
                TokenKind::Colon,
                TokenKind::Number("1".into()),
                TokenKind::RightBrace,
                TokenKind::Dot,
                TokenKind::Identifier("a".into()),
                TokenKind::TemplateTail("}w`".into()),
            ]
        );
    }

    #[test]
    fn lex_nested_templates() {
        assert_eq!(
            lex_kinds("`a${`b${x}c`}d`"),
            vec![
                TokenKind::TemplateHead("`a${".into()),
                TokenKind::TemplateHead("`b${".into()),
                TokenKind::Identifier("x".into()),
                TokenKind::TemplateTail("}c`".into()),
                TokenKind::TemplateTail("}d`".into()),
            ]
        );
    }

    #[test]
    fn lex_regex_vs_division() {
        assert_eq!(
            lex_kinds("a = /re/g"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::Eq,
                TokenKind::Regex("/re/g".into()),
            ]
        );
        assert_eq!(
            lex_kinds("a / b"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::Slash,
                TokenKind::Identifier("b".into()),
            ]
        );
        // after `)` a slash is division
        assert_eq!(
            lex_kinds("(a) / b"),
            vec![
                TokenKind::LeftParen,
                TokenKind::Identifier("a".into()),
                TokenKind::RightParen,
                TokenKind::Slash,
                TokenKind::Identifier("b".into()),
            ]
        );
        // after `return` a slash starts a regex
        assert_eq!(
            lex_kinds("return /a[/]b/"),
            vec![TokenKind::Return, TokenKind::Regex("/a[/]b/".into())]
        );
    }

    #[test]
    fn lex_operators_longest_match() {
        assert_eq!(
            lex_kinds(">>>= >>> >>= >> >= >"),
            vec![
                TokenKind::GtGtGtEq,
                TokenKind::GtGtGt,
                TokenKind::GtGtEq,
                TokenKind::GtGt,
                TokenKind::Ge,
                TokenKind::Gt,
            ]
        );
        assert_eq!(
            lex_kinds("=== == => = ** *= ?? ? ..."),
            vec![
                TokenKind::EqEqEq,
                TokenKind::EqEq,
                TokenKind::Arrow,
                TokenKind::Eq,
                TokenKind::StarStar,
                TokenKind::StarEq,
                TokenKind::QuestionQuestion,
                TokenKind::Question,
                TokenKind::Ellipsis,
            ]
        );
    }

    #[test]
    fn lex_newline_before() {
        let lexed = lex_source("a\nb c");
        assert!(!lexed.tokens[0].newline_before());
        assert!(lexed.tokens[1].newline_before());
        assert!(!lexed.tokens[2].newline_before());
    }

    #[test]
    fn lex_newline_inside_block_comment_counts() {
        let lexed = lex_source("a /* x\n y */ b");
        assert!(lexed.tokens[1].newline_before());
    }

    #[test]
    fn lex_comment_spans_are_content_only() {
        let source = "x // note\n/* body */ y";
        let lexed = lex_source(source);
        let texts: Vec<&str> = lexed
            .comments
            .iter()
            .map(|span| &source[span.as_range()])
            .collect();
        assert_eq!(texts, vec![" note", " body "]);
    }

    #[test]
    fn lex_unterminated_literals_recover() {
        let lexed = lex_source("\"open");
        assert_eq!(lexed.errors.len(), 1, "expected one error: {lexed:?}");
        assert!(matches!(
            lexed.tokens[0].kind(),
            TokenKind::String(s) if s == "\"open"
        ));

        let lexed = lex_source("/* open");
        assert_eq!(lexed.errors.len(), 1);
        assert_eq!(lexed.comments.len(), 1);

        let lexed = lex_source("`open ${x");
        assert!(!lexed.errors.is_empty());

        let lexed = lex_source("x = /open\n1");
        assert_eq!(lexed.errors.len(), 1);
        assert!(matches!(lexed.tokens[2].kind(), TokenKind::Regex(_)));
    }

    #[test]
    fn lex_unknown_character() {
        let lexed = lex_source("a § b");
        assert!(matches!(lexed.tokens[1].kind(), TokenKind::Error(_)));
        assert_eq!(lexed.errors.len(), 1);
        // lexing continues after the bad character
        assert_eq!(
            lexed.tokens[2].kind(),
            &TokenKind::Identifier("b".into())
        );
    }

    #[test]
    fn lex_eof_token_present() {
        let lexed = lex_source("a");
        assert_eq!(lexed.tokens.len(), 2);
        assert!(lexed.tokens[1].kind().is_eof());
    }
}
