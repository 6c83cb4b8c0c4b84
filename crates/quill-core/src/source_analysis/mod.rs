// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexing and parsing of Quill source text.
//!
//! The pipeline is the usual one: [`lex_source`] turns text into tokens
//! (collecting comment spans and lexical errors on the side), and the
//! parser builds either a script AST ([`parse_script`],
//! [`parse_expression_script`]) or a whole document
//! ([`parse_document`]). [`Span`] ties every token, node and diagnostic
//! back to byte offsets in the source; [`LineIndex`] maps offsets to lines
//! when something needs to reason about layout.

pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

pub use error::{LexError, LexErrorKind};
pub use lexer::{lex, lex_source, LexedSource, Lexer};
pub use parser::{
    parse_document, parse_expression_script, parse_script, Diagnostic, ParsedDocument,
    ParsedExpression, ParsedScript, Severity,
};
pub use span::{LineIndex, Span};
pub use token::{Token, TokenKind};
