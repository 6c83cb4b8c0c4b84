// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Quill language core.
//!
//! This crate contains the whole language pipeline:
//! - Lexical analysis (tokenization)
//! - Parsing (document and script AST construction)
//! - Comment collection and attachment
//! - Write-out (canonical reformatting)
//!
//! The pipeline is total: any input yields a document plus diagnostics,
//! and writing a document back out never drops a comment.

#![doc = include_str!("../../../README.md")]

pub mod ast;
mod ast_walker;
pub mod comments;
pub mod dom;
pub mod source_analysis;
pub mod unparse;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::dom::Document;
    pub use crate::source_analysis::{parse_document, parse_script, Diagnostic, Severity, Span};
    pub use crate::unparse::{LineWriterOptions, WriteOutcome};
}
