// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Writing documents and scripts back out as text.
//!
//! Three layers stack up here:
//!
//! - [`line_writer`] assembles and commits individual lines,
//! - [`out_writer`] adds indentation, autospacing, region recording and
//!   failure collection on top,
//! - [`reformat`] walks a script AST and prints it in canonical style
//!   through an [`OutWriter`].
//!
//! Document elements drive an [`OutWriter`] directly; their embedded
//! scripts go through [`reformat_statements`] / [`reformat_expression`].

pub mod line_writer;
pub mod out_writer;
pub mod reformat;

pub use line_writer::{AttributesOrder, EndOfLine, LineWriter, LineWriterOptions};
pub use out_writer::{
    FormatFailure, OutWriter, RecordedRegion, ReformattedExpression, SpacerId, WriteOutcome,
};
pub use reformat::{reformat_expression, reformat_statements};
