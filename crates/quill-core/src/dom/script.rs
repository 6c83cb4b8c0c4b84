// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Script fragments embedded in a document.
//!
//! Binding values, function bodies and parameter initializers are scripts.
//! A [`ScriptExpression`] bundles the fragment's source text, its parsed
//! AST and the comments attached to that AST, and knows how to write
//! itself back out: cleanly parsed scripts are reformatted from the AST,
//! scripts with parse errors are copied through verbatim so broken code
//! survives a rewrite.

use ecow::EcoString;

use crate::ast::{Expression, Statement};
use crate::comments::{collect_expression_comments, collect_script_comments, AstComments};
use crate::source_analysis::{parse_expression_script, parse_script, Diagnostic, Severity, Span};
use crate::unparse::{reformat_expression, reformat_statements, OutWriter};

/// What role a script fragment plays in the document.
///
/// The role decides how the fragment is parsed: binding expressions and
/// argument initializers are single expressions, function bodies and
/// standalone code are statement lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionType {
    /// The right-hand side of a binding: `width: parent.width / 2`
    BindingExpression,
    /// The statements of a method or signal handler body.
    FunctionBody,
    /// The default value of a method parameter.
    ArgumentInitializer,
    /// A standalone script file or fragment.
    Code,
}

impl ExpressionType {
    /// Returns a human readable name, used in reformat failure messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BindingExpression => "binding expression",
            Self::FunctionBody => "function body",
            Self::ArgumentInitializer => "argument initializer",
            Self::Code => "code",
        }
    }

    const fn parses_as_expression(self) -> bool {
        matches!(self, Self::BindingExpression | Self::ArgumentInitializer)
    }
}

impl std::fmt::Display for ExpressionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The parsed form of a script fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptAst {
    /// A single expression, as in a binding value.
    Expression(Expression),
    /// A statement list, as in a function body.
    Statements(Vec<Statement>),
}

/// A script fragment with its AST, comments and parse diagnostics.
///
/// The fragment's text is a window into the source it was parsed from
/// (`unit_source`), so AST spans are offsets into that source whether the
/// script was parsed standalone or as part of a whole document.
#[derive(Debug, Clone)]
pub struct ScriptExpression {
    expression_type: ExpressionType,
    unit_source: EcoString,
    code_span: Span,
    ast: ScriptAst,
    comments: AstComments,
    diagnostics: Vec<Diagnostic>,
}

impl ScriptExpression {
    /// Wraps an already parsed fragment of a larger source.
    ///
    /// `code_span` delimits the fragment within `unit_source`; node spans of
    /// `ast` are offsets into that same source.
    pub fn new(
        expression_type: ExpressionType,
        unit_source: EcoString,
        code_span: Span,
        ast: ScriptAst,
        comments: AstComments,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            expression_type,
            unit_source,
            code_span,
            ast,
            comments,
            diagnostics,
        }
    }

    /// Parses `code` as a standalone fragment of the given type.
    pub fn from_code(code: impl Into<EcoString>, expression_type: ExpressionType) -> Self {
        let unit_source: EcoString = code.into();
        let code_span = Span::new(0, u32::try_from(unit_source.len()).unwrap_or(u32::MAX));
        let (ast, comment_spans, mut diagnostics) = if expression_type.parses_as_expression() {
            let parsed = parse_expression_script(&unit_source);
            (
                ScriptAst::Expression(parsed.expression),
                parsed.comments,
                parsed.diagnostics,
            )
        } else {
            let parsed = parse_script(&unit_source);
            (
                ScriptAst::Statements(parsed.statements),
                parsed.comments,
                parsed.diagnostics,
            )
        };
        let collected = match &ast {
            ScriptAst::Expression(expression) => {
                collect_expression_comments(&unit_source, expression, &comment_spans)
            }
            ScriptAst::Statements(statements) => {
                collect_script_comments(&unit_source, statements, &comment_spans)
            }
        };
        diagnostics.extend(collected.warnings);
        Self {
            expression_type,
            unit_source,
            code_span,
            ast,
            comments: collected.comments,
            diagnostics,
        }
    }

    /// Replaces the fragment's code, reparsing it in the same role.
    pub fn set_code(&mut self, code: impl Into<EcoString>) {
        *self = Self::from_code(code, self.expression_type);
    }

    /// The role of this fragment.
    #[must_use]
    pub fn expression_type(&self) -> ExpressionType {
        self.expression_type
    }

    /// The fragment's source text.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.unit_source[self.code_span.as_range()]
    }

    /// The source the fragment was parsed from; node spans index into this.
    #[must_use]
    pub fn unit_source(&self) -> &str {
        &self.unit_source
    }

    #[must_use]
    pub fn ast(&self) -> &ScriptAst {
        &self.ast
    }

    #[must_use]
    pub fn comments(&self) -> &AstComments {
        &self.comments
    }

    /// Mutable access for the comment collector.
    pub fn comments_mut(&mut self) -> &mut AstComments {
        &mut self.comments
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns true if the fragment parsed without errors.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics
            .iter()
            .all(|d| d.severity != Severity::Error)
    }

    /// Writes the fragment out.
    ///
    /// A clean fragment is reformatted from its AST and the rewrite is
    /// recorded in the outcome. A fragment with parse errors is copied
    /// verbatim, auto-indent suspended so its inner lines keep their
    /// original layout, and the failure is reported.
    pub fn write_out(&self, ow: &mut OutWriter) {
        if !self.is_clean() {
            ow.add_failure(format!(
                "could not reformat {}: script has parse errors",
                self.expression_type.name()
            ));
            let code = self.code();
            if code.contains('\n') {
                let saved = ow.indent_next_lines;
                ow.indent_next_lines = false;
                ow.write(code);
                ow.indent_next_lines = saved;
            } else {
                ow.write(code);
            }
            return;
        }
        let record = if ow.options().update_expressions {
            Some(ow.begin_expression_record())
        } else {
            None
        };
        match &self.ast {
            ScriptAst::Expression(expression) => {
                reformat_expression(ow, &self.comments, &self.unit_source, expression);
            }
            ScriptAst::Statements(statements) => {
                reformat_statements(ow, &self.comments, &self.unit_source, statements);
            }
        }
        if let Some(start) = record {
            ow.record_reformatted_expression(start, self.code());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unparse::LineWriterOptions;

    fn write(script: &ScriptExpression) -> crate::unparse::WriteOutcome {
        let mut ow = OutWriter::new(LineWriterOptions::default());
        script.write_out(&mut ow);
        ow.finish()
    }

    #[test]
    fn binding_expression_is_reformatted() {
        let script = ScriptExpression::from_code("width+height", ExpressionType::BindingExpression);
        assert!(script.is_clean());
        let outcome = write(&script);
        assert_eq!(outcome.text, "width + height");
        assert_eq!(outcome.reformatted_expressions.len(), 1);
        assert_eq!(outcome.reformatted_expressions[0].code, "width + height");
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn canonical_code_records_no_rewrite() {
        let script = ScriptExpression::from_code("width + height", ExpressionType::BindingExpression);
        let outcome = write(&script);
        assert_eq!(outcome.text, "width + height");
        assert!(outcome.reformatted_expressions.is_empty());
    }

    #[test]
    fn disabled_update_option_records_nothing() {
        let script = ScriptExpression::from_code("width+height", ExpressionType::BindingExpression);
        let mut ow = OutWriter::new(LineWriterOptions {
            update_expressions: false,
            ..LineWriterOptions::default()
        });
        script.write_out(&mut ow);
        let outcome = ow.finish();
        assert_eq!(outcome.text, "width + height");
        assert!(outcome.reformatted_expressions.is_empty());
    }

    #[test]
    fn function_body_statements_get_semicolons() {
        let script = ScriptExpression::from_code("return value", ExpressionType::FunctionBody);
        assert!(script.is_clean());
        assert_eq!(write(&script).text, "return value;");
    }

    #[test]
    fn broken_script_is_copied_verbatim() {
        let script = ScriptExpression::from_code("a +", ExpressionType::BindingExpression);
        assert!(!script.is_clean());
        let outcome = write(&script);
        assert_eq!(outcome.text, "a +");
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].message.contains("binding expression"));
        assert!(outcome.reformatted_expressions.is_empty());
    }

    #[test]
    fn broken_multiline_script_keeps_its_layout() {
        let code = "if (a {\n        weird\n  layout";
        let script = ScriptExpression::from_code(code, ExpressionType::FunctionBody);
        assert!(!script.is_clean());
        let mut ow = OutWriter::new(LineWriterOptions::default());
        ow.increase_indent(1);
        ow.write("x: ");
        script.write_out(&mut ow);
        let text = ow.finish().text;
        assert_eq!(text, "    x: if (a {\n        weird\n  layout");
    }

    #[test]
    fn set_code_reparses_in_place() {
        let mut script = ScriptExpression::from_code("a", ExpressionType::BindingExpression);
        script.set_code("b * 2");
        assert_eq!(script.code(), "b * 2");
        assert_eq!(script.expression_type(), ExpressionType::BindingExpression);
        assert_eq!(write(&script).text, "b * 2");
    }

    #[test]
    fn code_slices_the_unit_source() {
        let script = ScriptExpression::from_code("x * 3", ExpressionType::ArgumentInitializer);
        assert_eq!(script.code(), "x * 3");
        assert_eq!(script.unit_source(), "x * 3");
    }
}
