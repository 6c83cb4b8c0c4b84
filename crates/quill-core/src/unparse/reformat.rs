// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Script reformatter: re-emits a parsed script from its AST.
//!
//! The formatter walks the tree and prints it in canonical style, one
//! construct at a time. Its notable behaviors:
//!
//! - **Semicolons** are added in statement context only. The depth counter
//!   tracks whether we are inside a statement list, block, object literal
//!   or braced function body; a bare binding expression stays unterminated
//!   while the same code inside a function body gets its `;`.
//! - **Statement spacing** preserves one deliberate blank line: the gap
//!   between two statements is the gap they had in the source, clamped to
//!   at most one empty line. Comments already carry their own newlines, so
//!   a statement with post comments (or a successor with pre comments)
//!   opts out of the automatic gap.
//! - **Comments** attached to AST nodes are interleaved: pre comments
//!   before the node, post comments after it. A few constructs reorder the
//!   neighbors by hand, so `if (x) // note` keeps the `)` before the note
//!   and `a(); // done` keeps the `;` before it.
//! - **Multi-line string and template literals** are re-emitted raw, with
//!   auto-indent suspended after the first character, so their bytes
//!   survive exactly.
//! - Statement bodies are either braced (`while (x) { ... }`, kept on the
//!   same line) or a single indented statement on the next line.
//!
//! The formatter never fails: unparseable fragments surface as error nodes
//! whose original text is copied through, and pathological nesting is cut
//! off with an error marker in the output.

use crate::ast::{
    Argument, ArrayItem, ArrayLiteral, Block, CaseBlock, CaseClause, ClassExpression, ExportKind,
    Expression, ExpressionStatement, ForInit, FormalParameter, FunctionBody, FunctionExpression,
    ImportDeclaration, MethodKind, NodeId, ObjectLiteral, ObjectProperty, ObjectPropertyKind,
    PropertyName, PropertyNameKind, Statement, VariableDeclarator,
};
use crate::comments::AstComments;
use crate::source_analysis::LineIndex;

use super::OutWriter;

/// Nesting depth at which the formatter stops descending and leaves an
/// error marker. The parser cuts off pathological nesting well before this,
/// so only hand-built trees can reach it.
const MAX_FORMAT_DEPTH: u32 = 256;

/// Reformats a statement list, semicolons included, into `ow`.
///
/// `source` must be the text the statements were parsed from; literal
/// tokens and error nodes are re-emitted from it, and original line numbers
/// decide which blank lines between statements survive.
pub fn reformat_statements(
    ow: &mut OutWriter,
    comments: &AstComments,
    source: &str,
    statements: &[Statement],
) {
    ScriptFormatter::new(ow, comments, source).statements(statements);
}

/// Reformats a single expression into `ow`, without a trailing semicolon.
pub fn reformat_expression(
    ow: &mut OutWriter,
    comments: &AstComments,
    source: &str,
    expression: &Expression,
) {
    ScriptFormatter::new(ow, comments, source).expression(expression);
}

struct ScriptFormatter<'a> {
    ow: &'a mut OutWriter,
    comments: &'a AstComments,
    source: &'a str,
    lines: LineIndex,
    /// Positive inside statement lists, blocks, object literals and braced
    /// function bodies; statements get semicolons only there.
    expression_depth: u32,
    nesting: u32,
    depth_error_reported: bool,
}

impl<'a> ScriptFormatter<'a> {
    fn new(ow: &'a mut OutWriter, comments: &'a AstComments, source: &'a str) -> Self {
        Self {
            ow,
            comments,
            source,
            lines: LineIndex::new(source),
            expression_depth: 0,
            nesting: 0,
            depth_error_reported: false,
        }
    }

    fn add_semicolons(&self) -> bool {
        self.expression_depth > 0
    }

    fn pre_comments(&mut self, id: NodeId) {
        if let Some(element) = self.comments.get(id) {
            element.write_pre(self.ow);
        }
    }

    fn post_comments(&mut self, id: NodeId) {
        if let Some(element) = self.comments.get(id) {
            element.write_post(self.ow);
        }
    }

    fn has_post_comments(&self, id: NodeId) -> bool {
        self.comments
            .get(id)
            .is_some_and(|c| !c.post_comments().is_empty())
    }

    fn has_pre_comments(&self, id: NodeId) -> bool {
        self.comments
            .get(id)
            .is_some_and(|c| !c.pre_comments().is_empty())
    }

    fn out_of_depth(&mut self) -> bool {
        if self.nesting < MAX_FORMAT_DEPTH {
            return false;
        }
        if !self.depth_error_reported {
            self.depth_error_reported = true;
            self.ow
                .write("/* ERROR: hit recursion limit while formatting script, rewrite failed */");
        }
        true
    }

    // ── Statements ───────────────────────────────────────────────────────

    /// Formats a statement list with blank-line preservation between its
    /// entries.
    fn statements(&mut self, list: &[Statement]) {
        self.expression_depth += 1;
        for (i, statement) in list.iter().enumerate() {
            self.statement(statement);
            if let Some(next) = list.get(i + 1) {
                // Attached comments carry their own line breaks; adding a
                // gap here as well would double them.
                if self.has_post_comments(statement.id()) || self.has_pre_comments(next.id()) {
                    continue;
                }
                let current_end = statement.span().end().saturating_sub(1);
                let delta = self
                    .lines
                    .line(next.span().start())
                    .saturating_sub(self.lines.line(current_end))
                    .clamp(1, 2);
                self.ow.ensure_newline(delta);
            }
        }
        self.expression_depth -= 1;
    }

    fn statement(&mut self, statement: &Statement) {
        self.statement_with(statement, false);
    }

    /// Formats one statement; `newline_after` ends the line after the
    /// statement body but before its post comments, which is what an
    /// indented single-statement body needs before `else` or `while`.
    fn statement_with(&mut self, statement: &Statement, newline_after: bool) {
        self.pre_comments(statement.id());
        self.statement_inner(statement);
        if newline_after {
            self.ow.ensure_newline(1);
        }
        self.post_comments(statement.id());
    }

    fn statement_inner(&mut self, statement: &Statement) {
        if self.out_of_depth() {
            return;
        }
        self.nesting += 1;
        stacker::maybe_grow(32 * 1024, 256 * 1024, || {
            self.dispatch_statement(statement);
        });
        self.nesting -= 1;
    }

    #[allow(clippy::too_many_lines)] // one arm per statement variant — irreducible
    fn dispatch_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Block(block) => self.block_inner(block),
            Statement::Variable(decl) => {
                self.ow.write(decl.kind.as_str());
                self.ow.write(" ");
                self.declarators(&decl.declarators);
                if self.add_semicolons() {
                    self.ow.write(";");
                }
            }
            Statement::Empty(_) => {
                self.ow.write(";");
            }
            Statement::Expression(stmt) => self.expression_statement(stmt),
            Statement::If(stmt) => {
                self.ow.write("if (");
                // The closing parenthesis belongs before any comment that
                // trailed the condition.
                self.pre_comments(stmt.condition.id());
                self.expression_inner(&stmt.condition);
                self.ow.write(")");
                self.post_comments(stmt.condition.id());
                self.block_or_indented(&stmt.consequent, stmt.alternate.is_some());
                if let Some(alternate) = &stmt.alternate {
                    self.ow.write("else");
                    if matches!(alternate.as_ref(), Statement::Block(_) | Statement::If(_)) {
                        self.ow.write(" ");
                        self.statement(alternate);
                    } else {
                        self.indented_statement(alternate, false);
                    }
                }
            }
            Statement::DoWhile(stmt) => {
                self.ow.write("do");
                self.block_or_indented(&stmt.body, true);
                self.ow.write("while (");
                self.expression(&stmt.condition);
                self.ow.write(")");
            }
            Statement::While(stmt) => {
                self.ow.write("while (");
                self.expression(&stmt.condition);
                self.ow.write(")");
                self.block_or_indented(&stmt.body, false);
            }
            Statement::For(stmt) => {
                self.ow.write("for (");
                match &stmt.init {
                    Some(ForInit::Variable(decl)) => {
                        self.ow.write(decl.kind.as_str());
                        self.ow.write(" ");
                        self.declarators(&decl.declarators);
                    }
                    Some(ForInit::Expression(init)) => self.expression(init),
                    None => {}
                }
                self.ow.write("; ");
                if let Some(condition) = &stmt.condition {
                    self.expression(condition);
                }
                self.ow.write("; ");
                if let Some(update) = &stmt.update {
                    self.expression(update);
                }
                self.ow.write(")");
                self.block_or_indented(&stmt.body, false);
            }
            Statement::ForEach(stmt) => {
                self.ow.write("for (");
                if let Some(kind) = stmt.declaration_kind {
                    self.ow.write(kind.as_str());
                    self.ow.write(" ");
                }
                self.expression(&stmt.target);
                self.ow.write(" ");
                self.ow.write(stmt.operator.as_str());
                self.ow.write(" ");
                self.expression(&stmt.iterable);
                self.ow.write(")");
                self.block_or_indented(&stmt.body, false);
            }
            Statement::Continue(stmt) => {
                self.ow.write("continue");
                if let Some(label) = &stmt.label {
                    self.ow.write(" ");
                    self.ow.write(label);
                }
                if self.add_semicolons() {
                    self.ow.write(";");
                }
            }
            Statement::Break(stmt) => {
                self.ow.write("break");
                if let Some(label) = &stmt.label {
                    self.ow.write(" ");
                    self.ow.write(label);
                }
                if self.add_semicolons() {
                    self.ow.write(";");
                }
            }
            Statement::Return(stmt) => {
                self.ow.write("return");
                if let Some(value) = &stmt.value {
                    self.ow.write(" ");
                    self.expression(value);
                }
                if self.add_semicolons() {
                    self.ow.write(";");
                }
            }
            Statement::With(stmt) => {
                self.ow.write("with (");
                self.expression(&stmt.object);
                self.ow.write(")");
                self.block_or_indented(&stmt.body, false);
            }
            Statement::Switch(stmt) => {
                self.ow.write("switch (");
                self.expression(&stmt.discriminant);
                self.ow.write(") ");
                self.case_block(&stmt.cases);
            }
            Statement::Labelled(stmt) => {
                self.ow.write(&stmt.label);
                self.ow.write(": ");
                self.statement(&stmt.statement);
            }
            Statement::Throw(stmt) => {
                self.ow.write("throw ");
                self.expression(&stmt.value);
                if self.add_semicolons() {
                    self.ow.write(";");
                }
            }
            Statement::Try(stmt) => {
                self.ow.write("try ");
                self.block(&stmt.block);
                if let Some(catch) = &stmt.catch {
                    self.ow.write(" ");
                    self.pre_comments(catch.id);
                    self.ow.write("catch ");
                    if let Some(parameter) = &catch.parameter {
                        self.ow.write("(");
                        self.ow.write(parameter);
                        self.ow.write(") ");
                    }
                    self.block(&catch.block);
                    self.post_comments(catch.id);
                }
                if let Some(finally) = &stmt.finally {
                    self.ow.write(" ");
                    self.pre_comments(finally.id);
                    self.ow.write("finally ");
                    self.block(&finally.block);
                    self.post_comments(finally.id);
                }
            }
            Statement::Function(function) => self.function_inner(function),
            Statement::Class(class) => self.class_inner(class),
            Statement::Import(import) => self.import_inner(import),
            Statement::Export(export) => match &export.kind {
                ExportKind::Named { specifiers, module } => {
                    self.ow.write("export ");
                    if specifiers.is_empty() {
                        self.ow.write("{}");
                    } else {
                        self.ow.write("{ ");
                        for (i, spec) in specifiers.iter().enumerate() {
                            self.pre_comments(spec.id);
                            self.ow.write(&spec.local);
                            if let Some(exported) = &spec.exported {
                                self.ow.write(" as ");
                                self.ow.write(exported);
                            }
                            self.post_comments(spec.id);
                            if i + 1 < specifiers.len() {
                                self.ow.write(", ");
                            }
                        }
                        self.ow.write(" }");
                    }
                    if let Some(module) = module {
                        self.ow.write(" from ");
                        self.ow.write(module);
                    }
                    self.ow.write(";");
                }
                ExportKind::AllFrom { alias, module } => {
                    self.ow.write("export *");
                    if let Some(alias) = alias {
                        self.ow.write(" as ");
                        self.ow.write(alias);
                    }
                    self.ow.write(" from ");
                    self.ow.write(module);
                    self.ow.write(";");
                }
                ExportKind::Default(inner) => {
                    self.ow.write("export default ");
                    self.export_body(inner);
                }
                ExportKind::Declaration(inner) => {
                    self.ow.write("export ");
                    self.export_body(inner);
                }
            },
        }
    }

    /// The statement carried by an `export`. A bare expression gets an
    /// unconditional semicolon; declarations terminate themselves.
    fn export_body(&mut self, statement: &Statement) {
        if let Statement::Expression(stmt) = statement {
            let expression = &stmt.expression;
            self.pre_comments(expression.id());
            self.expression_inner(expression);
            self.ow.write(";");
            self.post_comments(expression.id());
        } else {
            self.statement(statement);
        }
    }

    /// An expression in statement position. The semicolon goes after the
    /// expression but before its post comments, so `a(); // done` reads
    /// naturally.
    fn expression_statement(&mut self, stmt: &ExpressionStatement) {
        let expression = &stmt.expression;
        self.pre_comments(expression.id());
        self.expression_inner(expression);
        if self.add_semicolons() {
            self.ow.write(";");
        }
        self.post_comments(expression.id());
    }

    /// A single indented statement on its own line, as used by `if`/loop
    /// bodies that are not blocks.
    fn indented_statement(&mut self, statement: &Statement, newline_after: bool) {
        let indent = self.ow.increase_indent(1);
        self.ow.ensure_newline(1);
        self.statement_with(statement, newline_after);
        self.ow.decrease_indent(1, indent);
    }

    /// Emits a statement body: blocks stay on the current line, anything
    /// else is indented onto the next one. `finish_with_space_or_newline`
    /// separates the body from a following keyword (`else`, `while`).
    fn block_or_indented(&mut self, statement: &Statement, finish_with_space_or_newline: bool) {
        if matches!(statement, Statement::Block(_)) {
            self.ow.write(" ");
            self.statement(statement);
            if finish_with_space_or_newline {
                self.ow.write(" ");
            }
        } else {
            self.indented_statement(statement, finish_with_space_or_newline);
        }
    }

    /// A block in a position where its node comments are written by the
    /// surrounding construct (`try`, `catch`, `finally`).
    fn block(&mut self, block: &Block) {
        self.pre_comments(block.id);
        self.block_inner(block);
        self.post_comments(block.id);
    }

    fn block_inner(&mut self, block: &Block) {
        self.ow.write("{");
        if !block.statements.is_empty() {
            self.expression_depth += 1;
            let indent = self.ow.increase_indent(1);
            self.ow.ensure_newline(1);
            self.statements(&block.statements);
            self.ow.decrease_indent(1, indent);
            self.ow.ensure_newline(1);
            self.expression_depth -= 1;
        }
        self.ow.write("}");
    }

    fn declarators(&mut self, list: &[VariableDeclarator]) {
        for (i, declarator) in list.iter().enumerate() {
            self.pre_comments(declarator.id);
            self.expression(&declarator.target);
            if let Some(initializer) = &declarator.initializer {
                self.ow.write(" = ");
                self.expression(initializer);
            }
            self.post_comments(declarator.id);
            if i + 1 < list.len() {
                self.ow.write(", ");
            }
        }
    }

    fn case_block(&mut self, cases: &CaseBlock) {
        self.pre_comments(cases.id);
        self.ow.write("{");
        self.expression_depth += 1;
        self.ow.ensure_newline(1);
        for (i, clause) in cases.clauses.iter().enumerate() {
            self.case_clause(clause);
            if i + 1 < cases.clauses.len() {
                self.ow.ensure_newline(1);
            }
        }
        if let Some(default_clause) = &cases.default_clause {
            if !cases.clauses.is_empty() {
                self.ow.ensure_newline(1);
            }
            self.pre_comments(default_clause.id);
            self.ow.write("default:");
            if !default_clause.statements.is_empty() {
                self.clause_statements(&default_clause.statements);
            }
            self.post_comments(default_clause.id);
        }
        if !cases.more_clauses.is_empty() {
            self.ow.ensure_newline(1);
        }
        for (i, clause) in cases.more_clauses.iter().enumerate() {
            self.case_clause(clause);
            if i + 1 < cases.more_clauses.len() {
                self.ow.ensure_newline(1);
            }
        }
        self.ow.ensure_newline(1);
        self.expression_depth -= 1;
        self.ow.write("}");
        self.post_comments(cases.id);
    }

    fn case_clause(&mut self, clause: &CaseClause) {
        self.pre_comments(clause.id);
        self.ow.write("case ");
        self.expression(&clause.test);
        self.ow.write(":");
        if !clause.statements.is_empty() {
            self.clause_statements(&clause.statements);
        }
        self.post_comments(clause.id);
    }

    fn clause_statements(&mut self, statements: &[Statement]) {
        let indent = self.ow.increase_indent(1);
        self.ow.ensure_newline(1);
        self.statements(statements);
        self.ow.decrease_indent(1, indent);
    }

    // ── Expressions ──────────────────────────────────────────────────────

    fn expression(&mut self, expression: &Expression) {
        self.pre_comments(expression.id());
        self.expression_inner(expression);
        self.post_comments(expression.id());
    }

    fn expression_inner(&mut self, expression: &Expression) {
        if self.out_of_depth() {
            return;
        }
        self.nesting += 1;
        stacker::maybe_grow(32 * 1024, 256 * 1024, || {
            self.dispatch_expression(expression);
        });
        self.nesting -= 1;
    }

    #[allow(clippy::too_many_lines)] // one arm per expression variant — irreducible
    fn dispatch_expression(&mut self, expression: &Expression) {
        match expression {
            Expression::This { .. } => {
                self.ow.write("this");
            }
            Expression::Super { .. } => {
                self.ow.write("super");
            }
            Expression::Null { .. } => {
                self.ow.write("null");
            }
            Expression::True { .. } => {
                self.ow.write("true");
            }
            Expression::False { .. } => {
                self.ow.write("false");
            }
            Expression::Identifier { name, .. } => {
                self.ow.write(name);
            }
            Expression::String { raw, .. } => self.literal_chunk(raw),
            Expression::Number { raw, .. } | Expression::Regex { raw, .. } => {
                self.ow.write(raw);
            }
            Expression::Template(template) => {
                for part in &template.parts {
                    self.literal_chunk(&part.chunk);
                    if let Some(substitution) = &part.expression {
                        self.expression(substitution);
                    }
                }
            }
            Expression::Array(array) => self.array_inner(array),
            Expression::Object(object) => self.object_inner(object),
            Expression::Paren { expression, .. } => {
                self.ow.write("(");
                let indent = self.ow.increase_indent(1);
                self.expression(expression);
                self.ow.decrease_indent(1, indent);
                self.ow.write(")");
            }
            Expression::Index { base, index, .. } => {
                self.expression(base);
                self.ow.write("[");
                let indent = self.ow.increase_indent(1);
                self.expression(index);
                self.ow.decrease_indent(1, indent);
                self.ow.write("]");
            }
            Expression::Member { base, name, .. } => {
                self.expression(base);
                self.ow.write(".");
                self.ow.write(name);
            }
            Expression::New {
                callee, arguments, ..
            } => {
                self.ow.write("new ");
                self.expression(callee);
                if let Some(arguments) = arguments {
                    self.ow.write("(");
                    self.arguments(arguments);
                    self.ow.write(")");
                }
            }
            Expression::Call {
                callee, arguments, ..
            } => {
                self.expression(callee);
                self.ow.write("(");
                self.arguments(arguments);
                self.ow.write(")");
            }
            Expression::Unary { op, operand, .. } => {
                if op.is_postfix() {
                    self.expression(operand);
                    self.ow.write(op.as_str());
                } else if op.is_keyword() {
                    self.ow.write(op.as_str());
                    self.ow.write(" ");
                    self.expression(operand);
                } else {
                    self.ow.write(op.as_str());
                    self.expression(operand);
                }
            }
            Expression::Binary {
                op, left, right, ..
            } => {
                self.expression(left);
                self.ow.write(" ");
                self.ow.write(op.as_str());
                self.ow.write(" ");
                self.expression(right);
            }
            Expression::Conditional {
                condition,
                consequent,
                alternate,
                ..
            } => {
                self.expression(condition);
                self.ow.write(" ? ");
                self.expression(consequent);
                self.ow.write(" : ");
                self.expression(alternate);
            }
            Expression::Function(function) => self.function_inner(function),
            Expression::Class(class) => self.class_inner(class),
            Expression::Sequence { left, right, .. } => {
                self.expression(left);
                self.ow.write(", ");
                self.expression(right);
            }
            Expression::Yield {
                delegate, argument, ..
            } => {
                self.ow.write(if *delegate { "yield*" } else { "yield" });
                if let Some(argument) = argument {
                    self.ow.write(" ");
                    self.expression(argument);
                }
            }
            Expression::Error { span, .. } => {
                // Copy the unparsed text through untouched.
                let source = self.source;
                let start = span.start() as usize;
                let end = (span.end() as usize).min(source.len());
                if start < end {
                    self.literal_chunk(&source[start..end]);
                }
            }
        }
    }

    fn arguments(&mut self, arguments: &[Argument]) {
        for (i, argument) in arguments.iter().enumerate() {
            if argument.spread {
                self.ow.write("...");
            }
            self.expression(&argument.expression);
            if i + 1 < arguments.len() {
                self.ow.write(", ");
            }
        }
    }

    /// Writes raw literal text. For multi-line literals the auto-indent is
    /// suspended after the first character so inner lines keep their bytes.
    fn literal_chunk(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        if self.ow.indent_next_lines && raw.contains('\n') {
            let first_len = raw.chars().next().map_or(0, char::len_utf8);
            let (first, rest) = raw.split_at(first_len);
            self.ow.write(first);
            self.ow.indent_next_lines = false;
            self.ow.write(rest);
            self.ow.indent_next_lines = true;
        } else {
            self.ow.write(raw);
        }
    }

    fn array_inner(&mut self, array: &ArrayLiteral) {
        let is_object_element = |item: &ArrayItem| {
            matches!(
                item,
                ArrayItem::Element {
                    expression: Expression::Object(_),
                    ..
                }
            )
        };
        self.ow.write("[");
        let indent = self.ow.increase_indent(1);
        for (i, item) in array.items.iter().enumerate() {
            let object_element = is_object_element(item);
            if object_element {
                self.ow.ensure_newline(1);
            }
            if let ArrayItem::Element { spread, expression } = item {
                if *spread {
                    self.ow.write("...");
                }
                self.expression(expression);
            }
            if i + 1 < array.items.len() {
                self.ow.write(", ");
                if object_element {
                    self.ow.ensure_newline(1);
                }
            }
        }
        if array.trailing_comma {
            self.ow.write(",");
        }
        if array.items.last().is_some_and(is_object_element) {
            self.ow.ensure_newline(1);
        }
        self.ow.decrease_indent(1, indent);
        self.ow.write("]");
    }

    fn object_inner(&mut self, object: &ObjectLiteral) {
        self.ow.write("{");
        self.expression_depth += 1;
        if !object.properties.is_empty() {
            let indent = self.ow.increase_indent(1);
            self.ow.ensure_newline(1);
            for (i, property) in object.properties.iter().enumerate() {
                self.object_property(property);
                if i + 1 < object.properties.len() {
                    self.ow.write(",");
                    self.ow.ensure_newline(1);
                }
            }
            self.ow.decrease_indent(1, indent);
            self.ow.ensure_newline(1);
        }
        self.expression_depth -= 1;
        self.ow.write("}");
    }

    fn object_property(&mut self, property: &ObjectProperty) {
        self.pre_comments(property.id);
        match &property.kind {
            ObjectPropertyKind::Method { kind, function } => {
                match kind {
                    MethodKind::Getter => {
                        self.ow.write("get ");
                    }
                    MethodKind::Setter => {
                        self.ow.write("set ");
                    }
                    MethodKind::Ordinary => {}
                }
                if function.is_generator {
                    self.ow.write("*");
                }
                self.property_name(&property.name);
                self.ow.write("(");
                self.parameters(&function.parameters);
                // method definition syntax, no space before the brace
                self.ow.write("){");
                self.expression_depth += 1;
                match &function.body {
                    FunctionBody::Block(statements) if !statements.is_empty() => {
                        let indent = self.ow.increase_indent(1);
                        self.ow.ensure_newline(1);
                        self.statements(statements);
                        self.ow.decrease_indent(1, indent);
                        self.ow.ensure_newline(1);
                    }
                    FunctionBody::Block(_) => {}
                    FunctionBody::Expression(value) => {
                        let indent = self.ow.increase_indent(1);
                        self.expression(value);
                        self.ow.decrease_indent(1, indent);
                    }
                }
                self.expression_depth -= 1;
                self.ow.write("}");
            }
            ObjectPropertyKind::KeyValue { value } => {
                self.property_name(&property.name);
                self.ow.write(": ");
                self.expression(value);
            }
            ObjectPropertyKind::Shorthand { initializer } => {
                self.property_name(&property.name);
                if let Some(initializer) = initializer {
                    self.ow.write(" = ");
                    self.expression(initializer);
                }
            }
        }
        self.post_comments(property.id);
    }

    fn property_name(&mut self, name: &PropertyName) {
        self.pre_comments(name.id);
        match &name.kind {
            PropertyNameKind::Identifier(text) | PropertyNameKind::Numeric(text) => {
                self.ow.write(text);
            }
            PropertyNameKind::String(raw) => {
                let requoted = Self::canonical_property_name(raw);
                self.ow.write(&requoted);
            }
            PropertyNameKind::Computed(expression) => {
                self.ow.write("[");
                self.expression(expression);
                self.ow.write("]");
            }
        }
        self.post_comments(name.id);
    }

    /// String property names always come out double quoted, whichever quote
    /// the source used. Escaped single quotes lose their backslash and bare
    /// double quotes gain one; every other escape means the same in both
    /// styles.
    fn canonical_property_name(raw: &str) -> String {
        let Some(inner) = raw
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix('\''))
        else {
            return raw.to_string();
        };
        let mut name = String::with_capacity(raw.len());
        name.push('"');
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some('\'') => name.push('\''),
                    Some(escaped) => {
                        name.push('\\');
                        name.push(escaped);
                    }
                    None => name.push('\\'),
                },
                '"' => {
                    name.push('\\');
                    name.push('"');
                }
                c => name.push(c),
            }
        }
        name.push('"');
        name
    }

    fn function_inner(&mut self, function: &FunctionExpression) {
        if !function.is_arrow {
            self.ow.write(if function.is_generator {
                "function* "
            } else {
                "function "
            });
            if let Some(name) = &function.name {
                self.ow.write(name);
            }
        }
        if function.is_arrow {
            if function.parameters.is_empty() {
                self.ow.write("()");
            } else if Self::arrow_needs_parentheses(&function.parameters) {
                self.ow.write("(");
                let indent = self.ow.increase_indent(1);
                self.parameters(&function.parameters);
                self.ow.decrease_indent(1, indent);
                self.ow.write(")");
            } else {
                let indent = self.ow.increase_indent(1);
                self.parameters(&function.parameters);
                self.ow.decrease_indent(1, indent);
            }
            self.ow.write(" => ");
        } else {
            self.ow.write("(");
            let indent = self.ow.increase_indent(1);
            self.parameters(&function.parameters);
            self.ow.decrease_indent(1, indent);
            self.ow.write(") ");
        }
        match &function.body {
            FunctionBody::Expression(value) => {
                // concise arrow body, kept on one line: x => x * 2
                let indent = self.ow.increase_indent(1);
                self.expression(value);
                self.ow.decrease_indent(1, indent);
            }
            FunctionBody::Block(statements) => {
                self.ow.write("{");
                if !statements.is_empty() {
                    self.expression_depth += 1;
                    let indent = self.ow.increase_indent(1);
                    self.ow.ensure_newline(1);
                    self.statements(statements);
                    self.ow.decrease_indent(1, indent);
                    self.ow.ensure_newline(1);
                    self.expression_depth -= 1;
                }
                self.ow.write("}");
            }
        }
    }

    /// A lone simple parameter can drop its parentheses; a rest parameter,
    /// a default value or a destructuring pattern cannot.
    fn arrow_needs_parentheses(parameters: &[FormalParameter]) -> bool {
        if parameters.len() != 1 {
            return true;
        }
        let only = &parameters[0];
        only.is_rest
            || only.initializer.is_some()
            || !matches!(only.target, Expression::Identifier { .. })
    }

    fn parameters(&mut self, parameters: &[FormalParameter]) {
        for (i, parameter) in parameters.iter().enumerate() {
            self.pre_comments(parameter.id);
            if parameter.is_rest {
                self.ow.write("...");
            }
            self.expression(&parameter.target);
            if let Some(initializer) = &parameter.initializer {
                self.ow.write(" = ");
                self.expression(initializer);
            }
            self.post_comments(parameter.id);
            if i + 1 < parameters.len() {
                self.ow.write(", ");
            }
        }
    }

    fn class_inner(&mut self, class: &ClassExpression) {
        self.ow.write("class");
        if let Some(name) = &class.name {
            self.ow.write(" ");
            self.ow.write(name);
        }
        if let Some(heritage) = &class.heritage {
            self.ow.write(" extends ");
            self.expression(heritage);
        }
        self.ow.write(" {");
        let indent = self.ow.increase_indent(1);
        for member in &class.members {
            self.ow.newline();
            self.pre_comments(member.id);
            if member.is_static {
                self.ow.write("static ");
            }
            self.object_property(&member.property);
            self.post_comments(member.id);
            self.ow.newline();
        }
        self.ow.decrease_indent(1, indent);
        self.ow.write("}");
    }

    fn import_inner(&mut self, import: &ImportDeclaration) {
        self.ow.write("import ");
        let mut from_module = false;
        if let Some(default_binding) = &import.default_binding {
            self.ow.write(default_binding);
            if import.namespace_binding.is_some() || import.named.is_some() {
                self.ow.write(", ");
            }
            from_module = true;
        }
        if let Some(namespace) = &import.namespace_binding {
            self.ow.write("* as ");
            self.ow.write(namespace);
            from_module = true;
        }
        if let Some(named) = &import.named {
            if named.is_empty() {
                self.ow.write("{}");
            } else {
                self.ow.write("{ ");
                for (i, spec) in named.iter().enumerate() {
                    self.pre_comments(spec.id);
                    if let Some(imported) = &spec.imported {
                        self.ow.write(imported);
                        self.ow.write(" as ");
                    }
                    self.ow.write(&spec.local);
                    self.post_comments(spec.id);
                    if i + 1 < named.len() {
                        self.ow.write(", ");
                    }
                }
                self.ow.write(" }");
            }
            from_module = true;
        }
        if from_module {
            self.ow.write(" from ");
        }
        self.ow.write(&import.module);
        self.ow.write(";");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::{Comment, CommentKind};
    use crate::source_analysis::{parse_script, Span};
    use crate::unparse::LineWriterOptions;

    fn format(source: &str) -> String {
        let script = parse_script(source);
        assert!(script.is_clean(), "parse failed: {:?}", script.diagnostics);
        let mut ow = OutWriter::new(LineWriterOptions::default());
        reformat_statements(&mut ow, &AstComments::new(), source, &script.statements);
        ow.finish().text
    }

    fn format_expression_source(source: &str) -> String {
        let script = parse_script(source);
        assert!(script.is_clean(), "parse failed: {:?}", script.diagnostics);
        let Statement::Expression(stmt) = &script.statements[0] else {
            panic!("expected a bare expression");
        };
        let mut ow = OutWriter::new(LineWriterOptions::default());
        reformat_expression(&mut ow, &AstComments::new(), source, &stmt.expression);
        ow.finish().text
    }

    #[test]
    fn function_declaration() {
        assert_eq!(format("function a(a, b) {}"), "function a(a, b) {}");
    }

    #[test]
    fn anonymous_function_value() {
        assert_eq!(
            format("let f = function (a, b) {}"),
            "let f = function (a, b) {};"
        );
    }

    #[test]
    fn generator_forms() {
        assert_eq!(
            format("function* g() { yield 1 }"),
            "function* g() {\n    yield 1;\n}"
        );
        assert_eq!(
            format("let g = function* () { yield* a }"),
            "let g = function* () {\n    yield* a;\n};"
        );
    }

    #[test]
    fn statement_list_gets_semicolons() {
        assert_eq!(format("a = 1\nb = 2"), "a = 1;\nb = 2;");
    }

    #[test]
    fn bare_expression_stays_unterminated() {
        assert_eq!(format_expression_source("width + height"), "width + height");
    }

    #[test]
    fn blank_lines_clamp_to_one() {
        assert_eq!(format("a = 1;\n\n\n\nb = 2;"), "a = 1;\n\nb = 2;");
        assert_eq!(format("a = 1;\nb = 2;"), "a = 1;\nb = 2;");
    }

    #[test]
    fn post_comment_carries_the_line_break() {
        let source = "a = 1\nb = 2";
        let script = parse_script(source);
        let mut comments = AstComments::new();
        comments
            .node_mut(script.statements[0].id())
            .add_post(Comment::new(" // one\n", Span::new(0, 8), 0, CommentKind::Post));
        let mut ow = OutWriter::new(LineWriterOptions::default());
        reformat_statements(&mut ow, &comments, source, &script.statements);
        assert_eq!(ow.finish().text, "a = 1; // one\nb = 2;");
    }

    #[test]
    fn condition_close_paren_precedes_comment() {
        let source = "if (ready)\n    go()";
        let script = parse_script(source);
        let Statement::If(if_stmt) = &script.statements[0] else {
            panic!("expected if");
        };
        let mut comments = AstComments::new();
        comments
            .node_mut(if_stmt.condition.id())
            .add_post(Comment::new(" // checked\n", Span::new(0, 12), 0, CommentKind::Post));
        let mut ow = OutWriter::new(LineWriterOptions::default());
        reformat_statements(&mut ow, &comments, source, &script.statements);
        assert_eq!(ow.finish().text, "if (ready) // checked\n    go();");
    }

    #[test]
    fn if_else_unbraced() {
        assert_eq!(
            format("if (a) b(); else c();"),
            "if (a)\n    b();\nelse\n    c();"
        );
    }

    #[test]
    fn else_stays_on_closing_brace() {
        assert_eq!(
            format("if (a) { b() } else { c() }"),
            "if (a) {\n    b();\n} else {\n    c();\n}"
        );
    }

    #[test]
    fn else_if_chains_stay_flat() {
        assert_eq!(
            format("if (a) { b() } else if (c) { d() }"),
            "if (a) {\n    b();\n} else if (c) {\n    d();\n}"
        );
    }

    #[test]
    fn object_literal_explodes_one_property_per_line() {
        assert_eq!(
            format("x = {a: 1, b: 2}"),
            "x = {\n    a: 1,\n    b: 2\n};"
        );
        assert_eq!(format("x = {}"), "x = {};");
    }

    #[test]
    fn accessor_object_forms() {
        assert_eq!(
            format("x = { get a() { return 1 }, set a(v) { b = v } }"),
            "x = {\n    get a(){\n        return 1;\n    },\n    set a(v){\n        b = v;\n    }\n};"
        );
    }

    #[test]
    fn shorthand_and_method_properties() {
        assert_eq!(
            format("x = { a, m() { f() } }"),
            "x = {\n    a,\n    m(){\n        f();\n    }\n};"
        );
    }

    #[test]
    fn string_property_names_requote_canonically() {
        assert_eq!(format("x = {'a': 1}"), "x = {\n    \"a\": 1\n};");
        assert_eq!(format("x = {\"b\": 2}"), "x = {\n    \"b\": 2\n};");
        assert_eq!(format("x = {'don\\'t': 3}"), "x = {\n    \"don't\": 3\n};");
    }

    #[test]
    fn arrow_parameter_parentheses() {
        assert_eq!(format_expression_source("(x) => x * 2"), "x => x * 2");
        assert_eq!(format_expression_source("() => 1"), "() => 1");
        assert_eq!(format_expression_source("(a, b) => a + b"), "(a, b) => a + b");
        assert_eq!(format_expression_source("(x = 1) => x"), "(x = 1) => x");
        assert_eq!(format_expression_source("(...xs) => xs"), "(...xs) => xs");
    }

    #[test]
    fn arrow_block_body() {
        assert_eq!(
            format_expression_source("x => { f(x); }"),
            "x => {\n    f(x);\n}"
        );
    }

    #[test]
    fn loops() {
        assert_eq!(
            format("for (let i = 0; i < 3; i++) { f(i) }"),
            "for (let i = 0; i < 3; i++) {\n    f(i);\n}"
        );
        assert_eq!(
            format("for (let x of xs) f(x)"),
            "for (let x of xs)\n    f(x);"
        );
        assert_eq!(
            format("do { f() } while (x)"),
            "do {\n    f();\n} while (x)"
        );
        assert_eq!(format("while (x) f()"), "while (x)\n    f();");
    }

    #[test]
    fn switch_layout() {
        assert_eq!(
            format("switch (x) { case 1: f(); break; default: g() }"),
            "switch (x) {\ncase 1:\n    f();\n    break;\ndefault:\n    g();\n}"
        );
    }

    #[test]
    fn try_catch_finally() {
        assert_eq!(
            format("try { f() } catch (e) { g(e) } finally { h() }"),
            "try {\n    f();\n} catch (e) {\n    g(e);\n} finally {\n    h();\n}"
        );
    }

    #[test]
    fn throw_and_labels() {
        assert_eq!(format("throw new Error(\"x\")"), "throw new Error(\"x\");");
        assert_eq!(
            format("outer: for (x of xs) break outer"),
            "outer: for (x of xs)\n    break outer;"
        );
    }

    #[test]
    fn multiline_template_bytes_survive() {
        let source = "x = `line one\n  line two   \n`";
        assert_eq!(format(source), "x = `line one\n  line two   \n`;");
    }

    #[test]
    fn template_substitutions() {
        assert_eq!(
            format_expression_source("`a${x + 1}b`"),
            "`a${x + 1}b`"
        );
    }

    #[test]
    fn multiline_string_bytes_survive() {
        let source = "x = \"first\\\n  second\"";
        assert_eq!(format(source), "x = \"first\\\n  second\";");
    }

    #[test]
    fn array_of_objects_breaks_lines() {
        assert_eq!(
            format("xs = [{a: 1}, {b: 2}]"),
            "xs = [\n    {\n        a: 1\n    },\n    {\n        b: 2\n    }\n];"
        );
        assert_eq!(format("xs = [1, 2, 3]"), "xs = [1, 2, 3];");
    }

    #[test]
    fn array_holes_and_trailing_comma() {
        assert_eq!(format("xs = [1, , 3]"), "xs = [1, , 3];");
        assert_eq!(format("xs = [1, 2, ]"), "xs = [1, 2,];");
        assert_eq!(format("xs = [...rest]"), "xs = [...rest];");
    }

    #[test]
    fn class_members_get_blank_lines() {
        assert_eq!(
            format("class A extends B { f() { return 1 } }"),
            "class A extends B {\n    f(){\n        return 1;\n    }\n}"
        );
    }

    #[test]
    fn import_export_forms() {
        assert_eq!(format("import \"m\""), "import \"m\";");
        assert_eq!(format("import d from \"m\""), "import d from \"m\";");
        assert_eq!(
            format("import d, { a, b as c } from \"m\""),
            "import d, { a, b as c } from \"m\";"
        );
        assert_eq!(
            format("import * as ns from \"m\""),
            "import * as ns from \"m\";"
        );
        assert_eq!(format("export { a, b as c }"), "export { a, b as c };");
        assert_eq!(
            format("export * as ns from \"m\""),
            "export * as ns from \"m\";"
        );
        assert_eq!(format("export default 5"), "export default 5;");
        assert_eq!(
            format("export function f() {}"),
            "export function f() {}"
        );
        assert_eq!(format("export let a = 1"), "export let a = 1;");
    }

    #[test]
    fn keyword_operators_space_their_operand() {
        assert_eq!(format("delete a.b"), "delete a.b;");
        assert_eq!(format("x = typeof y"), "x = typeof y;");
        assert_eq!(format("x = -y"), "x = -y;");
        assert_eq!(format("i++"), "i++;");
    }

    #[test]
    fn parenthesized_source_keeps_parens() {
        assert_eq!(format("x = (a + b) * c"), "x = (a + b) * c;");
    }

    #[test]
    fn sequence_and_conditional() {
        assert_eq!(format("x = (a, b)"), "x = (a, b);");
        assert_eq!(format("x = a ? b : c"), "x = a ? b : c;");
    }

    #[test]
    fn empty_statement_is_kept() {
        assert_eq!(format("a();;"), "a();\n;");
    }

    #[test]
    fn deep_nesting_reports_marker() {
        let mut ow = OutWriter::new(LineWriterOptions::default());
        let comments = AstComments::new();
        let mut formatter = ScriptFormatter::new(&mut ow, &comments, "");
        formatter.nesting = MAX_FORMAT_DEPTH;
        formatter.dispatch_statement(&Statement::Empty(crate::ast::EmptyStatement {
            id: NodeId::new(0),
            span: Span::new(0, 1),
        }));
        assert_eq!(ow.finish().text, ";");
        // past the limit nothing more is emitted but a single marker
        let mut ow = OutWriter::new(LineWriterOptions::default());
        let comments = AstComments::new();
        let mut formatter = ScriptFormatter::new(&mut ow, &comments, "");
        formatter.nesting = MAX_FORMAT_DEPTH;
        formatter.statement_inner(&Statement::Empty(crate::ast::EmptyStatement {
            id: NodeId::new(0),
            span: Span::new(0, 1),
        }));
        formatter.statement_inner(&Statement::Empty(crate::ast::EmptyStatement {
            id: NodeId::new(1),
            span: Span::new(1, 2),
        }));
        assert_eq!(
            ow.finish().text,
            "/* ERROR: hit recursion limit while formatting script, rewrite failed */"
        );
    }
}
