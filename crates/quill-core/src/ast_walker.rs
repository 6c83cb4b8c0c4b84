// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Shared AST walker for passes that need every node in source order.
//!
//! Provides pre-order recursive walks over statement and expression trees,
//! calling a visitor closure with each node's identity and span. The comment
//! collector is the main consumer: it records the extent of every node, and
//! relies on the walk visiting nodes in source order so that ties between
//! overlapping extents resolve to the outermost node.
//!
//! # What is NOT handled here
//!
//! Lists are not nodes, so the visitor is never called for a statement list,
//! argument list or parameter list as a whole. Raw template chunks, property
//! name text and import/export binding names are likewise not nodes. The
//! declarative document layer has no AST at all; its comment regions are
//! recorded separately by the collector.

use crate::ast::{
    ArrayItem, Expression, ExportKind, ForInit, FunctionBody, FunctionExpression, NodeId,
    ObjectProperty, ObjectPropertyKind, PropertyNameKind, Statement, VariableDeclaration,
};
use crate::source_analysis::Span;

/// Walks every statement of a list in source order.
pub(crate) fn walk_statements<F>(statements: &[Statement], f: &mut F)
where
    F: FnMut(NodeId, Span),
{
    for statement in statements {
        walk_statement(statement, f);
    }
}

/// Recursively walks a statement tree in pre-order.
///
/// The visitor is called on the current node **before** its children, and
/// children are visited in source order (so a `do`/`while` visits the body
/// before the condition).
#[allow(clippy::too_many_lines)] // one arm per statement variant — irreducible
pub(crate) fn walk_statement<F>(statement: &Statement, f: &mut F)
where
    F: FnMut(NodeId, Span),
{
    f(statement.id(), statement.span());
    match statement {
        Statement::Block(block) => walk_statements(&block.statements, f),
        Statement::Variable(decl) => walk_declarators(decl, f),
        Statement::Empty(_) => {}
        Statement::Expression(stmt) => walk_expression(&stmt.expression, f),
        Statement::If(stmt) => {
            walk_expression(&stmt.condition, f);
            walk_statement(&stmt.consequent, f);
            if let Some(alternate) = &stmt.alternate {
                walk_statement(alternate, f);
            }
        }
        Statement::DoWhile(stmt) => {
            walk_statement(&stmt.body, f);
            walk_expression(&stmt.condition, f);
        }
        Statement::While(stmt) => {
            walk_expression(&stmt.condition, f);
            walk_statement(&stmt.body, f);
        }
        Statement::For(stmt) => {
            match &stmt.init {
                Some(ForInit::Variable(decl)) => {
                    f(decl.id, decl.span);
                    walk_declarators(decl, f);
                }
                Some(ForInit::Expression(expr)) => walk_expression(expr, f),
                None => {}
            }
            if let Some(condition) = &stmt.condition {
                walk_expression(condition, f);
            }
            if let Some(update) = &stmt.update {
                walk_expression(update, f);
            }
            walk_statement(&stmt.body, f);
        }
        Statement::ForEach(stmt) => {
            walk_expression(&stmt.target, f);
            walk_expression(&stmt.iterable, f);
            walk_statement(&stmt.body, f);
        }
        Statement::Continue(_) | Statement::Break(_) => {}
        Statement::Return(stmt) => {
            if let Some(value) = &stmt.value {
                walk_expression(value, f);
            }
        }
        Statement::With(stmt) => {
            walk_expression(&stmt.object, f);
            walk_statement(&stmt.body, f);
        }
        Statement::Switch(stmt) => {
            walk_expression(&stmt.discriminant, f);
            let cases = &stmt.cases;
            f(cases.id, cases.span);
            for clause in &cases.clauses {
                f(clause.id, clause.span);
                walk_expression(&clause.test, f);
                walk_statements(&clause.statements, f);
            }
            if let Some(default_clause) = &cases.default_clause {
                f(default_clause.id, default_clause.span);
                walk_statements(&default_clause.statements, f);
            }
            for clause in &cases.more_clauses {
                f(clause.id, clause.span);
                walk_expression(&clause.test, f);
                walk_statements(&clause.statements, f);
            }
        }
        Statement::Labelled(stmt) => walk_statement(&stmt.statement, f),
        Statement::Throw(stmt) => walk_expression(&stmt.value, f),
        Statement::Try(stmt) => {
            f(stmt.block.id, stmt.block.span);
            walk_statements(&stmt.block.statements, f);
            if let Some(catch) = &stmt.catch {
                f(catch.id, catch.span);
                f(catch.block.id, catch.block.span);
                walk_statements(&catch.block.statements, f);
            }
            if let Some(finally) = &stmt.finally {
                f(finally.id, finally.span);
                f(finally.block.id, finally.block.span);
                walk_statements(&finally.block.statements, f);
            }
        }
        Statement::Function(function) => walk_function_children(function, f),
        Statement::Class(class) => {
            if let Some(heritage) = &class.heritage {
                walk_expression(heritage, f);
            }
            for member in &class.members {
                f(member.id, member.span);
                walk_object_property(&member.property, f);
            }
        }
        Statement::Import(import) => {
            if let Some(named) = &import.named {
                for specifier in named {
                    f(specifier.id, specifier.span);
                }
            }
        }
        Statement::Export(export) => match &export.kind {
            ExportKind::Named { specifiers, .. } => {
                for specifier in specifiers {
                    f(specifier.id, specifier.span);
                }
            }
            ExportKind::AllFrom { .. } => {}
            ExportKind::Default(inner) | ExportKind::Declaration(inner) => {
                walk_statement(inner, f);
            }
        },
    }
}

/// Recursively walks an expression tree in pre-order.
pub(crate) fn walk_expression<F>(expr: &Expression, f: &mut F)
where
    F: FnMut(NodeId, Span),
{
    f(expr.id(), expr.span());
    match expr {
        Expression::Template(template) => {
            for part in &template.parts {
                if let Some(substitution) = &part.expression {
                    walk_expression(substitution, f);
                }
            }
        }
        Expression::Array(array) => {
            for item in &array.items {
                if let ArrayItem::Element { expression, .. } = item {
                    walk_expression(expression, f);
                }
            }
        }
        Expression::Object(object) => {
            for property in &object.properties {
                walk_object_property(property, f);
            }
        }
        Expression::Paren { expression, .. } => walk_expression(expression, f),
        Expression::Index { base, index, .. } => {
            walk_expression(base, f);
            walk_expression(index, f);
        }
        Expression::Member { base, .. } => walk_expression(base, f),
        Expression::New {
            callee, arguments, ..
        } => {
            walk_expression(callee, f);
            if let Some(arguments) = arguments {
                for argument in arguments {
                    walk_expression(&argument.expression, f);
                }
            }
        }
        Expression::Call {
            callee, arguments, ..
        } => {
            walk_expression(callee, f);
            for argument in arguments {
                walk_expression(&argument.expression, f);
            }
        }
        Expression::Unary { operand, .. } => walk_expression(operand, f),
        Expression::Binary { left, right, .. } | Expression::Sequence { left, right, .. } => {
            walk_expression(left, f);
            walk_expression(right, f);
        }
        Expression::Conditional {
            condition,
            consequent,
            alternate,
            ..
        } => {
            walk_expression(condition, f);
            walk_expression(consequent, f);
            walk_expression(alternate, f);
        }
        Expression::Function(function) => walk_function_children(function, f),
        Expression::Class(class) => {
            if let Some(heritage) = &class.heritage {
                walk_expression(heritage, f);
            }
            for member in &class.members {
                f(member.id, member.span);
                walk_object_property(&member.property, f);
            }
        }
        Expression::Yield { argument, .. } => {
            if let Some(argument) = argument {
                walk_expression(argument, f);
            }
        }
        // Leaf nodes — nothing to recurse into.
        Expression::This { .. }
        | Expression::Super { .. }
        | Expression::Null { .. }
        | Expression::True { .. }
        | Expression::False { .. }
        | Expression::Identifier { .. }
        | Expression::String { .. }
        | Expression::Number { .. }
        | Expression::Regex { .. }
        | Expression::Error { .. } => {}
    }
}

/// Walks the declarators of a variable declaration whose own node the caller
/// has already visited.
fn walk_declarators<F>(declaration: &VariableDeclaration, f: &mut F)
where
    F: FnMut(NodeId, Span),
{
    for declarator in &declaration.declarators {
        f(declarator.id, declarator.span);
        walk_expression(&declarator.target, f);
        if let Some(initializer) = &declarator.initializer {
            walk_expression(initializer, f);
        }
    }
}

/// Walks the children of a function whose own node the caller has already
/// visited (it is the surrounding `Statement` or `Expression`).
fn walk_function_children<F>(function: &FunctionExpression, f: &mut F)
where
    F: FnMut(NodeId, Span),
{
    for parameter in &function.parameters {
        f(parameter.id, parameter.span);
        walk_expression(&parameter.target, f);
        if let Some(initializer) = &parameter.initializer {
            walk_expression(initializer, f);
        }
    }
    match &function.body {
        FunctionBody::Block(statements) => walk_statements(statements, f),
        FunctionBody::Expression(expression) => walk_expression(expression, f),
    }
}

/// Walks an object property: the property node, its name node and its value.
fn walk_object_property<F>(property: &ObjectProperty, f: &mut F)
where
    F: FnMut(NodeId, Span),
{
    f(property.id, property.span);
    f(property.name.id, property.name.span);
    if let PropertyNameKind::Computed(expression) = &property.name.kind {
        walk_expression(expression, f);
    }
    match &property.kind {
        ObjectPropertyKind::Shorthand { initializer } => {
            if let Some(initializer) = initializer {
                walk_expression(initializer, f);
            }
        }
        ObjectPropertyKind::KeyValue { value } => walk_expression(value, f),
        ObjectPropertyKind::Method { function, .. } => {
            f(function.id, function.span);
            walk_function_children(function, f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{
        EmptyStatement, ExpressionStatement, IfStatement,
    };

    fn identifier(id: u32, start: u32, end: u32, name: &str) -> Expression {
        Expression::Identifier {
            id: NodeId::new(id),
            span: Span::new(start, end),
            name: name.into(),
        }
    }

    #[test]
    fn walk_visits_pre_order_in_source_order() {
        // if (a) ; else b;
        let statement = Statement::If(IfStatement {
            id: NodeId::new(0),
            span: Span::new(0, 16),
            condition: identifier(1, 4, 5, "a"),
            consequent: Box::new(Statement::Empty(EmptyStatement {
                id: NodeId::new(2),
                span: Span::new(7, 8),
            })),
            alternate: Some(Box::new(Statement::Expression(ExpressionStatement {
                id: NodeId::new(3),
                span: Span::new(14, 16),
                expression: identifier(4, 14, 15, "b"),
            }))),
        });

        let mut visited = Vec::new();
        walk_statement(&statement, &mut |id, span| visited.push((id.raw(), span.start())));
        assert_eq!(visited, vec![(0, 0), (1, 4), (2, 7), (3, 14), (4, 14)]);
    }
}
