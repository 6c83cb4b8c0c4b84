// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Statement parsing for the script sub-language.
//!
//! Statements are recognized by their leading token; anything that does not
//! start with a statement keyword, a brace or a label is an expression
//! statement. Semicolons follow automatic semicolon insertion: a missing
//! `;` is fine before `}`, at end of input or at a line break, and an error
//! anywhere else. The two restricted productions (`return`/`throw` and
//! postfix `++`/`--`) honor the no-newline rule.

use ecow::EcoString;

use crate::ast::{
    Block, BreakStatement, CaseBlock, CaseClause, CatchClause, ContinueStatement, DefaultClause,
    DoWhileStatement, EmptyStatement, ExportDeclaration, ExportKind, ExportSpecifier, Expression,
    ExpressionStatement, FinallyClause, ForEachOperator, ForEachStatement, ForInit, ForStatement,
    IfStatement, ImportDeclaration, ImportSpecifier, LabelledStatement, NodeId, ReturnStatement,
    Statement, SwitchStatement, ThrowStatement, TryStatement, VariableDeclaration,
    VariableDeclarator, VariableKind, WhileStatement, WithStatement,
};
use crate::source_analysis::{Span, TokenKind};

use super::Parser;

/// Maps a declaration keyword token to its kind.
fn variable_kind_of(kind: &TokenKind) -> Option<VariableKind> {
    match kind {
        TokenKind::Var => Some(VariableKind::Var),
        TokenKind::Let => Some(VariableKind::Let),
        TokenKind::Const => Some(VariableKind::Const),
        _ => None,
    }
}

impl Parser {
    /// Parses statements until the end token (not consumed) or end of input.
    pub(crate) fn parse_statement_list(&mut self, end: &TokenKind) -> Vec<Statement> {
        let end = end.clone();
        self.parse_statements_until(|kind| {
            std::mem::discriminant(kind) == std::mem::discriminant(&end)
        })
    }

    fn parse_statements_until(&mut self, stop: impl Fn(&TokenKind) -> bool) -> Vec<Statement> {
        let mut statements = Vec::new();
        while !self.is_at_end() && !stop(self.current_kind()) {
            let before = self.position();
            statements.push(self.parse_statement());
            if self.position() == before {
                // A statement that consumed nothing; skip the offending
                // token so the loop terminates.
                self.advance();
            }
        }
        statements
    }

    /// Parses one statement, recovering to a statement boundary on errors.
    pub(crate) fn parse_statement(&mut self) -> Statement {
        let span = self.current_span();
        if let Err(error) = self.enter_nesting(span) {
            return Statement::Expression(ExpressionStatement {
                id: self.fresh_id(),
                span,
                expression: error,
            });
        }
        let statement = stacker::maybe_grow(32 * 1024, 256 * 1024, || self.parse_statement_inner());
        self.leave_nesting();
        statement
    }

    fn parse_statement_inner(&mut self) -> Statement {
        if let Some(kind) = variable_kind_of(self.current_kind()) {
            let mut declaration = self.parse_variable_declaration(kind, false);
            self.expect_semicolon();
            declaration.span = self.span_from(declaration.span);
            return Statement::Variable(declaration);
        }
        match self.current_kind() {
            TokenKind::LeftBrace => Statement::Block(self.parse_block()),
            TokenKind::Semicolon => {
                let span = self.current_span();
                self.advance();
                Statement::Empty(EmptyStatement { id: self.fresh_id(), span })
            }
            TokenKind::If => self.parse_if(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Continue => self.parse_continue(),
            TokenKind::Break => self.parse_break(),
            TokenKind::Return => self.parse_return(),
            TokenKind::With => self.parse_with(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Throw => self.parse_throw(),
            TokenKind::Try => self.parse_try(),
            TokenKind::Function => {
                Statement::Function(Box::new(self.parse_function_definition()))
            }
            TokenKind::Class => Statement::Class(Box::new(self.parse_class_definition())),
            TokenKind::Import => self.parse_import(),
            TokenKind::Export => self.parse_export(),
            TokenKind::Identifier(_) if matches!(self.peek_kind(1), TokenKind::Colon) => {
                self.parse_labelled()
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// Consumes a statement-terminating semicolon, or accepts its absence
    /// before `}`, at end of input or across a line break.
    fn expect_semicolon(&mut self) {
        if self.match_token(&TokenKind::Semicolon) {
            return;
        }
        if self.check(&TokenKind::RightBrace)
            || self.is_at_end()
            || self.current_token().newline_before()
        {
            return;
        }
        self.error("expected ';' after statement");
    }

    fn parse_expression_statement(&mut self) -> Statement {
        let start = self.current_span();
        let id = self.fresh_id();
        let expression = self.parse_expression(false);
        if expression.is_error() {
            self.synchronize();
        } else {
            self.expect_semicolon();
        }
        Statement::Expression(ExpressionStatement {
            id,
            span: self.span_from(start),
            expression,
        })
    }

    /// Parses a braced block with the `{` current.
    fn parse_block(&mut self) -> Block {
        let start = self.current_span();
        let id = self.fresh_id();
        self.advance();
        let statements = self.parse_statement_list(&TokenKind::RightBrace);
        self.expect(&TokenKind::RightBrace, "expected '}' to close block");
        Block { id, span: self.span_from(start), statements }
    }

    /// Parses the declarators after `var`/`let`/`const` (keyword current).
    /// Does not consume a trailing semicolon; `for` heads have none.
    fn parse_variable_declaration(&mut self, kind: VariableKind, no_in: bool) -> VariableDeclaration {
        let start = self.current_span();
        let id = self.fresh_id();
        self.advance();
        let mut declarators = Vec::new();
        loop {
            let declarator_start = self.current_span();
            let declarator_id = self.fresh_id();
            let target = self.parse_binding_target();
            let initializer = if self.match_token(&TokenKind::Eq) {
                Some(self.parse_assignment(no_in))
            } else {
                None
            };
            declarators.push(VariableDeclarator {
                id: declarator_id,
                span: self.span_from(declarator_start),
                target,
                initializer,
            });
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        VariableDeclaration { id, span: self.span_from(start), kind, declarators }
    }

    fn parse_if(&mut self) -> Statement {
        let start = self.current_span();
        let id = self.fresh_id();
        self.advance();
        self.expect(&TokenKind::LeftParen, "expected '(' after 'if'");
        let condition = self.parse_expression(false);
        self.expect(&TokenKind::RightParen, "expected ')' after condition");
        let consequent = Box::new(self.parse_statement());
        let alternate = if self.match_token(&TokenKind::Else) {
            Some(Box::new(self.parse_statement()))
        } else {
            None
        };
        Statement::If(IfStatement {
            id,
            span: self.span_from(start),
            condition,
            consequent,
            alternate,
        })
    }

    fn parse_do_while(&mut self) -> Statement {
        let start = self.current_span();
        let id = self.fresh_id();
        self.advance();
        let body = Box::new(self.parse_statement());
        self.expect(&TokenKind::While, "expected 'while' after do body");
        self.expect(&TokenKind::LeftParen, "expected '(' after 'while'");
        let condition = self.parse_expression(false);
        self.expect(&TokenKind::RightParen, "expected ')' after condition");
        // The trailing semicolon is optional even mid-line.
        self.match_token(&TokenKind::Semicolon);
        Statement::DoWhile(DoWhileStatement {
            id,
            span: self.span_from(start),
            body,
            condition,
        })
    }

    fn parse_while(&mut self) -> Statement {
        let start = self.current_span();
        let id = self.fresh_id();
        self.advance();
        self.expect(&TokenKind::LeftParen, "expected '(' after 'while'");
        let condition = self.parse_expression(false);
        self.expect(&TokenKind::RightParen, "expected ')' after condition");
        let body = Box::new(self.parse_statement());
        Statement::While(WhileStatement {
            id,
            span: self.span_from(start),
            condition,
            body,
        })
    }

    fn parse_with(&mut self) -> Statement {
        let start = self.current_span();
        let id = self.fresh_id();
        self.advance();
        self.expect(&TokenKind::LeftParen, "expected '(' after 'with'");
        let object = self.parse_expression(false);
        self.expect(&TokenKind::RightParen, "expected ')' after object");
        let body = Box::new(self.parse_statement());
        Statement::With(WithStatement {
            id,
            span: self.span_from(start),
            object,
            body,
        })
    }

    /// Parses the three `for` forms: classic, `for-in` and `for-of`. The
    /// head is disambiguated after parsing the init clause, which must not
    /// treat `in` as an operator.
    fn parse_for(&mut self) -> Statement {
        let start = self.current_span();
        let id = self.fresh_id();
        self.advance();
        self.expect(&TokenKind::LeftParen, "expected '(' after 'for'");

        if let Some(kind) = variable_kind_of(self.current_kind()) {
            let declaration = self.parse_variable_declaration(kind, true);
            if let Some(operator) = self.for_each_operator() {
                let target = self.for_each_target(declaration);
                return self.finish_for_each(start, id, Some(kind), target, operator);
            }
            self.expect(&TokenKind::Semicolon, "expected ';' after for init");
            return self.finish_classic_for(start, id, Some(ForInit::Variable(declaration)));
        }

        if self.match_token(&TokenKind::Semicolon) {
            return self.finish_classic_for(start, id, None);
        }

        let init = self.parse_expression(true);
        if let Some(operator) = self.for_each_operator() {
            return self.finish_for_each(start, id, None, init, operator);
        }
        self.expect(&TokenKind::Semicolon, "expected ';' after for init");
        self.finish_classic_for(start, id, Some(ForInit::Expression(Box::new(init))))
    }

    /// Consumes `in` or the contextual `of` if one is current.
    fn for_each_operator(&mut self) -> Option<ForEachOperator> {
        if self.match_token(&TokenKind::In) {
            Some(ForEachOperator::In)
        } else if self.match_contextual("of") {
            Some(ForEachOperator::Of)
        } else {
            None
        }
    }

    /// Reduces a `for (let x in ...)` declaration to its binding target.
    fn for_each_target(&mut self, declaration: VariableDeclaration) -> Expression {
        let VariableDeclaration { span, declarators, .. } = declaration;
        if declarators.len() != 1 {
            self.error_at("for-in/of declarations take a single binding", span);
        }
        match declarators.into_iter().next() {
            Some(declarator) => {
                if let Some(initializer) = &declarator.initializer {
                    self.error_at(
                        "for-in/of declarations cannot have an initializer",
                        initializer.span(),
                    );
                }
                declarator.target
            }
            None => Expression::Error {
                id: self.fresh_id(),
                span,
                message: "missing binding in for-in/of head".into(),
            },
        }
    }

    fn finish_for_each(
        &mut self,
        start: Span,
        id: NodeId,
        declaration_kind: Option<VariableKind>,
        target: Expression,
        operator: ForEachOperator,
    ) -> Statement {
        let iterable = self.parse_expression(false);
        self.expect(&TokenKind::RightParen, "expected ')' after for-each head");
        let body = Box::new(self.parse_statement());
        Statement::ForEach(ForEachStatement {
            id,
            span: self.span_from(start),
            declaration_kind,
            target,
            operator,
            iterable,
            body,
        })
    }

    fn finish_classic_for(&mut self, start: Span, id: NodeId, init: Option<ForInit>) -> Statement {
        let condition = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression(false))
        };
        self.expect(&TokenKind::Semicolon, "expected ';' after for condition");
        let update = if self.check(&TokenKind::RightParen) {
            None
        } else {
            Some(self.parse_expression(false))
        };
        self.expect(&TokenKind::RightParen, "expected ')' after for head");
        let body = Box::new(self.parse_statement());
        Statement::For(ForStatement {
            id,
            span: self.span_from(start),
            init,
            condition,
            update,
            body,
        })
    }

    fn parse_continue(&mut self) -> Statement {
        let start = self.current_span();
        let id = self.fresh_id();
        self.advance();
        let label = self.optional_label();
        self.expect_semicolon();
        Statement::Continue(ContinueStatement { id, span: self.span_from(start), label })
    }

    fn parse_break(&mut self) -> Statement {
        let start = self.current_span();
        let id = self.fresh_id();
        self.advance();
        let label = self.optional_label();
        self.expect_semicolon();
        Statement::Break(BreakStatement { id, span: self.span_from(start), label })
    }

    /// A label operand on the same line as `continue`/`break`.
    fn optional_label(&mut self) -> Option<EcoString> {
        if self.current_token().newline_before() {
            return None;
        }
        match self.current_kind() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ => None,
        }
    }

    fn parse_return(&mut self) -> Statement {
        let start = self.current_span();
        let id = self.fresh_id();
        self.advance();
        // Restricted production: a newline ends the statement.
        let value = if self.current_token().newline_before() || !self.can_follow_return() {
            None
        } else {
            Some(self.parse_expression(false))
        };
        self.expect_semicolon();
        Statement::Return(ReturnStatement { id, span: self.span_from(start), value })
    }

    fn can_follow_return(&self) -> bool {
        !matches!(
            self.current_kind(),
            TokenKind::Semicolon | TokenKind::RightBrace | TokenKind::Eof
        )
    }

    fn parse_throw(&mut self) -> Statement {
        let start = self.current_span();
        let id = self.fresh_id();
        self.advance();
        let value = if self.current_token().newline_before() {
            // Restricted production: `throw` takes its operand on the same
            // line.
            let span = self.previous_span();
            self.error_at("newline not allowed after 'throw'", span);
            Expression::Error {
                id: self.fresh_id(),
                span,
                message: "newline not allowed after 'throw'".into(),
            }
        } else {
            self.parse_expression(false)
        };
        self.expect_semicolon();
        Statement::Throw(ThrowStatement { id, span: self.span_from(start), value })
    }

    fn parse_switch(&mut self) -> Statement {
        let start = self.current_span();
        let id = self.fresh_id();
        self.advance();
        self.expect(&TokenKind::LeftParen, "expected '(' after 'switch'");
        let discriminant = self.parse_expression(false);
        self.expect(&TokenKind::RightParen, "expected ')' after discriminant");

        let block_start = self.current_span();
        let block_id = self.fresh_id();
        self.expect(&TokenKind::LeftBrace, "expected '{' to open switch block");
        let mut clauses = Vec::new();
        let mut default_clause: Option<DefaultClause> = None;
        let mut more_clauses = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            match self.current_kind() {
                TokenKind::Case => {
                    let clause = self.parse_case_clause();
                    if default_clause.is_none() {
                        clauses.push(clause);
                    } else {
                        more_clauses.push(clause);
                    }
                }
                TokenKind::Default => {
                    if default_clause.is_some() {
                        self.error("duplicate 'default' clause in switch");
                    }
                    let clause_start = self.current_span();
                    let clause_id = self.fresh_id();
                    self.advance();
                    self.expect(&TokenKind::Colon, "expected ':' after 'default'");
                    let statements = self.parse_clause_statements();
                    let clause = DefaultClause {
                        id: clause_id,
                        span: self.span_from(clause_start),
                        statements,
                    };
                    if default_clause.is_none() {
                        default_clause = Some(clause);
                    }
                }
                _ => {
                    self.error("expected 'case' or 'default' in switch block");
                    self.advance();
                }
            }
        }
        self.expect(&TokenKind::RightBrace, "expected '}' to close switch block");
        let cases = CaseBlock {
            id: block_id,
            span: self.span_from(block_start),
            clauses,
            default_clause,
            more_clauses,
        };
        Statement::Switch(SwitchStatement {
            id,
            span: self.span_from(start),
            discriminant,
            cases,
        })
    }

    fn parse_case_clause(&mut self) -> CaseClause {
        let start = self.current_span();
        let id = self.fresh_id();
        self.advance();
        let test = self.parse_expression(false);
        self.expect(&TokenKind::Colon, "expected ':' after case value");
        let statements = self.parse_clause_statements();
        CaseClause { id, span: self.span_from(start), test, statements }
    }

    fn parse_clause_statements(&mut self) -> Vec<Statement> {
        self.parse_statements_until(|kind| {
            matches!(
                kind,
                TokenKind::Case | TokenKind::Default | TokenKind::RightBrace
            )
        })
    }

    fn parse_labelled(&mut self) -> Statement {
        let start = self.current_span();
        let id = self.fresh_id();
        let label = self
            .expect_identifier("expected label name")
            .unwrap_or_default();
        self.advance(); // :
        let statement = Box::new(self.parse_statement());
        Statement::Labelled(LabelledStatement {
            id,
            span: self.span_from(start),
            label,
            statement,
        })
    }

    fn parse_try(&mut self) -> Statement {
        let start = self.current_span();
        let id = self.fresh_id();
        self.advance();
        let block = self.parse_block_required("expected '{' after 'try'");
        let catch = if self.check(&TokenKind::Catch) {
            let catch_start = self.current_span();
            let catch_id = self.fresh_id();
            self.advance();
            let parameter = if self.match_token(&TokenKind::LeftParen) {
                let name = self.expect_identifier("expected catch parameter name");
                self.expect(&TokenKind::RightParen, "expected ')' after catch parameter");
                name
            } else {
                None
            };
            let block = self.parse_block_required("expected '{' after catch");
            Some(CatchClause {
                id: catch_id,
                span: self.span_from(catch_start),
                parameter,
                block,
            })
        } else {
            None
        };
        let finally = if self.check(&TokenKind::Finally) {
            let finally_start = self.current_span();
            let finally_id = self.fresh_id();
            self.advance();
            let block = self.parse_block_required("expected '{' after 'finally'");
            Some(FinallyClause {
                id: finally_id,
                span: self.span_from(finally_start),
                block,
            })
        } else {
            None
        };
        if catch.is_none() && finally.is_none() {
            self.error("expected 'catch' or 'finally' after try block");
        }
        Statement::Try(TryStatement {
            id,
            span: self.span_from(start),
            block,
            catch,
            finally,
        })
    }

    fn parse_block_required(&mut self, message: &str) -> Block {
        if self.check(&TokenKind::LeftBrace) {
            self.parse_block()
        } else {
            self.error(message);
            let span = self.current_span();
            Block { id: self.fresh_id(), span, statements: Vec::new() }
        }
    }

    // ── Modules ───────────────────────────────────────────────────────────

    fn parse_import(&mut self) -> Statement {
        let start = self.current_span();
        let id = self.fresh_id();
        self.advance();

        // import "module";
        if let TokenKind::String(raw) = self.current_kind() {
            let module = raw.clone();
            self.advance();
            self.expect_semicolon();
            return Statement::Import(ImportDeclaration {
                id,
                span: self.span_from(start),
                default_binding: None,
                namespace_binding: None,
                named: None,
                module,
            });
        }

        let mut default_binding = None;
        let mut namespace_binding = None;
        let mut named = None;

        let mut expect_bindings = true;
        if let TokenKind::Identifier(name) = self.current_kind() {
            default_binding = Some(name.clone());
            self.advance();
            expect_bindings = self.match_token(&TokenKind::Comma);
        }
        if expect_bindings {
            if self.match_token(&TokenKind::Star) {
                if !self.match_contextual("as") {
                    self.error("expected 'as' after '*'");
                }
                namespace_binding = self.expect_identifier("expected namespace binding name");
            } else if self.check(&TokenKind::LeftBrace) {
                named = Some(self.parse_import_specifiers());
            } else {
                self.error("expected import bindings");
            }
        }

        if !self.match_contextual("from") {
            self.error("expected 'from' after import bindings");
        }
        let module = self.expect_module_specifier();
        self.expect_semicolon();
        Statement::Import(ImportDeclaration {
            id,
            span: self.span_from(start),
            default_binding,
            namespace_binding,
            named,
            module,
        })
    }

    fn parse_import_specifiers(&mut self) -> Vec<ImportSpecifier> {
        self.advance(); // {
        let mut specifiers = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            let start = self.current_span();
            let id = self.fresh_id();
            let Some(first) = self.expect_identifier_name("expected imported name") else {
                break;
            };
            let (imported, local) = if self.match_contextual("as") {
                let local = self
                    .expect_identifier("expected local name after 'as'")
                    .unwrap_or_default();
                (Some(first), local)
            } else {
                (None, first)
            };
            specifiers.push(ImportSpecifier {
                id,
                span: self.span_from(start),
                imported,
                local,
            });
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RightBrace, "expected '}' after import list");
        specifiers
    }

    fn parse_export(&mut self) -> Statement {
        let start = self.current_span();
        let id = self.fresh_id();
        self.advance();

        if self.match_token(&TokenKind::Star) {
            let alias = if self.match_contextual("as") {
                self.expect_identifier("expected name after 'as'")
            } else {
                None
            };
            if !self.match_contextual("from") {
                self.error("expected 'from' after 'export *'");
            }
            let module = self.expect_module_specifier();
            self.expect_semicolon();
            return Statement::Export(ExportDeclaration {
                id,
                span: self.span_from(start),
                kind: ExportKind::AllFrom { alias, module },
            });
        }

        if self.check(&TokenKind::LeftBrace) {
            let specifiers = self.parse_export_specifiers();
            let module = if self.match_contextual("from") {
                Some(self.expect_module_specifier())
            } else {
                None
            };
            self.expect_semicolon();
            return Statement::Export(ExportDeclaration {
                id,
                span: self.span_from(start),
                kind: ExportKind::Named { specifiers, module },
            });
        }

        if self.match_token(&TokenKind::Default) {
            let inner = if matches!(self.current_kind(), TokenKind::Function | TokenKind::Class) {
                self.parse_statement()
            } else {
                let expr_start = self.current_span();
                let expr_id = self.fresh_id();
                let expression = self.parse_assignment(false);
                self.expect_semicolon();
                Statement::Expression(ExpressionStatement {
                    id: expr_id,
                    span: self.span_from(expr_start),
                    expression,
                })
            };
            return Statement::Export(ExportDeclaration {
                id,
                span: self.span_from(start),
                kind: ExportKind::Default(Box::new(inner)),
            });
        }

        if matches!(
            self.current_kind(),
            TokenKind::Var
                | TokenKind::Let
                | TokenKind::Const
                | TokenKind::Function
                | TokenKind::Class
        ) {
            let inner = self.parse_statement();
            return Statement::Export(ExportDeclaration {
                id,
                span: self.span_from(start),
                kind: ExportKind::Declaration(Box::new(inner)),
            });
        }

        self.error("expected export clause or declaration");
        Statement::Export(ExportDeclaration {
            id,
            span: self.span_from(start),
            kind: ExportKind::Named { specifiers: Vec::new(), module: None },
        })
    }

    fn parse_export_specifiers(&mut self) -> Vec<ExportSpecifier> {
        self.advance(); // {
        let mut specifiers = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            let start = self.current_span();
            let id = self.fresh_id();
            let Some(local) = self.expect_identifier_name("expected exported name") else {
                break;
            };
            let exported = if self.match_contextual("as") {
                self.expect_identifier_name("expected name after 'as'")
            } else {
                None
            };
            specifiers.push(ExportSpecifier {
                id,
                span: self.span_from(start),
                local,
                exported,
            });
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RightBrace, "expected '}' after export list");
        specifiers
    }

    /// Consumes an identifier or reserved word, as import/export lists
    /// allow (`import { default as d }`).
    fn expect_identifier_name(&mut self, message: &str) -> Option<EcoString> {
        match self.current_kind() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            kind if kind.is_identifier_name() => {
                let token = self.advance();
                Some(token.kind().reserved_word_text().unwrap_or_default().into())
            }
            _ => {
                self.error(message);
                None
            }
        }
    }

    /// Consumes a module string, keeping its raw text with quotes.
    fn expect_module_specifier(&mut self) -> EcoString {
        match self.current_kind() {
            TokenKind::String(raw) => {
                let raw = raw.clone();
                self.advance();
                raw
            }
            _ => {
                self.error("expected module string");
                EcoString::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse_script;
    use crate::ast::{
        ExportKind, Expression, ForEachOperator, ForInit, Statement, VariableKind,
    };

    fn statements(source: &str) -> Vec<Statement> {
        let script = parse_script(source);
        assert!(
            script.is_clean(),
            "expected clean parse of {source:?}: {:?}",
            script.diagnostics
        );
        script.statements
    }

    fn statement(source: &str) -> Statement {
        let mut parsed = statements(source);
        assert_eq!(parsed.len(), 1, "source {source:?}");
        parsed.remove(0)
    }

    #[test]
    fn variable_declarations() {
        let Statement::Variable(decl) = statement("let a = 1, b;") else {
            panic!("expected variable declaration");
        };
        assert_eq!(decl.kind, VariableKind::Let);
        assert_eq!(decl.declarators.len(), 2);
        assert!(decl.declarators[0].initializer.is_some());
        assert!(decl.declarators[1].initializer.is_none());

        let Statement::Variable(decl) = statement("const [a, b] = xs;") else {
            panic!("expected variable declaration");
        };
        assert!(matches!(decl.declarators[0].target, Expression::Array(_)));
    }

    #[test]
    fn if_else_chain() {
        let Statement::If(stmt) = statement("if (a) b(); else if (c) d(); else e();") else {
            panic!("expected if");
        };
        assert!(matches!(*stmt.alternate.unwrap(), Statement::If(_)));
    }

    #[test]
    fn do_while_with_and_without_semicolon() {
        assert!(matches!(statement("do f(); while (a);"), Statement::DoWhile(_)));
        assert!(matches!(statement("do { f(); } while (a)"), Statement::DoWhile(_)));
    }

    #[test]
    fn classic_for_with_empty_clauses() {
        let Statement::For(stmt) = statement("for (;;) {}") else {
            panic!("expected for");
        };
        assert!(stmt.init.is_none());
        assert!(stmt.condition.is_none());
        assert!(stmt.update.is_none());

        let Statement::For(stmt) = statement("for (let i = 0; i < 10; ++i) f(i);") else {
            panic!("expected for");
        };
        assert!(matches!(stmt.init, Some(ForInit::Variable(_))));
    }

    #[test]
    fn for_in_and_for_of() {
        let Statement::ForEach(stmt) = statement("for (k in o) f(k);") else {
            panic!("expected for-in");
        };
        assert_eq!(stmt.operator, ForEachOperator::In);
        assert!(stmt.declaration_kind.is_none());

        let Statement::ForEach(stmt) = statement("for (const x of xs) f(x);") else {
            panic!("expected for-of");
        };
        assert_eq!(stmt.operator, ForEachOperator::Of);
        assert_eq!(stmt.declaration_kind, Some(VariableKind::Const));
    }

    #[test]
    fn continue_and_break_labels() {
        let parsed = statements("outer: while (a) { continue outer; break; }");
        assert!(matches!(parsed[0], Statement::Labelled(_)));
    }

    #[test]
    fn return_value_ends_at_newline() {
        let script = parse_script("function f() { return\n1; }");
        assert!(script.is_clean());
        let Statement::Function(function) = &script.statements[0] else {
            panic!("expected function");
        };
        let crate::ast::FunctionBody::Block(body) = &function.body else {
            panic!("expected block body");
        };
        assert_eq!(body.len(), 2);
        let Statement::Return(ret) = &body[0] else {
            panic!("expected return");
        };
        assert!(ret.value.is_none());
    }

    #[test]
    fn switch_clause_bucketing() {
        let Statement::Switch(stmt) = statement(
            "switch (v) { case 1: a(); case 2: b(); default: c(); case 3: d(); }",
        ) else {
            panic!("expected switch");
        };
        assert_eq!(stmt.cases.clauses.len(), 2);
        assert!(stmt.cases.default_clause.is_some());
        assert_eq!(stmt.cases.more_clauses.len(), 1);
    }

    #[test]
    fn try_catch_finally_forms() {
        let Statement::Try(stmt) = statement("try { f(); } catch (e) { g(e); }") else {
            panic!("expected try");
        };
        assert_eq!(stmt.catch.as_ref().unwrap().parameter.as_deref(), Some("e"));
        assert!(stmt.finally.is_none());

        let Statement::Try(stmt) = statement("try { f(); } catch { } finally { h(); }") else {
            panic!("expected try");
        };
        assert!(stmt.catch.as_ref().unwrap().parameter.is_none());
        assert!(stmt.finally.is_some());
    }

    #[test]
    fn automatic_semicolon_insertion() {
        let parsed = statements("a = 1\nb = 2");
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn missing_semicolon_mid_line_is_an_error() {
        let script = parse_script("a = 1 b = 2");
        assert!(!script.is_clean());
    }

    #[test]
    fn postfix_operator_does_not_cross_newline() {
        let parsed = statements("a\n++b");
        assert_eq!(parsed.len(), 2);
        let Statement::Expression(stmt) = &parsed[1] else {
            panic!("expected expression statement");
        };
        assert!(matches!(stmt.expression, Expression::Unary { .. }));
    }

    #[test]
    fn import_forms() {
        assert!(matches!(statement("import \"m\";"), Statement::Import(_)));

        let Statement::Import(import) = statement("import d from \"m\";") else {
            panic!("expected import");
        };
        assert_eq!(import.default_binding.as_deref(), Some("d"));
        assert_eq!(import.module, "\"m\"");

        let Statement::Import(import) = statement("import * as ns from \"m\";") else {
            panic!("expected import");
        };
        assert_eq!(import.namespace_binding.as_deref(), Some("ns"));

        let Statement::Import(import) = statement("import d, { b, cd as c } from \"m\";") else {
            panic!("expected import");
        };
        assert_eq!(import.default_binding.as_deref(), Some("d"));
        let named = import.named.unwrap();
        assert_eq!(named.len(), 2);
        assert!(named[0].imported.is_none());
        assert_eq!(named[1].imported.as_deref(), Some("cd"));
        assert_eq!(named[1].local, "c");
    }

    #[test]
    fn export_forms() {
        let Statement::Export(export) = statement("export { one as o };") else {
            panic!("expected export");
        };
        let ExportKind::Named { specifiers, module } = &export.kind else {
            panic!("expected named export");
        };
        assert!(module.is_none());
        assert_eq!(specifiers[0].exported.as_deref(), Some("o"));

        let Statement::Export(export) = statement("export * as ns from \"m\";") else {
            panic!("expected export");
        };
        assert!(matches!(export.kind, ExportKind::AllFrom { .. }));

        let Statement::Export(export) = statement("export default 41 + 1;") else {
            panic!("expected export");
        };
        assert!(matches!(export.kind, ExportKind::Default(_)));

        let Statement::Export(export) = statement("export function f() {}") else {
            panic!("expected export");
        };
        assert!(matches!(export.kind, ExportKind::Declaration(_)));
    }

    #[test]
    fn block_and_empty_statements() {
        let parsed = statements("{ a(); } ;");
        assert_eq!(parsed.len(), 2);
        assert!(matches!(parsed[0], Statement::Block(_)));
        assert!(matches!(parsed[1], Statement::Empty(_)));
    }

    #[test]
    fn newline_after_throw_is_an_error() {
        let script = parse_script("throw\nerr;");
        assert!(!script.is_clean());
    }
}
