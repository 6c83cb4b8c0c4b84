// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing for the script sub-language.
//!
//! Binary operators are parsed by precedence climbing over a single table
//! ([`binary_op`]); everything below that level (unary, postfix, member
//! access, calls, primaries) is plain recursive descent. Two pieces of
//! context thread through the grammar:
//!
//! - `no_in`: inside a `for (... in ...)` head the `in` operator is not a
//!   relational operator. Parentheses and brackets reset this.
//! - Arrow function detection: `(a, b) => ...` needs a token scan to the
//!   matching `)` before committing, since the prefix parses equally well
//!   as a parenthesized sequence expression.
//!
//! Recursion is bounded by [`Parser::enter_nesting`] and the stack is grown
//! on demand with [`stacker::maybe_grow`], so deeply nested input degrades
//! into an error node instead of a crash.

use ecow::EcoString;

use crate::ast::{
    Argument, ArrayItem, ArrayLiteral, BinaryOp, ClassExpression, ClassMember, Expression,
    FormalParameter, FunctionBody, FunctionExpression, MethodKind, ObjectLiteral, ObjectProperty,
    ObjectPropertyKind, PropertyName, PropertyNameKind, TemplateLiteral, TemplatePart, UnaryOp,
};
use crate::source_analysis::{Span, TokenKind};

use super::Parser;

/// Returns the binary operator for a token along with its precedence and
/// associativity, or `None` if the token is not a binary operator here.
///
/// Higher numbers bind tighter. `??` sits at the same level as `||`; the
/// mixing restrictions of the ECMAScript grammar are not enforced.
fn binary_op(kind: &TokenKind, no_in: bool) -> Option<(BinaryOp, u8, bool)> {
    let (op, precedence) = match kind {
        TokenKind::PipePipe => (BinaryOp::Or, 1),
        TokenKind::QuestionQuestion => (BinaryOp::Coalesce, 1),
        TokenKind::AmpAmp => (BinaryOp::And, 2),
        TokenKind::Pipe => (BinaryOp::BitOr, 3),
        TokenKind::Caret => (BinaryOp::BitXor, 4),
        TokenKind::Amp => (BinaryOp::BitAnd, 5),
        TokenKind::EqEq => (BinaryOp::Eq, 6),
        TokenKind::NotEq => (BinaryOp::NotEq, 6),
        TokenKind::EqEqEq => (BinaryOp::StrictEq, 6),
        TokenKind::NotEqEq => (BinaryOp::StrictNotEq, 6),
        TokenKind::Lt => (BinaryOp::Lt, 7),
        TokenKind::Gt => (BinaryOp::Gt, 7),
        TokenKind::Le => (BinaryOp::Le, 7),
        TokenKind::Ge => (BinaryOp::Ge, 7),
        TokenKind::InstanceOf => (BinaryOp::InstanceOf, 7),
        TokenKind::In if !no_in => (BinaryOp::In, 7),
        TokenKind::LtLt => (BinaryOp::Shl, 8),
        TokenKind::GtGt => (BinaryOp::Shr, 8),
        TokenKind::GtGtGt => (BinaryOp::ShrUnsigned, 8),
        TokenKind::Plus => (BinaryOp::Add, 9),
        TokenKind::Minus => (BinaryOp::Sub, 9),
        TokenKind::Star => (BinaryOp::Mul, 10),
        TokenKind::Slash => (BinaryOp::Div, 10),
        TokenKind::Percent => (BinaryOp::Mod, 10),
        TokenKind::StarStar => return Some((BinaryOp::Exp, 11, true)),
        _ => return None,
    };
    Some((op, precedence, false))
}

/// Maps an assignment token to its operator.
fn assign_op(kind: &TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Eq => BinaryOp::Assign,
        TokenKind::PlusEq => BinaryOp::AddAssign,
        TokenKind::MinusEq => BinaryOp::SubAssign,
        TokenKind::StarEq => BinaryOp::MulAssign,
        TokenKind::StarStarEq => BinaryOp::ExpAssign,
        TokenKind::SlashEq => BinaryOp::DivAssign,
        TokenKind::PercentEq => BinaryOp::ModAssign,
        TokenKind::LtLtEq => BinaryOp::ShlAssign,
        TokenKind::GtGtEq => BinaryOp::ShrAssign,
        TokenKind::GtGtGtEq => BinaryOp::ShrUnsignedAssign,
        TokenKind::AmpEq => BinaryOp::BitAndAssign,
        TokenKind::PipeEq => BinaryOp::BitOrAssign,
        TokenKind::CaretEq => BinaryOp::BitXorAssign,
        _ => return None,
    };
    Some(op)
}

impl Parser {
    /// Parses a full expression, the comma operator included.
    pub(crate) fn parse_expression(&mut self, no_in: bool) -> Expression {
        let mut expr = self.parse_assignment(no_in);
        while self.match_token(&TokenKind::Comma) {
            let right = self.parse_assignment(no_in);
            let span = Span::new(expr.span().start(), right.span().end());
            expr = Expression::Sequence {
                id: self.fresh_id(),
                span,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        expr
    }

    /// Parses a single assignment-level expression (no comma operator).
    ///
    /// This is the recursion point every nested construct passes through,
    /// so the nesting guard and stack growth live here.
    pub(crate) fn parse_assignment(&mut self, no_in: bool) -> Expression {
        let span = self.current_span();
        if let Err(error) = self.enter_nesting(span) {
            return error;
        }
        let expr =
            stacker::maybe_grow(32 * 1024, 256 * 1024, || self.parse_assignment_inner(no_in));
        self.leave_nesting();
        expr
    }

    fn parse_assignment_inner(&mut self, no_in: bool) -> Expression {
        if self.check(&TokenKind::Yield) {
            return self.parse_yield(no_in);
        }
        if let Some(arrow) = self.try_parse_arrow_function(no_in) {
            return arrow;
        }
        let left = self.parse_conditional(no_in);
        if let Some(op) = assign_op(self.current_kind()) {
            self.advance();
            let right = self.parse_assignment(no_in);
            let span = Span::new(left.span().start(), right.span().end());
            return Expression::Binary {
                id: self.fresh_id(),
                span,
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        left
    }

    fn parse_conditional(&mut self, no_in: bool) -> Expression {
        let condition = self.parse_binary(0, no_in);
        if !self.match_token(&TokenKind::Question) {
            return condition;
        }
        let consequent = self.parse_assignment(false);
        self.expect(&TokenKind::Colon, "expected ':' in conditional expression");
        let alternate = self.parse_assignment(no_in);
        let span = Span::new(condition.span().start(), alternate.span().end());
        Expression::Conditional {
            id: self.fresh_id(),
            span,
            condition: Box::new(condition),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        }
    }

    fn parse_binary(&mut self, min_precedence: u8, no_in: bool) -> Expression {
        let mut left = self.parse_unary();
        while let Some((op, precedence, right_assoc)) = binary_op(self.current_kind(), no_in) {
            if precedence < min_precedence {
                break;
            }
            self.advance();
            let next_min = if right_assoc { precedence } else { precedence + 1 };
            let right = self.parse_binary(next_min, no_in);
            let span = Span::new(left.span().start(), right.span().end());
            left = Expression::Binary {
                id: self.fresh_id(),
                span,
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        left
    }

    fn parse_unary(&mut self) -> Expression {
        let op = match self.current_kind() {
            TokenKind::Delete => Some(UnaryOp::Delete),
            TokenKind::Void => Some(UnaryOp::Void),
            TokenKind::TypeOf => Some(UnaryOp::TypeOf),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::Not => Some(UnaryOp::Not),
            TokenKind::PlusPlus => Some(UnaryOp::PreIncrement),
            TokenKind::MinusMinus => Some(UnaryOp::PreDecrement),
            _ => None,
        };
        let Some(op) = op else {
            return self.parse_postfix();
        };
        let start = self.current_span();
        self.advance();
        let operand = self.parse_unary();
        let span = Span::new(start.start(), operand.span().end());
        Expression::Unary {
            id: self.fresh_id(),
            span,
            op,
            operand: Box::new(operand),
        }
    }

    fn parse_postfix(&mut self) -> Expression {
        let expr = self.parse_left_hand_side();
        // Postfix ++/-- may not be separated from the operand by a newline.
        let op = match self.current_kind() {
            TokenKind::PlusPlus => UnaryOp::PostIncrement,
            TokenKind::MinusMinus => UnaryOp::PostDecrement,
            _ => return expr,
        };
        if self.current_token().newline_before() {
            return expr;
        }
        let end = self.current_span().end();
        self.advance();
        let span = Span::new(expr.span().start(), end);
        Expression::Unary {
            id: self.fresh_id(),
            span,
            op,
            operand: Box::new(expr),
        }
    }

    fn parse_left_hand_side(&mut self) -> Expression {
        let expr = if self.check(&TokenKind::New) {
            self.parse_new_expression()
        } else {
            self.parse_primary()
        };
        self.parse_member_tail(expr, true)
    }

    /// Parses `new Callee` / `new Callee(args)`, where the callee may itself
    /// be a member chain or another `new` expression, but not a call.
    fn parse_new_expression(&mut self) -> Expression {
        let start = self.current_span();
        self.advance();
        let callee = if self.check(&TokenKind::New) {
            self.parse_new_expression()
        } else {
            let primary = self.parse_primary();
            self.parse_member_tail(primary, false)
        };
        let arguments = if self.check(&TokenKind::LeftParen) {
            Some(self.parse_arguments())
        } else {
            None
        };
        let span = self.span_from(start);
        Expression::New {
            id: self.fresh_id(),
            span,
            callee: Box::new(callee),
            arguments,
        }
    }

    fn parse_member_tail(&mut self, mut expr: Expression, allow_calls: bool) -> Expression {
        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let name = self.expect_member_name();
                    let span = self.span_from(expr.span());
                    expr = Expression::Member {
                        id: self.fresh_id(),
                        span,
                        base: Box::new(expr),
                        name,
                    };
                }
                TokenKind::LeftBracket => {
                    self.advance();
                    let index = self.parse_expression(false);
                    self.expect(&TokenKind::RightBracket, "expected ']' after index");
                    let span = self.span_from(expr.span());
                    expr = Expression::Index {
                        id: self.fresh_id(),
                        span,
                        base: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                TokenKind::LeftParen if allow_calls => {
                    let arguments = self.parse_arguments();
                    let span = self.span_from(expr.span());
                    expr = Expression::Call {
                        id: self.fresh_id(),
                        span,
                        callee: Box::new(expr),
                        arguments,
                    };
                }
                _ => return expr,
            }
        }
    }

    /// Consumes a member name after `.`. Reserved words are allowed, as in
    /// `style.default`.
    fn expect_member_name(&mut self) -> EcoString {
        match self.current_kind() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                name
            }
            kind if kind.is_identifier_name() => {
                let token = self.advance();
                token.kind().reserved_word_text().unwrap_or_default().into()
            }
            _ => {
                self.error("expected property name after '.'");
                EcoString::new()
            }
        }
    }

    /// Parses a parenthesized argument list, parens included.
    fn parse_arguments(&mut self) -> Vec<Argument> {
        self.expect(&TokenKind::LeftParen, "expected '(' before arguments");
        let mut arguments = Vec::new();
        while !self.check(&TokenKind::RightParen) && !self.is_at_end() {
            let spread = self.match_token(&TokenKind::Ellipsis);
            let expression = self.parse_assignment(false);
            arguments.push(Argument { spread, expression });
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RightParen, "expected ')' after arguments");
        arguments
    }

    fn parse_primary(&mut self) -> Expression {
        let start = self.current_span();
        let kind = self.current_kind().clone();
        match kind {
            TokenKind::This => {
                self.advance();
                Expression::This { id: self.fresh_id(), span: start }
            }
            TokenKind::Super => {
                self.advance();
                Expression::Super { id: self.fresh_id(), span: start }
            }
            TokenKind::Null => {
                self.advance();
                Expression::Null { id: self.fresh_id(), span: start }
            }
            TokenKind::True => {
                self.advance();
                Expression::True { id: self.fresh_id(), span: start }
            }
            TokenKind::False => {
                self.advance();
                Expression::False { id: self.fresh_id(), span: start }
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Expression::Identifier { id: self.fresh_id(), span: start, name }
            }
            TokenKind::Number(raw) => {
                self.advance();
                Expression::Number { id: self.fresh_id(), span: start, raw }
            }
            TokenKind::String(raw) => {
                self.advance();
                Expression::String { id: self.fresh_id(), span: start, raw }
            }
            TokenKind::Regex(raw) => {
                self.advance();
                Expression::Regex { id: self.fresh_id(), span: start, raw }
            }
            TokenKind::TemplateComplete(chunk) => {
                self.advance();
                Expression::Template(TemplateLiteral {
                    id: self.fresh_id(),
                    span: start,
                    parts: vec![TemplatePart { chunk, expression: None }],
                })
            }
            TokenKind::TemplateHead(head) => {
                self.advance();
                self.parse_template_parts(start, head)
            }
            TokenKind::LeftParen => {
                self.advance();
                let expression = self.parse_expression(false);
                self.expect(&TokenKind::RightParen, "expected ')' after expression");
                let span = self.span_from(start);
                Expression::Paren {
                    id: self.fresh_id(),
                    span,
                    expression: Box::new(expression),
                }
            }
            TokenKind::LeftBracket => self.parse_array_literal(),
            TokenKind::LeftBrace => self.parse_object_literal(),
            TokenKind::Function => {
                Expression::Function(Box::new(self.parse_function_definition()))
            }
            TokenKind::Class => Expression::Class(Box::new(self.parse_class_definition())),
            _ => {
                let message = format!("unexpected token '{}' in expression", self.current_kind());
                let error = self.error_expression(message);
                // Skip the offending token so surrounding loops make progress.
                if !self.is_at_end() {
                    self.advance();
                }
                error
            }
        }
    }

    /// Parses the substitutions of a template that started with `head`.
    /// The lexer guarantees a middle or tail chunk after each substitution,
    /// except when the input ends inside one.
    fn parse_template_parts(&mut self, start: Span, head: EcoString) -> Expression {
        let id = self.fresh_id();
        let mut parts = Vec::new();
        let mut chunk = head;
        loop {
            let expression = self.parse_expression(false);
            match self.current_kind().clone() {
                TokenKind::TemplateMiddle(middle) => {
                    self.advance();
                    parts.push(TemplatePart { chunk, expression: Some(expression) });
                    chunk = middle;
                }
                TokenKind::TemplateTail(tail) => {
                    self.advance();
                    parts.push(TemplatePart { chunk, expression: Some(expression) });
                    parts.push(TemplatePart { chunk: tail, expression: None });
                    break;
                }
                _ => {
                    self.error("expected '}' to continue template literal");
                    parts.push(TemplatePart { chunk, expression: Some(expression) });
                    break;
                }
            }
        }
        let span = self.span_from(start);
        Expression::Template(TemplateLiteral { id, span, parts })
    }

    fn parse_array_literal(&mut self) -> Expression {
        let start = self.current_span();
        self.advance();
        let mut items = Vec::new();
        let mut trailing_comma = false;
        while !self.check(&TokenKind::RightBracket) && !self.is_at_end() {
            if self.match_token(&TokenKind::Comma) {
                items.push(ArrayItem::Elision);
                continue;
            }
            let spread = self.match_token(&TokenKind::Ellipsis);
            let expression = self.parse_assignment(false);
            items.push(ArrayItem::Element { spread, expression });
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
            if self.check(&TokenKind::RightBracket) {
                trailing_comma = true;
            }
        }
        self.expect(&TokenKind::RightBracket, "expected ']' after array literal");
        let span = self.span_from(start);
        Expression::Array(ArrayLiteral {
            id: self.fresh_id(),
            span,
            items,
            trailing_comma,
        })
    }

    fn parse_object_literal(&mut self) -> Expression {
        let start = self.current_span();
        self.advance();
        let mut properties = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            let before = self.position();
            properties.push(self.parse_object_property());
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
            if self.position() == before {
                // A property that consumed nothing; bail out of the loop.
                break;
            }
        }
        self.expect(&TokenKind::RightBrace, "expected '}' after object literal");
        let span = self.span_from(start);
        Expression::Object(ObjectLiteral {
            id: self.fresh_id(),
            span,
            properties,
        })
    }

    /// Parses one object literal property or class member body.
    pub(crate) fn parse_object_property(&mut self) -> ObjectProperty {
        let start = self.current_span();
        let id = self.fresh_id();

        // get/set are contextual: `get` followed by ':', '(', ',', '}' or
        // '=' is an ordinary property named "get".
        let accessor = if self.check_contextual("get") {
            Some(MethodKind::Getter)
        } else if self.check_contextual("set") {
            Some(MethodKind::Setter)
        } else {
            None
        };
        if let Some(kind) = accessor {
            if !matches!(
                self.peek_kind(1),
                TokenKind::Colon
                    | TokenKind::LeftParen
                    | TokenKind::Comma
                    | TokenKind::RightBrace
                    | TokenKind::Eq
            ) {
                self.advance();
                let name = self.parse_property_name();
                let function = self.parse_method_function(false);
                let span = self.span_from(start);
                return ObjectProperty {
                    id,
                    span,
                    name,
                    kind: ObjectPropertyKind::Method { kind, function: Box::new(function) },
                };
            }
        }

        if self.match_token(&TokenKind::Star) {
            let name = self.parse_property_name();
            let function = self.parse_method_function(true);
            let span = self.span_from(start);
            return ObjectProperty {
                id,
                span,
                name,
                kind: ObjectPropertyKind::Method {
                    kind: MethodKind::Ordinary,
                    function: Box::new(function),
                },
            };
        }

        let name = self.parse_property_name();
        let kind = match self.current_kind() {
            TokenKind::Colon => {
                self.advance();
                ObjectPropertyKind::KeyValue { value: self.parse_assignment(false) }
            }
            TokenKind::LeftParen => {
                let function = self.parse_method_function(false);
                ObjectPropertyKind::Method {
                    kind: MethodKind::Ordinary,
                    function: Box::new(function),
                }
            }
            TokenKind::Eq => {
                // Shorthand with a default value, valid in patterns.
                self.advance();
                ObjectPropertyKind::Shorthand {
                    initializer: Some(self.parse_assignment(false)),
                }
            }
            _ => ObjectPropertyKind::Shorthand { initializer: None },
        };
        let span = self.span_from(start);
        ObjectProperty { id, span, name, kind }
    }

    fn parse_property_name(&mut self) -> PropertyName {
        let start = self.current_span();
        let id = self.fresh_id();
        if let Some(text) = self.current_kind().reserved_word_text() {
            // Reserved words are valid property names: { default: 1 }
            let text: EcoString = text.into();
            self.advance();
            return PropertyName {
                id,
                span: start,
                kind: PropertyNameKind::Identifier(text),
            };
        }
        let kind = match self.current_kind().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                PropertyNameKind::Identifier(name)
            }
            TokenKind::String(raw) => {
                self.advance();
                PropertyNameKind::String(raw)
            }
            TokenKind::Number(raw) => {
                self.advance();
                PropertyNameKind::Numeric(raw)
            }
            TokenKind::LeftBracket => {
                self.advance();
                let expression = self.parse_assignment(false);
                self.expect(&TokenKind::RightBracket, "expected ']' after computed name");
                PropertyNameKind::Computed(Box::new(expression))
            }
            _ => {
                self.error("expected property name");
                PropertyNameKind::Identifier(EcoString::new())
            }
        };
        PropertyName { id, span: self.span_from(start), kind }
    }

    /// Parses `(params) { body }` for an object or class method. The name
    /// has already been consumed and lives on the surrounding property.
    fn parse_method_function(&mut self, is_generator: bool) -> FunctionExpression {
        let start = self.current_span();
        let id = self.fresh_id();
        self.expect(&TokenKind::LeftParen, "expected '(' before method parameters");
        let parameters = self.parse_formal_parameters();
        self.expect(&TokenKind::RightParen, "expected ')' after method parameters");
        self.expect(&TokenKind::LeftBrace, "expected '{' before method body");
        let statements = self.parse_statement_list(&TokenKind::RightBrace);
        self.expect(&TokenKind::RightBrace, "expected '}' after method body");
        FunctionExpression {
            id,
            span: self.span_from(start),
            name: None,
            is_arrow: false,
            is_generator,
            parameters,
            body: FunctionBody::Block(statements),
        }
    }

    /// Parses a `function` definition with the `function` keyword current.
    /// Shared by expression and declaration positions; the name is optional
    /// in both (declarations without one get an error elsewhere in Quill
    /// documents, where methods always carry names).
    pub(crate) fn parse_function_definition(&mut self) -> FunctionExpression {
        let start = self.current_span();
        let id = self.fresh_id();
        self.advance();
        let is_generator = self.match_token(&TokenKind::Star);
        let name = match self.current_kind() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ => None,
        };
        self.expect(&TokenKind::LeftParen, "expected '(' after function name");
        let parameters = self.parse_formal_parameters();
        self.expect(&TokenKind::RightParen, "expected ')' after function parameters");
        self.expect(&TokenKind::LeftBrace, "expected '{' before function body");
        let statements = self.parse_statement_list(&TokenKind::RightBrace);
        self.expect(&TokenKind::RightBrace, "expected '}' after function body");
        FunctionExpression {
            id,
            span: self.span_from(start),
            name,
            is_arrow: false,
            is_generator,
            parameters,
            body: FunctionBody::Block(statements),
        }
    }

    /// Parses a `class` definition with the `class` keyword current.
    pub(crate) fn parse_class_definition(&mut self) -> ClassExpression {
        let start = self.current_span();
        let id = self.fresh_id();
        self.advance();
        let name = match self.current_kind() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ => None,
        };
        let heritage = if self.match_token(&TokenKind::Extends) {
            Some(Box::new(self.parse_left_hand_side()))
        } else {
            None
        };
        self.expect(&TokenKind::LeftBrace, "expected '{' before class body");
        let mut members = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            if self.match_token(&TokenKind::Semicolon) {
                continue;
            }
            let before = self.position();
            let member_start = self.current_span();
            let member_id = self.fresh_id();
            let is_static = self.check_contextual("static")
                && !matches!(self.peek_kind(1), TokenKind::LeftParen | TokenKind::Eq);
            if is_static {
                self.advance();
            }
            let property = self.parse_object_property();
            members.push(ClassMember {
                id: member_id,
                span: self.span_from(member_start),
                is_static,
                property,
            });
            if self.position() == before {
                self.advance();
            }
        }
        self.expect(&TokenKind::RightBrace, "expected '}' after class body");
        ClassExpression {
            id,
            span: self.span_from(start),
            name,
            heritage,
            members,
        }
    }

    /// Parses a formal parameter list, stopping before the closing paren.
    pub(crate) fn parse_formal_parameters(&mut self) -> Vec<FormalParameter> {
        let mut parameters = Vec::new();
        while !self.check(&TokenKind::RightParen) && !self.is_at_end() {
            let start = self.current_span();
            let id = self.fresh_id();
            let is_rest = self.match_token(&TokenKind::Ellipsis);
            let target = self.parse_binding_target();
            let initializer = if self.match_token(&TokenKind::Eq) {
                Some(self.parse_assignment(false))
            } else {
                None
            };
            parameters.push(FormalParameter {
                id,
                span: self.span_from(start),
                target,
                initializer,
                is_rest,
            });
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        parameters
    }

    /// Parses a binding target: an identifier or a destructuring pattern.
    pub(crate) fn parse_binding_target(&mut self) -> Expression {
        let start = self.current_span();
        match self.current_kind().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Expression::Identifier { id: self.fresh_id(), span: start, name }
            }
            TokenKind::LeftBracket => self.parse_array_literal(),
            TokenKind::LeftBrace => self.parse_object_literal(),
            _ => self.error_expression("expected binding name or destructuring pattern"),
        }
    }

    fn parse_yield(&mut self, no_in: bool) -> Expression {
        let start = self.current_span();
        self.advance();
        let delegate = self.match_token(&TokenKind::Star);
        // yield's operand may not start on the next line.
        let has_argument = delegate
            || (!self.current_token().newline_before() && self.can_start_expression());
        let argument = if has_argument {
            Some(Box::new(self.parse_assignment(no_in)))
        } else {
            None
        };
        let span = self.span_from(start);
        Expression::Yield {
            id: self.fresh_id(),
            span,
            delegate,
            argument,
        }
    }

    fn can_start_expression(&self) -> bool {
        !matches!(
            self.current_kind(),
            TokenKind::Semicolon
                | TokenKind::RightBrace
                | TokenKind::RightParen
                | TokenKind::RightBracket
                | TokenKind::Comma
                | TokenKind::Colon
                | TokenKind::Eof
        )
    }

    /// Recognizes and parses an arrow function, or returns `None` leaving
    /// the position untouched.
    fn try_parse_arrow_function(&mut self, no_in: bool) -> Option<Expression> {
        match self.current_kind() {
            TokenKind::Identifier(_) if matches!(self.peek_kind(1), TokenKind::Arrow) => {
                let start = self.current_span();
                let target = self.parse_binding_target();
                let parameter = FormalParameter {
                    id: self.fresh_id(),
                    span: start,
                    target,
                    initializer: None,
                    is_rest: false,
                };
                self.advance();
                Some(self.finish_arrow_function(start, vec![parameter], no_in))
            }
            TokenKind::LeftParen if self.arrow_ahead() => {
                let start = self.current_span();
                self.advance();
                let parameters = self.parse_formal_parameters();
                self.expect(&TokenKind::RightParen, "expected ')' after arrow parameters");
                self.expect(&TokenKind::Arrow, "expected '=>'");
                Some(self.finish_arrow_function(start, parameters, no_in))
            }
            _ => None,
        }
    }

    /// Scans forward from a `(` to decide whether `=>` follows the matching
    /// close paren.
    fn arrow_ahead(&self) -> bool {
        let mut depth = 0usize;
        let mut offset = 0usize;
        loop {
            match self.peek_kind(offset) {
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return matches!(self.peek_kind(offset + 1), TokenKind::Arrow);
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            offset += 1;
        }
    }

    fn finish_arrow_function(
        &mut self,
        start: Span,
        parameters: Vec<FormalParameter>,
        no_in: bool,
    ) -> Expression {
        let id = self.fresh_id();
        let body = if self.check(&TokenKind::LeftBrace) {
            self.advance();
            let statements = self.parse_statement_list(&TokenKind::RightBrace);
            self.expect(&TokenKind::RightBrace, "expected '}' after arrow body");
            FunctionBody::Block(statements)
        } else {
            FunctionBody::Expression(Box::new(self.parse_assignment(no_in)))
        };
        let span = self.span_from(start);
        Expression::Function(Box::new(FunctionExpression {
            id,
            span,
            name: None,
            is_arrow: true,
            is_generator: false,
            parameters,
            body,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse_script;
    use crate::ast::{
        ArrayItem, BinaryOp, Expression, FunctionBody, MethodKind, ObjectPropertyKind, Statement,
        UnaryOp,
    };

    fn expr(source: &str) -> Expression {
        let script = parse_script(source);
        assert!(
            script.is_clean(),
            "expected clean parse of {source:?}: {:?}",
            script.diagnostics
        );
        assert_eq!(script.statements.len(), 1, "source {source:?}");
        match script.statements.into_iter().next().unwrap() {
            Statement::Expression(stmt) => stmt.expression,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let Expression::Binary { op, right, .. } = expr("1 + 2 * 3") else {
            panic!("expected binary expression");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(
            *right,
            Expression::Binary { op: BinaryOp::Mul, .. }
        ));
    }

    #[test]
    fn exponentiation_is_right_associative() {
        let Expression::Binary { op, left, right, .. } = expr("2 ** 3 ** 4") else {
            panic!("expected binary expression");
        };
        assert_eq!(op, BinaryOp::Exp);
        assert!(matches!(*left, Expression::Number { .. }));
        assert!(matches!(
            *right,
            Expression::Binary { op: BinaryOp::Exp, .. }
        ));
    }

    #[test]
    fn assignment_is_right_associative() {
        let Expression::Binary { op, right, .. } = expr("a = b = 1") else {
            panic!("expected assignment");
        };
        assert_eq!(op, BinaryOp::Assign);
        assert!(matches!(
            *right,
            Expression::Binary { op: BinaryOp::Assign, .. }
        ));
    }

    #[test]
    fn sequence_and_conditional() {
        assert!(matches!(expr("a, b"), Expression::Sequence { .. }));
        assert!(matches!(expr("a ? b : c"), Expression::Conditional { .. }));
    }

    #[test]
    fn member_index_call_chain() {
        let Expression::Call { callee, arguments, .. } = expr("a.b[c](d)") else {
            panic!("expected call");
        };
        assert_eq!(arguments.len(), 1);
        let Expression::Index { base, .. } = *callee else {
            panic!("expected index below call");
        };
        assert!(matches!(*base, Expression::Member { .. }));
    }

    #[test]
    fn reserved_word_member_name() {
        let Expression::Member { name, .. } = expr("style.default") else {
            panic!("expected member access");
        };
        assert_eq!(name, "default");
    }

    #[test]
    fn new_with_and_without_arguments() {
        let Expression::New { arguments, .. } = expr("new Date") else {
            panic!("expected new");
        };
        assert!(arguments.is_none());

        let Expression::New { arguments, .. } = expr("new Date(1, 2)") else {
            panic!("expected new");
        };
        assert_eq!(arguments.unwrap().len(), 2);
    }

    #[test]
    fn new_callee_stops_before_call_parens() {
        // `new a.b()` means `new (a.b)()`, not `new (a.b())`.
        let Expression::New { callee, arguments, .. } = expr("new a.b()") else {
            panic!("expected new");
        };
        assert!(matches!(*callee, Expression::Member { .. }));
        assert!(arguments.is_some());
    }

    #[test]
    fn postfix_and_prefix_operators() {
        let Expression::Unary { op, .. } = expr("a++") else {
            panic!("expected unary");
        };
        assert_eq!(op, UnaryOp::PostIncrement);

        let Expression::Unary { op, operand, .. } = expr("typeof !a") else {
            panic!("expected unary");
        };
        assert_eq!(op, UnaryOp::TypeOf);
        assert!(matches!(
            *operand,
            Expression::Unary { op: UnaryOp::Not, .. }
        ));
    }

    #[test]
    fn arrow_function_single_parameter() {
        let Expression::Function(function) = expr("x => x * 2") else {
            panic!("expected arrow function");
        };
        assert!(function.is_arrow);
        assert_eq!(function.parameters.len(), 1);
        assert!(matches!(function.body, FunctionBody::Expression(_)));
    }

    #[test]
    fn arrow_function_parameter_list_and_block_body() {
        let Expression::Function(function) = expr("(a, b = 1) => { return a; }") else {
            panic!("expected arrow function");
        };
        assert!(function.is_arrow);
        assert_eq!(function.parameters.len(), 2);
        assert!(function.parameters[1].initializer.is_some());
        assert!(matches!(function.body, FunctionBody::Block(_)));
    }

    #[test]
    fn parenthesized_sequence_is_not_an_arrow() {
        let Expression::Paren { expression, .. } = expr("(a, b)") else {
            panic!("expected parenthesized expression");
        };
        assert!(matches!(*expression, Expression::Sequence { .. }));
    }

    #[test]
    fn function_expression_with_generator_star() {
        let Expression::Function(function) = expr("function* gen(a) { yield a; }") else {
            panic!("expected function");
        };
        assert!(function.is_generator);
        assert!(!function.is_arrow);
        assert_eq!(function.name.as_deref(), Some("gen"));
    }

    #[test]
    fn yield_forms() {
        let script = parse_script("function* g() { yield; yield 1; yield* inner(); }");
        assert!(script.is_clean(), "{:?}", script.diagnostics);
    }

    #[test]
    fn template_literal_parts() {
        let Expression::Template(template) = expr("`a${x}b${y}c`") else {
            panic!("expected template");
        };
        assert_eq!(template.parts.len(), 3);
        assert_eq!(template.parts[0].chunk, "`a${");
        assert!(template.parts[0].expression.is_some());
        assert_eq!(template.parts[2].chunk, "}c`");
        assert!(template.parts[2].expression.is_none());
    }

    #[test]
    fn array_literal_with_elision_and_trailing_comma() {
        let Expression::Array(array) = expr("[1, , 2, ]") else {
            panic!("expected array");
        };
        assert_eq!(array.items.len(), 3);
        assert!(matches!(array.items[1], ArrayItem::Elision));
        assert!(array.trailing_comma);

        let Expression::Array(array) = expr("[...rest]") else {
            panic!("expected array");
        };
        assert!(matches!(array.items[0], ArrayItem::Element { spread: true, .. }));
    }

    /// Strips the parens a statement-position object or class literal needs.
    fn paren_inner(source: &str) -> Expression {
        let Expression::Paren { expression, .. } = expr(source) else {
            panic!("expected parenthesized expression for {source:?}");
        };
        *expression
    }

    #[test]
    fn object_literal_property_forms() {
        let Expression::Object(object) = paren_inner("({ a, b: 1, \"c\": 2, 3: x, [k]: y, f() {} })")
        else {
            panic!("expected object");
        };
        assert_eq!(object.properties.len(), 6);
        assert!(matches!(
            object.properties[0].kind,
            ObjectPropertyKind::Shorthand { initializer: None }
        ));
        assert!(matches!(
            object.properties[5].kind,
            ObjectPropertyKind::Method { kind: MethodKind::Ordinary, .. }
        ));
    }

    #[test]
    fn object_literal_accessors() {
        let Expression::Object(object) = paren_inner("({ get a() { return 1; }, set a(v) {} })")
        else {
            panic!("expected object");
        };
        assert!(matches!(
            object.properties[0].kind,
            ObjectPropertyKind::Method { kind: MethodKind::Getter, .. }
        ));
        assert!(matches!(
            object.properties[1].kind,
            ObjectPropertyKind::Method { kind: MethodKind::Setter, .. }
        ));
    }

    #[test]
    fn get_as_plain_property_name() {
        let Expression::Object(object) = paren_inner("({ get: 1 })") else {
            panic!("expected object");
        };
        assert!(matches!(
            object.properties[0].kind,
            ObjectPropertyKind::KeyValue { .. }
        ));
    }

    #[test]
    fn class_with_static_and_accessor_members() {
        let Expression::Class(class) = paren_inner("(class Sub extends Base { m() {} static s() {} })")
        else {
            panic!("expected class");
        };
        assert_eq!(class.name.as_deref(), Some("Sub"));
        assert!(class.heritage.is_some());
        assert_eq!(class.members.len(), 2);
        assert!(!class.members[0].is_static);
        assert!(class.members[1].is_static);
    }

    #[test]
    fn in_operator_inside_parens() {
        let script = parse_script("for (a in b) {}");
        assert!(script.is_clean());
        assert!(matches!(expr("(a in b)"), Expression::Paren { .. }));
    }
}
