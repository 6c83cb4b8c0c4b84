// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for the Quill script sub-language.
//!
//! The AST covers the JavaScript-like code embedded in bindings, function
//! bodies and parameter initializers. The outer declarative document (objects,
//! property declarations, imports) is not represented here: the document
//! parser builds DOM elements for it directly, and scripts hang off those
//! elements as parsed fragments.
//!
//! # Design Philosophy
//!
//! - **All nodes have spans** - Required for comment attachment, diagnostics
//!   and mapping reformatted output back to source
//! - **All nodes have identities** - A [`NodeId`] is minted per node at parse
//!   time, so side tables (notably comment attachment) can key on nodes
//!   without interior mutability or pointer identity
//! - **Raw literal text** - String, numeric, regex and template tokens keep
//!   their raw source spelling, because the reformatter re-emits literals
//!   byte-for-byte
//! - **Error recovery** - The parser can produce partial trees containing
//!   [`Expression::Error`] nodes
//!
//! Lists (statement lists, argument lists, parameter lists) are plain
//! [`Vec`]s, not nodes: comments never attach to a list, only to its
//! elements or to the enclosing construct.

use ecow::EcoString;

use crate::source_analysis::Span;

/// Identity of an AST node within one parsed script.
///
/// Ids are dense and minted in parse order. They are only meaningful within
/// the script that produced them; two scripts each have a node `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates a node id from its raw index.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A statement of the script sub-language.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A braced statement list: `{ ... }`
    Block(Block),
    /// A declaration statement: `let a = 1, b`
    Variable(VariableDeclaration),
    /// A lone semicolon.
    Empty(EmptyStatement),
    /// An expression in statement position.
    Expression(ExpressionStatement),
    If(IfStatement),
    DoWhile(DoWhileStatement),
    While(WhileStatement),
    For(ForStatement),
    /// `for (x in o)` / `for (x of xs)`
    ForEach(ForEachStatement),
    Continue(ContinueStatement),
    Break(BreakStatement),
    Return(ReturnStatement),
    With(WithStatement),
    Switch(SwitchStatement),
    Labelled(LabelledStatement),
    Throw(ThrowStatement),
    Try(TryStatement),
    /// A function declaration in statement position.
    Function(Box<FunctionExpression>),
    /// A class declaration in statement position.
    Class(Box<ClassExpression>),
    Import(ImportDeclaration),
    Export(ExportDeclaration),
}

impl Statement {
    /// Returns the identity of this statement node.
    #[must_use]
    pub fn id(&self) -> NodeId {
        match self {
            Self::Block(s) => s.id,
            Self::Variable(s) => s.id,
            Self::Empty(s) => s.id,
            Self::Expression(s) => s.id,
            Self::If(s) => s.id,
            Self::DoWhile(s) => s.id,
            Self::While(s) => s.id,
            Self::For(s) => s.id,
            Self::ForEach(s) => s.id,
            Self::Continue(s) => s.id,
            Self::Break(s) => s.id,
            Self::Return(s) => s.id,
            Self::With(s) => s.id,
            Self::Switch(s) => s.id,
            Self::Labelled(s) => s.id,
            Self::Throw(s) => s.id,
            Self::Try(s) => s.id,
            Self::Function(s) => s.id,
            Self::Class(s) => s.id,
            Self::Import(s) => s.id,
            Self::Export(s) => s.id,
        }
    }

    /// Returns the source span of this statement.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Block(s) => s.span,
            Self::Variable(s) => s.span,
            Self::Empty(s) => s.span,
            Self::Expression(s) => s.span,
            Self::If(s) => s.span,
            Self::DoWhile(s) => s.span,
            Self::While(s) => s.span,
            Self::For(s) => s.span,
            Self::ForEach(s) => s.span,
            Self::Continue(s) => s.span,
            Self::Break(s) => s.span,
            Self::Return(s) => s.span,
            Self::With(s) => s.span,
            Self::Switch(s) => s.span,
            Self::Labelled(s) => s.span,
            Self::Throw(s) => s.span,
            Self::Try(s) => s.span,
            Self::Function(s) => s.span,
            Self::Class(s) => s.span,
            Self::Import(s) => s.span,
            Self::Export(s) => s.span,
        }
    }
}

/// A braced statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: NodeId,
    pub span: Span,
    pub statements: Vec<Statement>,
}

/// The keyword introducing a variable declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    /// Returns the source keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
        }
    }
}

/// A variable declaration statement: `let a = 1, b`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub id: NodeId,
    pub span: Span,
    pub kind: VariableKind,
    pub declarators: Vec<VariableDeclarator>,
}

/// One declarator in a variable declaration.
///
/// The target is an identifier or, for destructuring, an object or array
/// literal shape reused as a pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    pub id: NodeId,
    pub span: Span,
    pub target: Expression,
    pub initializer: Option<Expression>,
}

/// A lone semicolon.
#[derive(Debug, Clone, PartialEq)]
pub struct EmptyStatement {
    pub id: NodeId,
    pub span: Span,
}

/// An expression in statement position.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub id: NodeId,
    pub span: Span,
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub id: NodeId,
    pub span: Span,
    pub condition: Expression,
    pub consequent: Box<Statement>,
    pub alternate: Option<Box<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStatement {
    pub id: NodeId,
    pub span: Span,
    pub body: Box<Statement>,
    pub condition: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub id: NodeId,
    pub span: Span,
    pub condition: Expression,
    pub body: Box<Statement>,
}

/// The init clause of a classic `for` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Variable(VariableDeclaration),
    Expression(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub id: NodeId,
    pub span: Span,
    pub init: Option<ForInit>,
    pub condition: Option<Expression>,
    pub update: Option<Expression>,
    pub body: Box<Statement>,
}

/// Whether a for-each loop iterates keys (`in`) or values (`of`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForEachOperator {
    In,
    Of,
}

impl ForEachOperator {
    /// Returns the source keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Of => "of",
        }
    }
}

/// A `for (target in/of iterable)` statement.
///
/// `declaration_kind` is present for `for (let x of xs)` forms and absent
/// when the target is a plain reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ForEachStatement {
    pub id: NodeId,
    pub span: Span,
    pub declaration_kind: Option<VariableKind>,
    pub target: Expression,
    pub operator: ForEachOperator,
    pub iterable: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContinueStatement {
    pub id: NodeId,
    pub span: Span,
    pub label: Option<EcoString>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakStatement {
    pub id: NodeId,
    pub span: Span,
    pub label: Option<EcoString>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub id: NodeId,
    pub span: Span,
    pub value: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WithStatement {
    pub id: NodeId,
    pub span: Span,
    pub object: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStatement {
    pub id: NodeId,
    pub span: Span,
    pub discriminant: Expression,
    pub cases: CaseBlock,
}

/// The braced clause list of a `switch`.
///
/// Clauses after the `default` clause are kept separately so the original
/// clause order survives a round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseBlock {
    pub id: NodeId,
    pub span: Span,
    pub clauses: Vec<CaseClause>,
    pub default_clause: Option<DefaultClause>,
    pub more_clauses: Vec<CaseClause>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    pub id: NodeId,
    pub span: Span,
    pub test: Expression,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DefaultClause {
    pub id: NodeId,
    pub span: Span,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelledStatement {
    pub id: NodeId,
    pub span: Span,
    pub label: EcoString,
    pub statement: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStatement {
    pub id: NodeId,
    pub span: Span,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    pub id: NodeId,
    pub span: Span,
    pub block: Block,
    pub catch: Option<CatchClause>,
    pub finally: Option<FinallyClause>,
}

/// A `catch` clause. The parameter is optional (`try {} catch {}`).
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub id: NodeId,
    pub span: Span,
    pub parameter: Option<EcoString>,
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinallyClause {
    pub id: NodeId,
    pub span: Span,
    pub block: Block,
}

/// An ECMAScript module import.
///
/// Covers `import d from "m"`, `import * as ns from "m"`,
/// `import { a, b as c } from "m"`, combinations of a default binding with
/// either of the latter two, and the bare `import "m"`.
///
/// `module` keeps the raw string token, quotes included.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDeclaration {
    pub id: NodeId,
    pub span: Span,
    pub default_binding: Option<EcoString>,
    pub namespace_binding: Option<EcoString>,
    pub named: Option<Vec<ImportSpecifier>>,
    pub module: EcoString,
}

/// One entry of a named import list: `b` or `cd as c`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpecifier {
    pub id: NodeId,
    pub span: Span,
    /// The exported name, when it differs from the local binding.
    pub imported: Option<EcoString>,
    pub local: EcoString,
}

/// An ECMAScript module export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDeclaration {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExportKind,
}

/// The forms an export declaration can take.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportKind {
    /// `export { a, b as c };` optionally with `from "m"`.
    Named {
        specifiers: Vec<ExportSpecifier>,
        /// Raw module string token, quotes included.
        module: Option<EcoString>,
    },
    /// `export * from "m"` / `export * as ns from "m"`.
    AllFrom {
        alias: Option<EcoString>,
        module: EcoString,
    },
    /// `export default <expression or declaration>`.
    Default(Box<Statement>),
    /// `export <variable/function/class declaration>`.
    Declaration(Box<Statement>),
}

/// One entry of a named export list: `a` or `one as o`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpecifier {
    pub id: NodeId,
    pub span: Span,
    pub local: EcoString,
    pub exported: Option<EcoString>,
}

/// An expression of the script sub-language.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    This { id: NodeId, span: Span },
    Super { id: NodeId, span: Span },
    Null { id: NodeId, span: Span },
    True { id: NodeId, span: Span },
    False { id: NodeId, span: Span },

    Identifier { id: NodeId, span: Span, name: EcoString },

    /// A string literal, raw text with quotes: `"hi"`
    String { id: NodeId, span: Span, raw: EcoString },
    /// A numeric literal, raw text: `0xFF`
    Number { id: NodeId, span: Span, raw: EcoString },
    /// A regular expression literal, raw text: `/a.b/g`
    Regex { id: NodeId, span: Span, raw: EcoString },

    Template(TemplateLiteral),
    Array(ArrayLiteral),
    Object(ObjectLiteral),

    /// A parenthesized expression: `(a + b)`
    Paren { id: NodeId, span: Span, expression: Box<Expression> },
    /// A bracketed member access: `a[b]`
    Index { id: NodeId, span: Span, base: Box<Expression>, index: Box<Expression> },
    /// A dotted member access: `a.b`
    Member { id: NodeId, span: Span, base: Box<Expression>, name: EcoString },
    /// `new F` (no argument list) or `new F(a, b)`
    New {
        id: NodeId,
        span: Span,
        callee: Box<Expression>,
        arguments: Option<Vec<Argument>>,
    },
    Call {
        id: NodeId,
        span: Span,
        callee: Box<Expression>,
        arguments: Vec<Argument>,
    },

    Unary { id: NodeId, span: Span, op: UnaryOp, operand: Box<Expression> },
    /// A binary or assignment expression; assignment operators are part of
    /// [`BinaryOp`].
    Binary {
        id: NodeId,
        span: Span,
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Conditional {
        id: NodeId,
        span: Span,
        condition: Box<Expression>,
        consequent: Box<Expression>,
        alternate: Box<Expression>,
    },

    Function(Box<FunctionExpression>),
    Class(Box<ClassExpression>),

    /// A comma expression: `a, b`
    Sequence { id: NodeId, span: Span, left: Box<Expression>, right: Box<Expression> },
    /// `yield`, `yield x` or `yield* xs`
    Yield {
        id: NodeId,
        span: Span,
        delegate: bool,
        argument: Option<Box<Expression>>,
    },

    /// An error node for unparseable code.
    Error { id: NodeId, span: Span, message: EcoString },
}

impl Expression {
    /// Returns the identity of this expression node.
    #[must_use]
    pub fn id(&self) -> NodeId {
        match self {
            Self::This { id, .. }
            | Self::Super { id, .. }
            | Self::Null { id, .. }
            | Self::True { id, .. }
            | Self::False { id, .. }
            | Self::Identifier { id, .. }
            | Self::String { id, .. }
            | Self::Number { id, .. }
            | Self::Regex { id, .. }
            | Self::Paren { id, .. }
            | Self::Index { id, .. }
            | Self::Member { id, .. }
            | Self::New { id, .. }
            | Self::Call { id, .. }
            | Self::Unary { id, .. }
            | Self::Binary { id, .. }
            | Self::Conditional { id, .. }
            | Self::Sequence { id, .. }
            | Self::Yield { id, .. }
            | Self::Error { id, .. } => *id,
            Self::Template(t) => t.id,
            Self::Array(a) => a.id,
            Self::Object(o) => o.id,
            Self::Function(f) => f.id,
            Self::Class(c) => c.id,
        }
    }

    /// Returns the source span of this expression.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::This { span, .. }
            | Self::Super { span, .. }
            | Self::Null { span, .. }
            | Self::True { span, .. }
            | Self::False { span, .. }
            | Self::Identifier { span, .. }
            | Self::String { span, .. }
            | Self::Number { span, .. }
            | Self::Regex { span, .. }
            | Self::Paren { span, .. }
            | Self::Index { span, .. }
            | Self::Member { span, .. }
            | Self::New { span, .. }
            | Self::Call { span, .. }
            | Self::Unary { span, .. }
            | Self::Binary { span, .. }
            | Self::Conditional { span, .. }
            | Self::Sequence { span, .. }
            | Self::Yield { span, .. }
            | Self::Error { span, .. } => *span,
            Self::Template(t) => t.span,
            Self::Array(a) => a.span,
            Self::Object(o) => o.span,
            Self::Function(f) => f.span,
            Self::Class(c) => c.span,
        }
    }

    /// Returns true if this expression is an error node.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// A template literal, kept as raw chunks interleaved with substitution
/// expressions.
///
/// `` `a${x}b` `` has two parts: chunk `` `a${ `` with expression `x`, and
/// chunk `` }b` `` with no expression. Chunks keep their raw text, marker
/// characters included, so the literal round-trips byte-for-byte.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLiteral {
    pub id: NodeId,
    pub span: Span,
    pub parts: Vec<TemplatePart>,
}

/// One raw chunk of a template literal plus the substitution following it.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplatePart {
    pub chunk: EcoString,
    pub expression: Option<Expression>,
}

/// An array literal, also reused as a destructuring pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub id: NodeId,
    pub span: Span,
    pub items: Vec<ArrayItem>,
    /// Whether the source had a comma after the last element.
    pub trailing_comma: bool,
}

/// One slot of an array literal.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayItem {
    /// A hole: `[1, , 3]`
    Elision,
    Element { spread: bool, expression: Expression },
}

/// An object literal, also reused as a destructuring pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLiteral {
    pub id: NodeId,
    pub span: Span,
    pub properties: Vec<ObjectProperty>,
}

/// One property of an object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectProperty {
    pub id: NodeId,
    pub span: Span,
    pub name: PropertyName,
    pub kind: ObjectPropertyKind,
}

/// A property name, which is itself a node so comments can attach to it.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyName {
    pub id: NodeId,
    pub span: Span,
    pub kind: PropertyNameKind,
}

/// The syntactic form of a property name.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyNameKind {
    Identifier(EcoString),
    /// Raw string token, quotes included.
    String(EcoString),
    /// Raw numeric token.
    Numeric(EcoString),
    /// `[expr]: ...`
    Computed(Box<Expression>),
}

/// The value form of an object property.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectPropertyKind {
    /// `{a}` or, in pattern position, `{a = 1}`.
    Shorthand { initializer: Option<Expression> },
    /// `{a: b}`
    KeyValue { value: Expression },
    /// `{f() {}}`, `{get a() {}}`, `{set a(v) {}}`
    Method {
        kind: MethodKind,
        function: Box<FunctionExpression>,
    },
}

/// Accessor classification of an object or class method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Ordinary,
    Getter,
    Setter,
}

/// A function in any of its syntactic forms: declaration, anonymous
/// expression, generator or arrow.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpression {
    pub id: NodeId,
    pub span: Span,
    pub name: Option<EcoString>,
    pub is_arrow: bool,
    pub is_generator: bool,
    pub parameters: Vec<FormalParameter>,
    pub body: FunctionBody,
}

/// The body of a function.
///
/// Arrow functions with a bare expression body are kept as
/// [`FunctionBody::Expression`]; no synthetic `return` statement is
/// invented, which keeps the reformatter from adding a semicolon after
/// `x => x * 2`.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    Block(Vec<Statement>),
    Expression(Box<Expression>),
}

/// One formal parameter.
///
/// The target is an identifier or a destructuring pattern (object or array
/// literal shape).
#[derive(Debug, Clone, PartialEq)]
pub struct FormalParameter {
    pub id: NodeId,
    pub span: Span,
    pub target: Expression,
    pub initializer: Option<Expression>,
    pub is_rest: bool,
}

/// A class in declaration or expression position.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassExpression {
    pub id: NodeId,
    pub span: Span,
    pub name: Option<EcoString>,
    pub heritage: Option<Box<Expression>>,
    pub members: Vec<ClassMember>,
}

/// One member of a class body.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMember {
    pub id: NodeId,
    pub span: Span,
    pub is_static: bool,
    pub property: ObjectProperty,
}

/// One argument of a call or `new` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub spread: bool,
    pub expression: Expression,
}

/// A unary operator, prefix or postfix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Delete,
    Void,
    TypeOf,
    Plus,
    Minus,
    BitNot,
    Not,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

impl UnaryOp {
    /// Returns the operator's source text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Void => "void",
            Self::TypeOf => "typeof",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::BitNot => "~",
            Self::Not => "!",
            Self::PreIncrement | Self::PostIncrement => "++",
            Self::PreDecrement | Self::PostDecrement => "--",
        }
    }

    /// Returns true for the postfix `++`/`--` forms.
    #[must_use]
    pub const fn is_postfix(self) -> bool {
        matches!(self, Self::PostIncrement | Self::PostDecrement)
    }

    /// Returns true for the word-like operators that need a trailing space.
    #[must_use]
    pub const fn is_keyword(self) -> bool {
        matches!(self, Self::Delete | Self::Void | Self::TypeOf)
    }
}

/// A binary operator, the assignment family included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Mod,
    Exp,
    Add,
    Sub,
    Shl,
    Shr,
    ShrUnsigned,
    Lt,
    Gt,
    Le,
    Ge,
    In,
    InstanceOf,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    BitAnd,
    BitXor,
    BitOr,
    And,
    Or,
    Coalesce,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    ExpAssign,
    ShlAssign,
    ShrAssign,
    ShrUnsignedAssign,
    BitAndAssign,
    BitXorAssign,
    BitOrAssign,
}

impl BinaryOp {
    /// Returns the operator's source text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Exp => "**",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::ShrUnsigned => ">>>",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::In => "in",
            Self::InstanceOf => "instanceof",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::StrictEq => "===",
            Self::StrictNotEq => "!==",
            Self::BitAnd => "&",
            Self::BitXor => "^",
            Self::BitOr => "|",
            Self::And => "&&",
            Self::Or => "||",
            Self::Coalesce => "??",
            Self::Assign => "=",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
            Self::ModAssign => "%=",
            Self::ExpAssign => "**=",
            Self::ShlAssign => "<<=",
            Self::ShrAssign => ">>=",
            Self::ShrUnsignedAssign => ">>>=",
            Self::BitAndAssign => "&=",
            Self::BitXorAssign => "^=",
            Self::BitOrAssign => "|=",
        }
    }

    /// Returns true for `=` and the compound assignment operators.
    #[must_use]
    pub const fn is_assignment(self) -> bool {
        matches!(
            self,
            Self::Assign
                | Self::AddAssign
                | Self::SubAssign
                | Self::MulAssign
                | Self::DivAssign
                | Self::ModAssign
                | Self::ExpAssign
                | Self::ShlAssign
                | Self::ShrAssign
                | Self::ShrUnsignedAssign
                | Self::BitAndAssign
                | Self::BitXorAssign
                | Self::BitOrAssign
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_ordering() {
        assert!(NodeId::new(0) < NodeId::new(1));
        assert_eq!(NodeId::new(7).raw(), 7);
    }

    #[test]
    fn statement_accessors() {
        let stmt = Statement::Empty(EmptyStatement {
            id: NodeId::new(3),
            span: Span::new(4, 5),
        });
        assert_eq!(stmt.id(), NodeId::new(3));
        assert_eq!(stmt.span(), Span::new(4, 5));
    }

    #[test]
    fn expression_accessors() {
        let expr = Expression::Identifier {
            id: NodeId::new(1),
            span: Span::new(0, 5),
            name: "width".into(),
        };
        assert_eq!(expr.id(), NodeId::new(1));
        assert_eq!(expr.span(), Span::new(0, 5));
        assert!(!expr.is_error());

        let error = Expression::Error {
            id: NodeId::new(2),
            span: Span::new(0, 1),
            message: "unexpected token".into(),
        };
        assert!(error.is_error());
    }

    #[test]
    fn operator_text() {
        assert_eq!(UnaryOp::TypeOf.as_str(), "typeof");
        assert_eq!(UnaryOp::PostIncrement.as_str(), "++");
        assert!(UnaryOp::PostIncrement.is_postfix());
        assert!(!UnaryOp::PreIncrement.is_postfix());
        assert!(UnaryOp::Delete.is_keyword());

        assert_eq!(BinaryOp::ShrUnsignedAssign.as_str(), ">>>=");
        assert_eq!(BinaryOp::InstanceOf.as_str(), "instanceof");
        assert!(BinaryOp::AddAssign.is_assignment());
        assert!(!BinaryOp::StrictEq.is_assignment());
    }

    #[test]
    fn variable_kind_text() {
        assert_eq!(VariableKind::Const.as_str(), "const");
        assert_eq!(ForEachOperator::Of.as_str(), "of");
    }
}
