//! Typed statement and expression trees.
//!
//! Every typed expression carries its inferred type and the span of the raw
//! node it was resolved from, so diagnostics downstream of analysis can still
//! point at source.

use colang_ast::nodes::BinaryOp;
use colang_source::types::SourceSpan;

use super::{FunctionId, TypeId, VariableId};

/// A resolved code block.
#[derive(Debug, Clone)]
pub struct TypedBlock {
    /// The statements in order
    pub statements: Vec<TypedStatement>,
    /// Span of the closing brace; missing-return diagnostics anchor before it
    pub close_span: SourceSpan,
    /// Span of the whole block
    pub span: SourceSpan,
}

/// A resolved statement.
#[derive(Debug, Clone)]
pub enum TypedStatement {
    /// A nested block with its own scope
    Block(TypedBlock),
    /// An `if`/`else`
    If(TypedIf),
    /// A `while` loop
    While(TypedWhile),
    /// A `return`
    Return(TypedReturn),
    /// A local variable definition with its optional initializer
    Variable(TypedVariableInit),
    /// An expression evaluated for effect
    Expression(TypedExpression),
}

impl TypedStatement {
    /// The source span of the statement.
    #[must_use]
    pub const fn span(&self) -> SourceSpan {
        match self {
            Self::Block(block) => block.span,
            Self::If(stmt) => stmt.span,
            Self::While(stmt) => stmt.span,
            Self::Return(stmt) => stmt.span,
            Self::Variable(stmt) => stmt.span,
            Self::Expression(expr) => expr.span,
        }
    }
}

/// A resolved `if` statement.
#[derive(Debug, Clone)]
pub struct TypedIf {
    /// The boolean condition
    pub condition: TypedExpression,
    /// The branch taken when the condition holds
    pub then_branch: Box<TypedStatement>,
    /// The branch taken otherwise
    pub else_branch: Option<Box<TypedStatement>>,
    /// Span of the whole statement
    pub span: SourceSpan,
}

/// A resolved `while` loop.
#[derive(Debug, Clone)]
pub struct TypedWhile {
    /// The boolean condition
    pub condition: TypedExpression,
    /// The loop body
    pub body: Box<TypedStatement>,
    /// Span of the whole statement
    pub span: SourceSpan,
}

/// A resolved `return` statement.
#[derive(Debug, Clone)]
pub struct TypedReturn {
    /// The returned value, already coerced to the function's return type
    pub value: Option<TypedExpression>,
    /// Span of the whole statement
    pub span: SourceSpan,
}

/// A resolved local variable definition.
#[derive(Debug, Clone)]
pub struct TypedVariableInit {
    /// The defined variable
    pub variable: VariableId,
    /// The initializer, already coerced to the variable's type
    pub initializer: Option<TypedExpression>,
    /// Span of the whole definition
    pub span: SourceSpan,
}

/// A resolved expression: a kind, an inferred type, and the source span of
/// the raw node it came from.
#[derive(Debug, Clone)]
pub struct TypedExpression {
    /// What the expression is
    pub kind: ExpressionKind,
    /// The inferred type; never "unknown", since unresolvable expressions get
    /// the absorbing error type
    pub ty: TypeId,
    /// Span of the originating raw node
    pub span: SourceSpan,
}

impl TypedExpression {
    /// True if this expression names a storage location.
    ///
    /// Only variable references are places in CO.
    #[must_use]
    pub const fn is_place(&self) -> bool { matches!(self.kind, ExpressionKind::Variable(_)) }
}

/// The kinds of resolved expressions.
#[derive(Debug, Clone)]
pub enum ExpressionKind {
    /// An integer literal
    IntLiteral(i64),
    /// A floating literal
    FloatLiteral(f64),
    /// A string literal
    StringLiteral(String),
    /// A boolean literal
    BoolLiteral(bool),
    /// A reference to a variable
    Variable(VariableId),
    /// A call to a free function
    Call {
        /// The selected overload
        function: FunctionId,
        /// The arguments, coerced to the parameter types
        arguments: Vec<TypedExpression>,
    },
    /// A method call on a receiver
    MethodCall {
        /// The selected method overload
        method: FunctionId,
        /// The receiver expression
        receiver: Box<TypedExpression>,
        /// The arguments, coerced to the parameter types
        arguments: Vec<TypedExpression>,
    },
    /// A built-in binary operator over primitive types
    Builtin {
        /// The operator
        op: BinaryOp,
        /// Left operand
        lhs: Box<TypedExpression>,
        /// Right operand
        rhs: Box<TypedExpression>,
    },
    /// An assignment to a place
    Assign {
        /// The place written to
        target: Box<TypedExpression>,
        /// The value, coerced to the place's type
        value: Box<TypedExpression>,
    },
    /// A postfix `++` or `--` on an `int` place
    Step {
        /// The place stepped
        target: Box<TypedExpression>,
        /// True for `++`, false for `--`
        increment: bool,
    },
    /// An implicit conversion to this node's type
    Convert {
        /// The converted value
        value: Box<TypedExpression>,
    },
    /// A placeholder for an unresolvable expression; carries the error type
    Error,
}
