//! Expression nodes.
//!
//! Expressions form three grammatical tiers: primary atoms, secondary postfix
//! chains, and tertiary binary-operator trees. The parser folds parenthesized
//! expressions into their inner node.

use colang_source::types::SourceSpan;

use super::definitions::Identifier;

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// An integer literal (`int`)
    IntLiteral(IntLiteral),
    /// A floating literal (`double`)
    FloatLiteral(FloatLiteral),
    /// A string literal (`string`)
    StringLiteral(StringLiteral),
    /// `true` or `false` (`bool`)
    BoolLiteral(BoolLiteral),
    /// A reference to a named symbol
    Reference(Identifier),
    /// A call: `callee(args)`
    Call(CallExpression),
    /// A member access: `receiver.name`
    Member(MemberExpression),
    /// A subscript: `receiver[index]`
    Subscript(SubscriptExpression),
    /// A postfix `++` or `--`
    Postfix(PostfixExpression),
    /// A binary infix operation, including assignment
    Binary(BinaryExpression),
}

impl Expression {
    /// The span of the underlying expression.
    #[must_use]
    pub const fn span(&self) -> SourceSpan {
        match self {
            Self::IntLiteral(lit) => lit.span,
            Self::FloatLiteral(lit) => lit.span,
            Self::StringLiteral(lit) => lit.span,
            Self::BoolLiteral(lit) => lit.span,
            Self::Reference(ident) => ident.span,
            Self::Call(expr) => expr.span,
            Self::Member(expr) => expr.span,
            Self::Subscript(expr) => expr.span,
            Self::Postfix(expr) => expr.span,
            Self::Binary(expr) => expr.span,
        }
    }
}

/// An integer literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntLiteral {
    /// The parsed value
    pub value: i64,
    /// Where the literal appears
    pub span: SourceSpan,
}

/// A floating literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatLiteral {
    /// The parsed value
    pub value: f64,
    /// Where the literal appears
    pub span: SourceSpan,
}

/// A string literal, unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    /// The literal's value with escapes resolved
    pub value: String,
    /// Where the literal appears
    pub span: SourceSpan,
}

/// A boolean literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolLiteral {
    /// The literal's value
    pub value: bool,
    /// Where the literal appears
    pub span: SourceSpan,
}

/// A call expression: `callee(arguments)`.
///
/// When `callee` is a [`MemberExpression`] this is a method call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    /// What is being called
    pub callee: Box<Expression>,
    /// The comma-separated arguments
    pub arguments: Vec<Expression>,
    /// Span from the callee through the closing parenthesis
    pub span: SourceSpan,
}

/// A member access: `receiver.name`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    /// The expression whose member is accessed
    pub receiver: Box<Expression>,
    /// The member name
    pub member: Identifier,
    /// Span from the receiver through the member name
    pub span: SourceSpan,
}

/// A subscript: `receiver[index]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptExpression {
    /// The expression being indexed
    pub receiver: Box<Expression>,
    /// The index expression
    pub index: Box<Expression>,
    /// Span from the receiver through the closing bracket
    pub span: SourceSpan,
}

/// The direction of a postfix step operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    /// `++`
    Increment,
    /// `--`
    Decrement,
}

/// A postfix `++` or `--` applied to a place expression.
#[derive(Debug, Clone, PartialEq)]
pub struct PostfixExpression {
    /// The stepped place expression
    pub target: Box<Expression>,
    /// Which step operator
    pub op: PostfixOp,
    /// Span from the target through the operator
    pub span: SourceSpan,
}

/// A binary infix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `=`
    Assign,
    /// `||`
    Or,
    /// `&&`
    And,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Less,
    /// `<=`
    LessEq,
    /// `>`
    Greater,
    /// `>=`
    GreaterEq,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
}

impl BinaryOp {
    /// The binding power of the operator; higher binds tighter.
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Assign => 1,
            Self::Or => 2,
            Self::And => 3,
            Self::Eq | Self::NotEq => 4,
            Self::Less | Self::LessEq | Self::Greater | Self::GreaterEq => 5,
            Self::Add | Self::Sub => 6,
            Self::Mul | Self::Div | Self::Rem => 7,
        }
    }

    /// True for operators that group right-to-left.
    ///
    /// Only assignment is right-associative; `a = b = c` parses as `a = (b = c)`.
    #[must_use]
    pub const fn is_right_associative(&self) -> bool { matches!(self, Self::Assign) }

    /// The operator's source spelling.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Or => "||",
            Self::And => "&&",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
        }
    }
}

/// A binary infix operation.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    /// The operator
    pub op: BinaryOp,
    /// Span of the operator token
    pub op_span: SourceSpan,
    /// Left operand
    pub lhs: Box<Expression>,
    /// Right operand
    pub rhs: Box<Expression>,
    /// Span covering both operands
    pub span: SourceSpan,
}
