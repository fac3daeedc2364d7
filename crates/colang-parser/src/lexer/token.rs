//! Token definitions for the CO language.

use std::fmt::{self, Display, Formatter};

use colang_source::types::SourceSpan;
use logos::Logos;

/// Represents the type of token in the CO language.
///
/// This enum contains all token types recognized by the lexer, including
/// keywords, literals, operators, delimiters, and the synthetic end-of-file
/// token.
#[derive(Logos, Debug, Eq, PartialEq, Clone, Copy, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*[^/])*\*/")]
pub enum TokenKind {
    // Keywords
    #[token("else")]
    Else,
    #[token("false")]
    False,
    #[token("if")]
    If,
    #[token("native")]
    Native,
    #[token("return")]
    Return,
    #[token("struct")]
    Struct,
    #[token("true")]
    True,
    #[token("while")]
    While,

    // Literals
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    FloatLiteral,
    #[regex(r"[0-9]+")]
    IntLiteral,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StringLiteral,
    #[regex(r#""([^"\\\n]|\\.)*"#)]
    UnterminatedStringLiteral,

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    // Operators
    #[token("=")]
    Assign,
    #[token("==")]
    Equal,
    #[token("!=")]
    NotEqual,
    #[token("<")]
    LessThan,
    #[token("<=")]
    LessEqual,
    #[token(">")]
    GreaterThan,
    #[token(">=")]
    GreaterEqual,
    #[token("+")]
    Plus,
    #[token("++")]
    PlusPlus,
    #[token("-")]
    Minus,
    #[token("--")]
    MinusMinus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,

    // Delimiters
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,

    // Synthetic tokens
    EndOfFile,
}

impl TokenKind {
    /// A short description used in "missing X" and "expected X" diagnostics.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Else => "`else`",
            Self::False => "`false`",
            Self::If => "`if`",
            Self::Native => "`native`",
            Self::Return => "`return`",
            Self::Struct => "`struct`",
            Self::True => "`true`",
            Self::While => "`while`",
            Self::FloatLiteral => "floating literal",
            Self::IntLiteral => "integer literal",
            Self::StringLiteral | Self::UnterminatedStringLiteral => "string literal",
            Self::Identifier => "identifier",
            Self::Assign => "`=`",
            Self::Equal => "`==`",
            Self::NotEqual => "`!=`",
            Self::LessThan => "`<`",
            Self::LessEqual => "`<=`",
            Self::GreaterThan => "`>`",
            Self::GreaterEqual => "`>=`",
            Self::Plus => "`+`",
            Self::PlusPlus => "`++`",
            Self::Minus => "`-`",
            Self::MinusMinus => "`--`",
            Self::Star => "`*`",
            Self::Slash => "`/`",
            Self::Percent => "`%`",
            Self::AndAnd => "`&&`",
            Self::OrOr => "`||`",
            Self::LeftParen => "`(`",
            Self::RightParen => "`)`",
            Self::LeftBrace => "`{`",
            Self::RightBrace => "`}`",
            Self::LeftBracket => "`[`",
            Self::RightBracket => "`]`",
            Self::Comma => "`,`",
            Self::Semicolon => "`;`",
            Self::Dot => "`.`",
            Self::EndOfFile => "end of file",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { write!(f, "{}", self.describe()) }
}

/// The literal value attached to a token, where applicable.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TokenValue {
    /// No attached value
    #[default]
    None,
    /// Value of an integer literal
    Int(i64),
    /// Value of a floating literal
    Float(f64),
    /// Value of a string literal, with escapes resolved
    Str(String),
}

/// Represents a token in the CO language.
#[derive(Clone, Debug, PartialEq)]
pub struct Token<'src> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The lexeme (the actual text of the token) from the source code.
    pub lexeme: &'src str,
    /// The span of the token in the source code.
    pub span: SourceSpan,
    /// The literal value, for literal tokens.
    pub value: TokenValue,
}

impl<'src> Token<'src> {
    /// Creates a new token without a literal value.
    #[must_use]
    pub const fn new(kind: TokenKind, lexeme: &'src str, span: SourceSpan) -> Self {
        Self { kind, lexeme, span, value: TokenValue::None }
    }

    /// Creates a new token carrying a literal value.
    #[must_use]
    pub const fn with_value(
        kind: TokenKind,
        lexeme: &'src str,
        span: SourceSpan,
        value: TokenValue,
    ) -> Self {
        Self { kind, lexeme, span, value }
    }

    /// Checks if the token is of the specified kind.
    #[must_use]
    pub fn is(&self, kind: TokenKind) -> bool { self.kind == kind }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.span)
    }
}
