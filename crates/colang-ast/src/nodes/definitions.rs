//! Top-level definition nodes: translation units, types, functions, variables.

use colang_source::types::SourceSpan;

use super::expressions::Expression;
use super::statements::CodeBlock;

/// An identifier occurrence: a definition name or a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// The identifier text
    pub name: String,
    /// Where the identifier appears
    pub span: SourceSpan,
    /// True if this identifier was synthesized during error recovery.
    ///
    /// The analyzer skips resolution diagnostics on synthesized names.
    pub synthesized: bool,
}

impl Identifier {
    /// Creates an identifier parsed from source.
    pub fn new(name: impl Into<String>, span: SourceSpan) -> Self {
        Self { name: name.into(), span, synthesized: false }
    }

    /// Creates a zero-width placeholder identifier at the given span.
    #[must_use]
    pub fn synthesized(span: SourceSpan) -> Self {
        Self { name: String::new(), span, synthesized: true }
    }
}

/// A type expression: in CO, always a bare type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpression {
    /// The named type
    pub name: Identifier,
    /// Span of the whole type expression
    pub span: SourceSpan,
}

/// The kind of a definition specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecifierKind {
    /// `native`: the definition is provided by the prelude's C runtime
    Native,
}

/// A single specifier occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Specifier {
    /// Which specifier was written
    pub kind: SpecifierKind,
    /// Where it was written
    pub span: SourceSpan,
}

/// An ordered sequence of top-level symbol definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationUnit {
    /// The definitions in source order
    pub definitions: Vec<GlobalDefinition>,
    /// Span covering the whole file
    pub span: SourceSpan,
}

/// A top-level symbol definition.
#[derive(Debug, Clone, PartialEq)]
pub enum GlobalDefinition {
    /// A `struct` type definition
    Type(TypeDefinition),
    /// A function definition
    Function(FunctionDefinition),
    /// A global variable definition
    Variable(VariableDefinition),
}

impl GlobalDefinition {
    /// The span of the underlying definition.
    #[must_use]
    pub const fn span(&self) -> SourceSpan {
        match self {
            Self::Type(def) => def.span,
            Self::Function(def) => def.span,
            Self::Variable(def) => def.span,
        }
    }
}

/// A type definition: `[specifiers] struct Name [{ methods }]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    /// Leading specifiers (`native`)
    pub specifiers: Vec<Specifier>,
    /// The type name
    pub name: Identifier,
    /// The brace-delimited method list; absent for native types
    pub body: Option<TypeBody>,
    /// Span of the whole definition
    pub span: SourceSpan,
}

/// A brace-delimited sequence of method definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeBody {
    /// The methods in source order
    pub methods: Vec<FunctionDefinition>,
    /// Span from the opening to the closing brace
    pub span: SourceSpan,
}

/// A function or method definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    /// Leading specifiers (`native`)
    pub specifiers: Vec<Specifier>,
    /// The declared return type
    pub return_type: TypeExpression,
    /// The function name
    pub name: Identifier,
    /// The parenthesized parameter list
    pub parameters: ParameterList,
    /// The body; absent for native functions
    pub body: Option<CodeBlock>,
    /// Span of the whole definition
    pub span: SourceSpan,
}

/// A parenthesized, comma-separated parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterList {
    /// The parameters in source order
    pub parameters: Vec<Parameter>,
    /// Span from `(` to `)`
    pub span: SourceSpan,
}

/// A single `Type name` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// The declared parameter type
    pub ty: TypeExpression,
    /// The parameter name
    pub name: Identifier,
    /// Span of the whole parameter
    pub span: SourceSpan,
}

/// A variable definition: `Type name [= initializer] ;`.
///
/// Appears both at the top level and as a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    /// Leading specifiers; none are legal on variables, kept for diagnostics
    pub specifiers: Vec<Specifier>,
    /// The declared variable type
    pub ty: TypeExpression,
    /// The variable name
    pub name: Identifier,
    /// The optional initializer expression
    pub initializer: Option<Expression>,
    /// Span of the whole definition
    pub span: SourceSpan,
}
