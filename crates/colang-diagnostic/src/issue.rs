//! The structured diagnostic data model.

use std::cmp::Reverse;

use colang_source::types::SourceSpan;

/// Severity of a diagnostic.
///
/// Any `Error`-severity issue anywhere in the pipeline blocks code generation;
/// warnings never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// An error that prevents successful compilation
    Error,
    /// A warning about potential issues
    Warning,
}

/// Stable identifier for a class of diagnostic.
///
/// Codes identify what went wrong independently of the (localizable) message
/// text, so tests and tooling can match on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueCode {
    // Lexical
    /// A character sequence that is not part of any token
    BadCharacter,
    /// A string literal with no closing quote before end of line or file
    UnterminatedLiteral,
    /// A literal whose text cannot be converted to a value
    MalformedLiteral,

    // Syntactic
    /// A required token was absent
    MissingToken,
    /// A token that cannot start or continue the current production
    UnexpectedToken,

    // Semantic: declarations
    /// Two symbols with the same name in one scope
    DuplicateSymbol,
    /// A type expression naming a type that does not exist
    UnknownType,
    /// A specifier that is not legal on the enclosing production
    IllegalSpecifier,
    /// A non-native function defined without a body
    MissingBody,

    // Semantic: expressions
    /// An identifier that resolves to nothing
    UnknownIdentifier,
    /// A member access naming no method of the receiver type
    UnknownMethod,
    /// A call with no viable overload
    NoMatchingOverload,
    /// A call with several incomparable viable overloads
    AmbiguousCall,
    /// Operand or argument type incompatible with what the context requires
    TypeMismatch,
    /// Assignment target is not a place expression
    NotAssignable,
    /// A call applied to something that is not a function
    NotCallable,

    // Control flow
    /// A non-void function with a path that reaches the closing brace
    MissingReturnStatement,
    /// `return;` inside a non-void function
    ReturnWithoutValue,
    /// `return expr;` inside a void function
    ReturnWithValueInVoid,
    /// A statement after a statically guaranteed return
    UnreachableCode,

    // Warnings
    /// The same specifier written twice
    DuplicateSpecifier,
    /// A symbol that is never read or called
    UnusedSymbol,
}

/// An auxiliary message attached to an issue, optionally pointing at a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Location the note refers to, if it has one
    pub span: Option<SourceSpan>,
    /// The note text
    pub message: String,
}

impl Note {
    /// Creates a note with a span.
    pub fn spanned(span: SourceSpan, message: impl Into<String>) -> Self {
        Self { span: Some(span), message: message.into() }
    }

    /// Creates a note without a location.
    pub fn plain(message: impl Into<String>) -> Self { Self { span: None, message: message.into() } }
}

/// A single diagnostic: severity, code, primary span, message, and notes.
///
/// Issues are immutable once emitted. Subsystems accumulate them in plain
/// vectors and hand them up; nothing is thrown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Whether this issue blocks code generation
    pub severity: Severity,
    /// Stable identifier for the issue class
    pub code: IssueCode,
    /// Primary location of the problem
    pub span: SourceSpan,
    /// Human-readable description
    pub message: String,
    /// Ordered auxiliary notes
    pub notes: Vec<Note>,
}

impl Issue {
    /// Creates an error-severity issue.
    pub fn error(code: IssueCode, span: SourceSpan, message: impl Into<String>) -> Self {
        Self { severity: Severity::Error, code, span, message: message.into(), notes: Vec::new() }
    }

    /// Creates a warning-severity issue.
    pub fn warning(code: IssueCode, span: SourceSpan, message: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, code, span, message: message.into(), notes: Vec::new() }
    }

    /// Attaches a note and returns the issue.
    #[must_use]
    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    /// Returns true if this issue has `Error` severity.
    #[must_use]
    pub const fn is_error(&self) -> bool { matches!(self.severity, Severity::Error) }

    /// The key issues are ordered by before printing.
    ///
    /// Ascending start position, then *descending* end position, so that on a
    /// shared start the enclosing span is printed before the enclosed one.
    #[must_use]
    pub fn sort_key(&self) -> (usize, usize, Reverse<usize>, Reverse<usize>) {
        (
            self.span.start.line,
            self.span.start.column,
            Reverse(self.span.end.line),
            Reverse(self.span.end.column),
        )
    }
}

/// Sorts issues into presentation order.
///
/// The sort is stable, so issues with identical spans keep emission order.
pub fn sort_issues(issues: &mut [Issue]) { issues.sort_by_key(Issue::sort_key); }

/// Returns true if any issue in the slice has `Error` severity.
#[must_use]
pub fn has_errors(issues: &[Issue]) -> bool { issues.iter().any(Issue::is_error) }

#[cfg(test)]
mod tests {
    use colang_source::types::{FileID, Position, SourceSpan};

    use super::*;

    fn span(sl: usize, sc: usize, el: usize, ec: usize) -> SourceSpan {
        SourceSpan::new(Position::new(sl, sc, 0), Position::new(el, ec, 0), FileID::new(1))
    }

    #[test]
    fn test_enclosing_span_sorts_first_on_tied_start() {
        let outer = Issue::error(IssueCode::MissingToken, span(1, 1, 3, 5), "outer");
        let inner = Issue::error(IssueCode::MissingToken, span(1, 1, 1, 4), "inner");

        let mut issues = vec![inner.clone(), outer.clone()];
        sort_issues(&mut issues);

        assert_eq!(issues, vec![outer, inner]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut issues = vec![
            Issue::error(IssueCode::UnknownIdentifier, span(2, 4, 2, 9), "b"),
            Issue::warning(IssueCode::UnusedSymbol, span(1, 1, 1, 2), "a"),
            Issue::error(IssueCode::TypeMismatch, span(2, 4, 2, 5), "c"),
        ];

        sort_issues(&mut issues);
        let once = issues.clone();
        sort_issues(&mut issues);

        assert_eq!(issues, once);
    }

    #[test]
    fn test_has_errors_ignores_warnings() {
        let issues = vec![Issue::warning(IssueCode::UnusedSymbol, span(1, 1, 1, 2), "w")];

        assert!(!has_errors(&issues));
    }
}
