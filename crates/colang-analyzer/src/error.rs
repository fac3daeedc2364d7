//! Semantic error types.
//!
//! These carry the structured data of a semantic failure; the analyzer
//! converts them into diagnostics at the point of emission.

use colang_diagnostic::{Issue, IssueCode, Note};
use colang_source::types::SourceSpan;
use thiserror::Error;

/// Errors produced while building the symbol table.
#[derive(Debug, Error, Clone)]
pub enum SemanticError {
    /// Attempt to declare a name that already exists in the same scope.
    #[error("duplicate symbol `{name}`")]
    DuplicateSymbol {
        /// The name that was declared twice
        name: String,
        /// The location of the original declaration
        original_span: SourceSpan,
        /// The location of the duplicate declaration
        duplicate_span: SourceSpan,
    },
}

impl From<SemanticError> for Issue {
    fn from(error: SemanticError) -> Self {
        match error {
            SemanticError::DuplicateSymbol { ref name, original_span, duplicate_span } => {
                Self::error(
                    IssueCode::DuplicateSymbol,
                    duplicate_span,
                    format!("duplicate symbol `{name}`"),
                )
                .with_note(Note::spanned(original_span, format!("`{name}` first defined here")))
            }
        }
    }
}
