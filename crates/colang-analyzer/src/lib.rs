//! Semantic analysis for the CO language.
//!
//! This crate turns the raw syntax trees of the prelude and the user's source
//! file into a name-resolved, type-checked [`Program`], the sole artifact the
//! C backend consumes. Analysis runs in two phases:
//!
//! 1. **Symbol registration** ([`resolve`]): every top-level type, function,
//!    and variable, plus every method header inside a type body, is entered
//!    into the root namespace, so forward references and recursion need no
//!    declaration order. The prelude is processed first into the same
//!    namespace, which is what makes its symbols visible everywhere.
//! 2. **Body resolution**: each function body is resolved in a fresh scope
//!    chained to the root, with parameters bound, producing typed statement
//!    and expression trees. Overloads are selected at call sites, implicit
//!    conversions become explicit coercion nodes, and the return-flow checker
//!    ([`returns`]) validates that non-void functions return on every path.
//!
//! Analysis never aborts on a diagnosable error: issues are accumulated and
//! an absorbing error type stands in for anything unresolvable, which keeps
//! downstream checks quiet instead of cascading.

pub mod error;
pub mod program;
pub mod resolve;
pub mod returns;
pub mod scope;

use colang_ast::nodes::TranslationUnit;
use colang_diagnostic::Issue;
pub use program::Program;

/// Analyzes the prelude and a user translation unit into one program.
///
/// The prelude's symbols land in the same root namespace and are therefore
/// visible to all user code. The returned issues cover both phases; the
/// program is always produced, however broken the input.
#[must_use]
pub fn analyze(prelude: &TranslationUnit, user: &TranslationUnit) -> (Program, Vec<Issue>) {
    resolve::Analyzer::new(user.span.file_id).run(prelude, user)
}
