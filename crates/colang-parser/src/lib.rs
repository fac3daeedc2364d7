//! Lexer and parser for the CO language.
//!
//! This crate converts CO source text into the raw syntax tree defined by
//! `colang-ast`. It is built in two layers:
//!
//! - The **lexer** ([`lexer`]) uses `logos` to turn a source file into a token
//!   stream. Lexing is total: unknown characters become diagnostics, not
//!   failures, and the stream always ends with an end-of-file token.
//! - The **parser** is a recursive-descent engine built from composable
//!   *strategies* ([`strategy`]) with a three-way outcome (success, malformed,
//!   no-match) that drives local error recovery, plus the concrete CO grammar
//!   ([`grammar`]).
//!
//! The distinction between `NoMatch` and `Malformed` is the pivot of error
//! recovery: `NoMatch` lets a caller try the next alternative, `Malformed`
//! lets it continue the enclosing production while keeping the inner
//! diagnostics.

pub mod grammar;
pub mod lexer;
pub mod strategy;

use colang_ast::nodes::TranslationUnit;
use colang_diagnostic::Issue;
use colang_source::types::SourceFile;

/// Lexes and parses a whole source file.
///
/// This is the crate's main entry point. It never fails: however broken the
/// input, a translation unit is produced alongside the accumulated issues.
#[must_use]
pub fn parse_file(file: &SourceFile) -> (TranslationUnit, Vec<Issue>) {
    let (tokens, mut issues) = lexer::tokenize(file);
    let (unit, parse_issues) = grammar::parse_translation_unit(&tokens);
    issues.extend(parse_issues);

    (unit, issues)
}
