//! Raw (untyped) abstract syntax tree for the CO language.
//!
//! This crate defines the syntactic record produced by the parser and consumed
//! read-only by the analyzer. Every node carries the [`SourceSpan`] it was
//! parsed from; nodes synthesized during error recovery are flagged so later
//! phases can skip semantic checks on them instead of cascading.
//!
//! The raw tree and the analyzer's resolved program are deliberately distinct
//! data shapes: this one records what was written, the resolved one records
//! what it means.
//!
//! [`SourceSpan`]: colang_source::types::SourceSpan

pub mod nodes;
