//! Structured diagnostics for the colang compiler.
//!
//! This crate defines the diagnostic data model shared by every phase of the
//! compiler, plus the terminal renderer:
//!
//! - **Issue model** ([`issue`]): severity, stable code, primary span, message,
//!   and ordered notes. Issues are plain immutable data so tests can assert on
//!   them without going through the renderer.
//! - **Ordering** ([`issue::sort_issues`]): the total order diagnostics are
//!   printed in, chosen so enclosing spans precede enclosed ones on ties.
//! - **Rendering** ([`render`]): the `file:line:col: kind: message` header, the
//!   offending source lines with tilde underlines, and ANSI color around the
//!   kind label.
//! - **Localization** ([`locale`]): kind labels in English, Russian, and
//!   Belarusian, selected from the process locale.

pub mod issue;
pub mod locale;
pub mod render;

pub use issue::{Issue, IssueCode, Note, Severity, sort_issues};
pub use locale::Locale;
pub use render::IssueRenderer;
