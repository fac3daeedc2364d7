//! Terminal rendering of issues.
//!
//! Rendering is deliberately separate from the [`Issue`](crate::issue::Issue)
//! data model: localization and color belong here, so tests can assert on
//! structured issues without parsing terminal output.

use std::fmt::Write as _;

use colang_source::types::SourceManager;

use crate::issue::{Issue, Severity};
use crate::locale::Locale;

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const WHITE: &str = "\x1b[37m";
const RESET: &str = "\x1b[0m";

/// Renders issues into the `file:line:col: kind: message` format with
/// underlined source echoes.
#[derive(Debug, Clone, Copy)]
pub struct IssueRenderer<'a> {
    /// Source files for looking up line text
    sources: &'a SourceManager,
    /// Locale for kind labels
    locale: Locale,
    /// Whether to emit ANSI color codes
    color: bool,
}

impl<'a> IssueRenderer<'a> {
    /// Creates a renderer over the given sources.
    #[must_use]
    pub const fn new(sources: &'a SourceManager, locale: Locale, color: bool) -> Self {
        Self { sources, locale, color }
    }

    /// Renders a single issue, including its notes.
    #[must_use]
    pub fn render(&self, issue: &Issue) -> String {
        let mut out = String::new();

        let label = self.locale.severity_label(issue.severity);
        let color = match issue.severity {
            Severity::Error => RED,
            Severity::Warning => YELLOW,
        };
        self.header(&mut out, issue.span, color, label, &issue.message);
        self.echo_span(&mut out, issue.span);

        for note in &issue.notes {
            if let Some(span) = note.span {
                self.header(&mut out, span, WHITE, self.locale.note_label(), &note.message);
                self.echo_span(&mut out, span);
            } else {
                let _ = writeln!(out, "{}: {}", self.paint(WHITE, self.locale.note_label()), note.message);
            }
        }

        out
    }

    /// Renders a slice of issues in order.
    #[must_use]
    pub fn render_all(&self, issues: &[Issue]) -> String {
        issues.iter().map(|issue| self.render(issue)).collect()
    }

    /// Writes the `file:line:col: kind: message` header line.
    fn header(
        &self,
        out: &mut String,
        span: colang_source::types::SourceSpan,
        color: &str,
        label: &str,
        message: &str,
    ) {
        let name = self.sources.get_file(span.file_id).map_or("<unknown>", |f| f.name.as_str());

        let _ = writeln!(
            out,
            "{}:{}:{}: {}: {}",
            name,
            span.start.line,
            span.start.column,
            self.paint(color, label),
            message
        );
    }

    /// Echoes the source lines the span covers, with a tilde underline.
    fn echo_span(&self, out: &mut String, span: colang_source::types::SourceSpan) {
        let Some(file) = self.sources.get_file(span.file_id) else {
            return;
        };

        for line in span.start.line..=span.end.line {
            if line == 0 || line > file.line_count() {
                continue;
            }

            let text = file.line_text(line);
            let _ = writeln!(out, "{text}");
            let _ = writeln!(out, "{}", Self::underline(span, line, text));
        }
    }

    /// Builds the underline row for one covered line.
    fn underline(span: colang_source::types::SourceSpan, line: usize, text: &str) -> String {
        let first = span.start.line == line;
        let last = span.end.line == line;

        let from = if first { span.start.column } else { 1 };
        let to = if last { span.end.column } else { text.chars().count() + 1 };

        // A zero-width span still gets one tilde so the location is visible.
        let width = to.saturating_sub(from).max(1);

        format!("{}{}", " ".repeat(from - 1), "~".repeat(width))
    }

    /// Wraps `text` in the color code when color output is enabled.
    fn paint(&self, color: &str, text: &str) -> String {
        if self.color { format!("{color}{text}{RESET}") } else { text.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use colang_source::types::SourceManager;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::issue::IssueCode;

    #[test]
    fn test_plain_rendering_single_line() {
        let mut sources = SourceManager::new();
        let file_id = sources.add_file("main.co".to_string(), "int x = y;\n".to_string());
        let file = sources.get_file(file_id).unwrap();
        let span = file.span(8..9); // `y`

        let issue = Issue::error(IssueCode::UnknownIdentifier, span, "unknown identifier `y`");
        let renderer = IssueRenderer::new(&sources, Locale::En, false);

        assert_eq!(
            renderer.render(&issue),
            "main.co:1:9: error: unknown identifier `y`\nint x = y;\n        ~\n"
        );
    }

    #[test]
    fn test_zero_width_span_gets_one_tilde() {
        let mut sources = SourceManager::new();
        let file_id = sources.add_file("main.co".to_string(), "int f() {\n".to_string());
        let file = sources.get_file(file_id).unwrap();
        let span = file.span(9..9);

        let issue = Issue::error(IssueCode::MissingToken, span, "expected `}`");
        let renderer = IssueRenderer::new(&sources, Locale::En, false);
        let rendered = renderer.render(&issue);

        assert!(rendered.contains("main.co:1:10: error: expected `}`"));
        assert!(rendered.ends_with("         ~\n"));
    }

    #[test]
    fn test_multi_line_span_underlines_every_line() {
        let mut sources = SourceManager::new();
        let file_id = sources.add_file("main.co".to_string(), "ab\ncdef\n".to_string());
        let file = sources.get_file(file_id).unwrap();
        let span = file.span(1..5); // from `b` through `cd`

        let issue = Issue::error(IssueCode::UnexpectedToken, span, "bad");
        let rendered = IssueRenderer::new(&sources, Locale::En, false).render(&issue);

        assert_eq!(rendered, "main.co:1:2: error: bad\nab\n ~\ncdef\n~~\n");
    }

    #[test]
    fn test_color_wraps_only_the_label() {
        let mut sources = SourceManager::new();
        let file_id = sources.add_file("main.co".to_string(), "x\n".to_string());
        let file = sources.get_file(file_id).unwrap();

        let issue = Issue::warning(IssueCode::UnusedSymbol, file.span(0..1), "unused");
        let rendered = IssueRenderer::new(&sources, Locale::En, true).render(&issue);

        assert!(rendered.contains("\x1b[33mwarning\x1b[0m: unused"));
    }
}
