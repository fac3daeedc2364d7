//! Lexer module for the CO language.
//!
//! This module is responsible for converting source code into tokens. It uses
//! the `logos` crate for efficient tokenization.
//!
//! Lexing is total over any input: unknown character sequences become
//! [`BadCharacter`](IssueCode::BadCharacter) issues and are skipped, and the
//! produced stream always terminates with an [`EndOfFile`](TokenKind::EndOfFile)
//! token whose zero-width span sits at the file's end (end-exclusive), so
//! closers synthesized at end of file land exactly on that position.

mod token;

use colang_diagnostic::{Issue, IssueCode};
use colang_source::types::SourceFile;
use logos::Logos;
pub use token::*;

/// Converts a source file into a token stream.
///
/// Tokens are produced in source order. Invalid input is reported through the
/// returned issues; it never aborts lexing.
#[must_use]
pub fn tokenize<'src>(file: &'src SourceFile) -> (Vec<Token<'src>>, Vec<Issue>) {
    let mut tokens = Vec::new();
    let mut issues = Vec::new();

    // Span of a run of consecutive unknown characters, merged into one issue.
    let mut bad_run: Option<std::ops::Range<usize>> = None;

    let mut lexer = TokenKind::lexer(&file.content);

    while let Some(result) = lexer.next() {
        let range = lexer.span();

        let Ok(kind) = result else {
            bad_run = Some(match bad_run {
                Some(run) if run.end == range.start => run.start..range.end,
                Some(run) => {
                    flush_bad_run(file, run, &mut issues);
                    range
                }
                None => range,
            });
            continue;
        };

        if let Some(run) = bad_run.take() {
            flush_bad_run(file, run, &mut issues);
        }

        let lexeme = &file.content[range.clone()];
        let span = file.span(range);

        match kind {
            TokenKind::IntLiteral => {
                let value = lexeme.parse::<i64>().unwrap_or_else(|_| {
                    issues.push(Issue::error(
                        IssueCode::MalformedLiteral,
                        span,
                        format!("integer literal `{lexeme}` is too large"),
                    ));
                    0
                });
                tokens.push(Token::with_value(kind, lexeme, span, TokenValue::Int(value)));
            }
            TokenKind::FloatLiteral => {
                let value = lexeme.parse::<f64>().unwrap_or(0.0);
                tokens.push(Token::with_value(kind, lexeme, span, TokenValue::Float(value)));
            }
            TokenKind::StringLiteral => {
                let value = unescape(&lexeme[1..lexeme.len() - 1], span, &mut issues);
                tokens.push(Token::with_value(kind, lexeme, span, TokenValue::Str(value)));
            }
            TokenKind::UnterminatedStringLiteral => {
                issues.push(Issue::error(
                    IssueCode::UnterminatedLiteral,
                    span,
                    "unterminated string literal",
                ));
            }
            _ => tokens.push(Token::new(kind, lexeme, span)),
        }
    }

    if let Some(run) = bad_run.take() {
        flush_bad_run(file, run, &mut issues);
    }

    tokens.push(Token::new(TokenKind::EndOfFile, "", file.end_span()));

    (tokens, issues)
}

/// Reports a merged run of unknown characters as one issue.
fn flush_bad_run(file: &SourceFile, run: std::ops::Range<usize>, issues: &mut Vec<Issue>) {
    let text = &file.content[run.clone()];
    let span = file.span(run);

    issues.push(Issue::error(
        IssueCode::BadCharacter,
        span,
        format!("unexpected character sequence `{text}`"),
    ));
}

/// Resolves escape sequences in a string literal's interior.
fn unescape(raw: &str, span: colang_source::types::SourceSpan, issues: &mut Vec<Issue>) -> String {
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some('0') => value.push('\0'),
            Some('\\') => value.push('\\'),
            Some('"') => value.push('"'),
            Some(other) => {
                issues.push(Issue::error(
                    IssueCode::MalformedLiteral,
                    span,
                    format!("unknown escape sequence `\\{other}`"),
                ));
                value.push(other);
            }
            None => {}
        }
    }

    value
}
