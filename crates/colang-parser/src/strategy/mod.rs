//! The reusable parsing-strategy framework.
//!
//! A *strategy* is an operation over an immutable token cursor with a
//! three-way outcome:
//!
//! - [`ParseOutcome::Success`]: a node was produced (possibly with
//!   recovered-from issues) and the cursor advanced.
//! - [`ParseOutcome::Malformed`]: the strategy committed (its anchor tokens
//!   matched) but the node could not be completed; the cursor advanced past
//!   the attempted region and the issues describe what went wrong.
//! - [`ParseOutcome::NoMatch`]: the strategy did not commit; the cursor is
//!   unchanged and no issues were produced.
//!
//! Callers treat `NoMatch` as "try the next alternative" and `Malformed` as
//! "keep my own production going, keep the inner diagnostics". Everything in
//! the concrete grammar is built from the combinators here: ordered unions,
//! element groups, repeated sequences, and enclosed (bracketed) sequences
//! that synthesize their closer on truncated input.

use colang_ast::nodes::Identifier;
use colang_diagnostic::{Issue, IssueCode};
use colang_source::types::SourceSpan;

use crate::lexer::{Token, TokenKind};

/// An immutable cursor into a token stream.
///
/// Cursors are cheap copies; strategies return an advanced cursor rather than
/// mutating shared state, which is what makes speculative parsing and
/// backtracking on `NoMatch` trivial.
#[derive(Debug, Clone, Copy)]
pub struct TokenCursor<'a> {
    tokens: &'a [Token<'a>],
    index: usize,
}

impl<'a> TokenCursor<'a> {
    /// Creates a cursor at the start of a token stream.
    ///
    /// ## Panics
    ///
    /// Panics if the stream is empty; the lexer always terminates streams
    /// with an end-of-file token.
    #[must_use]
    pub fn new(tokens: &'a [Token<'a>]) -> Self {
        assert!(!tokens.is_empty(), "token stream must end with an end-of-file token");
        Self { tokens, index: 0 }
    }

    /// The token under the cursor.
    #[must_use]
    pub fn peek(&self) -> &'a Token<'a> { &self.tokens[self.index] }

    /// True if the token under the cursor has the given kind.
    #[must_use]
    pub fn at(&self, kind: TokenKind) -> bool { self.peek().kind == kind }

    /// True if the cursor reached the end-of-file token.
    #[must_use]
    pub fn is_at_end(&self) -> bool { self.at(TokenKind::EndOfFile) }

    /// A cursor advanced by one token, saturating at the end-of-file token.
    #[must_use]
    pub fn advance(&self) -> Self {
        Self { tokens: self.tokens, index: (self.index + 1).min(self.tokens.len() - 1) }
    }

    /// The position of the cursor in the stream, for progress checks.
    #[must_use]
    pub const fn position(&self) -> usize { self.index }

    /// The zero-width span of the gap immediately before the current token.
    ///
    /// "Missing X" issues and synthesized placeholder nodes are anchored here.
    #[must_use]
    pub fn gap(&self) -> SourceSpan {
        match self.index.checked_sub(1).map(|i| &self.tokens[i]) {
            Some(previous) => previous.span.after(),
            None => self.peek().span.before(),
        }
    }

    /// The span of the most recently consumed token, or the gap before the
    /// first token when nothing was consumed yet.
    #[must_use]
    pub fn latest_span(&self) -> SourceSpan {
        match self.index.checked_sub(1).map(|i| &self.tokens[i]) {
            Some(previous) => previous.span,
            None => self.peek().span.before(),
        }
    }
}

/// The three-way result of applying a strategy.
#[derive(Debug)]
pub enum ParseOutcome<'a, T> {
    /// A node was produced; the cursor advanced past it.
    Success {
        /// The produced node
        node: T,
        /// Issues recovered from while producing the node
        issues: Vec<Issue>,
        /// Cursor after the node
        cursor: TokenCursor<'a>,
    },
    /// The strategy committed but could not complete a node.
    Malformed {
        /// Issues describing the failure
        issues: Vec<Issue>,
        /// Cursor past the attempted region
        cursor: TokenCursor<'a>,
    },
    /// The strategy did not commit; cursor unchanged, no issues.
    NoMatch,
}

impl<'a, T> ParseOutcome<'a, T> {
    /// A success with no issues.
    #[must_use]
    pub const fn success(node: T, cursor: TokenCursor<'a>) -> Self {
        Self::Success { node, issues: Vec::new(), cursor }
    }

    /// Maps the produced node, leaving issues and cursor untouched.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseOutcome<'a, U> {
        match self {
            Self::Success { node, issues, cursor } => {
                ParseOutcome::Success { node: f(node), issues, cursor }
            }
            Self::Malformed { issues, cursor } => ParseOutcome::Malformed { issues, cursor },
            Self::NoMatch => ParseOutcome::NoMatch,
        }
    }
}

/// A parsing operation with a three-way outcome.
///
/// Implemented for free by any `Fn(TokenCursor) -> ParseOutcome`, so grammar
/// rules are plain functions and combinators take `&dyn Strategy`.
pub trait Strategy<'a> {
    /// The node type this strategy produces.
    type Output;

    /// Applies the strategy at the given cursor.
    fn apply(&self, cursor: TokenCursor<'a>) -> ParseOutcome<'a, Self::Output>;
}

impl<'a, T, F> Strategy<'a> for F
where F: Fn(TokenCursor<'a>) -> ParseOutcome<'a, T>
{
    type Output = T;

    fn apply(&self, cursor: TokenCursor<'a>) -> ParseOutcome<'a, T> { self(cursor) }
}

/// An ordered union of strategies.
///
/// Each strategy runs in order; the first non-`NoMatch` outcome wins. The
/// ordering is what resolves grammar ambiguities deterministically.
#[derive(Clone, Copy)]
pub struct StrategyUnion<'s, 'a, T> {
    strategies: &'s [&'s dyn Strategy<'a, Output = T>],
}

impl<'s, 'a, T> StrategyUnion<'s, 'a, T> {
    /// Creates a union over the given ordered alternatives.
    #[must_use]
    pub const fn new(strategies: &'s [&'s dyn Strategy<'a, Output = T>]) -> Self {
        Self { strategies }
    }

    /// Applies the alternatives in order.
    pub fn apply(&self, cursor: TokenCursor<'a>) -> ParseOutcome<'a, T> {
        for strategy in self.strategies {
            match strategy.apply(cursor) {
                ParseOutcome::NoMatch => {}
                outcome => return outcome,
            }
        }

        ParseOutcome::NoMatch
    }
}

impl<T> std::fmt::Debug for StrategyUnion<'_, '_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyUnion").field("len", &self.strategies.len()).finish()
    }
}

/// Matches exactly one token of the given kind.
#[must_use]
pub fn single_token<'a>(kind: TokenKind) -> impl Strategy<'a, Output = Token<'a>> {
    move |cursor: TokenCursor<'a>| {
        if cursor.at(kind) {
            ParseOutcome::success(cursor.peek().clone(), cursor.advance())
        } else {
            ParseOutcome::NoMatch
        }
    }
}

/// Matches one identifier token, producing an [`Identifier`] node.
pub fn identifier(cursor: TokenCursor<'_>) -> ParseOutcome<'_, Identifier> {
    let token = cursor.peek();
    if token.kind == TokenKind::Identifier {
        ParseOutcome::success(Identifier::new(token.lexeme, token.span), cursor.advance())
    } else {
        ParseOutcome::NoMatch
    }
}

/// Repeats an element strategy until it reports `NoMatch`.
///
/// `Malformed` elements contribute their issues and parsing continues; if a
/// malformed element failed to advance the cursor, one token is skipped so
/// the sequence always makes progress.
pub fn repeated<'a, T>(
    start: TokenCursor<'a>,
    element: &dyn Strategy<'a, Output = T>,
) -> (Vec<T>, Vec<Issue>, TokenCursor<'a>) {
    let mut nodes = Vec::new();
    let mut issues = Vec::new();
    let mut cursor = start;

    loop {
        match element.apply(cursor) {
            ParseOutcome::Success { node, issues: inner, cursor: next } => {
                nodes.push(node);
                issues.extend(inner);
                cursor = ensure_progress(cursor, next);
            }
            ParseOutcome::Malformed { issues: inner, cursor: next } => {
                issues.extend(inner);
                cursor = ensure_progress(cursor, next);
            }
            ParseOutcome::NoMatch => break,
        }
    }

    (nodes, issues, cursor)
}

/// The result of an enclosed sequence: the elements plus bracket bookkeeping.
#[derive(Debug)]
pub struct Enclosed<T> {
    /// The parsed elements
    pub items: Vec<T>,
    /// Span of the opening token
    pub open_span: SourceSpan,
    /// Span of the closing token; zero-width when synthesized
    pub close_span: SourceSpan,
    /// True if the closing token was missing and had to be synthesized
    pub close_synthesized: bool,
    /// Span from the opener through the (possibly synthesized) closer
    pub span: SourceSpan,
}

/// Parses `open element* close`.
///
/// `NoMatch` when the opener is absent; the opener is the defining anchor.
/// Once the opener matched the outcome is always `Success`: tokens that fit
/// neither an element nor the closer are skipped with an `UnexpectedToken`
/// issue, and a missing closer is synthesized at the gap after the last
/// element with an `expected <close>` issue. Every enclosed production
/// therefore yields a well-formed node even on truncated input.
pub fn enclosed_sequence<'a, T>(
    start: TokenCursor<'a>,
    open: TokenKind,
    element: &dyn Strategy<'a, Output = T>,
    close: TokenKind,
) -> ParseOutcome<'a, Enclosed<T>> {
    if !start.at(open) {
        return ParseOutcome::NoMatch;
    }

    let open_span = start.peek().span;
    let mut cursor = start.advance();
    let mut items = Vec::new();
    let mut issues = Vec::new();

    loop {
        if cursor.at(close) {
            let close_span = cursor.peek().span;
            let node = Enclosed {
                items,
                open_span,
                close_span,
                close_synthesized: false,
                span: open_span.combine(&close_span),
            };
            return ParseOutcome::Success { node, issues, cursor: cursor.advance() };
        }

        if cursor.is_at_end() {
            let close_span = cursor.latest_span().after();
            issues.push(Issue::error(
                IssueCode::MissingToken,
                close_span,
                format!("expected closing {}", close.describe()),
            ));
            let node = Enclosed {
                items,
                open_span,
                close_span,
                close_synthesized: true,
                span: open_span.combine(&close_span),
            };
            return ParseOutcome::Success { node, issues, cursor };
        }

        match element.apply(cursor) {
            ParseOutcome::Success { node, issues: inner, cursor: next } => {
                items.push(node);
                issues.extend(inner);
                cursor = ensure_progress(cursor, next);
            }
            ParseOutcome::Malformed { issues: inner, cursor: next } => {
                issues.extend(inner);
                cursor = ensure_progress(cursor, next);
            }
            ParseOutcome::NoMatch => {
                let token = cursor.peek();
                issues.push(Issue::error(
                    IssueCode::UnexpectedToken,
                    token.span,
                    format!("unexpected {}", token.kind.describe()),
                ));
                cursor = cursor.advance();
            }
        }
    }
}

/// Guards against a strategy that reported progress without advancing.
fn ensure_progress<'a>(before: TokenCursor<'a>, after: TokenCursor<'a>) -> TokenCursor<'a> {
    if after.position() > before.position() || before.is_at_end() { after } else { before.advance() }
}

/// The result of a committed defining element.
#[derive(Debug)]
pub enum DefiningOutcome<T> {
    /// The element matched
    Matched(T),
    /// The element did not commit; the group should report `NoMatch`
    Absent,
    /// The element committed but is malformed; the group should finish
    /// malformed
    Broken,
}

/// State of a [`Group`] in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupState {
    /// All elements so far matched
    Matching,
    /// A required element was absent but was recovered or survived; the node
    /// can still be produced
    Recovered,
    /// A required element was absent and the node cannot be completed
    Malformed,
    /// A `stop_if_absent` element was absent; remaining elements are skipped
    /// without further missing-token errors
    Stopped,
}

/// A group parser: a fixed sequence of annotated elements.
///
/// Elements are *defining* (absence makes the whole group `NoMatch`),
/// *required* (absence after commitment emits a "missing X" issue), or
/// *optional* (absence is silent). A required element may additionally stop
/// the group when absent, which prevents cascading diagnostics after the
/// first structural failure.
#[derive(Debug)]
pub struct Group<'a> {
    cursor: TokenCursor<'a>,
    issues: Vec<Issue>,
    state: GroupState,
}

impl<'a> Group<'a> {
    /// Starts a group at the given cursor.
    #[must_use]
    pub const fn new(cursor: TokenCursor<'a>) -> Self {
        Self { cursor, issues: Vec::new(), state: GroupState::Matching }
    }

    /// The group's current cursor.
    #[must_use]
    pub const fn cursor(&self) -> TokenCursor<'a> { self.cursor }

    /// The zero-width span where a missing element would have been.
    #[must_use]
    pub fn gap(&self) -> SourceSpan { self.cursor.gap() }

    /// A defining element: absence means the whole group does not match.
    ///
    /// Returns `None` exactly when the caller should report `NoMatch`. Only
    /// use this for anchor strategies that cannot themselves be `Malformed`
    /// (single tokens, identifiers); anchors that commit before failing go
    /// through [`Group::defining_committed`].
    pub fn defining<T>(&mut self, strategy: &dyn Strategy<'a, Output = T>) -> Option<T> {
        match strategy.apply(self.cursor) {
            ParseOutcome::Success { node, issues, cursor } => {
                self.issues.extend(issues);
                self.cursor = cursor;
                Some(node)
            }
            ParseOutcome::Malformed { .. } | ParseOutcome::NoMatch => None,
        }
    }

    /// A defining element whose strategy can itself commit.
    ///
    /// A `Malformed` element means the anchor matched and decided the
    /// production, so the group is malformed rather than a non-match: the
    /// inner diagnostics survive and the caller's alternatives are not
    /// retried against half-consumed input.
    pub fn defining_committed<T>(
        &mut self,
        strategy: &dyn Strategy<'a, Output = T>,
    ) -> DefiningOutcome<T> {
        match strategy.apply(self.cursor) {
            ParseOutcome::Success { node, issues, cursor } => {
                self.issues.extend(issues);
                self.cursor = cursor;
                DefiningOutcome::Matched(node)
            }
            ParseOutcome::Malformed { issues, cursor } => {
                self.issues.extend(issues);
                self.cursor = ensure_progress(self.cursor, cursor);
                self.state = GroupState::Malformed;
                DefiningOutcome::Broken
            }
            ParseOutcome::NoMatch => DefiningOutcome::Absent,
        }
    }

    /// A required element with a synthesized fallback.
    ///
    /// On absence a "missing `what`" issue is emitted and `recover` builds a
    /// placeholder from the gap span, so the group can still produce a node.
    pub fn required_or<T>(
        &mut self,
        strategy: &dyn Strategy<'a, Output = T>,
        what: &str,
        recover: impl FnOnce(SourceSpan) -> T,
    ) -> T {
        match self.run_required(strategy, what) {
            Some(node) => node,
            None => recover(self.gap()),
        }
    }

    /// A required element without a fallback.
    ///
    /// On absence the group becomes malformed; the caller gets `None` and the
    /// final outcome from [`Group::finish`] will be `Malformed`.
    pub fn required<T>(
        &mut self,
        strategy: &dyn Strategy<'a, Output = T>,
        what: &str,
    ) -> Option<T> {
        let node = self.run_required(strategy, what);
        if node.is_none() && self.state != GroupState::Stopped {
            self.state = GroupState::Malformed;
        }

        node
    }

    /// A required element that stops the group when absent.
    ///
    /// Remaining elements are skipped without emitting further missing-token
    /// errors.
    pub fn required_stop<T>(
        &mut self,
        strategy: &dyn Strategy<'a, Output = T>,
        what: &str,
    ) -> Option<T> {
        let node = self.run_required(strategy, what);
        if node.is_none() {
            self.state = GroupState::Stopped;
        }

        node
    }

    /// An optional element: absence is silent.
    pub fn optional<T>(&mut self, strategy: &dyn Strategy<'a, Output = T>) -> Option<T> {
        if matches!(self.state, GroupState::Stopped) {
            return None;
        }

        match strategy.apply(self.cursor) {
            ParseOutcome::Success { node, issues, cursor } => {
                self.issues.extend(issues);
                self.cursor = cursor;
                Some(node)
            }
            ParseOutcome::Malformed { issues, cursor } => {
                self.issues.extend(issues);
                self.cursor = ensure_progress(self.cursor, cursor);
                None
            }
            ParseOutcome::NoMatch => None,
        }
    }

    /// Finishes the group, producing the node built by the caller.
    pub fn finish<N>(self, node: N) -> ParseOutcome<'a, N> {
        match self.state {
            GroupState::Matching | GroupState::Recovered => {
                ParseOutcome::Success { node, issues: self.issues, cursor: self.cursor }
            }
            GroupState::Malformed | GroupState::Stopped => {
                ParseOutcome::Malformed { issues: self.issues, cursor: self.cursor }
            }
        }
    }

    /// Finishes the group malformed regardless of element state.
    pub fn finish_malformed<N>(self) -> ParseOutcome<'a, N> {
        ParseOutcome::Malformed { issues: self.issues, cursor: self.cursor }
    }

    /// Consumes one token of the given kind, reporting it when absent.
    ///
    /// Unlike [`Group::required`] the group still produces its node: this is
    /// for terminators and closers whose absence should not discard an
    /// otherwise complete definition.
    pub fn expect_token(&mut self, kind: TokenKind, what: &str) -> Option<SourceSpan> {
        if matches!(self.state, GroupState::Stopped) {
            return None;
        }

        if self.cursor.at(kind) {
            let span = self.cursor.peek().span;
            self.cursor = self.cursor.advance();
            Some(span)
        } else {
            self.issues.push(Issue::error(
                IssueCode::MissingToken,
                self.gap(),
                format!("missing {what}"),
            ));
            if self.state == GroupState::Matching {
                self.state = GroupState::Recovered;
            }
            None
        }
    }

    /// Consumes one token of the given kind if present.
    pub fn eat_token(&mut self, kind: TokenKind) -> Option<SourceSpan> {
        if matches!(self.state, GroupState::Stopped) || !self.cursor.at(kind) {
            return None;
        }

        let span = self.cursor.peek().span;
        self.cursor = self.cursor.advance();
        Some(span)
    }

    /// Pushes an issue into the group's accumulator.
    pub fn report(&mut self, issue: Issue) { self.issues.push(issue); }

    /// Runs a required element, reporting its absence.
    fn run_required<T>(
        &mut self,
        strategy: &dyn Strategy<'a, Output = T>,
        what: &str,
    ) -> Option<T> {
        if matches!(self.state, GroupState::Stopped) {
            return None;
        }

        match strategy.apply(self.cursor) {
            ParseOutcome::Success { node, issues, cursor } => {
                self.issues.extend(issues);
                self.cursor = cursor;
                Some(node)
            }
            ParseOutcome::Malformed { issues, cursor } => {
                self.issues.extend(issues);
                self.cursor = ensure_progress(self.cursor, cursor);
                if self.state == GroupState::Matching {
                    self.state = GroupState::Recovered;
                }
                None
            }
            ParseOutcome::NoMatch => {
                self.issues.push(Issue::error(
                    IssueCode::MissingToken,
                    self.gap(),
                    format!("missing {what}"),
                ));
                None
            }
        }
    }
}
