//! Source text, positions, and spans.
//!
//! Everything downstream of the lexer talks about source locations through
//! the types here: a [`Position`] is one point in a file, a [`SourceSpan`]
//! is a half-open range between two points, and a [`SourceFile`] owns the
//! text together with a line index so byte offsets can be turned into
//! line/column pairs cheaply. The [`SourceManager`] hands out stable
//! [`FileID`]s for the handful of files a compile reads (the prelude and the
//! user's source).
//!
//! Spans also carry the small algebra diagnostics and error recovery need:
//! [`SourceSpan::combine`] for covering two spans, and
//! [`SourceSpan::before`] / [`SourceSpan::after`] for the zero-width points
//! where synthesized tokens and missing-return diagnostics are anchored.

use std::fmt;
use std::ops::Range;

/// Identifies one file held by a [`SourceManager`].
///
/// The default id `0` names no file; it is what placeholder spans carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct FileID(usize);

impl FileID {
    /// Wraps a raw id.
    #[must_use]
    pub const fn new(id: usize) -> Self { Self(id) }

    /// Unwraps the raw id.
    #[must_use]
    pub const fn value(&self) -> usize { self.0 }
}

/// One point in a source file.
///
/// `line` and `column` are 1-based, the way editors count; `offset` is the
/// 0-based byte offset and is what all span arithmetic actually compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// 1-based line number
    pub line: usize,
    /// 1-based column number
    pub column: usize,
    /// 0-based byte offset
    pub offset: usize,
}

impl Position {
    /// Builds a position from its three coordinates.
    #[must_use]
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

/// A range of source text: start inclusive, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceSpan {
    /// Where the span begins
    pub start: Position,
    /// Where the span ends (exclusive)
    pub end: Position,
    /// The file both endpoints lie in
    pub file_id: FileID,
}

impl SourceSpan {
    /// Builds a span from its endpoints.
    #[must_use]
    pub const fn new(start: Position, end: Position, file_id: FileID) -> Self {
        Self { start, end, file_id }
    }

    /// True for zero-width spans, such as synthesized-token anchors.
    #[must_use]
    pub const fn is_empty(&self) -> bool { self.start.offset == self.end.offset }

    /// The smallest span covering this one and `other`.
    ///
    /// ## Panics
    ///
    /// Panics when the spans belong to different files.
    #[must_use]
    pub fn combine(&self, other: &Self) -> Self {
        assert_eq!(self.file_id, other.file_id, "spans can only be combined within one file");

        let start = if other.start.offset < self.start.offset { other.start } else { self.start };
        let end = if other.end.offset > self.end.offset { other.end } else { self.end };

        Self { start, end, file_id: self.file_id }
    }

    /// The zero-width span at this span's start.
    ///
    /// Anchors synthesized nodes (a missing name, say) in front of the
    /// construct they belong to.
    #[must_use]
    pub const fn before(&self) -> Self {
        Self { start: self.start, end: self.start, file_id: self.file_id }
    }

    /// The zero-width span at this span's end.
    ///
    /// Anchors synthesized closers and missing-return diagnostics.
    #[must_use]
    pub const fn after(&self) -> Self {
        Self { start: self.end, end: self.end, file_id: self.file_id }
    }

    /// True when `other` lies fully inside this span.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.file_id == other.file_id
            && self.start.offset <= other.start.offset
            && other.end.offset <= self.end.offset
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}..{}:{} in file {}",
            self.start.line,
            self.start.column,
            self.end.line,
            self.end.column,
            self.file_id.value()
        )
    }
}

/// One source file: its name, its text, and a line index over the text.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// The file's id within its manager
    pub id: FileID,
    /// The name diagnostics print (usually the path it was read from)
    pub name: String,
    /// The file's full text
    pub content: String,
    /// Byte offset of the first character of each line
    line_offsets: Vec<usize>,
}

impl SourceFile {
    /// Wraps source text, building the line index up front.
    #[must_use]
    pub fn new(id: FileID, name: String, content: String) -> Self {
        let line_offsets = index_lines(&content);
        Self { id, name, content, line_offsets }
    }

    /// The span covering the given byte range.
    ///
    /// ## Panics
    ///
    /// Panics when the range reaches past the end of the text.
    #[must_use]
    pub fn span(&self, bytes: Range<usize>) -> SourceSpan {
        SourceSpan::new(self.locate(bytes.start), self.locate(bytes.end), self.id)
    }

    /// The zero-width span at the very end of the text.
    ///
    /// This is where the end-of-file token lives, and with it every closer
    /// synthesized for input truncated at end of file.
    #[must_use]
    pub fn end_span(&self) -> SourceSpan {
        let terminus = self.locate(self.content.len());
        SourceSpan::new(terminus, terminus, self.id)
    }

    /// The span of the whole file; every token and node span lies inside it.
    #[must_use]
    pub fn extent(&self) -> SourceSpan { self.span(0..self.content.len()) }

    /// The text of the given 1-based line, without its newline.
    ///
    /// ## Panics
    ///
    /// Panics when the line number is zero or past the last line.
    #[must_use]
    pub fn line_text(&self, line: usize) -> &str {
        let from = self.line_offsets[line - 1];
        let until = self.line_offsets.get(line).map_or(self.content.len(), |&next| next - 1);

        &self.content[from..until]
    }

    /// How many lines the file has; the empty file counts as one.
    #[must_use]
    pub fn line_count(&self) -> usize { self.line_offsets.len() }

    /// Expands a byte offset into a full position via the line index.
    fn locate(&self, offset: usize) -> Position {
        assert!(offset <= self.content.len(), "offset {offset} lies outside `{}`", self.name);

        // partition_point counts the lines beginning at or before the
        // offset, which is exactly the 1-based line number.
        let line = self.line_offsets.partition_point(|&at| at <= offset);
        let column = offset - self.line_offsets[line - 1] + 1;

        Position::new(line, column, offset)
    }
}

/// Byte offsets of every line start, beginning with line one at offset zero.
fn index_lines(text: &str) -> Vec<usize> {
    std::iter::once(0).chain(text.match_indices('\n').map(|(at, _)| at + 1)).collect()
}

/// Owns the files of one compile and the ids naming them.
///
/// Backed by a plain vector: ids are slot numbers offset by one, so the
/// default [`FileID`] of `0` resolves to nothing.
#[derive(Debug, Clone, Default)]
pub struct SourceManager {
    files: Vec<SourceFile>,
}

impl SourceManager {
    /// An empty manager.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Takes ownership of a file's text and returns the id that names it.
    pub fn add_file(&mut self, name: String, content: String) -> FileID {
        let id = FileID::new(self.files.len() + 1);
        self.files.push(SourceFile::new(id, name, content));

        id
    }

    /// The file named by `id`, unless the id is the placeholder or stale.
    #[must_use]
    pub fn get_file(&self, id: FileID) -> Option<&SourceFile> {
        id.value().checked_sub(1).and_then(|slot| self.files.get(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(content: &str) -> SourceFile {
        SourceFile::new(FileID::new(1), "test.co".to_string(), content.to_string())
    }

    #[test]
    fn test_locate_at_line_boundaries() {
        let f = file("ab\ncd\n");

        // Start, mid-line, first char of a later line, end of text.
        assert_eq!(f.span(0..1).start, Position::new(1, 1, 0));
        assert_eq!(f.span(1..2).start, Position::new(1, 2, 1));
        assert_eq!(f.span(3..4).start, Position::new(2, 1, 3));
        assert_eq!(f.end_span().start, Position::new(3, 1, 6));
    }

    #[test]
    fn test_combine_is_symmetric() {
        let f = file("hello world");
        let left = f.span(0..5);
        let right = f.span(6..11);

        assert_eq!(left.combine(&right), f.span(0..11));
        assert_eq!(right.combine(&left), f.span(0..11));
    }

    #[test]
    fn test_before_and_after_are_zero_width() {
        let f = file("hello");
        let span = f.span(1..4);

        assert!(span.before().is_empty());
        assert!(span.after().is_empty());
        assert_eq!(span.before().start.offset, 1);
        assert_eq!(span.after().start.offset, 4);
    }

    #[test]
    fn test_extent_contains_all_spans() {
        let f = file("line one\nline two\n");
        let extent = f.extent();

        assert!(extent.contains(&f.span(0..4)));
        assert!(extent.contains(&f.span(9..17)));
        assert!(extent.contains(&f.end_span()));
    }

    #[test]
    fn test_line_text_excludes_newline() {
        let f = file("first\nsecond\n");

        assert_eq!(f.line_text(1), "first");
        assert_eq!(f.line_text(2), "second");
        assert_eq!(f.line_count(), 3);
    }

    #[test]
    fn test_manager_ids_start_at_one() {
        let mut sources = SourceManager::new();
        let id = sources.add_file("a.co".to_string(), "x".to_string());

        assert_eq!(id, FileID::new(1));
        assert!(sources.get_file(FileID::default()).is_none());
        assert!(sources.get_file(id).is_some());
    }
}
