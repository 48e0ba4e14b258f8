//! Source location tracking

use std::fmt;

/// Source position (line, column, and character offset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (0-indexed, in characters)
    pub column: usize,
    /// Character offset from start of file
    pub offset: usize,
}

impl Position {
    /// Create a new position
    #[inline]
    pub fn with_offset(
        line: usize,
        column: usize,
        offset: usize,
    ) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Create a dummy position
    #[inline]
    pub fn dummy() -> Self {
        Self {
            line: 0,
            column: 0,
            offset: 0,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Source span (start position to end position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    /// Create a new span
    #[inline]
    pub fn new(
        start: Position,
        end: Position,
    ) -> Self {
        Self { start, end }
    }

    /// Create a dummy span, used for nodes synthesized by the compressor
    #[inline]
    pub fn dummy() -> Self {
        Self {
            start: Position::dummy(),
            end: Position::dummy(),
        }
    }

    /// Check if this is a dummy span
    #[inline]
    pub fn is_dummy(&self) -> bool {
        self.start.line == 0
    }

    /// Span covering both `self` and `other`
    pub fn merge(
        &self,
        other: &Span,
    ) -> Span {
        if self.is_dummy() {
            return *other;
        }
        if other.is_dummy() {
            return *self;
        }
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "[{} - {}]", self.start, self.end)
    }
}

/// Source file information
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name
    pub name: String,
    /// File content
    pub content: String,
    /// Byte offsets of each line start
    line_offsets: Vec<usize>,
}

impl SourceFile {
    /// Create a new source file
    pub fn new(
        name: String,
        content: String,
    ) -> Self {
        let mut line_offsets = vec![0];
        for (i, c) in content.char_indices() {
            if c == '\n' {
                line_offsets.push(i + 1);
            }
        }

        Self {
            name,
            content,
            line_offsets,
        }
    }

    /// Number of lines in the file
    pub fn line_count(&self) -> usize {
        self.line_offsets.len()
    }

    /// Text of a 1-indexed line, without its terminator
    pub fn line(
        &self,
        line: usize,
    ) -> Option<&str> {
        if line == 0 || line > self.line_offsets.len() {
            return None;
        }
        let start = self.line_offsets[line - 1];
        let end = self
            .line_offsets
            .get(line)
            .map(|next| next - 1)
            .unwrap_or(self.content.len());
        self.content
            .get(start..end)
            .map(|text| text.trim_end_matches('\r'))
    }
}
