/// Positions, ranges and selections in line/column space.
use anyhow::{bail, Result};

/// Represents a position in the text as line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// 0-indexed line number.
    pub line: usize,
    /// 0-indexed column (char offset within the line).
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line.cmp(&other.line).then(self.col.cmp(&other.col))
    }
}

/// A half-open span of text, `start..end` in document order.
///
/// Construction goes through [`TextRange::new`], so `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    start: Position,
    end: Position,
}

impl TextRange {
    /// Creates a range, rejecting a start that lies after the end.
    pub fn new(start: Position, end: Position) -> Result<Self> {
        if start > end {
            bail!(
                "invalid range: start {}:{} is after end {}:{}",
                start.line,
                start.col,
                end.line,
                end.col
            );
        }
        Ok(Self { start, end })
    }

    /// An empty range at `pos`, i.e. an insertion point.
    pub fn caret(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Number of line boundaries covered by the range.
    pub fn line_span(&self) -> usize {
        self.end.line - self.start.line
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

/// A selection range within the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// The anchor (start) of the selection.
    pub anchor: Position,
    /// The head (end / cursor) of the selection.
    pub head: Position,
}

impl Selection {
    pub fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    /// A collapsed selection: just a cursor on `line`.
    pub fn cursor(line: usize) -> Self {
        let pos = Position::new(line, 0);
        Self {
            anchor: pos,
            head: pos,
        }
    }

    /// Returns the start (min) position of the selection.
    pub fn start(&self) -> Position {
        std::cmp::min(self.anchor, self.head)
    }

    /// Returns the end (max) position of the selection.
    pub fn end(&self) -> Position {
        std::cmp::max(self.anchor, self.head)
    }

    /// The line the cursor sits on.
    pub fn active_line(&self) -> usize {
        self.head.line
    }

    pub fn spans_lines(&self) -> bool {
        self.start().line < self.end().line
    }
}
