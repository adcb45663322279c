//! Cursor positions and the column clamping rules.
//!
//! ## Learning: Newtype Pattern
//!
//! `Position` is a struct that wraps line/column coordinates.
//! This is better than using `(usize, usize)` because:
//! - Type safety: Can't accidentally swap line and column
//! - Named fields: Self-documenting code
//! - Methods: Can add behavior specific to positions

use serde::{Deserialize, Serialize};

/// A position in the text buffer (line and column).
///
/// Both line and column are 0-indexed. Columns count characters
/// (Unicode scalar values), not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed, in characters not bytes)
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position at the start of the document.
    pub const ZERO: Position = Position { line: 0, column: 0 };
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.line.cmp(&other.line) {
            std::cmp::Ordering::Equal => self.column.cmp(&other.column),
            other => other,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display as 1-indexed for user-facing output
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// How far right the cursor may sit on a line.
///
/// ## Learning: Block vs Caret Cursors
///
/// A block cursor covers a character, so on a line of length `n` the
/// last legal column is `n - 1`. A caret sits *between* characters, so
/// it may also rest after the last one, at column `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColumnBound {
    /// The cursor occupies a character: `[0, max(len - 1, 0)]`.
    #[default]
    OnChar,
    /// The cursor may sit past the last character: `[0, len]`.
    PastEnd,
}

impl ColumnBound {
    /// Returns the largest legal column on a line of `line_len` characters.
    #[inline]
    pub fn max_column(self, line_len: usize) -> usize {
        match self {
            ColumnBound::OnChar => line_len.saturating_sub(1),
            ColumnBound::PastEnd => line_len,
        }
    }

    /// Clamps `column` into the legal range for a line of `line_len` characters.
    #[inline]
    pub fn clamp(self, column: usize, line_len: usize) -> usize {
        column.min(self.max_column(line_len))
    }
}
