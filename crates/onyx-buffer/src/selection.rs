//! Visual-mode selection.
//!
//! ## Learning: Range Types
//!
//! Rust's standard library has `Range<T>` (exclusive end) and
//! `RangeInclusive<T>` (inclusive end). Modal editors select with a
//! block cursor, so both the anchor character and the head character
//! belong to the selection: we model it as an inclusive range and only
//! convert to an exclusive char range at the rope boundary.

use crate::Position;
use serde::{Deserialize, Serialize};

/// A selection between an anchor and a moving head.
///
/// The anchor stays where the selection started; the head follows the
/// cursor. Either may come first in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Where the selection started
    pub anchor: Position,
    /// The moving end, tracking the cursor
    pub head: Position,
}

impl Selection {
    /// Creates a new directed selection.
    pub fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    /// Creates a zero-width selection covering the single character at `position`.
    pub fn at(position: Position) -> Self {
        Self::new(position, position)
    }

    /// Returns the endpoints in document order: `(start, end)`, both inclusive.
    pub fn ordered(&self) -> (Position, Position) {
        if self.anchor <= self.head {
            (self.anchor, self.head)
        } else {
            (self.head, self.anchor)
        }
    }

    /// Returns the start position.
    pub fn start(&self) -> Position {
        self.ordered().0
    }

    /// Returns the end position (inclusive).
    pub fn end(&self) -> Position {
        self.ordered().1
    }

    /// Moves the head, keeping the anchor fixed.
    pub fn extend_to(&mut self, position: Position) {
        self.head = position;
    }
}
