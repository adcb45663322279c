//! Undo/redo history management.
//!
//! ## Learning: The Command Pattern
//!
//! Each edit is stored as a record that can be:
//! - Undone (its inverse applied to the rope)
//! - Redone (re-applied after undo)
//!
//! Edits are collected into groups. A group is one undo step: the
//! caller opens a group for a whole Insert-mode session, or for a
//! composite command such as delete-line, and every primitive edit made
//! while it is open lands in the same step.

use crate::Position;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// The type of edit operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditKind {
    /// Text was inserted
    Insert,
    /// Text was deleted
    Delete,
}

/// A single edit operation.
///
/// ## Learning: Clone vs Copy
///
/// `Edit` implements `Clone` but not `Copy` because it contains
/// a `String`, which owns heap memory. `Copy` is only for types
/// that can be duplicated with a simple memory copy (like integers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    /// What kind of edit this is
    pub kind: EditKind,
    /// Character index where the edit occurred
    pub position: usize,
    /// The text that was inserted or deleted
    pub content: String,
}

impl Edit {
    /// Creates an insert edit.
    pub fn insert(position: usize, content: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Insert,
            position,
            content: content.into(),
        }
    }

    /// Creates a delete edit.
    pub fn delete(position: usize, content: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Delete,
            position,
            content: content.into(),
        }
    }

    /// Returns the inverse of this edit (for undo).
    pub fn inverse(&self) -> Self {
        Self {
            kind: match self.kind {
                EditKind::Insert => EditKind::Delete,
                EditKind::Delete => EditKind::Insert,
            },
            position: self.position,
            content: self.content.clone(),
        }
    }

    /// Number of characters this edit covers.
    pub fn len_chars(&self) -> usize {
        self.content.chars().count()
    }

    /// Returns true if this edit can be coalesced with the one that follows it.
    ///
    /// Two edits can be coalesced if:
    /// - They're the same kind
    /// - They're adjacent (next character for insert, backspace or forward delete)
    /// - Neither is a newline
    pub fn can_coalesce(&self, other: &Edit) -> bool {
        if self.kind != other.kind {
            return false;
        }

        if self.content.contains('\n') || other.content.contains('\n') {
            return false;
        }

        match self.kind {
            EditKind::Insert => self.position + self.len_chars() == other.position,
            EditKind::Delete => {
                other.position + other.len_chars() == self.position
                    || self.position == other.position
            }
        }
    }

    /// Coalesces the following edit into this one.
    pub fn coalesce(&mut self, other: Edit) {
        match self.kind {
            EditKind::Insert => {
                self.content.push_str(&other.content);
            }
            EditKind::Delete => {
                if other.position < self.position {
                    // Backspace: prepend
                    self.content = other.content + &self.content;
                    self.position = other.position;
                } else {
                    // Forward delete: append
                    self.content.push_str(&other.content);
                }
            }
        }
    }
}

/// A group of edits that is undone/redone as one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditGroup {
    /// The edits in this group, in the order they were applied
    pub edits: Vec<Edit>,
    /// Cursor before the first edit; restored by undo
    pub cursor_before: Position,
    /// Cursor after the last edit; restored by redo
    pub cursor_after: Position,
}

impl EditGroup {
    fn new(edit: Edit, cursor_before: Position, cursor_after: Position) -> Self {
        Self {
            edits: vec![edit],
            cursor_before,
            cursor_after,
        }
    }

    fn push(&mut self, edit: Edit, cursor_after: Position) {
        match self.edits.last_mut() {
            Some(last) if last.can_coalesce(&edit) => last.coalesce(edit),
            _ => self.edits.push(edit),
        }
        self.cursor_after = cursor_after;
    }
}

/// Manages undo/redo history.
///
/// ## Design Decisions
///
/// 1. **Bounded history**: Limits memory usage for long editing sessions
/// 2. **Explicit grouping**: Nestable `begin_group`/`end_group`, the
///    outermost pair delimits one undo step
/// 3. **Linear redo**: Any new edit clears the redo stack
///
/// ## Learning: VecDeque
///
/// We use `VecDeque` instead of `Vec` because we need efficient:
/// - Push to back (new edits)
/// - Pop from front (when at capacity)
/// - Pop from back (for undo)
#[derive(Debug, Clone)]
pub struct History {
    /// Stack of undoable edit groups
    undo_stack: VecDeque<EditGroup>,
    /// Stack of redoable edit groups
    redo_stack: Vec<EditGroup>,
    /// Maximum number of edit groups to keep
    max_size: usize,
    /// Nesting depth of open groups
    depth: usize,
    /// Whether the last undo group still accepts edits
    open: bool,
    /// Cursor when the outermost open group began
    group_cursor: Option<Position>,
}

impl History {
    /// Creates a new history with the given capacity.
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_size,
            depth: 0,
            open: false,
            group_cursor: None,
        }
    }

    /// Records an edit together with the cursor around it.
    ///
    /// Clears the redo stack (can't redo after new edit).
    pub fn push(&mut self, edit: Edit, cursor_before: Position, cursor_after: Position) {
        self.redo_stack.clear();

        if self.open {
            if let Some(group) = self.undo_stack.back_mut() {
                group.push(edit, cursor_after);
                return;
            }
        }

        let cursor_before = self.group_cursor.unwrap_or(cursor_before);
        self.undo_stack
            .push_back(EditGroup::new(edit, cursor_before, cursor_after));
        self.open = self.depth > 0;

        while self.undo_stack.len() > self.max_size {
            self.undo_stack.pop_front();
        }
    }

    /// Starts an edit group.
    ///
    /// All edits until the matching `end_group()` are one undo step.
    /// Nested calls join the outermost group, and undoing the step puts
    /// the cursor back where the outermost group began.
    pub fn begin_group(&mut self, cursor: Position) {
        if self.depth == 0 {
            self.open = false;
            self.group_cursor = Some(cursor);
        }
        self.depth += 1;
    }

    /// Ends the current edit group.
    pub fn end_group(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.open = false;
            self.group_cursor = None;
        }
    }

    /// Pops the last group for undo and moves it to the redo stack.
    ///
    /// The caller applies the inverses of `edits` in reverse order.
    pub fn undo(&mut self) -> Option<EditGroup> {
        let group = self.undo_stack.pop_back()?;
        self.open = false;
        self.redo_stack.push(group.clone());
        Some(group)
    }

    /// Pops the last undone group and moves it back to the undo stack.
    pub fn redo(&mut self) -> Option<EditGroup> {
        let group = self.redo_stack.pop()?;
        self.open = false;
        self.undo_stack.push_back(group.clone());
        Some(group)
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[cfg(test)]
    fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }
}
