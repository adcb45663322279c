//! Core text buffer implementation using rope data structure.
//!
//! ## Why Rope?
//!
//! Traditional text editors use gap buffers or arrays, but ropes excel at:
//! - **Large files**: O(log n) insertions/deletions vs O(n) for arrays
//! - **Line lookup**: line-to-char conversion without scanning the document
//!
//! ## Learning: Invariants by Construction
//!
//! Every public method leaves the cursor inside the document and inside
//! the column range allowed by the current [`ColumnBound`]. Methods never
//! return errors: out-of-range requests are clamped instead.

use ropey::Rope;
use std::borrow::Cow;
use std::ops::Range;

use crate::history::{Edit, EditKind, History};
use crate::{ColumnBound, Position, Selection};

/// A text buffer backed by a rope, with a single cursor and an optional
/// visual selection.
#[derive(Debug, Clone)]
pub struct Buffer {
    /// The rope holding our text content
    rope: Rope,

    /// The cursor, always valid for `bound`
    cursor: Position,

    /// Active visual selection
    selection: Option<Selection>,

    /// Column clamping rule currently in force
    bound: ColumnBound,

    /// Edit history for undo/redo
    history: History,

    /// Bumped on every mutation of the text
    version: u64,
}

/// Configuration for buffer behavior
#[derive(Debug, Clone)]
pub struct BufferConfig {
    /// Maximum undo steps to keep
    pub max_history: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self { max_history: 1000 }
    }
}

impl Buffer {
    /// Creates a new empty buffer.
    ///
    /// # Example
    /// ```
    /// use onyx_buffer::Buffer;
    ///
    /// let buffer = Buffer::new();
    /// assert!(buffer.is_empty());
    /// assert_eq!(buffer.line_count(), 1);
    /// ```
    pub fn new() -> Self {
        Self::with_config("", BufferConfig::default())
    }

    /// Creates a buffer holding `text` with custom configuration.
    ///
    /// The cursor starts at the top-left.
    pub fn with_config(text: &str, config: BufferConfig) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Position::ZERO,
            selection: None,
            bound: ColumnBound::OnChar,
            history: History::new(config.max_history),
            version: 0,
        }
    }

    // ==================== Text Access ====================

    /// Returns the entire text content as a `Cow<str>`.
    ///
    /// # Learning: Cow (Clone-on-Write)
    ///
    /// For small buffers, this returns a borrowed reference (cheap).
    /// For large buffers spanning multiple rope chunks, it allocates.
    #[inline]
    pub fn text(&self) -> Cow<'_, str> {
        self.rope.slice(..).into()
    }

    /// Returns the text of a line, without its terminator.
    ///
    /// # Panics
    ///
    /// Panics if `line_idx >= self.line_count()`. Callers validate the
    /// index first; an out-of-range line is a programming error.
    pub fn line(&self, line_idx: usize) -> String {
        let slice = self.rope.line(line_idx);
        let len = self.line_len(line_idx);
        slice.slice(..len).to_string()
    }

    /// Returns the number of characters in a line, excluding the terminator.
    ///
    /// # Panics
    ///
    /// Panics if `line_idx >= self.line_count()`.
    pub fn line_len(&self, line_idx: usize) -> usize {
        let slice = self.rope.line(line_idx);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    // ==================== Measurements ====================

    /// Returns true if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Returns the number of characters in the buffer.
    #[inline]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the number of lines in the buffer.
    ///
    /// An empty buffer has 1 line. A buffer ending with `\n` counts
    /// the empty line after it.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Returns a counter that increases on every text mutation.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    // ==================== Cursor State ====================

    /// Returns the cursor position.
    #[inline]
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Returns the active selection, if any.
    #[inline]
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Returns the column clamping rule in force.
    #[inline]
    pub fn column_bound(&self) -> ColumnBound {
        self.bound
    }

    /// Switches the column clamping rule and re-clamps the cursor.
    pub fn set_column_bound(&mut self, bound: ColumnBound) {
        self.bound = bound;
        self.clamp_cursor();
    }

    /// Places the cursor at `position`, clamped into the document.
    pub fn move_to(&mut self, position: Position) {
        self.cursor = self.clamp_position(position, self.bound);
    }

    // ==================== Mutations ====================

    /// Inserts text at the cursor and advances the cursor past it.
    ///
    /// Each embedded `\n` moves the cursor to column 0 of the next line.
    pub fn insert(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        let before = self.cursor;
        let char_idx = self.cursor_char_idx();
        self.rope.insert(char_idx, text);
        self.version += 1;

        for ch in text.chars() {
            if ch == '\n' {
                self.cursor.line += 1;
                self.cursor.column = 0;
            } else {
                self.cursor.column += 1;
            }
        }
        self.clamp_cursor();

        self.record(Edit::insert(char_idx, text), before);
    }

    /// Inserts `text` at the cursor; used at call sites that hold yanked text.
    pub fn paste(&mut self, text: &str) {
        self.insert(text);
    }

    /// Deletes the character immediately before the cursor (backspace).
    ///
    /// At column 0 the line is joined onto the previous one and the cursor
    /// lands on the join point. Does nothing at the start of the document.
    pub fn delete_before(&mut self) {
        let char_idx = self.cursor_char_idx();
        if char_idx == 0 {
            return;
        }

        let before = self.cursor;
        let target = if self.cursor.column == 0 {
            // Measured before the join
            let prev = self.cursor.line - 1;
            Position::new(prev, self.line_len(prev))
        } else {
            Position::new(self.cursor.line, self.cursor.column - 1)
        };

        let removed = self.remove(char_idx - 1..char_idx);
        self.cursor = target;
        self.clamp_cursor();
        self.record(Edit::delete(char_idx - 1, removed), before);
    }

    /// Deletes the character under the cursor.
    ///
    /// Does nothing on an empty line or when the cursor is past the last
    /// character. Afterwards the column is clamped with the block-cursor
    /// rule, so it always lands on a character of the shortened line.
    pub fn delete_char_at_cursor(&mut self) {
        let line_len = self.line_len(self.cursor.line);
        if line_len == 0 || self.cursor.column >= line_len {
            return;
        }

        let before = self.cursor;
        let char_idx = self.cursor_char_idx();
        let removed = self.remove(char_idx..char_idx + 1);
        self.cursor.column = ColumnBound::OnChar.clamp(self.cursor.column, line_len - 1);
        self.record(Edit::delete(char_idx, removed), before);
    }

    /// Deletes the newline ending the cursor's line, joining the next line on.
    ///
    /// Returns `false` (and does nothing) on the last line.
    pub fn delete_line_terminator(&mut self) -> bool {
        let line = self.cursor.line;
        if line + 1 >= self.line_count() {
            return false;
        }

        let before = self.cursor;
        let char_idx = self.rope.line_to_char(line) + self.line_len(line);
        let removed = self.remove(char_idx..char_idx + 1);
        self.clamp_cursor();
        self.record(Edit::delete(char_idx, removed), before);
        true
    }

    // ==================== Movement ====================

    /// Moves left without crossing line boundaries.
    pub fn move_left(&mut self) {
        self.cursor.column = self.cursor.column.saturating_sub(1);
        self.clamp_cursor();
    }

    /// Moves right without crossing line boundaries.
    pub fn move_right(&mut self) {
        self.cursor.column += 1;
        self.clamp_cursor();
    }

    /// Moves up one line, clamping the column to the new line.
    pub fn move_up(&mut self) {
        if self.cursor.line > 0 {
            self.cursor.line -= 1;
        }
        self.clamp_cursor();
    }

    /// Moves down one line, clamping the column to the new line.
    pub fn move_down(&mut self) {
        if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
        }
        self.clamp_cursor();
    }

    /// Moves to the first character of the current line.
    pub fn move_line_start(&mut self) {
        self.cursor.column = 0;
    }

    /// Moves to the last legal column of the current line.
    pub fn move_line_end(&mut self) {
        let line_len = self.line_len(self.cursor.line);
        self.cursor.column = self.bound.max_column(line_len);
    }

    /// Advances to the start of the next word, staying on the current line.
    ///
    /// Skips the rest of the word under the cursor, then any non-word
    /// characters. Lands on end of line when no word follows.
    pub fn move_word_forward(&mut self) {
        let chars = self.line_chars(self.cursor.line);
        let mut col = self.cursor.column;
        while col < chars.len() && is_word_char(chars[col]) {
            col += 1;
        }
        while col < chars.len() && !is_word_char(chars[col]) {
            col += 1;
        }
        self.cursor.column = self.bound.clamp(col, chars.len());
    }

    /// Moves back to the start of the previous word, staying on the current line.
    pub fn move_word_back(&mut self) {
        let chars = self.line_chars(self.cursor.line);
        let mut col = self.cursor.column.min(chars.len());
        if col == 0 {
            return;
        }
        col -= 1;
        while col > 0 && !is_word_char(chars[col]) {
            col -= 1;
        }
        while col > 0 && is_word_char(chars[col - 1]) {
            col -= 1;
        }
        self.cursor.column = self.bound.clamp(col, chars.len());
    }

    /// Moves to the last character of the current or next word, staying on
    /// the current line.
    pub fn move_word_end(&mut self) {
        let chars = self.line_chars(self.cursor.line);
        let mut col = self.cursor.column + 1;
        while col < chars.len() && !is_word_char(chars[col]) {
            col += 1;
        }
        while col + 1 < chars.len() && is_word_char(chars[col + 1]) {
            col += 1;
        }
        self.cursor.column = self.bound.clamp(col, chars.len());
    }

    /// Jumps to line 0, column 0.
    pub fn move_first_line(&mut self) {
        self.cursor = Position::ZERO;
    }

    /// Jumps to column 0 of the last line.
    pub fn move_last_line(&mut self) {
        self.cursor = Position::new(self.line_count() - 1, 0);
    }

    /// Jumps to the next blank line, or the last line if none exists.
    pub fn move_paragraph_forward(&mut self) {
        let last = self.line_count() - 1;
        let target = (self.cursor.line + 1..=last)
            .find(|&line| self.is_blank_line(line))
            .unwrap_or(last);
        self.cursor = Position::new(target, 0);
    }

    /// Jumps to the previous blank line, or line 0 if none exists.
    pub fn move_paragraph_back(&mut self) {
        let target = (0..self.cursor.line)
            .rev()
            .find(|&line| self.is_blank_line(line))
            .unwrap_or(0);
        self.cursor = Position::new(target, 0);
    }

    // ==================== Selection ====================

    /// Begins a visual selection with anchor and head at the cursor.
    pub fn start_visual(&mut self) {
        self.selection = Some(Selection::at(self.cursor));
    }

    /// Moves the selection head to the cursor.
    pub fn update_visual_head(&mut self) {
        if let Some(sel) = self.selection.as_mut() {
            sel.extend_to(self.cursor);
        }
    }

    /// Clears the selection without modifying the text.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Returns the selected text, both endpoints included.
    ///
    /// Reversed selections (head before anchor) yield the same text as the
    /// equivalent forward selection. Empty when nothing is selected.
    pub fn yank_selection(&self) -> String {
        match self.selection_range() {
            Some(range) => self.rope.slice(range).to_string(),
            None => String::new(),
        }
    }

    /// Removes the selected text and returns it.
    ///
    /// The cursor moves to the earlier endpoint and the selection is cleared.
    pub fn delete_selection(&mut self) -> String {
        let Some(sel) = self.selection.take() else {
            return String::new();
        };
        let Some(range) = self.selection_range_of(sel) else {
            return String::new();
        };

        let before = self.cursor;
        let start = range.start;
        let removed = self.remove(range);
        self.cursor = self.clamp_position(sel.start(), self.bound);
        if !removed.is_empty() {
            self.record(Edit::delete(start, removed.clone()), before);
        }
        removed
    }

    // ==================== Undo/Redo ====================

    /// Opens an undo group; see [`History::begin_group`].
    pub fn begin_undo_group(&mut self) {
        self.history.begin_group(self.cursor);
    }

    /// Closes an undo group.
    pub fn end_undo_group(&mut self) {
        self.history.end_group();
    }

    /// Reverts the last undo step. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(group) = self.history.undo() else {
            return false;
        };

        for edit in group.edits.iter().rev() {
            self.apply_raw(&edit.inverse());
        }
        self.selection = None;
        self.cursor = self.clamp_position(group.cursor_before, self.bound);
        true
    }

    /// Re-applies the last undone step. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(group) = self.history.redo() else {
            return false;
        };

        for edit in &group.edits {
            self.apply_raw(edit);
        }
        self.selection = None;
        self.cursor = self.clamp_position(group.cursor_after, self.bound);
        true
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ==================== Internals ====================

    fn cursor_char_idx(&self) -> usize {
        self.rope.line_to_char(self.cursor.line) + self.cursor.column
    }

    /// Char index of a position, clamped to the end of its line's content.
    fn position_char_idx(&self, pos: Position) -> usize {
        let line = pos.line.min(self.line_count() - 1);
        self.rope.line_to_char(line) + pos.column.min(self.line_len(line))
    }

    fn selection_range(&self) -> Option<Range<usize>> {
        self.selection.and_then(|sel| self.selection_range_of(sel))
    }

    /// Exclusive char range covering an inclusive selection.
    fn selection_range_of(&self, sel: Selection) -> Option<Range<usize>> {
        let start = self.position_char_idx(sel.start());
        let end = (self.position_char_idx(sel.end()) + 1).min(self.len_chars());
        (start < end).then_some(start..end)
    }

    fn remove(&mut self, range: Range<usize>) -> String {
        let removed = self.rope.slice(range.clone()).to_string();
        self.rope.remove(range);
        self.version += 1;
        removed
    }

    /// Applies an edit to the rope without touching history or cursor.
    fn apply_raw(&mut self, edit: &Edit) {
        match edit.kind {
            EditKind::Insert => {
                let at = edit.position.min(self.len_chars());
                self.rope.insert(at, &edit.content);
            }
            EditKind::Delete => {
                let end = (edit.position + edit.len_chars()).min(self.len_chars());
                let start = edit.position.min(end);
                self.rope.remove(start..end);
            }
        }
        self.version += 1;
    }

    fn record(&mut self, edit: Edit, before: Position) {
        self.history.push(edit, before, self.cursor);
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.clamp_position(self.cursor, self.bound);
    }

    fn clamp_position(&self, pos: Position, bound: ColumnBound) -> Position {
        let line = pos.line.min(self.line_count() - 1);
        let column = bound.clamp(pos.column, self.line_len(line));
        Position::new(line, column)
    }

    fn line_chars(&self, line_idx: usize) -> Vec<char> {
        let len = self.line_len(line_idx);
        self.rope.line(line_idx).chars().take(len).collect()
    }

    fn is_blank_line(&self, line_idx: usize) -> bool {
        self.rope.line(line_idx).chars().all(char::is_whitespace)
    }
}

/// Word characters: maximal runs of these form a word.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Buffer {
    fn from(s: &str) -> Self {
        Self::with_config(s, BufferConfig::default())
    }
}

impl From<String> for Buffer {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl std::fmt::Display for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}
