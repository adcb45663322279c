//! Applies engine commands to a buffer.
//!
//! ## Learning: The Facade Pattern
//!
//! `Dispatcher` is the single entry point for one open document:
//! - Owns the `Buffer`, the `ModalEngine` and the yank register
//! - Turns each command into one or more buffer primitives
//! - Raises the dirty signal and broadcasts events afterwards
//!
//! Composite operations (delete line, yank line, line-wise visual) live
//! only here, so the buffer keeps a small primitive surface.

use onyx_buffer::{Buffer, Position, Selection};
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::config::Config;
use crate::engine::ModalEngine;
use crate::event::{EditorEvent, EventBus};
use crate::key::Key;
use crate::mode::Mode;

/// Owns one document's buffer, modal state and register.
#[derive(Debug)]
pub struct Dispatcher {
    buffer: Buffer,
    engine: ModalEngine,
    /// Single-slot yank register
    register: String,
    events: EventBus,
    /// Set whenever the text changes; cleared by `take_dirty`
    dirty: bool,
}

/// A serializable view of the editor state after a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub text: String,
    pub cursor: Position,
    pub selection: Option<Selection>,
    pub mode: Mode,
    pub register: String,
    pub version: u64,
}

impl Dispatcher {
    /// Creates a dispatcher over `text` with default settings.
    pub fn new(text: &str) -> Self {
        Self::with_config(text, &Config::default())
    }

    /// Creates a dispatcher over `text` using the given configuration.
    pub fn with_config(text: &str, config: &Config) -> Self {
        Self {
            buffer: Buffer::with_config(text, config.buffer_config()),
            engine: ModalEngine::new(),
            register: String::new(),
            events: EventBus::with_capacity(config.editor.event_capacity),
            dirty: false,
        }
    }

    /// Processes one key event and returns the command it produced, if any.
    pub fn handle_key(&mut self, key: Key) -> Option<Command> {
        let mode_before = self.engine.mode();
        let version_before = self.buffer.version();
        let cursor_before = self.buffer.cursor();
        let selection_before = self.buffer.selection();

        let command = self.engine.handle_key(key);
        let mode = self.engine.mode();

        if mode_before == Mode::Insert && mode != Mode::Insert {
            self.buffer.end_undo_group();
        }
        self.buffer.set_column_bound(mode.column_bound());
        if mode == Mode::Insert && mode_before != Mode::Insert {
            // One Insert session is one undo step, including the edit
            // that entered it (`o`, visual `c`).
            self.buffer.begin_undo_group();
        }

        if let Some(command) = command {
            self.apply(command);
        }

        let version = self.buffer.version();
        if version != version_before {
            self.dirty = true;
            self.events.emit(EditorEvent::DocumentChanged { version });
        }
        if mode != mode_before {
            self.events.emit(EditorEvent::ModeChanged(mode));
        }
        if self.buffer.cursor() != cursor_before {
            self.events.emit(EditorEvent::CursorMoved(self.buffer.cursor()));
        }
        if self.buffer.selection() != selection_before {
            self.events
                .emit(EditorEvent::SelectionChanged(self.buffer.selection()));
        }

        command
    }

    /// Feeds a sequence of keys, in order.
    pub fn handle_keys<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = Key>,
    {
        for key in keys {
            self.handle_key(key);
        }
    }

    fn apply(&mut self, command: Command) {
        tracing::debug!("Applying {} in {} mode", command, self.engine.mode());

        self.buffer.begin_undo_group();
        match command {
            Command::MoveLeft => self.buffer.move_left(),
            Command::MoveRight => self.buffer.move_right(),
            Command::MoveUp => self.buffer.move_up(),
            Command::MoveDown => self.buffer.move_down(),
            Command::MoveWordForward => self.buffer.move_word_forward(),
            Command::MoveWordBack => self.buffer.move_word_back(),
            Command::MoveWordEnd => self.buffer.move_word_end(),
            Command::MoveLineStart => self.buffer.move_line_start(),
            Command::MoveLineEnd => self.buffer.move_line_end(),
            Command::MoveFirstLine => self.buffer.move_first_line(),
            Command::MoveLastLine => self.buffer.move_last_line(),
            Command::MoveParagraphForward => self.buffer.move_paragraph_forward(),
            Command::MoveParagraphBack => self.buffer.move_paragraph_back(),
            Command::InsertChar(c) => {
                let mut utf8 = [0; 4];
                self.buffer.insert(c.encode_utf8(&mut utf8));
            }
            Command::InsertNewline => self.buffer.insert("\n"),
            Command::OpenLineBelow => {
                self.buffer.move_line_end();
                self.buffer.insert("\n");
            }
            Command::DeleteBefore => self.buffer.delete_before(),
            Command::DeleteCharAtCursor => self.buffer.delete_char_at_cursor(),
            Command::DeleteLine => self.delete_line(),
            Command::YankLine => self.yank_line(),
            Command::YankSelection => {
                if self.buffer.selection().is_some() {
                    let text = self.buffer.yank_selection();
                    self.buffer.clear_selection();
                    self.set_register(text);
                }
            }
            Command::DeleteSelection | Command::ChangeSelection => {
                if self.buffer.selection().is_some() {
                    let text = self.buffer.delete_selection();
                    self.set_register(text);
                }
            }
            Command::Paste => {
                if !self.register.is_empty() {
                    let text = self.register.clone();
                    self.buffer.paste(&text);
                }
            }
            Command::Undo => {
                if !self.buffer.undo() {
                    tracing::debug!("Nothing to undo");
                }
            }
            Command::Redo => {
                if !self.buffer.redo() {
                    tracing::debug!("Nothing to redo");
                }
            }
            Command::StartVisual => self.buffer.start_visual(),
            Command::StartVisualLine => {
                self.buffer.move_line_start();
                self.buffer.start_visual();
                self.buffer.move_line_end();
                self.buffer.update_visual_head();
            }
            Command::ClearSelection => self.buffer.clear_selection(),
        }
        self.buffer.end_undo_group();

        if command.is_motion() && self.engine.mode() == Mode::Visual {
            self.buffer.update_visual_head();
        }
    }

    /// `dd`: removes the cursor's line, terminator included.
    fn delete_line(&mut self) {
        let line = self.buffer.cursor().line;

        self.buffer.move_line_start();
        let text = if self.select_line_content() {
            self.buffer.delete_selection()
        } else {
            // A zero-width selection on an empty line would cover its "\n".
            String::new()
        };

        // The last line has no terminator of its own; take the one before it.
        if !self.buffer.delete_line_terminator() && line > 0 {
            self.buffer.delete_before();
            self.buffer.move_line_start();
        }

        self.set_register(text + "\n");
    }

    /// `yy`: copies the cursor's line without moving the cursor.
    fn yank_line(&mut self) {
        let cursor = self.buffer.cursor();

        self.buffer.move_line_start();
        let text = if self.select_line_content() {
            let text = self.buffer.yank_selection();
            self.buffer.clear_selection();
            text
        } else {
            String::new()
        };
        self.buffer.move_to(cursor);

        self.set_register(text + "\n");
    }

    /// Selects the cursor's line from its first to its last character.
    ///
    /// Returns `false`, selecting nothing, when the line is empty.
    fn select_line_content(&mut self) -> bool {
        if self.buffer.line_len(self.buffer.cursor().line) == 0 {
            return false;
        }
        self.buffer.move_line_start();
        self.buffer.start_visual();
        self.buffer.move_line_end();
        self.buffer.update_visual_head();
        true
    }

    fn set_register(&mut self, text: String) {
        tracing::trace!("Register <- {:?}", text);
        self.register = text;
        self.events.emit(EditorEvent::RegisterChanged);
    }

    // ==================== Accessors ====================

    /// Returns the document text.
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Returns the cursor position.
    pub fn cursor(&self) -> Position {
        self.buffer.cursor()
    }

    /// Returns the active selection.
    pub fn selection(&self) -> Option<Selection> {
        self.buffer.selection()
    }

    /// Returns the current mode.
    pub fn mode(&self) -> Mode {
        self.engine.mode()
    }

    /// Returns the yank register contents.
    pub fn register(&self) -> &str {
        &self.register
    }

    /// Returns the underlying buffer.
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Returns the modal engine.
    pub fn engine(&self) -> &ModalEngine {
        &self.engine
    }

    /// Returns true if the text changed since the last `take_dirty`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns and clears the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Captures the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.text(),
            cursor: self.cursor(),
            selection: self.selection(),
            mode: self.mode(),
            register: self.register.clone(),
            version: self.buffer.version(),
        }
    }

    /// Subscribes to editor events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<EditorEvent> {
        self.events.subscribe()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new("")
    }
}
