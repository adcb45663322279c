//! The modal key interpreter.
//!
//! ## Learning: State Machines
//!
//! Key handling is a small state machine:
//! - Mode state: Normal, Insert or Visual decide which table applies
//! - Pending state: the first key of `dd`, `yy` or `gg` waits for the second
//!
//! The engine is pure. It never sees the buffer; it only turns
//! `(state, key)` into `(state', Option<Command>)`, which keeps it
//! trivially testable.

use crate::command::Command;
use crate::key::Key;
use crate::mode::Mode;

/// An operator waiting for its second key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Delete,
    Yank,
    Change,
}

/// Translates key events into commands, tracking mode and pending keys.
#[derive(Debug, Clone, Default)]
pub struct ModalEngine {
    mode: Mode,
    /// Set by `d`, `y` or `c` in Normal mode
    pending_operator: Option<Operator>,
    /// Set by the first `g` of `gg`
    pending_goto: bool,
}

impl ModalEngine {
    /// Creates an engine in Normal mode with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the operator waiting for its second key, if any.
    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending_operator
    }

    /// Returns true while a multi-key sequence is in progress.
    pub fn is_pending(&self) -> bool {
        self.pending_operator.is_some() || self.pending_goto
    }

    /// Returns to Normal mode and drops any pending sequence.
    pub fn reset(&mut self) {
        self.set_mode(Mode::Normal);
        self.clear_pending();
    }

    /// Interprets one key, possibly switching mode.
    pub fn handle_key(&mut self, key: Key) -> Option<Command> {
        match self.mode {
            Mode::Normal => self.handle_normal(key),
            Mode::Insert => self.handle_insert(key),
            Mode::Visual => self.handle_visual(key),
        }
    }

    fn handle_normal(&mut self, key: Key) -> Option<Command> {
        if let Some(command) = self.resolve_pending(key) {
            return command;
        }

        if let Some(command) = motion(key) {
            return Some(command);
        }

        match key {
            Key::Char('i') => {
                self.set_mode(Mode::Insert);
                None
            }
            Key::Char('a') => {
                self.set_mode(Mode::Insert);
                Some(Command::MoveRight)
            }
            Key::Char('A') => {
                self.set_mode(Mode::Insert);
                Some(Command::MoveLineEnd)
            }
            Key::Char('o') => {
                self.set_mode(Mode::Insert);
                Some(Command::OpenLineBelow)
            }
            Key::Char('v') => {
                self.set_mode(Mode::Visual);
                Some(Command::StartVisual)
            }
            Key::Char('V') => {
                self.set_mode(Mode::Visual);
                Some(Command::StartVisualLine)
            }
            Key::Char('x') => Some(Command::DeleteCharAtCursor),
            Key::Char('g') => {
                self.pending_goto = true;
                None
            }
            Key::Char('d') => {
                self.pending_operator = Some(Operator::Delete);
                None
            }
            Key::Char('y') => {
                self.pending_operator = Some(Operator::Yank);
                None
            }
            Key::Char('c') => {
                // `c` acts at once on an existing selection and still
                // occupies the operator slot, swallowing the next key.
                self.pending_operator = Some(Operator::Change);
                Some(Command::ChangeSelection)
            }
            Key::Char('p') => Some(Command::Paste),
            Key::Char('u') => Some(Command::Undo),
            Key::Char('\x12') => Some(Command::Redo),
            _ => {
                tracing::trace!("Ignoring {} in {} mode", key, self.mode);
                None
            }
        }
    }

    fn handle_insert(&mut self, key: Key) -> Option<Command> {
        match key {
            Key::Escape => {
                self.set_mode(Mode::Normal);
                None
            }
            Key::Backspace => Some(Command::DeleteBefore),
            Key::Enter => Some(Command::InsertNewline),
            Key::Left => Some(Command::MoveLeft),
            Key::Right => Some(Command::MoveRight),
            Key::Up => Some(Command::MoveUp),
            Key::Down => Some(Command::MoveDown),
            Key::Char(c) if !c.is_control() || c == '\t' => Some(Command::InsertChar(c)),
            Key::Char(_) => {
                tracing::trace!("Ignoring {} in {} mode", key, self.mode);
                None
            }
        }
    }

    fn handle_visual(&mut self, key: Key) -> Option<Command> {
        if let Some(command) = self.resolve_pending(key) {
            return command;
        }

        if let Some(command) = motion(key) {
            return Some(command);
        }

        match key {
            Key::Escape => {
                self.set_mode(Mode::Normal);
                Some(Command::ClearSelection)
            }
            Key::Char('g') => {
                self.pending_goto = true;
                None
            }
            Key::Char('d') | Key::Char('x') => {
                self.set_mode(Mode::Normal);
                Some(Command::DeleteSelection)
            }
            Key::Char('y') => {
                self.set_mode(Mode::Normal);
                Some(Command::YankSelection)
            }
            Key::Char('c') => {
                self.set_mode(Mode::Insert);
                Some(Command::ChangeSelection)
            }
            _ => {
                tracing::trace!("Ignoring {} in {} mode", key, self.mode);
                None
            }
        }
    }

    /// Completes or cancels a pending sequence.
    ///
    /// Returns `None` when nothing was pending; otherwise the key is
    /// consumed and the inner value is the completed command, if any.
    fn resolve_pending(&mut self, key: Key) -> Option<Option<Command>> {
        if !self.is_pending() {
            return None;
        }

        let goto = std::mem::take(&mut self.pending_goto);
        let operator = self.pending_operator.take();

        let command = match (goto, operator, key) {
            (true, _, Key::Char('g')) => Some(Command::MoveFirstLine),
            (_, Some(Operator::Delete), Key::Char('d')) => Some(Command::DeleteLine),
            (_, Some(Operator::Yank), Key::Char('y')) => Some(Command::YankLine),
            _ => {
                tracing::trace!("Cancelled pending sequence with {}", key);
                None
            }
        };
        Some(command)
    }

    fn clear_pending(&mut self) {
        self.pending_operator = None;
        self.pending_goto = false;
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::debug!("Mode {} -> {}", self.mode, mode);
            self.mode = mode;
        }
    }
}

/// Motion keys shared by Normal and Visual mode.
fn motion(key: Key) -> Option<Command> {
    let command = match key {
        Key::Char('h') | Key::Left => Command::MoveLeft,
        Key::Char('l') | Key::Right => Command::MoveRight,
        Key::Char('k') | Key::Up => Command::MoveUp,
        Key::Char('j') | Key::Down => Command::MoveDown,
        Key::Char('w') => Command::MoveWordForward,
        Key::Char('b') => Command::MoveWordBack,
        Key::Char('e') => Command::MoveWordEnd,
        Key::Char('0') => Command::MoveLineStart,
        Key::Char('$') => Command::MoveLineEnd,
        Key::Char('G') => Command::MoveLastLine,
        Key::Char('{') => Command::MoveParagraphBack,
        Key::Char('}') => Command::MoveParagraphForward,
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::CursorShape;

    fn feed(engine: &mut ModalEngine, keys: &str) -> Vec<Option<Command>> {
        keys.chars().map(|c| engine.handle_key(Key::Char(c))).collect()
    }

    #[test]
    fn test_normal_motion() {
        let mut engine = ModalEngine::new();
        assert_eq!(engine.handle_key(Key::Char('h')), Some(Command::MoveLeft));
        assert_eq!(engine.handle_key(Key::Down), Some(Command::MoveDown));
        assert_eq!(engine.handle_key(Key::Char('e')), Some(Command::MoveWordEnd));
        assert_eq!(engine.mode(), Mode::Normal);
    }

    #[test]
    fn test_insert_and_escape() {
        let mut engine = ModalEngine::new();
        assert_eq!(engine.handle_key(Key::Char('i')), None);
        assert_eq!(engine.mode(), Mode::Insert);

        assert_eq!(engine.handle_key(Key::Char('h')), Some(Command::InsertChar('h')));
        assert_eq!(engine.handle_key(Key::Char('\t')), Some(Command::InsertChar('\t')));
        assert_eq!(engine.handle_key(Key::Char('\x12')), None);
        assert_eq!(engine.handle_key(Key::Enter), Some(Command::InsertNewline));
        assert_eq!(engine.handle_key(Key::Backspace), Some(Command::DeleteBefore));
        assert_eq!(engine.handle_key(Key::Left), Some(Command::MoveLeft));

        assert_eq!(engine.handle_key(Key::Escape), None);
        assert_eq!(engine.mode(), Mode::Normal);
    }

    #[test]
    fn test_insert_entries() {
        let mut engine = ModalEngine::new();
        assert_eq!(engine.handle_key(Key::Char('a')), Some(Command::MoveRight));
        assert_eq!(engine.mode(), Mode::Insert);

        engine.reset();
        assert_eq!(engine.handle_key(Key::Char('A')), Some(Command::MoveLineEnd));
        assert_eq!(engine.mode(), Mode::Insert);

        engine.reset();
        assert_eq!(engine.handle_key(Key::Char('o')), Some(Command::OpenLineBelow));
        assert_eq!(engine.mode(), Mode::Insert);
    }

    #[test]
    fn test_double_key_sequences() {
        let mut engine = ModalEngine::new();
        assert_eq!(feed(&mut engine, "dd"), vec![None, Some(Command::DeleteLine)]);
        assert_eq!(feed(&mut engine, "yy"), vec![None, Some(Command::YankLine)]);
        assert_eq!(feed(&mut engine, "gg"), vec![None, Some(Command::MoveFirstLine)]);
        assert!(!engine.is_pending());
    }

    #[test]
    fn test_pending_cancelled_by_other_key() {
        let mut engine = ModalEngine::new();
        engine.handle_key(Key::Char('d'));
        assert_eq!(engine.pending_operator(), Some(Operator::Delete));

        // `j` would be a motion, but it only cancels the pending `d`.
        assert_eq!(engine.handle_key(Key::Char('j')), None);
        assert!(!engine.is_pending());
        assert_eq!(engine.handle_key(Key::Char('j')), Some(Command::MoveDown));
    }

    #[test]
    fn test_mismatched_operators_cancel() {
        let mut engine = ModalEngine::new();
        assert_eq!(feed(&mut engine, "dy"), vec![None, None]);
        assert_eq!(feed(&mut engine, "gd"), vec![None, None]);
        assert!(!engine.is_pending());
    }

    #[test]
    fn test_change_emits_immediately_and_swallows_next() {
        let mut engine = ModalEngine::new();
        assert_eq!(engine.handle_key(Key::Char('c')), Some(Command::ChangeSelection));
        assert_eq!(engine.mode(), Mode::Normal);
        assert_eq!(engine.pending_operator(), Some(Operator::Change));

        assert_eq!(engine.handle_key(Key::Char('w')), None);
        assert!(!engine.is_pending());
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let mut engine = ModalEngine::new();
        assert_eq!(engine.handle_key(Key::Char('Z')), None);
        assert_eq!(engine.handle_key(Key::Enter), None);
        assert_eq!(engine.mode(), Mode::Normal);
    }

    #[test]
    fn test_undo_redo_keys() {
        let mut engine = ModalEngine::new();
        assert_eq!(engine.handle_key(Key::Char('u')), Some(Command::Undo));
        assert_eq!(engine.handle_key(Key::ctrl('r')), Some(Command::Redo));
    }

    #[test]
    fn test_visual_mode() {
        let mut engine = ModalEngine::new();
        assert_eq!(engine.handle_key(Key::Char('v')), Some(Command::StartVisual));
        assert_eq!(engine.mode(), Mode::Visual);

        assert_eq!(engine.handle_key(Key::Char('w')), Some(Command::MoveWordForward));
        assert_eq!(feed(&mut engine, "gg"), vec![None, Some(Command::MoveFirstLine)]);
        assert_eq!(engine.handle_key(Key::Char('p')), None);

        assert_eq!(engine.handle_key(Key::Char('y')), Some(Command::YankSelection));
        assert_eq!(engine.mode(), Mode::Normal);
    }

    #[test]
    fn test_visual_exits() {
        let mut engine = ModalEngine::new();
        engine.handle_key(Key::Char('V'));
        assert_eq!(engine.handle_key(Key::Escape), Some(Command::ClearSelection));
        assert_eq!(engine.mode(), Mode::Normal);

        engine.handle_key(Key::Char('v'));
        assert_eq!(engine.handle_key(Key::Char('x')), Some(Command::DeleteSelection));
        assert_eq!(engine.mode(), Mode::Normal);

        engine.handle_key(Key::Char('v'));
        assert_eq!(engine.handle_key(Key::Char('c')), Some(Command::ChangeSelection));
        assert_eq!(engine.mode(), Mode::Insert);
    }

    #[test]
    fn test_reset_clears_pending() {
        let mut engine = ModalEngine::new();
        engine.handle_key(Key::Char('v'));
        engine.handle_key(Key::Char('g'));
        assert!(engine.is_pending());

        engine.reset();
        assert_eq!(engine.mode(), Mode::Normal);
        assert!(!engine.is_pending());
    }

    #[test]
    fn test_cursor_shapes() {
        assert_eq!(Mode::Normal.cursor_shape(), CursorShape::Block);
        assert_eq!(Mode::Insert.cursor_shape(), CursorShape::Bar);
        assert_eq!(Mode::Visual.cursor_shape(), CursorShape::HighlightedBlock);
        assert_eq!(Mode::Insert.to_string(), "INSERT");
    }
}
