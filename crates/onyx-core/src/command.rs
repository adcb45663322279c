//! Commands emitted by the modal engine.
//!
//! ## Learning: The Command Pattern
//!
//! Commands encapsulate actions as values:
//! - The engine decides *what* should happen without touching the buffer
//! - The dispatcher decides *how*, matching every variant exhaustively
//!
//! The enum is closed on purpose: adding a variant is a compile error in
//! the dispatcher until it is handled.

/// Every action the dispatcher knows how to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // Cursor movement
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    MoveWordForward,
    MoveWordBack,
    MoveWordEnd,
    MoveLineStart,
    MoveLineEnd,
    MoveFirstLine,
    MoveLastLine,
    MoveParagraphForward,
    MoveParagraphBack,

    // Insertion
    InsertChar(char),
    InsertNewline,
    OpenLineBelow,

    // Deletion
    DeleteBefore,
    DeleteCharAtCursor,
    DeleteLine,

    // Register
    YankLine,
    YankSelection,
    DeleteSelection,
    ChangeSelection,
    Paste,

    // History
    Undo,
    Redo,

    // Selection
    StartVisual,
    StartVisualLine,
    ClearSelection,
}

impl Command {
    /// Returns true for pure cursor motions (which extend a visual selection).
    pub fn is_motion(&self) -> bool {
        matches!(
            self,
            Command::MoveLeft
                | Command::MoveRight
                | Command::MoveUp
                | Command::MoveDown
                | Command::MoveWordForward
                | Command::MoveWordBack
                | Command::MoveWordEnd
                | Command::MoveLineStart
                | Command::MoveLineEnd
                | Command::MoveFirstLine
                | Command::MoveLastLine
                | Command::MoveParagraphForward
                | Command::MoveParagraphBack
        )
    }

    /// Returns a human-readable name for logs and status lines.
    pub fn display_name(&self) -> &'static str {
        match self {
            Command::MoveLeft => "Move Left",
            Command::MoveRight => "Move Right",
            Command::MoveUp => "Move Up",
            Command::MoveDown => "Move Down",
            Command::MoveWordForward => "Next Word",
            Command::MoveWordBack => "Previous Word",
            Command::MoveWordEnd => "Word End",
            Command::MoveLineStart => "Line Start",
            Command::MoveLineEnd => "Line End",
            Command::MoveFirstLine => "First Line",
            Command::MoveLastLine => "Last Line",
            Command::MoveParagraphForward => "Next Paragraph",
            Command::MoveParagraphBack => "Previous Paragraph",
            Command::InsertChar(_) => "Insert Character",
            Command::InsertNewline => "Insert Newline",
            Command::OpenLineBelow => "Open Line Below",
            Command::DeleteBefore => "Backspace",
            Command::DeleteCharAtCursor => "Delete Character",
            Command::DeleteLine => "Delete Line",
            Command::YankLine => "Yank Line",
            Command::YankSelection => "Yank Selection",
            Command::DeleteSelection => "Delete Selection",
            Command::ChangeSelection => "Change Selection",
            Command::Paste => "Paste",
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::StartVisual => "Visual",
            Command::StartVisualLine => "Visual Line",
            Command::ClearSelection => "Clear Selection",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motions() {
        assert!(Command::MoveWordEnd.is_motion());
        assert!(Command::MoveFirstLine.is_motion());
        assert!(!Command::Paste.is_motion());
        assert!(!Command::StartVisual.is_motion());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Command::DeleteLine.to_string(), "Delete Line");
        assert_eq!(Command::InsertChar('x').display_name(), "Insert Character");
    }
}
