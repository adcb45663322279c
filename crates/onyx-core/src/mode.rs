//! Editing modes.

use onyx_buffer::ColumnBound;
use serde::{Deserialize, Serialize};

/// Editor modes (Vim-style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Navigation and commands
    #[default]
    Normal,
    /// Text entry
    Insert,
    /// Character or line selection
    Visual,
}

/// How the rendering layer should draw the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorShape {
    Block,
    Bar,
    HighlightedBlock,
}

impl Mode {
    /// Returns the status-line label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Visual => "VISUAL",
        }
    }

    /// Returns the cursor shape used while in this mode.
    pub fn cursor_shape(&self) -> CursorShape {
        match self {
            Mode::Normal => CursorShape::Block,
            Mode::Insert => CursorShape::Bar,
            Mode::Visual => CursorShape::HighlightedBlock,
        }
    }

    /// Returns the column clamping rule the buffer uses in this mode.
    ///
    /// Only Insert mode lets the cursor sit after the last character.
    pub fn column_bound(&self) -> ColumnBound {
        match self {
            Mode::Insert => ColumnBound::PastEnd,
            Mode::Normal | Mode::Visual => ColumnBound::OnChar,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
