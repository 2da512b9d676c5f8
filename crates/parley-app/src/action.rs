//! Keystroke intents.
//!
//! This module defines the [`Action`] enum, the output of
//! [`crate::dispatch`]. Actions are plain data; the [`crate::Session`] is what
//! applies them.

use crate::Direction;

/// What a keystroke asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// End the session.
    Exit,
    /// Switch between normal and help mode.
    ToggleMode,
    /// Send the buffer contents, if not blank.
    Submit,
    /// Delete the character before the cursor.
    DeleteBackward,
    /// Discard the buffer.
    ClearBuffer,
    /// Move the cursor horizontally.
    MoveCursor(Direction),
    /// Insert a character at the cursor.
    InsertChar(char),
    /// Ignore the key.
    Noop,
}

impl Action {
    /// Short stable name for logs and telemetry.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exit => "exit",
            Self::ToggleMode => "toggle_mode",
            Self::Submit => "submit",
            Self::DeleteBackward => "delete_backward",
            Self::ClearBuffer => "clear_buffer",
            Self::MoveCursor(_) => "move_cursor",
            Self::InsertChar(_) => "insert_char",
            Self::Noop => "noop",
        }
    }

    /// Whether applying the action can change the buffer.
    pub fn edits_buffer(&self) -> bool {
        matches!(
            self,
            Self::Submit | Self::DeleteBackward | Self::ClearBuffer | Self::InsertChar(_)
        )
    }
}
