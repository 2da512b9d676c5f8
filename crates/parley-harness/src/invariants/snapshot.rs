//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of a session at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use parley_app::{Cursor, Environment, Message, Mode, Session, TextBuffer, View};

/// Snapshot of one session's observable state.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Buffer lines, top to bottom.
    pub lines: Vec<String>,
    /// Buffer cursor.
    pub cursor: Cursor,
    /// Input mode.
    pub mode: Mode,
    /// Delivered messages, oldest first.
    pub transcript: Vec<Message>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl SessionSnapshot {
    /// Snapshot of a freshly started session.
    pub fn empty() -> Self {
        Self::from_buffer(&TextBuffer::new())
    }

    /// Snapshot of a buffer alone, with normal mode and no messages.
    pub fn from_buffer(buffer: &TextBuffer) -> Self {
        Self {
            lines: buffer.lines().to_vec(),
            cursor: buffer.cursor(),
            mode: Mode::Normal,
            transcript: Vec::new(),
        }
    }

    /// Snapshot of what a driver was asked to render.
    pub fn from_view(view: &View<'_>) -> Self {
        Self {
            lines: view.buffer.lines().to_vec(),
            cursor: view.buffer.cursor(),
            mode: view.mode,
            transcript: view.transcript.to_vec(),
        }
    }

    /// Snapshot of a live session.
    pub fn from_session<E: Environment>(session: &Session<E>) -> Self {
        Self {
            mode: session.mode(),
            transcript: session.transcript().snapshot(),
            ..Self::from_buffer(session.buffer())
        }
    }

    /// Replace the buffer lines.
    #[must_use]
    pub fn with_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the cursor.
    #[must_use]
    pub fn with_cursor(mut self, row: usize, column: usize) -> Self {
        self.cursor = Cursor::new(row, column);
        self
    }

    /// Replace the transcript.
    #[must_use]
    pub fn with_transcript(mut self, transcript: Vec<Message>) -> Self {
        self.transcript = transcript;
        self
    }
}
