//! Multi-line text buffer with a cursor.
//!
//! The buffer owns everything the user has typed but not yet submitted. All
//! operations are total: they never fail and never leave the cursor outside
//! the current line.
//!
//! Columns count `char`s, not bytes. Every `char` is treated as one cell wide.

use crate::ChatError;

/// Cursor position in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cursor {
    /// Line index, always `< line_count()`.
    pub row: usize,
    /// Character offset within the line, always `<= line length`.
    pub column: usize,
}

impl Cursor {
    /// Create a cursor at the given position.
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Horizontal cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// One character towards the start of the line.
    Left,
    /// One character towards the end of the line.
    Right,
}

/// Editable multi-line text.
///
/// # Invariants
///
/// - `lines` always holds at least one element
/// - `cursor.row < lines.len()`
/// - `cursor.column <= chars(lines[cursor.row])`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    cursor: Cursor,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// Create an empty buffer with the cursor at the origin.
    pub fn new() -> Self {
        Self { lines: vec![String::new()], cursor: Cursor::default() }
    }

    /// Insert a character at the cursor and advance past it.
    ///
    /// `'\n'` splits the current line; the text after the cursor moves to a
    /// new line below and the cursor to its start.
    pub fn insert(&mut self, ch: char) {
        let Cursor { row, column } = self.cursor;
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };
        let offset = byte_offset(line, column);

        if ch == '\n' {
            let tail = line.split_off(offset);
            self.lines.insert(row + 1, tail);
            self.cursor = Cursor::new(row + 1, 0);
        } else {
            line.insert(offset, ch);
            self.cursor.column = column + 1;
        }
    }

    /// Delete the character before the cursor.
    ///
    /// At the start of a line, the line is joined onto the previous one. At
    /// the start of the buffer this does nothing.
    pub fn delete_backward(&mut self) {
        let Cursor { row, column } = self.cursor;

        if column > 0 {
            if let Some(line) = self.lines.get_mut(row) {
                let start = byte_offset(line, column - 1);
                line.remove(start);
                self.cursor.column = column - 1;
            }
            return;
        }

        if row == 0 || row >= self.lines.len() {
            return;
        }

        let current = self.lines.remove(row);
        if let Some(previous) = self.lines.get_mut(row - 1) {
            let joined_at = previous.chars().count();
            previous.push_str(&current);
            self.cursor = Cursor::new(row - 1, joined_at);
        }
    }

    /// Move the cursor one character left or right.
    ///
    /// Movement past either end of the current line is clamped.
    pub fn move_cursor(&mut self, direction: Direction) {
        let bound = self.line_len(self.cursor.row);
        let column = match direction {
            Direction::Left => self.cursor.column.saturating_sub(1),
            Direction::Right => self.cursor.column.saturating_add(1),
        };
        self.cursor.column = column.min(bound);
    }

    /// Reset to a single empty line with the cursor at the origin.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.lines.push(String::new());
        self.cursor = Cursor::default();
    }

    /// Buffer contents with lines joined by `'\n'`.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    /// `true` if the buffer holds nothing but whitespace.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    /// Verify the cursor invariant.
    ///
    /// Every mutation preserves it, so an error here means the buffer is
    /// corrupted.
    pub fn check_bounds(&self) -> Result<(), ChatError> {
        let Cursor { row, column } = self.cursor;
        match self.lines.get(row) {
            Some(line) if column <= line.chars().count() => Ok(()),
            _ => Err(ChatError::OutOfBounds { row, column }),
        }
    }

    /// Current cursor position.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// All lines, top to bottom.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines. Never zero.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Length of a line in characters. 0 for rows past the end.
    pub fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |line| line.chars().count())
    }
}

/// Byte offset of the `column`-th character, or the line length past the end.
fn byte_offset(line: &str, column: usize) -> usize {
    line.char_indices().nth(column).map_or(line.len(), |(offset, _)| offset)
}
