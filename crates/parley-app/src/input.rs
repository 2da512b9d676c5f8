//! Terminal-agnostic keyboard input.

/// A single normalized keystroke.
///
/// Decouples dispatch from terminal libraries (crossterm, termion, etc.)
/// enabling deterministic simulation testing. Named keys carry their symbolic
/// name (`"return"`, `"backspace"`, `"left"`, ...); plain printable keys have
/// an empty name and carry the character in `sequence`. Control chords carry
/// the letter as the name with `ctrl` set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyEvent {
    /// Symbolic key identifier, empty for plain printable keys.
    pub name: String,
    /// Literal character(s) the key produced.
    pub sequence: String,
    /// Control modifier held.
    pub ctrl: bool,
    /// Meta/Alt modifier held.
    pub meta: bool,
    /// Shift modifier held.
    pub shift: bool,
}

impl KeyEvent {
    /// A plain printable character.
    pub fn char(ch: char) -> Self {
        Self { sequence: ch.to_string(), shift: ch.is_uppercase(), ..Self::default() }
    }

    /// A named key such as `"return"` or `"left"`.
    pub fn named(name: &str, sequence: &str) -> Self {
        Self { name: name.to_owned(), sequence: sequence.to_owned(), ..Self::default() }
    }

    /// Control chord, e.g. `ctrl('c')` for Ctrl+C.
    ///
    /// Only ASCII letters have a control code; other characters get an empty
    /// sequence.
    pub fn ctrl(letter: char) -> Self {
        let letter = letter.to_ascii_lowercase();
        let sequence = if letter.is_ascii_alphabetic() {
            char::from((letter as u8) & 0x1f).to_string()
        } else {
            String::new()
        };
        Self {
            name: letter.to_string(),
            sequence,
            ctrl: true,
            ..Self::default()
        }
    }

    /// Enter/Return key.
    pub fn enter() -> Self {
        Self::named("return", "\r")
    }

    /// Line feed key (Shift+Enter). Dispatches as a `'\n'` insertion.
    pub fn line_feed() -> Self {
        Self { shift: true, ..Self::named("enter", "\n") }
    }

    /// Backspace key.
    pub fn backspace() -> Self {
        Self::named("backspace", "\x7f")
    }

    /// Left arrow key.
    pub fn left() -> Self {
        Self::named("left", "\x1b[D")
    }

    /// Right arrow key.
    pub fn right() -> Self {
        Self::named("right", "\x1b[C")
    }

    /// Set the meta modifier.
    #[must_use]
    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// The produced character if `sequence` is exactly one `char`.
    pub fn single_char(&self) -> Option<char> {
        let mut chars = self.sequence.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_chord_carries_letter_and_control_code() {
        let key = KeyEvent::ctrl('C');

        assert_eq!(key.name, "c");
        assert_eq!(key.sequence, "\u{3}");
        assert!(key.ctrl);
    }

    #[test]
    fn ctrl_chord_on_non_ascii_has_no_control_code() {
        let key = KeyEvent::ctrl('é');

        assert_eq!(key.name, "é");
        assert!(key.sequence.is_empty());
        assert!(key.ctrl);
    }

    #[test]
    fn single_char_counts_chars_not_bytes() {
        assert_eq!(KeyEvent::char('é').single_char(), Some('é'));
        assert_eq!(KeyEvent::left().single_char(), None);
        assert_eq!(KeyEvent::named("f1", "").single_char(), None);
    }
}
