//! Crossterm key normalization.
//!
//! Converts crossterm key and paste events into terminal-agnostic
//! [`KeyEvent`]s. Nothing here decides what a key does; that is
//! [`parley_app::dispatch`]'s job.
//!
//! Keys that produce no text (escape, function keys, up/down, ...) keep their
//! name but carry an empty sequence, so dispatch never inserts them.

use crossterm::event::{KeyCode, KeyEvent as CrosstermKey, KeyEventKind, KeyModifiers};
use parley_app::KeyEvent;

/// Normalize a crossterm key event.
///
/// Returns `None` for releases, repeats reported as separate kinds, and keys
/// with no meaningful mapping.
pub fn convert_key(key: &CrosstermKey) -> Option<KeyEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let meta = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    let mut event = match key.code {
        KeyCode::Enter if shift || meta => return Some(KeyEvent::line_feed()),
        KeyCode::Enter => KeyEvent::enter(),
        KeyCode::Backspace => KeyEvent::backspace(),
        KeyCode::Left => KeyEvent::left(),
        KeyCode::Right => KeyEvent::right(),
        KeyCode::Char(ch) if ctrl && ch.is_ascii_alphabetic() => KeyEvent::ctrl(ch),
        KeyCode::Char(ch) => KeyEvent::char(ch),
        KeyCode::Up => KeyEvent::named("up", ""),
        KeyCode::Down => KeyEvent::named("down", ""),
        KeyCode::Home => KeyEvent::named("home", ""),
        KeyCode::End => KeyEvent::named("end", ""),
        KeyCode::Delete => KeyEvent::named("delete", ""),
        KeyCode::Tab => KeyEvent::named("tab", ""),
        KeyCode::Esc => KeyEvent::named("escape", ""),
        KeyCode::F(n) => KeyEvent::named(&format!("f{n}"), ""),
        _ => return None,
    };

    event.ctrl |= ctrl;
    event.meta |= meta;
    event.shift |= shift;
    Some(event)
}

/// Expand pasted text into one key per character.
///
/// Line breaks (`\n`, `\r` and `\r\n`) become line feeds, so a multi-line
/// paste lands in the buffer as multiple lines instead of submitting.
pub fn paste_keys(text: &str) -> Vec<KeyEvent> {
    text.replace("\r\n", "\n")
        .chars()
        .map(|ch| match ch {
            '\n' | '\r' => KeyEvent::line_feed(),
            ch => KeyEvent::char(ch),
        })
        .collect()
}
