//! Fuzz target for key dispatch
//!
//! Ensure rule precedence holds for any keystroke (MEDIUM priority)
//!
//! # Strategy
//!
//! - Arbitrary key names and sequences, including multi-char escapes
//! - All modifier combinations
//! - Both modes, toggled by the keys themselves
//!
//! # Invariants
//!
//! - Ctrl+C exits in every mode
//! - Help mode never edits the buffer
//! - Control and meta chords never insert text
//! - Applying the dispatched action keeps the buffer in bounds
//! - NEVER panic on any keystroke

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use parley_app::{Action, KeyEvent, Mode, TextBuffer, dispatch, matching_rule};

#[derive(Debug, Clone, Arbitrary)]
struct FuzzKey {
    name: String,
    sequence: String,
    ctrl: bool,
    meta: bool,
    shift: bool,
}

fuzz_target!(|keys: Vec<FuzzKey>| {
    let mut buffer = TextBuffer::new();
    let mut mode = Mode::Normal;

    for key in keys {
        let key = KeyEvent {
            name: key.name,
            sequence: key.sequence,
            ctrl: key.ctrl,
            meta: key.meta,
            shift: key.shift,
        };

        let action = dispatch(&key, mode, buffer.is_empty());
        assert_eq!(action, dispatch(&key, mode, !buffer.is_empty()));

        if key.ctrl && key.name == "c" {
            assert_eq!(action, Action::Exit);
            assert_eq!(matching_rule(&key, mode), "ctrl-c");
        }
        if mode == Mode::Help {
            assert!(!action.edits_buffer(), "help mode edited: {key:?}");
        }
        if key.ctrl || key.meta {
            assert!(!matches!(action, Action::InsertChar(_)), "chord inserted: {key:?}");
        }

        match action {
            Action::ToggleMode => mode = mode.toggled(),
            Action::InsertChar(ch) => buffer.insert(ch),
            Action::DeleteBackward => buffer.delete_backward(),
            Action::MoveCursor(direction) => buffer.move_cursor(direction),
            Action::ClearBuffer | Action::Submit => buffer.clear(),
            Action::Exit | Action::Noop => {}
        }

        assert!(buffer.check_bounds().is_ok());
    }
});
