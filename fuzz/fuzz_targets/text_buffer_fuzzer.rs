//! Fuzz target for the TextBuffer editing state machine
//!
//! Ensure the cursor never leaves the buffer (HIGH priority)
//!
//! # Strategy
//!
//! - Arbitrary characters: multi-byte, combining, control and `'\n'`
//! - Long runs of deletes and moves at line boundaries
//! - Clears interleaved with edits
//!
//! # Invariants
//!
//! - At least one line, always
//! - Cursor row is a valid line, column within that line's char count
//! - `to_text` has exactly `line_count - 1` newlines
//! - NEVER panic on any edit sequence

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use parley_app::{Direction, TextBuffer};

#[derive(Debug, Clone, Arbitrary)]
enum EditOp {
    Insert(char),
    Newline,
    DeleteBackward { times: u8 },
    MoveLeft { times: u8 },
    MoveRight { times: u8 },
    Clear,
}

fuzz_target!(|ops: Vec<EditOp>| {
    let mut buffer = TextBuffer::new();

    for op in ops {
        match op {
            EditOp::Insert(ch) => buffer.insert(ch),
            EditOp::Newline => buffer.insert('\n'),
            EditOp::DeleteBackward { times } => (0..times).for_each(|_| buffer.delete_backward()),
            EditOp::MoveLeft { times } => (0..times).for_each(|_| buffer.move_cursor(Direction::Left)),
            EditOp::MoveRight { times } => (0..times).for_each(|_| buffer.move_cursor(Direction::Right)),
            EditOp::Clear => {
                buffer.clear();
                assert!(buffer.is_empty());
                assert_eq!(buffer.line_count(), 1);
            }
        }

        assert!(buffer.line_count() >= 1, "buffer lost its last line");
        assert!(buffer.check_bounds().is_ok(), "cursor out of bounds: {:?}", buffer.cursor());

        let cursor = buffer.cursor();
        assert!(cursor.column <= buffer.line_len(cursor.row));

        let newlines = buffer.to_text().matches('\n').count();
        assert_eq!(newlines, buffer.line_count() - 1, "line split and join out of sync");
    }
});
