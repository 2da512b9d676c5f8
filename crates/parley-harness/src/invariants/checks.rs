//! Checks registered by [`super::InvariantRegistry::standard`].

use std::collections::HashSet;

use parley_app::Role;

use super::{Invariant, InvariantKind, InvariantResult, SessionSnapshot, Violation};

/// The buffer always holds at least one line.
///
/// An empty line list has no valid cursor position at all.
pub struct BufferNotEmpty;

impl Invariant for BufferNotEmpty {
    fn kind(&self) -> InvariantKind {
        InvariantKind::BufferNotEmpty
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.lines.is_empty() {
            return Err(Violation { invariant: self.kind(), message: "buffer has no lines".into() });
        }
        Ok(())
    }
}

/// Cursor row is a valid line and column is within that line.
pub struct CursorInBounds;

impl Invariant for CursorInBounds {
    fn kind(&self) -> InvariantKind {
        InvariantKind::CursorInBounds
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let cursor = state.cursor;
        let Some(line) = state.lines.get(cursor.row) else {
            return Err(Violation {
                invariant: self.kind(),
                message: format!("row {} outside {} lines", cursor.row, state.lines.len()),
            });
        };

        let len = line.chars().count();
        if cursor.column > len {
            return Err(Violation {
                invariant: self.kind(),
                message: format!("column {} past end of row {} (len {len})", cursor.column, cursor.row),
            });
        }
        Ok(())
    }
}

/// Assistant replies never run ahead of user messages.
///
/// Every reply is offered after its own user message, so at every point in
/// the transcript the number of replies so far is at most the number of user
/// messages so far.
pub struct RepliesFollowUsers;

impl Invariant for RepliesFollowUsers {
    fn kind(&self) -> InvariantKind {
        InvariantKind::RepliesFollowUsers
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let mut users = 0usize;
        let mut replies = 0usize;
        for (index, message) in state.transcript.iter().enumerate() {
            match message.role {
                Role::User => users += 1,
                Role::Assistant => replies += 1,
                Role::System => {},
            }
            if replies > users {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!(
                        "reply at index {index} has no preceding user message ({replies} replies, {users} users)"
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Each message id appears at most once in the transcript.
pub struct UniqueMessageIds;

impl Invariant for UniqueMessageIds {
    fn kind(&self) -> InvariantKind {
        InvariantKind::UniqueMessageIds
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let mut seen = HashSet::new();
        for message in &state.transcript {
            if !seen.insert(message.id) {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!("message {} delivered twice", message.id),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use parley_app::{Message, MessageId};

    use super::*;

    #[test]
    fn cursor_past_line_end_is_violation() {
        let snapshot = SessionSnapshot::empty().with_lines(["ab"]).with_cursor(0, 3);

        let violation = CursorInBounds.check(&snapshot).err();
        assert_eq!(violation.map(|v| v.invariant), Some(InvariantKind::CursorInBounds));
    }

    #[test]
    fn cursor_on_missing_row_is_violation() {
        let snapshot = SessionSnapshot::empty().with_lines(["ab"]).with_cursor(1, 0);
        assert!(CursorInBounds.check(&snapshot).is_err());
    }

    #[test]
    fn cursor_counts_chars_not_bytes() {
        let snapshot = SessionSnapshot::empty().with_lines(["éé"]).with_cursor(0, 2);
        assert!(CursorInBounds.check(&snapshot).is_ok());
    }

    #[test]
    fn empty_line_list_is_violation() {
        let snapshot = SessionSnapshot::empty().with_lines(Vec::<String>::new());
        assert!(BufferNotEmpty.check(&snapshot).is_err());
    }

    #[test]
    fn reply_before_user_is_violation() {
        let snapshot = SessionSnapshot::empty().with_transcript(vec![
            Message::assistant(MessageId::new(1), "early", 0),
            Message::user(MessageId::new(2), "hi", 1),
        ]);
        assert!(RepliesFollowUsers.check(&snapshot).is_err());
    }

    #[test]
    fn interleaved_replies_are_fine() {
        let snapshot = SessionSnapshot::empty().with_transcript(vec![
            Message::user(MessageId::new(1), "a", 0),
            Message::user(MessageId::new(2), "b", 1),
            Message::assistant(MessageId::new(3), "r1", 2),
            Message::system(MessageId::new(4), "note", 3),
            Message::assistant(MessageId::new(5), "r2", 4),
        ]);
        assert!(RepliesFollowUsers.check(&snapshot).is_ok());
        assert!(UniqueMessageIds.check(&snapshot).is_ok());
    }

    #[test]
    fn duplicate_id_is_violation() {
        let message = Message::user(MessageId::new(9), "dup", 0);
        let snapshot = SessionSnapshot::empty().with_transcript(vec![message.clone(), message]);
        assert!(UniqueMessageIds.check(&snapshot).is_err());
    }
}
