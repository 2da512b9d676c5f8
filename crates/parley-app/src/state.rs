//! Observable session state types.
//!
//! [`Mode`] gates editing. [`Message`] is the unit moved through the
//! [`crate::MessageChannel`] and kept in the [`crate::Transcript`].

use std::fmt;

/// Session input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Keys edit the buffer and submit messages.
    #[default]
    Normal,
    /// Help overlay shown; editing keys are suppressed.
    Help,
}

impl Mode {
    /// The other mode.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Normal => Self::Help,
            Self::Help => Self::Normal,
        }
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Typed and submitted by the user.
    User,
    /// Synthesized reply.
    Assistant,
    /// Produced by the client itself (notices, banners).
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        };
        f.write_str(label)
    }
}

/// Opaque 128-bit message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u128);

impl MessageId {
    /// Wrap a raw id.
    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Raw id value.
    pub const fn get(self) -> u128 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// A chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Unique id.
    pub id: MessageId,
    /// Author.
    pub role: Role,
    /// Message text.
    pub content: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl Message {
    /// Create a message.
    pub fn new(id: MessageId, role: Role, content: impl Into<String>, timestamp: u64) -> Self {
        Self { id, role, content: content.into(), timestamp }
    }

    /// Create a user message.
    pub fn user(id: MessageId, content: impl Into<String>, timestamp: u64) -> Self {
        Self::new(id, Role::User, content, timestamp)
    }

    /// Create an assistant message.
    pub fn assistant(id: MessageId, content: impl Into<String>, timestamp: u64) -> Self {
        Self::new(id, Role::Assistant, content, timestamp)
    }

    /// Create a system message.
    pub fn system(id: MessageId, content: impl Into<String>, timestamp: u64) -> Self {
        Self::new(id, Role::System, content, timestamp)
    }
}
