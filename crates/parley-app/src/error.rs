//! Error types for the chat core.
//!
//! [`ChatError`] covers the editing and messaging path. [`TelemetryError`] is
//! reported by telemetry sinks and never escapes the [`crate::Session`].

use thiserror::Error;

/// Errors surfaced by the session, channel and engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Submit was attempted with a blank buffer.
    #[error("cannot submit an empty message")]
    EmptyInput,

    /// Operation attempted after the channel was shut down.
    #[error("message channel is closed")]
    ChannelClosed,

    /// Cursor escaped the buffer. Indicates a broken buffer invariant.
    #[error("cursor out of bounds at row {row}, column {column}")]
    OutOfBounds {
        /// Cursor row at the time of the check.
        row: usize,
        /// Cursor column at the time of the check.
        column: usize,
    },
}

impl ChatError {
    /// Whether the error indicates corrupted state rather than a rejected
    /// request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}

/// Errors reported by a [`crate::Telemetry`] sink.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// The sink refused the event.
    #[error("telemetry sink rejected event {event:?}: {reason}")]
    Rejected {
        /// Event name that was rejected.
        event: String,
        /// Sink-specific reason.
        reason: String,
    },

    /// The sink is not accepting events anymore.
    #[error("telemetry sink unavailable")]
    Unavailable,
}
