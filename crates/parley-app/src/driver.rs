//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the runtime from specific I/O
//! implementations. The terminal front end implements it with crossterm and
//! ratatui; the simulation harness implements it with scripted input, while
//! the generic [`crate::Runtime`] handles all orchestration.

use std::future::Future;

use crate::{InputEvent, Message, Mode, TelemetrySummary, TextBuffer};

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    /// The edit buffer, including the cursor.
    pub buffer: &'a TextBuffer,
    /// Current input mode.
    pub mode: Mode,
    /// Delivered messages, oldest first.
    pub transcript: &'a [Message],
    /// Replies scheduled but not yet delivered.
    pub replies_in_flight: usize,
    /// Telemetry aggregate.
    pub telemetry: TelemetrySummary,
}

/// Abstracts I/O operations for the runtime.
///
/// # Implementations
///
/// - **TUI**: crossterm for terminal events, ratatui for rendering
/// - **Simulation**: scripted keys and virtual time
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Wait for the next input event.
    ///
    /// Returns `None` once input is exhausted. Must be cancel safe: the
    /// runtime drops this future whenever the transcript changes first.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<InputEvent>, Self::Error>> + Send;

    /// Render the current state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, view: &View<'_>) -> Result<(), Self::Error>;

    /// Release resources. Called once when the runtime stops.
    fn stop(&mut self);
}
