//! Driver input events.
//!
//! This module defines [`InputEvent`], everything a [`crate::Driver`] can
//! report to the [`crate::Runtime`].

use crate::KeyEvent;

/// Events delivered by a driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Keyboard input.
    Key(KeyEvent),

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Periodic tick.
    Tick,
}
