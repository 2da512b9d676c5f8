//! UI rendering
//!
//! Rendering functions that convert a [`View`] into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! drawing into a frame.

mod help;
mod input;
mod status;
mod transcript;

use parley_app::{Mode, View};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

/// Render the entire UI.
pub fn render(frame: &mut Frame, view: &View<'_>) {
    const TRANSCRIPT_MIN_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(TRANSCRIPT_MIN_HEIGHT),
            Constraint::Length(input::height(view.buffer)),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [transcript_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    transcript::render(frame, view.transcript, *transcript_area);
    input::render(frame, view.buffer, view.mode, *input_area);
    status::render(frame, view, *status_area);

    if view.mode == Mode::Help {
        help::render(frame, *transcript_area);
    }
}
