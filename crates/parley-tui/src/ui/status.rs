//! Status bar
//!
//! Displays the input mode, pending replies and telemetry totals.

use parley_app::{Mode, View};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the status bar.
pub fn render(frame: &mut Frame, view: &View<'_>, area: Rect) {
    let mode = match view.mode {
        Mode::Normal => Span::styled(" NORMAL ", Style::default().fg(Color::Black).bg(Color::Green)),
        Mode::Help => Span::styled(" HELP ", Style::default().fg(Color::Black).bg(Color::Yellow)),
    };

    let pending = match view.replies_in_flight {
        0 => String::new(),
        1 => " | 1 reply pending".to_owned(),
        n => format!(" | {n} replies pending"),
    };

    let status_line = Line::from(vec![
        mode,
        Span::styled(
            format!(" {} messages", view.transcript.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(pending),
        Span::styled(
            format!(" | {} events | Ctrl+A help, Ctrl+C quit", view.telemetry.total_events),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
