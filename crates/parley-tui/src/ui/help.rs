//! Help overlay
//!
//! Key reference drawn over the transcript while in help mode.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const BINDINGS: &[(&str, &str)] = &[
    ("Enter", "send message"),
    ("Shift+Enter", "new line"),
    ("Backspace", "delete before cursor"),
    ("Left/Right", "move cursor"),
    ("Ctrl+U", "clear input"),
    ("Ctrl+A", "toggle this help"),
    ("Ctrl+C", "quit"),
];

const WIDTH: u16 = 40;
const KEY_COLUMN: usize = 13;

/// Render the overlay centered in `area`.
pub fn render(frame: &mut Frame, area: Rect) {
    let height = u16::try_from(BINDINGS.len()).unwrap_or(u16::MAX).saturating_add(2);
    let popup = centered(area, WIDTH, height);
    if popup.width == 0 || popup.height == 0 {
        return;
    }

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Help ")
        .title_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let lines: Vec<Line> = BINDINGS
        .iter()
        .map(|(key, description)| {
            Line::from(vec![
                Span::styled(format!("{key:<KEY_COLUMN$}"), Style::default().fg(Color::Yellow)),
                Span::raw(*description),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}
