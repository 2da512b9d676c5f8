//! Input box
//!
//! Displays the multi-line edit buffer with its cursor.

use parley_app::{Mode, TextBuffer};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

const PROMPT: &str = "> ";
const CONTINUATION: &str = "  ";
const PROMPT_WIDTH: u16 = 2;
const BORDER_SIZE: u16 = 2;
const MAX_VISIBLE_LINES: u16 = 6;

/// Height of the input box for `buffer`, borders included.
pub fn height(buffer: &TextBuffer) -> u16 {
    let lines = u16::try_from(buffer.line_count()).unwrap_or(u16::MAX);
    lines.clamp(1, MAX_VISIBLE_LINES) + BORDER_SIZE
}

/// Render the input box.
///
/// The cursor is only placed in normal mode; in help mode the overlay owns
/// the screen and the cursor stays hidden.
pub fn render(frame: &mut Frame, buffer: &TextBuffer, mode: Mode, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let visible = usize::from(area.height.saturating_sub(BORDER_SIZE)).max(1);

    // Scroll so the cursor row is always on screen.
    let cursor = buffer.cursor();
    let first = (cursor.row + 1).saturating_sub(visible);

    let lines: Vec<Line> = buffer
        .lines()
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .map(|(row, text)| {
            let prompt = if row == 0 { PROMPT } else { CONTINUATION };
            Line::from(format!("{prompt}{text}"))
        })
        .collect();

    let paragraph = Paragraph::new(lines).style(Style::default().fg(Color::White)).block(block);
    frame.render_widget(paragraph, area);

    if mode != Mode::Normal || area.width <= BORDER_SIZE || area.height <= BORDER_SIZE {
        return;
    }

    let column = u16::try_from(cursor.column).unwrap_or(u16::MAX);
    let row = u16::try_from(cursor.row - first).unwrap_or(u16::MAX);

    let max_x = area.right().saturating_sub(2);
    let max_y = area.bottom().saturating_sub(2);
    let x = area.x.saturating_add(1 + PROMPT_WIDTH).saturating_add(column).min(max_x);
    let y = area.y.saturating_add(1).saturating_add(row).min(max_y);

    frame.set_cursor_position((x, y));
}
