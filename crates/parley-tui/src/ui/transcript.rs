//! Transcript pane
//!
//! Displays delivered messages, newest at the bottom.

use parley_app::{Message, Role};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;
const CONTINUATION_INDENT: &str = "      ";

/// Render the transcript pane.
pub fn render(frame: &mut Frame, messages: &[Message], area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Parley ");

    let lines: Vec<Line> = if messages.is_empty() {
        vec![Line::from(Span::styled(
            "No messages yet. Type and press Enter.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        messages.iter().flat_map(message_lines).collect()
    };

    let visible_height = usize::from(area.height.saturating_sub(BORDER_SIZE));
    let skip = lines.len().saturating_sub(visible_height);
    let items: Vec<ListItem> = lines.into_iter().skip(skip).map(ListItem::new).collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// One display line per content line; the label only on the first.
fn message_lines(message: &Message) -> Vec<Line<'static>> {
    let (label, color) = match message.role {
        Role::User => ("<you>", Color::Green),
        Role::Assistant => ("<bot>", Color::Cyan),
        Role::System => ("<sys>", Color::Yellow),
    };

    message
        .content
        .split('\n')
        .enumerate()
        .map(|(index, text)| {
            let prefix = if index == 0 {
                Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD))
            } else {
                Span::raw(&CONTINUATION_INDENT[..label.len()])
            };
            Line::from(vec![prefix, Span::raw(" "), Span::raw(text.to_owned())])
        })
        .collect()
}
