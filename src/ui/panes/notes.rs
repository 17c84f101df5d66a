//! Notebook index: every note grouped under its topic

use crate::notes::{by_topic, Note};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Notes in the order the index lists them
pub fn flat_notes() -> Vec<&'static dyn Note> {
    by_topic().into_iter().flat_map(|(_, notes)| notes).collect()
}

/// Render the notebook index.
///
/// `cursor` is a position in [`flat_notes`]; `open` is the id of the note
/// currently shown in the other panes.
pub fn render_notes_pane(
    frame: &mut Frame,
    area: Rect,
    cursor: usize,
    open: &str,
    is_focused: bool,
) {
    let block = Block::default()
        .title(" Notebook ")
        .borders(Borders::ALL)
        .border_style(DEFAULT_THEME.border(is_focused));

    let mut lines = Vec::new();
    let mut cursor_row = 0;
    let mut position = 0;

    for (topic, notes) in by_topic() {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            topic.to_string(),
            Style::default()
                .fg(DEFAULT_THEME.comment)
                .add_modifier(Modifier::BOLD),
        )));

        for note in notes {
            let is_open = note.id() == open;
            let marker = if is_open { "● " } else { "  " };
            let style = if position == cursor && is_focused {
                cursor_row = lines.len();
                Style::default()
                    .bg(DEFAULT_THEME.primary)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD)
            } else if is_open {
                Style::default().fg(DEFAULT_THEME.secondary)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };
            lines.push(Line::from(Span::styled(
                format!("{}{}", marker, note.title()),
                style,
            )));
            position += 1;
        }
    }

    // Keep the cursor on screen
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let scroll = cursor_row.saturating_sub(visible_height.saturating_sub(1));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, area);
}
