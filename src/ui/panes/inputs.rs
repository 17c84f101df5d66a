//! Input fields of the open note, with an inline edit buffer

use crate::input::InputSet;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Field being edited and the text typed so far
#[derive(Debug, Clone, Copy)]
pub struct EditBuffer<'a> {
    pub field: usize,
    pub text: &'a str,
}

pub fn render_inputs_pane(
    frame: &mut Frame,
    area: Rect,
    input: &InputSet,
    selected: usize,
    editing: Option<EditBuffer<'_>>,
    error: Option<&str>,
    is_focused: bool,
) {
    let block = Block::default()
        .title(" Inputs ")
        .borders(Borders::ALL)
        .border_style(DEFAULT_THEME.border(is_focused));

    let mut lines = Vec::new();
    for (n, field) in input.fields().iter().enumerate() {
        let is_selected = n == selected && is_focused;
        let label_style = if is_selected {
            Style::default()
                .fg(DEFAULT_THEME.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(DEFAULT_THEME.primary)
        };

        lines.push(Line::from(vec![
            Span::styled(if is_selected { "› " } else { "  " }, label_style),
            Span::styled(field.label, label_style),
            Span::styled(
                format!("  ({})", field.kind.hint()),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
        ]));

        let value = match editing {
            Some(edit) if edit.field == n => Line::from(vec![
                Span::raw("    "),
                Span::styled(
                    edit.text.to_string(),
                    Style::default()
                        .fg(DEFAULT_THEME.fg)
                        .bg(DEFAULT_THEME.current_line_bg),
                ),
                Span::styled(
                    "█",
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::SLOW_BLINK),
                ),
            ]),
            _ => Line::from(vec![
                Span::raw("    "),
                Span::styled(
                    input.raw(field.key).to_string(),
                    Style::default().fg(DEFAULT_THEME.string),
                ),
            ]),
        };
        lines.push(value);
    }

    if let Some(error) = error {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("✗ {}", error),
            Style::default().fg(DEFAULT_THEME.error),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
