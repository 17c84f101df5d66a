//! Visualization pane: draws the current step's [`Scene`]
//!
//! Every widget is turned into plain text lines with per-cell styles. Nothing
//! here looks at previous steps.

use crate::scene::{Cell, Mark, Pointer, Scene, TreeCell, Widget};
use crate::trace::StepView;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn width(text: &str) -> usize {
    text.chars().count()
}

fn title_line(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(DEFAULT_THEME.comment)
            .add_modifier(Modifier::BOLD),
    ))
}

fn boxed(cell: &Cell, w: usize) -> Span<'static> {
    Span::styled(format!(" {:^w$} ", cell.text, w = w), DEFAULT_THEME.mark(cell.mark))
}

fn border() -> Span<'static> {
    Span::styled("│", Style::default().fg(DEFAULT_THEME.border_normal))
}

/// `│ a │ b │` with index and pointer rows underneath
fn cells_lines(cells: &[Cell], pointers: &[Pointer]) -> Vec<Line<'static>> {
    if cells.is_empty() {
        return vec![Line::from(Span::styled(
            "(empty)",
            Style::default().fg(DEFAULT_THEME.comment),
        ))];
    }

    let w = cells.iter().map(|c| width(&c.text)).max().unwrap_or(1).max(2);
    let slot = w + 3;

    let mut row = Vec::with_capacity(cells.len() * 2 + 1);
    for cell in cells {
        row.push(border());
        row.push(boxed(cell, w));
    }
    row.push(border());

    let indices: String = (0..cells.len())
        .map(|i| format!(" {:^w$}  ", i, w = w))
        .collect();

    let mut lines = vec![
        Line::from(row),
        Line::from(Span::styled(indices, Style::default().fg(DEFAULT_THEME.comment))),
    ];

    if !pointers.is_empty() {
        // group labels by slot so that two pointers on one cell read "L,R"
        let slots = cells.len() + 1;
        let mut labels: Vec<Vec<&str>> = vec![Vec::new(); slots];
        for p in pointers {
            labels[p.index.min(slots - 1)].push(&p.label);
        }
        let arrows: String = labels
            .iter()
            .map(|l| {
                if l.is_empty() {
                    " ".repeat(slot)
                } else {
                    format!(" {:^w$}  ", "↑", w = w)
                }
            })
            .collect();
        let names: String = labels
            .iter()
            .map(|l| format!(" {:^w$}  ", l.join(","), w = w))
            .collect();
        let style = Style::default().fg(DEFAULT_THEME.secondary);
        lines.push(Line::from(Span::styled(arrows, style)));
        lines.push(Line::from(Span::styled(names, style)));
    }

    lines
}

fn stack_lines(items: &[Cell]) -> Vec<Line<'static>> {
    let mut spans = vec![Span::styled("⊥ ", Style::default().fg(DEFAULT_THEME.comment))];
    if items.is_empty() {
        spans.push(Span::styled("(empty)", Style::default().fg(DEFAULT_THEME.comment)));
    } else {
        for item in items {
            spans.push(border());
            spans.push(boxed(item, width(&item.text)));
        }
        spans.push(border());
        spans.push(Span::styled(" ← top", Style::default().fg(DEFAULT_THEME.comment)));
    }
    vec![Line::from(spans)]
}

fn grid_lines(columns: &[String], rows: &[(String, Vec<Cell>)]) -> Vec<Line<'static>> {
    let label_w = rows.iter().map(|(l, _)| width(l)).max().unwrap_or(0);
    let mut widths: Vec<usize> = columns.iter().map(|c| width(c)).collect();
    for (_, cells) in rows {
        for (i, cell) in cells.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(width(&cell.text));
            }
        }
    }

    let header_style = Style::default().fg(DEFAULT_THEME.primary);
    let mut header = vec![Span::raw(format!("{:label_w$} ", "", label_w = label_w))];
    for (c, w) in columns.iter().zip(&widths) {
        header.push(Span::styled(format!(" {:^w$} ", c, w = *w), header_style));
    }

    let mut lines = vec![Line::from(header)];
    for (label, cells) in rows {
        let mut spans = vec![Span::styled(
            format!("{:>label_w$} ", label, label_w = label_w),
            header_style,
        )];
        for (cell, w) in cells.iter().zip(&widths) {
            spans.push(boxed(cell, *w));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn tree_lines(root: Option<usize>, nodes: &[TreeCell]) -> Vec<Line<'static>> {
    let Some(root) = root else {
        return vec![Line::from(Span::styled(
            "(empty tree)",
            Style::default().fg(DEFAULT_THEME.comment),
        ))];
    };

    let mut lines = Vec::new();
    let mut pending = vec![(root, String::new(), String::new())];
    // depth-first, right child pushed first so the left one prints first
    while let Some((id, prefix, branch)) = pending.pop() {
        let Some(node) = nodes.get(id) else {
            continue;
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}{}", prefix, branch),
                Style::default().fg(DEFAULT_THEME.border_normal),
            ),
            boxed(&node.cell, width(&node.cell.text)),
        ]));

        let child_prefix = match branch.as_str() {
            "" => prefix.clone(),
            b if b.starts_with('├') => format!("{}│  ", prefix),
            _ => format!("{}   ", prefix),
        };
        let children: Vec<(usize, &str)> = [(node.left, "L"), (node.right, "R")]
            .into_iter()
            .filter_map(|(child, side)| child.map(|c| (c, side)))
            .collect();
        for (n, (child, side)) in children.iter().enumerate().rev() {
            let connector = if n + 1 == children.len() { "└─" } else { "├─" };
            pending.push((*child, child_prefix.clone(), format!("{}{} ", connector, side)));
        }
    }
    lines
}

fn vars_lines(vars: &[(String, String)]) -> Vec<Line<'static>> {
    let name_w = vars.iter().map(|(k, _)| width(k)).max().unwrap_or(0);
    vars.iter()
        .map(|(k, v)| {
            Line::from(vec![
                Span::styled(
                    format!("{:>name_w$}", k, name_w = name_w),
                    Style::default().fg(DEFAULT_THEME.primary),
                ),
                Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(v.clone(), Style::default().fg(DEFAULT_THEME.fg)),
            ])
        })
        .collect()
}

fn list_lines(lines: &[Cell]) -> Vec<Line<'static>> {
    if lines.is_empty() {
        return vec![Line::from(Span::styled(
            "(none)",
            Style::default().fg(DEFAULT_THEME.comment),
        ))];
    }
    lines
        .iter()
        .map(|cell| {
            let style = match cell.mark {
                Mark::Plain => Style::default().fg(DEFAULT_THEME.fg),
                mark => DEFAULT_THEME.mark(mark),
            };
            Line::from(Span::styled(format!("  {}", cell.text), style))
        })
        .collect()
}

/// Lay out every widget of a scene, separated by blank lines
pub fn scene_lines(scene: &Scene) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, widget) in scene.widgets.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        match widget {
            Widget::Cells {
                title,
                cells,
                pointers,
            } => {
                lines.push(title_line(title));
                lines.extend(cells_lines(cells, pointers));
            }
            Widget::Stack { title, items } => {
                lines.push(title_line(title));
                lines.extend(stack_lines(items));
            }
            Widget::Grid {
                title,
                columns,
                rows,
            } => {
                lines.push(title_line(title));
                lines.extend(grid_lines(columns, rows));
            }
            Widget::Tree { title, root, nodes } => {
                lines.push(title_line(title));
                lines.extend(tree_lines(*root, nodes));
            }
            Widget::Vars(vars) => lines.extend(vars_lines(vars)),
            Widget::Lines {
                title,
                lines: items,
            } => {
                lines.push(title_line(title));
                lines.extend(list_lines(items));
            }
        }
    }
    lines
}

/// Render the visualization pane
pub fn render_scene_pane(
    frame: &mut Frame,
    area: Rect,
    step: &StepView<'_>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(format!(" Step {} · {} ", step.index, step.phase))
        .borders(Borders::ALL)
        .border_style(DEFAULT_THEME.border(is_focused));

    let lines = scene_lines(&step.scene);
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if lines.len() > visible_height {
        *scroll_offset = (*scroll_offset).min(lines.len() - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((*scroll_offset as u16, 0));
    frame.render_widget(paragraph, area);
}

/// Render the explanation box under the visualization
pub fn render_explanation(frame: &mut Frame, area: Rect, step: &StepView<'_>) {
    let block = Block::default()
        .title(" Explanation ")
        .borders(Borders::ALL)
        .border_style(DEFAULT_THEME.border(false));

    let style = if step.is_last() {
        Style::default().fg(DEFAULT_THEME.success)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(step.explanation.to_string(), style)))
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{pointers, Scene};

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_cells_render_pointers_under_cells() {
        let scene = Scene::new().cells(
            "nums",
            vec![Cell::plain("1"), Cell::plain("22")],
            pointers([("L", Some(0)), ("R", Some(0))]),
        );
        let lines = scene_lines(&scene);
        assert_eq!(text(&lines[0]), "nums");
        assert_eq!(text(&lines[1]), "│ 1  │ 22 │");
        assert!(text(&lines[4]).contains("L,R"));
    }

    #[test]
    fn test_tree_outline() {
        let nodes = vec![
            TreeCell {
                cell: Cell::plain("3"),
                left: Some(1),
                right: Some(2),
            },
            TreeCell {
                cell: Cell::plain("9"),
                left: None,
                right: None,
            },
            TreeCell {
                cell: Cell::plain("20"),
                left: None,
                right: None,
            },
        ];
        let lines = scene_lines(&Scene::new().tree("tree", Some(0), nodes));
        let rendered: Vec<String> = lines.iter().map(text).collect();
        assert_eq!(rendered[1], " 3 ");
        assert_eq!(rendered[2], "├─L  9 ");
        assert_eq!(rendered[3], "└─R  20 ");
    }
}
