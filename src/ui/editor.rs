//! Data-row panel for the chart editors.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::editor::{EditorState, InputState};

use super::theme::Theme;

/// List of editable data rows for one chart editor
pub struct RowPanel<'a> {
    editor: &'a EditorState,
    theme: &'a Theme,
}

impl<'a> RowPanel<'a> {
    pub fn new(editor: &'a EditorState, theme: &'a Theme) -> Self {
        RowPanel { editor, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let items: Vec<ListItem> = self
            .editor
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let swatch_color = self.theme.point_color(&row.color, i);
                let label = if row.label.is_empty() {
                    "(unnamed)"
                } else {
                    row.label.as_str()
                };
                ListItem::new(Line::from(vec![
                    Span::styled("■ ", Style::default().fg(swatch_color)),
                    Span::raw(format!("{label:<14.14} ")),
                    Span::styled(
                        format!("{:>8.1} ", row.value),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        row.color.clone(),
                        Style::default().add_modifier(Modifier::DIM),
                    ),
                ]))
            })
            .collect();

        let border_style = if focused {
            self.theme.focused_border_style()
        } else {
            self.theme.border_style()
        };

        let title = format!(
            " {} chart data ({} rows) ",
            self.editor.kind.display_name(),
            self.editor.rows.len()
        );

        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title_style(self.theme.title_style()),
            )
            .highlight_style(self.theme.highlight_style())
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.editor.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

/// One-line input prompt shown while a row field is being edited
pub struct InputPrompt<'a> {
    input: &'a InputState,
    theme: &'a Theme,
}

impl<'a> InputPrompt<'a> {
    pub fn new(input: &'a InputState, theme: &'a Theme) -> Self {
        InputPrompt { input, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                format!(" {}: ", self.input.field.title()),
                self.theme.title_style(),
            ),
            Span::raw(self.input.buffer.clone()),
            Span::styled("█", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            Span::styled(
                "  (Enter: apply, Esc: cancel)",
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]);
        let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::TOP));
        frame.render_widget(paragraph, area);
    }
}
