//! Saved chart browser widgets: the record list and its metadata panel.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::data::ChartRecord;

use super::theme::Theme;

/// List of saved records for one collection
pub struct SavedList<'a> {
    records: &'a [ChartRecord],
    selected: usize,
    kind_name: &'a str,
    theme: &'a Theme,
}

impl<'a> SavedList<'a> {
    pub fn new(
        records: &'a [ChartRecord],
        selected: usize,
        kind_name: &'a str,
        theme: &'a Theme,
    ) -> Self {
        SavedList {
            records,
            selected,
            kind_name,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let border_style = if focused {
            self.theme.focused_border_style()
        } else {
            self.theme.border_style()
        };
        let block = Block::default()
            .title(format!(
                " Saved {} charts ({}) ",
                self.kind_name,
                self.records.len()
            ))
            .borders(Borders::ALL)
            .border_style(border_style)
            .title_style(self.theme.title_style());

        if self.records.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let message = Paragraph::new(format!(
                "No saved {} charts yet.\nSave one from the editor with 'w'.",
                self.kind_name
            ))
            .style(Style::default().add_modifier(Modifier::DIM))
            .alignment(ratatui::layout::Alignment::Center)
            .wrap(Wrap { trim: true });
            frame.render_widget(message, inner);
            return;
        }

        let items: Vec<ListItem> = self
            .records
            .iter()
            .map(|r| {
                ListItem::new(format!(
                    "{}  {} pts",
                    r.timestamp.format("%Y-%m-%d %H:%M"),
                    r.data.len()
                ))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(self.theme.highlight_style())
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

/// Metadata panel for the selected saved record
pub struct RecordDetails<'a> {
    record: Option<&'a ChartRecord>,
    theme: &'a Theme,
}

impl<'a> RecordDetails<'a> {
    pub fn new(record: Option<&'a ChartRecord>, theme: &'a Theme) -> Self {
        RecordDetails { record, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let text: Vec<Line> = match self.record {
            Some(r) => vec![
                Line::from(format!("id: {}", r.id)),
                Line::from(format!("saved: {}", r.timestamp.to_rfc3339())),
                Line::from(format!("points: {}", r.data.len())),
            ],
            None => vec![Line::from("no chart selected")],
        };

        let paragraph = Paragraph::new(text)
            .block(
                Block::default()
                    .title(" Details ")
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style()),
            )
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, area);
    }
}
