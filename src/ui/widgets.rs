//! Shared widgets for the chartpad screens.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::theme::Theme;

/// A transient, non-fatal status message
#[derive(Debug, Clone)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

/// Tab strip naming the four screens
pub struct ScreenTabs<'a> {
    titles: &'a [&'a str],
    selected: usize,
    theme: &'a Theme,
}

impl<'a> ScreenTabs<'a> {
    pub fn new(titles: &'a [&'a str], selected: usize, theme: &'a Theme) -> Self {
        ScreenTabs {
            titles,
            selected,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let tabs = Tabs::new(self.titles.iter().map(|t| Line::from(*t)))
            .select(self.selected)
            .style(self.theme.normal_style())
            .highlight_style(self.theme.title_style())
            .divider(" | ")
            .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(tabs, area);
    }
}

/// Status bar widget with key hints and transient messages
pub struct StatusBar<'a> {
    hints: &'a str,
    message: Option<&'a StatusMessage>,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(hints: &'a str, message: Option<&'a StatusMessage>, theme: &'a Theme) -> Self {
        StatusBar {
            hints,
            message,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let line = match self.message {
            Some(StatusMessage::Error(msg)) => Line::from(Span::styled(
                format!("Error: {msg}"),
                self.theme.message_style(true),
            )),
            Some(StatusMessage::Info(msg)) => {
                Line::from(Span::styled(msg.clone(), self.theme.message_style(false)))
            }
            None => Line::from(Span::styled(
                self.hints,
                Style::default().add_modifier(Modifier::DIM),
            )),
        };

        let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::TOP));
        frame.render_widget(paragraph, area);
    }
}
