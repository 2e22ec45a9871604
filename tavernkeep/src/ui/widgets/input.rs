//! Chat input widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::theme::AppTheme;

/// Input field for player actions
pub struct InputWidget<'a> {
    content: &'a str,
    cursor_position: usize,
    theme: &'a AppTheme,
    active: bool,
}

impl<'a> InputWidget<'a> {
    pub fn new(content: &'a str, theme: &'a AppTheme) -> Self {
        Self {
            content,
            cursor_position: content.chars().count(),
            theme,
            active: false,
        }
    }

    pub fn cursor_position(mut self, pos: usize) -> Self {
        self.cursor_position = pos;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.active {
            " Action [Enter send, Esc cancel] "
        } else {
            " Action [press i to type] "
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.active));

        let inner = block.inner(area);
        block.render(area, buf);

        let line = if self.content.is_empty() && !self.active {
            Line::from(Span::styled(
                "Describe your action or speak to the game master...",
                Style::default().add_modifier(Modifier::DIM),
            ))
        } else {
            // Character-based slicing for unicode safety
            let before: String = self.content.chars().take(self.cursor_position).collect();
            let at: String = self
                .content
                .chars()
                .nth(self.cursor_position)
                .map(|c| c.to_string())
                .unwrap_or_else(|| " ".to_string());
            let after: String = self.content.chars().skip(self.cursor_position + 1).collect();

            if self.active {
                Line::from(vec![
                    Span::styled("> ", self.theme.player_style()),
                    Span::raw(before),
                    Span::styled(at, Style::default().add_modifier(Modifier::REVERSED)),
                    Span::raw(after),
                ])
            } else {
                Line::from(vec![
                    Span::styled("> ", self.theme.player_style()),
                    Span::raw(self.content.to_string()),
                ])
            }
        };

        Paragraph::new(line).render(inner, buf);
    }
}
