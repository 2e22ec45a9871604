//! Animated d20 overlay widget

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::app::RollingD20;
use crate::ui::theme::AppTheme;

/// Overlay showing a d20 tumbling, then the settled result.
pub struct DiceOverlayWidget<'a> {
    rolling: &'a RollingD20,
    theme: &'a AppTheme,
}

impl<'a> DiceOverlayWidget<'a> {
    pub fn new(rolling: &'a RollingD20, theme: &'a AppTheme) -> Self {
        Self { rolling, theme }
    }
}

impl Widget for DiceOverlayWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" d20 ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = vec![Line::from("")];

        match self.rolling.result {
            None => {
                let spin_chars = ['|', '/', '-', '\\'];
                let spin = spin_chars[(self.rolling.frames_elapsed as usize) % 4];
                lines.push(Line::from(Span::styled(
                    format!("{spin}  {}  {spin}", self.rolling.display_value),
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Rolling...",
                    Style::default().add_modifier(Modifier::DIM),
                )));
            }
            Some(value) => {
                let style = if value == 20 {
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD)
                } else if value == 1 {
                    Style::default()
                        .fg(self.theme.error)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };
                lines.push(Line::from(Span::styled(format!("{value}"), style)));
                lines.push(Line::from(""));
                let verdict = match value {
                    20 => "Critical!",
                    1 => "Fumble!",
                    _ => "The die has spoken.",
                };
                lines.push(Line::from(verdict));
                lines.push(Line::from(Span::styled(
                    "Press Enter to continue",
                    Style::default().add_modifier(Modifier::DIM),
                )));
            }
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
