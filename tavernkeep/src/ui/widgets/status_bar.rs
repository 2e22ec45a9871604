//! Status bar widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::app::{Flash, FlashKind};
use crate::ui::theme::AppTheme;

/// One-line status strip: flash notice, busy indicator, or key hints.
pub struct StatusBarWidget<'a> {
    flash: Option<&'a Flash>,
    busy: bool,
    hints: &'a str,
    theme: &'a AppTheme,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(theme: &'a AppTheme) -> Self {
        Self {
            flash: None,
            busy: false,
            hints: "",
            theme,
        }
    }

    pub fn flash(mut self, flash: Option<&'a Flash>) -> Self {
        self.flash = flash;
        self
    }

    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    pub fn hints(mut self, hints: &'a str) -> Self {
        self.hints = hints;
        self
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = if let Some(flash) = self.flash {
            let color = match flash.kind {
                FlashKind::Info => self.theme.info,
                FlashKind::Error => self.theme.error,
            };
            Line::from(Span::styled(
                format!(" {}", flash.text),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        } else if self.busy {
            Line::from(Span::styled(
                " The game master is thinking...",
                Style::default().add_modifier(Modifier::DIM),
            ))
        } else {
            Line::from(Span::styled(
                format!(" {}", self.hints),
                Style::default().add_modifier(Modifier::DIM),
            ))
        };

        Paragraph::new(line).render(area, buf);
    }
}
