//! Experience bar widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge, Widget},
};

use tavernkeep_core::progression::{
    xp_progress_percentage, xp_threshold, xp_to_next_level, MAX_LEVEL,
};

use crate::ui::theme::AppTheme;

/// Progress toward the next level.
pub struct XpBarWidget<'a> {
    xp: u32,
    level: u8,
    theme: &'a AppTheme,
}

impl<'a> XpBarWidget<'a> {
    pub fn new(xp: u32, level: u8, theme: &'a AppTheme) -> Self {
        Self { xp, level, theme }
    }
}

impl Widget for XpBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let at_cap = self.level >= MAX_LEVEL;

        let title = if at_cap {
            " Experience [MAX] ".to_string()
        } else {
            format!(" Experience [next: {} XP] ", xp_to_next_level(self.xp, self.level))
        };

        let label = if at_cap {
            "MAX".to_string()
        } else {
            let floor = xp_threshold(self.level);
            let required = xp_threshold(self.level + 1) - floor;
            format!("{}/{} XP", self.xp.saturating_sub(floor), required)
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));
        let inner = block.inner(area);
        block.render(area, buf);

        Gauge::default()
            .gauge_style(Style::default().fg(self.theme.xp_fill))
            .ratio(xp_progress_percentage(self.xp, self.level) / 100.0)
            .label(label)
            .render(inner, buf);
    }
}
