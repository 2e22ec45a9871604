//! Companions panel widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use tavernkeep_core::session::CompanionState;

use crate::ui::theme::AppTheme;

/// The adventuring party, one card per companion.
pub struct CompanionsWidget<'a> {
    companions: &'a [CompanionState],
    theme: &'a AppTheme,
    focused: bool,
}

impl<'a> CompanionsWidget<'a> {
    pub fn new(companions: &'a [CompanionState], theme: &'a AppTheme) -> Self {
        Self {
            companions,
            theme,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for CompanionsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Companions ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.companions.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "Nobody travels with you yet.",
                Style::default().add_modifier(Modifier::DIM),
            )))
            .render(inner, buf);
            return;
        }

        let mut lines: Vec<Line> = Vec::new();
        for state in self.companions {
            let companion = &state.companion;
            let max_hp = state.max_hp();
            let ratio = if max_hp > 0 {
                f64::from(state.current_hp) / f64::from(max_hp)
            } else {
                0.0
            };

            lines.push(Line::from(vec![
                Span::styled(
                    companion.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("  Lv {}", companion.level)),
            ]));
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {} \u{2022} {}", companion.race, companion.class),
                    Style::default().add_modifier(Modifier::DIM),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("{}/{} HP", state.current_hp, max_hp),
                    Style::default().fg(self.theme.hp_color(ratio)),
                ),
            ]));
            if let Some(personality) = &companion.personality {
                lines.push(Line::from(Span::styled(
                    format!("  {personality}"),
                    Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
                )));
            }
            lines.push(Line::from(""));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
