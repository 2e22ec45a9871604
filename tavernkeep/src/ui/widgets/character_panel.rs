//! Character panel widget for the game-screen sidebar

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

use tavernkeep_core::session::PlayerState;
use tavernkeep_core::Ability;

use crate::ui::theme::AppTheme;

/// Compact character card: identity, hit points, ability scores.
pub struct CharacterPanelWidget<'a> {
    player: &'a PlayerState,
    theme: &'a AppTheme,
    focused: bool,
}

impl<'a> CharacterPanelWidget<'a> {
    pub fn new(player: &'a PlayerState, theme: &'a AppTheme) -> Self {
        Self {
            player,
            theme,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for CharacterPanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let character = &self.player.character;

        let block = Block::default()
            .title(format!(" {} ", character.name))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Race / class / level
                Constraint::Length(2), // HP bar
                Constraint::Length(6), // Ability scores
                Constraint::Min(0),    // Portrait reference
            ])
            .split(inner);

        // Identity line
        let identity = Line::from(Span::styled(
            format!(
                "{} \u{2022} {} \u{2022} Level {}",
                character.race, character.class, character.level
            ),
            Style::default().add_modifier(Modifier::DIM),
        ));
        Paragraph::new(identity).render(chunks[0], buf);

        // HP bar
        let max_hp = self.player.max_hp();
        let ratio = if max_hp > 0 {
            f64::from(self.player.current_hp) / f64::from(max_hp)
        } else {
            0.0
        };
        Gauge::default()
            .gauge_style(Style::default().fg(self.theme.hp_color(ratio)))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(format!("HP: {}/{}", self.player.current_hp, max_hp))
            .render(chunks[1], buf);

        // Ability scores
        let scores: Vec<Line> = Ability::all()
            .iter()
            .map(|ability| {
                let score = character.scores.get(*ability);
                let modifier = character.scores.modifier(*ability);
                let mod_str = if modifier >= 0 {
                    format!("+{modifier}")
                } else {
                    format!("{modifier}")
                };
                Line::from(format!("{}: {score:2} ({mod_str})", ability.abbreviation()))
            })
            .collect();
        Paragraph::new(scores).render(chunks[2], buf);

        // Portrait asset reference
        if chunks[3].height > 0 {
            Paragraph::new(Line::from(Span::styled(
                character.portrait(),
                Style::default().add_modifier(Modifier::DIM),
            )))
            .render(chunks[3], buf);
        }
    }
}
