//! Color theme and styling for the Tavernkeep TUI

use ratatui::style::{Color, Modifier, Style};

/// Application color theme
#[derive(Debug, Clone)]
pub struct AppTheme {
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,
    pub accent: Color,

    // HP colors
    pub hp_healthy: Color,
    pub hp_wounded: Color,
    pub hp_critical: Color,

    // XP bar
    pub xp_fill: Color,

    // Chat colors
    pub gm_text: Color,
    pub narrator_text: Color,
    pub system_text: Color,
    pub player_text: Color,
    pub npc_text: Color,

    // Flash colors
    pub info: Color,
    pub error: Color,
}

impl Default for AppTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            accent: Color::Yellow,

            hp_healthy: Color::Green,
            hp_wounded: Color::Yellow,
            hp_critical: Color::Red,

            xp_fill: Color::Blue,

            gm_text: Color::White,
            narrator_text: Color::Magenta,
            system_text: Color::DarkGray,
            player_text: Color::Cyan,
            npc_text: Color::Yellow,

            info: Color::Green,
            error: Color::Red,
        }
    }
}

impl AppTheme {
    /// Get style for game-master narration
    pub fn gm_style(&self) -> Style {
        Style::default().fg(self.gm_text)
    }

    /// Get style for narrator flavor text
    pub fn narrator_style(&self) -> Style {
        Style::default().fg(self.narrator_text)
    }

    /// Get style for system messages
    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    /// Get style for player actions
    pub fn player_style(&self) -> Style {
        Style::default()
            .fg(self.player_text)
            .add_modifier(Modifier::ITALIC)
    }

    /// Get style for NPC dialogue
    pub fn npc_style(&self) -> Style {
        Style::default().fg(self.npc_text)
    }

    /// Get HP bar color based on ratio
    pub fn hp_color(&self, ratio: f64) -> Color {
        if ratio > 0.5 {
            self.hp_healthy
        } else if ratio > 0.25 {
            self.hp_wounded
        } else {
            self.hp_critical
        }
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    /// Get title style
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for field labels under the cursor
    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.border_focused)
            .add_modifier(Modifier::BOLD)
    }
}
