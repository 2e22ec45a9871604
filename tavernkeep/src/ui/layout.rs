//! Layout calculations for the Tavernkeep TUI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Areas of the game screen
pub struct GameLayout {
    pub title_area: Rect,
    pub chat_area: Rect,
    pub character_area: Rect,
    pub xp_area: Rect,
    pub companions_area: Rect,
    pub status_area: Rect,
    pub input_area: Rect,
}

impl GameLayout {
    /// Calculate layout based on terminal size
    pub fn calculate(area: Rect) -> Self {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title bar
                Constraint::Min(8),    // Main content
                Constraint::Length(1), // Status bar
                Constraint::Length(3), // Input area
            ])
            .split(area);

        // Content area: chat + sidebar
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(main_chunks[1]);

        // Sidebar: character panel, xp bar, companions
        let sidebar_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(13),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(content_chunks[1]);

        Self {
            title_area: main_chunks[0],
            chat_area: content_chunks[0],
            character_area: sidebar_chunks[0],
            xp_area: sidebar_chunks[1],
            companions_area: sidebar_chunks[2],
            status_area: main_chunks[2],
            input_area: main_chunks[3],
        }
    }
}

/// A centered rectangle of fixed size, clamped to the available area.
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
