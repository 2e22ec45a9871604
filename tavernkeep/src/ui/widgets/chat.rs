//! Chat transcript widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::app::{ChatItem, ChatKind};
use crate::ui::theme::AppTheme;

/// Widget for displaying the session transcript
pub struct ChatWidget<'a> {
    items: &'a [ChatItem],
    scroll: usize,
    theme: &'a AppTheme,
    focused: bool,
}

impl<'a> ChatWidget<'a> {
    pub fn new(items: &'a [ChatItem], theme: &'a AppTheme) -> Self {
        Self {
            items,
            scroll: 0,
            theme,
            focused: false,
        }
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn style_for_kind(&self, kind: ChatKind) -> Style {
        match kind {
            ChatKind::GameMaster => self.theme.gm_style(),
            ChatKind::Narrator => self.theme.narrator_style(),
            ChatKind::System => self.theme.system_style(),
            ChatKind::Player => self.theme.player_style(),
            ChatKind::Npc => self.theme.npc_style(),
        }
    }
}

impl Widget for ChatWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.focused {
            " Adventure [j/k scroll] "
        } else {
            " Adventure "
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        for item in self.items {
            let style = self.style_for_kind(item.kind);
            let prefix = match item.kind {
                ChatKind::Player => "> ",
                _ => "",
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{prefix}{}: ", item.author),
                    style.add_modifier(Modifier::BOLD),
                ),
                Span::styled(item.text.clone(), style),
            ]));
            lines.push(Line::from(""));
        }

        // Estimate the wrapped height so scrolling stops at the bottom.
        let width = inner.width.max(1) as usize;
        let total_rows: usize = lines
            .iter()
            .map(|line| (line.width().max(1)).div_ceil(width))
            .sum();
        let max_scroll = total_rows.saturating_sub(inner.height as usize);
        let scroll = self.scroll.min(max_scroll);

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll as u16, 0))
            .render(inner, buf);
    }
}
