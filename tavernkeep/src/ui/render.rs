//! Render orchestration for the Tavernkeep TUI

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, InputMode, Screen};
use crate::forms::{AuthField, FormField};
use crate::ui::layout::{centered_rect_fixed, GameLayout};
use crate::ui::widgets::{
    CharacterPanelWidget, ChatWidget, CompanionsWidget, DiceOverlayWidget, InputWidget,
    StatusBarWidget, XpBarWidget,
};

/// Which panel is focused on the game screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPanel {
    #[default]
    Chat,
    Character,
    Companions,
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    match app.screen {
        Screen::Login => render_auth(frame, app, false),
        Screen::Register => render_auth(frame, app, true),
        Screen::Board => render_board(frame, app),
        Screen::CharacterForm => render_form(frame, app),
        Screen::Game => render_game(frame, app),
    }
}

// ============================================================================
// Login / register
// ============================================================================

fn render_auth(frame: &mut Frame, app: &App, registering: bool) {
    let area = frame.area();
    let box_area = centered_rect_fixed(52, if registering { 13 } else { 11 }, area);

    let title = if registering {
        " Tavernkeep - Register "
    } else {
        " Tavernkeep - Login "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));
    let inner = block.inner(box_area);
    frame.render_widget(Clear, box_area);
    frame.render_widget(block, box_area);

    let mut lines = vec![
        Line::from(Span::styled(
            "Every great tale starts at the tavern.",
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(""),
    ];

    let username_label = if registering { "Email" } else { "Username" };
    lines.push(field_line(
        &app.theme,
        username_label,
        &app.auth.username,
        app.auth.field == AuthField::Username,
    ));
    lines.push(field_line(
        &app.theme,
        "Password",
        &mask(&app.auth.password),
        app.auth.field == AuthField::Password,
    ));
    if registering {
        lines.push(field_line(
            &app.theme,
            "Confirm",
            &mask(&app.auth.confirm),
            app.auth.field == AuthField::Confirm,
        ));
    }

    lines.push(Line::from(""));
    let hints = if registering {
        "Enter register \u{2022} F2 back to login \u{2022} Tab next field"
    } else {
        "Enter log in \u{2022} F2 register \u{2022} Tab next field \u{2022} Esc quit"
    };
    lines.push(Line::from(Span::styled(
        hints,
        Style::default().add_modifier(Modifier::DIM),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
    render_status_line(frame, app, area, "");
}

fn mask(value: &str) -> String {
    "*".repeat(value.chars().count())
}

fn field_line<'a>(
    theme: &crate::ui::theme::AppTheme,
    label: &'a str,
    value: &str,
    selected: bool,
) -> Line<'a> {
    let label_style = if selected {
        theme.selected_style()
    } else {
        Style::default()
    };
    let marker = if selected { "> " } else { "  " };
    Line::from(vec![
        Span::styled(format!("{marker}{label:<10}"), label_style),
        Span::raw(format!("{value}_")),
    ])
}

// ============================================================================
// Board
// ============================================================================

fn render_board(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(area);

    let title = if app.offline {
        " Tavernkeep \u{2014} My Characters (offline demo) "
    } else {
        " Tavernkeep \u{2014} My Characters "
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(title, app.theme.title_style()))),
        chunks[0],
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    if app.roster.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from("No characters yet."),
            Line::from(""),
            Line::from(Span::styled(
                "Press n to create your first hero!",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .block(block);
        frame.render_widget(empty, chunks[1]);
    } else {
        let items: Vec<ListItem> = app
            .roster
            .iter()
            .map(|record| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<24}", record.name),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!(
                        "{} / {}  Lv {}",
                        record.race, record.class, record.level
                    )),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(app.theme.selected_style())
            .highlight_symbol("\u{25b6} ");

        let mut state = ListState::default();
        state.select(Some(app.roster_index));
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    render_status_line(
        frame,
        app,
        chunks[2],
        "Enter play \u{2022} n new \u{2022} e edit \u{2022} d delete \u{2022} r refresh \u{2022} l log out \u{2022} q quit",
    );
}

// ============================================================================
// Character sheet
// ============================================================================

fn render_form(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let box_area = centered_rect_fixed(58, 19, area);

    let title = if app.form.editing.is_some() {
        " Character Sheet - Edit "
    } else {
        " Character Sheet - New Hero "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));
    let inner = block.inner(box_area);
    frame.render_widget(Clear, box_area);
    frame.render_widget(block, box_area);

    let form = &app.form;
    let mut lines = vec![
        field_line(&app.theme, "Name", &form.name, form.field() == FormField::Name),
        choice_line(app, "Race", form.race().name(), FormField::Race),
        choice_line(app, "Class", form.class().name(), FormField::Class),
        choice_line(app, "Players", &form.players.to_string(), FormField::Players),
        Line::from(""),
        Line::from(Span::styled(
            "Abilities (8-20)",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    for ability in tavernkeep_core::Ability::all() {
        let value = form.scores.get(ability);
        lines.push(choice_line(
            app,
            ability.name(),
            &format!("{value:2}  {}", meter(value)),
            FormField::Stat(ability),
        ));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter save \u{2022} Tab next \u{2022} \u{2190}/\u{2192} adjust \u{2022} Esc cancel",
        Style::default().add_modifier(Modifier::DIM),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
    render_status_line(frame, app, area, "");
}

fn choice_line<'a>(app: &App, label: &'a str, value: &str, field: FormField) -> Line<'a> {
    let selected = app.form.field() == field;
    let label_style = if selected {
        app.theme.selected_style()
    } else {
        Style::default()
    };
    let marker = if selected { "> " } else { "  " };
    let value = if selected {
        format!("\u{2190} {value} \u{2192}")
    } else {
        value.to_string()
    };
    Line::from(vec![
        Span::styled(format!("{marker}{label:<14}"), label_style),
        Span::raw(value),
    ])
}

/// A tiny bar visualizing a score in 8-20.
fn meter(value: u8) -> String {
    let filled = (value.saturating_sub(8) / 2) as usize;
    format!("[{}{}]", "=".repeat(filled), " ".repeat(6 - filled))
}

// ============================================================================
// Game
// ============================================================================

fn render_game(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let layout = GameLayout::calculate(area);

    // Title bar
    let title = match app.session.player() {
        Some(player) => format!(
            " Tavernkeep \u{2014} {} the {} ",
            player.character.name, player.character.class
        ),
        None => " Tavernkeep ".to_string(),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(title, app.theme.title_style()))),
        layout.title_area,
    );

    // Chat transcript
    let chat = ChatWidget::new(&app.chat, &app.theme)
        .scroll(app.chat_scroll)
        .focused(app.focused_panel == FocusedPanel::Chat);
    frame.render_widget(chat, layout.chat_area);

    // Sidebar
    if let Some(player) = app.session.player() {
        let panel = CharacterPanelWidget::new(player, &app.theme)
            .focused(app.focused_panel == FocusedPanel::Character);
        frame.render_widget(panel, layout.character_area);

        let xp_bar = XpBarWidget::new(player.character.xp, player.character.level, &app.theme);
        frame.render_widget(xp_bar, layout.xp_area);
    }

    let companions = CompanionsWidget::new(app.session.companions(), &app.theme)
        .focused(app.focused_panel == FocusedPanel::Companions);
    frame.render_widget(companions, layout.companions_area);

    // Status bar
    let status = StatusBarWidget::new(&app.theme)
        .flash(app.flash.as_ref())
        .busy(app.busy)
        .hints("i type \u{2022} d roll d20 \u{2022} c companion \u{2022} j/k scroll \u{2022} Esc board");
    frame.render_widget(status, layout.status_area);

    // Input area
    let input = InputWidget::new(app.input_buffer(), &app.theme)
        .cursor_position(app.cursor_position())
        .active(app.input_mode == InputMode::Insert);
    frame.render_widget(input, layout.input_area);

    // Dice overlay
    if let Some(rolling) = &app.rolling {
        let overlay_area = centered_rect_fixed(30, 9, area);
        frame.render_widget(Clear, overlay_area);
        frame.render_widget(DiceOverlayWidget::new(rolling, &app.theme), overlay_area);
    }
}

// ============================================================================
// Shared
// ============================================================================

/// Bottom status line used by the non-game screens.
fn render_status_line(frame: &mut Frame, app: &App, area: Rect, hints: &str) {
    let status_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };
    let status = StatusBarWidget::new(&app.theme)
        .flash(app.flash.as_ref())
        .busy(app.busy)
        .hints(hints);
    frame.render_widget(status, status_area);
}
