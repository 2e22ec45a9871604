//! Event handling for the Tavernkeep TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use tavernkeep_core::{Action, Character};

use crate::app::{App, ChatKind, InputMode, PendingOp, Screen};
use crate::effects::dispatch;

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    if app.screen != Screen::Game {
        return EventResult::Continue;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.scroll_up(3);
            EventResult::NeedsRedraw
        }
        MouseEventKind::ScrollDown => {
            app.scroll_down(3);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Global shortcut (always works)
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    // A new keypress replaces any lingering notice.
    app.clear_flash();

    match app.screen {
        Screen::Login => handle_auth_key(app, key, false),
        Screen::Register => handle_auth_key(app, key, true),
        Screen::Board => handle_board_key(app, key),
        Screen::CharacterForm => handle_form_key(app, key),
        Screen::Game => handle_game_key(app, key),
    }
}

// ============================================================================
// Login / register
// ============================================================================

fn handle_auth_key(app: &mut App, key: KeyEvent, registering: bool) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            if registering {
                app.screen = Screen::Login;
                EventResult::NeedsRedraw
            } else {
                EventResult::Quit
            }
        }
        KeyCode::F(2) => {
            app.auth.clear();
            app.screen = if registering {
                Screen::Login
            } else {
                Screen::Register
            };
            EventResult::NeedsRedraw
        }
        KeyCode::Tab | KeyCode::Down => {
            app.auth.next_field(registering);
            EventResult::NeedsRedraw
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.auth.prev_field(registering);
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            app.auth.backspace();
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            submit_auth(app, registering);
            EventResult::NeedsRedraw
        }
        KeyCode::Char(c) => {
            app.auth.type_char(c);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

fn submit_auth(app: &mut App, registering: bool) {
    let validation = if registering {
        app.auth.validate_register()
    } else {
        app.auth.validate_login()
    };
    if let Err(message) = validation {
        app.flash_error(message);
        return;
    }

    if registering {
        app.queue(PendingOp::Register {
            email: app.auth.username.clone(),
            password: app.auth.password.clone(),
        });
    } else {
        app.queue(PendingOp::Login {
            username: app.auth.username.clone(),
            password: app.auth.password.clone(),
        });
    }
}

// ============================================================================
// Board (character roster)
// ============================================================================

fn handle_board_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => EventResult::Quit,
        KeyCode::Char('j') | KeyCode::Down => {
            app.roster_down();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.roster_up();
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            play_selected(app);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('n') => {
            app.form.reset();
            app.screen = Screen::CharacterForm;
            EventResult::NeedsRedraw
        }
        KeyCode::Char('e') => {
            if let Some(record) = app.selected_record().cloned() {
                app.form.load_record(&record);
                app.screen = Screen::CharacterForm;
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Char('d') => {
            if app.offline {
                app.flash_info("Character management needs a backend");
            } else if let Some(id) = app.selected_record().and_then(|r| r.id) {
                app.queue(PendingOp::DeleteCharacter(id));
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Char('r') => {
            if !app.offline {
                app.queue(PendingOp::LoadRoster);
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Char('l') => {
            if !app.offline {
                app.queue(PendingOp::Logout);
            }
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Select the highlighted character and enter the game.
fn play_selected(app: &mut App) {
    if app.busy {
        app.flash_info("Please wait...");
        return;
    }
    let Some(record) = app.selected_record().cloned() else {
        app.flash_info("Create a character first");
        return;
    };
    let character = Character::from_record(&record);
    dispatch(app, Action::SelectCharacter(character));

    app.chat.clear();
    app.input_mode = InputMode::Normal;
    app.screen = Screen::Game;
    app.queue(PendingOp::StartGame);
}

// ============================================================================
// Character sheet form
// ============================================================================

fn handle_form_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            app.screen = Screen::Board;
            EventResult::NeedsRedraw
        }
        KeyCode::Tab | KeyCode::Down => {
            app.form.next_field();
            EventResult::NeedsRedraw
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.form.prev_field();
            EventResult::NeedsRedraw
        }
        KeyCode::Left => {
            app.form.adjust(-1);
            EventResult::NeedsRedraw
        }
        KeyCode::Right => {
            app.form.adjust(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            app.form.backspace();
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            submit_form(app);
            EventResult::NeedsRedraw
        }
        KeyCode::Char(c) => {
            app.form.type_char(c);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

fn submit_form(app: &mut App) {
    if let Err(message) = app.form.validate() {
        app.flash_error(message);
        return;
    }
    let record = app.form.build_record();
    if app.offline {
        // No backend to own the roster: fold the sheet in directly.
        match app.form.editing {
            Some(id) => {
                if let Some(existing) = app.roster.iter_mut().find(|r| r.id == Some(id)) {
                    *existing = record;
                }
                app.flash_info("Character updated");
            }
            None => {
                app.roster.push(record);
                app.roster_index = app.roster.len() - 1;
                app.flash_info("Character ready");
            }
        }
        app.screen = Screen::Board;
    } else {
        let editing = app.form.editing;
        app.queue(PendingOp::SaveCharacter { record, editing });
    }
}

// ============================================================================
// Game screen
// ============================================================================

fn handle_game_key(app: &mut App, key: KeyEvent) -> EventResult {
    // The dice overlay swallows keys while showing a settled result.
    if app.rolling.is_some() {
        if app.settled_roll().is_some()
            && matches!(
                key.code,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('q')
            )
        {
            app.close_roll();
        }
        return EventResult::NeedsRedraw;
    }

    match app.input_mode {
        InputMode::Normal => handle_game_normal_mode(app, key),
        InputMode::Insert => handle_game_insert_mode(app, key),
    }
}

fn handle_game_normal_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('i') => {
            app.input_mode = InputMode::Insert;
            EventResult::NeedsRedraw
        }
        KeyCode::Esc => {
            app.screen = Screen::Board;
            EventResult::NeedsRedraw
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.scroll_down(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.scroll_up(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('G') => {
            app.scroll_to_bottom();
            EventResult::NeedsRedraw
        }
        KeyCode::Tab => {
            app.cycle_focus();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('d') => {
            if app.busy {
                app.flash_info("Please wait...");
            } else {
                app.start_roll();
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Char('c') => {
            if app.busy {
                app.flash_info("Please wait...");
            } else if let Some(id) = app.next_companion() {
                app.queue(PendingOp::CompanionAction { id });
            } else {
                app.flash_info("No companions yet");
            }
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

fn handle_game_insert_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            if app.busy {
                app.flash_info("Please wait...");
            } else if let Some(input) = app.submit_input() {
                let author = app
                    .session
                    .player()
                    .map(|p| p.character.name.clone())
                    .unwrap_or_else(|| "You".to_string());
                app.add_chat(author, ChatKind::Player, input.clone());
                app.queue(PendingOp::PlayerAction(input));
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Left => {
            app.cursor_left();
            EventResult::NeedsRedraw
        }
        KeyCode::Right => {
            app.cursor_right();
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            app.backspace();
            EventResult::NeedsRedraw
        }
        KeyCode::Char(c) => {
            app.type_char(c);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::GmDriver;
    use crate::demo::{demo_roster, DemoGameMaster};
    use tavernkeep_core::ClientStore;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn offline_app() -> App {
        let mut app = App::new(
            gamemaster::Client::new("http://example.test/api"),
            ClientStore::new(".test-tavernkeep"),
            GmDriver::Demo(DemoGameMaster::new().without_delay()),
            true,
        );
        app.roster = demo_roster();
        app
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let mut app = offline_app();
        let event = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(handle_event(&mut app, event), EventResult::Quit);
    }

    #[test]
    fn test_board_navigation() {
        let mut app = offline_app();
        handle_event(&mut app, key(KeyCode::Char('j')));
        handle_event(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.roster_index, 2);
        handle_event(&mut app, key(KeyCode::Char('k')));
        assert_eq!(app.roster_index, 1);
    }

    #[tokio::test]
    async fn test_board_enter_selects_and_starts_game() {
        let mut app = offline_app();
        handle_event(&mut app, key(KeyCode::Enter));

        assert_eq!(app.screen, Screen::Game);
        assert!(app.session.player().is_some());
        assert!(matches!(app.pending, Some(PendingOp::StartGame)));
        assert!(app.busy);
    }

    #[test]
    fn test_new_character_opens_form() {
        let mut app = offline_app();
        handle_event(&mut app, key(KeyCode::Char('n')));
        assert_eq!(app.screen, Screen::CharacterForm);
    }

    #[test]
    fn test_form_requires_name() {
        let mut app = offline_app();
        app.screen = Screen::CharacterForm;
        handle_event(&mut app, key(KeyCode::Enter));
        // Validation failed locally: still on the form, notice shown.
        assert_eq!(app.screen, Screen::CharacterForm);
        assert!(app.flash.is_some());
    }

    #[test]
    fn test_offline_form_submission_joins_roster() {
        let mut app = offline_app();
        let before = app.roster.len();
        app.screen = Screen::CharacterForm;
        for c in "Borin".chars() {
            handle_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_event(&mut app, key(KeyCode::Enter));

        assert_eq!(app.screen, Screen::Board);
        assert_eq!(app.roster.len(), before + 1);
        assert_eq!(app.roster.last().unwrap().name, "Borin");
    }

    #[tokio::test]
    async fn test_game_insert_mode_submits_action() {
        let mut app = offline_app();
        handle_event(&mut app, key(KeyCode::Enter)); // play
        app.pending = None;
        app.busy = false;

        handle_event(&mut app, key(KeyCode::Char('i')));
        assert_eq!(app.input_mode, InputMode::Insert);
        for c in "I open the door".chars() {
            handle_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_event(&mut app, key(KeyCode::Enter));

        assert!(matches!(app.pending, Some(PendingOp::PlayerAction(_))));
        assert!(app.chat.iter().any(|m| m.text == "I open the door"));
    }

    #[tokio::test]
    async fn test_duplicate_submission_blocked_while_busy() {
        let mut app = offline_app();
        handle_event(&mut app, key(KeyCode::Enter)); // play, queues StartGame
        app.input_mode = InputMode::Insert;
        for c in "hello".chars() {
            handle_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_event(&mut app, key(KeyCode::Enter));

        // Still the original op; the chat input was not consumed.
        assert!(matches!(app.pending, Some(PendingOp::StartGame)));
        assert_eq!(app.input_buffer(), "hello");
    }

    #[test]
    fn test_dice_hotkey_starts_animation() {
        let mut app = offline_app();
        app.screen = Screen::Game;
        handle_event(&mut app, key(KeyCode::Char('d')));
        assert!(app.rolling.is_some());
    }

    #[tokio::test]
    async fn test_companion_hotkey_round_robins() {
        use tavernkeep_core::{Action, Companion};

        let mut app = offline_app();
        app.screen = Screen::Game;
        crate::effects::dispatch(
            &mut app,
            Action::SetCompanions(vec![
                Companion::new("Mira", "Elf", "Ranger"),
                Companion::new("Durn", "Dwarf", "Cleric"),
            ]),
        );
        let ids: Vec<_> = app.session.companions().iter().map(|c| c.id).collect();

        handle_event(&mut app, key(KeyCode::Char('c')));
        let first = match app.pending.take() {
            Some(PendingOp::CompanionAction { id }) => id,
            other => panic!("unexpected op: {other:?}"),
        };
        app.busy = false;
        handle_event(&mut app, key(KeyCode::Char('c')));
        let second = match app.pending.take() {
            Some(PendingOp::CompanionAction { id }) => id,
            other => panic!("unexpected op: {other:?}"),
        };

        assert_eq!(first, ids[0]);
        assert_eq!(second, ids[1]);
    }

    #[test]
    fn test_auth_fields_and_validation() {
        let mut app = offline_app();
        app.screen = Screen::Login;
        handle_event(&mut app, key(KeyCode::Enter));
        assert!(app.flash.is_some()); // empty fields rejected locally

        for c in "hero".chars() {
            handle_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_event(&mut app, key(KeyCode::Tab));
        for c in "secret".chars() {
            handle_event(&mut app, key(KeyCode::Char(c)));
        }
        assert_eq!(app.auth.username, "hero");
        assert_eq!(app.auth.password, "secret");
    }
}
