//! Tavernkeep terminal client.
//!
//! A terminal interface for the TTRPG companion backend: account login,
//! character management, and a chat-driven game-master session.
//!
//! # Offline Mode
//!
//! Run with `--offline` to play against the built-in demo game master,
//! no backend required:
//!
//! ```bash
//! cargo run -p tavernkeep -- --offline
//! ```

mod app;
mod demo;
mod effects;
mod events;
mod forms;
mod ui;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::time::Duration;

use tavernkeep_core::{Action, ClientStore, GameMaster, Opening};

use app::{App, GmDriver, PendingOp, Screen};
use demo::{demo_roster, DemoGameMaster};
use events::{handle_event, EventResult};
use ui::render::render;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let offline = args.iter().any(|a| a == "--offline");

    let mut client = match arg_value(&args, "--url") {
        Some(url) => gamemaster::Client::new(url),
        None => gamemaster::Client::from_env(),
    };
    let store = match arg_value(&args, "--data-dir") {
        Some(dir) => ClientStore::new(dir),
        None => ClientStore::from_env(),
    };

    init_tracing(&store);

    // Restore the persisted credential before drawing anything.
    if !offline {
        match store.load_token().await {
            Ok(Some(token)) => client.set_token(token),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "failed to read stored token"),
        }
    }

    let gm = if offline {
        GmDriver::Demo(DemoGameMaster::new())
    } else {
        GmDriver::Remote(GameMaster::new(client.clone()))
    };
    let mut app = App::new(client, store, gm, offline);

    if offline {
        app.roster = demo_roster();
    }

    // Restore the selected character from the previous run.
    match app.store.load_character().await {
        Ok(Some(character)) => {
            effects::dispatch(&mut app, Action::RestoreCharacter(character));
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "failed to restore selected character"),
    }

    if !offline && app.client.is_authenticated() {
        app.queue(PendingOp::LoadRoster);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    loop {
        // Render
        terminal.draw(|f| render(f, &app))?;

        // Process the outstanding network operation, if any. Events are
        // not read while it runs, so no two actions race.
        if let Some(op) = app.pending.take() {
            app.busy = false;
            process_pending(&mut app, op).await;
            continue;
        }

        // Poll for events with timeout for animations
        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            if handle_event(&mut app, ev) == EventResult::Quit {
                return Ok(());
            }
        } else if let Some(value) = app.tick() {
            // The d20 animation settled on a value.
            effects::resolve_roll(&mut app, value);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Run one queued operation to completion and fold the outcome into the
/// app state. Failures degrade to flash notices; nothing here panics.
async fn process_pending(app: &mut App, op: PendingOp) {
    match op {
        PendingOp::Login { username, password } => {
            match app.client.login(&username, &password).await {
                Ok(token) => {
                    if let Err(e) = app.store.save_token(&token).await {
                        tracing::warn!(error = %e, "failed to persist token");
                    }
                    if let GmDriver::Remote(gm) = &mut app.gm {
                        gm.client_mut().set_token(token);
                    }
                    app.auth.clear();
                    app.screen = Screen::Board;
                    app.flash_info("Welcome to the tavern!");
                    app.queue(PendingOp::LoadRoster);
                }
                Err(e) => handle_api_error(app, e).await,
            }
        }

        PendingOp::Register { email, password } => {
            match app.client.register(&email, &password).await {
                Ok(_) => {
                    app.auth.password.clear();
                    app.auth.confirm.clear();
                    app.screen = Screen::Login;
                    app.flash_info("Account created - log in to play");
                }
                Err(e) => handle_api_error(app, e).await,
            }
        }

        PendingOp::LoadRoster => match app.client.list_characters().await {
            Ok(roster) => {
                app.roster = roster;
                app.roster_index = app.roster_index.min(app.roster.len().saturating_sub(1));
            }
            Err(e) => handle_api_error(app, e).await,
        },

        PendingOp::SaveCharacter { record, editing } => {
            let result = match editing {
                Some(id) => app.client.update_character(id, &record).await,
                None => app.client.create_character(&record).await,
            };
            match result {
                Ok(_) => {
                    app.screen = Screen::Board;
                    app.flash_info(format!("{} is ready for adventure", record.name));
                    app.queue(PendingOp::LoadRoster);
                }
                Err(e) => handle_api_error(app, e).await,
            }
        }

        PendingOp::DeleteCharacter(id) => match app.client.delete_character(id).await {
            Ok(()) => {
                app.flash_info("Character deleted");
                app.queue(PendingOp::LoadRoster);
            }
            Err(e) => handle_api_error(app, e).await,
        },

        PendingOp::StartGame => {
            let Some(character) = app.session.player().map(|p| p.character.clone()) else {
                app.flash_error("No character selected");
                app.screen = Screen::Board;
                return;
            };
            match &mut app.gm {
                GmDriver::Remote(gm) => match gm.start(&character).await {
                    Ok(opening) => apply_opening(app, opening),
                    Err(e) => handle_api_error(app, e).await,
                },
                GmDriver::Demo(gm) => {
                    tokio::time::sleep(gm.delay()).await;
                    let opening = gm.start(&character);
                    apply_opening(app, opening);
                }
            }
        }

        PendingOp::PlayerAction(text) => {
            let Some(character) = app.session.player().map(|p| p.character.clone()) else {
                app.flash_error("No character selected");
                return;
            };
            match &mut app.gm {
                GmDriver::Remote(gm) => match gm.player_action(&character, &text).await {
                    Ok(reply) => effects::handle_gm_reply(app, reply),
                    Err(e) => handle_api_error(app, e).await,
                },
                GmDriver::Demo(gm) => {
                    tokio::time::sleep(gm.delay()).await;
                    let reply = gm.player_action(&text);
                    effects::handle_gm_reply(app, reply);
                }
            }
        }

        PendingOp::DiceResult { roll, check } => {
            let Some(character) = app.session.player().map(|p| p.character.clone()) else {
                return;
            };
            match &mut app.gm {
                GmDriver::Remote(gm) => match gm.dice_result(&character, &roll, check).await {
                    Ok(reply) => effects::handle_gm_reply(app, reply),
                    Err(e) => handle_api_error(app, e).await,
                },
                GmDriver::Demo(gm) => {
                    tokio::time::sleep(gm.delay()).await;
                    let reply = gm.dice_result(&roll);
                    effects::handle_gm_reply(app, reply);
                }
            }
        }

        PendingOp::CompanionAction { id } => {
            let Some(companion) = app.session.companion(id).map(|c| c.companion.clone()) else {
                return;
            };
            let situation = match &app.gm {
                GmDriver::Remote(gm) => gm.context().to_string(),
                GmDriver::Demo(_) => app
                    .chat
                    .last()
                    .map(|item| item.text.clone())
                    .unwrap_or_default(),
            };
            match &mut app.gm {
                GmDriver::Remote(gm) => match gm.npc_action(&companion, &situation).await {
                    Ok(reply) => {
                        app.add_chat(reply.npc_name, app::ChatKind::Npc, reply.npc_response);
                    }
                    Err(e) => handle_api_error(app, e).await,
                },
                GmDriver::Demo(gm) => {
                    tokio::time::sleep(gm.delay()).await;
                    let reply = gm.npc_action(&companion);
                    app.add_chat(reply.npc_name, app::ChatKind::Npc, reply.npc_response);
                }
            }
        }

        PendingOp::Logout => {
            if let Err(e) = app.store.clear_token().await {
                tracing::warn!(error = %e, "failed to clear stored token");
            }
            app.client.clear_token();
            if let GmDriver::Remote(gm) = &mut app.gm {
                gm.client_mut().clear_token();
                gm.reset();
            }
            app.screen = Screen::Login;
            app.flash_info("Logged out");
        }
    }
}

/// Fold a game opening into the chat and the session state.
fn apply_opening(app: &mut App, opening: Opening) {
    effects::handle_gm_reply(app, opening.introduction);
    effects::dispatch(app, Action::SetCompanions(opening.companions));
}

/// Surface a backend failure. Session expiry additionally clears the
/// stored credential and routes back to the login screen.
async fn handle_api_error(app: &mut App, error: gamemaster::Error) {
    match error {
        gamemaster::Error::SessionExpired => {
            if let Err(e) = app.store.clear_token().await {
                tracing::warn!(error = %e, "failed to clear stored token");
            }
            app.client.clear_token();
            if let GmDriver::Remote(gm) = &mut app.gm {
                gm.client_mut().clear_token();
            }
            app.screen = Screen::Login;
            app.flash_error("Session expired, please log in again");
        }
        gamemaster::Error::InvalidCredentials => {
            app.flash_error("Invalid username or password");
        }
        other => {
            tracing::warn!(error = %other, "backend call failed");
            app.flash_error(other.to_string());
        }
    }
}

/// Install the file-backed tracing subscriber when `TAVERNKEEP_LOG` is
/// set. Logs cannot go to the terminal once the TUI owns it.
fn init_tracing(store: &ClientStore) {
    let Ok(filter) = std::env::var("TAVERNKEEP_LOG") else {
        return;
    };
    if std::fs::create_dir_all(store.dir()).is_err() {
        return;
    }
    let path = store.dir().join("tavernkeep.log");
    if let Ok(file) = std::fs::File::create(path) {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .init();
    }
}

fn arg_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn print_help() {
    println!("Tavernkeep - terminal client for the TTRPG companion");
    println!();
    println!("USAGE:");
    println!("  tavernkeep [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help        Show this help message");
    println!("  --offline         Play against the built-in demo game master");
    println!("  --url <URL>       Backend base URL (default: $GAMEMASTER_URL");
    println!("                    or http://localhost:8080/api)");
    println!("  --data-dir <DIR>  Client data directory (default: $TAVERNKEEP_DATA_DIR");
    println!("                    or .tavernkeep)");
    println!();
    println!("ENVIRONMENT:");
    println!("  GAMEMASTER_URL       Backend base URL");
    println!("  TAVERNKEEP_DATA_DIR  Client data directory");
    println!("  TAVERNKEEP_LOG       Enable file logging with the given filter");
    println!("                       (e.g. info, tavernkeep_core=debug)");
    println!();
    println!("KEYS:");
    println!("  Board: j/k move, Enter play, n new, e edit, d delete, r refresh,");
    println!("         l log out, q quit");
    println!("  Game:  i type an action, Enter send, d roll the d20, c companion acts,");
    println!("         j/k scroll, Tab cycle panels, Esc back to the board");
}
