//! State-change-to-UI mapping.
//!
//! Every gameplay surface mutates the session through [`dispatch`]: the
//! reducer applies the action, the resulting changes become chat lines
//! and flash notices, and any change to the selected character triggers
//! the fire-and-forget write-through to the client store.

use tavernkeep_core::{Action, DiceRoll, DieType, StateChange, Target};

use crate::app::{App, ChatKind, PendingOp};

/// Apply an action to the session state and surface the outcome.
///
/// Reducer errors become flash notices; nothing panics and the state is
/// left unchanged on error.
pub fn dispatch(app: &mut App, action: Action) -> Vec<StateChange> {
    match app.session.apply(action) {
        Ok(changes) => {
            for change in &changes {
                describe(app, change);
            }
            if changes.iter().any(touches_player) {
                persist_character(app);
            }
            changes
        }
        Err(e) => {
            app.flash_error(e.to_string());
            Vec::new()
        }
    }
}

/// Whether a change affects the selected character's durable state.
fn touches_player(change: &StateChange) -> bool {
    matches!(
        change,
        StateChange::CharacterSelected { .. }
            | StateChange::HpChanged {
                target: Target::Player,
                ..
            }
            | StateChange::ExperienceGained {
                target: Target::Player,
                ..
            }
            | StateChange::LeveledUp {
                target: Target::Player,
                ..
            }
    )
}

/// Best-effort write-through of the selected character.
fn persist_character(app: &App) {
    let Some(player) = app.session.player() else {
        return;
    };
    let store = app.store.clone();
    let character = player.character.clone();
    tokio::spawn(async move {
        store.save_character_best_effort(&character).await;
    });
}

/// Turn a state change into chat lines and notices.
fn describe(app: &mut App, change: &StateChange) {
    match change {
        StateChange::CharacterSelected {
            name,
            level,
            restored,
        } => {
            if *restored {
                app.flash_info(format!("Welcome back, {name} (level {level})"));
            }
        }

        StateChange::RosterReplaced { count } => {
            if *count > 0 {
                app.add_system(format!("{count} companions join the adventure."));
            }
        }

        StateChange::DiceRolled { value, .. } => {
            app.add_system(format!("The d20 shows {value}!"));
        }

        StateChange::CheckRequested { .. } => {
            app.add_system("A check is called for - roll the d20!");
        }

        StateChange::HpChanged {
            target,
            current,
            maximum,
        } => {
            let name = target_name(app, target);
            app.add_system(format!("{name}: {current}/{maximum} HP"));
        }

        StateChange::ExperienceGained {
            target,
            amount,
            total,
        } => {
            let name = target_name(app, target);
            app.add_system(format!("{name} gains {amount} XP (total {total})."));
        }

        StateChange::LeveledUp {
            target,
            new_level,
            new_max_hp,
        } => {
            let name = target_name(app, target);
            app.add_chat(
                "Narrator",
                ChatKind::Narrator,
                format!("LEVEL UP! {name} is now level {new_level} ({new_max_hp} HP)."),
            );
            if matches!(target, Target::Player) {
                app.flash_info(format!("Level up! Now level {new_level}"));
            }
        }
    }
}

/// Whether a game-master reply is asking the player for a d20 roll.
fn reply_requests_roll(text: &str) -> bool {
    let text = text.to_lowercase();
    text.contains("roll a d20") || text.contains("roll the d20") || text.contains("roll a die")
}

/// Surface a game-master reply: add it to the chat, and when it calls
/// for a roll, mark the check as pending against that narration.
pub fn handle_gm_reply(app: &mut App, text: String) {
    app.add_chat("Game Master", ChatKind::GameMaster, text.clone());
    if reply_requests_roll(&text) {
        dispatch(app, Action::RequestCheck(text));
    }
}

/// Record a settled d20 value and, when a check was pending, queue the
/// roll report to the game master.
pub fn resolve_roll(app: &mut App, value: u8) {
    let changes = dispatch(app, Action::RollDice(value));
    let Some(StateChange::DiceRolled { check, .. }) = changes.first() else {
        return;
    };
    if check.is_none() || app.session.player().is_none() {
        return;
    }

    let roll = DiceRoll {
        die: DieType::D20,
        value: value as u32,
        modifier: 0,
        skill_check: None,
    };
    app.queue(PendingOp::DiceResult {
        roll,
        check: check.clone(),
    });
}

fn target_name(app: &App, target: &Target) -> String {
    match target {
        Target::Player => app
            .session
            .player()
            .map(|p| p.character.name.clone())
            .unwrap_or_else(|| "You".to_string()),
        Target::Companion(id) => app
            .session
            .companion(*id)
            .map(|c| c.companion.name.clone())
            .unwrap_or_else(|| "A companion".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{App, GmDriver};
    use crate::demo::DemoGameMaster;
    use tavernkeep_core::{sample_character, ClientStore, Companion};

    fn test_app() -> App {
        App::new(
            gamemaster::Client::new("http://example.test/api"),
            ClientStore::new(".test-tavernkeep"),
            GmDriver::Demo(DemoGameMaster::new().without_delay()),
            true,
        )
    }

    #[tokio::test]
    async fn test_dispatch_surfaces_reducer_errors() {
        let mut app = test_app();
        // No character selected: the action fails loudly but harmlessly.
        let changes = dispatch(&mut app, Action::SetCharacterHp(5));
        assert!(changes.is_empty());
        assert!(app.flash.is_some());
        assert!(app.session.player().is_none());
    }

    #[tokio::test]
    async fn test_level_up_announced_in_chat() {
        let mut app = test_app();
        dispatch(
            &mut app,
            Action::SelectCharacter(sample_character("Grimjaw")),
        );
        dispatch(&mut app, Action::AddCharacterXp(100));

        assert!(app
            .chat
            .iter()
            .any(|item| item.text.contains("LEVEL UP! Grimjaw is now level 2")));
        assert!(app.flash.as_ref().unwrap().text.contains("Level up"));
    }

    #[tokio::test]
    async fn test_companion_changes_name_the_companion() {
        let mut app = test_app();
        dispatch(
            &mut app,
            Action::SelectCharacter(sample_character("Grimjaw")),
        );
        dispatch(
            &mut app,
            Action::SetCompanions(vec![Companion::new("Mira", "Elf", "Ranger")]),
        );
        let id = app.session.companions()[0].id;
        dispatch(&mut app, Action::SetCompanionHp { id, hp: 3 });

        assert!(app
            .chat
            .iter()
            .any(|item| item.text.contains("Mira: 3/15 HP")));
    }

    #[tokio::test]
    async fn test_gm_reply_requesting_roll_marks_check_pending() {
        let mut app = test_app();
        dispatch(
            &mut app,
            Action::SelectCharacter(sample_character("Grimjaw")),
        );
        handle_gm_reply(&mut app, "Goblins ahead! Roll a d20 for initiative.".to_string());

        assert_eq!(
            app.session.pending_check(),
            Some("Goblins ahead! Roll a d20 for initiative.")
        );

        handle_gm_reply(&mut app, "The cave is quiet.".to_string());
        // A plain narration does not replace the pending check.
        assert!(app.session.pending_check().is_some());
    }

    #[tokio::test]
    async fn test_resolve_roll_reports_pending_check() {
        let mut app = test_app();
        dispatch(
            &mut app,
            Action::SelectCharacter(sample_character("Grimjaw")),
        );
        handle_gm_reply(&mut app, "Roll a d20 to sneak past.".to_string());

        resolve_roll(&mut app, 14);
        assert!(matches!(
            app.pending,
            Some(PendingOp::DiceResult { ref check, .. }) if check.is_some()
        ));
        assert_eq!(app.session.last_roll(), Some(14));
        assert_eq!(app.session.pending_check(), None);
    }

    #[tokio::test]
    async fn test_resolve_roll_without_check_stays_local() {
        let mut app = test_app();
        dispatch(
            &mut app,
            Action::SelectCharacter(sample_character("Grimjaw")),
        );
        resolve_roll(&mut app, 9);

        assert!(app.pending.is_none());
        assert_eq!(app.session.last_roll(), Some(9));
    }

    #[tokio::test]
    async fn test_dice_roll_announced() {
        let mut app = test_app();
        dispatch(&mut app, Action::RollDice(17));
        assert!(app
            .chat
            .iter()
            .any(|item| item.text.contains("The d20 shows 17")));
    }
}
