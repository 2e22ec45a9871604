//! QA tests for the session flow using the scripted game master.
//!
//! These tests verify the gameplay loop works end to end without a
//! backend: character selection, the companion roster, dice checks, and
//! the progression rules as they are observed from the session state.

use tavernkeep_core::progression::max_hit_points;
use tavernkeep_core::testing::{assert_player_hp, assert_player_level};
use tavernkeep_core::{
    sample_character, Action, Character, Class, Companion, DiceRoll, DieType, Race, SessionState,
    StateChange, StateError, TestHarness,
};

#[test]
fn test_progression_scenario() {
    let mut harness = TestHarness::new();
    assert_player_level(&harness, 1);
    assert_player_hp(&harness, 15, 15);

    // 100 XP crosses into level 2 and resets hit points to the new max.
    harness.apply(Action::AddCharacterXp(100)).unwrap();
    assert_player_level(&harness, 2);
    assert_player_hp(&harness, 16, 16);

    // 300 more (total 400) crosses into level 3.
    harness.apply(Action::AddCharacterXp(300)).unwrap();
    assert_player_level(&harness, 3);
    assert_player_hp(&harness, max_hit_points(3), max_hit_points(3));

    // A gain inside the bracket leaves damaged hit points alone.
    harness.apply(Action::SetCharacterHp(5)).unwrap();
    harness.apply(Action::AddCharacterXp(10)).unwrap();
    assert_player_level(&harness, 3);
    assert_player_hp(&harness, 5, max_hit_points(3));
}

#[test]
fn test_hp_clamping_scenario() {
    let mut harness = TestHarness::new();

    harness.apply(Action::SetCharacterHp(-999)).unwrap();
    assert_player_hp(&harness, 0, 15);

    harness.apply(Action::SetCharacterHp(999)).unwrap();
    assert_player_hp(&harness, 15, 15);
}

#[test]
fn test_companion_roster_scenario() {
    let mut harness = TestHarness::new();
    harness
        .apply(Action::SetCompanions(vec![
            Companion::new("Mira", "Elf", "Ranger").with_level(2),
            Companion::new("Durn", "Dwarf", "Cleric").with_level(3),
            Companion::new("Pip", "Gnome", "Rogue"),
        ]))
        .unwrap();

    let ids = harness.companion_ids();
    assert_eq!(ids.len(), 3);

    // Each companion starts at its level's maximum.
    assert_eq!(harness.state.companion(ids[1]).unwrap().current_hp, max_hit_points(3));

    // A huge negative write clamps to zero.
    harness
        .apply(Action::SetCompanionHp { id: ids[1], hp: -5 })
        .unwrap();
    assert_eq!(harness.state.companion(ids[1]).unwrap().current_hp, 0);

    // Companion experience follows the same level-up rule.
    let changes = harness
        .apply(Action::AddCompanionXp {
            id: ids[2],
            amount: 100,
        })
        .unwrap();
    let pip = harness.state.companion(ids[2]).unwrap();
    assert_eq!(pip.companion.level, 2);
    assert_eq!(pip.current_hp, max_hit_points(2));
    assert!(changes
        .iter()
        .any(|c| matches!(c, StateChange::LeveledUp { new_level: 2, .. })));

    // Replacing the roster invalidates the old ids.
    harness
        .apply(Action::SetCompanions(vec![Companion::new(
            "Solo", "Human", "Bard",
        )]))
        .unwrap();
    assert_eq!(
        harness.apply(Action::SetCompanionHp { id: ids[0], hp: 4 }),
        Err(StateError::UnknownCompanion(ids[0]))
    );
}

#[test]
fn test_dice_check_flow() {
    let mut harness = TestHarness::new();
    harness
        .expect_reply("Make a Perception check! Roll a d20.")
        .expect_reply("You spot goblin tracks in the dust.");

    let prompt = harness.exchange("I search the corridor");
    assert!(prompt.contains("Roll a d20"));

    // The UI marks the roll as pending against the prompt, then rolls.
    harness.apply(Action::RequestCheck(prompt)).unwrap();
    let changes = harness.apply(Action::RollDice(14)).unwrap();
    let check = match &changes[0] {
        StateChange::DiceRolled { value, check } => {
            assert_eq!(*value, 14);
            check.clone()
        }
        other => panic!("unexpected change: {other:?}"),
    };
    assert!(check.unwrap().contains("Perception"));
    assert_eq!(harness.state.last_roll(), Some(14));
    assert_eq!(harness.state.pending_check(), None);

    // Reporting the roll yields the follow-up narration.
    let roll = DiceRoll {
        die: DieType::D20,
        value: 14,
        modifier: 2,
        skill_check: Some("Perception".to_string()),
    };
    let reply = harness.gm.dice_result(&roll);
    assert_eq!(reply, "You spot goblin tracks in the dust.");
    assert!(harness
        .gm
        .history()
        .iter()
        .any(|turn| turn.text.contains("d20: 14 + 2 = 16")));
}

#[test]
fn test_session_start_populates_roster() {
    let mut harness = TestHarness::new();
    harness.gm = tavernkeep_core::MockGameMaster::new(vec![
        "You stand before the cursed gates of Blackstone Keep.".to_string(),
    ])
    .with_companions(vec![
        Companion::new("Mira", "Elf", "Ranger").with_level(2),
        Companion::new("Durn", "Dwarf", "Cleric"),
    ]);

    let character = sample_character("Grimjaw");
    let opening = harness.gm.start(&character);
    assert!(opening.introduction.contains("Blackstone"));

    harness
        .apply(Action::SetCompanions(opening.companions))
        .unwrap();
    assert_eq!(harness.companion_ids().len(), 2);
}

#[test]
fn test_reselection_replaces_state_wholesale() {
    let mut state = SessionState::new();
    state
        .apply(Action::SelectCharacter(sample_character("Grimjaw")))
        .unwrap();
    state.apply(Action::AddCharacterXp(100)).unwrap();

    let fresh = Character::new("Elaria", Race::Elf, Class::Wizard).with_level(5);
    state.apply(Action::SelectCharacter(fresh)).unwrap();

    let player = state.player().unwrap();
    assert_eq!(player.character.name, "Elaria");
    assert_eq!(player.character.xp, 0);
    assert_eq!(player.current_hp, max_hit_points(5));
}

#[tokio::test]
async fn test_store_restore_derives_hit_points() {
    let temp_dir = tempfile::TempDir::new().expect("temp dir");
    let store = tavernkeep_core::ClientStore::new(temp_dir.path());

    let mut character = sample_character("Grimjaw");
    character.level = 5;
    character.xp = 1600;
    store.save_character(&character).await.expect("save");

    // A later run restores the selection and re-derives hit points.
    let loaded = store
        .load_character()
        .await
        .expect("load")
        .expect("present");
    let mut state = SessionState::new();
    let changes = state.apply(Action::RestoreCharacter(loaded)).unwrap();

    assert!(matches!(
        changes[0],
        StateChange::CharacterSelected { restored: true, .. }
    ));
    let player = state.player().unwrap();
    assert_eq!(player.character.level, 5);
    assert_eq!(player.current_hp, max_hit_points(5));
}
