//! Session state reducer.
//!
//! A single-threaded, synchronous state machine: every gameplay surface
//! dispatches an [`Action`] and observes the resulting [`StateChange`]s.
//! The state owns at most one selected character, the companion roster,
//! the last d20 result, and an optional pending skill-check context.
//!
//! Invariants enforced on every transition:
//! - `0 <= current_hp <= max_hit_points(level)` for the character and
//!   every companion, by clamping on every hit-point write.
//! - After an experience gain, level is the highest level whose
//!   threshold the total meets, never above the cap and never lower
//!   than before.
//! - Hit points reset to the new maximum exactly when the level
//!   strictly increases; an experience gain that stays inside the
//!   current bracket leaves them untouched.
//!
//! Actions referencing an absent character or an unknown companion fail
//! with a typed error rather than silently no-oping. Persistence is not
//! part of the reducer: callers watch the returned changes and write the
//! character through to the store as a best-effort side channel.

use crate::character::{Character, Companion, CompanionId};
use crate::progression::{level_from_xp, max_hit_points};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from applying an action.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("No character selected")]
    NoCharacterSelected,

    #[error("Unknown companion: {0}")]
    UnknownCompanion(CompanionId),

    #[error("Die value {0} is outside 1-20")]
    DieOutOfRange(u8),
}

/// The selected character plus its derived, clamped hit points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub character: Character,
    pub current_hp: i32,
}

impl PlayerState {
    /// Maximum hit points at the character's current level.
    pub fn max_hp(&self) -> i32 {
        max_hit_points(self.character.level)
    }
}

/// One companion in the roster, keyed by a stable id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanionState {
    pub id: CompanionId,
    pub companion: Companion,
    pub current_hp: i32,
}

impl CompanionState {
    pub fn max_hp(&self) -> i32 {
        max_hit_points(self.companion.level)
    }
}

/// Whose derived state a change touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    Player,
    Companion(CompanionId),
}

/// An action dispatched against the session state.
#[derive(Debug, Clone)]
pub enum Action {
    /// Restore the character persisted from a previous run.
    RestoreCharacter(Character),
    /// Select (or re-select) a character, replacing any prior selection.
    SelectCharacter(Character),
    /// Replace the companion roster with a new one from the backend.
    SetCompanions(Vec<Companion>),
    /// Record a resolved d20 roll. The value must be in 1..=20.
    RollDice(u8),
    /// Mark a roll as pending against a narrative context.
    RequestCheck(String),
    /// Set the character's hit points (clamped).
    SetCharacterHp(i32),
    /// Set a companion's hit points (clamped).
    SetCompanionHp { id: CompanionId, hp: i32 },
    /// Grant experience to the character.
    AddCharacterXp(u32),
    /// Grant experience to a companion.
    AddCompanionXp { id: CompanionId, amount: u32 },
}

/// What an action did, in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateChange {
    CharacterSelected {
        name: String,
        level: u8,
        restored: bool,
    },
    RosterReplaced {
        count: usize,
    },
    DiceRolled {
        value: u8,
        /// The narrative context the roll resolves, if one was pending.
        check: Option<String>,
    },
    CheckRequested {
        context: String,
    },
    HpChanged {
        target: Target,
        current: i32,
        maximum: i32,
    },
    ExperienceGained {
        target: Target,
        amount: u32,
        total: u32,
    },
    LeveledUp {
        target: Target,
        new_level: u8,
        new_max_hp: i32,
    },
}

/// The in-memory aggregate for the active client session.
///
/// Owned explicitly by the application: constructed at startup, restored
/// from the store with [`Action::RestoreCharacter`], and torn down with
/// it. Nothing here is global.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    player: Option<PlayerState>,
    companions: Vec<CompanionState>,
    last_roll: Option<u8>,
    pending_check: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected character, if any.
    pub fn player(&self) -> Option<&PlayerState> {
        self.player.as_ref()
    }

    /// The companion roster in arrival order.
    pub fn companions(&self) -> &[CompanionState] {
        &self.companions
    }

    /// Look up a companion by id.
    pub fn companion(&self, id: CompanionId) -> Option<&CompanionState> {
        self.companions.iter().find(|c| c.id == id)
    }

    /// The last d20 result, if any roll happened this session.
    pub fn last_roll(&self) -> Option<u8> {
        self.last_roll
    }

    /// The narrative context a roll is pending against, if any.
    pub fn pending_check(&self) -> Option<&str> {
        self.pending_check.as_deref()
    }

    /// Apply one action atomically and describe what changed.
    pub fn apply(&mut self, action: Action) -> Result<Vec<StateChange>, StateError> {
        match action {
            Action::RestoreCharacter(character) => Ok(self.select(character, true)),
            Action::SelectCharacter(character) => Ok(self.select(character, false)),

            Action::SetCompanions(companions) => {
                self.companions = companions
                    .into_iter()
                    .map(|companion| CompanionState {
                        id: CompanionId::new(),
                        current_hp: max_hit_points(companion.level),
                        companion,
                    })
                    .collect();
                Ok(vec![StateChange::RosterReplaced {
                    count: self.companions.len(),
                }])
            }

            Action::RollDice(value) => {
                if !(1..=20).contains(&value) {
                    return Err(StateError::DieOutOfRange(value));
                }
                self.last_roll = Some(value);
                let check = self.pending_check.take();
                Ok(vec![StateChange::DiceRolled { value, check }])
            }

            Action::RequestCheck(context) => {
                self.pending_check = Some(context.clone());
                Ok(vec![StateChange::CheckRequested { context }])
            }

            Action::SetCharacterHp(value) => {
                let player = self
                    .player
                    .as_mut()
                    .ok_or(StateError::NoCharacterSelected)?;
                let maximum = max_hit_points(player.character.level);
                player.current_hp = value.clamp(0, maximum);
                Ok(vec![StateChange::HpChanged {
                    target: Target::Player,
                    current: player.current_hp,
                    maximum,
                }])
            }

            Action::SetCompanionHp { id, hp } => {
                let companion = self
                    .companions
                    .iter_mut()
                    .find(|c| c.id == id)
                    .ok_or(StateError::UnknownCompanion(id))?;
                let maximum = max_hit_points(companion.companion.level);
                companion.current_hp = hp.clamp(0, maximum);
                Ok(vec![StateChange::HpChanged {
                    target: Target::Companion(id),
                    current: companion.current_hp,
                    maximum,
                }])
            }

            Action::AddCharacterXp(amount) => {
                let player = self
                    .player
                    .as_mut()
                    .ok_or(StateError::NoCharacterSelected)?;
                let (new_hp, changes) = grant_xp(
                    Target::Player,
                    amount,
                    &mut player.character.xp,
                    &mut player.character.level,
                    player.current_hp,
                );
                player.current_hp = new_hp;
                Ok(changes)
            }

            Action::AddCompanionXp { id, amount } => {
                let companion = self
                    .companions
                    .iter_mut()
                    .find(|c| c.id == id)
                    .ok_or(StateError::UnknownCompanion(id))?;
                let (new_hp, changes) = grant_xp(
                    Target::Companion(id),
                    amount,
                    &mut companion.companion.xp,
                    &mut companion.companion.level,
                    companion.current_hp,
                );
                companion.current_hp = new_hp;
                Ok(changes)
            }
        }
    }

    /// Selection replaces any prior character wholesale and derives the
    /// hit points from the payload's level.
    fn select(&mut self, character: Character, restored: bool) -> Vec<StateChange> {
        let current_hp = max_hit_points(character.level);
        let change = StateChange::CharacterSelected {
            name: character.name.clone(),
            level: character.level,
            restored,
        };
        self.player = Some(PlayerState {
            character,
            current_hp,
        });
        vec![change]
    }
}

/// Shared experience rule for the character and companions.
///
/// Level is re-derived from the new total but never lowered: a record
/// seeded with a level above its xp keeps that level until the xp
/// catches up. Hit points reset to the new maximum only on a strict
/// level increase.
fn grant_xp(
    target: Target,
    amount: u32,
    xp: &mut u32,
    level: &mut u8,
    current_hp: i32,
) -> (i32, Vec<StateChange>) {
    let old_level = *level;
    *xp = xp.saturating_add(amount);
    let new_level = level_from_xp(*xp).max(old_level);
    *level = new_level;

    let mut changes = vec![StateChange::ExperienceGained {
        target,
        amount,
        total: *xp,
    }];

    if new_level > old_level {
        let new_max_hp = max_hit_points(new_level);
        changes.push(StateChange::LeveledUp {
            target,
            new_level,
            new_max_hp,
        });
        (new_max_hp, changes)
    } else {
        (current_hp, changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::sample_character;

    fn selected_state() -> SessionState {
        let mut state = SessionState::new();
        state
            .apply(Action::SelectCharacter(sample_character("Grimjaw")))
            .unwrap();
        state
    }

    fn roster_state(count: usize) -> (SessionState, Vec<CompanionId>) {
        let mut state = selected_state();
        let companions: Vec<Companion> = (0..count)
            .map(|i| Companion::new(format!("Companion {i}"), "Elf", "Ranger").with_level(2))
            .collect();
        state.apply(Action::SetCompanions(companions)).unwrap();
        let ids = state.companions().iter().map(|c| c.id).collect();
        (state, ids)
    }

    #[test]
    fn test_select_derives_hp_from_level() {
        let mut state = SessionState::new();
        let hero = sample_character("Grimjaw").with_level(10);
        let changes = state.apply(Action::SelectCharacter(hero)).unwrap();

        let player = state.player().unwrap();
        assert_eq!(player.current_hp, max_hit_points(10));
        assert_eq!(
            changes,
            vec![StateChange::CharacterSelected {
                name: "Grimjaw".to_string(),
                level: 10,
                restored: false,
            }]
        );
    }

    #[test]
    fn test_restore_marks_restored() {
        let mut state = SessionState::new();
        let changes = state
            .apply(Action::RestoreCharacter(sample_character("Grimjaw")))
            .unwrap();
        assert!(matches!(
            changes[0],
            StateChange::CharacterSelected { restored: true, .. }
        ));
    }

    #[test]
    fn test_reselect_replaces_wholesale() {
        let mut state = selected_state();
        state.apply(Action::SetCharacterHp(3)).unwrap();

        let other = sample_character("Elaria").with_level(5);
        state.apply(Action::SelectCharacter(other)).unwrap();

        let player = state.player().unwrap();
        assert_eq!(player.character.name, "Elaria");
        // Damage from the previous selection does not carry over.
        assert_eq!(player.current_hp, max_hit_points(5));
    }

    #[test]
    fn test_set_hp_clamps_low_and_high() {
        let mut state = selected_state();

        state.apply(Action::SetCharacterHp(-50)).unwrap();
        assert_eq!(state.player().unwrap().current_hp, 0);

        state.apply(Action::SetCharacterHp(i32::MAX)).unwrap();
        assert_eq!(state.player().unwrap().current_hp, max_hit_points(1));
    }

    #[test]
    fn test_set_hp_without_selection_fails() {
        let mut state = SessionState::new();
        assert_eq!(
            state.apply(Action::SetCharacterHp(5)),
            Err(StateError::NoCharacterSelected)
        );
    }

    #[test]
    fn test_level_up_resets_hp() {
        // Level 1, xp 0; +100 xp crosses into level 2.
        let mut state = selected_state();
        state.apply(Action::SetCharacterHp(4)).unwrap();

        let changes = state.apply(Action::AddCharacterXp(100)).unwrap();

        let player = state.player().unwrap();
        assert_eq!(player.character.level, 2);
        assert_eq!(player.character.xp, 100);
        assert_eq!(player.current_hp, 16); // max_hit_points(2)
        assert!(changes.contains(&StateChange::LeveledUp {
            target: Target::Player,
            new_level: 2,
            new_max_hp: 16,
        }));
    }

    #[test]
    fn test_xp_gain_without_level_up_keeps_hp() {
        let mut state = selected_state();
        state.apply(Action::SetCharacterHp(7)).unwrap();

        let changes = state.apply(Action::AddCharacterXp(50)).unwrap();

        let player = state.player().unwrap();
        assert_eq!(player.character.level, 1);
        assert_eq!(player.character.xp, 50);
        assert_eq!(player.current_hp, 7);
        assert_eq!(
            changes,
            vec![StateChange::ExperienceGained {
                target: Target::Player,
                amount: 50,
                total: 50,
            }]
        );
    }

    #[test]
    fn test_xp_crossing_multiple_levels() {
        let mut state = selected_state();
        state.apply(Action::AddCharacterXp(400)).unwrap();

        let player = state.player().unwrap();
        assert_eq!(player.character.level, 3);
        assert_eq!(player.current_hp, max_hit_points(3));
    }

    #[test]
    fn test_level_never_decreases_on_xp_gain() {
        // Seeded at level 10 with 0 xp: a small gain must not drop the level.
        let mut state = SessionState::new();
        state
            .apply(Action::SelectCharacter(sample_character("Grimjaw").with_level(10)))
            .unwrap();

        state.apply(Action::AddCharacterXp(50)).unwrap();
        assert_eq!(state.player().unwrap().character.level, 10);
    }

    #[test]
    fn test_level_caps_at_twenty() {
        let mut state = selected_state();
        state.apply(Action::AddCharacterXp(1_000_000)).unwrap();
        assert_eq!(state.player().unwrap().character.level, 20);
        assert_eq!(state.player().unwrap().current_hp, 35);
    }

    #[test]
    fn test_set_companions_initializes_state() {
        let (state, ids) = roster_state(3);

        assert_eq!(state.companions().len(), 3);
        assert_eq!(ids.len(), 3);
        for companion in state.companions() {
            assert_eq!(companion.current_hp, max_hit_points(2));
            assert_eq!(companion.companion.xp, 0);
        }
    }

    #[test]
    fn test_set_companions_replaces_roster_and_ids() {
        let (mut state, old_ids) = roster_state(2);

        state
            .apply(Action::SetCompanions(vec![Companion::new(
                "Fresh", "Dwarf", "Cleric",
            )]))
            .unwrap();

        assert_eq!(state.companions().len(), 1);
        // Old ids no longer resolve.
        assert_eq!(
            state.apply(Action::SetCompanionHp {
                id: old_ids[0],
                hp: 5
            }),
            Err(StateError::UnknownCompanion(old_ids[0]))
        );
    }

    #[test]
    fn test_companion_hp_clamps_negative() {
        let (mut state, ids) = roster_state(3);
        state
            .apply(Action::SetCompanionHp {
                id: ids[1],
                hp: -5,
            })
            .unwrap();
        assert_eq!(state.companion(ids[1]).unwrap().current_hp, 0);
    }

    #[test]
    fn test_companion_level_up_resets_hp() {
        let (mut state, ids) = roster_state(1);
        state
            .apply(Action::SetCompanionHp { id: ids[0], hp: 1 })
            .unwrap();

        // Level 2 companion, 0 xp; level 3 needs 400.
        let changes = state
            .apply(Action::AddCompanionXp {
                id: ids[0],
                amount: 400,
            })
            .unwrap();

        let companion = state.companion(ids[0]).unwrap();
        assert_eq!(companion.companion.level, 3);
        assert_eq!(companion.current_hp, max_hit_points(3));
        assert!(changes
            .iter()
            .any(|c| matches!(c, StateChange::LeveledUp { new_level: 3, .. })));
    }

    #[test]
    fn test_roll_dice_records_value() {
        let mut state = SessionState::new();
        let changes = state.apply(Action::RollDice(17)).unwrap();
        assert_eq!(state.last_roll(), Some(17));
        assert_eq!(
            changes,
            vec![StateChange::DiceRolled {
                value: 17,
                check: None,
            }]
        );
    }

    #[test]
    fn test_roll_dice_rejects_out_of_range() {
        let mut state = SessionState::new();
        assert_eq!(
            state.apply(Action::RollDice(0)),
            Err(StateError::DieOutOfRange(0))
        );
        assert_eq!(
            state.apply(Action::RollDice(21)),
            Err(StateError::DieOutOfRange(21))
        );
        assert_eq!(state.last_roll(), None);
    }

    #[test]
    fn test_roll_consumes_pending_check_once() {
        let mut state = SessionState::new();
        state
            .apply(Action::RequestCheck("Sneaking past the guard".to_string()))
            .unwrap();
        assert_eq!(state.pending_check(), Some("Sneaking past the guard"));

        let changes = state.apply(Action::RollDice(12)).unwrap();
        assert_eq!(
            changes,
            vec![StateChange::DiceRolled {
                value: 12,
                check: Some("Sneaking past the guard".to_string()),
            }]
        );
        assert_eq!(state.pending_check(), None);

        // The next roll has no check attached.
        let changes = state.apply(Action::RollDice(3)).unwrap();
        assert_eq!(
            changes,
            vec![StateChange::DiceRolled {
                value: 3,
                check: None,
            }]
        );
    }

    #[test]
    fn test_companion_xp_without_level_up_keeps_hp() {
        let (mut state, ids) = roster_state(1);
        state
            .apply(Action::SetCompanionHp { id: ids[0], hp: 2 })
            .unwrap();

        state
            .apply(Action::AddCompanionXp {
                id: ids[0],
                amount: 10,
            })
            .unwrap();

        let companion = state.companion(ids[0]).unwrap();
        assert_eq!(companion.companion.level, 2);
        assert_eq!(companion.current_hp, 2);
    }

    #[test]
    fn test_xp_actions_require_valid_target() {
        let mut state = SessionState::new();
        assert_eq!(
            state.apply(Action::AddCharacterXp(10)),
            Err(StateError::NoCharacterSelected)
        );

        let missing = CompanionId::new();
        assert_eq!(
            state.apply(Action::AddCompanionXp {
                id: missing,
                amount: 10
            }),
            Err(StateError::UnknownCompanion(missing))
        );
    }
}
