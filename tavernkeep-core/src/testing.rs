//! Testing utilities.
//!
//! This module provides tools for integration testing:
//! - `MockGameMaster` for deterministic testing without a backend
//! - `TestHarness` bundling the mock with a session state
//! - Assertion helpers for verifying session state

use crate::character::{sample_character, Character, Companion, CompanionId};
use crate::dice::DiceRoll;
use crate::gm::Opening;
use crate::session::{Action, SessionState, StateChange, StateError};
use gamemaster::{ChatTurn, Speaker};

/// A mock game master that returns scripted replies in order.
///
/// Mirrors the transcript bookkeeping of the real driver so tests can
/// assert on history without a backend.
pub struct MockGameMaster {
    replies: Vec<String>,
    reply_index: usize,
    companions: Vec<Companion>,
    history: Vec<ChatTurn>,
}

impl MockGameMaster {
    /// Create a mock with scripted replies.
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            replies,
            reply_index: 0,
            companions: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Set the companion roster returned by [`MockGameMaster::start`].
    pub fn with_companions(mut self, companions: Vec<Companion>) -> Self {
        self.companions = companions;
        self
    }

    /// Add a reply to the script.
    pub fn queue_reply(&mut self, reply: impl Into<String>) {
        self.replies.push(reply.into());
    }

    /// The transcript so far.
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Start a session: the first scripted reply is the introduction.
    pub fn start(&mut self, _character: &Character) -> Opening {
        let introduction = self.next_reply();
        self.history = vec![ChatTurn::gm(&introduction)];
        Opening {
            introduction,
            companions: self.companions.clone(),
        }
    }

    /// Process a player action and return the next scripted reply.
    pub fn player_action(&mut self, input: &str) -> String {
        self.history.push(ChatTurn::player(input));
        let reply = self.next_reply();
        self.history.push(ChatTurn::gm(&reply));
        reply
    }

    /// Report a dice roll and return the next scripted reply.
    pub fn dice_result(&mut self, roll: &DiceRoll) -> String {
        self.history.push(ChatTurn {
            speaker: Speaker::System,
            text: format!("rolls {roll}"),
        });
        let reply = self.next_reply();
        self.history.push(ChatTurn::gm(&reply));
        reply
    }

    fn next_reply(&mut self) -> String {
        if self.reply_index < self.replies.len() {
            let reply = self.replies[self.reply_index].clone();
            self.reply_index += 1;
            reply
        } else {
            "The game master has no more scripted replies.".to_string()
        }
    }
}

/// Test harness bundling a mock game master with a session state.
pub struct TestHarness {
    pub gm: MockGameMaster,
    pub state: SessionState,
}

impl TestHarness {
    /// Create a harness with a sample character already selected.
    pub fn new() -> Self {
        Self::with_character(sample_character("Test Hero"))
    }

    /// Create a harness with a custom character selected.
    pub fn with_character(character: Character) -> Self {
        let mut state = SessionState::new();
        state
            .apply(Action::SelectCharacter(character))
            .expect("selection cannot fail");
        Self {
            gm: MockGameMaster::new(Vec::new()),
            state,
        }
    }

    /// Queue a scripted reply.
    pub fn expect_reply(&mut self, reply: impl Into<String>) -> &mut Self {
        self.gm.queue_reply(reply);
        self
    }

    /// Apply an action to the session state.
    pub fn apply(&mut self, action: Action) -> Result<Vec<StateChange>, StateError> {
        self.state.apply(action)
    }

    /// Send a player action through the mock game master.
    pub fn exchange(&mut self, input: &str) -> String {
        self.gm.player_action(input)
    }

    /// Current player HP as (current, max).
    pub fn player_hp(&self) -> (i32, i32) {
        let player = self.state.player().expect("no character selected");
        (player.current_hp, player.max_hp())
    }

    /// The selected character's level.
    pub fn player_level(&self) -> u8 {
        self.state
            .player()
            .expect("no character selected")
            .character
            .level
    }

    /// Companion ids in roster order.
    pub fn companion_ids(&self) -> Vec<CompanionId> {
        self.state.companions().iter().map(|c| c.id).collect()
    }

    /// The last line of the transcript.
    pub fn last_line(&self) -> Option<&str> {
        self.gm.history().last().map(|t| t.text.as_str())
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert player HP is at expected values.
#[track_caller]
pub fn assert_player_hp(harness: &TestHarness, current: i32, max: i32) {
    let (actual_current, actual_max) = harness.player_hp();
    assert_eq!(
        (actual_current, actual_max),
        (current, max),
        "Expected HP {current}/{max}, got {actual_current}/{actual_max}"
    );
}

/// Assert the player is at the expected level.
#[track_caller]
pub fn assert_player_level(harness: &TestHarness, level: u8) {
    let actual = harness.player_level();
    assert_eq!(actual, level, "Expected level {level}, got {actual}");
}
