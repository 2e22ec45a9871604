//! Session engine for the Tavernkeep TTRPG companion client.
//!
//! This crate provides:
//! - Character progression formulas (level, experience, hit points)
//! - The session state reducer driving every gameplay surface
//! - Client-side persistence of the selected character and credentials
//! - A game-master driver over the backend dialogue endpoints
//!
//! # Quick Start
//!
//! ```
//! use tavernkeep_core::{Action, Character, Class, Race, SessionState};
//!
//! let mut state = SessionState::new();
//! let hero = Character::new("Grimjaw", Race::Orc, Class::Barbarian);
//! state.apply(Action::SelectCharacter(hero)).unwrap();
//! state.apply(Action::AddCharacterXp(100)).unwrap();
//!
//! let player = state.player().unwrap();
//! assert_eq!(player.character.level, 2);
//! ```

pub mod character;
pub mod dice;
pub mod gm;
pub mod progression;
pub mod session;
pub mod store;
pub mod testing;

// Primary public API
pub use character::{
    sample_character, Ability, AbilityScores, Character, Class, Companion, CompanionId, Race,
};
pub use dice::{DiceRoll, DieType};
pub use gm::{GameMaster, GmConfig, Opening};
pub use session::{Action, SessionState, StateChange, StateError, Target};
pub use store::{ClientStore, StoreError};
pub use testing::{MockGameMaster, TestHarness};
