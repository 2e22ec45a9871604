//! Character and companion types.
//!
//! The player character is a fully typed record owned by the session
//! state; companions arrive from the backend and keep their race/class
//! as free text since the game master invents them.

use gamemaster::{CharacterRecord, NpcProfile, Statistics};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Races and classes
// ============================================================================

/// Playable races.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Race {
    Human,
    Elf,
    Dwarf,
    Gnome,
    Orc,
    Tiefling,
}

impl Race {
    pub fn name(&self) -> &'static str {
        match self {
            Race::Human => "Human",
            Race::Elf => "Elf",
            Race::Dwarf => "Dwarf",
            Race::Gnome => "Gnome",
            Race::Orc => "Orc",
            Race::Tiefling => "Tiefling",
        }
    }

    /// The portrait asset shown for this race.
    pub fn portrait(&self) -> &'static str {
        match self {
            Race::Human => "assets/images/human.png",
            Race::Elf => "assets/images/elf.png",
            Race::Dwarf => "assets/images/dwarf.png",
            Race::Gnome => "assets/images/gnome.png",
            Race::Orc => "assets/images/orc.png",
            Race::Tiefling => "assets/images/tiefling.png",
        }
    }

    pub fn all() -> [Race; 6] {
        [
            Race::Human,
            Race::Elf,
            Race::Dwarf,
            Race::Gnome,
            Race::Orc,
            Race::Tiefling,
        ]
    }

    /// Parse a race by name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Race> {
        Race::all()
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Playable classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Class {
    Barbarian,
    Bard,
    Cleric,
    Druid,
    Wizard,
    Warlock,
    Paladin,
    Ranger,
    Rogue,
}

impl Class {
    pub fn name(&self) -> &'static str {
        match self {
            Class::Barbarian => "Barbarian",
            Class::Bard => "Bard",
            Class::Cleric => "Cleric",
            Class::Druid => "Druid",
            Class::Wizard => "Wizard",
            Class::Warlock => "Warlock",
            Class::Paladin => "Paladin",
            Class::Ranger => "Ranger",
            Class::Rogue => "Rogue",
        }
    }

    pub fn all() -> [Class; 9] {
        [
            Class::Barbarian,
            Class::Bard,
            Class::Cleric,
            Class::Druid,
            Class::Wizard,
            Class::Warlock,
            Class::Paladin,
            Class::Ranger,
            Class::Rogue,
        ]
    }

    /// Parse a class by name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Class> {
        Class::all()
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Ability scores
// ============================================================================

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Constitution,
    Intelligence,
    Wisdom,
    Dexterity,
    Charisma,
}

impl Ability {
    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Dexterity => "Dexterity",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Dexterity => "DEX",
            Ability::Charisma => "CHA",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Dexterity,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Ability scores container. Scores are nominally 8-20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub dexterity: u8,
    pub charisma: u8,
}

impl AbilityScores {
    pub fn new(str: u8, con: u8, int: u8, wis: u8, dex: u8, cha: u8) -> Self {
        Self {
            strength: str,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            dexterity: dex,
            charisma: cha,
        }
    }

    pub fn get(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Dexterity => self.dexterity,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: u8) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    /// Ability modifier: score 8-9 = -1, 10-11 = 0, 12-13 = +1, etc.
    /// Floor division keeps the rule correct below 10.
    pub fn modifier(&self, ability: Ability) -> i8 {
        (self.get(ability) as i8 - 10).div_euclid(2)
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

// ============================================================================
// Characters
// ============================================================================

/// The player-controlled character.
///
/// `level` runs 1-20 and `xp` only ever grows during play; the session
/// reducer keeps the two consistent and derives hit points from level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub race: Race,
    pub class: Class,
    pub level: u8,
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub scores: AbilityScores,
}

impl Character {
    /// Create a fresh level-1 character with default scores.
    pub fn new(name: impl Into<String>, race: Race, class: Class) -> Self {
        Self {
            name: name.into(),
            race,
            class,
            level: 1,
            xp: 0,
            scores: AbilityScores::default(),
        }
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_scores(mut self, scores: AbilityScores) -> Self {
        self.scores = scores;
        self
    }

    /// The portrait asset for this character, keyed by race.
    pub fn portrait(&self) -> &'static str {
        self.race.portrait()
    }

    /// Convert to the backend's wire record.
    pub fn to_record(&self, players: u8) -> CharacterRecord {
        CharacterRecord {
            id: None,
            name: self.name.clone(),
            race: self.race.name().to_string(),
            class: self.class.name().to_string(),
            players,
            level: self.level,
            stats: Statistics {
                strength: self.scores.strength,
                constitution: self.scores.constitution,
                intelligence: self.scores.intelligence,
                wisdom: self.scores.wisdom,
                dexterity: self.scores.dexterity,
                charisma: self.scores.charisma,
            },
        }
    }

    /// Build a character from a backend record.
    ///
    /// Unknown race or class names fall back to Human/Barbarian so a
    /// foreign record still renders rather than failing the whole list.
    pub fn from_record(record: &CharacterRecord) -> Self {
        Self {
            name: record.name.clone(),
            race: Race::from_name(&record.race).unwrap_or(Race::Human),
            class: Class::from_name(&record.class).unwrap_or(Class::Barbarian),
            level: record.level,
            xp: 0,
            scores: AbilityScores::new(
                record.stats.strength,
                record.stats.constitution,
                record.stats.intelligence,
                record.stats.wisdom,
                record.stats.dexterity,
                record.stats.charisma,
            ),
        }
    }
}

/// Create a sample character for demos and tests.
pub fn sample_character(name: &str) -> Character {
    Character::new(name, Race::Orc, Class::Barbarian)
        .with_scores(AbilityScores::new(15, 14, 12, 13, 16, 10))
}

// ============================================================================
// Companions
// ============================================================================

/// Stable identifier for a companion, assigned at roster ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanionId(pub Uuid);

impl CompanionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CompanionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CompanionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-player ally tracked alongside the character.
///
/// Structurally a character minus persisted identity. Race and class stay
/// free text: the game master invents companions and is not limited to
/// the playable lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Companion {
    pub name: String,
    pub race: String,
    pub class: String,
    pub level: u8,
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub personality: Option<String>,
}

impl Companion {
    pub fn new(name: impl Into<String>, race: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            race: race.into(),
            class: class.into(),
            level: 1,
            xp: 0,
            personality: None,
        }
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_personality(mut self, personality: impl Into<String>) -> Self {
        self.personality = Some(personality.into());
        self
    }

    pub fn from_profile(profile: NpcProfile) -> Self {
        Self {
            name: profile.name,
            race: profile.race,
            class: profile.class,
            level: profile.level,
            xp: profile.xp,
            personality: profile.personality,
        }
    }

    pub fn to_profile(&self) -> NpcProfile {
        NpcProfile {
            name: self.name.clone(),
            race: self.race.clone(),
            class: self.class.clone(),
            level: self.level,
            xp: self.xp,
            personality: self.personality.clone(),
        }
    }
}
