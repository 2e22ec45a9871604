//! Offline demo game master.
//!
//! Lets the client run without a backend: canned replies rotate per
//! turn, and dice results get a success/failure line keyed off the
//! total. The reply delay is cosmetic, imitating a thinking game master.

use std::time::Duration;

use tavernkeep_core::{Character, Companion, DiceRoll, Opening};

const INTRODUCTION: &str = "Welcome to the blighted lands, brave adventurer! You stand \
before the entrance of the cursed keep of Blackstone. A freezing wind howls through \
the dark corridors, and a dull rumbling rises from the depths.";

const REPLIES: [&str; 5] = [
    "Excellent! Roll a d20 to see how your attempt plays out.",
    "Interesting... the consequences of your deed will reveal themselves soon.",
    "Your action draws the attention of creatures nearby...",
    "Bold! That approach may well save your life.",
    "Careful! You hear footsteps closing in...",
];

const SUCCESS_LINE: &str = "A fine roll! Fortune favors you, and the path ahead opens.";
const FAILURE_LINE: &str = "The dice are cruel. Things take a turn for the worse...";

const NPC_LINES: [&str; 3] = [
    "I'll scout ahead and signal if the way is clear.",
    "Stay close. Something is watching us from the dark.",
    "My blade is yours. Say the word and I strike.",
];

/// A scripted, offline stand-in for the backend game master.
pub struct DemoGameMaster {
    reply_index: usize,
    delay: Duration,
}

impl DemoGameMaster {
    pub fn new() -> Self {
        Self {
            reply_index: 0,
            delay: Duration::from_millis(1500),
        }
    }

    /// Disable the cosmetic reply delay (used by tests).
    pub fn without_delay(mut self) -> Self {
        self.delay = Duration::ZERO;
        self
    }

    /// The cosmetic pause before each reply.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Open a demo session with a fixed companion pair.
    pub fn start(&mut self, character: &Character) -> Opening {
        self.reply_index = 0;
        Opening {
            introduction: format!("{} the {} arrives. {INTRODUCTION}", character.name, character.class),
            companions: vec![
                Companion::new("Mira Greenleaf", "Elf", "Ranger")
                    .with_level(2)
                    .with_personality("Wary, quick with a bow"),
                Companion::new("Durn Ironboot", "Dwarf", "Cleric")
                    .with_level(3)
                    .with_personality("Gruff but loyal"),
            ],
        }
    }

    /// The next canned reply to a player action.
    pub fn player_action(&mut self, _action: &str) -> String {
        let reply = REPLIES[self.reply_index % REPLIES.len()];
        self.reply_index += 1;
        reply.to_string()
    }

    /// React to a resolved roll: totals of 10 and up succeed.
    pub fn dice_result(&mut self, roll: &DiceRoll) -> String {
        let line = if roll.total() >= 10 {
            SUCCESS_LINE
        } else {
            FAILURE_LINE
        };
        format!("A {}! {line}", roll.total())
    }

    /// Let a companion speak a canned line.
    pub fn npc_action(&mut self, companion: &Companion) -> gamemaster::NpcReply {
        let line = NPC_LINES[self.reply_index % NPC_LINES.len()];
        self.reply_index += 1;
        gamemaster::NpcReply {
            npc_response: line.to_string(),
            npc_name: companion.name.clone(),
        }
    }
}

impl Default for DemoGameMaster {
    fn default() -> Self {
        Self::new()
    }
}

/// The example roster shown on the board when no backend is connected.
pub fn demo_roster() -> Vec<gamemaster::CharacterRecord> {
    let heroes = [
        ("Grimjaw the Dark", "Orc", "Barbarian"),
        ("Elaria Moonleaf", "Elf", "Ranger"),
        ("Thorin Ironbeard", "Dwarf", "Paladin"),
        ("Lyralei Windblade", "Elf", "Wizard"),
        ("Zephyr the Shadow", "Human", "Rogue"),
    ];

    heroes
        .iter()
        .enumerate()
        .map(|(i, (name, race, class))| gamemaster::CharacterRecord {
            id: Some(i as i64 + 1),
            name: name.to_string(),
            race: race.to_string(),
            class: class.to_string(),
            players: 4,
            level: 10,
            stats: gamemaster::Statistics {
                strength: 15,
                constitution: 14,
                intelligence: 12,
                wisdom: 13,
                dexterity: 16,
                charisma: 10,
            },
        })
        .collect()
}
