//! Dice rolling.
//!
//! The companion app rolls a d20 for checks; the other standard dice are
//! kept for the roll report the backend accepts. Rolls carry their
//! modifier and optional skill-check label so they can be reported to
//! the game master as-is.

use gamemaster::DiceRollReport;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard die types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieType {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
    D100,
}

impl DieType {
    pub fn sides(&self) -> u32 {
        match self {
            DieType::D4 => 4,
            DieType::D6 => 6,
            DieType::D8 => 8,
            DieType::D10 => 10,
            DieType::D12 => 12,
            DieType::D20 => 20,
            DieType::D100 => 100,
        }
    }

    pub fn from_sides(sides: u32) -> Option<DieType> {
        match sides {
            4 => Some(DieType::D4),
            6 => Some(DieType::D6),
            8 => Some(DieType::D8),
            10 => Some(DieType::D10),
            12 => Some(DieType::D12),
            20 => Some(DieType::D20),
            100 => Some(DieType::D100),
            _ => None,
        }
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// A resolved roll of a single die.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub die: DieType,
    /// The raw face rolled, 1..=sides.
    pub value: u32,
    pub modifier: i32,
    /// What the roll was checking, if the game master asked for one.
    pub skill_check: Option<String>,
}

impl DiceRoll {
    /// Roll a plain d20 with no modifier.
    pub fn d20() -> Self {
        Self::d20_with_rng(&mut rand::thread_rng())
    }

    /// Roll a d20 with a specific RNG (useful for testing).
    pub fn d20_with_rng<R: Rng>(rng: &mut R) -> Self {
        Self {
            die: DieType::D20,
            value: roll_with_rng(DieType::D20, rng),
            modifier: 0,
            skill_check: None,
        }
    }

    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn with_skill_check(mut self, skill: impl Into<String>) -> Self {
        self.skill_check = Some(skill.into());
        self
    }

    /// The modified total.
    pub fn total(&self) -> i32 {
        self.value as i32 + self.modifier
    }

    pub fn is_natural_max(&self) -> bool {
        self.value == self.die.sides()
    }

    pub fn is_natural_one(&self) -> bool {
        self.value == 1
    }

    /// The wire report sent to `/game/dice-result`.
    pub fn report(&self) -> DiceRollReport {
        DiceRollReport {
            die: self.die.to_string(),
            result: self.value as i32,
            modifier: self.modifier,
            total: self.total(),
            skill_check: self.skill_check.clone(),
        }
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifier != 0 {
            let sign = if self.modifier > 0 { '+' } else { '-' };
            write!(
                f,
                "{}: {} {} {} = {}",
                self.die,
                self.value,
                sign,
                self.modifier.abs(),
                self.total()
            )
        } else {
            write!(f, "{}: {}", self.die, self.value)
        }
    }
}

/// Roll a die.
pub fn roll(die: DieType) -> u32 {
    roll_with_rng(die, &mut rand::thread_rng())
}

/// Roll with a specific RNG (useful for testing).
pub fn roll_with_rng<R: Rng>(die: DieType, rng: &mut R) -> u32 {
    rng.gen_range(1..=die.sides())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_die_sides() {
        assert_eq!(DieType::D20.sides(), 20);
        assert_eq!(DieType::from_sides(20), Some(DieType::D20));
        assert_eq!(DieType::from_sides(7), None);
    }

    #[test]
    fn test_die_display() {
        assert_eq!(DieType::D20.to_string(), "d20");
        assert_eq!(DieType::D100.to_string(), "d100");
    }

    #[test]
    fn test_roll_range() {
        for _ in 0..200 {
            let value = roll(DieType::D20);
            assert!((1..=20).contains(&value));
        }
    }

    #[test]
    fn test_d20_roll_total() {
        let roll = DiceRoll {
            die: DieType::D20,
            value: 14,
            modifier: 3,
            skill_check: None,
        };
        assert_eq!(roll.total(), 17);
        assert!(!roll.is_natural_max());
        assert!(!roll.is_natural_one());
    }

    #[test]
    fn test_naturals() {
        let max = DiceRoll {
            die: DieType::D20,
            value: 20,
            modifier: -2,
            skill_check: None,
        };
        assert!(max.is_natural_max());

        let one = DiceRoll {
            die: DieType::D20,
            value: 1,
            modifier: 5,
            skill_check: None,
        };
        assert!(one.is_natural_one());
    }

    #[test]
    fn test_report_shape() {
        let roll = DiceRoll::d20()
            .with_modifier(2)
            .with_skill_check("Perception");
        let report = roll.report();
        assert_eq!(report.die, "d20");
        assert_eq!(report.total, report.result + 2);
        assert_eq!(report.skill_check.as_deref(), Some("Perception"));
    }

    #[test]
    fn test_display() {
        let roll = DiceRoll {
            die: DieType::D20,
            value: 14,
            modifier: 3,
            skill_check: None,
        };
        assert_eq!(roll.to_string(), "d20: 14 + 3 = 17");

        let plain = DiceRoll {
            die: DieType::D20,
            value: 9,
            modifier: 0,
            skill_check: None,
        };
        assert_eq!(plain.to_string(), "d20: 9");
    }
}
