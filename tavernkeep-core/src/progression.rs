//! Character progression formulas.
//!
//! Levels run 1 through 20. Experience grows quadratically per level and
//! hit points linearly, so every surface that shows a level, an XP bar,
//! or a hit-point bar derives from the functions here. All functions are
//! pure and total: out-of-range input is clamped, never rejected.

/// The lowest character level.
pub const MIN_LEVEL: u8 = 1;

/// The level cap.
pub const MAX_LEVEL: u8 = 20;

/// Maximum hit points at a level.
///
/// 15 HP at level 1, 35 at level 20, linear in between and rounded to
/// the nearest point. The level is clamped into [1, 20] first.
pub fn max_hit_points(level: u8) -> i32 {
    let level = level.clamp(MIN_LEVEL, MAX_LEVEL);
    let per_level = 20.0 / 19.0;
    (15.0 + f64::from(level - 1) * per_level).round() as i32
}

/// Experience required to reach a level.
///
/// Level 1 costs nothing; beyond that the cost is `100 * (level - 1)^2`,
/// so level 2 = 100, level 3 = 400, ... level 20 = 36100.
pub fn xp_threshold(level: u8) -> u32 {
    if level <= 1 {
        return 0;
    }
    let steps = u32::from(level) - 1;
    100 * steps * steps
}

/// The level earned by an experience total.
///
/// Scans from the cap downward and returns the first level whose
/// threshold is met, i.e. always the highest such level.
pub fn level_from_xp(xp: u32) -> u8 {
    for level in (MIN_LEVEL..=MAX_LEVEL).rev() {
        if xp >= xp_threshold(level) {
            return level;
        }
    }
    MIN_LEVEL
}

/// Experience still missing for the next level. Zero at the cap.
pub fn xp_to_next_level(xp: u32, level: u8) -> u32 {
    if level >= MAX_LEVEL {
        return 0;
    }
    xp_threshold(level + 1).saturating_sub(xp)
}

/// Progress through the current level bracket as a percentage.
///
/// Clamped into [0, 100] even when the xp/level pair is inconsistent
/// (concurrent external edits can leave xp below the level's own
/// threshold). Always 100 at the cap.
pub fn xp_progress_percentage(xp: u32, level: u8) -> f64 {
    if level >= MAX_LEVEL {
        return 100.0;
    }
    let level = level.max(MIN_LEVEL);
    let floor = xp_threshold(level);
    let ceiling = xp_threshold(level + 1);
    let progress = xp.saturating_sub(floor) as f64;
    let required = f64::from(ceiling - floor);
    ((progress / required) * 100.0).clamp(0.0, 100.0)
}

/// The experience threshold for every level, in level order.
pub fn xp_table() -> [(u8, u32); MAX_LEVEL as usize] {
    std::array::from_fn(|i| {
        let level = i as u8 + 1;
        (level, xp_threshold(level))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_hit_points_endpoints() {
        assert_eq!(max_hit_points(1), 15);
        assert_eq!(max_hit_points(20), 35);
    }

    #[test]
    fn test_max_hit_points_clamps_level() {
        assert_eq!(max_hit_points(0), 15);
        assert_eq!(max_hit_points(21), 35);
        assert_eq!(max_hit_points(255), 35);
    }

    #[test]
    fn test_max_hit_points_monotonic() {
        let mut previous = max_hit_points(1);
        for level in 2..=20 {
            let hp = max_hit_points(level);
            assert!(hp >= previous, "hp decreased at level {level}");
            previous = hp;
        }
    }

    #[test]
    fn test_xp_threshold_values() {
        assert_eq!(xp_threshold(1), 0);
        assert_eq!(xp_threshold(2), 100);
        assert_eq!(xp_threshold(3), 400);
        assert_eq!(xp_threshold(4), 900);
        assert_eq!(xp_threshold(20), 36100);
    }

    #[test]
    fn test_xp_threshold_quadratic_form() {
        for level in 1u8..=20 {
            let expected = if level <= 1 {
                0
            } else {
                100 * u32::from(level - 1).pow(2)
            };
            assert_eq!(xp_threshold(level), expected);
        }
    }

    #[test]
    fn test_level_from_xp_boundaries() {
        assert_eq!(level_from_xp(0), 1);
        assert_eq!(level_from_xp(99), 1);
        assert_eq!(level_from_xp(100), 2);
        assert_eq!(level_from_xp(399), 2);
        assert_eq!(level_from_xp(400), 3);
        assert_eq!(level_from_xp(36099), 19);
        assert_eq!(level_from_xp(36100), 20);
        assert_eq!(level_from_xp(u32::MAX), 20);
    }

    #[test]
    fn test_level_from_xp_monotonic() {
        let mut previous = level_from_xp(0);
        for xp in (0..40_000u32).step_by(50) {
            let level = level_from_xp(xp);
            assert!(level >= previous, "level decreased at xp {xp}");
            previous = level;
        }
    }

    #[test]
    fn test_level_from_xp_meets_own_threshold() {
        for level in 1u8..=20 {
            assert!(level_from_xp(xp_threshold(level)) >= level);
        }
    }

    #[test]
    fn test_xp_to_next_level() {
        assert_eq!(xp_to_next_level(0, 1), 100);
        assert_eq!(xp_to_next_level(50, 1), 50);
        assert_eq!(xp_to_next_level(100, 2), 300);
        assert_eq!(xp_to_next_level(0, 20), 0);
        assert_eq!(xp_to_next_level(50_000, 20), 0);
    }

    #[test]
    fn test_xp_to_next_level_inconsistent_bookkeeping() {
        // xp already past the next threshold: missing amount saturates at 0
        assert_eq!(xp_to_next_level(500, 1), 0);
    }

    #[test]
    fn test_progress_at_bracket_floor() {
        for level in 1u8..20 {
            let pct = xp_progress_percentage(xp_threshold(level), level);
            assert_eq!(pct, 0.0, "nonzero progress at level {level} floor");
        }
    }

    #[test]
    fn test_progress_just_below_ceiling() {
        for level in 1u8..20 {
            let pct = xp_progress_percentage(xp_threshold(level + 1) - 1, level);
            assert!(pct < 100.0, "progress reached 100 below level {level} ceiling");
            assert!(pct > 90.0);
        }
    }

    #[test]
    fn test_progress_at_cap() {
        assert_eq!(xp_progress_percentage(36100, 20), 100.0);
        assert_eq!(xp_progress_percentage(0, 20), 100.0);
    }

    #[test]
    fn test_progress_clamped_when_inconsistent() {
        // xp below the level's own floor
        assert_eq!(xp_progress_percentage(0, 5), 0.0);
        // xp far past the ceiling
        assert_eq!(xp_progress_percentage(50_000, 5), 100.0);
    }

    #[test]
    fn test_xp_table() {
        let table = xp_table();
        assert_eq!(table.len(), 20);
        assert_eq!(table[0], (1, 0));
        assert_eq!(table[1], (2, 100));
        assert_eq!(table[19], (20, 36100));
    }
}
