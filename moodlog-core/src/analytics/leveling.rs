//! Points and levels.

use serde::Serialize;

use crate::error::{Error, Result};

/// Points earned per journal entry.
pub const POINTS_PER_ENTRY: u32 = 10;
/// Points earned per day of the current streak.
pub const POINTS_PER_STREAK_DAY: u32 = 5;
/// Points earned per unlocked achievement.
pub const POINTS_PER_ACHIEVEMENT: u32 = 25;

/// Cumulative point thresholds of the stock level curve.
pub const DEFAULT_LEVEL_THRESHOLDS: [u32; 10] = [0, 50, 150, 300, 500, 800, 1200, 1800, 2500, 3500];

/// Total points for the given counters, saturating at `u32::MAX`.
pub fn points_for(entry_count: u32, current_streak_days: u32, unlocked_achievements: u32) -> u32 {
    entry_count
        .saturating_mul(POINTS_PER_ENTRY)
        .saturating_add(current_streak_days.saturating_mul(POINTS_PER_STREAK_DAY))
        .saturating_add(unlocked_achievements.saturating_mul(POINTS_PER_ACHIEVEMENT))
}

/// Ascending cumulative point thresholds, one per level.
///
/// Level `n` starts at `thresholds[n - 1]`; the first threshold is always 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelCurve {
    thresholds: Vec<u32>,
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_LEVEL_THRESHOLDS.to_vec(),
        }
    }
}

impl LevelCurve {
    /// Build a curve, rejecting empty, non-zero-based or non-ascending lists.
    pub fn new(thresholds: Vec<u32>) -> Result<Self> {
        match thresholds.first() {
            None => {
                return Err(Error::Config(
                    "rewards.level_thresholds must not be empty".to_string(),
                ))
            }
            Some(&first) if first != 0 => {
                return Err(Error::Config(
                    "rewards.level_thresholds must start at 0".to_string(),
                ))
            }
            Some(_) => {}
        }
        if thresholds.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::Config(
                "rewards.level_thresholds must be strictly ascending".to_string(),
            ));
        }
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &[u32] {
        &self.thresholds
    }

    pub fn max_level(&self) -> u32 {
        self.thresholds.len() as u32
    }

    /// Level reached with `points`, starting at 1.
    pub fn level_for(&self, points: u32) -> u32 {
        let reached = self.thresholds.iter().filter(|&&t| t <= points).count() as u32;
        reached.clamp(1, self.max_level())
    }

    /// Percent progress from `level` towards the next one, in `0..=100`.
    ///
    /// Always 100 at the maximum level.
    pub fn progress_for(&self, points: u32, level: u32) -> u32 {
        if level >= self.max_level() {
            return 100;
        }
        let idx = level.max(1) as usize - 1;
        let lower = self.thresholds[idx] as f64;
        let upper = self.thresholds[idx + 1] as f64;
        let pct = (points as f64 - lower) / (upper - lower) * 100.0;
        pct.clamp(0.0, 100.0).round() as u32
    }

    /// Points still needed for the next level, `None` at the maximum.
    pub fn points_to_next(&self, points: u32) -> Option<u32> {
        let level = self.level_for(points);
        self.thresholds
            .get(level as usize)
            .map(|next| next.saturating_sub(points))
    }
}
