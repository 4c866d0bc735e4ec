//! Consecutive-day streaks.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::Serialize;

use crate::types::JournalEntry;

/// Streak statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakStats {
    /// Consecutive days ending today or yesterday
    pub current: u32,
    /// Longest run of consecutive days ever
    pub longest: u32,
    /// Total distinct days with at least one entry
    pub active_days: u32,
}

/// Compute current and longest streak.
///
/// Day boundaries are taken in `now`'s time zone. A streak still counts as
/// current when the latest entry was yesterday, so it survives until the
/// user misses a full day.
pub fn compute_streak<Tz: TimeZone>(entries: &[JournalEntry], now: &DateTime<Tz>) -> StreakStats {
    let tz = now.timezone();
    let days: BTreeSet<NaiveDate> = entries.iter().map(|e| e.local_date(&tz)).collect();
    let days: Vec<NaiveDate> = days.into_iter().rev().collect();

    streak_from_days(&days, now.date_naive())
}

/// Streaks over distinct days sorted newest first.
pub fn streak_from_days(days: &[NaiveDate], today: NaiveDate) -> StreakStats {
    let Some(&latest) = days.first() else {
        return StreakStats::default();
    };

    let gap_to_today = (today - latest).num_days();
    let mut current = 0u32;
    if gap_to_today == 0 || gap_to_today == 1 {
        current = 1;
        for pair in days.windows(2) {
            if (pair[0] - pair[1]).num_days() == 1 {
                current += 1;
            } else {
                break;
            }
        }
    }

    let mut longest = 1u32;
    let mut run = 1u32;
    for pair in days.windows(2) {
        if (pair[0] - pair[1]).num_days() == 1 {
            run += 1;
        } else {
            run = 1;
        }
        longest = longest.max(run);
    }

    StreakStats {
        current,
        longest: longest.max(current),
        active_days: days.len() as u32,
    }
}
