//! Per-user rewards snapshot.
//!
//! [`Rewards`] ties the streak, achievement and leveling pieces together.
//! A snapshot is rebuilt from scratch on every entry-list change; the only
//! state carried between passes is the prior achievement list, so unlock
//! times are kept and nothing is announced twice.
//!
//! ```rust,ignore
//! let rewards = Rewards::new(config.templates(), config.level_curve()?);
//! let prior = rewards.restore(&db.unlocked_achievements(user)?);
//! let snapshot = rewards.recompute(&db.list_entries(user)?, &prior, &Local::now());
//! db.record_unlocks(user, &snapshot.newly_unlocked)?;
//! ```

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use super::achievements::{self, default_templates};
use super::leveling::{points_for, LevelCurve};
use super::stats::{unique_emotions, unique_triggers};
use super::streak::compute_streak;
use crate::types::{Achievement, AchievementTemplate, JournalEntry, UserStats};

/// Receives one call per newly unlocked achievement.
pub trait UnlockListener {
    fn on_unlock(&mut self, achievement: &Achievement);
}

impl<F: FnMut(&Achievement)> UnlockListener for F {
    fn on_unlock(&mut self, achievement: &Achievement) {
        self(achievement)
    }
}

/// Listener that ignores unlocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl UnlockListener for NoopListener {
    fn on_unlock(&mut self, _achievement: &Achievement) {}
}

/// Result of one recomputation pass.
#[derive(Debug, Clone, Serialize)]
pub struct RewardsSnapshot {
    pub stats: UserStats,
    pub achievements: Vec<Achievement>,
    /// Unlocked during this pass only
    pub newly_unlocked: Vec<Achievement>,
    /// Percent towards the next level
    pub level_progress: u32,
    /// `None` at the maximum level
    pub points_to_next_level: Option<u32>,
}

impl RewardsSnapshot {
    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }
}

/// The reward economy: achievement catalogue plus level curve.
#[derive(Debug, Clone)]
pub struct Rewards {
    templates: Vec<AchievementTemplate>,
    curve: LevelCurve,
}

impl Default for Rewards {
    fn default() -> Self {
        Self::new(default_templates(), LevelCurve::default())
    }
}

impl Rewards {
    pub fn new(templates: Vec<AchievementTemplate>, curve: LevelCurve) -> Self {
        Self { templates, curve }
    }

    pub fn templates(&self) -> &[AchievementTemplate] {
        &self.templates
    }

    pub fn curve(&self) -> &LevelCurve {
        &self.curve
    }

    /// Catalogue with nothing unlocked.
    pub fn locked(&self) -> Vec<Achievement> {
        self.templates.iter().cloned().map(Achievement::from).collect()
    }

    /// Rebuild achievement state from persisted unlock times.
    ///
    /// Ids not in the catalogue are ignored.
    pub fn restore(&self, unlocks: &HashMap<String, DateTime<Utc>>) -> Vec<Achievement> {
        self.templates
            .iter()
            .map(|template| match unlocks.get(&template.id) {
                Some(&at) => Achievement {
                    template: template.clone(),
                    unlocked: true,
                    unlocked_at: Some(at),
                },
                None => Achievement::locked(template.clone()),
            })
            .collect()
    }

    /// Recompute without notifications.
    pub fn recompute<Tz: TimeZone>(
        &self,
        entries: &[JournalEntry],
        prior: &[Achievement],
        now: &DateTime<Tz>,
    ) -> RewardsSnapshot {
        self.recompute_with(entries, prior, now, &mut NoopListener)
    }

    /// Recompute the snapshot and report each new unlock to `listener`.
    ///
    /// `prior` is matched to the catalogue by id; catalogue entries missing
    /// from it start locked. Points use the unlock count from `prior`, so
    /// achievements unlocked in this pass only pay out on the next one.
    pub fn recompute_with<Tz: TimeZone, L: UnlockListener + ?Sized>(
        &self,
        entries: &[JournalEntry],
        prior: &[Achievement],
        now: &DateTime<Tz>,
        listener: &mut L,
    ) -> RewardsSnapshot {
        let streak = compute_streak(entries, now);
        let total_entries = entries.len() as u32;

        let current = self.merge_prior(prior);
        let prior_unlocked = current.iter().filter(|a| a.unlocked).count() as u32;
        let points = points_for(total_entries, streak.current, prior_unlocked);

        let mut stats = UserStats {
            total_entries,
            current_streak: streak.current,
            longest_streak: streak.longest,
            unique_emotions: unique_emotions(entries),
            total_triggers: unique_triggers(entries),
            points,
            level: 0,
        };

        let evaluation = achievements::evaluate(&stats, &current, now.with_timezone(&Utc));
        stats.level = self.curve.level_for(points);

        for achievement in &evaluation.newly_unlocked {
            tracing::info!(
                achievement = %achievement.id(),
                title = %achievement.template.title,
                "Achievement unlocked"
            );
            listener.on_unlock(achievement);
        }

        tracing::debug!(
            entries = stats.total_entries,
            streak = stats.current_streak,
            points = stats.points,
            level = stats.level,
            "Rewards recomputed"
        );

        RewardsSnapshot {
            level_progress: self.curve.progress_for(points, stats.level),
            points_to_next_level: self.curve.points_to_next(points),
            stats,
            achievements: evaluation.achievements,
            newly_unlocked: evaluation.newly_unlocked,
        }
    }

    fn merge_prior(&self, prior: &[Achievement]) -> Vec<Achievement> {
        self.templates
            .iter()
            .map(|template| {
                prior
                    .iter()
                    .find(|a| a.template.id == template.id && a.unlocked)
                    .map(|a| Achievement {
                        template: template.clone(),
                        unlocked: true,
                        unlocked_at: a.unlocked_at,
                    })
                    .unwrap_or_else(|| Achievement::locked(template.clone()))
            })
            .collect()
    }
}
