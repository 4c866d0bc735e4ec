//! Achievement catalogue and unlock evaluation.
//!
//! Templates are configuration: the stock catalogue from
//! [`default_templates`] is used unless the config file supplies its own
//! `[[rewards.achievements]]` list.

use chrono::{DateTime, Utc};

use crate::types::{Achievement, AchievementKind, AchievementTemplate, UserStats};

/// Result of one evaluation pass.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    /// Full list in template order, with new unlocks applied
    pub achievements: Vec<Achievement>,
    /// Achievements that crossed their threshold during this pass
    pub newly_unlocked: Vec<Achievement>,
}

/// Counter value an achievement of `kind` is compared against.
pub fn progress_value(stats: &UserStats, kind: AchievementKind) -> u32 {
    match kind {
        AchievementKind::Entries => stats.total_entries,
        AchievementKind::Streak => stats.current_streak.max(stats.longest_streak),
        AchievementKind::Emotions => stats.unique_emotions,
        AchievementKind::Triggers => stats.total_triggers,
    }
}

/// Unlock every locked achievement whose threshold `stats` meets.
///
/// Unlocked achievements pass through untouched, so their original
/// `unlocked_at` survives and they are never reported twice.
pub fn evaluate(stats: &UserStats, achievements: &[Achievement], now: DateTime<Utc>) -> Evaluation {
    let mut newly_unlocked = Vec::new();

    let achievements = achievements
        .iter()
        .map(|achievement| {
            if achievement.unlocked {
                return achievement.clone();
            }
            let value = progress_value(stats, achievement.template.kind);
            if value < achievement.template.requirement {
                return achievement.clone();
            }

            let unlocked = Achievement {
                template: achievement.template.clone(),
                unlocked: true,
                unlocked_at: Some(now),
            };
            newly_unlocked.push(unlocked.clone());
            unlocked
        })
        .collect();

    Evaluation {
        achievements,
        newly_unlocked,
    }
}

fn template(
    id: &str,
    title: &str,
    description: &str,
    icon: &str,
    requirement: u32,
    kind: AchievementKind,
) -> AchievementTemplate {
    AchievementTemplate {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        requirement,
        kind,
    }
}

/// The stock achievement catalogue.
pub fn default_templates() -> Vec<AchievementTemplate> {
    use AchievementKind::*;

    vec![
        template(
            "first_entry",
            "First Steps",
            "Write your first journal entry",
            "✍️",
            1,
            Entries,
        ),
        template(
            "entries_5",
            "Getting Started",
            "Write 5 journal entries",
            "📝",
            5,
            Entries,
        ),
        template(
            "entries_10",
            "Regular Writer",
            "Write 10 journal entries",
            "📖",
            10,
            Entries,
        ),
        template(
            "entries_30",
            "Dedicated Journaler",
            "Write 30 journal entries",
            "📚",
            30,
            Entries,
        ),
        template(
            "streak_3",
            "On a Roll",
            "Journal 3 days in a row",
            "🔥",
            3,
            Streak,
        ),
        template(
            "streak_7",
            "Week Warrior",
            "Journal 7 days in a row",
            "⚡",
            7,
            Streak,
        ),
        template(
            "streak_30",
            "Monthly Master",
            "Journal 30 days in a row",
            "🏆",
            30,
            Streak,
        ),
        template(
            "emotions_4",
            "Emotional Explorer",
            "Experience 4 different emotions",
            "🎭",
            4,
            Emotions,
        ),
        template(
            "emotions_7",
            "Full Spectrum",
            "Experience all 7 emotions",
            "🌈",
            7,
            Emotions,
        ),
        template(
            "triggers_5",
            "Self Aware",
            "Identify 5 different triggers",
            "🔍",
            5,
            Triggers,
        ),
        template(
            "triggers_15",
            "Pattern Seeker",
            "Identify 15 different triggers",
            "🧠",
            15,
            Triggers,
        ),
    ]
}
