//! Emotional valence scoring and window-over-window trends.

use serde::Serialize;

use crate::types::JournalEntry;

/// Minimum score difference before a change counts as a trend.
pub const TREND_MARGIN: f64 = 0.3;

/// Direction of change between two windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Stable => "→",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        }
    }
}

/// Mean valence weight over annotated entries, 0.0 when there are none.
pub fn score(entries: &[JournalEntry]) -> f64 {
    let (sum, count) = entries
        .iter()
        .filter_map(|e| e.primary_emotion())
        .fold((0.0, 0u32), |(sum, count), emotion| {
            (sum + emotion.weight(), count + 1)
        });

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Compare the current window's score against the previous one.
pub fn classify_trend(current: f64, previous: f64) -> Trend {
    if current > previous + TREND_MARGIN {
        Trend::Up
    } else if current < previous - TREND_MARGIN {
        Trend::Down
    } else {
        Trend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Emotion, EmotionAnnotation};
    use chrono::Utc;

    fn entry(emotion: Emotion) -> JournalEntry {
        JournalEntry::new(
            "entry",
            Utc::now(),
            Some(EmotionAnnotation::new(emotion, 5, vec![])),
        )
    }

    #[test]
    fn test_score_is_mean_weight() {
        let entries = vec![
            entry(Emotion::Happy),
            entry(Emotion::Calm),
            entry(Emotion::Angry),
            entry(Emotion::Sad),
        ];
        // (1 + 0.5 - 1 - 0.5) / 4
        assert_eq!(score(&entries), 0.0);

        let entries = vec![entry(Emotion::Excited), entry(Emotion::Calm)];
        assert_eq!(score(&entries), 0.75);
    }

    #[test]
    fn test_score_empty_and_unannotated() {
        assert_eq!(score(&[]), 0.0);
        let entries = vec![JournalEntry::new("pending", Utc::now(), None)];
        assert_eq!(score(&entries), 0.0);
    }

    #[test]
    fn test_trend_hysteresis() {
        assert_eq!(classify_trend(1.0, 0.5), Trend::Up);
        assert_eq!(classify_trend(0.6, 0.5), Trend::Stable);
        assert_eq!(classify_trend(0.1, 0.6), Trend::Down);
        assert_eq!(classify_trend(0.0, 0.0), Trend::Stable);
    }
}
