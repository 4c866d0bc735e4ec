//! Emotion distribution statistics over an arbitrary set of entries.
//!
//! Callers pre-filter the entries (this week, this month, all time) and
//! hand the slice to [`aggregate`]. Every function here is total: an empty
//! slice produces zeros and empty lists.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{Emotion, JournalEntry, Sentiment};

/// Default number of triggers kept in [`EmotionSummary::trigger_counts`].
pub const DEFAULT_TOP_TRIGGERS: usize = 5;

/// Options for [`aggregate_with`].
#[derive(Debug, Clone, Copy)]
pub struct AggregateOptions {
    /// Maximum number of trigger rows to keep
    pub top_triggers: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            top_triggers: DEFAULT_TOP_TRIGGERS,
        }
    }
}

/// One row of the emotion breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionShare {
    pub emotion: Emotion,
    pub count: u32,
    /// `round(count / annotated * 100)`, rounded per row
    pub percentage: u32,
    /// Mean intensity for this emotion, rounded to an integer
    pub avg_intensity: u32,
}

/// Positive/negative/neutral split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SentimentSplit {
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
    pub positive_pct: u32,
    pub negative_pct: u32,
    pub neutral_pct: u32,
}

/// Aggregated statistics for a set of entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmotionSummary {
    /// Sorted by count descending, ties in first-seen order
    pub emotion_breakdown: Vec<EmotionShare>,
    /// (trigger, occurrences), most frequent first, capped
    pub trigger_counts: Vec<(String, u32)>,
    /// Mean intensity over annotated entries, one decimal
    pub avg_intensity: f64,
    /// All entries in the input, annotated or not
    pub total_entries: u32,
    pub dominant_emotion: Option<Emotion>,
    pub sentiment: SentimentSplit,
}

impl EmotionSummary {
    /// Number of entries that carried an emotion.
    pub fn annotated_entries(&self) -> u32 {
        self.emotion_breakdown.iter().map(|row| row.count).sum()
    }
}

/// Aggregate with the default trigger cap.
pub fn aggregate(entries: &[JournalEntry]) -> EmotionSummary {
    aggregate_with(entries, &AggregateOptions::default())
}

/// Aggregate entries into an [`EmotionSummary`].
///
/// Percentages are rounded independently per row, so a breakdown does not
/// always sum to exactly 100.
pub fn aggregate_with(entries: &[JournalEntry], options: &AggregateOptions) -> EmotionSummary {
    // (emotion, count, intensity sum) in first-seen order
    let mut per_emotion: Vec<(Emotion, u32, u32)> = Vec::new();
    let mut intensity_total = 0u32;
    let mut annotated = 0u32;

    for annotation in entries.iter().filter_map(|e| e.emotion.as_ref()) {
        annotated += 1;
        let intensity = annotation.intensity as u32;
        intensity_total += intensity;
        match per_emotion
            .iter_mut()
            .find(|(emotion, _, _)| *emotion == annotation.primary_emotion)
        {
            Some(row) => {
                row.1 += 1;
                row.2 += intensity;
            }
            None => per_emotion.push((annotation.primary_emotion, 1, intensity)),
        }
    }

    let mut emotion_breakdown: Vec<EmotionShare> = per_emotion
        .into_iter()
        .map(|(emotion, count, sum)| EmotionShare {
            emotion,
            count,
            percentage: percent(count, annotated),
            avg_intensity: (sum as f64 / count as f64).round() as u32,
        })
        .collect();
    // sort_by is stable, so ties keep first-seen order
    emotion_breakdown.sort_by(|a, b| b.count.cmp(&a.count));

    let avg_intensity = if annotated == 0 {
        0.0
    } else {
        round_one_decimal(intensity_total as f64 / annotated as f64)
    };

    EmotionSummary {
        dominant_emotion: emotion_breakdown.first().map(|row| row.emotion),
        trigger_counts: trigger_counts(entries, options.top_triggers),
        sentiment: sentiment_split(entries),
        emotion_breakdown,
        avg_intensity,
        total_entries: entries.len() as u32,
    }
}

/// Count trigger occurrences (case-sensitive), most frequent first.
pub fn trigger_counts(entries: &[JournalEntry], limit: usize) -> Vec<(String, u32)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, u32> = HashMap::new();

    for trigger in entries.iter().flat_map(|e| e.triggers()) {
        let count = counts.entry(trigger.as_str()).or_insert_with(|| {
            order.push(trigger.as_str());
            0
        });
        *count += 1;
    }

    let mut rows: Vec<(String, u32)> = order
        .into_iter()
        .map(|trigger| (trigger.to_string(), counts[trigger]))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    rows.truncate(limit);
    rows
}

/// Positive/negative/neutral counts over annotated entries.
pub fn sentiment_split(entries: &[JournalEntry]) -> SentimentSplit {
    let mut split = SentimentSplit::default();
    for emotion in entries.iter().filter_map(|e| e.primary_emotion()) {
        match emotion.sentiment() {
            Sentiment::Positive => split.positive += 1,
            Sentiment::Negative => split.negative += 1,
            Sentiment::Neutral => split.neutral += 1,
        }
    }

    let total = split.positive + split.negative + split.neutral;
    split.positive_pct = percent(split.positive, total);
    split.negative_pct = percent(split.negative, total);
    split.neutral_pct = percent(split.neutral, total);
    split
}

/// Number of distinct primary emotions.
pub fn unique_emotions(entries: &[JournalEntry]) -> u32 {
    let mut seen: Vec<Emotion> = entries.iter().filter_map(|e| e.primary_emotion()).collect();
    seen.sort();
    seen.dedup();
    seen.len() as u32
}

/// Number of distinct trigger labels (case-sensitive).
pub fn unique_triggers(entries: &[JournalEntry]) -> u32 {
    let mut seen: Vec<&str> = entries
        .iter()
        .flat_map(|e| e.triggers())
        .map(String::as_str)
        .collect();
    seen.sort_unstable();
    seen.dedup();
    seen.len() as u32
}

fn percent(part: u32, total: u32) -> u32 {
    if total == 0 {
        0
    } else {
        (part as f64 / total as f64 * 100.0).round() as u32
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EmotionAnnotation;
    use chrono::Utc;

    fn entry(emotion: Emotion, intensity: i64, triggers: &[&str]) -> JournalEntry {
        JournalEntry::new(
            "entry",
            Utc::now(),
            Some(EmotionAnnotation::new(
                emotion,
                intensity,
                triggers.iter().map(|t| t.to_string()).collect(),
            )),
        )
    }

    #[test]
    fn test_empty_input() {
        let summary = aggregate(&[]);
        assert!(summary.emotion_breakdown.is_empty());
        assert!(summary.trigger_counts.is_empty());
        assert_eq!(summary.avg_intensity, 0.0);
        assert_eq!(summary.total_entries, 0);
        assert!(summary.dominant_emotion.is_none());
        assert_eq!(summary.sentiment, SentimentSplit::default());
    }

    #[test]
    fn test_breakdown_sorted_with_stable_ties() {
        let entries = vec![
            entry(Emotion::Calm, 4, &[]),
            entry(Emotion::Sad, 6, &[]),
            entry(Emotion::Happy, 8, &[]),
            entry(Emotion::Happy, 5, &[]),
            entry(Emotion::Sad, 7, &[]),
        ];
        let summary = aggregate(&entries);
        let order: Vec<Emotion> = summary
            .emotion_breakdown
            .iter()
            .map(|row| row.emotion)
            .collect();
        // Sad and Happy tie at 2; Sad was seen first
        assert_eq!(order, vec![Emotion::Sad, Emotion::Happy, Emotion::Calm]);
        assert_eq!(summary.dominant_emotion, Some(Emotion::Sad));

        let happy = &summary.emotion_breakdown[1];
        assert_eq!(happy.count, 2);
        assert_eq!(happy.percentage, 40);
        // (8 + 5) / 2 = 6.5 rounds to 7
        assert_eq!(happy.avg_intensity, 7);
    }

    #[test]
    fn test_percentages_rounded_independently() {
        let entries = vec![
            entry(Emotion::Happy, 5, &[]),
            entry(Emotion::Sad, 5, &[]),
            entry(Emotion::Calm, 5, &[]),
        ];
        let summary = aggregate(&entries);
        let total: u32 = summary
            .emotion_breakdown
            .iter()
            .map(|row| row.percentage)
            .sum();
        assert_eq!(total, 99);
    }

    #[test]
    fn test_counts_match_annotated_entries() {
        let mut entries = vec![
            entry(Emotion::Happy, 5, &[]),
            entry(Emotion::Angry, 9, &[]),
        ];
        entries.push(JournalEntry::new("pending", Utc::now(), None));

        let summary = aggregate(&entries);
        assert_eq!(summary.annotated_entries(), 2);
        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.avg_intensity, 7.0);
    }

    #[test]
    fn test_avg_intensity_one_decimal() {
        let entries = vec![
            entry(Emotion::Happy, 5, &[]),
            entry(Emotion::Happy, 6, &[]),
            entry(Emotion::Happy, 6, &[]),
        ];
        assert_eq!(aggregate(&entries).avg_intensity, 5.7);
    }

    #[test]
    fn test_trigger_counts_capped_and_case_sensitive() {
        let entries = vec![
            entry(Emotion::Anxious, 5, &["work", "sleep", "Work"]),
            entry(Emotion::Anxious, 5, &["work", "family"]),
            entry(Emotion::Calm, 5, &["sleep", "exercise", "music", "friends"]),
        ];
        let counts = trigger_counts(&entries, 5);
        assert_eq!(counts.len(), 5);
        assert_eq!(counts[0], ("work".to_string(), 2));
        assert_eq!(counts[1], ("sleep".to_string(), 2));
        assert_eq!(counts[2], ("Work".to_string(), 1));

        let summary = aggregate_with(&entries, &AggregateOptions { top_triggers: 2 });
        assert_eq!(summary.trigger_counts.len(), 2);
    }

    #[test]
    fn test_sentiment_split() {
        let entries = vec![
            entry(Emotion::Happy, 5, &[]),
            entry(Emotion::Excited, 5, &[]),
            entry(Emotion::Angry, 5, &[]),
            entry(Emotion::Neutral, 5, &[]),
        ];
        let split = sentiment_split(&entries);
        assert_eq!(split.positive, 2);
        assert_eq!(split.negative, 1);
        assert_eq!(split.neutral, 1);
        assert_eq!(split.positive_pct, 50);
        assert_eq!(split.negative_pct, 25);
    }

    #[test]
    fn test_unique_counts() {
        let entries = vec![
            entry(Emotion::Happy, 5, &["work", "gym"]),
            entry(Emotion::Happy, 5, &["work"]),
            entry(Emotion::Sad, 5, &["Work"]),
            JournalEntry::new("pending", Utc::now(), None),
        ];
        assert_eq!(unique_emotions(&entries), 2);
        assert_eq!(unique_triggers(&entries), 3);
        assert_eq!(unique_emotions(&[]), 0);
        assert_eq!(unique_triggers(&[]), 0);
    }
}
