//! Core domain types for moodlog
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Entry** | One journal submission: timestamp, free text, optional emotion annotation |
//! | **Emotion** | One of seven primary emotions assigned by the classifier |
//! | **Trigger** | Short label naming a topic or cause linked to the emotion |
//! | **Streak** | Consecutive calendar days with at least one entry |
//! | **Achievement** | A named milestone unlocked when a tracked counter crosses a threshold |
//!
//! Annotations come from an external classifier and are not fully trusted.
//! Every constructor here normalizes its input: unknown emotion labels fall
//! back to [`Emotion::Neutral`] and intensities are clamped into `1..=10`.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Lowest intensity the classifier scale allows.
pub const MIN_INTENSITY: u8 = 1;
/// Highest intensity the classifier scale allows.
pub const MAX_INTENSITY: u8 = 10;

// ============================================
// Emotion
// ============================================

/// Primary emotion of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Anxious,
    Angry,
    Neutral,
    Excited,
    Calm,
}

impl Emotion {
    /// All emotions, in declaration order.
    pub const ALL: [Emotion; 7] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Anxious,
        Emotion::Angry,
        Emotion::Neutral,
        Emotion::Excited,
        Emotion::Calm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Anxious => "anxious",
            Emotion::Angry => "angry",
            Emotion::Neutral => "neutral",
            Emotion::Excited => "excited",
            Emotion::Calm => "calm",
        }
    }

    /// Capitalized display label.
    pub fn label(&self) -> &'static str {
        match self {
            Emotion::Happy => "Happy",
            Emotion::Sad => "Sad",
            Emotion::Anxious => "Anxious",
            Emotion::Angry => "Angry",
            Emotion::Neutral => "Neutral",
            Emotion::Excited => "Excited",
            Emotion::Calm => "Calm",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Emotion::Happy => "😊",
            Emotion::Sad => "😢",
            Emotion::Anxious => "😰",
            Emotion::Angry => "😠",
            Emotion::Neutral => "😐",
            Emotion::Excited => "🤩",
            Emotion::Calm => "😌",
        }
    }

    /// Valence weight used by the trend score.
    pub fn weight(&self) -> f64 {
        match self {
            Emotion::Happy | Emotion::Excited => 1.0,
            Emotion::Calm => 0.5,
            Emotion::Neutral => 0.0,
            Emotion::Sad | Emotion::Anxious => -0.5,
            Emotion::Angry => -1.0,
        }
    }

    pub fn sentiment(&self) -> Sentiment {
        match self {
            Emotion::Happy | Emotion::Excited | Emotion::Calm => Sentiment::Positive,
            Emotion::Sad | Emotion::Anxious | Emotion::Angry => Sentiment::Negative,
            Emotion::Neutral => Sentiment::Neutral,
        }
    }

    /// Parse a classifier label, falling back to `Neutral` for anything
    /// outside the enumeration.
    pub fn normalize(label: &str) -> Self {
        match label.parse() {
            Ok(emotion) => emotion,
            Err(_) => {
                tracing::warn!(label, "Unknown emotion label, treating as neutral");
                Emotion::Neutral
            }
        }
    }
}

impl std::str::FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "happy" => Ok(Emotion::Happy),
            "sad" => Ok(Emotion::Sad),
            "anxious" => Ok(Emotion::Anxious),
            "angry" => Ok(Emotion::Angry),
            "neutral" => Ok(Emotion::Neutral),
            "excited" => Ok(Emotion::Excited),
            "calm" => Ok(Emotion::Calm),
            _ => Err(format!("unknown emotion: {}", s)),
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse valence bucket of an emotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

// ============================================
// Entries
// ============================================

/// Classifier output attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionAnnotation {
    pub primary_emotion: Emotion,
    /// Always within `MIN_INTENSITY..=MAX_INTENSITY`
    pub intensity: u8,
    /// Triggers in classifier order
    pub triggers: Vec<String>,
}

impl EmotionAnnotation {
    /// Build an annotation, clamping `intensity` into the valid range.
    pub fn new(primary_emotion: Emotion, intensity: i64, triggers: Vec<String>) -> Self {
        Self {
            primary_emotion,
            intensity: clamp_intensity(intensity),
            triggers,
        }
    }

    /// Build an annotation from untrusted raw values.
    pub fn from_raw(label: &str, intensity: i64, triggers: Vec<String>) -> Self {
        Self::new(Emotion::normalize(label), intensity, triggers)
    }
}

/// Clamp a raw intensity into `1..=10`.
pub fn clamp_intensity(raw: i64) -> u8 {
    raw.clamp(MIN_INTENSITY as i64, MAX_INTENSITY as i64) as u8
}

/// A single journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Opaque unique identifier
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Free text, opaque to the analytics
    pub content: String,
    /// Absent while classification is pending or failed
    pub emotion: Option<EmotionAnnotation>,
}

impl JournalEntry {
    /// Create an entry with a fresh UUID.
    pub fn new(
        content: impl Into<String>,
        created_at: DateTime<Utc>,
        emotion: Option<EmotionAnnotation>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at,
            content: content.into(),
            emotion,
        }
    }

    /// Calendar day of this entry in the given time zone.
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.created_at.with_timezone(tz).date_naive()
    }

    pub fn primary_emotion(&self) -> Option<Emotion> {
        self.emotion.as_ref().map(|e| e.primary_emotion)
    }

    /// Triggers of this entry, empty when unannotated.
    pub fn triggers(&self) -> &[String] {
        self.emotion
            .as_ref()
            .map(|e| e.triggers.as_slice())
            .unwrap_or(&[])
    }
}

// ============================================
// Achievements
// ============================================

/// Which counter an achievement tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementKind {
    /// Total number of entries
    Entries,
    /// Best of current and longest streak
    Streak,
    /// Distinct primary emotions seen
    Emotions,
    /// Distinct trigger labels seen
    Triggers,
}

impl AchievementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementKind::Entries => "entries",
            AchievementKind::Streak => "streak",
            AchievementKind::Emotions => "emotions",
            AchievementKind::Triggers => "triggers",
        }
    }
}

/// Immutable achievement definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementTemplate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    /// Counter value needed to unlock
    pub requirement: u32,
    #[serde(rename = "type")]
    pub kind: AchievementKind,
}

/// An achievement template plus its unlock state.
///
/// Unlocking is one-way: once `unlocked` is true it stays true and
/// `unlocked_at` keeps the first unlock time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    #[serde(flatten)]
    pub template: AchievementTemplate,
    pub unlocked: bool,
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl Achievement {
    /// A locked achievement.
    pub fn locked(template: AchievementTemplate) -> Self {
        Self {
            template,
            unlocked: false,
            unlocked_at: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.template.id
    }
}

impl From<AchievementTemplate> for Achievement {
    fn from(template: AchievementTemplate) -> Self {
        Achievement::locked(template)
    }
}

// ============================================
// Stats
// ============================================

/// Derived per-user counters, rebuilt from the entry list on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_entries: u32,
    pub current_streak: u32,
    /// Never below `current_streak`
    pub longest_streak: u32,
    pub unique_emotions: u32,
    /// Distinct trigger labels, not occurrences
    pub total_triggers: u32,
    pub points: u32,
    pub level: u32,
}
