//! Emotion classification seam.
//!
//! The classifier is an external service. moodlog only defines the shape of
//! its answer and normalizes it before anything downstream sees it.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::EmotionAnnotation;

/// Raw classifier answer for one piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Emotion label as returned, not yet validated
    pub emotion: String,
    /// Intensity as returned, not yet clamped
    pub intensity: i64,
    #[serde(default)]
    pub triggers: Vec<String>,
    /// Coping suggestions shown to the user, never aggregated
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl Analysis {
    /// Normalize into an annotation: unknown labels become neutral, the
    /// intensity is clamped and blank triggers are dropped.
    pub fn into_annotation(self) -> EmotionAnnotation {
        let triggers = self
            .triggers
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        EmotionAnnotation::from_raw(&self.emotion, self.intensity, triggers)
    }
}

/// Something that can label text with an emotion.
pub trait EmotionClassifier {
    fn analyze(&self, text: &str) -> Result<Analysis>;
}

/// Classifier that returns a fixed, caller-supplied analysis.
///
/// Used by the CLI, where the user states their mood directly.
#[derive(Debug, Clone)]
pub struct ManualClassification {
    analysis: Analysis,
}

impl ManualClassification {
    pub fn new(emotion: impl Into<String>, intensity: i64, triggers: Vec<String>) -> Self {
        Self {
            analysis: Analysis {
                emotion: emotion.into(),
                intensity,
                triggers,
                suggestions: Vec::new(),
            },
        }
    }
}

impl EmotionClassifier for ManualClassification {
    fn analyze(&self, _text: &str) -> Result<Analysis> {
        Ok(self.analysis.clone())
    }
}

/// Classify `text`, keeping the entry unannotated if the classifier fails.
pub fn annotate<C: EmotionClassifier + ?Sized>(
    classifier: &C,
    text: &str,
) -> Option<EmotionAnnotation> {
    match classifier.analyze(text) {
        Ok(analysis) => Some(analysis.into_annotation()),
        Err(e) => {
            tracing::warn!(error = %e, "Emotion classification failed, storing entry without mood");
            None
        }
    }
}
