//! Structured check-in classifier.
//!
//! Maps a mood label, an intensity and context tags to an emotion, a crisis
//! flag and a tiered list of recommendations. The crisis rule is a literal
//! threshold: canonical intensity of at least 8 on a distress emotion.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::mood::{ContextTag, Emotion, Intensity, MoodAnalysis};

pub const CRISIS_INTENSITY: u8 = 8;
pub const ELEVATED_INTENSITY: u8 = 6;

/// Recommendation band. Exactly one applies to every (label, intensity) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationTier {
    Crisis,
    Elevated,
    Baseline,
}

impl RecommendationTier {
    pub fn for_reading(emotion: Emotion, intensity: Intensity) -> Self {
        if is_crisis(emotion, intensity) {
            Self::Crisis
        } else if intensity.get() >= ELEVATED_INTENSITY {
            Self::Elevated
        } else {
            Self::Baseline
        }
    }

    fn recommendations(self) -> &'static [&'static str] {
        match self {
            Self::Crisis => &[
                "Consider reaching out to a mental health professional",
                "Try calming activities from our activities hub",
                "Contact your support network",
            ],
            Self::Elevated => &[
                "Try some calming activities to help manage your emotions",
                "Consider talking to someone you trust",
            ],
            Self::Baseline => &[
                "Keep up the good work with your emotional awareness",
                "Continue with your self-care practices",
            ],
        }
    }
}

pub fn is_crisis(emotion: Emotion, intensity: Intensity) -> bool {
    intensity.get() >= CRISIS_INTENSITY && emotion.is_distress()
}

pub fn classify(label: &str, intensity: Intensity, contexts: &BTreeSet<ContextTag>) -> MoodAnalysis {
    let emotion = Emotion::from_label(label);
    let tier = RecommendationTier::for_reading(emotion, intensity);

    let mut recommendations: Vec<String> = tier
        .recommendations()
        .iter()
        .map(|r| r.to_string())
        .collect();

    if contexts.contains(&ContextTag::Work) {
        recommendations.push("Consider taking breaks during work to manage stress".into());
    }
    if contexts.contains(&ContextTag::Sleep) {
        recommendations.push("Focus on good sleep hygiene practices".into());
    }

    MoodAnalysis {
        emotion,
        intensity,
        contexts: contexts.clone(),
        crisis_detected: tier == RecommendationTier::Crisis,
        recommendations,
    }
}
