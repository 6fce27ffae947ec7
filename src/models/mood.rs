use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Owner id used when a request carries no authenticated user.
pub const DEMO_USER_ID: &str = "demo";

/// Emotion intensity on the canonical 1-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Intensity(u8);

impl Intensity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: i32) -> Option<Self> {
        if (Self::MIN as i32..=Self::MAX as i32).contains(&value) {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i32> for Intensity {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            format!(
                "intensity {} outside {}..={}",
                value,
                Self::MIN,
                Self::MAX
            )
        })
    }
}

impl From<Intensity> for i32 {
    fn from(value: Intensity) -> Self {
        value.0 as i32
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scale a client reported intensity on. The check-in portal slider is
/// five-point, the chat and demo surfaces are ten-point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityScale {
    FivePoint,
    #[default]
    TenPoint,
}

impl IntensityScale {
    pub fn max(self) -> i32 {
        match self {
            Self::FivePoint => 5,
            Self::TenPoint => 10,
        }
    }

    /// Converts a raw reading to the canonical scale. Five-point readings are
    /// doubled, so 4/5 lands on the crisis threshold of 8/10.
    pub fn to_canonical(self, raw: i32) -> Option<Intensity> {
        if !(1..=self.max()).contains(&raw) {
            return None;
        }
        match self {
            Self::FivePoint => Intensity::new(raw * 2),
            Self::TenPoint => Intensity::new(raw),
        }
    }
}

/// Life-situation tag attached to a check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextTag {
    Work,
    Family,
    Friends,
    Health,
    Sleep,
    #[serde(other)]
    Other,
}

impl ContextTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Family => "family",
            Self::Friends => "friends",
            Self::Health => "health",
            Self::Sleep => "sleep",
            Self::Other => "other",
        }
    }
}

impl FromStr for ContextTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "work" => Self::Work,
            "family" => Self::Family,
            "friends" => Self::Friends,
            "health" => Self::Health,
            "sleep" => Self::Sleep,
            _ => Self::Other,
        })
    }
}

/// Canonical emotion behind a mood label. Labels are matched case-insensitively;
/// anything unrecognised is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Calm,
    Sad,
    Anxious,
    Frustrated,
    Tired,
    Excited,
    Neutral,
    Confused,
    Overwhelmed,
    Angry,
    #[serde(other)]
    Unknown,
}

impl Emotion {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "happy" => Self::Happy,
            "calm" => Self::Calm,
            "sad" => Self::Sad,
            "anxious" => Self::Anxious,
            "frustrated" => Self::Frustrated,
            "tired" => Self::Tired,
            "excited" => Self::Excited,
            "neutral" => Self::Neutral,
            "confused" => Self::Confused,
            "overwhelmed" => Self::Overwhelmed,
            "angry" => Self::Angry,
            _ => Self::Unknown,
        }
    }

    /// Emotions that escalate to crisis at high intensity.
    pub fn is_distress(self) -> bool {
        matches!(
            self,
            Self::Sad | Self::Anxious | Self::Overwhelmed | Self::Frustrated | Self::Angry
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Calm => "calm",
            Self::Sad => "sad",
            Self::Anxious => "anxious",
            Self::Frustrated => "frustrated",
            Self::Tired => "tired",
            Self::Excited => "excited",
            Self::Neutral => "neutral",
            Self::Confused => "confused",
            Self::Overwhelmed => "overwhelmed",
            Self::Angry => "angry",
            Self::Unknown => "unknown",
        }
    }
}

/// Classifier result attached to a check-in at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodAnalysis {
    pub emotion: Emotion,
    pub intensity: Intensity,
    pub contexts: BTreeSet<ContextTag>,
    pub crisis_detected: bool,
    pub recommendations: Vec<String>,
}

/// Check-in fields supplied by the user, already converted to the canonical scale.
#[derive(Debug, Clone)]
pub struct NewMoodEntry {
    pub mood_emoji: String,
    pub mood_label: String,
    pub intensity: Intensity,
    pub contexts: BTreeSet<ContextTag>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: Uuid,
    pub user_id: String,
    pub mood_emoji: String,
    pub mood_label: String,
    pub intensity: Intensity,
    pub contexts: BTreeSet<ContextTag>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Local calendar day of `created_at`; the grouping key for streaks.
    pub date: NaiveDate,
    pub ai_analysis: MoodAnalysis,
    pub is_crisis_detected: bool,
}

impl MoodEntry {
    pub fn new(
        user_id: &str,
        new: NewMoodEntry,
        analysis: MoodAnalysis,
        created_at: DateTime<Utc>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            mood_emoji: new.mood_emoji,
            mood_label: new.mood_label,
            intensity: new.intensity,
            contexts: new.contexts,
            notes: new.notes.filter(|n| !n.trim().is_empty()),
            created_at,
            date: local_date(created_at, offset),
            is_crisis_detected: analysis.crisis_detected,
            ai_analysis: analysis,
        }
    }
}

pub fn local_date(at: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    at.with_timezone(&offset).date_naive()
}
