//! Crisis risk assessment.
//!
//! Two strategies share one entry point: the structured check-in rule from
//! [`classifier`](crate::services::classifier) and a keyword scanner for free
//! text. Their thresholds are independent and must stay that way.

use serde::Serialize;

use crate::models::mood::{Emotion, Intensity};
use crate::services::classifier;

const CRISIS_KEYWORDS: &[&str] = &[
    // suicidal ideation
    "kill myself",
    "end my life",
    "want to die",
    "suicide",
    "suicidal",
    "not worth living",
    "better off dead",
    "end it all",
    "take my own life",
    // self-harm
    "hurt myself",
    "cut myself",
    "harm myself",
    "self harm",
    "self-harm",
    // hopelessness
    "no point",
    "give up",
    "hopeless",
    "can't go on",
    "nothing matters",
    "no way out",
    "trapped",
    "can't take it anymore",
    // immediacy
    "right now",
    "tonight",
    "today",
    "going to",
    "planning to",
];

const URGENT_PHRASES: &[&str] = &[
    "i want to kill myself",
    "i am going to kill myself",
    "i want to die",
    "i am going to hurt myself",
    "i have a plan",
    "i can't take it anymore",
];

pub const URGENT_CONFIDENCE: u8 = 95;
const MAX_KEYWORD_CONFIDENCE: u8 = 90;
const CONFIDENCE_PER_KEYWORD: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrisisScan {
    pub detected: bool,
    pub confidence: u8,
    pub keywords: Vec<&'static str>,
    pub urgent: bool,
}

/// Scans an unstructured message for crisis language.
pub fn scan_message(message: &str) -> CrisisScan {
    let lower = message.to_lowercase();

    let urgent = URGENT_PHRASES.iter().any(|p| lower.contains(p));
    let keywords: Vec<&'static str> = CRISIS_KEYWORDS
        .iter()
        .copied()
        .filter(|k| lower.contains(k))
        .collect();

    let detected = urgent
        || keywords.len() >= 2
        || (!keywords.is_empty() && lower.contains("want"));

    let confidence = match (detected, urgent) {
        (false, _) => 0,
        (true, true) => URGENT_CONFIDENCE,
        (true, false) => (keywords.len() * CONFIDENCE_PER_KEYWORD)
            .min(MAX_KEYWORD_CONFIDENCE as usize) as u8,
    };

    CrisisScan {
        detected,
        confidence,
        keywords,
        urgent,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskStrategy {
    StructuredThreshold,
    KeywordScan,
}

pub enum RiskInput<'a> {
    CheckIn { label: &'a str, intensity: Intensity },
    Message(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub strategy: RiskStrategy,
    pub crisis_detected: bool,
    /// Only the keyword scanner scores its verdict.
    pub confidence: Option<u8>,
    pub matched_keywords: Vec<&'static str>,
    pub urgent: bool,
}

pub fn assess(input: RiskInput<'_>) -> RiskAssessment {
    match input {
        RiskInput::CheckIn { label, intensity } => RiskAssessment {
            strategy: RiskStrategy::StructuredThreshold,
            crisis_detected: classifier::is_crisis(Emotion::from_label(label), intensity),
            confidence: None,
            matched_keywords: Vec::new(),
            urgent: false,
        },
        RiskInput::Message(text) => {
            let scan = scan_message(text);
            RiskAssessment {
                strategy: RiskStrategy::KeywordScan,
                crisis_detected: scan.detected,
                confidence: Some(scan.confidence),
                matched_keywords: scan.keywords,
                urgent: scan.urgent,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgent_phrase_scores_95() {
        let scan = scan_message("I want to kill myself");
        assert!(scan.detected);
        assert!(scan.urgent);
        assert_eq!(scan.confidence, 95);
    }

    #[test]
    fn ordinary_message_is_clear() {
        let scan = scan_message("I had a fine day");
        assert!(!scan.detected);
        assert_eq!(scan.confidence, 0);
        assert!(scan.keywords.is_empty());
    }

    #[test]
    fn two_keywords_flag_without_want() {
        let scan = scan_message("Everything feels hopeless, I might give up");
        assert!(scan.detected);
        assert!(!scan.urgent);
        assert_eq!(scan.keywords, vec!["give up", "hopeless"]);
        assert_eq!(scan.confidence, 60);
    }

    #[test]
    fn single_keyword_needs_want() {
        let quiet = scan_message("It all feels hopeless");
        assert!(!quiet.detected);
        assert_eq!(quiet.confidence, 0);
        assert_eq!(quiet.keywords, vec!["hopeless"]);

        let flagged = scan_message("It's hopeless and I want it to stop");
        assert!(flagged.detected);
        assert_eq!(flagged.confidence, 30);
    }

    #[test]
    fn keyword_confidence_caps_at_90() {
        let scan = scan_message("suicidal, hopeless, trapped, no way out tonight");
        assert!(scan.detected);
        assert_eq!(scan.confidence, 90);
    }

    #[test]
    fn strategies_are_dispatched_separately() {
        let structured = assess(RiskInput::CheckIn {
            label: "overwhelmed",
            intensity: Intensity::new(8).unwrap(),
        });
        assert_eq!(structured.strategy, RiskStrategy::StructuredThreshold);
        assert!(structured.crisis_detected);
        assert_eq!(structured.confidence, None);

        // the scanner does not know about mood labels
        let text = assess(RiskInput::Message("overwhelmed"));
        assert_eq!(text.strategy, RiskStrategy::KeywordScan);
        assert!(!text.crisis_detected);
        assert_eq!(text.confidence, Some(0));
    }
}
