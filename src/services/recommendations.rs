use serde::Serialize;

use crate::models::mood::MoodAnalysis;

/// Next-step card shown after a check-in. Presentation data only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionCard {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
    pub duration: &'static str,
    pub priority: bool,
}

const CAREGIVER: SuggestionCard = SuggestionCard {
    key: "connect_caregiver",
    title: "Connect with Caregiver",
    description: "Your support person can help you through this",
    emoji: "👥",
    duration: "Now",
    priority: true,
};

const BASE_CARDS: [SuggestionCard; 3] = [
    SuggestionCard {
        key: "breathing_exercise",
        title: "Breathing Exercise",
        description: "A 5-minute guided breathing session to help you feel centered",
        emoji: "🌬️",
        duration: "5 min",
        priority: false,
    },
    SuggestionCard {
        key: "ai_companion",
        title: "Talk to AI Companion",
        description: "Share more about your feelings in a safe, judgment-free space",
        emoji: "🤖",
        duration: "Anytime",
        priority: false,
    },
    SuggestionCard {
        key: "calming_activity",
        title: "Calming Activity",
        description: "Explore activities designed to help you feel better",
        emoji: "✨",
        duration: "10-15 min",
        priority: false,
    },
];

pub fn select(analysis: &MoodAnalysis) -> Vec<SuggestionCard> {
    let mut cards = Vec::with_capacity(BASE_CARDS.len() + 1);
    if analysis.crisis_detected {
        cards.push(CAREGIVER);
    }
    cards.extend(BASE_CARDS);
    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::mood::Intensity;
    use crate::services::classifier::classify;
    use std::collections::BTreeSet;

    #[test]
    fn crisis_prepends_caregiver_card() {
        let analysis = classify("sad", Intensity::new(9).unwrap(), &BTreeSet::new());
        let cards = select(&analysis);
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].key, "connect_caregiver");
        assert!(cards[0].priority);
        assert!(cards[1..].iter().all(|c| !c.priority));
    }

    #[test]
    fn calm_reading_gets_base_cards_only() {
        let analysis = classify("calm", Intensity::new(3).unwrap(), &BTreeSet::new());
        let keys: Vec<_> = select(&analysis).iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["breathing_exercise", "ai_companion", "calming_activity"]);
    }
}
