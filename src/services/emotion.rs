use std::collections::BTreeMap;

use serde::Serialize;

/// Keyword lists per detectable emotion. Order matters: on a tied count the
/// emotion listed later wins.
const EMOTION_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "happy",
        &["happy", "joy", "excited", "great", "wonderful", "amazing", "fantastic", "good"],
    ),
    (
        "sad",
        &["sad", "depressed", "down", "blue", "miserable", "unhappy", "crying"],
    ),
    (
        "anxious",
        &["anxious", "worried", "nervous", "scared", "afraid", "panic", "stress"],
    ),
    (
        "angry",
        &["angry", "mad", "furious", "irritated", "frustrated", "annoyed"],
    ),
    (
        "confused",
        &["confused", "lost", "don't know", "uncertain", "mixed up"],
    ),
    ("calm", &["calm", "peaceful", "relaxed", "serene", "tranquil"]),
];

const CONFIDENCE_PER_HIT: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmotionReading {
    pub emotion: &'static str,
    pub confidence: u8,
    pub scores: BTreeMap<&'static str, usize>,
}

/// Picks the dominant emotion in a chat message by keyword hits.
pub fn analyze_message(message: &str) -> EmotionReading {
    let lower = message.to_lowercase();

    let mut scores = BTreeMap::new();
    let mut dominant = EMOTION_KEYWORDS[0].0;
    let mut best = 0usize;

    for (emotion, keywords) in EMOTION_KEYWORDS {
        let hits = keywords.iter().filter(|k| lower.contains(*k)).count();
        scores.insert(*emotion, hits);
        if hits >= best {
            best = hits;
            dominant = *emotion;
        }
    }

    let confidence = (best * CONFIDENCE_PER_HIT).min(100) as u8;

    EmotionReading {
        emotion: if confidence > 0 { dominant } else { "neutral" },
        confidence,
        scores,
    }
}
