//! Companion chat replies.
//!
//! The generative API answers when it is configured and reachable; otherwise
//! a deterministic reply is chosen from the message itself.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::models::mood::MoodEntry;
use crate::services::emotion::{analyze_message, EmotionReading};
use crate::services::gemini::GeminiClient;
use crate::services::risk::{scan_message, CrisisScan};

pub const MOOD_CONTEXT_ENTRIES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Gemini,
    FallbackCrisis,
    FallbackSad,
    FallbackAnxious,
    FallbackAngry,
    FallbackHappy,
    FallbackDefault,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanionReply {
    pub text: String,
    pub source: ReplySource,
    pub emotion: EmotionReading,
    pub crisis: CrisisScan,
}

const CRISIS_REPLY: &str = "I'm very concerned about what you've shared. Your feelings are valid, and you don't have to face this alone. Please reach out for immediate support:\n\n\
Crisis Text Line: text HOME to 741741\n\
Suicide & Crisis Lifeline: call or text 988\n\
If you're in immediate danger, call 911\n\n\
You matter, and there are people who want to help you through this. Is there someone you trust nearby?";

const SAD_REPLY: &str = "I hear that you're feeling sad right now, and it's okay to feel this way. Acknowledging it takes courage. When we're feeling down, something small and gentle can help. What's one thing that usually brings you a little comfort?";

const ANXIOUS_REPLY: &str = "It sounds like you're carrying some anxiety, and that can feel overwhelming. Let's slow things down together: breathe in for 4, hold for 4, and out for 4. You're safe in this moment. What's one thing you can see around you right now?";

const ANGRY_REPLY: &str = "I can sense your frustration, and those feelings are valid. Anger often tells us something important. When you're ready, we can look at what's underneath it. What do you think set these feelings off?";

const HAPPY_REPLY: &str = "It's wonderful to hear you're feeling good! Those moments are worth celebrating and remembering. What's contributing to these good feelings today?";

const DEFAULT_REPLIES: [&str; 5] = [
    "Thank you for sharing with me. I'm here to listen and support you. How are you feeling in this moment?",
    "I appreciate you taking the time to check in. Your emotional well-being matters. What's on your mind today?",
    "It takes courage to reach out and share your thoughts. I'm here with you. Can you tell me more about what you're experiencing?",
    "I'm glad you're here. Talking about our feelings can help us understand them better. What would you like to explore together?",
    "Your feelings are valid, whatever they may be. I'm here to listen without judgment. What's been on your heart lately?",
];

/// Summarises the most recent check-ins for the system prompt.
pub fn build_mood_context(recent: &[MoodEntry]) -> String {
    if recent.is_empty() {
        return "No recent mood data available.".into();
    }

    let lines: Vec<String> = recent
        .iter()
        .take(MOOD_CONTEXT_ENTRIES)
        .map(|e| {
            format!(
                "{}: {} (intensity: {}/10)",
                e.date.format("%Y-%m-%d"),
                e.mood_label,
                e.intensity
            )
        })
        .collect();

    format!("Recent mood patterns:\n{}", lines.join("\n"))
}

pub fn build_system_prompt(mood_context: &str) -> String {
    format!(
        r#"You are a compassionate mental health companion for people with cognitive disabilities and their caregivers.

Principles:
- Be empathetic, non-judgmental and supportive
- Use simple, clear language and ask one question at a time
- Never diagnose or replace professional therapy
- Offer practical coping strategies and validate feelings
- If you see signs of self-harm, suicidal thinking or severe distress, give crisis resources (988, 911) and encourage contacting someone they trust

User context:
{}

Keep replies short, warm and concrete."#,
        mood_context
    )
}

/// Deterministic reply for when the generative API is unavailable.
pub fn fallback_reply<R: Rng + ?Sized>(
    message: &str,
    crisis: &CrisisScan,
    rng: &mut R,
) -> (String, ReplySource) {
    if crisis.detected {
        return (CRISIS_REPLY.into(), ReplySource::FallbackCrisis);
    }

    let lower = message.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if mentions(&["sad", "depressed", "down"]) {
        (SAD_REPLY.into(), ReplySource::FallbackSad)
    } else if mentions(&["anxious", "worried", "nervous"]) {
        (ANXIOUS_REPLY.into(), ReplySource::FallbackAnxious)
    } else if mentions(&["angry", "frustrated", "mad"]) {
        (ANGRY_REPLY.into(), ReplySource::FallbackAngry)
    } else if mentions(&["happy", "good", "great"]) {
        (HAPPY_REPLY.into(), ReplySource::FallbackHappy)
    } else {
        let text = DEFAULT_REPLIES
            .choose(rng)
            .copied()
            .unwrap_or(DEFAULT_REPLIES[0]);
        (text.into(), ReplySource::FallbackDefault)
    }
}

pub async fn reply(gemini: &GeminiClient, message: &str, recent: &[MoodEntry]) -> CompanionReply {
    let crisis = scan_message(message);
    let emotion = analyze_message(message);

    if crisis.detected {
        tracing::warn!(
            confidence = crisis.confidence,
            urgent = crisis.urgent,
            keywords = ?crisis.keywords,
            "Crisis language detected in chat message"
        );
    }

    let system_prompt = build_system_prompt(&build_mood_context(recent));

    let generated = if gemini.is_configured() {
        match gemini.generate(&system_prompt, message).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(error = %e, "Gemini API unavailable, using fallback reply");
                None
            }
        }
    } else {
        None
    };

    let (text, source) = match generated {
        Some(text) => (text, ReplySource::Gemini),
        None => fallback_reply(message, &crisis, &mut rand::thread_rng()),
    };

    CompanionReply {
        text,
        source,
        emotion,
        crisis,
    }
}
