use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::mood::MoodEntry;
use crate::services::aggregator::{Aggregator, TimeRange, TrendDirection};
use crate::services::gemini::GeminiClient;

pub const STATS_WINDOW_DAYS: i64 = 30;
pub const NARRATIVE_RECENT_ENTRIES: usize = 10;

const FALLBACK_NARRATIVE: &str = "I notice you've been tracking your mood regularly, which is a great step for self-awareness. Keep up the good work!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Positive,
    Pattern,
    Support,
    Milestone,
    Suggestion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightAction {
    pub label: &'static str,
    pub link: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightCard {
    pub kind: InsightKind,
    pub title: &'static str,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<InsightAction>,
    pub is_new: bool,
}

impl InsightCard {
    fn new(kind: InsightKind, title: &'static str, description: String) -> Self {
        Self {
            kind,
            title,
            description,
            action: None,
            is_new: false,
        }
    }

    fn with_action(mut self, label: &'static str, link: &'static str) -> Self {
        self.action = Some(InsightAction { label, link });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodStats {
    pub total_check_ins: usize,
    pub average_intensity: f64,
    pub mood_distribution: BTreeMap<String, usize>,
    pub recent_trend: TrendDirection,
}

pub fn mood_stats(aggregator: &Aggregator<'_>, days: i64) -> MoodStats {
    let window = aggregator.within_days(days);
    MoodStats {
        total_check_ins: window.total_check_ins(),
        average_intensity: window.average_mood(),
        mood_distribution: window.mood_distribution(),
        recent_trend: window.trend_direction(),
    }
}

/// Rule-based cards for the selected range. The streak always spans the whole history.
pub fn insight_cards(aggregator: &Aggregator<'_>, range: TimeRange) -> Vec<InsightCard> {
    let window = aggregator.within(range);
    let total = window.total_check_ins();
    let label = range.label();

    if total == 0 {
        return vec![InsightCard::new(
            InsightKind::Suggestion,
            "Start Your Journey",
            format!(
                "No mood data found for {}. Begin tracking your mood to unlock personalized insights and patterns.",
                label
            ),
        )
        .with_action("Check In Now", "/emotion-check-in-portal")];
    }

    let mut cards = Vec::new();
    let average = window.average_mood();

    if average >= 7.0 {
        let mut card = InsightCard::new(
            InsightKind::Positive,
            "Great Progress!",
            format!(
                "Your average mood {} is {:.1}/10. You're doing amazing at maintaining positive emotional wellness.",
                label, average
            ),
        );
        card.is_new = true;
        cards.push(card);
    } else if average >= 5.0 {
        cards.push(InsightCard::new(
            InsightKind::Pattern,
            "Steady Progress",
            format!(
                "Your average mood {} is {:.1}/10. You're maintaining good emotional balance.",
                label, average
            ),
        ));
    } else {
        cards.push(
            InsightCard::new(
                InsightKind::Support,
                "We're Here for You",
                format!(
                    "Your average mood {} is {:.1}/10. Difficult periods are temporary, and tracking helps you understand patterns.",
                    label, average
                ),
            )
            .with_action("Get Support", "/safety-crisis-support"),
        );
    }

    let streak = aggregator.day_streak();
    if streak >= 7 {
        cards.push(InsightCard::new(
            InsightKind::Milestone,
            "Amazing Consistency!",
            format!(
                "You've maintained a {}-day check-in streak. This level of self-awareness is truly impressive.",
                streak
            ),
        ));
    } else if streak >= 3 {
        cards.push(InsightCard::new(
            InsightKind::Pattern,
            "Building Habits",
            format!(
                "You've maintained a {}-day check-in streak. Consistency is key to emotional awareness.",
                streak
            ),
        ));
    }

    if total >= 10 {
        cards.push(InsightCard::new(
            InsightKind::Milestone,
            "Data Rich Period",
            format!(
                "You've completed {} check-ins {}. This rich data helps identify patterns and triggers.",
                total, label
            ),
        ));
    }

    cards.push(match range {
        TimeRange::Week => InsightCard::new(
            InsightKind::Suggestion,
            "Weekly Reflection",
            "Try looking at your monthly view to see longer-term patterns and trends.".into(),
        )
        .with_action("View Monthly", "/mood-journey-visualizer?range=30days"),
        TimeRange::Year => InsightCard::new(
            InsightKind::Suggestion,
            "Year in Review",
            "What an incredible journey! Consider sharing this progress with your support network.".into(),
        ),
        TimeRange::Month | TimeRange::Quarter => InsightCard::new(
            InsightKind::Suggestion,
            "Keep Growing",
            "Try calming activities to enhance your emotional wellness journey.".into(),
        )
        .with_action("Explore Activities", "/calming-activities-hub"),
    });

    cards
}

pub fn narrative_prompt(stats: &MoodStats, recent: &[MoodEntry]) -> String {
    let distribution = serde_json::to_string(&stats.mood_distribution).unwrap_or_default();
    let entries: Vec<String> = recent
        .iter()
        .take(NARRATIVE_RECENT_ENTRIES)
        .map(|e| {
            let contexts: Vec<&str> = e.contexts.iter().map(|c| c.as_str()).collect();
            format!(
                "{}: {} ({}/10) - Contexts: {}",
                e.date.format("%Y-%m-%d"),
                e.mood_label,
                e.intensity,
                if contexts.is_empty() {
                    "none".to_string()
                } else {
                    contexts.join(", ")
                }
            )
        })
        .collect();

    format!(
        r#"Analyze this user's mood data and provide insights:

Mood Statistics (last {} days):
- Total check-ins: {}
- Average intensity: {:.1}/10
- Recent trend: {}
- Mood distribution: {}

Recent mood entries:
{}

Provide:
1. Key patterns you notice
2. Positive trends to celebrate
3. Areas that might need attention
4. Personalized recommendations
5. Encouragement and validation

Keep the tone supportive and focus on actionable insights."#,
        STATS_WINDOW_DAYS,
        stats.total_check_ins,
        stats.average_intensity,
        stats.recent_trend.as_str(),
        distribution,
        entries.join("\n"),
    )
}

/// Narrative text and its source: `"gemini"` or `"fallback"`.
pub async fn narrative(gemini: &GeminiClient, stats: &MoodStats, recent: &[MoodEntry]) -> (String, &'static str) {
    if !gemini.is_configured() {
        return (FALLBACK_NARRATIVE.into(), "fallback");
    }

    let prompt = narrative_prompt(stats, recent);
    match gemini
        .generate("You are a supportive assistant analyzing mood patterns for mental health insights.", &prompt)
        .await
    {
        Ok(text) => (text, "gemini"),
        Err(e) => {
            tracing::warn!(error = %e, "Gemini API unavailable, using fallback insights");
            (FALLBACK_NARRATIVE.into(), "fallback")
        }
    }
}
