//! Derived metrics over one user's mood entries.
//!
//! Every function is a pure read over a newest-first snapshot and defines a
//! zero result for an empty collection.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::mood::{local_date, MoodEntry};

/// Which mood-tracking surface is asking whether a check-in is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInSurface {
    /// Check-in portal: due once the latest entry is 12h or older.
    Portal,
    /// Chat companion: due once the latest entry is more than 24h old.
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "7days")]
    Week,
    #[default]
    #[serde(rename = "30days")]
    Month,
    #[serde(rename = "90days")]
    Quarter,
    #[serde(rename = "365days")]
    Year,
}

impl TimeRange {
    pub fn days(self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
            Self::Year => 365,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Week => "this week",
            Self::Month => "this month",
            Self::Quarter => "this quarter",
            Self::Year => "this year",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

impl TrendDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Stable => "stable",
            Self::Declining => "declining",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub intensity: u8,
    pub mood: String,
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    /// Daily average intensity times ten, rounded.
    pub mood_score: u32,
    pub mood: String,
    pub emoji: String,
    pub check_ins: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyBucket {
    /// Sunday that opens the week.
    pub week_start: NaiveDate,
    pub count: usize,
    pub sum: u32,
    pub average: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BadgeProgress {
    pub current: f64,
    pub target: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub earned: bool,
    pub progress: Option<BadgeProgress>,
}

enum BadgeRule {
    TotalAtLeast(usize),
    StreakAtLeast(u32),
    AverageAtLeast(f64),
}

struct BadgeDef {
    key: &'static str,
    name: &'static str,
    description: &'static str,
    rule: BadgeRule,
}

const BADGES: [BadgeDef; 8] = [
    BadgeDef {
        key: "first_step",
        name: "First Step",
        description: "Completed your first mood check-in",
        rule: BadgeRule::TotalAtLeast(1),
    },
    BadgeDef {
        key: "week_warrior",
        name: "Week Warrior",
        description: "Completed 7 mood check-ins",
        rule: BadgeRule::TotalAtLeast(7),
    },
    BadgeDef {
        key: "monthly_master",
        name: "Monthly Master",
        description: "Completed 30 mood check-ins",
        rule: BadgeRule::TotalAtLeast(30),
    },
    BadgeDef {
        key: "consistency_champion",
        name: "Consistency Champion",
        description: "Maintained a 3-day streak",
        rule: BadgeRule::StreakAtLeast(3),
    },
    BadgeDef {
        key: "week_streak",
        name: "Week Streak",
        description: "Maintained a 7-day streak",
        rule: BadgeRule::StreakAtLeast(7),
    },
    BadgeDef {
        key: "month_streak",
        name: "Month Streak",
        description: "Maintained a 30-day streak",
        rule: BadgeRule::StreakAtLeast(30),
    },
    BadgeDef {
        key: "positive_vibes",
        name: "Positive Vibes",
        description: "Maintained average mood of 7 or above",
        rule: BadgeRule::AverageAtLeast(7.0),
    },
    BadgeDef {
        key: "century_club",
        name: "Century Club",
        description: "Completed 100 mood check-ins",
        rule: BadgeRule::TotalAtLeast(100),
    },
];

const TREND_SAMPLE: usize = 7;
const TREND_MARGIN: f64 = 0.5;

pub const PATTERN_WINDOW_DAYS: i64 = 7;
const PATTERN_MIN_ENTRIES: usize = 3;
const HIGH_INTENSITY: u8 = 8;
const HIGH_INTENSITY_MIN_COUNT: usize = 3;
const DECLINE_MIN_ENTRIES: usize = 5;
const DECLINE_SAMPLE: usize = 3;
const DECLINE_MARGIN: f64 = 2.0;
const MISSED_CHECK_IN_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    HighIntensity,
    DecliningTrend,
    MissedCheckins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternPriority {
    High,
    Medium,
}

/// Concerning pattern in the last week of check-ins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodPattern {
    pub kind: PatternKind,
    pub priority: PatternPriority,
    pub title: &'static str,
    pub description: String,
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean(values: impl Iterator<Item = u8>) -> f64 {
    let (sum, count) = values.fold((0u32, 0u32), |(s, c), v| (s + v as u32, c + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// Read-only view over a newest-first slice of entries at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    entries: &'a [MoodEntry],
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl<'a> Aggregator<'a> {
    pub fn new(entries: &'a [MoodEntry], now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self {
            entries,
            now,
            offset,
        }
    }

    pub fn today(&self) -> NaiveDate {
        local_date(self.now, self.offset)
    }

    /// Narrows the view to entries created in the last `days` days.
    pub fn within_days(&self, days: i64) -> Aggregator<'a> {
        let cutoff = self.now - Duration::days(days);
        let end = self.entries.partition_point(|e| e.created_at >= cutoff);
        Aggregator {
            entries: &self.entries[..end],
            ..*self
        }
    }

    pub fn within(&self, range: TimeRange) -> Aggregator<'a> {
        self.within_days(range.days())
    }

    pub fn total_check_ins(&self) -> usize {
        self.entries.len()
    }

    /// Mean intensity rounded to one decimal, 0.0 when empty.
    pub fn average_mood(&self) -> f64 {
        round1(mean(self.entries.iter().map(|e| e.intensity.get())))
    }

    /// Consecutive local days ending today that have at least one entry.
    /// A day without an entry, today included, ends the streak.
    pub fn day_streak(&self) -> u32 {
        let days: HashSet<NaiveDate> = self.entries.iter().map(|e| e.date).collect();

        let mut streak = 0u32;
        let mut check_date = self.today();
        while days.contains(&check_date) {
            streak += 1;
            check_date -= Duration::days(1);
        }
        streak
    }

    pub fn badges(&self) -> Vec<Badge> {
        let total = self.total_check_ins();
        let streak = self.day_streak();
        let average = self.average_mood();

        BADGES
            .iter()
            .map(|def| {
                let (current, target) = match def.rule {
                    BadgeRule::TotalAtLeast(n) => (total as f64, n as f64),
                    BadgeRule::StreakAtLeast(n) => (streak as f64, n as f64),
                    BadgeRule::AverageAtLeast(n) => (average, n),
                };
                let earned = current >= target;
                Badge {
                    key: def.key,
                    name: def.name,
                    description: def.description,
                    earned,
                    progress: (!earned).then_some(BadgeProgress { current, target }),
                }
            })
            .collect()
    }

    pub fn badges_earned(&self) -> usize {
        self.badges().iter().filter(|b| b.earned).count()
    }

    /// Chart projection of the last `window_days` days, oldest first.
    pub fn mood_trends(&self, window_days: i64) -> Vec<TrendPoint> {
        self.within_days(window_days)
            .entries
            .iter()
            .rev()
            .map(|e| TrendPoint {
                date: e.date,
                intensity: e.intensity.get(),
                mood: e.mood_label.clone(),
                emoji: e.mood_emoji.clone(),
            })
            .collect()
    }

    pub fn mood_distribution(&self) -> BTreeMap<String, usize> {
        let mut distribution = BTreeMap::new();
        for entry in self.entries {
            *distribution.entry(entry.mood_label.clone()).or_insert(0) += 1;
        }
        distribution
    }

    /// Entries grouped by the Sunday opening their local week, ascending.
    pub fn weekly_buckets(&self) -> Vec<WeeklyBucket> {
        let mut weeks: BTreeMap<NaiveDate, (usize, u32)> = BTreeMap::new();
        for entry in self.entries {
            let week_start =
                entry.date - Duration::days(entry.date.weekday().num_days_from_sunday() as i64);
            let bucket = weeks.entry(week_start).or_insert((0, 0));
            bucket.0 += 1;
            bucket.1 += entry.intensity.get() as u32;
        }

        weeks
            .into_iter()
            .map(|(week_start, (count, sum))| WeeklyBucket {
                week_start,
                count,
                sum,
                average: round1(sum as f64 / count as f64),
            })
            .collect()
    }

    /// One point per local day, oldest first. Mood and emoji come from the
    /// newest entry of the day.
    pub fn daily_series(&self) -> Vec<DailyPoint> {
        let mut days: BTreeMap<NaiveDate, DailyPoint> = BTreeMap::new();
        let mut sums: BTreeMap<NaiveDate, u32> = BTreeMap::new();

        for entry in self.entries {
            *sums.entry(entry.date).or_insert(0) += entry.intensity.get() as u32;
            days.entry(entry.date)
                .or_insert_with(|| DailyPoint {
                    date: entry.date,
                    mood_score: 0,
                    mood: entry.mood_label.clone(),
                    emoji: entry.mood_emoji.clone(),
                    check_ins: 0,
                })
                .check_ins += 1;
        }

        days.into_values()
            .map(|mut point| {
                let sum = sums.get(&point.date).copied().unwrap_or(0);
                let average = sum as f64 / point.check_ins as f64;
                point.mood_score = (average * 10.0).round() as u32;
                point
            })
            .collect()
    }

    /// Compares the newest seven entries against the oldest seven.
    pub fn trend_direction(&self) -> TrendDirection {
        if self.entries.len() < TREND_SAMPLE {
            return TrendDirection::Stable;
        }
        let recent = mean(self.entries.iter().take(TREND_SAMPLE).map(|e| e.intensity.get()));
        let previous = mean(
            self.entries[self.entries.len() - TREND_SAMPLE..]
                .iter()
                .map(|e| e.intensity.get()),
        );

        if recent > previous + TREND_MARGIN {
            TrendDirection::Improving
        } else if recent < previous - TREND_MARGIN {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        }
    }

    pub fn latest(&self) -> Option<&'a MoodEntry> {
        self.entries.first()
    }

    pub fn recent(&self, limit: usize) -> &'a [MoodEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    /// Patterns over the last week. Nothing is reported below three entries.
    pub fn mood_patterns(&self) -> Vec<MoodPattern> {
        let week = self.within_days(PATTERN_WINDOW_DAYS).entries;
        if week.len() < PATTERN_MIN_ENTRIES {
            return Vec::new();
        }

        let mut patterns = Vec::new();

        let high = week
            .iter()
            .filter(|e| e.intensity.get() >= HIGH_INTENSITY)
            .count();
        if high >= HIGH_INTENSITY_MIN_COUNT {
            patterns.push(MoodPattern {
                kind: PatternKind::HighIntensity,
                priority: PatternPriority::High,
                title: "High Stress Pattern Detected",
                description: format!("{} high-intensity mood entries in the past week", high),
            });
        }

        if week.len() >= DECLINE_MIN_ENTRIES {
            let recent = mean(week.iter().take(DECLINE_SAMPLE).map(|e| e.intensity.get()));
            let older = mean(
                week[week.len() - DECLINE_SAMPLE..]
                    .iter()
                    .map(|e| e.intensity.get()),
            );
            if recent < older - DECLINE_MARGIN {
                patterns.push(MoodPattern {
                    kind: PatternKind::DecliningTrend,
                    priority: PatternPriority::Medium,
                    title: "Declining Mood Trend",
                    description: format!(
                        "Mood intensity has decreased from {:.1} to {:.1}",
                        older, recent
                    ),
                });
            }
        }

        let days_since = (self.now - week[0].created_at).num_days();
        if days_since >= MISSED_CHECK_IN_DAYS {
            patterns.push(MoodPattern {
                kind: PatternKind::MissedCheckins,
                priority: PatternPriority::Medium,
                title: "Missed Check-ins",
                description: format!("No mood check-ins for {} days", days_since),
            });
        }

        patterns
    }

    pub fn needs_check_in(&self, surface: CheckInSurface) -> bool {
        let Some(latest) = self.latest() else {
            return true;
        };
        let elapsed = self.now - latest.created_at;
        match surface {
            CheckInSurface::Portal => elapsed >= Duration::hours(12),
            CheckInSurface::Chat => elapsed > Duration::hours(24),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::mood::{Intensity, NewMoodEntry};
    use crate::services::classifier::classify;
    use chrono::TimeZone;
    use std::collections::BTreeSet;

    pub(crate) fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    pub(crate) fn now() -> DateTime<Utc> {
        // a Friday
        Utc.with_ymd_and_hms(2026, 10, 16, 18, 0, 0).unwrap()
    }

    pub(crate) fn entry_at(at: DateTime<Utc>, label: &str, intensity: i32) -> MoodEntry {
        let intensity = Intensity::new(intensity).unwrap();
        let contexts = BTreeSet::new();
        let analysis = classify(label, intensity, &contexts);
        MoodEntry::new(
            "user-1",
            NewMoodEntry {
                mood_emoji: "🙂".into(),
                mood_label: label.into(),
                intensity,
                contexts,
                notes: None,
            },
            analysis,
            at,
            utc(),
        )
    }

    /// Builds a newest-first collection from (days ago, label, intensity).
    pub(crate) fn entries(rows: &[(i64, &str, i32)]) -> Vec<MoodEntry> {
        let mut out: Vec<MoodEntry> = rows
            .iter()
            .map(|(ago, label, v)| entry_at(now() - Duration::days(*ago), label, *v))
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    #[test]
    fn empty_collection_has_zero_results() {
        let agg = Aggregator::new(&[], now(), utc());
        assert_eq!(agg.total_check_ins(), 0);
        assert_eq!(agg.average_mood(), 0.0);
        assert_eq!(agg.day_streak(), 0);
        assert!(agg.mood_distribution().is_empty());
        assert_eq!(agg.badges_earned(), 0);
        assert!(agg.mood_trends(7).is_empty());
        assert!(agg.weekly_buckets().is_empty());
        assert!(agg.daily_series().is_empty());
        assert_eq!(agg.trend_direction(), TrendDirection::Stable);
        assert!(agg.latest().is_none());
        assert!(agg.needs_check_in(CheckInSurface::Portal));
        assert!(agg.needs_check_in(CheckInSurface::Chat));
    }

    #[test]
    fn average_is_rounded_and_order_invariant() {
        let mut list = entries(&[(0, "happy", 7), (1, "sad", 4), (2, "calm", 6)]);
        let forward = Aggregator::new(&list, now(), utc()).average_mood();
        list.reverse();
        let backward = Aggregator::new(&list, now(), utc()).average_mood();
        assert_eq!(forward, 5.7);
        assert_eq!(forward, backward);
    }

    #[test]
    fn streak_counts_consecutive_days_ending_today() {
        let list = entries(&[(0, "happy", 5), (0, "calm", 5), (1, "sad", 3), (2, "calm", 4), (4, "happy", 6)]);
        assert_eq!(Aggregator::new(&list, now(), utc()).day_streak(), 3);
    }

    #[test]
    fn streak_is_zero_before_todays_check_in() {
        let list = entries(&[(1, "happy", 5), (2, "calm", 5)]);
        assert_eq!(Aggregator::new(&list, now(), utc()).day_streak(), 0);
    }

    #[test]
    fn streak_restarts_at_one_after_gap() {
        let list = entries(&[(0, "happy", 5), (2, "calm", 5), (3, "calm", 5)]);
        assert_eq!(Aggregator::new(&list, now(), utc()).day_streak(), 1);
    }

    #[test]
    fn three_anxious_days_scenario() {
        let list = entries(&[(0, "anxious", 8), (1, "anxious", 8), (2, "anxious", 8)]);
        let agg = Aggregator::new(&list, now(), utc());
        assert_eq!(agg.day_streak(), 3);
        let badges = agg.badges();
        let streak_badge = badges.iter().find(|b| b.key == "consistency_champion").unwrap();
        assert!(streak_badge.earned);
        assert!(list.iter().all(|e| e.ai_analysis.crisis_detected && e.is_crisis_detected));
        // first step + streak 3 + average 8
        assert_eq!(agg.badges_earned(), 3);
    }

    #[test]
    fn badges_report_progress_until_earned() {
        let list = entries(&[(0, "happy", 5), (1, "happy", 5)]);
        let badges = Aggregator::new(&list, now(), utc()).badges();
        assert_eq!(badges.len(), 8);
        let warrior = badges.iter().find(|b| b.key == "week_warrior").unwrap();
        assert!(!warrior.earned);
        assert_eq!(warrior.progress, Some(BadgeProgress { current: 2.0, target: 7.0 }));
        let first = badges.iter().find(|b| b.key == "first_step").unwrap();
        assert!(first.earned && first.progress.is_none());
    }

    #[test]
    fn distribution_sums_to_total() {
        let list = entries(&[(0, "Happy", 5), (1, "Sad", 3), (2, "Happy", 6), (3, "Calm", 4)]);
        let agg = Aggregator::new(&list, now(), utc());
        let distribution = agg.mood_distribution();
        assert_eq!(distribution["Happy"], 2);
        assert_eq!(distribution.values().sum::<usize>(), agg.total_check_ins());
    }

    #[test]
    fn trends_are_windowed_and_oldest_first() {
        let list = entries(&[(0, "happy", 7), (3, "sad", 2), (10, "calm", 5)]);
        let trends = Aggregator::new(&list, now(), utc()).mood_trends(7);
        let moods: Vec<_> = trends.iter().map(|t| t.mood.as_str()).collect();
        assert_eq!(moods, vec!["sad", "happy"]);
        assert!(trends[0].date < trends[1].date);
    }

    #[test]
    fn weekly_buckets_start_on_sunday() {
        // now is Friday 2026-10-16; the week opens Sunday 2026-10-11
        let list = entries(&[(0, "happy", 8), (4, "calm", 4), (6, "sad", 3)]);
        let buckets = Aggregator::new(&list, now(), utc()).weekly_buckets();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].week_start, NaiveDate::from_ymd_opt(2026, 10, 4).unwrap());
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[1].week_start, NaiveDate::from_ymd_opt(2026, 10, 11).unwrap());
        assert_eq!(buckets[1].count, 2);
        assert_eq!(buckets[1].sum, 12);
        assert_eq!(buckets[1].average, 6.0);
    }

    #[test]
    fn daily_series_averages_each_day() {
        let mut list = vec![
            entry_at(now() - Duration::hours(1), "happy", 8),
            entry_at(now() - Duration::hours(3), "sad", 5),
        ];
        list.extend(entries(&[(2, "calm", 4)]));
        let series = Aggregator::new(&list, now(), utc()).within(TimeRange::Week).daily_series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].mood_score, 40);
        let today = &series[1];
        assert_eq!(today.check_ins, 2);
        assert_eq!(today.mood_score, 65);
        assert_eq!(today.mood, "happy");
    }

    #[test]
    fn trend_compares_first_and_last_seven() {
        let mut rows: Vec<(i64, &str, i32)> = (0..7).map(|d| (d, "happy", 8)).collect();
        rows.extend((7..14).map(|d| (d, "sad", 4)));
        let improving = entries(&rows);
        assert_eq!(
            Aggregator::new(&improving, now(), utc()).trend_direction(),
            TrendDirection::Improving
        );

        let flat = entries(&(0..10).map(|d| (d, "calm", 5)).collect::<Vec<_>>());
        assert_eq!(
            Aggregator::new(&flat, now(), utc()).trend_direction(),
            TrendDirection::Stable
        );

        let few = entries(&[(0, "sad", 1), (1, "happy", 10)]);
        assert_eq!(Aggregator::new(&few, now(), utc()).trend_direction(), TrendDirection::Stable);
    }

    #[test]
    fn check_in_thresholds_differ_by_surface() {
        let list = vec![entry_at(now() - Duration::hours(12), "calm", 5)];
        let agg = Aggregator::new(&list, now(), utc());
        assert!(agg.needs_check_in(CheckInSurface::Portal));
        assert!(!agg.needs_check_in(CheckInSurface::Chat));

        let list = vec![entry_at(now() - Duration::hours(24), "calm", 5)];
        assert!(!Aggregator::new(&list, now(), utc()).needs_check_in(CheckInSurface::Chat));

        let list = vec![entry_at(now() - Duration::hours(25), "calm", 5)];
        assert!(Aggregator::new(&list, now(), utc()).needs_check_in(CheckInSurface::Chat));
    }

    #[test]
    fn streak_uses_local_day() {
        // 01:00 UTC on the 16th is still the 15th at UTC-5
        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 1, 0, 0).unwrap();
        let intensity = Intensity::new(5).unwrap();
        let entry = MoodEntry::new(
            "user-1",
            NewMoodEntry {
                mood_emoji: "🙂".into(),
                mood_label: "calm".into(),
                intensity,
                contexts: BTreeSet::new(),
                notes: None,
            },
            classify("calm", intensity, &BTreeSet::new()),
            at,
            minus_five,
        );
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());

        // local now is 2026-10-15 21:00
        let local_now = Utc.with_ymd_and_hms(2026, 10, 16, 2, 0, 0).unwrap();
        let list = [entry];
        assert_eq!(Aggregator::new(&list, local_now, minus_five).day_streak(), 1);
    }
    fn kinds(patterns: &[MoodPattern]) -> Vec<PatternKind> {
        patterns.iter().map(|p| p.kind).collect()
    }

    #[test]
    fn patterns_need_three_entries_in_the_week() {
        let list = entries(&[(0, "sad", 9), (1, "sad", 9), (10, "sad", 9), (11, "sad", 9)]);
        assert!(Aggregator::new(&list, now(), utc()).mood_patterns().is_empty());
    }

    #[test]
    fn three_high_intensity_entries_are_high_priority() {
        let list = entries(&[(0, "anxious", 8), (1, "sad", 9), (2, "happy", 8), (3, "calm", 7)]);
        let patterns = Aggregator::new(&list, now(), utc()).mood_patterns();
        assert_eq!(kinds(&patterns), vec![PatternKind::HighIntensity]);
        assert_eq!(patterns[0].priority, PatternPriority::High);
        assert_eq!(patterns[0].description, "3 high-intensity mood entries in the past week");
    }

    #[test]
    fn declining_trend_compares_newest_and_oldest_three() {
        let list = entries(&[(0, "sad", 3), (1, "sad", 3), (2, "calm", 4), (3, "happy", 8), (4, "happy", 9)]);
        let patterns = Aggregator::new(&list, now(), utc()).mood_patterns();
        assert_eq!(kinds(&patterns), vec![PatternKind::DecliningTrend]);
        assert_eq!(patterns[0].priority, PatternPriority::Medium);
        assert_eq!(patterns[0].description, "Mood intensity has decreased from 7.0 to 3.3");
    }

    #[test]
    fn decline_of_exactly_two_is_not_reported() {
        let list = entries(&[(0, "calm", 5), (1, "calm", 5), (2, "calm", 5), (3, "calm", 7), (4, "calm", 7), (5, "calm", 7)]);
        assert!(Aggregator::new(&list, now(), utc()).mood_patterns().is_empty());

        let list = entries(&[(0, "calm", 4), (1, "calm", 5), (2, "calm", 5), (3, "calm", 7), (4, "calm", 7), (5, "calm", 7)]);
        let patterns = Aggregator::new(&list, now(), utc()).mood_patterns();
        assert_eq!(kinds(&patterns), vec![PatternKind::DecliningTrend]);
    }

    #[test]
    fn declining_trend_needs_five_entries() {
        let list = entries(&[(0, "sad", 2), (1, "sad", 2), (2, "happy", 9), (3, "happy", 7)]);
        assert!(Aggregator::new(&list, now(), utc()).mood_patterns().is_empty());
    }

    #[test]
    fn quiet_three_days_is_a_missed_check_in() {
        let list = entries(&[(3, "calm", 5), (4, "calm", 5), (5, "calm", 5)]);
        let patterns = Aggregator::new(&list, now(), utc()).mood_patterns();
        assert_eq!(kinds(&patterns), vec![PatternKind::MissedCheckins]);
        assert_eq!(patterns[0].description, "No mood check-ins for 3 days");

        let list = entries(&[(2, "calm", 5), (4, "calm", 5), (5, "calm", 5)]);
        assert!(Aggregator::new(&list, now(), utc()).mood_patterns().is_empty());
    }
}
