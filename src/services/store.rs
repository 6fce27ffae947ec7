//! Mood record store.
//!
//! Append-only per-user log with two backing media: a process-local map
//! (the local-device variant, also used in tests) and a Postgres table.
//! `all` always returns newest first.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::mood::{ContextTag, Intensity, MoodAnalysis, MoodEntry};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt mood record {id}: {reason}")]
    Corrupt { id: Uuid, reason: String },
}

#[derive(Clone)]
pub enum MoodStore {
    Memory(MemoryMoodStore),
    Postgres(PgMoodStore),
}

impl MoodStore {
    pub fn memory() -> Self {
        Self::Memory(MemoryMoodStore::default())
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self::Postgres(PgMoodStore { pool })
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }

    pub async fn append(&self, entry: MoodEntry) -> Result<MoodEntry, StoreError> {
        match self {
            Self::Memory(store) => Ok(store.append(entry).await),
            Self::Postgres(store) => store.append(entry).await,
        }
    }

    pub async fn all(&self, user_id: &str) -> Result<Vec<MoodEntry>, StoreError> {
        match self {
            Self::Memory(store) => Ok(store.all(user_id).await),
            Self::Postgres(store) => store.all(user_id).await,
        }
    }

    /// Removes every entry owned by `user_id`, returning how many went.
    pub async fn clear(&self, user_id: &str) -> Result<u64, StoreError> {
        match self {
            Self::Memory(store) => Ok(store.clear(user_id).await),
            Self::Postgres(store) => store.clear(user_id).await,
        }
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        match self {
            Self::Memory(_) => Ok(()),
            Self::Postgres(store) => {
                sqlx::query_scalar::<_, i32>("SELECT 1")
                    .fetch_one(&store.pool)
                    .await?;
                Ok(())
            }
        }
    }
}

/// Entries per user, held oldest first.
#[derive(Clone, Default)]
pub struct MemoryMoodStore {
    entries: Arc<RwLock<HashMap<String, Vec<MoodEntry>>>>,
}

impl MemoryMoodStore {
    /// Inserts by `(created_at, id)`, so writers racing on the lock keep the order.
    async fn append(&self, entry: MoodEntry) -> MoodEntry {
        let mut entries = self.entries.write().await;
        let list = entries.entry(entry.user_id.clone()).or_default();
        let at = list.partition_point(|e| (e.created_at, e.id) <= (entry.created_at, entry.id));
        list.insert(at, entry.clone());
        entry
    }

    async fn all(&self, user_id: &str) -> Vec<MoodEntry> {
        let entries = self.entries.read().await;
        entries
            .get(user_id)
            .map(|list| list.iter().rev().cloned().collect())
            .unwrap_or_default()
    }

    async fn clear(&self, user_id: &str) -> u64 {
        let mut entries = self.entries.write().await;
        entries
            .remove(user_id)
            .map(|list| list.len() as u64)
            .unwrap_or(0)
    }
}

#[derive(Clone)]
pub struct PgMoodStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct MoodCheckInRow {
    id: Uuid,
    user_id: String,
    mood_emoji: String,
    mood_label: String,
    intensity: i16,
    contexts: Vec<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    local_date: NaiveDate,
    ai_analysis: Json<MoodAnalysis>,
    is_crisis_detected: bool,
}

impl TryFrom<MoodCheckInRow> for MoodEntry {
    type Error = StoreError;

    fn try_from(row: MoodCheckInRow) -> Result<Self, Self::Error> {
        let intensity = Intensity::new(row.intensity as i32).ok_or_else(|| StoreError::Corrupt {
            id: row.id,
            reason: format!("intensity {} out of range", row.intensity),
        })?;
        let contexts: BTreeSet<ContextTag> = row
            .contexts
            .iter()
            .filter_map(|c| c.parse().ok())
            .collect();

        Ok(MoodEntry {
            id: row.id,
            user_id: row.user_id,
            mood_emoji: row.mood_emoji,
            mood_label: row.mood_label,
            intensity,
            contexts,
            notes: row.notes,
            created_at: row.created_at,
            date: row.local_date,
            ai_analysis: row.ai_analysis.0,
            is_crisis_detected: row.is_crisis_detected,
        })
    }
}

impl PgMoodStore {
    async fn append(&self, entry: MoodEntry) -> Result<MoodEntry, StoreError> {
        let contexts: Vec<String> = entry
            .contexts
            .iter()
            .map(|c| c.as_str().to_string())
            .collect();

        let row = sqlx::query_as::<_, MoodCheckInRow>(
            r#"
            INSERT INTO mood_checkins
                (id, user_id, mood_emoji, mood_label, intensity, contexts, notes,
                 created_at, local_date, ai_analysis, is_crisis_detected)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(entry.id)
        .bind(&entry.user_id)
        .bind(&entry.mood_emoji)
        .bind(&entry.mood_label)
        .bind(entry.intensity.get() as i16)
        .bind(&contexts)
        .bind(&entry.notes)
        .bind(entry.created_at)
        .bind(entry.date)
        .bind(Json(&entry.ai_analysis))
        .bind(entry.is_crisis_detected)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn all(&self, user_id: &str) -> Result<Vec<MoodEntry>, StoreError> {
        let rows = sqlx::query_as::<_, MoodCheckInRow>(
            r#"
            SELECT * FROM mood_checkins
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MoodEntry::try_from).collect()
    }

    async fn clear(&self, user_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM mood_checkins WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::mood::NewMoodEntry;
    use crate::services::classifier::classify;
    use chrono::{Duration, FixedOffset};

    fn entry(user: &str, label: &str, intensity: i32, at: DateTime<Utc>) -> MoodEntry {
        let intensity = Intensity::new(intensity).unwrap();
        let contexts: BTreeSet<ContextTag> = [ContextTag::Work, ContextTag::Family].into_iter().collect();
        let analysis = classify(label, intensity, &contexts);
        MoodEntry::new(
            user,
            NewMoodEntry {
                mood_emoji: "😰".into(),
                mood_label: label.into(),
                intensity,
                contexts,
                notes: Some("long day".into()),
            },
            analysis,
            at,
            FixedOffset::east_opt(0).unwrap(),
        )
    }

    #[tokio::test]
    async fn append_then_all_round_trips() {
        let store = MoodStore::memory();
        let stored = store
            .append(entry("u1", "Anxious", 7, Utc::now()))
            .await
            .unwrap();

        let all = store.all("u1").await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], stored);
        assert_eq!(all[0].mood_label, "Anxious");
        assert_eq!(all[0].intensity.get(), 7);
        assert!(all[0].contexts.contains(&ContextTag::Work));
        assert!(all[0].contexts.contains(&ContextTag::Family));
    }

    #[tokio::test]
    async fn all_is_newest_first_and_per_user() {
        let store = MoodStore::memory();
        let now = Utc::now();
        store.append(entry("u1", "Calm", 3, now - Duration::hours(2))).await.unwrap();
        store.append(entry("u1", "Happy", 6, now)).await.unwrap();
        store.append(entry("u2", "Sad", 4, now)).await.unwrap();

        let labels: Vec<_> = store
            .all("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.mood_label)
            .collect();
        assert_eq!(labels, vec!["Happy", "Calm"]);
        assert_eq!(store.all("u2").await.unwrap().len(), 1);
        assert!(store.all("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn late_writer_with_earlier_timestamp_keeps_order() {
        let store = MoodStore::memory();
        let now = Utc::now();
        store.append(entry("demo", "Happy", 8, now)).await.unwrap();
        store.append(entry("demo", "Sad", 4, now - Duration::seconds(1))).await.unwrap();
        store.append(entry("demo", "Calm", 5, now - Duration::hours(1))).await.unwrap();

        let all = store.all("demo").await.unwrap();
        let labels: Vec<_> = all.iter().map(|e| e.mood_label.as_str()).collect();
        assert_eq!(labels, vec!["Happy", "Sad", "Calm"]);
        assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn clear_only_touches_one_user() {
        let store = MoodStore::memory();
        let now = Utc::now();
        store.append(entry("u1", "Calm", 3, now)).await.unwrap();
        store.append(entry("u1", "Calm", 4, now)).await.unwrap();
        store.append(entry("u2", "Sad", 4, now)).await.unwrap();

        assert_eq!(store.clear("u1").await.unwrap(), 2);
        assert!(store.all("u1").await.unwrap().is_empty());
        assert_eq!(store.all("u2").await.unwrap().len(), 1);
        assert_eq!(store.clear("u1").await.unwrap(), 0);
    }

    #[test]
    fn corrupt_rows_are_rejected() {
        let good = entry("u1", "Calm", 3, Utc::now());
        let row = MoodCheckInRow {
            id: good.id,
            user_id: good.user_id.clone(),
            mood_emoji: good.mood_emoji.clone(),
            mood_label: good.mood_label.clone(),
            intensity: 42,
            contexts: vec!["sleep".into(), "gardening".into()],
            notes: None,
            created_at: good.created_at,
            local_date: good.date,
            ai_analysis: Json(good.ai_analysis.clone()),
            is_crisis_detected: false,
        };
        assert!(matches!(
            MoodEntry::try_from(row),
            Err(StoreError::Corrupt { .. })
        ));
    }
}
