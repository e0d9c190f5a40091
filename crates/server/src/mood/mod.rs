//! Daily mood log
//!
//! One entry per user per calendar date. Submitting again for the same date
//! overwrites the mood and emoji in place.

pub mod handlers;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;

use crate::core::error::{Error, Result};
use crate::core::extract::required_text;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: i64,
    pub user_id: i64,
    pub mood: String,
    pub emoji: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewMoodEntry {
    pub mood: Option<String>,
    pub emoji: Option<String>,
    /// Defaults to today (UTC).
    pub date: Option<NaiveDate>,
}

/// Optional listing filters. Every populated field narrows the result.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MoodFilter {
    pub date: Option<NaiveDate>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl MoodFilter {
    fn validate(&self) -> Result<()> {
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(Error::validation("month must be between 1 and 12"));
            }
        }
        if let Some(year) = self.year {
            if !(1..=9999).contains(&year) {
                return Err(Error::validation("year must be between 1 and 9999"));
            }
        }
        Ok(())
    }

    /// Build the listing query. Values only ever reach the store as bind parameters.
    fn query(&self, user_id: i64) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new("SELECT * FROM mood_entries WHERE user_id = ");
        qb.push_bind(user_id);

        if let Some(date) = self.date {
            qb.push(" AND date = ").push_bind(date);
        }
        if let Some(year) = self.year {
            qb.push(" AND strftime('%Y', date) = ")
                .push_bind(format!("{year:04}"));
        }
        if let Some(month) = self.month {
            qb.push(" AND strftime('%m', date) = ")
                .push_bind(format!("{month:02}"));
        }

        qb.push(" ORDER BY date DESC, id DESC");
        qb
    }
}

pub struct MoodManager {
    pool: SqlitePool,
}

impl MoodManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or overwrite the caller's mood for a date in one statement.
    pub async fn upsert(&self, user_id: i64, entry: NewMoodEntry) -> Result<MoodEntry> {
        let mood = required_text(entry.mood.as_deref(), "mood")?;
        let emoji = required_text(entry.emoji.as_deref(), "emoji")?;
        let date = entry.date.unwrap_or_else(|| Utc::now().date_naive());
        let now = Utc::now();

        let saved: MoodEntry = sqlx::query_as(
            r#"
            INSERT INTO mood_entries (user_id, mood, emoji, date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id, date) DO UPDATE SET
                mood = excluded.mood,
                emoji = excluded.emoji,
                updated_at = excluded.updated_at
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&mood)
        .bind(&emoji)
        .bind(date)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!("[Mood] User {} logged '{}' for {}", user_id, saved.mood, saved.date);
        Ok(saved)
    }

    pub async fn list(&self, user_id: i64, filter: &MoodFilter) -> Result<Vec<MoodEntry>> {
        filter.validate()?;

        let mut query = filter.query(user_id);
        let entries = query
            .build_query_as::<MoodEntry>()
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    pub async fn delete(&self, user_id: i64, entry_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM mood_entries WHERE id = ? AND user_id = ?")
            .bind(entry_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("mood entry not found"));
        }

        info!("[Mood] Entry {} deleted by user {}", entry_id, user_id);
        Ok(())
    }
}
