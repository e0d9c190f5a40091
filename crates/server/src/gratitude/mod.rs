//! Gratitude notes. Any number per day.

pub mod handlers;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;

use crate::core::error::{Error, Result};
use crate::core::extract::required_text;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GratitudeEntry {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewGratitudeEntry {
    pub content: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct GratitudeFilter {
    pub date: Option<NaiveDate>,
}

pub struct GratitudeManager {
    pool: SqlitePool,
}

impl GratitudeManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: i64, entry: NewGratitudeEntry) -> Result<GratitudeEntry> {
        let content = required_text(entry.content.as_deref(), "content")?;
        let date = entry.date.unwrap_or_else(|| Utc::now().date_naive());

        let created: GratitudeEntry = sqlx::query_as(
            "INSERT INTO gratitude_entries (user_id, content, date, created_at) VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(user_id)
        .bind(&content)
        .bind(date)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!("[Gratitude] Entry {} created by user {}", created.id, user_id);
        Ok(created)
    }

    /// The caller's notes, newest first, optionally for a single date.
    pub async fn list(&self, user_id: i64, filter: &GratitudeFilter) -> Result<Vec<GratitudeEntry>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM gratitude_entries WHERE user_id = ");
        query.push_bind(user_id);
        if let Some(date) = filter.date {
            query.push(" AND date = ").push_bind(date);
        }
        query.push(" ORDER BY date DESC, created_at DESC, id DESC");

        let entries = query
            .build_query_as::<GratitudeEntry>()
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    pub async fn delete(&self, user_id: i64, entry_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM gratitude_entries WHERE id = ? AND user_id = ?")
            .bind(entry_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("gratitude entry not found"));
        }

        info!("[Gratitude] Entry {} deleted by user {}", entry_id, user_id);
        Ok(())
    }
}
