//! Journal entries
//!
//! Private by default. Entries flagged public show up in the shared feed.

pub mod handlers;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use crate::core::error::{Error, Result};
use crate::core::extract::{optional_text, required_text};

/// Maximum rows returned by the public feed.
pub const PUBLIC_FEED_LIMIT: i64 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub category: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public feed row, carrying the author's display name.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PublicJournalEntry {
    pub id: i64,
    pub user_id: i64,
    pub author_name: Option<String>,
    pub content: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJournalEntry {
    pub content: Option<String>,
    pub category: Option<String>,
    pub is_public: Option<bool>,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalUpdate {
    pub content: Option<String>,
    /// A blank string clears the category.
    pub category: Option<String>,
    pub is_public: Option<bool>,
}

pub struct JournalManager {
    pool: SqlitePool,
}

impl JournalManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: i64, entry: NewJournalEntry) -> Result<JournalEntry> {
        let content = required_text(entry.content.as_deref(), "content")?;
        let category = optional_text(entry.category.as_deref());
        let now = Utc::now();

        let created: JournalEntry = sqlx::query_as(
            r#"
            INSERT INTO journal_entries (user_id, content, category, is_public, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&content)
        .bind(&category)
        .bind(entry.is_public.unwrap_or(false))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "[Journal] Entry {} created by user {} (public: {})",
            created.id, user_id, created.is_public
        );
        Ok(created)
    }

    /// The caller's own entries, newest first.
    pub async fn list_own(&self, user_id: i64) -> Result<Vec<JournalEntry>> {
        let entries = sqlx::query_as(
            "SELECT * FROM journal_entries WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Public entries from every user, newest first, capped at `PUBLIC_FEED_LIMIT`.
    pub async fn list_public(&self) -> Result<Vec<PublicJournalEntry>> {
        let entries = sqlx::query_as(
            r#"
            SELECT j.id, j.user_id, u.name AS author_name, j.content, j.category, j.created_at
            FROM journal_entries j
            JOIN users u ON u.id = j.user_id
            WHERE j.is_public = 1
            ORDER BY j.created_at DESC, j.id DESC
            LIMIT ?
            "#,
        )
        .bind(PUBLIC_FEED_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn update(
        &self,
        user_id: i64,
        entry_id: i64,
        update: JournalUpdate,
    ) -> Result<JournalEntry> {
        let content = match update.content.as_deref() {
            Some(raw) => Some(required_text(Some(raw), "content")?),
            None => None,
        };
        let replace_category = update.category.is_some();
        let category = optional_text(update.category.as_deref());

        let updated: Option<JournalEntry> = sqlx::query_as(
            r#"
            UPDATE journal_entries
            SET content = COALESCE(?, content),
                category = CASE WHEN ? THEN ? ELSE category END,
                is_public = COALESCE(?, is_public),
                updated_at = ?
            WHERE id = ? AND user_id = ?
            RETURNING *
            "#,
        )
        .bind(&content)
        .bind(replace_category)
        .bind(&category)
        .bind(update.is_public)
        .bind(Utc::now())
        .bind(entry_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let updated = updated.ok_or_else(|| Error::not_found("journal entry not found"))?;
        info!("[Journal] Entry {} updated by user {}", entry_id, user_id);
        Ok(updated)
    }

    pub async fn delete(&self, user_id: i64, entry_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = ? AND user_id = ?")
            .bind(entry_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("journal entry not found"));
        }

        info!("[Journal] Entry {} deleted by user {}", entry_id, user_id);
        Ok(())
    }
}
