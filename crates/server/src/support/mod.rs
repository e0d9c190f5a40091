//! Support interactions
//!
//! Append-only log of encouragement sent between users, optionally pointing
//! at one of the receiver's public journal entries.

pub mod handlers;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use crate::core::auth::user_exists;
use crate::core::error::{Error, Result};
use crate::core::extract::optional_text;

pub const DEFAULT_INTERACTION_TYPE: &str = "support";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SupportInteraction {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub journal_entry_id: Option<i64>,
    pub interaction_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSupport {
    pub receiver_id: Option<i64>,
    pub journal_entry_id: Option<i64>,
    pub interaction_type: Option<String>,
}

pub struct SupportManager {
    pool: SqlitePool,
}

impl SupportManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn send(&self, sender_id: i64, support: NewSupport) -> Result<SupportInteraction> {
        let receiver_id = support
            .receiver_id
            .ok_or_else(|| Error::validation("receiverId is required"))?;
        if receiver_id == sender_id {
            return Err(Error::validation("cannot send support to yourself"));
        }
        let interaction_type = match support.interaction_type.as_deref() {
            None => DEFAULT_INTERACTION_TYPE.to_string(),
            Some(raw) => optional_text(Some(raw))
                .ok_or_else(|| Error::validation("interactionType must not be blank"))?,
        };

        if !user_exists(&self.pool, receiver_id).await? {
            return Err(Error::not_found("user not found"));
        }

        if let Some(entry_id) = support.journal_entry_id {
            let entry: Option<(i64,)> = sqlx::query_as(
                "SELECT id FROM journal_entries WHERE id = ? AND user_id = ? AND is_public = 1",
            )
            .bind(entry_id)
            .bind(receiver_id)
            .fetch_optional(&self.pool)
            .await?;
            if entry.is_none() {
                return Err(Error::not_found("journal entry not found"));
            }
        }

        let created: SupportInteraction = sqlx::query_as(
            r#"
            INSERT INTO support_interactions (sender_id, receiver_id, journal_entry_id, interaction_type, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(support.journal_entry_id)
        .bind(&interaction_type)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!(
            "[Support] {} sent '{}' to {}",
            sender_id, created.interaction_type, receiver_id
        );
        Ok(created)
    }

    pub async fn list_received(&self, user_id: i64) -> Result<Vec<SupportInteraction>> {
        let rows = sqlx::query_as(
            "SELECT * FROM support_interactions WHERE receiver_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_sent(&self, user_id: i64) -> Result<Vec<SupportInteraction>> {
        let rows = sqlx::query_as(
            "SELECT * FROM support_interactions WHERE sender_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
