//! Friend Request & Contacts Module
//!
//! Requests are directional: A→B and B→A are independent rows. Only the
//! requested party can move a pending request to accepted or rejected, and
//! both outcomes are terminal. Friends are users joined by an accepted
//! request in either direction.

pub mod handlers;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use crate::core::auth::{user_exists, PublicProfile, User};
use crate::core::db::{is_foreign_key_violation, is_unique_violation};
use crate::core::error::{Error, Result};

/// Friend request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Friend request record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    pub id: i64,
    pub requester_id: i64,
    pub requested_id: i64,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pending request addressed to the caller, with the sender's details.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct IncomingRequest {
    pub id: i64,
    pub requester_id: i64,
    pub requester_name: Option<String>,
    pub requester_email: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Friend manager handles all friend-related operations
pub struct FriendManager {
    pool: SqlitePool,
}

impl FriendManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Send a friend request
    pub async fn send_request(&self, requester_id: i64, requested_id: i64) -> Result<FriendRequest> {
        if requester_id == requested_id {
            return Err(Error::validation("cannot send a friend request to yourself"));
        }
        if !user_exists(&self.pool, requested_id).await? {
            return Err(Error::not_found("user not found"));
        }

        let now = Utc::now();
        let request: FriendRequest = sqlx::query_as(
            r#"
            INSERT INTO friend_requests (requester_id, requested_id, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(requester_id)
        .bind(requested_id)
        .bind(RequestStatus::Pending)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::conflict("friend request already exists")
            } else if is_foreign_key_violation(&e) {
                Error::not_found("user not found")
            } else {
                e.into()
            }
        })?;

        info!(
            "[Friends] Request {} sent: {} -> {}",
            request.id, requester_id, requested_id
        );
        Ok(request)
    }

    /// Accept or reject a pending request addressed to `user_id`.
    pub async fn respond(
        &self,
        user_id: i64,
        request_id: i64,
        status: RequestStatus,
    ) -> Result<FriendRequest> {
        if status == RequestStatus::Pending {
            return Err(Error::validation("status must be accepted or rejected"));
        }

        let updated: Option<FriendRequest> = sqlx::query_as(
            r#"
            UPDATE friend_requests
            SET status = ?, updated_at = ?
            WHERE id = ? AND requested_id = ? AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(Utc::now())
        .bind(request_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let updated = updated.ok_or_else(|| Error::not_found("friend request not found"))?;
        info!("[Friends] Request {} {:?} by {}", request_id, status, user_id);
        Ok(updated)
    }

    /// Get pending friend requests for a user
    pub async fn list_incoming(&self, user_id: i64) -> Result<Vec<IncomingRequest>> {
        let rows = sqlx::query_as(
            r#"
            SELECT fr.id, fr.requester_id, u.name AS requester_name, u.email AS requester_email,
                   fr.status, fr.created_at
            FROM friend_requests fr
            JOIN users u ON u.id = fr.requester_id
            WHERE fr.requested_id = ? AND fr.status = 'pending'
            ORDER BY fr.created_at DESC, fr.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Requests the user has sent, in any state.
    pub async fn list_outgoing(&self, user_id: i64) -> Result<Vec<FriendRequest>> {
        let rows = sqlx::query_as(
            "SELECT * FROM friend_requests WHERE requester_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Get user's friends
    pub async fn list_friends(&self, user_id: i64) -> Result<Vec<PublicProfile>> {
        let users: Vec<User> = sqlx::query_as(
            r#"
            SELECT * FROM users
            WHERE id IN (
                SELECT requested_id FROM friend_requests WHERE requester_id = ? AND status = 'accepted'
                UNION
                SELECT requester_id FROM friend_requests WHERE requested_id = ? AND status = 'accepted'
            )
            ORDER BY name, id
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users.into_iter().map(PublicProfile::from).collect())
    }
}
