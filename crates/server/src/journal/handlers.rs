//! Journal handlers

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use super::{JournalEntry, JournalUpdate, NewJournalEntry, PublicJournalEntry};
use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::Result;
use crate::core::extract::{ApiJson, ApiPath};

/// POST /journal
pub async fn create_entry(
    State(state): State<AppState>,
    ctx: Ctx,
    ApiJson(req): ApiJson<NewJournalEntry>,
) -> Result<(StatusCode, Json<JournalEntry>)> {
    let entry = state.journal.create(ctx.user_id(), req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /journal
pub async fn list_entries(
    State(state): State<AppState>,
    ctx: Ctx,
) -> Result<Json<Vec<JournalEntry>>> {
    Ok(Json(state.journal.list_own(ctx.user_id()).await?))
}

/// GET /journal/public
pub async fn list_public_entries(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicJournalEntry>>> {
    Ok(Json(state.journal.list_public().await?))
}

/// PUT /journal/{id}
pub async fn update_entry(
    State(state): State<AppState>,
    ctx: Ctx,
    ApiPath(entry_id): ApiPath<i64>,
    ApiJson(req): ApiJson<JournalUpdate>,
) -> Result<Json<JournalEntry>> {
    let entry = state.journal.update(ctx.user_id(), entry_id, req).await?;
    Ok(Json(entry))
}

/// DELETE /journal/{id}
pub async fn delete_entry(
    State(state): State<AppState>,
    ctx: Ctx,
    ApiPath(entry_id): ApiPath<i64>,
) -> Result<Json<Value>> {
    state.journal.delete(ctx.user_id(), entry_id).await?;
    Ok(Json(json!({ "message": "journal entry deleted", "id": entry_id })))
}
