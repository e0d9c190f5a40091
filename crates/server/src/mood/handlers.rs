//! Mood handlers

use axum::{extract::State, Json};
use serde_json::{json, Value};

use super::{MoodEntry, MoodFilter, NewMoodEntry};
use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::Result;
use crate::core::extract::{ApiJson, ApiPath, ApiQuery};

/// POST /mood
pub async fn upsert_mood(
    State(state): State<AppState>,
    ctx: Ctx,
    ApiJson(req): ApiJson<NewMoodEntry>,
) -> Result<Json<MoodEntry>> {
    Ok(Json(state.mood.upsert(ctx.user_id(), req).await?))
}

/// GET /mood?date=&month=&year=
pub async fn list_moods(
    State(state): State<AppState>,
    ctx: Ctx,
    ApiQuery(filter): ApiQuery<MoodFilter>,
) -> Result<Json<Vec<MoodEntry>>> {
    Ok(Json(state.mood.list(ctx.user_id(), &filter).await?))
}

/// DELETE /mood/{id}
pub async fn delete_mood(
    State(state): State<AppState>,
    ctx: Ctx,
    ApiPath(entry_id): ApiPath<i64>,
) -> Result<Json<Value>> {
    state.mood.delete(ctx.user_id(), entry_id).await?;
    Ok(Json(json!({ "message": "mood entry deleted", "id": entry_id })))
}
