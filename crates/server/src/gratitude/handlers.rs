//! Gratitude handlers

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use super::{GratitudeEntry, GratitudeFilter, NewGratitudeEntry};
use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::Result;
use crate::core::extract::{ApiJson, ApiPath, ApiQuery};

/// POST /gratitude
pub async fn create_gratitude(
    State(state): State<AppState>,
    ctx: Ctx,
    ApiJson(req): ApiJson<NewGratitudeEntry>,
) -> Result<(StatusCode, Json<GratitudeEntry>)> {
    let entry = state.gratitude.create(ctx.user_id(), req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /gratitude?date=
pub async fn list_gratitude(
    State(state): State<AppState>,
    ctx: Ctx,
    ApiQuery(filter): ApiQuery<GratitudeFilter>,
) -> Result<Json<Vec<GratitudeEntry>>> {
    Ok(Json(state.gratitude.list(ctx.user_id(), &filter).await?))
}

/// DELETE /gratitude/{id}
pub async fn delete_gratitude(
    State(state): State<AppState>,
    ctx: Ctx,
    ApiPath(entry_id): ApiPath<i64>,
) -> Result<Json<Value>> {
    state.gratitude.delete(ctx.user_id(), entry_id).await?;
    Ok(Json(json!({ "message": "gratitude entry deleted", "id": entry_id })))
}
