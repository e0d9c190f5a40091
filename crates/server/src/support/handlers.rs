//! Support handlers

use axum::{extract::State, http::StatusCode, Json};

use super::{NewSupport, SupportInteraction};
use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::Result;
use crate::core::extract::ApiJson;

/// POST /support
pub async fn send_support(
    State(state): State<AppState>,
    ctx: Ctx,
    ApiJson(req): ApiJson<NewSupport>,
) -> Result<(StatusCode, Json<SupportInteraction>)> {
    let interaction = state.support.send(ctx.user_id(), req).await?;
    Ok((StatusCode::CREATED, Json(interaction)))
}

/// GET /support/received
pub async fn list_received(
    State(state): State<AppState>,
    ctx: Ctx,
) -> Result<Json<Vec<SupportInteraction>>> {
    Ok(Json(state.support.list_received(ctx.user_id()).await?))
}

/// GET /support/sent
pub async fn list_sent(
    State(state): State<AppState>,
    ctx: Ctx,
) -> Result<Json<Vec<SupportInteraction>>> {
    Ok(Json(state.support.list_sent(ctx.user_id()).await?))
}
