//! Stats and achievement handlers

use axum::{extract::State, Json};

use super::{Achievement, UserStats};
use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::Result;

/// GET /stats
pub async fn get_stats(State(state): State<AppState>, ctx: Ctx) -> Result<Json<UserStats>> {
    Ok(Json(state.stats.stats(ctx.user_id()).await?))
}

/// GET /achievements
pub async fn list_achievements(
    State(state): State<AppState>,
    ctx: Ctx,
) -> Result<Json<Vec<Achievement>>> {
    Ok(Json(state.achievements.list(ctx.user_id()).await?))
}

/// POST /achievements/check
pub async fn check_achievements(
    State(state): State<AppState>,
    ctx: Ctx,
) -> Result<Json<Vec<Achievement>>> {
    Ok(Json(state.achievements.evaluate(ctx.user_id()).await?))
}
