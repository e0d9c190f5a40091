use crate::core::auth::{ProfileUpdate, PublicProfile, UserProfile};
use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::Result;
use crate::core::extract::ApiJson;
use axum::extract::State;
use axum::Json;
use tracing::info;

/// GET /profile
pub async fn get_profile(State(state): State<AppState>, ctx: Ctx) -> Result<Json<UserProfile>> {
    let user = state.auth.get_profile(ctx.user_id()).await?;

    Ok(Json(user))
}

/// PUT /profile
pub async fn update_profile(
    State(state): State<AppState>,
    ctx: Ctx,
    ApiJson(req): ApiJson<ProfileUpdate>,
) -> Result<Json<UserProfile>> {
    info!("PUT /profile - user {}", ctx.user_id());

    let user = state.auth.update_profile(ctx.user_id(), req).await?;

    Ok(Json(user))
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    ctx: Ctx,
) -> Result<Json<Vec<PublicProfile>>> {
    let users = state.auth.list_discoverable(ctx.user_id()).await?;

    Ok(Json(users))
}
