//! Auth handlers

use crate::core::auth::AuthSession;
use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::Result;
use crate::core::extract::ApiJson;
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /register (alias /signup)
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthSession>)> {
    info!("POST /register - {}", req.email.as_deref().unwrap_or("<missing>"));

    let session = state
        .auth
        .register(
            req.email.as_deref(),
            req.password.as_deref(),
            req.name.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthSession>> {
    info!("POST /login - {}", req.email.as_deref().unwrap_or("<missing>"));

    let session = state
        .auth
        .login(req.email.as_deref(), req.password.as_deref())
        .await?;

    Ok(Json(session))
}

/// POST /logout
///
/// Tokens are stateless, so this only acknowledges; the client discards its token.
pub async fn logout(ctx: Ctx) -> Json<Value> {
    info!("POST /logout - {} (id {})", ctx.email(), ctx.user_id());
    Json(json!({ "message": "logged out" }))
}
