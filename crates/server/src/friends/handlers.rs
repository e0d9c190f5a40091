//! Friend Request Handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use super::{FriendRequest, IncomingRequest, RequestStatus};
use crate::core::auth::PublicProfile;
use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use crate::core::extract::{ApiJson, ApiPath};

/// Request to send friend request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendFriendRequest {
    pub requested_id: Option<i64>,
}

/// Request to respond to friend request
#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub status: Option<RequestStatus>,
}

/// POST /friend-request
pub async fn send_friend_request(
    State(state): State<AppState>,
    ctx: Ctx,
    ApiJson(req): ApiJson<SendFriendRequest>,
) -> Result<(StatusCode, Json<FriendRequest>)> {
    let requested_id = req
        .requested_id
        .ok_or_else(|| Error::validation("requestedId is required"))?;

    let request = state
        .friends
        .send_request(ctx.user_id(), requested_id)
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /friend-requests
pub async fn list_pending_requests(
    State(state): State<AppState>,
    ctx: Ctx,
) -> Result<Json<Vec<IncomingRequest>>> {
    Ok(Json(state.friends.list_incoming(ctx.user_id()).await?))
}

/// GET /friend-requests/sent
pub async fn list_sent_requests(
    State(state): State<AppState>,
    ctx: Ctx,
) -> Result<Json<Vec<FriendRequest>>> {
    Ok(Json(state.friends.list_outgoing(ctx.user_id()).await?))
}

/// PUT /friends/request/{id} - Accept or reject friend request
pub async fn respond_friend_request(
    State(state): State<AppState>,
    ctx: Ctx,
    ApiPath(request_id): ApiPath<i64>,
    ApiJson(req): ApiJson<RespondRequest>,
) -> Result<Json<FriendRequest>> {
    let status = req
        .status
        .ok_or_else(|| Error::validation("status is required"))?;

    let request = state
        .friends
        .respond(ctx.user_id(), request_id, status)
        .await?;
    Ok(Json(request))
}

/// GET /friends
pub async fn list_friends(
    State(state): State<AppState>,
    ctx: Ctx,
) -> Result<Json<Vec<PublicProfile>>> {
    Ok(Json(state.friends.list_friends(ctx.user_id()).await?))
}
