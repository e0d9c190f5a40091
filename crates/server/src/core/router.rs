//! Core Router
//!
//! Public routes are mounted as-is; everything else sits behind
//! `mw_require_auth`.

use std::any::Any;

use axum::{
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::core::auth::handlers as auth_handlers;
use crate::core::auth::middleware::mw_require_auth;
use crate::core::error::{error_body, Error};
use crate::core::AppState;
use crate::{friends, gratitude, journal, mood, stats, support};

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/signup", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        .route("/journal/public", get(journal::handlers::list_public_entries))
        .route("/health", get(crate::health_check));

    let protected = Router::new()
        // Auth & profile
        .route("/logout", post(auth_handlers::logout))
        .route(
            "/profile",
            get(auth_handlers::get_profile).put(auth_handlers::update_profile),
        )
        .route("/users", get(auth_handlers::list_users))
        // Journal
        .route(
            "/journal",
            get(journal::handlers::list_entries).post(journal::handlers::create_entry),
        )
        .route(
            "/journal/{id}",
            put(journal::handlers::update_entry).delete(journal::handlers::delete_entry),
        )
        // Mood
        .route(
            "/mood",
            get(mood::handlers::list_moods).post(mood::handlers::upsert_mood),
        )
        .route("/mood/{id}", axum::routing::delete(mood::handlers::delete_mood))
        // Gratitude
        .route(
            "/gratitude",
            get(gratitude::handlers::list_gratitude).post(gratitude::handlers::create_gratitude),
        )
        .route(
            "/gratitude/{id}",
            axum::routing::delete(gratitude::handlers::delete_gratitude),
        )
        // Friends
        .route("/friend-request", post(friends::handlers::send_friend_request))
        .route("/friend-requests", get(friends::handlers::list_pending_requests))
        .route("/friend-requests/sent", get(friends::handlers::list_sent_requests))
        .route(
            "/friends/request/{id}",
            put(friends::handlers::respond_friend_request),
        )
        .route("/friends", get(friends::handlers::list_friends))
        // Support
        .route("/support", post(support::handlers::send_support))
        .route("/support/received", get(support::handlers::list_received))
        .route("/support/sent", get(support::handlers::list_sent))
        // Stats & achievements
        .route("/stats", get(stats::handlers::get_stats))
        .route("/achievements", get(stats::handlers::list_achievements))
        .route("/achievements/check", post(stats::handlers::check_achievements))
        .route_layer(from_fn_with_state(state.clone(), mw_require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .fallback(fallback)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn fallback() -> Error {
    Error::not_found("route not found")
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("[Router] Handler panicked: {}", detail);

    let err = Error::Internal(detail);
    (err.status(), error_body(err.kind(), "internal server error")).into_response()
}
