//! Wellness Tracking Server Library
//!
//! Journals, daily moods, gratitude notes and friends, behind bearer-token auth.

pub mod core;
pub mod friends;
pub mod gratitude;
pub mod journal;
pub mod mood;
pub mod stats;
pub mod support;

use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::core::{db, AppConfig, AppState};

/// Install the global fmt subscriber. Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "wellness_server=info,tower_http=info".into());

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        // Already set, ignore
    }
}

pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    info!("=== Wellness Server ===");

    let config = AppConfig::from_env()?;
    info!("Mode: {:?}", config.mode);
    info!("Database: {}", config.database_url);

    // Refuse to start without a working store.
    let pool = db::connect(&config).await?;

    let state = AppState::new(pool, &config);
    info!("Token validity: {} days", state.tokens.ttl().num_days());
    let app = crate::core::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
