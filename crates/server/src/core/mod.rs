//! Core Service Layer
//!
//! Shared infrastructure: configuration, store access, authentication,
//! request context, and the error taxonomy.

pub mod auth;
pub mod config;
pub mod ctx;
pub mod db;
pub mod error;
pub mod extract;
pub mod router;

// Re-exports for convenience
pub use config::{AppConfig, AppState};
pub use ctx::Ctx;
pub use error::{Error, Result};
pub use router::router;
