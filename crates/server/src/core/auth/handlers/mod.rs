//! Auth Handlers

pub mod auth;
pub mod profile;

pub use auth::{login, logout, register};
pub use profile::{get_profile, list_users, update_profile};
