//! Server configuration and shared application state

use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use sqlx::SqlitePool;
use tracing::warn;
use uuid::Uuid;

use crate::core::auth::token::TokenService;
use crate::core::auth::AuthManager;
use crate::friends::FriendManager;
use crate::gratitude::GratitudeManager;
use crate::journal::JournalManager;
use crate::mood::MoodManager;
use crate::stats::{AchievementManager, StatsManager};
use crate::support::SupportManager;

/// Deployment mode, read from `APP_ENV`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Development,
    Production,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Mode::Production),
            "development" | "dev" | "test" => Ok(Mode::Development),
            other => Err(anyhow!("unknown APP_ENV value: {other}")),
        }
    }
}

/// Configuration for the wellness server
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub mode: Mode,
    /// sqlx connection string, e.g. `sqlite://wellness.sqlite`
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// Session token validity in days
    pub token_ttl_days: i64,
    pub bcrypt_cost: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl AppConfig {
    pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;
    pub const TOKEN_TTL_DAYS_RANGE: RangeInclusive<i64> = 1..=365;
    /// Bounds accepted by bcrypt itself.
    pub const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;

    /// Read configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mode = match lookup("APP_ENV") {
            Some(v) => v.parse()?,
            None => Mode::Development,
        };

        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None if mode == Mode::Production => {
                bail!("JWT_SECRET must be set when APP_ENV=production")
            }
            None => {
                warn!("[Config] JWT_SECRET not set; using a random per-process secret (tokens will not survive restarts)");
                format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
            }
        };

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3001".to_string())
            .parse()
            .context("BIND_ADDR is not a valid socket address")?;

        let token_ttl_days = parse_var(&lookup, "TOKEN_TTL_DAYS", Self::DEFAULT_TOKEN_TTL_DAYS)?;
        if !Self::TOKEN_TTL_DAYS_RANGE.contains(&token_ttl_days) {
            bail!(
                "TOKEN_TTL_DAYS must be between {} and {}, got {token_ttl_days}",
                Self::TOKEN_TTL_DAYS_RANGE.start(),
                Self::TOKEN_TTL_DAYS_RANGE.end()
            );
        }

        let bcrypt_cost = parse_var(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !Self::BCRYPT_COST_RANGE.contains(&bcrypt_cost) {
            bail!(
                "BCRYPT_COST must be between {} and {}, got {bcrypt_cost}",
                Self::BCRYPT_COST_RANGE.start(),
                Self::BCRYPT_COST_RANGE.end()
            );
        }

        Ok(Self {
            mode,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://wellness.sqlite".to_string()),
            bind_addr,
            jwt_secret,
            token_ttl_days,
            bcrypt_cost,
            max_connections: parse_var(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            acquire_timeout: Duration::from_secs(parse_var(
                &lookup,
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                5,
            )?),
        })
    }

    /// Token validity as a duration. Values too large to represent saturate,
    /// and then fail when a token is issued.
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::try_days(self.token_ttl_days).unwrap_or(chrono::Duration::MAX)
    }

    /// Config pointing at a given database with a fixed secret and a cheap bcrypt cost.
    pub fn for_database(database_url: impl Into<String>) -> Self {
        Self {
            mode: Mode::Development,
            database_url: database_url.into(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            jwt_secret: "local-development-secret".to_string(),
            token_ttl_days: Self::DEFAULT_TOKEN_TTL_DAYS,
            bcrypt_cost: 4,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{key} has invalid value {raw:?}: {e}")),
        None => Ok(default),
    }
}

/// App state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub tokens: Arc<TokenService>,
    pub auth: Arc<AuthManager>,
    pub journal: Arc<JournalManager>,
    pub mood: Arc<MoodManager>,
    pub gratitude: Arc<GratitudeManager>,
    pub friends: Arc<FriendManager>,
    pub support: Arc<SupportManager>,
    pub stats: Arc<StatsManager>,
    pub achievements: Arc<AchievementManager>,
}

impl AppState {
    /// Wire every manager onto one pool.
    pub fn new(pool: SqlitePool, config: &AppConfig) -> Self {
        let tokens = Arc::new(TokenService::new(
            config.jwt_secret.as_bytes(),
            config.token_ttl(),
        ));
        let stats = Arc::new(StatsManager::new(pool.clone()));

        Self {
            auth: Arc::new(AuthManager::new(
                pool.clone(),
                tokens.clone(),
                config.bcrypt_cost,
            )),
            tokens,
            journal: Arc::new(JournalManager::new(pool.clone())),
            mood: Arc::new(MoodManager::new(pool.clone())),
            gratitude: Arc::new(GratitudeManager::new(pool.clone())),
            friends: Arc::new(FriendManager::new(pool.clone())),
            support: Arc::new(SupportManager::new(pool.clone())),
            achievements: Arc::new(AchievementManager::new(pool.clone(), stats.clone())),
            stats,
            pool,
        }
    }
}
