//! Authentication Module
//!
//! Handles registration, login, and profile management.
//! Users live in the `users` table; passwords are stored as bcrypt hashes only.

pub mod handlers;
pub mod middleware;
pub mod token;

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::core::db::is_unique_violation;
use crate::core::error::{Error, Result};
use crate::core::extract::{optional_text, required_text};
use token::TokenService;

pub const MIN_PASSWORD_LEN: usize = 6;

/// User record stored in database
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub bio: Option<String>,
    pub profile_complete: bool,
    pub created_at: DateTime<Utc>,
}

/// Public user info (no sensitive data)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub bio: Option<String>,
    pub profile_complete: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            age: user.age,
            gender: user.gender,
            bio: user.bio,
            profile_complete: user.profile_complete,
            created_at: user.created_at,
        }
    }
}

/// What other users may see: no email, no account metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: i64,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub bio: Option<String>,
}

impl From<User> for PublicProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            age: user.age,
            gender: user.gender,
            bio: user.bio,
        }
    }
}

/// A freshly issued token together with the user it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

/// Fields accepted by a profile update. name, age and gender are mandatory.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub bio: Option<String>,
}

/// Auth manager handles all authentication
pub struct AuthManager {
    pool: SqlitePool,
    tokens: Arc<TokenService>,
    bcrypt_cost: u32,
}

impl AuthManager {
    pub fn new(pool: SqlitePool, tokens: Arc<TokenService>, bcrypt_cost: u32) -> Self {
        Self {
            pool,
            tokens,
            bcrypt_cost,
        }
    }

    /// Register a new user and issue a session token.
    pub async fn register(
        &self,
        email: Option<&str>,
        password: Option<&str>,
        name: Option<&str>,
    ) -> Result<AuthSession> {
        let email = required_text(email, "email")?;
        let password = match password {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => return Err(Error::validation("password is required")),
        };
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let name = optional_text(name);

        // Check if email already exists
        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(Error::conflict("email already registered"));
        }

        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || hash(password, cost)).await??;

        // The unique index is the real guard; the pre-check above only saves a hash.
        let user: User = sqlx::query_as(
            "INSERT INTO users (email, password_hash, name, created_at) VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(&email)
        .bind(&password_hash)
        .bind(&name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::conflict("email already registered")
            } else {
                e.into()
            }
        })?;

        info!("[Auth] User registered: {} (id {})", user.email, user.id);

        let token = self.tokens.issue(user.id, &user.email)?;
        Ok(AuthSession {
            token,
            user: user.into(),
        })
    }

    /// Check credentials and issue a session token.
    pub async fn login(&self, email: Option<&str>, password: Option<&str>) -> Result<AuthSession> {
        let (Some(email), Some(password)) = (email.map(str::trim), password) else {
            return Err(Error::validation("email and password are required"));
        };

        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        let Some(user) = user else {
            warn!("[Auth] Failed login attempt for {}", email);
            return Err(Error::Auth("invalid credentials"));
        };

        let candidate = password.to_string();
        let stored = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || verify(candidate, &stored)).await??;
        if !valid {
            warn!("[Auth] Failed login attempt for {}", email);
            return Err(Error::Auth("invalid credentials"));
        }

        info!("[Auth] User logged in: {}", user.email);

        let token = self.tokens.issue(user.id, &user.email)?;
        Ok(AuthSession {
            token,
            user: user.into(),
        })
    }

    /// Get user by ID
    pub async fn get_profile(&self, user_id: i64) -> Result<UserProfile> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        user.map(UserProfile::from)
            .ok_or_else(|| Error::not_found("user not found"))
    }

    /// Update the profile. Always marks the profile complete.
    pub async fn update_profile(&self, user_id: i64, update: ProfileUpdate) -> Result<UserProfile> {
        let name = required_text(update.name.as_deref(), "name")?;
        let gender = required_text(update.gender.as_deref(), "gender")?;
        let age = match update.age {
            Some(age) if age > 0 => age,
            Some(_) => return Err(Error::validation("age must be a positive number")),
            None => return Err(Error::validation("age is required")),
        };
        let bio = optional_text(update.bio.as_deref());

        let user: Option<User> = sqlx::query_as(
            r#"
            UPDATE users
            SET name = ?, age = ?, gender = ?, bio = COALESCE(?, bio), profile_complete = 1
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&name)
        .bind(age)
        .bind(&gender)
        .bind(&bio)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let user = user.ok_or_else(|| Error::not_found("user not found"))?;
        info!("[Auth] Profile updated for user {}", user_id);
        Ok(user.into())
    }

    /// Other users who have completed their profile (for friend discovery).
    pub async fn list_discoverable(&self, user_id: i64) -> Result<Vec<PublicProfile>> {
        let users: Vec<User> = sqlx::query_as(
            "SELECT * FROM users WHERE profile_complete = 1 AND id <> ? ORDER BY name, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users.into_iter().map(PublicProfile::from).collect())
    }
}

/// True if a user row with this id exists.
pub(crate) async fn user_exists(pool: &SqlitePool, user_id: i64) -> Result<bool> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}
