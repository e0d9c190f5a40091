use crate::core::auth::token::Identity;
use crate::core::error::{Error, Result};
use axum::{extract::FromRequestParts, http::request::Parts};

/// Authenticated caller, inserted by `mw_require_auth`.
#[derive(Clone, Debug)]
pub struct Ctx {
    user_id: i64,
    email: String,
}

impl Ctx {
    pub fn new(user_id: i64, email: String) -> Self {
        Self { user_id, email }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl From<Identity> for Ctx {
    fn from(identity: Identity) -> Self {
        Self::new(identity.user_id, identity.email)
    }
}

impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<Ctx>()
            .cloned()
            .ok_or_else(|| Error::Internal("auth context missing from request".to_string()))
    }
}
