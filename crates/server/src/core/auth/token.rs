//! Session tokens
//!
//! Stateless HS256 JWTs carrying the user id and email. There is no
//! server-side session table, so logout is purely client-side.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{Error, Result};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Decoded caller identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token valid for the configured window.
    pub fn issue(&self, user_id: i64, email: &str) -> Result<String> {
        self.issue_with_ttl(user_id, email, self.ttl)
    }

    pub fn issue_with_ttl(&self, user_id: i64, email: &str, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(ttl)
            .ok_or_else(|| Error::Internal(format!("token expiry out of range: {ttl}")))?;
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| Error::Internal(format!("token encoding: {e}")))
    }

    /// Verify signature and expiry. Every failure collapses to the same error.
    pub fn verify(&self, token: &str) -> Result<Identity> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            debug!("[Token] Rejected: {}", e);
            Error::Auth("invalid token")
        })?;

        let user_id = data.claims.sub.parse::<i64>().map_err(|_| {
            debug!("[Token] Rejected: non-numeric subject {:?}", data.claims.sub);
            Error::Auth("invalid token")
        })?;

        debug!("[Token] Accepted jti={} user={}", data.claims.jti, user_id);
        Ok(Identity {
            user_id,
            email: data.claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(b"test-secret", Duration::days(7))
    }

    #[test]
    fn round_trips_identity() {
        let tokens = service();
        let token = tokens.issue(42, "a@x.com").unwrap();
        let identity = tokens.verify(&token).unwrap();
        assert_eq!(
            identity,
            Identity {
                user_id: 42,
                email: "a@x.com".to_string()
            }
        );
    }

    #[test]
    fn default_validity_is_seven_days() {
        let tokens = service();
        assert_eq!(tokens.ttl(), Duration::days(7));
        let token = tokens.issue(1, "a@x.com").unwrap();
        let data = decode::<Claims>(&token, &tokens.decoding, &tokens.validation).unwrap();
        assert_eq!(data.claims.exp - data.claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn rejects_expired_token() {
        let tokens = service();
        let token = tokens
            .issue_with_ttl(1, "a@x.com", Duration::hours(-1))
            .unwrap();
        assert!(matches!(tokens.verify(&token), Err(Error::Auth("invalid token"))));
    }

    #[test]
    fn rejects_foreign_key() {
        let other = TokenService::new(b"another-secret", Duration::days(7));
        let token = other.issue(1, "a@x.com").unwrap();
        assert!(matches!(service().verify(&token), Err(Error::Auth("invalid token"))));
    }

    #[test]
    fn unrepresentable_expiry_is_an_error() {
        let tokens = TokenService::new(b"test-secret", Duration::MAX);
        assert!(matches!(tokens.issue(1, "a@x.com"), Err(Error::Internal(_))));
    }

    #[test]
    fn rejects_malformed_token() {
        assert!(matches!(service().verify("not.a.jwt"), Err(Error::Auth(_))));
        assert!(matches!(service().verify(""), Err(Error::Auth(_))));
    }
}
