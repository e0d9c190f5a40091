use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Error taxonomy shared by every manager and handler.
///
/// Client-facing variants carry the message that is returned verbatim.
/// Server-side variants carry diagnostic detail that is logged but never
/// sent to the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("validation failed: {0}")]
    Validation(String),

    /// Missing or invalid token, or bad credentials. Never says which factor failed.
    #[error("authentication failed: {0}")]
    Auth(&'static str),

    #[error("conflict: {0}")]
    Conflict(String),

    /// Missing row, or a row the caller does not own.
    #[error("not found: {0}")]
    NotFound(String),

    /// Store unreachable.
    #[error("dependency failure: {0}")]
    Dependency(String),

    /// Pool exhaustion or acquire timeout; safe for the caller to retry.
    #[error("transient failure: {0}")]
    Transient(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Error::Conflict(msg.into())
    }

    /// Stable machine-readable name, included in the response body.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "ValidationError",
            Error::Auth(_) => "AuthError",
            Error::Conflict(_) => "ConflictError",
            Error::NotFound(_) => "NotFoundError",
            Error::Dependency(_) => "DependencyError",
            Error::Transient(_) => "TransientError",
            Error::Internal(_) => "InternalError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Auth(_) => StatusCode::UNAUTHORIZED,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Dependency(_) | Error::Transient(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn public_message(&self) -> String {
        match self {
            Error::Validation(msg) | Error::Conflict(msg) | Error::NotFound(msg) => msg.clone(),
            Error::Auth(msg) => (*msg).to_string(),
            Error::Dependency(_) | Error::Transient(_) | Error::Internal(_) => {
                "internal server error".to_string()
            }
        }
    }
}

/// Body shape used for every error response, including panics caught at the boundary.
pub(crate) fn error_body(kind: &str, message: &str) -> Json<serde_json::Value> {
    Json(json!({
        "error": {
            "type": kind,
            "message": message
        }
    }))
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("[Error] {} ({})", self, self.kind());
        }

        (status, error_body(self.kind(), &self.public_message())).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => Error::Transient("connection pool timed out".to_string()),
            sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::WorkerCrashed => Error::Dependency(err.to_string()),
            other => Error::Internal(other.to_string()),
        }
    }
}

impl From<bcrypt::BcryptError> for Error {
    fn from(err: bcrypt::BcryptError) -> Self {
        Error::Internal(format!("password hashing: {err}"))
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Internal(format!("blocking task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_hide_details() {
        let err = Error::Internal("no such table: users".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "internal server error");

        let err = Error::Dependency("connection refused".to_string());
        assert_eq!(err.public_message(), "internal server error");
    }

    #[test]
    fn client_errors_keep_message() {
        let err = Error::validation("content is required");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "content is required");
        assert_eq!(Error::Auth("invalid token").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::not_found("entry not found").kind(), "NotFoundError");
    }

    #[test]
    fn pool_timeout_is_transient() {
        assert!(matches!(
            Error::from(sqlx::Error::PoolTimedOut),
            Error::Transient(_)
        ));
        assert!(matches!(
            Error::from(sqlx::Error::PoolClosed),
            Error::Dependency(_)
        ));
        assert!(matches!(
            Error::from(sqlx::Error::RowNotFound),
            Error::Internal(_)
        ));
    }
}
