//! Shared test harness: a fresh database per test and helpers for both the
//! manager API and the HTTP router.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use wellness_server::core::auth::{AuthSession, ProfileUpdate};
use wellness_server::core::{db, router, AppConfig, AppState};

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    // Keeps the database directory alive for the duration of the test.
    _dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("wellness.sqlite").display());
    let config = AppConfig::for_database(url);

    let pool = db::connect(&config).await.unwrap();
    let state = AppState::new(pool, &config);
    let router = router(state.clone());

    TestApp {
        state,
        router,
        _dir: dir,
    }
}

impl TestApp {
    pub async fn register(&self, email: &str) -> AuthSession {
        self.state
            .auth
            .register(Some(email), Some("secret1"), None)
            .await
            .unwrap()
    }

    /// Registered user with a completed profile.
    pub async fn member(&self, email: &str, name: &str) -> AuthSession {
        let session = self.register(email).await;
        let user = self
            .state
            .auth
            .update_profile(
                session.user.id,
                ProfileUpdate {
                    name: Some(name.to_string()),
                    age: Some(30),
                    gender: Some("other".to_string()),
                    bio: None,
                },
            )
            .await
            .unwrap();
        AuthSession {
            token: session.token,
            user,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let (status, raw) = self.request_raw(request).await;
        let value = if raw.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&raw).unwrap_or(Value::String(raw))
        };
        (status, value)
    }

    pub async fn request_raw(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }
}

/// `error.type` of an error response body.
pub fn error_type(body: &Value) -> &str {
    body["error"]["type"].as_str().unwrap_or_default()
}
