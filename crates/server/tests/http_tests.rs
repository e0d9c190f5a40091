//! End-to-end scenarios through the real router.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{error_type, spawn_app};
use serde_json::json;

#[tokio::test]
async fn register_login_journal_public_scenario() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/register",
            None,
            Some(json!({ "email": "a@x.com", "password": "secret1" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], "a@x.com");

    let (status, body) = app
        .request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "a@x.com", "password": "secret1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, entry) = app
        .request(
            Method::POST,
            "/journal",
            Some(&token),
            Some(json!({ "content": "hello" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["content"], "hello");
    assert_eq!(entry["isPublic"], false);

    let (status, feed) = app.request(Method::GET, "/journal/public", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feed.as_array().unwrap().len(), 0);

    let (status, _) = app
        .request(
            Method::POST,
            "/journal",
            Some(&token),
            Some(json!({ "content": "hello", "isPublic": true })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, feed) = app.request(Method::GET, "/journal/public", None, None).await;
    let feed = feed.as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["content"], "hello");

    let (_, own) = app.request(Method::GET, "/journal", Some(&token), None).await;
    assert_eq!(own.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn mood_overwrite_scenario() {
    let app = spawn_app().await;
    let session = app.register("a@x.com").await;
    let token = session.token.as_str();

    for (mood, emoji) in [("happy", "😊"), ("sad", "😢")] {
        let (status, _) = app
            .request(
                Method::POST,
                "/mood",
                Some(token),
                Some(json!({ "mood": mood, "emoji": emoji, "date": "2024-01-01" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, moods) = app.request(Method::GET, "/mood", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    let moods = moods.as_array().unwrap();
    assert_eq!(moods.len(), 1);
    assert_eq!(moods[0]["date"], "2024-01-01");
    assert_eq!(moods[0]["mood"], "sad");

    let (_, filtered) = app
        .request(Method::GET, "/mood?month=2&year=2024", Some(token), None)
        .await;
    assert!(filtered.as_array().unwrap().is_empty());

    let (status, body) = app
        .request(Method::GET, "/mood?month=abc", Some(token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_type(&body), "ValidationError");
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let app = spawn_app().await;
    let session = app.register("a@x.com").await;
    let expired = app
        .state
        .tokens
        .issue_with_ttl(session.user.id, "a@x.com", chrono::Duration::hours(-2))
        .unwrap();

    let (status, body) = app.request(Method::GET, "/profile", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_type(&body), "AuthError");
    assert_eq!(body["error"]["message"], "invalid token");
}

#[tokio::test]
async fn missing_and_malformed_tokens() {
    let app = spawn_app().await;

    let (status, body) = app.request(Method::GET, "/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "token required");

    let (status, body) = app
        .request(Method::GET, "/profile", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "invalid token");

    let request = Request::builder()
        .uri("/stats")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let (status, raw) = app.request_raw(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(raw.contains("invalid token"));
}

#[tokio::test]
async fn profile_round_trip_never_exposes_password() {
    let app = spawn_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/signup")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": "a@x.com", "password": "secret1", "name": "Ann" }).to_string(),
        ))
        .unwrap();
    let (status, raw) = app.request_raw(request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(!raw.contains("secret1"));
    assert!(!raw.to_lowercase().contains("password"));

    let body: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let token = body["token"].as_str().unwrap();

    let (status, updated) = app
        .request(
            Method::PUT,
            "/profile",
            Some(token),
            Some(json!({ "name": "Ann", "age": 29, "gender": "female" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["profileComplete"], true);

    let (status, incomplete) = app
        .request(Method::PUT, "/profile", Some(token), Some(json!({ "name": "Ann" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_type(&incomplete), "ValidationError");

    let request = Request::builder()
        .uri("/profile")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, raw) = app.request_raw(request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!raw.contains("secret1"));
    assert!(!raw.contains("$2"), "bcrypt hash leaked: {raw}");
}

#[tokio::test]
async fn status_codes_follow_error_taxonomy() {
    let app = spawn_app().await;
    let ann = app.register("ann@x.com").await;
    let bob = app.register("bob@x.com").await;

    // Duplicate registration
    let (status, body) = app
        .request(
            Method::POST,
            "/register",
            None,
            Some(json!({ "email": "ann@x.com", "password": "secret1" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_type(&body), "ConflictError");

    // Bad credentials
    let (status, body) = app
        .request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "ann@x.com", "password": "nope-nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "invalid credentials");

    // Malformed JSON
    let request = Request::builder()
        .method(Method::POST)
        .uri("/journal")
        .header(header::AUTHORIZATION, format!("Bearer {}", ann.token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, raw) = app.request_raw(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(raw.contains("ValidationError"));

    // Friend requests: self, duplicate, wrong responder
    let (status, _) = app
        .request(
            Method::POST,
            "/friend-request",
            Some(&ann.token),
            Some(json!({ "requestedId": ann.user.id })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, request) = app
        .request(
            Method::POST,
            "/friend-request",
            Some(&ann.token),
            Some(json!({ "requestedId": bob.user.id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(request["status"], "pending");
    let request_id = request["id"].as_i64().unwrap();

    let (status, _) = app
        .request(
            Method::POST,
            "/friend-request",
            Some(&ann.token),
            Some(json!({ "requestedId": bob.user.id })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let uri = format!("/friends/request/{request_id}");
    let (status, body) = app
        .request(
            Method::PUT,
            &uri,
            Some(&ann.token),
            Some(json!({ "status": "accepted" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_type(&body), "NotFoundError");

    let (status, body) = app
        .request(
            Method::PUT,
            &uri,
            Some(&bob.token),
            Some(json!({ "status": "maybe" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_type(&body), "ValidationError");

    let (status, body) = app
        .request(
            Method::PUT,
            &uri,
            Some(&bob.token),
            Some(json!({ "status": "accepted" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "accepted");

    let (_, friends) = app.request(Method::GET, "/friends", Some(&ann.token), None).await;
    assert_eq!(friends.as_array().unwrap().len(), 1);
    assert!(friends[0].get("email").is_none());

    // Foreign journal delete
    let (_, entry) = app
        .request(
            Method::POST,
            "/journal",
            Some(&bob.token),
            Some(json!({ "content": "mine" })),
        )
        .await;
    let uri = format!("/journal/{}", entry["id"]);
    let (status, _) = app.request(Method::DELETE, &uri, Some(&ann.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.request(Method::DELETE, &uri, Some(&bob.token), None).await;
    assert_eq!(status, StatusCode::OK);

    // Non-numeric id
    let (status, _) = app
        .request(Method::DELETE, "/journal/abc", Some(&bob.token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stats_and_achievements_endpoints() {
    let app = spawn_app().await;
    let session = app.register("a@x.com").await;
    let token = session.token.as_str();

    app.request(
        Method::POST,
        "/gratitude",
        Some(token),
        Some(json!({ "content": "sunrise", "date": "2024-06-01" })),
    )
    .await;

    let (status, stats) = app.request(Method::GET, "/stats", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["gratitudeEntries"], 1);
    assert_eq!(stats["daysActive"], 1);

    let (status, unlocked) = app
        .request(Method::POST, "/achievements/check", Some(token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unlocked[0]["achievementType"], "first_gratitude");

    let (_, listed) = app.request(Method::GET, "/achievements", Some(token), None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn health_and_unknown_routes() {
    let app = spawn_app().await;

    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());

    let (status, body) = app.request(Method::GET, "/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_type(&body), "NotFoundError");

    let (status, _) = app
        .request(Method::POST, "/logout", Some(&app.register("a@x.com").await.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn user_directory_hides_emails() {
    let app = spawn_app().await;
    let ann = app.member("ann@x.com", "Ann").await;
    let bob = app.member("bob@x.com", "Bob").await;

    let (status, users) = app.request(Method::GET, "/users", Some(&ann.token), None).await;
    assert_eq!(status, StatusCode::OK);
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["id"], bob.user.id);
    assert_eq!(users[0]["name"], "Bob");
    assert!(users[0].get("email").is_none());
    assert!(users[0].get("createdAt").is_none());
}
