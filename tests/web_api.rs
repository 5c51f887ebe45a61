//! Web API Tests
//!
//! Integration tests for registration, subscription management, triggers
//! and statistics.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;

use common::{build_context, sample_feed, test_config, RecordingChannel, StaticFetcher, WEBHOOK};
use dailydigest::web::{create_router, AppState};

const PUBLIC_URL: &str = "https://digest.example.com";

/// Create a test server over the given fetcher and channel.
async fn create_test_server(fetcher: StaticFetcher, slack: Arc<RecordingChannel>) -> TestServer {
    let mut config = test_config();
    config.server.public_url = Some(PUBLIC_URL.to_string());

    let ctx = build_context(config, fetcher, None, vec![slack]).await;
    let router = create_router(Arc::new(AppState::new(ctx)));

    TestServer::new(router).expect("Failed to create test server")
}

async fn default_server() -> TestServer {
    create_test_server(
        StaticFetcher::failing(),
        Arc::new(RecordingChannel::new("slack")),
    )
    .await
}

/// Helper to register a user and return the response body.
async fn register_user(server: &TestServer, email: &str) -> Value {
    let response = server
        .post("/register")
        .form(&[
            ("email", email),
            ("slack_webhook_url", WEBHOOK),
            ("timezone", "Europe/Berlin"),
            ("schedule_hour", "7"),
        ])
        .await;

    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

fn user_id(body: &Value) -> String {
    body["data"]["user_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_and_root() {
    let server = default_server().await;

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "OK");

    let body: Value = server.get("/").await.json();
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_register_success() {
    let server = default_server().await;

    let body = register_user(&server, "alice@example.com").await;
    let id = user_id(&body);

    assert_eq!(
        body["data"]["trigger_url"],
        format!("{}/trigger/{}", PUBLIC_URL, id)
    );
    assert_eq!(
        body["data"]["manage_url"],
        format!("{}/manage/{}", PUBLIC_URL, id)
    );

    let body: Value = server.get(&format!("/manage/{}", id)).await.json();
    assert_eq!(body["data"]["user"]["email"], "alice@example.com");
    assert_eq!(body["data"]["user"]["timezone"], "Europe/Berlin");
    assert_eq!(body["data"]["user"]["schedule_hour"], 7);
    assert_eq!(body["data"]["feeds"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_register_uses_defaults() {
    let server = default_server().await;

    let response = server
        .post("/register")
        .form(&[("email", "bob@example.com"), ("slack_webhook_url", WEBHOOK)])
        .await;
    response.assert_status(StatusCode::CREATED);
    let id = user_id(&response.json::<Value>());

    let body: Value = server.get(&format!("/manage/{}", id)).await.json();
    assert_eq!(body["data"]["user"]["timezone"], "UTC");
    assert_eq!(body["data"]["user"]["schedule_hour"], 8);
}

#[tokio::test]
async fn test_register_field_validation() {
    let server = default_server().await;

    let response = server
        .post("/register")
        .form(&[
            ("email", "not-an-email"),
            ("slack_webhook_url", WEBHOOK),
            ("schedule_hour", "24"),
        ])
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["email"].is_array());
    assert!(body["error"]["details"]["schedule_hour"].is_array());
}

#[tokio::test]
async fn test_register_rejects_non_slack_webhook() {
    let server = default_server().await;

    let response = server
        .post("/register")
        .form(&[
            ("email", "carol@example.com"),
            ("slack_webhook_url", "https://example.com/hook"),
        ])
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_register_rejects_unknown_timezone() {
    let server = default_server().await;

    let response = server
        .post("/register")
        .form(&[
            ("email", "dave@example.com"),
            ("slack_webhook_url", WEBHOOK),
            ("timezone", "Mars/Olympus_Mons"),
        ])
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let server = default_server().await;
    register_user(&server, "erin@example.com").await;

    let response = server
        .post("/register")
        .form(&[("email", "erin@example.com"), ("slack_webhook_url", WEBHOOK)])
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_manage_unknown_user() {
    let server = default_server().await;

    let response = server.get("/manage/does-not-exist").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_add_feed_names() {
    let fetcher = StaticFetcher::failing().with_feed(
        "https://blog.example.com/feed",
        sample_feed("https://blog.example.com", "Example Blog", 1),
    );
    let server = create_test_server(fetcher, Arc::new(RecordingChannel::new("slack"))).await;
    let id = user_id(&register_user(&server, "frank@example.com").await);
    let path = format!("/manage/{}/feeds", id);

    // Discovered title
    let response = server
        .post(&path)
        .form(&[("url", "https://blog.example.com/feed")])
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["data"]["name"], "Example Blog");

    // Explicit name
    let body: Value = server
        .post(&path)
        .form(&[("url", "https://news.example.org/rss"), ("name", "News")])
        .await
        .json();
    assert_eq!(body["data"]["name"], "News");

    // Unreachable feed falls back to its URL
    let body: Value = server
        .post(&path)
        .form(&[("url", "https://quiet.example.net/atom")])
        .await
        .json();
    assert_eq!(body["data"]["name"], "https://quiet.example.net/atom");

    // Same URL twice
    let response = server
        .post(&path)
        .form(&[("url", "https://news.example.org/rss"), ("name", "Again")])
        .await;
    response.assert_status(StatusCode::CONFLICT);

    let body: Value = server.get(&format!("/manage/{}", id)).await.json();
    assert_eq!(body["data"]["feeds"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_add_feed_rejects_private_address() {
    let server = default_server().await;
    let id = user_id(&register_user(&server, "gina@example.com").await);

    let response = server
        .post(&format!("/manage/{}/feeds", id))
        .form(&[("url", "http://127.0.0.1/feed")])
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_and_toggle_feed() {
    let server = default_server().await;
    let id = user_id(&register_user(&server, "hank@example.com").await);

    let body: Value = server.get(&format!("/manage/{}", id)).await.json();
    let feeds = body["data"]["feeds"].as_array().unwrap().clone();
    let first = feeds[0]["id"].as_i64().unwrap();
    let second = feeds[1]["id"].as_i64().unwrap();

    let response = server
        .post(&format!("/manage/{}/feeds/{}/toggle", id, first))
        .form(&[("active", "false")])
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["status"], "disabled");

    let response = server
        .post(&format!("/manage/{}/feeds/{}/delete", id, second))
        .await;
    response.assert_status_ok();

    let body: Value = server.get(&format!("/manage/{}", id)).await.json();
    let feeds = body["data"]["feeds"].as_array().unwrap();
    assert_eq!(feeds.len(), 1);
    assert_eq!(feeds[0]["id"], first);
    assert_eq!(feeds[0]["is_active"], false);

    // Already deleted
    let response = server
        .post(&format!("/manage/{}/feeds/{}/delete", id, second))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_feed_of_another_user_is_not_found() {
    let server = default_server().await;
    let owner = user_id(&register_user(&server, "ivy@example.com").await);
    let other = user_id(&register_user(&server, "jack@example.com").await);

    let body: Value = server.get(&format!("/manage/{}", owner)).await.json();
    let feed_id = body["data"]["feeds"][0]["id"].as_i64().unwrap();

    let response = server
        .post(&format!("/manage/{}/feeds/{}/delete", other, feed_id))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stats_and_unsubscribe() {
    let server = default_server().await;
    let id = user_id(&register_user(&server, "kate@example.com").await);
    register_user(&server, "liam@example.com").await;

    let body: Value = server.get("/stats").await.json();
    assert_eq!(body["data"]["total_active_users"], 2);

    server
        .post(&format!("/manage/{}/unsubscribe", id))
        .await
        .assert_status_ok();

    let body: Value = server.get("/stats").await.json();
    assert_eq!(body["data"]["total_active_users"], 1);
}

#[tokio::test]
async fn test_trigger_user_sends_digest() {
    let slack = Arc::new(RecordingChannel::new("slack"));
    let server = create_test_server(StaticFetcher::generating(3), slack.clone()).await;
    let id = user_id(&register_user(&server, "mia@example.com").await);

    let response = server.get(&format!("/trigger/{}", id)).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["user_id"], id.as_str());
    assert_eq!(body["data"]["outcome"]["status"], "sent");
    assert_eq!(body["data"]["outcome"]["articles"], 3);
    assert_eq!(body["data"]["outcome"]["delivered"][0], "slack");

    assert_eq!(slack.sent().len(), 1);

    let body: Value = server.get(&format!("/manage/{}", id)).await.json();
    assert!(body["data"]["user"]["last_digest_sent"].is_string());
}

#[tokio::test]
async fn test_trigger_unknown_user() {
    let server = default_server().await;

    let response = server.get("/trigger/nobody").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_trigger_all_reports_pass() {
    let server = default_server().await;
    register_user(&server, "noah@example.com").await;

    let response = server.get("/trigger").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["checked"], 1);
}
