// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end tests of the reqwest transport against a loopback backend.

mod common;

use common::{closed_port_url, spawn_backend, RecordingEvents, GOOD_TOKEN};
use fitcoach_client::client::{Auth, RetryPolicy};
use fitcoach_client::storage::{MemoryStore, Session};
use fitcoach_client::{ApiClient, ApiError, Config};
use std::sync::Arc;
use std::time::Duration;

fn client_for(base_url: String) -> (ApiClient, Session, Arc<RecordingEvents>) {
    let config = Config {
        api_base_url: Some(base_url),
        ..Config::test_default()
    };
    let session = Session::new(Arc::new(MemoryStore::new()));
    let events = Arc::new(RecordingEvents::default());
    let client = ApiClient::from_config(config, session.clone())
        .expect("Failed to build client")
        .with_events(events.clone())
        .with_retry_policy(RetryPolicy::single_retry(Duration::from_millis(10)));
    (client, session, events)
}

#[tokio::test]
async fn test_health_and_version() {
    let (client, _, _) = client_for(spawn_backend().await);

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.extra["db"], "up");

    let version = client.version().await.unwrap();
    assert_eq!(version.version, "2.4.1");
    assert_eq!(version.build_id.as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_html_page_is_non_json_error() {
    let (client, _, _) = client_for(spawn_backend().await);

    let err = client.get("/api/maintenance", Auth::Public).await.unwrap_err();

    assert!(matches!(err, ApiError::NonJson { status: 200, .. }));
    assert!(err.to_string().contains("Down for maintenance"));
    assert_eq!(client.diagnostics().len(), 1);
}

#[tokio::test]
async fn test_login_then_me() {
    let (client, session, events) = client_for(spawn_backend().await);

    client.login("sam@example.com", "correct horse").await.unwrap();
    assert_eq!(session.access_token().unwrap().as_deref(), Some(GOOD_TOKEN));

    let me = client.me().await.unwrap();
    assert_eq!(me.email, "sam@example.com");
    assert_eq!(me.name.as_deref(), Some("Sam"));
    assert_eq!(events.expired_count(), 0);
}

#[tokio::test]
async fn test_bad_password_message() {
    let (client, session, _) = client_for(spawn_backend().await);

    let err = client.login("sam@example.com", "nope").await.unwrap_err();

    assert_eq!(err.status(), 400);
    assert_eq!(err.to_string(), "Invalid email or password");
    assert!(!session.is_signed_in().unwrap());
}

#[tokio::test]
async fn test_rejected_token_expires_session() {
    let (client, session, events) = client_for(spawn_backend().await);
    session.set_access_token("revoked").unwrap();

    let err = client.me().await.unwrap_err();

    assert_eq!(err.status(), 401);
    assert!(!session.is_signed_in().unwrap());
    assert_eq!(events.expired_count(), 1);
    assert_eq!(client.diagnostics().latest().unwrap().status, 401);
}

#[tokio::test]
async fn test_path_segment_round_trips() {
    let (client, session, _) = client_for(spawn_backend().await);
    session.set_access_token(GOOD_TOKEN).unwrap();

    let summary = client.workout_summary("abc 123").await.unwrap();

    assert_eq!(summary["id"], "abc 123");
}

#[tokio::test]
async fn test_unknown_route_is_api_error() {
    let (client, _, _) = client_for(spawn_backend().await);

    let err = client.server_diagnostics().await.unwrap_err();

    // axum answers unknown routes with an empty 404 body.
    assert_eq!(err.status(), 404);
    assert_eq!(err.to_string(), "Request failed with status 404");
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let (client, _, _) = client_for(closed_port_url().await);

    let err = client.health().await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status(), 0);
    let record = client.diagnostics().latest().unwrap();
    assert_eq!(record.status, 0);
    assert_eq!(record.method, "GET");
}
