// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use fitcoach_client::client::{
    ApiClient, HttpRequest, HttpResponse, SessionEvents, Transport, TransportError,
};
use fitcoach_client::config::Config;
use fitcoach_client::storage::{MemoryStore, Session};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Token the mock backend accepts.
#[allow(dead_code)]
pub const GOOD_TOKEN: &str = "good-token";

// ─── Scripted transport ──────────────────────────────────────

#[derive(Default)]
struct ScriptInner {
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

/// Transport that replays canned results and records every request.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<ScriptInner>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new(script: Vec<Result<HttpResponse, TransportError>>) -> Self {
        let transport = Self::default();
        transport.inner.script.lock().unwrap().extend(script);
        transport
    }

    pub fn calls(&self) -> usize {
        self.inner.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.inner.requests.lock().unwrap().push(request.clone());
        let next = self.inner.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(TransportError("script exhausted".to_string())))
    }
}

#[allow(dead_code)]
pub fn json_response(status: u16, body: Value) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse {
        status,
        body: body.to_string(),
    })
}

#[allow(dead_code)]
pub fn raw_response(status: u16, body: &str) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse {
        status,
        body: body.to_string(),
    })
}

#[allow(dead_code)]
pub fn network_error() -> Result<HttpResponse, TransportError> {
    Err(TransportError("connection reset by peer".to_string()))
}

// ─── Session events ──────────────────────────────────────────

/// Counts session-expired notifications.
#[derive(Default)]
pub struct RecordingEvents {
    expired: AtomicUsize,
    last_message: Mutex<Option<String>>,
}

#[allow(dead_code)]
impl RecordingEvents {
    pub fn expired_count(&self) -> usize {
        self.expired.load(Ordering::SeqCst)
    }

    pub fn last_message(&self) -> Option<String> {
        self.last_message.lock().unwrap().clone()
    }
}

impl SessionEvents for RecordingEvents {
    fn session_expired(&self, message: &str) {
        self.expired.fetch_add(1, Ordering::SeqCst);
        *self.last_message.lock().unwrap() = Some(message.to_string());
    }
}

// ─── Client builders ─────────────────────────────────────────

/// Everything a client test needs to inspect.
#[allow(dead_code)]
pub struct TestClient {
    pub client: ApiClient<ScriptedTransport>,
    pub transport: ScriptedTransport,
    pub events: Arc<RecordingEvents>,
    pub session: Session,
}

/// Client over a scripted transport with an in-memory session.
#[allow(dead_code)]
pub fn scripted_client(
    config: Config,
    script: Vec<Result<HttpResponse, TransportError>>,
) -> TestClient {
    let transport = ScriptedTransport::new(script);
    let session = Session::new(Arc::new(MemoryStore::new()));
    let events = Arc::new(RecordingEvents::default());
    let client = ApiClient::new(transport.clone(), config, session.clone())
        .with_events(events.clone());

    TestClient {
        client,
        transport,
        events,
        session,
    }
}

// ─── Mock backend ────────────────────────────────────────────

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

async fn me(headers: HeaderMap) -> Response {
    if bearer(&headers) != Some(GOOD_TOKEN) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid token" })),
        )
            .into_response();
    }
    Json(json!({ "email": "sam@example.com", "name": "Sam", "coach": "sofia" })).into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "correct horse" {
        return Json(json!({ "token": GOOD_TOKEN })).into_response();
    }
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Invalid email or password" })),
    )
        .into_response()
}

async fn workout_summary(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if bearer(&headers).is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({ "id": id, "exercises": 6 })).into_response()
}

/// Serve a mock backend on a loopback port and return its base URL.
#[allow(dead_code)]
pub async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/api/health", get(|| async { Json(json!({ "status": "ok", "db": "up" })) }))
        .route(
            "/api/version",
            get(|| async { Json(json!({ "version": "2.4.1", "buildId": "abc123" })) }),
        )
        .route(
            "/api/maintenance",
            get(|| async { Html("<html><body>Down for maintenance</body></html>") }),
        )
        .route("/api/auth/me", get(me))
        .route("/api/auth/login", post(login))
        .route("/api/stats/workout-summary/{id}", get(workout_summary));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Base URL of a port nothing listens on.
#[allow(dead_code)]
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
