// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API client for the coaching backend.
//!
//! Handles:
//! - Base URL resolution (runtime override, then environment)
//! - Bearer token attachment from the secure session
//! - One retry on transport failure
//! - Forced sign-out on 401
//! - A bounded log of failed requests for the diagnostics screen
//!
//! Every call returns `Result<_, ApiError>`; ordinary failures never panic.

pub mod diagnostics;
pub mod endpoints;
pub mod retry;
pub mod transport;

pub use diagnostics::{DiagnosticsLog, FailureRecord};
pub use retry::{RetryDecision, RetryPolicy, RetryState};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::storage::{Session, StoreError};
use diagnostics::truncate_chars;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Characters of a non-JSON body surfaced in the error itself.
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

/// Reaction to a rejected session: show an alert and go to the login screen.
pub trait SessionEvents: Send + Sync {
    fn session_expired(&self, message: &str);
}

/// Events sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEvents;

impl SessionEvents for NoopEvents {
    fn session_expired(&self, _message: &str) {}
}

/// Where the API base URL came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseUrl {
    Override(String),
    Environment(String),
    Missing,
}

impl BaseUrl {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            BaseUrl::Override(url) | BaseUrl::Environment(url) => Some(url),
            BaseUrl::Missing => None,
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            BaseUrl::Override(_) => "override",
            BaseUrl::Environment(_) => "environment",
            BaseUrl::Missing => "missing",
        }
    }
}

/// Whether an endpoint needs a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Token attached if present
    Public,
    /// Fails fast without a token
    Required,
}

/// Client for the coaching backend.
pub struct ApiClient<T: Transport = ReqwestTransport> {
    transport: T,
    config: Config,
    session: Session,
    retry_policy: RetryPolicy,
    diagnostics: Arc<DiagnosticsLog>,
    events: Arc<dyn SessionEvents>,
}

impl ApiClient<ReqwestTransport> {
    /// Create a client using `reqwest` with the configured timeout.
    pub fn from_config(config: Config, session: Session) -> Result<Self> {
        let transport = ReqwestTransport::new(config.request_timeout)
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self::new(transport, config, session))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, config: Config, session: Session) -> Self {
        let retry_policy = RetryPolicy::single_retry(config.retry_delay);
        let diagnostics = Arc::new(DiagnosticsLog::new(config.diagnostics_capacity));
        Self {
            transport,
            config,
            session,
            retry_policy,
            diagnostics,
            events: Arc::new(NoopEvents),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn SessionEvents>) -> Self {
        self.events = events;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn diagnostics(&self) -> &DiagnosticsLog {
        &self.diagnostics
    }

    /// Shared handle on the diagnostics log (for a debug screen).
    pub fn diagnostics_handle(&self) -> Arc<DiagnosticsLog> {
        self.diagnostics.clone()
    }

    /// Resolve the base URL: runtime override, then environment.
    pub fn base_url(&self) -> std::result::Result<BaseUrl, StoreError> {
        if let Some(url) = self.session.api_url_override()? {
            return Ok(BaseUrl::Override(url));
        }
        Ok(match &self.config.api_base_url {
            Some(url) => BaseUrl::Environment(url.clone()),
            None => BaseUrl::Missing,
        })
    }

    pub async fn get(&self, endpoint: &str, auth: Auth) -> Result<Value> {
        self.request(Method::GET, endpoint, None, auth).await
    }

    pub async fn post(&self, endpoint: &str, body: Option<Value>, auth: Auth) -> Result<Value> {
        self.request(Method::POST, endpoint, body, auth).await
    }

    /// Perform a request and decode the JSON response into `R`.
    pub async fn request_as<R: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        auth: Auth,
    ) -> Result<R> {
        let (response, json) = self.send_request(method.clone(), endpoint, body, auth).await?;
        self.decode(&method, endpoint, &response, json)
    }

    /// Perform a request against the backend.
    ///
    /// Returns the parsed JSON body of a 2xx response (`Value::Null` for an
    /// empty body). See [`ApiError`] for the failure cases.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        auth: Auth,
    ) -> Result<Value> {
        let (_, json) = self.send_request(method, endpoint, body, auth).await?;
        Ok(json)
    }

    /// Run the request contract, keeping the raw response for diagnostics.
    async fn send_request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        auth: Auth,
    ) -> Result<(HttpResponse, Value)> {
        let base = match self.base_url()? {
            BaseUrl::Missing => {
                tracing::warn!(endpoint, "API base URL not configured");
                return Err(ApiError::NotConfigured);
            }
            resolved => resolved,
        };
        let base = base.as_str().unwrap_or_default();

        let token = self.session.access_token()?;
        if auth == Auth::Required && token.is_none() {
            tracing::debug!(endpoint, "Skipping authenticated request without token");
            return Err(ApiError::NotAuthenticated);
        }

        let mut headers = vec![
            ("Content-Type", "application/json".to_string()),
            ("Accept", "application/json".to_string()),
        ];
        if let Some(token) = &token {
            headers.push(("Authorization", format!("Bearer {}", token)));
        }

        let request = HttpRequest {
            method: method.clone(),
            url: join_url(base, endpoint),
            headers,
            body,
        };

        tracing::debug!(method = %method, endpoint, "API request");
        let response = self.send_with_retry(&request, endpoint).await?;
        let json = self.handle_response(&method, endpoint, &response)?;
        Ok((response, json))
    }

    /// Decode a 2xx body into `R`; a shape mismatch is logged as a failure.
    fn decode<R: DeserializeOwned>(
        &self,
        method: &Method,
        endpoint: &str,
        response: &HttpResponse,
        json: Value,
    ) -> Result<R> {
        serde_json::from_value(json).map_err(|e| {
            tracing::warn!(
                endpoint,
                status = response.status,
                error = %e,
                "Unexpected response shape"
            );
            self.diagnostics
                .record(method.as_str(), endpoint, response.status, &response.body);
            ApiError::Decode(e.to_string())
        })
    }

    async fn send_with_retry(&self, request: &HttpRequest, endpoint: &str) -> Result<HttpResponse> {
        let mut retry = RetryState::new(self.retry_policy);
        loop {
            match self.transport.send(request).await {
                Ok(response) => return Ok(response),
                Err(err) => match retry.record_failure() {
                    RetryDecision::RetryAfter(delay) => {
                        tracing::warn!(
                            endpoint,
                            attempt = retry.failures(),
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "Network error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    RetryDecision::GiveUp => {
                        tracing::warn!(
                            endpoint,
                            attempts = retry.failures(),
                            error = %err,
                            "Network error, giving up"
                        );
                        self.diagnostics
                            .record(request.method.as_str(), endpoint, 0, &err.0);
                        return Err(ApiError::Transport(err.0));
                    }
                },
            }
        }
    }

    fn handle_response(
        &self,
        method: &Method,
        endpoint: &str,
        response: &HttpResponse,
    ) -> Result<Value> {
        let status = response.status;

        if status == 401 {
            self.diagnostics
                .record(method.as_str(), endpoint, status, &response.body);
            let message = serde_json::from_str::<Value>(&response.body)
                .ok()
                .as_ref()
                .and_then(server_message);
            return Err(self.expire_session(endpoint, message));
        }

        let json = if response.body.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str::<Value>(&response.body) {
                Ok(json) => json,
                Err(_) => {
                    tracing::warn!(endpoint, status, "Non-JSON response from API");
                    self.diagnostics
                        .record(method.as_str(), endpoint, status, &response.body);
                    return Err(ApiError::NonJson {
                        status,
                        body: truncate_chars(&response.body, ERROR_BODY_PREVIEW_CHARS),
                    });
                }
            }
        };

        if !(200..300).contains(&status) {
            self.diagnostics
                .record(method.as_str(), endpoint, status, &response.body);
            let message = server_message(&json)
                .unwrap_or_else(|| format!("Request failed with status {}", status));
            tracing::debug!(endpoint, status, error = %message, "API error response");
            return Err(ApiError::Api { status, message });
        }

        Ok(json)
    }

    /// Drop the token and tell the UI to send the user to login.
    ///
    /// The returned error carries the server's message when it sent one.
    fn expire_session(&self, endpoint: &str, message: Option<String>) -> ApiError {
        tracing::warn!(endpoint, "Session rejected (401), signing out");
        if let Err(e) = self.session.clear_access_token() {
            tracing::error!(error = %e, "Failed to clear access token after 401");
        }
        self.events.session_expired(ApiError::SESSION_EXPIRED);
        ApiError::Unauthorized {
            message: message.unwrap_or_else(|| ApiError::SESSION_EXPIRED.to_string()),
        }
    }
}

fn join_url(base: &str, endpoint: &str) -> String {
    let base = base.trim_end_matches('/');
    if endpoint.starts_with('/') {
        format!("{}{}", base, endpoint)
    } else {
        format!("{}/{}", base, endpoint)
    }
}

/// Error text from a `{ "error": ... }` or `{ "message": ... }` body.
///
/// `message` is used whenever `error` holds no usable text.
fn server_message(json: &Value) -> Option<String> {
    ["error", "message"].into_iter().find_map(|key| {
        let text = match json.get(key)? {
            Value::String(s) => s.as_str(),
            Value::Object(obj) => obj.get("message").and_then(Value::as_str)?,
            _ => return None,
        };
        (!text.trim().is_empty()).then(|| text.to_string())
    })
}
