// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed wrappers for the backend endpoints used by the app.

use super::{ApiClient, Auth, Transport};
use crate::error::{ApiError, Result};
use crate::models::api::{
    AuthResponse, HealthResponse, LoginRequest, QaLoginRequest, RegistrationRequest,
    ResetPasswordRequest, ResetPasswordResponse, UserProfile, VersionResponse,
};
use crate::models::chat::{ChatRequest, ChatResponse};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

fn to_body<B: Serialize>(body: &B) -> Result<Option<Value>> {
    serde_json::to_value(body)
        .map(Some)
        .map_err(|e| ApiError::Decode(format!("Failed to encode request: {}", e)))
}

impl<T: Transport> ApiClient<T> {
    // ─── Auth ────────────────────────────────────────────────

    /// Sign in and store the returned token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let body = to_body(&LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        })?;
        let auth: AuthResponse = self
            .request_as(Method::POST, "/api/auth/login", body, Auth::Public)
            .await?;
        self.session.set_access_token(&auth.token)?;
        tracing::info!("Signed in");
        Ok(auth)
    }

    /// Create the account at the end of onboarding and store the returned token.
    pub async fn register(&self, registration: &RegistrationRequest) -> Result<AuthResponse> {
        let body = to_body(registration)?;
        let auth: AuthResponse = self
            .request_as(Method::POST, "/api/auth/register", body, Auth::Public)
            .await?;
        self.session.set_access_token(&auth.token)?;
        tracing::info!(coach = %registration.coach_id, "Registered");
        Ok(auth)
    }

    pub async fn reset_password(
        &self,
        reset_token: &str,
        new_password: &str,
    ) -> Result<ResetPasswordResponse> {
        let body = to_body(&ResetPasswordRequest {
            token: reset_token.to_string(),
            new_password: new_password.to_string(),
        })?;
        let endpoint = "/api/auth/reset-password";
        let (raw, json) = self
            .send_request(Method::POST, endpoint, body, Auth::Public)
            .await?;
        let response: ResetPasswordResponse = self.decode(&Method::POST, endpoint, &raw, json)?;

        // Some deployments answer 2xx with { ok: false, error }.
        if response.ok == Some(false) {
            self.diagnostics
                .record(Method::POST.as_str(), endpoint, raw.status, &raw.body);
            return Err(ApiError::Api {
                status: raw.status,
                message: response
                    .error
                    .unwrap_or_else(|| "Password reset failed".to_string()),
            });
        }
        Ok(response)
    }

    /// Development-only login as a test account.
    pub async fn qa_login_as(&self, email: &str) -> Result<AuthResponse> {
        if !self.config.qa_login_enabled {
            return Err(ApiError::Disabled("QA login"));
        }
        let body = to_body(&QaLoginRequest {
            email: email.trim().to_string(),
        })?;
        let auth: AuthResponse = self
            .request_as(Method::POST, "/api/qa/login-as", body, Auth::Public)
            .await?;
        self.session.set_access_token(&auth.token)?;
        tracing::info!(email, "Signed in via QA login");
        Ok(auth)
    }

    /// Sign out locally.
    pub fn logout(&self) -> Result<()> {
        self.session.sign_out()?;
        Ok(())
    }

    pub async fn me(&self) -> Result<UserProfile> {
        self.request_as(Method::GET, "/api/auth/me", None, Auth::Required)
            .await
    }

    // ─── Coach ───────────────────────────────────────────────

    pub async fn coach_chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let body = to_body(request)?;
        self.request_as(Method::POST, "/api/coach/chat", body, Auth::Required)
            .await
    }

    // ─── Workouts & Stats ────────────────────────────────────

    pub async fn workout_summary(&self, workout_id: &str) -> Result<Value> {
        let endpoint = format!(
            "/api/stats/workout-summary/{}",
            urlencoding::encode(workout_id)
        );
        self.get(&endpoint, Auth::Required).await
    }

    pub async fn favorites(&self) -> Result<Value> {
        self.get("/api/stats/favorites", Auth::Required).await
    }

    /// Make sure the user has a generated workout plan.
    pub async fn ensure_plan(&self) -> Result<Value> {
        self.post("/api/workouts/plan/ensure", None, Auth::Required)
            .await
    }

    // ─── Operational ─────────────────────────────────────────

    pub async fn health(&self) -> Result<HealthResponse> {
        self.request_as(Method::GET, "/api/health", None, Auth::Public)
            .await
    }

    pub async fn version(&self) -> Result<VersionResponse> {
        self.request_as(Method::GET, "/api/version", None, Auth::Public)
            .await
    }

    /// Server-side diagnostics report.
    pub async fn server_diagnostics(&self) -> Result<Value> {
        self.get("/api/diagnostics", Auth::Public).await
    }
}
