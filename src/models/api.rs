//! Request and response bodies for the coaching backend.

use super::coach::CoachId;
use super::onboarding::OnboardingAnswers;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─── Auth ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration payload built from a completed onboarding.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
    pub coach_id: CoachId,
    pub profile: OnboardingAnswers,
}

/// Token-bearing response from login, registration and QA login.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetPasswordResponse {
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QaLoginRequest {
    pub email: String,
}

/// Signed-in user as returned by `/api/auth/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub coach: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Assigned coach, defaulting unknown ids.
    pub fn coach_id(&self) -> Option<CoachId> {
        self.coach.as_deref().map(CoachId::parse_or_default)
    }
}

// ─── Operational ─────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    pub version: String,
    #[serde(default)]
    pub build_id: Option<String>,
}
