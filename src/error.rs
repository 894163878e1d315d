// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types.
//!
//! Every ordinary failure of an API call is a value of [`ApiError`]; callers
//! match on it instead of relying on panics.

use crate::storage::StoreError;

/// Error returned by every [`crate::ApiClient`] call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("API base URL is not configured")]
    NotConfigured,

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("{0} is disabled in this build")]
    Disabled(&'static str),

    #[error("Network request failed: {0}")]
    Transport(String),

    #[error("Server returned a non-JSON response (HTTP {status}): {body}")]
    NonJson { status: u16, body: String },

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response shape: {0}")]
    Decode(String),

    #[error("Secure storage error: {0}")]
    Storage(#[from] StoreError),
}

impl ApiError {
    /// Message shown when the backend rejects the session.
    pub const SESSION_EXPIRED: &'static str = "Your session has expired. Please sign in again.";

    /// HTTP status associated with the failure, or 0 when no response was received.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::NonJson { status, .. } | ApiError::Api { status, .. } => *status,
            ApiError::Unauthorized { .. } => 401,
            ApiError::NotConfigured
            | ApiError::NotAuthenticated
            | ApiError::Disabled(_)
            | ApiError::Transport(_)
            | ApiError::Decode(_)
            | ApiError::Storage(_) => 0,
        }
    }

    /// Whether the caller should send the user back to the login screen.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. } | ApiError::NotAuthenticated)
    }

    /// Whether retrying the same call later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Result type alias for client calls
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_zero_without_response() {
        assert_eq!(ApiError::NotConfigured.status(), 0);
        assert_eq!(ApiError::NotAuthenticated.status(), 0);
        assert_eq!(ApiError::Transport("refused".to_string()).status(), 0);
    }

    #[test]
    fn test_status_from_response() {
        let err = ApiError::Api {
            status: 422,
            message: "Email already registered".to_string(),
        };
        assert_eq!(err.status(), 422);
        assert_eq!(err.to_string(), "Email already registered");

        let err = ApiError::Unauthorized {
            message: ApiError::SESSION_EXPIRED.to_string(),
        };
        assert_eq!(err.status(), 401);
        assert!(err.is_auth_error());
    }

    #[test]
    fn test_is_transient() {
        assert!(ApiError::Transport("reset".to_string()).is_transient());
        assert!(ApiError::Api {
            status: 503,
            message: String::new()
        }
        .is_transient());
        assert!(!ApiError::Api {
            status: 400,
            message: String::new()
        }
        .is_transient());
        assert!(!ApiError::NotConfigured.is_transient());
    }
}
