// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session state: access token, API URL override and quick-login credentials.
//!
//! This is the only place that reads or writes these values, so token
//! invalidation has a single code path.

use super::{keys, SecureStore, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Credentials remembered for biometric/PIN quick login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCredentials {
    pub email: String,
    pub password: String,
}

/// Handle on the secure session state. Cheap to clone.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SecureStore>,
}

impl Session {
    pub fn new(store: Arc<dyn SecureStore>) -> Self {
        Self { store }
    }

    // ─── Access Token ────────────────────────────────────────────

    /// Current bearer token, if signed in.
    pub fn access_token(&self) -> Result<Option<String>, StoreError> {
        self.store.get(keys::ACCESS_TOKEN)
    }

    /// Replace the stored token. There is never more than one.
    pub fn set_access_token(&self, token: &str) -> Result<(), StoreError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(StoreError::InvalidValue("access token is empty".to_string()));
        }
        self.store.set(keys::ACCESS_TOKEN, token)?;
        tracing::info!("Access token stored");
        Ok(())
    }

    pub fn clear_access_token(&self) -> Result<(), StoreError> {
        self.store.delete(keys::ACCESS_TOKEN)?;
        tracing::info!("Access token cleared");
        Ok(())
    }

    pub fn is_signed_in(&self) -> Result<bool, StoreError> {
        Ok(self.access_token()?.is_some())
    }

    /// Sign out locally. Saved quick-login credentials are kept.
    pub fn sign_out(&self) -> Result<(), StoreError> {
        self.clear_access_token()
    }

    // ─── API URL Override ────────────────────────────────────────

    pub fn api_url_override(&self) -> Result<Option<String>, StoreError> {
        self.store.get(keys::API_URL_OVERRIDE)
    }

    /// Persist a runtime API base URL. Returns the normalized URL.
    pub fn set_api_url_override(&self, url: &str) -> Result<String, StoreError> {
        let normalized = normalize_base_url(url)?;
        self.store.set(keys::API_URL_OVERRIDE, &normalized)?;
        tracing::info!(url = %normalized, "API URL override stored");
        Ok(normalized)
    }

    pub fn clear_api_url_override(&self) -> Result<(), StoreError> {
        self.store.delete(keys::API_URL_OVERRIDE)
    }

    // ─── Quick Login ─────────────────────────────────────────────

    pub fn saved_credentials(&self) -> Result<Option<SavedCredentials>, StoreError> {
        self.store
            .get(keys::SAVED_CREDENTIALS)?
            .map(|raw| serde_json::from_str(&raw).map_err(StoreError::from))
            .transpose()
    }

    pub fn set_saved_credentials(&self, credentials: &SavedCredentials) -> Result<(), StoreError> {
        self.store
            .set(keys::SAVED_CREDENTIALS, &serde_json::to_string(credentials)?)
    }

    pub fn clear_saved_credentials(&self) -> Result<(), StoreError> {
        self.store.delete(keys::SAVED_CREDENTIALS)
    }
}

/// Validate an absolute http(s) URL and strip trailing slashes.
fn normalize_base_url(url: &str) -> Result<String, StoreError> {
    let trimmed = url.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(trimmed)
        .map_err(|e| StoreError::InvalidValue(format!("invalid URL {trimmed:?}: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(StoreError::InvalidValue(format!(
            "API URL must be an absolute http(s) URL, got {trimmed:?}"
        )));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn session() -> Session {
        Session::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_token_lifecycle() {
        let session = session();
        assert!(!session.is_signed_in().unwrap());

        session.set_access_token("first").unwrap();
        session.set_access_token("second").unwrap();
        assert_eq!(session.access_token().unwrap().as_deref(), Some("second"));

        session.sign_out().unwrap();
        assert_eq!(session.access_token().unwrap(), None);
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(session().set_access_token("   ").is_err());
    }

    #[test]
    fn test_api_url_override_normalized() {
        let session = session();
        let url = session
            .set_api_url_override(" https://staging.example.com/ ")
            .unwrap();
        assert_eq!(url, "https://staging.example.com");
        assert_eq!(
            session.api_url_override().unwrap().as_deref(),
            Some("https://staging.example.com")
        );

        session.clear_api_url_override().unwrap();
        assert_eq!(session.api_url_override().unwrap(), None);
    }

    #[test]
    fn test_api_url_override_rejects_garbage() {
        let session = session();
        assert!(session.set_api_url_override("not a url").is_err());
        assert!(session.set_api_url_override("ftp://example.com").is_err());
        assert_eq!(session.api_url_override().unwrap(), None);
    }

    #[test]
    fn test_saved_credentials_survive_sign_out() {
        let session = session();
        let creds = SavedCredentials {
            email: "sam@example.com".to_string(),
            password: "hunter22".to_string(),
        };
        session.set_saved_credentials(&creds).unwrap();
        session.set_access_token("tok").unwrap();
        session.sign_out().unwrap();

        assert_eq!(session.saved_credentials().unwrap(), Some(creds));
        session.clear_saved_credentials().unwrap();
        assert_eq!(session.saved_credentials().unwrap(), None);
    }
}
