// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Secure key/value storage for session state.
//!
//! Only [`Session`] talks to a [`SecureStore`] directly; the rest of the
//! crate reads and writes tokens and overrides through it.

pub mod memory;
pub mod sealed_file;
pub mod session;

pub use memory::MemoryStore;
pub use sealed_file::SealedFileStore;
pub use session::{SavedCredentials, Session};

/// Storage keys used by the client.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "auth.access_token";
    pub const API_URL_OVERRIDE: &str = "env.api_url_override";
    pub const SAVED_CREDENTIALS: &str = "auth.saved_credentials";
}

/// Platform secure storage primitive.
pub trait SecureStore: Send + Sync {
    /// Read a value, returning None if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any existing one.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage crypto error: {0}")]
    Crypto(String),

    #[error("Corrupt storage entry: {0}")]
    Corrupt(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
