// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! FitCoach client core.
//!
//! This crate holds the non-UI parts of the FitCoach app: the API client
//! used by every screen, the secure session store, the onboarding wizard
//! and the coach matcher that runs at the end of onboarding.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use client::{ApiClient, BaseUrl, ReqwestTransport};
pub use config::Config;
pub use error::{ApiError, Result};
pub use storage::Session;
