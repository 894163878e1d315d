// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bounded log of recent failed requests for the diagnostics screen.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Default number of failures kept.
pub const DEFAULT_CAPACITY: usize = 20;

/// Maximum characters of response body kept per record.
pub const BODY_PREVIEW_CHARS: usize = 500;

/// One failed request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureRecord {
    pub method: String,
    pub endpoint: String,
    /// HTTP status, or 0 if no response was received
    pub status: u16,
    pub body: String,
    #[serde(serialize_with = "serialize_rfc3339")]
    pub recorded_at: DateTime<Utc>,
}

fn serialize_rfc3339<S: serde::Serializer>(
    date: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Fixed-capacity FIFO of failures; the oldest record is evicted first.
#[derive(Debug)]
pub struct DiagnosticsLog {
    capacity: usize,
    records: Mutex<VecDeque<FailureRecord>>,
}

impl Default for DiagnosticsLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl DiagnosticsLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<FailureRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn record(&self, method: &str, endpoint: &str, status: u16, body: &str) {
        let mut records = self.lock();
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(FailureRecord {
            method: method.to_string(),
            endpoint: endpoint.to_string(),
            status,
            body: truncate_chars(body, BODY_PREVIEW_CHARS),
            recorded_at: Utc::now(),
        });
    }

    /// Snapshot of all records, oldest first.
    pub fn records(&self) -> Vec<FailureRecord> {
        self.lock().iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<FailureRecord> {
        self.lock().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

/// Truncate to at most `max` characters, marking the cut with an ellipsis.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}
