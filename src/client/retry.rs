//! Retry policy for transport failures.
//!
//! Only transport failures are retried. HTTP error statuses are returned to
//! the caller as-is.

use std::time::Duration;

const DEFAULT_MAX_ATTEMPTS: u32 = 2;
const DEFAULT_DELAY_MS: u64 = 1500;

/// How many times to attempt a request and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Fixed delay before each retry
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// One retry after `delay`.
    pub fn single_retry(delay: Duration) -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay,
        }
    }

    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter(Duration),
    GiveUp,
}

/// Attempt counter for one logical request.
#[derive(Debug, Clone)]
pub struct RetryState {
    policy: RetryPolicy,
    failures: u32,
}

impl RetryState {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            failures: 0,
        }
    }

    /// Number of failed attempts so far.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Record a failed attempt and decide whether to try again.
    pub fn record_failure(&mut self) -> RetryDecision {
        self.failures += 1;
        if self.failures < self.policy.max_attempts.max(1) {
            RetryDecision::RetryAfter(self.policy.delay)
        } else {
            RetryDecision::GiveUp
        }
    }
}
