use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::capabilities::FetchError;

pub const DEFAULT_MAX_RETRIES: u32 = 4;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 10_000;

/// Fixed-delay retry for the user-id list.
///
/// Only failures that [`FetchError::is_retryable`] are retried; client errors
/// and unparseable bodies surface on the first attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter(Duration),
    GiveUp,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    #[must_use]
    pub fn decide(&self, error: &FetchError, retries_remaining: u32) -> RetryDecision {
        if error.is_retryable() && retries_remaining > 0 {
            RetryDecision::RetryAfter(self.delay())
        } else {
            RetryDecision::GiveUp
        }
    }
}
