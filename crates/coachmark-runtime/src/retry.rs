#![forbid(unsafe_code)]

//! Retry policies for anchor visibility probing.
//!
//! A [`RetryPolicy`] bounds how many times a missing anchor is re-checked and
//! how long to wait between checks. The default reproduces the classic
//! onboarding behaviour: 20 retries, 100 ms apart, for a ~2 s budget.
//!
//! Delays are pure functions of the retry number, with no jitter, so a
//! tick-driven session replays the same probe schedule every run.
//!
//! # Example
//!
//! ```
//! use coachmark_runtime::retry::{BackoffStrategy, RetryPolicy};
//! use web_time::Duration;
//!
//! // A slow list: wait 50, 100, 150 ms, then keep checking every 150 ms.
//! let policy = RetryPolicy::new(6, BackoffStrategy::Linear {
//!     base_ms: 50,
//!     max_ms: 150,
//! });
//!
//! assert_eq!(policy.delay(1), Duration::from_millis(100));
//! assert_eq!(policy.delay(4), Duration::from_millis(150));
//! assert_eq!(policy.total_max_delay(), Duration::from_millis(750));
//! ```

use web_time::Duration;

/// How the wait between visibility re-checks grows.
///
/// Serialized with an inline `kind` tag, e.g.
/// `{ kind = "linear", base_ms = 50, max_ms = 400 }`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "config-file",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case", tag = "kind")
)]
pub enum BackoffStrategy {
    /// Same wait before every re-check.
    Fixed { delay_ms: u64 },
    /// Wait doubles per re-check, starting at `base_ms`, never above `max_ms`.
    Exponential { base_ms: u64, max_ms: u64 },
    /// Wait grows by `base_ms` per re-check, never above `max_ms`.
    Linear { base_ms: u64, max_ms: u64 },
}

impl BackoffStrategy {
    /// Wait in milliseconds before re-check number `retry` (0 = first).
    fn wait_ms(&self, retry: u32) -> u64 {
        match *self {
            Self::Fixed { delay_ms } => delay_ms,
            Self::Exponential { base_ms, max_ms } => {
                let factor = 1u64.checked_shl(retry).unwrap_or(u64::MAX);
                base_ms.saturating_mul(factor).min(max_ms)
            }
            Self::Linear { base_ms, max_ms } => {
                base_ms.saturating_mul(u64::from(retry) + 1).min(max_ms)
            }
        }
    }
}

/// Bounds how long a missing anchor is waited for.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config-file", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct RetryPolicy {
    /// Re-checks after the initial one. Zero gives up on the first miss.
    pub max_retries: u32,
    pub backoff: BackoffStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(20, BackoffStrategy::Fixed { delay_ms: 100 })
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_retries: u32, backoff: BackoffStrategy) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Skip an anchor the first time it is missing.
    #[must_use]
    pub fn no_retry() -> Self {
        Self::new(0, BackoffStrategy::Fixed { delay_ms: 0 })
    }

    /// Wait before re-check number `retry`, counting from zero.
    #[must_use]
    pub fn delay(&self, retry: u32) -> Duration {
        Duration::from_millis(self.backoff.wait_ms(retry))
    }

    /// Total time spent waiting before an anchor is given up on.
    #[must_use]
    pub fn total_max_delay(&self) -> Duration {
        (0..self.max_retries).map(|i| self.delay(i)).sum()
    }

    /// Parameter problems, one message each. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        match self.backoff {
            BackoffStrategy::Fixed { .. } => {}
            BackoffStrategy::Exponential { base_ms, max_ms }
            | BackoffStrategy::Linear { base_ms, max_ms } => {
                if base_ms == 0 && self.max_retries > 0 {
                    errors.push("retry.backoff.base_ms must be > 0".into());
                }
                if max_ms < base_ms {
                    errors.push(format!(
                        "retry.backoff.max_ms ({max_ms}) must be >= base_ms ({base_ms})"
                    ));
                }
            }
        }
        errors
    }
}
