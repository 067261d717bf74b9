#![forbid(unsafe_code)]

//! Anchor visibility with bounded retries.
//!
//! Hosts sometimes attach an anchor a few frames after the session starts.
//! [`VisibilityProbe::check`] looks once and, if the anchor is missing, says
//! whether to try again (and after how long) or give up. The probe never
//! schedules anything itself; the engine turns a [`ProbeOutcome::Retry`] into
//! a deferred wake.
//!
//! # Invariants
//!
//! 1. At most `1 + max_retries` checks per target.
//! 2. [`RetryState`] is zero after every `Visible` or `Exhausted` outcome.

use coachmark_core::{AnchorId, Rect};
use web_time::Duration;

use crate::host::AnchorResolver;
use crate::retry::RetryPolicy;

/// Failed checks for the current target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryState {
    attempts: u32,
}

impl RetryState {
    #[inline]
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}

/// Result of one visibility check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeOutcome {
    /// The anchor is on screen at this frame.
    Visible(Rect),
    /// Check again after `delay`. `attempt` counts retries so far (1-based).
    Retry { attempt: u32, delay: Duration },
    /// The retry budget is spent.
    Exhausted { attempts: u32 },
}

#[derive(Debug)]
pub struct VisibilityProbe<R> {
    resolver: R,
    policy: RetryPolicy,
    state: RetryState,
}

impl<R: AnchorResolver> VisibilityProbe<R> {
    pub fn new(resolver: R, policy: RetryPolicy) -> Self {
        Self {
            resolver,
            policy,
            state: RetryState::default(),
        }
    }

    /// Whether the anchor resolves right now. Does not touch the retry state.
    #[must_use]
    pub fn is_visible(&self, anchor: &AnchorId) -> bool {
        self.resolver.resolve(anchor).is_some()
    }

    /// Probe once and advance the retry state.
    pub fn check(&mut self, anchor: &AnchorId) -> ProbeOutcome {
        if let Some(rect) = self.resolver.resolve(anchor) {
            self.state.reset();
            return ProbeOutcome::Visible(rect);
        }

        if self.state.attempts < self.policy.max_retries {
            let delay = self.policy.delay(self.state.attempts);
            self.state.attempts += 1;
            tracing::trace!(
                target: "coachmark.probe",
                anchor = %anchor,
                attempt = self.state.attempts,
                delay_ms = delay.as_millis() as u64,
                "anchor not visible, retrying"
            );
            ProbeOutcome::Retry {
                attempt: self.state.attempts,
                delay,
            }
        } else {
            let attempts = self.state.attempts;
            self.state.reset();
            ProbeOutcome::Exhausted { attempts }
        }
    }

    /// Forget failed checks, e.g. when the target is skipped for another reason.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    #[must_use]
    pub fn state(&self) -> RetryState {
        self.state
    }

    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    #[must_use]
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut R {
        &mut self.resolver
    }
}
