#![forbid(unsafe_code)]

//! Session diagnostics.
//!
//! The engine records a [`SessionEvent`] for every observable transition and
//! keeps running [`SessionStats`]. Events are buffered until the host drains
//! them; stats persist across sessions on the same engine.

use coachmark_core::{AnchorId, Error};
use web_time::Duration;

use crate::dismissal::DismissCause;
use crate::host::AnnotationId;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionCause {
    /// Every target was presented or skipped.
    Exhausted,
    /// The host called `cancel()`.
    Cancelled,
    /// The container reference was missing or dropped.
    ContainerGone,
}

impl CompletionCause {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exhausted => "exhausted",
            Self::Cancelled => "cancelled",
            Self::ContainerGone => "container_gone",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// `fire_targets` started a session.
    Fired { queued: usize },
    TargetShown {
        anchor: AnchorId,
        id: AnnotationId,
    },
    RetryScheduled {
        anchor: AnchorId,
        attempt: u32,
        delay: Duration,
    },
    /// The target was dropped without being shown.
    TargetSkipped { anchor: AnchorId, error: Error },
    TargetDismissed {
        anchor: AnchorId,
        cause: DismissCause,
    },
    Completed { cause: CompletionCause },
}

impl SessionEvent {
    /// Stable label for logs and assertions.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Fired { .. } => "fired",
            Self::TargetShown { .. } => "target_shown",
            Self::RetryScheduled { .. } => "retry_scheduled",
            Self::TargetSkipped { .. } => "target_skipped",
            Self::TargetDismissed { .. } => "target_dismissed",
            Self::Completed { .. } => "completed",
        }
    }
}

/// Cumulative counters across all sessions of one engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub sessions: u64,
    pub shown: u64,
    pub skipped_timeout: u64,
    pub skipped_configuration: u64,
    pub retries: u64,
    pub dismissed_timer: u64,
    pub dismissed_tap: u64,
    pub dismissed_proceed: u64,
    pub dismissed_immediate: u64,
    pub completions: u64,
    pub cancellations: u64,
}

impl SessionStats {
    /// Total targets that advanced after being shown.
    #[must_use]
    pub fn dismissed(&self) -> u64 {
        self.dismissed_timer + self.dismissed_tap + self.dismissed_proceed + self.dismissed_immediate
    }

    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped_timeout + self.skipped_configuration
    }

    pub(crate) fn record(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Fired { .. } => self.sessions += 1,
            SessionEvent::TargetShown { .. } => self.shown += 1,
            SessionEvent::RetryScheduled { .. } => self.retries += 1,
            SessionEvent::TargetSkipped { error, .. } => match error {
                Error::VisibilityTimeout { .. } => self.skipped_timeout += 1,
                Error::Configuration(_) | Error::Precondition(_) => {
                    self.skipped_configuration += 1;
                }
            },
            SessionEvent::TargetDismissed { cause, .. } => match cause {
                DismissCause::Timer => self.dismissed_timer += 1,
                DismissCause::Tap => self.dismissed_tap += 1,
                DismissCause::Proceed => self.dismissed_proceed += 1,
                DismissCause::Immediate => self.dismissed_immediate += 1,
            },
            SessionEvent::Completed { cause } => {
                self.completions += 1;
                if *cause == CompletionCause::Cancelled {
                    self.cancellations += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coachmark_core::ConfigurationError;

    #[test]
    fn stats_count_by_kind() {
        let mut stats = SessionStats::default();
        let anchor = AnchorId::new("a");
        let events = [
            SessionEvent::Fired { queued: 3 },
            SessionEvent::RetryScheduled {
                anchor: anchor.clone(),
                attempt: 1,
                delay: Duration::from_millis(100),
            },
            SessionEvent::TargetShown {
                anchor: anchor.clone(),
                id: AnnotationId(0),
            },
            SessionEvent::TargetDismissed {
                anchor: anchor.clone(),
                cause: DismissCause::Tap,
            },
            SessionEvent::TargetSkipped {
                anchor: anchor.clone(),
                error: Error::VisibilityTimeout {
                    anchor: anchor.clone(),
                    attempts: 20,
                },
            },
            SessionEvent::TargetSkipped {
                anchor: anchor.clone(),
                error: ConfigurationError::NonFiniteMargin { field: "margins" }.into(),
            },
            SessionEvent::Completed {
                cause: CompletionCause::Cancelled,
            },
        ];
        for e in &events {
            stats.record(e);
        }
        assert_eq!(stats.sessions, 1);
        assert_eq!(stats.shown, 1);
        assert_eq!(stats.retries, 1);
        assert_eq!(stats.dismissed(), 1);
        assert_eq!(stats.dismissed_tap, 1);
        assert_eq!(stats.skipped(), 2);
        assert_eq!(stats.completions, 1);
        assert_eq!(stats.cancellations, 1);
    }

    #[test]
    fn kinds_are_stable() {
        assert_eq!(SessionEvent::Fired { queued: 0 }.kind(), "fired");
        assert_eq!(
            SessionEvent::Completed {
                cause: CompletionCause::Exhausted
            }
            .kind(),
            "completed"
        );
        assert_eq!(CompletionCause::ContainerGone.as_str(), "container_gone");
    }
}
