#![forbid(unsafe_code)]

//! When a presented target advances.
//!
//! Each presentation gets a [`DismissalController`] carrying a token. Timer
//! and immediate wakes carry the same token; a wake whose token does not match
//! the current controller belongs to an earlier presentation and is ignored.
//!
//! # Invariants
//!
//! 1. A controller settles at most once: the first qualifying trigger wins.
//! 2. Break-point targets never settle from a timer, even when a duration is
//!    configured.
//! 3. Taps settle only tappable or break-point targets.

use coachmark_core::Target;
use web_time::Duration;

/// The automatic advance rule for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissalTrigger {
    /// Break-point: wait for `proceed()` or a tap.
    Manual,
    /// Advance after the duration elapses.
    Timer(Duration),
    /// Advance on the next deferred turn.
    Immediate,
}

impl DismissalTrigger {
    #[must_use]
    pub fn for_target(target: &Target) -> Self {
        if target.break_point {
            Self::Manual
        } else if let Some(duration) = target.duration {
            Self::Timer(duration)
        } else {
            Self::Immediate
        }
    }
}

/// Why a target advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DismissCause {
    Timer,
    Tap,
    Proceed,
    Immediate,
}

impl DismissCause {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timer => "timer",
            Self::Tap => "tap",
            Self::Proceed => "proceed",
            Self::Immediate => "immediate",
        }
    }
}

/// Dismissal state for one presentation.
#[derive(Debug, Clone)]
pub struct DismissalController {
    token: u64,
    trigger: DismissalTrigger,
    tappable: bool,
    settled: bool,
}

impl DismissalController {
    #[must_use]
    pub fn new(token: u64, target: &Target) -> Self {
        Self {
            token,
            trigger: DismissalTrigger::for_target(target),
            tappable: target.tappable,
            settled: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn token(&self) -> u64 {
        self.token
    }

    #[inline]
    #[must_use]
    pub fn trigger(&self) -> DismissalTrigger {
        self.trigger
    }

    #[inline]
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Whether a tap would dismiss right now.
    #[must_use]
    pub fn accepts_tap(&self) -> bool {
        !self.settled && (self.tappable || self.trigger == DismissalTrigger::Manual)
    }

    pub fn tap(&mut self) -> Option<DismissCause> {
        self.settle_if(self.accepts_tap(), DismissCause::Tap)
    }

    /// Resume a break-point. Ignored for other targets.
    pub fn proceed(&mut self) -> Option<DismissCause> {
        let qualifies = self.trigger == DismissalTrigger::Manual;
        self.settle_if(qualifies, DismissCause::Proceed)
    }

    /// A timer wake for presentation `token` fired.
    pub fn timer_elapsed(&mut self, token: u64) -> Option<DismissCause> {
        let qualifies = token == self.token && matches!(self.trigger, DismissalTrigger::Timer(_));
        self.settle_if(qualifies, DismissCause::Timer)
    }

    /// The zero-delay wake for presentation `token` fired.
    pub fn immediate(&mut self, token: u64) -> Option<DismissCause> {
        let qualifies = token == self.token && self.trigger == DismissalTrigger::Immediate;
        self.settle_if(qualifies, DismissCause::Immediate)
    }

    fn settle_if(&mut self, qualifies: bool, cause: DismissCause) -> Option<DismissCause> {
        if self.settled || !qualifies {
            return None;
        }
        self.settled = true;
        Some(cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn trigger_precedence() {
        let plain = Target::new("a", "");
        assert_eq!(DismissalTrigger::for_target(&plain), DismissalTrigger::Immediate);
        let timed = plain.clone().duration(secs(1));
        assert_eq!(DismissalTrigger::for_target(&timed), DismissalTrigger::Timer(secs(1)));
        let both = timed.break_point(true);
        assert_eq!(DismissalTrigger::for_target(&both), DismissalTrigger::Manual);
    }

    #[test]
    fn timer_settles_once() {
        let mut c = DismissalController::new(3, &Target::new("a", "").duration(secs(1)));
        assert_eq!(c.timer_elapsed(3), Some(DismissCause::Timer));
        assert_eq!(c.timer_elapsed(3), None);
        assert!(c.is_settled());
    }

    #[test]
    fn stale_token_ignored() {
        let mut c = DismissalController::new(3, &Target::new("a", "").duration(secs(1)));
        assert_eq!(c.timer_elapsed(2), None);
        assert!(!c.is_settled());
        let mut c = DismissalController::new(5, &Target::new("a", ""));
        assert_eq!(c.immediate(4), None);
        assert_eq!(c.immediate(5), Some(DismissCause::Immediate));
    }

    #[test]
    fn tap_requires_tappable_or_break_point() {
        let mut plain = DismissalController::new(1, &Target::new("a", "").duration(secs(1)));
        assert!(!plain.accepts_tap());
        assert_eq!(plain.tap(), None);

        let mut tappable =
            DismissalController::new(1, &Target::new("a", "").duration(secs(1)).tappable(true));
        assert_eq!(tappable.tap(), Some(DismissCause::Tap));
        assert_eq!(tappable.timer_elapsed(1), None);

        let mut bp = DismissalController::new(1, &Target::new("a", "").break_point(true));
        assert!(bp.accepts_tap());
        assert_eq!(bp.tap(), Some(DismissCause::Tap));
    }

    #[test]
    fn proceed_only_for_break_points() {
        let mut timed = DismissalController::new(1, &Target::new("a", "").duration(secs(1)));
        assert_eq!(timed.proceed(), None);
        let mut bp = DismissalController::new(1, &Target::new("a", "").break_point(true));
        assert_eq!(bp.proceed(), Some(DismissCause::Proceed));
        assert_eq!(bp.proceed(), None);
    }

    #[test]
    fn break_point_ignores_timer() {
        let target = Target::new("a", "").break_point(true).duration(secs(1));
        let mut c = DismissalController::new(1, &target);
        assert_eq!(c.timer_elapsed(1), None);
        assert_eq!(c.immediate(1), None);
        assert!(!c.is_settled());
    }

    #[test]
    fn cause_labels() {
        assert_eq!(DismissCause::Timer.as_str(), "timer");
        assert_eq!(DismissCause::Proceed.as_str(), "proceed");
    }
}
