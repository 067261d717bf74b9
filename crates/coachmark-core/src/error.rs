#![forbid(unsafe_code)]

//! Coachmark error model and graceful degradation.
//!
//! # Design Principles
//!
//! 1. **Failures are local to one target.** Every variant maps to a
//!    [`Degradation`] the engine applies instead of aborting the session.
//! 2. **Domain-specific errors.** Configuration problems, visibility timeouts
//!    and host precondition failures are separate types so callers can match
//!    on what matters.
//! 3. **Observability.** Errors carry enough context for diagnostic events
//!    and log fields without depending on `tracing`.

use thiserror::Error;

use crate::target::{AnchorId, Position};

// ── Domain-Specific Error Types ─────────────────────────────────────────

/// A target cannot be laid out as configured.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// `centre` was used as the pointer's start position on a target that
    /// draws a pointer.
    #[error("`centre` is not a valid arrow start position (target position: {})", .position.as_str())]
    CentreArrowStart { position: Position },
    /// A margin set contains NaN or infinity.
    #[error("{field} contains a non-finite value")]
    NonFiniteMargin { field: &'static str },
    /// A size is negative or non-finite.
    #[error("{field} must be a finite, non-negative size, got {value}")]
    InvalidSize { field: &'static str, value: f32 },
}

/// The host did not provide what a session needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PreconditionViolation {
    /// The container reference was never set or has been dropped.
    #[error("container region is no longer available")]
    ContainerGone,
}

// ── Unified Error ───────────────────────────────────────────────────────

/// Top-level error type for coachmark sessions.
///
/// Use [`Error::degradation`] to determine what the engine does about it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    /// The anchor never attached within the retry budget.
    #[error("anchor `{anchor}` not visible after {attempts} retries")]
    VisibilityTimeout { anchor: AnchorId, attempts: u32 },
    #[error("precondition: {0}")]
    Precondition(#[from] PreconditionViolation),
}

/// Standard result type for coachmark APIs.
pub type Result<T> = std::result::Result<T, Error>;

// ── Graceful Degradation ────────────────────────────────────────────────

/// What the engine does when an error occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degradation {
    /// Drop the current target without showing it and continue.
    SkipTarget,
    /// End the session: tear down and fire completion.
    CompleteSession,
}

impl Error {
    /// Determine the degradation action for this error.
    #[must_use]
    pub fn degradation(&self) -> Degradation {
        match self {
            Self::Configuration(_) | Self::VisibilityTimeout { .. } => Degradation::SkipTarget,
            Self::Precondition(_) => Degradation::CompleteSession,
        }
    }

    /// Error type label for events and log fields.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::VisibilityTimeout { .. } => "visibility_timeout",
            Self::Precondition(_) => "precondition",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_display() {
        let err = ConfigurationError::CentreArrowStart {
            position: Position::TopLeft,
        };
        assert_eq!(
            err.to_string(),
            "`centre` is not a valid arrow start position (target position: top_left)"
        );
    }

    #[test]
    fn invalid_size_display() {
        let err = ConfigurationError::InvalidSize {
            field: "arrow_width",
            value: -2.0,
        };
        assert_eq!(
            err.to_string(),
            "arrow_width must be a finite, non-negative size, got -2"
        );
    }

    #[test]
    fn timeout_display() {
        let err = Error::VisibilityTimeout {
            anchor: AnchorId::new("toolbar"),
            attempts: 20,
        };
        assert_eq!(
            err.to_string(),
            "anchor `toolbar` not visible after 20 retries"
        );
    }

    // ── Degradation Mapping ─────────────────────────────────────────

    #[test]
    fn degradation_configuration_skips() {
        let err: Error = ConfigurationError::NonFiniteMargin { field: "margins" }.into();
        assert_eq!(err.degradation(), Degradation::SkipTarget);
        assert_eq!(err.error_type(), "configuration");
    }

    #[test]
    fn degradation_timeout_skips() {
        let err = Error::VisibilityTimeout {
            anchor: AnchorId::new("a"),
            attempts: 1,
        };
        assert_eq!(err.degradation(), Degradation::SkipTarget);
        assert_eq!(err.error_type(), "visibility_timeout");
    }

    #[test]
    fn degradation_precondition_completes() {
        let err: Error = PreconditionViolation::ContainerGone.into();
        assert_eq!(err.degradation(), Degradation::CompleteSession);
        assert_eq!(err.error_type(), "precondition");
        assert_eq!(
            err.to_string(),
            "precondition: container region is no longer available"
        );
    }

    #[test]
    fn source_chain_exposes_inner() {
        use std::error::Error as _;
        let err: Error = ConfigurationError::NonFiniteMargin { field: "margins" }.into();
        assert!(err.source().is_some());
    }
}
