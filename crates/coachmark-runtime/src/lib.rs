#![forbid(unsafe_code)]

//! Coachmark runtime: the presentation engine and its collaborators.
//!
//! # Role in Coachmark
//! `coachmark-runtime` drives a session: it pulls targets from the
//! [`TargetQueue`], waits for each anchor to become visible, paints the overlay
//! through an [`OverlayRenderer`], and advances when the dismissal rule fires.
//!
//! # Execution model
//! Everything runs on the caller's thread. Waiting (probe retries, dismissal
//! timers, deferred advances) is expressed as entries in a [`DeferredQueue`]
//! that the host drives with [`PresentationEngine::tick`]. There are no
//! threads, no wall clock, and no recursion: time moves only when the host
//! says so, which makes every session replayable in tests.
//!
//! # Key components
//! - [`PresentationEngine`]: the session state machine.
//! - [`VisibilityProbe`]: bounded visibility retries.
//! - [`OverlayLifecycle`]: lazy surface creation, fade-in, teardown.
//! - [`DismissalController`]: timer, tap and break-point rules.
//! - [`EngineConfig`]: fade, retry and cutout settings.

pub mod config;
pub mod dismissal;
pub mod engine;
pub mod events;
pub mod host;
pub mod overlay;
pub mod probe;
pub mod queue;
pub mod retry;
pub mod scheduler;

#[cfg(feature = "config-file")]
pub use config::ConfigError;
pub use config::EngineConfig;
pub use dismissal::{DismissCause, DismissalController, DismissalTrigger};
pub use engine::{Phase, PresentationEngine};
pub use events::{CompletionCause, SessionEvent, SessionStats};
pub use host::{AnchorResolver, AnnotationId, ContainerRegion, Cutout, OverlayRenderer};
pub use overlay::{OverlayLifecycle, OverlayState};
pub use probe::{ProbeOutcome, RetryState, VisibilityProbe};
pub use queue::TargetQueue;
pub use retry::{BackoffStrategy, RetryPolicy};
pub use scheduler::DeferredQueue;
