#![forbid(unsafe_code)]

//! Coachmark public facade crate.
//!
//! Coachmark walks a user through an interface one element at a time: it
//! dims the screen except the current target, points at it with a curved
//! arrow and a label, waits for a timer, tap or explicit proceed, then moves
//! on. This crate re-exports the pieces hosts need and offers
//! [`TutorialManager`] as the entry point.
//!
//! # Crates
//!
//! | Crate | Role |
//! |-------|------|
//! | `coachmark-core` | Targets, geometry, errors |
//! | `coachmark-layout` | Placement table, constraints, solver |
//! | `coachmark-runtime` | Engine, probing, overlay lifecycle, config |
//! | `coachmark-widgets` | Terminal-cell renderer (feature `widgets`) |
//!
//! # Driving a session
//!
//! The engine never sleeps or spawns. Call [`TutorialManager::tick`] from
//! the host's frame or timer loop; [`TutorialManager::next_deadline`] says
//! how long the host may wait before the next tick is needed.

pub mod manager;

// --- Core re-exports -------------------------------------------------------

pub use coachmark_core::{
    AnchorId, ConfigurationError, Degradation, Error, Point, Position, PreconditionViolation, Rect,
    Result, Shape, Sides, Target, TextAlign,
};

// --- Layout re-exports -----------------------------------------------------

pub use coachmark_layout::{Annotation, Frames, place, solve};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "config-file")]
pub use coachmark_runtime::ConfigError;
pub use coachmark_runtime::{
    AnchorResolver, AnnotationId, BackoffStrategy, CompletionCause, ContainerRegion, Cutout,
    DismissCause, EngineConfig, OverlayRenderer, Phase, PresentationEngine, RetryPolicy,
    SessionEvent, SessionStats,
};

// --- Widgets re-exports ----------------------------------------------------

#[cfg(feature = "widgets")]
pub use coachmark_widgets::{CellBuffer, CellFlags, CellSurface};

pub use manager::{TutorialManager, TutorialManagerBuilder};
pub use web_time::Duration;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AnchorId, ContainerRegion, Duration, EngineConfig, OverlayRenderer, Phase, Position, Rect,
        SessionEvent, Shape, Sides, Target, TextAlign, TutorialManager,
    };

    #[cfg(feature = "widgets")]
    pub use crate::{CellBuffer, CellSurface};

    pub use crate::{core, layout, runtime};
}

pub use coachmark_core as core;
pub use coachmark_layout as layout;
pub use coachmark_runtime as runtime;
#[cfg(feature = "widgets")]
pub use coachmark_widgets as widgets;
