#![forbid(unsafe_code)]

//! Test harness for Coachmark sessions.
//!
//! # Role in Coachmark
//! Session tests run headless: a [`RecordingRenderer`] logs every overlay
//! command and keeps a queryable model of what is drawn, [`ScriptedAnchors`]
//! makes anchors appear after a chosen number of checks, and
//! [`FixedContainer`] stands in for the host view. [`trace_capture`] records
//! `tracing` spans and events for diagnostics assertions.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use coachmark_core::{Rect, Target};
//! use coachmark_harness::{FixedContainer, RecordingRenderer, ScriptedAnchors};
//! use coachmark_runtime::{EngineConfig, Phase, PresentationEngine};
//!
//! let container = Rc::new(FixedContainer::new(Rect::new(0.0, 0.0, 320.0, 240.0)));
//! let anchors = ScriptedAnchors::new().visible("save", Rect::new(10.0, 10.0, 40.0, 20.0));
//! let mut engine = PresentationEngine::new(anchors, RecordingRenderer::new(), EngineConfig::default())
//!     .with_container(&container);
//!
//! engine.add_target(Target::new("save", "Saves your work").break_point(true));
//! engine.fire_targets();
//! assert_eq!(engine.phase(), Phase::AwaitingDismissal);
//! assert_eq!(engine.renderer().visible_labels(), ["Saves your work"]);
//! ```

pub mod anchors;
pub mod container;
pub mod recording;
pub mod trace_capture;

pub use anchors::ScriptedAnchors;
pub use container::FixedContainer;
pub use recording::{RecordingRenderer, RenderOp};
pub use trace_capture::{CaptureHandle, CapturedEvent, CapturedSpan, with_captured_tracing};
