#![forbid(unsafe_code)]

//! Core: targets, geometry, and the error model.
//!
//! # Role in Coachmark
//! `coachmark-core` holds the plain data every other crate agrees on: the
//! [`Target`] description of one onboarding step, the [`Rect`]/[`Point`]
//! geometry used to describe anchors and pointer curves, and the typed
//! [`Error`] taxonomy with its degradation mapping.
//!
//! # How it fits in the system
//! `coachmark-layout` turns a target into placement constraints,
//! `coachmark-runtime` sequences targets through the presentation state
//! machine, and hosts implement the rendering traits the runtime defines.
//! None of those crates define their own target or geometry types.

pub mod error;
pub mod geometry;
pub mod target;

pub use error::{ConfigurationError, Degradation, Error, PreconditionViolation, Result};
pub use geometry::{Point, Rect, Sides};
pub use target::{AnchorId, Position, Shape, ShowHook, Target, TextAlign};
