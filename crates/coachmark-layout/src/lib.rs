#![forbid(unsafe_code)]

//! Layout: where the pointer and label go for each target.
//!
//! # Role in Coachmark
//! Placement is pure data. [`table`] holds the closed, nine-entry mapping
//! from [`Position`](coachmark_core::Position) to pointer curve and alignment
//! rules; [`placement::place`] turns a target plus the anchor's rectangle into
//! an [`Annotation`] carrying a constraint set; [`solve::solve`] resolves
//! those constraints into concrete frames for hosts without a layout solver.
//!
//! Nothing here holds state: the same inputs always produce the same output.

pub mod constraint;
pub mod placement;
pub mod solve;
pub mod table;

pub use constraint::{Attribute, Constraint, ConstraintSet, Edge, Item, Offset, Relation};
pub use placement::{Annotation, CurveKind, LabelSpec, PointerSpec, place};
pub use solve::{Frames, solve};
pub use table::{AlignRule, AnchorRule, AttachRule, PLACEMENT_TABLE, PlacementRule, PointerCurve, PointerRule, rule_for};
