#![forbid(unsafe_code)]

//! Terminal-cell rendering for Coachmark overlays.
//!
//! # Role in Coachmark
//! [`CellSurface`] implements the runtime's
//! [`OverlayRenderer`](coachmark_runtime::OverlayRenderer) for character-cell
//! hosts. It resolves each annotation's constraints with
//! [`coachmark_layout::solve`], then paints into a [`CellBuffer`]: a dim
//! layer with rect, ellipse or rounded cutouts, pointer curves drawn with
//! box-drawing glyphs, and word-wrapped labels.
//!
//! Layout units are cells: a target meant for this renderer should use
//! cell-sized arrows, margins and label widths.
//!
//! # Example
//!
//! ```
//! use coachmark_core::{Rect, Sides, Target};
//! use coachmark_widgets::{CellBuffer, CellSurface};
//! use coachmark_runtime::{EngineConfig, PresentationEngine};
//! use std::rc::Rc;
//!
//! struct Screen;
//! impl coachmark_runtime::ContainerRegion for Screen {
//!     fn bounds(&self) -> Rect { Rect::new(0.0, 0.0, 40.0, 12.0) }
//! }
//!
//! let screen = Rc::new(Screen);
//! let resolve = |_: &coachmark_core::AnchorId| Some(Rect::new(10.0, 2.0, 8.0, 1.0));
//! let mut engine = PresentationEngine::new(resolve, CellSurface::new(), EngineConfig::default())
//!     .with_container(&screen);
//! engine.add_target(
//!     Target::new("menu", "Open the menu")
//!         .arrow_size(2.0, 2.0)
//!         .margins(Sides::all(0.0))
//!         .label_width(20.0)
//!         .break_point(true),
//! );
//! engine.fire_targets();
//!
//! let mut buf = CellBuffer::new(40, 12);
//! engine.renderer().render(&mut buf);
//! assert!(buf.rows().iter().any(|row| row.contains("Open the menu")));
//! ```

pub mod buffer;
pub mod mask;
pub mod pointer;
pub mod surface;
pub mod text;

pub use buffer::{Cell, CellBuffer, CellFlags};
pub use surface::{CellSurface, DEFAULT_DIM_THRESHOLD};
pub use text::{measure, wrap_text};
