#![forbid(unsafe_code)]

//! Presentation targets.
//!
//! A [`Target`] describes one onboarding step: which anchor to cut out of the
//! dimmed overlay, where the pointer and label go relative to it, and how the
//! step is dismissed.
//!
//! # Invariants
//!
//! 1. Exactly one advance rule applies: `break_point` wins over `duration`,
//!    and a target with neither advances as soon as it is shown.
//! 2. Validation is lazy: [`Target::validate`] runs when the target is about
//!    to be presented, never when it is queued.
//!
//! # Example
//!
//! ```
//! use coachmark_core::{Position, Shape, Target};
//! use std::time::Duration;
//!
//! let target = Target::new("search-bar", "Type here to search")
//!     .shape(Shape::RoundedRect)
//!     .position(Position::Bottom)
//!     .duration(Duration::from_secs(2))
//!     .tappable(true);
//!
//! assert!(target.validate().is_ok());
//! ```

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::error::ConfigurationError;
use crate::geometry::Sides;

/// Opaque reference to a renderable region, resolved by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchorId(String);

impl AnchorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnchorId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AnchorId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Shape of the cutout drawn around the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    Ellipse,
    #[default]
    Rect,
    RoundedRect,
    /// No cutout; the anchor stays dimmed.
    None,
}

/// Where the pointer and label sit relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Position {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// Label centred on the anchor, no pointer.
    Centre,
}

impl Position {
    /// All positions, in table order.
    pub const ALL: [Position; 9] = [
        Position::Top,
        Position::Bottom,
        Position::Left,
        Position::Right,
        Position::TopLeft,
        Position::TopRight,
        Position::BottomLeft,
        Position::BottomRight,
        Position::Centre,
    ];

    /// Stable index into per-position lookup tables.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Position::Top => 0,
            Position::Bottom => 1,
            Position::Left => 2,
            Position::Right => 3,
            Position::TopLeft => 4,
            Position::TopRight => 5,
            Position::BottomLeft => 6,
            Position::BottomRight => 7,
            Position::Centre => 8,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Position::Top => "top",
            Position::Bottom => "bottom",
            Position::Left => "left",
            Position::Right => "right",
            Position::TopLeft => "top_left",
            Position::TopRight => "top_right",
            Position::BottomLeft => "bottom_left",
            Position::BottomRight => "bottom_right",
            Position::Centre => "centre",
        }
    }
}

/// Horizontal alignment of label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Callback fired once when a target's presentation begins.
pub type ShowHook = Rc<dyn Fn()>;

/// One onboarding step.
#[derive(Clone)]
pub struct Target {
    /// Region the annotation points at.
    pub anchor: AnchorId,
    /// Cutout shape around the anchor.
    pub shape: Shape,
    /// Placement of pointer and label relative to the anchor.
    pub position: Position,
    /// Override for the pointer's curve and tail-side label layout.
    pub arrow_start: Option<Position>,
    /// Label text.
    pub message: String,
    /// Anchor-to-pointer spacing.
    pub margins: Sides,
    /// Pointer-to-label spacing.
    pub text_margins: Sides,
    /// Maximum label width.
    pub label_width: f32,
    /// Arrow head width and height.
    pub arrow_head_size: f32,
    /// Pointer frame width.
    pub arrow_width: f32,
    /// Pointer frame height.
    pub arrow_height: f32,
    /// Draw the pointer. When false the pointer frame still positions the label.
    pub with_arrow: bool,
    pub text_align: TextAlign,
    /// Auto-dismiss after this long (ignored for break-points).
    pub duration: Option<Duration>,
    /// A tap on the overlay dismisses this target.
    pub tappable: bool,
    /// Hold until an explicit proceed signal (or a tap).
    pub break_point: bool,
    /// Keep the annotation and cutout visible after advancing.
    pub persistent: bool,
    /// Fired exactly once when presentation begins.
    pub on_show: Option<ShowHook>,
}

impl Target {
    /// Create a target with default placement and immediate advance.
    pub fn new(anchor: impl Into<AnchorId>, message: impl Into<String>) -> Self {
        Self {
            anchor: anchor.into(),
            shape: Shape::default(),
            position: Position::default(),
            arrow_start: None,
            message: message.into(),
            margins: Sides::default(),
            text_margins: Sides::default(),
            label_width: 250.0,
            arrow_head_size: 9.0,
            arrow_width: 50.0,
            arrow_height: 50.0,
            with_arrow: true,
            text_align: TextAlign::default(),
            duration: None,
            tappable: false,
            break_point: false,
            persistent: false,
            on_show: None,
        }
    }

    #[must_use]
    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn arrow_start(mut self, position: Position) -> Self {
        self.arrow_start = Some(position);
        self
    }

    #[must_use]
    pub fn margins(mut self, margins: Sides) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn text_margins(mut self, margins: Sides) -> Self {
        self.text_margins = margins;
        self
    }

    #[must_use]
    pub fn label_width(mut self, width: f32) -> Self {
        self.label_width = width;
        self
    }

    #[must_use]
    pub fn arrow_head_size(mut self, size: f32) -> Self {
        self.arrow_head_size = size;
        self
    }

    /// Set the pointer frame size.
    #[must_use]
    pub fn arrow_size(mut self, width: f32, height: f32) -> Self {
        self.arrow_width = width;
        self.arrow_height = height;
        self
    }

    #[must_use]
    pub fn with_arrow(mut self, draw: bool) -> Self {
        self.with_arrow = draw;
        self
    }

    #[must_use]
    pub fn text_align(mut self, align: TextAlign) -> Self {
        self.text_align = align;
        self
    }

    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub fn tappable(mut self, tappable: bool) -> Self {
        self.tappable = tappable;
        self
    }

    #[must_use]
    pub fn break_point(mut self, break_point: bool) -> Self {
        self.break_point = break_point;
        self
    }

    #[must_use]
    pub fn persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    #[must_use]
    pub fn on_show(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_show = Some(Rc::new(hook));
        self
    }

    /// Position that selects the pointer curve and label alignment.
    #[inline]
    #[must_use]
    pub fn effective_arrow_start(&self) -> Position {
        self.arrow_start.unwrap_or(self.position)
    }

    /// Whether the target emits a pointer at all.
    #[inline]
    #[must_use]
    pub fn has_pointer(&self) -> bool {
        self.position != Position::Centre
    }

    /// Check the target can be laid out.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] for a `centre` arrow start on a
    /// pointer-bearing target, or for non-finite / negative sizing.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.has_pointer() && self.effective_arrow_start() == Position::Centre {
            return Err(ConfigurationError::CentreArrowStart {
                position: self.position,
            });
        }
        if !self.margins.is_finite() {
            return Err(ConfigurationError::NonFiniteMargin { field: "margins" });
        }
        if !self.text_margins.is_finite() {
            return Err(ConfigurationError::NonFiniteMargin {
                field: "text_margins",
            });
        }
        for (field, value) in [
            ("label_width", self.label_width),
            ("arrow_head_size", self.arrow_head_size),
            ("arrow_width", self.arrow_width),
            ("arrow_height", self.arrow_height),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidSize { field, value });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("anchor", &self.anchor)
            .field("shape", &self.shape)
            .field("position", &self.position)
            .field("arrow_start", &self.arrow_start)
            .field("message", &self.message)
            .field("duration", &self.duration)
            .field("tappable", &self.tappable)
            .field("break_point", &self.break_point)
            .field("persistent", &self.persistent)
            .field("on_show", &self.on_show.is_some())
            .finish_non_exhaustive()
    }
}
