#![forbid(unsafe_code)]

//! Host capabilities the engine consumes.
//!
//! The engine never touches a view system directly. A host supplies three
//! things:
//!
//! * an [`AnchorResolver`] that says where an anchor is, if it is on screen;
//! * a [`ContainerRegion`] the overlay covers (held weakly by the engine);
//! * an [`OverlayRenderer`] that owns the actual pixels or cells.
//!
//! All renderer calls are commands: the renderer reports nothing back, so a
//! recording renderer is a complete model of what the engine asked for.

use std::fmt;

use coachmark_core::{AnchorId, Rect, Shape};
use coachmark_layout::{Annotation, Constraint};

/// Resolve anchors to on-screen rectangles.
pub trait AnchorResolver {
    /// The anchor's frame in container coordinates, or `None` while it is not
    /// attached or visible.
    fn resolve(&self, anchor: &AnchorId) -> Option<Rect>;
}

impl<F> AnchorResolver for F
where
    F: Fn(&AnchorId) -> Option<Rect>,
{
    fn resolve(&self, anchor: &AnchorId) -> Option<Rect> {
        self(anchor)
    }
}

/// The region the overlay covers.
pub trait ContainerRegion {
    fn bounds(&self) -> Rect;
}

/// Identifies one presented target's cutout, annotation and constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationId(pub u64);

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A hole in the dim layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cutout {
    pub rect: Rect,
    pub shape: Shape,
    /// Only meaningful for [`Shape::RoundedRect`].
    pub corner_radius: f32,
}

/// Rendering primitives for the dimmed overlay.
///
/// Calls arrive in a fixed order per session: `create_surface`, then for each
/// target `add_cutout`, `add_constraints`, `place_annotation`; retired targets
/// get `remove_cutout` and `hide_annotation`; the session ends with one
/// `remove_constraints` per target followed by `destroy_surface`.
pub trait OverlayRenderer {
    /// Create the dim layer covering `bounds`.
    fn create_surface(&mut self, bounds: Rect);

    /// Surface opacity in `0.0..=1.0`.
    fn set_opacity(&mut self, opacity: f32);

    fn destroy_surface(&mut self);

    fn add_cutout(&mut self, id: AnnotationId, cutout: &Cutout);

    fn remove_cutout(&mut self, id: AnnotationId);

    /// Draw the label and (if visible) pointer for `id`.
    fn place_annotation(&mut self, id: AnnotationId, annotation: &Annotation);

    fn hide_annotation(&mut self, id: AnnotationId);

    /// Install the layout relations for `id` on the container.
    ///
    /// Hosts without a constraint solver can ignore this and resolve frames
    /// with [`coachmark_layout::solve`] inside `place_annotation`.
    fn add_constraints(&mut self, id: AnnotationId, constraints: &[Constraint]) {
        let _ = (id, constraints);
    }

    fn remove_constraints(&mut self, id: AnnotationId) {
        let _ = id;
    }
}

impl<P: OverlayRenderer + ?Sized> OverlayRenderer for Box<P> {
    fn create_surface(&mut self, bounds: Rect) {
        (**self).create_surface(bounds);
    }
    fn set_opacity(&mut self, opacity: f32) {
        (**self).set_opacity(opacity);
    }
    fn destroy_surface(&mut self) {
        (**self).destroy_surface();
    }
    fn add_cutout(&mut self, id: AnnotationId, cutout: &Cutout) {
        (**self).add_cutout(id, cutout);
    }
    fn remove_cutout(&mut self, id: AnnotationId) {
        (**self).remove_cutout(id);
    }
    fn place_annotation(&mut self, id: AnnotationId, annotation: &Annotation) {
        (**self).place_annotation(id, annotation);
    }
    fn hide_annotation(&mut self, id: AnnotationId) {
        (**self).hide_annotation(id);
    }
    fn add_constraints(&mut self, id: AnnotationId, constraints: &[Constraint]) {
        (**self).add_constraints(id, constraints);
    }
    fn remove_constraints(&mut self, id: AnnotationId) {
        (**self).remove_constraints(id);
    }
}
