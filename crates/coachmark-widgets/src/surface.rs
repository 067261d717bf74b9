#![forbid(unsafe_code)]

//! [`CellSurface`]: the overlay rendered into terminal cells.
//!
//! The engine drives it through [`OverlayRenderer`]; the host calls
//! [`CellSurface::render`] once per frame with its canvas.
//!
//! # Paint order
//!
//! 1. Dim every cell inside the surface bounds whose centre is not covered
//!    by a cutout.
//! 2. For each drawn annotation, oldest first: the pointer, then the label
//!    on a cleared background.
//!
//! Nothing is painted while the fade-in opacity is below the dim threshold;
//! terminals have no partial transparency.

use std::collections::{BTreeMap, BTreeSet};

use coachmark_core::Rect;
use coachmark_layout::{Annotation, Constraint, Frames, solve};
use coachmark_runtime::{AnnotationId, Cutout, OverlayRenderer};

use crate::buffer::{CellBuffer, CellFlags};
use crate::{mask, pointer, text};

/// Opacity at which the overlay becomes visible.
pub const DEFAULT_DIM_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct CellSurface {
    bounds: Option<Rect>,
    opacity: f32,
    dim_threshold: f32,
    cutouts: BTreeMap<AnnotationId, Cutout>,
    annotations: BTreeMap<AnnotationId, Annotation>,
    drawn: Vec<AnnotationId>,
    constraint_sets: BTreeSet<AnnotationId>,
}

impl Default for CellSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl CellSurface {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bounds: None,
            opacity: 0.0,
            dim_threshold: DEFAULT_DIM_THRESHOLD,
            cutouts: BTreeMap::new(),
            annotations: BTreeMap::new(),
            drawn: Vec::new(),
            constraint_sets: BTreeSet::new(),
        }
    }

    /// Opacity at or above which the overlay is painted.
    #[must_use]
    pub fn dim_threshold(mut self, threshold: f32) -> Self {
        self.dim_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Surface bounds, `None` when no surface exists.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Whether [`render`](Self::render) paints anything.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.bounds.is_some() && self.opacity >= self.dim_threshold
    }

    /// Drawn annotations, oldest first.
    #[must_use]
    pub fn drawn(&self) -> &[AnnotationId] {
        &self.drawn
    }

    pub fn cutouts(&self) -> impl Iterator<Item = &Cutout> {
        self.cutouts.values()
    }

    /// Annotations whose constraints are still installed.
    #[must_use]
    pub fn constraint_sets(&self) -> usize {
        self.constraint_sets.len()
    }

    /// Resolved pointer and label frames of annotation `id`.
    #[must_use]
    pub fn frames(&self, id: AnnotationId) -> Option<Frames> {
        let bounds = self.bounds?;
        let annotation = self.annotations.get(&id)?;
        Some(solve(annotation, bounds, text::measure))
    }

    /// Paint the overlay onto `buf`.
    pub fn render(&self, buf: &mut CellBuffer) {
        let Some(bounds) = self.bounds else {
            return;
        };
        if self.opacity < self.dim_threshold {
            return;
        }

        self.render_dim(buf, bounds);
        for id in &self.drawn {
            if let Some(annotation) = self.annotations.get(id) {
                let frames = solve(annotation, bounds, text::measure);
                render_annotation(buf, annotation, &frames);
            }
        }
    }

    fn render_dim(&self, buf: &mut CellBuffer, bounds: Rect) {
        for y in 0..i32::from(buf.height()) {
            for x in 0..i32::from(buf.width()) {
                let (cx, cy) = (x as f32 + 0.5, y as f32 + 0.5);
                if !bounds.contains(cx, cy)
                    || self.cutouts.values().any(|c| mask::covers(c, cx, cy))
                {
                    continue;
                }
                if let Some(cell) = buf.get_mut(x, y) {
                    cell.flags.insert(CellFlags::DIM);
                }
            }
        }
    }
}

fn render_annotation(buf: &mut CellBuffer, annotation: &Annotation, frames: &Frames) {
    if let (Some(spec), Some(frame)) = (&annotation.pointer, frames.pointer) {
        pointer::draw(buf, frame, spec);
    }

    let label = frames.label;
    if label.is_empty() {
        return;
    }
    let left = label.left().round() as i32;
    let top = label.top().round() as i32;
    let right = left + label.width.round() as i32;
    let bottom = top + label.height.round() as i32;
    for y in top..bottom {
        for x in left..right {
            buf.set(x, y, ' ', CellFlags::LABEL);
        }
    }
    text::draw_label(buf, label, &annotation.label, CellFlags::LABEL);
}

impl OverlayRenderer for CellSurface {
    fn create_surface(&mut self, bounds: Rect) {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            target: "coachmark.widgets",
            width = bounds.width,
            height = bounds.height,
            "cell surface created"
        );
        self.bounds = Some(bounds);
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    fn destroy_surface(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "coachmark.widgets", "cell surface destroyed");
        self.bounds = None;
        self.opacity = 0.0;
        self.cutouts.clear();
        self.annotations.clear();
        self.drawn.clear();
        self.constraint_sets.clear();
    }

    fn add_cutout(&mut self, id: AnnotationId, cutout: &Cutout) {
        self.cutouts.insert(id, *cutout);
    }

    fn remove_cutout(&mut self, id: AnnotationId) {
        self.cutouts.remove(&id);
    }

    fn place_annotation(&mut self, id: AnnotationId, annotation: &Annotation) {
        self.annotations.insert(id, annotation.clone());
        if !self.drawn.contains(&id) {
            self.drawn.push(id);
        }
    }

    fn hide_annotation(&mut self, id: AnnotationId) {
        self.drawn.retain(|d| *d != id);
    }

    fn add_constraints(&mut self, id: AnnotationId, _constraints: &[Constraint]) {
        // Frames are resolved from the annotation's own copy at render time.
        self.constraint_sets.insert(id);
    }

    fn remove_constraints(&mut self, id: AnnotationId) {
        self.constraint_sets.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coachmark_core::{Position, Shape, Sides, Target};
    use coachmark_layout::place;

    const SCREEN: Rect = Rect::new(0.0, 0.0, 30.0, 12.0);
    const BUTTON: Rect = Rect::new(12.0, 2.0, 6.0, 2.0);

    fn small(target: Target) -> Target {
        target
            .arrow_size(2.0, 3.0)
            .arrow_head_size(1.0)
            .margins(Sides::all(0.0))
            .text_margins(Sides::all(0.0))
            .label_width(12.0)
    }

    fn show(surface: &mut CellSurface, id: u64, target: &Target, anchor: Rect) {
        let annotation = place(target, anchor).unwrap();
        let id = AnnotationId(id);
        surface.add_cutout(
            id,
            &Cutout {
                rect: anchor,
                shape: target.shape,
                corner_radius: 10.0,
            },
        );
        surface.add_constraints(id, &annotation.constraints);
        surface.place_annotation(id, &annotation);
    }

    #[test]
    fn nothing_painted_without_surface() {
        let surface = CellSurface::new();
        let mut buf = CellBuffer::new(30, 12);
        surface.render(&mut buf);
        assert_eq!(buf.count(CellFlags::DIM), 0);
    }

    #[test]
    fn nothing_painted_below_threshold() {
        let mut surface = CellSurface::new();
        surface.create_surface(SCREEN);
        surface.set_opacity(0.3);
        assert!(!surface.is_visible());
        let mut buf = CellBuffer::new(30, 12);
        surface.render(&mut buf);
        assert_eq!(buf.count(CellFlags::DIM), 0);
    }

    #[test]
    fn dims_everything_but_the_cutout() {
        let mut surface = CellSurface::new();
        surface.create_surface(SCREEN);
        surface.set_opacity(1.0);
        show(
            &mut surface,
            0,
            &small(Target::new("b", "Hi").shape(Shape::Rect)).with_arrow(false),
            BUTTON,
        );
        let mut buf = CellBuffer::new(30, 12);
        surface.render(&mut buf);

        for (x, y) in [(12, 2), (17, 3)] {
            let cell = buf.get(x, y).unwrap();
            assert!(!cell.flags.contains(CellFlags::DIM), "({x}, {y}) should be clear");
        }
        assert!(buf.get(0, 0).unwrap().flags.contains(CellFlags::DIM));
        assert!(buf.get(11, 2).unwrap().flags.contains(CellFlags::DIM));
        // 360 cells, 12 in the hole, 2 under the "Hi" label.
        assert_eq!(buf.count(CellFlags::DIM), 346);
        assert_eq!(buf.count(CellFlags::POINTER), 0);
    }

    #[test]
    fn bottom_pointer_and_label_below_anchor() {
        let mut surface = CellSurface::new();
        surface.create_surface(SCREEN);
        surface.set_opacity(1.0);
        let target = small(Target::new("b", "Save").position(Position::Bottom));
        show(&mut surface, 0, &target, BUTTON);

        let frames = surface.frames(AnnotationId(0)).unwrap();
        let pointer = frames.pointer.unwrap();
        assert_eq!(pointer, Rect::new(14.0, 4.0, 2.0, 3.0));
        assert_eq!(frames.label, Rect::new(13.0, 7.0, 4.0, 1.0));

        let mut buf = CellBuffer::new(30, 12);
        surface.render(&mut buf);
        assert_eq!(&buf.row_text(7)[13..17], "Save");
        assert!(buf.count(CellFlags::POINTER) >= 2);
        let label_cell = buf.get(13, 7).unwrap();
        assert!(label_cell.flags.contains(CellFlags::LABEL));
        assert!(!label_cell.flags.contains(CellFlags::DIM));
    }

    #[test]
    fn hidden_annotation_not_rendered_but_constraints_kept() {
        let mut surface = CellSurface::new();
        surface.create_surface(SCREEN);
        surface.set_opacity(1.0);
        show(&mut surface, 0, &small(Target::new("b", "Save")), BUTTON);
        surface.hide_annotation(AnnotationId(0));
        surface.remove_cutout(AnnotationId(0));

        let mut buf = CellBuffer::new(30, 12);
        surface.render(&mut buf);
        assert_eq!(buf.count(CellFlags::LABEL), 0);
        assert_eq!(buf.count(CellFlags::DIM), 360);
        assert_eq!(surface.constraint_sets(), 1);
    }

    #[test]
    fn destroy_resets_everything() {
        let mut surface = CellSurface::new();
        surface.create_surface(SCREEN);
        surface.set_opacity(1.0);
        show(&mut surface, 0, &small(Target::new("b", "Save")), BUTTON);
        surface.remove_constraints(AnnotationId(0));
        surface.destroy_surface();
        assert!(surface.bounds().is_none());
        assert!(surface.drawn().is_empty());
        assert_eq!(surface.cutouts().count(), 0);
        assert!(surface.frames(AnnotationId(0)).is_none());
    }
}
