#![forbid(unsafe_code)]

//! A renderer that records instead of drawing.
//!
//! [`RecordingRenderer`] keeps two views of the same calls: the raw command
//! log ([`RenderOp`]s in call order) and a model of the current overlay
//! (surface, cutouts, drawn annotations, installed constraints). Assert on
//! the log for ordering and on the model for end state.

use std::collections::BTreeMap;

use coachmark_core::Rect;
use coachmark_layout::{Annotation, Constraint};
use coachmark_runtime::{AnnotationId, Cutout, OverlayRenderer};

/// One renderer call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    CreateSurface(Rect),
    SetOpacity(f32),
    DestroySurface,
    AddCutout(AnnotationId, Cutout),
    RemoveCutout(AnnotationId),
    /// Label text of the placed annotation.
    PlaceAnnotation(AnnotationId, String),
    HideAnnotation(AnnotationId),
    /// Number of constraints installed.
    AddConstraints(AnnotationId, usize),
    RemoveConstraints(AnnotationId),
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    ops: Vec<RenderOp>,
    surface: Option<Rect>,
    opacity: f32,
    surfaces_created: usize,
    cutouts: BTreeMap<AnnotationId, Cutout>,
    annotations: BTreeMap<AnnotationId, Annotation>,
    drawn: Vec<AnnotationId>,
    constraints: BTreeMap<AnnotationId, Vec<Constraint>>,
}

impl RecordingRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far, in order.
    #[must_use]
    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    #[must_use]
    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    #[must_use]
    pub fn surface_bounds(&self) -> Option<Rect> {
        self.surface
    }

    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    #[must_use]
    pub fn surfaces_created(&self) -> usize {
        self.surfaces_created
    }

    /// Cutouts currently punched through the dim layer.
    pub fn cutouts(&self) -> impl Iterator<Item = (AnnotationId, &Cutout)> {
        self.cutouts.iter().map(|(id, c)| (*id, c))
    }

    #[must_use]
    pub fn is_drawn(&self, id: AnnotationId) -> bool {
        self.drawn.contains(&id)
    }

    /// Labels of drawn annotations, oldest first.
    #[must_use]
    pub fn visible_labels(&self) -> Vec<&str> {
        self.drawn
            .iter()
            .filter_map(|id| self.annotations.get(id))
            .map(|a| a.label.text.as_str())
            .collect()
    }

    #[must_use]
    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.get(&id)
    }

    /// Total constraints currently installed on the container.
    #[must_use]
    pub fn installed_constraints(&self) -> usize {
        self.constraints.values().map(Vec::len).sum()
    }

    /// Number of recorded ops matching `pred`.
    pub fn count(&self, pred: impl Fn(&RenderOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl OverlayRenderer for RecordingRenderer {
    fn create_surface(&mut self, bounds: Rect) {
        self.ops.push(RenderOp::CreateSurface(bounds));
        self.surface = Some(bounds);
        self.surfaces_created += 1;
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.ops.push(RenderOp::SetOpacity(opacity));
        self.opacity = opacity;
    }

    fn destroy_surface(&mut self) {
        self.ops.push(RenderOp::DestroySurface);
        self.surface = None;
        self.opacity = 0.0;
        self.cutouts.clear();
        self.drawn.clear();
        self.annotations.clear();
    }

    fn add_cutout(&mut self, id: AnnotationId, cutout: &Cutout) {
        self.ops.push(RenderOp::AddCutout(id, *cutout));
        self.cutouts.insert(id, *cutout);
    }

    fn remove_cutout(&mut self, id: AnnotationId) {
        self.ops.push(RenderOp::RemoveCutout(id));
        self.cutouts.remove(&id);
    }

    fn place_annotation(&mut self, id: AnnotationId, annotation: &Annotation) {
        self.ops
            .push(RenderOp::PlaceAnnotation(id, annotation.label.text.clone()));
        self.annotations.insert(id, annotation.clone());
        if !self.drawn.contains(&id) {
            self.drawn.push(id);
        }
    }

    fn hide_annotation(&mut self, id: AnnotationId) {
        self.ops.push(RenderOp::HideAnnotation(id));
        self.drawn.retain(|d| *d != id);
    }

    fn add_constraints(&mut self, id: AnnotationId, constraints: &[Constraint]) {
        self.ops.push(RenderOp::AddConstraints(id, constraints.len()));
        self.constraints.insert(id, constraints.to_vec());
    }

    fn remove_constraints(&mut self, id: AnnotationId) {
        self.ops.push(RenderOp::RemoveConstraints(id));
        self.constraints.remove(&id);
    }
}
