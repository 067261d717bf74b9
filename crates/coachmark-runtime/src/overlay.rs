#![forbid(unsafe_code)]

//! The shared dimming surface.
//!
//! [`OverlayLifecycle`] owns the renderer and the session's single overlay
//! surface. The surface is created on the first [`show`](OverlayLifecycle::show),
//! reused for every later target, and destroyed by
//! [`teardown`](OverlayLifecycle::teardown).
//!
//! # State Machine
//!
//! ```text
//!            show (fade configured)            tick reaches 1.0
//!   Absent ────────────────────────▶ FadingIn ─────────────────▶ Active
//!     │                                                            ▲
//!     └───────────────── show (no fade) ───────────────────────────┘
//!   any ── teardown ──▶ Absent
//! ```
//!
//! # Invariants
//!
//! 1. At most one surface exists; `create_surface` and `destroy_surface`
//!    alternate.
//! 2. The fade plays once per surface creation, never between targets.
//! 3. Teardown removes every constraint set installed since creation.

use coachmark_core::{Rect, Shape};
use coachmark_layout::Annotation;
use web_time::Duration;

use crate::host::{AnnotationId, Cutout, OverlayRenderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Absent,
    FadingIn,
    Active,
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    elapsed: Duration,
    duration: Duration,
}

impl Fade {
    fn opacity(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}

#[derive(Debug)]
pub struct OverlayLifecycle<P> {
    renderer: P,
    state: OverlayState,
    fade_in: Option<Duration>,
    fade: Option<Fade>,
    corner_radius: f32,
    next_id: u64,
    /// Annotations with constraints installed, in presentation order.
    installed: Vec<AnnotationId>,
    /// Annotations currently drawn.
    visible: Vec<AnnotationId>,
}

impl<P: OverlayRenderer> OverlayLifecycle<P> {
    pub fn new(renderer: P, fade_in: Option<Duration>, corner_radius: f32) -> Self {
        Self {
            renderer,
            state: OverlayState::Absent,
            fade_in: fade_in.filter(|d| !d.is_zero()),
            fade: None,
            corner_radius,
            next_id: 0,
            installed: Vec::new(),
            visible: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> OverlayState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.state != OverlayState::Absent
    }

    /// Current surface opacity; `0.0` when absent.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        match self.state {
            OverlayState::Absent => 0.0,
            OverlayState::FadingIn => self.fade.map_or(1.0, |f| f.opacity()),
            OverlayState::Active => 1.0,
        }
    }

    /// Annotations currently drawn, oldest first.
    #[must_use]
    pub fn visible(&self) -> &[AnnotationId] {
        &self.visible
    }

    /// Paint one target: cutout, constraints, then annotation.
    ///
    /// Creates the surface (and starts the fade) if there is none yet.
    pub fn show(
        &mut self,
        container: Rect,
        anchor: Rect,
        shape: Shape,
        annotation: &Annotation,
    ) -> AnnotationId {
        if self.state == OverlayState::Absent {
            self.create(container);
        }

        let id = AnnotationId(self.next_id);
        self.next_id += 1;

        let cutout = Cutout {
            rect: anchor,
            shape,
            corner_radius: self.corner_radius,
        };
        self.renderer.add_cutout(id, &cutout);
        self.renderer.add_constraints(id, &annotation.constraints);
        self.renderer.place_annotation(id, annotation);
        self.installed.push(id);
        self.visible.push(id);

        tracing::debug!(
            target: "coachmark.overlay",
            id = %id,
            shape = ?shape,
            "annotation placed"
        );
        id
    }

    /// Hide a target's cutout and annotation. Its constraints stay installed
    /// until teardown.
    pub fn retire(&mut self, id: AnnotationId) -> bool {
        let Some(pos) = self.visible.iter().position(|v| *v == id) else {
            return false;
        };
        self.visible.remove(pos);
        self.renderer.remove_cutout(id);
        self.renderer.hide_annotation(id);
        tracing::debug!(target: "coachmark.overlay", id = %id, "annotation retired");
        true
    }

    /// Advance the fade. Returns `true` while still fading.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if self.state != OverlayState::FadingIn {
            return false;
        }
        let Some(fade) = self.fade.as_mut() else {
            self.state = OverlayState::Active;
            return false;
        };
        fade.elapsed = fade.elapsed.saturating_add(delta);
        let opacity = fade.opacity();
        self.renderer.set_opacity(opacity);
        if opacity >= 1.0 {
            self.state = OverlayState::Active;
            self.fade = None;
            tracing::debug!(target: "coachmark.overlay", "fade-in complete");
            false
        } else {
            true
        }
    }

    /// Remove every constraint set and destroy the surface.
    ///
    /// Returns `false` if there was no surface.
    pub fn teardown(&mut self) -> bool {
        if self.state == OverlayState::Absent {
            return false;
        }
        for id in self.installed.drain(..) {
            self.renderer.remove_constraints(id);
        }
        self.visible.clear();
        self.renderer.destroy_surface();
        self.state = OverlayState::Absent;
        self.fade = None;
        tracing::debug!(target: "coachmark.overlay", "surface destroyed");
        true
    }

    #[must_use]
    pub fn renderer(&self) -> &P {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut P {
        &mut self.renderer
    }

    fn create(&mut self, container: Rect) {
        self.renderer.create_surface(container);
        match self.fade_in {
            Some(duration) => {
                self.renderer.set_opacity(0.0);
                self.fade = Some(Fade {
                    elapsed: Duration::ZERO,
                    duration,
                });
                self.state = OverlayState::FadingIn;
            }
            None => {
                self.renderer.set_opacity(1.0);
                self.state = OverlayState::Active;
            }
        }
        tracing::debug!(
            target: "coachmark.overlay",
            fade_ms = self.fade_in.map_or(0, |d| d.as_millis() as u64),
            "surface created"
        );
    }
}
