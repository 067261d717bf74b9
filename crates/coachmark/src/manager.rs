#![forbid(unsafe_code)]

//! The tutorial manager: the host-facing handle for onboarding sessions.
//!
//! [`TutorialManager`] wraps a [`PresentationEngine`] with the vocabulary
//! hosts use: queue targets, `fire_targets`, `cancel_tutorial`, and a
//! completion callback. Everything the engine exposes stays reachable through
//! [`TutorialManager::engine`].
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use coachmark::prelude::*;
//! use coachmark_harness::{FixedContainer, RecordingRenderer, ScriptedAnchors};
//!
//! let screen = Rc::new(FixedContainer::new(Rect::new(0.0, 0.0, 320.0, 480.0)));
//! let anchors = ScriptedAnchors::new().visible("save", Rect::new(20.0, 40.0, 60.0, 30.0));
//!
//! let mut tutorial = TutorialManager::builder(anchors, RecordingRenderer::new())
//!     .container(&screen)
//!     .fade_in(Duration::from_millis(250))
//!     .build();
//!
//! tutorial.add_target(Target::new("save", "Tap to save").tappable(true).break_point(true));
//! tutorial.fire_targets();
//! assert!(tutorial.is_running());
//! assert!(tutorial.tap());
//! assert!(!tutorial.is_running());
//! ```

use std::fmt;
use std::rc::{Rc, Weak};

use coachmark_core::Target;
use coachmark_runtime::{
    AnchorResolver, ContainerRegion, EngineConfig, OverlayRenderer, Phase, PresentationEngine,
    RetryPolicy, SessionEvent, SessionStats,
};
use web_time::Duration;

type CompletionHook = Box<dyn FnMut()>;

/// Configures a [`TutorialManager`].
#[must_use]
pub struct TutorialManagerBuilder<R, P> {
    resolver: R,
    renderer: P,
    config: EngineConfig,
    container: Option<Weak<dyn ContainerRegion>>,
    on_complete: Option<CompletionHook>,
}

impl<R, P> fmt::Debug for TutorialManagerBuilder<R, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TutorialManagerBuilder")
            .field("config", &self.config)
            .field("has_container", &self.container.is_some())
            .field("has_on_complete", &self.on_complete.is_some())
            .finish_non_exhaustive()
    }
}

impl<R: AnchorResolver, P: OverlayRenderer> TutorialManagerBuilder<R, P> {
    /// The view the overlay covers. Held weakly.
    pub fn container<C: ContainerRegion + 'static>(mut self, container: &Rc<C>) -> Self {
        let weak: Weak<C> = Rc::downgrade(container);
        let weak: Weak<dyn ContainerRegion> = weak;
        self.container = Some(weak);
        self
    }

    /// Fade the overlay in over `duration` when it first appears.
    pub fn fade_in(mut self, duration: Duration) -> Self {
        self.config = self.config.fade_in(duration);
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config = self.config.retry(policy);
        self
    }

    pub fn corner_radius(mut self, radius: f32) -> Self {
        self.config = self.config.corner_radius(radius);
        self
    }

    /// Replace the whole engine configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Called once when each tutorial session ends.
    pub fn on_complete(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn build(self) -> TutorialManager<R, P> {
        let mut engine = PresentationEngine::new(self.resolver, self.renderer, self.config);
        if let Some(container) = self.container {
            engine.set_container_weak(container);
        }
        if let Some(hook) = self.on_complete {
            engine.on_complete(hook);
        }
        TutorialManager { engine }
    }
}

/// Host-facing onboarding manager.
#[derive(Debug)]
pub struct TutorialManager<R, P> {
    engine: PresentationEngine<R, P>,
}

impl<R: AnchorResolver, P: OverlayRenderer> TutorialManager<R, P> {
    pub fn builder(resolver: R, renderer: P) -> TutorialManagerBuilder<R, P> {
        TutorialManagerBuilder {
            resolver,
            renderer,
            config: EngineConfig::default(),
            container: None,
            on_complete: None,
        }
    }

    /// A manager over `container` with default configuration.
    pub fn new<C: ContainerRegion + 'static>(container: &Rc<C>, resolver: R, renderer: P) -> Self {
        Self::builder(resolver, renderer).container(container).build()
    }

    pub fn add_target(&mut self, target: Target) {
        self.engine.add_target(target);
    }

    pub fn add_targets(&mut self, targets: impl IntoIterator<Item = Target>) {
        self.engine.add_targets(targets);
    }

    /// Start presenting the queued targets.
    pub fn fire_targets(&mut self) {
        self.engine.fire_targets();
    }

    /// Stop the tutorial: clear the queue, remove the overlay, complete.
    pub fn cancel_tutorial(&mut self) {
        tracing::debug!(
            target: "coachmark.manager",
            phase = self.engine.phase().as_str(),
            queued = self.engine.queue().len(),
            "tutorial cancelled"
        );
        self.engine.cancel();
    }

    /// Replace the completion callback.
    pub fn on_complete(&mut self, hook: impl FnMut() + 'static) {
        self.engine.on_complete(hook);
    }

    /// Point the manager at a different container.
    pub fn set_container<C: ContainerRegion + 'static>(&mut self, container: &Rc<C>) {
        self.engine.set_container(container);
    }

    /// Advance time; see [`PresentationEngine::tick`].
    pub fn tick(&mut self, delta: Duration) {
        self.engine.tick(delta);
    }

    /// Forward a tap on the overlay.
    pub fn tap(&mut self) -> bool {
        self.engine.tap()
    }

    /// Resume after a break-point.
    pub fn proceed(&mut self) -> bool {
        self.engine.proceed()
    }

    /// When the host should tick next, or `None` if nothing is scheduled.
    ///
    /// While the overlay is fading in, hosts should tick every frame
    /// regardless.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.engine.next_deadline()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.engine.phase().is_running()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.engine.is_animating()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.engine.drain_events()
    }

    #[must_use]
    pub fn stats(&self) -> SessionStats {
        self.engine.stats()
    }

    #[must_use]
    pub fn renderer(&self) -> &P {
        self.engine.renderer()
    }

    pub fn renderer_mut(&mut self) -> &mut P {
        self.engine.renderer_mut()
    }

    #[must_use]
    pub fn engine(&self) -> &PresentationEngine<R, P> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PresentationEngine<R, P> {
        &mut self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coachmark_core::{AnchorId, Rect};
    use coachmark_harness::{FixedContainer, RecordingRenderer};
    use std::cell::Cell;

    fn anywhere(_: &AnchorId) -> Option<Rect> {
        Some(Rect::new(10.0, 10.0, 20.0, 20.0))
    }

    type Resolver = fn(&AnchorId) -> Option<Rect>;

    fn screen() -> Rc<FixedContainer> {
        Rc::new(FixedContainer::new(Rect::new(0.0, 0.0, 200.0, 200.0)))
    }

    #[test]
    fn builder_applies_config() {
        let s = screen();
        let manager = TutorialManager::builder(anywhere as Resolver, RecordingRenderer::new())
            .container(&s)
            .fade_in(Duration::from_millis(120))
            .corner_radius(4.0)
            .retry(RetryPolicy::no_retry())
            .build();
        assert_eq!(manager.phase(), Phase::Idle);
        assert_eq!(manager.engine().retry_state().attempts(), 0);
        assert!(!manager.is_running());
    }

    #[test]
    fn builder_hook_fires_on_completion() {
        let s = screen();
        let done = Rc::new(Cell::new(0));
        let d = Rc::clone(&done);
        let mut manager = TutorialManager::builder(anywhere as Resolver, RecordingRenderer::new())
            .container(&s)
            .on_complete(move || d.set(d.get() + 1))
            .build();
        manager.add_target(Target::new("a", "A"));
        manager.fire_targets();
        manager.tick(Duration::ZERO);
        assert_eq!(done.get(), 1);
    }

    #[test]
    fn cancel_tutorial_removes_overlay() {
        let s = screen();
        let mut manager = TutorialManager::new(&s, anywhere as Resolver, RecordingRenderer::new());
        manager.add_target(Target::new("a", "A").break_point(true));
        manager.fire_targets();
        assert!(manager.renderer().has_surface());
        manager.cancel_tutorial();
        assert!(!manager.renderer().has_surface());
        assert_eq!(manager.phase(), Phase::Completed);
        assert_eq!(manager.next_deadline(), None);
    }

    #[test]
    fn without_container_completes_at_once() {
        let mut manager =
            TutorialManager::builder(anywhere as Resolver, RecordingRenderer::new()).build();
        manager.add_target(Target::new("a", "A"));
        manager.fire_targets();
        assert_eq!(manager.phase(), Phase::Completed);
        assert_eq!(manager.renderer().surfaces_created(), 0);
    }
}
