#![forbid(unsafe_code)]

//! The presentation state machine.
//!
//! A [`PresentationEngine`] runs one onboarding session at a time:
//!
//! ```text
//!  Idle ──fire──▶ Probing ──visible──▶ Presenting ──▶ AwaitingDismissal
//!                  │  ▲ ▲                                  │
//!           retry  └──┘ └───── Advancing ◀── timer/tap/proceed
//!                                 │
//!                  queue empty ───┴──▶ Completed ◀── cancel (any state)
//! ```
//!
//! # Execution model
//!
//! The engine never blocks and never recurses. Probe retries, dismissal
//! timers and the hop to the next target are [`Wake`]s in a
//! [`DeferredQueue`] the host drains with [`tick`](PresentationEngine::tick).
//! Each wake carries the session epoch, and dismissal wakes carry the
//! presentation token, so a wake that outlives its session or target is
//! ignored.
//!
//! # Invariants
//!
//! 1. The completion callback runs exactly once per session.
//! 2. The queue is empty on entering `Completed`. Targets added afterwards
//!    stay queued until the next `fire_targets`.
//! 3. At most one target is presented or awaiting dismissal at a time.
//! 4. A target's `on_show` hook runs at most once, after validation and
//!    before anything is drawn for it.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Anchor never visible | Target skipped, `TargetSkipped` event, `warn` log |
//! | Target fails validation | Target skipped, `TargetSkipped` event, `warn` log |
//! | Container missing or dropped | Session completes with teardown |
//! | Hook re-enters the engine | Not supported; hooks must not call back in |

use std::fmt;
use std::rc::{Rc, Weak};

use coachmark_core::{AnchorId, Degradation, Error, PreconditionViolation, Rect, Target};
use coachmark_layout::place;
use tracing::{debug, debug_span, trace, warn};
use web_time::Duration;

use crate::config::EngineConfig;
use crate::dismissal::{DismissCause, DismissalController, DismissalTrigger};
use crate::events::{CompletionCause, SessionEvent, SessionStats};
use crate::host::{AnchorResolver, AnnotationId, ContainerRegion, OverlayRenderer};
use crate::overlay::OverlayLifecycle;
use crate::probe::{ProbeOutcome, RetryState, VisibilityProbe};
use crate::queue::TargetQueue;
use crate::scheduler::DeferredQueue;

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No session has run yet.
    Idle,
    /// Waiting for the head target's anchor.
    Probing,
    /// Drawing the head target (transient).
    Presenting,
    /// The head target is on screen.
    AwaitingDismissal,
    /// The head target was dismissed; the next probe is pending.
    Advancing,
    /// The session ended. A new `fire_targets` with queued targets starts a
    /// fresh one.
    Completed,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Probing => "probing",
            Self::Presenting => "presenting",
            Self::AwaitingDismissal => "awaiting_dismissal",
            Self::Advancing => "advancing",
            Self::Completed => "completed",
        }
    }

    /// Whether a session is in progress.
    #[must_use]
    pub const fn is_running(self) -> bool {
        !matches!(self, Self::Idle | Self::Completed)
    }
}

/// Deferred work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wake {
    /// Probe the head target again.
    Probe { epoch: u64 },
    /// Timer or immediate dismissal of presentation `token`.
    Dismiss { epoch: u64, token: u64 },
}

/// The target currently on screen.
#[derive(Debug)]
struct Presentation {
    anchor: AnchorId,
    id: AnnotationId,
    persistent: bool,
    dismissal: DismissalController,
}

type CompletionHook = Box<dyn FnMut()>;

pub struct PresentationEngine<R, P> {
    queue: TargetQueue,
    probe: VisibilityProbe<R>,
    overlay: OverlayLifecycle<P>,
    scheduler: DeferredQueue<Wake>,
    container: Option<Weak<dyn ContainerRegion>>,
    phase: Phase,
    epoch: u64,
    next_token: u64,
    current: Option<Presentation>,
    on_complete: Option<CompletionHook>,
    events: Vec<SessionEvent>,
    stats: SessionStats,
}

impl<R, P> fmt::Debug for PresentationEngine<R, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationEngine")
            .field("phase", &self.phase)
            .field("epoch", &self.epoch)
            .field("queued", &self.queue.len())
            .field("pending_wakes", &self.scheduler.len())
            .field("current", &self.current.as_ref().map(|p| &p.anchor))
            .finish_non_exhaustive()
    }
}

impl<R: AnchorResolver, P: OverlayRenderer> PresentationEngine<R, P> {
    /// Configs that fail [`EngineConfig::validate`] are still used as given;
    /// each problem is logged at `warn`.
    pub fn new(resolver: R, renderer: P, config: EngineConfig) -> Self {
        for problem in config.validate() {
            warn!(target: "coachmark.engine", %problem, "invalid engine config");
        }
        let fade_in = config.fade_in_duration();
        Self {
            queue: TargetQueue::new(),
            probe: VisibilityProbe::new(resolver, config.retry),
            overlay: OverlayLifecycle::new(renderer, fade_in, config.corner_radius),
            scheduler: DeferredQueue::new(),
            container: None,
            phase: Phase::Idle,
            epoch: 0,
            next_token: 0,
            current: None,
            on_complete: None,
            events: Vec::new(),
            stats: SessionStats::default(),
        }
    }

    /// Hold `container` weakly; the engine never keeps it alive.
    #[must_use]
    pub fn with_container<C: ContainerRegion + 'static>(mut self, container: &Rc<C>) -> Self {
        self.set_container(container);
        self
    }

    pub fn set_container<C: ContainerRegion + 'static>(&mut self, container: &Rc<C>) {
        let weak: Weak<C> = Rc::downgrade(container);
        let weak: Weak<dyn ContainerRegion> = weak;
        self.container = Some(weak);
    }

    pub fn set_container_weak(&mut self, container: Weak<dyn ContainerRegion>) {
        self.container = Some(container);
    }

    /// Callback run once at the end of every session.
    pub fn on_complete(&mut self, hook: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(hook));
    }

    // ── Queue ───────────────────────────────────────────────────────────

    pub fn add_target(&mut self, target: Target) {
        self.queue.append(target);
    }

    pub fn add_targets(&mut self, targets: impl IntoIterator<Item = Target>) {
        self.queue.append_all(targets);
    }

    #[must_use]
    pub fn queue(&self) -> &TargetQueue {
        &self.queue
    }

    // ── Session control ─────────────────────────────────────────────────

    /// Start presenting the queued targets.
    ///
    /// No-op while a session is running, and after completion until new
    /// targets are queued. Probes the first target synchronously.
    pub fn fire_targets(&mut self) {
        match self.phase {
            Phase::Completed if self.queue.is_empty() => return,
            Phase::Idle | Phase::Completed => {}
            _ => {
                trace!(target: "coachmark.engine", phase = self.phase.as_str(), "fire ignored, session running");
                return;
            }
        }

        let span = debug_span!(
            target: "coachmark.engine",
            "coachmark.engine.fire",
            epoch = self.epoch,
            queued = self.queue.len()
        );
        let _guard = span.enter();

        self.emit(SessionEvent::Fired {
            queued: self.queue.len(),
        });
        self.phase = Phase::Probing;
        self.probe.reset();
        debug!(target: "coachmark.engine", queued = self.queue.len(), "session started");
        self.run_probe();
    }

    /// Advance virtual time by `delta`, running fades and every wake that
    /// falls due.
    pub fn tick(&mut self, delta: Duration) {
        self.overlay.tick(delta);

        if self.phase.is_running() && self.container_bounds().is_none() {
            self.degrade(PreconditionViolation::ContainerGone.into(), None);
        }

        let deadline = self.scheduler.now().saturating_add(delta);
        while let Some(wake) = self.scheduler.pop_due(deadline) {
            self.dispatch(wake);
        }
        self.scheduler.advance_to(deadline);
    }

    /// A tap on the overlay. Returns `true` if it dismissed the current target.
    pub fn tap(&mut self) -> bool {
        self.external(DismissalController::tap)
    }

    /// Resume a break-point target. Returns `true` if it advanced.
    pub fn proceed(&mut self) -> bool {
        self.external(DismissalController::proceed)
    }

    /// End the session now: clear the queue, tear down, complete.
    ///
    /// No-op when already completed.
    pub fn cancel(&mut self) {
        if self.phase == Phase::Completed {
            return;
        }
        self.finish(CompletionCause::Cancelled);
    }

    // ── Observation ─────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Time until the next pending wake, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler
            .next_due()
            .map(|due| due.saturating_sub(self.scheduler.now()))
    }

    /// Whether the overlay is mid-fade and wants ticks for smooth opacity.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.overlay.state() == crate::overlay::OverlayState::FadingIn
    }

    /// Virtual time since the engine was created.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Anchor of the target on screen.
    #[must_use]
    pub fn current_anchor(&self) -> Option<&AnchorId> {
        self.current.as_ref().map(|p| &p.anchor)
    }

    #[must_use]
    pub fn retry_state(&self) -> RetryState {
        self.probe.state()
    }

    /// Take every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    #[must_use]
    pub fn overlay(&self) -> &OverlayLifecycle<P> {
        &self.overlay
    }

    #[must_use]
    pub fn renderer(&self) -> &P {
        self.overlay.renderer()
    }

    pub fn renderer_mut(&mut self) -> &mut P {
        self.overlay.renderer_mut()
    }

    #[must_use]
    pub fn resolver(&self) -> &R {
        self.probe.resolver()
    }

    pub fn resolver_mut(&mut self) -> &mut R {
        self.probe.resolver_mut()
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn container_bounds(&self) -> Option<Rect> {
        self.container
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|c| c.bounds())
    }

    fn emit(&mut self, event: SessionEvent) {
        self.stats.record(&event);
        self.events.push(event);
    }

    fn schedule(&mut self, delay: Duration, wake: Wake) {
        self.scheduler.after(delay, wake);
    }

    /// Probe the head target, skipping targets until one is shown, a retry is
    /// scheduled, or the queue runs out.
    fn run_probe(&mut self) {
        loop {
            let Some(anchor) = self.queue.front().map(|t| t.anchor.clone()) else {
                self.finish(CompletionCause::Exhausted);
                return;
            };
            let Some(container) = self.container_bounds() else {
                self.degrade(PreconditionViolation::ContainerGone.into(), None);
                return;
            };

            self.phase = Phase::Probing;
            match self.probe.check(&anchor) {
                ProbeOutcome::Visible(rect) => {
                    if self.present(rect, container) {
                        return;
                    }
                }
                ProbeOutcome::Retry { attempt, delay } => {
                    self.schedule(delay, Wake::Probe { epoch: self.epoch });
                    self.emit(SessionEvent::RetryScheduled {
                        anchor,
                        attempt,
                        delay,
                    });
                    return;
                }
                ProbeOutcome::Exhausted { attempts } => {
                    self.degrade(Error::VisibilityTimeout { anchor, attempts }, None);
                }
            }
        }
    }

    /// Show the head target. Returns `false` if it was skipped instead.
    fn present(&mut self, rect: Rect, container: Rect) -> bool {
        let Some(target) = self.queue.front().cloned() else {
            return false;
        };
        let span = debug_span!(
            target: "coachmark.engine",
            "coachmark.engine.present",
            anchor = %target.anchor,
            position = target.position.as_str()
        );
        let _guard = span.enter();
        self.phase = Phase::Presenting;

        if let Err(err) = target.validate() {
            self.degrade(err.into(), Some(&target.anchor));
            return false;
        }

        if let Some(hook) = &target.on_show {
            hook();
        }

        let annotation = match place(&target, rect) {
            Ok(annotation) => annotation,
            Err(err) => {
                self.degrade(err.into(), Some(&target.anchor));
                return false;
            }
        };

        let id = self.overlay.show(container, rect, target.shape, &annotation);
        let token = self.next_token;
        self.next_token += 1;
        let dismissal = DismissalController::new(token, &target);
        match dismissal.trigger() {
            DismissalTrigger::Timer(duration) => {
                self.schedule(duration, Wake::Dismiss { epoch: self.epoch, token });
            }
            DismissalTrigger::Immediate => {
                self.schedule(Duration::ZERO, Wake::Dismiss { epoch: self.epoch, token });
            }
            DismissalTrigger::Manual => {}
        }
        debug!(
            target: "coachmark.engine",
            id = %id,
            trigger = ?dismissal.trigger(),
            "target shown"
        );

        self.current = Some(Presentation {
            anchor: target.anchor.clone(),
            id,
            persistent: target.persistent,
            dismissal,
        });
        self.phase = Phase::AwaitingDismissal;
        self.emit(SessionEvent::TargetShown {
            anchor: target.anchor,
            id,
        });
        true
    }

    /// Apply the degradation for `error`.
    ///
    /// Skips pop the head target; the caller continues with the next one.
    fn degrade(&mut self, error: Error, anchor: Option<&AnchorId>) {
        match error.degradation() {
            Degradation::SkipTarget => {
                let skipped = self.queue.pop_front();
                self.probe.reset();
                self.phase = Phase::Advancing;
                let anchor = anchor
                    .cloned()
                    .or_else(|| skipped.map(|t| t.anchor))
                    .unwrap_or_else(|| AnchorId::new(""));
                warn!(
                    target: "coachmark.engine",
                    anchor = %anchor,
                    error_type = error.error_type(),
                    error = %error,
                    "target skipped"
                );
                self.emit(SessionEvent::TargetSkipped { anchor, error });
            }
            Degradation::CompleteSession => {
                warn!(
                    target: "coachmark.engine",
                    error_type = error.error_type(),
                    error = %error,
                    "session aborted"
                );
                self.finish(CompletionCause::ContainerGone);
            }
        }
    }

    fn dispatch(&mut self, wake: Wake) {
        match wake {
            Wake::Probe { epoch } if epoch == self.epoch => {
                if matches!(self.phase, Phase::Probing | Phase::Advancing) {
                    self.run_probe();
                }
            }
            Wake::Dismiss { epoch, token } if epoch == self.epoch => {
                let cause = self.current.as_mut().and_then(|p| {
                    p.dismissal
                        .timer_elapsed(token)
                        .or_else(|| p.dismissal.immediate(token))
                });
                match cause {
                    Some(cause) => self.dismiss(cause),
                    None => trace!(target: "coachmark.engine", token, "stale dismissal wake"),
                }
            }
            _ => trace!(target: "coachmark.engine", ?wake, "wake from earlier session ignored"),
        }
    }

    fn external(&mut self, trigger: fn(&mut DismissalController) -> Option<DismissCause>) -> bool {
        if self.phase != Phase::AwaitingDismissal {
            return false;
        }
        let cause = self.current.as_mut().and_then(|p| trigger(&mut p.dismissal));
        match cause {
            Some(cause) => {
                self.dismiss(cause);
                true
            }
            None => false,
        }
    }

    fn dismiss(&mut self, cause: DismissCause) {
        let Some(presentation) = self.current.take() else {
            return;
        };
        self.phase = Phase::Advancing;
        if !presentation.persistent {
            self.overlay.retire(presentation.id);
        }
        self.queue.pop_front();
        debug!(
            target: "coachmark.engine",
            anchor = %presentation.anchor,
            cause = cause.as_str(),
            remaining = self.queue.len(),
            "target dismissed"
        );
        self.emit(SessionEvent::TargetDismissed {
            anchor: presentation.anchor,
            cause,
        });

        if self.queue.is_empty() {
            self.finish(CompletionCause::Exhausted);
        } else {
            self.schedule(Duration::ZERO, Wake::Probe { epoch: self.epoch });
        }
    }

    fn finish(&mut self, cause: CompletionCause) {
        self.scheduler.clear();
        self.queue.clear();
        self.current = None;
        self.probe.reset();
        self.overlay.teardown();
        self.phase = Phase::Completed;
        self.epoch += 1;
        debug!(target: "coachmark.engine", cause = cause.as_str(), "session completed");
        self.emit(SessionEvent::Completed { cause });

        if let Some(mut hook) = self.on_complete.take() {
            hook();
            if self.on_complete.is_none() {
                self.on_complete = Some(hook);
            }
        }
    }
}
