#![forbid(unsafe_code)]

//! Capture `tracing` spans and events for assertions.
//!
//! ```
//! use coachmark_harness::with_captured_tracing;
//!
//! let handle = with_captured_tracing(|| {
//!     let _span = tracing::debug_span!(target: "coachmark.engine", "coachmark.engine.fire").entered();
//!     tracing::warn!(target: "coachmark.engine", anchor = "save", "target skipped");
//! });
//! let events = handle.events();
//! assert_eq!(events[0].message, "target skipped");
//! assert_eq!(events[0].parent_span.as_deref(), Some("coachmark.engine.fire"));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// A captured span with its metadata and parent.
#[derive(Debug, Clone)]
pub struct CapturedSpan {
    pub name: String,
    pub target: String,
    pub level: Level,
    pub fields: HashMap<String, String>,
    pub parent: Option<String>,
}

/// A captured event with its metadata and enclosing span.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: HashMap<String, String>,
    pub parent_span: Option<String>,
}

type Shared<T> = Arc<Mutex<Vec<T>>>;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Read captured data after the closure ran.
#[derive(Debug, Clone, Default)]
pub struct CaptureHandle {
    spans: Shared<CapturedSpan>,
    events: Shared<CapturedEvent>,
}

impl CaptureHandle {
    #[must_use]
    pub fn spans(&self) -> Vec<CapturedSpan> {
        lock(&self.spans).clone()
    }

    #[must_use]
    pub fn events(&self) -> Vec<CapturedEvent> {
        lock(&self.events).clone()
    }

    /// Events emitted under `target`.
    #[must_use]
    pub fn events_for(&self, target: &str) -> Vec<CapturedEvent> {
        lock(&self.events)
            .iter()
            .filter(|e| e.target == target)
            .cloned()
            .collect()
    }

    /// Events with `message`.
    #[must_use]
    pub fn events_named(&self, message: &str) -> Vec<CapturedEvent> {
        lock(&self.events)
            .iter()
            .filter(|e| e.message == message)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn spans_named(&self, name: &str) -> Vec<CapturedSpan> {
        lock(&self.spans)
            .iter()
            .filter(|s| s.name == name)
            .cloned()
            .collect()
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

struct CaptureLayer {
    handle: CaptureHandle,
    index: Mutex<HashMap<u64, usize>>,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        let parent = ctx
            .current_span()
            .id()
            .and_then(|pid| ctx.span(pid))
            .map(|s| s.name().to_string());

        let mut spans = lock(&self.handle.spans);
        lock(&self.index).insert(id.into_u64(), spans.len());
        spans.push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            target: attrs.metadata().target().to_string(),
            level: *attrs.metadata().level(),
            fields: visitor.0.into_iter().collect(),
            parent,
        });
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        values.record(&mut visitor);
        let Some(&idx) = lock(&self.index).get(&id.into_u64()) else {
            return;
        };
        if let Some(span) = lock(&self.handle.spans).get_mut(idx) {
            span.fields.extend(visitor.0);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        let parent_span = ctx
            .event_span(event)
            .map(|s| s.name().to_string());

        lock(&self.handle.events).push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message,
            fields,
            parent_span,
        });
    }
}

/// Run `f` with a capturing subscriber installed for the current thread.
pub fn with_captured_tracing<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let handle = CaptureHandle::default();
    let layer = CaptureLayer {
        handle: handle.clone(),
        index: Mutex::new(HashMap::new()),
    };
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(layer);
    tracing::subscriber::with_default(subscriber, f);
    handle
}
