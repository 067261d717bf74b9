#![forbid(unsafe_code)]

//! Deterministic deferred-task queue on a virtual clock.
//!
//! Tasks are scheduled relative to the queue's clock and come back out in
//! `(due, insertion order)` order. The clock only moves when the owner pops
//! tasks or advances it explicitly, so the same schedule always replays the
//! same way.
//!
//! # Invariants
//!
//! 1. `now()` never decreases.
//! 2. Tasks with equal due times pop in insertion order.
//! 3. A task scheduled while draining with `pop_due(deadline)` is eligible in
//!    the same drain if it falls due by `deadline`.
//!
//! # Example
//!
//! ```
//! use coachmark_runtime::DeferredQueue;
//! use web_time::Duration;
//!
//! let mut q = DeferredQueue::new();
//! q.after(Duration::from_millis(50), "b");
//! q.after(Duration::ZERO, "a");
//!
//! let deadline = Duration::from_millis(100);
//! assert_eq!(q.pop_due(deadline), Some("a"));
//! assert_eq!(q.pop_due(deadline), Some("b"));
//! assert_eq!(q.now(), Duration::from_millis(50));
//! q.advance_to(deadline);
//! assert_eq!(q.now(), deadline);
//! ```

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use web_time::Duration;

struct Entry<T> {
    due: Duration,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Min-heap of tasks keyed by virtual due time.
pub struct DeferredQueue<T> {
    now: Duration,
    seq: u64,
    heap: BinaryHeap<Reverse<Entry<T>>>,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for DeferredQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("now", &self.now)
            .field("pending", &self.heap.len())
            .finish()
    }
}

impl<T> DeferredQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            seq: 0,
            heap: BinaryHeap::new(),
        }
    }

    /// Current virtual time.
    #[inline]
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `task` to run `delay` after the current virtual time.
    pub fn after(&mut self, delay: Duration, task: T) {
        let due = self.now.saturating_add(delay);
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse(Entry { due, seq, task }));
    }

    /// Pop the earliest task due at or before `deadline`, moving the clock to
    /// its due time.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<T> {
        let due = self.heap.peek()?.0.due;
        if due > deadline {
            return None;
        }
        let Reverse(entry) = self.heap.pop()?;
        self.now = self.now.max(entry.due);
        Some(entry.task)
    }

    /// Move the clock forward to `deadline` without running anything.
    pub fn advance_to(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }

    /// Absolute due time of the earliest pending task.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.heap.peek().map(|Reverse(e)| e.due)
    }

    /// Drop every pending task. The clock is kept.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
