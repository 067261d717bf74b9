#![forbid(unsafe_code)]

//! FIFO of pending targets.
//!
//! The queue is the session's progress: the head is the target being probed
//! or presented, and it is popped only once that target is dismissed or
//! skipped.

use std::collections::VecDeque;

use coachmark_core::Target;

#[derive(Debug, Default, Clone)]
pub struct TargetQueue {
    targets: VecDeque<Target>,
}

impl TargetQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, target: Target) {
        self.targets.push_back(target);
    }

    pub fn append_all(&mut self, targets: impl IntoIterator<Item = Target>) {
        self.targets.extend(targets);
    }

    /// Remove and return the head. `None` on an empty queue.
    pub fn pop_front(&mut self) -> Option<Target> {
        self.targets.pop_front()
    }

    #[must_use]
    pub fn front(&self) -> Option<&Target> {
        self.targets.front()
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }
}

impl Extend<Target> for TargetQueue {
    fn extend<I: IntoIterator<Item = Target>>(&mut self, iter: I) {
        self.append_all(iter);
    }
}

impl FromIterator<Target> for TargetQueue {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}
