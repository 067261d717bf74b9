#![forbid(unsafe_code)]

//! Anchors that appear on a script.

use std::cell::Cell;
use std::collections::HashMap;

use coachmark_core::{AnchorId, Rect};
use coachmark_runtime::AnchorResolver;

#[derive(Debug)]
struct Script {
    rect: Rect,
    /// Checks that still miss before the anchor resolves.
    misses: Cell<u32>,
    checks: Cell<u32>,
}

/// Resolver whose anchors become visible after a fixed number of checks.
///
/// Unknown anchors never resolve but their checks are still counted.
#[derive(Debug, Default)]
pub struct ScriptedAnchors {
    scripts: HashMap<AnchorId, Script>,
    unknown_checks: Cell<u32>,
}

impl ScriptedAnchors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `anchor` resolves to `rect` from the first check.
    #[must_use]
    pub fn visible(self, anchor: impl Into<AnchorId>, rect: Rect) -> Self {
        self.after(anchor, 0, rect)
    }

    /// `anchor` misses `misses` checks, then resolves to `rect`.
    #[must_use]
    pub fn after(mut self, anchor: impl Into<AnchorId>, misses: u32, rect: Rect) -> Self {
        self.scripts.insert(
            anchor.into(),
            Script {
                rect,
                misses: Cell::new(misses),
                checks: Cell::new(0),
            },
        );
        self
    }

    /// Detach `anchor`; later checks miss.
    pub fn hide(&mut self, anchor: &AnchorId) {
        if let Some(script) = self.scripts.get_mut(anchor) {
            script.misses.set(u32::MAX);
        }
    }

    /// Move `anchor` to `rect` and make it resolve.
    pub fn show(&mut self, anchor: impl Into<AnchorId>, rect: Rect) {
        let anchor = anchor.into();
        match self.scripts.get_mut(&anchor) {
            Some(script) => {
                script.rect = rect;
                script.misses.set(0);
            }
            None => {
                self.scripts.insert(
                    anchor,
                    Script {
                        rect,
                        misses: Cell::new(0),
                        checks: Cell::new(0),
                    },
                );
            }
        }
    }

    /// How many times `anchor` was resolved.
    #[must_use]
    pub fn checks(&self, anchor: &str) -> u32 {
        self.scripts
            .get(&AnchorId::new(anchor))
            .map_or(0, |s| s.checks.get())
    }

    /// Checks for anchors with no script.
    #[must_use]
    pub fn unknown_checks(&self) -> u32 {
        self.unknown_checks.get()
    }
}

impl AnchorResolver for ScriptedAnchors {
    fn resolve(&self, anchor: &AnchorId) -> Option<Rect> {
        let Some(script) = self.scripts.get(anchor) else {
            self.unknown_checks.set(self.unknown_checks.get() + 1);
            return None;
        };
        script.checks.set(script.checks.get() + 1);
        match script.misses.get() {
            0 => Some(script.rect),
            u32::MAX => None,
            n => {
                script.misses.set(n - 1);
                None
            }
        }
    }
}
