#![forbid(unsafe_code)]

use std::cell::Cell;

use coachmark_core::Rect;
use coachmark_runtime::ContainerRegion;

/// A container with settable bounds.
#[derive(Debug)]
pub struct FixedContainer {
    bounds: Cell<Rect>,
}

impl FixedContainer {
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds: Cell::new(bounds),
        }
    }

    pub fn resize(&self, bounds: Rect) {
        self.bounds.set(bounds);
    }
}

impl ContainerRegion for FixedContainer {
    fn bounds(&self) -> Rect {
        self.bounds.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_updates_bounds() {
        let c = FixedContainer::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        c.resize(Rect::new(0.0, 0.0, 20.0, 5.0));
        assert_eq!(c.bounds(), Rect::new(0.0, 0.0, 20.0, 5.0));
    }
}
