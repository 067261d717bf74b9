#![forbid(unsafe_code)]

//! Cutout hit-testing.

use coachmark_core::Shape;
use coachmark_runtime::Cutout;

/// Whether the point `(x, y)` lies inside the cutout's hole.
///
/// `Shape::None` never punches a hole.
#[must_use]
pub fn covers(cutout: &Cutout, x: f32, y: f32) -> bool {
    let rect = &cutout.rect;
    match cutout.shape {
        Shape::None => false,
        Shape::Rect => rect.contains(x, y),
        Shape::Ellipse => {
            let rx = rect.width / 2.0;
            let ry = rect.height / 2.0;
            if rx <= 0.0 || ry <= 0.0 {
                return false;
            }
            let dx = (x - rect.center_x()) / rx;
            let dy = (y - rect.center_y()) / ry;
            dx * dx + dy * dy <= 1.0
        }
        Shape::RoundedRect => {
            if !rect.contains(x, y) {
                return false;
            }
            let r = cutout
                .corner_radius
                .min(rect.width / 2.0)
                .min(rect.height / 2.0)
                .max(0.0);
            // Distance past the inner rectangle whose corners are the arc centres.
            let dx = (rect.left() + r - x).max(x - (rect.right() - r)).max(0.0);
            let dy = (rect.top() + r - y).max(y - (rect.bottom() - r)).max(0.0);
            dx * dx + dy * dy <= r * r
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coachmark_core::Rect;

    fn cutout(shape: Shape, radius: f32) -> Cutout {
        Cutout {
            rect: Rect::new(0.0, 0.0, 10.0, 6.0),
            shape,
            corner_radius: radius,
        }
    }

    #[test]
    fn rect_covers_interior() {
        let c = cutout(Shape::Rect, 0.0);
        assert!(covers(&c, 0.5, 0.5));
        assert!(covers(&c, 9.5, 5.5));
        assert!(!covers(&c, 10.5, 0.5));
    }

    #[test]
    fn ellipse_excludes_corners() {
        let c = cutout(Shape::Ellipse, 0.0);
        assert!(covers(&c, 5.0, 3.0));
        assert!(covers(&c, 0.5, 3.0));
        assert!(!covers(&c, 0.5, 0.5));
    }

    #[test]
    fn rounded_rect_trims_corners_only() {
        let c = cutout(Shape::RoundedRect, 3.0);
        assert!(!covers(&c, 0.2, 0.2));
        assert!(covers(&c, 5.0, 0.2));
        assert!(covers(&c, 0.2, 3.0));
        assert!(covers(&c, 2.0, 2.0));
    }

    #[test]
    fn rounded_rect_radius_is_capped() {
        let huge = cutout(Shape::RoundedRect, 100.0);
        let capped = cutout(Shape::RoundedRect, 3.0);
        assert_eq!(covers(&huge, 0.2, 0.2), covers(&capped, 0.2, 0.2));
        assert!(covers(&huge, 5.0, 3.0));
    }

    #[test]
    fn none_never_covers() {
        let c = cutout(Shape::None, 0.0);
        assert!(!covers(&c, 5.0, 3.0));
    }
}
