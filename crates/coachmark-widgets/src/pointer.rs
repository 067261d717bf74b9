#![forbid(unsafe_code)]

//! Pointer curves rasterized to box-drawing glyphs.
//!
//! The curve is sampled in the pointer frame, snapped to cells, and each cell
//! gets a stroke glyph for the local direction. The last cell gets an arrow
//! head facing the direction of travel.

use coachmark_core::{Point, Rect};
use coachmark_layout::{CurveKind, PointerCurve, PointerSpec};

use crate::buffer::{CellBuffer, CellFlags};

/// Evaluate the curve at `t` in normalized coordinates.
#[must_use]
pub fn bezier(curve: &PointerCurve, kind: CurveKind, t: f32) -> Point {
    let t = t.clamp(0.0, 1.0);
    let u = 1.0 - t;
    match (kind, curve.control2) {
        (CurveKind::Cubic, Some(c2)) => {
            let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
            Point::new(
                a * curve.tail.x + b * curve.control1.x + c * c2.x + d * curve.head.x,
                a * curve.tail.y + b * curve.control1.y + c * c2.y + d * curve.head.y,
            )
        }
        _ => {
            let (a, b, c) = (u * u, 2.0 * u * t, t * t);
            Point::new(
                a * curve.tail.x + b * curve.control1.x + c * curve.head.x,
                a * curve.tail.y + b * curve.control1.y + c * curve.head.y,
            )
        }
    }
}

/// Cells the pointer passes through, tail first, without repeats.
///
/// Sampling density follows the frame but never exceeds what `clip` can
/// show, so oversized pointers cost no more than the visible area.
#[must_use]
pub fn trace(frame: Rect, spec: &PointerSpec, clip: Rect) -> Vec<(i32, i32)> {
    if frame.is_empty() {
        return vec![];
    }
    let wanted = ((frame.width + frame.height) * 2.0).ceil();
    let limit = ((clip.width + clip.height) * 4.0).ceil();
    let samples = wanted.min(limit).max(8.0) as usize;
    let min_x = frame.left().floor() as i32;
    let min_y = frame.top().floor() as i32;
    let max_x = (frame.right().ceil() as i32 - 1).max(min_x);
    let max_y = (frame.bottom().ceil() as i32 - 1).max(min_y);

    let mut cells: Vec<(i32, i32)> = Vec::with_capacity(samples + 1);
    for i in 0..=samples {
        let t = i as f32 / samples as f32;
        let p = frame.denormalize(bezier(&spec.curve, spec.kind, t));
        let cell = (
            (p.x.floor() as i32).clamp(min_x, max_x),
            (p.y.floor() as i32).clamp(min_y, max_y),
        );
        if cells.last() != Some(&cell) {
            cells.push(cell);
        }
    }
    cells
}

/// Stroke glyph for a step of `(dx, dy)` cells. `y` grows downwards.
#[must_use]
pub const fn stroke_glyph(dx: i32, dy: i32) -> char {
    match (dx.signum(), dy.signum()) {
        (0, 0) => '·',
        (_, 0) => '─',
        (0, _) => '│',
        (a, b) if a == b => '╲',
        _ => '╱',
    }
}

/// Arrow head for travel along `(dx, dy)`.
#[must_use]
pub fn head_glyph(dx: f32, dy: f32) -> char {
    if dx.abs() >= dy.abs() {
        if dx >= 0.0 { '▶' } else { '◀' }
    } else if dy > 0.0 {
        '▼'
    } else {
        '▲'
    }
}

/// Draw the pointer into `buf`. Invisible pointers draw nothing.
pub fn draw(buf: &mut CellBuffer, frame: Rect, spec: &PointerSpec) {
    if !spec.visible {
        return;
    }
    let cells = trace(frame, spec, buf.area());
    let Some(&(hx, hy)) = cells.last() else {
        return;
    };
    let flags = CellFlags::POINTER | CellFlags::BOLD;

    for (i, &(x, y)) in cells.iter().enumerate() {
        let prev = if i > 0 { cells[i - 1] } else { (x, y) };
        let next = cells.get(i + 1).copied().unwrap_or((x, y));
        buf.set(x, y, stroke_glyph(next.0 - prev.0, next.1 - prev.1), flags);
    }

    if spec.head_size > 0.0 && cells.len() > 1 {
        // Direction over the final stretch, not just the last step.
        let from = cells[cells.len().saturating_sub(4)];
        let glyph = head_glyph((hx - from.0) as f32, (hy - from.1) as f32);
        buf.set(hx, hy, glyph, flags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(tail: Point, head: Point, control1: Point) -> PointerSpec {
        PointerSpec {
            curve: PointerCurve {
                tail,
                head,
                control1,
                control2: None,
            },
            kind: CurveKind::Quadratic,
            head_size: 1.0,
            width: 6.0,
            height: 4.0,
            visible: true,
        }
    }

    #[test]
    fn bezier_endpoints() {
        let s = spec(Point::new(0.0, 1.0), Point::new(1.0, 0.0), Point::new(0.0, 0.0));
        assert_eq!(bezier(&s.curve, s.kind, 0.0), Point::new(0.0, 1.0));
        assert_eq!(bezier(&s.curve, s.kind, 1.0), Point::new(1.0, 0.0));
        let mid = bezier(&s.curve, s.kind, 0.5);
        assert!((mid.x - 0.25).abs() < 1e-6 && (mid.y - 0.25).abs() < 1e-6);
    }

    #[test]
    fn cubic_without_second_control_is_quadratic() {
        let s = spec(Point::new(0.0, 1.0), Point::new(1.0, 0.0), Point::new(0.0, 0.0));
        for t in [0.1, 0.4, 0.9] {
            assert_eq!(
                bezier(&s.curve, CurveKind::Cubic, t),
                bezier(&s.curve, CurveKind::Quadratic, t)
            );
        }
    }

    #[test]
    fn trace_stays_inside_frame_and_is_connected_at_ends() {
        let frame = Rect::new(2.0, 1.0, 6.0, 4.0);
        let s = spec(Point::new(0.5, 1.0), Point::new(0.5, 0.0), Point::new(0.9, 0.5));
        let cells = trace(frame, &s, Rect::new(0.0, 0.0, 20.0, 10.0));
        assert_eq!(cells.first(), Some(&(5, 4)));
        assert_eq!(cells.last(), Some(&(5, 1)));
        assert!(cells.iter().all(|&(x, y)| (2..8).contains(&x) && (1..5).contains(&y)));
    }

    #[test]
    fn oversized_frame_is_sampled_for_the_clip() {
        let frame = Rect::new(-2.5e6, -2.5e6, 5e6, 5e6);
        let s = spec(Point::new(0.0, 1.0), Point::new(1.0, 0.0), Point::new(0.5, 0.5));
        let clip = Rect::new(0.0, 0.0, 40.0, 14.0);
        let cells = trace(frame, &s, clip);
        assert!(cells.len() <= (40 + 14) * 4 + 1, "{} cells", cells.len());
        assert_eq!(cells.first(), Some(&(-2_500_000, 2_499_999)));

        let mut buf = CellBuffer::new(40, 14);
        draw(&mut buf, frame, &s);
        assert!(buf.count(CellFlags::POINTER) <= 40 * 14);
    }

    #[test]
    fn glyphs_follow_direction() {
        assert_eq!(stroke_glyph(1, 0), '─');
        assert_eq!(stroke_glyph(0, -2), '│');
        assert_eq!(stroke_glyph(1, 1), '╲');
        assert_eq!(stroke_glyph(1, -1), '╱');
        assert_eq!(head_glyph(0.0, -3.0), '▲');
        assert_eq!(head_glyph(-2.0, 1.0), '◀');
    }

    #[test]
    fn upward_pointer_ends_in_up_head() {
        let mut buf = CellBuffer::new(10, 6);
        let s = spec(Point::new(0.5, 1.0), Point::new(0.5, 0.0), Point::new(0.5, 0.5));
        draw(&mut buf, Rect::new(2.0, 1.0, 5.0, 4.0), &s);
        assert_eq!(buf.get(4, 1).map(|c| c.ch), Some('▲'));
        assert_eq!(buf.get(4, 3).map(|c| c.ch), Some('│'));
        assert_eq!(buf.count(CellFlags::POINTER), 4);
    }

    #[test]
    fn invisible_pointer_draws_nothing() {
        let mut buf = CellBuffer::new(10, 6);
        let mut s = spec(Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(1.0, 0.0));
        s.visible = false;
        draw(&mut buf, Rect::new(0.0, 0.0, 6.0, 4.0), &s);
        assert_eq!(buf.count(CellFlags::POINTER), 0);
    }
}
