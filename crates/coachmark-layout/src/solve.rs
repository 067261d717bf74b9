#![forbid(unsafe_code)]

//! Deterministic resolution of an annotation's constraints.
//!
//! The constraint sets [`place`](crate::place) emits are small and acyclic,
//! so a fixed evaluation order resolves them without a general solver:
//!
//! 1. Pointer size from its fixed width/height.
//! 2. Pointer position from its anchor attachments.
//! 3. Label size: measured text, capped by the `Width <=` bound.
//! 4. Label position from its equalities (pointer or anchor).
//! 5. Inequalities against the container: upper bounds first, then lower
//!    bounds, so a label wider than the container keeps its leading edge.
//!
//! Axes left unconstrained fall back to the anchor's centre.

use coachmark_core::Rect;

use crate::constraint::{Attribute, Constraint, Item, Relation};
use crate::placement::Annotation;

/// Resolved frames, in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frames {
    pub pointer: Option<Rect>,
    pub label: Rect,
}

/// Resolve `annotation` inside `container`.
///
/// `measure(text, max_width)` returns the natural `(width, height)` of the
/// label text when wrapped at `max_width`.
pub fn solve<M>(annotation: &Annotation, container: Rect, measure: M) -> Frames
where
    M: FnOnce(&str, f32) -> (f32, f32),
{
    let anchor = annotation.anchor;
    let constraints = &annotation.constraints;

    let pointer = annotation.pointer.as_ref().map(|_| {
        let mut size = Rect::default();
        apply_fixed(constraints, Item::Pointer, &mut size);
        let mut frame = centred_on(&anchor, size.width, size.height);
        for c in equalities(constraints, Item::Pointer) {
            if let Some(reference) = reference_frame(c, &anchor, &container, None) {
                let value = reference_value(c, &reference);
                c.attribute.pin(&mut frame, value);
            }
        }
        frame
    });

    let max_width = constraints
        .iter()
        .filter(|c| {
            c.item == Item::Label
                && c.attribute == Attribute::Width
                && c.relation == Relation::LessOrEqual
                && c.target.is_none()
        })
        .map(|c| c.constant)
        .fold(annotation.label.max_width, f32::min);
    let (natural_w, natural_h) = measure(&annotation.label.text, max_width);
    let mut label = centred_on(&anchor, natural_w.min(max_width).max(0.0), natural_h.max(0.0));

    for c in equalities(constraints, Item::Label) {
        if let Some(reference) = reference_frame(c, &anchor, &container, pointer.as_ref()) {
            let value = reference_value(c, &reference);
            c.attribute.pin(&mut label, value);
        }
    }

    clamp_to_container(constraints, &container, &mut label);

    Frames { pointer, label }
}

fn centred_on(anchor: &Rect, width: f32, height: f32) -> Rect {
    Rect::new(
        anchor.center_x() - width / 2.0,
        anchor.center_y() - height / 2.0,
        width,
        height,
    )
}

fn apply_fixed(constraints: &[Constraint], item: Item, frame: &mut Rect) {
    for c in constraints {
        if c.item == item && c.relation == Relation::Equal && c.target.is_none() {
            c.attribute.pin(frame, c.constant);
        }
    }
}

fn equalities(constraints: &[Constraint], item: Item) -> impl Iterator<Item = &Constraint> {
    constraints
        .iter()
        .filter(move |c| c.item == item && c.relation == Relation::Equal && c.target.is_some())
}

fn reference_frame(
    c: &Constraint,
    anchor: &Rect,
    container: &Rect,
    pointer: Option<&Rect>,
) -> Option<Rect> {
    match c.target?.0 {
        Item::Anchor => Some(*anchor),
        Item::Container => Some(*container),
        Item::Pointer => pointer.copied(),
        Item::Label => None,
    }
}

fn reference_value(c: &Constraint, reference: &Rect) -> f32 {
    c.target
        .map_or(0.0, |(_, attr)| attr.value_in(reference))
        + c.constant
}

/// Bound on a label attribute implied by a label/container inequality.
enum Bound {
    Upper(Attribute, f32),
    Lower(Attribute, f32),
}

fn container_bound(c: &Constraint, container: &Rect) -> Option<Bound> {
    let (target_item, target_attr) = c.target?;
    match (c.item, target_item, c.relation) {
        // label.a >= container.b + k
        (Item::Label, Item::Container, Relation::GreaterOrEqual) => Some(Bound::Lower(
            c.attribute,
            target_attr.value_in(container) + c.constant,
        )),
        // label.a <= container.b + k
        (Item::Label, Item::Container, Relation::LessOrEqual) => Some(Bound::Upper(
            c.attribute,
            target_attr.value_in(container) + c.constant,
        )),
        // container.a >= label.b + k  =>  label.b <= container.a - k
        (Item::Container, Item::Label, Relation::GreaterOrEqual) => Some(Bound::Upper(
            target_attr,
            c.attribute.value_in(container) - c.constant,
        )),
        // container.a <= label.b + k  =>  label.b >= container.a - k
        (Item::Container, Item::Label, Relation::LessOrEqual) => Some(Bound::Lower(
            target_attr,
            c.attribute.value_in(container) - c.constant,
        )),
        _ => None,
    }
}

fn clamp_to_container(constraints: &[Constraint], container: &Rect, label: &mut Rect) {
    let bounds: Vec<Bound> = constraints
        .iter()
        .filter_map(|c| container_bound(c, container))
        .collect();

    for bound in &bounds {
        if let Bound::Upper(attr, limit) = *bound
            && attr.value_in(label) > limit
        {
            attr.pin(label, limit);
        }
    }
    for bound in &bounds {
        if let Bound::Lower(attr, limit) = *bound
            && attr.value_in(label) < limit
        {
            attr.pin(label, limit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::place;
    use coachmark_core::{Position, Sides, Target};

    const CONTAINER: Rect = Rect::new(0.0, 0.0, 400.0, 300.0);

    fn fixed(w: f32, h: f32) -> impl FnOnce(&str, f32) -> (f32, f32) {
        move |_, _| (w, h)
    }

    fn frames(target: Target, anchor: Rect, w: f32, h: f32) -> Frames {
        let annotation = place(&target, anchor).unwrap();
        solve(&annotation, CONTAINER, fixed(w, h))
    }

    #[test]
    fn bottom_places_pointer_below_anchor_and_label_below_pointer() {
        let anchor = Rect::new(180.0, 50.0, 40.0, 20.0);
        let f = frames(Target::new("a", "m").position(Position::Bottom), anchor, 100.0, 20.0);
        let pointer = f.pointer.unwrap();
        assert_eq!(pointer, Rect::new(175.0, 70.0, 50.0, 50.0));
        assert_eq!(f.label, Rect::new(150.0, 120.0, 100.0, 20.0));
    }

    #[test]
    fn top_places_label_above_pointer() {
        let anchor = Rect::new(180.0, 200.0, 40.0, 20.0);
        let f = frames(Target::new("a", "m").position(Position::Top), anchor, 100.0, 20.0);
        let pointer = f.pointer.unwrap();
        assert_eq!(pointer.bottom(), 200.0);
        assert_eq!(f.label.bottom(), pointer.top());
        assert_eq!(f.label.center_x(), pointer.center_x());
    }

    #[test]
    fn centre_centres_label_on_anchor() {
        let anchor = Rect::new(100.0, 100.0, 60.0, 40.0);
        let f = frames(Target::new("a", "m").position(Position::Centre), anchor, 30.0, 10.0);
        assert!(f.pointer.is_none());
        assert_eq!(f.label.center(), anchor.center());
    }

    #[test]
    fn text_margins_nudge_centred_label() {
        let anchor = Rect::new(100.0, 100.0, 60.0, 40.0);
        let target = Target::new("a", "m")
            .position(Position::Centre)
            .text_margins(Sides::new(6.0, 0.0, 0.0, 4.0));
        let f = frames(target, anchor, 30.0, 10.0);
        assert_eq!(f.label.center_x(), anchor.center_x() + 4.0);
        assert_eq!(f.label.center_y(), anchor.center_y() + 6.0);
    }

    #[test]
    fn label_width_caps_measured_width() {
        let anchor = Rect::new(180.0, 50.0, 40.0, 20.0);
        let target = Target::new("a", "m").label_width(120.0);
        let mut seen = 0.0;
        let annotation = place(&target, anchor).unwrap();
        let f = solve(&annotation, CONTAINER, |_, max| {
            seen = max;
            (500.0, 20.0)
        });
        assert_eq!(seen, 120.0);
        assert_eq!(f.label.width, 120.0);
    }

    #[test]
    fn label_clamped_to_trailing_edge() {
        let anchor = Rect::new(380.0, 50.0, 20.0, 20.0);
        let f = frames(Target::new("a", "m"), anchor, 200.0, 20.0);
        assert_eq!(f.label.right(), CONTAINER.right());
    }

    #[test]
    fn label_clamped_to_leading_edge() {
        let anchor = Rect::new(0.0, 50.0, 20.0, 20.0);
        let f = frames(Target::new("a", "m"), anchor, 200.0, 20.0);
        assert_eq!(f.label.left(), CONTAINER.left());
    }

    #[test]
    fn oversized_label_keeps_leading_edge() {
        let anchor = Rect::new(180.0, 50.0, 40.0, 20.0);
        let target = Target::new("a", "m").label_width(1000.0);
        let f = frames(target, anchor, 600.0, 20.0);
        assert_eq!(f.label.left(), 0.0);
        assert_eq!(f.label.width, 600.0);
    }

    #[test]
    fn left_pointer_head_touches_anchor_left_edge() {
        let anchor = Rect::new(200.0, 100.0, 40.0, 20.0);
        let f = frames(Target::new("a", "m").position(Position::Left), anchor, 80.0, 20.0);
        let pointer = f.pointer.unwrap();
        assert_eq!(pointer.right(), anchor.left());
        assert_eq!(pointer.center_y(), anchor.center_y());
        assert_eq!(f.label.right(), pointer.left());
    }

    #[test]
    fn hidden_pointer_still_offsets_label() {
        let anchor = Rect::new(180.0, 50.0, 40.0, 20.0);
        let shown = frames(Target::new("a", "m"), anchor, 100.0, 20.0);
        let hidden = frames(Target::new("a", "m").with_arrow(false), anchor, 100.0, 20.0);
        assert_eq!(shown.label, hidden.label);
    }
}
