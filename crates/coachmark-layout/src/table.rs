#![forbid(unsafe_code)]

//! The placement table.
//!
//! One entry per [`Position`]. Each entry answers two questions:
//!
//! * **Pointer rule** (used when the position is the *arrow start*): the curve
//!   the pointer draws inside its own box, which attributes of that box form
//!   the head, and how the label aligns to the box.
//! * **Anchor rule** (used when the position is the *target position*): which
//!   anchor attributes the pointer head attaches to, with margin offsets.
//!
//! A target's position and arrow start may differ, so a `Top` target can use
//! the `Left` pointer. `Centre` has no pointer rule; its anchor rule centres
//! the label on the anchor using the text margins.
//!
//! # Invariants
//!
//! 1. The table has exactly one entry per position, at `Position::index()`.
//! 2. Curve points are normalized to the pointer's box (`0.0..=1.0`).
//! 3. `Centre` is the only entry without a pointer rule.

use coachmark_core::{Point, Position};

use crate::constraint::{Attribute, Edge, Offset};

use Attribute::{Bottom, CenterX, CenterY, Left, Right, Top};
use Edge::{Bottom as B, Left as L, Right as R, Top as T};

/// Pointer curve in coordinates normalized to the pointer's box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerCurve {
    pub tail: Point,
    pub head: Point,
    pub control1: Point,
    pub control2: Option<Point>,
}

/// `subject.attribute == reference.to + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignRule {
    pub attribute: Attribute,
    pub to: Attribute,
    pub offset: Offset,
}

/// Attach one axis of the subject to an anchor attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachRule {
    pub to: Attribute,
    pub offset: Offset,
}

/// How the pointer looks and where the label goes relative to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerRule {
    pub curve: PointerCurve,
    /// Pointer attributes forming the head, `(x, y)`.
    pub head: (Attribute, Attribute),
    /// Label alignment to the pointer box, evaluated against text margins.
    pub label: [AlignRule; 2],
}

/// Where the subject attaches on the anchor, evaluated against target margins.
///
/// The subject is the pointer head for pointer-bearing positions and the
/// label centre for `Centre`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorRule {
    pub x: AttachRule,
    pub y: AttachRule,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRule {
    pub position: Position,
    pub pointer: Option<PointerRule>,
    pub anchor: AnchorRule,
}

// ── Table construction helpers ──────────────────────────────────────────

const fn p(x: f32, y: f32) -> Point {
    Point::new(x, y)
}

const fn align(attribute: Attribute, to: Attribute, offset: Offset) -> AlignRule {
    AlignRule {
        attribute,
        to,
        offset,
    }
}

const fn attach(to: Attribute, offset: Offset) -> AttachRule {
    AttachRule { to, offset }
}

const fn side(edge: Edge) -> Offset {
    Offset::Side(edge)
}

const fn diff(a: Edge, b: Edge) -> Offset {
    Offset::Diff(a, b)
}

// ── The table ───────────────────────────────────────────────────────────

/// Placement rules indexed by [`Position::index`].
pub static PLACEMENT_TABLE: [PlacementRule; 9] = [
    PlacementRule {
        position: Position::Top,
        pointer: Some(PointerRule {
            curve: PointerCurve {
                tail: p(0.5, 0.05),
                head: p(0.5, 0.95),
                control1: p(0.8, 0.4),
                control2: Some(p(0.2, 0.6)),
            },
            head: (CenterX, Bottom),
            label: [
                align(CenterX, CenterX, diff(L, R)),
                align(Bottom, Top, side(B)),
            ],
        }),
        anchor: AnchorRule {
            x: attach(CenterX, diff(L, R)),
            y: attach(Top, side(T)),
        },
    },
    PlacementRule {
        position: Position::Bottom,
        pointer: Some(PointerRule {
            curve: PointerCurve {
                tail: p(0.5, 0.95),
                head: p(0.5, 0.05),
                control1: p(0.2, 0.6),
                control2: Some(p(0.8, 0.4)),
            },
            head: (CenterX, Top),
            label: [
                align(CenterX, CenterX, diff(L, R)),
                align(Top, Bottom, side(T)),
            ],
        }),
        anchor: AnchorRule {
            x: attach(CenterX, diff(L, R)),
            y: attach(Bottom, side(B)),
        },
    },
    PlacementRule {
        position: Position::Left,
        pointer: Some(PointerRule {
            curve: PointerCurve {
                tail: p(0.05, 0.5),
                head: p(0.95, 0.5),
                control1: p(0.5, 1.0),
                control2: None,
            },
            head: (Right, CenterY),
            label: [
                align(Right, Left, side(R)),
                align(CenterY, CenterY, diff(T, B)),
            ],
        }),
        anchor: AnchorRule {
            x: attach(Left, side(L)),
            y: attach(CenterY, diff(T, B)),
        },
    },
    PlacementRule {
        position: Position::Right,
        pointer: Some(PointerRule {
            curve: PointerCurve {
                tail: p(0.95, 0.5),
                head: p(0.05, 0.5),
                control1: p(0.5, 0.0),
                control2: None,
            },
            head: (Left, CenterY),
            label: [
                align(Left, Right, side(L)),
                align(CenterY, CenterY, diff(T, B)),
            ],
        }),
        anchor: AnchorRule {
            x: attach(Right, side(R)),
            y: attach(CenterY, diff(T, B)),
        },
    },
    PlacementRule {
        position: Position::TopLeft,
        pointer: Some(PointerRule {
            curve: PointerCurve {
                tail: p(0.05, 0.05),
                head: p(0.95, 0.95),
                control1: p(0.8, 0.2),
                control2: None,
            },
            head: (Right, Bottom),
            label: [
                align(Right, Left, side(R)),
                align(Bottom, Top, side(B)),
            ],
        }),
        anchor: AnchorRule {
            x: attach(Left, side(L)),
            y: attach(Top, side(T)),
        },
    },
    PlacementRule {
        position: Position::TopRight,
        pointer: Some(PointerRule {
            curve: PointerCurve {
                tail: p(0.95, 0.05),
                head: p(0.05, 0.95),
                control1: p(0.2, 0.2),
                control2: None,
            },
            head: (Left, Bottom),
            label: [
                align(Left, Right, side(L)),
                align(Bottom, Top, side(B)),
            ],
        }),
        anchor: AnchorRule {
            x: attach(Right, side(R)),
            y: attach(Top, side(T)),
        },
    },
    PlacementRule {
        position: Position::BottomLeft,
        pointer: Some(PointerRule {
            curve: PointerCurve {
                tail: p(0.05, 0.95),
                head: p(0.95, 0.05),
                control1: p(0.8, 0.8),
                control2: None,
            },
            head: (Right, Top),
            // The horizontal offset reads the *left* text margin here, unlike
            // the other right-aligned entries. Existing layouts depend on it.
            label: [
                align(Right, Left, side(L)),
                align(Top, Bottom, side(T)),
            ],
        }),
        anchor: AnchorRule {
            x: attach(Left, side(L)),
            y: attach(Bottom, side(B)),
        },
    },
    PlacementRule {
        position: Position::BottomRight,
        pointer: Some(PointerRule {
            curve: PointerCurve {
                tail: p(0.95, 0.95),
                head: p(0.05, 0.05),
                control1: p(0.2, 0.8),
                control2: None,
            },
            head: (Left, Top),
            label: [
                align(Left, Right, side(L)),
                align(Top, Bottom, side(T)),
            ],
        }),
        anchor: AnchorRule {
            x: attach(Right, side(R)),
            y: attach(Bottom, side(B)),
        },
    },
    PlacementRule {
        position: Position::Centre,
        pointer: None,
        anchor: AnchorRule {
            x: attach(CenterX, diff(L, R)),
            y: attach(CenterY, diff(T, B)),
        },
    },
];

/// Look up the rule for a position.
#[inline]
#[must_use]
pub fn rule_for(position: Position) -> &'static PlacementRule {
    &PLACEMENT_TABLE[position.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_position() {
        for position in Position::ALL {
            assert_eq!(rule_for(position).position, position);
        }
    }

    #[test]
    fn only_centre_lacks_pointer() {
        for rule in &PLACEMENT_TABLE {
            assert_eq!(rule.pointer.is_none(), rule.position == Position::Centre);
        }
    }

    #[test]
    fn curve_points_are_normalized() {
        let unit = |pt: Point| (0.0..=1.0).contains(&pt.x) && (0.0..=1.0).contains(&pt.y);
        for rule in PLACEMENT_TABLE.iter().filter_map(|r| r.pointer) {
            let c = rule.curve;
            assert!(unit(c.tail) && unit(c.head) && unit(c.control1));
            assert!(c.control2.is_none_or(unit));
        }
    }

    #[test]
    fn only_vertical_pointers_carry_second_control_point() {
        for rule in &PLACEMENT_TABLE {
            let has_c2 = rule.pointer.is_some_and(|p| p.curve.control2.is_some());
            let vertical = matches!(rule.position, Position::Top | Position::Bottom);
            assert_eq!(has_c2, vertical, "{:?}", rule.position);
        }
    }

    #[test]
    fn top_entry_matches_reference_values() {
        let rule = rule_for(Position::Top).pointer.unwrap();
        assert_eq!(rule.curve.tail, p(0.5, 0.05));
        assert_eq!(rule.curve.head, p(0.5, 0.95));
        assert_eq!(rule.curve.control1, p(0.8, 0.4));
        assert_eq!(rule.curve.control2, Some(p(0.2, 0.6)));
        assert_eq!(rule.head, (CenterX, Bottom));
    }

    #[test]
    fn bottom_left_label_uses_left_text_margin() {
        let rule = rule_for(Position::BottomLeft).pointer.unwrap();
        assert_eq!(rule.label[0], align(Right, Left, side(L)));
        let top_left = rule_for(Position::TopLeft).pointer.unwrap();
        assert_eq!(top_left.label[0], align(Right, Left, side(R)));
    }

    #[test]
    fn head_attribute_points_toward_anchor() {
        // A pointer used at its own position puts the head on the side that
        // faces the anchor.
        let cases = [
            (Position::Top, Bottom),
            (Position::Bottom, Top),
            (Position::Left, Right),
            (Position::Right, Left),
        ];
        for (position, expected) in cases {
            let head = rule_for(position).pointer.unwrap().head;
            let facing = if expected.is_horizontal() { head.0 } else { head.1 };
            assert_eq!(facing, expected, "{position:?}");
        }
    }

    #[test]
    fn centre_attaches_label_centre() {
        let rule = rule_for(Position::Centre);
        assert_eq!(rule.anchor.x, attach(CenterX, diff(L, R)));
        assert_eq!(rule.anchor.y, attach(CenterY, diff(T, B)));
    }
}
