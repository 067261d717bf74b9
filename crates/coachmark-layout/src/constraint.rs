#![forbid(unsafe_code)]

//! Linear layout relations between annotation parts.
//!
//! A [`Constraint`] reads `item.attribute <relation> target.attribute + constant`,
//! or `item.attribute <relation> constant` when there is no target. Hosts with
//! a constraint solver can install these directly; the rest use
//! [`solve`](crate::solve::solve).

use coachmark_core::{Rect, Sides};
use smallvec::SmallVec;

/// Constraint storage sized for the largest annotation (pointer + label).
pub type ConstraintSet = SmallVec<[Constraint; 10]>;

/// Participants in an annotation layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Item {
    Label,
    Pointer,
    Anchor,
    Container,
}

/// Layout attributes a constraint can relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Left,
    Right,
    Top,
    Bottom,
    CenterX,
    CenterY,
    Width,
    Height,
    /// Left edge in left-to-right layouts.
    Leading,
    /// Right edge in left-to-right layouts.
    Trailing,
}

impl Attribute {
    /// Read this attribute from a frame.
    #[must_use]
    pub fn value_in(self, rect: &Rect) -> f32 {
        match self {
            Attribute::Left | Attribute::Leading => rect.left(),
            Attribute::Right | Attribute::Trailing => rect.right(),
            Attribute::Top => rect.top(),
            Attribute::Bottom => rect.bottom(),
            Attribute::CenterX => rect.center_x(),
            Attribute::CenterY => rect.center_y(),
            Attribute::Width => rect.width,
            Attribute::Height => rect.height,
        }
    }

    /// Move (or resize) `rect` so this attribute equals `value`.
    pub fn pin(self, rect: &mut Rect, value: f32) {
        match self {
            Attribute::Left | Attribute::Leading => rect.x = value,
            Attribute::Right | Attribute::Trailing => rect.x = value - rect.width,
            Attribute::CenterX => rect.x = value - rect.width / 2.0,
            Attribute::Top => rect.y = value,
            Attribute::Bottom => rect.y = value - rect.height,
            Attribute::CenterY => rect.y = value - rect.height / 2.0,
            Attribute::Width => rect.width = value,
            Attribute::Height => rect.height = value,
        }
    }

    /// Whether the attribute lies on the horizontal axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(
            self,
            Attribute::Left
                | Attribute::Right
                | Attribute::CenterX
                | Attribute::Width
                | Attribute::Leading
                | Attribute::Trailing
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Equal,
    LessOrEqual,
    GreaterOrEqual,
}

/// One side of a margin set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    #[must_use]
    pub fn of(self, sides: &Sides) -> f32 {
        match self {
            Edge::Top => sides.top,
            Edge::Right => sides.right,
            Edge::Bottom => sides.bottom,
            Edge::Left => sides.left,
        }
    }
}

/// A constant expression over a margin set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Offset {
    /// A single margin.
    Side(Edge),
    /// `first - second`, used to nudge a centred attribute.
    Diff(Edge, Edge),
}

impl Offset {
    /// Evaluate against concrete margins.
    #[must_use]
    pub fn eval(self, sides: &Sides) -> f32 {
        match self {
            Offset::Side(edge) => edge.of(sides),
            Offset::Diff(a, b) => a.of(sides) - b.of(sides),
        }
    }
}

/// `item.attribute <relation> target.attribute + constant`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub item: Item,
    pub attribute: Attribute,
    pub relation: Relation,
    pub target: Option<(Item, Attribute)>,
    pub constant: f32,
}

impl Constraint {
    /// `item.attribute == target.attribute + constant`.
    #[must_use]
    pub const fn equal(
        item: Item,
        attribute: Attribute,
        target: (Item, Attribute),
        constant: f32,
    ) -> Self {
        Self {
            item,
            attribute,
            relation: Relation::Equal,
            target: Some(target),
            constant,
        }
    }

    /// `item.attribute == constant`.
    #[must_use]
    pub const fn fixed(item: Item, attribute: Attribute, constant: f32) -> Self {
        Self {
            item,
            attribute,
            relation: Relation::Equal,
            target: None,
            constant,
        }
    }

    #[must_use]
    pub const fn at_most(item: Item, attribute: Attribute, constant: f32) -> Self {
        Self {
            item,
            attribute,
            relation: Relation::LessOrEqual,
            target: None,
            constant,
        }
    }

    /// `item.attribute >= target.attribute + constant`.
    #[must_use]
    pub const fn at_least(
        item: Item,
        attribute: Attribute,
        target: (Item, Attribute),
        constant: f32,
    ) -> Self {
        Self {
            item,
            attribute,
            relation: Relation::GreaterOrEqual,
            target: Some(target),
            constant,
        }
    }

    /// Whether this constraint mentions `item` on either side.
    #[must_use]
    pub fn involves(&self, item: Item) -> bool {
        self.item == item || self.target.is_some_and(|(t, _)| t == item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_eval() {
        let sides = Sides::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(Offset::Side(Edge::Bottom).eval(&sides), 3.0);
        assert_eq!(Offset::Diff(Edge::Left, Edge::Right).eval(&sides), 2.0);
        assert_eq!(Offset::Diff(Edge::Top, Edge::Bottom).eval(&sides), -2.0);
    }

    #[test]
    fn pin_then_read_round_trips() {
        let attrs = [
            Attribute::Left,
            Attribute::Right,
            Attribute::Top,
            Attribute::Bottom,
            Attribute::CenterX,
            Attribute::CenterY,
        ];
        for attr in attrs {
            let mut rect = Rect::new(0.0, 0.0, 10.0, 6.0);
            attr.pin(&mut rect, 42.0);
            assert_eq!(attr.value_in(&rect), 42.0, "{attr:?}");
            assert_eq!((rect.width, rect.height), (10.0, 6.0));
        }
    }

    #[test]
    fn pin_size_attributes_resize() {
        let mut rect = Rect::new(3.0, 4.0, 0.0, 0.0);
        Attribute::Width.pin(&mut rect, 7.0);
        Attribute::Height.pin(&mut rect, 2.0);
        assert_eq!(rect, Rect::new(3.0, 4.0, 7.0, 2.0));
    }

    #[test]
    fn involves_checks_both_sides() {
        let c = Constraint::equal(Item::Label, Attribute::Top, (Item::Pointer, Attribute::Bottom), 0.0);
        assert!(c.involves(Item::Label));
        assert!(c.involves(Item::Pointer));
        assert!(!c.involves(Item::Anchor));
        assert!(!Constraint::fixed(Item::Pointer, Attribute::Width, 5.0).involves(Item::Anchor));
    }

    #[test]
    fn axis_classification() {
        assert!(Attribute::Leading.is_horizontal());
        assert!(Attribute::Width.is_horizontal());
        assert!(!Attribute::CenterY.is_horizontal());
        assert!(!Attribute::Height.is_horizontal());
    }
}
