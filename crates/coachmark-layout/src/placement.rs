#![forbid(unsafe_code)]

//! Build an [`Annotation`] for a target.
//!
//! [`place`] is a pure function of the target and the anchor rectangle. It
//! validates the target, picks the pointer rule by *arrow start* and the
//! anchor rule by *position*, and emits the full constraint set.
//!
//! # Constraint order
//!
//! 1. Label-to-pointer alignment (pointer-bearing targets only).
//! 2. Subject-to-anchor attachment.
//! 3. `label.width <= label_width`.
//! 4. `label.leading >= container.leading` and
//!    `container.trailing >= label.trailing`.
//! 5. Pointer width and height (pointer-bearing targets only).
//!
//! # Example
//!
//! ```
//! use coachmark_core::{Position, Rect, Target};
//! use coachmark_layout::place;
//!
//! let target = Target::new("save", "Saves your work").position(Position::Top);
//! let annotation = place(&target, Rect::new(10.0, 40.0, 20.0, 10.0)).unwrap();
//! assert!(annotation.pointer.is_some());
//! assert_eq!(annotation.label.text, "Saves your work");
//! ```

use coachmark_core::{ConfigurationError, Rect, Target, TextAlign};

use crate::constraint::{Attribute, Constraint, ConstraintSet, Item};
use crate::table::{PointerCurve, rule_for};

/// How the renderer interpolates the pointer curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveKind {
    /// One control point (`control1`).
    #[default]
    Quadratic,
    /// Two control points; falls back to quadratic without `control2`.
    Cubic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelSpec {
    pub text: String,
    pub max_width: f32,
    pub align: TextAlign,
}

/// The pointer box and its curve.
///
/// `visible == false` keeps the box as an invisible layout guide so the label
/// still lands where the pointer would have put it.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerSpec {
    pub curve: PointerCurve,
    pub kind: CurveKind,
    pub head_size: f32,
    pub width: f32,
    pub height: f32,
    pub visible: bool,
}

/// A label, optional pointer, and the relations that place them.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Anchor rectangle the constraints were built against.
    pub anchor: Rect,
    pub label: LabelSpec,
    pub pointer: Option<PointerSpec>,
    pub constraints: ConstraintSet,
}

impl Annotation {
    /// Constraints that mention `item`.
    pub fn constraints_for(&self, item: Item) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().filter(move |c| c.involves(item))
    }
}

/// Build the annotation for `target` attached to `anchor`.
///
/// # Errors
///
/// Returns the target's [`ConfigurationError`] when it fails validation, e.g.
/// a `centre` arrow start on a pointer-bearing target.
pub fn place(target: &Target, anchor: Rect) -> Result<Annotation, ConfigurationError> {
    target.validate()?;

    let mut constraints = ConstraintSet::new();
    let anchor_rule = rule_for(target.position).anchor;

    let pointer = if target.has_pointer() {
        let pointer_rule = rule_for(target.effective_arrow_start())
            .pointer
            .ok_or(ConfigurationError::CentreArrowStart {
                position: target.position,
            })?;

        for rule in pointer_rule.label {
            constraints.push(Constraint::equal(
                Item::Label,
                rule.attribute,
                (Item::Pointer, rule.to),
                rule.offset.eval(&target.text_margins),
            ));
        }

        let (head_x, head_y) = pointer_rule.head;
        constraints.push(Constraint::equal(
            Item::Pointer,
            head_x,
            (Item::Anchor, anchor_rule.x.to),
            anchor_rule.x.offset.eval(&target.margins),
        ));
        constraints.push(Constraint::equal(
            Item::Pointer,
            head_y,
            (Item::Anchor, anchor_rule.y.to),
            anchor_rule.y.offset.eval(&target.margins),
        ));

        Some(PointerSpec {
            curve: pointer_rule.curve,
            kind: CurveKind::Quadratic,
            head_size: target.arrow_head_size,
            width: target.arrow_width,
            height: target.arrow_height,
            visible: target.with_arrow,
        })
    } else {
        constraints.push(Constraint::equal(
            Item::Label,
            Attribute::CenterX,
            (Item::Anchor, anchor_rule.x.to),
            anchor_rule.x.offset.eval(&target.text_margins),
        ));
        constraints.push(Constraint::equal(
            Item::Label,
            Attribute::CenterY,
            (Item::Anchor, anchor_rule.y.to),
            anchor_rule.y.offset.eval(&target.text_margins),
        ));
        None
    };

    constraints.push(Constraint::at_most(
        Item::Label,
        Attribute::Width,
        target.label_width,
    ));
    constraints.push(Constraint::at_least(
        Item::Label,
        Attribute::Leading,
        (Item::Container, Attribute::Leading),
        0.0,
    ));
    constraints.push(Constraint::at_least(
        Item::Container,
        Attribute::Trailing,
        (Item::Label, Attribute::Trailing),
        0.0,
    ));

    if let Some(spec) = &pointer {
        constraints.push(Constraint::fixed(Item::Pointer, Attribute::Height, spec.height));
        constraints.push(Constraint::fixed(Item::Pointer, Attribute::Width, spec.width));
    }

    Ok(Annotation {
        anchor,
        label: LabelSpec {
            text: target.message.clone(),
            max_width: target.label_width,
            align: target.text_align,
        },
        pointer,
        constraints,
    })
}
