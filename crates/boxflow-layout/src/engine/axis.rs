//! Constraint and box-model helpers shared by the layout passes.

use boxflow_core::Sides;

use crate::measure::MeasureMode;
use crate::style::{Dimension, Direction, EdgeValues, PhysicalEdge, Style};

/// Space offered to a node on one axis, for its border box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum SizeConstraint {
    Exact(f32),
    AtMost(f32),
    Unbounded,
}

impl SizeConstraint {
    /// Interpret an available-space argument; non-finite means unconstrained.
    pub(crate) fn available(value: f32) -> Self {
        if value.is_finite() {
            SizeConstraint::AtMost(value.max(0.0))
        } else {
            SizeConstraint::Unbounded
        }
    }

    pub(crate) const fn exact(self) -> Option<f32> {
        match self {
            SizeConstraint::Exact(v) => Some(v),
            _ => None,
        }
    }

    /// The limiting value for `Exact` and `AtMost`.
    pub(crate) const fn limit(self) -> Option<f32> {
        match self {
            SizeConstraint::Exact(v) | SizeConstraint::AtMost(v) => Some(v),
            SizeConstraint::Unbounded => None,
        }
    }

    pub(crate) const fn mode(self) -> MeasureMode {
        match self {
            SizeConstraint::Exact(_) => MeasureMode::Exactly,
            SizeConstraint::AtMost(_) => MeasureMode::AtMost,
            SizeConstraint::Unbounded => MeasureMode::Undefined,
        }
    }

    /// Value handed to a measure hook; infinity when unconstrained.
    pub(crate) fn measure_value(self) -> f32 {
        self.limit().unwrap_or(f32::INFINITY)
    }

    /// Remove `amount` from the offered space, never going below zero.
    pub(crate) fn shrink(self, amount: f32) -> Self {
        match self {
            SizeConstraint::Exact(v) => SizeConstraint::Exact((v - amount).max(0.0)),
            SizeConstraint::AtMost(v) => SizeConstraint::AtMost((v - amount).max(0.0)),
            SizeConstraint::Unbounded => SizeConstraint::Unbounded,
        }
    }
}

/// Container inner size that percentages of a child resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct OwnerSize {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl OwnerSize {
    pub(crate) const fn new(width: Option<f32>, height: Option<f32>) -> Self {
        Self { width, height }
    }

    pub(crate) const fn axis(self, horizontal: bool) -> Option<f32> {
        if horizontal { self.width } else { self.height }
    }
}

/// Resolved min/max pair for one axis of a border box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Bounds {
    pub min: f32,
    pub max: f32,
}

impl Bounds {
    pub(crate) fn resolve(min: Dimension, max: Dimension, base: Option<f32>) -> Self {
        Self {
            min: min.resolve(base).unwrap_or(0.0).max(0.0),
            max: max.resolve(base).unwrap_or(f32::INFINITY),
        }
    }

    /// Apply max, then min, then the padding+border floor.
    pub(crate) fn clamp(self, value: f32, floor: f32) -> f32 {
        value.min(self.max).max(self.min).max(floor).max(0.0)
    }
}

/// Sizing properties of one axis of a style.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AxisStyle {
    pub size: Dimension,
    pub min: Dimension,
    pub max: Dimension,
}

impl AxisStyle {
    pub(crate) fn of(style: &Style, horizontal: bool) -> Self {
        if horizontal {
            Self {
                size: style.width,
                min: style.min_width,
                max: style.max_width,
            }
        } else {
            Self {
                size: style.height,
                min: style.min_height,
                max: style.max_height,
            }
        }
    }

    pub(crate) fn bounds(self, base: Option<f32>) -> Bounds {
        Bounds::resolve(self.min, self.max, base)
    }
}

/// Which physical edges hold an `auto` value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct AutoEdges {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

/// Resolve per-edge values to points. Undefined, auto and unresolvable
/// percentages count as zero.
pub(crate) fn resolve_sides(edges: &EdgeValues, direction: Direction, base: Option<f32>) -> Sides {
    let side = |edge| edges.resolve(edge, direction).resolve(base).unwrap_or(0.0);
    Sides::new(
        side(PhysicalEdge::Top),
        side(PhysicalEdge::Right),
        side(PhysicalEdge::Bottom),
        side(PhysicalEdge::Left),
    )
}

/// Like [`resolve_sides`] with negative values clamped, for padding and border.
pub(crate) fn resolve_insets(edges: &EdgeValues, direction: Direction, base: Option<f32>) -> Sides {
    let sides = resolve_sides(edges, direction, base);
    Sides::new(
        sides.top.max(0.0),
        sides.right.max(0.0),
        sides.bottom.max(0.0),
        sides.left.max(0.0),
    )
}

pub(crate) fn auto_edges(edges: &EdgeValues, direction: Direction) -> AutoEdges {
    let auto = |edge| edges.resolve(edge, direction).is_auto();
    AutoEdges {
        top: auto(PhysicalEdge::Top),
        right: auto(PhysicalEdge::Right),
        bottom: auto(PhysicalEdge::Bottom),
        left: auto(PhysicalEdge::Left),
    }
}

/// Physical leading (left or top) value of an axis.
pub(crate) fn leading(sides: &Sides, horizontal: bool) -> f32 {
    if horizontal { sides.left } else { sides.top }
}

/// Physical trailing (right or bottom) value of an axis.
pub(crate) fn trailing(sides: &Sides, horizontal: bool) -> f32 {
    if horizontal { sides.right } else { sides.bottom }
}

pub(crate) fn axis_sum(sides: &Sides, horizontal: bool) -> f32 {
    if horizontal {
        sides.horizontal_sum()
    } else {
        sides.vertical_sum()
    }
}

/// Leading and trailing values of an axis in flow order.
pub(crate) fn flow_pair(sides: &Sides, horizontal: bool, reversed: bool) -> (f32, f32) {
    let (lead, trail) = (leading(sides, horizontal), trailing(sides, horizontal));
    if reversed { (trail, lead) } else { (lead, trail) }
}

/// Auto flags of an axis in flow order.
pub(crate) fn flow_auto(edges: AutoEdges, horizontal: bool, reversed: bool) -> (bool, bool) {
    let (lead, trail) = if horizontal {
        (edges.left, edges.right)
    } else {
        (edges.top, edges.bottom)
    };
    if reversed { (trail, lead) } else { (lead, trail) }
}
