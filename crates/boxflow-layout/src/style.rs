//! Per-node style record.
//!
//! [`Style`] is plain data: every field is public and nothing here performs
//! layout. Unit-tagged values use [`Dimension`], whose numeric payload only
//! exists on the variants that carry one, so a value can never be read
//! without its unit.
//!
//! Every enumeration also carries the numeric codes used by the C layout
//! API it mirrors (`code()` / `TryFrom<i32>`), so an embedding layer can
//! pass raw integers through without its own lookup tables. Unknown codes
//! are rejected with [`LayoutError::InvalidArgument`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{LayoutError, Result};

macro_rules! style_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $property:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $css:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in code order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Numeric code for embedding layers.
            pub const fn code(self) -> i32 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            /// Name used in debug dumps.
            pub const fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $css),+
                }
            }
        }

        impl TryFrom<i32> for $name {
            type Error = LayoutError;

            fn try_from(code: i32) -> Result<Self> {
                match code {
                    $($code => Ok($name::$variant),)+
                    other => Err(LayoutError::invalid(
                        $property,
                        format!("unknown code {other}"),
                    )),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

style_enum! {
    /// Layout direction. `Inherit` takes the owner's resolved direction.
    Direction, "direction" {
        Inherit = 0 => "inherit",
        Ltr = 1 => "ltr",
        Rtl = 2 => "rtl",
    }
}

style_enum! {
    /// Main axis and its orientation.
    FlexDirection, "flex_direction" {
        Column = 0 => "column",
        ColumnReverse = 1 => "column-reverse",
        Row = 2 => "row",
        RowReverse = 3 => "row-reverse",
    }
}

style_enum! {
    /// Main-axis distribution of items inside a line.
    Justify, "justify_content" {
        FlexStart = 0 => "flex-start",
        Center = 1 => "center",
        FlexEnd = 2 => "flex-end",
        SpaceBetween = 3 => "space-between",
        SpaceAround = 4 => "space-around",
        SpaceEvenly = 5 => "space-evenly",
    }
}

style_enum! {
    /// Cross-axis alignment for `align_items`, `align_self` and `align_content`.
    Align, "align" {
        Auto = 0 => "auto",
        FlexStart = 1 => "flex-start",
        Center = 2 => "center",
        FlexEnd = 3 => "flex-end",
        Stretch = 4 => "stretch",
        Baseline = 5 => "baseline",
        SpaceBetween = 6 => "space-between",
        SpaceAround = 7 => "space-around",
    }
}

style_enum! {
    /// Whether the node takes part in flex flow.
    PositionType, "position_type" {
        Relative = 0 => "relative",
        Absolute = 1 => "absolute",
    }
}

style_enum! {
    /// Line breaking along the main axis.
    Wrap, "flex_wrap" {
        NoWrap = 0 => "nowrap",
        Wrap = 1 => "wrap",
        WrapReverse = 2 => "wrap-reverse",
    }
}

style_enum! {
    /// Content overflow behaviour.
    Overflow, "overflow" {
        Visible = 0 => "visible",
        Hidden = 1 => "hidden",
        Scroll = 2 => "scroll",
    }
}

style_enum! {
    /// `None` removes the node and its subtree from layout.
    Display, "display" {
        Flex = 0 => "flex",
        None = 1 => "none",
    }
}

style_enum! {
    /// Logical and physical edges addressing margin, padding, border and position.
    Edge, "edge" {
        Left = 0 => "left",
        Top = 1 => "top",
        Right = 2 => "right",
        Bottom = 3 => "bottom",
        Start = 4 => "start",
        End = 5 => "end",
        Horizontal = 6 => "horizontal",
        Vertical = 7 => "vertical",
        All = 8 => "all",
    }
}

style_enum! {
    /// Unit tag of a [`Dimension`].
    Unit, "unit" {
        Undefined = 0 => "undefined",
        Point = 1 => "point",
        Percent = 2 => "percent",
        Auto = 3 => "auto",
    }
}

style_enum! {
    /// Which gutter a gap setter addresses.
    Gutter, "gutter" {
        Column = 0 => "column",
        Row = 1 => "row",
        All = 2 => "all",
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::Inherit
    }
}

impl Direction {
    /// Resolve `Inherit` against the owner's direction.
    pub const fn resolve(self, owner: Direction) -> Direction {
        match self {
            Direction::Inherit => match owner {
                Direction::Inherit => Direction::Ltr,
                resolved => resolved,
            },
            resolved => resolved,
        }
    }
}

impl FlexDirection {
    /// True for `Row` and `RowReverse`.
    pub const fn is_row(self) -> bool {
        matches!(self, FlexDirection::Row | FlexDirection::RowReverse)
    }

    /// True for the `*Reverse` variants.
    pub const fn is_reverse(self) -> bool {
        matches!(
            self,
            FlexDirection::RowReverse | FlexDirection::ColumnReverse
        )
    }

    /// Apply the layout direction: in RTL a row runs right to left.
    pub const fn resolve(self, direction: Direction) -> FlexDirection {
        match (self, direction) {
            (FlexDirection::Row, Direction::Rtl) => FlexDirection::RowReverse,
            (FlexDirection::RowReverse, Direction::Rtl) => FlexDirection::Row,
            (other, _) => other,
        }
    }
}

impl Default for Justify {
    fn default() -> Self {
        Self::FlexStart
    }
}

/// Explicit remap from the alignment enumeration to `justify_content`.
///
/// `Auto`, `Stretch` and `Baseline` have no main-axis meaning and are
/// rejected instead of being passed through as an out-of-range value.
impl TryFrom<Align> for Justify {
    type Error = LayoutError;

    fn try_from(align: Align) -> Result<Self> {
        match align {
            Align::FlexStart => Ok(Justify::FlexStart),
            Align::Center => Ok(Justify::Center),
            Align::FlexEnd => Ok(Justify::FlexEnd),
            Align::SpaceBetween => Ok(Justify::SpaceBetween),
            Align::SpaceAround => Ok(Justify::SpaceAround),
            Align::Auto | Align::Stretch | Align::Baseline => Err(LayoutError::invalid(
                "justify_content",
                format!("`{align}` has no justify-content equivalent"),
            )),
        }
    }
}

/// A length tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "kebab-case")]
pub enum Dimension {
    /// Not set; falls back to the property's default behaviour.
    #[default]
    Undefined,
    /// Absolute length in points.
    Points(f32),
    /// Percentage of the relevant container dimension.
    Percent(f32),
    /// Content- or flex-determined.
    Auto,
}

impl Dimension {
    /// Build from an embedding layer's (unit, value) pair.
    ///
    /// The value is ignored for `Undefined` and `Auto`.
    pub fn from_unit(unit: Unit, value: f32) -> Result<Self> {
        match unit {
            Unit::Undefined => Ok(Dimension::Undefined),
            Unit::Auto => Ok(Dimension::Auto),
            Unit::Point => crate::error::finite("dimension", value).map(Dimension::Points),
            Unit::Percent => crate::error::finite("dimension", value).map(Dimension::Percent),
        }
    }

    /// The unit tag.
    pub const fn unit(self) -> Unit {
        match self {
            Dimension::Undefined => Unit::Undefined,
            Dimension::Points(_) => Unit::Point,
            Dimension::Percent(_) => Unit::Percent,
            Dimension::Auto => Unit::Auto,
        }
    }

    /// The numeric payload, absent for `Undefined` and `Auto`.
    pub const fn value(self) -> Option<f32> {
        match self {
            Dimension::Points(v) | Dimension::Percent(v) => Some(v),
            Dimension::Undefined | Dimension::Auto => None,
        }
    }

    /// True for anything other than `Undefined`.
    pub const fn is_defined(self) -> bool {
        !matches!(self, Dimension::Undefined)
    }

    /// True for `Auto`.
    pub const fn is_auto(self) -> bool {
        matches!(self, Dimension::Auto)
    }

    /// Resolve to points. Percentages need a definite base.
    pub fn resolve(self, base: Option<f32>) -> Option<f32> {
        match self {
            Dimension::Points(v) => Some(v),
            Dimension::Percent(p) => base.map(|b| b * p / 100.0),
            Dimension::Undefined | Dimension::Auto => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Undefined => f.write_str("undefined"),
            Dimension::Points(v) => write!(f, "{v}px"),
            Dimension::Percent(v) => write!(f, "{v}%"),
            Dimension::Auto => f.write_str("auto"),
        }
    }
}

/// The four physical edges a logical [`Edge`] resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PhysicalEdge {
    Left,
    Top,
    Right,
    Bottom,
}

impl PhysicalEdge {
    /// Map a logical edge; `Horizontal`, `Vertical` and `All` have no single edge.
    pub(crate) const fn from_edge(edge: Edge, direction: Direction) -> Option<PhysicalEdge> {
        let rtl = matches!(direction, Direction::Rtl);
        match edge {
            Edge::Left => Some(PhysicalEdge::Left),
            Edge::Top => Some(PhysicalEdge::Top),
            Edge::Right => Some(PhysicalEdge::Right),
            Edge::Bottom => Some(PhysicalEdge::Bottom),
            Edge::Start if rtl => Some(PhysicalEdge::Right),
            Edge::Start => Some(PhysicalEdge::Left),
            Edge::End if rtl => Some(PhysicalEdge::Left),
            Edge::End => Some(PhysicalEdge::Right),
            Edge::Horizontal | Edge::Vertical | Edge::All => None,
        }
    }
}

/// One value per [`Edge`], resolved to physical edges by precedence.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeValues([Dimension; 9]);

impl EdgeValues {
    /// All edges undefined.
    pub const UNDEFINED: Self = Self([Dimension::Undefined; 9]);

    /// The value stored for exactly this edge, without fallback.
    pub fn get(&self, edge: Edge) -> Dimension {
        self.0[edge.code() as usize]
    }

    /// Store a value for one edge.
    pub fn set(&mut self, edge: Edge, value: Dimension) {
        self.0[edge.code() as usize] = value;
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, edge: Edge, value: Dimension) -> Self {
        self.set(edge, value);
        self
    }

    /// Iterate the edges that hold a defined value.
    pub fn defined(&self) -> impl Iterator<Item = (Edge, Dimension)> + '_ {
        Edge::ALL
            .iter()
            .map(|edge| (*edge, self.get(*edge)))
            .filter(|(_, value)| value.is_defined())
    }

    /// Effective value for a physical edge.
    ///
    /// Precedence: the logical `start`/`end` mapped to this edge, then the
    /// physical edge itself, then `horizontal`/`vertical`, then `all`.
    pub(crate) fn resolve(&self, edge: PhysicalEdge, direction: Direction) -> Dimension {
        let rtl = matches!(direction, Direction::Rtl);
        let chain: [Edge; 3] = match edge {
            PhysicalEdge::Left => {
                let logical = if rtl { Edge::End } else { Edge::Start };
                let value = self.get(logical);
                if value.is_defined() {
                    return value;
                }
                [Edge::Left, Edge::Horizontal, Edge::All]
            }
            PhysicalEdge::Right => {
                let logical = if rtl { Edge::Start } else { Edge::End };
                let value = self.get(logical);
                if value.is_defined() {
                    return value;
                }
                [Edge::Right, Edge::Horizontal, Edge::All]
            }
            PhysicalEdge::Top => [Edge::Top, Edge::Vertical, Edge::All],
            PhysicalEdge::Bottom => [Edge::Bottom, Edge::Vertical, Edge::All],
        };
        chain
            .iter()
            .map(|edge| self.get(*edge))
            .find(|value| value.is_defined())
            .unwrap_or(Dimension::Undefined)
    }
}

/// Style configuration for one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub direction: Direction,
    pub flex_direction: FlexDirection,
    pub justify_content: Justify,
    pub align_content: Align,
    pub align_items: Align,
    pub align_self: Align,
    pub position_type: PositionType,
    pub flex_wrap: Wrap,
    pub overflow: Overflow,
    pub display: Display,
    /// Shorthand: positive values feed `flex_grow`, negative values `flex_shrink`.
    pub flex: Option<f32>,
    pub flex_grow: Option<f32>,
    pub flex_shrink: Option<f32>,
    pub flex_basis: Dimension,
    pub margin: EdgeValues,
    pub position: EdgeValues,
    pub padding: EdgeValues,
    /// Points only.
    pub border: EdgeValues,
    pub width: Dimension,
    pub height: Dimension,
    pub min_width: Dimension,
    pub min_height: Dimension,
    pub max_width: Dimension,
    pub max_height: Dimension,
    /// Gap between columns (row main axis) in points.
    pub column_gap: f32,
    /// Gap between rows (column main axis) in points.
    pub row_gap: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            direction: Direction::Inherit,
            flex_direction: FlexDirection::Column,
            justify_content: Justify::FlexStart,
            align_content: Align::FlexStart,
            align_items: Align::Stretch,
            align_self: Align::Auto,
            position_type: PositionType::Relative,
            flex_wrap: Wrap::NoWrap,
            overflow: Overflow::Visible,
            display: Display::Flex,
            flex: None,
            flex_grow: None,
            flex_shrink: None,
            flex_basis: Dimension::Auto,
            margin: EdgeValues::UNDEFINED,
            position: EdgeValues::UNDEFINED,
            padding: EdgeValues::UNDEFINED,
            border: EdgeValues::UNDEFINED,
            width: Dimension::Auto,
            height: Dimension::Auto,
            min_width: Dimension::Undefined,
            min_height: Dimension::Undefined,
            max_width: Dimension::Undefined,
            max_height: Dimension::Undefined,
            column_gap: 0.0,
            row_gap: 0.0,
        }
    }
}

impl Style {
    /// Default style under a tree configuration.
    ///
    /// Web defaults switch to a row main axis and stretched lines.
    pub fn for_config(config: &Config) -> Self {
        let mut style = Self::default();
        if config.use_web_defaults {
            style.flex_direction = FlexDirection::Row;
            style.align_content = Align::Stretch;
        }
        style
    }

    /// Effective grow factor: explicit value, else a positive `flex`, else 0.
    pub fn resolved_flex_grow(&self) -> f32 {
        match (self.flex_grow, self.flex) {
            (Some(grow), _) => grow.max(0.0),
            (None, Some(flex)) if flex > 0.0 => flex,
            _ => 0.0,
        }
    }

    /// Effective shrink factor: explicit value, else a negative `flex`
    /// (outside web defaults), else the configured default.
    pub fn resolved_flex_shrink(&self, web_defaults: bool) -> f32 {
        match (self.flex_shrink, self.flex) {
            (Some(shrink), _) => shrink.max(0.0),
            (None, Some(flex)) if !web_defaults && flex < 0.0 => -flex,
            _ if web_defaults => 1.0,
            _ => 0.0,
        }
    }

    /// Effective basis: explicit value, else zero for a positive `flex`
    /// (outside web defaults), else auto.
    pub fn resolved_flex_basis(&self, web_defaults: bool) -> Dimension {
        match self.flex_basis {
            Dimension::Points(_) | Dimension::Percent(_) => self.flex_basis,
            _ => match self.flex {
                Some(flex) if flex > 0.0 && !web_defaults => Dimension::Points(0.0),
                _ => Dimension::Auto,
            },
        }
    }

    /// Gap along a main axis.
    pub(crate) fn gap_for(&self, row_axis: bool) -> f32 {
        let gap = if row_axis {
            self.column_gap
        } else {
            self.row_gap
        };
        gap.max(0.0)
    }
}
