#![forbid(unsafe_code)]

//! Boxflow public facade crate.
//!
//! Re-exports the layout tree, style vocabulary and geometry from the
//! internal crates, plus a prelude for day-to-day use.
//!
//! ```
//! use boxflow::prelude::*;
//!
//! let mut tree = LayoutTree::new();
//! let root = tree.new_node();
//! tree.set_flex_direction(root, FlexDirection::Row).unwrap();
//! let sidebar = tree.new_node();
//! tree.set_width(sidebar, 30.0).unwrap();
//! let content = tree.new_node();
//! tree.set_flex_grow(content, 1.0).unwrap();
//! tree.append_child(root, sidebar).unwrap();
//! tree.append_child(root, content).unwrap();
//!
//! tree.calculate_layout(root, 120.0, 40.0).unwrap();
//! assert_eq!(tree.layout(content).unwrap(), Rect::new(30.0, 0.0, 90.0, 40.0));
//! ```

// --- Geometry re-exports ---------------------------------------------------

pub use boxflow_core::{Rect, Sides, Size};

// --- Layout re-exports -----------------------------------------------------

pub use boxflow_layout::{
    Align, Children, Config, Dimension, Direction, Display, Edge, EdgeValues, FlexDirection,
    Gutter, Justify, LayoutError, LayoutSnapshot, LayoutStats, LayoutTree, Measure, MeasureInput,
    MeasureMode, NodeId, Overflow, PositionType, PrintOptions, Result, StructuralViolation, Style,
    Unit, Wrap, apply_measure_limits,
};

// --- Text re-exports -------------------------------------------------------

#[cfg(feature = "text")]
pub use boxflow_text::{TextMeasure, WrapMode, set_text};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Align, Config, Dimension, Direction, Display, Edge, FlexDirection, Gutter, Justify,
        LayoutError, LayoutTree, Measure, MeasureInput, MeasureMode, NodeId, PositionType, Rect,
        Result, Size, Style, Wrap,
    };

    #[cfg(feature = "text")]
    pub use crate::{TextMeasure, set_text};

    pub use crate::{core, layout};

    #[cfg(feature = "text")]
    pub use crate::text;
}

pub use boxflow_core as core;
pub use boxflow_layout as layout;
#[cfg(feature = "text")]
pub use boxflow_text as text;
