#![forbid(unsafe_code)]

//! Flexbox layout over an arena of nodes.
//!
//! Build a tree in a [`LayoutTree`], describe each node with a [`Style`],
//! attach a [`Measure`] hook to leaves whose size depends on content, then
//! call [`LayoutTree::calculate_layout`] and read positions back with
//! [`LayoutTree::layout`].
//!
//! Nodes that have not changed since the previous pass are answered from a
//! per-node cache, so relayout after a small edit only walks the edited
//! node's ancestor chain and whatever siblings actually move.

mod cache;
pub mod config;
mod debug;
mod engine;
pub mod error;
pub mod measure;
mod node;
pub mod style;
mod tree;

pub use boxflow_core::{Rect, Sides, Size};
pub use config::Config;
pub use debug::{LayoutSnapshot, PrintOptions};
pub use engine::LayoutStats;
pub use error::{LayoutError, Result, StructuralViolation};
pub use measure::{Measure, MeasureInput, MeasureMode, apply_measure_limits};
pub use node::NodeId;
pub use style::{
    Align, Dimension, Direction, Display, Edge, EdgeValues, FlexDirection, Gutter, Justify,
    Overflow, PositionType, Style, Unit, Wrap,
};
pub use tree::{Children, LayoutTree};
