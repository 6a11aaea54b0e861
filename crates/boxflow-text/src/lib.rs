#![forbid(unsafe_code)]

//! Text leaves for boxflow layouts.
//!
//! - [`TextMeasure`] - a [`Measure`](boxflow_layout::Measure) hook that wraps
//!   text to the offered width
//! - [`wrap_lines`] / [`line_widths`] - grapheme-aware wrapping in cells
//! - [`set_text`] - attach a text hook to a node
//!
//! # Example
//! ```
//! use boxflow_layout::{Align, LayoutTree};
//! use boxflow_text::set_text;
//!
//! let mut tree = LayoutTree::new();
//! let root = tree.new_node();
//! tree.set_width(root, 10.0).unwrap();
//! tree.set_align_items(root, Align::FlexStart).unwrap();
//! let label = tree.new_node();
//! set_text(&mut tree, label, "hello wide world").unwrap();
//! tree.append_child(root, label).unwrap();
//!
//! tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();
//! let rect = tree.layout(label).unwrap();
//! assert_eq!((rect.width, rect.height), (10.0, 2.0));
//! ```

pub mod measure;
pub mod wrap;

pub use measure::{TextMeasure, set_text};
pub use wrap::{WrapMode, display_width, line_widths, wrap_lines};
