#![forbid(unsafe_code)]

//! Core: geometry shared by the layout engine and its measurement helpers.

pub mod geometry;

pub use geometry::{Rect, Sides, Size};
