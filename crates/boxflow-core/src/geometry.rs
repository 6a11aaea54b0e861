#![forbid(unsafe_code)]

//! Geometric primitives in layout points.
//!
//! All values are `f32` points. Layout results are never negative, but the
//! primitives themselves do not enforce that so intermediate arithmetic can
//! go through them.

use serde::{Deserialize, Serialize};

/// A two-dimensional extent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Size {
    /// The zero size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Clamp both dimensions to at most `max`.
    #[inline]
    pub fn clamp_max(self, max: Size) -> Size {
        Size::new(self.width.min(max.width), self.height.min(max.height))
    }

    /// Clamp both dimensions to at least `min`.
    #[inline]
    pub fn clamp_min(self, min: Size) -> Size {
        Size::new(self.width.max(min.width), self.height.max(min.height))
    }

    /// True when both dimensions are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.width.is_finite() && self.height.is_finite()
    }
}

/// A positioned box: offset from the parent's border box plus an extent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Offset of the left edge.
    pub left: f32,
    /// Offset of the top edge.
    pub top: f32,
    /// Width of the box.
    pub width: f32,
    /// Height of the box.
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Extent of the rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Translate by an offset.
    #[inline]
    pub fn offset(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// Check if `other` lies entirely within this rectangle.
    ///
    /// Edges are compared with a small tolerance so that accumulated float
    /// error does not report a touching child as escaping.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        const EPS: f32 = 1e-3;
        other.left >= self.left - EPS
            && other.top >= self.top - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }

    /// Create a new rectangle inside the current one with the given insets.
    ///
    /// Width and height never go below zero.
    pub fn inner(&self, insets: Sides) -> Rect {
        Rect {
            left: self.left + insets.left,
            top: self.top + insets.top,
            width: (self.width - insets.horizontal_sum()).max(0.0),
            height: (self.height - insets.vertical_sum()).max(0.0),
        }
    }

    /// Smallest rectangle that contains both.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }
}

/// Per-edge values for margin, border, and padding.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sides {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Sides {
    /// All four edges zero.
    pub const ZERO: Self = Self::all(0.0);

    /// Create new sides with equal values.
    pub const fn all(val: f32) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Create new sides with specific values.
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Sum of left and right.
    #[inline]
    pub fn horizontal_sum(&self) -> f32 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[inline]
    pub fn vertical_sum(&self) -> f32 {
        self.top + self.bottom
    }

    /// Edge-wise sum.
    #[inline]
    pub fn add(&self, other: &Sides) -> Sides {
        Sides::new(
            self.top + other.top,
            self.right + other.right,
            self.bottom + other.bottom,
            self.left + other.left,
        )
    }
}

impl From<f32> for Sides {
    fn from(val: f32) -> Self {
        Self::all(val)
    }
}

impl From<(f32, f32)> for Sides {
    fn from((vertical, horizontal): (f32, f32)) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }
}
