//! Per-tree configuration.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Settings moved into a [`LayoutTree`](crate::LayoutTree) at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Device pixels per layout point used for edge snapping.
    ///
    /// `0.0` disables snapping and leaves fractional results untouched.
    pub point_scale_factor: f32,
    /// Use CSS-like defaults: row main axis, stretched lines, shrink 1.
    pub use_web_defaults: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            point_scale_factor: 0.0,
            use_web_defaults: false,
        }
    }
}

impl Config {
    /// Configuration with the given snapping scale.
    pub fn with_point_scale_factor(mut self, factor: f32) -> Self {
        self.point_scale_factor = factor;
        self
    }

    /// Configuration with web defaults toggled.
    pub fn with_web_defaults(mut self, enabled: bool) -> Self {
        self.use_web_defaults = enabled;
        self
    }

    /// Check values before a tree accepts them.
    pub fn validate(&self) -> Result<()> {
        if !self.point_scale_factor.is_finite() || self.point_scale_factor < 0.0 {
            return Err(LayoutError::invalid(
                "point_scale_factor",
                format!(
                    "expected a finite non-negative number, got {}",
                    self.point_scale_factor
                ),
            ));
        }
        Ok(())
    }
}
