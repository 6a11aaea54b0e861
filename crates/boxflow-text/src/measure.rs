#![forbid(unsafe_code)]

//! A [`Measure`] hook for text leaves.

use boxflow_layout::{LayoutError, LayoutTree, Measure, MeasureInput, NodeId, Result, Size};
use tracing::trace;

use crate::wrap::{WrapMode, line_widths};

/// Slack when converting a point limit to whole cells, so a limit computed
/// as `n * cell_width` with rounding noise still fits `n` cells.
const CELL_EPSILON: f32 = 1e-3;

/// Sizes a leaf by wrapping its text to the width the engine offers.
///
/// The result is the widest wrapped line by the line count, scaled by
/// `cell_width` and `line_height`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMeasure {
    text: String,
    mode: WrapMode,
    cell_width: f32,
    line_height: f32,
}

impl TextMeasure {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: WrapMode::default(),
            cell_width: 1.0,
            line_height: 1.0,
        }
    }

    #[must_use]
    pub fn mode(mut self, mode: WrapMode) -> Self {
        self.mode = mode;
        self
    }

    /// Points per cell. Must be finite and positive.
    pub fn cell_width(mut self, width: f32) -> Result<Self> {
        self.cell_width = positive("cell_width", width)?;
        Ok(self)
    }

    /// Points per line. Must be finite and positive.
    pub fn line_height(mut self, height: f32) -> Result<Self> {
        self.line_height = positive("line_height", height)?;
        Ok(self)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whole cells available under a width limit in points.
    fn columns(&self, limit: Option<f32>) -> Option<usize> {
        limit.map(|points| ((points / self.cell_width) + CELL_EPSILON).floor().max(0.0) as usize)
    }
}

impl Measure for TextMeasure {
    fn measure(&self, input: MeasureInput) -> Size {
        let columns = self.columns(input.width_limit());
        let widths = line_widths(&self.text, columns, self.mode);
        let widest = widths.iter().copied().max().unwrap_or(0);
        trace!(
            columns = ?columns,
            lines = widths.len(),
            widest,
            "measured text"
        );
        Size::new(
            widest as f32 * self.cell_width,
            widths.len() as f32 * self.line_height,
        )
    }
}

/// Make `node` a text leaf showing `text` with default metrics.
///
/// Replacing the hook marks the node dirty.
pub fn set_text(tree: &mut LayoutTree, node: NodeId, text: impl Into<String>) -> Result<()> {
    tree.enable_measure(node, TextMeasure::new(text))
}

fn positive(property: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(LayoutError::InvalidArgument {
            property,
            reason: format!("expected a finite positive number, got {value}"),
        })
    }
}
