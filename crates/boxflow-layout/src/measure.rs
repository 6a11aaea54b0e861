//! Content measurement for leaf nodes.
//!
//! A leaf with a [`Measure`] hook is sized by its content. The engine hands
//! the hook the space it may use on each axis together with how that space
//! is to be interpreted ([`MeasureMode`]) and uses the returned [`Size`] as
//! the node's content size, after [`apply_measure_limits`].

use boxflow_core::Size;
use tracing::warn;

/// How the value on one axis of a [`MeasureInput`] constrains the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MeasureMode {
    /// No constraint; the value is `f32::INFINITY`.
    #[default]
    Undefined,
    /// The node will be exactly this size.
    Exactly,
    /// The node may be at most this size.
    AtMost,
}

impl MeasureMode {
    /// Numeric code for embedding layers.
    pub const fn code(self) -> i32 {
        match self {
            MeasureMode::Undefined => 0,
            MeasureMode::Exactly => 1,
            MeasureMode::AtMost => 2,
        }
    }
}

/// Arguments passed to a measurement hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureInput {
    pub width: f32,
    pub width_mode: MeasureMode,
    pub height: f32,
    pub height_mode: MeasureMode,
    /// The node's user-data slot.
    pub context: Option<u64>,
}

impl MeasureInput {
    /// Width limit, `None` when the width is unconstrained.
    pub fn width_limit(&self) -> Option<f32> {
        match self.width_mode {
            MeasureMode::Undefined => None,
            MeasureMode::Exactly | MeasureMode::AtMost => Some(self.width),
        }
    }

    /// Height limit, `None` when the height is unconstrained.
    pub fn height_limit(&self) -> Option<f32> {
        match self.height_mode {
            MeasureMode::Undefined => None,
            MeasureMode::Exactly | MeasureMode::AtMost => Some(self.height),
        }
    }
}

/// Content-size callback attached to a leaf node.
///
/// The engine may call a hook several times in one pass with different
/// constraints and expects the same answer for the same input.
pub trait Measure: Send {
    fn measure(&self, input: MeasureInput) -> Size;
}

impl<F> Measure for F
where
    F: Fn(MeasureInput) -> Size + Send,
{
    fn measure(&self, input: MeasureInput) -> Size {
        self(input)
    }
}

/// Post-process a hook result.
///
/// `AtMost` axes are clamped down to their limit; `Exactly` and `Undefined`
/// axes keep what the hook returned. Non-finite or negative values become 0.
pub fn apply_measure_limits(size: Size, input: &MeasureInput) -> Size {
    let width = sanitize("width", size.width);
    let height = sanitize("height", size.height);
    Size::new(
        clamp_axis(width, input.width, input.width_mode),
        clamp_axis(height, input.height, input.height_mode),
    )
}

fn clamp_axis(value: f32, limit: f32, mode: MeasureMode) -> f32 {
    match mode {
        MeasureMode::AtMost if value > limit => limit,
        _ => value,
    }
}

fn sanitize(axis: &'static str, value: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        warn!(axis, value, "measure hook returned an unusable size; using 0");
        0.0
    }
}
