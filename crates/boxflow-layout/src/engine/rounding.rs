//! Snapping computed layouts to the device pixel grid.

use boxflow_core::Rect;

use crate::node::{NodeArena, NodeId};

const FRACTION_EPSILON: f32 = 1e-4;

/// Snap `value` (in points) to the grid of `scale` pixels per point.
///
/// With `ceil_fraction` a value with a visible fractional part is rounded
/// up instead of to the nearest pixel.
pub(crate) fn round_to_grid(value: f32, scale: f32, ceil_fraction: bool) -> f32 {
    let scaled = value * scale;
    let fraction = scaled - scaled.floor();
    let snapped = if ceil_fraction && fraction > FRACTION_EPSILON {
        scaled.ceil()
    } else {
        scaled.round()
    };
    snapped / scale
}

/// Fill every node's read-back rectangle from its unrounded layout.
///
/// Edges are snapped in absolute coordinates so siblings that touch before
/// rounding still touch afterwards. Measured leaves round their far edges
/// up so content is never clipped. A scale of zero copies values through.
pub(crate) fn round_layout(nodes: &mut NodeArena, root: NodeId, scale: f32) {
    round_node(nodes, root, 0.0, 0.0, scale);
}

fn round_node(nodes: &mut NodeArena, id: NodeId, parent_left: f32, parent_top: f32, scale: f32) {
    let node = &mut nodes[id];
    let layout = node.layout;
    let left = parent_left + layout.left;
    let top = parent_top + layout.top;

    node.rounded = if scale > 0.0 {
        let ceil = node.measure.is_some();
        let snapped_left = round_to_grid(left, scale, false);
        let snapped_top = round_to_grid(top, scale, false);
        Rect::new(
            snapped_left - round_to_grid(parent_left, scale, false),
            snapped_top - round_to_grid(parent_top, scale, false),
            (round_to_grid(left + layout.width, scale, ceil) - snapped_left).max(0.0),
            (round_to_grid(top + layout.height, scale, ceil) - snapped_top).max(0.0),
        )
    } else {
        layout.rect()
    };

    for i in 0..nodes[id].children.len() {
        let child = nodes[id].children[i];
        round_node(nodes, child, left, top, scale);
    }
}
