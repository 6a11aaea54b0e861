//! The layout pass.
//!
//! [`LayoutPass`] walks a tree top-down. Every node goes through
//! [`LayoutPass::layout_node`], which consults the node's cache and either
//! returns a memoized size or computes one: measured leaves ask their hook,
//! empty nodes are sized by their insets, and containers run the flex
//! algorithm in [`flex`]. A node is either *measured* (size only, children
//! untouched) or *performed* (size plus final positions for its subtree).
//!
//! Constraints passed down are for the border box; margins are handled by
//! whoever positions the node.

pub(crate) mod absolute;
pub(crate) mod axis;
pub(crate) mod flex;
pub(crate) mod rounding;

use boxflow_core::{Sides, Size};
use serde::{Deserialize, Serialize};

use crate::cache::CacheKey;
use crate::measure::{MeasureInput, apply_measure_limits};
use crate::node::{ComputedLayout, NodeArena, NodeId};
use crate::style::{Direction, Display, PhysicalEdge, Style};

use axis::{AxisStyle, Bounds, OwnerSize, SizeConstraint, resolve_insets, resolve_sides};

/// Counters describing the most recent `calculate_layout` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayoutStats {
    /// Nodes whose final layout was recomputed.
    pub layouts_computed: usize,
    /// Size-only computations that missed the cache.
    pub measurements_computed: usize,
    /// Calls into measurement hooks.
    pub measure_callbacks: usize,
    /// Requests answered from a node's cache.
    pub cache_hits: usize,
    /// Nodes given a zero layout because of `display: none`.
    pub nodes_zeroed: usize,
}

/// Resolved sizing inputs of the node being laid out.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NodeSizing {
    pub width: SizeConstraint,
    pub height: SizeConstraint,
    pub width_bounds: Bounds,
    pub height_bounds: Bounds,
    /// Padding plus border.
    pub insets: Sides,
}

impl NodeSizing {
    pub(crate) fn constraint(&self, horizontal: bool) -> SizeConstraint {
        if horizontal { self.width } else { self.height }
    }

    pub(crate) fn bounds(&self, horizontal: bool) -> Bounds {
        if horizontal {
            self.width_bounds
        } else {
            self.height_bounds
        }
    }

    /// Final border-box extent on one axis from a content-driven candidate.
    pub(crate) fn finish(&self, horizontal: bool, candidate: f32) -> f32 {
        let floor = axis::axis_sum(&self.insets, horizontal);
        match self.constraint(horizontal) {
            SizeConstraint::Exact(v) => v,
            SizeConstraint::AtMost(v) => self.bounds(horizontal).clamp(candidate.min(v), floor),
            SizeConstraint::Unbounded => self.bounds(horizontal).clamp(candidate, floor),
        }
    }

    fn from_content(&self, content: Size) -> Size {
        Size::new(
            self.finish(true, content.width + self.insets.horizontal_sum()),
            self.finish(false, content.height + self.insets.vertical_sum()),
        )
    }
}

/// Narrow an offered constraint by the node's own size, min and max.
///
/// An exact offer wins over the styled size (a flexed or stretched item)
/// but is still bounded.
fn own_constraint(
    offered: SizeConstraint,
    styled: Option<f32>,
    bounds: Bounds,
    floor: f32,
) -> SizeConstraint {
    match (offered, styled) {
        (SizeConstraint::Exact(v), _) | (_, Some(v)) => SizeConstraint::Exact(bounds.clamp(v, floor)),
        (SizeConstraint::AtMost(v), None) => SizeConstraint::AtMost(v.min(bounds.max)),
        (SizeConstraint::Unbounded, None) if bounds.max.is_finite() => {
            SizeConstraint::AtMost(bounds.max)
        }
        (SizeConstraint::Unbounded, None) => SizeConstraint::Unbounded,
    }
}

/// Offset from `position` edges for a relatively positioned node.
pub(crate) fn relative_offset(style: &Style, direction: Direction, owner: OwnerSize) -> (f32, f32) {
    let edge = |edge, base| style.position.resolve(edge, direction).resolve(base);
    let dx = edge(PhysicalEdge::Left, owner.width)
        .or_else(|| edge(PhysicalEdge::Right, owner.width).map(|right| -right))
        .unwrap_or(0.0);
    let dy = edge(PhysicalEdge::Top, owner.height)
        .or_else(|| edge(PhysicalEdge::Bottom, owner.height).map(|bottom| -bottom))
        .unwrap_or(0.0);
    (dx, dy)
}

pub(crate) struct LayoutPass<'a> {
    pub(crate) nodes: &'a mut NodeArena,
    pub(crate) web_defaults: bool,
    pub(crate) stats: LayoutStats,
}

impl<'a> LayoutPass<'a> {
    pub(crate) fn new(nodes: &'a mut NodeArena, web_defaults: bool) -> Self {
        Self {
            nodes,
            web_defaults,
            stats: LayoutStats::default(),
        }
    }

    /// Lay out the subtree under `root` in the given available space.
    pub(crate) fn run(
        &mut self,
        root: NodeId,
        available_width: f32,
        available_height: f32,
        direction: Direction,
    ) {
        let style = self.nodes[root].style;
        if style.display == Display::None {
            self.zero_subtree(root);
            return;
        }

        let owner = OwnerSize::new(
            SizeConstraint::available(available_width).limit(),
            SizeConstraint::available(available_height).limit(),
        );
        let resolved = style.direction.resolve(direction);
        let margin = resolve_sides(&style.margin, resolved, owner.width);
        let width = root_constraint(&style, true, owner, margin.horizontal_sum());
        let height = root_constraint(&style, false, owner, margin.vertical_sum());

        self.layout_node(root, width, height, owner, direction, true);

        let (dx, dy) = relative_offset(&style, resolved, owner);
        let layout = &mut self.nodes[root].layout;
        layout.left = margin.left + dx;
        layout.top = margin.top + dy;
        layout.margin = margin;
    }

    /// Size (and when `perform` is set, position the subtree of) one node.
    pub(crate) fn layout_node(
        &mut self,
        id: NodeId,
        width: SizeConstraint,
        height: SizeConstraint,
        owner: OwnerSize,
        owner_direction: Direction,
        perform: bool,
    ) -> Size {
        let node = &mut self.nodes[id];
        if node.dirty {
            node.cache.clear();
            node.dirty = false;
        }

        let key = CacheKey {
            width,
            height,
            owner,
            direction: owner_direction,
        };
        let cached = if perform {
            node.cache.layout(&key)
        } else {
            node.cache.measurement(&key)
        };
        if let Some(size) = cached {
            self.stats.cache_hits += 1;
            return size;
        }

        let size = self.compute_node(id, width, height, owner, owner_direction, perform);

        let node = &mut self.nodes[id];
        if perform {
            node.cache.store_layout(key, size);
            node.layout.width = size.width;
            node.layout.height = size.height;
            node.has_new_layout = true;
            self.stats.layouts_computed += 1;
        } else {
            node.cache.store_measurement(key, size);
            self.stats.measurements_computed += 1;
        }
        size
    }

    fn compute_node(
        &mut self,
        id: NodeId,
        width: SizeConstraint,
        height: SizeConstraint,
        owner: OwnerSize,
        owner_direction: Direction,
        perform: bool,
    ) -> Size {
        let style = self.nodes[id].style;
        let direction = style.direction.resolve(owner_direction);
        let padding = resolve_insets(&style.padding, direction, owner.width);
        let border = resolve_insets(&style.border, direction, None);
        let insets = padding.add(&border);

        let horizontal = AxisStyle::of(&style, true);
        let vertical = AxisStyle::of(&style, false);
        let width_bounds = horizontal.bounds(owner.width);
        let height_bounds = vertical.bounds(owner.height);
        let sizing = NodeSizing {
            width: own_constraint(
                width,
                horizontal.size.resolve(owner.width),
                width_bounds,
                insets.horizontal_sum(),
            ),
            height: own_constraint(
                height,
                vertical.size.resolve(owner.height),
                height_bounds,
                insets.vertical_sum(),
            ),
            width_bounds,
            height_bounds,
            insets,
        };

        let node = &mut self.nodes[id];
        if perform {
            node.layout.direction = direction;
            node.layout.padding = padding;
            node.layout.border = border;
            node.layout.had_overflow = false;
        }

        if node.measure.is_some() {
            return self.measure_leaf(id, &sizing);
        }
        if node.children.is_empty() {
            return sizing.from_content(Size::ZERO);
        }
        if !perform {
            if let (Some(w), Some(h)) = (sizing.width.exact(), sizing.height.exact()) {
                return Size::new(w, h);
            }
        }
        self.layout_flex(id, &sizing, direction, perform)
    }

    fn measure_leaf(&mut self, id: NodeId, sizing: &NodeSizing) -> Size {
        if let (Some(w), Some(h)) = (sizing.width.exact(), sizing.height.exact()) {
            return Size::new(w, h);
        }
        let inner_width = sizing.width.shrink(sizing.insets.horizontal_sum());
        let inner_height = sizing.height.shrink(sizing.insets.vertical_sum());

        let node = &self.nodes[id];
        let input = MeasureInput {
            width: inner_width.measure_value(),
            width_mode: inner_width.mode(),
            height: inner_height.measure_value(),
            height_mode: inner_height.mode(),
            context: node.context,
        };
        let Some(hook) = node.measure.as_ref() else {
            return sizing.from_content(Size::ZERO);
        };
        let raw = hook.measure(input);
        self.stats.measure_callbacks += 1;
        sizing.from_content(apply_measure_limits(raw, &input))
    }

    /// Give a hidden subtree an all-zero layout and settle its flags.
    pub(crate) fn zero_subtree(&mut self, id: NodeId) {
        let node = &mut self.nodes[id];
        node.layout = ComputedLayout::default();
        node.dirty = false;
        node.has_new_layout = true;
        node.cache.clear();
        self.stats.nodes_zeroed += 1;

        for i in 0..self.nodes[id].children.len() {
            let child = self.nodes[id].children[i];
            self.zero_subtree(child);
        }
    }
}

/// Constraint for a root: its own size, else its max, else the available
/// space minus margins, else unbounded.
fn root_constraint(
    style: &Style,
    horizontal: bool,
    owner: OwnerSize,
    margin: f32,
) -> SizeConstraint {
    let axis = AxisStyle::of(style, horizontal);
    let base = owner.axis(horizontal);
    if let Some(size) = axis.size.resolve(base) {
        SizeConstraint::Exact(size)
    } else if let Some(max) = axis.max.resolve(base) {
        SizeConstraint::AtMost(max)
    } else if let Some(available) = base {
        SizeConstraint::Exact((available - margin).max(0.0))
    } else {
        SizeConstraint::Unbounded
    }
}
