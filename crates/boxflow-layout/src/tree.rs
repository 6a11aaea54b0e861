//! The node tree and its public API.
//!
//! [`LayoutTree`] owns every node. Structure, style and measurement edits go
//! through it, and each edit that can change geometry marks the affected
//! node and its ancestors dirty. Fallible operations validate first and
//! leave the tree untouched on error.

use std::iter::FusedIterator;

use boxflow_core::{Rect, Sides};
use tracing::{debug_span, trace};

use crate::config::Config;
use crate::engine::rounding::round_layout;
use crate::engine::{LayoutPass, LayoutStats};
use crate::error::{LayoutError, Result, StructuralViolation, finite, invalid_edge};
use crate::measure::Measure;
use crate::node::{ComputedLayout, Node, NodeArena, NodeId};
use crate::style::{
    Align, Dimension, Direction, Display, Edge, EdgeValues, FlexDirection, Gutter, Justify,
    Overflow, PhysicalEdge, PositionType, Style, Wrap,
};

/// Arena-backed tree of layout nodes.
///
/// ```
/// use boxflow_layout::{LayoutTree, Edge};
///
/// let mut tree = LayoutTree::new();
/// let root = tree.new_node();
/// let child = tree.new_node();
/// tree.append_child(root, child)?;
/// tree.set_height(child, 40.0)?;
/// tree.set_margin(child, Edge::All, 5.0)?;
/// tree.calculate_layout(root, 200.0, 100.0)?;
///
/// let rect = tree.layout(child)?;
/// assert_eq!((rect.left, rect.top, rect.width, rect.height), (5.0, 5.0, 190.0, 40.0));
/// # Ok::<(), boxflow_layout::LayoutError>(())
/// ```
#[derive(Debug, Default)]
pub struct LayoutTree {
    nodes: NodeArena,
    config: Config,
    last_stats: LayoutStats,
}

/// Direct children of a node, in order.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    inner: std::slice::Iter<'a, NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.inner.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<NodeId> {
        self.inner.next_back().copied()
    }
}

impl ExactSizeIterator for Children<'_> {}
impl FusedIterator for Children<'_> {}

/// Reject non-finite payloads anywhere in a style record.
fn validate_style(style: &Style) -> Result<()> {
    let dimension = |property: &'static str, value: Dimension| {
        value.value().map_or(Ok(0.0), |v| finite(property, v)).map(drop)
    };
    let edges = |property: &'static str, values: &EdgeValues| {
        values
            .defined()
            .try_for_each(|(_, value)| dimension(property, value))
    };
    let optional = |property: &'static str, value: Option<f32>| {
        value.map_or(Ok(0.0), |v| finite(property, v)).map(drop)
    };

    optional("flex", style.flex)?;
    optional("flex_grow", style.flex_grow)?;
    optional("flex_shrink", style.flex_shrink)?;
    dimension("flex_basis", style.flex_basis)?;
    dimension("width", style.width)?;
    dimension("height", style.height)?;
    dimension("min_width", style.min_width)?;
    dimension("min_height", style.min_height)?;
    dimension("max_width", style.max_width)?;
    dimension("max_height", style.max_height)?;
    edges("margin", &style.margin)?;
    edges("padding", &style.padding)?;
    edges("border", &style.border)?;
    edges("position", &style.position)?;
    finite("column_gap", style.column_gap)?;
    finite("row_gap", style.row_gap)?;
    Ok(())
}

impl LayoutTree {
    /// An empty tree with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty tree with an explicit configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    /// Whether `node` refers to a live node of this tree.
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(node)
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id)
            .ok_or(LayoutError::UnknownNode { node: id })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id)
            .ok_or(LayoutError::UnknownNode { node: id })
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// A detached node with the default style for this tree's configuration.
    pub fn new_node(&mut self) -> NodeId {
        self.nodes.insert(Node::new(Style::for_config(&self.config)))
    }

    /// A detached node with the given style.
    pub fn new_node_with_style(&mut self, style: Style) -> Result<NodeId> {
        validate_style(&style)?;
        Ok(self.nodes.insert(Node::new(style)))
    }

    /// A detached measured leaf.
    pub fn new_leaf_with_measure(
        &mut self,
        style: Style,
        measure: impl Measure + 'static,
    ) -> Result<NodeId> {
        let id = self.new_node_with_style(style)?;
        self.nodes[id].measure = Some(Box::new(measure));
        Ok(id)
    }

    /// A node with the given style and children, appended in order.
    pub fn new_node_with_children(&mut self, style: Style, children: &[NodeId]) -> Result<NodeId> {
        validate_style(&style)?;
        for child in children {
            self.node(*child)?;
        }
        let id = self.nodes.insert(Node::new(style));
        for child in children {
            self.append_child(id, *child)?;
        }
        Ok(id)
    }

    /// Destroy one node. It is detached from its parent and its children
    /// become parentless roots.
    pub fn remove_node(&mut self, node: NodeId) -> Result<()> {
        self.detach(node)?;
        let children = std::mem::take(&mut self.node_mut(node)?.children);
        for child in children {
            self.nodes[child].parent = None;
        }
        self.nodes.remove(node);
        trace!(%node, "remove node");
        Ok(())
    }

    /// Destroy a node and all of its descendants.
    pub fn remove_subtree(&mut self, node: NodeId) -> Result<()> {
        self.detach(node)?;
        let mut stack = vec![node];
        let mut removed = 0usize;
        while let Some(id) = stack.pop() {
            if let Some(removed_node) = self.nodes.remove(id) {
                stack.extend(removed_node.children);
                removed += 1;
            }
        }
        trace!(%node, removed, "remove subtree");
        Ok(())
    }

    // ── Structure ───────────────────────────────────────────────────────

    /// Insert `child` into `parent` at `index`.
    ///
    /// A child that already has a parent is detached from it first; when
    /// that parent is `parent` itself, `index` is clamped to the shortened
    /// child list.
    pub fn insert_child(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<()> {
        let len = self.node(parent)?.children.len();
        let old_parent = self.node(child)?.parent;

        let violation = if parent == child {
            Some((child, StructuralViolation::SelfInsertion))
        } else if self.nodes[parent].measure.is_some() {
            Some((parent, StructuralViolation::MeasuredNodeCannotHaveChildren))
        } else if self.is_ancestor(child, parent) {
            Some((child, StructuralViolation::WouldCreateCycle))
        } else {
            None
        };
        if let Some((node, violation)) = violation {
            return Err(LayoutError::StructuralViolation { node, violation });
        }
        if index > len {
            return Err(LayoutError::InvalidIndex { parent, index, len });
        }

        let mut index = index;
        if let Some(old) = old_parent {
            let siblings = &mut self.nodes[old].children;
            siblings.retain(|id| *id != child);
            if old == parent {
                index = index.min(siblings.len());
            }
            self.mark_dirty_chain(old);
        }

        self.nodes[parent].children.insert(index, child);
        self.nodes[child].parent = Some(parent);
        self.mark_dirty_chain(parent);
        trace!(%parent, %child, index, "insert child");
        Ok(())
    }

    /// Insert `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let mut len = self.node(parent)?.children.len();
        if self.node(child)?.parent == Some(parent) {
            len -= 1;
        }
        self.insert_child(parent, child, len)
    }

    /// Remove a direct child, leaving it as a parentless root.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node(child)?;
        let children = &mut self.node_mut(parent)?.children;
        let Some(position) = children.iter().position(|id| *id == child) else {
            return Err(LayoutError::NotAChild { parent, child });
        };
        children.remove(position);
        self.nodes[child].parent = None;
        self.mark_dirty_chain(parent);
        trace!(%parent, %child, "remove child");
        Ok(())
    }

    /// Detach every child of `parent`.
    pub fn remove_all_children(&mut self, parent: NodeId) -> Result<()> {
        let children = std::mem::take(&mut self.node_mut(parent)?.children);
        if children.is_empty() {
            return Ok(());
        }
        for child in &children {
            self.nodes[*child].parent = None;
        }
        self.mark_dirty_chain(parent);
        trace!(%parent, count = children.len(), "remove all children");
        Ok(())
    }

    pub fn child_count(&self, node: NodeId) -> Result<usize> {
        Ok(self.node(node)?.children.len())
    }

    /// The child at `index`, if there is one.
    pub fn child_at(&self, node: NodeId, index: usize) -> Result<Option<NodeId>> {
        Ok(self.node(node)?.children.get(index).copied())
    }

    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(node)?.parent)
    }

    /// Iterate direct children in order. The iterator can be cloned to
    /// restart from the current position.
    #[doc(alias = "iterate_children")]
    pub fn children(&self, node: NodeId) -> Result<Children<'_>> {
        Ok(Children {
            inner: self.node(node)?.children.iter(),
        })
    }

    fn detach(&mut self, node: NodeId) -> Result<()> {
        if let Some(parent) = self.node(node)?.parent {
            self.nodes[parent].children.retain(|id| *id != node);
            self.nodes[node].parent = None;
            self.mark_dirty_chain(parent);
        }
        Ok(())
    }

    /// Whether `ancestor` is `node` or lies on its parent chain.
    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    // ── Dirty tracking ──────────────────────────────────────────────────

    fn mark_dirty_chain(&mut self, node: NodeId) {
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(node) = self.nodes.get_mut(id) else {
                break;
            };
            if node.dirty {
                break;
            }
            node.dirty = true;
            current = node.parent;
        }
    }

    /// Force `node` and its ancestors to be recomputed by the next pass.
    pub fn mark_dirty(&mut self, node: NodeId) -> Result<()> {
        self.node(node)?;
        self.mark_dirty_chain(node);
        Ok(())
    }

    pub fn is_dirty(&self, node: NodeId) -> Result<bool> {
        Ok(self.node(node)?.dirty)
    }

    /// Whether a pass recomputed this node since the flag was last cleared.
    pub fn has_new_layout(&self, node: NodeId) -> Result<bool> {
        Ok(self.node(node)?.has_new_layout)
    }

    pub fn mark_layout_seen(&mut self, node: NodeId) -> Result<()> {
        self.node_mut(node)?.has_new_layout = false;
        Ok(())
    }

    // ── User data and measurement ───────────────────────────────────────

    /// Store an opaque value for the embedding layer.
    ///
    /// The value reaches measurement hooks, so changing it on a measured
    /// node marks the node dirty.
    pub fn set_context(&mut self, node: NodeId, context: Option<u64>) -> Result<()> {
        let target = self.node_mut(node)?;
        let changed = target.context != context;
        target.context = context;
        if changed && target.measure.is_some() {
            self.mark_dirty_chain(node);
        }
        Ok(())
    }

    pub fn context(&self, node: NodeId) -> Result<Option<u64>> {
        Ok(self.node(node)?.context)
    }

    /// Attach (`Some`) or detach (`None`) a measurement hook.
    pub fn set_measure(&mut self, node: NodeId, measure: Option<Box<dyn Measure>>) -> Result<()> {
        let target = self.node_mut(node)?;
        if measure.is_some() && !target.children.is_empty() {
            return Err(LayoutError::StructuralViolation {
                node,
                violation: StructuralViolation::NodeWithChildrenCannotMeasure,
            });
        }
        target.measure = measure;
        self.mark_dirty_chain(node);
        Ok(())
    }

    /// Attach a measurement hook.
    pub fn enable_measure(&mut self, node: NodeId, measure: impl Measure + 'static) -> Result<()> {
        self.set_measure(node, Some(Box::new(measure)))
    }

    pub fn has_measure(&self, node: NodeId) -> Result<bool> {
        Ok(self.node(node)?.measure.is_some())
    }

    // ── Style ───────────────────────────────────────────────────────────

    pub fn style(&self, node: NodeId) -> Result<&Style> {
        Ok(&self.node(node)?.style)
    }

    /// Replace the whole style record.
    pub fn set_style(&mut self, node: NodeId, style: Style) -> Result<()> {
        validate_style(&style)?;
        self.update_style(node, |current| *current = style)
    }

    /// Apply an edit and dirty the node only if the style actually changed.
    fn update_style(&mut self, node: NodeId, edit: impl FnOnce(&mut Style)) -> Result<()> {
        let target = self.node_mut(node)?;
        let mut style = target.style;
        edit(&mut style);
        if style != target.style {
            target.style = style;
            self.mark_dirty_chain(node);
        }
        Ok(())
    }

    /// Set `justify_content` from an alignment value.
    pub fn set_justify_content_from_align(&mut self, node: NodeId, align: Align) -> Result<()> {
        let justify = Justify::try_from(align)?;
        self.set_justify_content(node, justify)
    }

    /// Effective grow factor, after the `flex` shorthand.
    pub fn flex_grow(&self, node: NodeId) -> Result<f32> {
        Ok(self.node(node)?.style.resolved_flex_grow())
    }

    /// Effective shrink factor, after the `flex` shorthand and web defaults.
    pub fn flex_shrink(&self, node: NodeId) -> Result<f32> {
        Ok(self
            .node(node)?
            .style
            .resolved_flex_shrink(self.config.use_web_defaults))
    }

    pub fn flex(&self, node: NodeId) -> Result<Option<f32>> {
        Ok(self.node(node)?.style.flex)
    }

    pub fn set_flex(&mut self, node: NodeId, flex: f32) -> Result<()> {
        let flex = finite("flex", flex)?;
        self.update_style(node, |style| style.flex = Some(flex))
    }

    pub fn set_flex_grow(&mut self, node: NodeId, grow: f32) -> Result<()> {
        let grow = finite("flex_grow", grow)?;
        self.update_style(node, |style| style.flex_grow = Some(grow))
    }

    pub fn set_flex_shrink(&mut self, node: NodeId, shrink: f32) -> Result<()> {
        let shrink = finite("flex_shrink", shrink)?;
        self.update_style(node, |style| style.flex_shrink = Some(shrink))
    }

    /// Gap for one gutter. `Gutter::All` only answers when both agree.
    pub fn gap(&self, node: NodeId, gutter: Gutter) -> Result<f32> {
        let style = &self.node(node)?.style;
        match gutter {
            Gutter::Column => Ok(style.column_gap),
            Gutter::Row => Ok(style.row_gap),
            Gutter::All if style.column_gap == style.row_gap => Ok(style.column_gap),
            Gutter::All => Err(LayoutError::invalid(
                "gap",
                "column and row gaps differ; query one gutter",
            )),
        }
    }

    pub fn set_gap(&mut self, node: NodeId, gutter: Gutter, points: f32) -> Result<()> {
        let points = finite("gap", points)?;
        self.update_style(node, |style| match gutter {
            Gutter::Column => style.column_gap = points,
            Gutter::Row => style.row_gap = points,
            Gutter::All => {
                style.column_gap = points;
                style.row_gap = points;
            }
        })
    }

    /// Border width stored for exactly this edge.
    pub fn border(&self, node: NodeId, edge: Edge) -> Result<Option<f32>> {
        Ok(self.node(node)?.style.border.get(edge).value())
    }

    pub fn set_border(&mut self, node: NodeId, edge: Edge, points: f32) -> Result<()> {
        let points = finite("border", points)?;
        self.update_style(node, |style| style.border.set(edge, Dimension::Points(points)))
    }

    // ── Layout ──────────────────────────────────────────────────────────

    /// Lay out the subtree under `root` left to right.
    ///
    /// Non-finite available sizes leave that axis unconstrained; negative
    /// ones count as zero.
    pub fn calculate_layout(
        &mut self,
        root: NodeId,
        available_width: f32,
        available_height: f32,
    ) -> Result<()> {
        self.calculate_layout_with_direction(root, available_width, available_height, Direction::Ltr)
    }

    /// Lay out the subtree under `root` with an explicit root direction.
    pub fn calculate_layout_with_direction(
        &mut self,
        root: NodeId,
        available_width: f32,
        available_height: f32,
        direction: Direction,
    ) -> Result<()> {
        self.node(root)?;
        let span = debug_span!(
            "calculate_layout",
            %root,
            available_width,
            available_height,
            ?direction
        );
        let _guard = span.enter();

        let mut pass = LayoutPass::new(&mut self.nodes, self.config.use_web_defaults);
        pass.run(root, available_width, available_height, direction);
        let stats = pass.stats;
        round_layout(&mut self.nodes, root, self.config.point_scale_factor);
        self.last_stats = stats;

        trace!(
            layouts = stats.layouts_computed,
            measurements = stats.measurements_computed,
            callbacks = stats.measure_callbacks,
            cache_hits = stats.cache_hits,
            zeroed = stats.nodes_zeroed,
            "layout pass finished"
        );
        Ok(())
    }

    /// Counters from the most recent layout pass.
    pub fn last_layout_stats(&self) -> LayoutStats {
        self.last_stats
    }

    /// Position and size relative to the parent's border box, after pixel
    /// snapping.
    pub fn layout(&self, node: NodeId) -> Result<Rect> {
        Ok(self.node(node)?.rounded)
    }

    /// Like [`layout`](Self::layout) but before pixel snapping.
    pub fn unrounded_layout(&self, node: NodeId) -> Result<Rect> {
        Ok(self.node(node)?.layout.rect())
    }

    pub fn layout_direction(&self, node: NodeId) -> Result<Direction> {
        Ok(self.node(node)?.layout.direction)
    }

    /// Whether content overflowed this node in the last pass.
    pub fn had_overflow(&self, node: NodeId) -> Result<bool> {
        Ok(self.node(node)?.layout.had_overflow)
    }

    pub fn layout_margin(&self, node: NodeId, edge: Edge) -> Result<f32> {
        self.layout_edge(node, edge, "layout_margin", |layout| layout.margin)
    }

    pub fn layout_border(&self, node: NodeId, edge: Edge) -> Result<f32> {
        self.layout_edge(node, edge, "layout_border", |layout| layout.border)
    }

    pub fn layout_padding(&self, node: NodeId, edge: Edge) -> Result<f32> {
        self.layout_edge(node, edge, "layout_padding", |layout| layout.padding)
    }

    fn layout_edge(
        &self,
        node: NodeId,
        edge: Edge,
        property: &'static str,
        pick: impl Fn(&ComputedLayout) -> Sides,
    ) -> Result<f32> {
        let layout = &self.node(node)?.layout;
        let sides = pick(layout);
        match PhysicalEdge::from_edge(edge, layout.direction) {
            Some(PhysicalEdge::Left) => Ok(sides.left),
            Some(PhysicalEdge::Top) => Ok(sides.top),
            Some(PhysicalEdge::Right) => Ok(sides.right),
            Some(PhysicalEdge::Bottom) => Ok(sides.bottom),
            None => Err(invalid_edge(property, edge)),
        }
    }
}

macro_rules! enum_properties {
    ($( $(#[$meta:meta])* $getter:ident / $setter:ident: $ty:ty ),+ $(,)?) => {
        impl LayoutTree {
            $(
                $(#[$meta])*
                pub fn $getter(&self, node: NodeId) -> Result<$ty> {
                    Ok(self.node(node)?.style.$getter)
                }

                $(#[$meta])*
                pub fn $setter(&mut self, node: NodeId, value: $ty) -> Result<()> {
                    self.update_style(node, |style| style.$getter = value)
                }
            )+
        }
    };
}

enum_properties! {
    /// Layout direction (`Inherit` by default).
    direction / set_direction: Direction,
    flex_direction / set_flex_direction: FlexDirection,
    justify_content / set_justify_content: Justify,
    align_content / set_align_content: Align,
    align_items / set_align_items: Align,
    align_self / set_align_self: Align,
    position_type / set_position_type: PositionType,
    flex_wrap / set_flex_wrap: Wrap,
    overflow / set_overflow: Overflow,
    display / set_display: Display,
}

macro_rules! dimension_properties {
    ($( $getter:ident / $points:ident, $percent:ident $(, $auto:ident)? );+ $(;)?) => {
        impl LayoutTree {
            $(
                pub fn $getter(&self, node: NodeId) -> Result<Dimension> {
                    Ok(self.node(node)?.style.$getter)
                }

                pub fn $points(&mut self, node: NodeId, points: f32) -> Result<()> {
                    let points = finite(stringify!($getter), points)?;
                    self.update_style(node, |style| style.$getter = Dimension::Points(points))
                }

                pub fn $percent(&mut self, node: NodeId, percent: f32) -> Result<()> {
                    let percent = finite(stringify!($getter), percent)?;
                    self.update_style(node, |style| style.$getter = Dimension::Percent(percent))
                }

                $(
                    pub fn $auto(&mut self, node: NodeId) -> Result<()> {
                        self.update_style(node, |style| style.$getter = Dimension::Auto)
                    }
                )?
            )+
        }
    };
}

dimension_properties! {
    width / set_width, set_width_percent, set_width_auto;
    height / set_height, set_height_percent, set_height_auto;
    min_width / set_min_width, set_min_width_percent;
    min_height / set_min_height, set_min_height_percent;
    max_width / set_max_width, set_max_width_percent;
    max_height / set_max_height, set_max_height_percent;
    flex_basis / set_flex_basis, set_flex_basis_percent, set_flex_basis_auto;
}

macro_rules! edge_properties {
    ($( $getter:ident / $points:ident, $percent:ident $(, $auto:ident)? );+ $(;)?) => {
        impl LayoutTree {
            $(
                /// Value stored for exactly this edge, without fallback.
                pub fn $getter(&self, node: NodeId, edge: Edge) -> Result<Dimension> {
                    Ok(self.node(node)?.style.$getter.get(edge))
                }

                pub fn $points(&mut self, node: NodeId, edge: Edge, points: f32) -> Result<()> {
                    let points = finite(stringify!($getter), points)?;
                    self.update_style(node, |style| style.$getter.set(edge, Dimension::Points(points)))
                }

                pub fn $percent(&mut self, node: NodeId, edge: Edge, percent: f32) -> Result<()> {
                    let percent = finite(stringify!($getter), percent)?;
                    self.update_style(node, |style| style.$getter.set(edge, Dimension::Percent(percent)))
                }

                $(
                    pub fn $auto(&mut self, node: NodeId, edge: Edge) -> Result<()> {
                        self.update_style(node, |style| style.$getter.set(edge, Dimension::Auto))
                    }
                )?
            )+
        }
    };
}

edge_properties! {
    margin / set_margin, set_margin_percent, set_margin_auto;
    padding / set_padding, set_padding_percent;
    position / set_position, set_position_percent;
}
