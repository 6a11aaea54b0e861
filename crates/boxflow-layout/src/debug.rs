//! Human-readable dumps and serializable snapshots of a laid-out tree.
//!
//! The dump mimics an HTML fragment (`<div layout="…" style="…">`) so it can
//! be diffed or pasted into a browser for comparison. Its format is not
//! stable. [`LayoutSnapshot`] is the structured alternative.

use std::fmt::Write;

use bitflags::bitflags;
use boxflow_core::{Rect, Sides};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::node::NodeId;
use crate::style::{Direction, Edge, EdgeValues, Style};
use crate::tree::LayoutTree;

bitflags! {
    /// Sections included in [`LayoutTree::debug_dump`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PrintOptions: u8 {
        /// Computed position and size.
        const LAYOUT = 1 << 0;
        /// Style values that differ from the defaults.
        const STYLE = 1 << 1;
        /// Recurse into children.
        const CHILDREN = 1 << 2;
    }
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self::all()
    }
}

/// Computed layout of a subtree, for diagnostics and golden files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub node: NodeId,
    pub layout: Rect,
    pub direction: Direction,
    pub margin: Sides,
    pub border: Sides,
    pub padding: Sides,
    pub had_overflow: bool,
    pub measured: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayoutSnapshot>,
}

impl LayoutSnapshot {
    /// Number of nodes in the snapshot, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }
}

impl LayoutTree {
    /// Render the subtree under `node`.
    pub fn debug_dump(&self, node: NodeId, options: PrintOptions) -> Result<String> {
        let mut out = String::new();
        self.dump_node(node, options, 0, &mut out)?;
        Ok(out)
    }

    fn dump_node(
        &self,
        node: NodeId,
        options: PrintOptions,
        depth: usize,
        out: &mut String,
    ) -> Result<()> {
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{indent}<div");

        if options.contains(PrintOptions::LAYOUT) {
            let rect = self.layout(node)?;
            let _ = write!(
                out,
                " layout=\"width: {}; height: {}; top: {}; left: {};\"",
                rect.width, rect.height, rect.top, rect.left
            );
        }
        if options.contains(PrintOptions::STYLE) {
            let style = self.style(node)?;
            let defaults = Style::for_config(self.config());
            let _ = write!(out, " style=\"{}\"", style_declarations(style, &defaults));
        }
        if self.has_measure(node)? {
            out.push_str(" has-custom-measure=\"true\"");
        }
        out.push('>');

        let count = self.child_count(node)?;
        if options.contains(PrintOptions::CHILDREN) && count > 0 {
            out.push('\n');
            for child in self.children(node)? {
                self.dump_node(child, options, depth + 1, out)?;
            }
            out.push_str(&indent);
        }
        out.push_str("</div>\n");
        Ok(())
    }

    /// Capture the computed layout of the subtree under `node`.
    pub fn snapshot(&self, node: NodeId) -> Result<LayoutSnapshot> {
        let children = self
            .children(node)?
            .map(|child| self.snapshot(child))
            .collect::<Result<Vec<_>>>()?;
        Ok(LayoutSnapshot {
            node,
            layout: self.layout(node)?,
            direction: self.layout_direction(node)?,
            margin: self.edges_of(node, Self::layout_margin)?,
            border: self.edges_of(node, Self::layout_border)?,
            padding: self.edges_of(node, Self::layout_padding)?,
            had_overflow: self.had_overflow(node)?,
            measured: self.has_measure(node)?,
            children,
        })
    }

    fn edges_of(
        &self,
        node: NodeId,
        read: fn(&Self, NodeId, Edge) -> Result<f32>,
    ) -> Result<Sides> {
        Ok(Sides::new(
            read(self, node, Edge::Top)?,
            read(self, node, Edge::Right)?,
            read(self, node, Edge::Bottom)?,
            read(self, node, Edge::Left)?,
        ))
    }
}

/// CSS-like declarations for every field that differs from `defaults`.
fn style_declarations(style: &Style, defaults: &Style) -> String {
    let mut out = String::new();
    let mut enum_field = |name: &str, value: &dyn std::fmt::Display, changed: bool| {
        if changed {
            let _ = write!(out, "{name}: {value}; ");
        }
    };
    enum_field("direction", &style.direction, style.direction != defaults.direction);
    enum_field(
        "flex-direction",
        &style.flex_direction,
        style.flex_direction != defaults.flex_direction,
    );
    enum_field(
        "justify-content",
        &style.justify_content,
        style.justify_content != defaults.justify_content,
    );
    enum_field(
        "align-items",
        &style.align_items,
        style.align_items != defaults.align_items,
    );
    enum_field(
        "align-content",
        &style.align_content,
        style.align_content != defaults.align_content,
    );
    enum_field(
        "align-self",
        &style.align_self,
        style.align_self != defaults.align_self,
    );
    enum_field(
        "flex-wrap",
        &style.flex_wrap,
        style.flex_wrap != defaults.flex_wrap,
    );
    enum_field("overflow", &style.overflow, style.overflow != defaults.overflow);
    enum_field("display", &style.display, style.display != defaults.display);
    enum_field(
        "position",
        &style.position_type,
        style.position_type != defaults.position_type,
    );

    let factors = [
        ("flex", style.flex),
        ("flex-grow", style.flex_grow),
        ("flex-shrink", style.flex_shrink),
    ];
    for (name, value) in factors {
        if let Some(value) = value {
            let _ = write!(out, "{name}: {value}; ");
        }
    }

    let dimensions = [
        ("flex-basis", style.flex_basis, defaults.flex_basis),
        ("width", style.width, defaults.width),
        ("height", style.height, defaults.height),
        ("min-width", style.min_width, defaults.min_width),
        ("min-height", style.min_height, defaults.min_height),
        ("max-width", style.max_width, defaults.max_width),
        ("max-height", style.max_height, defaults.max_height),
    ];
    for (name, value, default) in dimensions {
        if value != default {
            let _ = write!(out, "{name}: {value}; ");
        }
    }

    edge_declarations(&mut out, "margin", &style.margin);
    edge_declarations(&mut out, "padding", &style.padding);
    edge_declarations(&mut out, "border", &style.border);
    edge_declarations(&mut out, "inset", &style.position);

    if style.column_gap != 0.0 {
        let _ = write!(out, "column-gap: {}px; ", style.column_gap);
    }
    if style.row_gap != 0.0 {
        let _ = write!(out, "row-gap: {}px; ", style.row_gap);
    }
    out
}

fn edge_declarations(out: &mut String, property: &str, values: &EdgeValues) {
    for (edge, value) in values.defined() {
        match edge {
            Edge::All => {
                let _ = write!(out, "{property}: {value}; ");
            }
            other => {
                let _ = write!(out, "{property}-{other}: {value}; ");
            }
        }
    }
}
