//! Absolutely positioned children.
//!
//! They are laid out after their parent's size is known, against the
//! parent's padding box. Offsets win; a child without offsets on an axis is
//! placed inside the content box by the parent's `justify_content` (main
//! axis) or its own `align_self` (cross axis).

use boxflow_core::Size;

use super::axis::{AxisStyle, OwnerSize, SizeConstraint, resolve_insets, resolve_sides};
use super::flex::FlexContainer;
use super::{LayoutPass, NodeSizing};
use crate::node::NodeId;
use crate::style::{Align, Justify, PhysicalEdge, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Start,
    Center,
    End,
}

impl Placement {
    fn from_justify(justify: Justify) -> Self {
        match justify {
            Justify::Center => Placement::Center,
            Justify::FlexEnd => Placement::End,
            _ => Placement::Start,
        }
    }

    fn from_align(align: Align) -> Self {
        match align {
            Align::Center => Placement::Center,
            Align::FlexEnd => Placement::End,
            _ => Placement::Start,
        }
    }

    fn reversed(self, reversed: bool) -> Self {
        match (self, reversed) {
            (Placement::Start, true) => Placement::End,
            (Placement::End, true) => Placement::Start,
            (other, _) => other,
        }
    }

    /// Offset of the margin box inside a content box of `room`.
    fn offset(self, room: f32, outer: f32) -> f32 {
        match self {
            Placement::Start => 0.0,
            Placement::Center => (room - outer) / 2.0,
            Placement::End => room - outer,
        }
    }
}

/// Offsets, margins and placement for one axis of an absolute child.
struct AxisPlacement {
    lead_offset: Option<f32>,
    trail_offset: Option<f32>,
    lead_margin: f32,
    trail_margin: f32,
    placement: Placement,
}

impl AxisPlacement {
    fn position(
        &self,
        size: f32,
        parent_size: f32,
        border: (f32, f32),
        insets: (f32, f32),
    ) -> f32 {
        if let Some(lead) = self.lead_offset {
            border.0 + lead + self.lead_margin
        } else if let Some(trail) = self.trail_offset {
            parent_size - border.1 - trail - self.trail_margin - size
        } else {
            let room = (parent_size - insets.0 - insets.1).max(0.0);
            let outer = size + self.lead_margin + self.trail_margin;
            insets.0 + self.placement.offset(room, outer) + self.lead_margin
        }
    }
}

impl LayoutPass<'_> {
    pub(super) fn layout_absolute(
        &mut self,
        id: NodeId,
        parent_style: &Style,
        container: &FlexContainer,
        parent_sizing: &NodeSizing,
        parent_size: Size,
    ) {
        let border = resolve_insets(&parent_style.border, container.direction, None);
        let block_width = (parent_size.width - border.horizontal_sum()).max(0.0);
        let block_height = (parent_size.height - border.vertical_sum()).max(0.0);
        let owner = OwnerSize::new(Some(block_width), Some(block_height));

        let style = self.nodes[id].style;
        let direction = style.direction.resolve(container.direction);
        let margin = resolve_sides(&style.margin, direction, owner.width);
        let insets = resolve_insets(&style.padding, direction, owner.width)
            .add(&resolve_insets(&style.border, direction, None));
        let offset = |edge, base| style.position.resolve(edge, direction).resolve(base);

        let align = match style.align_self {
            Align::Auto => container.align_items,
            other => other,
        };
        let justify = Placement::from_justify(parent_style.justify_content)
            .reversed(container.main_reversed);
        let cross = Placement::from_align(align).reversed(container.cross_reversed);
        let (horizontal_placement, vertical_placement) = if container.main_row {
            (justify, cross)
        } else {
            (cross, justify)
        };

        let horizontal = AxisPlacement {
            lead_offset: offset(PhysicalEdge::Left, owner.width),
            trail_offset: offset(PhysicalEdge::Right, owner.width),
            lead_margin: margin.left,
            trail_margin: margin.right,
            placement: horizontal_placement,
        };
        let vertical = AxisPlacement {
            lead_offset: offset(PhysicalEdge::Top, owner.height),
            trail_offset: offset(PhysicalEdge::Bottom, owner.height),
            lead_margin: margin.top,
            trail_margin: margin.bottom,
            placement: vertical_placement,
        };

        let width = definite_extent(&style, true, &horizontal, block_width, insets.horizontal_sum());
        let height = definite_extent(&style, false, &vertical, block_height, insets.vertical_sum());
        let (width, height) = match (width, height) {
            (Some(w), Some(h)) => (w, h),
            _ => {
                let w = width.map_or(
                    SizeConstraint::AtMost((block_width - margin.horizontal_sum()).max(0.0)),
                    SizeConstraint::Exact,
                );
                let h = height.map_or(SizeConstraint::Unbounded, SizeConstraint::Exact);
                let measured = self.layout_node(id, w, h, owner, container.direction, false);
                (measured.width, measured.height)
            }
        };

        self.layout_node(
            id,
            SizeConstraint::Exact(width),
            SizeConstraint::Exact(height),
            owner,
            container.direction,
            true,
        );

        let insets = parent_sizing.insets;
        let left = horizontal.position(
            width,
            parent_size.width,
            (border.left, border.right),
            (insets.left, insets.right),
        );
        let top = vertical.position(
            height,
            parent_size.height,
            (border.top, border.bottom),
            (insets.top, insets.bottom),
        );
        let layout = &mut self.nodes[id].layout;
        layout.left = left;
        layout.top = top;
        layout.margin = margin;
    }
}

/// Size fixed by style or by opposing offsets, bounded by min/max.
fn definite_extent(
    style: &Style,
    horizontal: bool,
    placement: &AxisPlacement,
    block: f32,
    floor: f32,
) -> Option<f32> {
    let axis = AxisStyle::of(style, horizontal);
    let bounds = axis.bounds(Some(block));
    axis.size
        .resolve(Some(block))
        .or_else(|| match (placement.lead_offset, placement.trail_offset) {
            (Some(lead), Some(trail)) => {
                Some(block - lead - trail - placement.lead_margin - placement.trail_margin)
            }
            _ => None,
        })
        .map(|size| bounds.clamp(size, floor))
}
