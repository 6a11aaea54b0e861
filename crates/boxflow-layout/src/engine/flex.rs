//! Flex container layout.
//!
//! Items are collected with their flex basis, broken into lines, flexed per
//! line with the freeze loop, sized on the cross axis and, when performing,
//! positioned and laid out at their final size. Positions are first computed
//! in flow order (main start to main end, first line to last) and only then
//! mapped to physical left/top, which is where the reverse directions and
//! `wrap-reverse` come in.

use boxflow_core::{Sides, Size};
use smallvec::SmallVec;

use super::axis::{
    AxisStyle, Bounds, OwnerSize, SizeConstraint, auto_edges, axis_sum, flow_auto, flow_pair,
    leading, resolve_insets, resolve_sides,
};
use super::{LayoutPass, NodeSizing, relative_offset};
use crate::node::NodeId;
use crate::style::{Align, Direction, Display, Justify, Overflow, PositionType, Style, Wrap};

const EPSILON: f32 = 1e-4;

/// Container facts shared by every item.
#[derive(Debug, Clone, Copy)]
pub(super) struct FlexContainer {
    pub direction: Direction,
    pub main_row: bool,
    pub main_reversed: bool,
    pub cross_reversed: bool,
    pub wrap: bool,
    pub scroll: bool,
    pub inner_main: SizeConstraint,
    pub inner_cross: SizeConstraint,
    /// Percentage base handed to children.
    pub owner: OwnerSize,
    pub align_items: Align,
    pub main_gap: f32,
    pub cross_gap: f32,
}

impl FlexContainer {
    fn new(style: &Style, sizing: &NodeSizing, direction: Direction) -> Self {
        let flex_direction = style.flex_direction.resolve(direction);
        let main_row = flex_direction.is_row();
        let insets = sizing.insets;
        let inner_width = sizing.width.shrink(insets.horizontal_sum());
        let inner_height = sizing.height.shrink(insets.vertical_sum());
        let (inner_main, inner_cross) = if main_row {
            (inner_width, inner_height)
        } else {
            (inner_height, inner_width)
        };
        Self {
            direction,
            main_row,
            main_reversed: flex_direction.is_reverse(),
            cross_reversed: (style.flex_wrap == Wrap::WrapReverse)
                ^ (!main_row && direction == Direction::Rtl),
            wrap: style.flex_wrap != Wrap::NoWrap,
            scroll: style.overflow == Overflow::Scroll,
            inner_main,
            inner_cross,
            owner: OwnerSize::new(inner_width.exact(), inner_height.exact()),
            align_items: style.align_items,
            main_gap: style.gap_for(main_row),
            cross_gap: style.gap_for(!main_row),
        }
    }

    /// Border-box (width, height) from main and cross extents.
    fn physical(&self, main: f32, cross: f32) -> (f32, f32) {
        if self.main_row { (main, cross) } else { (cross, main) }
    }
}

#[derive(Debug, Clone)]
struct FlexItem {
    id: NodeId,
    direction: Direction,
    align: Align,
    margin: Sides,
    main_lead: f32,
    main_trail: f32,
    cross_lead: f32,
    cross_trail: f32,
    auto_main: (bool, bool),
    auto_cross: (bool, bool),
    grow: f32,
    shrink: f32,
    basis: f32,
    main_bounds: Bounds,
    main_floor: f32,
    cross_bounds: Bounds,
    cross_floor: f32,
    cross_styled: Option<f32>,
    hypothetical: f32,
    target: f32,
    frozen: bool,
    violation: f32,
    cross: f32,
    baseline: f32,
    main_pos: f32,
    cross_pos: f32,
}

impl FlexItem {
    fn main_margins(&self) -> f32 {
        self.main_lead + self.main_trail
    }

    fn cross_margins(&self) -> f32 {
        self.cross_lead + self.cross_trail
    }

    fn outer_hypothetical(&self) -> f32 {
        self.hypothetical + self.main_margins()
    }

    fn outer_target(&self) -> f32 {
        self.target + self.main_margins()
    }

    fn outer_cross(&self) -> f32 {
        self.cross + self.cross_margins()
    }

    fn has_auto_cross_margin(&self) -> bool {
        self.auto_cross.0 || self.auto_cross.1
    }

    /// Whether the item takes its cross size from the line.
    fn stretches(&self) -> bool {
        self.align == Align::Stretch && self.cross_styled.is_none() && !self.has_auto_cross_margin()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct FlexLine {
    start: usize,
    end: usize,
    cross: f32,
    ascent: f32,
    offset: f32,
}

impl FlexLine {
    fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            ..Self::default()
        }
    }

    fn gaps(&self, gap: f32) -> f32 {
        gap * self.end.saturating_sub(self.start).saturating_sub(1) as f32
    }
}

fn used_main(items: &[FlexItem], gap: f32) -> f32 {
    let gaps = gap * items.len().saturating_sub(1) as f32;
    items.iter().map(FlexItem::outer_target).sum::<f32>() + gaps
}

impl LayoutPass<'_> {
    pub(super) fn layout_flex(
        &mut self,
        id: NodeId,
        sizing: &NodeSizing,
        direction: Direction,
        perform: bool,
    ) -> Size {
        let style = self.nodes[id].style;
        let container = FlexContainer::new(&style, sizing, direction);
        let main_row = container.main_row;

        let mut items: Vec<FlexItem> = Vec::with_capacity(self.nodes[id].children.len());
        let mut absolutes: SmallVec<[NodeId; 4]> = SmallVec::new();
        for i in 0..self.nodes[id].children.len() {
            let child = self.nodes[id].children[i];
            let child_style = self.nodes[child].style;
            if child_style.display == Display::None {
                if perform {
                    self.zero_subtree(child);
                }
                continue;
            }
            if child_style.position_type == PositionType::Absolute {
                if perform {
                    absolutes.push(child);
                }
                continue;
            }
            let item = self.flex_item(child, &child_style, &container);
            items.push(item);
        }

        let mut lines = break_lines(&items, &container);

        // Flexible lengths, per line.
        let main_insets = axis_sum(&sizing.insets, main_row);
        let min_inner_main = (sizing.bounds(main_row).min - main_insets).max(0.0);
        for line in &lines {
            let slice = &mut items[line.start..line.end];
            let gaps = line.gaps(container.main_gap);
            let content = slice.iter().map(FlexItem::outer_hypothetical).sum::<f32>() + gaps;
            let available = match container.inner_main {
                SizeConstraint::Exact(v) => v,
                SizeConstraint::AtMost(v) => content.min(v).max(min_inner_main),
                SizeConstraint::Unbounded => content.max(min_inner_main),
            };
            resolve_flexible_lengths(slice, available - gaps);
        }

        let content_main = lines
            .iter()
            .map(|line| used_main(&items[line.start..line.end], container.main_gap))
            .fold(0.0_f32, f32::max);
        let main_size = sizing.finish(main_row, content_main + main_insets);
        let inner_main = (main_size - main_insets).max(0.0);

        // Hypothetical cross sizes.
        for item in &mut items {
            item.cross = self.hypothetical_cross(item, &container);
            item.baseline = item.cross;
        }
        if perform && main_row {
            for item in items.iter_mut().filter(|item| item.align == Align::Baseline) {
                let (w, h) = container.physical(item.target, item.cross);
                self.layout_node(
                    item.id,
                    SizeConstraint::Exact(w),
                    SizeConstraint::Exact(h),
                    container.owner,
                    container.direction,
                    true,
                );
                item.baseline = self.baseline(item.id);
            }
        }

        for line in &mut lines {
            measure_line_cross(line, &items, main_row);
        }

        let cross_insets = axis_sum(&sizing.insets, !main_row);
        let lines_cross = lines.iter().map(|line| line.cross).sum::<f32>()
            + container.cross_gap * lines.len().saturating_sub(1) as f32;
        let cross_size = sizing.finish(!main_row, lines_cross + cross_insets);
        let inner_cross = (cross_size - cross_insets).max(0.0);

        let (width, height) = container.physical(main_size, cross_size);
        if !perform {
            return Size::new(width, height);
        }

        if container.wrap {
            align_lines(&mut lines, style.align_content, inner_cross, container.cross_gap);
        } else if let Some(line) = lines.first_mut() {
            line.cross = inner_cross;
            line.offset = 0.0;
        }

        let mut had_overflow = lines_cross > inner_cross + EPSILON;
        for line in &lines {
            let slice = &mut items[line.start..line.end];
            let used = used_main(slice, container.main_gap);
            had_overflow |= used > inner_main + EPSILON;
            place_main(slice, style.justify_content, inner_main - used, container.main_gap);
            place_cross(slice, line, main_row);
        }

        let lead_main = leading(&sizing.insets, main_row);
        let lead_cross = leading(&sizing.insets, !main_row);
        for item in &items {
            let main = if container.main_reversed {
                inner_main - item.main_pos - item.target
            } else {
                item.main_pos
            };
            let cross = if container.cross_reversed {
                inner_cross - item.cross_pos - item.cross
            } else {
                item.cross_pos
            };
            let (w, h) = container.physical(item.target, item.cross);
            self.layout_node(
                item.id,
                SizeConstraint::Exact(w),
                SizeConstraint::Exact(h),
                container.owner,
                container.direction,
                true,
            );

            let child_style = self.nodes[item.id].style;
            let (dx, dy) = relative_offset(&child_style, item.direction, container.owner);
            let (x, y) = container.physical(lead_main + main, lead_cross + cross);
            let child = &mut self.nodes[item.id].layout;
            child.left = x + dx;
            child.top = y + dy;
            child.margin = item.margin;
            had_overflow |= child.had_overflow;
        }

        let size = Size::new(width, height);
        for child in absolutes {
            self.layout_absolute(child, &style, &container, sizing, size);
        }

        self.nodes[id].layout.had_overflow = had_overflow;
        size
    }

    fn flex_item(&mut self, id: NodeId, style: &Style, container: &FlexContainer) -> FlexItem {
        let main_row = container.main_row;
        let direction = style.direction.resolve(container.direction);
        let margin = resolve_sides(&style.margin, direction, container.owner.width);
        let auto = auto_edges(&style.margin, direction);
        let insets = resolve_insets(&style.padding, direction, container.owner.width)
            .add(&resolve_insets(&style.border, direction, None));

        let main_axis = AxisStyle::of(style, main_row);
        let cross_axis = AxisStyle::of(style, !main_row);
        let main_base = container.owner.axis(main_row);
        let cross_base = container.owner.axis(!main_row);
        let (main_lead, main_trail) = flow_pair(&margin, main_row, container.main_reversed);
        let (cross_lead, cross_trail) = flow_pair(&margin, !main_row, container.cross_reversed);

        let mut item = FlexItem {
            id,
            direction,
            align: match style.align_self {
                Align::Auto => container.align_items,
                other => other,
            },
            margin,
            main_lead,
            main_trail,
            cross_lead,
            cross_trail,
            auto_main: flow_auto(auto, main_row, container.main_reversed),
            auto_cross: flow_auto(auto, !main_row, container.cross_reversed),
            grow: style.resolved_flex_grow(),
            shrink: style.resolved_flex_shrink(self.web_defaults),
            basis: 0.0,
            main_bounds: main_axis.bounds(main_base),
            main_floor: axis_sum(&insets, main_row),
            cross_bounds: cross_axis.bounds(cross_base),
            cross_floor: axis_sum(&insets, !main_row),
            cross_styled: cross_axis.size.resolve(cross_base),
            hypothetical: 0.0,
            target: 0.0,
            frozen: false,
            violation: 0.0,
            cross: 0.0,
            baseline: 0.0,
            main_pos: 0.0,
            cross_pos: 0.0,
        };

        let basis = if let Some(basis) = style
            .resolved_flex_basis(self.web_defaults)
            .resolve(container.inner_main.exact())
        {
            basis
        } else if let Some(size) = main_axis.size.resolve(main_base) {
            size
        } else {
            let cross = self.item_cross_constraint(&item, container);
            let (w, h) = if main_row {
                (SizeConstraint::Unbounded, cross)
            } else {
                (cross, SizeConstraint::Unbounded)
            };
            let measured = self.layout_node(id, w, h, container.owner, container.direction, false);
            if main_row {
                measured.width
            } else {
                measured.height
            }
        };
        item.basis = basis.max(item.main_floor);
        item.hypothetical = item.main_bounds.clamp(item.basis, item.main_floor);
        item
    }

    /// Cross constraint for measuring an item: exact when it will be
    /// stretched across a definite single line, else capped by the
    /// container unless the container scrolls.
    fn item_cross_constraint(&self, item: &FlexItem, container: &FlexContainer) -> SizeConstraint {
        let margins = item.cross_margins();
        match container.inner_cross {
            SizeConstraint::Exact(v) if item.stretches() && !container.wrap => {
                SizeConstraint::Exact((v - margins).max(0.0))
            }
            _ if container.scroll => SizeConstraint::Unbounded,
            SizeConstraint::Exact(v) | SizeConstraint::AtMost(v) => {
                SizeConstraint::AtMost((v - margins).max(0.0))
            }
            SizeConstraint::Unbounded => SizeConstraint::Unbounded,
        }
    }

    fn hypothetical_cross(&mut self, item: &FlexItem, container: &FlexContainer) -> f32 {
        if let Some(size) = item.cross_styled {
            return item.cross_bounds.clamp(size, item.cross_floor);
        }
        let cross = self.item_cross_constraint(item, container);
        if let SizeConstraint::Exact(v) = cross {
            return item.cross_bounds.clamp(v, item.cross_floor);
        }
        let main = SizeConstraint::Exact(item.target);
        let (w, h) = if container.main_row {
            (main, cross)
        } else {
            (cross, main)
        };
        let measured = self.layout_node(item.id, w, h, container.owner, container.direction, false);
        if container.main_row {
            measured.height
        } else {
            measured.width
        }
    }

    /// Distance from a performed node's top edge to its first baseline.
    ///
    /// Follows the first in-flow child down; a node without one uses its
    /// bottom edge.
    pub(super) fn baseline(&self, id: NodeId) -> f32 {
        let node = &self.nodes[id];
        let first = node.children.iter().copied().find(|child| {
            let style = &self.nodes[*child].style;
            style.display == Display::Flex && style.position_type == PositionType::Relative
        });
        match first {
            Some(child) => self.nodes[child].layout.top + self.baseline(child),
            None => node.layout.height,
        }
    }
}

fn break_lines(items: &[FlexItem], container: &FlexContainer) -> Vec<FlexLine> {
    let mut lines = Vec::new();
    let limit = container.inner_main.limit().filter(|_| container.wrap);
    let mut start = 0;
    let mut used = 0.0_f32;
    for (i, item) in items.iter().enumerate() {
        let outer = item.outer_hypothetical();
        let needed = if i == start {
            outer
        } else {
            used + container.main_gap + outer
        };
        if i > start && limit.is_some_and(|limit| needed > limit + EPSILON) {
            lines.push(FlexLine::new(start, i));
            start = i;
            used = outer;
        } else {
            used = needed;
        }
    }
    lines.push(FlexLine::new(start, items.len()));
    lines
}

/// Resolve main sizes of one line so their outer sum approaches `available`.
///
/// Items whose factor is zero, or whose clamp already moved them against the
/// flex direction, are frozen at their hypothetical size. Each round hands
/// the remaining free space to unfrozen items, clamps them, and freezes the
/// side that violated its bounds (or everything when nothing did).
fn resolve_flexible_lengths(items: &mut [FlexItem], available: f32) {
    let hypothetical: f32 = items.iter().map(FlexItem::outer_hypothetical).sum();
    let growing = hypothetical < available;

    for item in items.iter_mut() {
        item.target = item.hypothetical;
        let factor = if growing { item.grow } else { item.shrink };
        item.frozen = factor <= 0.0
            || (growing && item.basis > item.hypothetical)
            || (!growing && item.basis < item.hypothetical);
    }

    while items.iter().any(|item| !item.frozen) {
        let used: f32 = items
            .iter()
            .map(|item| item.main_margins() + if item.frozen { item.target } else { item.basis })
            .sum();
        let free = available - used;

        if growing {
            let total: f32 = items.iter().filter(|i| !i.frozen).map(|i| i.grow).sum();
            let denominator = total.max(1.0);
            for item in items.iter_mut().filter(|i| !i.frozen) {
                item.target = item.basis + free * item.grow / denominator;
            }
        } else {
            let total: f32 = items
                .iter()
                .filter(|i| !i.frozen)
                .map(|i| i.shrink * i.basis)
                .sum();
            for item in items.iter_mut().filter(|i| !i.frozen) {
                item.target = if total > 0.0 {
                    item.basis + free * item.shrink * item.basis / total
                } else {
                    item.basis
                };
            }
        }

        let mut violation = 0.0;
        for item in items.iter_mut().filter(|i| !i.frozen) {
            let clamped = item.main_bounds.clamp(item.target, item.main_floor);
            item.violation = clamped - item.target;
            violation += item.violation;
            item.target = clamped;
        }

        for item in items.iter_mut().filter(|i| !i.frozen) {
            item.frozen = if violation.abs() < EPSILON {
                true
            } else if violation > 0.0 {
                item.violation > 0.0
            } else {
                item.violation < 0.0
            };
        }
    }
}

fn measure_line_cross(line: &mut FlexLine, items: &[FlexItem], main_row: bool) {
    let mut tallest = 0.0_f32;
    let mut ascent = 0.0_f32;
    let mut descent = 0.0_f32;
    for item in &items[line.start..line.end] {
        if main_row && item.align == Align::Baseline && !item.has_auto_cross_margin() {
            let above = item.baseline + item.cross_lead;
            ascent = ascent.max(above);
            descent = descent.max(item.outer_cross() - above);
        } else {
            tallest = tallest.max(item.outer_cross());
        }
    }
    line.ascent = ascent;
    line.cross = tallest.max(ascent + descent);
}

fn align_lines(lines: &mut [FlexLine], align: Align, inner_cross: f32, gap: f32) {
    let count = lines.len() as f32;
    let used = lines.iter().map(|line| line.cross).sum::<f32>() + gap * (count - 1.0).max(0.0);
    let free = inner_cross - used;

    let (mut offset, extra, between) = match align {
        Align::FlexEnd => (free, 0.0, 0.0),
        Align::Center => (free / 2.0, 0.0, 0.0),
        Align::Stretch if free > 0.0 => (0.0, free / count, 0.0),
        Align::SpaceBetween if free > 0.0 && lines.len() > 1 => (0.0, 0.0, free / (count - 1.0)),
        Align::SpaceAround if free > 0.0 => (free / count / 2.0, 0.0, free / count),
        _ => (0.0, 0.0, 0.0),
    };
    for line in lines.iter_mut() {
        line.offset = offset;
        line.cross += extra;
        offset += line.cross + gap + between;
    }
}

/// Leading offset and extra spacing between items for `justify_content`.
///
/// Negative free space makes the `space-*` modes fall back to flex-start
/// (between) or center (around, evenly).
fn justify_spacing(justify: Justify, free: f32, count: usize) -> (f32, f32) {
    let n = count as f32;
    match justify {
        Justify::FlexStart => (0.0, 0.0),
        Justify::Center => (free / 2.0, 0.0),
        Justify::FlexEnd => (free, 0.0),
        Justify::SpaceBetween if free > 0.0 && count > 1 => (0.0, free / (n - 1.0)),
        Justify::SpaceBetween => (0.0, 0.0),
        Justify::SpaceAround if free > 0.0 && count > 0 => (free / n / 2.0, free / n),
        Justify::SpaceEvenly if free > 0.0 => (free / (n + 1.0), free / (n + 1.0)),
        Justify::SpaceAround | Justify::SpaceEvenly => (free / 2.0, 0.0),
    }
}

fn place_main(items: &mut [FlexItem], justify: Justify, free: f32, gap: f32) {
    let autos = items
        .iter()
        .map(|item| usize::from(item.auto_main.0) + usize::from(item.auto_main.1))
        .sum::<usize>();
    let (mut pos, between, share) = if autos > 0 && free > 0.0 {
        (0.0, 0.0, free / autos as f32)
    } else {
        let (lead, between) = justify_spacing(justify, free, items.len());
        (lead, between, 0.0)
    };

    for item in items.iter_mut() {
        if item.auto_main.0 {
            pos += share;
        }
        pos += item.main_lead;
        item.main_pos = pos;
        pos += item.target + item.main_trail + gap + between;
        if item.auto_main.1 {
            pos += share;
        }
    }
}

fn place_cross(items: &mut [FlexItem], line: &FlexLine, main_row: bool) {
    for item in items.iter_mut() {
        if item.stretches() {
            item.cross = item
                .cross_bounds
                .clamp(line.cross - item.cross_margins(), item.cross_floor);
        }
        let free = line.cross - item.outer_cross();
        let offset = if item.has_auto_cross_margin() {
            match item.auto_cross {
                _ if free <= 0.0 => 0.0,
                (true, true) => free / 2.0,
                (true, false) => free,
                _ => 0.0,
            }
        } else {
            match item.align {
                Align::FlexEnd => free,
                Align::Center => free / 2.0,
                Align::Baseline if main_row => line.ascent - (item.baseline + item.cross_lead),
                _ => 0.0,
            }
        };
        item.cross_pos = line.offset + offset + item.cross_lead;
    }
}
