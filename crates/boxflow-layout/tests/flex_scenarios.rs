use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use boxflow_layout::{
    Align, Config, Direction, Display, Edge, FlexDirection, Justify, LayoutTree, MeasureInput,
    MeasureMode, NodeId, PositionType, Rect, Size, Wrap, apply_measure_limits,
};

const EPS: f32 = 1e-3;

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

fn row(tree: &mut LayoutTree, width: f32, height: f32) -> NodeId {
    let root = tree.new_node();
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_width(root, width).unwrap();
    tree.set_height(root, height).unwrap();
    root
}

fn sized(tree: &mut LayoutTree, parent: NodeId, width: f32, height: f32) -> NodeId {
    let node = tree.new_node();
    tree.set_width(node, width).unwrap();
    tree.set_height(node, height).unwrap();
    tree.append_child(parent, node).unwrap();
    node
}

fn counting_leaf(tree: &mut LayoutTree, size: Size) -> (NodeId, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let node = tree.new_node();
    tree.enable_measure(node, move |_: MeasureInput| {
        counter.fetch_add(1, Ordering::SeqCst);
        size
    })
    .unwrap();
    (node, calls)
}

#[test]
fn box_model_adds_margin_outside_and_padding_border_inside() {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    let child = tree.new_node();
    tree.append_child(root, child).unwrap();
    tree.set_width(child, 100.0).unwrap();
    tree.set_margin(child, Edge::All, 10.0).unwrap();
    tree.set_padding(child, Edge::All, 5.0).unwrap();
    tree.set_border(child, Edge::All, 2.0).unwrap();
    tree.calculate_layout(root, 500.0, 500.0).unwrap();

    let rect = tree.layout(child).unwrap();
    assert_eq!(rect.width, 100.0);
    assert_eq!((rect.left, rect.top), (10.0, 10.0));
    // Empty content: the height is padding plus border.
    assert_eq!(rect.height, 14.0);

    let inner = rect.width
        - tree.layout_padding(child, Edge::Left).unwrap()
        - tree.layout_padding(child, Edge::Right).unwrap()
        - tree.layout_border(child, Edge::Left).unwrap()
        - tree.layout_border(child, Edge::Right).unwrap();
    assert_eq!(inner, 86.0);
    let outer = rect.width
        + tree.layout_margin(child, Edge::Left).unwrap()
        + tree.layout_margin(child, Edge::Right).unwrap();
    assert_eq!(outer, 120.0);
}

#[test]
fn grow_factors_split_free_space() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 400.0, 100.0);
    let items: Vec<_> = [1.0, 2.0, 1.0]
        .into_iter()
        .map(|grow| {
            let item = tree.new_node();
            tree.set_flex_grow(item, grow).unwrap();
            tree.set_flex_basis(item, 0.0).unwrap();
            tree.append_child(root, item).unwrap();
            item
        })
        .collect();
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();

    let rects: Vec<Rect> = items.iter().map(|id| tree.layout(*id).unwrap()).collect();
    assert_eq!(rects[0], Rect::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(rects[1], Rect::new(100.0, 0.0, 200.0, 100.0));
    assert_eq!(rects[2], Rect::new(300.0, 0.0, 100.0, 100.0));
}

#[test]
fn wrap_moves_overflowing_items_to_a_new_line() {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_flex_wrap(root, Wrap::Wrap).unwrap();
    tree.set_width(root, 100.0).unwrap();
    let items: Vec<_> = (0..3).map(|_| sized(&mut tree, root, 40.0, 10.0)).collect();
    tree.calculate_layout(root, f32::INFINITY, f32::INFINITY)
        .unwrap();

    assert_eq!(tree.layout(items[1]).unwrap(), Rect::new(40.0, 0.0, 40.0, 10.0));
    assert_eq!(tree.layout(items[2]).unwrap(), Rect::new(0.0, 10.0, 40.0, 10.0));
    assert_eq!(tree.layout(root).unwrap().height, 20.0);
    assert!(!tree.had_overflow(root).unwrap());
}

#[test]
fn nowrap_keeps_one_line_and_reports_overflow() {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_width(root, 100.0).unwrap();
    let items: Vec<_> = (0..3).map(|_| sized(&mut tree, root, 40.0, 10.0)).collect();
    tree.calculate_layout(root, f32::INFINITY, f32::INFINITY)
        .unwrap();

    assert_eq!(tree.layout(items[2]).unwrap(), Rect::new(80.0, 0.0, 40.0, 10.0));
    assert_eq!(tree.layout(root).unwrap().height, 10.0);
    assert!(tree.had_overflow(root).unwrap());
}

#[test]
fn wrap_reverse_stacks_lines_from_the_cross_end() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 100.0, 50.0);
    tree.set_flex_wrap(root, Wrap::WrapReverse).unwrap();
    let items: Vec<_> = (0..3).map(|_| sized(&mut tree, root, 40.0, 10.0)).collect();
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();

    assert_eq!(tree.layout(items[0]).unwrap().top, 40.0);
    assert_eq!(tree.layout(items[2]).unwrap().top, 30.0);
}

#[test]
fn measured_width_is_capped_by_at_most() {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    tree.set_align_items(root, Align::FlexStart).unwrap();
    let inputs = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&inputs);
    let leaf = tree.new_node();
    tree.enable_measure(leaf, move |input: MeasureInput| {
        seen.lock().unwrap().push(input);
        Size::new(500.0, 20.0)
    })
    .unwrap();
    tree.append_child(root, leaf).unwrap();
    tree.calculate_layout(root, 300.0, f32::NAN).unwrap();

    let first = inputs.lock().unwrap()[0];
    assert_eq!(first.width_mode, MeasureMode::AtMost);
    assert_eq!(first.width, 300.0);
    assert_eq!(first.height_mode, MeasureMode::Undefined);
    assert_eq!(tree.layout(leaf).unwrap(), Rect::new(0.0, 0.0, 300.0, 20.0));
}

#[test]
fn measured_width_is_kept_when_unconstrained() {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    let (leaf, _) = counting_leaf(&mut tree, Size::new(500.0, 20.0));
    tree.append_child(root, leaf).unwrap();
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();
    assert_eq!(tree.layout(leaf).unwrap().width, 500.0);
}

#[test]
fn stretched_measured_leaf_takes_the_exact_width() {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    let inputs = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&inputs);
    let leaf = tree.new_node();
    tree.enable_measure(leaf, move |input: MeasureInput| {
        seen.lock().unwrap().push(input);
        Size::new(40.0, 20.0)
    })
    .unwrap();
    tree.append_child(root, leaf).unwrap();
    tree.calculate_layout(root, 100.0, f32::NAN).unwrap();

    let inputs = inputs.lock().unwrap();
    assert!(!inputs.is_empty());
    for input in inputs.iter() {
        assert_eq!(input.width_mode, MeasureMode::Exactly);
        assert_eq!(input.width, 100.0);
    }
    assert_eq!(tree.layout(leaf).unwrap(), Rect::new(0.0, 0.0, 100.0, 20.0));

    // The hook's own answer under Exactly is passed through unclamped.
    assert_eq!(
        apply_measure_limits(Size::new(500.0, 20.0), &inputs[0]),
        Size::new(500.0, 20.0)
    );
}

#[test]
fn second_pass_with_same_input_is_served_from_cache() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 300.0, 100.0);
    let (leaf, calls) = counting_leaf(&mut tree, Size::new(50.0, 10.0));
    tree.append_child(root, leaf).unwrap();
    let fixed = sized(&mut tree, root, 60.0, 20.0);

    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();
    let first_calls = calls.load(Ordering::SeqCst);
    assert!(first_calls > 0);
    let before = (tree.layout(leaf).unwrap(), tree.layout(fixed).unwrap());

    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), first_calls);
    assert_eq!((tree.layout(leaf).unwrap(), tree.layout(fixed).unwrap()), before);

    let stats = tree.last_layout_stats();
    assert_eq!(stats.layouts_computed, 0);
    assert_eq!(stats.measure_callbacks, 0);
    assert_eq!(stats.cache_hits, 1);
}

#[test]
fn dirtying_a_leaf_recomputes_only_its_chain() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 300.0, 100.0);
    let a = tree.new_node();
    tree.set_width(a, 100.0).unwrap();
    tree.append_child(root, a).unwrap();
    let (b, calls) = counting_leaf(&mut tree, Size::new(50.0, 10.0));
    tree.append_child(root, b).unwrap();
    let c = tree.new_node();
    tree.set_width(c, 100.0).unwrap();
    tree.append_child(root, c).unwrap();

    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();
    for id in [root, a, b, c] {
        assert!(tree.has_new_layout(id).unwrap());
        assert!(!tree.is_dirty(id).unwrap());
        tree.mark_layout_seen(id).unwrap();
    }

    tree.mark_dirty(b).unwrap();
    assert!(tree.is_dirty(b).unwrap());
    assert!(tree.is_dirty(root).unwrap());
    assert!(!tree.is_dirty(a).unwrap());

    let before = calls.load(Ordering::SeqCst);
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), before + 1);

    assert!(tree.has_new_layout(root).unwrap());
    assert!(tree.has_new_layout(b).unwrap());
    assert!(!tree.has_new_layout(a).unwrap());
    assert!(!tree.has_new_layout(c).unwrap());
    assert_eq!(tree.last_layout_stats().layouts_computed, 2);
    assert_eq!(tree.layout(c).unwrap().left, 150.0);
}

#[test]
fn style_change_is_picked_up_by_the_next_pass() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 300.0, 100.0);
    let a = sized(&mut tree, root, 100.0, 20.0);
    let b = sized(&mut tree, root, 100.0, 20.0);
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();
    assert_eq!(tree.layout(b).unwrap().left, 100.0);

    tree.set_width(a, 150.0).unwrap();
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();
    assert_eq!(tree.layout(b).unwrap().left, 150.0);

    // Writing the same value again leaves the tree clean.
    tree.set_width(a, 150.0).unwrap();
    assert!(!tree.is_dirty(root).unwrap());
}

#[test]
fn reparenting_moves_the_child_and_relayouts_both_parents() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 200.0, 50.0);
    let left = tree.new_node();
    let right = tree.new_node();
    for side in [left, right] {
        tree.set_flex_grow(side, 1.0).unwrap();
        tree.set_flex_basis(side, 0.0).unwrap();
    }
    tree.append_child(root, left).unwrap();
    tree.append_child(root, right).unwrap();
    let child = sized(&mut tree, left, 30.0, 30.0);
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();

    tree.append_child(right, child).unwrap();
    assert_eq!(tree.child_count(left).unwrap(), 0);
    assert_eq!(tree.parent(child).unwrap(), Some(right));
    assert!(tree.is_dirty(left).unwrap());
    assert!(tree.is_dirty(right).unwrap());

    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();
    assert_eq!(tree.layout(child).unwrap(), Rect::new(0.0, 0.0, 30.0, 30.0));
    assert_eq!(tree.layout(right).unwrap().left, 100.0);
}

#[test]
fn rtl_rows_start_from_the_right() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 300.0, 50.0);
    let first = sized(&mut tree, root, 100.0, 50.0);
    let second = sized(&mut tree, root, 50.0, 50.0);
    tree.calculate_layout_with_direction(root, f32::NAN, f32::NAN, Direction::Rtl)
        .unwrap();

    assert_eq!(tree.layout(first).unwrap().left, 200.0);
    assert_eq!(tree.layout(second).unwrap().left, 150.0);
    assert_eq!(tree.layout_direction(first).unwrap(), Direction::Rtl);
}

#[test]
fn start_and_end_margins_follow_direction() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 300.0, 50.0);
    let item = sized(&mut tree, root, 50.0, 50.0);
    tree.set_margin(item, Edge::Start, 10.0).unwrap();
    tree.calculate_layout_with_direction(root, f32::NAN, f32::NAN, Direction::Rtl)
        .unwrap();

    assert_eq!(tree.layout_margin(item, Edge::Right).unwrap(), 10.0);
    assert_eq!(tree.layout_margin(item, Edge::Left).unwrap(), 0.0);
    assert_eq!(tree.layout(item).unwrap().left, 240.0);
}

#[test]
fn column_rtl_aligns_flex_start_on_the_right() {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    tree.set_width(root, 300.0).unwrap();
    tree.set_align_items(root, Align::FlexStart).unwrap();
    let item = sized(&mut tree, root, 100.0, 20.0);
    tree.calculate_layout_with_direction(root, f32::NAN, f32::NAN, Direction::Rtl)
        .unwrap();

    assert_eq!(tree.layout(item).unwrap().left, 200.0);
}

#[test]
fn justify_and_align_place_items() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 300.0, 100.0);
    tree.set_justify_content(root, Justify::SpaceBetween).unwrap();
    tree.set_align_items(root, Align::Center).unwrap();
    let items: Vec<_> = (0..3).map(|_| sized(&mut tree, root, 50.0, 20.0)).collect();
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();

    let lefts: Vec<f32> = items.iter().map(|id| tree.layout(*id).unwrap().left).collect();
    assert_eq!(lefts, vec![0.0, 125.0, 250.0]);
    assert_eq!(tree.layout(items[0]).unwrap().top, 40.0);

    tree.set_justify_content(root, Justify::FlexEnd).unwrap();
    tree.set_align_self(items[2], Align::FlexEnd).unwrap();
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();
    assert_eq!(tree.layout(items[0]).unwrap().left, 150.0);
    assert_eq!(tree.layout(items[2]).unwrap().top, 80.0);
}

#[test]
fn stretch_fills_the_line_unless_sized() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 300.0, 100.0);
    let stretched = tree.new_node();
    tree.set_width(stretched, 50.0).unwrap();
    tree.append_child(root, stretched).unwrap();
    let fixed = sized(&mut tree, root, 50.0, 30.0);
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();

    assert_eq!(tree.layout(stretched).unwrap().height, 100.0);
    assert_eq!(tree.layout(fixed).unwrap().height, 30.0);
}

#[test]
fn auto_margin_pushes_item_to_the_end() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 300.0, 100.0);
    let first = sized(&mut tree, root, 50.0, 20.0);
    let pushed = sized(&mut tree, root, 50.0, 20.0);
    tree.set_margin_auto(pushed, Edge::Left).unwrap();
    tree.set_justify_content(root, Justify::Center).unwrap();
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();

    assert_eq!(tree.layout(first).unwrap().left, 0.0);
    assert_eq!(tree.layout(pushed).unwrap().left, 250.0);
}

#[test]
fn baseline_alignment_lines_up_bottoms_of_leaves() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 300.0, 100.0);
    tree.set_align_items(root, Align::Baseline).unwrap();
    let tall = sized(&mut tree, root, 50.0, 40.0);
    let short = sized(&mut tree, root, 50.0, 20.0);
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();

    assert_eq!(tree.layout(tall).unwrap().top, 0.0);
    assert_eq!(tree.layout(short).unwrap().top, 20.0);
}

#[test]
fn gaps_separate_items_and_lines() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 100.0, 100.0);
    tree.set_flex_wrap(root, Wrap::Wrap).unwrap();
    tree.set_gap(root, boxflow_layout::Gutter::All, 10.0).unwrap();
    let items: Vec<_> = (0..3).map(|_| sized(&mut tree, root, 45.0, 20.0)).collect();
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();

    assert_eq!(tree.layout(items[1]).unwrap().left, 55.0);
    assert_eq!(tree.layout(items[2]).unwrap(), Rect::new(0.0, 30.0, 45.0, 20.0));
}

#[test]
fn min_beats_max_and_padding_beats_both() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 300.0, 100.0);
    let conflicted = sized(&mut tree, root, 100.0, 20.0);
    tree.set_max_width(conflicted, 50.0).unwrap();
    tree.set_min_width(conflicted, 70.0).unwrap();
    let padded = sized(&mut tree, root, 10.0, 20.0);
    tree.set_padding(padded, Edge::Horizontal, 20.0).unwrap();
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();

    assert_eq!(tree.layout(conflicted).unwrap().width, 70.0);
    assert_eq!(tree.layout(padded).unwrap().width, 40.0);
}

#[test]
fn percentages_resolve_against_the_parent_content_box() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 220.0, 120.0);
    tree.set_padding(root, Edge::All, 10.0).unwrap();
    let item = tree.new_node();
    tree.set_width_percent(item, 50.0).unwrap();
    tree.set_height_percent(item, 25.0).unwrap();
    tree.set_margin_percent(item, Edge::Left, 10.0).unwrap();
    tree.append_child(root, item).unwrap();
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();

    assert_eq!(tree.layout(item).unwrap(), Rect::new(30.0, 10.0, 100.0, 25.0));
}

#[test]
fn relative_offsets_shift_without_affecting_siblings() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 300.0, 100.0);
    let moved = sized(&mut tree, root, 50.0, 20.0);
    tree.set_position(moved, Edge::Left, 5.0).unwrap();
    tree.set_position(moved, Edge::Top, 7.0).unwrap();
    let next = sized(&mut tree, root, 50.0, 20.0);
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();

    assert_eq!(tree.layout(moved).unwrap(), Rect::new(5.0, 7.0, 50.0, 20.0));
    assert_eq!(tree.layout(next).unwrap().left, 50.0);
}

#[test]
fn absolute_children_use_offsets_and_stay_out_of_flow() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 200.0, 100.0);
    let flow = sized(&mut tree, root, 50.0, 20.0);

    let pinned = sized(&mut tree, root, 50.0, 20.0);
    tree.set_position_type(pinned, PositionType::Absolute).unwrap();
    tree.set_position(pinned, Edge::Right, 10.0).unwrap();
    tree.set_position(pinned, Edge::Bottom, 10.0).unwrap();

    let spanning = tree.new_node();
    tree.set_position_type(spanning, PositionType::Absolute).unwrap();
    tree.set_position(spanning, Edge::Left, 10.0).unwrap();
    tree.set_position(spanning, Edge::Right, 30.0).unwrap();
    tree.set_height(spanning, 5.0).unwrap();
    tree.append_child(root, spanning).unwrap();

    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();
    assert_eq!(tree.layout(flow).unwrap().left, 0.0);
    assert_eq!(tree.layout(pinned).unwrap(), Rect::new(140.0, 70.0, 50.0, 20.0));
    assert_eq!(tree.layout(spanning).unwrap(), Rect::new(10.0, 0.0, 160.0, 5.0));
}

#[test]
fn absolute_child_without_offsets_follows_justify() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 200.0, 100.0);
    tree.set_justify_content(root, Justify::Center).unwrap();
    let floating = sized(&mut tree, root, 50.0, 20.0);
    tree.set_position_type(floating, PositionType::Absolute).unwrap();
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();

    assert_eq!(tree.layout(floating).unwrap(), Rect::new(75.0, 0.0, 50.0, 20.0));
}

#[test]
fn display_none_takes_no_space() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 300.0, 100.0);
    let hidden = sized(&mut tree, root, 100.0, 20.0);
    let inner = sized(&mut tree, hidden, 10.0, 10.0);
    tree.set_display(hidden, Display::None).unwrap();
    let shown = sized(&mut tree, root, 100.0, 20.0);
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();

    assert_eq!(tree.layout(hidden).unwrap(), Rect::default());
    assert_eq!(tree.layout(inner).unwrap(), Rect::default());
    assert_eq!(tree.layout(shown).unwrap().left, 0.0);
    assert_eq!(tree.last_layout_stats().nodes_zeroed, 2);
}

#[test]
fn pixel_grid_rounding_keeps_siblings_touching() {
    let mut tree = LayoutTree::with_config(Config::default().with_point_scale_factor(1.0)).unwrap();
    let root = row(&mut tree, 100.0, 10.0);
    let items: Vec<_> = (0..3)
        .map(|_| {
            let item = tree.new_node();
            tree.set_flex_grow(item, 1.0).unwrap();
            tree.set_flex_basis(item, 0.0).unwrap();
            tree.append_child(root, item).unwrap();
            item
        })
        .collect();
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();

    let rects: Vec<Rect> = items.iter().map(|id| tree.layout(*id).unwrap()).collect();
    assert_eq!(rects[0], Rect::new(0.0, 0.0, 33.0, 10.0));
    assert_eq!(rects[1], Rect::new(33.0, 0.0, 34.0, 10.0));
    assert_eq!(rects[2], Rect::new(67.0, 0.0, 33.0, 10.0));
    assert_close(tree.unrounded_layout(items[1]).unwrap().width, 100.0 / 3.0);
}

#[test]
fn measured_leaves_round_their_far_edge_up() {
    let mut tree = LayoutTree::with_config(Config::default().with_point_scale_factor(1.0)).unwrap();
    let root = tree.new_node();
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_align_items(root, Align::FlexStart).unwrap();
    let (leaf, _) = counting_leaf(&mut tree, Size::new(10.2, 4.4));
    tree.append_child(root, leaf).unwrap();
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();

    assert_eq!(tree.layout(leaf).unwrap(), Rect::new(0.0, 0.0, 11.0, 5.0));
}

#[test]
fn web_defaults_lay_out_rows_that_shrink() {
    let mut tree = LayoutTree::with_config(Config::default().with_web_defaults(true)).unwrap();
    let root = tree.new_node();
    tree.set_width(root, 100.0).unwrap();
    tree.set_height(root, 10.0).unwrap();
    let a = sized(&mut tree, root, 80.0, 10.0);
    let b = sized(&mut tree, root, 80.0, 10.0);
    tree.calculate_layout(root, f32::NAN, f32::NAN).unwrap();

    assert_eq!(tree.layout(a).unwrap(), Rect::new(0.0, 0.0, 50.0, 10.0));
    assert_eq!(tree.layout(b).unwrap(), Rect::new(50.0, 0.0, 50.0, 10.0));
}

#[test]
fn root_margin_offsets_the_root() {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    tree.set_margin(root, Edge::All, 5.0).unwrap();
    tree.calculate_layout(root, 100.0, 50.0).unwrap();

    assert_eq!(tree.layout(root).unwrap(), Rect::new(5.0, 5.0, 90.0, 40.0));
}
