//! Property tests for the layout engine.
//!
//! Random trees of fixed, flexible and measured nodes are laid out and the
//! results checked for determinism, cache transparency, non-negative sizes
//! and containment of children in parents that report no overflow.

use boxflow_layout::{
    Align, Edge, FlexDirection, Gutter, Justify, LayoutTree, MeasureInput, NodeId, Rect, Size, Wrap,
};
use proptest::prelude::*;

const EPS: f32 = 1e-2;

#[derive(Debug, Clone)]
enum Content {
    Children(Vec<NodeShape>),
    Measured { width: f32, height: f32 },
}

#[derive(Debug, Clone)]
struct NodeShape {
    row: bool,
    wrap: bool,
    justify: Justify,
    align: Align,
    width: Option<f32>,
    height: Option<f32>,
    grow: f32,
    shrink: f32,
    padding: f32,
    margin: f32,
    gap: f32,
    content: Content,
}

fn justify_strategy() -> impl Strategy<Value = Justify> {
    prop::sample::select(Justify::ALL.to_vec())
}

fn align_strategy() -> impl Strategy<Value = Align> {
    prop::sample::select(vec![
        Align::FlexStart,
        Align::Center,
        Align::FlexEnd,
        Align::Stretch,
    ])
}

type Fields = (
    (bool, bool, Justify, Align),
    (Option<f32>, Option<f32>, f32, f32),
    (f32, f32, f32),
);

fn node_fields() -> impl Strategy<Value = Fields> {
    (
        (any::<bool>(), any::<bool>(), justify_strategy(), align_strategy()),
        (
            prop::option::of(0.0f32..120.0),
            prop::option::of(0.0f32..120.0),
            prop::sample::select(vec![0.0f32, 0.0, 1.0, 2.0]),
            prop::sample::select(vec![0.0f32, 1.0]),
        ),
        (0.0f32..6.0, 0.0f32..6.0, 0.0f32..4.0),
    )
}

fn build(fields: Fields, content: Content) -> NodeShape {
    let ((row, wrap, justify, align), (width, height, grow, shrink), (padding, margin, gap)) =
        fields;
    NodeShape {
        row,
        wrap,
        justify,
        align,
        width,
        height,
        grow,
        shrink,
        padding,
        margin,
        gap,
        content,
    }
}

fn node_strategy() -> impl Strategy<Value = NodeShape> {
    let leaf = (node_fields(), 1.0f32..80.0, 1.0f32..30.0).prop_map(|(fields, width, height)| {
        build(fields, Content::Measured { width, height })
    });
    leaf.prop_recursive(3, 24, 4, |inner| {
        (node_fields(), prop::collection::vec(inner, 0..4))
            .prop_map(|(fields, children)| build(fields, Content::Children(children)))
    })
}

fn instantiate(tree: &mut LayoutTree, shape: &NodeShape, out: &mut Vec<NodeId>) -> NodeId {
    let node = tree.new_node();
    out.push(node);
    let direction = if shape.row {
        FlexDirection::Row
    } else {
        FlexDirection::Column
    };
    tree.set_flex_direction(node, direction).unwrap();
    if shape.wrap {
        tree.set_flex_wrap(node, Wrap::Wrap).unwrap();
    }
    tree.set_justify_content(node, shape.justify).unwrap();
    tree.set_align_items(node, shape.align).unwrap();
    if let Some(width) = shape.width {
        tree.set_width(node, width).unwrap();
    }
    if let Some(height) = shape.height {
        tree.set_height(node, height).unwrap();
    }
    tree.set_flex_grow(node, shape.grow).unwrap();
    tree.set_flex_shrink(node, shape.shrink).unwrap();
    tree.set_padding(node, Edge::All, shape.padding).unwrap();
    tree.set_margin(node, Edge::All, shape.margin).unwrap();
    tree.set_gap(node, Gutter::All, shape.gap).unwrap();

    match &shape.content {
        Content::Measured { width, height } => {
            let (width, height) = (*width, *height);
            // Text-like: narrower space means more lines.
            tree.enable_measure(node, move |input: MeasureInput| {
                let limit = input.width_limit().unwrap_or(width).max(1.0);
                let lines = (width / limit).ceil().max(1.0);
                Size::new(width.min(limit), height * lines)
            })
            .unwrap();
        }
        Content::Children(children) => {
            for child in children {
                let id = instantiate(tree, child, out);
                tree.append_child(node, id).unwrap();
            }
        }
    }
    node
}

fn build_tree(shape: &NodeShape) -> (LayoutTree, NodeId, Vec<NodeId>) {
    let mut tree = LayoutTree::new();
    let mut nodes = Vec::new();
    let root = instantiate(&mut tree, shape, &mut nodes);
    (tree, root, nodes)
}

fn layouts(tree: &LayoutTree, nodes: &[NodeId]) -> Vec<Rect> {
    nodes
        .iter()
        .map(|id| tree.unrounded_layout(*id).unwrap())
        .collect()
}

fn assert_rects_close(a: &[Rect], b: &[Rect]) -> Result<(), TestCaseError> {
    for (x, y) in a.iter().zip(b) {
        prop_assert!(
            (x.left - y.left).abs() < EPS
                && (x.top - y.top).abs() < EPS
                && (x.width - y.width).abs() < EPS
                && (x.height - y.height).abs() < EPS,
            "{x:?} != {y:?}"
        );
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn layout_is_deterministic(shape in node_strategy(), width in 50.0f32..400.0) {
        let (mut a, root_a, nodes_a) = build_tree(&shape);
        let (mut b, root_b, nodes_b) = build_tree(&shape);
        a.calculate_layout(root_a, width, f32::NAN).unwrap();
        b.calculate_layout(root_b, width, f32::NAN).unwrap();
        prop_assert_eq!(layouts(&a, &nodes_a), layouts(&b, &nodes_b));
    }

    #[test]
    fn cached_relayout_matches_fresh_layout(
        shape in node_strategy(),
        first in 50.0f32..400.0,
        second in 50.0f32..400.0,
    ) {
        let (mut warm, root, nodes) = build_tree(&shape);
        warm.calculate_layout(root, first, f32::NAN).unwrap();
        warm.calculate_layout(root, second, f32::NAN).unwrap();

        let (mut fresh, fresh_root, fresh_nodes) = build_tree(&shape);
        fresh.calculate_layout(fresh_root, second, f32::NAN).unwrap();

        assert_rects_close(&layouts(&warm, &nodes), &layouts(&fresh, &fresh_nodes))?;
    }

    #[test]
    fn sizes_are_finite_and_non_negative(shape in node_strategy(), width in 0.0f32..400.0) {
        let (mut tree, root, nodes) = build_tree(&shape);
        tree.calculate_layout(root, width, f32::INFINITY).unwrap();
        for rect in layouts(&tree, &nodes) {
            prop_assert!(rect.width.is_finite() && rect.width >= 0.0, "{rect:?}");
            prop_assert!(rect.height.is_finite() && rect.height >= 0.0, "{rect:?}");
            prop_assert!(rect.left.is_finite() && rect.top.is_finite(), "{rect:?}");
        }
    }

    #[test]
    fn children_stay_inside_parents_without_overflow(
        shape in node_strategy(),
        width in 50.0f32..400.0,
    ) {
        let (mut tree, root, nodes) = build_tree(&shape);
        tree.calculate_layout(root, width, f32::NAN).unwrap();
        for parent in nodes {
            if tree.had_overflow(parent).unwrap() {
                continue;
            }
            let bounds = tree.unrounded_layout(parent).unwrap();
            for child in tree.children(parent).unwrap() {
                let rect = tree.unrounded_layout(child).unwrap();
                prop_assert!(rect.left >= -EPS && rect.top >= -EPS, "{rect:?} in {bounds:?}");
                prop_assert!(rect.right() <= bounds.width + EPS, "{rect:?} in {bounds:?}");
                prop_assert!(rect.bottom() <= bounds.height + EPS, "{rect:?} in {bounds:?}");
            }
        }
    }

    #[test]
    fn clean_second_pass_computes_nothing(shape in node_strategy(), width in 50.0f32..400.0) {
        let (mut tree, root, nodes) = build_tree(&shape);
        tree.calculate_layout(root, width, f32::NAN).unwrap();
        let before = layouts(&tree, &nodes);
        tree.calculate_layout(root, width, f32::NAN).unwrap();
        let stats = tree.last_layout_stats();
        prop_assert_eq!(stats.layouts_computed, 0);
        prop_assert_eq!(stats.measure_callbacks, 0);
        prop_assert_eq!(layouts(&tree, &nodes), before);
    }
}
