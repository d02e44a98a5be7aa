use mindgrove_core::{Node, NodeContent, NodeKind, Point, Side};
use mindgrove_layout::{LayoutDirection, LayoutOptions, LayoutStrategy, layout_all_trees};

fn root_at(id: &str, x: f64, y: f64) -> Node {
    Node::root(id, Point::new(x, y), NodeContent::default()).with_measured(100.0, 40.0)
}

fn child(id: &str, parent: &Node, side: Side) -> Node {
    Node::child(
        id,
        NodeKind::Text,
        parent,
        side,
        Point::ORIGIN,
        NodeContent::default(),
    )
    .with_measured(100.0, 40.0)
}

fn find<'a>(nodes: &'a [Node], id: &str) -> &'a Node {
    nodes
        .iter()
        .find(|n| n.id == id)
        .unwrap_or_else(|| panic!("missing node {id}"))
}

fn right_only() -> LayoutOptions {
    LayoutOptions::default().with_strategy(LayoutStrategy::RightOnly)
}

#[test]
fn every_branch_grows_to_the_right() {
    let r = root_at("r", 0.0, 0.0);
    let a = child("a", &r, Side::Left);
    let a1 = child("a1", &a, Side::Left);
    let b = child("b", &r, Side::Right);
    let nodes = vec![r, a, a1, b];

    let out = layout_all_trees(&nodes, &[], LayoutDirection::Horizontal, &right_only());
    assert!(out.recovered.is_none());
    assert_eq!(find(&out.nodes, "r").position, Point::ORIGIN);
    // Two siblings stacked around the root's vertical middle (y = 20).
    assert_eq!(find(&out.nodes, "a").position, Point::new(300.0, -60.0));
    assert_eq!(find(&out.nodes, "b").position, Point::new(300.0, 60.0));
    // A single child lines up with its parent.
    assert_eq!(find(&out.nodes, "a1").position, Point::new(600.0, -60.0));

    assert_eq!(find(&out.nodes, "r").side(), Side::Mid);
    for id in ["a", "a1", "b"] {
        assert_eq!(find(&out.nodes, id).side(), Side::Right, "{id}");
    }
}

#[test]
fn deep_subtrees_push_their_siblings_apart() {
    let r = root_at("r", 0.0, 0.0);
    let a = child("a", &r, Side::Right);
    let a1 = child("a1", &a, Side::Right);
    let a2 = child("a2", &a, Side::Right);
    let b = child("b", &r, Side::Right);
    let nodes = vec![r, a, a1, a2, b];

    let out = layout_all_trees(&nodes, &[], LayoutDirection::Horizontal, &right_only());
    assert_eq!(find(&out.nodes, "a").position, Point::new(300.0, -90.0));
    assert_eq!(find(&out.nodes, "a1").position, Point::new(600.0, -150.0));
    assert_eq!(find(&out.nodes, "a2").position, Point::new(600.0, -30.0));
    assert_eq!(find(&out.nodes, "b").position, Point::new(300.0, 90.0));

    let gap = find(&out.nodes, "b").position.y - (find(&out.nodes, "a2").position.y + 40.0);
    assert_eq!(gap, 80.0);
}

#[test]
fn sibling_order_decides_the_stacking() {
    let r = root_at("r", 0.0, 0.0);
    let mut a = child("a", &r, Side::Right);
    a.data.sibling_order = Some(1);
    let mut b = child("b", &r, Side::Right);
    b.data.sibling_order = Some(0);
    let nodes = vec![r, a, b];

    let out = layout_all_trees(&nodes, &[], LayoutDirection::Horizontal, &right_only());
    assert!(find(&out.nodes, "b").position.y < find(&out.nodes, "a").position.y);
}

#[test]
fn direction_none_leaves_positions_alone() {
    let r = root_at("r", 5.0, 5.0);
    let a = child("a", &r, Side::Left);
    let nodes = vec![r, a];
    let out = layout_all_trees(&nodes, &[], LayoutDirection::None, &right_only());
    assert_eq!(out.nodes, nodes);
}
