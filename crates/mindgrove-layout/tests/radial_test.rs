use mindgrove_core::{Node, NodeContent, NodeKind, Point, Side};
use mindgrove_layout::{
    LayoutDirection, LayoutOptions, LayoutStrategy, layout_all_trees, layout_subtree,
};

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

fn assert_near(actual: Point, expected: Point) {
    assert!(
        (actual.x - expected.x).abs() < 1e-6 && (actual.y - expected.y).abs() < 1e-6,
        "{actual:?} != {expected:?}"
    );
}

fn radial() -> LayoutOptions {
    LayoutOptions::default().with_strategy(LayoutStrategy::Radial)
}

#[test]
fn a_lone_child_sits_straight_above_the_root() {
    let r = root_at("r", 0.0, 0.0);
    let c = child("c", &r, Side::Left);
    let nodes = vec![r, c];

    let out = layout_all_trees(&nodes, &[], LayoutDirection::Horizontal, &radial());
    // Root centre (50, 20), first ring 200 + 150.
    assert_near(find(&out.nodes, "c").position, Point::new(0.0, -350.0));
    assert_eq!(find(&out.nodes, "c").side(), Side::Right);
}

#[test]
fn siblings_split_the_circle_and_take_the_side_they_land_on() {
    let r = root_at("r", 0.0, 0.0);
    let a = child("a", &r, Side::Left);
    let b = child("b", &r, Side::Right);
    let a1 = child("a1", &a, Side::Left);
    let nodes = vec![r, a, b, a1];

    let out = layout_all_trees(&nodes, &[], LayoutDirection::Horizontal, &radial());
    assert!(out.recovered.is_none());
    // a at 90 degrees (3 o'clock), b at 270.
    assert_near(find(&out.nodes, "a").position, Point::new(350.0, 0.0));
    assert_near(find(&out.nodes, "b").position, Point::new(-350.0, 0.0));
    assert_eq!(find(&out.nodes, "a").side(), Side::Right);
    assert_eq!(find(&out.nodes, "b").side(), Side::Left);

    // a1 fans 120 degrees around 90 and, alone, sits at 30 on the 500 ring around a's centre.
    let expected = Point::new(
        400.0 + 500.0 * 30f64.to_radians().sin() - 50.0,
        20.0 - 500.0 * 30f64.to_radians().cos() - 20.0,
    );
    assert_near(find(&out.nodes, "a1").position, expected);
    assert_eq!(find(&out.nodes, "a1").side(), Side::Right);
}

#[test]
fn rings_follow_the_configured_radii() {
    let r = root_at("r", 0.0, 0.0);
    let c = child("c", &r, Side::Right);
    let nodes = vec![r, c];
    let mut opts = radial();
    opts.base_radius = 0.0;
    opts.radius_increment = 100.0;

    let out = layout_all_trees(&nodes, &[], LayoutDirection::Vertical, &opts);
    assert_near(find(&out.nodes, "c").position, Point::new(0.0, -100.0));
}

#[test]
fn a_branch_laid_out_alone_keeps_its_side() {
    let r = root_at("r", 0.0, 0.0);
    let mut a = child("a", &r, Side::Left);
    a.position = Point::ORIGIN;
    let a1 = child("a1", &a, Side::Left);

    let out = layout_subtree(
        &a,
        &[a1],
        &[],
        LayoutDirection::Horizontal,
        &radial(),
    );
    assert_eq!(find(&out.nodes, "a").position, Point::ORIGIN);
    assert_near(find(&out.nodes, "a1").position, Point::new(0.0, -350.0));
    assert_eq!(find(&out.nodes, "a1").side(), Side::Left);
}
