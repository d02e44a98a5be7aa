//! Sibling order: the explicit `siblingOrder` index layouts stack children by, and its
//! inference from where the user dragged nodes.
//!
//! Siblings are grouped by `(parentId, side)`. Positions are compared at node centres (measured
//! size when known, otherwise the top-left corner).

use indexmap::IndexMap;

use crate::geom::Point;
use crate::model::{Node, Side};

/// Node id -> zero-based order within its sibling group.
pub type SiblingOrders = IndexMap<String, u32>;

/// Axis positions are ranked along when inferring order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderAxis {
    X,
    #[default]
    Y,
    /// Clockwise angle around the parent, starting at 12 o'clock.
    Angle,
}

pub fn center_of(node: &Node) -> Point {
    match node.measured {
        Some(d) => Point::new(
            node.position.x + d.width.max(0.0) / 2.0,
            node.position.y + d.height.max(0.0) / 2.0,
        ),
        None => node.position,
    }
}

/// Degrees in `[0, 360)` from `parent` to `child`, 0 at the top and increasing clockwise.
pub fn angle_from(parent: Point, child: Point) -> f64 {
    let dx = child.x - parent.x;
    let dy = child.y - parent.y;
    let deg = dx.atan2(-dy).to_degrees();
    if deg < 0.0 { deg + 360.0 } else { deg }
}

fn key(axis: OrderAxis, at: Point, parent: Option<Point>) -> f64 {
    match (axis, parent) {
        (OrderAxis::X, _) => at.x,
        (OrderAxis::Angle, Some(p)) => angle_from(p, at),
        // No parent to measure an angle from.
        (OrderAxis::Y | OrderAxis::Angle, _) => at.y,
    }
}

/// Orders `siblings` by where their centres sit along `axis`. Ties keep input order.
pub fn infer_order_from_positions(
    siblings: &[&Node],
    axis: OrderAxis,
    parent: Option<Point>,
) -> SiblingOrders {
    ranked(
        siblings.iter().map(|n| (n.id.as_str(), center_of(n))),
        axis,
        parent,
    )
}

fn ranked<'a>(
    items: impl Iterator<Item = (&'a str, Point)>,
    axis: OrderAxis,
    parent: Option<Point>,
) -> SiblingOrders {
    let mut keyed: Vec<(&str, f64)> = items.map(|(id, at)| (id, key(axis, at, parent))).collect();
    keyed.sort_by(|a, b| a.1.total_cmp(&b.1));
    keyed
        .into_iter()
        .enumerate()
        .map(|(i, (id, _))| (id.to_string(), i as u32))
        .collect()
}

/// Infers order for every non-root node, one `(parentId, side)` group at a time.
pub fn infer_order_for_all_nodes(nodes: &[Node], axis: OrderAxis) -> SiblingOrders {
    let mut groups: IndexMap<(&str, Side), Vec<&Node>> = IndexMap::new();
    for node in nodes {
        if let Some(parent) = node.parent_id() {
            groups.entry((parent, node.side())).or_default().push(node);
        }
    }

    let mut out = SiblingOrders::new();
    for ((parent_id, _), siblings) in groups {
        let parent = nodes.iter().find(|n| n.id == parent_id).map(center_of);
        out.extend(infer_order_from_positions(&siblings, axis, parent));
    }
    out
}

/// Re-ranks `siblings` as if `node_id`'s centre were at `dropped_at`. Returns the new orders
/// when the dragged node's rank changed, `None` when the drop keeps it in place.
pub fn detect_reorder_from_drag(
    node_id: &str,
    dropped_at: Point,
    siblings: &[&Node],
    axis: OrderAxis,
    parent: Option<Point>,
) -> Option<SiblingOrders> {
    let before = infer_order_from_positions(siblings, axis, parent);
    let after = ranked(
        siblings.iter().map(|n| {
            let at = if n.id == node_id { dropped_at } else { center_of(n) };
            (n.id.as_str(), at)
        }),
        axis,
        parent,
    );
    let old = before.get(node_id)?;
    (after.get(node_id) != Some(old)).then_some(after)
}

/// Order for a child appended after `siblings`.
pub fn next_sibling_order(siblings: &[&Node]) -> u32 {
    siblings
        .iter()
        .filter_map(|n| n.data.sibling_order)
        .max()
        .map_or(0, |max| max + 1)
}

/// Closes gaps: existing orders keep their relative rank, unordered siblings go last.
pub fn normalize_sibling_orders(siblings: &[&Node]) -> SiblingOrders {
    let mut sorted: Vec<&Node> = siblings.to_vec();
    sorted.sort_by_key(|n| n.data.sibling_order.unwrap_or(u32::MAX));
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, n)| (n.id.clone(), i as u32))
        .collect()
}
