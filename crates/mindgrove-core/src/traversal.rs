//! Tree walks over flat node arrays.
//!
//! `parentId` chains come from host data and are never trusted to be acyclic: every walk keeps a
//! visited set and stops at the first repeat.

use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::model::{Node, Side};

/// Parent id -> children, ordered by `siblingOrder` and then node array order.
pub fn children_map(nodes: &[Node]) -> FxHashMap<&str, Vec<&Node>> {
    let mut map: FxHashMap<&str, Vec<&Node>> = FxHashMap::default();
    for node in nodes {
        if let Some(parent) = node.parent_id() {
            map.entry(parent).or_default().push(node);
        }
    }
    for kids in map.values_mut() {
        kids.sort_by_key(|n| n.data.sibling_order.unwrap_or(u32::MAX));
    }
    map
}

pub fn node_index(nodes: &[Node]) -> FxHashMap<&str, &Node> {
    nodes.iter().map(|n| (n.id.as_str(), n)).collect()
}

/// `id` followed by every node reachable through `parentId` links, each exactly once.
///
/// Unknown ids yield an empty vec. A cyclic chain stops at the node that closes the cycle.
pub fn get_subtree_nodes<'a>(id: &str, nodes: &'a [Node]) -> Vec<&'a Node> {
    let children = children_map(nodes);
    let Some(start) = nodes.iter().find(|n| n.id == id) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut stack = vec![start];
    while let Some(node) = stack.pop() {
        if !visited.insert(node.id.as_str()) {
            continue;
        }
        out.push(node);
        if let Some(kids) = children.get(node.id.as_str()) {
            // Reverse so the walk visits siblings in layout order.
            for kid in kids.iter().rev() {
                if !visited.contains(kid.id.as_str()) {
                    stack.push(*kid);
                }
            }
        }
    }
    out
}

pub fn subtree_ids(id: &str, nodes: &[Node]) -> IndexSet<String> {
    get_subtree_nodes(id, nodes)
        .into_iter()
        .map(|n| n.id.clone())
        .collect()
}

/// Proper descendants of `id` (the node itself excluded).
pub fn descendant_ids(id: &str, nodes: &[Node]) -> IndexSet<String> {
    let mut ids = subtree_ids(id, nodes);
    ids.shift_remove(id);
    ids
}

/// Nearest `Root` reached by walking up `parentId`; `None` for orphans and broken chains.
pub fn root_of<'a>(id: &str, nodes: &'a [Node]) -> Option<&'a Node> {
    let index = node_index(nodes);
    root_of_indexed(id, &index)
}

fn root_of_indexed<'a>(id: &str, index: &FxHashMap<&str, &'a Node>) -> Option<&'a Node> {
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut cur = *index.get(id)?;
    loop {
        if !visited.insert(cur.id.as_str()) {
            return None;
        }
        if cur.is_root() {
            return Some(cur);
        }
        cur = *index.get(cur.parent_id()?)?;
    }
}

/// Every node id that belongs to a tree, mapped to its root id.
pub fn node_to_root_map(nodes: &[Node]) -> FxHashMap<String, String> {
    let index = node_index(nodes);
    nodes
        .iter()
        .filter_map(|n| {
            let root = root_of_indexed(&n.id, &index)?;
            Some((n.id.clone(), root.id.clone()))
        })
        .collect()
}

pub fn has_children_on(id: &str, side: Side, nodes: &[Node]) -> bool {
    nodes
        .iter()
        .any(|n| n.parent_id() == Some(id) && n.side() == side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::model::{NodeContent, NodeKind};

    fn chain() -> Vec<Node> {
        let root = Node::root("r", Point::ORIGIN, NodeContent::text("r"));
        let a = Node::child(
            "a",
            NodeKind::Text,
            &root,
            Side::Left,
            Point::ORIGIN,
            NodeContent::default(),
        );
        let b = Node::child(
            "b",
            NodeKind::Text,
            &a,
            Side::Left,
            Point::ORIGIN,
            NodeContent::default(),
        );
        vec![root, a, b]
    }

    #[test]
    fn root_of_walks_up_to_the_root() {
        let nodes = chain();
        assert_eq!(root_of("b", &nodes).map(|n| n.id.as_str()), Some("r"));
        assert_eq!(root_of("missing", &nodes), None);
    }

    #[test]
    fn root_of_stops_on_cycles() {
        let mut nodes = chain();
        nodes.remove(0);
        nodes[0].data.parent_id = Some("b".to_string());
        assert_eq!(root_of("a", &nodes), None);
    }
}
