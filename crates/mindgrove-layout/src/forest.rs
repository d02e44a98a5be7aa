//! Layout over a forest of independent root-anchored trees, dispatched per strategy.

use mindgrove_core::traversal::children_map;
use mindgrove_core::{Edge, Node, Point, Side};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::direction::{LayoutDirection, LayoutStrategy};
use crate::error::{Error, Result};
use crate::hierarchy::HierarchyNode;
use crate::options::LayoutOptions;
use crate::{balanced, org_chart, radial, rank, right_only};

/// Where a pass put one node. `side` is set by strategies that decide sides themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Point,
    pub side: Option<Side>,
}

pub type Placements = FxHashMap<String, Placement>;

/// Placements for every descendant of `tree` (not `tree` itself).
pub(crate) fn collect_placements(
    tree: &HierarchyNode,
    side: impl Fn(&HierarchyNode) -> Option<Side>,
) -> Result<Placements> {
    let mut out = Placements::default();
    let mut bad: Option<String> = None;
    for child in &tree.children {
        child.each(&mut |n: &HierarchyNode| {
            let position = Point::new(n.x, n.y);
            if !position.is_finite() && bad.is_none() {
                bad = Some(n.id.clone());
            }
            out.insert(
                n.id.clone(),
                Placement {
                    position,
                    side: side(n),
                },
            );
        });
    }
    match bad {
        Some(id) => Err(Error::NonFinitePosition { id }),
        None => Ok(out),
    }
}

fn check_unique_ids(nodes: &[Node]) -> Result<()> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for node in nodes {
        if !seen.insert(node.id.as_str()) {
            return Err(Error::DuplicateNode {
                id: node.id.clone(),
            });
        }
    }
    Ok(())
}

fn with_placements(nodes: &[Node], placements: &Placements) -> Vec<Node> {
    nodes
        .iter()
        .map(|n| {
            let mut out = n.clone();
            if let Some(p) = placements.get(&n.id) {
                out.position = p.position;
                if let Some(side) = p.side {
                    out.data.side = side;
                }
            }
            out
        })
        .collect()
}

/// One tree hanging off `anchor`, laid out with the tree strategy in `options`.
fn layout_tree(
    anchor: &Node,
    children: &FxHashMap<&str, Vec<&Node>>,
    direction: LayoutDirection,
    options: &LayoutOptions,
    visited: &mut FxHashSet<String>,
) -> Result<Placements> {
    if !anchor.position.is_finite() {
        return Err(Error::NonFinitePosition {
            id: anchor.id.clone(),
        });
    }
    match options.strategy {
        LayoutStrategy::BalancedTree | LayoutStrategy::Rank => {
            let positions = balanced::layout_tree(anchor, children, direction, options, visited)?;
            Ok(positions
                .into_iter()
                .map(|(id, position)| {
                    (
                        id,
                        Placement {
                            position,
                            side: None,
                        },
                    )
                })
                .collect())
        }
        LayoutStrategy::RightOnly => right_only::layout_tree(anchor, children, options, visited),
        LayoutStrategy::OrgChart => org_chart::layout_tree(anchor, children, options, visited),
        LayoutStrategy::Radial => radial::layout_tree(anchor, children, options, visited),
    }
}

/// Lays out every tree in `nodes`, one per `Root` node, each anchored at its root's current
/// position. Nodes outside every tree keep their position; node order is preserved.
///
/// Tree strategies never consult `edges`. The rank strategy lays out the whole node/edge set
/// as one layered graph instead.
pub fn try_layout_all_trees(
    nodes: &[Node],
    edges: &[Edge],
    direction: LayoutDirection,
    options: &LayoutOptions,
) -> Result<Vec<Node>> {
    if direction == LayoutDirection::None {
        return Ok(nodes.to_vec());
    }
    if options.strategy == LayoutStrategy::Rank {
        return rank::rank_layout(nodes, edges, direction, options);
    }
    check_unique_ids(nodes)?;

    let children = children_map(nodes);
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut placements = Placements::default();
    let mut trees = 0usize;
    for root in nodes.iter().filter(|n| n.is_root()) {
        if visited.contains(&root.id) {
            continue;
        }
        placements.extend(layout_tree(root, &children, direction, options, &mut visited)?);
        trees += 1;
    }
    tracing::debug!(trees, placed = placements.len(), "laid out forest");

    Ok(with_placements(nodes, &placements))
}

/// Lays out `root` and its `descendants` as one tree anchored at the root's current position.
/// `root` does not need to be a `Root` node, so a single branch can be re-laid out on its own.
///
/// With the rank strategy the subtree is ranked on its own edges and then shifted so `root`
/// stays where it was.
pub fn try_layout_subtree(
    root: &Node,
    descendants: &[Node],
    edges: &[Edge],
    direction: LayoutDirection,
    options: &LayoutOptions,
) -> Result<Vec<Node>> {
    let nodes = subtree_input(root, descendants);
    if direction == LayoutDirection::None {
        return Ok(nodes);
    }
    check_unique_ids(&nodes)?;

    if options.strategy == LayoutStrategy::Rank {
        let members: FxHashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let inner: Vec<Edge> = edges
            .iter()
            .filter(|e| members.contains(e.source.as_str()) && members.contains(e.target.as_str()))
            .cloned()
            .collect();
        let mut out = rank::rank_layout(&nodes, &inner, direction, options)?;
        let (dx, dy) = (
            root.position.x - out[0].position.x,
            root.position.y - out[0].position.y,
        );
        for node in &mut out {
            node.position = node.position.offset(dx, dy);
        }
        return Ok(out);
    }

    let children = children_map(&nodes);
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let placements = layout_tree(root, &children, direction, options, &mut visited)?;
    Ok(with_placements(&nodes, &placements))
}

fn subtree_input(root: &Node, descendants: &[Node]) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(descendants.len() + 1);
    nodes.push(root.clone());
    nodes.extend(descendants.iter().filter(|n| n.id != root.id).cloned());
    nodes
}

/// Result of a recovering layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutput {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Set when the pass failed and `nodes`/`edges` are the unchanged input.
    pub recovered: Option<Error>,
}

impl LayoutOutput {
    pub(crate) fn from_result(result: Result<Vec<Node>>, nodes: &[Node], edges: &[Edge]) -> Self {
        match result {
            Ok(laid_out) => Self {
                nodes: laid_out,
                edges: edges.to_vec(),
                recovered: None,
            },
            Err(err) => {
                tracing::warn!(error = %err, "layout failed; returning input unchanged");
                Self {
                    nodes: nodes.to_vec(),
                    edges: edges.to_vec(),
                    recovered: Some(err),
                }
            }
        }
    }

    pub fn is_recovered(&self) -> bool {
        self.recovered.is_some()
    }
}

/// Recovering form of [`try_layout_all_trees`]. Edges pass through untouched, dangling ones
/// included.
pub fn layout_all_trees(
    nodes: &[Node],
    edges: &[Edge],
    direction: LayoutDirection,
    options: &LayoutOptions,
) -> LayoutOutput {
    let _span = tracing::debug_span!(
        "layout_all_trees",
        strategy = options.strategy.as_str(),
        direction = direction.as_str(),
        nodes = nodes.len(),
        edges = edges.len()
    )
    .entered();
    LayoutOutput::from_result(
        try_layout_all_trees(nodes, edges, direction, options),
        nodes,
        edges,
    )
}

/// Recovering form of [`try_layout_subtree`]. On failure `nodes` is `root` followed by
/// `descendants`, unchanged.
pub fn layout_subtree(
    root: &Node,
    descendants: &[Node],
    edges: &[Edge],
    direction: LayoutDirection,
    options: &LayoutOptions,
) -> LayoutOutput {
    let _span = tracing::debug_span!(
        "layout_subtree",
        root = %root.id,
        strategy = options.strategy.as_str(),
        direction = direction.as_str(),
        nodes = descendants.len() + 1
    )
    .entered();
    let result = try_layout_subtree(root, descendants, edges, direction, options);
    LayoutOutput::from_result(result, &subtree_input(root, descendants), edges)
}
