//! Org chart: children hang below their parent, laid out left to right and centred under it.
//!
//! The anchor keeps its position. Placed nodes are recorded on [`Side::Right`], which reads as
//! "below" in this layout.

use mindgrove_core::{Node, Side};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::Result;
use crate::forest::{Placements, collect_placements};
use crate::hierarchy::HierarchyNode;
use crate::options::LayoutOptions;

fn position_children(parent: &mut HierarchyNode, hs: f64, vs: f64) {
    let (px, py, pw, ph) = (parent.x, parent.y, parent.width, parent.height);
    let single = parent.children.len() == 1;
    let total: f64 = parent
        .children
        .iter()
        .map(|c| c.subtree_width().unwrap_or(c.width))
        .sum::<f64>()
        + parent.children.len().saturating_sub(1) as f64 * hs;
    let start = px + pw / 2.0 - total / 2.0;

    let mut cumulative = 0.0;
    for child in &mut parent.children {
        let extent = child.subtree_width().unwrap_or(child.width);
        child.y = py + ph + vs;
        child.x = if single {
            px + pw / 2.0 - child.width / 2.0
        } else {
            // Centre the node over its own subtree's slot.
            start + cumulative + extent / 2.0 - child.width / 2.0
        };
        cumulative += extent + hs;
        position_children(child, hs, vs);
    }
}

pub fn layout_tree(
    anchor: &Node,
    children: &FxHashMap<&str, Vec<&Node>>,
    options: &LayoutOptions,
    visited: &mut FxHashSet<String>,
) -> Result<Placements> {
    let mut tree = HierarchyNode::build_subtree(anchor, children, options, visited)
        .at(anchor.position.x, anchor.position.y);
    tree.calculate_subtree_width(options.horizontal_spacing);
    position_children(
        &mut tree,
        options.horizontal_spacing,
        options.vertical_spacing,
    );
    tree.adjust_spacing(false, options.horizontal_spacing);

    collect_placements(&tree, |_| Some(Side::Right))
}
