//! Right-only tree: every child grows to the right of its parent, siblings stacked vertically
//! and centred on the parent's middle.
//!
//! The anchor keeps its position. Every placed node ends up on [`Side::Right`].

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
        .map(|c| c.subtree_height().unwrap_or(c.height))
        .sum::<f64>()
        + parent.children.len().saturating_sub(1) as f64 * vs;

    let mut cumulative = 0.0;
    for child in &mut parent.children {
        child.x = px + pw + hs;
        child.y = if single {
            py + ph / 2.0 - child.height / 2.0
        } else {
            py + ph / 2.0 - total / 2.0 + cumulative
        };
        cumulative += child.subtree_height().unwrap_or(child.height) + vs;
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
    tree.calculate_subtree_height(options.vertical_spacing);
    position_children(
        &mut tree,
        options.horizontal_spacing,
        options.vertical_spacing,
    );
    tree.adjust_spacing(true, options.vertical_spacing);

    collect_placements(&tree, |_| Some(Side::Right))
}
