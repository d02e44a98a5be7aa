//! Balanced left/right layout of one root-anchored tree.
//!
//! The anchor keeps its position. Its left-side children form one hierarchy and its right-side
//! children another; each is placed outward from the anchor level by level, then sibling
//! subtrees are re-spaced so neighbouring extents sit exactly one spacing apart.

use mindgrove_core::{Node, Point, Side};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::direction::LayoutDirection;
use crate::error::{Error, Result};
use crate::hierarchy::HierarchyNode;
use crate::options::LayoutOptions;

/// Builds the hierarchy for one side: the anchor with its direct children on `side`.
pub fn create_hierarchy(
    anchor: &Node,
    side: Side,
    children: &FxHashMap<&str, Vec<&Node>>,
    options: &LayoutOptions,
    visited: &mut FxHashSet<String>,
) -> HierarchyNode {
    let dims = options.dimensions_of(anchor);
    let mut root = HierarchyNode::new(anchor.id.clone(), dims.width, dims.height)
        .at(anchor.position.x, anchor.position.y);
    visited.insert(anchor.id.clone());

    if let Some(kids) = children.get(anchor.id.as_str()) {
        for kid in kids.iter().filter(|k| k.side() == side) {
            if visited.contains(&kid.id) {
                continue;
            }
            root.children
                .push(HierarchyNode::build_subtree(kid, children, options, visited));
        }
    }
    root
}

/// Places every descendant of `parent` relative to it. `parent` must already be positioned.
pub fn position_hierarchy(
    parent: &mut HierarchyNode,
    side: Side,
    direction: LayoutDirection,
    options: &LayoutOptions,
) {
    let hs = options.horizontal_spacing;
    let vs = options.vertical_spacing;
    let (px, py, pw, ph) = (parent.x, parent.y, parent.width, parent.height);
    let single = parent.children.len() == 1;

    let total = match direction {
        LayoutDirection::Horizontal => stacked_extent(&parent.children, vs, |c| {
            c.subtree_height().unwrap_or(c.height)
        }),
        LayoutDirection::Vertical => stacked_extent(&parent.children, hs, |c| {
            c.subtree_width().unwrap_or(c.width)
        }),
        LayoutDirection::None => return,
    };

    let mut cumulative = 0.0;
    for child in &mut parent.children {
        match direction {
            LayoutDirection::Horizontal => {
                child.x = match side {
                    Side::Left => px - hs - child.width,
                    _ => px + hs + pw,
                };
                child.y = if single {
                    py + ph / 2.0 - child.height / 2.0
                } else {
                    py - total / 2.0 + cumulative
                };
                cumulative += child.subtree_height().unwrap_or(child.height) + vs;
            }
            LayoutDirection::Vertical => {
                child.y = match side {
                    Side::Left => py - vs - child.height,
                    _ => py + vs + ph,
                };
                child.x = if single {
                    px + pw / 2.0 - child.width / 2.0
                } else {
                    px - total / 2.0 + cumulative
                };
                cumulative += child.subtree_width().unwrap_or(child.width) + hs;
            }
            LayoutDirection::None => {}
        }
        position_hierarchy(child, side, direction, options);
    }
}

fn stacked_extent(
    children: &[HierarchyNode],
    spacing: f64,
    extent: impl Fn(&HierarchyNode) -> f64,
) -> f64 {
    if children.is_empty() {
        return 0.0;
    }
    children.iter().map(extent).sum::<f64>() + (children.len() - 1) as f64 * spacing
}

/// Sizes, places and re-spaces one side's hierarchy in place.
pub fn process_hierarchy(
    hierarchy: &mut HierarchyNode,
    side: Side,
    direction: LayoutDirection,
    options: &LayoutOptions,
) {
    match direction {
        LayoutDirection::Horizontal => {
            hierarchy.calculate_subtree_height(options.vertical_spacing);
        }
        LayoutDirection::Vertical => {
            hierarchy.calculate_subtree_width(options.horizontal_spacing);
        }
        LayoutDirection::None => return,
    }
    position_hierarchy(hierarchy, side, direction, options);

    let horizontal = direction == LayoutDirection::Horizontal;
    let spacing = if horizontal {
        options.vertical_spacing
    } else {
        options.horizontal_spacing
    };
    hierarchy.adjust_spacing(horizontal, spacing);
}

/// Lays out the tree hanging off `anchor`, returning new positions for every placed descendant
/// (the anchor itself is not included; it does not move).
///
/// Children on `Mid` are not part of either branch and are left where they are.
pub fn layout_tree(
    anchor: &Node,
    children: &FxHashMap<&str, Vec<&Node>>,
    direction: LayoutDirection,
    options: &LayoutOptions,
    visited: &mut FxHashSet<String>,
) -> Result<FxHashMap<String, Point>> {
    if !anchor.position.is_finite() {
        return Err(Error::NonFinitePosition {
            id: anchor.id.clone(),
        });
    }

    let mut positions: FxHashMap<String, Point> = FxHashMap::default();
    if direction == LayoutDirection::None {
        return Ok(positions);
    }

    for side in [Side::Left, Side::Right] {
        let mut hierarchy = create_hierarchy(anchor, side, children, options, visited);
        process_hierarchy(&mut hierarchy, side, direction, options);

        let mut bad: Option<String> = None;
        for child in &hierarchy.children {
            child.each(&mut |n: &HierarchyNode| {
                let p = Point::new(n.x, n.y);
                if !p.is_finite() && bad.is_none() {
                    bad = Some(n.id.clone());
                }
                positions.insert(n.id.clone(), p);
            });
        }
        if let Some(id) = bad {
            return Err(Error::NonFinitePosition { id });
        }
    }
    Ok(positions)
}
