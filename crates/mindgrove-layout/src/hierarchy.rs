//! Positioned tree used by the balanced layout.
//!
//! Coordinates are top-left corners, matching the node model. Extents (`width`/`height`) are
//! resolved sizes; a zero or negative extent is treated as a point by the boundary accessors.

use mindgrove_core::Node;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::options::LayoutOptions;

#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub children: Vec<HierarchyNode>,
    subtree_height: Option<f64>,
    subtree_width: Option<f64>,
}

impl HierarchyNode {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            width,
            height,
            children: Vec::new(),
            subtree_height: None,
            subtree_width: None,
        }
    }

    pub fn with_children(mut self, children: Vec<HierarchyNode>) -> Self {
        self.children = children;
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Builds the hierarchy below `node` from a parent -> children map.
    ///
    /// `visited` is shared across calls so a node reachable twice (a corrupted `parentId` cycle)
    /// is only placed once.
    pub fn build_subtree(
        node: &Node,
        children: &FxHashMap<&str, Vec<&Node>>,
        options: &LayoutOptions,
        visited: &mut FxHashSet<String>,
    ) -> HierarchyNode {
        visited.insert(node.id.clone());
        let dims = options.dimensions_of(node);
        let mut out = HierarchyNode::new(node.id.clone(), dims.width, dims.height);
        if let Some(kids) = children.get(node.id.as_str()) {
            for kid in kids {
                if visited.contains(&kid.id) {
                    continue;
                }
                out.children
                    .push(Self::build_subtree(kid, children, options, visited));
            }
        }
        out
    }

    /// Extent of this subtree across the growth axis of a horizontal layout; cached.
    ///
    /// A leaf is its own height; an inner node is the stacked height of its child subtrees plus
    /// `vertical_spacing` between them, never less than its own height.
    pub fn calculate_subtree_height(&mut self, vertical_spacing: f64) -> f64 {
        if let Some(h) = self.subtree_height {
            return h;
        }
        let own = self.height.max(0.0);
        let h = if self.children.is_empty() {
            own
        } else {
            let stacked: f64 = self
                .children
                .iter_mut()
                .map(|c| c.calculate_subtree_height(vertical_spacing))
                .sum();
            let gaps = (self.children.len() - 1) as f64 * vertical_spacing;
            own.max(stacked + gaps)
        };
        self.subtree_height = Some(h);
        h
    }

    /// Same as [`HierarchyNode::calculate_subtree_height`] along the x axis, for vertical
    /// layouts.
    pub fn calculate_subtree_width(&mut self, horizontal_spacing: f64) -> f64 {
        if let Some(w) = self.subtree_width {
            return w;
        }
        let own = self.width.max(0.0);
        let w = if self.children.is_empty() {
            own
        } else {
            let stacked: f64 = self
                .children
                .iter_mut()
                .map(|c| c.calculate_subtree_width(horizontal_spacing))
                .sum();
            let gaps = (self.children.len() - 1) as f64 * horizontal_spacing;
            own.max(stacked + gaps)
        };
        self.subtree_width = Some(w);
        w
    }

    pub fn subtree_height(&self) -> Option<f64> {
        self.subtree_height
    }

    pub fn subtree_width(&self) -> Option<f64> {
        self.subtree_width
    }

    pub fn get_subtree_top_y(&self) -> f64 {
        if self.children.is_empty() {
            return self.y;
        }
        self.children
            .iter()
            .map(HierarchyNode::get_subtree_top_y)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn get_subtree_bottom_y(&self) -> f64 {
        if self.children.is_empty() {
            return self.y + self.height.max(0.0);
        }
        self.children
            .iter()
            .map(HierarchyNode::get_subtree_bottom_y)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn get_subtree_left_x(&self) -> f64 {
        if self.children.is_empty() {
            return self.x;
        }
        self.children
            .iter()
            .map(HierarchyNode::get_subtree_left_x)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn get_subtree_right_x(&self) -> f64 {
        if self.children.is_empty() {
            return self.x + self.width.max(0.0);
        }
        self.children
            .iter()
            .map(HierarchyNode::get_subtree_right_x)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Translates this node and every descendant.
    pub fn adjust_subtree_position(&mut self, dy: f64, dx: f64) {
        self.y += dy;
        self.x += dx;
        for child in &mut self.children {
            child.adjust_subtree_position(dy, dx);
        }
    }

    /// Nudges sibling subtrees apart (or together) until every adjacent pair is `spacing` apart
    /// along the cross axis, then recurses.
    ///
    /// The total correction is centred on the parent: the first child moves back by the average
    /// error and each following child accumulates the errors before it. Errors within 0.1 are
    /// left alone. A node with zero or one child is a no-op, and so is everything below it.
    pub fn adjust_spacing(&mut self, horizontal: bool, spacing: f64) {
        if self.children.len() <= 1 {
            return;
        }

        let errors: Vec<f64> = self
            .children
            .windows(2)
            .map(|pair| {
                let gap = if horizontal {
                    pair[1].get_subtree_top_y() - pair[0].get_subtree_bottom_y()
                } else {
                    pair[1].get_subtree_left_x() - pair[0].get_subtree_right_x()
                };
                spacing - gap
            })
            .collect();

        if errors.iter().any(|e| e.abs() > 0.1) {
            let average = errors.iter().sum::<f64>() / self.children.len() as f64;
            let mut cumulative = -average;
            for (i, child) in self.children.iter_mut().enumerate() {
                if i > 0 {
                    cumulative += errors[i - 1];
                }
                if horizontal {
                    child.adjust_subtree_position(cumulative, 0.0);
                } else {
                    child.adjust_subtree_position(0.0, cumulative);
                }
            }
        }

        for child in &mut self.children {
            child.adjust_spacing(horizontal, spacing);
        }
    }

    /// Pre-order walk.
    pub fn each(&self, f: &mut impl FnMut(&HierarchyNode)) {
        f(self);
        for child in &self.children {
            child.each(f);
        }
    }
}
