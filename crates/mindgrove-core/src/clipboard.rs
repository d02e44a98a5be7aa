//! Copy/paste of a selected subgraph.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::EngineConfig;
use crate::geom::Point;
use crate::model::{CloneMetadata, Edge, Node, NodeKind, Side};
use crate::store::GraphStore;

pub const DEFAULT_OFFSET_STEP: f64 = 20.0;

#[derive(Debug, Clone)]
pub struct ClipboardManager {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    pointer: Point,
    offset: f64,
    offset_step: f64,
    drag_target: Option<String>,
}

impl Default for ClipboardManager {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            pointer: Point::ORIGIN,
            offset: 0.0,
            offset_step: DEFAULT_OFFSET_STEP,
            drag_target: None,
        }
    }
}

impl ClipboardManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            offset_step: config
                .get_f64("clipboard.offsetStep")
                .unwrap_or(DEFAULT_OFFSET_STEP),
            ..Self::default()
        }
    }

    pub fn captured_nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn captured_edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn pointer_position(&self) -> Point {
        self.pointer
    }

    /// Moving the pointer restarts the paste cascade.
    pub fn set_pointer_position(&mut self, position: Point) {
        self.pointer = position;
        self.offset = 0.0;
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn reset_offset(&mut self) {
        self.offset = 0.0;
    }

    pub fn drag_target(&self) -> Option<&str> {
        self.drag_target.as_deref()
    }

    pub fn set_drag_target(&mut self, id: Option<String>) {
        self.drag_target = id;
    }

    pub fn clear(&mut self) {
        *self = Self {
            offset_step: self.offset_step,
            ..Self::default()
        };
    }

    /// Captures the selected nodes and the edges running between them. With nothing selected
    /// the previous capture is kept.
    pub fn copy_selected_nodes_and_edges(&mut self, store: &GraphStore) {
        let nodes: Vec<Node> = store.nodes().iter().filter(|n| n.selected).cloned().collect();
        if nodes.is_empty() {
            return;
        }
        let ids: FxHashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let edges: Vec<Edge> = store
            .edges()
            .iter()
            .filter(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
            .cloned()
            .collect();
        tracing::debug!(nodes = nodes.len(), edges = edges.len(), "copied selection");
        self.nodes = nodes;
        self.edges = edges;
    }

    /// Pastes a fresh copy of the capture at the pointer, returning the new node ids.
    ///
    /// The first captured node whose parent is outside the capture anchors the placement: it
    /// lands at `pointer + offset` and every other clone keeps its relative position. A clone
    /// whose parent was not captured stays attached to that parent when it still exists.
    pub fn paste_cloned_nodes_and_edges(&mut self, store: &mut GraphStore) -> Vec<String> {
        if self.nodes.is_empty() {
            return Vec::new();
        }

        let captured: FxHashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        let anchor = self
            .nodes
            .iter()
            .find(|n| n.parent_id().is_none_or(|p| !captured.contains(p)))
            .unwrap_or(&self.nodes[0])
            .position;

        let mut id_map: FxHashMap<String, String> = FxHashMap::default();
        for node in &self.nodes {
            id_map.insert(node.id.clone(), store.allocate_id());
        }

        let mut clones = Vec::with_capacity(self.nodes.len());
        let mut bridge_edges = Vec::new();
        for node in &self.nodes {
            let mut clone = node.clone();
            clone.id = id_map[&node.id].clone();
            clone.selected = true;
            clone.position = Point::new(
                self.pointer.x + (node.position.x - anchor.x) + self.offset,
                self.pointer.y + (node.position.y - anchor.y) + self.offset,
            );
            clone.data.is_deleting = false;
            clone.data.content.mark_cloned();
            clone.data.metadata = Some(CloneMetadata {
                old_id: node.id.clone(),
            });

            match clone.data.parent_id.clone() {
                Some(parent) if id_map.contains_key(&parent) => {
                    clone.data.parent_id = Some(id_map[&parent].clone());
                }
                Some(parent) if store.node(&parent).is_some() => {
                    if let Some(level) = store.node(&parent).map(Node::level) {
                        clone.data.level = level + 1;
                    }
                    let path_type = store
                        .root_of(&parent)
                        .and_then(|r| r.data.path_type)
                        .unwrap_or_default();
                    bridge_edges.push(Edge::structural(
                        store.allocate_id(),
                        &parent,
                        &clone.id,
                        clone.side(),
                        path_type,
                    ));
                }
                Some(_) => promote_to_root(&mut clone),
                None => {}
            }
            clones.push(clone);
        }
        rebase_levels(&mut clones);

        let mut edges = Vec::with_capacity(self.edges.len() + bridge_edges.len());
        for edge in &self.edges {
            let mut clone = edge.clone();
            clone.id = store.allocate_id();
            clone.selected = false;
            clone.data.is_deleting = false;
            if let Some(source) = id_map.get(&edge.source) {
                clone.source = source.clone();
            }
            if let Some(target) = id_map.get(&edge.target) {
                clone.target = target.clone();
            }
            let side = clones
                .iter()
                .find(|n| n.id == clone.target)
                .map(|n| n.side())
                .unwrap_or_default();
            clone.rehandle(side);
            edges.push(clone);
        }
        edges.extend(bridge_edges);

        let new_ids: Vec<String> = clones.iter().map(|n| n.id.clone()).collect();
        store.deselect_all_nodes_and_edges();
        store.nodes_mut().extend(clones);
        store.edges_mut().extend(edges);
        tracing::debug!(pasted = new_ids.len(), offset = self.offset, "pasted clones");

        self.offset += self.offset_step;
        new_ids
    }
}

/// A clone whose parent no longer exists starts a tree of its own.
fn promote_to_root(node: &mut Node) {
    node.kind = NodeKind::Root;
    node.data.parent_id = None;
    node.data.level = 0;
    node.data.side = Side::Mid;
    node.data.path_type.get_or_insert_default();
}

/// Re-derives `level` below every clone whose parent is outside the clone set, so each pasted
/// descendant sits exactly one level under its (cloned) parent.
fn rebase_levels(clones: &mut [Node]) {
    let index: FxHashMap<String, usize> = clones
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.clone(), i))
        .collect();
    let mut children: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    let mut queue = VecDeque::new();
    for (i, node) in clones.iter().enumerate() {
        match node.parent_id().and_then(|p| index.get(p)) {
            Some(&parent) => children.entry(parent).or_default().push(i),
            None => queue.push_back(i),
        }
    }

    let mut seen: FxHashSet<usize> = queue.iter().copied().collect();
    while let Some(i) = queue.pop_front() {
        let level = clones[i].data.level + 1;
        for &child in children.get(&i).map(Vec::as_slice).unwrap_or_default() {
            if seen.insert(child) {
                clones[child].data.level = level;
                queue.push_back(child);
            }
        }
    }
}
