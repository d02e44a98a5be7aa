//! Canonical node/edge collections and their structural mutation primitives.

use indexmap::IndexSet;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::geom::Point;
use crate::ids::IdGenerator;
use crate::model::{
    DeletionState, Document, Edge, Node, NodeContent, NodeData, NodeKind, PathType,
    STRUCTURAL_FIELDS, Side,
};
use crate::sibling::{self, OrderAxis, SiblingOrders};
use crate::traversal;

/// Ids allocated by [`GraphStore::add_child_node`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedChild {
    pub node_id: String,
    pub edge_id: String,
}

#[derive(Debug, Clone)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    pending_deletion: IndexSet<String>,
    removed: FxHashSet<String>,
    ids: IdGenerator,
    rng: SmallRng,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            pending_deletion: IndexSet::new(),
            removed: FxHashSet::default(),
            ids: IdGenerator::default(),
            rng: SmallRng::from_entropy(),
        }
    }
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(doc: Document) -> Self {
        let mut store = Self::default();
        store.restore(doc);
        store
    }

    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// Seeds the scatter placement used by [`GraphStore::add_node`].
    pub fn with_scatter_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }

    pub(crate) fn edges_mut(&mut self) -> &mut Vec<Edge> {
        &mut self.edges
    }

    pub fn snapshot(&self) -> Document {
        Document::new(self.nodes.clone(), self.edges.clone())
    }

    /// Replaces the live collections. Pending deletions are re-derived from `isDeleting` flags so
    /// a restored snapshot carries its own deletion state; the record of removed ids starts over.
    pub fn restore(&mut self, doc: Document) {
        self.nodes = doc.nodes;
        self.edges = doc.edges;
        self.removed.clear();
        self.pending_deletion = self
            .nodes
            .iter()
            .filter(|n| n.data.is_deleting)
            .map(|n| n.id.clone())
            .collect();
    }

    /// Copies positions and sides from `laid_out` onto live nodes with the same id.
    ///
    /// A node whose side changed gets its incoming edges rehandled for the new side.
    pub fn apply_layout(&mut self, laid_out: &[Node]) {
        let index = traversal::node_index(laid_out);
        let mut flipped: FxHashSet<&str> = FxHashSet::default();
        for node in &mut self.nodes {
            let Some(p) = index.get(node.id.as_str()) else {
                continue;
            };
            node.position = p.position;
            if node.data.side != p.data.side {
                node.data.side = p.data.side;
                flipped.insert(p.id.as_str());
            }
        }
        if flipped.is_empty() {
            return;
        }
        for edge in &mut self.edges {
            if let Some(target) = flipped.get(edge.target.as_str()) {
                if let Some(p) = index.get(target) {
                    edge.rehandle(p.data.side);
                }
            }
        }
        tracing::debug!(flipped = flipped.len(), "layout changed node sides");
    }

    pub(crate) fn allocate_id(&mut self) -> String {
        let nodes = &self.nodes;
        let edges = &self.edges;
        self.ids.next_unused(|id| {
            nodes.iter().any(|n| n.id == id) || edges.iter().any(|e| e.id == id)
        })
    }

    /// Adds an unattached root at a scattered position.
    ///
    /// Placement is random on purpose; use [`GraphStore::add_node_at`] for a fixed position.
    pub fn add_node(&mut self) -> String {
        let position = Point::new(
            self.rng.gen_range(100.0..600.0),
            self.rng.gen_range(100.0..500.0),
        );
        self.add_node_at(position)
    }

    pub fn add_node_at(&mut self, position: Point) -> String {
        let id = self.allocate_id();
        let label = format!("New Node {}", self.nodes.len() + 1);
        self.nodes
            .push(Node::root(id.clone(), position, NodeContent::text(&label)));
        tracing::debug!(node_id = %id, "added root node");
        id
    }

    /// Creates a child node and its parent edge in one step.
    ///
    /// Children of a non-root parent always inherit the parent's side. A `Mid` request under a
    /// root is placed on the right.
    pub fn add_child_node(
        &mut self,
        parent_id: &str,
        position: Point,
        side: Side,
        kind: NodeKind,
    ) -> Result<AddedChild> {
        let parent = self
            .node(parent_id)
            .cloned()
            .ok_or_else(|| Error::node_not_found(parent_id))?;

        let side = match (parent.is_root(), side) {
            (false, _) => parent.side(),
            (true, Side::Mid) => Side::Right,
            (true, side) => side,
        };
        let kind = if kind == NodeKind::Root {
            NodeKind::Text
        } else {
            kind
        };
        let path_type = traversal::root_of(parent_id, &self.nodes)
            .and_then(|root| root.data.path_type)
            .unwrap_or_default();

        // Only groups that already carry explicit orders keep numbering new members.
        let siblings = self.children_on(parent_id, side);
        let sibling_order = siblings
            .iter()
            .any(|n| n.data.sibling_order.is_some())
            .then(|| sibling::next_sibling_order(&siblings));

        let node_id = self.allocate_id();
        let mut child = Node::child(
            node_id.clone(),
            kind,
            &parent,
            side,
            position,
            NodeContent::default_for(kind, &node_id),
        );
        child.data.sibling_order = sibling_order;
        self.nodes.push(child);

        let edge_id = self.allocate_id();
        self.edges.push(Edge::structural(
            edge_id.clone(),
            parent_id,
            &node_id,
            side,
            path_type,
        ));
        tracing::debug!(%node_id, %edge_id, parent_id, side = side.as_str(), "added child node");

        Ok(AddedChild { node_id, edge_id })
    }

    /// Shallow-merges `patch` (a JSON object of camelCase data fields) into a node's data.
    ///
    /// `parentId`, `level` and `side` are rejected; they only change through reparenting.
    /// `isDeleting` is rejected too; use [`GraphStore::mark_node_for_deletion`].
    pub fn update_node_data(&mut self, id: &str, patch: &Value) -> Result<()> {
        let Some(fields) = patch.as_object() else {
            return Err(Error::InvalidPatch {
                message: "patch must be a JSON object".to_string(),
            });
        };
        if let Some(field) = fields
            .keys()
            .find(|k| STRUCTURAL_FIELDS.contains(&k.as_str()))
        {
            return Err(Error::StructuralField {
                field: field.clone(),
            });
        }

        let node = self.node_mut(id).ok_or_else(|| Error::node_not_found(id))?;
        let mut merged = serde_json::to_value(&node.data)?;
        if let Value::Object(map) = &mut merged {
            for (key, value) in fields {
                map.insert(key.clone(), value.clone());
            }
        }
        let data: NodeData =
            serde_json::from_value(merged).map_err(|err| Error::InvalidPatch {
                message: err.to_string(),
            })?;
        node.data = data;
        Ok(())
    }

    /// Flags `id`, its whole subtree, and every edge touching them as deleting.
    ///
    /// Nothing is removed until [`GraphStore::finalize_node_deletion`]. Returns the flagged ids.
    pub fn mark_node_for_deletion(&mut self, id: &str) -> Result<Vec<String>> {
        if self.node(id).is_none() {
            return Err(Error::node_not_found(id));
        }
        let doomed = traversal::subtree_ids(id, &self.nodes);

        for node in &mut self.nodes {
            if doomed.contains(&node.id) {
                node.data.is_deleting = true;
            }
        }
        for edge in &mut self.edges {
            if doomed.contains(&edge.source) || doomed.contains(&edge.target) {
                edge.data.is_deleting = true;
            }
        }
        self.pending_deletion.extend(doomed.iter().cloned());
        tracing::debug!(node_id = id, flagged = doomed.len(), "marked subtree for deletion");

        Ok(doomed.into_iter().collect())
    }

    /// Removes everything flagged by [`GraphStore::mark_node_for_deletion`]. Returns the number
    /// of nodes removed; with nothing pending this is a no-op returning `0`.
    pub fn finalize_node_deletion(&mut self) -> usize {
        if self.pending_deletion.is_empty() {
            return 0;
        }
        let pending = std::mem::take(&mut self.pending_deletion);

        let before = self.nodes.len();
        let mut gone: FxHashSet<String> = FxHashSet::default();
        self.nodes.retain(|n| {
            let remove = pending.contains(&n.id) || n.data.is_deleting;
            if remove {
                gone.insert(n.id.clone());
            }
            !remove
        });
        self.edges.retain(|e| {
            !e.data.is_deleting && !gone.contains(&e.source) && !gone.contains(&e.target)
        });

        let removed = before - self.nodes.len();
        tracing::debug!(removed, "finalized node deletion");
        self.removed.extend(gone);
        self.normalize_sibling_orders();
        removed
    }

    pub fn pending_deletion(&self) -> impl Iterator<Item = &str> {
        self.pending_deletion.iter().map(String::as_str)
    }

    pub fn deletion_state(&self, id: &str) -> Option<DeletionState> {
        match self.node(id) {
            Some(n) if n.data.is_deleting => Some(DeletionState::PendingDeletion),
            Some(_) => Some(DeletionState::Active),
            None if self.removed.contains(id) => Some(DeletionState::Removed),
            None => None,
        }
    }

    /// Marks every selected node for deletion. Returns all flagged ids.
    pub fn delete_selected_nodes(&mut self) -> Vec<String> {
        let selected: Vec<String> = self.selected_node_ids();
        let mut flagged: IndexSet<String> = IndexSet::new();
        for id in selected {
            if flagged.contains(&id) {
                continue;
            }
            if let Ok(ids) = self.mark_node_for_deletion(&id) {
                flagged.extend(ids);
            }
        }
        flagged.into_iter().collect()
    }

    pub fn selected_node_ids(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|n| n.selected)
            .map(|n| n.id.clone())
            .collect()
    }

    pub fn select_all_nodes_and_edges(&mut self) {
        self.set_all_selected(true);
    }

    pub fn deselect_all_nodes_and_edges(&mut self) {
        self.set_all_selected(false);
    }

    fn set_all_selected(&mut self, selected: bool) {
        for node in &mut self.nodes {
            node.selected = selected;
        }
        for edge in &mut self.edges {
            edge.selected = selected;
        }
    }

    /// Makes exactly `ids` the node selection.
    pub fn select_nodes(&mut self, ids: &[String]) {
        for node in &mut self.nodes {
            node.selected = ids.contains(&node.id);
        }
    }

    pub fn root_of(&self, id: &str) -> Option<&Node> {
        traversal::root_of(id, &self.nodes)
    }

    pub fn has_left_children(&self, id: &str) -> bool {
        traversal::has_children_on(id, Side::Left, &self.nodes)
    }

    pub fn has_right_children(&self, id: &str) -> bool {
        traversal::has_children_on(id, Side::Right, &self.nodes)
    }

    /// Hides (or re-shows) the descendants of `id` on `side`.
    ///
    /// Collapsing records `id` as `collapsedBy` unless an outer ancestor already hid the node;
    /// expanding only re-shows nodes hidden by `id` itself.
    pub fn toggle_collapse(&mut self, id: &str, side: Side, collapse: bool) -> Result<()> {
        if self.node(id).is_none() {
            return Err(Error::node_not_found(id));
        }
        let affected: FxHashSet<String> = traversal::descendant_ids(id, &self.nodes)
            .into_iter()
            .filter(|d| self.node(d).is_some_and(|n| n.side() == side))
            .collect();

        for node in &mut self.nodes {
            if node.id == id {
                match side {
                    Side::Left => node.data.is_left_children_collapsed = collapse,
                    Side::Right => node.data.is_right_children_collapsed = collapse,
                    Side::Mid => {}
                }
                continue;
            }
            if !affected.contains(&node.id) {
                continue;
            }
            if collapse {
                node.data.is_collapsed = true;
                if node.data.collapsed_by.is_none() {
                    node.data.collapsed_by = Some(id.to_string());
                }
            } else if node.data.collapsed_by.as_deref() == Some(id) {
                node.data.is_collapsed = false;
                node.data.collapsed_by = None;
            }
        }

        let nodes = &self.nodes;
        for edge in &mut self.edges {
            if affected.contains(&edge.source) || affected.contains(&edge.target) {
                edge.data.is_collapsed = nodes
                    .iter()
                    .find(|n| n.id == edge.target)
                    .is_some_and(|n| n.data.is_collapsed);
            }
        }
        Ok(())
    }

    pub fn collapse(&mut self, id: &str, side: Side) -> Result<()> {
        self.toggle_collapse(id, side, true)
    }

    pub fn expand(&mut self, id: &str, side: Side) -> Result<()> {
        self.toggle_collapse(id, side, false)
    }

    /// Sets `pathType` on a root and on every edge touching its subtree.
    pub fn update_subtree_edge_path_type(
        &mut self,
        root_id: &str,
        path_type: PathType,
    ) -> Result<()> {
        let members = self.subtree_members(root_id)?;
        if let Some(root) = self.node_mut(root_id).filter(|n| n.is_root()) {
            root.data.path_type = Some(path_type);
        }
        for edge in &mut self.edges {
            if members.contains(&edge.source) || members.contains(&edge.target) {
                edge.data.path_type = Some(path_type);
            }
        }
        Ok(())
    }

    /// Sets the edge color on a root and the stroke color of every edge touching its subtree.
    pub fn update_subtree_edge_color(&mut self, root_id: &str, color: &str) -> Result<()> {
        let members = self.subtree_members(root_id)?;
        if let Some(root) = self.node_mut(root_id).filter(|n| n.is_root()) {
            root.data.edge_color = Some(color.to_string());
        }
        for edge in &mut self.edges {
            if members.contains(&edge.source) || members.contains(&edge.target) {
                edge.data.stroke_color = Some(color.to_string());
            }
        }
        Ok(())
    }

    /// Children of `parent_id` growing on `side`, in layout order.
    pub fn children_on(&self, parent_id: &str, side: Side) -> Vec<&Node> {
        let mut kids: Vec<&Node> = self
            .nodes
            .iter()
            .filter(|n| n.parent_id() == Some(parent_id) && n.side() == side)
            .collect();
        kids.sort_by_key(|n| n.data.sibling_order.unwrap_or(u32::MAX));
        kids
    }

    /// `id` and the other children of its parent on the same side. Empty for roots.
    pub fn sibling_group(&self, id: &str) -> Vec<&Node> {
        match self.node(id).and_then(|n| Some((n.parent_id()?, n.side()))) {
            Some((parent, side)) => self.children_on(parent, side),
            None => Vec::new(),
        }
    }

    pub fn apply_sibling_orders(&mut self, orders: &SiblingOrders) {
        for node in &mut self.nodes {
            if let Some(order) = orders.get(&node.id) {
                node.data.sibling_order = Some(*order);
            }
        }
    }

    /// Sets every non-root node's order from where it currently sits along `axis`.
    pub fn infer_sibling_orders(&mut self, axis: OrderAxis) -> SiblingOrders {
        let orders = sibling::infer_order_for_all_nodes(&self.nodes, axis);
        self.apply_sibling_orders(&orders);
        orders
    }

    /// Renumbers each sibling group that carries explicit orders to `0..n` without gaps.
    pub fn normalize_sibling_orders(&mut self) {
        let mut groups: IndexSet<(String, Side)> = IndexSet::new();
        for node in &self.nodes {
            if let (Some(parent), Some(_)) = (node.parent_id(), node.data.sibling_order) {
                groups.insert((parent.to_string(), node.side()));
            }
        }
        let mut orders = SiblingOrders::new();
        for (parent, side) in &groups {
            orders.extend(sibling::normalize_sibling_orders(
                &self.children_on(parent, *side),
            ));
        }
        self.apply_sibling_orders(&orders);
    }

    /// Re-ranks `id` among its siblings as if its centre were dropped at `dropped_at`.
    ///
    /// Returns `false` (and changes nothing) when the drop keeps its rank.
    pub fn reorder_sibling_by_drag(
        &mut self,
        id: &str,
        dropped_at: Point,
        axis: OrderAxis,
    ) -> Result<bool> {
        let node = self.node(id).ok_or_else(|| Error::node_not_found(id))?;
        let parent = node
            .parent_id()
            .and_then(|p| self.node(p))
            .map(sibling::center_of);
        let group = self.sibling_group(id);
        let Some(orders) = sibling::detect_reorder_from_drag(id, dropped_at, &group, axis, parent)
        else {
            return Ok(false);
        };
        self.apply_sibling_orders(&orders);
        tracing::debug!(node_id = id, order = ?orders.get(id), "reordered sibling");
        Ok(true)
    }

    fn subtree_members(&self, id: &str) -> Result<IndexSet<String>> {
        if self.node(id).is_none() {
            return Err(Error::node_not_found(id));
        }
        Ok(traversal::subtree_ids(id, &self.nodes))
    }
}
