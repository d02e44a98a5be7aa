//! One editing session: the services wired together around every input event.

use mindgrove_core::traversal::get_subtree_nodes;
use mindgrove_core::{
    AddedChild, ClipboardManager, Document, Edge, EngineConfig, GraphStore, HistoryManager,
    IdGenerator, Node, NodeKind, PathType, Point, Side, SiblingOrders, move_to_child,
};
use mindgrove_layout::{LayoutDirection, LayoutEngine, LayoutOutput, LayoutStrategy};
use serde_json::Value;

use crate::error::{MindmapError, Result};

/// A mind-map editing session.
///
/// Structural operations record the pre-mutation state for undo (only when they succeed) and,
/// with `layout.auto` set, re-run the forest layout afterwards.
#[derive(Debug, Clone)]
pub struct Mindmap {
    config: EngineConfig,
    store: GraphStore,
    history: HistoryManager,
    clipboard: ClipboardManager,
    layout: LayoutEngine,
    is_layouting: bool,
}

impl Default for Mindmap {
    fn default() -> Self {
        Self::from_config(EngineConfig::default())
    }
}

impl Mindmap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: EngineConfig) -> Self {
        Self {
            store: GraphStore::new(),
            history: HistoryManager::from_config(&config),
            clipboard: ClipboardManager::from_config(&config),
            layout: LayoutEngine::from_config(&config),
            is_layouting: false,
            config,
        }
    }

    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.store = self.store.with_id_generator(ids);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn clipboard(&self) -> &ClipboardManager {
        &self.clipboard
    }

    pub fn layout_engine(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn nodes(&self) -> &[Node] {
        self.store.nodes()
    }

    pub fn edges(&self) -> &[Edge] {
        self.store.edges()
    }

    fn auto_layout_enabled(&self) -> bool {
        self.config.get_bool("layout.auto").unwrap_or(false)
    }

    /// Runs `op` against the store, recording the prior state only if it succeeds.
    fn structural<T>(
        &mut self,
        op: impl FnOnce(&mut GraphStore) -> mindgrove_core::Result<T>,
    ) -> Result<T> {
        let before = self.store.snapshot();
        let out = op(&mut self.store)?;
        self.history.prepare(before);
        self.history.commit_prepared();
        self.after_structural_change();
        Ok(out)
    }

    fn after_structural_change(&mut self) {
        if self.auto_layout_enabled() {
            self.layout();
        }
    }

    // Advisory animation flag. Nothing here blocks mutations while it is set.

    pub fn is_layouting(&self) -> bool {
        self.is_layouting
    }

    pub fn begin_layout_transition(&mut self) {
        self.is_layouting = true;
    }

    pub fn end_layout_transition(&mut self) {
        self.is_layouting = false;
    }

    pub fn add_node(&mut self) -> String {
        self.history.push_to_undo_stack(&self.store);
        let id = self.store.add_node();
        self.after_structural_change();
        id
    }

    pub fn add_node_at(&mut self, position: Point) -> String {
        self.history.push_to_undo_stack(&self.store);
        let id = self.store.add_node_at(position);
        self.after_structural_change();
        id
    }

    pub fn add_child_node(
        &mut self,
        parent_id: &str,
        position: Point,
        side: Side,
    ) -> Result<AddedChild> {
        self.add_child_node_of_kind(parent_id, position, side, NodeKind::Text)
    }

    pub fn add_child_node_of_kind(
        &mut self,
        parent_id: &str,
        position: Point,
        side: Side,
        kind: NodeKind,
    ) -> Result<AddedChild> {
        self.structural(|s| s.add_child_node(parent_id, position, side, kind))
    }

    /// Adds a child on the side the current layout strategy picks for `parent_id`.
    pub fn add_child_node_on_default_side(
        &mut self,
        parent_id: &str,
        position: Point,
    ) -> Result<AddedChild> {
        let parent = self
            .store
            .node(parent_id)
            .ok_or_else(|| mindgrove_core::Error::NodeNotFound {
                id: parent_id.to_string(),
            })?;
        let existing: Vec<&Node> = self
            .store
            .nodes()
            .iter()
            .filter(|n| n.parent_id() == Some(parent_id))
            .collect();
        let side = self.layout.strategy().default_child_side(parent, &existing);
        self.add_child_node(parent_id, position, side)
    }

    /// Content edits; not recorded in history.
    pub fn update_node_data(&mut self, id: &str, patch: &Value) -> Result<()> {
        Ok(self.store.update_node_data(id, patch)?)
    }

    pub fn update_node_data_with_undo(&mut self, id: &str, patch: &Value) -> Result<()> {
        let before = self.store.snapshot();
        self.store.update_node_data(id, patch)?;
        self.history.prepare(before);
        self.history.commit_prepared();
        Ok(())
    }

    pub fn mark_node_for_deletion(&mut self, id: &str) -> Result<Vec<String>> {
        self.structural(|s| s.mark_node_for_deletion(id))
    }

    /// Called by the host once its exit transition has finished.
    pub fn finalize_node_deletion(&mut self) -> usize {
        let removed = self.store.finalize_node_deletion();
        if removed > 0 {
            self.after_structural_change();
        }
        removed
    }

    pub fn delete_selected_nodes(&mut self) -> Vec<String> {
        if self.store.selected_node_ids().is_empty() {
            return Vec::new();
        }
        self.history.push_to_undo_stack(&self.store);
        let flagged = self.store.delete_selected_nodes();
        self.after_structural_change();
        flagged
    }

    pub fn select_all_nodes_and_edges(&mut self) {
        self.store.select_all_nodes_and_edges();
    }

    pub fn deselect_all_nodes_and_edges(&mut self) {
        self.store.deselect_all_nodes_and_edges();
    }

    pub fn select_nodes(&mut self, ids: &[String]) {
        self.store.select_nodes(ids);
    }

    pub fn toggle_collapse(&mut self, id: &str, side: Side, collapse: bool) -> Result<()> {
        self.structural(|s| s.toggle_collapse(id, side, collapse))
    }

    pub fn update_subtree_edge_path_type(
        &mut self,
        root_id: &str,
        path_type: PathType,
    ) -> Result<()> {
        self.structural(|s| s.update_subtree_edge_path_type(root_id, path_type))
    }

    pub fn update_subtree_edge_color(&mut self, root_id: &str, color: &str) -> Result<()> {
        self.structural(|s| s.update_subtree_edge_color(root_id, color))
    }

    pub fn move_to_child(
        &mut self,
        source_id: &str,
        target_id: &str,
        fallback_side: Side,
    ) -> Result<()> {
        move_to_child(
            &mut self.store,
            &mut self.history,
            source_id,
            target_id,
            fallback_side,
        )?;
        self.after_structural_change();
        Ok(())
    }

    pub fn set_drag_target(&mut self, id: Option<String>) {
        self.clipboard.set_drag_target(id);
    }

    /// Reparents `source_id` onto the current drag target. Returns `false` when no target is
    /// set; the target is cleared either way.
    pub fn drop_on_drag_target(&mut self, source_id: &str, fallback_side: Side) -> Result<bool> {
        let Some(target) = self.clipboard.drag_target().map(str::to_string) else {
            return Ok(false);
        };
        self.clipboard.set_drag_target(None);
        self.move_to_child(source_id, &target, fallback_side)?;
        Ok(true)
    }

    pub fn copy(&mut self) {
        self.clipboard.copy_selected_nodes_and_edges(&self.store);
    }

    pub fn set_pointer_position(&mut self, position: Point) {
        self.clipboard.set_pointer_position(position);
    }

    pub fn paste(&mut self) -> Vec<String> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        self.history.push_to_undo_stack(&self.store);
        let ids = self.clipboard.paste_cloned_nodes_and_edges(&mut self.store);
        self.after_structural_change();
        ids
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.store)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.store)
    }

    /// Lays out the live graph and writes the new positions back. On a recovered failure the
    /// store is left as it was.
    pub fn layout(&mut self) -> LayoutOutput {
        let out = self.layout.layout(self.store.nodes(), self.store.edges());
        if out.recovered.is_none() {
            self.store.apply_layout(&out.nodes);
        }
        out
    }

    /// Re-lays out only the subtree under `node_id`, which keeps its own position. Like
    /// [`Mindmap::layout`] this is not recorded in history.
    pub fn update_subtree_layout(&mut self, node_id: &str) -> Result<LayoutOutput> {
        let subtree: Vec<Node> = get_subtree_nodes(node_id, self.store.nodes())
            .into_iter()
            .cloned()
            .collect();
        let Some((root, descendants)) = subtree.split_first() else {
            return Err(mindgrove_core::Error::NodeNotFound {
                id: node_id.to_string(),
            }
            .into());
        };
        let edges: Vec<Edge> = self
            .store
            .edges()
            .iter()
            .filter(|e| subtree.iter().any(|n| n.id == e.target))
            .filter(|e| subtree.iter().any(|n| n.id == e.source))
            .cloned()
            .collect();

        let out = self.layout.layout_subtree(root, descendants, &edges);
        if out.recovered.is_none() {
            self.store.apply_layout(&out.nodes);
        }
        tracing::debug!(node_id, nodes = subtree.len(), "updated subtree layout");
        Ok(out)
    }

    /// Like [`Mindmap::layout`], but reports a recovered failure as an error.
    pub fn try_layout(&mut self) -> Result<()> {
        match self.layout().recovered {
            Some(err) => Err(MindmapError::Layout(err)),
            None => Ok(()),
        }
    }

    /// Switches direction and re-lays out, as one undoable step.
    pub fn change_layout_direction(&mut self, direction: LayoutDirection) -> LayoutOutput {
        self.history.prepare(self.store.snapshot());
        self.layout.set_direction(direction);
        self.config
            .set_value("layout.direction", Value::String(direction.as_str().to_string()));
        let out = self.layout();
        self.history.commit_prepared();
        tracing::debug!(direction = direction.as_str(), "changed layout direction");
        out
    }

    pub fn set_layout_strategy(&mut self, strategy: LayoutStrategy) {
        self.layout.set_strategy(strategy);
    }

    /// Switches strategy and re-lays out, as one undoable step.
    pub fn change_layout_strategy(&mut self, strategy: LayoutStrategy) -> LayoutOutput {
        self.history.prepare(self.store.snapshot());
        self.layout.set_strategy(strategy);
        self.config
            .set_value("layout.strategy", Value::String(strategy.as_str().to_string()));
        let out = self.layout();
        self.history.commit_prepared();
        tracing::debug!(strategy = strategy.as_str(), "changed layout strategy");
        out
    }

    /// Re-ranks `id` among its siblings after a drag ended with its centre at `dropped_at`.
    ///
    /// The axis comes from the current strategy and direction. Returns `false`, recording
    /// nothing, when the drop keeps the node's rank.
    pub fn reorder_sibling_by_drag(&mut self, id: &str, dropped_at: Point) -> Result<bool> {
        let before = self.store.snapshot();
        let axis = self.layout.order_axis();
        if !self.store.reorder_sibling_by_drag(id, dropped_at, axis)? {
            return Ok(false);
        }
        self.history.prepare(before);
        self.history.commit_prepared();
        self.after_structural_change();
        Ok(true)
    }

    /// Freezes the current on-screen order of every sibling group into `siblingOrder`.
    pub fn infer_sibling_orders(&mut self) -> SiblingOrders {
        self.history.push_to_undo_stack(&self.store);
        let axis = self.layout.order_axis();
        self.store.infer_sibling_orders(axis)
    }

    pub fn export_document(&self) -> Document {
        self.store.snapshot()
    }

    /// Replaces the session contents. History and clipboard start over.
    pub fn import_document(&mut self, doc: Document) {
        tracing::debug!(
            nodes = doc.nodes.len(),
            edges = doc.edges.len(),
            "importing document"
        );
        self.store.restore(doc);
        self.history.clear();
        self.clipboard.clear();
        self.is_layouting = false;
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(self.export_document().to_json()?)
    }

    pub fn import_json(&mut self, text: &str) -> Result<()> {
        let doc = Document::from_json(text)?;
        self.import_document(doc);
        Ok(())
    }
}
