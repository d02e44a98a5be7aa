//! Moving a subtree under a new parent.

use crate::error::{Error, Result};
use crate::history::HistoryManager;
use crate::model::{Edge, NodeKind, Side};
use crate::store::GraphStore;
use crate::traversal;

/// Reparents `source_id` (with its whole subtree) under `target_id`.
///
/// When the target is a root the moved branch lands on `fallback_side` (`Mid` means left);
/// otherwise it inherits the target's side. Levels and sides cascade through the subtree and the
/// incoming edge is re-sourced (or created). A target inside the moved subtree is rejected with
/// [`Error::CannotReparentIntoDescendant`] before anything, history included, is touched.
pub fn move_to_child(
    store: &mut GraphStore,
    history: &mut HistoryManager,
    source_id: &str,
    target_id: &str,
    fallback_side: Side,
) -> Result<()> {
    if source_id == target_id {
        return Ok(());
    }
    let source = store
        .node(source_id)
        .cloned()
        .ok_or_else(|| Error::node_not_found(source_id))?;
    let target = store
        .node(target_id)
        .cloned()
        .ok_or_else(|| Error::node_not_found(target_id))?;

    let descendants = traversal::descendant_ids(source_id, store.nodes());
    if descendants.contains(target_id) {
        tracing::warn!(source_id, target_id, "rejected reparent into own subtree");
        return Err(Error::CannotReparentIntoDescendant {
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
        });
    }

    history.push_to_undo_stack(store);

    let new_side = match (target.is_root(), fallback_side) {
        (true, Side::Mid) => Side::Left,
        (true, side) => side,
        (false, _) => target.side(),
    };
    let new_level = target.level() + 1;
    let level_delta = new_level - source.level();
    let side_changed = new_side != source.side();

    for node in store.nodes_mut().iter_mut() {
        if node.id == source_id {
            if node.kind == NodeKind::Root {
                node.kind = NodeKind::Text;
            }
            node.data.parent_id = Some(target_id.to_string());
            node.data.level = new_level;
            node.data.side = new_side;
        } else if descendants.contains(&node.id) {
            node.data.level += level_delta;
            node.data.side = new_side;
        }
    }

    let mut connected = false;
    for edge in store.edges_mut().iter_mut() {
        if edge.target == source_id {
            edge.source = target_id.to_string();
            edge.rehandle(new_side);
            connected = true;
        } else if side_changed && descendants.contains(&edge.target) {
            edge.rehandle(new_side);
        }
    }

    if !connected {
        let path_type = traversal::root_of(target_id, store.nodes())
            .and_then(|r| r.data.path_type)
            .unwrap_or_default();
        let edge_id = store.allocate_id();
        store.edges_mut().push(Edge::structural(
            edge_id,
            target_id,
            source_id,
            new_side,
            path_type,
        ));
    }

    tracing::debug!(
        source_id,
        target_id,
        side = new_side.as_str(),
        level_delta,
        moved = descendants.len() + 1,
        "reparented subtree"
    );
    Ok(())
}
