use std::collections::HashSet;

use mindgrove_core::model::CLONE_PREFIX;
use mindgrove_core::{
    ClipboardManager, EngineConfig, GraphStore, IdGenerator, NodeKind, Point, Side,
};
use serde_json::json;

/// R -> A -> {A1, A2}, everything under A selected.
fn selected_branch() -> (GraphStore, Vec<String>) {
    let mut s = GraphStore::new().with_id_generator(IdGenerator::sequential("n"));
    let r = s.add_node_at(Point::ORIGIN);
    let a = s
        .add_child_node(&r, Point::new(-200.0, 0.0), Side::Left, NodeKind::Text)
        .unwrap()
        .node_id;
    let a1 = s
        .add_child_node(&a, Point::new(-400.0, -40.0), Side::Left, NodeKind::Text)
        .unwrap()
        .node_id;
    let a2 = s
        .add_child_node(&a, Point::new(-400.0, 40.0), Side::Left, NodeKind::Text)
        .unwrap()
        .node_id;
    let selected = vec![a, a1, a2];
    s.select_nodes(&selected);
    (s, selected)
}

#[test]
fn copy_captures_selected_nodes_and_the_edges_between_them() {
    let (s, selected) = selected_branch();
    let mut c = ClipboardManager::new();
    c.copy_selected_nodes_and_edges(&s);

    let ids: Vec<&str> = c.captured_nodes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, selected.iter().map(String::as_str).collect::<Vec<_>>());
    // R -> A is not captured because R is not selected.
    assert_eq!(c.captured_edges().len(), 2);
}

#[test]
fn copy_with_nothing_selected_keeps_the_previous_capture() {
    let (mut s, _) = selected_branch();
    let mut c = ClipboardManager::new();
    c.copy_selected_nodes_and_edges(&s);
    s.deselect_all_nodes_and_edges();
    c.copy_selected_nodes_and_edges(&s);
    assert_eq!(c.captured_nodes().len(), 3);
}

#[test]
fn paste_produces_disjoint_ids_and_fully_remapped_edges() {
    let (mut s, _) = selected_branch();
    let existing: HashSet<String> = s.nodes().iter().map(|n| n.id.clone()).collect();
    let edges_before = s.edges().len();

    let mut c = ClipboardManager::new();
    c.copy_selected_nodes_and_edges(&s);
    c.set_pointer_position(Point::new(500.0, 500.0));
    let pasted = c.paste_cloned_nodes_and_edges(&mut s);

    assert_eq!(pasted.len(), 3);
    assert!(pasted.iter().all(|id| !existing.contains(id)));

    let pasted_set: HashSet<&str> = pasted.iter().map(String::as_str).collect();
    let internal: Vec<_> = s
        .edges()
        .iter()
        .skip(edges_before)
        .filter(|e| {
            pasted_set.contains(e.target.as_str()) && pasted_set.contains(e.source.as_str())
        })
        .collect();
    assert_eq!(internal.len(), 2);
    for edge in s.edges() {
        assert!(s.node(&edge.source).is_some(), "dangling source {}", edge.source);
        assert!(s.node(&edge.target).is_some(), "dangling target {}", edge.target);
    }
}

#[test]
fn pasted_nodes_are_annotated_and_become_the_selection() {
    let (mut s, originals) = selected_branch();
    let mut c = ClipboardManager::new();
    c.copy_selected_nodes_and_edges(&s);
    let pasted = c.paste_cloned_nodes_and_edges(&mut s);

    for (old, new) in originals.iter().zip(&pasted) {
        let clone = s.node(new).unwrap();
        assert!(clone.selected);
        assert!(clone.data.content.is_clone());
        assert_eq!(
            clone.data.metadata.as_ref().map(|m| m.old_id.as_str()),
            Some(old.as_str())
        );
        assert!(!s.node(old).unwrap().selected);
    }
    let html = serde_json::to_value(&s.node(&pasted[0]).unwrap().data.content).unwrap();
    assert!(html["html"].as_str().unwrap().starts_with(CLONE_PREFIX));
}

#[test]
fn paste_places_the_capture_at_the_pointer_and_cascades() {
    let (mut s, _) = selected_branch();
    let mut c = ClipboardManager::new();
    c.copy_selected_nodes_and_edges(&s);
    c.set_pointer_position(Point::new(200.0, 200.0));

    let first = c.paste_cloned_nodes_and_edges(&mut s);
    assert_eq!(s.node(&first[0]).unwrap().position, Point::new(200.0, 200.0));
    assert_eq!(s.node(&first[1]).unwrap().position, Point::new(0.0, 160.0));
    assert_eq!(c.offset(), 20.0);

    let second = c.paste_cloned_nodes_and_edges(&mut s);
    assert_eq!(s.node(&second[0]).unwrap().position, Point::new(220.0, 220.0));
    assert_eq!(c.offset(), 40.0);

    c.set_pointer_position(Point::new(0.0, 0.0));
    assert_eq!(c.offset(), 0.0);
}

#[test]
fn pasted_branch_hangs_off_the_original_parent() {
    let (mut s, originals) = selected_branch();
    let parent = s.node(&originals[0]).unwrap().parent_id().unwrap().to_string();
    let mut c = ClipboardManager::new();
    c.copy_selected_nodes_and_edges(&s);
    let pasted = c.paste_cloned_nodes_and_edges(&mut s);

    let top = s.node(&pasted[0]).unwrap();
    assert_eq!(top.parent_id(), Some(parent.as_str()));
    let incoming: Vec<_> = s.edges().iter().filter(|e| e.target == pasted[0]).collect();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].source, parent);
}

#[test]
fn pasted_branch_whose_parent_is_gone_becomes_a_new_tree() {
    let (mut s, originals) = selected_branch();
    let root = s.node(&originals[0]).unwrap().parent_id().unwrap().to_string();
    let mut c = ClipboardManager::new();
    c.copy_selected_nodes_and_edges(&s);
    s.mark_node_for_deletion(&root).unwrap();
    s.finalize_node_deletion();
    assert!(s.nodes().is_empty());

    let pasted = c.paste_cloned_nodes_and_edges(&mut s);
    let top = s.node(&pasted[0]).unwrap();
    assert_eq!(top.kind, NodeKind::Root);
    assert_eq!(top.parent_id(), None);
    assert_eq!(top.level(), 0);
    assert_eq!(top.side(), Side::Mid);
    assert!(top.data.path_type.is_some());

    for id in &pasted[1..] {
        let child = s.node(id).unwrap();
        assert_eq!(child.parent_id(), Some(pasted[0].as_str()));
        assert_eq!(child.level(), 1);
        assert_eq!(child.kind, NodeKind::Text);
    }
    // Only the two internal edges; nothing dangles toward the deleted root.
    assert_eq!(s.edges().len(), 2);
    assert!(s.edges().iter().all(|e| e.source == pasted[0]));
}

#[test]
fn pasted_levels_follow_the_current_parent() {
    let (mut s, originals) = selected_branch();
    s.select_nodes(&[originals[1].clone()]);
    let mut c = ClipboardManager::new();
    c.copy_selected_nodes_and_edges(&s);
    let pasted = c.paste_cloned_nodes_and_edges(&mut s);

    let clone = s.node(&pasted[0]).unwrap();
    assert_eq!(clone.parent_id(), Some(originals[0].as_str()));
    assert_eq!(clone.level(), 2);
}

#[test]
fn paste_with_an_empty_clipboard_changes_nothing() {
    let (mut s, _) = selected_branch();
    let before = s.snapshot();
    let mut c = ClipboardManager::new();
    assert!(c.paste_cloned_nodes_and_edges(&mut s).is_empty());
    assert_eq!(s.snapshot(), before);
    assert_eq!(c.offset(), 0.0);
}

#[test]
fn drag_target_and_offset_step_are_tracked() {
    let config = EngineConfig::with_overrides(&json!({ "clipboard": { "offsetStep": 5 } }));
    let (mut s, _) = selected_branch();
    let mut c = ClipboardManager::from_config(&config);
    c.copy_selected_nodes_and_edges(&s);
    c.paste_cloned_nodes_and_edges(&mut s);
    assert_eq!(c.offset(), 5.0);
    c.reset_offset();
    assert_eq!(c.offset(), 0.0);

    c.set_drag_target(Some("target-node-1".to_string()));
    assert_eq!(c.drag_target(), Some("target-node-1"));
    c.set_drag_target(None);
    assert_eq!(c.drag_target(), None);
}
