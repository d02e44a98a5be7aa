use mindgrove_core::{EngineConfig, GraphStore, HistoryManager, IdGenerator, NodeKind, Point, Side};
use serde_json::json;

fn store_with_root() -> (GraphStore, String) {
    let mut s = GraphStore::new().with_id_generator(IdGenerator::sequential("n"));
    let r = s.add_node_at(Point::ORIGIN);
    (s, r)
}

#[test]
fn undo_then_redo_round_trips_exact_snapshots() {
    let (mut s, r) = store_with_root();
    let mut h = HistoryManager::new();

    let before = s.snapshot();
    h.push_to_undo_stack(&s);
    s.add_child_node(&r, Point::ORIGIN, Side::Left, NodeKind::Text)
        .unwrap();
    let after = s.snapshot();

    assert!(h.undo(&mut s));
    assert_eq!(s.snapshot(), before);
    assert!(h.redo(&mut s));
    assert_eq!(s.snapshot(), after);
}

#[test]
fn undo_and_redo_on_empty_stacks_are_no_ops() {
    let (mut s, _) = store_with_root();
    let mut h = HistoryManager::new();
    let before = s.snapshot();

    assert!(!h.undo(&mut s));
    assert!(!h.redo(&mut s));
    assert_eq!(s.snapshot(), before);
    assert!(!h.can_undo());
    assert!(!h.can_redo());
}

#[test]
fn undo_stack_is_capped_and_evicts_the_oldest_entry() {
    let (mut s, r) = store_with_root();
    let mut h = HistoryManager::new();
    let first = s.snapshot();

    for _ in 0..51 {
        h.push_to_undo_stack(&s);
        s.add_child_node(&r, Point::ORIGIN, Side::Right, NodeKind::Text)
            .unwrap();
    }
    assert_eq!(h.undo_len(), 50);

    while h.undo(&mut s) {}
    assert_eq!(h.redo_len(), 50);
    // The very first pre-mutation snapshot was evicted by the 51st push.
    assert_ne!(s.snapshot(), first);
    assert_eq!(s.nodes().len(), 2);
}

#[test]
fn pushing_clears_the_redo_stack() {
    let (mut s, r) = store_with_root();
    let mut h = HistoryManager::new();

    h.push_to_undo_stack(&s);
    s.add_child_node(&r, Point::ORIGIN, Side::Left, NodeKind::Text)
        .unwrap();
    h.undo(&mut s);
    assert!(h.can_redo());

    h.push_to_undo_stack(&s);
    assert!(!h.can_redo());
}

#[test]
fn prepared_snapshots_are_only_recorded_on_commit() {
    let (mut s, r) = store_with_root();
    let mut h = HistoryManager::new();

    let before = s.snapshot();
    h.prepare(s.snapshot());
    s.add_child_node(&r, Point::ORIGIN, Side::Left, NodeKind::Text)
        .unwrap();
    assert_eq!(h.undo_len(), 0);

    assert!(h.commit_prepared());
    assert!(!h.commit_prepared());
    assert_eq!(h.undo_len(), 1);

    h.undo(&mut s);
    assert_eq!(s.snapshot(), before);
}

#[test]
fn capacity_comes_from_config() {
    let config = EngineConfig::with_overrides(&json!({ "history": { "capacity": 3 } }));
    let h = HistoryManager::from_config(&config);
    assert_eq!(h.capacity(), 3);

    let h = HistoryManager::from_config(&EngineConfig::default());
    assert_eq!(h.capacity(), 50);
}
