use mindgrove_core::model::handle_id;
use mindgrove_core::{
    Error, GraphStore, HistoryManager, IdGenerator, NodeKind, Point, Side, move_to_child,
};

struct Fixture {
    store: GraphStore,
    history: HistoryManager,
    r: String,
    a: String,
    b: String,
    a1: String,
}

/// R has A (left, with child A1) and B (right).
fn fixture() -> Fixture {
    let mut store = GraphStore::new().with_id_generator(IdGenerator::sequential("n"));
    let r = store.add_node_at(Point::ORIGIN);
    let a = store
        .add_child_node(&r, Point::ORIGIN, Side::Left, NodeKind::Text)
        .unwrap()
        .node_id;
    let b = store
        .add_child_node(&r, Point::ORIGIN, Side::Right, NodeKind::Text)
        .unwrap()
        .node_id;
    let a1 = store
        .add_child_node(&a, Point::ORIGIN, Side::Left, NodeKind::Text)
        .unwrap()
        .node_id;
    Fixture {
        store,
        history: HistoryManager::new(),
        r,
        a,
        b,
        a1,
    }
}

#[test]
fn moving_a_left_branch_under_a_right_branch() {
    let mut f = fixture();
    let edge_id = f
        .store
        .edges()
        .iter()
        .find(|e| e.target == f.a)
        .unwrap()
        .id
        .clone();

    move_to_child(&mut f.store, &mut f.history, &f.a, &f.b, Side::Right).unwrap();

    let a = f.store.node(&f.a).unwrap();
    assert_eq!(a.parent_id(), Some(f.b.as_str()));
    assert_eq!(a.level(), 2);
    assert_eq!(a.side(), Side::Right);

    let edge = f.store.edge(&edge_id).unwrap();
    assert_eq!(edge.source, f.b);
    assert_eq!(edge.target, f.a);
    assert_eq!(edge.source_handle, Some(handle_id(Side::Right, &f.b, true)));
    assert_eq!(edge.target_handle, Some(handle_id(Side::Right, &f.a, false)));
    assert_eq!(f.store.edges().iter().filter(|e| e.target == f.a).count(), 1);
    assert_eq!(f.history.undo_len(), 1);
}

#[test]
fn level_and_side_cascade_through_the_moved_subtree() {
    let mut f = fixture();
    move_to_child(&mut f.store, &mut f.history, &f.a, &f.b, Side::Left).unwrap();

    let a1 = f.store.node(&f.a1).unwrap();
    assert_eq!(a1.level(), 3);
    assert_eq!(a1.side(), Side::Right);

    let inner = f.store.edges().iter().find(|e| e.target == f.a1).unwrap();
    assert_eq!(inner.source, f.a);
    assert_eq!(inner.source_handle, Some(handle_id(Side::Right, &f.a, true)));
    assert_eq!(inner.target_handle, Some(handle_id(Side::Right, &f.a1, false)));
}

#[test]
fn moving_under_a_root_uses_the_fallback_side() {
    let mut f = fixture();
    move_to_child(&mut f.store, &mut f.history, &f.a1, &f.r, Side::Right).unwrap();

    let a1 = f.store.node(&f.a1).unwrap();
    assert_eq!(a1.parent_id(), Some(f.r.as_str()));
    assert_eq!(a1.level(), 1);
    assert_eq!(a1.side(), Side::Right);
}

#[test]
fn moving_into_an_own_descendant_is_rejected_without_changes() {
    let mut f = fixture();
    let before = f.store.snapshot();

    let err = move_to_child(&mut f.store, &mut f.history, &f.a, &f.a1, Side::Left).unwrap_err();
    assert!(matches!(err, Error::CannotReparentIntoDescendant { .. }));
    assert_eq!(f.store.snapshot(), before);
    assert!(!f.history.can_undo());
}

#[test]
fn moving_onto_itself_is_a_no_op() {
    let mut f = fixture();
    let before = f.store.snapshot();
    move_to_child(&mut f.store, &mut f.history, &f.a, &f.a, Side::Left).unwrap();
    assert_eq!(f.store.snapshot(), before);
    assert!(!f.history.can_undo());
}

#[test]
fn a_free_root_gets_an_edge_when_moved_under_a_node() {
    let mut f = fixture();
    let loose = f.store.add_node_at(Point::new(300.0, 300.0));
    move_to_child(&mut f.store, &mut f.history, &loose, &f.b, Side::Left).unwrap();

    let moved = f.store.node(&loose).unwrap();
    assert_eq!(moved.kind, NodeKind::Text);
    assert_eq!(moved.level(), 2);
    assert_eq!(moved.side(), Side::Right);

    let incoming: Vec<_> = f.store.edges().iter().filter(|e| e.target == loose).collect();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].source, f.b);
}

#[test]
fn undo_restores_the_pre_move_state() {
    let mut f = fixture();
    let before = f.store.snapshot();
    move_to_child(&mut f.store, &mut f.history, &f.a, &f.b, Side::Right).unwrap();
    assert!(f.history.undo(&mut f.store));
    assert_eq!(f.store.snapshot(), before);
}

#[test]
fn unknown_endpoints_are_reported() {
    let mut f = fixture();
    assert!(matches!(
        move_to_child(&mut f.store, &mut f.history, "ghost", &f.b, Side::Left),
        Err(Error::NodeNotFound { .. })
    ));
}
