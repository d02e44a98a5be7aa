//! Bounded undo/redo over full document snapshots.

use std::collections::VecDeque;

use crate::config::EngineConfig;
use crate::model::Document;
use crate::store::GraphStore;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo: VecDeque<Document>,
    redo: Vec<Document>,
    prepared: Option<Document>,
    capacity: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of `0` is treated as `1`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            prepared: None,
            capacity: capacity.max(1),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let capacity = config
            .get_u64("history.capacity")
            .and_then(|c| usize::try_from(c).ok())
            .unwrap_or(DEFAULT_HISTORY_CAPACITY);
        Self::with_capacity(capacity)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records the state as it is *before* a structural change. Clears redo; evicts the oldest
    /// entry once the undo stack is full.
    pub fn push_to_undo_stack(&mut self, store: &GraphStore) {
        self.push_snapshot(store.snapshot());
    }

    fn push_snapshot(&mut self, doc: Document) {
        if self.undo.len() == self.capacity {
            self.undo.pop_front();
        }
        self.undo.push_back(doc);
        self.redo.clear();
    }

    /// Captures the current state without recording it yet. Used for gestures (drags, direction
    /// changes) whose start state should only be recorded if the gesture commits.
    pub fn prepare(&mut self, snapshot: Document) {
        self.prepared = Some(snapshot);
    }

    /// Records the prepared state, if any. Returns whether something was pushed.
    pub fn commit_prepared(&mut self) -> bool {
        match self.prepared.take() {
            Some(doc) => {
                self.push_snapshot(doc);
                true
            }
            None => false,
        }
    }

    pub fn discard_prepared(&mut self) {
        self.prepared = None;
    }

    pub fn has_prepared(&self) -> bool {
        self.prepared.is_some()
    }

    /// Restores the most recent snapshot. Returns `false` (and leaves the store alone) when
    /// there is nothing to undo.
    pub fn undo(&mut self, store: &mut GraphStore) -> bool {
        let Some(previous) = self.undo.pop_back() else {
            return false;
        };
        self.redo.push(store.snapshot());
        store.restore(previous);
        tracing::debug!(undo = self.undo.len(), redo = self.redo.len(), "undo");
        true
    }

    pub fn redo(&mut self, store: &mut GraphStore) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        if self.undo.len() == self.capacity {
            self.undo.pop_front();
        }
        self.undo.push_back(store.snapshot());
        store.restore(next);
        tracing::debug!(undo = self.undo.len(), redo = self.redo.len(), "redo");
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.prepared = None;
    }
}
