//! Index-based directed graph for the rank pipeline.

use mindgrove_core::{Edge, Node};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct DiGraph {
    ids: Vec<String>,
    dummy: Vec<bool>,
    index: FxHashMap<String, usize>,
    out: Vec<Vec<usize>>,
    in_: Vec<Vec<usize>>,
}

impl DiGraph {
    /// Builds the graph from the node/edge model. Every edge endpoint must exist; self loops
    /// and parallel edges are dropped since they do not affect layering.
    pub fn from_model(nodes: &[Node], edges: &[Edge]) -> Result<Self> {
        let mut g = DiGraph::default();
        for node in nodes {
            g.add_node(&node.id)?;
        }
        for edge in edges {
            let (Some(v), Some(w)) = (g.node_ix(&edge.source), g.node_ix(&edge.target)) else {
                return Err(Error::MissingEndpoint {
                    edge_id: edge.id.clone(),
                });
            };
            g.add_edge(v, w);
        }
        Ok(g)
    }

    pub fn add_node(&mut self, id: &str) -> Result<usize> {
        if self.index.contains_key(id) {
            return Err(Error::DuplicateNode { id: id.to_string() });
        }
        let ix = self.ids.len();
        self.ids.push(id.to_string());
        self.dummy.push(false);
        self.index.insert(id.to_string(), ix);
        self.out.push(Vec::new());
        self.in_.push(Vec::new());
        Ok(ix)
    }

    /// Adds an anonymous node standing in for one layer of a long edge.
    pub fn add_dummy(&mut self) -> usize {
        let ix = self.ids.len();
        self.ids.push(String::new());
        self.dummy.push(true);
        self.out.push(Vec::new());
        self.in_.push(Vec::new());
        ix
    }

    pub fn is_dummy(&self, ix: usize) -> bool {
        self.dummy[ix]
    }

    pub fn add_edge(&mut self, v: usize, w: usize) {
        if v == w || self.out[v].contains(&w) {
            return;
        }
        self.out[v].push(w);
        self.in_[w].push(v);
    }

    pub fn remove_edge(&mut self, v: usize, w: usize) {
        self.out[v].retain(|&x| x != w);
        self.in_[w].retain(|&x| x != v);
    }

    pub fn node_ix(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn id(&self, ix: usize) -> &str {
        &self.ids[ix]
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn successors(&self, v: usize) -> &[usize] {
        &self.out[v]
    }

    pub fn predecessors(&self, v: usize) -> &[usize] {
        &self.in_[v]
    }

    pub fn has_edge(&self, v: usize, w: usize) -> bool {
        self.out[v].contains(&w)
    }
}
