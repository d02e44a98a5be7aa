mod edge;
mod node;

pub use edge::{
    DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH, Edge, EdgeData, PathType, handle_id,
};
pub use node::{
    CLONE_PREFIX, CloneMetadata, DeletionState, Node, NodeContent, NodeData, NodeKind,
    STRUCTURAL_FIELDS, ShapeKind, Side,
};

use serde::{Deserialize, Serialize};

/// Serializable `(nodes, edges)` pair handed to and accepted from hosts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Document {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
