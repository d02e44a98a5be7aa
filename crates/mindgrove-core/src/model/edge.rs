use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::node::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathType {
    #[default]
    Smoothstep,
    Step,
    Straight,
    Bezier,
}

pub const DEFAULT_STROKE_COLOR: &str = "var(--primary)";
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_type: Option<PathType>,
    #[serde(default)]
    pub is_deleting: bool,
    #[serde(default)]
    pub is_collapsed: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub data: EdgeData,
}

/// `first-source-<id>`, `second-target-<id>`, ... for an edge growing on `side`.
pub fn handle_id(side: Side, node_id: &str, is_source: bool) -> String {
    let role = if is_source { "source" } else { "target" };
    format!("{}-{role}-{node_id}", side.handle_slot(is_source))
}

impl Edge {
    /// Parent-to-child edge with handles derived from `side`.
    pub fn structural(
        id: impl Into<String>,
        source: &str,
        target: &str,
        side: Side,
        path_type: PathType,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.to_string(),
            target: target.to_string(),
            source_handle: Some(handle_id(side, source, true)),
            target_handle: Some(handle_id(side, target, false)),
            selected: false,
            data: EdgeData {
                stroke_color: Some(DEFAULT_STROKE_COLOR.to_string()),
                stroke_width: Some(DEFAULT_STROKE_WIDTH),
                path_type: Some(path_type),
                ..Default::default()
            },
        }
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    pub fn rehandle(&mut self, side: Side) {
        self.source_handle = Some(handle_id(side, &self.source, true));
        self.target_handle = Some(handle_id(side, &self.target, false));
    }
}
