use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::edge::PathType;
use crate::geom::{Dimensions, Point};

/// Closed set of node variants. Only `Root` may lack a parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "rootNode")]
    Root,
    #[serde(rename = "textNode")]
    Text,
    #[serde(rename = "shapeNode")]
    Shape,
    #[serde(rename = "imageNode")]
    Image,
}

impl NodeKind {
    /// Size a freshly created node of this kind starts with, if it has a fixed one.
    pub fn initial_dimensions(self) -> Option<Dimensions> {
        match self {
            NodeKind::Shape => Some(Dimensions::new(120.0, 60.0)),
            NodeKind::Image => Some(Dimensions::new(250.0, 180.0)),
            NodeKind::Root | NodeKind::Text => None,
        }
    }
}

/// Which branch of a root a node grows on. Roots themselves are `Mid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    #[default]
    Mid,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Mid => Side::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Mid => "mid",
        }
    }

    /// Connector slot for an edge on this side. Left edges leave the parent through `first`
    /// and enter the child through `second`; everything else uses the mirrored pair.
    pub fn handle_slot(self, is_source: bool) -> &'static str {
        match (self, is_source) {
            (Side::Left, true) => "first",
            (Side::Left, false) => "second",
            (_, true) => "second",
            (_, false) => "first",
        }
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "top" => Ok(Side::Left),
            "right" | "bottom" => Ok(Side::Right),
            "mid" => Ok(Side::Mid),
            other => Err(format!("unknown side: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    RoundedRectangle,
    Ellipse,
    Diamond,
    Hexagon,
}

/// Type-specific payload. The engine never interprets it beyond clone annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeContent {
    RichText {
        html: String,
    },
    Shape {
        shape: ShapeKind,
        #[serde(default)]
        label: String,
        #[serde(default)]
        style: Value,
    },
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src: Option<String>,
        #[serde(default)]
        alt: String,
    },
}

impl Default for NodeContent {
    fn default() -> Self {
        NodeContent::RichText {
            html: String::new(),
        }
    }
}

pub const CLONE_PREFIX: &str = "Cloned: ";

impl NodeContent {
    pub fn text(label: &str) -> Self {
        NodeContent::RichText {
            html: format!("<p>{label}</p>"),
        }
    }

    pub fn default_for(kind: NodeKind, label: &str) -> Self {
        match kind {
            NodeKind::Root | NodeKind::Text => NodeContent::text(label),
            NodeKind::Shape => NodeContent::Shape {
                shape: ShapeKind::Rectangle,
                label: label.to_string(),
                style: Value::Null,
            },
            NodeKind::Image => NodeContent::Image {
                src: None,
                alt: "Image".to_string(),
            },
        }
    }

    pub fn mark_cloned(&mut self) {
        let label = match self {
            NodeContent::RichText { html } => html,
            NodeContent::Shape { label, .. } => label,
            NodeContent::Image { alt, .. } => alt,
        };
        label.insert_str(0, CLONE_PREFIX);
    }

    pub fn is_clone(&self) -> bool {
        match self {
            NodeContent::RichText { html } => html.starts_with(CLONE_PREFIX),
            NodeContent::Shape { label, .. } => label.starts_with(CLONE_PREFIX),
            NodeContent::Image { alt, .. } => alt.starts_with(CLONE_PREFIX),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneMetadata {
    pub old_id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default)]
    pub level: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub side: Side,
    #[serde(default)]
    pub content: NodeContent,
    #[serde(default)]
    pub is_collapsed: bool,
    #[serde(default)]
    pub is_left_children_collapsed: bool,
    #[serde(default)]
    pub is_right_children_collapsed: bool,
    /// Ancestor whose collapse hid this node; only that ancestor's expand re-shows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed_by: Option<String>,
    #[serde(default)]
    pub is_deleting: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_type: Option<PathType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CloneMetadata>,
    /// Explicit rank among siblings on the same side; unordered siblings keep document order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sibling_order: Option<u32>,
    /// Collaborator fields the engine carries but never reads.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Field names a data patch may not touch; they only change through structural operations.
/// `isDeleting` belongs to the deletion lifecycle and is only set by marking a subtree.
pub const STRUCTURAL_FIELDS: [&str; 4] = ["parentId", "level", "side", "isDeleting"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub position: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured: Option<Dimensions>,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub data: NodeData,
}

impl Node {
    pub fn root(id: impl Into<String>, position: Point, content: NodeContent) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Root,
            position,
            measured: None,
            selected: false,
            data: NodeData {
                level: 0,
                side: Side::Mid,
                content,
                path_type: Some(PathType::Smoothstep),
                ..Default::default()
            },
        }
    }

    pub fn child(
        id: impl Into<String>,
        kind: NodeKind,
        parent: &Node,
        side: Side,
        position: Point,
        content: NodeContent,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            measured: kind.initial_dimensions(),
            selected: false,
            data: NodeData {
                level: parent.data.level + 1,
                parent_id: Some(parent.id.clone()),
                side,
                content,
                ..Default::default()
            },
        }
    }

    pub fn is_root(&self) -> bool {
        self.kind == NodeKind::Root
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.data.parent_id.as_deref()
    }

    pub fn side(&self) -> Side {
        self.data.side
    }

    pub fn level(&self) -> i32 {
        self.data.level
    }

    pub fn with_measured(mut self, width: f64, height: f64) -> Self {
        self.measured = Some(Dimensions::new(width, height));
        self
    }
}

/// Per-node deletion lifecycle: `Active -> PendingDeletion -> Removed`.
///
/// The `PendingDeletion -> Removed` step is driven by the host calling
/// `finalize_node_deletion` once its exit transition completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionState {
    Active,
    PendingDeletion,
    Removed,
}
