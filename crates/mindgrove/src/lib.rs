#![forbid(unsafe_code)]

//! `mindgrove` is a headless mind-map editing engine.
//!
//! The host owns rendering and gesture detection; this crate owns the node/edge data, structural
//! edits with undo/redo, copy/paste, reparenting and auto-layout. Data in and out is plain
//! JSON-serializable [`Document`] content.
//!
//! ```
//! use mindgrove::{Mindmap, Point, Side};
//!
//! let mut map = Mindmap::new();
//! let root = map.add_node_at(Point::ORIGIN);
//! let child = map.add_child_node(&root, Point::ORIGIN, Side::Right).unwrap();
//! map.layout();
//! assert!(map.store().node(&child.node_id).unwrap().position.x > 0.0);
//! ```

pub use mindgrove_core::*;

pub mod layout {
    pub use mindgrove_layout::{
        HierarchyNode, LayoutDirection, LayoutEngine, LayoutOptions, LayoutOutput,
        LayoutStrategy, Placement, layout_all_trees, layout_subtree, rank_layout,
    };
    pub use mindgrove_layout::Error as LayoutError;
}

pub mod error;
mod mindmap;

pub use error::MindmapError;
pub use mindmap::Mindmap;
