#![forbid(unsafe_code)]

//! Mind-map graph model and structural editing (headless).
//!
//! Design goals:
//! - one explicit service object per concern (store, history, clipboard) instead of global state
//! - plain JSON-serializable node/edge data in, the same data out
//! - traversal that terminates on corrupted `parentId` chains

pub mod clipboard;
pub mod config;
pub mod error;
pub mod geom;
pub mod history;
pub mod ids;
pub mod model;
pub mod reparent;
pub mod sibling;
pub mod store;
pub mod traversal;

pub use clipboard::ClipboardManager;
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use geom::{Dimensions, Point};
pub use history::HistoryManager;
pub use ids::IdGenerator;
pub use model::{
    DeletionState, Document, Edge, EdgeData, Node, NodeContent, NodeData, NodeKind, PathType, Side,
};
pub use reparent::move_to_child;
pub use sibling::{OrderAxis, SiblingOrders};
pub use store::{AddedChild, GraphStore};
