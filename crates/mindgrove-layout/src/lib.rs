#![forbid(unsafe_code)]

//! Headless layout for mindgrove graphs.
//!
//! Every strategy shares one output shape ([`LayoutOutput`]):
//! - balanced trees: each root keeps its position and its left/right branches fan out around it
//! - right-only, org chart and radial trees: the same root anchoring with a different fan
//! - rank: a layered layout over the whole node/edge set
//!
//! Failures never escape the recovering entry points; the input comes back unchanged with the
//! cause in [`LayoutOutput::recovered`].

pub mod balanced;
pub mod direction;
pub mod engine;
pub mod error;
pub mod forest;
pub mod hierarchy;
pub mod options;
pub mod org_chart;
pub mod radial;
pub mod rank;
pub mod right_only;

pub use direction::{LayoutDirection, LayoutStrategy};
pub use engine::LayoutEngine;
pub use error::{Error, Result};
pub use forest::{LayoutOutput, Placement, layout_all_trees, layout_subtree};
pub use hierarchy::HierarchyNode;
pub use options::LayoutOptions;
pub use rank::rank_layout;
