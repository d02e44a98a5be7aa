use mindgrove_core::{Edge, EngineConfig, Node, OrderAxis};

use crate::direction::{LayoutDirection, LayoutStrategy};
use crate::forest::{LayoutOutput, layout_all_trees, layout_subtree};
use crate::options::LayoutOptions;

/// Runs layout passes with one set of options.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    options: LayoutOptions,
}

impl LayoutEngine {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(LayoutOptions::from_config(config))
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn direction(&self) -> LayoutDirection {
        self.options.direction
    }

    pub fn set_direction(&mut self, direction: LayoutDirection) {
        self.options.direction = direction;
    }

    pub fn strategy(&self) -> LayoutStrategy {
        self.options.strategy
    }

    pub fn set_strategy(&mut self, strategy: LayoutStrategy) {
        self.options.strategy = strategy;
    }

    /// Lays out the whole graph in the configured direction.
    pub fn layout(&self, nodes: &[Node], edges: &[Edge]) -> LayoutOutput {
        self.layout_with_direction(nodes, edges, self.options.direction)
    }

    /// Never fails: any error comes back in [`LayoutOutput::recovered`] with the input intact.
    pub fn layout_with_direction(
        &self,
        nodes: &[Node],
        edges: &[Edge],
        direction: LayoutDirection,
    ) -> LayoutOutput {
        layout_all_trees(nodes, edges, direction, &self.options)
    }

    /// Re-lays out one subtree with the configured strategy, anchored at `root`'s current
    /// position. Nodes outside the subtree are not touched.
    pub fn layout_subtree(
        &self,
        root: &Node,
        descendants: &[Node],
        edges: &[Edge],
    ) -> LayoutOutput {
        layout_subtree(root, descendants, edges, self.options.direction, &self.options)
    }

    /// Order axis for sibling drags under the current strategy and direction.
    pub fn order_axis(&self) -> OrderAxis {
        self.options.strategy.order_axis(self.options.direction)
    }
}
