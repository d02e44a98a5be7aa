use mindgrove_core::{Dimensions, EngineConfig};

use crate::direction::{LayoutDirection, LayoutStrategy};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub direction: LayoutDirection,
    pub strategy: LayoutStrategy,
    /// Gap between a parent and its children along the horizontal axis.
    pub horizontal_spacing: f64,
    /// Gap between a parent and its children along the vertical axis, and between stacked
    /// sibling subtrees in horizontal layouts.
    pub vertical_spacing: f64,
    /// Rank layout: gap between nodes in the same layer.
    pub node_sep: f64,
    /// Rank layout: gap between layers.
    pub rank_sep: f64,
    /// Rank layout: gap kept around the bend points of edges that cross layers.
    pub edge_sep: f64,
    /// Radial layout: ring radius of the first level.
    pub base_radius: f64,
    /// Radial layout: extra radius per level below the first.
    pub radius_increment: f64,
    /// Size used for nodes with no (or a non-positive) measured size.
    pub default_dimensions: Dimensions,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: LayoutDirection::Horizontal,
            strategy: LayoutStrategy::BalancedTree,
            horizontal_spacing: 200.0,
            vertical_spacing: 80.0,
            node_sep: 50.0,
            rank_sep: 50.0,
            edge_sep: 20.0,
            base_radius: 200.0,
            radius_increment: 150.0,
            default_dimensions: Dimensions::new(180.0, 50.0),
        }
    }
}

impl LayoutOptions {
    /// Reads `layout.*` keys; anything missing or malformed keeps its default.
    pub fn from_config(config: &EngineConfig) -> Self {
        let d = Self::default();
        let non_negative = |key: &str, fallback: f64| {
            config
                .get_f64(key)
                .filter(|v| *v >= 0.0)
                .unwrap_or(fallback)
        };
        let positive = |key: &str, fallback: f64| {
            config
                .get_f64(key)
                .filter(|v| *v > 0.0)
                .unwrap_or(fallback)
        };

        Self {
            direction: config
                .get_str("layout.direction")
                .and_then(|s| s.parse().ok())
                .unwrap_or(d.direction),
            strategy: config
                .get_str("layout.strategy")
                .and_then(|s| s.parse().ok())
                .unwrap_or(d.strategy),
            horizontal_spacing: non_negative("layout.horizontalSpacing", d.horizontal_spacing),
            vertical_spacing: non_negative("layout.verticalSpacing", d.vertical_spacing),
            node_sep: non_negative("layout.nodeSep", d.node_sep),
            rank_sep: non_negative("layout.rankSep", d.rank_sep),
            edge_sep: non_negative("layout.edgeSep", d.edge_sep),
            base_radius: non_negative("layout.baseRadius", d.base_radius),
            radius_increment: non_negative("layout.radiusIncrement", d.radius_increment),
            default_dimensions: Dimensions::new(
                positive("layout.defaultNodeWidth", d.default_dimensions.width),
                positive("layout.defaultNodeHeight", d.default_dimensions.height),
            ),
        }
    }

    pub fn with_direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_strategy(mut self, strategy: LayoutStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub(crate) fn dimensions_of(&self, node: &mindgrove_core::Node) -> Dimensions {
        Dimensions::or_default_components(node.measured, self.default_dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_the_built_in_config() {
        assert_eq!(
            LayoutOptions::from_config(&EngineConfig::default()),
            LayoutOptions::default()
        );
    }

    #[test]
    fn malformed_values_fall_back() {
        let config = EngineConfig::with_overrides(&json!({
            "layout": {
                "direction": "sideways",
                "verticalSpacing": -3,
                "defaultNodeWidth": 0,
                "strategy": "rank",
                "baseRadius": "wide"
            }
        }));
        let opts = LayoutOptions::from_config(&config);
        assert_eq!(opts.direction, LayoutDirection::Horizontal);
        assert_eq!(opts.vertical_spacing, 80.0);
        assert_eq!(opts.default_dimensions.width, 180.0);
        assert_eq!(opts.strategy, LayoutStrategy::Rank);
        assert_eq!(opts.base_radius, 200.0);
    }
}
