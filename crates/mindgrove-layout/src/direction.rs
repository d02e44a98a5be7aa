use mindgrove_core::{Node, OrderAxis, Side};
use serde::{Deserialize, Serialize};

/// Growth direction of a layout pass. `None` leaves positions untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    /// Branches grow left/right; siblings stack vertically.
    #[default]
    Horizontal,
    /// Branches grow up (left side) and down (right side); siblings line up horizontally.
    Vertical,
    None,
}

impl LayoutDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutDirection::Horizontal => "horizontal",
            LayoutDirection::Vertical => "vertical",
            LayoutDirection::None => "none",
        }
    }
}

impl std::str::FromStr for LayoutDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "lr" => Ok(LayoutDirection::Horizontal),
            "vertical" | "tb" => Ok(LayoutDirection::Vertical),
            "none" => Ok(LayoutDirection::None),
            other => Err(format!("unknown layout direction: {other}")),
        }
    }
}

/// Which algorithm a pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutStrategy {
    /// Root-centric left/right balanced trees, one per root.
    #[default]
    BalancedTree,
    /// Every branch grows to the right of its parent.
    RightOnly,
    /// Children hang below their parent, centred under it.
    OrgChart,
    /// Children circle their parent on rings that widen with depth.
    Radial,
    /// Layered rank layout over the whole node/edge set.
    Rank,
}

impl LayoutStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutStrategy::BalancedTree => "balancedTree",
            LayoutStrategy::RightOnly => "rightOnly",
            LayoutStrategy::OrgChart => "orgChart",
            LayoutStrategy::Radial => "radial",
            LayoutStrategy::Rank => "rank",
        }
    }

    /// Axis sibling order is read from when nodes are dragged under this strategy.
    pub fn order_axis(self, direction: LayoutDirection) -> OrderAxis {
        match (self, direction) {
            (LayoutStrategy::BalancedTree | LayoutStrategy::Rank, LayoutDirection::Vertical) => {
                OrderAxis::X
            }
            (LayoutStrategy::OrgChart, _) => OrderAxis::X,
            (LayoutStrategy::Radial, _) => OrderAxis::Angle,
            _ => OrderAxis::Y,
        }
    }

    /// Side a new child of `parent` should grow on when the caller has no preference.
    ///
    /// Balanced and radial layouts fill whichever side of a root has fewer children (left on a
    /// tie); single-direction layouts always use the right. Below the root children follow
    /// their parent.
    pub fn default_child_side(self, parent: &Node, existing_children: &[&Node]) -> Side {
        if !parent.is_root() {
            return parent.side();
        }
        match self {
            LayoutStrategy::RightOnly | LayoutStrategy::OrgChart => Side::Right,
            LayoutStrategy::BalancedTree | LayoutStrategy::Radial | LayoutStrategy::Rank => {
                let count = |side: Side| {
                    existing_children
                        .iter()
                        .filter(|c| c.side() == side)
                        .count()
                };
                if count(Side::Left) <= count(Side::Right) {
                    Side::Left
                } else {
                    Side::Right
                }
            }
        }
    }
}

impl std::str::FromStr for LayoutStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "balancedTree" | "balanced" => Ok(LayoutStrategy::BalancedTree),
            "rightOnly" => Ok(LayoutStrategy::RightOnly),
            "orgChart" => Ok(LayoutStrategy::OrgChart),
            "radial" => Ok(LayoutStrategy::Radial),
            "rank" => Ok(LayoutStrategy::Rank),
            other => Err(format!("unknown layout strategy: {other}")),
        }
    }
}
