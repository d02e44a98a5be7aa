//! Layered ("rank") layout for free-form graphs.
//!
//! A Sugiyama pipeline: break cycles, assign layers with network simplex, split long edges
//! into dummy chains, order each layer with barycenter sweeps, place nodes along each layer
//! with Brandes-Köpf, then stack layers along the rank axis. Layout runs top-to-bottom;
//! left-to-right swaps axes on the way in and out. Dummy nodes are dropped from the output.

pub mod graph;
pub mod network_simplex;
pub mod normalize;
pub mod order;
pub mod position;
pub mod ranking;

use mindgrove_core::{Dimensions, Edge, Node, Point};

use crate::direction::LayoutDirection;
use crate::error::{Error, Result};
use crate::options::LayoutOptions;
use graph::DiGraph;

/// Lays out every node, returning them in input order with new top-left positions.
pub fn rank_layout(
    nodes: &[Node],
    edges: &[Edge],
    direction: LayoutDirection,
    options: &LayoutOptions,
) -> Result<Vec<Node>> {
    let left_to_right = match direction {
        LayoutDirection::None => return Ok(nodes.to_vec()),
        LayoutDirection::Horizontal => true,
        LayoutDirection::Vertical => false,
    };

    let mut g = DiGraph::from_model(nodes, edges)?;
    let reversed = ranking::make_acyclic(&mut g);
    let rank = network_simplex::network_simplex(&g);
    let (g, rank) = normalize::normalize(&g, &rank);
    let layers = order::order(&g, &rank);
    tracing::debug!(
        nodes = nodes.len(),
        dummies = g.node_count() - nodes.len(),
        layers = layers.len(),
        reversed,
        "rank layout ordered"
    );

    // Sizes in top-to-bottom coordinates; dummies take no room.
    let mut dims: Vec<Dimensions> = nodes
        .iter()
        .map(|n| {
            let d = options.dimensions_of(n);
            if left_to_right {
                Dimensions::new(d.height, d.width)
            } else {
                d
            }
        })
        .collect();
    dims.resize(g.node_count(), Dimensions::new(0.0, 0.0));

    let centers = assign_centers(&g, &layers, &dims, options);

    let mut out = nodes.to_vec();
    // Real nodes keep their model index; dummies sit past the end.
    for (ix, node) in out.iter_mut().enumerate() {
        let c = centers[ix];
        let d = dims[ix];
        let (cx, cy, w, h) = if left_to_right {
            (c.y, c.x, d.height, d.width)
        } else {
            (c.x, c.y, d.width, d.height)
        };
        let top_left = Point::new(cx - w / 2.0, cy - h / 2.0);
        if !top_left.is_finite() {
            return Err(Error::NonFinitePosition {
                id: node.id.clone(),
            });
        }
        node.position = top_left;
    }
    Ok(out)
}

/// Center coordinates per node index. Positions along a layer come from Brandes-Köpf; layers
/// are stacked downward with `rank_sep` between their tallest members.
fn assign_centers(
    g: &DiGraph,
    layers: &[Vec<usize>],
    dims: &[Dimensions],
    options: &LayoutOptions,
) -> Vec<Point> {
    let widths: Vec<f64> = dims.iter().map(|d| d.width).collect();
    let xs = position::position_x(g, layers, &widths, options.node_sep, options.edge_sep);

    let mut centers = vec![Point::ORIGIN; dims.len()];
    let mut layer_top = 0.0;
    for layer in layers {
        let layer_height = layer
            .iter()
            .map(|&v| dims[v].height)
            .fold(0.0, f64::max);
        for &v in layer {
            centers[v] = Point::new(xs[v], layer_top + layer_height / 2.0);
        }
        layer_top += layer_height + options.rank_sep;
    }
    centers
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindgrove_core::{NodeContent, NodeKind, PathType, Side};

    fn chain() -> (Vec<Node>, Vec<Edge>) {
        let r = Node::root("r", Point::ORIGIN, NodeContent::default()).with_measured(100.0, 40.0);
        let a = Node::child(
            "a",
            NodeKind::Text,
            &r,
            Side::Right,
            Point::ORIGIN,
            NodeContent::default(),
        )
        .with_measured(100.0, 40.0);
        let e = Edge::structural("e", "r", "a", Side::Right, PathType::Smoothstep);
        (vec![r, a], vec![e])
    }

    #[test]
    fn vertical_stacks_layers_downward() {
        let (nodes, edges) = chain();
        let out = rank_layout(
            &nodes,
            &edges,
            LayoutDirection::Vertical,
            &LayoutOptions::default(),
        )
        .unwrap();
        assert_eq!(out[0].position, Point::new(-50.0, 0.0));
        assert_eq!(out[1].position, Point::new(-50.0, 90.0));
    }

    #[test]
    fn horizontal_grows_to_the_right() {
        let (nodes, edges) = chain();
        let out = rank_layout(
            &nodes,
            &edges,
            LayoutDirection::Horizontal,
            &LayoutOptions::default(),
        )
        .unwrap();
        assert_eq!(out[0].position, Point::new(0.0, -20.0));
        assert_eq!(out[1].position, Point::new(150.0, -20.0));
    }
}
