//! Long edges are split into chains of dummy nodes, one per layer crossed, so ordering and
//! positioning only see edges between adjacent layers.

use super::graph::DiGraph;

/// Returns the split graph and its layering. Real nodes keep their indices; dummies follow.
pub fn normalize(g: &DiGraph, rank: &[usize]) -> (DiGraph, Vec<usize>) {
    let mut out = g.clone();
    let mut rank = rank.to_vec();
    let mut dummies = 0usize;

    for v in 0..g.node_count() {
        for &w in g.successors(v) {
            if rank[w] <= rank[v] + 1 {
                continue;
            }
            out.remove_edge(v, w);
            let mut prev = v;
            for layer in rank[v] + 1..rank[w] {
                let d = out.add_dummy();
                rank.push(layer);
                out.add_edge(prev, d);
                prev = d;
                dummies += 1;
            }
            out.add_edge(prev, w);
        }
    }

    if dummies > 0 {
        tracing::debug!(dummies, "long edges split");
    }
    (out, rank)
}
