//! Ordering nodes within layers to reduce edge crossings.

use super::graph::DiGraph;

const MAX_SWEEPS: usize = 8;

/// Initial order: a DFS from nodes in layer order, each node appended to its layer on first
/// visit.
pub fn init_order(g: &DiGraph, rank: &[usize]) -> Vec<Vec<usize>> {
    let layer_count = rank.iter().copied().max().map_or(0, |m| m + 1);
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); layer_count];
    let mut visited = vec![false; g.node_count()];

    let mut starts: Vec<usize> = (0..g.node_count()).collect();
    starts.sort_by_key(|&v| rank[v]);

    for start in starts {
        let mut stack = vec![start];
        while let Some(v) = stack.pop() {
            if visited[v] {
                continue;
            }
            visited[v] = true;
            layers[rank[v]].push(v);
            for &w in g.successors(v).iter().rev() {
                if !visited[w] {
                    stack.push(w);
                }
            }
        }
    }
    layers
}

/// Weighted crossings between every pair of adjacent layers (unit edge weights). Long edges
/// must already be split into dummy chains to be counted.
pub fn cross_count(g: &DiGraph, layers: &[Vec<usize>]) -> usize {
    layers
        .windows(2)
        .map(|pair| two_layer_cross_count(g, &pair[0], &pair[1]))
        .sum()
}

fn two_layer_cross_count(g: &DiGraph, north: &[usize], south: &[usize]) -> usize {
    if south.is_empty() {
        return 0;
    }
    let mut south_pos = vec![usize::MAX; g.node_count()];
    for (i, &v) in south.iter().enumerate() {
        south_pos[v] = i;
    }

    let mut entries: Vec<usize> = Vec::new();
    for &v in north {
        let mut positions: Vec<usize> = g
            .successors(v)
            .iter()
            .map(|&w| south_pos[w])
            .filter(|&p| p != usize::MAX)
            .collect();
        positions.sort_unstable();
        entries.extend(positions);
    }

    // Accumulator tree over south positions.
    let mut first_index = 1usize;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree = vec![0usize; tree_size];

    let mut crossings = 0usize;
    for pos in entries {
        let mut index = pos + first_index;
        tree[index] += 1;
        let mut weight_sum = 0usize;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += 1;
        }
        crossings += weight_sum;
    }
    crossings
}

/// Reorders `layer` by the mean position of each node's neighbours in `fixed_pos`. Nodes with no
/// placed neighbour keep their current index as their key; ties keep the current order.
fn sort_by_barycenter(
    layer: &mut [usize],
    neighbours: impl Fn(usize) -> Vec<usize>,
    fixed_pos: &[Option<usize>],
) {
    let mut keyed: Vec<(f64, usize)> = layer
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let placed: Vec<f64> = neighbours(v)
                .into_iter()
                .filter_map(|u| fixed_pos[u].map(|p| p as f64))
                .collect();
            let key = if placed.is_empty() {
                i as f64
            } else {
                placed.iter().sum::<f64>() / placed.len() as f64
            };
            (key, v)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    for (slot, (_, v)) in layer.iter_mut().zip(keyed) {
        *slot = v;
    }
}

fn positions_of(layers: &[Vec<usize>], n: usize) -> Vec<Option<usize>> {
    let mut pos = vec![None; n];
    for layer in layers {
        for (i, &v) in layer.iter().enumerate() {
            pos[v] = Some(i);
        }
    }
    pos
}

/// Alternating down/up barycenter sweeps, keeping the ordering with the fewest crossings.
pub fn order(g: &DiGraph, rank: &[usize]) -> Vec<Vec<usize>> {
    let mut layers = init_order(g, rank);
    let mut best = layers.clone();
    let mut best_cc = cross_count(g, &best);

    for sweep in 0..MAX_SWEEPS {
        if best_cc == 0 {
            break;
        }
        let downward = sweep % 2 == 0;
        let indices: Vec<usize> = if downward {
            (1..layers.len()).collect()
        } else {
            (0..layers.len().saturating_sub(1)).rev().collect()
        };
        for r in indices {
            let pos = positions_of(&layers, g.node_count());
            if downward {
                sort_by_barycenter(
                    &mut layers[r],
                    |v| {
                        g.predecessors(v)
                            .iter()
                            .copied()
                            .filter(|&u| rank[u] < rank[v])
                            .collect()
                    },
                    &pos,
                );
            } else {
                sort_by_barycenter(
                    &mut layers[r],
                    |v| {
                        g.successors(v)
                            .iter()
                            .copied()
                            .filter(|&w| rank[w] > rank[v])
                            .collect()
                    },
                    &pos,
                );
            }
        }

        let cc = cross_count(g, &layers);
        if cc < best_cc {
            best_cc = cc;
            best = layers.clone();
        }
    }
    best
}
