//! Brandes-Köpf coordinate assignment along the layer axis.
//!
//! Four alignments are built (towards the layer above or below, scanning from the left or the
//! right). In each, nodes join their median neighbour into vertical blocks and the blocks are
//! compacted as tightly as the separation allows. The alignments are shifted onto the
//! narrowest one and every node takes the mean of its two middle candidates, which centres a
//! parent over its children. Inner segments between two dummies are kept straight.

use rustc_hash::{FxHashMap, FxHashSet};

use super::graph::DiGraph;

type Conflicts = FxHashSet<(usize, usize)>;

fn add_conflict(conflicts: &mut Conflicts, v: usize, w: usize) {
    conflicts.insert((v.min(w), v.max(w)));
}

fn has_conflict(conflicts: &Conflicts, v: usize, w: usize) -> bool {
    conflicts.contains(&(v.min(w), v.max(w)))
}

fn order_of(layers: &[Vec<usize>], n: usize) -> Vec<usize> {
    let mut pos = vec![0; n];
    for layer in layers {
        for (i, &v) in layer.iter().enumerate() {
            pos[v] = i;
        }
    }
    pos
}

fn inner_segment_source(g: &DiGraph, v: usize) -> Option<usize> {
    if !g.is_dummy(v) {
        return None;
    }
    g.predecessors(v).iter().copied().find(|&u| g.is_dummy(u))
}

/// Marks edges that cross an inner segment; those never join a block.
pub fn find_type1_conflicts(g: &DiGraph, layers: &[Vec<usize>]) -> Conflicts {
    let pos = order_of(layers, g.node_count());
    let mut conflicts = Conflicts::default();
    for pair in layers.windows(2) {
        let (north, south) = (&pair[0], &pair[1]);
        let mut k0 = 0;
        let mut scan_pos = 0;
        for (i, &v) in south.iter().enumerate() {
            let inner = inner_segment_source(g, v);
            if inner.is_none() && i + 1 != south.len() {
                continue;
            }
            let k1 = inner.map_or(north.len(), |w| pos[w]);
            for &scan in &south[scan_pos..=i] {
                for &u in g.predecessors(scan) {
                    let u_pos = pos[u];
                    if (u_pos < k0 || k1 < u_pos) && !(g.is_dummy(u) && g.is_dummy(scan)) {
                        add_conflict(&mut conflicts, u, scan);
                    }
                }
            }
            scan_pos = i + 1;
            k0 = k1;
        }
    }
    conflicts
}

/// Block root of every node after median alignment.
fn vertical_alignment(
    g: &DiGraph,
    layers: &[Vec<usize>],
    conflicts: &Conflicts,
    upward: bool,
) -> Vec<usize> {
    let n = g.node_count();
    let mut root: Vec<usize> = (0..n).collect();
    let mut align = root.clone();
    let pos = order_of(layers, n);

    for layer in layers {
        let mut prev_idx: Option<usize> = None;
        for &v in layer {
            let mut ws: Vec<usize> = if upward {
                g.predecessors(v).to_vec()
            } else {
                g.successors(v).to_vec()
            };
            if ws.is_empty() {
                continue;
            }
            ws.sort_by_key(|&w| pos[w]);
            // One median for odd counts, both middles for even ones.
            for &w in &ws[(ws.len() - 1) / 2..=ws.len() / 2] {
                if align[v] == v
                    && prev_idx.is_none_or(|p| p < pos[w])
                    && !has_conflict(conflicts, v, w)
                {
                    align[w] = v;
                    root[v] = root[w];
                    align[v] = root[v];
                    prev_idx = Some(pos[w]);
                }
            }
        }
    }
    root
}

struct Spacing<'a> {
    widths: &'a [f64],
    node_sep: f64,
    edge_sep: f64,
}

impl Spacing<'_> {
    /// Minimum distance between the centres of layer neighbours `v` and `w`.
    fn between(&self, g: &DiGraph, v: usize, w: usize) -> f64 {
        let gap = |x: usize| {
            if g.is_dummy(x) {
                self.edge_sep
            } else {
                self.node_sep
            }
        };
        self.widths[v] / 2.0 + gap(v) / 2.0 + gap(w) / 2.0 + self.widths[w] / 2.0
    }
}

fn horizontal_compaction(
    g: &DiGraph,
    layers: &[Vec<usize>],
    root: &[usize],
    spacing: &Spacing<'_>,
) -> Vec<f64> {
    let n = g.node_count();

    let mut seps: FxHashMap<(usize, usize), f64> = FxHashMap::default();
    for layer in layers {
        for pair in layer.windows(2) {
            let (u, v) = (pair[0], pair[1]);
            let sep = spacing.between(g, v, u);
            let entry = seps.entry((root[u], root[v])).or_insert(0.0);
            *entry = entry.max(sep);
        }
    }
    let mut ins: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    let mut outs: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    for (&(u, v), &sep) in &seps {
        outs[u].push((v, sep));
        ins[v].push((u, sep));
    }

    // Blocks in topological order of the separation constraints.
    let blocks: Vec<usize> = (0..n).filter(|&v| root[v] == v).collect();
    let mut indegree: Vec<usize> = (0..n).map(|v| ins[v].len()).collect();
    let mut topo: Vec<usize> = blocks
        .iter()
        .copied()
        .filter(|&b| indegree[b] == 0)
        .collect();
    let mut head = 0;
    while head < topo.len() {
        let b = topo[head];
        head += 1;
        for &(w, _) in &outs[b] {
            indegree[w] -= 1;
            if indegree[w] == 0 {
                topo.push(w);
            }
        }
    }
    if topo.len() < blocks.len() {
        let placed: FxHashSet<usize> = topo.iter().copied().collect();
        topo.extend(blocks.iter().copied().filter(|b| !placed.contains(b)));
    }

    let mut xs = vec![0.0; n];
    for &b in &topo {
        xs[b] = ins[b].iter().map(|&(u, sep)| xs[u] + sep).fold(0.0, f64::max);
    }
    // Pull blocks right towards their successors where there is room.
    for &b in topo.iter().rev() {
        let room = outs[b]
            .iter()
            .map(|&(w, sep)| xs[w] - sep)
            .fold(f64::INFINITY, f64::min);
        if room.is_finite() {
            xs[b] = xs[b].max(room);
        }
    }

    for v in 0..n {
        xs[v] = xs[root[v]];
    }
    xs
}

fn extent(xs: &[f64], widths: &[f64]) -> (f64, f64) {
    xs.iter()
        .zip(widths)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (&x, &w)| {
            (lo.min(x - w / 2.0), hi.max(x + w / 2.0))
        })
}

fn bounds(xs: &[f64]) -> (f64, f64) {
    xs.iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        })
}

/// Centre coordinate of every node along the layer axis, in `g`'s index order.
pub fn position_x(
    g: &DiGraph,
    layers: &[Vec<usize>],
    widths: &[f64],
    node_sep: f64,
    edge_sep: f64,
) -> Vec<f64> {
    let n = g.node_count();
    if n == 0 {
        return Vec::new();
    }
    let spacing = Spacing {
        widths,
        node_sep,
        edge_sep,
    };
    let conflicts = find_type1_conflicts(g, layers);

    // Order: up-left, up-right, down-left, down-right.
    let mut candidates: Vec<Vec<f64>> = Vec::with_capacity(4);
    for upward in [true, false] {
        let vertical: Vec<Vec<usize>> = if upward {
            layers.to_vec()
        } else {
            layers.iter().rev().cloned().collect()
        };
        for rightward in [false, true] {
            let adjusted: Vec<Vec<usize>> = if rightward {
                vertical
                    .iter()
                    .map(|layer| layer.iter().rev().copied().collect())
                    .collect()
            } else {
                vertical.clone()
            };
            let root = vertical_alignment(g, &adjusted, &conflicts, upward);
            let mut xs = horizontal_compaction(g, &adjusted, &root, &spacing);
            if rightward {
                xs.iter_mut().for_each(|x| *x = -*x);
            }
            candidates.push(xs);
        }
    }

    let mut narrowest = 0;
    let mut narrowest_width = f64::INFINITY;
    for (i, xs) in candidates.iter().enumerate() {
        let (lo, hi) = extent(xs, widths);
        if hi - lo < narrowest_width {
            narrowest_width = hi - lo;
            narrowest = i;
        }
    }
    let (to_min, to_max) = bounds(&candidates[narrowest]);
    for (i, xs) in candidates.iter_mut().enumerate() {
        if i == narrowest {
            continue;
        }
        let (lo, hi) = bounds(xs);
        let delta = if i % 2 == 0 { to_min - lo } else { to_max - hi };
        if delta != 0.0 {
            xs.iter_mut().for_each(|x| *x += delta);
        }
    }

    (0..n)
        .map(|v| {
            let mut four = [
                candidates[0][v],
                candidates[1][v],
                candidates[2][v],
                candidates[3][v],
            ];
            four.sort_by(f64::total_cmp);
            (four[1] + four[2]) / 2.0
        })
        .collect()
}
