//! Network simplex layering.
//!
//! Starts from the longest-path ranking, grows a feasible tree of tight edges, then swaps tree
//! edges with a negative cut value for the non-tree edge of least slack until no cut value is
//! negative. The result minimises the total edge length. Every edge has weight 1 and minimum
//! length 1. Each weakly connected component is solved on its own and starts at rank 0.

use super::graph::DiGraph;
use super::ranking::longest_path;

/// Upper bound on edge exchanges per edge of a component.
const MAX_EXCHANGES_PER_EDGE: usize = 16;

struct Simplex<'g> {
    g: &'g DiGraph,
    rank: Vec<i64>,
    in_tree: Vec<bool>,
    tree: Vec<Vec<usize>>,
    parent: Vec<Option<usize>>,
    low: Vec<usize>,
    lim: Vec<usize>,
    /// Cut value of the tree edge between a node and its parent.
    cut: Vec<i64>,
    postorder: Vec<usize>,
}

impl<'g> Simplex<'g> {
    fn new(g: &'g DiGraph) -> Self {
        let n = g.node_count();
        Self {
            g,
            rank: longest_path(g).into_iter().map(|r| r as i64).collect(),
            in_tree: vec![false; n],
            tree: vec![Vec::new(); n],
            parent: vec![None; n],
            low: vec![0; n],
            lim: vec![0; n],
            cut: vec![0; n],
            postorder: Vec::new(),
        }
    }

    fn slack(&self, v: usize, w: usize) -> i64 {
        self.rank[w] - self.rank[v] - 1
    }

    fn solve(&mut self, comp: &[usize], edges: &[(usize, usize)]) {
        let Some(&root) = comp.first() else {
            return;
        };
        self.feasible_tree(root, comp, edges);
        self.init_low_lim(root);
        self.init_cut_values();

        let limit = MAX_EXCHANGES_PER_EDGE * edges.len().max(1);
        let mut exchanges = 0;
        while let Some(child) = self.leave_edge() {
            let Some(entering) = self.enter_edge(child, edges) else {
                break;
            };
            self.exchange(root, child, entering);
            exchanges += 1;
            if exchanges >= limit {
                tracing::debug!(exchanges, "network simplex stopped at the exchange limit");
                break;
            }
        }

        let min = comp.iter().map(|&v| self.rank[v]).min().unwrap_or(0);
        for &v in comp {
            self.rank[v] -= min;
        }
    }

    /// Grows a tree of tight edges from `root`, shifting the tree's ranks to tighten the
    /// least-slack edge leaving it whenever growth stalls.
    fn feasible_tree(&mut self, root: usize, comp: &[usize], edges: &[(usize, usize)]) {
        self.in_tree[root] = true;
        while self.tight_tree(comp) < comp.len() {
            let Some((v, w)) = edges
                .iter()
                .copied()
                .filter(|&(v, w)| self.in_tree[v] != self.in_tree[w])
                .min_by_key(|&(v, w)| self.slack(v, w))
            else {
                break;
            };
            let delta = if self.in_tree[v] {
                self.slack(v, w)
            } else {
                -self.slack(v, w)
            };
            for &u in comp {
                if self.in_tree[u] {
                    self.rank[u] += delta;
                }
            }
        }
    }

    fn tight_tree(&mut self, comp: &[usize]) -> usize {
        let mut stack: Vec<usize> = comp.iter().copied().filter(|&v| self.in_tree[v]).collect();
        while let Some(v) = stack.pop() {
            let g = self.g;
            let out = g.successors(v).iter().map(|&w| (w, self.slack(v, w)));
            let inc = g.predecessors(v).iter().map(|&u| (u, self.slack(u, v)));
            let tight: Vec<usize> = out
                .chain(inc)
                .filter(|&(w, slack)| slack == 0 && !self.in_tree[w])
                .map(|(w, _)| w)
                .collect();
            for w in tight {
                if self.in_tree[w] {
                    continue;
                }
                self.in_tree[w] = true;
                self.tree[v].push(w);
                self.tree[w].push(v);
                stack.push(w);
            }
        }
        comp.iter().filter(|&&v| self.in_tree[v]).count()
    }

    /// Postorder numbering: a node's subtree is exactly the nodes whose `lim` lies in
    /// `low..=lim`.
    fn init_low_lim(&mut self, root: usize) {
        self.postorder.clear();
        self.parent[root] = None;
        let mut next = 1;
        self.low[root] = next;
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        while let Some(top) = stack.last_mut() {
            let (v, i) = *top;
            match self.tree[v].get(i).copied() {
                Some(w) => {
                    top.1 += 1;
                    if Some(w) == self.parent[v] {
                        continue;
                    }
                    self.parent[w] = Some(v);
                    self.low[w] = next;
                    stack.push((w, 0));
                }
                None => {
                    self.lim[v] = next;
                    next += 1;
                    self.postorder.push(v);
                    stack.pop();
                }
            }
        }
    }

    fn init_cut_values(&mut self) {
        let order = std::mem::take(&mut self.postorder);
        for &v in &order {
            if self.parent[v].is_some() {
                self.cut[v] = self.cut_value(v);
            }
        }
        self.postorder = order;
    }

    /// Cut value of the edge from `child` to its tree parent. Children's cut values must
    /// already be known.
    fn cut_value(&self, child: usize) -> i64 {
        let Some(parent) = self.parent[child] else {
            return 0;
        };
        let child_is_tail = self.g.has_edge(child, parent);
        let mut cut = 1;
        let out = self.g.successors(child).iter().map(|&w| (w, true));
        let inc = self.g.predecessors(child).iter().map(|&u| (u, false));
        for (other, is_out) in out.chain(inc) {
            if other == parent {
                continue;
            }
            let points_to_head = is_out == child_is_tail;
            cut += if points_to_head { 1 } else { -1 };
            if self.parent[other] == Some(child) {
                cut += if points_to_head {
                    -self.cut[other]
                } else {
                    self.cut[other]
                };
            }
        }
        cut
    }

    fn leave_edge(&self) -> Option<usize> {
        self.postorder
            .iter()
            .copied()
            .find(|&v| self.parent[v].is_some() && self.cut[v] < 0)
    }

    fn is_descendant(&self, v: usize, root: usize) -> bool {
        self.low[root] <= self.lim[v] && self.lim[v] <= self.lim[root]
    }

    /// The non-tree edge of least slack that reconnects the two halves left by removing the
    /// tree edge above `child`, crossing in the same direction.
    fn enter_edge(&self, child: usize, edges: &[(usize, usize)]) -> Option<(usize, usize)> {
        let parent = self.parent[child]?;
        let (v, w) = if self.g.has_edge(child, parent) {
            (child, parent)
        } else {
            (parent, child)
        };
        let (tail, flip) = if self.lim[v] > self.lim[w] {
            (w, true)
        } else {
            (v, false)
        };
        edges
            .iter()
            .copied()
            .filter(|&(a, b)| {
                flip == self.is_descendant(a, tail) && flip != self.is_descendant(b, tail)
            })
            .min_by_key(|&(a, b)| self.slack(a, b))
    }

    fn exchange(&mut self, root: usize, child: usize, entering: (usize, usize)) {
        if let Some(parent) = self.parent[child] {
            self.tree[child].retain(|&x| x != parent);
            self.tree[parent].retain(|&x| x != child);
        }
        let (a, b) = entering;
        self.tree[a].push(b);
        self.tree[b].push(a);

        self.init_low_lim(root);
        self.init_cut_values();
        self.update_ranks();
    }

    /// Re-derives ranks from the tree so every tree edge is tight again.
    fn update_ranks(&mut self) {
        for i in (0..self.postorder.len()).rev() {
            let v = self.postorder[i];
            let Some(p) = self.parent[v] else {
                continue;
            };
            self.rank[v] = if self.g.has_edge(v, p) {
                self.rank[p] - 1
            } else {
                self.rank[p] + 1
            };
        }
    }
}

fn component(g: &DiGraph, start: usize, seen: &mut [bool]) -> Vec<usize> {
    let mut comp = Vec::new();
    let mut stack = vec![start];
    seen[start] = true;
    while let Some(v) = stack.pop() {
        comp.push(v);
        for &w in g.successors(v).iter().chain(g.predecessors(v)) {
            if !seen[w] {
                seen[w] = true;
                stack.push(w);
            }
        }
    }
    comp.sort_unstable();
    comp
}

/// Optimal layer per node. Expects an acyclic graph.
pub fn network_simplex(g: &DiGraph) -> Vec<usize> {
    let n = g.node_count();
    let mut simplex = Simplex::new(g);
    let mut seen = vec![false; n];
    for start in 0..n {
        if seen[start] {
            continue;
        }
        let comp = component(g, start, &mut seen);
        let edges: Vec<(usize, usize)> = comp
            .iter()
            .flat_map(|&v| g.successors(v).iter().map(move |&w| (v, w)))
            .collect();
        simplex.solve(&comp, &edges);
    }
    simplex.rank.into_iter().map(|r| r.max(0) as usize).collect()
}
