//! Cycle removal and layer assignment.

use super::graph::DiGraph;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    OnStack,
    Done,
}

/// Reverses every DFS back edge so the graph becomes acyclic. Returns how many edges were
/// reversed.
pub fn make_acyclic(g: &mut DiGraph) -> usize {
    let n = g.node_count();
    let mut state = vec![Visit::Unvisited; n];
    let mut back: Vec<(usize, usize)> = Vec::new();

    for start in 0..n {
        if state[start] != Visit::Unvisited {
            continue;
        }
        state[start] = Visit::OnStack;
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        while let Some(top) = stack.last_mut() {
            let (v, i) = *top;
            match g.successors(v).get(i).copied() {
                Some(w) => {
                    top.1 += 1;
                    match state[w] {
                        Visit::OnStack => back.push((v, w)),
                        Visit::Unvisited => {
                            state[w] = Visit::OnStack;
                            stack.push((w, 0));
                        }
                        Visit::Done => {}
                    }
                }
                None => {
                    state[v] = Visit::Done;
                    stack.pop();
                }
            }
        }
    }

    for &(v, w) in &back {
        g.remove_edge(v, w);
        g.add_edge(w, v);
    }
    back.len()
}

/// Longest path from the sources: sources sit on layer 0 and every node sits one layer below
/// its deepest predecessor. Expects an acyclic graph; nodes left over by a cycle stay on 0.
pub fn longest_path(g: &DiGraph) -> Vec<usize> {
    let n = g.node_count();
    let mut indegree: Vec<usize> = (0..n).map(|v| g.predecessors(v).len()).collect();
    let mut rank = vec![0usize; n];
    let mut queue: std::collections::VecDeque<usize> =
        (0..n).filter(|&v| indegree[v] == 0).collect();

    while let Some(v) = queue.pop_front() {
        for &w in g.successors(v) {
            rank[w] = rank[w].max(rank[v] + 1);
            indegree[w] -= 1;
            if indegree[w] == 0 {
                queue.push_back(w);
            }
        }
    }
    rank
}
