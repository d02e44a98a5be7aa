use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mindgrove_core::{Edge, Node, NodeContent, NodeKind, PathType, Point, Side};
use mindgrove_layout::{LayoutDirection, LayoutEngine, LayoutOptions, LayoutStrategy};
use std::hint::black_box;
use std::time::Duration;

/// `roots` trees, each `depth` levels deep with `fanout` children per node, split evenly between
/// the left and right side at level 1.
fn build_forest(roots: usize, depth: usize, fanout: usize) -> (Vec<Node>, Vec<Edge>) {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    for r in 0..roots {
        let root = Node::root(
            format!("r{r}"),
            Point::new(r as f64 * 5000.0, 0.0),
            NodeContent::text("root"),
        )
        .with_measured(160.0, 48.0);
        let mut frontier = vec![root.clone()];
        nodes.push(root);

        for _ in 0..depth {
            let mut next = Vec::new();
            for parent in &frontier {
                for k in 0..fanout {
                    let side = if parent.is_root() {
                        if k % 2 == 0 { Side::Left } else { Side::Right }
                    } else {
                        parent.side()
                    };
                    let id = format!("{}-{k}", parent.id);
                    let child = Node::child(
                        id.clone(),
                        NodeKind::Text,
                        parent,
                        side,
                        Point::ORIGIN,
                        NodeContent::text(&id),
                    )
                    .with_measured(120.0 + (k % 3) as f64 * 20.0, 36.0);
                    edges.push(Edge::structural(
                        format!("e-{id}"),
                        &parent.id,
                        &id,
                        side,
                        PathType::Smoothstep,
                    ));
                    next.push(child);
                }
            }
            nodes.extend(next.iter().cloned());
            frontier = next;
        }
    }
    (nodes, edges)
}

fn bench_forest_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_layout");
    group.measurement_time(Duration::from_secs(5));

    let cases = [
        ("wide_1x3x8", 1usize, 3usize, 8usize),
        ("deep_1x8x2", 1, 8, 2),
        ("forest_8x4x3", 8, 4, 3),
    ];

    for (name, roots, depth, fanout) in cases {
        let (nodes, edges) = build_forest(roots, depth, fanout);
        for strategy in [
            LayoutStrategy::BalancedTree,
            LayoutStrategy::RightOnly,
            LayoutStrategy::OrgChart,
            LayoutStrategy::Radial,
            LayoutStrategy::Rank,
        ] {
            let engine = LayoutEngine::new(
                LayoutOptions::default()
                    .with_strategy(strategy)
                    .with_direction(LayoutDirection::Horizontal),
            );
            group.bench_with_input(
                BenchmarkId::new(strategy.as_str(), name),
                &(&nodes, &edges),
                |b, (nodes, edges)| {
                    b.iter(|| {
                        let out = engine.layout(black_box(nodes), black_box(edges));
                        black_box(out.nodes.len());
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_forest_layout);
criterion_main!(benches);
