use criterion::criterion_group;
use criterion::criterion_main;
use criterion::measurement::WallTime;
use criterion::BenchmarkGroup;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;

use labelmatching::{
    HostGraph, Matcher, MatcherKind, NodeIndex, Priority, SearchConfig, SearchPattern,
};

/// A chain of `n` fused six-membered carbon rings, with an OH group on
/// every third ring.
fn ring_chain(n: usize) -> HostGraph {
    let mut g = HostGraph::new();
    let mut prev: Option<(NodeIndex, NodeIndex)> = None;
    for i in 0..n {
        let ring: Vec<_> = (0..4).map(|_| g.add_node("C".to_string())).collect();
        let (a, b) = match prev {
            Some(shared) => shared,
            None => (g.add_node("C".to_string()), g.add_node("C".to_string())),
        };
        let cycle = [a, ring[0], ring[1], ring[2], ring[3], b];
        for (j, w) in cycle.windows(2).enumerate() {
            let bond = if j % 2 == 0 { ":" } else { "-" };
            g.add_edge(w[0], w[1], bond.to_string());
        }
        if prev.is_none() {
            g.add_edge(b, a, ":".to_string());
        }
        if i % 3 == 0 {
            let o = g.add_node("O".to_string());
            g.add_edge(ring[1], o, "-".to_string());
        }
        prev = Some((ring[3], ring[2]));
    }
    g
}

fn raw_pattern(nodes: &[&str], edges: &[(usize, usize, &str)]) -> HostGraph {
    let mut g = HostGraph::new();
    for &label in nodes {
        g.add_node(label.to_string());
    }
    for &(u, v, label) in edges {
        g.add_edge(NodeIndex(u), NodeIndex(v), label.to_string());
    }
    g
}

fn bench_matching(
    kind: MatcherKind,
    group: &mut BenchmarkGroup<WallTime>,
    pattern: &SearchPattern,
    sizes: impl Iterator<Item = usize>,
) {
    group.sample_size(10);
    for n in sizes {
        let host = ring_chain(n);
        group.throughput(Throughput::Elements(host.node_count() as u64));
        group.bench_with_input(BenchmarkId::new(kind.to_string(), n), &host, |b, host| {
            b.iter(|| criterion::black_box(kind.build(pattern, host).count_matches()));
        });
    }
}

fn perform_benches(c: &mut Criterion) {
    let phenol = raw_pattern(
        &["C", "C", "C", "C", "C", "C", "O"],
        &[
            (0, 1, "*"),
            (1, 2, "*"),
            (2, 3, "*"),
            (3, 4, "*"),
            (4, 5, "*"),
            (5, 0, "*"),
            (0, 6, "-"),
        ],
    );
    let hydroxyl = raw_pattern(&["*", "[O,N]"], &[(0, 1, "-")]);

    for (name, raw) in [("Phenol", &phenol), ("Hydroxyl", &hydroxyl)] {
        let pattern = SearchPattern::new(raw);
        let mut group = c.benchmark_group(format!("{name} matching"));
        for kind in MatcherKind::ALL {
            let sizes = match kind {
                MatcherKind::Simple => (10..=30).step_by(10),
                _ => (10..=100).step_by(30),
            };
            bench_matching(kind, &mut group, &pattern, sizes);
        }
        group.finish();
    }

    let host = ring_chain(50);
    let mut group = c.benchmark_group("Search priority");
    group.sample_size(10);
    for priority in [Priority::None, Priority::Random, Priority::Frequency] {
        let config = SearchConfig::default().with_priority(priority);
        let pattern = SearchPattern::with_config(&phenol, &config);
        group.bench_function(priority.to_string(), |b| {
            b.iter(|| {
                criterion::black_box(MatcherKind::Vf2.build(&pattern, &host).count_matches())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, perform_benches);
criterion_main!(benches);
