use std::collections::BTreeSet;

use itertools::Itertools;
use proptest::prelude::*;

use labelmatching::{
    HostGraph, Match, Matcher, MatcherKind, NodeIndex, PartialMapping, SearchPattern,
    TerminalMapping,
};

const HOST_ATOMS: &[&str] = &["C", "C", "C", "N", "O"];
const PATTERN_ATOMS: &[&str] = &["C", "N", "O", "*", "[N,O]", "![C]"];
const HOST_BONDS: &[&str] = &["-", "-", "=", ":"];
const PATTERN_BONDS: &[&str] = &["-", "=", ":", "*", "[-,=]"];

fn gen_graph(
    max_nodes: usize,
    max_edges: usize,
    atoms: &'static [&'static str],
    bonds: &'static [&'static str],
) -> impl Strategy<Value = HostGraph> {
    (1..=max_nodes)
        .prop_flat_map(move |n| {
            let nodes = prop::collection::vec(prop::sample::select(atoms), n);
            let edges = prop::collection::vec(
                (0..n, 0..n, prop::sample::select(bonds)),
                0..=max_edges,
            );
            (nodes, edges)
        })
        .prop_map(|(nodes, edges)| {
            let mut g = HostGraph::new();
            for label in nodes {
                g.add_node(label.to_string());
            }
            for (u, v, label) in edges {
                g.add_edge(NodeIndex(u), NodeIndex(v), label.to_string());
            }
            g
        })
}

fn gen_pattern() -> impl Strategy<Value = HostGraph> {
    gen_graph(4, 5, PATTERN_ATOMS, PATTERN_BONDS)
}

fn gen_host() -> impl Strategy<Value = HostGraph> {
    gen_graph(8, 12, HOST_ATOMS, HOST_BONDS)
}

fn sorted_matches(kind: MatcherKind, pattern: &SearchPattern, host: &HostGraph) -> Vec<Match> {
    kind.build(pattern, host)
        .find_all()
        .into_iter()
        .sorted()
        .collect()
}

/// Check that `m` is a label and edge preserving injective map.
fn assert_sound(pattern: &SearchPattern, host: &HostGraph, m: &Match) {
    let graph = pattern.graph();
    assert_eq!(m.len(), graph.node_count());
    let image = |p: NodeIndex| m[p.index()].1;

    let images: BTreeSet<_> = m.iter().map(|&(_, h)| h).collect();
    assert_eq!(images.len(), m.len(), "match is not injective");

    for &(p, h) in m {
        assert!(pattern
            .node_matcher()
            .matches(graph.node_label(p), host.node_label(h)));
        assert!(graph.degree(p) <= host.degree(h));
    }
    for e in graph.edges() {
        let (u, v) = graph.endpoints(e);
        assert!(host
            .edges_between(image(u), image(v))
            .any(|he| pattern
                .edge_matcher()
                .matches(graph.edge_label(e), host.edge_label(he))));
    }
}

proptest! {
    #[test]
    fn matchers_agree(raw in gen_pattern(), host in gen_host()) {
        let pattern = SearchPattern::new(&raw);
        let simple = sorted_matches(MatcherKind::Simple, &pattern, &host);
        let fast = sorted_matches(MatcherKind::Fast, &pattern, &host);
        let vf2 = sorted_matches(MatcherKind::Vf2, &pattern, &host);
        prop_assert_eq!(&simple, &fast);
        prop_assert_eq!(&simple, &vf2);
    }

    #[test]
    fn matches_are_sound(raw in gen_pattern(), host in gen_host()) {
        let pattern = SearchPattern::new(&raw);
        for kind in MatcherKind::ALL {
            for m in kind.build(&pattern, &host).find_all() {
                assert_sound(&pattern, &host, &m);
            }
        }
    }

    #[test]
    fn first_match_is_one_of_all(raw in gen_pattern(), host in gen_host()) {
        let pattern = SearchPattern::new(&raw);
        let all = sorted_matches(MatcherKind::Simple, &pattern, &host);
        for kind in MatcherKind::ALL {
            let mut matcher = kind.build(&pattern, &host);
            let found = matcher.search();
            prop_assert_eq!(found, !all.is_empty());
            match matcher.current_match() {
                Some(m) => prop_assert!(all.contains(&m)),
                None => prop_assert!(!found),
            }
        }
    }

    #[test]
    fn mappings_restore_after_lifo(
        raw in gen_pattern(),
        host in gen_graph(6, 8, HOST_ATOMS, HOST_BONDS),
        seed in any::<u64>(),
    ) {
        let pattern = SearchPattern::new(&raw);
        // Pair pattern nodes with distinct host nodes, in a rotated order
        let n_pairs = pattern.node_count().min(host.node_count());
        let n_hosts = host.node_count();
        let shift = (seed % n_hosts as u64) as usize;
        let pairs = pattern
            .graph()
            .nodes()
            .zip((0..n_hosts).map(|i| NodeIndex((i + shift) % n_hosts)))
            .take(n_pairs)
            .collect_vec();

        let mut mapping = PartialMapping::new(&pattern, &host);
        let mut terminal = TerminalMapping::new(&pattern, &host);
        for &(p, h) in &pairs {
            mapping.extend(p, h);
            terminal.extend(p, h);
        }
        prop_assert_eq!(mapping.len(), n_pairs);
        prop_assert_eq!(terminal.pairs(), mapping.pairs());
        for &(p, h) in pairs.iter().rev() {
            mapping.remove(p, h);
            terminal.remove(p, h);
        }
        prop_assert!(mapping.is_empty());
        prop_assert!(terminal.is_empty());
        prop_assert!(host.nodes().all(|h| mapping.pattern_of(h).is_none()));
        prop_assert!(host.nodes().all(|h| !terminal.is_host_terminal(h)));
        prop_assert!(pattern.graph().nodes().all(|p| !terminal.is_pattern_terminal(p)));
    }
}
