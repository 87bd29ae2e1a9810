//! Search plans: the order in which pattern nodes are matched.
//!
//! A [`SearchPlan`] is a linear order over the pattern nodes. Each node comes
//! with its *join edges*, the pattern edges connecting it to nodes earlier in
//! the order. Once the earlier nodes are mapped, join edges restrict the host
//! candidates of a node to the neighbours of already mapped host nodes.
//!
//! The order is a traversal of each connected component in turn. The frontier
//! of the traversal is a priority queue: with [`Priority::None`] all nodes
//! have the same priority and the traversal is breadth-first, otherwise rare
//! (or randomly favoured) nodes are visited first.

mod frequency;

use std::{cmp::Reverse, collections::BinaryHeap};

use bitvec::bitvec;
use itertools::Itertools;
use rand::{rngs::StdRng, Rng, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    config::{Priority, SearchConfig},
    graph::{EdgeIndex, Graph, NodeIndex},
    label::PatternLabel,
};

pub use frequency::FrequencyTable;

/// A pattern node and its join edges.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Extension {
    node: NodeIndex,
    join_edges: SmallVec<[EdgeIndex; 4]>,
}

impl Extension {
    /// The pattern node matched at this step.
    pub fn node(&self) -> NodeIndex {
        self.node
    }

    /// Edges from the node to nodes earlier in the plan.
    ///
    /// Self-loops of the node are join edges too; they come last.
    pub fn join_edges(&self) -> &[EdgeIndex] {
        &self.join_edges
    }
}

/// The order in which pattern nodes are matched.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchPlan {
    extensions: Vec<Extension>,
    /// Position of every pattern node in `extensions`.
    positions: Vec<usize>,
}

impl SearchPlan {
    /// Compute the search plan of `pattern`.
    pub fn new<E>(pattern: &Graph<PatternLabel, E>, config: &SearchConfig) -> Self {
        let n_nodes = pattern.node_count();
        let keys = priority_keys(pattern, config);

        // Roots of the components, tried in priority order
        let seeds = pattern
            .nodes()
            .sorted_by_key(|n| (keys[n.index()], *n))
            .collect_vec();

        let mut found = bitvec![0; n_nodes];
        let mut positions = vec![usize::MAX; n_nodes];
        let mut extensions = Vec::with_capacity(n_nodes);
        let mut frontier = BinaryHeap::new();
        // Insertion counter, breaks ties between equal keys
        let mut seq = 0usize;

        for seed in seeds {
            if found[seed.index()] {
                continue;
            }
            found.set(seed.index(), true);
            frontier.push(Reverse((keys[seed.index()], seq, seed)));
            seq += 1;

            while let Some(Reverse((_, _, node))) = frontier.pop() {
                positions[node.index()] = extensions.len();
                let mut join_edges = SmallVec::<[EdgeIndex; 4]>::new();
                let mut self_loops = SmallVec::<[EdgeIndex; 4]>::new();
                for &edge in pattern.incident_edges(node) {
                    let other = pattern.opposite(edge, node);
                    if other == node {
                        // Listed twice in the adjacency
                        if self_loops.last() != Some(&edge) {
                            self_loops.push(edge);
                        }
                    } else if !found[other.index()] {
                        found.set(other.index(), true);
                        frontier.push(Reverse((keys[other.index()], seq, other)));
                        seq += 1;
                    } else if positions[other.index()] != usize::MAX {
                        join_edges.push(edge);
                    }
                }
                join_edges.extend(self_loops);
                extensions.push(Extension { node, join_edges });
            }
        }

        tracing::debug!(
            priority = %config.priority,
            order = ?extensions.iter().map(|ext| ext.node).collect_vec(),
            "built search plan"
        );
        Self {
            extensions,
            positions,
        }
    }

    /// Number of steps, equal to the number of pattern nodes.
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Whether the plan is empty.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// The extension at step `depth`.
    pub fn extension(&self, depth: usize) -> &Extension {
        &self.extensions[depth]
    }

    /// All extensions, in order.
    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// The pattern nodes, in order.
    pub fn order(&self) -> impl ExactSizeIterator<Item = NodeIndex> + '_ {
        self.extensions.iter().map(|ext| ext.node)
    }

    /// The step at which `node` is matched.
    pub fn position(&self, node: NodeIndex) -> usize {
        self.positions[node.index()]
    }
}

fn priority_keys<E>(pattern: &Graph<PatternLabel, E>, config: &SearchConfig) -> Vec<u64> {
    match config.priority {
        Priority::None => vec![0; pattern.node_count()],
        Priority::Random => {
            let mut rng = StdRng::seed_from_u64(config.random_seed);
            pattern.nodes().map(|_| rng.gen()).collect()
        }
        Priority::Frequency => pattern
            .nodes()
            .map(|n| config.frequencies.priority(pattern.node_label(n)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rstest::rstest;

    use super::*;
    use crate::graph::tests::graph;

    fn compile(
        nodes: &[&str],
        edges: &[(usize, usize, &str)],
    ) -> Graph<PatternLabel, PatternLabel> {
        graph(nodes, edges).map_labels(|l| PatternLabel::compile(l), |l| PatternLabel::compile(l))
    }

    fn plan(pattern: &Graph<PatternLabel, PatternLabel>, priority: Priority) -> SearchPlan {
        SearchPlan::new(pattern, &SearchConfig::default().with_priority(priority))
    }

    fn order(plan: &SearchPlan) -> Vec<usize> {
        plan.order().map(|n| n.index()).collect()
    }

    fn assert_valid(pattern: &Graph<PatternLabel, PatternLabel>, plan: &SearchPlan) {
        assert_eq!(plan.len(), pattern.node_count());
        assert_eq!(
            plan.order().sorted().collect_vec(),
            pattern.nodes().collect_vec()
        );
        for (depth, ext) in plan.extensions().iter().enumerate() {
            assert_eq!(plan.position(ext.node()), depth);
            for &e in ext.join_edges() {
                let other = pattern.opposite(e, ext.node());
                assert!(plan.position(other) <= depth);
            }
        }
        // Every edge is a join edge of exactly one extension
        let n_join_edges: usize = plan.extensions().iter().map(|e| e.join_edges().len()).sum();
        assert_eq!(n_join_edges, pattern.edge_count());
    }

    #[test]
    fn test_breadth_first_without_priority() {
        // 0 - 1 - 3
        //  \
        //   2 - 4
        let pattern = compile(
            &["C", "C", "C", "C", "C"],
            &[(0, 1, "-"), (0, 2, "-"), (1, 3, "-"), (2, 4, "-")],
        );
        let plan = plan(&pattern, Priority::None);
        assert_eq!(order(&plan), [0, 1, 2, 3, 4]);
        assert!(plan.extension(0).join_edges().is_empty());
        assert_eq!(plan.extension(1).join_edges(), [EdgeIndex(0)]);
        assert_eq!(plan.extension(4).join_edges(), [EdgeIndex(3)]);
        assert_valid(&pattern, &plan);
    }

    #[test]
    fn test_frequency_schedules_rare_labels_first() {
        // C - C - Br, C - O
        let pattern = compile(
            &["C", "C", "Br", "O"],
            &[(0, 1, "-"), (1, 2, "-"), (0, 3, "=")],
        );
        let plan = plan(&pattern, Priority::Frequency);
        assert_eq!(order(&plan), [2, 1, 0, 3]);
        assert_valid(&pattern, &plan);
    }

    #[test]
    fn test_frequency_of_query_labels() {
        let pattern = compile(&["*", "[N,O]", "S"], &[(0, 1, "-"), (1, 2, "-")]);
        let plan = plan(&pattern, Priority::Frequency);
        assert_eq!(order(&plan), [2, 1, 0]);
    }

    #[test]
    fn test_disconnected_components() {
        let pattern = compile(&["C", "O", "N", "C"], &[(0, 3, "-"), (1, 2, "=")]);
        let plan = plan(&pattern, Priority::None);
        assert_eq!(order(&plan), [0, 3, 1, 2]);
        assert!(plan.extension(2).join_edges().is_empty());
        assert_valid(&pattern, &plan);
    }

    #[test]
    fn test_cycle_join_edges() {
        let pattern = compile(&["C", "C", "C"], &[(0, 1, "-"), (1, 2, "-"), (2, 0, "-")]);
        let plan = plan(&pattern, Priority::None);
        assert_eq!(order(&plan), [0, 1, 2]);
        assert_eq!(
            plan.extension(2).join_edges(),
            [EdgeIndex(1), EdgeIndex(2)]
        );
        assert_valid(&pattern, &plan);
    }

    #[test]
    fn test_self_loops_come_last() {
        let pattern = compile(&["C", "C"], &[(1, 1, "-"), (0, 1, "-")]);
        let plan = plan(&pattern, Priority::None);
        assert_eq!(plan.extension(1).join_edges(), [EdgeIndex(1), EdgeIndex(0)]);
        assert_valid(&pattern, &plan);
    }

    #[rstest]
    #[case(Priority::None)]
    #[case(Priority::Random)]
    #[case(Priority::Frequency)]
    fn test_plans_are_reproducible(#[case] priority: Priority) {
        let pattern = compile(
            &["C", "N", "C", "O", "S", "C", "*"],
            &[(0, 1, "-"), (1, 2, ":"), (2, 3, "="), (3, 0, "-"), (4, 5, "-"), (5, 6, "-")],
        );
        let first = plan(&pattern, priority);
        let second = plan(&pattern, priority);
        assert_eq!(first, second);
        assert_valid(&pattern, &first);
    }

    #[test]
    fn test_empty_pattern() {
        let plan = plan(&compile(&[], &[]), Priority::Frequency);
        assert!(plan.is_empty());
    }
}
