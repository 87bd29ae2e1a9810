//! Partial mappings with terminal sets, for VF2-style pruning.
//!
//! The terminal set of a side (pattern or host) is the set of unmapped nodes
//! adjacent to a mapped node. For every node, the mapping records the mapping
//! size at which the node first entered the mapped region or its terminal set
//! (`0` if never). Removing the last pair clears exactly the entries recorded
//! at the current size, so extend and remove must be called in LIFO pairs.

use delegate::delegate;
use itertools::Itertools;

use super::PartialMapping;
use crate::{
    graph::{HostGraph, NodeIndex},
    pattern::SearchPattern,
    Match,
};

/// A [`PartialMapping`] tracking the terminal sets of both graphs.
#[derive(Clone, Debug)]
pub struct TerminalMapping<'a> {
    base: PartialMapping<'a>,
    term_pattern: Vec<usize>,
    term_host: Vec<usize>,
}

/// Counts of unmapped neighbours, split into terminal and new nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct NeighbourCounts {
    terminal: usize,
    new: usize,
}

impl<'a> TerminalMapping<'a> {
    /// An empty mapping of `pattern` into `host`.
    pub fn new(pattern: &'a SearchPattern, host: &'a HostGraph) -> Self {
        Self {
            base: PartialMapping::new(pattern, host),
            term_pattern: vec![0; pattern.node_count()],
            term_host: vec![0; host.node_count()],
        }
    }

    delegate! {
        to self.base {
            /// Number of mapped pairs.
            pub fn len(&self) -> usize;
            /// Whether no pair is mapped.
            pub fn is_empty(&self) -> bool;
            /// Whether every pattern node is mapped.
            pub fn is_complete(&self) -> bool;
            /// The host node `p` is mapped to.
            pub fn host_of(&self, p: NodeIndex) -> Option<NodeIndex>;
            /// The pattern node mapped to `h`.
            pub fn pattern_of(&self, h: NodeIndex) -> Option<NodeIndex>;
            /// Whether the pattern node `p` is mapped.
            pub fn is_pattern_mapped(&self, p: NodeIndex) -> bool;
            /// Whether the host node `h` is mapped.
            pub fn is_host_mapped(&self, h: NodeIndex) -> bool;
            /// The mapped pairs, ordered by pattern node.
            pub fn pairs(&self) -> Match;
        }
    }

    /// The underlying mapping, without terminal sets.
    pub fn as_partial(&self) -> &PartialMapping<'a> {
        &self.base
    }

    /// Remove all pairs and empty the terminal sets.
    pub fn clear(&mut self) {
        self.base.clear();
        self.term_pattern.fill(0);
        self.term_host.fill(0);
    }

    /// Map `p` to `h` and grow the terminal sets.
    pub fn extend(&mut self, p: NodeIndex, h: NodeIndex) {
        self.base.extend(p, h);
        let depth = self.base.len();
        let (pattern, host) = (self.base.pattern().graph(), self.base.host());

        mark(&mut self.term_pattern, p, depth);
        for n in pattern.neighbours(p) {
            mark(&mut self.term_pattern, n, depth);
        }
        mark(&mut self.term_host, h, depth);
        for n in host.neighbours(h) {
            mark(&mut self.term_host, n, depth);
        }
    }

    /// Undo the mapping of `p` to `h`, the last pair added.
    pub fn remove(&mut self, p: NodeIndex, h: NodeIndex) {
        let depth = self.base.len();
        let (pattern, host) = (self.base.pattern().graph(), self.base.host());

        unmark(&mut self.term_pattern, p, depth);
        for n in pattern.neighbours(p) {
            unmark(&mut self.term_pattern, n, depth);
        }
        unmark(&mut self.term_host, h, depth);
        for n in host.neighbours(h) {
            unmark(&mut self.term_host, n, depth);
        }
        self.base.remove(p, h);
    }

    /// Whether `p` is unmapped and adjacent to a mapped pattern node.
    #[inline]
    pub fn is_pattern_terminal(&self, p: NodeIndex) -> bool {
        self.term_pattern[p.index()] > 0 && !self.base.is_pattern_mapped(p)
    }

    /// Whether `h` is unmapped and adjacent to a mapped host node.
    #[inline]
    pub fn is_host_terminal(&self, h: NodeIndex) -> bool {
        self.term_host[h.index()] > 0 && !self.base.is_host_mapped(h)
    }

    /// The first host candidate for `p` with index greater than `after`.
    ///
    /// If `p` is terminal, only terminal host nodes are candidates: the image
    /// of `p` must be adjacent to the image of its mapped neighbours. Otherwise
    /// every unmapped host node is.
    pub fn next_terminal_host_node(
        &self,
        p: NodeIndex,
        after: Option<NodeIndex>,
    ) -> Option<NodeIndex> {
        let start = after.map_or(0, |h| h.index() + 1);
        let terminal_only = self.is_pattern_terminal(p);
        (start..self.base.host().node_count())
            .map(NodeIndex)
            .find(|&h| {
                if terminal_only {
                    self.is_host_terminal(h)
                } else {
                    !self.base.is_host_mapped(h)
                }
            })
    }

    /// Whether mapping `p` to `h` is consistent and may still be completed.
    ///
    /// Checks labels, degrees and the edges to mapped neighbours, then
    /// compares the unmapped neighbours of both nodes: `p` cannot have more
    /// terminal neighbours, nor more unmapped neighbours overall, than `h`.
    ///
    /// The neighbour counts ignore edge multiplicity, so the degree check is
    /// what rejects parallel pattern edges or repeated self-loops that the
    /// host cannot carry.
    pub fn is_feasible_candidate(&self, p: NodeIndex, h: NodeIndex) -> bool {
        let base = &self.base;
        let host = base.host();
        let pattern = base.pattern().graph();
        if !base.is_feasible_node_pair(p, h) {
            return false;
        }

        for &e in pattern.incident_edges(p) {
            let other = pattern.opposite(e, p);
            let other_image = if other == p { Some(h) } else { base.host_of(other) };
            if let Some(h_other) = other_image {
                if !base.has_matching_host_edge(e, h, h_other) {
                    return false;
                }
            }
        }

        let pattern_counts = count_neighbours(
            pattern.neighbours(p).filter(|&n| n != p && !base.is_pattern_mapped(n)),
            &self.term_pattern,
        );
        let host_counts = count_neighbours(
            host.neighbours(h).filter(|&n| n != h && !base.is_host_mapped(n)),
            &self.term_host,
        );
        pattern_counts.terminal <= host_counts.terminal
            && pattern_counts.terminal + pattern_counts.new
                <= host_counts.terminal + host_counts.new
    }
}

/// Classify distinct unmapped neighbours as terminal or new.
fn count_neighbours(
    neighbours: impl Iterator<Item = NodeIndex>,
    term: &[usize],
) -> NeighbourCounts {
    let mut counts = NeighbourCounts::default();
    for n in neighbours.unique() {
        if term[n.index()] > 0 {
            counts.terminal += 1;
        } else {
            counts.new += 1;
        }
    }
    counts
}

#[inline]
fn mark(term: &mut [usize], n: NodeIndex, depth: usize) {
    if term[n.index()] == 0 {
        term[n.index()] = depth;
    }
}

#[inline]
fn unmark(term: &mut [usize], n: NodeIndex, depth: usize) {
    if term[n.index()] == depth {
        term[n.index()] = 0;
    }
}
