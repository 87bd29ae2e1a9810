//! Partial mappings from pattern nodes to host nodes.
//!
//! The matchers grow a [`PartialMapping`] one pair at a time, following the
//! search plan, and shrink it again when backtracking. Pairs are always removed
//! in the reverse order in which they were added.

mod terminal;

use crate::{
    graph::{EdgeIndex, HostGraph, NodeIndex},
    pattern::SearchPattern,
    Match,
};

pub use terminal::TerminalMapping;

/// An injective partial map from pattern nodes to host nodes.
///
/// Stored in both directions, so that the image of a pattern node and the
/// preimage of a host node are found in constant time.
#[derive(Clone, Debug)]
pub struct PartialMapping<'a> {
    pattern: &'a SearchPattern,
    host: &'a HostGraph,
    pattern_to_host: Vec<Option<NodeIndex>>,
    host_to_pattern: Vec<Option<NodeIndex>>,
    /// Mapped pairs, in the order they were added
    stack: Vec<(NodeIndex, NodeIndex)>,
}

impl<'a> PartialMapping<'a> {
    /// An empty mapping of `pattern` into `host`.
    pub fn new(pattern: &'a SearchPattern, host: &'a HostGraph) -> Self {
        Self {
            pattern,
            host,
            pattern_to_host: vec![None; pattern.node_count()],
            host_to_pattern: vec![None; host.node_count()],
            stack: Vec::with_capacity(pattern.node_count()),
        }
    }

    /// The pattern being mapped.
    pub fn pattern(&self) -> &'a SearchPattern {
        self.pattern
    }

    /// The host graph being mapped into.
    pub fn host(&self) -> &'a HostGraph {
        self.host
    }

    /// Number of mapped pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether no pair is mapped.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Whether every pattern node is mapped.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.stack.len() == self.pattern_to_host.len()
    }

    /// Remove all pairs.
    pub fn clear(&mut self) {
        for (p, h) in self.stack.drain(..) {
            self.pattern_to_host[p.index()] = None;
            self.host_to_pattern[h.index()] = None;
        }
    }

    /// The host node `p` is mapped to.
    #[inline]
    pub fn host_of(&self, p: NodeIndex) -> Option<NodeIndex> {
        self.pattern_to_host[p.index()]
    }

    /// The pattern node mapped to `h`.
    #[inline]
    pub fn pattern_of(&self, h: NodeIndex) -> Option<NodeIndex> {
        self.host_to_pattern[h.index()]
    }

    /// Whether the pattern node `p` is mapped.
    #[inline]
    pub fn is_pattern_mapped(&self, p: NodeIndex) -> bool {
        self.pattern_to_host[p.index()].is_some()
    }

    /// Whether the host node `h` is the image of a pattern node.
    #[inline]
    pub fn is_host_mapped(&self, h: NodeIndex) -> bool {
        self.host_to_pattern[h.index()].is_some()
    }

    /// Map `p` to `h`.
    ///
    /// Both nodes must be unmapped.
    pub fn extend(&mut self, p: NodeIndex, h: NodeIndex) {
        debug_assert!(
            !self.is_pattern_mapped(p) && !self.is_host_mapped(h),
            "cannot map {p:?} to {h:?}: already mapped"
        );
        self.pattern_to_host[p.index()] = Some(h);
        self.host_to_pattern[h.index()] = Some(p);
        self.stack.push((p, h));
    }

    /// Undo the mapping of `p` to `h`.
    ///
    /// The pair must be the last one added.
    pub fn remove(&mut self, p: NodeIndex, h: NodeIndex) {
        let last = self.stack.pop();
        debug_assert_eq!(
            last,
            Some((p, h)),
            "pairs must be removed in reverse order of extension"
        );
        self.pattern_to_host[p.index()] = None;
        self.host_to_pattern[h.index()] = None;
    }

    /// The mapped pairs, ordered by pattern node.
    pub fn pairs(&self) -> Match {
        self.pattern_to_host
            .iter()
            .enumerate()
            .filter_map(|(p, h)| Some((NodeIndex(p), (*h)?)))
            .collect()
    }

    /// The mapped pairs, in the order they were added.
    pub fn pairs_in_order(&self) -> &[(NodeIndex, NodeIndex)] {
        &self.stack
    }

    /// Whether `p` may be mapped to `h`, regardless of edges.
    ///
    /// Both nodes must be unmapped, the labels compatible and the host node
    /// must have at least the degree of the pattern node.
    pub fn is_feasible_node_pair(&self, p: NodeIndex, h: NodeIndex) -> bool {
        !self.is_pattern_mapped(p)
            && !self.is_host_mapped(h)
            && self.pattern.node_matches(p, self.host.node_label(h))
            && self.pattern.graph().degree(p) <= self.host.degree(h)
    }

    /// Whether the pattern `edges` of `p` are preserved by mapping `p` to `h`.
    ///
    /// Edges to unmapped pattern nodes are ignored. Self-loops of `p` require a
    /// matching self-loop at `h`.
    pub fn is_feasible_connected_pair(
        &self,
        p: NodeIndex,
        h: NodeIndex,
        edges: &[EdgeIndex],
    ) -> bool {
        edges.iter().all(|&e| {
            let other = self.pattern.graph().opposite(e, p);
            let other_image = if other == p {
                Some(h)
            } else {
                self.host_of(other)
            };
            match other_image {
                Some(h_other) => self.has_matching_host_edge(e, h, h_other),
                None => true,
            }
        })
    }

    /// Whether some host edge between `h` and `h_other` is accepted by the
    /// pattern edge `e`.
    pub(crate) fn has_matching_host_edge(
        &self,
        e: EdgeIndex,
        h: NodeIndex,
        h_other: NodeIndex,
    ) -> bool {
        self.host
            .edges_between(h, h_other)
            .any(|host_edge| self.pattern.edge_matches(e, self.host.edge_label(host_edge)))
    }
}
