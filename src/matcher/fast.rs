//! A matcher restricting candidates to neighbours of mapped nodes.

use smallvec::SmallVec;

use super::{report, Match, MatchDelegate, Matcher, SearchStats};
use crate::{
    graph::{EdgeIndex, HostGraph, NodeIndex},
    mapping::PartialMapping,
    pattern::SearchPattern,
};

/// A backtracking matcher using the join edges of the search plan.
///
/// If the next pattern node has a join edge to an already mapped node, its
/// candidates are the host neighbours of that node's image. Only the first
/// join edge is used as anchor; the others are checked by feasibility. The
/// first node of each pattern component has no join edge and is tried against
/// every host node.
#[derive(Clone, Debug)]
pub struct FastMatcher<'a> {
    pattern: &'a SearchPattern,
    host: &'a HostGraph,
    mapping: PartialMapping<'a>,
    stats: SearchStats,
}

impl<'a> FastMatcher<'a> {
    /// A matcher of `pattern` in `host`.
    pub fn new(pattern: &'a SearchPattern, host: &'a HostGraph) -> Self {
        Self {
            pattern,
            host,
            mapping: PartialMapping::new(pattern, host),
            stats: SearchStats::default(),
        }
    }

    /// The current partial mapping.
    pub fn mapping(&self) -> &PartialMapping<'a> {
        &self.mapping
    }

    fn extend_match(&mut self, delegate: &mut dyn MatchDelegate) -> bool {
        if self.mapping.is_complete() {
            return report(&self.mapping, delegate, &mut self.stats);
        }
        let (pattern, host) = (self.pattern, self.host);
        let extension = pattern.plan().extension(self.mapping.len());
        let p = extension.node();
        let join_edges = extension.join_edges();

        // Self-loops cannot anchor: they lead back to `p`
        let anchor = join_edges
            .iter()
            .map(|&e| pattern.graph().opposite(e, p))
            .find(|&other| other != p);

        let anchor_image = anchor.and_then(|anchor| self.mapping.host_of(anchor));
        debug_assert_eq!(
            anchor.is_some(),
            anchor_image.is_some(),
            "join edges lead to mapped nodes"
        );

        let Some(anchor_image) = anchor_image else {
            for h in host.nodes() {
                if self.try_candidate(p, h, join_edges, delegate) {
                    return true;
                }
            }
            return false;
        };
        // Parallel host edges list a neighbour more than once
        let mut candidates: SmallVec<[NodeIndex; 8]> = host.neighbours(anchor_image).collect();
        candidates.sort_unstable();
        candidates.dedup();
        for h in candidates {
            if self.try_candidate(p, h, join_edges, delegate) {
                return true;
            }
        }
        false
    }

    /// Try mapping `p` to `h` and search deeper. Return whether to stop.
    fn try_candidate(
        &mut self,
        p: NodeIndex,
        h: NodeIndex,
        join_edges: &[EdgeIndex],
        delegate: &mut dyn MatchDelegate,
    ) -> bool {
        self.stats.candidates += 1;
        if !(self.mapping.is_feasible_node_pair(p, h)
            && self.mapping.is_feasible_connected_pair(p, h, join_edges))
        {
            return false;
        }
        self.mapping.extend(p, h);
        self.stats.extensions += 1;
        if self.extend_match(delegate) {
            return true;
        }
        self.mapping.remove(p, h);
        false
    }
}

impl Matcher for FastMatcher<'_> {
    fn search_with(&mut self, delegate: &mut dyn MatchDelegate) -> bool {
        self.mapping.clear();
        self.stats = SearchStats::default();
        let stopped = self.extend_match(delegate);
        tracing::debug!(matcher = "fast", stopped, stats = ?self.stats, "search finished");
        stopped
    }

    fn current_match(&self) -> Option<Match> {
        self.mapping.is_complete().then(|| self.mapping.pairs())
    }

    fn stats(&self) -> SearchStats {
        self.stats
    }
}
