//! A matcher scanning the whole host graph at every step.

use super::{report, Match, MatchDelegate, Matcher, SearchStats};
use crate::{graph::HostGraph, mapping::PartialMapping, pattern::SearchPattern};

/// A backtracking matcher without candidate restriction.
///
/// At every step, every host node is tested against the next pattern node of
/// the search plan, with all edges of the pattern node checked. Correct but
/// slow: use as a baseline.
#[derive(Clone, Debug)]
pub struct SimpleMatcher<'a> {
    pattern: &'a SearchPattern,
    host: &'a HostGraph,
    mapping: PartialMapping<'a>,
    stats: SearchStats,
}

impl<'a> SimpleMatcher<'a> {
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
        let p = pattern.plan().extension(self.mapping.len()).node();
        let edges = pattern.graph().incident_edges(p);

        for h in host.nodes() {
            self.stats.candidates += 1;
            if self.mapping.is_feasible_node_pair(p, h)
                && self.mapping.is_feasible_connected_pair(p, h, edges)
            {
                self.mapping.extend(p, h);
                self.stats.extensions += 1;
                if self.extend_match(delegate) {
                    return true;
                }
                self.mapping.remove(p, h);
            }
        }
        false
    }
}

impl Matcher for SimpleMatcher<'_> {
    fn search_with(&mut self, delegate: &mut dyn MatchDelegate) -> bool {
        self.mapping.clear();
        self.stats = SearchStats::default();
        let stopped = self.extend_match(delegate);
        tracing::debug!(matcher = "simple", stopped, stats = ?self.stats, "search finished");
        stopped
    }

    fn current_match(&self) -> Option<Match> {
        self.mapping.is_complete().then(|| self.mapping.pairs())
    }

    fn stats(&self) -> SearchStats {
        self.stats
    }
}
