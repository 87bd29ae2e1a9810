//! A VF2-style matcher pruning with terminal sets.

use super::{report, Match, MatchDelegate, Matcher, SearchStats};
use crate::{graph::HostGraph, mapping::TerminalMapping, pattern::SearchPattern};

/// A backtracking matcher using terminal sets.
///
/// Candidates for a pattern node adjacent to the mapped region are taken from
/// the host terminal set. Each candidate pair additionally has to pass the
/// look-ahead test of [`TerminalMapping::is_feasible_candidate`].
#[derive(Clone, Debug)]
pub struct Vf2Matcher<'a> {
    pattern: &'a SearchPattern,
    mapping: TerminalMapping<'a>,
    stats: SearchStats,
}

impl<'a> Vf2Matcher<'a> {
    /// A matcher of `pattern` in `host`.
    pub fn new(pattern: &'a SearchPattern, host: &'a HostGraph) -> Self {
        Self {
            pattern,
            mapping: TerminalMapping::new(pattern, host),
            stats: SearchStats::default(),
        }
    }

    /// The current partial mapping.
    pub fn mapping(&self) -> &TerminalMapping<'a> {
        &self.mapping
    }

    fn extend_match(&mut self, delegate: &mut dyn MatchDelegate) -> bool {
        if self.mapping.is_complete() {
            return report(self.mapping.as_partial(), delegate, &mut self.stats);
        }
        let p = self.pattern.plan().extension(self.mapping.len()).node();

        let mut candidate = None;
        while let Some(h) = self.mapping.next_terminal_host_node(p, candidate) {
            candidate = Some(h);
            self.stats.candidates += 1;
            if !self.mapping.is_feasible_candidate(p, h) {
                continue;
            }
            self.mapping.extend(p, h);
            self.stats.extensions += 1;
            if self.extend_match(delegate) {
                return true;
            }
            self.mapping.remove(p, h);
        }
        false
    }
}

impl Matcher for Vf2Matcher<'_> {
    fn search_with(&mut self, delegate: &mut dyn MatchDelegate) -> bool {
        self.mapping.clear();
        self.stats = SearchStats::default();
        let stopped = self.extend_match(delegate);
        tracing::debug!(matcher = "vf2", stopped, stats = ?self.stats, "search finished");
        stopped
    }

    fn current_match(&self) -> Option<Match> {
        self.mapping.is_complete().then(|| self.mapping.pairs())
    }

    fn stats(&self) -> SearchStats {
        self.stats
    }
}
