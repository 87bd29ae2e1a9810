//! The pattern matchers.
//!
//! The [`Matcher`] trait is the interface for subgraph matching. The following
//! implementations are provided, all backtracking over the extension order of
//! the pattern's [`crate::SearchPlan`]:
//!  - [`SimpleMatcher`], which tries every host node for every pattern node.
//!    Mostly useful as a baseline and for testing.
//!  - [`FastMatcher`], which restricts candidates to the host neighbours of
//!    already mapped nodes, using the join edges of the search plan.
//!  - [`Vf2Matcher`], which restricts candidates to the terminal sets and
//!    prunes with VF2 look-ahead counts.
//!
//! All three find the same matches, possibly in a different order.

pub mod delegate;
mod fast;
mod simple;
mod vf2;

use std::{fmt, str::FromStr};

use crate::{
    config::ConfigError,
    graph::{HostGraph, NodeIndex},
    mapping::PartialMapping,
    pattern::SearchPattern,
};

pub use self::delegate::{CollectAll, MatchDelegate, StopAtFirst};
pub use self::fast::FastMatcher;
pub use self::simple::SimpleMatcher;
pub use self::vf2::Vf2Matcher;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A match: pairs of pattern and host nodes, ordered by pattern node.
pub type Match = Vec<(NodeIndex, NodeIndex)>;

/// Counters of the work done by the last search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Host nodes considered as images of a pattern node.
    pub candidates: usize,
    /// Pairs added to the mapping.
    pub extensions: usize,
    /// Complete mappings handed to the delegate.
    pub matches: usize,
}

/// Find occurrences of a pattern in a host graph.
pub trait Matcher {
    /// Search for matches, handing each to `delegate`.
    ///
    /// Return `true` if the delegate stopped the search. A delegate that never
    /// stops makes the search return `false`, even if matches were found.
    fn search_with(&mut self, delegate: &mut dyn MatchDelegate) -> bool;

    /// Search for the first match.
    ///
    /// Return whether a match was found. It can then be retrieved with
    /// [`Matcher::current_match`].
    fn search(&mut self) -> bool {
        self.search_with(&mut StopAtFirst)
    }

    /// The current mapping, if it is complete.
    fn current_match(&self) -> Option<Match>;

    /// Counters of the last search.
    fn stats(&self) -> SearchStats;

    /// Find all matches.
    fn find_all(&mut self) -> Vec<Match> {
        let mut collect = CollectAll::new();
        self.search_with(&mut collect);
        collect.into_matches()
    }

    /// Count all matches.
    fn count_matches(&mut self) -> usize {
        let mut count = 0;
        self.search_with(&mut delegate::from_fn(|_| {
            count += 1;
            false
        }));
        count
    }
}

/// Hand a complete mapping to the delegate.
fn report(
    mapping: &PartialMapping<'_>,
    delegate: &mut dyn MatchDelegate,
    stats: &mut SearchStats,
) -> bool {
    stats.matches += 1;
    tracing::trace!(pairs = ?mapping.pairs(), "found match");
    delegate.handle_match(mapping)
}

/// The available matching algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MatcherKind {
    /// [`SimpleMatcher`]
    Simple,
    /// [`FastMatcher`]
    Fast,
    /// [`Vf2Matcher`]
    #[default]
    Vf2,
}

impl MatcherKind {
    /// All matcher kinds.
    pub const ALL: [MatcherKind; 3] = [MatcherKind::Simple, MatcherKind::Fast, MatcherKind::Vf2];

    /// Create a matcher of this kind.
    pub fn build<'a>(self, pattern: &'a SearchPattern, host: &'a HostGraph) -> AnyMatcher<'a> {
        match self {
            MatcherKind::Simple => AnyMatcher::Simple(SimpleMatcher::new(pattern, host)),
            MatcherKind::Fast => AnyMatcher::Fast(FastMatcher::new(pattern, host)),
            MatcherKind::Vf2 => AnyMatcher::Vf2(Vf2Matcher::new(pattern, host)),
        }
    }
}

impl FromStr for MatcherKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(MatcherKind::Simple),
            "fast" => Ok(MatcherKind::Fast),
            "vf2" => Ok(MatcherKind::Vf2),
            _ => Err(ConfigError::UnknownMatcher(s.to_string())),
        }
    }
}

impl fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatcherKind::Simple => "simple",
            MatcherKind::Fast => "fast",
            MatcherKind::Vf2 => "vf2",
        };
        write!(f, "{name}")
    }
}

/// A matcher of any kind, chosen at runtime.
#[derive(Clone, Debug)]
pub enum AnyMatcher<'a> {
    /// A [`SimpleMatcher`]
    Simple(SimpleMatcher<'a>),
    /// A [`FastMatcher`]
    Fast(FastMatcher<'a>),
    /// A [`Vf2Matcher`]
    Vf2(Vf2Matcher<'a>),
}

impl AnyMatcher<'_> {
    /// The kind of the matcher.
    pub fn kind(&self) -> MatcherKind {
        match self {
            AnyMatcher::Simple(_) => MatcherKind::Simple,
            AnyMatcher::Fast(_) => MatcherKind::Fast,
            AnyMatcher::Vf2(_) => MatcherKind::Vf2,
        }
    }
}

impl Matcher for AnyMatcher<'_> {
    fn search_with(&mut self, delegate: &mut dyn MatchDelegate) -> bool {
        match self {
            AnyMatcher::Simple(m) => m.search_with(delegate),
            AnyMatcher::Fast(m) => m.search_with(delegate),
            AnyMatcher::Vf2(m) => m.search_with(delegate),
        }
    }

    fn current_match(&self) -> Option<Match> {
        match self {
            AnyMatcher::Simple(m) => m.current_match(),
            AnyMatcher::Fast(m) => m.current_match(),
            AnyMatcher::Vf2(m) => m.current_match(),
        }
    }

    fn stats(&self) -> SearchStats {
        match self {
            AnyMatcher::Simple(m) => m.stats(),
            AnyMatcher::Fast(m) => m.stats(),
            AnyMatcher::Vf2(m) => m.stats(),
        }
    }
}
