#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod config;
pub mod graph;
pub mod label;
pub mod mapping;
pub mod matcher;
pub mod pattern;
pub mod plan;

pub use config::{ConfigError, Priority, SearchConfig};
pub use graph::{EdgeIndex, Graph, HostGraph, NodeIndex};
pub use label::{LabelMatcher, LabelParseError, PatternLabel, QueryLabel};
pub use mapping::{PartialMapping, TerminalMapping};
pub use matcher::{
    delegate::{from_fn, FnDelegate, PrintMatches},
    AnyMatcher, CollectAll, FastMatcher, Match, MatchDelegate, Matcher, MatcherKind, SearchStats,
    SimpleMatcher, StopAtFirst, Vf2Matcher,
};
pub use pattern::{PatternGraph, SearchPattern};
pub use plan::{Extension, FrequencyTable, SearchPlan};
