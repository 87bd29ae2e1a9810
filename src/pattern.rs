//! Compiled search patterns.
//!
//! A [`SearchPattern`] is built once per query from a raw pattern graph. It
//! owns a compiled copy of the graph (query labels parsed), the label matchers
//! used for nodes and edges, and the [`SearchPlan`]. The raw graph is never
//! modified.

use crate::{
    config::SearchConfig,
    graph::{EdgeIndex, Graph, NodeIndex},
    label::{LabelMatcher, PatternLabel},
    plan::SearchPlan,
};

/// A compiled pattern graph.
pub type PatternGraph = Graph<PatternLabel, PatternLabel>;

/// A pattern ready to be matched.
#[derive(Clone, Debug)]
pub struct SearchPattern {
    graph: PatternGraph,
    node_matcher: LabelMatcher,
    edge_matcher: LabelMatcher,
    plan: SearchPlan,
    wildcards: bool,
}

impl SearchPattern {
    /// Compile `pattern` with the default configuration.
    pub fn new(pattern: &Graph<String, String>) -> Self {
        Self::with_config(pattern, &SearchConfig::default())
    }

    /// Compile `pattern`.
    ///
    /// If `config.wildcards` is set, string labels encoding query labels are
    /// parsed into [`crate::QueryLabel`]s. Otherwise all labels are concrete.
    pub fn with_config(pattern: &Graph<String, String>, config: &SearchConfig) -> Self {
        let graph = if config.wildcards {
            pattern.map_labels(|l| PatternLabel::compile(l), |l| PatternLabel::compile(l))
        } else {
            pattern.map_labels(
                |l| PatternLabel::from(l.as_str()),
                |l| PatternLabel::from(l.as_str()),
            )
        };
        Self::from_graph(graph, config)
    }

    /// A pattern matched with exact label equality, without query labels.
    pub fn exact(pattern: &Graph<String, String>) -> Self {
        Self::with_config(pattern, &SearchConfig::default().with_wildcards(false))
    }

    /// Build a pattern from a graph whose labels may already be compiled.
    ///
    /// Existing query labels are kept as they are; if `config.wildcards` is
    /// set, the remaining concrete labels are compiled.
    pub fn from_compiled(pattern: PatternGraph, config: &SearchConfig) -> Self {
        let graph = if config.wildcards {
            pattern.map_labels(|l| l.clone().recompile(), |l| l.clone().recompile())
        } else {
            pattern
        };
        Self::from_graph(graph, config)
    }

    fn from_graph(graph: PatternGraph, config: &SearchConfig) -> Self {
        let node_queries = graph.nodes().any(|n| graph.node_label(n).is_query());
        let edge_queries = graph.edges().any(|e| graph.edge_label(e).is_query());
        let wildcards = node_queries || edge_queries;
        let matcher = if wildcards {
            LabelMatcher::Wildcard
        } else {
            LabelMatcher::Exact
        };
        let plan = SearchPlan::new(&graph, config);
        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            wildcards,
            "compiled search pattern"
        );
        Self {
            graph,
            node_matcher: matcher,
            edge_matcher: matcher,
            plan,
            wildcards,
        }
    }

    /// Override the node label matcher.
    pub fn with_node_matcher(mut self, matcher: LabelMatcher) -> Self {
        self.node_matcher = matcher;
        self
    }

    /// Override the edge label matcher.
    pub fn with_edge_matcher(mut self, matcher: LabelMatcher) -> Self {
        self.edge_matcher = matcher;
        self
    }

    /// The compiled pattern graph.
    pub fn graph(&self) -> &PatternGraph {
        &self.graph
    }

    /// The search plan.
    pub fn plan(&self) -> &SearchPlan {
        &self.plan
    }

    /// The matcher for node labels.
    pub fn node_matcher(&self) -> LabelMatcher {
        self.node_matcher
    }

    /// The matcher for edge labels.
    pub fn edge_matcher(&self) -> LabelMatcher {
        self.edge_matcher
    }

    /// Whether the pattern contains query labels.
    pub fn uses_wildcards(&self) -> bool {
        self.wildcards
    }

    /// Number of pattern nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether pattern node `p` accepts the host label `host`.
    #[inline]
    pub(crate) fn node_matches(&self, p: NodeIndex, host: &str) -> bool {
        self.node_matcher.matches(self.graph.node_label(p), host)
    }

    /// Whether pattern edge `e` accepts the host label `host`.
    #[inline]
    pub(crate) fn edge_matches(&self, e: EdgeIndex, host: &str) -> bool {
        self.edge_matcher.matches(self.graph.edge_label(e), host)
    }
}

impl From<&Graph<String, String>> for SearchPattern {
    fn from(pattern: &Graph<String, String>) -> Self {
        Self::new(pattern)
    }
}
