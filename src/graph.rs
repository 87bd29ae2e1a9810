//! Undirected labelled multigraphs.
//!
//! Both pattern and host graphs are stored as a [`Graph`]. Nodes and edges are
//! addressed by dense indices: the index of a node is its position in the
//! graph's node sequence, and is used as the key into every per-node array of
//! the matchers (mappings, terminal sets, search plans).
//!
//! Edges are undirected. Both endpoints hold the edge in their adjacency list,
//! in insertion order. Self-loops and parallel edges are allowed and are
//! counted plainly in the degree.

use std::fmt::{self, Debug, Display};

use derive_more::{From, Into};
use itertools::Itertools;
use petgraph::{dot::Dot, graph::UnGraph, unionfind::UnionFind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of a node in a [`Graph`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, From, Into)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeIndex(pub usize);

/// Index of an edge in a [`Graph`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, From, Into)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeIndex(pub usize);

impl NodeIndex {
    /// The index as a `usize`, for indexing into per-node arrays.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl EdgeIndex {
    /// The index as a `usize`.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl Debug for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl Debug for EdgeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct Node<N> {
    label: N,
    adjacency: Vec<EdgeIndex>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct Edge<E> {
    first: NodeIndex,
    second: NodeIndex,
    label: E,
}

/// An undirected multigraph with node labels `N` and edge labels `E`.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Graph<N, E> {
    nodes: Vec<Node<N>>,
    edges: Vec<Edge<E>>,
}

/// The graph type of hosts and of uncompiled patterns: string labels on nodes
/// (e.g. atom symbols) and on edges (e.g. bond symbols).
pub type HostGraph = Graph<String, String>;

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl<N, E> Graph<N, E> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with preallocated storage.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
        }
    }

    /// Append a node. Its index is the number of nodes before the call.
    pub fn add_node(&mut self, label: N) -> NodeIndex {
        let index = NodeIndex(self.nodes.len());
        self.nodes.push(Node {
            label,
            adjacency: Vec::new(),
        });
        index
    }

    /// Add an undirected edge between `u` and `v`.
    ///
    /// No check is made for parallel edges or self-loops. A self-loop appears
    /// twice in the adjacency list of its node.
    ///
    /// # Panics
    ///
    /// Panics if `u` or `v` is not a node of the graph.
    pub fn add_edge(&mut self, u: NodeIndex, v: NodeIndex, label: E) -> EdgeIndex {
        assert!(
            u.0 < self.nodes.len() && v.0 < self.nodes.len(),
            "edge endpoints {u:?}, {v:?} out of bounds"
        );
        let index = EdgeIndex(self.edges.len());
        self.edges.push(Edge {
            first: u,
            second: v,
            label,
        });
        self.nodes[u.0].adjacency.push(index);
        self.nodes[v.0].adjacency.push(index);
        index
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node indices, in order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeIndex> + Clone {
        (0..self.nodes.len()).map(NodeIndex)
    }

    /// All edges, each reported once.
    ///
    /// Edges are visited node by node and reported from their lower-indexed
    /// endpoint only.
    pub fn edges(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.nodes().flat_map(move |n| {
            self.incident_edges(n).iter().copied().filter(move |&e| {
                let (a, b) = self.endpoints(e);
                n == a.min(b)
            })
        })
        // Self-loops are listed twice in the adjacency of their node
        .dedup()
    }

    /// The label of node `n`.
    #[inline]
    pub fn node_label(&self, n: NodeIndex) -> &N {
        &self.nodes[n.0].label
    }

    /// The label of edge `e`.
    #[inline]
    pub fn edge_label(&self, e: EdgeIndex) -> &E {
        &self.edges[e.0].label
    }

    /// Incident edges of `n`, in insertion order.
    #[inline]
    pub fn incident_edges(&self, n: NodeIndex) -> &[EdgeIndex] {
        &self.nodes[n.0].adjacency
    }

    /// Number of incident edges of `n`, self-loops counted twice.
    #[inline]
    pub fn degree(&self, n: NodeIndex) -> usize {
        self.nodes[n.0].adjacency.len()
    }

    /// The neighbours of `n`, one per incident edge.
    pub fn neighbours(&self, n: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.incident_edges(n)
            .iter()
            .map(move |&e| self.opposite(e, n))
    }

    /// The two endpoints of `e`, in insertion order.
    #[inline]
    pub fn endpoints(&self, e: EdgeIndex) -> (NodeIndex, NodeIndex) {
        let edge = &self.edges[e.0];
        (edge.first, edge.second)
    }

    /// The endpoint of `e` that is not `n`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is not an endpoint of `e`.
    #[inline]
    pub fn opposite(&self, e: EdgeIndex, n: NodeIndex) -> NodeIndex {
        let edge = &self.edges[e.0];
        if edge.first == n {
            edge.second
        } else if edge.second == n {
            edge.first
        } else {
            panic!("{n:?} is not an endpoint of {e:?}")
        }
    }

    /// The first edge between `u` and `v`, scanning the adjacency of `u`.
    pub fn edge_between(&self, u: NodeIndex, v: NodeIndex) -> Option<EdgeIndex> {
        self.edges_between(u, v).next()
    }

    /// All edges between `u` and `v`, in the adjacency order of `u`.
    pub fn edges_between(
        &self,
        u: NodeIndex,
        v: NodeIndex,
    ) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.incident_edges(u)
            .iter()
            .copied()
            .filter(move |&e| self.opposite(e, u) == v)
            .dedup()
    }

    /// Whether there is an edge between `u` and `v`.
    pub fn has_edge(&self, u: NodeIndex, v: NodeIndex) -> bool {
        self.edge_between(u, v).is_some()
    }

    /// Copy all nodes and edges of `other` into `self`.
    ///
    /// Node `n` of `other` becomes node `n + offset` of `self`, where `offset`
    /// is the returned value (the node count of `self` before the merge).
    pub fn add_graph(&mut self, other: &Self) -> usize
    where
        N: Clone,
        E: Clone,
    {
        let offset = self.nodes.len();
        for n in other.nodes() {
            self.add_node(other.node_label(n).clone());
        }
        for e in other.edges() {
            let (u, v) = other.endpoints(e);
            self.add_edge(
                NodeIndex(u.0 + offset),
                NodeIndex(v.0 + offset),
                other.edge_label(e).clone(),
            );
        }
        offset
    }

    /// A graph with the same structure and transformed labels.
    ///
    /// Node and edge indices are preserved.
    pub fn map_labels<N2, E2>(
        &self,
        mut node_map: impl FnMut(&N) -> N2,
        mut edge_map: impl FnMut(&E) -> E2,
    ) -> Graph<N2, E2> {
        Graph {
            nodes: self
                .nodes
                .iter()
                .map(|node| Node {
                    label: node_map(&node.label),
                    adjacency: node.adjacency.clone(),
                })
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|edge| Edge {
                    first: edge.first,
                    second: edge.second,
                    label: edge_map(&edge.label),
                })
                .collect(),
        }
    }

    /// Partition the nodes into connected components.
    ///
    /// Components are ordered by their smallest node, nodes within a component
    /// by index.
    pub fn connected_components(&self) -> Vec<Vec<NodeIndex>> {
        let mut uf = UnionFind::<usize>::new(self.node_count());
        for edge in &self.edges {
            uf.union(edge.first.0, edge.second.0);
        }
        let labels = uf.into_labeling();
        let mut label_to_ind = vec![None; self.node_count()];
        let mut partition: Vec<Vec<NodeIndex>> = Vec::new();
        for n in self.nodes() {
            let ind = *label_to_ind[labels[n.0]].get_or_insert_with(|| {
                partition.push(Vec::new());
                partition.len() - 1
            });
            partition[ind].push(n);
        }
        partition
    }

    /// Whether the graph is connected. The empty graph is connected.
    pub fn is_connected(&self) -> bool {
        self.connected_components().len() <= 1
    }

    /// Render the graph in graphviz dot format.
    pub fn dot_string(&self) -> String
    where
        N: Display,
        E: Display,
    {
        let mut pg = UnGraph::<&N, &E>::with_capacity(self.node_count(), self.edge_count());
        for node in &self.nodes {
            pg.add_node(&node.label);
        }
        for edge in &self.edges {
            pg.add_edge(
                petgraph::graph::NodeIndex::new(edge.first.0),
                petgraph::graph::NodeIndex::new(edge.second.0),
                &edge.label,
            );
        }
        format!("{}", Dot::new(&pg))
    }
}

impl<N: Debug, E: Debug> Debug for Graph<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| format!("{i}:{:?}", n.label))
            .join(", ");
        let edges = self
            .edges
            .iter()
            .map(|e| format!("{}-{}:{:?}", e.first.0, e.second.0, e.label))
            .join(", ");
        write!(f, "Graph {{ nodes: [{nodes}], edges: [{edges}] }}")
    }
}
