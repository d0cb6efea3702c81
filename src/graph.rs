//! Graph assembly and pruning.
//!
//! Assembly and pruning are two separate phases: [`SectionGraph::assemble`] materialises every
//! section and every resolved edge, and [`SectionGraph::prune`] filters that graph once. Degrees
//! are computed from the graph before anything is removed, so a node that only drops under the
//! threshold because a neighbour was pruned survives.

use crate::hierarchy::Outline;
use crate::references::EdgeCounts;
use crate::section::{Level, Section};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A section as it appears in the graph.
pub struct GraphNode {
    /// Section id.
    pub id: String,
    /// Section title.
    pub title: String,
    /// Section level.
    pub level: Level,
}

impl From<&Section> for GraphNode {
    fn from(section: &Section) -> Self {
        Self {
            id: section.id.clone(),
            title: section.title.clone(),
            level: section.level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A weighted edge between two section ids.
pub struct GraphEdge {
    /// Id of the section containing the references.
    pub source: String,
    /// Id of the section owning the cited labels.
    pub target: String,
    /// Number of citations behind this edge.
    pub weight: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Node and edge lists for renderers and other consumers.
pub struct GraphExport {
    /// Nodes in document order.
    pub nodes: Vec<GraphNode>,
    /// Edges ordered by source, then target, in document order.
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, Default)]
/// Directed, weighted graph of sections.
pub struct SectionGraph {
    graph: DiGraph<GraphNode, usize>,
    by_id: HashMap<String, NodeIndex>,
}

impl SectionGraph {
    #[must_use]
    /// Build the full graph: one node per section of `outline`, one edge per counted pair.
    pub fn assemble(outline: &Outline, edges: &EdgeCounts) -> Self {
        let mut graph = DiGraph::with_capacity(outline.len(), edges.len());
        let indices: Vec<NodeIndex> = outline
            .sections()
            .iter()
            .map(|section| graph.add_node(GraphNode::from(section)))
            .collect();
        for (&(source, target), &weight) in edges {
            if let (Some(&a), Some(&b)) = (indices.get(source), indices.get(target)) {
                graph.add_edge(a, b, weight);
            }
        }
        Self::from_graph(graph)
    }

    #[must_use]
    /// Drop every node with fewer than `threshold` distinct neighbours, and its edges.
    ///
    /// Runs exactly once against this graph's degrees; a threshold of zero keeps everything.
    pub fn prune(&self, threshold: usize) -> Self {
        if threshold == 0 {
            return self.clone();
        }
        let keep: HashSet<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&n| self.distinct_degree(n) >= threshold)
            .collect();
        let graph = self.graph.filter_map(
            |n, node| keep.contains(&n).then(|| node.clone()),
            |_, &weight| Some(weight),
        );
        debug!(
            threshold,
            removed = self.graph.node_count() - graph.node_count(),
            "pruned section graph"
        );
        Self::from_graph(graph)
    }

    fn from_graph(graph: DiGraph<GraphNode, usize>) -> Self {
        let by_id = graph
            .node_indices()
            .map(|n| (graph[n].id.clone(), n))
            .collect();
        Self { graph, by_id }
    }

    fn distinct_degree(&self, node: NodeIndex) -> usize {
        self.graph
            .neighbors_undirected(node)
            .collect::<HashSet<_>>()
            .len()
    }

    #[must_use]
    /// Number of sections in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    /// Number of distinct `(source, target)` edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    /// Whether a section with `id` is in the graph.
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    #[must_use]
    /// Node for section `id`.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.by_id.get(id).map(|&n| &self.graph[n])
    }

    #[must_use]
    /// Number of distinct sections `id` is connected to, in either direction.
    pub fn degree(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).map(|&n| self.distinct_degree(n))
    }

    #[must_use]
    /// Number of sections citing `id`.
    pub fn in_degree(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).map(|&n| self.in_degree_of(n))
    }

    pub(crate) fn in_degree_of(&self, node: NodeIndex) -> usize {
        self.graph
            .neighbors_directed(node, Direction::Incoming)
            .count()
    }

    #[must_use]
    /// Weight of the edge `source -> target`, if present.
    pub fn edge_weight(&self, source: &str, target: &str) -> Option<usize> {
        let (&a, &b) = (self.by_id.get(source)?, self.by_id.get(target)?);
        self.graph
            .find_edge(a, b)
            .and_then(|e| self.graph.edge_weight(e))
            .copied()
    }

    /// Nodes in document order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.graph.node_indices().map(|n| &self.graph[n])
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = GraphEdge> + '_ {
        self.graph.edge_references().map(|e| GraphEdge {
            source: self.graph[e.source()].id.clone(),
            target: self.graph[e.target()].id.clone(),
            weight: *e.weight(),
        })
    }

    pub(crate) fn inner(&self) -> &DiGraph<GraphNode, usize> {
        &self.graph
    }

    #[must_use]
    /// Node and edge lists for interchange.
    pub fn export(&self) -> GraphExport {
        GraphExport {
            nodes: self.nodes().cloned().collect(),
            edges: self.edges().collect(),
        }
    }
}

#[cfg(test)]
#[path = "tests/graph.rs"]
mod tests;
