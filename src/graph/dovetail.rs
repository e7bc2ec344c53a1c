//! Dovetail overlap queries.
//!
//! Every stored edge carries an `is_dovetail` flag and, for dovetails, the
//! segment end (`L`/`R`) it joins on each side. The queries here filter the
//! edges incident to a selection of nodes by those attributes. Results are
//! produced lazily; the graph is borrowed for as long as a result lives.
//!
//! Unknown node ids select nothing instead of failing.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;
use thiserror::Error;

use crate::core::types::SegmentEnd;
use crate::graph::store::{EdgeRef, GraphStore};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DovetailError {
    #[error("'{0}' is not a node or a sequence of nodes")]
    NotANodeOrSequence(String),

    #[error("'{0}' in the node sequence is not a valid node id")]
    InvalidNode(String),
}

/// The nodes a query applies to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NodeBunch {
    #[default]
    All,
    Single(String),
    Many(Vec<String>),
}

impl NodeBunch {
    /// Read a node selection from text: `*` for all nodes, a single id, or
    /// a comma-separated list of ids.
    ///
    /// # Errors
    ///
    /// Returns `DovetailError::NotANodeOrSequence` for empty text and
    /// `DovetailError::InvalidNode` for an empty list member.
    pub fn parse(text: &str) -> Result<Self, DovetailError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DovetailError::NotANodeOrSequence(text.to_string()));
        }
        if text == "*" {
            return Ok(Self::All);
        }
        if !text.contains(',') {
            return Ok(Self::Single(text.to_string()));
        }

        text.split(',')
            .map(|id| match id.trim() {
                "" => Err(DovetailError::InvalidNode(id.to_string())),
                id => Ok(id.to_string()),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::Many)
    }

    pub fn many<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Many(ids.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for NodeBunch {
    fn from(id: &str) -> Self {
        Self::Single(id.to_string())
    }
}

impl From<Vec<String>> for NodeBunch {
    fn from(ids: Vec<String>) -> Self {
        Self::Many(ids)
    }
}

/// A degree query result: a count for one known node, a per-node map otherwise
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Degree {
    Single(usize),
    Many(BTreeMap<String, usize>),
}

/// A dovetail edge reached from one of its endpoints
#[derive(Debug, Clone, Copy)]
pub struct EndEdge<'a> {
    /// The queried endpoint
    pub node: &'a str,
    pub edge: EdgeRef<'a>,
}

impl<'a> EndEdge<'a> {
    /// The endpoint across the overlap; the node itself for a self-loop
    #[must_use]
    pub fn neighbor(&self) -> &'a str {
        self.edge.other(self.node)
    }
}

/// Dovetail queries over a graph store
#[derive(Debug)]
pub struct Dovetails<'a, G> {
    graph: &'a G,
}

impl<'a, G> Clone for Dovetails<'a, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, G> Copy for Dovetails<'a, G> {}

impl<'a, G: GraphStore + 'a> Dovetails<'a, G> {
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    /// Known nodes of `nodes`, as the store's own ids, without repeats
    fn resolve(&self, nodes: &NodeBunch) -> Vec<&'a str> {
        let graph = self.graph;
        match nodes {
            NodeBunch::All => graph.node_ids().collect(),
            NodeBunch::Single(id) => graph.node_key(id).into_iter().collect(),
            NodeBunch::Many(ids) => {
                let mut seen = HashSet::new();
                ids.iter()
                    .filter_map(|id| graph.node_key(id))
                    .filter(|id| seen.insert(*id))
                    .collect()
            }
        }
    }

    /// Dovetail edges touching `nodes`, each once
    pub fn dovetails(&self, nodes: &NodeBunch) -> Box<dyn Iterator<Item = EdgeRef<'a>> + 'a> {
        let graph = self.graph;
        if *nodes == NodeBunch::All {
            return Box::new(graph.edges().filter(|e| e.data.is_dovetail));
        }

        let mut seen = HashSet::new();
        Box::new(
            self.resolve(nodes)
                .into_iter()
                .flat_map(move |id| graph.incident_edges(id))
                .filter(move |e| e.data.is_dovetail && seen.insert(e.key)),
        )
    }

    /// Endpoints of dovetail edges, restricted to `nodes`.
    ///
    /// # Errors
    ///
    /// Returns `DovetailError::InvalidNode` if a listed id is empty.
    pub fn dovetail_node_set(&self, nodes: &NodeBunch) -> Result<BTreeSet<&'a str>, DovetailError> {
        if let NodeBunch::Many(ids) = nodes {
            if let Some(id) = ids.iter().find(|id| id.trim().is_empty()) {
                return Err(DovetailError::InvalidNode(id.clone()));
            }
        }

        let all: BTreeSet<&'a str> = self
            .graph
            .edges()
            .filter(|e| e.data.is_dovetail)
            .flat_map(|e| [e.from_node(), e.to_node()])
            .collect();

        Ok(match nodes {
            NodeBunch::All => all,
            _ => self
                .resolve(nodes)
                .into_iter()
                .filter(|id| all.contains(id))
                .collect(),
        })
    }

    /// Dovetail edges joining the right end of a node in `nodes`
    pub fn right_end(&self, nodes: &NodeBunch) -> impl Iterator<Item = EndEdge<'a>> + 'a {
        self.end_edges(nodes, SegmentEnd::Right)
    }

    /// Dovetail edges joining the left end of a node in `nodes`
    pub fn left_end(&self, nodes: &NodeBunch) -> impl Iterator<Item = EndEdge<'a>> + 'a {
        self.end_edges(nodes, SegmentEnd::Left)
    }

    pub fn right_neighbors(&self, nodes: &NodeBunch) -> impl Iterator<Item = &'a str> + 'a {
        self.right_end(nodes).map(|e| e.neighbor())
    }

    pub fn left_neighbors(&self, nodes: &NodeBunch) -> impl Iterator<Item = &'a str> + 'a {
        self.left_end(nodes).map(|e| e.neighbor())
    }

    #[must_use]
    pub fn right_degree(&self, nodes: &NodeBunch) -> Degree {
        self.degree(nodes, SegmentEnd::Right)
    }

    #[must_use]
    pub fn left_degree(&self, nodes: &NodeBunch) -> Degree {
        self.degree(nodes, SegmentEnd::Left)
    }

    fn end_edges(&self, nodes: &NodeBunch, end: SegmentEnd) -> impl Iterator<Item = EndEdge<'a>> + 'a {
        let this = *self;
        self.resolve(nodes)
            .into_iter()
            .flat_map(move |id| this.end_edges_of(id, end))
    }

    /// A self-loop joining the same end on both sides is yielded twice
    fn end_edges_of(&self, node: &'a str, end: SegmentEnd) -> impl Iterator<Item = EndEdge<'a>> + 'a {
        self.graph
            .incident_edges(node)
            .filter(|e| e.data.is_dovetail)
            .flat_map(move |edge| {
                let from = edge.from_node() == node && edge.data.from_segment_end == Some(end);
                let to = edge.to_node() == node && edge.data.to_segment_end == Some(end);
                let hit = EndEdge { node, edge };
                from.then_some(hit).into_iter().chain(to.then_some(hit))
            })
    }

    fn degree(&self, nodes: &NodeBunch, end: SegmentEnd) -> Degree {
        if let NodeBunch::Single(id) = nodes {
            if let Some(id) = self.graph.node_key(id) {
                return Degree::Single(self.end_edges_of(id, end).count());
            }
        }

        Degree::Many(
            self.resolve(nodes)
                .into_iter()
                .map(|id| (id.to_string(), self.end_edges_of(id, end).count()))
                .collect(),
        )
    }
}
