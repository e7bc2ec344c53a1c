//! Directed multigraph storage with per-edge attributes.
//!
//! Nodes keep their insertion order. An edge may reference a node that has
//! not been defined yet; the id is registered as a bare slot and filled in
//! when its segment arrives. Storage is append-only.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::core::edge::Edge;
use crate::core::node::Node;
use crate::core::types::SegmentEnd;

/// An edge together with the attributes derived when it was stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeData {
    pub edge: Edge,
    pub is_dovetail: bool,
    /// Set only for dovetail edges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_segment_end: Option<SegmentEnd>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_segment_end: Option<SegmentEnd>,
}

impl EdgeData {
    /// Attributes for an edge that does not take part in a dovetail overlap
    #[must_use]
    pub fn plain(edge: Edge) -> Self {
        Self {
            edge,
            is_dovetail: false,
            from_segment_end: None,
            to_segment_end: None,
        }
    }

    /// Attributes for a dovetail edge joining `from_end` to `to_end`
    #[must_use]
    pub fn dovetail(edge: Edge, from_end: SegmentEnd, to_end: SegmentEnd) -> Self {
        Self {
            edge,
            is_dovetail: true,
            from_segment_end: Some(from_end),
            to_segment_end: Some(to_end),
        }
    }
}

/// Borrowed view of a stored edge and its key
#[derive(Debug, Clone, Copy)]
pub struct EdgeRef<'a> {
    pub key: &'a str,
    pub data: &'a EdgeData,
}

impl<'a> EdgeRef<'a> {
    #[must_use]
    pub fn from_node(&self) -> &'a str {
        &self.data.edge.from_node
    }

    #[must_use]
    pub fn to_node(&self) -> &'a str {
        &self.data.edge.to_node
    }

    /// The endpoint opposite `node`; `node` itself for a self-loop
    #[must_use]
    pub fn other(&self, node: &str) -> &'a str {
        if self.from_node() == node {
            self.to_node()
        } else {
            self.from_node()
        }
    }
}

/// Read access needed by graph queries.
///
/// Node ids handed out by the store borrow from the store itself, so
/// callers can resolve arbitrary ids through [`GraphStore::node_key`] and
/// keep lazy iterators alive for as long as the store.
pub trait GraphStore {
    fn contains_node(&self, id: &str) -> bool;

    /// The store's own copy of `id`, if the node is known
    fn node_key<'a>(&'a self, id: &str) -> Option<&'a str>;

    /// All node ids in insertion order
    fn node_ids(&self) -> impl Iterator<Item = &str> + '_;

    /// All edges, each exactly once
    fn edges(&self) -> impl Iterator<Item = EdgeRef<'_>> + '_;

    /// Edges leaving or entering `node`; a self-loop is reported once
    fn incident_edges<'a>(&'a self, node: &'a str) -> impl Iterator<Item = EdgeRef<'a>> + 'a;
}

#[derive(Debug, Clone, Default)]
struct NodeSlot {
    id: String,
    node: Option<Node>,
    out_edges: Vec<usize>,
    in_edges: Vec<usize>,
}

/// Keyed multigraph: parallel edges between the same pair of nodes are
/// distinguished by their key
#[derive(Debug, Clone, Default)]
pub struct MultiGraph {
    nodes: Vec<NodeSlot>,
    node_index: HashMap<String, usize>,
    edges: Vec<(String, EdgeData)>,
    edge_index: HashMap<String, usize>,
    next_virtual: usize,
}

impl MultiGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` if unknown and return its slot index
    fn slot(&mut self, id: &str) -> usize {
        if let Some(&index) = self.node_index.get(id) {
            return index;
        }
        let index = self.nodes.len();
        self.nodes.push(NodeSlot {
            id: id.to_string(),
            ..NodeSlot::default()
        });
        self.node_index.insert(id.to_string(), index);
        index
    }

    /// Store a node. Returns the node back if a node with the same id was
    /// already defined.
    ///
    /// # Errors
    ///
    /// Returns the rejected node when its id is already defined.
    pub fn add_node(&mut self, node: Node) -> Result<(), Node> {
        let index = self.slot(&node.id);
        let slot = &mut self.nodes[index];
        if slot.node.is_some() {
            return Err(node);
        }
        slot.node = Some(node);
        Ok(())
    }

    /// Store an edge and return the key assigned to it.
    ///
    /// The key is the edge's own id when it has one (not `*`) that is still
    /// unused; otherwise a fresh `virtual_<n>` key.
    pub fn add_edge(&mut self, data: EdgeData) -> String {
        let key = match data.edge.id.as_deref() {
            Some(id) if id != "*" && !self.edge_index.contains_key(id) => id.to_string(),
            _ => self.virtual_key(),
        };

        let from = self.slot(&data.edge.from_node);
        let to = self.slot(&data.edge.to_node);
        let index = self.edges.len();

        self.nodes[from].out_edges.push(index);
        self.nodes[to].in_edges.push(index);
        self.edge_index.insert(key.clone(), index);
        self.edges.push((key.clone(), data));
        key
    }

    fn virtual_key(&mut self) -> String {
        loop {
            let key = format!("virtual_{}", self.next_virtual);
            self.next_virtual += 1;
            if !self.edge_index.contains_key(&key) {
                debug!(key = %key, "Assigned virtual edge key");
                return key;
            }
        }
    }

    /// A defined node; `None` for unknown ids and for ids only referenced by edges
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index
            .get(id)
            .and_then(|&i| self.nodes[i].node.as_ref())
    }

    #[must_use]
    pub fn edge(&self, key: &str) -> Option<&EdgeData> {
        self.edge_index.get(key).map(|&i| &self.edges[i].1)
    }

    /// Ids referenced by edges but never defined by a segment
    pub fn undefined_nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes
            .iter()
            .filter(|slot| slot.node.is_none())
            .map(|slot| slot.id.as_str())
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn edge_ref(&self, index: usize) -> EdgeRef<'_> {
        let (key, data) = &self.edges[index];
        EdgeRef { key, data }
    }
}

impl GraphStore for MultiGraph {
    fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    fn node_key<'a>(&'a self, id: &str) -> Option<&'a str> {
        self.node_index
            .get(id)
            .map(|&i| self.nodes[i].id.as_str())
    }

    fn node_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.iter().map(|slot| slot.id.as_str())
    }

    fn edges(&self) -> impl Iterator<Item = EdgeRef<'_>> + '_ {
        (0..self.edges.len()).map(move |i| self.edge_ref(i))
    }

    fn incident_edges<'a>(&'a self, node: &'a str) -> impl Iterator<Item = EdgeRef<'a>> + 'a {
        let slot = self.node_index.get(node).map(|&i| &self.nodes[i]);
        let out_edges = slot.map(|s| s.out_edges.as_slice()).unwrap_or_default();
        let in_edges = slot.map(|s| s.in_edges.as_slice()).unwrap_or_default();

        let incoming = in_edges
            .iter()
            .map(move |&i| self.edge_ref(i))
            .filter(|e| !e.data.edge.is_self_loop());

        out_edges
            .iter()
            .map(move |&i| self.edge_ref(i))
            .chain(incoming)
    }
}
