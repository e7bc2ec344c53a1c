//! # gfa-graph
//!
//! A library for loading GFA 1 and GFA 2 assembly graphs into a typed
//! in-memory graph and querying its dovetail overlaps.
//!
//! Every line of a GFA file is validated against the grammar of its record
//! kind and normalized into one of three entity shapes:
//!
//! - **Nodes** from segments (`S`)
//! - **Edges** from links, containments, fragments, edges and gaps (`L`, `C`, `F`, `E`, `G`)
//! - **Subgraphs** from paths and groups (`P`, `O`, `U`)
//!
//! Edges that join the end of one segment to the end of another are marked
//! as dovetails, with the segment end (`L` or `R`) recorded on each side.
//!
//! ## Example
//!
//! ```rust
//! use gfa_graph::{Gfa, LoadOptions, NodeBunch};
//!
//! let text = "S\t1\tACGT\nS\t2\tGTTA\nL\t1\t+\t2\t+\t2M\n";
//! let gfa = Gfa::from_text(text, &LoadOptions::default()).unwrap();
//!
//! let queries = gfa.dovetails();
//! let right: Vec<&str> = queries.right_neighbors(&NodeBunch::from("1")).collect();
//! assert_eq!(right, vec!["2"]);
//! ```
//!
//! ## Modules
//!
//! - [`parsing`]: Field validation and per-kind record parsers
//! - [`core`]: Node, Edge and Subgraph entities and their normalizers
//! - [`graph`]: Graph storage, loading and dovetail queries
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod graph;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::edge::Edge;
pub use crate::core::node::Node;
pub use crate::core::subgraph::Subgraph;
pub use crate::core::types::*;
pub use crate::graph::dovetail::{Degree, DovetailError, Dovetails, NodeBunch};
pub use crate::graph::gfa::{Gfa, GraphError, LoadOptions};
pub use crate::graph::store::{EdgeData, GraphStore, MultiGraph};
