//! Graph assembly and traversal.
//!
//! - [`store`]: keyed multigraph storage behind the [`store::GraphStore`] trait
//! - [`gfa`]: the [`gfa::Gfa`] container, loading and dovetail attribute derivation
//! - [`dovetail`]: left/right end queries over dovetail overlaps

pub mod dovetail;
pub mod gfa;
pub mod store;
