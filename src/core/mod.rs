//! Canonical graph entities built from parsed records.
//!
//! - [`Node`](node::Node): a segment (`S` lines of either version)
//! - [`Edge`](edge::Edge): an overlap or adjacency (`L`, `C`, `F`, `E`, `G`)
//! - [`Subgraph`](subgraph::Subgraph): a path or group (`P`, `O`, `U`)
//!
//! Each entity exposes a `from_record` constructor that reads the record's
//! field mapping and resolves that kind's encoding, such as orientation
//! suffixes fused onto identifiers, into the uniform entity shape.
//!
//! ## Orientation suffixes
//!
//! | Kind | Column | Example | Node id | Orientation |
//! |------|--------|---------|---------|-------------|
//! | F    | external | `2-` | `2` | `-` |
//! | E, G | sid1 / sid2 | `23-` | `23` | `-` |
//! | P    | seqs_names | `11+,12+` | `11`, `12` | `+`, `+` |
//! | U    | references | `2 3` | `2`, `3` | none |

pub mod edge;
pub mod node;
pub mod subgraph;
pub mod types;

use crate::parsing::record::Record;
use crate::parsing::validator::Value;

/// Look up a required field and convert its value, `None` if absent or of
/// another type
pub(crate) fn required<'a, T>(
    record: &'a Record,
    name: &str,
    get: impl FnOnce(&'a Value) -> Option<T>,
) -> Option<T> {
    record.value(name).and_then(get)
}
