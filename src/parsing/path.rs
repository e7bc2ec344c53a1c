//! Parser for GFA 1 `P` lines:
//! `P <path_name> <seqs_names> <overlaps> [opt]*`
//!
//! `seqs_names` is a comma-separated list of references with fused
//! orientation suffixes, e.g. `11+,12-`.

use crate::parsing::record::{has_tag_and_arity, ParseError, Record, RecordKind};

#[must_use]
pub fn recognizes(line: &str) -> bool {
    has_tag_and_arity(RecordKind::Path, line)
}

/// Parse a `P` line
///
/// # Errors
///
/// Returns a `ParseError` if a column fails its grammar or is missing.
pub fn parse(line: &str) -> Result<Record, ParseError> {
    Record::parse(RecordKind::Path, line)
}
