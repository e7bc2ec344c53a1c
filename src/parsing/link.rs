//! Parsers for the GFA 1 edge lines.
//!
//! `L <from> <from_orn> <to> <to_orn> <overlap> [opt]*`
//! `C <from> <from_orn> <to> <to_orn> <pos> <overlap> [opt]*`

use crate::parsing::record::{has_tag_and_arity, ParseError, Record, RecordKind};

#[must_use]
pub fn recognizes_link(line: &str) -> bool {
    has_tag_and_arity(RecordKind::Link, line)
}

#[must_use]
pub fn recognizes_containment(line: &str) -> bool {
    has_tag_and_arity(RecordKind::Containment, line)
}

/// Parse an `L` line
///
/// # Errors
///
/// Returns a `ParseError` if a column fails its grammar or is missing.
pub fn parse_link(line: &str) -> Result<Record, ParseError> {
    Record::parse(RecordKind::Link, line)
}

/// Parse a `C` line
///
/// # Errors
///
/// Returns a `ParseError` if a column fails its grammar or is missing.
pub fn parse_containment(line: &str) -> Result<Record, ParseError> {
    Record::parse(RecordKind::Containment, line)
}
