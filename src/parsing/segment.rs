//! Parser for `S` lines.
//!
//! GFA 1: `S <name> <seq> [opt]*`
//! GFA 2: `S <name> <seq_len> <seq> [opt]*`
//!
//! The two versions are told apart by the column after the name: a sequence
//! (or `*`) means GFA 1, a position means GFA 2.

use crate::parsing::record::{columns, ParseError, Record, RecordKind};
use crate::parsing::validator::{Grammar, ValidationError};

/// The column following the segment name, with or without a leading `S`
fn second_column(line: &str) -> Option<&str> {
    let mut columns = line.split('\t').peekable();
    if columns.peek() == Some(&"S") {
        columns.next();
    }
    columns.nth(1)
}

/// Whether an `S` line follows the GFA 1 layout
#[must_use]
pub fn is_segmentv1(line: &str) -> bool {
    second_column(line).is_some_and(|col| Grammar::Sequence.matches(col))
}

/// Whether an `S` line follows the GFA 2 layout
#[must_use]
pub fn is_segmentv2(line: &str) -> bool {
    second_column(line).is_some_and(|col| Grammar::Position.matches(col))
}

/// Parse a GFA 1 segment
///
/// # Errors
///
/// Returns a `ParseError` if a column fails its grammar or is missing.
pub fn parse_v1(line: &str) -> Result<Record, ParseError> {
    Record::parse(RecordKind::SegmentV1, line)
}

/// Parse a GFA 2 segment
///
/// # Errors
///
/// Returns a `ParseError` if a column fails its grammar or is missing.
pub fn parse_v2(line: &str) -> Result<Record, ParseError> {
    Record::parse(RecordKind::SegmentV2, line)
}

/// Parse a segment of either version, picking the layout from the line itself
///
/// # Errors
///
/// Returns `ParseError::InvalidField` if the second column is neither a
/// sequence nor a position, `ParseError::MissingField` if it is absent, or any
/// error of the version-specific parser.
pub fn parse(line: &str) -> Result<Record, ParseError> {
    if is_segmentv1(line) {
        return parse_v1(line);
    }
    if is_segmentv2(line) {
        return parse_v2(line);
    }

    // Neither layout matched: report against the GFA 1 sequence column.
    let columns = columns(RecordKind::SegmentV1, line)?;
    match columns.get(1) {
        Some(token) => Err(ParseError::InvalidField {
            kind: RecordKind::SegmentV1,
            field: "seq",
            source: ValidationError {
                grammar: Grammar::Sequence,
                token: (*token).to_string(),
            },
        }),
        None => Err(ParseError::MissingField {
            kind: RecordKind::SegmentV1,
            field: "seq",
        }),
    }
}
