//! Parsers for GFA 1 and GFA 2 lines.
//!
//! Each record kind has its own module exposing a structural `recognizes`
//! pre-check and a `parse` function producing a [`record::Record`]. Required
//! columns are validated against the grammars in [`validator`]; trailing
//! columns are `TAG:TYPE:VALUE` optional fields ([`field::OptField`]).
//!
//! ## Example
//!
//! ```rust
//! use gfa_graph::parsing::{parse_line, Line};
//! use gfa_graph::parsing::record::RecordKind;
//!
//! let line = parse_line("S\t3\tTGCAACGTATAGACTTGTCAC\tRC:i:4").unwrap();
//! match line {
//!     Line::Record(record) => assert_eq!(record.kind, RecordKind::SegmentV1),
//!     _ => unreachable!(),
//! }
//! ```
//!
//! ## Record kinds
//!
//! | Tag | Kind | Module |
//! |-----|------|--------|
//! | H   | header | [`header`] |
//! | S   | segment (v1 / v2) | [`segment`] |
//! | L   | link | [`link`] |
//! | C   | containment | [`link`] |
//! | F   | fragment | [`fragment`] |
//! | E   | edge | [`edge`] |
//! | G   | gap | [`edge`] |
//! | P   | path | [`path`] |
//! | O   | ordered group | [`group`] |
//! | U   | unordered group | [`group`] |

use std::collections::BTreeMap;

pub mod edge;
pub mod field;
pub mod fragment;
pub mod group;
pub mod header;
pub mod link;
pub mod path;
pub mod record;
pub mod segment;
pub mod validator;

use field::OptField;
use record::{ParseError, Record};

/// One classified input line
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Header(BTreeMap<String, OptField>),
    Record(Record),
    Comment,
}

/// Classify and parse a single line by its leading tag.
///
/// # Errors
///
/// Returns `ParseError::UnrecognizedLine` for empty lines and unknown tags,
/// otherwise any error of the kind-specific parser.
pub fn parse_line(line: &str) -> Result<Line, ParseError> {
    let line = line.trim_end_matches(['\n', '\r']);
    if line.starts_with('#') {
        return Ok(Line::Comment);
    }

    let tag = line.split('\t').next().unwrap_or_default();
    let record = match tag {
        "H" => return Ok(Line::Header(header::parse(line)?)),
        "S" => segment::parse(line)?,
        "L" => link::parse_link(line)?,
        "C" => link::parse_containment(line)?,
        "F" => fragment::parse(line)?,
        "E" => edge::parse_edge(line)?,
        "G" => edge::parse_gap(line)?,
        "P" => path::parse(line)?,
        "O" => group::parse_ogroup(line)?,
        "U" => group::parse_ugroup(line)?,
        _ => return Err(ParseError::UnrecognizedLine(truncate(line))),
    };

    Ok(Line::Record(record))
}

/// Keep error messages bounded for very long lines
fn truncate(line: &str) -> String {
    const MAX_ECHO: usize = 80;
    match line.char_indices().nth(MAX_ECHO) {
        Some((idx, _)) => format!("{}...", &line[..idx]),
        None => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::record::RecordKind;

    #[test]
    fn test_parse_line_dispatch() {
        let cases = [
            ("S\t3\tACGT", RecordKind::SegmentV1),
            ("S\t3\t4\tACGT", RecordKind::SegmentV2),
            ("L\t3\t+\t65\t-\t47M", RecordKind::Link),
            ("C\ta\t+\tb\t-\t10\t*", RecordKind::Containment),
            ("F\t12\t2-\t0\t140$\t0\t140\t11M", RecordKind::Fragment),
            ("E\t*\t23-\t16+\t0\t11\t0\t11\t11M", RecordKind::Edge),
            ("G\tg\tA+\tB-\t1000\t*", RecordKind::Gap),
            ("P\t14\t11+,12+\t122M", RecordKind::Path),
            ("O\t15\t11+ 13+", RecordKind::OGroup),
            ("U\t16\t2 3", RecordKind::UGroup),
        ];

        for (text, kind) in cases {
            match parse_line(text).unwrap() {
                Line::Record(record) => assert_eq!(record.kind, kind, "{text}"),
                other => panic!("unexpected line for {text}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_line_header_and_comment() {
        assert!(matches!(parse_line("H\tVN:Z:1.0").unwrap(), Line::Header(_)));
        assert_eq!(parse_line("# a comment").unwrap(), Line::Comment);
    }

    #[test]
    fn test_parse_line_unknown_tag() {
        assert!(matches!(
            parse_line("X\tfoo"),
            Err(ParseError::UnrecognizedLine(_))
        ));
        assert!(matches!(parse_line(""), Err(ParseError::UnrecognizedLine(_))));
    }
}
