//! Parsers for GFA 2 `E` and `G` lines.
//!
//! `E <eid|*> <sid1=id+orn> <sid2=id+orn> <beg1> <end1> <beg2> <end2> <alignment> [opt]*`
//! `G <gid|*> <sid1=id+orn> <sid2=id+orn> <distance> <variance|*> [opt]*`

use crate::parsing::record::{has_tag_and_arity, ParseError, Record, RecordKind};

#[must_use]
pub fn recognizes_edge(line: &str) -> bool {
    has_tag_and_arity(RecordKind::Edge, line)
}

#[must_use]
pub fn recognizes_gap(line: &str) -> bool {
    has_tag_and_arity(RecordKind::Gap, line)
}

/// Parse an `E` line
///
/// # Errors
///
/// Returns a `ParseError` if a column fails its grammar or is missing.
pub fn parse_edge(line: &str) -> Result<Record, ParseError> {
    Record::parse(RecordKind::Edge, line)
}

/// Parse a `G` line
///
/// # Errors
///
/// Returns a `ParseError` if a column fails its grammar or is missing.
pub fn parse_gap(line: &str) -> Result<Record, ParseError> {
    Record::parse(RecordKind::Gap, line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::validator::Value;

    #[test]
    fn test_parse_edge() {
        let record =
            parse_edge("E\t*\t23-\t16+\t0\t11\t0\t11\t11M\tui:Z:test\tab:Z:another_test").unwrap();
        assert_eq!(record.value("eid").and_then(Value::as_str), Some("*"));
        assert_eq!(record.value("sid1").and_then(Value::as_str), Some("23-"));
        assert_eq!(record.opt_fields.len(), 2);
    }

    #[test]
    fn test_parse_edge_trace_alignment() {
        assert!(parse_edge("E\te1\t1+\t2+\t5\t10$\t0\t5\t2,3,4").is_ok());
    }

    #[test]
    fn test_parse_gap() {
        let record = parse_gap("G\tg\tA+\tB-\t1000\t*\tui:Z:test").unwrap();
        assert_eq!(record.value("disp").and_then(Value::as_int), Some(1000));
        assert_eq!(record.value("var").and_then(Value::as_str), Some("*"));

        let record = parse_gap("G\tg\tA+\tB-\t-20\t5").unwrap();
        assert_eq!(record.value("disp").and_then(Value::as_int), Some(-20));
    }

    #[test]
    fn test_parse_gap_rejects_bad_variance() {
        assert!(parse_gap("G\tg\tA+\tB-\t1000\tlots").is_err());
    }
}
