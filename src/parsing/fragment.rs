//! Parser for GFA 2 `F` lines:
//! `F <sid> <external=id+orn> <sbeg> <send> <fbeg> <fend> <alignment> [opt]*`

use crate::parsing::record::{has_tag_and_arity, ParseError, Record, RecordKind};

#[must_use]
pub fn recognizes(line: &str) -> bool {
    has_tag_and_arity(RecordKind::Fragment, line)
}

/// Parse an `F` line
///
/// # Errors
///
/// Returns a `ParseError` if a column fails its grammar or is missing.
pub fn parse(line: &str) -> Result<Record, ParseError> {
    Record::parse(RecordKind::Fragment, line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::validator::{Position, Value};

    #[test]
    fn test_parse_fragment() {
        let record = parse("F\t12\t2-\t0\t140$\t0\t140\t11M\tui:Z:test").unwrap();
        assert_eq!(record.value("external").and_then(Value::as_str), Some("2-"));
        assert_eq!(
            record.value("send").and_then(Value::as_position),
            Some(Position::end(140))
        );
        assert_eq!(
            record.value("fend").and_then(Value::as_position),
            Some(Position::new(140))
        );
    }

    #[test]
    fn test_parse_fragment_requires_oriented_external() {
        let err = parse("F\t12\t2\t0\t140$\t0\t140\t11M").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidField {
                field: "external",
                ..
            }
        ));
    }
}
