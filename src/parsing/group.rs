//! Parsers for GFA 2 groups.
//!
//! `O <oid|*> <references: id+orn id+orn ...> [opt]*`
//! `U <uid|*> <ids: id id ...> [opt]*`
//!
//! The reference list is a single tab column whose members are separated by
//! spaces.

use crate::parsing::record::{has_tag_and_arity, ParseError, Record, RecordKind};

#[must_use]
pub fn recognizes_ogroup(line: &str) -> bool {
    has_tag_and_arity(RecordKind::OGroup, line)
}

#[must_use]
pub fn recognizes_ugroup(line: &str) -> bool {
    has_tag_and_arity(RecordKind::UGroup, line)
}

/// Parse an `O` line
///
/// # Errors
///
/// Returns a `ParseError` if a column fails its grammar or is missing.
pub fn parse_ogroup(line: &str) -> Result<Record, ParseError> {
    Record::parse(RecordKind::OGroup, line)
}

/// Parse a `U` line
///
/// # Errors
///
/// Returns a `ParseError` if a column fails its grammar or is missing.
pub fn parse_ugroup(line: &str) -> Result<Record, ParseError> {
    Record::parse(RecordKind::UGroup, line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::validator::Value;

    #[test]
    fn test_parse_ogroup() {
        let record = parse_ogroup("O\t15\t11+ 11_to_13+ 13+\txx:i:-1").unwrap();
        assert_eq!(
            record.value("references").and_then(Value::as_list).map(<[String]>::len),
            Some(3)
        );
        assert_eq!(record.opt_fields["xx"].value, Value::Int(-1));
    }

    #[test]
    fn test_parse_ogroup_requires_orientation() {
        assert!(parse_ogroup("O\t15\t11+ 13").is_err());
    }

    #[test]
    fn test_parse_ugroup() {
        let record = parse_ugroup("U\t16sub\t2 3\txx:i:-1").unwrap();
        assert_eq!(
            record.value("references").and_then(Value::as_list),
            Some(&["2".to_string(), "3".to_string()][..])
        );
    }
}
