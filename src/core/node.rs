use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::core::required;
use crate::parsing::field::OptField;
use crate::parsing::record::{Record, RecordKind};
use crate::parsing::validator::{Grammar, Value};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid node: {0}")]
pub struct InvalidNodeError(pub String);

/// A sequence segment: the node unit of the assembly graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: String,

    /// Sequence as written on the line; `*` when the sequence is not stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,

    /// Declared length (GFA 2 segments only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub opt_fields: BTreeMap<String, OptField>,
}

impl Node {
    /// Build a node, checking the id and sequence against their grammars.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNodeError` if the id is not a valid label or the
    /// sequence is not a valid sequence.
    pub fn new(
        id: impl Into<String>,
        sequence: Option<String>,
        length: Option<u64>,
    ) -> Result<Self, InvalidNodeError> {
        let id = id.into();
        if !Grammar::Label.matches(&id) {
            return Err(InvalidNodeError(format!(
                "'{id}' is not a valid segment name"
            )));
        }
        if let Some(seq) = &sequence {
            if !Grammar::Sequence.matches(seq) {
                return Err(InvalidNodeError(format!(
                    "segment '{id}' has an invalid sequence"
                )));
            }
        }

        Ok(Self {
            id,
            sequence,
            length,
            opt_fields: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn with_opt_fields(mut self, opt_fields: BTreeMap<String, OptField>) -> Self {
        self.opt_fields = opt_fields;
        self
    }

    /// Whether an actual sequence (not the `*` placeholder) is stored
    #[must_use]
    pub fn has_sequence(&self) -> bool {
        self.sequence.as_deref().is_some_and(|s| s != "*")
    }

    /// Build a node from a parsed segment record.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNodeError` if the record is not a segment or is missing
    /// a required field.
    pub fn from_record(record: &Record) -> Result<Self, InvalidNodeError> {
        if !matches!(record.kind, RecordKind::SegmentV1 | RecordKind::SegmentV2) {
            return Err(InvalidNodeError(format!(
                "a node cannot be built from a {} record",
                record.kind
            )));
        }
        if !record.is_valid() {
            return Err(InvalidNodeError(format!(
                "the {} record is missing required fields",
                record.kind
            )));
        }

        let missing = |name: &str| InvalidNodeError(format!("missing field '{name}'"));

        let id = required(record, "name", Value::as_str).ok_or_else(|| missing("name"))?;
        let sequence = required(record, "seq", Value::as_str).ok_or_else(|| missing("seq"))?;
        let length = match record.kind {
            RecordKind::SegmentV2 => Some(
                required(record, "seq_len", Value::as_position)
                    .ok_or_else(|| missing("seq_len"))?
                    .value,
            ),
            _ => None,
        };

        Ok(Self::new(id, Some(sequence.to_string()), length)?
            .with_opt_fields(record.opt_fields.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::field::Field;
    use crate::parsing::segment;

    #[test]
    fn test_node_new() {
        assert!(Node::new("15", Some("acgt".to_string()), Some(4)).is_ok());
        assert!(Node::new("*", Some("3".to_string()), None).is_err());
        assert!(Node::new("15", Some("ac gt".to_string()), None).is_err());
    }

    #[test]
    fn test_node_from_segment_v1() {
        let record = segment::parse("S\t3\tTGCAACGTATAGACTTGTCAC\tRC:i:4").unwrap();
        let node = Node::from_record(&record).unwrap();

        assert_eq!(node.id, "3");
        assert_eq!(node.sequence.as_deref(), Some("TGCAACGTATAGACTTGTCAC"));
        assert_eq!(node.length, None);
        assert_eq!(node.opt_fields["RC"], record.opt_fields["RC"]);
        assert!(node.has_sequence());
    }

    #[test]
    fn test_node_from_segment_v2() {
        let record = segment::parse("S\t3\t21\tTGCAACGTATAGACTTGTCAC\tRC:i:4").unwrap();
        let node = Node::from_record(&record).unwrap();

        assert_eq!(node.id, "3");
        assert_eq!(node.length, Some(21));
        assert_eq!(node.sequence.as_deref(), Some("TGCAACGTATAGACTTGTCAC"));
        assert_eq!(node.opt_fields["RC"].value, Value::Int(4));
    }

    #[test]
    fn test_node_placeholder_sequence() {
        let record = segment::parse("S\tA\t*").unwrap();
        let node = Node::from_record(&record).unwrap();
        assert_eq!(node.sequence.as_deref(), Some("*"));
        assert!(!node.has_sequence());
    }

    #[test]
    fn test_node_from_incomplete_segment() {
        let mut record = Record::new(RecordKind::SegmentV1);
        record.add_field(Field::text("name", "3"));
        assert!(!record.is_valid());
        assert!(Node::from_record(&record).is_err());

        record.add_field(Field::text("seq", "TGCAACGTATAGACTTGTCAC"));
        assert!(Node::from_record(&record).is_ok());
    }

    #[test]
    fn test_node_from_wrong_kind() {
        let record = Record::parse(RecordKind::Link, "L\t3\t+\t65\t-\t47M").unwrap();
        assert!(Node::from_record(&record).is_err());
    }

    #[test]
    fn test_node_opt_fields_are_independent() {
        let record = segment::parse("S\t3\tACGT\tRC:i:4").unwrap();
        let mut first = Node::from_record(&record).unwrap();
        let second = Node::from_record(&record).unwrap();
        assert_eq!(first.opt_fields, second.opt_fields);

        first.opt_fields.remove("RC");
        assert_eq!(second.opt_fields.len(), 1);
        assert_eq!(record.opt_fields.len(), 1);
    }
}
