use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::core::required;
use crate::core::types::Orientation;
use crate::parsing::field::OptField;
use crate::parsing::record::{Record, RecordKind};
use crate::parsing::validator::{Position, Value};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid edge: {0}")]
pub struct InvalidEdgeError(pub String);

/// An overlap or adjacency between two segments.
///
/// Built from `L`, `C`, `F`, `E` and `G` lines; each source kind fills a
/// different subset of the fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    /// `*` for GFA 1 links and containments, absent for fragments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub from_node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_orientation: Option<Orientation>,

    pub to_node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_orientation: Option<Orientation>,

    /// `(begin, end)` on the from segment; present together with `to_positions`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_positions: Option<(Position, Position)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_positions: Option<(Position, Position)>,

    /// CIGAR or trace, stored verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,

    /// Gap distance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<i64>,
    /// Gap variance, `*` when unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variance: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub opt_fields: BTreeMap<String, OptField>,
}

impl Edge {
    /// A bare edge between two nodes; every other field is absent
    pub fn new(from_node: impl Into<String>, to_node: impl Into<String>) -> Self {
        Self {
            id: None,
            from_node: from_node.into(),
            from_orientation: None,
            to_node: to_node.into(),
            to_orientation: None,
            from_positions: None,
            to_positions: None,
            alignment: None,
            distance: None,
            variance: None,
            opt_fields: BTreeMap::new(),
        }
    }

    /// Whether both endpoints are the same node
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.from_node == self.to_node
    }

    /// Build an edge from a parsed `L`, `C`, `F`, `E` or `G` record.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEdgeError` if the record is of another kind or a
    /// required field is missing or mistyped.
    pub fn from_record(record: &Record) -> Result<Self, InvalidEdgeError> {
        if !record.is_valid() {
            return Err(InvalidEdgeError(format!(
                "the {} record is missing required fields",
                record.kind
            )));
        }

        let fields = RecordFields(record);
        let mut edge = match record.kind {
            RecordKind::Link | RecordKind::Containment => {
                let mut edge = Edge::new(fields.text("from")?, fields.text("to")?);
                edge.id = Some("*".to_string());
                edge.from_orientation = Some(fields.orientation("from_orn")?);
                edge.to_orientation = Some(fields.orientation("to_orn")?);
                edge.alignment = Some(fields.text("overlap")?.to_string());
                edge
            }
            RecordKind::Fragment => {
                let (to_node, to_orn) = fields.reference("external")?;
                let mut edge = Edge::new(fields.text("sid")?, to_node);
                edge.to_orientation = Some(to_orn);
                edge.from_positions = Some(fields.positions("sbeg", "send")?);
                edge.to_positions = Some(fields.positions("fbeg", "fend")?);
                edge.alignment = Some(fields.text("alignment")?.to_string());
                edge
            }
            RecordKind::Edge => {
                let mut edge = fields.oriented_pair()?;
                edge.id = Some(fields.text("eid")?.to_string());
                edge.from_positions = Some(fields.positions("beg1", "end1")?);
                edge.to_positions = Some(fields.positions("beg2", "end2")?);
                edge.alignment = Some(fields.text("alignment")?.to_string());
                edge
            }
            RecordKind::Gap => {
                let mut edge = fields.oriented_pair()?;
                edge.id = Some(fields.text("gid")?.to_string());
                edge.distance = Some(
                    required(record, "disp", Value::as_int)
                        .ok_or_else(|| missing("disp"))?,
                );
                edge.variance = Some(fields.text("var")?.to_string());
                edge
            }
            RecordKind::SegmentV1
            | RecordKind::SegmentV2
            | RecordKind::Path
            | RecordKind::OGroup
            | RecordKind::UGroup => {
                return Err(InvalidEdgeError(format!(
                    "an edge cannot be built from a {} record",
                    record.kind
                )));
            }
        };

        edge.opt_fields = record.opt_fields.clone();
        if record.kind == RecordKind::Containment {
            if let Some(pos) = record.field("pos") {
                edge.opt_fields
                    .insert(pos.name.clone(), OptField::from_field(pos.clone()));
            }
        }

        Ok(edge)
    }
}

fn missing(name: &str) -> InvalidEdgeError {
    InvalidEdgeError(format!("missing or mistyped field '{name}'"))
}

/// Typed accessors over a record's required fields
struct RecordFields<'a>(&'a Record);

impl<'a> RecordFields<'a> {
    fn text(&self, name: &str) -> Result<&'a str, InvalidEdgeError> {
        required(self.0, name, Value::as_str).ok_or_else(|| missing(name))
    }

    fn orientation(&self, name: &str) -> Result<Orientation, InvalidEdgeError> {
        required(self.0, name, Value::as_orientation).ok_or_else(|| missing(name))
    }

    fn positions(&self, begin: &str, end: &str) -> Result<(Position, Position), InvalidEdgeError> {
        let begin = required(self.0, begin, Value::as_position).ok_or_else(|| missing(begin))?;
        let end = required(self.0, end, Value::as_position).ok_or_else(|| missing(end))?;
        Ok((begin, end))
    }

    /// Split an `id+`/`id-` reference into node id and orientation
    fn reference(&self, name: &str) -> Result<(&'a str, Orientation), InvalidEdgeError> {
        let raw = self.text(name)?;
        Orientation::split_suffixed(raw).ok_or_else(|| {
            InvalidEdgeError(format!("'{raw}' in field '{name}' has no orientation suffix"))
        })
    }

    /// Edge between the `sid1` and `sid2` references of a GFA 2 line
    fn oriented_pair(&self) -> Result<Edge, InvalidEdgeError> {
        let (from_node, from_orn) = self.reference("sid1")?;
        let (to_node, to_orn) = self.reference("sid2")?;
        let mut edge = Edge::new(from_node, to_node);
        edge.from_orientation = Some(from_orn);
        edge.to_orientation = Some(to_orn);
        Ok(edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{edge, fragment, link, path};

    #[test]
    fn test_edge_from_link() {
        let record = link::parse_link("L\t3\t+\t65\t-\t47M\tui:Z:test\tab:Z:another_test").unwrap();
        let edge = Edge::from_record(&record).unwrap();

        assert_eq!(edge.id.as_deref(), Some("*"));
        assert_eq!(edge.from_node, "3");
        assert_eq!(edge.from_orientation, Some(Orientation::Forward));
        assert_eq!(edge.to_node, "65");
        assert_eq!(edge.to_orientation, Some(Orientation::Reverse));
        assert_eq!(edge.from_positions, None);
        assert_eq!(edge.to_positions, None);
        assert_eq!(edge.alignment.as_deref(), Some("47M"));
        assert_eq!(edge.opt_fields.len(), 2);
        assert_eq!(edge.opt_fields["ui"], record.opt_fields["ui"]);
        assert_eq!(edge.opt_fields["ab"].value.as_str(), Some("another_test"));
    }

    #[test]
    fn test_edge_from_containment() {
        let record =
            link::parse_containment("C\ta\t+\tb\t-\t10\t*\tui:Z:test\tab:Z:another_test").unwrap();
        let edge = Edge::from_record(&record).unwrap();

        assert_eq!(edge.id.as_deref(), Some("*"));
        assert_eq!(edge.from_node, "a");
        assert_eq!(edge.to_node, "b");
        assert_eq!(edge.from_positions, None);
        assert_eq!(edge.alignment.as_deref(), Some("*"));
        assert_eq!(edge.opt_fields.len(), 3);
        assert_eq!(
            edge.opt_fields["pos"].value,
            record.field("pos").unwrap().value
        );
    }

    #[test]
    fn test_edge_from_fragment() {
        let record =
            fragment::parse("F\t12\t2-\t0\t140$\t0\t140\t11M\tui:Z:test\tab:Z:another_test")
                .unwrap();
        let edge = Edge::from_record(&record).unwrap();

        assert_eq!(edge.id, None);
        assert_eq!(edge.from_node, "12");
        assert_eq!(edge.from_orientation, None);
        assert_eq!(edge.to_node, "2");
        assert_eq!(edge.to_orientation, Some(Orientation::Reverse));
        assert_eq!(
            edge.from_positions,
            Some((Position::new(0), Position::end(140)))
        );
        assert_eq!(
            edge.to_positions,
            Some((Position::new(0), Position::new(140)))
        );
        assert_eq!(edge.alignment.as_deref(), Some("11M"));
        assert_eq!(edge.opt_fields.len(), 2);
    }

    #[test]
    fn test_edge_from_edge_line() {
        let record =
            edge::parse_edge("E\t*\t23-\t16+\t0\t11\t0\t11\t11M\tui:Z:test\tab:Z:another_test")
                .unwrap();
        let edge = Edge::from_record(&record).unwrap();

        assert_eq!(edge.id.as_deref(), Some("*"));
        assert_eq!(edge.from_node, "23");
        assert_eq!(edge.from_orientation, Some(Orientation::Reverse));
        assert_eq!(edge.to_node, "16");
        assert_eq!(edge.to_orientation, Some(Orientation::Forward));
        assert_eq!(edge.from_positions, Some((Position::new(0), Position::new(11))));
        assert_eq!(edge.to_positions, Some((Position::new(0), Position::new(11))));
        assert_eq!(edge.opt_fields.len(), 2);
    }

    #[test]
    fn test_edge_from_gap() {
        let record = edge::parse_gap("G\tg\tA+\tB-\t1000\t*\tui:Z:test\tab:Z:another_test").unwrap();
        let edge = Edge::from_record(&record).unwrap();

        assert_eq!(edge.id.as_deref(), Some("g"));
        assert_eq!(edge.from_node, "A");
        assert_eq!(edge.from_orientation, Some(Orientation::Forward));
        assert_eq!(edge.to_node, "B");
        assert_eq!(edge.to_orientation, Some(Orientation::Reverse));
        assert_eq!(edge.distance, Some(1000));
        assert_eq!(edge.variance.as_deref(), Some("*"));
        assert_eq!(edge.alignment, None);
        assert_eq!(edge.from_positions, None);
        assert_eq!(edge.opt_fields["ui"].value.as_str(), Some("test"));
    }

    #[test]
    fn test_edge_from_wrong_kind() {
        let record = path::parse("P\t14\t11+,12+\t122M").unwrap();
        assert!(Edge::from_record(&record).is_err());
    }

    #[test]
    fn test_edge_from_incomplete_record() {
        let mut record = Record::new(RecordKind::Link);
        record.add_field(crate::parsing::field::Field::text("from", "3"));
        assert!(Edge::from_record(&record).is_err());
    }

    #[test]
    fn test_is_self_loop() {
        assert!(Edge::new("a", "a").is_self_loop());
        assert!(!Edge::new("a", "b").is_self_loop());
    }
}
