use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use thiserror::Error;

use crate::core::required;
use crate::core::types::Orientation;
use crate::parsing::field::OptField;
use crate::parsing::record::{Record, RecordKind};
use crate::parsing::validator::Value;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid subgraph: {0}")]
pub struct InvalidSubgraphError(pub String);

/// One member of a subgraph: a referenced id and its orientation, if given
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
}

impl Element {
    pub fn new(id: impl Into<String>, orientation: Option<Orientation>) -> Self {
        Self {
            id: id.into(),
            orientation,
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.orientation {
            Some(o) => write!(f, "{}{o}", self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// A named, ordered collection of references (path or group)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subgraph {
    pub id: String,

    /// Members in input order; order encodes the walk for paths
    pub elements: Vec<Element>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub opt_fields: BTreeMap<String, OptField>,
}

impl Subgraph {
    /// Build a subgraph, rejecting an empty id or a repeated element.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSubgraphError` if `id` is empty or an element id
    /// appears more than once.
    pub fn new(
        id: impl Into<String>,
        elements: Vec<Element>,
        opt_fields: BTreeMap<String, OptField>,
    ) -> Result<Self, InvalidSubgraphError> {
        let id = id.into();
        if id.is_empty() {
            return Err(InvalidSubgraphError("empty subgraph id".to_string()));
        }

        {
            let mut seen = HashSet::new();
            if let Some(repeated) = elements.iter().find(|e| !seen.insert(e.id.as_str())) {
                return Err(InvalidSubgraphError(format!(
                    "'{}' appears more than once in subgraph '{id}'",
                    repeated.id
                )));
            }
        }

        Ok(Self {
            id,
            elements,
            opt_fields,
        })
    }

    /// Orientation of `id` in this subgraph; `None` if absent, `Some(None)`
    /// if present without orientation
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Option<Orientation>> {
        self.elements
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.orientation)
    }

    /// Build a subgraph from a parsed `P`, `O` or `U` record.
    ///
    /// Required columns other than the id and the member list are kept as
    /// optional fields.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSubgraphError` if the record is of another kind, is
    /// missing a required field, or lists a member twice.
    pub fn from_record(record: &Record) -> Result<Self, InvalidSubgraphError> {
        let (id_field, list_field, orientation_required) = match record.kind {
            RecordKind::Path => ("path_name", "seqs_names", true),
            RecordKind::OGroup => ("oid", "references", true),
            RecordKind::UGroup => ("uid", "references", false),
            RecordKind::SegmentV1
            | RecordKind::SegmentV2
            | RecordKind::Link
            | RecordKind::Containment
            | RecordKind::Fragment
            | RecordKind::Edge
            | RecordKind::Gap => {
                return Err(InvalidSubgraphError(format!(
                    "a subgraph cannot be built from a {} record",
                    record.kind
                )));
            }
        };

        if !record.is_valid() {
            return Err(InvalidSubgraphError(format!(
                "the {} record is missing required fields",
                record.kind
            )));
        }

        let id = required(record, id_field, Value::as_str)
            .ok_or_else(|| InvalidSubgraphError(format!("missing field '{id_field}'")))?;
        let references = required(record, list_field, Value::as_list)
            .ok_or_else(|| InvalidSubgraphError(format!("missing field '{list_field}'")))?;

        let elements = references
            .iter()
            .map(|reference| to_element(reference, orientation_required))
            .collect::<Result<Vec<_>, _>>()?;

        let mut opt_fields: BTreeMap<String, OptField> = record
            .fields
            .values()
            .filter(|f| f.name != id_field && f.name != list_field)
            .map(|f| (f.name.clone(), OptField::from_field(f.clone())))
            .collect();
        opt_fields.extend(record.opt_fields.clone());

        Self::new(id, elements, opt_fields)
    }
}

fn to_element(reference: &str, orientation_required: bool) -> Result<Element, InvalidSubgraphError> {
    match Orientation::split_suffixed(reference) {
        Some((id, orientation)) => Ok(Element::new(id, Some(orientation))),
        None if !orientation_required => Ok(Element::new(reference, None)),
        None => Err(InvalidSubgraphError(format!(
            "reference '{reference}' has no orientation suffix"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{group, link, path};

    fn rendered(subgraph: &Subgraph) -> Vec<String> {
        subgraph.elements.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_subgraph_from_path() {
        let record = path::parse("P\t14\t11+,12+\t122M\tui:Z:test\tab:Z:another_test").unwrap();
        let subgraph = Subgraph::from_record(&record).unwrap();

        assert_eq!(subgraph.id, "14");
        assert_eq!(
            subgraph.elements,
            vec![
                Element::new("11", Some(Orientation::Forward)),
                Element::new("12", Some(Orientation::Forward)),
            ]
        );
        assert_eq!(rendered(&subgraph), vec!["11+", "12+"]);
        assert_eq!(
            subgraph.opt_fields["overlaps"].value,
            record.field("overlaps").unwrap().value
        );
        assert_eq!(subgraph.opt_fields.len(), 3);
    }

    #[test]
    fn test_subgraph_from_ogroup() {
        let record = group::parse_ogroup("O\t15\t11+ 11_to_13+ 13+\txx:i:-1").unwrap();
        let subgraph = Subgraph::from_record(&record).unwrap();

        assert_eq!(subgraph.id, "15");
        assert_eq!(rendered(&subgraph), vec!["11+", "11_to_13+", "13+"]);
        assert_eq!(subgraph.opt_fields["xx"].value, Value::Int(-1));
    }

    #[test]
    fn test_subgraph_from_ugroup() {
        let record = group::parse_ugroup("U\t16sub\t2 3-\txx:i:-1").unwrap();
        let subgraph = Subgraph::from_record(&record).unwrap();

        assert_eq!(subgraph.id, "16sub");
        assert_eq!(subgraph.get("2"), Some(None));
        assert_eq!(subgraph.get("3"), Some(Some(Orientation::Reverse)));
        assert_eq!(subgraph.get("4"), None);
        assert_eq!(subgraph.opt_fields["xx"].value, Value::Int(-1));
    }

    #[test]
    fn test_subgraph_rejects_duplicate_elements() {
        let record = path::parse("P\t14\t11+,11-\t*").unwrap();
        assert!(Subgraph::from_record(&record).is_err());
    }

    #[test]
    fn test_subgraph_from_wrong_kind() {
        let record = link::parse_link("L\t3\t+\t65\t-\t47M").unwrap();
        assert!(Subgraph::from_record(&record).is_err());
    }

    #[test]
    fn test_subgraph_from_incomplete_record() {
        let mut record = Record::new(RecordKind::Path);
        record.add_field(crate::parsing::field::Field::text("path_name", "14"));
        assert!(Subgraph::from_record(&record).is_err());
    }

    #[test]
    fn test_subgraph_opt_fields_are_independent() {
        let record = path::parse("P\t14\t11+,12+\t122M").unwrap();
        let mut first = Subgraph::from_record(&record).unwrap();
        let second = Subgraph::from_record(&record).unwrap();

        first.opt_fields.clear();
        assert_eq!(second.opt_fields.len(), 1);
    }
}
