//! Generic record model shared by every record parser.
//!
//! A record kind declares its required columns as `(name, grammar)` pairs in
//! fixed order. Parsing validates those columns one by one and treats every
//! remaining column as a `TAG:TYPE:VALUE` optional field.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::parsing::field::{Field, OptField};
use crate::parsing::validator::{conforms, Grammar, ValidationError, Value};

/// One-letter tags of every GFA line type, including the header
const KNOWN_TAGS: [&str; 10] = ["H", "S", "L", "C", "F", "E", "G", "P", "O", "U"];

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{kind} record is missing required field '{field}'")]
    MissingField {
        kind: RecordKind,
        field: &'static str,
    },

    #[error("invalid field '{field}' in {kind} record: {source}")]
    InvalidField {
        kind: RecordKind,
        field: &'static str,
        source: ValidationError,
    },

    #[error("invalid optional field in {kind} record: {source}")]
    InvalidOptField {
        kind: RecordKind,
        source: ValidationError,
    },

    #[error("invalid optional field in header: {0}")]
    InvalidHeaderField(ValidationError),

    #[error("duplicate optional field tag '{tag}' in {kind} record")]
    DuplicateTag { kind: RecordKind, tag: String },

    #[error("expected a {expected} record, found a '{found}' line")]
    WrongKind { expected: RecordKind, found: String },

    #[error("line is not valid UTF-8: {0}")]
    InvalidUtf8(#[source] std::str::Utf8Error),

    #[error("Unrecognized line: {0}")]
    UnrecognizedLine(String),

    #[error("Too many records: {0} exceeds maximum allowed")]
    TooManyRecords(usize),
}

/// The ten record kinds that normalize into graph entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordKind {
    SegmentV1,
    SegmentV2,
    Link,
    Containment,
    Fragment,
    Edge,
    Gap,
    Path,
    OGroup,
    UGroup,
}

impl RecordKind {
    /// One-letter tag opening the record's line
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::SegmentV1 | Self::SegmentV2 => "S",
            Self::Link => "L",
            Self::Containment => "C",
            Self::Fragment => "F",
            Self::Edge => "E",
            Self::Gap => "G",
            Self::Path => "P",
            Self::OGroup => "O",
            Self::UGroup => "U",
        }
    }

    /// Required columns in the order they appear on the line
    #[must_use]
    pub fn required_fields(self) -> &'static [(&'static str, Grammar)] {
        match self {
            Self::SegmentV1 => &[("name", Grammar::Label), ("seq", Grammar::Sequence)],
            Self::SegmentV2 => &[
                ("name", Grammar::Label),
                ("seq_len", Grammar::Position),
                ("seq", Grammar::Sequence),
            ],
            Self::Link => &[
                ("from", Grammar::Label),
                ("from_orn", Grammar::Orientation),
                ("to", Grammar::Label),
                ("to_orn", Grammar::Orientation),
                ("overlap", Grammar::Cigar),
            ],
            Self::Containment => &[
                ("from", Grammar::Label),
                ("from_orn", Grammar::Orientation),
                ("to", Grammar::Label),
                ("to_orn", Grammar::Orientation),
                ("pos", Grammar::Position),
                ("overlap", Grammar::Cigar),
            ],
            Self::Fragment => &[
                ("sid", Grammar::Label),
                ("external", Grammar::Reference),
                ("sbeg", Grammar::Position),
                ("send", Grammar::Position),
                ("fbeg", Grammar::Position),
                ("fend", Grammar::Position),
                ("alignment", Grammar::Alignment),
            ],
            Self::Edge => &[
                ("eid", Grammar::OptionalId),
                ("sid1", Grammar::Reference),
                ("sid2", Grammar::Reference),
                ("beg1", Grammar::Position),
                ("end1", Grammar::Position),
                ("beg2", Grammar::Position),
                ("end2", Grammar::Position),
                ("alignment", Grammar::Alignment),
            ],
            Self::Gap => &[
                ("gid", Grammar::OptionalId),
                ("sid1", Grammar::Reference),
                ("sid2", Grammar::Reference),
                ("disp", Grammar::Integer),
                ("var", Grammar::Variance),
            ],
            Self::Path => &[
                ("path_name", Grammar::Label),
                ("seqs_names", Grammar::PathSegments),
                ("overlaps", Grammar::Overlaps),
            ],
            Self::OGroup => &[
                ("oid", Grammar::OptionalId),
                ("references", Grammar::ReferenceList),
            ],
            Self::UGroup => &[
                ("uid", Grammar::OptionalId),
                ("references", Grammar::IdList),
            ],
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::SegmentV1 => "segment (GFA 1)",
            Self::SegmentV2 => "segment (GFA 2)",
            Self::Link => "link",
            Self::Containment => "containment",
            Self::Fragment => "fragment",
            Self::Edge => "edge",
            Self::Gap => "gap",
            Self::Path => "path",
            Self::OGroup => "ordered group",
            Self::UGroup => "unordered group",
        };
        write!(f, "{name}")
    }
}

/// A parsed line: required fields by name plus optional fields by tag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub kind: RecordKind,
    pub fields: BTreeMap<String, Field>,
    pub opt_fields: BTreeMap<String, OptField>,
}

impl Record {
    /// An empty record of `kind`; not valid until its required fields are added
    #[must_use]
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            fields: BTreeMap::new(),
            opt_fields: BTreeMap::new(),
        }
    }

    /// Add or replace a required field
    pub fn add_field(&mut self, field: Field) {
        self.fields.insert(field.name.clone(), field);
    }

    /// Add an optional field.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::DuplicateTag` if the tag is already present.
    pub fn add_opt_field(&mut self, field: OptField) -> Result<(), ParseError> {
        if self.opt_fields.contains_key(&field.tag) {
            return Err(ParseError::DuplicateTag {
                kind: self.kind,
                tag: field.tag,
            });
        }
        self.opt_fields.insert(field.tag.clone(), field);
        Ok(())
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).map(|f| &f.value)
    }

    /// True when every required field of the kind is present and well-typed
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.kind
            .required_fields()
            .iter()
            .all(|(name, grammar)| self.value(name).is_some_and(|v| conforms(v, *grammar)))
    }

    /// Parse a tab-delimited line as a record of `kind`.
    ///
    /// The line may start with the kind's one-letter tag or contain only the
    /// bare columns.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::WrongKind` if the line is tagged as another record
    /// type, `ParseError::MissingField` if a required column is absent,
    /// `ParseError::InvalidField` for the first column failing its grammar,
    /// and `ParseError::InvalidOptField`/`DuplicateTag` for bad optional fields.
    pub fn parse(kind: RecordKind, line: &str) -> Result<Self, ParseError> {
        let columns = columns(kind, line)?;
        let required = kind.required_fields();
        let mut record = Self::new(kind);

        for (i, &(name, grammar)) in required.iter().enumerate() {
            let token = columns
                .get(i)
                .ok_or(ParseError::MissingField { kind, field: name })?;
            let field = Field::parse(name, token, grammar).map_err(|source| {
                ParseError::InvalidField {
                    kind,
                    field: name,
                    source,
                }
            })?;
            record.add_field(field);
        }

        for token in columns
            .iter()
            .skip(required.len())
            .filter(|token| !token.is_empty())
        {
            let field = OptField::from_token(token)
                .map_err(|source| ParseError::InvalidOptField { kind, source })?;
            record.add_opt_field(field)?;
        }

        Ok(record)
    }
}

/// Split a line into columns, dropping the leading kind tag if present.
///
/// A first column naming another kind only counts as a tag when the line is
/// wide enough to hold that tag plus the required fields; a shorter line is a
/// bare tuple whose first value merely looks like a tag.
pub(crate) fn columns(kind: RecordKind, line: &str) -> Result<Vec<&str>, ParseError> {
    let line = line.trim_end_matches(['\n', '\r']);
    let mut columns: Vec<&str> = line.split('\t').collect();
    let filled = columns.iter().filter(|column| !column.is_empty()).count();

    match columns.first() {
        Some(&first) if first == kind.tag() => {
            columns.remove(0);
        }
        Some(&first) if KNOWN_TAGS.contains(&first) && filled > kind.required_fields().len() => {
            return Err(ParseError::WrongKind {
                expected: kind,
                found: first.to_string(),
            });
        }
        _ => {}
    }

    Ok(columns)
}

/// Structural pre-check shared by the non-segment parsers: tagged with the
/// kind's letter and carrying at least the required number of columns.
pub(crate) fn has_tag_and_arity(kind: RecordKind, line: &str) -> bool {
    let mut columns = line.split('\t');
    columns.next() == Some(kind.tag()) && columns.count() >= kind.required_fields().len()
}
