//! Token grammars for GFA 1 and GFA 2 columns.
//!
//! Every grammar is a regular expression anchored at both ends, so a token
//! is accepted only when the *whole* token matches. A successful match is
//! converted into a typed [`Value`].

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::core::types::Orientation;

/// A token did not match the grammar it was validated against
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{token}' is not a valid {grammar}")]
pub struct ValidationError {
    pub grammar: Grammar,
    pub token: String,
}

impl ValidationError {
    fn new(grammar: Grammar, token: &str) -> Self {
        Self {
            grammar,
            token: token.to_string(),
        }
    }
}

/// Named token grammars.
///
/// The first group covers required record columns; the second group mirrors
/// the optional-field type codes (`A`, `i`, `f`, `Z`, `J`, `H`, `B`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    /// Segment or record name
    Label,
    /// A name, or `*` when the record has no identifier
    OptionalId,
    /// Nucleotide sequence, or `*` when absent
    Sequence,
    /// Non-negative offset with an optional trailing `$` end marker
    Position,
    /// Signed integer
    Integer,
    /// `+` or `-`
    Orientation,
    /// Identifier with a fused orientation suffix, e.g. `11+`
    Reference,
    /// GFA 1 overlap: `*` or a CIGAR string
    Cigar,
    /// GFA 2 alignment: `*`, a CIGAR string or a trace
    Alignment,
    /// Gap variance: `*` or an integer
    Variance,
    /// Comma-separated references of a GFA 1 path
    PathSegments,
    /// `*` or comma-separated CIGAR strings
    Overlaps,
    /// Space-separated references of an ordered group
    ReferenceList,
    /// Space-separated identifiers of an unordered group, orientation optional
    IdList,
    /// A whole `TAG:TYPE:VALUE` token
    OptionalField,

    Char,
    Int,
    Float,
    String,
    Json,
    Hex,
    NumericArray,
}

impl Grammar {
    const ALL: [Grammar; 22] = [
        Grammar::Label,
        Grammar::OptionalId,
        Grammar::Sequence,
        Grammar::Position,
        Grammar::Integer,
        Grammar::Orientation,
        Grammar::Reference,
        Grammar::Cigar,
        Grammar::Alignment,
        Grammar::Variance,
        Grammar::PathSegments,
        Grammar::Overlaps,
        Grammar::ReferenceList,
        Grammar::IdList,
        Grammar::OptionalField,
        Grammar::Char,
        Grammar::Int,
        Grammar::Float,
        Grammar::String,
        Grammar::Json,
        Grammar::Hex,
        Grammar::NumericArray,
    ];

    fn pattern(self) -> &'static str {
        match self {
            Self::Label => r"[!-)+-<>-~][!-~]*",
            Self::OptionalId => r"\*|[!-~]+",
            Self::Sequence => r"\*|[A-Za-z=.]+",
            Self::Position => r"[0-9]+\$?",
            Self::Integer | Self::Int => r"[-+]?[0-9]+",
            Self::Orientation => r"[+-]",
            Self::Reference => r"[!-~]+[+-]",
            Self::Cigar => r"\*|([0-9]+[MIDNSHPX=])+",
            Self::Alignment => r"\*|([0-9]+[MDIP])+|(-?[0-9]+(,-?[0-9]+)*)",
            Self::Variance => r"\*|[-+]?[0-9]+",
            Self::PathSegments => r"[^,\s]+[+-](,[^,\s]+[+-])*",
            Self::Overlaps => r"\*|([0-9]+[MIDNSHPX=])+(,([0-9]+[MIDNSHPX=])+)*",
            Self::ReferenceList => r"[!-~]+[+-]( [!-~]+[+-])*",
            Self::IdList => r"[!-~]+( [!-~]+)*",
            Self::OptionalField => r"[A-Za-z][A-Za-z0-9]:[AifZJHB]:[ !-~]+",
            Self::Char => r"[!-~]",
            Self::Float => r"[-+]?[0-9]*\.?[0-9]+([eE][-+]?[0-9]+)?",
            Self::String | Self::Json => r"[ !-~]+",
            Self::Hex => r"[0-9A-F]+",
            Self::NumericArray => r"[cCsSiIf](,[-+]?[0-9]*\.?[0-9]+([eE][-+]?[0-9]+)?)+",
        }
    }

    fn regex(self) -> &'static Regex {
        static COMPILED: OnceLock<HashMap<Grammar, Regex>> = OnceLock::new();
        let compiled = COMPILED.get_or_init(|| {
            Grammar::ALL
                .iter()
                .map(|g| {
                    let anchored = format!("^(?:{})$", g.pattern());
                    let re = Regex::new(&anchored).expect("grammar patterns are static and valid");
                    (*g, re)
                })
                .collect()
        });
        &compiled[&self]
    }

    /// Whole-token match, without building a value
    #[must_use]
    pub fn matches(self, token: &str) -> bool {
        self.regex().is_match(token)
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Label => "label",
            Self::OptionalId => "optional identifier",
            Self::Sequence => "sequence",
            Self::Position => "position",
            Self::Integer => "integer",
            Self::Orientation => "orientation",
            Self::Reference => "oriented reference",
            Self::Cigar => "CIGAR overlap",
            Self::Alignment => "alignment",
            Self::Variance => "variance",
            Self::PathSegments => "path segment list",
            Self::Overlaps => "overlap list",
            Self::ReferenceList => "reference list",
            Self::IdList => "identifier list",
            Self::OptionalField => "optional field (TAG:TYPE:VALUE)",
            Self::Char => "printable character (A)",
            Self::Int => "integer (i)",
            Self::Float => "float (f)",
            Self::String => "string (Z)",
            Self::Json => "JSON (J)",
            Self::Hex => "hex byte array (H)",
            Self::NumericArray => "numeric array (B)",
        };
        write!(f, "{name}")
    }
}

/// An offset into a segment. `is_end` records the GFA 2 `$` marker that
/// flags the position as the segment's last base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub value: u64,
    pub is_end: bool,
}

impl Position {
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self {
            value,
            is_end: false,
        }
    }

    #[must_use]
    pub fn end(value: u64) -> Self {
        Self {
            value,
            is_end: true,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_end {
            write!(f, "{}$", self.value)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// Typed value produced by a successful validation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Char(char),
    Int(i64),
    Float(f64),
    Json(String),
    Hex(String),
    IntArray { subtype: char, values: Vec<i64> },
    FloatArray(Vec<f64>),
    Position(Position),
    Orientation(Orientation),
    List(Vec<String>),
}

impl Value {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Json(s) | Self::Hex(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_position(&self) -> Option<Position> {
        match self {
            Self::Position(p) => Some(*p),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_orientation(&self) -> Option<Orientation> {
        match self {
            Self::Orientation(o) => Some(*o),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) | Self::Json(s) | Self::Hex(s) => write!(f, "{s}"),
            Self::Char(c) => write!(f, "{c}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::IntArray { subtype, values } => {
                write!(f, "{subtype}")?;
                for v in values {
                    write!(f, ",{v}")?;
                }
                Ok(())
            }
            Self::FloatArray(values) => {
                write!(f, "f")?;
                for v in values {
                    write!(f, ",{v}")?;
                }
                Ok(())
            }
            Self::Position(p) => write!(f, "{p}"),
            Self::Orientation(o) => write!(f, "{o}"),
            Self::List(items) => write!(f, "{}", items.join(",")),
        }
    }
}

/// Validate `token` against `grammar` and convert it into a typed value.
///
/// # Errors
///
/// Returns `ValidationError` if the token does not match the whole grammar,
/// or if a numeric token overflows its target type.
pub fn validate(token: &str, grammar: Grammar) -> Result<Value, ValidationError> {
    if !grammar.matches(token) {
        return Err(ValidationError::new(grammar, token));
    }

    let invalid = || ValidationError::new(grammar, token);

    let value = match grammar {
        Grammar::Label
        | Grammar::OptionalId
        | Grammar::Sequence
        | Grammar::Reference
        | Grammar::Cigar
        | Grammar::Alignment
        | Grammar::Variance
        | Grammar::Overlaps
        | Grammar::OptionalField
        | Grammar::String => Value::Text(token.to_string()),
        Grammar::Json => Value::Json(token.to_string()),
        Grammar::Hex => Value::Hex(token.to_string()),
        Grammar::Position => {
            let (digits, is_end) = match token.strip_suffix('$') {
                Some(digits) => (digits, true),
                None => (token, false),
            };
            let value = digits.parse().map_err(|_| invalid())?;
            Value::Position(Position { value, is_end })
        }
        Grammar::Integer | Grammar::Int => Value::Int(token.parse().map_err(|_| invalid())?),
        Grammar::Orientation => {
            Value::Orientation(Orientation::from_symbol(token).ok_or_else(invalid)?)
        }
        Grammar::PathSegments => Value::List(token.split(',').map(str::to_string).collect()),
        Grammar::ReferenceList | Grammar::IdList => {
            Value::List(token.split(' ').map(str::to_string).collect())
        }
        Grammar::Char => Value::Char(token.chars().next().ok_or_else(invalid)?),
        Grammar::Float => Value::Float(token.parse().map_err(|_| invalid())?),
        Grammar::NumericArray => parse_numeric_array(token).ok_or_else(invalid)?,
    };

    Ok(value)
}

/// Whether an already-typed value could have been produced by `grammar`.
///
/// Used to check records assembled field by field rather than parsed from
/// text.
#[must_use]
pub fn conforms(value: &Value, grammar: Grammar) -> bool {
    match (grammar, value) {
        (Grammar::Position, Value::Position(_))
        | (Grammar::Integer | Grammar::Int, Value::Int(_))
        | (Grammar::Orientation, Value::Orientation(_))
        | (Grammar::Char, Value::Char(_))
        | (Grammar::Float, Value::Float(_))
        | (Grammar::NumericArray, Value::IntArray { .. } | Value::FloatArray(_)) => true,
        (Grammar::PathSegments, Value::List(items)) => grammar.matches(&items.join(",")),
        (Grammar::ReferenceList | Grammar::IdList, Value::List(items)) => {
            grammar.matches(&items.join(" "))
        }
        (_, Value::Text(s) | Value::Json(s) | Value::Hex(s)) => grammar.matches(s),
        _ => false,
    }
}

fn parse_numeric_array(token: &str) -> Option<Value> {
    let mut parts = token.split(',');
    let subtype = parts.next()?.chars().next()?;

    if subtype == 'f' {
        let values = parts.map(str::parse).collect::<Result<Vec<f64>, _>>().ok()?;
        Some(Value::FloatArray(values))
    } else {
        let values = parts.map(str::parse).collect::<Result<Vec<i64>, _>>().ok()?;
        if !values.iter().all(|&v| fits_subtype(subtype, v)) {
            return None;
        }
        Some(Value::IntArray { subtype, values })
    }
}

/// Whether `value` is representable by the integer subtype of a `B` array
fn fits_subtype(subtype: char, value: i64) -> bool {
    match subtype {
        'c' => i8::try_from(value).is_ok(),
        'C' => u8::try_from(value).is_ok(),
        's' => i16::try_from(value).is_ok(),
        'S' => u16::try_from(value).is_ok(),
        'i' => i32::try_from(value).is_ok(),
        'I' => u32::try_from(value).is_ok(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_token_match() {
        assert!(Grammar::Sequence.matches("ACGT"));
        assert!(Grammar::Sequence.matches("*"));
        assert!(!Grammar::Sequence.matches("ACGT 1"));
        assert!(!Grammar::Position.matches("12a"));
        assert!(!Grammar::Orientation.matches("+-"));
    }

    #[test]
    fn test_label_rejects_leading_star_and_equals() {
        assert!(Grammar::Label.matches("chr1"));
        assert!(!Grammar::Label.matches("*chr1"));
        assert!(!Grammar::Label.matches("=chr1"));
        assert!(!Grammar::Label.matches(""));
    }

    #[test]
    fn test_validate_position() {
        assert_eq!(
            validate("140$", Grammar::Position).unwrap(),
            Value::Position(Position::end(140))
        );
        assert_eq!(
            validate("0", Grammar::Position).unwrap(),
            Value::Position(Position::new(0))
        );
        assert!(validate("-1", Grammar::Position).is_err());
        assert!(validate("99999999999999999999999", Grammar::Position).is_err());
    }

    #[test]
    fn test_validate_orientation() {
        assert_eq!(
            validate("-", Grammar::Orientation).unwrap(),
            Value::Orientation(Orientation::Reverse)
        );
    }

    #[test]
    fn test_validate_lists() {
        assert_eq!(
            validate("11+,12-", Grammar::PathSegments).unwrap(),
            Value::List(vec!["11+".to_string(), "12-".to_string()])
        );
        assert_eq!(
            validate("11+ 11_to_13+ 13+", Grammar::ReferenceList)
                .unwrap()
                .as_list()
                .map(<[String]>::len),
            Some(3)
        );
        assert!(validate("2 3", Grammar::IdList).is_ok());
        assert!(validate("2 3", Grammar::ReferenceList).is_err());
    }

    #[test]
    fn test_validate_numeric_array() {
        assert_eq!(
            validate("c,1,-2,3", Grammar::NumericArray).unwrap(),
            Value::IntArray {
                subtype: 'c',
                values: vec![1, -2, 3]
            }
        );
        assert_eq!(
            validate("f,1.5,2", Grammar::NumericArray).unwrap(),
            Value::FloatArray(vec![1.5, 2.0])
        );
        assert!(validate("i,1.5", Grammar::NumericArray).is_err());
    }

    #[test]
    fn test_numeric_array_subtype_ranges() {
        assert!(validate("c,100,-128", Grammar::NumericArray).is_ok());
        assert!(validate("c,1000", Grammar::NumericArray).is_err());
        assert!(validate("C,255", Grammar::NumericArray).is_ok());
        assert!(validate("C,-1", Grammar::NumericArray).is_err());
        assert!(validate("s,-32769", Grammar::NumericArray).is_err());
        assert!(validate("S,65535", Grammar::NumericArray).is_ok());
        assert!(validate("i,2147483648", Grammar::NumericArray).is_err());
        assert!(validate("I,4294967295", Grammar::NumericArray).is_ok());
    }

    #[test]
    fn test_conforms() {
        assert!(conforms(&Value::Text("ACGT".to_string()), Grammar::Sequence));
        assert!(!conforms(&Value::Text("21".to_string()), Grammar::Sequence));
        assert!(conforms(&Value::Position(Position::new(21)), Grammar::Position));
        assert!(!conforms(&Value::Int(21), Grammar::Position));
        assert!(conforms(
            &Value::List(vec!["2".to_string(), "3+".to_string()]),
            Grammar::IdList
        ));
    }

    #[test]
    fn test_validation_error_message() {
        let err = validate("ACGT!", Grammar::Sequence).unwrap_err();
        assert_eq!(err.to_string(), "'ACGT!' is not a valid sequence");
    }
}
