//! Required fields and `TAG:TYPE:VALUE` optional fields.

use serde::Serialize;

use crate::parsing::validator::{validate, Grammar, ValidationError, Value};

/// A named, validated column of a record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

impl Field {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Convenience constructor for a text-valued field
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, Value::Text(value.into()))
    }

    /// Validate `token` against `grammar` and name the result.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the token does not match the grammar.
    pub fn parse(
        name: impl Into<String>,
        token: &str,
        grammar: Grammar,
    ) -> Result<Self, ValidationError> {
        Ok(Self::new(name, validate(token, grammar)?))
    }
}

/// GFA optional-field type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TypeCode {
    /// `A`: printable character
    Char,
    /// `i`: signed integer
    Int,
    /// `f`: single-precision float
    Float,
    /// `Z`: printable string
    String,
    /// `J`: JSON, excluding new-line and tab
    Json,
    /// `H`: byte array in hex
    Hex,
    /// `B`: integer or numeric array
    NumericArray,
}

impl TypeCode {
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "A" => Some(Self::Char),
            "i" => Some(Self::Int),
            "f" => Some(Self::Float),
            "Z" => Some(Self::String),
            "J" => Some(Self::Json),
            "H" => Some(Self::Hex),
            "B" => Some(Self::NumericArray),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> char {
        match self {
            Self::Char => 'A',
            Self::Int => 'i',
            Self::Float => 'f',
            Self::String => 'Z',
            Self::Json => 'J',
            Self::Hex => 'H',
            Self::NumericArray => 'B',
        }
    }

    #[must_use]
    pub fn grammar(self) -> Grammar {
        match self {
            Self::Char => Grammar::Char,
            Self::Int => Grammar::Int,
            Self::Float => Grammar::Float,
            Self::String => Grammar::String,
            Self::Json => Grammar::Json,
            Self::Hex => Grammar::Hex,
            Self::NumericArray => Grammar::NumericArray,
        }
    }

    /// Type code that best describes an already-typed value. Used when a
    /// required column is carried over into an entity's optional fields.
    #[must_use]
    pub fn for_value(value: &Value) -> Self {
        match value {
            Value::Char(_) => Self::Char,
            Value::Int(_) | Value::Position(_) => Self::Int,
            Value::Float(_) => Self::Float,
            Value::Json(_) => Self::Json,
            Value::Hex(_) => Self::Hex,
            Value::IntArray { .. } | Value::FloatArray(_) => Self::NumericArray,
            Value::Text(_) | Value::Orientation(_) | Value::List(_) => Self::String,
        }
    }
}

impl std::fmt::Display for TypeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A typed, tagged extension field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptField {
    pub tag: String,
    pub type_code: TypeCode,
    pub value: Value,
}

impl OptField {
    pub fn new(tag: impl Into<String>, type_code: TypeCode, value: Value) -> Self {
        Self {
            tag: tag.into(),
            type_code,
            value,
        }
    }

    /// Parse a `TAG:TYPE:VALUE` token.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the token is not shaped like an optional
    /// field, or if its value does not match the grammar of its type code.
    pub fn from_token(token: &str) -> Result<Self, ValidationError> {
        let malformed = || ValidationError {
            grammar: Grammar::OptionalField,
            token: token.to_string(),
        };

        if !Grammar::OptionalField.matches(token) {
            return Err(malformed());
        }

        let mut parts = token.splitn(3, ':');
        let (Some(tag), Some(code), Some(raw)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };
        let type_code = TypeCode::from_code(code).ok_or_else(malformed)?;
        let value = validate(raw, type_code.grammar())?;

        Ok(Self::new(tag, type_code, value))
    }

    /// Carry a required field over as an optional one, keeping its value.
    #[must_use]
    pub fn from_field(field: Field) -> Self {
        let type_code = TypeCode::for_value(&field.value);
        Self::new(field.name, type_code, field.value)
    }
}

impl std::fmt::Display for OptField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.tag, self.type_code, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opt_field_from_token() {
        let field = OptField::from_token("RC:i:4").unwrap();
        assert_eq!(field.tag, "RC");
        assert_eq!(field.type_code, TypeCode::Int);
        assert_eq!(field.value, Value::Int(4));

        let field = OptField::from_token("ui:Z:another test").unwrap();
        assert_eq!(field.value, Value::Text("another test".to_string()));

        let field = OptField::from_token("xx:Z:a:b:c").unwrap();
        assert_eq!(field.value.as_str(), Some("a:b:c"));
    }

    #[test]
    fn test_opt_field_rejects_malformed() {
        assert!(OptField::from_token("RC:i").is_err());
        assert!(OptField::from_token("RCX:i:4").is_err());
        assert!(OptField::from_token("RC:q:4").is_err());
        assert!(OptField::from_token("RC:i:four").is_err());
        assert!(OptField::from_token("SH:H:zz").is_err());
        assert!(OptField::from_token("xx:B:c,1000").is_err());
        assert!(OptField::from_token("xx:B:c,100").is_ok());
    }

    #[test]
    fn test_opt_field_display() {
        let field = OptField::from_token("xx:i:-1").unwrap();
        assert_eq!(field.to_string(), "xx:i:-1");
    }

    #[test]
    fn test_from_field_infers_type_code() {
        let field = Field::text("overlaps", "122M");
        let opt = OptField::from_field(field);
        assert_eq!(opt.tag, "overlaps");
        assert_eq!(opt.type_code, TypeCode::String);
    }
}
