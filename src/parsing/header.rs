//! Parser for `H` lines. A header carries only optional fields, e.g.
//! `H\tVN:Z:1.0`.

use std::collections::BTreeMap;

use crate::parsing::field::OptField;
use crate::parsing::record::ParseError;

#[must_use]
pub fn recognizes(line: &str) -> bool {
    line.split('\t').next() == Some("H")
}

/// Parse an `H` line into its optional fields, keyed by tag.
///
/// # Errors
///
/// Returns `ParseError::InvalidHeaderField` for a malformed optional field.
pub fn parse(line: &str) -> Result<BTreeMap<String, OptField>, ParseError> {
    let mut fields = BTreeMap::new();

    for token in line.split('\t').skip_while(|t| *t == "H") {
        if token.is_empty() {
            continue;
        }
        let field = OptField::from_token(token).map_err(ParseError::InvalidHeaderField)?;
        fields.insert(field.tag.clone(), field);
    }

    Ok(fields)
}
