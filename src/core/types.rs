use serde::Serialize;

/// Strand on which a segment is read in a relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Orientation {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

impl Orientation {
    /// Parse a single `+`/`-` symbol
    #[must_use]
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Self::Forward),
            "-" => Some(Self::Reverse),
            _ => None,
        }
    }

    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Forward => '+',
            Self::Reverse => '-',
        }
    }

    /// Split an identifier with a fused orientation suffix, e.g. `"11+"`.
    ///
    /// Returns `None` if the last character is not `+` or `-`, or if no
    /// identifier precedes it.
    #[must_use]
    pub fn split_suffixed(reference: &str) -> Option<(&str, Self)> {
        let (last, _) = reference.char_indices().next_back()?;
        let (id, suffix) = reference.split_at(last);
        if id.is_empty() {
            return None;
        }
        Self::from_symbol(suffix).map(|o| (id, o))
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Physical end of a segment taking part in a dovetail overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SegmentEnd {
    /// 5' end
    #[serde(rename = "L")]
    Left,
    /// 3' end
    #[serde(rename = "R")]
    Right,
}

impl std::fmt::Display for SegmentEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "L"),
            Self::Right => write!(f, "R"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_suffixed() {
        assert_eq!(
            Orientation::split_suffixed("11+"),
            Some(("11", Orientation::Forward))
        );
        assert_eq!(
            Orientation::split_suffixed("11_to_13-"),
            Some(("11_to_13", Orientation::Reverse))
        );
        assert_eq!(Orientation::split_suffixed("11"), None);
        assert_eq!(Orientation::split_suffixed("+"), None);
        assert_eq!(Orientation::split_suffixed(""), None);
    }
}
