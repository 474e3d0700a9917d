// std imports
use std::fmt::Display;
use std::str::FromStr;

// 3rd party imports
use serde::{Deserialize, Serialize};

// internal imports
use crate::errors::search_error::SearchError;

/// How many termini of a peptide have to be produced by the enzyme
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleavageSpecificity {
    /// Both termini are cleavage sites or protein termini
    #[default]
    Full,
    /// At least one terminus is a cleavage site or protein terminus
    Partial,
    /// Any subsequence
    None,
}

impl FromStr for CleavageSpecificity {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" | "tryptic" | "enzymatic" => Ok(Self::Full),
            "partial" | "semi" => Ok(Self::Partial),
            "none" | "all" => Ok(Self::None),
            _ => Err(SearchError::ConstraintViolation(format!(
                "unknown cleavage specificity '{}'",
                s
            ))),
        }
    }
}

impl Display for CleavageSpecificity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Partial => write!(f, "partial"),
            Self::None => write!(f, "none"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(CleavageSpecificity::from_str("tryptic").unwrap(), CleavageSpecificity::Full);
        assert_eq!(CleavageSpecificity::from_str("Partial").unwrap(), CleavageSpecificity::Partial);
        assert_eq!(CleavageSpecificity::from_str("all").unwrap(), CleavageSpecificity::None);
        assert!(CleavageSpecificity::from_str("sometimes").is_err());
    }
}
