// std imports
use std::fmt::Display;
use std::str::FromStr;

// 3rd party imports
use serde::{Deserialize, Serialize};

// internal imports
use crate::errors::search_error::SearchError;

/// Which isotopic mass is used to calculate peptide and fragment masses
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MassBasis {
    Average,
    #[default]
    Monoisotopic,
}

impl FromStr for MassBasis {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "average" | "avg" => Ok(Self::Average),
            "monoisotopic" | "mono" => Ok(Self::Monoisotopic),
            _ => Err(SearchError::ConstraintViolation(format!(
                "unknown mass basis '{}'",
                s
            ))),
        }
    }
}

impl Display for MassBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Average => write!(f, "average"),
            Self::Monoisotopic => write!(f, "monoisotopic"),
        }
    }
}
