// 3rd party imports
use thiserror::Error;

/// Errors which might occur while generating, scoring and calibrating candidates.
///
/// `EmptyCandidateSpace` and `CalibrationUnderflow` are local to a single spectrum/charge unit.
/// The unit is marked partial and the search continues. All other kinds are fatal.
///
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("No candidates for spectrum {0} with charge {1}")]
    EmptyCandidateSpace(String, u8),
    #[error("Too few scores for calibration (got: {0}, required: {1})")]
    CalibrationUnderflow(usize, usize),
    #[error("Malformed modification rule '{0}': {1}")]
    MalformedModificationRule(String, String),
    #[error("Sequence source unavailable: {0}")]
    SequenceSourceUnavailable(String),
    #[error("Scoring oracle error: {0}")]
    ScoringOracleError(anyhow::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl SearchError {
    /// True if the error only affects the current spectrum/charge unit
    ///
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::EmptyCandidateSpace(_, _) | Self::CalibrationUnderflow(_, _)
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_recoverable_kinds() {
        assert!(SearchError::EmptyCandidateSpace("scan=1".to_string(), 2).is_recoverable());
        assert!(SearchError::CalibrationUnderflow(3, 10).is_recoverable());
        assert!(!SearchError::ConstraintViolation("min > max".to_string()).is_recoverable());
        assert!(!SearchError::SequenceSourceUnavailable("gone".to_string()).is_recoverable());
        assert!(
            !SearchError::MalformedModificationRule("Oxidation".to_string(), "no residues".to_string())
                .is_recoverable()
        );
    }
}
