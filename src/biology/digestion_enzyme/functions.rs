// internal imports
use crate::biology::digestion_enzyme::enzyme::Enzyme;
use crate::biology::digestion_enzyme::trypsin::{Trypsin, NAME as TRYPSIN_NAME};
use crate::errors::search_error::SearchError;

/// Returns an enzyme by name
///
/// # Arguments
/// * `name` - Name of the enzyme e.g. "trypsin" or "Trypsin"
/// * `max_number_of_missed_cleavages` - Maximum number of missed cleavages
/// * `min_peptide_length` - Minimum length of a peptide
/// * `max_peptide_length` - Maximum length of a peptide
///
pub fn get_enzyme_by_name(
    name: &str,
    max_number_of_missed_cleavages: usize,
    min_peptide_length: usize,
    max_peptide_length: usize,
) -> Result<Box<dyn Enzyme>, SearchError> {
    match name.to_lowercase().as_str() {
        TRYPSIN_NAME => Ok(Box::new(Trypsin::new(
            max_number_of_missed_cleavages,
            min_peptide_length,
            max_peptide_length,
        ))),
        _ => Err(SearchError::ConstraintViolation(format!(
            "enzyme {} not supported",
            name
        ))),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_get_enzyme_by_name() {
        let enzyme = get_enzyme_by_name("Trypsin", 2, 6, 50).unwrap();
        assert_eq!(enzyme.get_name(), "trypsin");
        assert_eq!(enzyme.get_max_number_of_missed_cleavages(), 2);
        assert!(get_enzyme_by_name("pepsin", 2, 6, 50).is_err());
    }
}
