// 3rd party imports
use fancy_regex::Regex;

// internal imports
use crate::biology::digestion_enzyme::enzyme::Enzyme;

/// Name of the enzyme
pub const NAME: &str = "trypsin";

lazy_static! {
    static ref CLEAVAGE_SITE_REGEX: Regex = Regex::new("(?<=[KR])(?!P)").unwrap();
}

/// Digestion enzyme Trypsin, which cuts after K and R not followed by P.
///
pub struct Trypsin {
    max_number_of_missed_cleavages: usize,
    min_peptide_length: usize,
    max_peptide_length: usize,
}

impl Enzyme for Trypsin {
    fn new(
        max_number_of_missed_cleavages: usize,
        min_peptide_length: usize,
        max_peptide_length: usize,
    ) -> Self {
        return Self {
            max_number_of_missed_cleavages,
            min_peptide_length,
            max_peptide_length,
        };
    }

    fn get_name(&self) -> &str {
        return NAME;
    }

    fn get_cleavages_site_regex(&self) -> &Regex {
        return &CLEAVAGE_SITE_REGEX;
    }

    fn get_max_number_of_missed_cleavages(&self) -> usize {
        return self.max_number_of_missed_cleavages;
    }

    fn get_min_peptide_length(&self) -> usize {
        return self.min_peptide_length;
    }

    fn get_max_peptide_length(&self) -> usize {
        return self.max_peptide_length;
    }
}
