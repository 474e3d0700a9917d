// std imports
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// 3rd party imports
use serde::{Deserialize, Serialize};

// internal imports
use crate::biology::digestion_enzyme::cleavage_specificity::CleavageSpecificity;
use crate::biology::digestion_enzyme::trypsin::NAME as TRYPSIN_NAME;
use crate::chemistry::mass_basis::MassBasis;
use crate::entities::constraint::MAX_SEQUENCE_LENGTH;
use crate::errors::search_error::SearchError;
use crate::functions::decoy::DecoyMethod;
use crate::functions::xlink::precursor_window::PrecursorWindowType;

/// Keeps the search parameters, e.g. digestion, modification, decoy and calibration parameters.
/// Constructed and validated once, afterwards shared immutably.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfiguration {
    enzyme_name: String,
    cleavage_specificity: CleavageSpecificity,
    max_number_of_missed_cleavages: usize,
    min_peptide_length: usize,
    max_peptide_length: usize,
    min_peptide_mass: f64,
    max_peptide_mass: f64,
    mass_basis: MassBasis,
    max_variable_modifications: usize,
    precursor_window: f64,
    top_k: usize,
    number_of_decoys: usize,
    decoy_method: DecoyMethod,
    seed: u64,
    compute_p_values: bool,
    weibull_fraction: f64,
    min_weibull_sample_size: usize,
    calibration_sample_size: usize,
    linker_mass: f64,
    xlink_window: f64,
    xlink_window_type: PrecursorWindowType,
    link_sites: String,
    number_of_threads: usize,
}

impl Default for SearchConfiguration {
    fn default() -> Self {
        Self {
            enzyme_name: TRYPSIN_NAME.to_string(),
            cleavage_specificity: CleavageSpecificity::Full,
            max_number_of_missed_cleavages: 0,
            min_peptide_length: 6,
            max_peptide_length: 50,
            min_peptide_mass: 200.0,
            max_peptide_mass: 7200.0,
            mass_basis: MassBasis::Monoisotopic,
            max_variable_modifications: 2,
            precursor_window: 3.0,
            top_k: 500,
            number_of_decoys: 2,
            decoy_method: DecoyMethod::Shuffle,
            seed: 7,
            compute_p_values: false,
            weibull_fraction: 0.55,
            min_weibull_sample_size: 10,
            calibration_sample_size: 500,
            linker_mass: 0.0,
            xlink_window: 3.0,
            xlink_window_type: PrecursorWindowType::Mass,
            link_sites: "K:K".to_string(),
            number_of_threads: 1,
        }
    }
}

impl SearchConfiguration {
    /// Reads the configuration from a JSON file. Missing keys fall back to the defaults.
    /// The configuration is validated.
    ///
    /// # Arguments
    /// * `path` - Path to the JSON file
    ///
    pub fn from_json_file(path: &Path) -> Result<Self, SearchError> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the parameters for consistency
    ///
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.min_peptide_length > self.max_peptide_length {
            return Err(SearchError::ConstraintViolation(format!(
                "min peptide length {} exceeds max peptide length {}",
                self.min_peptide_length, self.max_peptide_length
            )));
        }
        if self.max_peptide_length > MAX_SEQUENCE_LENGTH {
            return Err(SearchError::ConstraintViolation(format!(
                "max peptide length {} exceeds the limit of {}",
                self.max_peptide_length, MAX_SEQUENCE_LENGTH
            )));
        }
        if self.min_peptide_mass > self.max_peptide_mass {
            return Err(SearchError::ConstraintViolation(format!(
                "min peptide mass {} exceeds max peptide mass {}",
                self.min_peptide_mass, self.max_peptide_mass
            )));
        }
        if !(self.weibull_fraction > 0.0 && self.weibull_fraction <= 1.0) {
            return Err(SearchError::ConstraintViolation(format!(
                "Weibull fraction {} not in (0, 1]",
                self.weibull_fraction
            )));
        }
        if self.compute_p_values && self.calibration_sample_size == 0 {
            return Err(SearchError::ConstraintViolation(
                "calibration sample size must be greater than 0".to_string(),
            ));
        }
        if self.precursor_window < 0.0 || self.xlink_window < 0.0 {
            return Err(SearchError::ConstraintViolation(
                "negative precursor window".to_string(),
            ));
        }
        if self.number_of_threads == 0 {
            return Err(SearchError::ConstraintViolation(
                "number of threads must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn get_enzyme_name(&self) -> &str {
        self.enzyme_name.as_str()
    }

    pub fn get_cleavage_specificity(&self) -> CleavageSpecificity {
        self.cleavage_specificity
    }

    /// Returns maximum number of missed cleavages
    ///
    pub fn get_max_number_of_missed_cleavages(&self) -> usize {
        self.max_number_of_missed_cleavages
    }

    pub fn get_min_peptide_length(&self) -> usize {
        self.min_peptide_length
    }

    pub fn get_max_peptide_length(&self) -> usize {
        self.max_peptide_length
    }

    /// Returns the minimum peptide mass in Dalton
    pub fn get_min_peptide_mass(&self) -> f64 {
        self.min_peptide_mass
    }

    /// Returns the maximum peptide mass in Dalton
    pub fn get_max_peptide_mass(&self) -> f64 {
        self.max_peptide_mass
    }

    pub fn get_mass_basis(&self) -> MassBasis {
        self.mass_basis
    }

    /// Returns the maximum number of variable modifications per peptide
    ///
    pub fn get_max_variable_modifications(&self) -> usize {
        self.max_variable_modifications
    }

    /// Returns the precursor mass tolerance in Dalton
    pub fn get_precursor_window(&self) -> f64 {
        self.precursor_window
    }

    /// Returns the number of candidates kept after preliminary scoring
    pub fn get_top_k(&self) -> usize {
        self.top_k
    }

    pub fn get_number_of_decoys(&self) -> usize {
        self.number_of_decoys
    }

    pub fn get_decoy_method(&self) -> DecoyMethod {
        self.decoy_method
    }

    pub fn get_seed(&self) -> u64 {
        self.seed
    }

    pub fn get_compute_p_values(&self) -> bool {
        self.compute_p_values
    }

    /// Returns the fraction of top scores used for the Weibull fit
    pub fn get_weibull_fraction(&self) -> f64 {
        self.weibull_fraction
    }

    pub fn get_min_weibull_sample_size(&self) -> usize {
        self.min_weibull_sample_size
    }

    /// Returns the maximum number of candidates per spectrum, charge and decoy replicate
    /// which are primary scored for the Weibull fit
    pub fn get_calibration_sample_size(&self) -> usize {
        self.calibration_sample_size
    }

    /// Returns the linker mass in Dalton
    pub fn get_linker_mass(&self) -> f64 {
        self.linker_mass
    }

    pub fn get_xlink_window(&self) -> f64 {
        self.xlink_window
    }

    pub fn get_xlink_window_type(&self) -> PrecursorWindowType {
        self.xlink_window_type
    }

    /// Returns the cross-link site rules, e.g. `K:K,K:S`
    pub fn get_link_sites(&self) -> &str {
        self.link_sites.as_str()
    }

    pub fn get_number_of_threads(&self) -> usize {
        self.number_of_threads
    }

    pub fn with_enzyme_name(mut self, enzyme_name: &str) -> Self {
        self.enzyme_name = enzyme_name.to_string();
        self
    }

    pub fn with_cleavage_specificity(mut self, cleavage_specificity: CleavageSpecificity) -> Self {
        self.cleavage_specificity = cleavage_specificity;
        self
    }

    pub fn with_max_number_of_missed_cleavages(mut self, max_number_of_missed_cleavages: usize) -> Self {
        self.max_number_of_missed_cleavages = max_number_of_missed_cleavages;
        self
    }

    pub fn with_peptide_length(mut self, min_peptide_length: usize, max_peptide_length: usize) -> Self {
        self.min_peptide_length = min_peptide_length;
        self.max_peptide_length = max_peptide_length;
        self
    }

    pub fn with_peptide_mass(mut self, min_peptide_mass: f64, max_peptide_mass: f64) -> Self {
        self.min_peptide_mass = min_peptide_mass;
        self.max_peptide_mass = max_peptide_mass;
        self
    }

    pub fn with_mass_basis(mut self, mass_basis: MassBasis) -> Self {
        self.mass_basis = mass_basis;
        self
    }

    pub fn with_max_variable_modifications(mut self, max_variable_modifications: usize) -> Self {
        self.max_variable_modifications = max_variable_modifications;
        self
    }

    pub fn with_precursor_window(mut self, precursor_window: f64) -> Self {
        self.precursor_window = precursor_window;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_number_of_decoys(mut self, number_of_decoys: usize) -> Self {
        self.number_of_decoys = number_of_decoys;
        self
    }

    pub fn with_decoy_method(mut self, decoy_method: DecoyMethod) -> Self {
        self.decoy_method = decoy_method;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_compute_p_values(mut self, compute_p_values: bool) -> Self {
        self.compute_p_values = compute_p_values;
        self
    }

    pub fn with_weibull(mut self, weibull_fraction: f64, min_weibull_sample_size: usize) -> Self {
        self.weibull_fraction = weibull_fraction;
        self.min_weibull_sample_size = min_weibull_sample_size;
        self
    }

    pub fn with_calibration_sample_size(mut self, calibration_sample_size: usize) -> Self {
        self.calibration_sample_size = calibration_sample_size;
        self
    }

    pub fn with_linker_mass(mut self, linker_mass: f64) -> Self {
        self.linker_mass = linker_mass;
        self
    }

    pub fn with_xlink_window(mut self, xlink_window: f64, xlink_window_type: PrecursorWindowType) -> Self {
        self.xlink_window = xlink_window;
        self.xlink_window_type = xlink_window_type;
        self
    }

    pub fn with_link_sites(mut self, link_sites: &str) -> Self {
        self.link_sites = link_sites.to_string();
        self
    }

    pub fn with_number_of_threads(mut self, number_of_threads: usize) -> Self {
        self.number_of_threads = number_of_threads;
        self
    }
}
