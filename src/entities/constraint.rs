// internal imports
use crate::biology::digestion_enzyme::cleavage_specificity::CleavageSpecificity;
use crate::chemistry::mass_basis::MassBasis;
use crate::entities::configuration::SearchConfiguration;
use crate::errors::search_error::SearchError;
use crate::mass::convert::{to_float as mass_to_float, to_int as mass_to_int};

/// Hard limit for the peptide length
pub const MAX_SEQUENCE_LENGTH: usize = 255;

/// Immutable bounds a peptide candidate has to satisfy
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeptideConstraint {
    min_length: usize,
    max_length: usize,
    min_mass: i64,
    max_mass: i64,
    cleavage_specificity: CleavageSpecificity,
    max_missed_cleavages: usize,
    mass_basis: MassBasis,
}

impl PeptideConstraint {
    /// Creates a new constraint.
    /// Fails with `ConstraintViolation` if a minimum exceeds its maximum.
    ///
    /// # Arguments
    /// * `min_length` - Minimum peptide length
    /// * `max_length` - Maximum peptide length
    /// * `min_mass` - Minimum mass (internal representation)
    /// * `max_mass` - Maximum mass (internal representation)
    /// * `cleavage_specificity` - Cleavage specificity
    /// * `max_missed_cleavages` - Maximum number of missed cleavages
    /// * `mass_basis` - Mass basis
    ///
    pub fn new(
        min_length: usize,
        max_length: usize,
        min_mass: i64,
        max_mass: i64,
        cleavage_specificity: CleavageSpecificity,
        max_missed_cleavages: usize,
        mass_basis: MassBasis,
    ) -> Result<Self, SearchError> {
        if min_length > max_length {
            return Err(SearchError::ConstraintViolation(format!(
                "min length {} exceeds max length {}",
                min_length, max_length
            )));
        }
        if min_mass > max_mass {
            return Err(SearchError::ConstraintViolation(format!(
                "min mass {} exceeds max mass {}",
                mass_to_float(min_mass),
                mass_to_float(max_mass)
            )));
        }
        Ok(Self {
            min_length,
            max_length,
            min_mass,
            max_mass,
            cleavage_specificity,
            max_missed_cleavages,
            mass_basis,
        })
    }

    /// Creates a constraint from the configuration covering all peptide masses of the configuration
    ///
    pub fn from_configuration(config: &SearchConfiguration) -> Result<Self, SearchError> {
        Self::new(
            config.get_min_peptide_length(),
            config.get_max_peptide_length(),
            mass_to_int(config.get_min_peptide_mass()),
            mass_to_int(config.get_max_peptide_mass()),
            config.get_cleavage_specificity(),
            config.get_max_number_of_missed_cleavages(),
            config.get_mass_basis(),
        )
    }

    /// Creates a constraint from the configuration with mass bounds `mass ± window`.
    /// Masses are in Dalton.
    ///
    /// # Arguments
    /// * `config` - Search configuration
    /// * `mass` - Target mass
    /// * `window` - Tolerance in Dalton
    ///
    pub fn from_configuration_for_mass(
        config: &SearchConfiguration,
        mass: f64,
        window: f64,
    ) -> Result<Self, SearchError> {
        Self::from_configuration(config)?.with_mass_range(mass_to_int(mass - window), mass_to_int(mass + window))
    }

    /// Returns a copy with different mass bounds
    ///
    pub fn with_mass_range(&self, min_mass: i64, max_mass: i64) -> Result<Self, SearchError> {
        Self::new(
            self.min_length,
            self.max_length,
            min_mass,
            max_mass,
            self.cleavage_specificity,
            self.max_missed_cleavages,
            self.mass_basis,
        )
    }

    pub fn get_min_length(&self) -> usize {
        self.min_length
    }

    pub fn get_max_length(&self) -> usize {
        self.max_length
    }

    pub fn get_min_mass(&self) -> i64 {
        self.min_mass
    }

    pub fn get_max_mass(&self) -> i64 {
        self.max_mass
    }

    pub fn get_cleavage_specificity(&self) -> CleavageSpecificity {
        self.cleavage_specificity
    }

    pub fn get_max_missed_cleavages(&self) -> usize {
        self.max_missed_cleavages
    }

    pub fn get_mass_basis(&self) -> MassBasis {
        self.mass_basis
    }

    /// True if the mass is within the bounds (inclusive)
    pub fn contains_mass(&self, mass: i64) -> bool {
        self.min_mass <= mass && mass <= self.max_mass
    }

    /// True if the length is within the bounds (inclusive)
    pub fn contains_length(&self, length: usize) -> bool {
        self.min_length <= length && length <= self.max_length
    }
}
