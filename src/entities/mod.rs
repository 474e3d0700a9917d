/// Search parameters, immutable once the search starts
pub mod configuration;
/// Length, mass and cleavage bounds for candidate generation
pub mod constraint;
/// Fragment ion series of a candidate
pub mod ion_series;
/// Scored candidates and their per spectrum/charge collections
pub mod matches;
/// Structs and functions for working with peptide candidates.
pub mod peptide;
/// Structs and functions for working with protein entities.
pub mod protein;
/// Observed spectra, reduced to what the search needs
pub mod spectrum;
