/// Conversion between Dalton and the internal integer representation. All masses are handled as
/// integers internally, so sums over residues and modifications are exact and comparable.
#[macro_use]
pub mod convert;
/// Conversion between neutral masses and m/z values, mass errors
pub mod charge;
