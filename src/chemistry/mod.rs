/// Amino acid table and sequence mass calculation
pub mod amino_acid;
/// Selection between average and monoisotopic masses
pub mod mass_basis;
/// Additional molecules and particles, e.g. water and proton
pub mod molecule;
