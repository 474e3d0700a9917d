/// Residue pairs a linker can bond
pub mod bond_map;
/// Peptides with link sites and their mass sorted pools
pub mod linkable_peptide;
pub mod pair;
/// Window search over the pool for pairs matching a precursor
pub mod pair_matcher;
/// Precursor mass windows in Dalton, Thomson or ppm
pub mod precursor_window;
/// Target and decoy search of cross-linked pairs
pub mod search;
