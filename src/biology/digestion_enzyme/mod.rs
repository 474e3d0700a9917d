/// Cleavage specificity used during digestion (full, partial, none)
pub mod cleavage_specificity;
/// Trait definition for digestion enzymes
pub mod enzyme;
/// Trypsin
pub mod trypsin;
/// Functions to retrieve enzymes by name
pub mod functions; // publish this last
