/// Digestion enzymes and cleavage specificity
pub mod digestion_enzyme;
