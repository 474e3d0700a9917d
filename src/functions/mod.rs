/// Candidate streams under mass, length and cleavage constraints
pub mod candidate_generator;
/// Reversed and shuffled decoy peptides
pub mod decoy;
/// Bounded top-K filter for preliminary scores
pub mod filter;
/// Read-through cache for fragment ion series
pub mod ion_series_cache;
/// Modification rules and their validated collection
pub mod modification;
/// Enumeration and placement of modification profiles
pub mod modification_combinator;
/// Scoring oracles and ion series scorers
pub mod scoring;
/// Two stage score/filter/rescore protocol per spectrum and charge
pub mod search;
/// Access to protein sequences
pub mod sequence_source;
/// Weibull fit of null scores and p-values
pub mod weibull;
/// Cross-linked peptide pairs
pub mod xlink;
