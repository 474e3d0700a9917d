// std imports
use std::fmt::Display;
use std::str::FromStr;

// 3rd party imports
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

// internal imports
use crate::entities::peptide::PeptideCandidate;
use crate::errors::search_error::SearchError;

/// Number of shuffles tried before a shuffled sequence equal to the target is accepted
pub const MAX_SHUFFLE_ATTEMPTS: usize = 5;

/// How decoy sequences are derived from targets
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecoyMethod {
    #[default]
    Shuffle,
    Reverse,
}

impl FromStr for DecoyMethod {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shuffle" => Ok(Self::Shuffle),
            "reverse" => Ok(Self::Reverse),
            _ => Err(SearchError::ConstraintViolation(format!(
                "unknown decoy method '{}'",
                s
            ))),
        }
    }
}

impl Display for DecoyMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shuffle => write!(f, "shuffle"),
            Self::Reverse => write!(f, "reverse"),
        }
    }
}

/// Creates decoys by permuting the inner residues of targets.
/// Termini stay in place and modifications move with their residues,
/// so length and mass are preserved.
///
pub struct DecoyGenerator {
    method: DecoyMethod,
    rng: StdRng,
}

impl DecoyGenerator {
    /// Creates a new decoy generator
    ///
    /// # Arguments
    /// * `method` - Reverse or shuffle
    /// * `seed` - Seed for shuffling
    ///
    pub fn new(method: DecoyMethod, seed: u64) -> Self {
        Self {
            method,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn get_method(&self) -> DecoyMethod {
        self.method
    }

    /// Returns the decoy of the given candidate
    ///
    /// # Arguments
    /// * `candidate` - Target candidate
    ///
    pub fn to_decoy(&mut self, candidate: &PeptideCandidate) -> PeptideCandidate {
        return self.to_decoy_with_permutation(candidate).0;
    }

    /// Returns the decoy of the given candidate and the applied permutation.
    /// Residue `i` of the decoy is residue `permutation[i]` of the target.
    ///
    /// # Arguments
    /// * `candidate` - Target candidate
    ///
    pub fn to_decoy_with_permutation(
        &mut self,
        candidate: &PeptideCandidate,
    ) -> (PeptideCandidate, Vec<usize>) {
        let target = candidate.get_target_sequence().as_bytes();
        let length = target.len();
        if length <= 2 {
            debug!(
                "{} is too short for permutation, decoy keeps the sequence",
                candidate.get_target_sequence()
            );
            let decoy = candidate.clone().into_decoy(
                candidate.get_target_sequence().to_string(),
                candidate.get_modifications().cloned(),
            );
            return (decoy, (0..length).collect());
        }

        let permutation = match self.method {
            DecoyMethod::Reverse => {
                let reversed = Self::reverse_permutation(length);
                if Self::permute(target, &reversed) == target {
                    self.shuffle_permutation(target)
                } else {
                    reversed
                }
            }
            DecoyMethod::Shuffle => self.shuffle_permutation(target),
        };

        let decoy_sequence = String::from_utf8_lossy(&Self::permute(target, &permutation)).into_owned();
        let modifications = candidate
            .get_modifications()
            .map(|modifications| modifications.permute(&permutation));
        let decoy = candidate.clone().into_decoy(decoy_sequence, modifications);
        return (decoy, permutation);
    }

    /// Permutation reversing everything except the termini
    fn reverse_permutation(length: usize) -> Vec<usize> {
        let mut permutation: Vec<usize> = (0..length).collect();
        permutation[1..length - 1].reverse();
        permutation
    }

    /// Knuth shuffle of the inner positions, repeated while the result equals the target
    fn shuffle_permutation(&mut self, target: &[u8]) -> Vec<usize> {
        let length = target.len();
        let mut permutation: Vec<usize> = (0..length).collect();
        for _ in 0..MAX_SHUFFLE_ATTEMPTS {
            for i in (2..length - 1).rev() {
                let j = self.rng.gen_range(1..=i);
                permutation.swap(i, j);
            }
            if Self::permute(target, &permutation) != target {
                break;
            }
        }
        permutation
    }

    fn permute(sequence: &[u8], permutation: &[usize]) -> Vec<u8> {
        permutation.iter().map(|idx| sequence[*idx]).collect()
    }
}
