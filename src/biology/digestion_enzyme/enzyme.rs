// std imports
use std::cmp;
use std::collections::BTreeSet;

// 3rd party imports
use fancy_regex::Regex;

// internal imports
use crate::biology::digestion_enzyme::cleavage_specificity::CleavageSpecificity;
use crate::tools::fancy_regex::match_positions;

/// Location of a peptide within a protein, produced by digestion
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DigestedPeptide {
    /// 0-based offset within the protein
    pub start: usize,
    /// Number of residues
    pub length: usize,
    /// Cleavage sites within the peptide
    pub missed_cleavages: usize,
}

/// Trait defining the behavior fo a digestion enzyme
pub trait Enzyme: Send + Sync {
    /// Returns a new instance of the enzyme
    ///
    /// # Arguments
    /// * `max_number_of_missed_cleavages` - Maximum number of missed cleavages
    /// * `min_peptide_length` - Minimum length of a peptide
    /// * `max_peptide_length` - Maximum length of a peptide
    ///
    fn new(
        max_number_of_missed_cleavages: usize,
        min_peptide_length: usize,
        max_peptide_length: usize,
    ) -> Self
    where
        Self: Sized;
    /// Returns the name of the enzyme
    fn get_name(&self) -> &str;
    /// Returns the regex for finding the cleavage sites
    fn get_cleavages_site_regex(&self) -> &Regex;
    /// Returns the maximum number of missed cleavages
    fn get_max_number_of_missed_cleavages(&self) -> usize;
    /// Returns the minimum peptide length
    fn get_min_peptide_length(&self) -> usize;
    /// Returns the maximum peptide length
    fn get_max_peptide_length(&self) -> usize;

    /// Returns the cleavage sites within the given sequence. A site `i` is the boundary between
    /// residue `i - 1` and `i`. Protein termini are not included.
    ///
    /// # Arguments
    /// * `sequence` - Amino acid sequence
    ///
    fn get_cleavage_sites(&self, sequence: &str) -> Vec<usize> {
        return match_positions(self.get_cleavages_site_regex(), sequence)
            .into_iter()
            .filter(|site| *site > 0 && *site < sequence.len())
            .collect();
    }

    /// Counts the cleavage sites inside the given peptide, ignoring sites after residues
    /// which are blocked (e.g. by a modification preventing cleavage).
    ///
    /// # Arguments
    /// * `peptide_sequence` - Peptide sequence
    /// * `blocked_residues` - Per residue flag, true if cleavage after the residue is prevented
    ///
    fn count_missed_cleavages(&self, peptide_sequence: &str, blocked_residues: &[bool]) -> usize {
        return self
            .get_cleavage_sites(peptide_sequence)
            .into_iter()
            .filter(|site| !blocked_residues.get(site - 1).copied().unwrap_or(false))
            .count();
    }

    /// Digests a protein into peptides honoring the enzyme's length and missed cleavage limits.
    /// For `CleavageSpecificity::None` the missed cleavage limit is not applied.
    /// Results are sorted by start and length.
    ///
    /// # Arguments
    /// * `protein_sequence` - Amino acid sequence of the protein
    /// * `specificity` - Cleavage specificity
    ///
    fn digest(
        &self,
        protein_sequence: &str,
        specificity: CleavageSpecificity,
    ) -> Vec<DigestedPeptide> {
        let protein_len = protein_sequence.len();
        let min_length = cmp::max(self.get_min_peptide_length(), 1);
        let max_length = self.get_max_peptide_length();
        let max_missed = self.get_max_number_of_missed_cleavages();
        // Cleavage sites plus protein termini
        let mut boundaries: Vec<usize> = Vec::with_capacity(protein_len / 8 + 2);
        boundaries.push(0);
        boundaries.extend(self.get_cleavage_sites(protein_sequence));
        if protein_len > 0 {
            boundaries.push(protein_len);
        }
        // Number of sites strictly inside [start, end]
        let missed_between = |start: usize, end: usize| -> usize {
            let first = boundaries.partition_point(|b| *b <= start);
            let last = boundaries.partition_point(|b| *b < end);
            last.saturating_sub(first)
        };
        let is_allowed_length = |length: usize| min_length <= length && length <= max_length;

        let mut peptides: BTreeSet<DigestedPeptide> = BTreeSet::new();
        match specificity {
            CleavageSpecificity::Full => {
                for start_idx in 0..boundaries.len() {
                    let last_idx = cmp::min(start_idx + max_missed + 1, boundaries.len() - 1);
                    for end_idx in (start_idx + 1)..=last_idx {
                        let length = boundaries[end_idx] - boundaries[start_idx];
                        if is_allowed_length(length) {
                            peptides.insert(DigestedPeptide {
                                start: boundaries[start_idx],
                                length,
                                missed_cleavages: end_idx - start_idx - 1,
                            });
                        }
                    }
                }
            }
            CleavageSpecificity::Partial => {
                for boundary in boundaries.iter() {
                    for length in min_length..=max_length {
                        // boundary as N-terminus
                        if boundary + length <= protein_len {
                            let missed = missed_between(*boundary, boundary + length);
                            if missed <= max_missed {
                                peptides.insert(DigestedPeptide {
                                    start: *boundary,
                                    length,
                                    missed_cleavages: missed,
                                });
                            }
                        }
                        // boundary as C-terminus
                        if length <= *boundary {
                            let missed = missed_between(boundary - length, *boundary);
                            if missed <= max_missed {
                                peptides.insert(DigestedPeptide {
                                    start: boundary - length,
                                    length,
                                    missed_cleavages: missed,
                                });
                            }
                        }
                    }
                }
            }
            CleavageSpecificity::None => {
                for start in 0..protein_len {
                    for length in min_length..=cmp::min(max_length, protein_len - start) {
                        peptides.insert(DigestedPeptide {
                            start,
                            length,
                            missed_cleavages: missed_between(start, start + length),
                        });
                    }
                }
            }
        }
        return peptides.into_iter().collect();
    }
}
