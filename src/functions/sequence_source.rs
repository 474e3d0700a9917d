// std imports
use std::path::Path;
use std::sync::Arc;

// internal imports
use crate::biology::digestion_enzyme::cleavage_specificity::CleavageSpecificity;
use crate::biology::digestion_enzyme::enzyme::Enzyme;
use crate::chemistry::mass_basis::MassBasis;
use crate::entities::constraint::PeptideConstraint;
use crate::entities::peptide::{PeptideCandidate, PeptideSource};
use crate::entities::protein::Protein;
use crate::errors::search_error::SearchError;
use crate::functions::candidate_generator::digest_and_merge;
use crate::io::fasta::reader::Reader as FastaReader;

/// Prebuilt list of unmodified peptides, sorted by mass
///
pub struct PeptideIndex {
    cleavage_specificity: CleavageSpecificity,
    max_missed_cleavages: usize,
    min_length: usize,
    max_length: usize,
    mass_basis: MassBasis,
    peptides: Vec<PeptideCandidate>,
}

impl PeptideIndex {
    /// Digests the proteins and keeps all peptides sorted by mass.
    /// Peptides occurring in multiple proteins are merged.
    ///
    /// # Arguments
    /// * `proteins` - Proteins to digest
    /// * `enzyme` - Enzyme, provides the length and missed cleavage limits
    /// * `cleavage_specificity` - Cleavage specificity
    /// * `mass_basis` - Mass basis
    ///
    pub fn build(
        proteins: &[Arc<Protein>],
        enzyme: &dyn Enzyme,
        cleavage_specificity: CleavageSpecificity,
        mass_basis: MassBasis,
    ) -> Self {
        let peptides = digest_and_merge(
            proteins,
            enzyme,
            cleavage_specificity,
            mass_basis,
            (i64::MIN, i64::MAX),
        );
        Self {
            cleavage_specificity,
            max_missed_cleavages: enzyme.get_max_number_of_missed_cleavages(),
            min_length: enzyme.get_min_peptide_length(),
            max_length: enzyme.get_max_peptide_length(),
            mass_basis,
            peptides,
        }
    }

    /// True if the index contains every unmodified peptide the constraint can ask for
    ///
    /// # Arguments
    /// * `constraint` - Constraint
    /// * `max_missed_cleavages` - Missed cleavages the scan needs, may exceed the constraint's
    ///
    pub fn is_compatible(&self, constraint: &PeptideConstraint, max_missed_cleavages: usize) -> bool {
        self.cleavage_specificity == constraint.get_cleavage_specificity()
            && self.mass_basis == constraint.get_mass_basis()
            && self.min_length <= constraint.get_min_length()
            && self.max_length >= constraint.get_max_length()
            && (self.cleavage_specificity == CleavageSpecificity::None
                || self.max_missed_cleavages >= max_missed_cleavages)
    }

    /// Returns the peptides with a mass within the given bounds (inclusive)
    ///
    pub fn get_mass_range(&self, min_mass: i64, max_mass: i64) -> &[PeptideCandidate] {
        let first = self.peptides.partition_point(|peptide| peptide.get_mass() < min_mass);
        let last = self.peptides.partition_point(|peptide| peptide.get_mass() <= max_mass);
        &self.peptides[first..last.max(first)]
    }

    pub fn len(&self) -> usize {
        self.peptides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peptides.is_empty()
    }
}

/// Provides protein sequences to the candidate generator
///
pub trait SequenceSource: Send + Sync {
    /// Returns all proteins
    ///
    fn get_proteins(&self) -> Result<&[Arc<Protein>], SearchError>;

    /// Returns a prebuilt peptide index if available
    ///
    fn get_peptide_index(&self) -> Option<&PeptideIndex> {
        None
    }

    /// Returns the sequence of a peptide at the given source
    ///
    /// # Arguments
    /// * `source` - Peptide source
    /// * `length` - Peptide length
    ///
    fn sequence_at<'a>(&self, source: &'a PeptideSource, length: usize) -> &'a str {
        source.sequence_at(length)
    }
}

/// Sequence source keeping all proteins in memory
///
pub struct InMemorySequenceSource {
    proteins: Vec<Arc<Protein>>,
    peptide_index: Option<PeptideIndex>,
}

impl InMemorySequenceSource {
    pub fn new(proteins: Vec<Protein>) -> Self {
        Self {
            proteins: proteins.into_iter().map(Arc::new).collect(),
            peptide_index: None,
        }
    }

    /// Reads the proteins from a FASTA file
    ///
    /// # Arguments
    /// * `fasta_file_path` - Path to FASTA file
    ///
    pub fn from_fasta(fasta_file_path: &Path) -> Result<Self, SearchError> {
        Ok(Self::new(FastaReader::read_all(fasta_file_path)?))
    }

    /// Builds a peptide index, used by compatible constraints
    ///
    pub fn with_peptide_index(
        mut self,
        enzyme: &dyn Enzyme,
        cleavage_specificity: CleavageSpecificity,
        mass_basis: MassBasis,
    ) -> Self {
        self.peptide_index = Some(PeptideIndex::build(
            &self.proteins,
            enzyme,
            cleavage_specificity,
            mass_basis,
        ));
        self
    }
}

impl SequenceSource for InMemorySequenceSource {
    fn get_proteins(&self) -> Result<&[Arc<Protein>], SearchError> {
        if self.proteins.is_empty() {
            return Err(SearchError::SequenceSourceUnavailable(
                "no proteins loaded".to_string(),
            ));
        }
        Ok(&self.proteins)
    }

    fn get_peptide_index(&self) -> Option<&PeptideIndex> {
        self.peptide_index.as_ref()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::biology::digestion_enzyme::functions::get_enzyme_by_name;

    #[test]
    fn test_peptide_index() {
        let enzyme = get_enzyme_by_name("trypsin", 1, 2, 30).unwrap();
        let source = InMemorySequenceSource::from_fasta(Path::new("test_files/test.fasta"))
            .unwrap()
            .with_peptide_index(enzyme.as_ref(), CleavageSpecificity::Full, MassBasis::Monoisotopic);
        let index = source.get_peptide_index().unwrap();
        assert!(!index.is_empty());
        let masses: Vec<i64> = index
            .get_mass_range(i64::MIN, i64::MAX)
            .iter()
            .map(|peptide| peptide.get_mass())
            .collect();
        assert!(masses.windows(2).all(|pair| pair[0] <= pair[1]));

        let constraint = PeptideConstraint::new(
            6,
            10,
            0,
            i64::MAX,
            CleavageSpecificity::Full,
            1,
            MassBasis::Monoisotopic,
        )
        .unwrap();
        assert!(index.is_compatible(&constraint, 1));
        assert!(!index.is_compatible(&constraint, 2));

        // PEPTIDER occurs only once, in the third protein
        let peptider = index
            .get_mass_range(i64::MIN, i64::MAX)
            .iter()
            .find(|peptide| peptide.get_sequence() == "PEPTIDER")
            .unwrap();
        assert_eq!(peptider.get_protein_accessions(), vec!["Q11111"]);
    }

    #[test]
    fn test_empty_source() {
        let source = InMemorySequenceSource::new(vec![]);
        assert!(matches!(
            source.get_proteins(),
            Err(SearchError::SequenceSourceUnavailable(_))
        ));
    }
}
