// std imports
use std::fmt::Display;
use std::sync::Arc;

// internal imports
use crate::chemistry::amino_acid::calc_sequence_mass;
use crate::chemistry::mass_basis::MassBasis;
use crate::entities::protein::Protein;
use crate::functions::modification::ModificationRule;

/// Occurrence of a peptide within a protein
///
#[derive(Clone, Debug)]
pub struct PeptideSource {
    protein: Arc<Protein>,
    /// 1-based start within the protein
    start: usize,
}

impl PeptideSource {
    /// Creates a new source
    ///
    /// # Arguments
    /// * `protein` - Containing protein
    /// * `start` - 1-based start of the peptide within the protein
    ///
    pub fn new(protein: Arc<Protein>, start: usize) -> Self {
        Self { protein, start }
    }

    pub fn get_protein(&self) -> &Arc<Protein> {
        &self.protein
    }

    /// Returns the 1-based start
    pub fn get_start(&self) -> usize {
        self.start
    }

    /// Returns the peptide sequence of the given length at this source
    ///
    /// # Arguments
    /// * `length` - Peptide length
    ///
    pub fn sequence_at(&self, length: usize) -> &str {
        let offset = self.start - 1;
        &self.protein.get_sequence()[offset..offset + length]
    }

    /// True if the peptide starts at the protein N-terminus
    pub fn is_protein_n_terminal(&self) -> bool {
        self.start == 1
    }

    /// True if a peptide of the given length ends at the protein C-terminus
    pub fn is_protein_c_terminal(&self, length: usize) -> bool {
        self.start - 1 + length == self.protein.get_sequence().len()
    }

    /// Returns the residue before the peptide, `-` at the protein N-terminus
    pub fn get_previous_amino_acid(&self) -> char {
        if self.start == 1 {
            return '-';
        }
        self.protein.get_sequence().as_bytes()[self.start - 2] as char
    }

    /// Returns the residue after a peptide of the given length, `-` at the protein C-terminus
    pub fn get_next_amino_acid(&self, length: usize) -> char {
        self.protein
            .get_sequence()
            .as_bytes()
            .get(self.start - 1 + length)
            .map(|aa| *aa as char)
            .unwrap_or('-')
    }
}

/// Modifications placed on the residues of a peptide. Each residue carries
/// at most one residue modification, terminal modifications stack on top.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModificationAssignment {
    residues: Vec<Vec<Arc<ModificationRule>>>,
}

impl ModificationAssignment {
    /// Creates an assignment without modifications for a peptide of the given length
    ///
    pub fn new(length: usize) -> Self {
        Self {
            residues: vec![Vec::new(); length],
        }
    }

    /// Places the modification on the residue at the given offset
    ///
    pub fn add(&mut self, offset: usize, rule: Arc<ModificationRule>) {
        self.residues[offset].push(rule);
    }

    /// Returns the modifications at the given offset
    pub fn get(&self, offset: usize) -> &[Arc<ModificationRule>] {
        self.residues
            .get(offset)
            .map(|rules| rules.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.iter().all(|rules| rules.is_empty())
    }

    /// Sum of all mass deltas
    pub fn get_mass_delta(&self) -> i64 {
        self.residues
            .iter()
            .flatten()
            .map(|rule| rule.get_mass_delta_int())
            .sum()
    }

    /// Number of placed variable modifications
    pub fn count_variable(&self) -> usize {
        self.residues
            .iter()
            .flatten()
            .filter(|rule| rule.is_variable())
            .count()
    }

    /// Per residue flag, true if one of its modifications prevents cleavage
    pub fn get_cleavage_blocked_residues(&self) -> Vec<bool> {
        self.residues
            .iter()
            .map(|rules| rules.iter().any(|rule| rule.get_prevents_cleavage()))
            .collect()
    }

    /// True if a modification at the given offset prevents cross-linking
    pub fn prevents_cross_link_at(&self, offset: usize) -> bool {
        self.get(offset)
            .iter()
            .any(|rule| rule.get_prevents_cross_link())
    }

    /// Returns a new assignment where residue `i` carries the modifications of residue
    /// `permutation[i]` of this assignment.
    ///
    /// # Arguments
    /// * `permutation` - Source offset for each offset
    ///
    pub fn permute(&self, permutation: &[usize]) -> Self {
        Self {
            residues: permutation
                .iter()
                .map(|source_offset| self.residues[*source_offset].clone())
                .collect(),
        }
    }

    /// Annotates the sequence with the mass deltas in ProForma style, e.g. `PEPM[+15.994915]K`
    ///
    /// # Arguments
    /// * `sequence` - Sequence the assignment belongs to
    ///
    pub fn annotate(&self, sequence: &str) -> String {
        let mut annotated = String::with_capacity(sequence.len() * 2);
        for (offset, amino_acid) in sequence.chars().enumerate() {
            annotated.push(amino_acid);
            for rule in self.get(offset) {
                annotated.push_str(&format!("[{:+}]", rule.get_mass_delta()));
            }
        }
        annotated
    }
}

/// Peptide candidate for a spectrum. The target sequence is taken from the first source,
/// a decoy carries its own sequence.
///
#[derive(Clone, Debug)]
pub struct PeptideCandidate {
    length: usize,
    unmodified_mass: i64,
    mass: i64,
    mass_basis: MassBasis,
    missed_cleavages: usize,
    sources: Vec<PeptideSource>,
    modifications: Option<ModificationAssignment>,
    decoy_sequence: Option<String>,
}

impl PeptideCandidate {
    /// Creates a new unmodified candidate.
    /// Returns None if the sequence at the source contains amino acids without mass.
    ///
    /// # Arguments
    /// * `source` - First source of the candidate
    /// * `length` - Peptide length
    /// * `missed_cleavages` - Number of missed cleavages
    /// * `mass_basis` - Mass basis for the mass calculation
    ///
    pub fn new(
        source: PeptideSource,
        length: usize,
        missed_cleavages: usize,
        mass_basis: MassBasis,
    ) -> Option<Self> {
        let mass = calc_sequence_mass(source.sequence_at(length), mass_basis)?;
        Some(Self {
            length,
            unmodified_mass: mass,
            mass,
            mass_basis,
            missed_cleavages,
            sources: vec![source],
            modifications: None,
            decoy_sequence: None,
        })
    }

    /// Returns the sequence, the decoy sequence for decoys
    pub fn get_sequence(&self) -> &str {
        match &self.decoy_sequence {
            Some(decoy_sequence) => decoy_sequence.as_str(),
            None => self.get_target_sequence(),
        }
    }

    /// Returns the sequence of the target, even for decoys
    pub fn get_target_sequence(&self) -> &str {
        self.sources[0].sequence_at(self.length)
    }

    pub fn get_length(&self) -> usize {
        self.length
    }

    /// Returns the mass including modifications
    pub fn get_mass(&self) -> i64 {
        self.mass
    }

    pub fn get_mass_basis(&self) -> MassBasis {
        self.mass_basis
    }

    pub fn get_missed_cleavages(&self) -> usize {
        self.missed_cleavages
    }

    pub fn set_missed_cleavages(&mut self, missed_cleavages: usize) {
        self.missed_cleavages = missed_cleavages;
    }

    pub fn get_sources(&self) -> &[PeptideSource] {
        &self.sources
    }

    pub fn get_modifications(&self) -> Option<&ModificationAssignment> {
        self.modifications.as_ref()
    }

    /// Attaches modifications and recalculates the mass
    ///
    /// # Arguments
    /// * `modifications` - Modification assignment, length has to match the peptide
    ///
    pub fn set_modifications(&mut self, modifications: ModificationAssignment) {
        self.mass = self.unmodified_mass + modifications.get_mass_delta();
        self.modifications = if modifications.is_empty() {
            None
        } else {
            Some(modifications)
        };
    }

    pub fn is_decoy(&self) -> bool {
        self.decoy_sequence.is_some()
    }

    /// Turns the candidate into a decoy with the given permuted sequence and modifications.
    /// The mass is kept as the decoy is a permutation of the target.
    ///
    pub fn into_decoy(
        mut self,
        decoy_sequence: String,
        modifications: Option<ModificationAssignment>,
    ) -> Self {
        self.decoy_sequence = Some(decoy_sequence);
        self.modifications = modifications;
        self
    }

    /// Overrides the mass, used to build pools with synthetic masses
    #[cfg(test)]
    pub(crate) fn with_mass(mut self, mass: i64) -> Self {
        self.mass = mass;
        self
    }

    /// Appends the sources of the other candidate, which is consumed
    ///
    pub fn merge(&mut self, other: PeptideCandidate) {
        self.sources.extend(other.sources);
    }

    /// True if both candidates were derived from the same protein location
    ///
    pub fn has_same_origin(&self, other: &PeptideCandidate) -> bool {
        let own = &self.sources[0];
        let others = &other.sources[0];
        self.length == other.length
            && own.start == others.start
            && Arc::ptr_eq(&own.protein, &others.protein)
    }

    /// Returns the sequence with modifications in ProForma style
    pub fn get_modified_sequence(&self) -> String {
        match &self.modifications {
            Some(modifications) => modifications.annotate(self.get_sequence()),
            None => self.get_sequence().to_string(),
        }
    }

    /// Returns the accessions of all containing proteins
    pub fn get_protein_accessions(&self) -> Vec<&str> {
        self.sources
            .iter()
            .map(|source| source.protein.get_accession())
            .collect()
    }
}

impl Display for PeptideCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = &self.sources[0];
        write!(
            f,
            "{}.{}.{}",
            source.get_previous_amino_acid(),
            self.get_modified_sequence(),
            source.get_next_amino_acid(self.length)
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::functions::modification::{ModificationPosition, ModificationType};
    use crate::mass::convert::to_int as mass_to_int;

    fn protein(accession: &str, sequence: &str) -> Arc<Protein> {
        Arc::new(Protein::new(
            accession.to_string(),
            String::new(),
            sequence.to_string(),
        ))
    }

    #[test]
    fn test_lazy_sequence_and_merge() {
        let first = protein("P1", "MKPEPTIDER");
        let second = protein("P2", "GGPEPTIDER");
        let mut candidate =
            PeptideCandidate::new(PeptideSource::new(first.clone(), 3), 8, 0, MassBasis::Monoisotopic)
                .unwrap();
        assert_eq!(candidate.get_sequence(), "PEPTIDER");
        assert_eq!(candidate.to_string(), "K.PEPTIDER.-");

        let donor =
            PeptideCandidate::new(PeptideSource::new(second, 3), 8, 0, MassBasis::Monoisotopic)
                .unwrap();
        candidate.merge(donor);
        assert_eq!(candidate.get_sources().len(), 2);
        assert_eq!(candidate.get_protein_accessions(), vec!["P1", "P2"]);
        assert!(candidate.get_sources()[1].is_protein_c_terminal(8));
        assert!(!candidate.get_sources()[0].is_protein_n_terminal());
    }

    #[test]
    fn test_mass_recalculation() {
        let source = PeptideSource::new(protein("P1", "PEPTMDE"), 1);
        let mut candidate = PeptideCandidate::new(source, 7, 0, MassBasis::Monoisotopic).unwrap();
        let unmodified_mass = candidate.get_mass();
        let oxidation = Arc::new(ModificationRule::new(
            "Oxidation",
            "M",
            15.994915,
            ModificationType::Variable,
            ModificationPosition::Anywhere,
        ));
        let mut modifications = ModificationAssignment::new(7);
        modifications.add(4, oxidation.clone());
        candidate.set_modifications(modifications);
        assert_eq!(candidate.get_mass(), unmodified_mass + mass_to_int(15.994915));
        assert_eq!(candidate.get_modified_sequence(), "PEPTM[+15.994915]DE");

        // removing the modifications restores the mass
        candidate.set_modifications(ModificationAssignment::new(7));
        assert_eq!(candidate.get_mass(), unmodified_mass);
        assert!(candidate.get_modifications().is_none());
    }

    #[test]
    fn test_unknown_residue() {
        let source = PeptideSource::new(protein("P1", "PEPXIDE"), 1);
        assert!(PeptideCandidate::new(source, 7, 0, MassBasis::Monoisotopic).is_none());
    }

    #[test]
    fn test_permute_modifications() {
        let rule = Arc::new(ModificationRule::new(
            "Phospho",
            "S",
            79.966331,
            ModificationType::Variable,
            ModificationPosition::Anywhere,
        ));
        let mut modifications = ModificationAssignment::new(4);
        modifications.add(1, rule.clone());
        let permuted = modifications.permute(&[0, 2, 1, 3]);
        assert!(permuted.get(1).is_empty());
        assert_eq!(permuted.get(2).len(), 1);
        assert_eq!(permuted.get_mass_delta(), modifications.get_mass_delta());
    }
}
