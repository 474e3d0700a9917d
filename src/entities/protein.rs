/// Protein sequence with its accession, as provided by a sequence source
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Protein {
    accession: String,
    description: String,
    sequence: String,
}

impl Protein {
    /// Creates a new protein. The sequence is upper cased.
    ///
    /// # Arguments
    /// * `accession` - The primary accession
    /// * `description` - Free text description, e.g. the rest of the FASTA header
    /// * `sequence` - The amino acid sequence
    ///
    pub fn new(accession: String, description: String, sequence: String) -> Self {
        Self {
            accession,
            description,
            sequence: sequence.to_uppercase(),
        }
    }

    /// Returns the primary accession
    ///
    pub fn get_accession(&self) -> &str {
        &self.accession
    }

    /// Returns the description
    ///
    pub fn get_description(&self) -> &str {
        &self.description
    }

    /// Returns the amino acid sequence
    ///
    pub fn get_sequence(&self) -> &str {
        &self.sequence
    }
}
