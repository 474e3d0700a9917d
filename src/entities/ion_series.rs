// std imports
use std::fmt::Display;

// internal imports
use crate::chemistry::amino_acid::AminoAcid;
use crate::chemistry::mass_basis::MassBasis;
use crate::chemistry::molecule::get_water_mass;
use crate::entities::peptide::ModificationAssignment;
use crate::mass::charge::mass_to_mz;

/// Fragment ion type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IonType {
    /// N-terminal fragment
    B,
    /// C-terminal fragment
    Y,
}

impl Display for IonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::B => write!(f, "b"),
            Self::Y => write!(f, "y"),
        }
    }
}

/// Single fragment ion
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ion {
    pub ion_type: IonType,
    /// Number of residues in the fragment, `b3` contains the first three, `y3` the last three
    pub index: usize,
    pub charge: u8,
    /// Uncharged fragment mass
    pub mass: i64,
    pub mz: i64,
}

impl Ion {
    /// Creates a new ion, the m/z is calculated from mass and charge
    pub fn new(ion_type: IonType, index: usize, charge: u8, mass: i64) -> Self {
        Self {
            ion_type,
            index,
            charge,
            mass,
            mz: mass_to_mz(mass, charge),
        }
    }

    /// Returns a copy of the ion with the mass shifted by `delta`, m/z recalculated
    ///
    pub fn shifted(&self, delta: i64) -> Self {
        Self::new(self.ion_type, self.index, self.charge, self.mass + delta)
    }

    /// True if the fragment contains the residue at the given 0-based offset
    ///
    /// # Arguments
    /// * `offset` - Residue offset
    /// * `peptide_length` - Length of the fragmented peptide
    ///
    pub fn contains_residue(&self, offset: usize, peptide_length: usize) -> bool {
        match self.ion_type {
            IonType::B => self.index > offset,
            IonType::Y => self.index >= peptide_length - offset,
        }
    }
}

/// b- and y-ions of a peptide for one precursor charge. Ions are ordered by type, charge and index.
///
#[derive(Clone, Debug, PartialEq)]
pub struct IonSeries {
    charge: u8,
    ions: Vec<Ion>,
}

impl IonSeries {
    pub fn new(charge: u8, ions: Vec<Ion>) -> Self {
        Self { charge, ions }
    }

    /// Predicts the b- and y-ions of the given sequence with fragment charges
    /// `1..=max(1, charge - 1)`. Returns None if the sequence contains amino acids without mass.
    ///
    /// # Arguments
    /// * `sequence` - Amino acid sequence
    /// * `modifications` - Optional modifications of the sequence
    /// * `charge` - Precursor charge
    /// * `mass_basis` - Mass basis
    ///
    pub fn predict(
        sequence: &str,
        modifications: Option<&ModificationAssignment>,
        charge: u8,
        mass_basis: MassBasis,
    ) -> Option<Self> {
        let mut residue_masses: Vec<i64> = Vec::with_capacity(sequence.len());
        for (offset, one_letter_code) in sequence.chars().enumerate() {
            let amino_acid = AminoAcid::get_by_one_letter_code(one_letter_code)?;
            if !amino_acid.is_known() {
                return None;
            }
            let delta: i64 = modifications
                .map(|modifications| {
                    modifications
                        .get(offset)
                        .iter()
                        .map(|rule| rule.get_mass_delta_int())
                        .sum()
                })
                .unwrap_or(0);
            residue_masses.push(amino_acid.get_mass(mass_basis) + delta);
        }
        let water = get_water_mass(mass_basis);
        let max_fragment_charge = charge.saturating_sub(1).max(1);
        let length = residue_masses.len();

        let mut ions = Vec::with_capacity(2 * length.saturating_sub(1) * max_fragment_charge as usize);
        for fragment_charge in 1..=max_fragment_charge {
            let mut prefix = 0;
            for index in 1..length {
                prefix += residue_masses[index - 1];
                ions.push(Ion::new(IonType::B, index, fragment_charge, prefix));
            }
        }
        for fragment_charge in 1..=max_fragment_charge {
            let mut suffix = 0;
            for index in 1..length {
                suffix += residue_masses[length - index];
                ions.push(Ion::new(IonType::Y, index, fragment_charge, suffix + water));
            }
        }
        Some(Self { charge, ions })
    }

    pub fn get_charge(&self) -> u8 {
        self.charge
    }

    pub fn get_ions(&self) -> &[Ion] {
        &self.ions
    }

    pub fn len(&self) -> usize {
        self.ions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ions.is_empty()
    }
}
