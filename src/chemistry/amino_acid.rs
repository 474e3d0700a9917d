// internal imports
use crate::chemistry::mass_basis::MassBasis;
use crate::chemistry::molecule::get_water_mass;

/// Amino acid with masses in internal representation
///
#[derive(Debug, PartialEq, Eq)]
pub struct AminoAcid {
    name: &'static str,
    one_letter_code: char,
    three_letter_code: &'static str,
    mono_mass: i64,
    average_mass: i64,
}

impl AminoAcid {
    /// Returns the amino acid for the given one letter code, None if the code is not known.
    ///
    /// # Arguments
    /// * `one_letter_code` - One letter code of the amino acid
    ///
    pub fn get_by_one_letter_code(one_letter_code: char) -> Option<&'static Self> {
        if !one_letter_code.is_ascii_uppercase() {
            return None;
        }
        return Some(ALPHABETICAL[(one_letter_code as u8 - b'A') as usize]);
    }

    /// Returns all 26 amino acids in alphabetical order of the one letter code
    ///
    pub fn get_all() -> &'static [&'static AminoAcid; 26] {
        return &ALPHABETICAL;
    }

    pub fn get_name(&self) -> &'static str {
        return self.name;
    }

    pub fn get_one_letter_code(&self) -> char {
        return self.one_letter_code;
    }

    pub fn get_three_letter_code(&self) -> &'static str {
        return self.three_letter_code;
    }

    pub fn get_mono_mass(&self) -> i64 {
        return self.mono_mass;
    }

    pub fn get_average_mass(&self) -> i64 {
        return self.average_mass;
    }

    /// Returns the residue mass under the given mass basis
    ///
    /// # Arguments
    /// * `mass_basis` - Average or monoisotopic
    ///
    pub fn get_mass(&self, mass_basis: MassBasis) -> i64 {
        return match mass_basis {
            MassBasis::Average => self.average_mass,
            MassBasis::Monoisotopic => self.mono_mass,
        };
    }

    /// True if the amino acid has a defined mass, false for `X`
    ///
    pub fn is_known(&self) -> bool {
        return self.mono_mass > 0;
    }
}

macro_rules! amino_acid {
    ($name:expr, $code:expr, $three:expr, $mono:expr, $avg:expr) => {
        AminoAcid {
            name: $name,
            one_letter_code: $code,
            three_letter_code: $three,
            mono_mass: mass_to_int!($mono),
            average_mass: mass_to_int!($avg),
        }
    };
}

// Masses: https://proteomicsresource.washington.edu/protocols06/masses.php
pub const ALANINE: AminoAcid = amino_acid!("Alanine", 'A', "Ala", 71.037113805_f64, 71.0788_f64);
pub const ASPARAGINE_OR_ASPARTIC_ACID: AminoAcid = amino_acid!("Asparagine or aspartic acid", 'B', "Asx", 114.5349352675_f64, 114.59502_f64);
pub const CYSTEINE: AminoAcid = amino_acid!("Cysteine", 'C', "Cys", 103.009184505_f64, 103.1388_f64);
pub const ASPARTIC_ACID: AminoAcid = amino_acid!("Aspartic acid", 'D', "Asp", 115.026943065_f64, 115.0886_f64);
pub const GLUTAMIC_ACID: AminoAcid = amino_acid!("Glutamic acid", 'E', "Glu", 129.042593135_f64, 129.1155_f64);
pub const PHENYLALANINE: AminoAcid = amino_acid!("Phenylalanine", 'F', "Phe", 147.068413945_f64, 147.1766_f64);
pub const GLYCINE: AminoAcid = amino_acid!("Glycine", 'G', "Gly", 57.021463735_f64, 57.0519_f64);
pub const HISTIDINE: AminoAcid = amino_acid!("Histidine", 'H', "His", 137.058911875_f64, 137.1411_f64);
pub const ISOLEUCINE: AminoAcid = amino_acid!("Isoleucine", 'I', "Ile", 113.084064015_f64, 113.1594_f64);
pub const ISOLEUCINE_OR_LEUCINE: AminoAcid = amino_acid!("Isoleucine or leucine", 'J', "Xle", 113.084064015_f64, 113.1594_f64);
pub const LYSINE: AminoAcid = amino_acid!("Lysine", 'K', "Lys", 128.094963050_f64, 128.1741_f64);
pub const LEUCINE: AminoAcid = amino_acid!("Leucine", 'L', "Leu", 113.084064015_f64, 113.1594_f64);
pub const METHIONINE: AminoAcid = amino_acid!("Methionine", 'M', "Met", 131.040484645_f64, 131.1926_f64);
pub const ASPARAGINE: AminoAcid = amino_acid!("Asparagine", 'N', "Asn", 114.042927470_f64, 114.1038_f64);
pub const PYRROLYSINE: AminoAcid = amino_acid!("Pyrrolysine", 'O', "Pyl", 237.147726925_f64, 237.29816_f64);
pub const PROLINE: AminoAcid = amino_acid!("Proline", 'P', "Pro", 97.052763875_f64, 97.1167_f64);
pub const GLUTAMINE: AminoAcid = amino_acid!("Glutamine", 'Q', "Gln", 128.05857754_f64, 128.1307_f64);
pub const ARGININE: AminoAcid = amino_acid!("Arginine", 'R', "Arg", 156.101111050_f64, 156.1875_f64);
pub const SERINE: AminoAcid = amino_acid!("Serine", 'S', "Ser", 87.032028435_f64, 87.0782_f64);
pub const THREONINE: AminoAcid = amino_acid!("Threonine", 'T', "Thr", 101.047678505_f64, 101.1051_f64);
pub const SELENOCYSTEINE: AminoAcid = amino_acid!("Selenocysteine", 'U', "Sec", 150.953633405_f64, 150.0379_f64);
pub const VALINE: AminoAcid = amino_acid!("Valine", 'V', "Val", 99.068413945_f64, 99.1326_f64);
pub const TRYPTOPHAN: AminoAcid = amino_acid!("Tryptophan", 'W', "Trp", 186.079312980_f64, 186.2132_f64);
// Placeholder for unknown residues, no mass
pub const UNKNOWN: AminoAcid = amino_acid!("Unknown amino acid", 'X', "Xaa", 0.0_f64, 0.0_f64);
pub const TYROSINE: AminoAcid = amino_acid!("Tyrosine", 'Y', "Tyr", 163.063328575_f64, 163.1760_f64);
pub const GLUTAMINE_OR_GLUTAMIC_ACID: AminoAcid = amino_acid!("Glutamine or glutamic acid", 'Z', "Glx", 128.5505853375_f64, 128.6216_f64);

const ALPHABETICAL: [&AminoAcid; 26] = [
    &ALANINE,
    &ASPARAGINE_OR_ASPARTIC_ACID,
    &CYSTEINE,
    &ASPARTIC_ACID,
    &GLUTAMIC_ACID,
    &PHENYLALANINE,
    &GLYCINE,
    &HISTIDINE,
    &ISOLEUCINE,
    &ISOLEUCINE_OR_LEUCINE,
    &LYSINE,
    &LEUCINE,
    &METHIONINE,
    &ASPARAGINE,
    &PYRROLYSINE,
    &PROLINE,
    &GLUTAMINE,
    &ARGININE,
    &SERINE,
    &THREONINE,
    &SELENOCYSTEINE,
    &VALINE,
    &TRYPTOPHAN,
    &UNKNOWN,
    &TYROSINE,
    &GLUTAMINE_OR_GLUTAMIC_ACID,
];

/// Calculates the sum of the residue masses of the given sequence.
/// Returns None if the sequence contains a letter without a mass (unknown or invalid).
///
/// # Arguments
/// * `sequence` - Amino acid sequence
/// * `mass_basis` - Average or monoisotopic
///
pub fn calc_residue_mass(sequence: &str, mass_basis: MassBasis) -> Option<i64> {
    let mut mass: i64 = 0;
    for one_letter_code in sequence.chars() {
        let amino_acid = AminoAcid::get_by_one_letter_code(one_letter_code)?;
        if !amino_acid.is_known() {
            return None;
        }
        mass += amino_acid.get_mass(mass_basis);
    }
    return Some(mass);
}

/// Calculates the peptide mass of the given unmodified sequence (residues + water).
/// Returns None if the sequence contains a letter without a mass.
///
/// # Arguments
/// * `sequence` - Amino acid sequence
/// * `mass_basis` - Average or monoisotopic
///
pub fn calc_sequence_mass(sequence: &str, mass_basis: MassBasis) -> Option<i64> {
    return Some(calc_residue_mass(sequence, mass_basis)? + get_water_mass(mass_basis));
}
