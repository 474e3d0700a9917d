// std imports
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::str::FromStr;

// internal imports
use crate::chemistry::amino_acid::AminoAcid;
use crate::entities::peptide::PeptideCandidate;
use crate::errors::search_error::SearchError;

/// Symmetric map of residues which can be joined by the linker
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct XLinkBondMap {
    bonds: HashMap<char, HashSet<char>>,
}

impl XLinkBondMap {
    /// Adds a bond in both directions
    ///
    pub fn add_bond(&mut self, residue_a: char, residue_b: char) {
        self.bonds.entry(residue_a).or_default().insert(residue_b);
        self.bonds.entry(residue_b).or_default().insert(residue_a);
    }

    /// True if the residue takes part in any bond
    ///
    pub fn is_linkable(&self, residue: char) -> bool {
        self.bonds.contains_key(&residue)
    }

    /// True if the two residues can be joined
    ///
    pub fn can_bond(&self, residue_a: char, residue_b: char) -> bool {
        self.bonds
            .get(&residue_a)
            .map(|partners| partners.contains(&residue_b))
            .unwrap_or(false)
    }

    /// True if the candidates can be linked at the given 0-based offsets.
    /// Sites carrying a modification which prevents cross-linking are rejected.
    ///
    /// # Arguments
    /// * `peptide_a` - First peptide
    /// * `site_a` - Offset in the first peptide
    /// * `peptide_b` - Second peptide
    /// * `site_b` - Offset in the second peptide
    ///
    pub fn can_link(
        &self,
        peptide_a: &PeptideCandidate,
        site_a: usize,
        peptide_b: &PeptideCandidate,
        site_b: usize,
    ) -> bool {
        let residue_a = match peptide_a.get_sequence().as_bytes().get(site_a) {
            Some(residue) => *residue as char,
            None => return false,
        };
        let residue_b = match peptide_b.get_sequence().as_bytes().get(site_b) {
            Some(residue) => *residue as char,
            None => return false,
        };
        let blocked = |peptide: &PeptideCandidate, site: usize| {
            peptide
                .get_modifications()
                .map(|modifications| modifications.prevents_cross_link_at(site))
                .unwrap_or(false)
        };
        !blocked(peptide_a, site_a)
            && !blocked(peptide_b, site_b)
            && self.can_bond(residue_a, residue_b)
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }
}

impl FromStr for XLinkBondMap {
    type Err = SearchError;

    /// Parses a comma separated list of residue pairs, e.g. `K:K,K:S`
    ///
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bond_map = Self::default();
        for bond in s.split(',').map(|bond| bond.trim()).filter(|bond| !bond.is_empty()) {
            let residues: Vec<char> = bond
                .split(':')
                .map(|residue| residue.trim().to_ascii_uppercase())
                .filter_map(|residue| {
                    let mut chars = residue.chars();
                    match (chars.next(), chars.next()) {
                        (Some(residue), None) => Some(residue),
                        _ => None,
                    }
                })
                .collect();
            if residues.len() != 2 || bond.matches(':').count() != 1 {
                return Err(SearchError::ConstraintViolation(format!(
                    "malformed link site rule '{}'",
                    bond
                )));
            }
            for residue in residues.iter() {
                if AminoAcid::get_by_one_letter_code(*residue).is_none() {
                    return Err(SearchError::ConstraintViolation(format!(
                        "unknown residue '{}' in link site rule '{}'",
                        residue, bond
                    )));
                }
            }
            bond_map.add_bond(residues[0], residues[1]);
        }
        if bond_map.is_empty() {
            return Err(SearchError::ConstraintViolation(
                "no link sites given".to_string(),
            ));
        }
        Ok(bond_map)
    }
}

impl Display for XLinkBondMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut bonds: Vec<(char, char)> = self
            .bonds
            .iter()
            .flat_map(|(residue, partners)| partners.iter().map(move |partner| (*residue, *partner)))
            .filter(|(residue, partner)| residue <= partner)
            .collect();
        bonds.sort();
        let bonds: Vec<String> = bonds
            .into_iter()
            .map(|(residue, partner)| format!("{}:{}", residue, partner))
            .collect();
        write!(f, "{}", bonds.join(","))
    }
}

#[cfg(test)]
mod test {
    // std imports
    use std::sync::Arc;

    // internal imports
    use super::*;
    use crate::chemistry::mass_basis::MassBasis;
    use crate::entities::peptide::{ModificationAssignment, PeptideSource};
    use crate::entities::protein::Protein;
    use crate::functions::modification::{
        ModificationPosition, ModificationRule, ModificationType,
    };

    fn candidate(sequence: &str) -> PeptideCandidate {
        let protein = Arc::new(Protein::new(
            "P1".to_string(),
            String::new(),
            sequence.to_string(),
        ));
        PeptideCandidate::new(
            PeptideSource::new(protein, 1),
            sequence.len(),
            0,
            MassBasis::Monoisotopic,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_symmetric() {
        let bond_map = XLinkBondMap::from_str("K:K, k:S").unwrap();
        assert!(bond_map.can_bond('K', 'K'));
        assert!(bond_map.can_bond('K', 'S'));
        assert!(bond_map.can_bond('S', 'K'));
        assert!(!bond_map.can_bond('S', 'S'));
        assert!(bond_map.is_linkable('S'));
        assert!(!bond_map.is_linkable('R'));
        assert_eq!(bond_map.to_string(), "K:K,K:S");
    }

    #[test]
    fn test_parse_errors() {
        assert!(XLinkBondMap::from_str("").is_err());
        assert!(XLinkBondMap::from_str("KK").is_err());
        assert!(XLinkBondMap::from_str("K:K:K").is_err());
        assert!(XLinkBondMap::from_str("K:1").is_err());
    }

    #[test]
    fn test_can_link() {
        let bond_map = XLinkBondMap::from_str("K:K").unwrap();
        let peptide_a = candidate("PEPKTIDER");
        let mut peptide_b = candidate("AKDEFKR");
        assert!(bond_map.can_link(&peptide_a, 3, &peptide_b, 1));
        assert!(!bond_map.can_link(&peptide_a, 2, &peptide_b, 1));
        assert!(!bond_map.can_link(&peptide_a, 3, &peptide_b, 100));

        let dimethyl = Arc::new(
            ModificationRule::new(
                "Dimethyl",
                "K",
                28.0313,
                ModificationType::Variable,
                ModificationPosition::Anywhere,
            )
            .with_prevents_cross_link(true),
        );
        let mut modifications = ModificationAssignment::new(7);
        modifications.add(1, dimethyl);
        peptide_b.set_modifications(modifications);
        assert!(!bond_map.can_link(&peptide_a, 3, &peptide_b, 1));
        assert!(bond_map.can_link(&peptide_a, 3, &peptide_b, 5));
    }
}
