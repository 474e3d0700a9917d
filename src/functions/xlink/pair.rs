// std imports
use std::fmt::Display;
use std::sync::Arc;

// internal imports
use crate::entities::ion_series::IonSeries;
use crate::functions::xlink::linkable_peptide::LinkablePeptide;

/// Two peptides joined by a linker at one site each
///
#[derive(Clone, Debug)]
pub struct XLinkPair {
    peptide_a: Arc<LinkablePeptide>,
    peptide_b: Arc<LinkablePeptide>,
    /// Offset of the link site in peptide A
    link_a: usize,
    /// Offset of the link site in peptide B
    link_b: usize,
    linker_mass: i64,
}

impl XLinkPair {
    /// Creates a new pair
    ///
    /// # Arguments
    /// * `peptide_a` - First peptide
    /// * `peptide_b` - Second peptide
    /// * `link_a` - 0-based residue offset of the link in the first peptide
    /// * `link_b` - 0-based residue offset of the link in the second peptide
    /// * `linker_mass` - Mass of the linker
    ///
    pub fn new(
        peptide_a: Arc<LinkablePeptide>,
        peptide_b: Arc<LinkablePeptide>,
        link_a: usize,
        link_b: usize,
        linker_mass: i64,
    ) -> Self {
        Self {
            peptide_a,
            peptide_b,
            link_a,
            link_b,
            linker_mass,
        }
    }

    pub fn get_peptide_a(&self) -> &Arc<LinkablePeptide> {
        &self.peptide_a
    }

    pub fn get_peptide_b(&self) -> &Arc<LinkablePeptide> {
        &self.peptide_b
    }

    pub fn get_link_a(&self) -> usize {
        self.link_a
    }

    pub fn get_link_b(&self) -> usize {
        self.link_b
    }

    pub fn get_linker_mass(&self) -> i64 {
        self.linker_mass
    }

    /// Mass of both peptides plus the linker
    pub fn get_mass(&self) -> i64 {
        self.peptide_a.get_mass() + self.peptide_b.get_mass() + self.linker_mass
    }

    pub fn is_decoy(&self) -> bool {
        self.peptide_a.is_decoy() || self.peptide_b.is_decoy()
    }

    /// Returns the decoy pair made of the given decoys of both peptides.
    /// The link sites move with their residues, see [`LinkablePeptide::to_decoy`].
    /// Returns None if the decoys do not carry the link sites of this pair.
    ///
    /// # Arguments
    /// * `decoy_a` - Decoy of peptide A
    /// * `decoy_b` - Decoy of peptide B
    ///
    pub fn to_decoy(
        &self,
        decoy_a: Arc<LinkablePeptide>,
        decoy_b: Arc<LinkablePeptide>,
    ) -> Option<Self> {
        let link_a = self.peptide_a.corresponding_link_site(&decoy_a, self.link_a)?;
        let link_b = self.peptide_b.corresponding_link_site(&decoy_b, self.link_b)?;
        Some(Self::new(decoy_a, decoy_b, link_a, link_b, self.linker_mass))
    }

    /// Combines the ion series of both peptides into the series of the pair.
    /// Fragments of one peptide containing its link residue carry the partner and the linker,
    /// their mass is shifted accordingly.
    ///
    /// # Arguments
    /// * `ion_series_a` - Ion series of peptide A
    /// * `ion_series_b` - Ion series of peptide B
    ///
    pub fn combine_ion_series(&self, ion_series_a: &IonSeries, ion_series_b: &IonSeries) -> IonSeries {
        let shift_a = self.peptide_b.get_mass() + self.linker_mass;
        let shift_b = self.peptide_a.get_mass() + self.linker_mass;
        let length_a = self.peptide_a.get_candidate().get_length();
        let length_b = self.peptide_b.get_candidate().get_length();
        let ions = ion_series_a
            .get_ions()
            .iter()
            .map(|ion| {
                if ion.contains_residue(self.link_a, length_a) {
                    ion.shifted(shift_a)
                } else {
                    *ion
                }
            })
            .chain(ion_series_b.get_ions().iter().map(|ion| {
                if ion.contains_residue(self.link_b, length_b) {
                    ion.shifted(shift_b)
                } else {
                    *ion
                }
            }))
            .collect();
        IonSeries::new(ion_series_a.get_charge(), ions)
    }

    /// Predicts the ion series of the pair. Returns None if one of the peptides contains residues without mass.
    ///
    /// # Arguments
    /// * `charge` - Precursor charge
    ///
    pub fn predict_ions(&self, charge: u8) -> Option<IonSeries> {
        let predict = |peptide: &LinkablePeptide| {
            let candidate = peptide.get_candidate();
            IonSeries::predict(
                candidate.get_sequence(),
                candidate.get_modifications(),
                charge,
                candidate.get_mass_basis(),
            )
        };
        let ion_series_a = predict(&self.peptide_a)?;
        let ion_series_b = predict(&self.peptide_b)?;
        Some(self.combine_ion_series(&ion_series_a, &ion_series_b))
    }
}

impl Display for XLinkPair {
    /// e.g. `PEPKTIDER,AKDEFR (4,2)` with 1-based link positions
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{} ({},{})",
            self.peptide_a.get_candidate().get_modified_sequence(),
            self.peptide_b.get_candidate().get_modified_sequence(),
            self.link_a + 1,
            self.link_b + 1
        )
    }
}

#[cfg(test)]
mod test {
    // std imports
    use std::str::FromStr;

    // internal imports
    use super::*;
    use crate::chemistry::mass_basis::MassBasis;
    use crate::entities::ion_series::IonType;
    use crate::entities::peptide::{PeptideCandidate, PeptideSource};
    use crate::entities::protein::Protein;
    use crate::functions::decoy::{DecoyGenerator, DecoyMethod};
    use crate::functions::xlink::bond_map::XLinkBondMap;
    use crate::mass::convert::to_int;

    fn linkable(sequence: &str, index: usize) -> Arc<LinkablePeptide> {
        let protein = Arc::new(Protein::new(
            format!("P_{}", sequence),
            String::new(),
            sequence.to_string(),
        ));
        let candidate = PeptideCandidate::new(
            PeptideSource::new(protein, 1),
            sequence.len(),
            0,
            MassBasis::Monoisotopic,
        )
        .unwrap();
        let bond_map = XLinkBondMap::from_str("K:K").unwrap();
        let sites = LinkablePeptide::find_link_sites(&candidate, &bond_map);
        Arc::new(LinkablePeptide::new(index, Arc::new(candidate), sites))
    }

    #[test]
    fn test_mass_and_display() {
        let linker_mass = to_int(138.06808);
        let pair = XLinkPair::new(linkable("PEPKTIDER", 0), linkable("AKDEFR", 1), 3, 1, linker_mass);
        assert_eq!(
            pair.get_mass(),
            pair.get_peptide_a().get_mass() + pair.get_peptide_b().get_mass() + linker_mass
        );
        assert_eq!(pair.to_string(), "PEPKTIDER,AKDEFR (4,2)");
        assert!(!pair.is_decoy());
    }

    #[test]
    fn test_ion_shifts() {
        let linker_mass = to_int(138.06808);
        let peptide_a = linkable("PEPKTIDER", 0);
        let peptide_b = linkable("AKDEFR", 1);
        let pair = XLinkPair::new(peptide_a.clone(), peptide_b.clone(), 3, 1, linker_mass);
        let charge = 2;
        let series_a = IonSeries::predict("PEPKTIDER", None, charge, MassBasis::Monoisotopic).unwrap();
        let series_b = IonSeries::predict("AKDEFR", None, charge, MassBasis::Monoisotopic).unwrap();
        let combined = pair.predict_ions(charge).unwrap();
        assert_eq!(combined.len(), series_a.len() + series_b.len());

        let shift_a = peptide_b.get_mass() + linker_mass;
        for (plain, linked) in series_a.get_ions().iter().zip(combined.get_ions().iter()) {
            let contains_link = match plain.ion_type {
                // b4 and longer contain K at offset 3
                IonType::B => plain.index > 3,
                // y6 and longer contain K at offset 3 of 9 residues
                IonType::Y => plain.index >= 6,
            };
            if contains_link {
                assert_eq!(linked.mass, plain.mass + shift_a);
            } else {
                assert_eq!(linked, plain);
            }
        }

        let shift_b = peptide_a.get_mass() + linker_mass;
        for (plain, linked) in series_b
            .get_ions()
            .iter()
            .zip(combined.get_ions()[series_a.len()..].iter())
        {
            let contains_link = match plain.ion_type {
                IonType::B => plain.index > 1,
                IonType::Y => plain.index >= 5,
            };
            if contains_link {
                assert_eq!(linked.mass, plain.mass + shift_b);
            } else {
                assert_eq!(linked.mass, plain.mass);
            }
        }
    }

    #[test]
    fn test_decoy_pair() {
        let bond_map = XLinkBondMap::from_str("K:K").unwrap();
        let peptide_a = linkable("PEPKTIDER", 0);
        let peptide_b = linkable("AKDEFR", 1);
        let pair = XLinkPair::new(peptide_a.clone(), peptide_b.clone(), 3, 1, 0);
        let mut decoy_generator = DecoyGenerator::new(DecoyMethod::Reverse, 3);
        let decoy_a = Arc::new(peptide_a.to_decoy(&mut decoy_generator, 0));
        let decoy_b = Arc::new(peptide_b.to_decoy(&mut decoy_generator, 1));
        let decoy = pair.to_decoy(decoy_a, decoy_b).unwrap();
        assert!(decoy.is_decoy());
        assert_eq!(decoy.get_peptide_a().get_candidate().get_sequence(), "PEDITKPER");
        assert_eq!(decoy.get_peptide_b().get_candidate().get_sequence(), "AFEDKR");
        // both links stay on K
        assert_eq!(decoy.get_link_a(), 5);
        assert_eq!(decoy.get_link_b(), 4);
        assert!(bond_map.can_link(
            decoy.get_peptide_a().get_candidate(),
            decoy.get_link_a(),
            decoy.get_peptide_b().get_candidate(),
            decoy.get_link_b(),
        ));
        assert_eq!(decoy.get_mass(), pair.get_mass());
    }

    #[test]
    fn test_decoy_pair_needs_link_sites() {
        let peptide_a = linkable("PEPKTIDER", 0);
        let peptide_b = linkable("AKDEFR", 1);
        // link at a residue which is not a link site
        let pair = XLinkPair::new(peptide_a.clone(), peptide_b.clone(), 2, 1, 0);
        let mut decoy_generator = DecoyGenerator::new(DecoyMethod::Reverse, 3);
        let decoy_a = Arc::new(peptide_a.to_decoy(&mut decoy_generator, 0));
        let decoy_b = Arc::new(peptide_b.to_decoy(&mut decoy_generator, 1));
        assert!(pair.to_decoy(decoy_a, decoy_b).is_none());
    }
}
