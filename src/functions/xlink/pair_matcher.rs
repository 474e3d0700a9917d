// std imports
use std::sync::Arc;

// 3rd party imports
use tracing::debug;

// internal imports
use crate::functions::xlink::bond_map::XLinkBondMap;
use crate::functions::xlink::linkable_peptide::LinkablePeptide;
use crate::functions::xlink::pair::XLinkPair;

/// Finds all pairs of linkable peptides with a combined mass inside a window
///
pub struct PairMatcher {
    bond_map: Arc<XLinkBondMap>,
    linker_mass: i64,
}

impl PairMatcher {
    pub fn new(bond_map: Arc<XLinkBondMap>, linker_mass: i64) -> Self {
        Self {
            bond_map,
            linker_mass,
        }
    }

    pub fn get_bond_map(&self) -> &Arc<XLinkBondMap> {
        &self.bond_map
    }

    pub fn get_linker_mass(&self) -> i64 {
        self.linker_mass
    }

    /// Adds a pair for each legal combination of link sites
    fn add_site_pairs(
        &self,
        peptide_a: &Arc<LinkablePeptide>,
        peptide_b: &Arc<LinkablePeptide>,
        pairs: &mut Vec<XLinkPair>,
    ) {
        for link_a in peptide_a.get_link_sites() {
            for link_b in peptide_b.get_link_sites() {
                if self.bond_map.can_link(
                    peptide_a.get_candidate(),
                    *link_a,
                    peptide_b.get_candidate(),
                    *link_b,
                ) {
                    pairs.push(XLinkPair::new(
                        peptide_a.clone(),
                        peptide_b.clone(),
                        *link_a,
                        *link_b,
                        self.linker_mass,
                    ));
                }
            }
        }
    }

    /// Returns every unordered pair of distinct pool entries with
    /// `min_mass <= mass(A) + mass(B) + linker <= max_mass`, once for each legal site pair.
    /// Entries derived from the same protein location are not paired.
    ///
    /// # Arguments
    /// * `pool` - Linkable peptides sorted ascending by mass
    /// * `min_mass` - Minimum combined mass (inclusive)
    /// * `max_mass` - Maximum combined mass (inclusive)
    ///
    pub fn find_pairs(
        &self,
        pool: &[Arc<LinkablePeptide>],
        min_mass: i64,
        max_mass: i64,
    ) -> Vec<XLinkPair> {
        let mut pairs: Vec<XLinkPair> = Vec::new();
        if pool.len() < 2 {
            return pairs;
        }
        let mut high = pool.len() - 1;
        for low in 0..pool.len() - 1 {
            let low_mass = pool[low].get_mass() + self.linker_mass;
            // the upper bound only moves down as the low end gets heavier
            while high > low && low_mass + pool[high].get_mass() > max_mass {
                high -= 1;
            }
            if high <= low {
                break;
            }
            let mut current = high;
            while current > low && low_mass + pool[current].get_mass() >= min_mass {
                if !pool[low]
                    .get_candidate()
                    .has_same_origin(pool[current].get_candidate())
                {
                    self.add_site_pairs(&pool[low], &pool[current], &mut pairs);
                }
                current -= 1;
            }
        }
        debug!(
            "{} pairs for [{}, {}] in pool of {}",
            pairs.len(),
            min_mass,
            max_mass,
            pool.len()
        );
        pairs
    }
}

#[cfg(test)]
mod test {
    // std imports
    use std::collections::HashSet;
    use std::str::FromStr;

    // 3rd party imports
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    // internal imports
    use super::*;
    use crate::chemistry::mass_basis::MassBasis;
    use crate::entities::peptide::{PeptideCandidate, PeptideSource};
    use crate::entities::protein::Protein;

    /// Linkable peptide with an artificial mass
    fn linkable(sequence: &str, protein: &Arc<Protein>, start: usize, mass: i64) -> Arc<LinkablePeptide> {
        let candidate = PeptideCandidate::new(
            PeptideSource::new(protein.clone(), start),
            sequence.len(),
            0,
            MassBasis::Monoisotopic,
        )
        .unwrap()
        .with_mass(mass);
        let bond_map = XLinkBondMap::from_str("K:K").unwrap();
        let sites = LinkablePeptide::find_link_sites(&candidate, &bond_map);
        Arc::new(LinkablePeptide::new(0, Arc::new(candidate), sites))
    }

    fn brute_force(
        matcher: &PairMatcher,
        pool: &[Arc<LinkablePeptide>],
        min_mass: i64,
        max_mass: i64,
    ) -> HashSet<(usize, usize, usize, usize)> {
        let mut pairs = HashSet::new();
        for a in 0..pool.len() {
            for b in (a + 1)..pool.len() {
                let mass = pool[a].get_mass() + pool[b].get_mass() + matcher.get_linker_mass();
                if mass < min_mass || mass > max_mass {
                    continue;
                }
                if pool[a].get_candidate().has_same_origin(pool[b].get_candidate()) {
                    continue;
                }
                for link_a in pool[a].get_link_sites() {
                    for link_b in pool[b].get_link_sites() {
                        pairs.insert((a, b, *link_a, *link_b));
                    }
                }
            }
        }
        pairs
    }

    fn as_index_set(
        pool: &[Arc<LinkablePeptide>],
        pairs: &[XLinkPair],
    ) -> HashSet<(usize, usize, usize, usize)> {
        let position = |peptide: &Arc<LinkablePeptide>| {
            pool.iter()
                .position(|entry| Arc::ptr_eq(entry, peptide))
                .unwrap()
        };
        pairs
            .iter()
            .map(|pair| {
                (
                    position(pair.get_peptide_a()),
                    position(pair.get_peptide_b()),
                    pair.get_link_a(),
                    pair.get_link_b(),
                )
            })
            .collect()
    }

    #[test]
    fn test_small_pool_against_brute_force() {
        let protein = Arc::new(Protein::new(
            "P1".to_string(),
            String::new(),
            "AAKAAGGKGGSSKSSTTKTTVVKVV".to_string(),
        ));
        // masses in whole units of the integer representation
        let pool: Vec<Arc<LinkablePeptide>> = vec![
            linkable("AAKAA", &protein, 1, 40),
            linkable("GGKGG", &protein, 6, 45),
            linkable("SSKSS", &protein, 11, 50),
            linkable("TTKTT", &protein, 16, 55),
            linkable("VVKVV", &protein, 21, 60),
        ];
        let matcher = PairMatcher::new(Arc::new(XLinkBondMap::from_str("K:K").unwrap()), 5);
        let pairs = matcher.find_pairs(&pool, 100, 110);
        let found = as_index_set(&pool, &pairs);
        assert_eq!(found.len(), pairs.len());
        assert_eq!(found, brute_force(&matcher, &pool, 100, 110));
        // 40+55, 40+60, 45+50, 45+55, 45+60 and 50+55, bounds are inclusive
        assert_eq!(pairs.len(), 6);
    }

    #[test]
    fn test_random_pools_against_brute_force() {
        let protein = Arc::new(Protein::new(
            "P1".to_string(),
            String::new(),
            "KAKAKAKAKAKAKAKAKAKAKAKAKAKAKAKAKAKAKAKA".to_string(),
        ));
        let matcher = PairMatcher::new(Arc::new(XLinkBondMap::from_str("K:K").unwrap()), 3);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let pool_size = rng.gen_range(0..12);
            let mut pool: Vec<Arc<LinkablePeptide>> = (0..pool_size)
                .map(|idx| {
                    let start = 1 + 2 * (idx % 5);
                    let sequence = &protein.get_sequence()[start - 1..start + 2];
                    linkable(sequence, &protein, start, rng.gen_range(10..60))
                })
                .collect();
            pool.sort_by_key(|peptide| peptide.get_mass());
            let min_mass = rng.gen_range(20..80);
            let max_mass = min_mass + rng.gen_range(0..30);
            let pairs = matcher.find_pairs(&pool, min_mass, max_mass);
            let found = as_index_set(&pool, &pairs);
            assert_eq!(found.len(), pairs.len());
            assert_eq!(found, brute_force(&matcher, &pool, min_mass, max_mass));
        }
    }

    #[test]
    fn test_same_origin_skipped() {
        let protein = Arc::new(Protein::new(
            "P1".to_string(),
            String::new(),
            "AAKAA".to_string(),
        ));
        let pool = vec![
            linkable("AAKAA", &protein, 1, 50),
            linkable("AAKAA", &protein, 1, 52),
        ];
        let matcher = PairMatcher::new(Arc::new(XLinkBondMap::from_str("K:K").unwrap()), 0);
        assert!(matcher.find_pairs(&pool, 0, 1000).is_empty());
        assert!(matcher.find_pairs(&pool[..1], 0, 1000).is_empty());
    }
}
