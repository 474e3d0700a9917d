// std imports
use std::str::FromStr;
use std::sync::Arc;

// 3rd party imports
use tracing::{info, warn};

// internal imports
use crate::entities::configuration::SearchConfiguration;
use crate::entities::constraint::PeptideConstraint;
use crate::entities::spectrum::Spectrum;
use crate::errors::search_error::SearchError;
use crate::functions::candidate_generator::CandidateGenerator;
use crate::functions::decoy::DecoyGenerator;
use crate::functions::scoring::ScoringOracle;
use crate::functions::search::{MatchCollector, SearchUnitResult, UnitSearch};
use crate::functions::xlink::bond_map::XLinkBondMap;
use crate::functions::xlink::linkable_peptide::{
    collect_pool, merge_pools, pool_up_to, LinkablePeptide,
};
use crate::functions::xlink::pair::XLinkPair;
use crate::functions::xlink::pair_matcher::PairMatcher;
use crate::functions::xlink::precursor_window::XLinkPrecursorWindow;
use crate::mass::convert::to_int;

/// Searches cross-linked pairs.
///
/// All linkable peptides within the configured mass range are collected once, for all modification
/// profiles, into a mass sorted pool. Each decoy replicate gets a pool of the same size where entry
/// `i` is the decoy of target entry `i`. Pool indices are stable and key the ion series cache of
/// the oracle, so an oracle with a cache must not be shared between searches.
///
pub struct XLinkSearch {
    config: Arc<SearchConfiguration>,
    oracle: Arc<dyn ScoringOracle<XLinkPair>>,
    matcher: PairMatcher,
    window: XLinkPrecursorWindow,
    target_pool: Vec<Arc<LinkablePeptide>>,
    decoy_pools: Vec<Vec<Arc<LinkablePeptide>>>,
}

impl XLinkSearch {
    /// Creates a new cross-link search and builds the peptide pools
    ///
    /// # Arguments
    /// * `generator` - Candidate generator
    /// * `oracle` - Scoring oracle for pairs
    ///
    pub fn new(
        generator: &CandidateGenerator,
        oracle: Arc<dyn ScoringOracle<XLinkPair>>,
    ) -> Result<Self, SearchError> {
        let config = generator.get_config().clone();
        let bond_map = Arc::new(XLinkBondMap::from_str(config.get_link_sites())?);
        let constraint = PeptideConstraint::from_configuration(&config)?;
        let target_pool = Self::build_pool(generator, &constraint, &bond_map)?;
        let pool_len = target_pool.len();
        let decoy_pools = (0..config.get_number_of_decoys())
            .map(|replicate| {
                let mut decoy_generator = DecoyGenerator::new(
                    config.get_decoy_method(),
                    config.get_seed().wrapping_add(replicate as u64),
                );
                target_pool
                    .iter()
                    .map(|peptide| {
                        Arc::new(peptide.to_decoy(
                            &mut decoy_generator,
                            replicate * pool_len + peptide.get_index(),
                        ))
                    })
                    .collect()
            })
            .collect();
        info!(
            "{} linkable peptides for link sites {}",
            target_pool.len(),
            bond_map
        );
        Ok(Self {
            matcher: PairMatcher::new(bond_map, to_int(config.get_linker_mass())),
            window: XLinkPrecursorWindow::from_configuration(&config),
            config,
            oracle,
            target_pool,
            decoy_pools,
        })
    }

    /// Collects the linkable peptides of every modification profile into one pool
    fn build_pool(
        generator: &CandidateGenerator,
        constraint: &PeptideConstraint,
        bond_map: &XLinkBondMap,
    ) -> Result<Vec<Arc<LinkablePeptide>>, SearchError> {
        let mut pool: Vec<Arc<LinkablePeptide>> = Vec::new();
        for profiles in generator.get_combinator().get_profiles_by_count().iter() {
            for profile in profiles.iter() {
                let candidates = generator.open_with_profile(constraint, profile, None)?;
                let profile_pool = collect_pool(candidates, bond_map, constraint.get_max_mass())?;
                pool = merge_pools(pool, profile_pool);
            }
        }
        Ok(pool)
    }

    pub fn get_target_pool(&self) -> &[Arc<LinkablePeptide>] {
        &self.target_pool
    }

    pub fn get_decoy_pools(&self) -> &[Vec<Arc<LinkablePeptide>>] {
        &self.decoy_pools
    }

    /// Returns all target pairs within the precursor window
    ///
    /// # Arguments
    /// * `precursor_mz` - Precursor m/z
    /// * `charge` - Precursor charge
    ///
    pub fn find_pairs(&self, precursor_mz: f64, charge: u8) -> Vec<XLinkPair> {
        let (min_mass, max_mass) = self.window.get_min_max_mass(precursor_mz, charge);
        let pool = pool_up_to(&self.target_pool, max_mass - self.matcher.get_linker_mass());
        self.matcher.find_pairs(pool, min_mass, max_mass)
    }
}

impl UnitSearch<XLinkPair> for XLinkSearch {
    fn search_unit(
        &self,
        spectrum: Arc<Spectrum>,
        charge: u8,
    ) -> Result<SearchUnitResult<XLinkPair>, SearchError> {
        let pairs = self.find_pairs(spectrum.get_precursor_mz(), charge);
        if pairs.is_empty() {
            warn!(
                "No cross-linked pairs for spectrum {} with charge {}",
                spectrum.get_id(),
                charge
            );
            return Err(SearchError::EmptyCandidateSpace(
                spectrum.get_id().to_string(),
                charge,
            ));
        }

        let mut targets = MatchCollector::new(
            self.oracle.as_ref(),
            self.config.as_ref(),
            spectrum.clone(),
            charge,
            None,
        );
        for pair in pairs.iter() {
            targets.add(pair.clone())?;
        }
        let targets = targets.finish()?;

        let mut decoys = Vec::with_capacity(self.decoy_pools.len());
        for (replicate, decoy_pool) in self.decoy_pools.iter().enumerate() {
            let mut collector = MatchCollector::new(
                self.oracle.as_ref(),
                self.config.as_ref(),
                spectrum.clone(),
                charge,
                Some(replicate),
            );
            for pair in pairs.iter() {
                let decoy_a = decoy_pool.get(pair.get_peptide_a().get_index());
                let decoy_b = decoy_pool.get(pair.get_peptide_b().get_index());
                let decoy_pair = match (decoy_a, decoy_b) {
                    (Some(decoy_a), Some(decoy_b)) => pair.to_decoy(decoy_a.clone(), decoy_b.clone()),
                    _ => None,
                };
                if let Some(decoy_pair) = decoy_pair {
                    collector.add(decoy_pair)?;
                }
            }
            decoys.push(collector.finish()?);
        }
        Ok(SearchUnitResult::new(targets, decoys))
    }
}

#[cfg(test)]
mod test {
    // internal imports
    use super::*;
    use crate::chemistry::molecule::PROTON_MASS;
    use crate::entities::protein::Protein;
    use crate::functions::decoy::DecoyMethod;
    use crate::functions::ion_series_cache::IonSeriesCache;
    use crate::functions::modification::ModificationCollection;
    use crate::functions::modification_combinator::ModificationCombinator;
    use crate::functions::scoring::{MatchedIonCountScorer, XLinkIonSeriesOracle};
    use crate::functions::sequence_source::InMemorySequenceSource;
    use crate::functions::xlink::precursor_window::PrecursorWindowType;
    use crate::mass::convert::to_float;

    fn generator(config: SearchConfiguration) -> CandidateGenerator {
        let config = Arc::new(config);
        CandidateGenerator::new(
            Arc::new(InMemorySequenceSource::new(vec![
                Protein::new(
                    "P1".to_string(),
                    String::new(),
                    "MPEPKTIDERAAKLLR".to_string(),
                ),
                Protein::new("P2".to_string(), String::new(), "GGKDEFKRSSKWR".to_string()),
            ])),
            Arc::new(ModificationCombinator::new(
                Arc::new(ModificationCollection::empty()),
                config.get_max_variable_modifications(),
            )),
            config,
        )
    }

    fn config() -> SearchConfiguration {
        SearchConfiguration::default()
            .with_peptide_length(4, 20)
            .with_peptide_mass(200.0, 5000.0)
            .with_max_number_of_missed_cleavages(1)
            .with_linker_mass(138.06808)
            .with_xlink_window(0.5, PrecursorWindowType::Mass)
            .with_link_sites("K:K")
            .with_number_of_decoys(2)
            .with_decoy_method(DecoyMethod::Reverse)
    }

    #[test]
    fn test_search_unit() {
        let config = config();
        let generator = generator(config);
        let cache = Arc::new(IonSeriesCache::new());
        let oracle = Arc::new(XLinkIonSeriesOracle::new(
            cache.clone(),
            Arc::new(MatchedIonCountScorer::new(0.02)),
            Arc::new(MatchedIonCountScorer::new(0.02)),
        ));
        let search = XLinkSearch::new(&generator, oracle).unwrap();
        let pool = search.get_target_pool();
        assert!(pool.len() >= 2);
        assert!(pool.windows(2).all(|pair| pair[0].get_mass() <= pair[1].get_mass()));
        assert_eq!(search.get_decoy_pools().len(), 2);

        // precursor of the first two pool entries linked together
        let pair_mass = pool[0].get_mass() + pool[1].get_mass() + to_int(138.06808);
        let charge = 3;
        let precursor_mz = to_float(pair_mass / charge as i64 + PROTON_MASS);
        let spectrum = Arc::new(Spectrum::new(
            "scan=7".to_string(),
            precursor_mz,
            vec![charge],
            vec![],
        ));
        let result = search.search_unit(spectrum, charge).unwrap();
        let targets = result.get_targets();
        assert!(!targets.is_empty());
        assert!(targets.get_matches().iter().any(|psm| {
            let pair = psm.get_candidate();
            Arc::ptr_eq(pair.get_peptide_a(), &pool[0])
                && Arc::ptr_eq(pair.get_peptide_b(), &pool[1])
        }));
        let bond_map = XLinkBondMap::from_str("K:K").unwrap();
        for decoys in result.get_decoys().iter() {
            assert_eq!(decoys.len(), targets.len());
            for psm in decoys.get_matches().iter() {
                let pair = psm.get_candidate();
                assert!(pair.is_decoy());
                // decoy pairs are linked at residues allowed by the bond map
                assert!(bond_map.can_link(
                    pair.get_peptide_a().get_candidate(),
                    pair.get_link_a(),
                    pair.get_peptide_b().get_candidate(),
                    pair.get_link_b(),
                ));
            }
        }
        // peptide series of targets and decoys are cached separately
        assert!(!cache.is_empty());
    }

    #[test]
    fn test_no_pairs() {
        let generator = generator(config());
        let oracle = Arc::new(XLinkIonSeriesOracle::new(
            Arc::new(IonSeriesCache::new()),
            Arc::new(MatchedIonCountScorer::new(0.02)),
            Arc::new(MatchedIonCountScorer::new(0.02)),
        ));
        let search = XLinkSearch::new(&generator, oracle).unwrap();
        let spectrum = Arc::new(Spectrum::new("scan=8".to_string(), 150.0, vec![2], vec![]));
        assert!(matches!(
            search.search_unit(spectrum, 2),
            Err(SearchError::EmptyCandidateSpace(_, 2))
        ));
    }
}
