// std imports
use std::collections::HashMap;
use std::sync::Arc;

// 3rd party imports
use fallible_iterator::FallibleIterator;
use metrics::counter;
use tracing::{debug, warn};

// internal imports
use crate::entities::configuration::SearchConfiguration;
use crate::entities::constraint::PeptideConstraint;
use crate::entities::matches::{Match, MatchCollection};
use crate::entities::peptide::PeptideCandidate;
use crate::entities::spectrum::Spectrum;
use crate::errors::search_error::SearchError;
use crate::functions::candidate_generator::CandidateGenerator;
use crate::functions::decoy::DecoyGenerator;
use crate::functions::filter::{ReservoirSample, TopKFilter};
use crate::functions::scoring::ScoringOracle;
use crate::functions::weibull::WeibullParameters;
use crate::mass::convert::to_float;

/// Metric name for the number of preliminary scored candidates
pub const SCORED_CANDIDATES_METRIC: &str = "macpepsearch_scored_candidates";
/// Metric name for the number of matches kept after filtering
pub const RETAINED_MATCHES_METRIC: &str = "macpepsearch_retained_matches";

/// Ranked matches of one spectrum and charge for the targets and each decoy replicate
///
#[derive(Debug)]
pub struct SearchUnitResult<C> {
    targets: MatchCollection<C>,
    decoys: Vec<MatchCollection<C>>,
}

impl<C> SearchUnitResult<C> {
    pub fn new(targets: MatchCollection<C>, decoys: Vec<MatchCollection<C>>) -> Self {
        Self { targets, decoys }
    }

    pub fn get_targets(&self) -> &MatchCollection<C> {
        &self.targets
    }

    pub fn get_decoys(&self) -> &[MatchCollection<C>] {
        &self.decoys
    }

    /// True if one of the collections could not be completed, e.g. missing p-values
    pub fn is_partial(&self) -> bool {
        self.targets.is_partial() || self.decoys.iter().any(|decoys| decoys.is_partial())
    }
}

/// Searches single (spectrum, charge) units
///
pub trait UnitSearch<C>: Send + Sync {
    /// Generates, filters, scores and ranks the candidates for the spectrum with the given charge
    ///
    /// # Arguments
    /// * `spectrum` - Spectrum
    /// * `charge` - Precursor charge
    ///
    fn search_unit(&self, spectrum: Arc<Spectrum>, charge: u8) -> Result<SearchUnitResult<C>, SearchError>;
}

/// Collects the candidates of either the targets or one decoy replicate.
/// Keeps the top-K by preliminary score, rescores them with the primary score, ranks them and
/// optionally calibrates the primary scores on a bounded random sample of all candidates.
///
pub struct MatchCollector<'a, C> {
    oracle: &'a dyn ScoringOracle<C>,
    config: &'a SearchConfiguration,
    spectrum: Arc<Spectrum>,
    charge: u8,
    decoy_replicate: Option<usize>,
    filter: TopKFilter<Arc<C>>,
    /// Candidates primary scored for the calibration, only collected if p-values are requested
    calibration_sample: Option<ReservoirSample<Arc<C>>>,
}

impl<'a, C> MatchCollector<'a, C> {
    /// Creates a new collector
    ///
    /// # Arguments
    /// * `oracle` - Scoring oracle
    /// * `config` - Search configuration, provides K and the calibration parameters
    /// * `spectrum` - Spectrum
    /// * `charge` - Precursor charge
    /// * `decoy_replicate` - None for targets, otherwise the 0-based decoy replicate
    ///
    pub fn new(
        oracle: &'a dyn ScoringOracle<C>,
        config: &'a SearchConfiguration,
        spectrum: Arc<Spectrum>,
        charge: u8,
        decoy_replicate: Option<usize>,
    ) -> Self {
        // targets and each decoy replicate draw their own sample
        let sample_seed = config
            .get_seed()
            .wrapping_add(decoy_replicate.map_or(0, |replicate| replicate as u64 + 1));
        Self {
            oracle,
            config,
            spectrum,
            charge,
            decoy_replicate,
            filter: TopKFilter::new(config.get_top_k()),
            calibration_sample: config.get_compute_p_values().then(|| {
                ReservoirSample::new(config.get_calibration_sample_size(), sample_seed)
            }),
        }
    }

    /// Scores the candidate and offers it to the filter and the calibration sample
    ///
    pub fn add(&mut self, candidate: C) -> Result<(), SearchError> {
        let preliminary_score =
            self.oracle
                .preliminary_score(&candidate, &self.spectrum, self.charge)?;
        let candidate = Arc::new(candidate);
        if let Some(calibration_sample) = self.calibration_sample.as_mut() {
            calibration_sample.push(candidate.clone());
        }
        self.filter.push(preliminary_score, candidate);
        Ok(())
    }

    /// Number of candidates scored so far
    pub fn get_number_of_candidates(&self) -> usize {
        self.filter.get_insertions()
    }

    /// True if no further modification counts need to be searched after the given count.
    /// All counts are searched, a score based stop is not implemented.
    ///
    pub fn is_search_complete(&self, _modification_count: usize) -> bool {
        false
    }

    /// Rescores the retained candidates, ranks them and calibrates the p-values if requested.
    /// Only the retained and the sampled candidates are primary scored.
    /// A calibration underflow is logged and leaves the collection partial without p-values.
    ///
    pub fn finish(self) -> Result<MatchCollection<C>, SearchError> {
        let is_decoy = self.decoy_replicate.is_some();
        let scored = self.filter.get_insertions();
        // primary scores by candidate address, candidates can be retained and sampled
        let mut primary_scores: HashMap<*const C, f64> = HashMap::new();
        let mut matches: Vec<Match<C>> = Vec::with_capacity(self.filter.len());
        // insertion order, so the stable rank sort breaks ties by insertion
        for (preliminary_score, candidate) in self.filter.into_insertion_ordered_vec() {
            let primary_score = self
                .oracle
                .primary_score(&candidate, &self.spectrum, self.charge)?;
            primary_scores.insert(Arc::as_ptr(&candidate), primary_score);
            let mut psm = Match::new(
                candidate,
                self.spectrum.clone(),
                self.charge,
                preliminary_score,
                is_decoy,
            );
            psm.set_primary_score(primary_score);
            matches.push(psm);
        }
        counter!(SCORED_CANDIDATES_METRIC).increment(scored as u64);
        counter!(RETAINED_MATCHES_METRIC).increment(matches.len() as u64);

        let mut collection =
            MatchCollection::new(self.spectrum.clone(), self.charge, self.decoy_replicate);
        collection.set_ranked_matches(matches);

        if let Some(calibration_sample) = self.calibration_sample {
            let mut calibration_scores: Vec<f64> = Vec::with_capacity(calibration_sample.len());
            for candidate in calibration_sample.into_vec() {
                let primary_score = match primary_scores.get(&Arc::as_ptr(&candidate)) {
                    Some(primary_score) => *primary_score,
                    None => self
                        .oracle
                        .primary_score(&candidate, &self.spectrum, self.charge)?,
                };
                calibration_scores.push(primary_score);
            }
            match WeibullParameters::estimate(
                &calibration_scores,
                self.config.get_weibull_fraction(),
                self.config.get_min_weibull_sample_size(),
            ) {
                Ok(weibull_parameters) => collection.calibrate(weibull_parameters),
                Err(err) if err.is_recoverable() => {
                    warn!(
                        "Spectrum {} with charge {}: {}",
                        self.spectrum.get_id(),
                        self.charge,
                        err
                    );
                    collection.mark_partial(err.to_string());
                }
                Err(err) => return Err(err),
            }
        }
        Ok(collection)
    }
}

/// Searches single peptides
///
pub struct SearchEngine {
    generator: Arc<CandidateGenerator>,
    oracle: Arc<dyn ScoringOracle<PeptideCandidate>>,
    config: Arc<SearchConfiguration>,
}

impl SearchEngine {
    /// Creates a new search engine, the configuration is taken from the generator
    ///
    /// # Arguments
    /// * `generator` - Candidate generator
    /// * `oracle` - Scoring oracle
    ///
    pub fn new(
        generator: Arc<CandidateGenerator>,
        oracle: Arc<dyn ScoringOracle<PeptideCandidate>>,
    ) -> Self {
        let config = generator.get_config().clone();
        Self {
            generator,
            oracle,
            config,
        }
    }

    pub fn get_generator(&self) -> &Arc<CandidateGenerator> {
        &self.generator
    }

    /// Returns the constraint for the neutral precursor mass ± precursor window
    ///
    pub fn get_constraint(&self, spectrum: &Spectrum, charge: u8) -> Result<PeptideConstraint, SearchError> {
        PeptideConstraint::from_configuration_for_mass(
            &self.config,
            to_float(spectrum.get_neutral_mass(charge)),
            self.config.get_precursor_window(),
        )
    }

    /// Scores all candidates of the targets or one decoy replicate, profile by profile in order of
    /// increasing modification count
    fn collect(
        &self,
        constraint: &PeptideConstraint,
        spectrum: &Arc<Spectrum>,
        charge: u8,
        decoy_replicate: Option<usize>,
    ) -> Result<MatchCollector<'_, PeptideCandidate>, SearchError> {
        let mut collector = MatchCollector::new(
            self.oracle.as_ref(),
            self.config.as_ref(),
            spectrum.clone(),
            charge,
            decoy_replicate,
        );
        let profiles_by_count = self.generator.get_combinator().get_profiles_by_count();
        for (modification_count, profiles) in profiles_by_count.iter().enumerate() {
            for profile in profiles.iter() {
                let decoy_generator = decoy_replicate.map(|replicate| {
                    DecoyGenerator::new(
                        self.config.get_decoy_method(),
                        self.config.get_seed().wrapping_add(replicate as u64),
                    )
                });
                let mut candidates =
                    self.generator
                        .open_with_profile(constraint, profile, decoy_generator)?;
                while let Some(candidate) = candidates.next()? {
                    collector.add(candidate)?;
                }
            }
            debug!(
                "Finished searching {} modifications, {} candidates",
                modification_count,
                collector.get_number_of_candidates()
            );
            if collector.is_search_complete(modification_count) {
                break;
            }
        }
        Ok(collector)
    }
}

impl UnitSearch<PeptideCandidate> for SearchEngine {
    fn search_unit(
        &self,
        spectrum: Arc<Spectrum>,
        charge: u8,
    ) -> Result<SearchUnitResult<PeptideCandidate>, SearchError> {
        let constraint = self.get_constraint(&spectrum, charge)?;
        let targets = self.collect(&constraint, &spectrum, charge, None)?;
        if targets.get_number_of_candidates() == 0 {
            warn!(
                "No candidates for spectrum {} with charge {}",
                spectrum.get_id(),
                charge
            );
            return Err(SearchError::EmptyCandidateSpace(
                spectrum.get_id().to_string(),
                charge,
            ));
        }
        let targets = targets.finish()?;
        let decoys = (0..self.config.get_number_of_decoys())
            .map(|replicate| {
                self.collect(&constraint, &spectrum, charge, Some(replicate))?
                    .finish()
            })
            .collect::<Result<Vec<_>, SearchError>>()?;
        Ok(SearchUnitResult::new(targets, decoys))
    }
}
