// std imports
use std::sync::Arc;

// 3rd party imports
use anyhow::anyhow;

// internal imports
use crate::entities::ion_series::IonSeries;
use crate::entities::peptide::PeptideCandidate;
use crate::entities::spectrum::Spectrum;
use crate::errors::search_error::SearchError;
use crate::functions::ion_series_cache::{IonSeriesCache, IonSeriesKey};
use crate::functions::xlink::linkable_peptide::LinkablePeptide;
use crate::functions::xlink::pair::XLinkPair;
use crate::mass::convert::to_float;

/// Scores candidates against a spectrum.
/// The preliminary score is cheap and used to filter, the primary score is reported.
///
pub trait ScoringOracle<C>: Send + Sync {
    /// Cheap score used to select the top-K candidates
    ///
    /// # Arguments
    /// * `candidate` - Candidate
    /// * `spectrum` - Spectrum
    /// * `charge` - Precursor charge
    ///
    fn preliminary_score(
        &self,
        candidate: &C,
        spectrum: &Spectrum,
        charge: u8,
    ) -> Result<f64, SearchError>;

    /// Score used for ranking and calibration
    ///
    /// # Arguments
    /// * `candidate` - Candidate
    /// * `spectrum` - Spectrum
    /// * `charge` - Precursor charge
    ///
    fn primary_score(&self, candidate: &C, spectrum: &Spectrum, charge: u8) -> Result<f64, SearchError>;
}

/// Scores a predicted ion series against the peaks of a spectrum
///
pub trait IonSeriesScorer: Send + Sync {
    fn score(&self, ion_series: &IonSeries, spectrum: &Spectrum) -> f64;
}

/// Returns the index range of the peaks within `mz ± tolerance`
fn peaks_within(spectrum: &Spectrum, mz: f64, tolerance: f64) -> std::ops::Range<usize> {
    let peaks = spectrum.get_peaks();
    let first = peaks.partition_point(|peak| peak.mz < mz - tolerance);
    let last = peaks.partition_point(|peak| peak.mz <= mz + tolerance);
    first..last.max(first)
}

/// Counts the predicted ions with at least one peak within the tolerance
///
pub struct MatchedIonCountScorer {
    /// Fragment tolerance in Thomson
    tolerance: f64,
}

impl MatchedIonCountScorer {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl IonSeriesScorer for MatchedIonCountScorer {
    fn score(&self, ion_series: &IonSeries, spectrum: &Spectrum) -> f64 {
        ion_series
            .get_ions()
            .iter()
            .filter(|ion| !peaks_within(spectrum, to_float(ion.mz), self.tolerance).is_empty())
            .count() as f64
    }
}

/// Sums up the intensity of the most intense peak within the tolerance of each predicted ion,
/// relative to the total ion current
///
pub struct MatchedIntensityScorer {
    /// Fragment tolerance in Thomson
    tolerance: f64,
}

impl MatchedIntensityScorer {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl IonSeriesScorer for MatchedIntensityScorer {
    fn score(&self, ion_series: &IonSeries, spectrum: &Spectrum) -> f64 {
        let total_intensity: f64 = spectrum.get_peaks().iter().map(|peak| peak.intensity).sum();
        if total_intensity <= 0.0 {
            return 0.0;
        }
        let matched: f64 = ion_series
            .get_ions()
            .iter()
            .map(|ion| {
                spectrum.get_peaks()[peaks_within(spectrum, to_float(ion.mz), self.tolerance)]
                    .iter()
                    .map(|peak| peak.intensity)
                    .fold(0.0, f64::max)
            })
            .sum();
        matched / total_intensity
    }
}

/// Oracle predicting the b- and y-ions of a peptide and scoring them with two ion series scorers
///
pub struct IonSeriesOracle {
    preliminary: Arc<dyn IonSeriesScorer>,
    primary: Arc<dyn IonSeriesScorer>,
}

impl IonSeriesOracle {
    pub fn new(preliminary: Arc<dyn IonSeriesScorer>, primary: Arc<dyn IonSeriesScorer>) -> Self {
        Self {
            preliminary,
            primary,
        }
    }

    fn predict(candidate: &PeptideCandidate, charge: u8) -> Result<IonSeries, SearchError> {
        IonSeries::predict(
            candidate.get_sequence(),
            candidate.get_modifications(),
            charge,
            candidate.get_mass_basis(),
        )
        .ok_or_else(|| {
            SearchError::ScoringOracleError(anyhow!(
                "cannot predict ions for {}",
                candidate.get_sequence()
            ))
        })
    }
}

impl ScoringOracle<PeptideCandidate> for IonSeriesOracle {
    fn preliminary_score(
        &self,
        candidate: &PeptideCandidate,
        spectrum: &Spectrum,
        charge: u8,
    ) -> Result<f64, SearchError> {
        Ok(self
            .preliminary
            .score(&Self::predict(candidate, charge)?, spectrum))
    }

    fn primary_score(
        &self,
        candidate: &PeptideCandidate,
        spectrum: &Spectrum,
        charge: u8,
    ) -> Result<f64, SearchError> {
        Ok(self.primary.score(&Self::predict(candidate, charge)?, spectrum))
    }
}

/// Oracle for cross-linked pairs. The ion series of the single peptides are cached by pool index,
/// the series of a pair is derived from them by shifting the linked fragments.
///
pub struct XLinkIonSeriesOracle {
    cache: Arc<IonSeriesCache>,
    preliminary: Arc<dyn IonSeriesScorer>,
    primary: Arc<dyn IonSeriesScorer>,
}

impl XLinkIonSeriesOracle {
    pub fn new(
        cache: Arc<IonSeriesCache>,
        preliminary: Arc<dyn IonSeriesScorer>,
        primary: Arc<dyn IonSeriesScorer>,
    ) -> Self {
        Self {
            cache,
            preliminary,
            primary,
        }
    }

    pub fn get_cache(&self) -> &Arc<IonSeriesCache> {
        &self.cache
    }

    fn get_peptide_ion_series(
        &self,
        peptide: &LinkablePeptide,
        charge: u8,
    ) -> Result<Arc<IonSeries>, SearchError> {
        let key = IonSeriesKey::new(peptide.get_index(), charge, peptide.is_decoy());
        self.cache
            .get_or_insert_with(key, || {
                let candidate = peptide.get_candidate();
                IonSeries::predict(
                    candidate.get_sequence(),
                    candidate.get_modifications(),
                    charge,
                    candidate.get_mass_basis(),
                )
            })
            .ok_or_else(|| {
                SearchError::ScoringOracleError(anyhow!(
                    "cannot predict ions for {}",
                    peptide.get_candidate().get_sequence()
                ))
            })
    }

    fn predict(&self, pair: &XLinkPair, charge: u8) -> Result<IonSeries, SearchError> {
        let ion_series_a = self.get_peptide_ion_series(pair.get_peptide_a(), charge)?;
        let ion_series_b = self.get_peptide_ion_series(pair.get_peptide_b(), charge)?;
        Ok(pair.combine_ion_series(&ion_series_a, &ion_series_b))
    }
}

impl ScoringOracle<XLinkPair> for XLinkIonSeriesOracle {
    fn preliminary_score(
        &self,
        pair: &XLinkPair,
        spectrum: &Spectrum,
        charge: u8,
    ) -> Result<f64, SearchError> {
        Ok(self.preliminary.score(&self.predict(pair, charge)?, spectrum))
    }

    fn primary_score(&self, pair: &XLinkPair, spectrum: &Spectrum, charge: u8) -> Result<f64, SearchError> {
        Ok(self.primary.score(&self.predict(pair, charge)?, spectrum))
    }
}
