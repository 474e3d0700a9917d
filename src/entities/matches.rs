// std imports
use std::sync::Arc;

// internal imports
use crate::entities::spectrum::Spectrum;
use crate::functions::weibull::WeibullParameters;

/// Scored candidate for one spectrum and charge.
/// Generic over the candidate, e.g. a single peptide or a cross-linked pair.
///
#[derive(Debug)]
pub struct Match<C> {
    candidate: Arc<C>,
    spectrum: Arc<Spectrum>,
    charge: u8,
    preliminary_score: f64,
    primary_score: Option<f64>,
    p_value: Option<f64>,
    rank: usize,
    is_decoy: bool,
}

impl<C> Clone for Match<C> {
    fn clone(&self) -> Self {
        Self {
            candidate: self.candidate.clone(),
            spectrum: self.spectrum.clone(),
            charge: self.charge,
            preliminary_score: self.preliminary_score,
            primary_score: self.primary_score,
            p_value: self.p_value,
            rank: self.rank,
            is_decoy: self.is_decoy,
        }
    }
}

impl<C> Match<C> {
    /// Creates a new match with a preliminary score. Primary score, p-value and rank are set later.
    ///
    pub fn new(
        candidate: Arc<C>,
        spectrum: Arc<Spectrum>,
        charge: u8,
        preliminary_score: f64,
        is_decoy: bool,
    ) -> Self {
        Self {
            candidate,
            spectrum,
            charge,
            preliminary_score,
            primary_score: None,
            p_value: None,
            rank: 0,
            is_decoy,
        }
    }

    pub fn get_candidate(&self) -> &Arc<C> {
        &self.candidate
    }

    pub fn get_spectrum(&self) -> &Arc<Spectrum> {
        &self.spectrum
    }

    pub fn get_charge(&self) -> u8 {
        self.charge
    }

    pub fn get_preliminary_score(&self) -> f64 {
        self.preliminary_score
    }

    pub fn get_primary_score(&self) -> Option<f64> {
        self.primary_score
    }

    pub fn set_primary_score(&mut self, primary_score: f64) {
        self.primary_score = Some(primary_score);
    }

    pub fn get_p_value(&self) -> Option<f64> {
        self.p_value
    }

    /// Returns the 1-based rank, 0 if not ranked yet
    pub fn get_rank(&self) -> usize {
        self.rank
    }

    pub fn is_decoy(&self) -> bool {
        self.is_decoy
    }
}

/// Matches of one spectrum and charge, either for the targets or for one decoy replicate
///
#[derive(Debug)]
pub struct MatchCollection<C> {
    spectrum: Arc<Spectrum>,
    charge: u8,
    decoy_replicate: Option<usize>,
    matches: Vec<Match<C>>,
    weibull_parameters: Option<WeibullParameters>,
    partial: Option<String>,
}

impl<C> MatchCollection<C> {
    /// Creates a new collection
    ///
    /// # Arguments
    /// * `spectrum` - Spectrum
    /// * `charge` - Charge
    /// * `decoy_replicate` - None for targets, otherwise the 0-based decoy replicate
    ///
    pub fn new(spectrum: Arc<Spectrum>, charge: u8, decoy_replicate: Option<usize>) -> Self {
        Self {
            spectrum,
            charge,
            decoy_replicate,
            matches: Vec::new(),
            weibull_parameters: None,
            partial: None,
        }
    }

    /// Sorts the matches by primary score descending, ties keep their order,
    /// and assigns the ranks 1..N.
    ///
    /// # Arguments
    /// * `matches` - Matches in insertion order
    ///
    pub fn set_ranked_matches(&mut self, mut matches: Vec<Match<C>>) {
        matches.sort_by(|a, b| {
            let a_score = a.primary_score.unwrap_or(f64::NEG_INFINITY);
            let b_score = b.primary_score.unwrap_or(f64::NEG_INFINITY);
            b_score.total_cmp(&a_score)
        });
        for (idx, psm) in matches.iter_mut().enumerate() {
            psm.rank = idx + 1;
        }
        self.matches = matches;
    }

    /// Assigns a p-value to each match
    ///
    pub fn calibrate(&mut self, weibull_parameters: WeibullParameters) {
        for psm in self.matches.iter_mut() {
            psm.p_value = psm
                .primary_score
                .map(|score| weibull_parameters.p_value(score));
        }
        self.weibull_parameters = Some(weibull_parameters);
    }

    /// Marks the collection as incomplete, e.g. because of a calibration underflow
    ///
    /// # Arguments
    /// * `reason` - Description of the recoverable error
    ///
    pub fn mark_partial(&mut self, reason: String) {
        self.partial = Some(reason);
    }

    pub fn get_spectrum(&self) -> &Arc<Spectrum> {
        &self.spectrum
    }

    pub fn get_charge(&self) -> u8 {
        self.charge
    }

    pub fn get_decoy_replicate(&self) -> Option<usize> {
        self.decoy_replicate
    }

    pub fn is_decoy(&self) -> bool {
        self.decoy_replicate.is_some()
    }

    pub fn get_matches(&self) -> &[Match<C>] {
        &self.matches
    }

    pub fn get_weibull_parameters(&self) -> Option<&WeibullParameters> {
        self.weibull_parameters.as_ref()
    }

    /// Returns the reason why the collection is partial
    pub fn get_partial(&self) -> Option<&str> {
        self.partial.as_deref()
    }

    pub fn is_partial(&self) -> bool {
        self.partial.is_some()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_dense_ranks() {
        let spectrum = Arc::new(Spectrum::new("scan=1".to_string(), 500.0, vec![2], vec![]));
        let scores = [3.0, 7.5, 3.0, 1.0, 7.5, 9.0];
        let matches: Vec<Match<usize>> = scores
            .iter()
            .enumerate()
            .map(|(idx, score)| {
                let mut psm = Match::new(Arc::new(idx), spectrum.clone(), 2, 0.0, false);
                psm.set_primary_score(*score);
                psm
            })
            .collect();
        let mut collection = MatchCollection::new(spectrum, 2, None);
        collection.set_ranked_matches(matches);

        let ranks: Vec<usize> = collection.get_matches().iter().map(|psm| psm.get_rank()).collect();
        assert_eq!(ranks, (1..=6).collect::<Vec<usize>>());
        // ties by insertion order
        let order: Vec<usize> = collection
            .get_matches()
            .iter()
            .map(|psm| **psm.get_candidate())
            .collect();
        assert_eq!(order, vec![5, 1, 4, 0, 2, 3]);
        assert!(!collection.is_partial());
        assert!(!collection.is_decoy());
    }
}
