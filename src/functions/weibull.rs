// 3rd party imports
use tracing::debug;

// internal imports
use crate::errors::search_error::SearchError;

/// Step between the shifts tried during the fit
pub const SHIFT_STEP: f64 = 0.05;
/// Largest absolute shift tried during the fit
pub const MAX_SHIFT: f64 = 5.0;

/// Parameters of a three-parameter Weibull distribution fitted to null scores
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeibullParameters {
    /// Scale
    eta: f64,
    /// Shape
    beta: f64,
    shift: f64,
    /// Correlation of the least squares fit
    correlation: f64,
}

impl WeibullParameters {
    pub fn new(eta: f64, beta: f64, shift: f64, correlation: f64) -> Self {
        Self {
            eta,
            beta,
            shift,
            correlation,
        }
    }

    /// Fits a Weibull distribution to the top `fraction` of the given scores.
    ///
    /// For each shift on a grid a two-parameter Weibull is fitted by least squares of
    /// `ln(-ln(F))` against `ln(score + shift)` with `F = (i + 0.3) / (n + 0.4)`.
    /// The shift with the best correlation wins.
    ///
    /// # Arguments
    /// * `scores` - Sample of primary scores
    /// * `fraction` - Fraction of the highest scores used for the fit
    /// * `min_sample_size` - Minimum number of scores for the fit
    ///
    pub fn estimate(
        scores: &[f64],
        fraction: f64,
        min_sample_size: usize,
    ) -> Result<Self, SearchError> {
        let mut sorted: Vec<f64> = scores.iter().copied().filter(|score| score.is_finite()).collect();
        sorted.sort_by(|a, b| b.total_cmp(a));
        let total = sorted.len();
        let fit_count = ((fraction * total as f64).ceil() as usize).min(total);
        // a line needs at least 3 points to have a meaningful correlation
        let required = min_sample_size.max(3);
        if fit_count < required {
            return Err(SearchError::CalibrationUnderflow(fit_count, required));
        }
        let fit_scores = &sorted[..fit_count];

        // survival based y values are independent of the shift
        let y: Vec<f64> = (0..fit_count)
            .map(|idx| {
                let survival = (idx as f64 + 0.3) / (total as f64 + 0.4);
                (-survival.ln()).ln()
            })
            .collect();

        let min_fit_score = fit_scores[fit_count - 1];
        // shift has to move the lowest fitted score above zero
        let mut shift = (-min_fit_score + SHIFT_STEP).max(-MAX_SHIFT);
        let mut best: Option<Self> = None;
        while shift <= MAX_SHIFT {
            if let Some((eta, beta, correlation)) = Self::fit_two_parameters(fit_scores, &y, shift) {
                if best.map_or(true, |best| correlation > best.correlation) {
                    best = Some(Self::new(eta, beta, shift, correlation));
                }
            }
            shift += SHIFT_STEP;
        }

        match best {
            Some(parameters) => {
                debug!(
                    "Weibull fit: eta = {}, beta = {}, shift = {}, correlation = {}",
                    parameters.eta, parameters.beta, parameters.shift, parameters.correlation
                );
                Ok(parameters)
            }
            // degenerate sample, e.g. all scores equal or too far below zero
            None => Err(SearchError::CalibrationUnderflow(0, required)),
        }
    }

    /// Least squares fit for a fixed shift, returns (eta, beta, correlation).
    /// Scores not above zero after shifting are skipped.
    fn fit_two_parameters(scores: &[f64], y: &[f64], shift: f64) -> Option<(f64, f64, f64)> {
        let points: Vec<(f64, f64)> = scores
            .iter()
            .zip(y.iter())
            .filter(|(score, _)| **score + shift > 0.0)
            .map(|(score, y)| ((score + shift).ln(), *y))
            .collect();
        if points.len() < 3 {
            return None;
        }
        let n = points.len() as f64;
        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
        let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
        for (x, y) in points.iter() {
            sxx += (x - mean_x).powi(2);
            syy += (y - mean_y).powi(2);
            sxy += (x - mean_x) * (y - mean_y);
        }
        if sxx <= f64::EPSILON || syy <= f64::EPSILON {
            return None;
        }
        let beta = sxy / sxx;
        if beta <= 0.0 {
            return None;
        }
        let intercept = mean_y - beta * mean_x;
        let eta = (-intercept / beta).exp();
        let correlation = sxy / (sxx * syy).sqrt();
        if !eta.is_finite() || !correlation.is_finite() {
            return None;
        }
        Some((eta, beta, correlation))
    }

    /// Survival function of the fitted distribution at the given score
    ///
    pub fn p_value(&self, score: f64) -> f64 {
        let shifted = score + self.shift;
        if shifted <= 0.0 {
            return 1.0;
        }
        (-(shifted / self.eta).powf(self.beta)).exp()
    }

    pub fn get_eta(&self) -> f64 {
        self.eta
    }

    pub fn get_beta(&self) -> f64 {
        self.beta
    }

    pub fn get_shift(&self) -> f64 {
        self.shift
    }

    pub fn get_correlation(&self) -> f64 {
        self.correlation
    }
}
