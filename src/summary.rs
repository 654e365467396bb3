//! Empirical confidence threshold from sorted bootstrap distances.
use crate::errors::FitError;
use crate::utils;

/// Sorted KS distances of a bootstrap run, split at the 5th percentile.
///
/// Distances below the split are implausibly good fits under the null hypothesis and form the
/// rejected band; the upper 95% is the acceptance region.
#[derive(Debug, Clone, PartialEq)]
pub struct KsSummary {
    sorted: Vec<f64>,
    five_percent_index: usize,
}

impl KsSummary {
    /// Sort `distances` ascending and locate the 5th percentile.
    pub fn new(mut distances: Vec<f64>) -> Result<Self, FitError> {
        if distances.is_empty() {
            return Err(FitError::NoTrials);
        }
        distances.sort_by(|a, b| a.total_cmp(b));
        let five_percent_index = (distances.len() as f64 * 0.05).round_ties_even() as usize;
        Ok(KsSummary {
            sorted: distances,
            five_percent_index,
        })
    }

    /// Number of distances.
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Always false, a summary holds at least one distance.
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Distances in ascending order.
    pub fn sorted(&self) -> &[f64] {
        &self.sorted
    }

    /// Count of distances in the rejected band.
    pub fn five_percent_index(&self) -> usize {
        self.five_percent_index
    }

    /// Count of distances in the accepted band.
    pub fn ninety_five_percent_index(&self) -> usize {
        self.sorted.len() - self.five_percent_index
    }

    /// Lowest 5% of distances.
    pub fn rejected(&self) -> &[f64] {
        &self.sorted[..self.five_percent_index]
    }

    /// Upper 95% of distances.
    pub fn accepted(&self) -> &[f64] {
        &self.sorted[self.five_percent_index..]
    }

    /// Smallest distance in the accepted band.
    pub fn threshold(&self) -> f64 {
        self.sorted[self.five_percent_index.min(self.sorted.len() - 1)]
    }

    /// Median distance.
    pub fn median(&self) -> f64 {
        utils::median(&self.sorted)
    }
}
