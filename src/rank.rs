//! Empirical CDF ranks of a dataset at chosen support points.
use crate::errors::FitError;

/// Which position a repeated value takes in the sorted dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieRule {
    /// Position of the first occurrence.  Underestimates the CDF at repeated values.
    First,
    /// Position of the last occurrence, the exact empirical CDF.
    Last,
}

impl Default for TieRule {
    fn default() -> Self {
        TieRule::First
    }
}

/// Sorted copy of a dataset for rank lookups by binary search.
#[derive(Debug, Clone)]
pub struct RankCdf {
    sorted: Vec<f64>,
    rule: TieRule,
}

impl RankCdf {
    /// Sort a copy of `data` once for repeated lookups.
    pub fn new(data: &[f64], rule: TieRule) -> Self {
        let mut sorted = data.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        RankCdf { sorted, rule }
    }

    /// Number of values in the dataset.
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// True if the dataset holds no values.
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// 1-based position of `x` in the sorted dataset.
    pub fn rank(&self, x: f64) -> Result<usize, FitError> {
        let first = self.sorted.partition_point(|v| *v < x);
        if first == self.sorted.len() || self.sorted[first] != x {
            return Err(FitError::NotInSupport(x));
        }
        match self.rule {
            TieRule::First => Ok(first + 1),
            TieRule::Last => Ok(self.sorted.partition_point(|v| *v <= x)),
        }
    }

    /// Ranks of each value in `support`, divided by the dataset length.
    /// Every value of `support` must be present in the dataset.
    pub fn normalized(&self, support: &[f64]) -> Result<Vec<f64>, FitError> {
        let ln = self.sorted.len() as f64;
        support
            .iter()
            .map(|x| self.rank(*x).map(|r| r as f64 / ln))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: [f64; 8] = [13.0, 2.0, 1.0, 21.0, 2.0, 8.0, 3.0, 5.0];

    #[test]
    fn first_occurrence_ranks() {
        let cdf = RankCdf::new(&DATA, TieRule::First);
        assert_eq!(cdf.len(), 8);
        assert_eq!(cdf.rank(1.0), Ok(1));
        assert_eq!(cdf.rank(2.0), Ok(2));
        assert_eq!(cdf.rank(3.0), Ok(4));
        assert_eq!(cdf.rank(21.0), Ok(8));
    }

    #[test]
    fn last_occurrence_ranks() {
        let cdf = RankCdf::new(&DATA, TieRule::Last);
        assert_eq!(cdf.rank(2.0), Ok(3));
        assert_eq!(cdf.rank(3.0), Ok(4));
    }

    #[test]
    fn normalized_ranks_lie_in_unit_interval() {
        let support = vec![1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0];
        for rule in &[TieRule::First, TieRule::Last] {
            let ranks = RankCdf::new(&DATA, *rule).normalized(&support).unwrap();
            assert_eq!(ranks.len(), support.len());
            assert!(ranks.iter().all(|r| *r > 0.0 && *r <= 1.0));
            assert!(ranks.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(ranks[ranks.len() - 1], 1.0);
        }
        let first = RankCdf::new(&DATA, TieRule::First).normalized(&[2.0]).unwrap();
        assert_eq!(first, vec![0.25]);
    }

    #[test]
    fn missing_value_is_reported() {
        let cdf = RankCdf::new(&DATA, TieRule::First);
        assert_eq!(cdf.rank(4.0), Err(FitError::NotInSupport(4.0)));
        assert_eq!(cdf.rank(99.0), Err(FitError::NotInSupport(99.0)));
        assert!(cdf.normalized(&[1.0, 4.0]).is_err());
    }
}
