//! Power-law parameter estimates with bootstrap spread.
//!
//! Each trial resamples a fraction of the events and estimates the power law two ways: a least
//! squares line through log-binned event frequencies, and the maximum likelihood estimator of
//! Deluca & Corral (2013).  The spread of each parameter across trials gives a confidence range.
use crate::errors::FitError;
use crate::gof;
use crate::power_law::PowerLaw;
use crate::utils;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;

/// Widening applied to the outer bin edges so the extreme events fall inside.
const EDGE_PAD: f64 = 1e-6;

/// Event frequencies in bins of equal count on a log scale.
#[derive(Debug, Clone, PartialEq)]
pub struct LogBins {
    /// Bin edges, ascending; bin `k` is `[edges[k], edges[k + 1])`.
    pub edges: Vec<f64>,
    /// Number of events in each bin.
    pub counts: Vec<usize>,
    /// Events per unit size per year in each bin.
    pub frequency: Vec<f64>,
    /// Arithmetic midpoint of each bin.
    pub midpoints: Vec<f64>,
}

impl LogBins {
    /// Bin `sample` at the quantiles of its base 10 logarithm.
    ///  - `bins` is the number of quantile bins requested; repeated edges are merged, so fewer may result.
    ///  - `years` is the span of the record, dividing every frequency.
    pub fn new(sample: &[f64], bins: usize, years: f64) -> Result<Self, FitError> {
        utils::validate(sample)?;
        if bins == 0 {
            return Err(FitError::InvalidParameter("bins"));
        }
        let mut sorted = sample.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let logs: Vec<f64> = sorted.iter().map(|x| x.log10()).collect();

        let mut edges: Vec<f64> = (0..=bins)
            .map(|k| utils::quantile(&logs, k as f64 / bins as f64))
            .collect();
        edges.dedup();
        if edges.len() < 2 {
            return Err(FitError::DegenerateFit);
        }
        let mut edges: Vec<f64> = edges.iter().map(|e| 10f64.powf(*e)).collect();
        edges[0] -= EDGE_PAD;
        let last = edges.len() - 1;
        edges[last] += EDGE_PAD;

        let mut counts = Vec::with_capacity(last);
        let mut frequency = Vec::with_capacity(last);
        let mut midpoints = Vec::with_capacity(last);
        for w in edges.windows(2) {
            let count = sorted.partition_point(|x| *x < w[1]) - sorted.partition_point(|x| *x < w[0]);
            counts.push(count);
            frequency.push(count as f64 / (w[1] - w[0]) / years);
            midpoints.push((w[0] + w[1]) / 2.0);
        }

        Ok(LogBins {
            edges,
            counts,
            frequency,
            midpoints,
        })
    }

    /// Least squares power law through the log frequencies of the nonempty bins.
    pub fn fit(&self) -> Result<LlsFit, FitError> {
        let (mid, freq): (Vec<f64>, Vec<f64>) = self
            .midpoints
            .iter()
            .zip(&self.frequency)
            .filter(|(_, f)| **f > 0.0)
            .map(|(m, f)| (*m, *f))
            .unzip();
        let law = PowerLaw::fit_log_log(&mid, &freq)?;
        let observed: Vec<f64> = freq.iter().map(|f| f.log10()).collect();
        let fitted: Vec<f64> = mid.iter().map(|m| law.log_evaluate(*m)).collect();
        let r_squared = gof::r_squared(&observed, utils::mean(&observed), &fitted).ok();
        let ks = gof::ks_distance(&observed, &fitted, 0.1).ok();
        Ok(LlsFit { law, r_squared, ks })
    }
}

/// Least squares power law with its fit statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LlsFit {
    /// Fitted power law.
    pub law: PowerLaw,
    /// Coefficient of determination in log space, None when the log frequencies are all equal.
    pub r_squared: Option<f64>,
    /// KS distance in log space past the leading 10% of bins.
    pub ks: Option<f64>,
}

/// Estimates from one trial.  Either estimator may fail on a given resample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Maximum likelihood power law.
    pub mle: Option<PowerLaw>,
    /// Least squares power law on log-binned frequencies.
    pub lls: Option<LlsFit>,
}

/// Flat record of an [`Estimate`] for csv output, missing estimates left blank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EstimateRow {
    mle_exponent: Option<f64>,
    mle_coefficient: Option<f64>,
    lls_exponent: Option<f64>,
    lls_coefficient: Option<f64>,
    lls_r_squared: Option<f64>,
    lls_ks: Option<f64>,
}

impl From<&Estimate> for EstimateRow {
    fn from(est: &Estimate) -> Self {
        EstimateRow {
            mle_exponent: est.mle.map(|l| l.exponent),
            mle_coefficient: est.mle.map(|l| l.coefficient),
            lls_exponent: est.lls.map(|l| l.law.exponent),
            lls_coefficient: est.lls.map(|l| l.law.coefficient),
            lls_r_squared: est.lls.and_then(|l| l.r_squared),
            lls_ks: est.lls.and_then(|l| l.ks),
        }
    }
}

/// Parameters of the bootstrap estimate.  Build using a builder pattern starting from [new](#method.new).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLawFits {
    trials: usize,
    fraction: f64,
    bins: usize,
    years: f64,
    seed: Option<u64>,
}

impl Default for PowerLawFits {
    fn default() -> Self {
        PowerLawFits::new()
    }
}

impl PowerLawFits {
    /// 1000 trials on resamples of 80% of the events, 15 log bins over 30 years of record.
    pub fn new() -> Self {
        PowerLawFits {
            trials: 1000,
            fraction: 0.8,
            bins: 15,
            years: 30.0,
            seed: None,
        }
    }

    /// Number of resampling trials.
    pub fn trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Length of each resample as a fraction of the observed data.  Must be positive.
    pub fn fraction(mut self, fraction: f64) -> Result<Self, FitError> {
        if !(fraction > 0.0 && fraction.is_finite()) {
            return Err(FitError::InvalidParameter("fraction"));
        }
        self.fraction = fraction;
        Ok(self)
    }

    /// Number of log bins for the frequency estimate.
    pub fn bins(mut self, bins: usize) -> Result<Self, FitError> {
        if bins == 0 {
            return Err(FitError::InvalidParameter("bins"));
        }
        self.bins = bins;
        Ok(self)
    }

    /// Years spanned by the record, normalizing frequencies to events per year.
    pub fn years(mut self, years: f64) -> Result<Self, FitError> {
        if !(years > 0.0 && years.is_finite()) {
            return Err(FitError::InvalidParameter("years"));
        }
        self.years = years;
        Ok(self)
    }

    /// Seed for reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Estimate both power laws on one resample of `obs`.
    pub fn estimate<R: Rng + ?Sized>(&self, obs: &[f64], rng: &mut R) -> Estimate {
        let sample = utils::resample(obs, self.fraction, rng);
        let mle = PowerLaw::mle(&sample)
            .map_err(|e| debug!("MLE failed: {}", e))
            .ok();
        let lls = LogBins::new(&sample, self.bins, self.years)
            .and_then(|b| b.fit())
            .map_err(|e| debug!("LLS failed: {}", e))
            .ok();
        Estimate { mle, lls }
    }

    /// Run every trial over the rayon thread pool, in trial order.
    /// Trial `i` draws from a generator seeded with `seed + i`.
    pub fn run(&self, obs: &[f64]) -> Result<Vec<Estimate>, FitError> {
        utils::validate(obs)?;
        let seed = self.seed.unwrap_or_else(|| thread_rng().gen());
        info!(
            "Estimating power laws over {} trials on {} events, seed {}.",
            self.trials,
            obs.len(),
            seed
        );
        let estimates: Vec<Estimate> = (0..self.trials)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
                self.estimate(obs, &mut rng)
            })
            .collect();
        Ok(estimates)
    }
}

/// Average, maximum and minimum of one parameter across trials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spread {
    /// Mean value.
    pub average: f64,
    /// Largest value.
    pub max: f64,
    /// Smallest value.
    pub min: f64,
    /// Number of trials contributing.
    pub count: usize,
}

impl Spread {
    /// Spread of the finite values in `values`, None if there are none.
    pub fn new<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let vals: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        if vals.is_empty() {
            return None;
        }
        Some(Spread {
            average: utils::mean(&vals),
            max: vals.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            min: vals.iter().cloned().fold(f64::INFINITY, f64::min),
            count: vals.len(),
        })
    }
}

/// Spread of all four parameters across a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSummary {
    /// Maximum likelihood exponent.
    pub mle_exponent: Option<Spread>,
    /// Maximum likelihood coefficient.
    pub mle_coefficient: Option<Spread>,
    /// Least squares exponent.
    pub lls_exponent: Option<Spread>,
    /// Least squares coefficient.
    pub lls_coefficient: Option<Spread>,
}

impl FitSummary {
    /// Summarize the estimates of a run, ignoring trials where an estimator failed.
    pub fn new(estimates: &[Estimate]) -> Self {
        let mle: Vec<PowerLaw> = estimates.iter().filter_map(|e| e.mle).collect();
        let lls: Vec<PowerLaw> = estimates.iter().filter_map(|e| e.lls.map(|l| l.law)).collect();
        FitSummary {
            mle_exponent: Spread::new(mle.iter().map(|l| l.exponent)),
            mle_coefficient: Spread::new(mle.iter().map(|l| l.coefficient)),
            lls_exponent: Spread::new(lls.iter().map(|l| l.exponent)),
            lls_coefficient: Spread::new(lls.iter().map(|l| l.coefficient)),
        }
    }
}

impl fmt::Display for FitSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rows = [
            ("MLE exponent", self.mle_exponent),
            ("MLE coefficient", self.mle_coefficient),
            ("LLS exponent", self.lls_exponent),
            ("LLS coefficient", self.lls_coefficient),
        ];
        for (name, spread) in rows.iter() {
            match spread {
                Some(s) => writeln!(
                    f,
                    "{:<16} average: {:.6}  max: {:.6}  min: {:.6}  ({} trials)",
                    name, s.average, s.max, s.min, s.count
                )?,
                None => writeln!(f, "{:<16} no estimates", name)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        utils::pareto(0.5, 2.0, n, &mut rng).unwrap()
    }

    #[test]
    fn bins_hold_every_event() {
        let sample = events(2000, 1);
        let bins = LogBins::new(&sample, 15, 30.0).unwrap();
        assert_eq!(bins.edges.len(), 16);
        assert_eq!(bins.counts.iter().sum::<usize>(), sample.len());
        assert!(bins.edges.windows(2).all(|w| w[0] < w[1]));
        assert!(bins.counts.iter().all(|c| *c > 0));
        for k in 0..bins.counts.len() {
            let width = bins.edges[k + 1] - bins.edges[k];
            let expect = bins.counts[k] as f64 / width / 30.0;
            assert!((bins.frequency[k] - expect).abs() < 1e-12 * expect.max(1.0));
            assert!(bins.midpoints[k] > bins.edges[k] && bins.midpoints[k] < bins.edges[k + 1]);
        }
    }

    #[test]
    fn repeated_values_merge_bins() {
        let sample = vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 10.0, 100.0];
        let bins = LogBins::new(&sample, 4, 1.0).unwrap();
        assert!(bins.edges.len() < 5);
        assert_eq!(bins.counts.iter().sum::<usize>(), sample.len());
        assert_eq!(
            LogBins::new(&[3.0, 3.0, 3.0], 15, 30.0),
            Err(FitError::DegenerateFit)
        );
    }

    #[test]
    fn binned_fit_tracks_density_decay() {
        // density falls as x^-2; arithmetic midpoints of the wide tail bins flatten the slope
        let sample = events(50_000, 2);
        let fit = LogBins::new(&sample, 15, 30.0).unwrap().fit().unwrap();
        assert!(
            fit.law.exponent > 1.0 && fit.law.exponent < 2.2,
            "exponent {}",
            fit.law.exponent
        );
        assert!(fit.r_squared.unwrap() > 0.95);
        assert!(fit.ks.unwrap() >= 0.0);
    }

    #[test]
    fn flat_frequencies_keep_their_fit() {
        let bins = LogBins {
            edges: vec![1.0, 2.0, 4.0, 8.0],
            counts: vec![1, 2, 4],
            frequency: vec![0.5, 0.5, 0.5],
            midpoints: vec![1.5, 3.0, 6.0],
        };
        let fit = bins.fit().unwrap();
        assert!(fit.law.exponent.abs() < 1e-12);
        assert!((fit.law.coefficient - 0.5).abs() < 1e-12);
        assert_eq!(fit.r_squared, None);
        assert!(fit.ks.unwrap() < 1e-12);

        let row = EstimateRow::from(&Estimate {
            mle: None,
            lls: Some(fit),
        });
        assert_eq!(row.lls_r_squared, None);
        assert!(row.lls_exponent.is_some());
        let summary = FitSummary::new(&[Estimate {
            mle: None,
            lls: Some(fit),
        }]);
        assert_eq!(summary.lls_exponent.map(|s| s.count), Some(1));
    }

    #[test]
    fn run_summarizes_both_estimators() {
        let obs = events(600, 3);
        let fits = PowerLawFits::new().trials(40).seed(12);
        let estimates = fits.run(&obs).unwrap();
        assert_eq!(estimates.len(), 40);
        assert_eq!(estimates, fits.run(&obs).unwrap());

        let summary = FitSummary::new(&estimates);
        let mle = summary.mle_exponent.unwrap();
        assert_eq!(mle.count, 40);
        assert!(mle.min <= mle.average && mle.average <= mle.max);
        assert!((mle.average - 2.0).abs() < 0.3);
        let lls = summary.lls_exponent.unwrap();
        assert!(lls.min <= lls.average && lls.average <= lls.max);

        let text = summary.to_string();
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with("MLE exponent"));
    }

    #[test]
    fn spread_ignores_missing_values() {
        let s = Spread::new(vec![1.0, f64::NAN, 3.0]).unwrap();
        assert_eq!(s.average, 2.0);
        assert_eq!(s.max, 3.0);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.count, 2);
        assert!(Spread::new(Vec::new()).is_none());

        let failed = Estimate {
            mle: None,
            lls: None,
        };
        let summary = FitSummary::new(&[failed]);
        assert!(summary.mle_exponent.is_none());
        assert!(summary.to_string().contains("no estimates"));
    }

    #[test]
    fn builder_rejects_bad_parameters() {
        assert!(PowerLawFits::new().bins(0).is_err());
        assert!(PowerLawFits::new().years(0.0).is_err());
        assert!(PowerLawFits::new().fraction(-0.8).is_err());
        assert_eq!(
            PowerLawFits::new().run(&[]),
            Err(FitError::EmptyDataset)
        );
    }
}
