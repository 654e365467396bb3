//! Bootstrap Kolmogorov-Smirnov test of a log-log power-law fit.
//!
//! Each trial resamples the observed event sizes with replacement and fits a power law to
//! the rank CDF of both the observed and the resampled data, using only the sizes the two
//! share.  Event sizes are discrete, so a CDF comparison is only meaningful at values that
//! occur in both datasets.  The trial statistic is the largest paired gap between each
//! dataset's ranks and its own fit, see [`gof::ks_threshold`].
//!
//! Trial `i` draws from its own generator seeded with `seed + i`, so [`KsBootstrap::run`] and
//! [`KsBootstrap::run_par`] give the same trials for the same seed.
use crate::errors::FitError;
use crate::gof;
use crate::power_law::PowerLaw;
use crate::rank::{RankCdf, TieRule};
use crate::summary::KsSummary;
use crate::utils;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

/// What a run does when a trial fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    /// Log the failure, count the trial as skipped and continue.  Reduces the effective number of trials.
    Skip,
    /// Stop the run and return the error.
    Abort,
}

/// Holder struct for the outcome of one bootstrap trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trial {
    /// Index of the trial within the run.
    pub trial: usize,
    /// Paired KS distance, never negative.
    pub distance: f64,
    /// Number of shared support points.
    pub shared: usize,
    /// Coefficient fit to the observed ranks.
    pub real_coefficient: f64,
    /// Exponent fit to the observed ranks.
    pub real_exponent: f64,
    /// Coefficient fit to the resampled ranks.
    pub resampled_coefficient: f64,
    /// Exponent fit to the resampled ranks.
    pub resampled_exponent: f64,
}

/// Fits and distance from comparing one dataset against another on their shared support.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Sorted values present in both datasets.
    pub support: Vec<f64>,
    /// Power law fit to the observed ranks.
    pub real_fit: PowerLaw,
    /// Power law fit to the resampled ranks.
    pub resampled_fit: PowerLaw,
    /// Paired KS distance.
    pub distance: f64,
}

/// Compare the log-log fits of `real` and `resampled` on the values they share.
///  - `cutoff` is the leading fraction of support points left out of the distance.
///  - `ties` picks the rank of repeated values.
pub fn compare(
    real: &[f64],
    resampled: &[f64],
    cutoff: f64,
    ties: TieRule,
) -> Result<Comparison, FitError> {
    let support = utils::intersect(real, resampled);
    let retained = support.len() - gof::skipped(support.len(), cutoff);
    if retained < 2 {
        return Err(FitError::InsufficientOverlap {
            shared: support.len(),
            retained,
        });
    }

    let real_rank = RankCdf::new(real, ties).normalized(&support)?;
    let resampled_rank = RankCdf::new(resampled, ties).normalized(&support)?;

    let real_fit = PowerLaw::fit_log_log(&support, &real_rank)?;
    let resampled_fit = PowerLaw::fit_log_log(&support, &resampled_rank)?;

    let log10 = |v: &[f64]| v.iter().map(|x| x.log10()).collect::<Vec<f64>>();
    let real_curve: Vec<f64> = support.iter().map(|x| real_fit.log_evaluate(*x)).collect();
    let resampled_curve: Vec<f64> = support
        .iter()
        .map(|x| resampled_fit.log_evaluate(*x))
        .collect();

    let distance = gof::ks_threshold(
        &log10(&real_rank),
        &log10(&resampled_rank),
        &real_curve,
        &resampled_curve,
        cutoff,
    )?;

    Ok(Comparison {
        support,
        real_fit,
        resampled_fit,
        distance,
    })
}

/// Parameters of a bootstrap KS test.  Build using a builder pattern starting from [new](#method.new).
///
/// # Examples
///
/// ```
/// use powerlaws::prelude::*;
///
/// let areas = vec![1.0, 2.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0, 34.0, 55.0, 89.0, 144.0];
/// let ks = KsBootstrap::new()
///     .trials(50)
///     .fraction(1.0)?
///     .seed(7)
///     .on_failure(OnFailure::Skip);
/// let run = ks.run(&areas)?;
/// assert_eq!(run.trials.len() + run.skipped, 50);
/// # Ok::<(), FitError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KsBootstrap {
    trials: usize,
    fraction: f64,
    cutoff: f64,
    ties: TieRule,
    seed: Option<u64>,
    on_failure: OnFailure,
}

impl Default for KsBootstrap {
    fn default() -> Self {
        KsBootstrap::new()
    }
}

impl KsBootstrap {
    /// Test with 1000 trials of full-length resamples, a 10% cutoff, first-occurrence ranks,
    /// no fixed seed and failed trials skipped.
    pub fn new() -> Self {
        KsBootstrap {
            trials: 1000,
            fraction: 1.0,
            cutoff: 0.1,
            ties: TieRule::First,
            seed: None,
            on_failure: OnFailure::Skip,
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

    /// Leading fraction of shared support points left out of each distance, in `[0, 1)`.
    pub fn cutoff(mut self, cutoff: f64) -> Result<Self, FitError> {
        if !(0.0..1.0).contains(&cutoff) {
            return Err(FitError::InvalidParameter("cutoff"));
        }
        self.cutoff = cutoff;
        Ok(self)
    }

    /// Rank assigned to repeated values.
    pub fn ties(mut self, ties: TieRule) -> Self {
        self.ties = ties;
        self
    }

    /// Seed for reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Policy for failed trials.
    pub fn on_failure(mut self, on_failure: OnFailure) -> Self {
        self.on_failure = on_failure;
        self
    }

    /// Validate `obs` and set up an idle run over it.
    pub fn start<'a>(&self, obs: &'a [f64]) -> Result<BootstrapRun<'a>, FitError> {
        utils::validate(obs)?;
        let seed = self.seed.unwrap_or_else(|| thread_rng().gen());
        Ok(BootstrapRun {
            config: *self,
            obs,
            seed,
            state: RunState::Idle,
            trials: Vec::with_capacity(self.trials),
            skipped: 0,
        })
    }

    /// Run every trial in sequence.
    pub fn run(&self, obs: &[f64]) -> Result<KsRun, FitError> {
        self.start(obs)?.finish()
    }

    /// Run trials in parallel over the rayon thread pool.
    pub fn run_par(&self, obs: &[f64]) -> Result<KsRun, FitError> {
        utils::validate(obs)?;
        let seed = self.seed.unwrap_or_else(|| thread_rng().gen());
        info!("Running {} KS trials in parallel, seed {}.", self.trials, seed);
        let outcomes: Vec<Result<Trial, FitError>> = (0..self.trials)
            .into_par_iter()
            .map(|i| self.trial(obs, seed, i))
            .collect();
        let mut trials = Vec::with_capacity(self.trials);
        let mut skipped = 0;
        for (i, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(trial) => trials.push(trial),
                Err(e) => {
                    self.fail(i, e)?;
                    skipped += 1;
                }
            }
        }
        let run = KsRun {
            trials,
            skipped,
            seed,
        };
        run.report();
        Ok(run)
    }

    fn trial(&self, obs: &[f64], seed: u64, i: usize) -> Result<Trial, FitError> {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
        let boot = utils::resample(obs, self.fraction, &mut rng);
        let cmp = compare(obs, &boot, self.cutoff, self.ties)?;
        debug!(
            "Trial {}: {} shared sizes, distance {:.5}.",
            i,
            cmp.support.len(),
            cmp.distance
        );
        Ok(Trial {
            trial: i,
            distance: cmp.distance,
            shared: cmp.support.len(),
            real_coefficient: cmp.real_fit.coefficient,
            real_exponent: cmp.real_fit.exponent,
            resampled_coefficient: cmp.resampled_fit.coefficient,
            resampled_exponent: cmp.resampled_fit.exponent,
        })
    }

    fn fail(&self, i: usize, e: FitError) -> Result<(), FitError> {
        match self.on_failure {
            OnFailure::Skip => {
                warn!("Skipping trial {}: {}", i, e);
                Ok(())
            }
            OnFailure::Abort => Err(e),
        }
    }
}

/// Progress of a bootstrap run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No trial has started.
    Idle,
    /// Trials below `trial` are done, `trial` runs next.
    Running {
        /// Index of the next trial.
        trial: usize,
    },
    /// All trials are done.
    Completed,
}

/// A bootstrap run in progress, advanced one trial at a time by [step](#method.step).
#[derive(Debug, Clone)]
pub struct BootstrapRun<'a> {
    config: KsBootstrap,
    obs: &'a [f64],
    seed: u64,
    state: RunState,
    trials: Vec<Trial>,
    skipped: usize,
}

impl<'a> BootstrapRun<'a> {
    /// Current state of the run.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Seed of the run, drawn at random unless the test fixed one.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run the next trial and return the new state.
    /// Under [`OnFailure::Abort`] a failed trial returns its error and leaves the state unchanged.
    pub fn step(&mut self) -> Result<RunState, FitError> {
        let i = match self.state {
            RunState::Idle => {
                info!(
                    "Running {} KS trials on {} events, seed {}.",
                    self.config.trials,
                    self.obs.len(),
                    self.seed
                );
                0
            }
            RunState::Running { trial } => trial,
            RunState::Completed => return Ok(RunState::Completed),
        };
        if i < self.config.trials {
            match self.config.trial(self.obs, self.seed, i) {
                Ok(trial) => self.trials.push(trial),
                Err(e) => {
                    self.config.fail(i, e)?;
                    self.skipped += 1;
                }
            }
        }
        self.state = if i + 1 >= self.config.trials {
            RunState::Completed
        } else {
            RunState::Running { trial: i + 1 }
        };
        Ok(self.state)
    }

    /// Run any remaining trials and return the results.
    pub fn finish(mut self) -> Result<KsRun, FitError> {
        while self.step()? != RunState::Completed {}
        let run = KsRun {
            trials: self.trials,
            skipped: self.skipped,
            seed: self.seed,
        };
        run.report();
        Ok(run)
    }
}

/// Results of a completed bootstrap run, in trial order.
#[derive(Debug, Clone, PartialEq)]
pub struct KsRun {
    /// Trials that completed.
    pub trials: Vec<Trial>,
    /// Number of trials skipped after failing.
    pub skipped: usize,
    /// Seed the run started from.
    pub seed: u64,
}

impl KsRun {
    /// KS distance of each completed trial.
    pub fn distances(&self) -> Vec<f64> {
        self.trials.iter().map(|t| t.distance).collect()
    }

    /// Sort the distances and split them at the 5th percentile.
    pub fn summary(&self) -> Result<KsSummary, FitError> {
        let summary = KsSummary::new(self.distances())?;
        info!(
            "KS threshold {:.5} from {} trials, median distance {:.5}.",
            summary.threshold(),
            summary.len(),
            summary.median()
        );
        Ok(summary)
    }

    fn report(&self) {
        info!(
            "Completed {} KS trials, skipped {}.",
            self.trials.len(),
            self.skipped
        );
    }
}
