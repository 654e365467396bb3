/*!
* # Powerlaws - goodness-of-fit tests and parameter estimates for power-law event sizes.
* Natural hazards such as wildfires produce events whose sizes follow a power law over much of
* their range: the number of fires larger than a given burn area falls off as a power of that area.
* The functions in this crate estimate the power law from a record of event sizes and test whether
* a fitted power law is a plausible description of the record.
*
* Two procedures are included:
*
*  - A bootstrap Kolmogorov-Smirnov test after Babu et al. (2004).  Each trial resamples the record
*    with replacement, fits a power law to the rank CDF of both the record and the resample on the
*    sizes they share, and measures the largest paired gap between ranks and fit.  Sorting the trial
*    distances gives an empirical acceptance region above the 5th percentile.
*  - Bootstrap parameter estimates.  Each trial resamples 80% of the record and estimates the power
*    law by least squares on log-binned frequencies, and by maximum likelihood after
*    Deluca & Corral (2013).  The spread across trials bounds each parameter.
*
* ## Quick Start
*
* To use powerlaws, add it to your `Cargo.toml`
* ```toml
* [dependencies]
* powerlaws = "^0.1.0"
* ```
*
*  - Load the crate prelude in the preamble of your `main.rs`.
*  - Load burn areas from csv with [read_column](utils/fn.read_column.html), or simulate some:
* ```rust
* use powerlaws::prelude::*;
* use rand::SeedableRng;
*
* fn main() -> Result<(), FitError> {
*     // synthetic burn areas with density falling as x^-2.2 above 0.1 km2
*     let mut rng = rand::rngs::StdRng::seed_from_u64(1);
*     let areas: Vec<f64> = utils::pareto(0.1, 2.2, 300, &mut rng)?
*         .iter()
*         .map(|x| (x * 100.0).round() / 100.0)
*         .collect();
*
*     // bootstrap KS test, skipping trials whose resample shares too few sizes
*     let run = KsBootstrap::new()
*         .trials(100)
*         .seed(42)
*         .on_failure(OnFailure::Skip)
*         .run(&areas)?;
*     let summary = run.summary()?;
*     assert!(summary.threshold() >= 0.0);
*
*     // parameter estimates with bootstrap spread
*     let estimates = PowerLawFits::new().trials(100).seed(42).run(&areas)?;
*     println!("{}", FitSummary::new(&estimates));
*     Ok(())
* }
* ```
*/

#![warn(missing_docs)]
pub mod bootstrap;
pub mod errors;
pub mod fits;
pub mod gof;
pub mod plot;
pub mod power_law;
pub mod rank;
pub mod summary;
pub mod utils;

/// Commonly used types and modules.
pub mod prelude {
    pub use crate::bootstrap::{KsBootstrap, KsRun, OnFailure, RunState, Trial};
    pub use crate::errors::FitError;
    pub use crate::fits::{FitSummary, PowerLawFits};
    pub use crate::plot;
    pub use crate::power_law::PowerLaw;
    pub use crate::rank::TieRule;
    pub use crate::summary::KsSummary;
    pub use crate::utils;
}
