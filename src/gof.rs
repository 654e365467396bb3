//! Goodness-of-fit statistics for log-transformed series.
//!
//! Both KS statistics ignore the leading `cutoff` fraction of points (rounded up), the
//! small-value edge of the distribution where few events fall.
use crate::errors::FitError;

/// Number of leading points dropped by a `cutoff` fraction of `n` points.
pub fn skipped(n: usize, cutoff: f64) -> usize {
    ((cutoff * n as f64).ceil() as usize).min(n)
}

/// Coefficient of determination of `fitted` against `observed`, over the full series.
///  - `mean` is the mean of `observed`.
pub fn r_squared(observed: &[f64], mean: f64, fitted: &[f64]) -> Result<f64, FitError> {
    let mut ss_tot = 0.0;
    let mut ss_res = 0.0;
    for (obs, fit) in observed.iter().zip(fitted) {
        ss_tot += (obs - mean).powi(2);
        ss_res += (obs - fit).powi(2);
    }
    if ss_tot == 0.0 || !ss_tot.is_finite() {
        return Err(FitError::DegenerateFit);
    }
    Ok(1.0 - ss_res / ss_tot)
}

/// Kolmogorov-Smirnov distance between an observed series and its fit.
/// Maximum absolute deviation past the cutoff.
pub fn ks_distance(observed: &[f64], fitted: &[f64], cutoff: f64) -> Result<f64, FitError> {
    let n = observed.len().min(fitted.len());
    let skip = skipped(n, cutoff);
    if n == skip {
        return Err(FitError::InsufficientOverlap {
            shared: n,
            retained: 0,
        });
    }
    Ok(observed[skip..n]
        .iter()
        .zip(&fitted[skip..n])
        .map(|(obs, fit)| (fit - obs).abs())
        .fold(0.0, f64::max))
}

/// Bootstrap threshold distance after Babu et al. (2004).
///
/// Compares how far the resampled ranks sit from their fit against how far the real ranks
/// sit from theirs, point by point along the shared support.  All four series are base 10
/// logarithms aligned on the same support values.
pub fn ks_threshold(
    real: &[f64],
    resampled: &[f64],
    real_fit: &[f64],
    resampled_fit: &[f64],
    cutoff: f64,
) -> Result<f64, FitError> {
    let n = real
        .len()
        .min(resampled.len())
        .min(real_fit.len())
        .min(resampled_fit.len());
    let skip = skipped(n, cutoff);
    if n - skip < 2 {
        return Err(FitError::InsufficientOverlap {
            shared: n,
            retained: n - skip,
        });
    }
    let mut ks = 0.0;
    for i in skip..n {
        let d = (resampled[i] - resampled_fit[i] - real[i] + real_fit[i]).abs();
        ks = f64::max(ks, d);
    }
    Ok(ks)
}
