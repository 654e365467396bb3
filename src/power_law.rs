//! Power-law evaluation and the two estimators used on event-size data.
//!
//! Fits are carried out in log-log space, where a power law `c * x^(-b)` becomes the line
//! `log10(c) - b * log10(x)`.  A [`PowerLaw`] stores the exponent `b` as a positive number for a
//! decaying tail, which is the negated slope of the log-log line.
use crate::errors::FitError;
use crate::utils;
use serde::Serialize;

/// Power law function `coefficient * x^exponent`.
pub fn evaluate(coefficient: f64, exponent: f64, x: f64) -> f64 {
    coefficient * x.powf(exponent)
}

/// Logarithmic power law function `log10(coefficient) - exponent * log10(x)`.
pub fn log_evaluate(coefficient: f64, exponent: f64, x: f64) -> f64 {
    coefficient.log10() - exponent * x.log10()
}

/// Maximum likelihood exponent of a power law above `x_min`, after Deluca & Corral (2013).
///  - `geo_mean` is the geometric mean of the data.
///  - `x_min` is the minimum value of the data.
pub fn mle_beta(geo_mean: f64, x_min: f64) -> Result<f64, FitError> {
    if !(geo_mean > 0.0 && x_min > 0.0 && geo_mean.is_finite() && x_min.is_finite()) {
        return Err(FitError::InvalidMleInput);
    }
    let ln = (geo_mean / x_min).ln();
    if ln == 0.0 {
        return Err(FitError::InvalidMleInput);
    }
    Ok(1.0 + 1.0 / ln)
}

/// Maximum likelihood coefficient of a power law truncated to `[x_min, x_max]`, after Deluca & Corral (2013).
pub fn mle_alpha(beta: f64, x_min: f64, x_max: f64) -> Result<f64, FitError> {
    if beta == 1.0 || !beta.is_finite() || !(x_min > 0.0) || !(x_min < x_max) {
        return Err(FitError::InvalidMleInput);
    }
    let denom = x_min.powf(1.0 - beta) - x_max.powf(1.0 - beta);
    let alpha = x_max * ((beta - 1.0) / denom);
    if alpha.is_finite() {
        Ok(alpha)
    } else {
        Err(FitError::InvalidMleInput)
    }
}

/// Coefficient and (positive) exponent of a decaying power law.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerLaw {
    /// Multiplier `c` in `c * x^(-b)`.
    pub coefficient: f64,
    /// Decay exponent `b` in `c * x^(-b)`.
    pub exponent: f64,
}

impl PowerLaw {
    /// Create a power law from its coefficient and decay exponent.
    pub fn new(coefficient: f64, exponent: f64) -> Self {
        PowerLaw {
            coefficient,
            exponent,
        }
    }

    /// Value of the power law at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        evaluate(self.coefficient, -self.exponent, x)
    }

    /// Base 10 logarithm of the power law at `x`.
    pub fn log_evaluate(&self, x: f64) -> f64 {
        log_evaluate(self.coefficient, self.exponent, x)
    }

    /// Least squares line through `log10(y)` against `log10(x)`.
    /// The exponent is the negated slope and the coefficient is `10^intercept`.
    pub fn fit_log_log(x: &[f64], y: &[f64]) -> Result<Self, FitError> {
        if x.len() != y.len() {
            return Err(FitError::DegenerateFit);
        }
        let lx: Vec<f64> = x.iter().map(|v| v.log10()).collect();
        let ly: Vec<f64> = y.iter().map(|v| v.log10()).collect();
        if lx.iter().chain(ly.iter()).any(|v| !v.is_finite()) {
            return Err(FitError::DegenerateFit);
        }
        let (slope, intercept) = utils::least_squares(&lx, &ly).ok_or(FitError::DegenerateFit)?;
        let law = PowerLaw::new(10f64.powf(intercept), -slope);
        if law.coefficient.is_finite() && law.exponent.is_finite() {
            Ok(law)
        } else {
            Err(FitError::DegenerateFit)
        }
    }

    /// Maximum likelihood power law for a sample of positive values.
    /// Uses the sample minimum, maximum and geometric mean.
    pub fn mle(sample: &[f64]) -> Result<Self, FitError> {
        utils::validate(sample)?;
        let x_min = sample.iter().cloned().fold(f64::INFINITY, f64::min);
        let x_max = sample.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let beta = mle_beta(utils::geometric_mean(sample), x_min)?;
        let alpha = mle_alpha(beta, x_min, x_max)?;
        Ok(PowerLaw::new(alpha, beta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn log_and_linear_forms_agree() {
        for &(c, b) in &[(1.0, 0.5), (3.2, 1.7), (0.01, 2.4), (150.0, 0.9)] {
            let law = PowerLaw::new(c, b);
            for &x in &[0.001, 0.3, 1.0, 7.5, 1e4] {
                let diff = law.evaluate(x).log10() - law.log_evaluate(x);
                assert!(diff.abs() < 1e-9, "c={} b={} x={}", c, b, x);
                let free = evaluate(c, -b, x).log10() - log_evaluate(c, b, x);
                assert!(free.abs() < 1e-9);
            }
        }
    }

    #[test]
    fn mle_beta_matches_formula() {
        let beta = mle_beta(std::f64::consts::E, 1.0).unwrap();
        assert!((beta - 2.0).abs() < 1e-12);
        assert_eq!(mle_beta(2.0, 2.0), Err(FitError::InvalidMleInput));
        assert_eq!(mle_beta(2.0, 0.0), Err(FitError::InvalidMleInput));
    }

    #[test]
    fn mle_alpha_matches_formula() {
        // beta = 2: alpha = x_max / (1/x_min - 1/x_max)
        let alpha = mle_alpha(2.0, 1.0, 10.0).unwrap();
        assert!((alpha - 10.0 / 0.9).abs() < 1e-9);
        assert_eq!(mle_alpha(1.0, 1.0, 10.0), Err(FitError::InvalidMleInput));
        assert_eq!(mle_alpha(2.0, 10.0, 10.0), Err(FitError::InvalidMleInput));
        assert_eq!(mle_alpha(2.0, 10.0, 1.0), Err(FitError::InvalidMleInput));
    }

    #[test]
    fn log_log_fit_recovers_exact_law() {
        let truth = PowerLaw::new(4.0, 1.5);
        let x = vec![1.0, 2.0, 5.0, 10.0, 40.0, 100.0];
        let y: Vec<f64> = x.iter().map(|v| truth.evaluate(*v)).collect();
        let fit = PowerLaw::fit_log_log(&x, &y).unwrap();
        assert!((fit.exponent - 1.5).abs() < 1e-9);
        assert!((fit.coefficient - 4.0).abs() < 1e-9);
    }

    #[test]
    fn log_log_fit_rejects_degenerate_input() {
        assert_eq!(PowerLaw::fit_log_log(&[], &[]), Err(FitError::DegenerateFit));
        assert_eq!(PowerLaw::fit_log_log(&[3.0], &[0.5]), Err(FitError::DegenerateFit));
        assert_eq!(
            PowerLaw::fit_log_log(&[3.0, 3.0], &[0.5, 1.0]),
            Err(FitError::DegenerateFit)
        );
        assert_eq!(
            PowerLaw::fit_log_log(&[1.0, 2.0], &[0.0, 1.0]),
            Err(FitError::DegenerateFit)
        );
    }

    #[test]
    fn mle_rejects_constant_sample() {
        assert_eq!(PowerLaw::mle(&[4.0, 4.0, 4.0]), Err(FitError::InvalidMleInput));
        assert_eq!(PowerLaw::mle(&[]), Err(FitError::EmptyDataset));
    }

    #[test]
    fn mle_converges_to_true_exponent() {
        let mut rng = StdRng::seed_from_u64(2013);
        let truth = 2.5;
        let mut errors = Vec::new();
        for &n in &[500, 100_000] {
            let sample = utils::pareto(1.0, truth, n, &mut rng).unwrap();
            let law = PowerLaw::mle(&sample).unwrap();
            assert!(law.coefficient > 0.0);
            errors.push((law.exponent - truth).abs());
        }
        assert!(errors[0] < 0.3, "n=500 error {}", errors[0]);
        assert!(errors[1] < 0.03, "n=100000 error {}", errors[1]);
    }
}
