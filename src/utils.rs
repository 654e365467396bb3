//! Helper functions for sampling, summary statistics and csv input/output.
use crate::errors::FitError;
use rand::distributions::Uniform;
use rand::Rng;
use rand_distr::{Distribution, Pareto};
use serde::Serialize;

/// Number of values drawn by a resample of `fraction` times `len`, rounded half to even.
pub fn resample_len(len: usize, fraction: f64) -> usize {
    (fraction * len as f64).round_ties_even() as usize
}

/// Bootstrap a synthetic dataset from observed samples.
///  - `obs` is a reference to a slice of f64 values.
///  - `fraction` scales the length of the resample relative to `obs`.
///  - Draws with replacement, so values of `obs` may repeat or be absent in the result.
pub fn resample<R: Rng + ?Sized>(obs: &[f64], fraction: f64, rng: &mut R) -> Vec<f64> {
    let ln = resample_len(obs.len(), fraction);
    if obs.is_empty() {
        return Vec::new();
    }
    let pick = Uniform::from(0..obs.len());
    let mut boot: Vec<f64> = Vec::with_capacity(ln);
    for _ in 0..ln {
        boot.push(obs[rng.sample(pick)]);
    }
    boot
}

/// Draw `n` values from a continuous power law with density proportional to `x^-exponent` above `x_min`.
/// Used to build synthetic datasets of known exponent.
pub fn pareto<R: Rng + ?Sized>(
    x_min: f64,
    exponent: f64,
    n: usize,
    rng: &mut R,
) -> Result<Vec<f64>, FitError> {
    let dist = Pareto::new(x_min, exponent - 1.0).map_err(|_| FitError::InvalidParameter("exponent"))?;
    Ok(dist.sample_iter(rng).take(n).collect())
}

/// Check that `obs` is nonempty and holds only positive, finite values.
pub fn validate(obs: &[f64]) -> Result<(), FitError> {
    if obs.is_empty() {
        return Err(FitError::EmptyDataset);
    }
    if obs.iter().any(|x| !x.is_finite() || *x <= 0.0) {
        return Err(FitError::InvalidData);
    }
    Ok(())
}

/// Calculate the mean of a slice of f64 values.
///  - `numbers` is a reference to a slice of f64 values.
///  - Returns the mean of `numbers`.
///
/// # Examples
///
/// ```rust
/// let numbers = vec![1.0, 1.5, 2.0, 2.5, 3.0];
/// let mn = powerlaws::utils::mean(&numbers);
/// assert_eq!(2.0, mn);
/// ```
pub fn mean(numbers: &[f64]) -> f64 {
    let sum: f64 = numbers.iter().sum();

    sum / numbers.len() as f64
}

/// Calculate the median of a sorted slice of f64 values.
///  - `numbers` is a reference to a slice of f64 values in ascending order.
///  - Returns the median of `numbers`.
///
/// # Examples
///
/// ```rust
/// let numbers = vec![1.0, 3.0, 7.0, 10.0];
/// let med = powerlaws::utils::median(&numbers);
/// assert_eq!(5.0, med);
/// ```
pub fn median(numbers: &[f64]) -> f64 {
    let len = numbers.len();
    let mid = len / 2;
    if len == 0 {
        f64::NAN
    } else if len % 2 == 0 {
        mean(&numbers[(mid - 1)..(mid + 1)])
    } else {
        numbers[mid]
    }
}

/// Geometric mean of positive values, taken in base 10.
///
/// # Examples
///
/// ```rust
/// let numbers = vec![1.0, 10.0, 100.0];
/// let g = powerlaws::utils::geometric_mean(&numbers);
/// assert!((g - 10.0).abs() < 1e-12);
/// ```
pub fn geometric_mean(numbers: &[f64]) -> f64 {
    let logs: Vec<f64> = numbers.iter().map(|x| x.log10()).collect();
    10f64.powf(mean(&logs))
}

/// Value at quantile `q` of an ascending slice, interpolating linearly between closest ranks.
///
/// # Examples
///
/// ```rust
/// let numbers = vec![1.0, 2.0, 3.0, 4.0];
/// assert_eq!(powerlaws::utils::quantile(&numbers, 0.5), 2.5);
/// assert_eq!(powerlaws::utils::quantile(&numbers, 1.0), 4.0);
/// ```
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let rank = q.max(0.0).min(1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Sorted, deduplicated values present in both `a` and `b`.
///
/// # Examples
///
/// ```rust
/// let a = vec![5.0, 1.0, 3.0, 3.0];
/// let b = vec![3.0, 4.0, 5.0, 3.0];
/// assert_eq!(powerlaws::utils::intersect(&a, &b), vec![3.0, 5.0]);
/// ```
pub fn intersect(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut sb = b.to_vec();
    sb.sort_by(|x, y| x.total_cmp(y));
    let mut shared: Vec<f64> = a
        .iter()
        .cloned()
        .filter(|x| sb.binary_search_by(|y| y.total_cmp(x)).is_ok())
        .collect();
    shared.sort_by(|x, y| x.total_cmp(y));
    shared.dedup();
    shared
}

/// Ordinary least squares line through `(x, y)`.
///  - Returns `(slope, intercept)`, or None when fewer than two points are given or `x` has no spread.
pub fn least_squares(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let mx = mean(&x[..n]);
    let my = mean(&y[..n]);
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for i in 0..n {
        let dx = x[i] - mx;
        sxx += dx * dx;
        sxy += dx * (y[i] - my);
    }
    if sxx == 0.0 || !sxx.is_finite() {
        return None;
    }
    let slope = sxy / sxx;
    Some((slope, my - slope * mx))
}

/// Read the column named `column` from a csv file with a header row.
pub fn read_column(path: &str, column: &str) -> Result<Vec<f64>, FitError> {
    let mut rdr = csv::Reader::from_path(path)?;
    let idx = rdr
        .headers()?
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| FitError::MissingColumn(column.to_string()))?;
    let mut dat = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let field = row.get(idx).ok_or(FitError::InvalidData)?;
        dat.push(field.trim().parse::<f64>()?);
    }
    Ok(dat)
}

/// Write statistical results to csv file.
pub fn record<T: Serialize>(rec: &[T], path: &str) -> Result<(), FitError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for i in rec {
        wtr.serialize(i)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn resample_draws_from_observations() {
        let obs = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let mut rng = StdRng::seed_from_u64(7);
        let boot = resample(&obs, 1.0, &mut rng);
        assert_eq!(boot.len(), obs.len());
        assert!(boot.iter().all(|x| obs.contains(x)));
        assert_eq!(resample(&obs, 0.8, &mut rng).len(), 4);
    }

    #[test]
    fn resample_len_rounds_half_to_even() {
        assert_eq!(resample_len(5, 0.5), 2);
        assert_eq!(resample_len(7, 0.5), 4);
        assert_eq!(resample_len(10, 0.8), 8);
    }

    #[test]
    fn validate_rejects_bad_data() {
        assert_eq!(validate(&[]), Err(FitError::EmptyDataset));
        assert_eq!(validate(&[1.0, 0.0]), Err(FitError::InvalidData));
        assert_eq!(validate(&[1.0, f64::NAN]), Err(FitError::InvalidData));
        assert!(validate(&[0.5, 2.0]).is_ok());
    }

    #[test]
    fn least_squares_recovers_line() {
        let x = vec![0.0, 1.0, 2.0, 3.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v - 1.0).collect();
        let (slope, intercept) = least_squares(&x, &y).unwrap();
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept + 1.0).abs() < 1e-12);
        assert!(least_squares(&[1.0], &[1.0]).is_none());
        assert!(least_squares(&[2.0, 2.0], &[1.0, 3.0]).is_none());
    }

    #[test]
    fn pareto_stays_above_minimum() {
        let mut rng = StdRng::seed_from_u64(11);
        let draws = pareto(2.0, 2.5, 500, &mut rng).unwrap();
        assert_eq!(draws.len(), 500);
        assert!(draws.iter().all(|x| *x >= 2.0));
        assert!(pareto(1.0, 1.0, 10, &mut rng).is_err());
    }

    #[test]
    fn column_round_trips_through_csv() {
        let path = std::env::temp_dir().join("powerlaws_read_column.csv");
        let path = path.to_str().unwrap();
        std::fs::write(path, "Year,Ranked km2\n1990,0.5\n1991,12.25\n").unwrap();
        assert_eq!(read_column(path, "Ranked km2").unwrap(), vec![0.5, 12.25]);
        assert_eq!(
            read_column(path, "Acres"),
            Err(FitError::MissingColumn("Acres".to_string()))
        );
        std::fs::remove_file(path).unwrap();
    }
}
