//! Descriptive statistics for a single sample.
//!
//! Reduces one sequence of observations (panel scores, replicate
//! measurements) to the summary figures shown next to every analysis.
//!
//! # Examples
//!
//! ```
//! use u_foodsci::descriptive::describe;
//!
//! let s = describe(&[7.0, 8.0, 6.0, 7.0]).unwrap();
//! assert_eq!(s.n, 4);
//! assert!((s.mean - 7.0).abs() < 1e-12);
//! assert!((s.variance.unwrap() - 2.0 / 3.0).abs() < 1e-12);
//! assert_eq!(s.median, 7.0);
//! ```

use serde::{Deserialize, Serialize};
use u_numflow::stats;

use crate::error::{AnalysisError, Result};

/// Summary statistics of one sample.
///
/// `variance`, `sd` and `se` use the Bessel-corrected (n-1) denominator
/// and are `None` for a single observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicStats {
    /// Number of observations.
    pub n: usize,
    /// Sum of observations.
    pub sum: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample variance Σ(x-x̄)²/(n-1).
    pub variance: Option<f64>,
    /// Sample standard deviation.
    pub sd: Option<f64>,
    /// Standard error of the mean, sd/√n.
    pub se: Option<f64>,
    /// Smallest observation.
    pub min: f64,
    /// Largest observation.
    pub max: f64,
    /// max - min.
    pub range: f64,
    /// Median (mean of the two middle values for even n).
    pub median: f64,
}

impl BasicStats {
    /// Coefficient of variation in percent, sd/|mean|·100.
    ///
    /// `None` when the standard deviation is undefined or the mean is zero.
    pub fn coefficient_of_variation(&self) -> Option<f64> {
        let sd = self.sd?;
        if self.mean.abs() < 1e-300 {
            return None;
        }
        Some(sd / self.mean.abs() * 100.0)
    }
}

/// Computes [`BasicStats`] for `values`.
///
/// # Errors
///
/// - [`AnalysisError::InsufficientData`] if `values` is empty.
/// - [`AnalysisError::InvalidConfiguration`] if any value is NaN or infinite.
///
/// # Examples
///
/// ```
/// use u_foodsci::descriptive::describe;
///
/// // A single observation has a mean but no spread.
/// let s = describe(&[4.5]).unwrap();
/// assert_eq!(s.mean, 4.5);
/// assert!(s.variance.is_none());
///
/// assert!(describe(&[]).is_err());
/// ```
pub fn describe(values: &[f64]) -> Result<BasicStats> {
    let n = values.len();
    if n == 0 {
        return Err(AnalysisError::insufficient("descriptive statistics", 1, 0));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(AnalysisError::invalid("sample contains a non-finite value"));
    }

    let sum: f64 = values.iter().sum();
    let mean = stats::mean(values).unwrap_or(sum / n as f64);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let median = stats::median(values).unwrap_or(mean);

    let variance = if n >= 2 { stats::variance(values) } else { None };
    let sd = variance.map(f64::sqrt);
    let se = sd.map(|s| s / (n as f64).sqrt());

    Ok(BasicStats {
        n,
        sum,
        mean,
        variance,
        sd,
        se,
        min,
        max,
        range: max - min,
        median,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn variance_matches_definition(
            data in proptest::collection::vec(-1e3_f64..1e3, 2..=40)
        ) {
            let s = describe(&data).expect("finite data");
            let n = data.len() as f64;
            let mean = data.iter().sum::<f64>() / n;
            let expected = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
            let var = s.variance.expect("n >= 2");
            prop_assert!((var - expected).abs() <= 1e-9 * expected.max(1.0),
                "var = {var}, expected = {expected}");
        }

        #[test]
        fn constant_sequence_has_zero_sd(
            value in -1e3_f64..1e3,
            n in 2_usize..30
        ) {
            let data = vec![value; n];
            let s = describe(&data).expect("finite data");
            prop_assert!(s.sd.expect("n >= 2").abs() < 1e-9);
            prop_assert!(s.se.expect("n >= 2").abs() < 1e-9);
        }

        #[test]
        fn median_within_range(
            data in proptest::collection::vec(-1e3_f64..1e3, 1..=40)
        ) {
            let s = describe(&data).expect("finite data");
            prop_assert!(s.min <= s.median && s.median <= s.max);
            prop_assert!(s.min <= s.mean + 1e-9 && s.mean <= s.max + 1e-9);
        }
    }
}
