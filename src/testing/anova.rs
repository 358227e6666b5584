//! One-way analysis of variance.

use serde::{Deserialize, Serialize};

use super::SignificanceLevel;
use crate::descriptive::describe;
use crate::error::{AnalysisError, Result};
use crate::special;

/// Sums of squares at or below this fraction of Σx² are treated as zero.
const NEGLIGIBLE_SS: f64 = 1e-20;

/// Result of one-way ANOVA.
///
/// # Invariants
///
/// - `ss_total == ss_between + ss_within`
/// - `df_between = k - 1`, `df_within = N - k`, `df_total = N - 1`
/// - `significant == (p_value < alpha)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaResult {
    /// Sum of squares between groups.
    pub ss_between: f64,
    /// Sum of squares within groups.
    pub ss_within: f64,
    /// Total sum of squares.
    pub ss_total: f64,
    /// Degrees of freedom between groups.
    pub df_between: usize,
    /// Degrees of freedom within groups.
    pub df_within: usize,
    /// Total degrees of freedom.
    pub df_total: usize,
    /// Mean square between.
    pub ms_between: f64,
    /// Mean square within.
    pub ms_within: f64,
    /// F-statistic; `+∞` when the within-group variance is zero.
    pub f_statistic: f64,
    /// Approximate p-value.
    pub p_value: f64,
    /// `false` if the p-value series was truncated before converging.
    pub p_value_converged: bool,
    /// Significance level the test was run at.
    pub alpha: SignificanceLevel,
    /// `p_value < alpha`.
    pub significant: bool,
    /// Group means, in input order.
    pub group_means: Vec<f64>,
    /// Mean of all pooled observations.
    pub grand_mean: f64,
    /// Total number of observations.
    pub n_total: usize,
}

/// Source of variation in an ANOVA table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariationSource {
    /// Between samples.
    Between,
    /// Within samples (error).
    Within,
    /// Total.
    Total,
}

/// One row of the classic ANOVA summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaTableRow {
    /// Row label.
    pub source: VariationSource,
    /// Sum of squares.
    pub ss: f64,
    /// Degrees of freedom.
    pub df: usize,
    /// Mean square (not reported for the total row).
    pub ms: Option<f64>,
    /// F-statistic (between row only).
    pub f: Option<f64>,
    /// p-value (between row only).
    pub p_value: Option<f64>,
}

impl AnovaResult {
    /// Rows of the ANOVA summary table: between, within, total.
    pub fn table(&self) -> [AnovaTableRow; 3] {
        [
            AnovaTableRow {
                source: VariationSource::Between,
                ss: self.ss_between,
                df: self.df_between,
                ms: Some(self.ms_between),
                f: Some(self.f_statistic),
                p_value: Some(self.p_value),
            },
            AnovaTableRow {
                source: VariationSource::Within,
                ss: self.ss_within,
                df: self.df_within,
                ms: Some(self.ms_within),
                f: None,
                p_value: None,
            },
            AnovaTableRow {
                source: VariationSource::Total,
                ss: self.ss_total,
                df: self.df_total,
                ms: None,
                f: None,
                p_value: None,
            },
        ]
    }
}

/// One-way ANOVA: H₀: all group means are equal.
///
/// # Algorithm
///
/// F = MS_between / MS_within where
/// MS_between = SS_between / (k-1),
/// MS_within = SS_within / (N-k).
///
/// When the within-group variation is zero, F is reported as `+∞` with
/// p = 0 (or F = 0, p = 1 if there is no between-group variation either),
/// so the statistic never becomes NaN.
///
/// # Errors
///
/// - [`AnalysisError::InsufficientData`] if there are fewer than 2 groups,
///   any group has fewer than 2 observations, or N - k is zero.
/// - [`AnalysisError::InvalidConfiguration`] if any value is non-finite.
///
/// # Examples
///
/// ```
/// use u_foodsci::testing::{one_way_anova, SignificanceLevel};
///
/// let a = [7.0, 8.0, 6.0, 7.0];
/// let b = [3.0, 2.0, 4.0, 3.0];
/// let r = one_way_anova(&[&a, &b], SignificanceLevel::P05).unwrap();
/// assert!(r.significant);
/// assert!((r.f_statistic - 48.0).abs() < 1e-9);
/// ```
pub fn one_way_anova(groups: &[&[f64]], alpha: SignificanceLevel) -> Result<AnovaResult> {
    let k = groups.len();
    if k < 2 {
        return Err(AnalysisError::insufficient("one-way ANOVA groups", 2, k));
    }
    for g in groups {
        if g.len() < 2 {
            return Err(AnalysisError::insufficient(
                "values per ANOVA group",
                2,
                g.len(),
            ));
        }
        if g.iter().any(|v| !v.is_finite()) {
            return Err(AnalysisError::invalid("ANOVA group contains a non-finite value"));
        }
    }

    let n_total: usize = groups.iter().map(|g| g.len()).sum();
    let df_between = k - 1;
    let df_within = n_total - k;
    if df_within == 0 {
        return Err(AnalysisError::insufficient("ANOVA within-group df", 1, 0));
    }

    let pooled: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let grand_mean = describe(&pooled)?.mean;

    let group_means = groups
        .iter()
        .map(|g| describe(g).map(|s| s.mean))
        .collect::<Result<Vec<f64>>>()?;

    let ss_between: f64 = groups
        .iter()
        .zip(group_means.iter())
        .map(|(g, &gm)| g.len() as f64 * (gm - grand_mean).powi(2))
        .sum();

    let ss_within: f64 = groups
        .iter()
        .zip(group_means.iter())
        .map(|(g, &gm)| g.iter().map(|&x| (x - gm).powi(2)).sum::<f64>())
        .sum();

    let ss_total = ss_between + ss_within;

    let ms_between = ss_between / df_between as f64;
    let ms_within = ss_within / df_within as f64;

    let scale: f64 = pooled
        .iter()
        .map(|x| x * x)
        .sum::<f64>()
        .max(f64::MIN_POSITIVE);
    let within_vanishes = ss_within <= NEGLIGIBLE_SS * scale;
    let between_vanishes = ss_between <= NEGLIGIBLE_SS * scale;

    let (f_statistic, p_value, p_value_converged) = match (within_vanishes, between_vanishes) {
        (true, true) => (0.0, 1.0, true),
        (true, false) => (f64::INFINITY, 0.0, true),
        (false, _) => {
            let f = ms_between / ms_within;
            let p = special::f_upper_tail(f, df_between as f64, df_within as f64)
                .ok_or_else(|| AnalysisError::invalid("degrees of freedom must be positive"))?;
            (f, p.value, p.converged)
        }
    };

    let significant = p_value < alpha.alpha();

    tracing::debug!(
        groups = k,
        n = n_total,
        f = f_statistic,
        p = p_value,
        significant,
        "one-way ANOVA"
    );

    Ok(AnovaResult {
        ss_between,
        ss_within,
        ss_total,
        df_between,
        df_within,
        df_total: n_total - 1,
        ms_between,
        ms_within,
        f_statistic,
        p_value,
        p_value_converged,
        alpha,
        significant,
        group_means,
        grand_mean,
        n_total,
    })
}
