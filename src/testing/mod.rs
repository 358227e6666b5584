//! Sensory panel hypothesis testing.
//!
//! One-way ANOVA across samples, followed by Duncan-style multiple range
//! letter grouping when the ANOVA is significant.
//!
//! # Procedures
//!
//! - [`one_way_anova`]: F test of equal sample means
//! - [`duncan_grouping`]: pairwise range tests and letter groups
//! - [`analyze_panel`]: describe, test and group a panel in one call
//!
//! # References
//!
//! - Fisher (1925). *Statistical Methods for Research Workers*.
//! - Duncan (1955). "Multiple Range and Multiple F Tests".
//!   *Biometrics* 11(1), pp. 1–42.

mod anova;
mod duncan;
mod panel;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

pub use anova::{one_way_anova, AnovaResult, AnovaTableRow, VariationSource};
pub use duncan::{
    duncan_critical_q, duncan_grouping, CriticalRange, DuncanGroupRow, DuncanResult,
    PairComparison,
};
pub use panel::{analyze_panel, PanelAnalysis};

/// A named sample: one product or treatment scored by the panel.
///
/// Values keep their entry order for display; statistics do not depend on
/// it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Sample label shown in tables.
    pub name: String,
    /// Observations.
    pub values: Vec<f64>,
}

impl Sample {
    /// Creates a sample.
    pub fn new(name: impl Into<String>, values: impl Into<Vec<f64>>) -> Self {
        Self {
            name: name.into(),
            values: values.into(),
        }
    }

    /// Returns `true` if the sample has enough values to enter an ANOVA.
    pub fn is_testable(&self) -> bool {
        self.values.len() >= 2
    }
}

/// Significance level accepted by the tests.
///
/// Only the three conventional levels are supported.
///
/// # Examples
///
/// ```
/// use u_foodsci::testing::SignificanceLevel;
///
/// let alpha = SignificanceLevel::try_from(0.05).unwrap();
/// assert_eq!(alpha, SignificanceLevel::P05);
/// assert!(SignificanceLevel::try_from(0.2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum SignificanceLevel {
    /// α = 0.01
    P01,
    /// α = 0.05
    #[default]
    P05,
    /// α = 0.10
    P10,
}

impl SignificanceLevel {
    /// The α value.
    pub fn alpha(self) -> f64 {
        match self {
            Self::P01 => 0.01,
            Self::P05 => 0.05,
            Self::P10 => 0.10,
        }
    }
}

impl TryFrom<f64> for SignificanceLevel {
    type Error = AnalysisError;

    fn try_from(alpha: f64) -> Result<Self, Self::Error> {
        [Self::P01, Self::P05, Self::P10]
            .into_iter()
            .find(|level| (level.alpha() - alpha).abs() < 1e-12)
            .ok_or_else(|| {
                AnalysisError::invalid(format!(
                    "significance level must be 0.01, 0.05 or 0.10, got {alpha}"
                ))
            })
    }
}

impl From<SignificanceLevel> for f64 {
    fn from(level: SignificanceLevel) -> Self {
        level.alpha()
    }
}

impl fmt::Display for SignificanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "α = {:.2}", self.alpha())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn significance_level_round_trip() {
        for level in [
            SignificanceLevel::P01,
            SignificanceLevel::P05,
            SignificanceLevel::P10,
        ] {
            assert_eq!(SignificanceLevel::try_from(level.alpha()), Ok(level));
        }
    }

    #[test]
    fn significance_level_rejects_other_values() {
        for alpha in [0.0, 0.025, 0.5, 1.0, f64::NAN] {
            let err = SignificanceLevel::try_from(alpha).expect_err("not accepted");
            assert!(matches!(err, AnalysisError::InvalidConfiguration(_)));
        }
    }

    #[test]
    fn significance_level_serde_as_number() {
        let json = serde_json::to_string(&SignificanceLevel::P10).expect("serialize");
        assert_eq!(json, "0.1");
        let level: SignificanceLevel = serde_json::from_str("0.01").expect("deserialize");
        assert_eq!(level, SignificanceLevel::P01);
        assert!(serde_json::from_str::<SignificanceLevel>("0.2").is_err());
    }

    #[test]
    fn sample_testability() {
        assert!(Sample::new("A", vec![1.0, 2.0]).is_testable());
        assert!(!Sample::new("B", vec![1.0]).is_testable());
    }
}
