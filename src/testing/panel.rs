//! End-to-end analysis of one sensory panel attribute.

use serde::{Deserialize, Serialize};

use super::{one_way_anova, AnovaResult, DuncanResult, Sample, SignificanceLevel};
use crate::descriptive::{describe, BasicStats};
use crate::error::{AnalysisError, Result};

/// Immutable snapshot of a panel analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelAnalysis {
    /// Descriptive statistics per sample, in input order. Empty samples are
    /// omitted.
    pub descriptives: Vec<(String, BasicStats)>,
    /// Samples left out of the ANOVA for having fewer than two values.
    pub excluded: Vec<String>,
    /// ANOVA over the remaining samples.
    pub anova: AnovaResult,
    /// Letter grouping, present only when the ANOVA is significant.
    pub duncan: Option<DuncanResult>,
}

/// Describes every sample, runs one-way ANOVA on those with at least two
/// values and, if the difference is significant, groups them with the
/// multiple range test.
///
/// # Errors
///
/// - [`AnalysisError::InsufficientData`] if fewer than two samples have two
///   or more values.
/// - [`AnalysisError::InvalidConfiguration`] for non-finite values.
///
/// # Examples
///
/// ```
/// use u_foodsci::testing::{analyze_panel, Sample, SignificanceLevel};
///
/// let panel = [
///     Sample::new("control", vec![7.0, 8.0, 6.0, 7.0]),
///     Sample::new("reduced sugar", vec![3.0, 2.0, 4.0, 3.0]),
///     Sample::new("pilot", vec![5.0]),
/// ];
/// let r = analyze_panel(&panel, SignificanceLevel::P05).unwrap();
/// assert_eq!(r.excluded, vec!["pilot".to_string()]);
/// assert!(r.anova.significant);
/// assert!(r.duncan.is_some());
/// ```
pub fn analyze_panel(samples: &[Sample], alpha: SignificanceLevel) -> Result<PanelAnalysis> {
    let mut descriptives = Vec::with_capacity(samples.len());
    for sample in samples.iter().filter(|s| !s.values.is_empty()) {
        descriptives.push((sample.name.clone(), describe(&sample.values)?));
    }

    let (testable, excluded): (Vec<&Sample>, Vec<&Sample>) =
        samples.iter().partition(|s| s.is_testable());
    let excluded: Vec<String> = excluded.into_iter().map(|s| s.name.clone()).collect();
    if !excluded.is_empty() {
        tracing::warn!(?excluded, "samples with fewer than two values left out of ANOVA");
    }
    if testable.len() < 2 {
        return Err(AnalysisError::insufficient(
            "samples with at least two values",
            2,
            testable.len(),
        ));
    }

    let groups: Vec<&[f64]> = testable.iter().map(|s| s.values.as_slice()).collect();
    let anova = one_way_anova(&groups, alpha)?;

    let duncan = if anova.significant {
        let tested: Vec<Sample> = testable.into_iter().cloned().collect();
        Some(DuncanResult::from_anova(&anova, &tested)?)
    } else {
        None
    };

    tracing::debug!(
        samples = samples.len(),
        excluded = excluded.len(),
        significant = anova.significant,
        "panel analysis"
    );

    Ok(PanelAnalysis {
        descriptives,
        excluded,
        anova,
        duncan,
    })
}
