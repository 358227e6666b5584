//! Duncan-style multiple range test with letter grouping.
//!
//! Samples are ranked by mean and every pair is compared against a
//! critical range that grows with the number of ranks the pair spans.
//! Samples that cannot be told apart share a letter.
//!
//! The critical values are a fixed table at α ≈ 0.05 (Duncan's significant
//! studentized ranges for large error df), so the test is an approximation
//! of the published procedure rather than an exact one. Rank distances
//! beyond the table fall back to its first entry.

use serde::{Deserialize, Serialize};

use super::{AnovaResult, Sample};
use crate::descriptive::describe;
use crate::error::{AnalysisError, Result};

/// Significant studentized ranges for rank distance p = 2..=10.
const DUNCAN_Q: [f64; 9] = [2.772, 2.918, 3.017, 3.089, 3.146, 3.193, 3.232, 3.265, 3.294];

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Critical q for a pair spanning `rank_distance` sorted positions
/// (`p = j - i + 1`).
///
/// # Examples
///
/// ```
/// use u_foodsci::testing::duncan_critical_q;
///
/// assert_eq!(duncan_critical_q(2), 2.772);
/// assert_eq!(duncan_critical_q(10), 3.294);
/// // Outside the table the first entry is reused.
/// assert_eq!(duncan_critical_q(11), 2.772);
/// ```
pub fn duncan_critical_q(rank_distance: usize) -> f64 {
    match rank_distance {
        p @ 2..=10 => DUNCAN_Q[p - 2],
        _ => DUNCAN_Q[0],
    }
}

/// One sample in the letter-grouping table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuncanGroupRow {
    /// Sample name.
    pub name: String,
    /// Number of observations.
    pub n: usize,
    /// Sample mean.
    pub mean: f64,
    /// Group letters, in alphabetical order.
    pub letters: Vec<char>,
}

impl DuncanGroupRow {
    /// Letters joined for display, e.g. `"ab"`.
    pub fn letter_label(&self) -> String {
        self.letters.iter().collect()
    }

    /// Returns `true` if both rows carry at least one common letter.
    pub fn shares_letter_with(&self, other: &Self) -> bool {
        self.letters.iter().any(|l| other.letters.contains(l))
    }
}

/// Verdict for one pair of samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairComparison {
    /// Higher-ranked sample.
    pub higher: String,
    /// Lower-ranked sample.
    pub lower: String,
    /// Number of sorted positions spanned, inclusive.
    pub rank_distance: usize,
    /// Absolute difference of means.
    pub difference: f64,
    /// q(p)·SE.
    pub critical_range: f64,
    /// `true` if the means differ significantly.
    pub significant: bool,
}

/// Critical range for one rank distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalRange {
    /// Rank distance p.
    pub rank_distance: usize,
    /// Table value q(p).
    pub q: f64,
    /// q(p)·SE.
    pub range: f64,
}

/// Result of the multiple range test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuncanResult {
    /// One row per sample, sorted by descending mean.
    pub rows: Vec<DuncanGroupRow>,
    /// Every pair of samples, in sorted order.
    pub comparisons: Vec<PairComparison>,
    /// Critical range per rank distance 2..=k.
    pub critical_ranges: Vec<CriticalRange>,
    /// Harmonic mean of the sample sizes.
    pub harmonic_n: f64,
    /// √(MS_within / n_h).
    pub standard_error: f64,
    /// Within-group mean square the test used.
    pub ms_within: f64,
    /// Within-group degrees of freedom reported by the ANOVA.
    pub df_within: usize,
}

impl DuncanResult {
    /// Runs the grouping after a significant ANOVA over the same samples.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::NotSignificant`] if the ANOVA was not significant.
    /// - [`AnalysisError::InvalidConfiguration`] if `samples` does not match
    ///   the ANOVA's group count.
    /// - Anything [`duncan_grouping`] returns.
    pub fn from_anova(anova: &AnovaResult, samples: &[Sample]) -> Result<Self> {
        if !anova.significant {
            return Err(AnalysisError::NotSignificant {
                p_value: anova.p_value,
            });
        }
        if samples.len() != anova.group_means.len() {
            return Err(AnalysisError::invalid(format!(
                "ANOVA covered {} samples but {} were supplied",
                anova.group_means.len(),
                samples.len()
            )));
        }
        duncan_grouping(samples, anova.ms_within, anova.df_within)
    }

    /// Finds the row for a sample by name.
    pub fn row(&self, name: &str) -> Option<&DuncanGroupRow> {
        self.rows.iter().find(|r| r.name == name)
    }
}

/// Ranks samples by mean and assigns letter groups.
///
/// # Algorithm
///
/// 1. Sort samples by descending mean (ties keep input order).
/// 2. n_h = k / Σ(1/nᵢ), SE = √(MS_within / n_h).
/// 3. A pair at sorted positions i < j is not significantly different iff
///    |x̄ᵢ - x̄ⱼ| < q(j-i+1)·SE, or the means are identical.
/// 4. Walk the sorted samples. Each one takes every existing letter whose
///    holders are all compatible with it. An earlier compatible sample that
///    still shares no letter with it gets a fresh letter together with it;
///    a sample with no letter at all also gets a fresh one.
///
/// Two rows share a letter exactly when the pair is not significantly
/// different.
///
/// # Errors
///
/// - [`AnalysisError::InsufficientData`] for fewer than 2 samples or a
///   sample with fewer than 2 values.
/// - [`AnalysisError::InvalidConfiguration`] if `ms_within` is negative or
///   non-finite, a value is non-finite, or more than 52 letters are needed.
///
/// # Examples
///
/// ```
/// use u_foodsci::testing::{duncan_grouping, Sample};
///
/// let samples = [
///     Sample::new("A", vec![8.0, 8.5, 9.0]),
///     Sample::new("B", vec![7.9, 8.4, 8.8]),
///     Sample::new("C", vec![4.0, 4.5, 5.0]),
/// ];
/// let r = duncan_grouping(&samples, 0.2, 6).unwrap();
/// assert_eq!(r.row("A").unwrap().letter_label(), "a");
/// assert_eq!(r.row("B").unwrap().letter_label(), "a");
/// assert_eq!(r.row("C").unwrap().letter_label(), "b");
/// ```
pub fn duncan_grouping(
    samples: &[Sample],
    ms_within: f64,
    df_within: usize,
) -> Result<DuncanResult> {
    let k = samples.len();
    if k < 2 {
        return Err(AnalysisError::insufficient("multiple range test samples", 2, k));
    }
    if !ms_within.is_finite() || ms_within < 0.0 {
        return Err(AnalysisError::invalid(format!(
            "within-group mean square must be finite and non-negative, got {ms_within}"
        )));
    }

    let mut ranked = Vec::with_capacity(k);
    for sample in samples {
        if !sample.is_testable() {
            return Err(AnalysisError::insufficient(
                "values per multiple range sample",
                2,
                sample.values.len(),
            ));
        }
        let stats = describe(&sample.values)?;
        ranked.push((sample.name.as_str(), stats.n, stats.mean));
    }
    // Stable: equal means keep input order.
    ranked.sort_by(|a, b| b.2.total_cmp(&a.2));

    let harmonic_n = k as f64 / ranked.iter().map(|&(_, n, _)| 1.0 / n as f64).sum::<f64>();
    let standard_error = (ms_within / harmonic_n).sqrt();

    let mut compatible = vec![vec![true; k]; k];
    let mut comparisons = Vec::with_capacity(k * (k - 1) / 2);
    for i in 0..k {
        for j in (i + 1)..k {
            let rank_distance = j - i + 1;
            let difference = (ranked[i].2 - ranked[j].2).abs();
            let critical_range = duncan_critical_q(rank_distance) * standard_error;
            let significant = difference >= critical_range && difference > 0.0;
            compatible[i][j] = !significant;
            compatible[j][i] = !significant;
            comparisons.push(PairComparison {
                higher: ranked[i].0.to_string(),
                lower: ranked[j].0.to_string(),
                rank_distance,
                difference,
                critical_range,
                significant,
            });
        }
    }

    let letters = assign_letters(&compatible)?;

    let rows: Vec<DuncanGroupRow> = ranked
        .iter()
        .zip(letters)
        .map(|(&(name, n, mean), letters)| DuncanGroupRow {
            name: name.to_string(),
            n,
            mean,
            letters,
        })
        .collect();

    let critical_ranges = (2..=k)
        .map(|p| {
            let q = duncan_critical_q(p);
            CriticalRange {
                rank_distance: p,
                q,
                range: q * standard_error,
            }
        })
        .collect();

    tracing::debug!(
        samples = k,
        harmonic_n,
        standard_error,
        letters = ?rows.iter().map(DuncanGroupRow::letter_label).collect::<Vec<_>>(),
        "multiple range test"
    );

    Ok(DuncanResult {
        rows,
        comparisons,
        critical_ranges,
        harmonic_n,
        standard_error,
        ms_within,
        df_within,
    })
}

fn next_letter(used: &mut usize) -> Result<char> {
    let letter = LETTERS
        .get(*used)
        .map(|&b| b as char)
        .ok_or_else(|| AnalysisError::invalid("letter grouping needs more than 52 letters"))?;
    *used += 1;
    Ok(letter)
}

/// Greedy letter walk over samples already in rank order.
fn assign_letters(compatible: &[Vec<bool>]) -> Result<Vec<Vec<char>>> {
    let k = compatible.len();
    let mut letters: Vec<Vec<char>> = vec![Vec::new(); k];
    let mut used = 0;

    for i in 0..k {
        let reusable: Vec<char> = LETTERS[..used]
            .iter()
            .map(|&b| b as char)
            .filter(|letter| {
                let mut holders = (0..i).filter(|&h| letters[h].contains(letter)).peekable();
                holders.peek().is_some() && holders.all(|h| compatible[h][i])
            })
            .collect();
        letters[i].extend(reusable);

        let uncovered: Vec<usize> = (0..i)
            .filter(|&j| compatible[j][i] && !letters[j].iter().any(|l| letters[i].contains(l)))
            .collect();

        // Earlier samples needing a new shared letter, split into mutually
        // compatible sets.
        let mut fresh: Vec<(char, Vec<usize>)> = Vec::new();
        for j in uncovered {
            match fresh
                .iter_mut()
                .find(|(_, members)| members.iter().all(|&m| compatible[m][j]))
            {
                Some((_, members)) => members.push(j),
                None => fresh.push((next_letter(&mut used)?, vec![j])),
            }
        }
        if letters[i].is_empty() && fresh.is_empty() {
            fresh.push((next_letter(&mut used)?, Vec::new()));
        }

        for (letter, members) in fresh {
            letters[i].push(letter);
            for m in members {
                letters[m].push(letter);
            }
        }
    }

    Ok(letters)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn letters_share_iff_not_different(
            means in proptest::collection::vec(0.0_f64..10.0, 2..=8),
            ms_within in 0.01_f64..4.0,
        ) {
            let samples: Vec<Sample> = means
                .iter()
                .enumerate()
                .map(|(i, &m)| Sample::new(format!("S{i}"), vec![m - 0.5, m + 0.5]))
                .collect();
            let r = duncan_grouping(&samples, ms_within, samples.len()).expect("valid");
            for c in &r.comparisons {
                let hi = r.row(&c.higher).expect("row");
                let lo = r.row(&c.lower).expect("row");
                prop_assert_eq!(hi.shares_letter_with(lo), !c.significant,
                    "{} vs {}", c.higher, c.lower);
            }
            for row in &r.rows {
                prop_assert!(!row.letters.is_empty());
            }
        }

        #[test]
        fn equal_means_share_letters(
            mean in 0.0_f64..10.0,
            other in 0.0_f64..10.0,
            ms_within in 0.0_f64..4.0,
        ) {
            let samples = [
                Sample::new("A", vec![mean - 1.0, mean + 1.0]),
                Sample::new("B", vec![other - 1.0, other + 1.0]),
                Sample::new("C", vec![mean - 1.0, mean + 1.0]),
            ];
            let r = duncan_grouping(&samples, ms_within, 3).expect("valid");
            let a = r.row("A").expect("row");
            let c = r.row("C").expect("row");
            prop_assert!(a.shares_letter_with(c));
        }
    }
}
