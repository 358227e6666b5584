//! Arrhenius regression of accelerated shelf-life tests.
//!
//! Each test point is turned into a rate k = 1/shelf life and the
//! linearized Arrhenius equation
//!
//! ```text
//! ln k = ln A - Ea / (R·T)
//! ```
//!
//! is fitted by ordinary least squares on x = 1/T (Kelvin), y = ln k.
//!
//! # Reference
//!
//! Labuza (1982), *Shelf-Life Dating of Foods*, Food & Nutrition Press.

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Universal gas constant, J/(mol·K).
pub const GAS_CONSTANT: f64 = 8.314;

/// 0 °C in Kelvin.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Upper bound applied to every point of the display curve, in days.
pub const CURVE_MAX_DAYS: f64 = 365.0;

const CURVE_START_C: i32 = 5;
const CURVE_END_C: i32 = 50;
const CURVE_STEP_C: usize = 5;

/// One accelerated-test observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KineticTestPoint {
    /// Storage temperature, °C.
    pub temperature_c: f64,
    /// Observed shelf life, days (must be positive).
    pub shelf_life_days: f64,
}

impl KineticTestPoint {
    /// Creates a test point.
    pub fn new(temperature_c: f64, shelf_life_days: f64) -> Self {
        Self {
            temperature_c,
            shelf_life_days,
        }
    }
}

/// Fitted Arrhenius model and prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrheniusResult {
    /// Activation energy, kJ/mol.
    pub ea_kj_mol: f64,
    /// Pre-exponential factor A, 1/day.
    pub a: f64,
    /// Coefficient of determination of the linearized fit.
    pub r_squared: f64,
    /// Storage temperature predicted for, °C.
    pub target_temp_c: f64,
    /// Predicted shelf life at the target temperature, days.
    pub predicted_days: f64,
    /// Shelf life from 5 to 50 °C in 5 °C steps, capped at 365 days.
    pub curve: Vec<KineticTestPoint>,
}

impl ArrheniusResult {
    /// Degradation rate at `temperature_c`, 1/day.
    pub fn rate(&self, temperature_c: f64) -> f64 {
        let t = temperature_c + KELVIN_OFFSET;
        self.a * (-self.ea_kj_mol * 1000.0 / (GAS_CONSTANT * t)).exp()
    }

    /// Shelf life at any temperature, days. Zero if the rate vanishes.
    pub fn predict_days(&self, temperature_c: f64) -> f64 {
        let k = self.rate(temperature_c);
        if k > 0.0 && k.is_finite() {
            1.0 / k
        } else {
            0.0
        }
    }

    /// Q10 implied by the fitted activation energy between `temperature_c`
    /// and `temperature_c + 10`.
    ///
    /// Q10 = exp(10·Ea / (R·T·(T+10))) with T in Kelvin.
    pub fn equivalent_q10(&self, temperature_c: f64) -> f64 {
        let t = temperature_c + KELVIN_OFFSET;
        (10.0 * self.ea_kj_mol * 1000.0 / (GAS_CONSTANT * t * (t + 10.0))).exp()
    }
}

/// Fits the Arrhenius model to accelerated test points and predicts shelf
/// life at `target_temp_c`.
///
/// # Algorithm
/// 1. x = 1/(T + 273.15), y = ln(1/days)
/// 2. slope = (nΣxy - ΣxΣy) / (nΣx² - (Σx)²), intercept = (Σy - slope·Σx)/n
/// 3. Ea = -slope·R/1000 (kJ/mol), A = e^intercept
/// 4. R² = 1 - SS_res/SS_tot
/// 5. k = A·exp(-Ea·1000/(R·T_target)), days = 1/k
///
/// # Errors
///
/// - [`AnalysisError::InsufficientData`] for fewer than 2 points.
/// - [`AnalysisError::DegenerateRegression`] if every point has the same
///   temperature.
/// - [`AnalysisError::InvalidConfiguration`] if a shelf life is not
///   positive, a temperature is at or below absolute zero, or a value is
///   non-finite.
///
/// # Examples
///
/// ```
/// use u_foodsci::shelf_life::{arrhenius_fit, KineticTestPoint};
///
/// let points = [
///     KineticTestPoint::new(25.0, 120.0),
///     KineticTestPoint::new(35.0, 50.0),
///     KineticTestPoint::new(45.0, 22.0),
/// ];
/// let r = arrhenius_fit(&points, 20.0).unwrap();
/// assert!(r.ea_kj_mol > 0.0);
/// assert!(r.predicted_days > 120.0);
/// assert!(r.r_squared > 0.99);
/// ```
pub fn arrhenius_fit(points: &[KineticTestPoint], target_temp_c: f64) -> Result<ArrheniusResult> {
    let n = points.len();
    if n < 2 {
        return Err(AnalysisError::insufficient("Arrhenius test points", 2, n));
    }
    if !target_temp_c.is_finite() || target_temp_c <= -KELVIN_OFFSET {
        return Err(AnalysisError::invalid(format!(
            "target temperature must be above absolute zero, got {target_temp_c}"
        )));
    }
    for p in points {
        if !p.shelf_life_days.is_finite() || p.shelf_life_days <= 0.0 {
            return Err(AnalysisError::invalid(format!(
                "shelf life must be positive, got {} days at {} °C",
                p.shelf_life_days, p.temperature_c
            )));
        }
        if !p.temperature_c.is_finite() || p.temperature_c <= -KELVIN_OFFSET {
            return Err(AnalysisError::invalid(format!(
                "test temperature must be above absolute zero, got {}",
                p.temperature_c
            )));
        }
    }

    let x_vals: Vec<f64> = points
        .iter()
        .map(|p| 1.0 / (p.temperature_c + KELVIN_OFFSET))
        .collect();
    let y_vals: Vec<f64> = points.iter().map(|p| (1.0 / p.shelf_life_days).ln()).collect();

    let n_f = n as f64;
    let sum_x: f64 = x_vals.iter().sum();
    let sum_y: f64 = y_vals.iter().sum();
    let sum_xy: f64 = x_vals.iter().zip(y_vals.iter()).map(|(x, y)| x * y).sum();
    let sum_x2: f64 = x_vals.iter().map(|x| x * x).sum();

    // Identical temperatures: every x equal, so the denominator is zero.
    let first_x = x_vals[0];
    if x_vals.iter().all(|&x| x == first_x) {
        return Err(AnalysisError::DegenerateRegression);
    }
    let denom = n_f * sum_x2 - sum_x * sum_x;
    if denom.abs() < 1e-300 {
        return Err(AnalysisError::DegenerateRegression);
    }

    let slope = (n_f * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n_f;

    let ea_kj_mol = -slope * GAS_CONSTANT / 1000.0;
    let a = intercept.exp();

    let mean_y = sum_y / n_f;
    let ss_tot: f64 = y_vals.iter().map(|y| (y - mean_y).powi(2)).sum();
    let ss_res: f64 = x_vals
        .iter()
        .zip(y_vals.iter())
        .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
        .sum();
    let r_squared = if ss_tot < 1e-300 {
        1.0 // all shelf lives identical
    } else {
        1.0 - ss_res / ss_tot
    };

    let mut result = ArrheniusResult {
        ea_kj_mol,
        a,
        r_squared,
        target_temp_c,
        predicted_days: 0.0,
        curve: Vec::new(),
    };
    result.predicted_days = result.predict_days(target_temp_c);
    let curve = (CURVE_START_C..=CURVE_END_C)
        .step_by(CURVE_STEP_C)
        .map(|t| {
            let temperature_c = f64::from(t);
            KineticTestPoint {
                temperature_c,
                shelf_life_days: result.predict_days(temperature_c).min(CURVE_MAX_DAYS),
            }
        })
        .collect();
    result.curve = curve;

    tracing::debug!(
        points = n,
        ea_kj_mol,
        r_squared,
        predicted_days = result.predicted_days,
        "Arrhenius fit"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Noise-free points from ln k = ln A - Ea/(R·T).
    fn synthetic(ea_kj_mol: f64, a: f64, temps: &[f64]) -> Vec<KineticTestPoint> {
        temps
            .iter()
            .map(|&t| {
                let k = a * (-ea_kj_mol * 1000.0 / (GAS_CONSTANT * (t + KELVIN_OFFSET))).exp();
                KineticTestPoint::new(t, 1.0 / k)
            })
            .collect()
    }

    #[test]
    fn recovers_known_parameters() {
        let points = synthetic(80.0, 1.0e12, &[25.0, 35.0, 45.0, 55.0]);
        let r = arrhenius_fit(&points, 20.0).expect("fit");
        assert!((r.ea_kj_mol - 80.0).abs() / 80.0 < 0.01, "Ea = {}", r.ea_kj_mol);
        assert!((r.a - 1.0e12).abs() / 1.0e12 < 0.01, "A = {}", r.a);
        assert!((r.r_squared - 1.0).abs() < 1e-9, "R² = {}", r.r_squared);
    }

    #[test]
    fn prediction_matches_generating_model() {
        let points = synthetic(60.0, 5.0e8, &[30.0, 40.0]);
        let r = arrhenius_fit(&points, 15.0).expect("fit");
        let expected = synthetic(60.0, 5.0e8, &[15.0])[0].shelf_life_days;
        assert!(
            (r.predicted_days - expected).abs() / expected < 1e-6,
            "predicted {}, expected {expected}",
            r.predicted_days
        );
        // Fitted points are reproduced.
        assert!((r.predict_days(30.0) - points[0].shelf_life_days).abs() < 1e-6);
    }

    #[test]
    fn curve_spans_5_to_50_and_is_capped() {
        let points = synthetic(100.0, 1.0e15, &[30.0, 40.0, 50.0]);
        let r = arrhenius_fit(&points, 25.0).expect("fit");
        let temps: Vec<f64> = r.curve.iter().map(|p| p.temperature_c).collect();
        assert_eq!(
            temps,
            vec![5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0]
        );
        assert!(r.curve.iter().all(|p| p.shelf_life_days <= CURVE_MAX_DAYS));
        // Cold end is well beyond a year and clipped.
        assert_eq!(r.curve[0].shelf_life_days, CURVE_MAX_DAYS);
        // Shelf life shortens with temperature.
        for w in r.curve.windows(2) {
            assert!(w[1].shelf_life_days <= w[0].shelf_life_days);
        }
    }

    #[test]
    fn equivalent_q10_from_activation_energy() {
        let points = synthetic(83.0, 1.0e13, &[20.0, 30.0, 40.0]);
        let r = arrhenius_fit(&points, 25.0).expect("fit");
        let q10 = r.equivalent_q10(20.0);
        let ratio = r.predict_days(20.0) / r.predict_days(30.0);
        assert!((q10 - ratio).abs() / ratio < 1e-6, "Q10 = {q10}, ratio = {ratio}");
    }

    #[test]
    fn too_few_points() {
        let err = arrhenius_fit(&[KineticTestPoint::new(25.0, 100.0)], 20.0).expect_err("n = 1");
        assert!(err.is_insufficient_data());
        assert!(arrhenius_fit(&[], 20.0).is_err());
    }

    #[test]
    fn identical_temperatures_are_degenerate() {
        let points = [
            KineticTestPoint::new(35.0, 40.0),
            KineticTestPoint::new(35.0, 45.0),
            KineticTestPoint::new(35.0, 42.0),
        ];
        let err = arrhenius_fit(&points, 20.0).expect_err("zero x variance");
        assert_eq!(err, AnalysisError::DegenerateRegression);
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn non_positive_shelf_life_rejected() {
        let points = [KineticTestPoint::new(25.0, 0.0), KineticTestPoint::new(35.0, 10.0)];
        let err = arrhenius_fit(&points, 20.0).expect_err("zero days");
        assert!(matches!(err, AnalysisError::InvalidConfiguration(_)));
    }

    #[test]
    fn invalid_target_rejected() {
        let points = synthetic(60.0, 5.0e8, &[30.0, 40.0]);
        assert!(arrhenius_fit(&points, f64::NAN).is_err());
        assert!(arrhenius_fit(&points, -300.0).is_err());
    }

    #[test]
    fn equal_shelf_lives_give_zero_activation_energy() {
        let points = [KineticTestPoint::new(20.0, 30.0), KineticTestPoint::new(40.0, 30.0)];
        let r = arrhenius_fit(&points, 10.0).expect("fit");
        assert!(r.ea_kj_mol.abs() < 1e-9);
        assert_eq!(r.r_squared, 1.0);
        assert!((r.predicted_days - 30.0).abs() < 1e-6);
    }
}
