//! Q10 temperature extrapolation of shelf life.

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Validated inputs for a Q10 prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQ10Input")]
pub struct Q10Input {
    known_shelf_life_days: f64,
    known_temp_c: f64,
    target_temp_c: f64,
    q10: f64,
}

#[derive(Deserialize)]
struct RawQ10Input {
    known_shelf_life_days: f64,
    known_temp_c: f64,
    target_temp_c: f64,
    q10: f64,
}

impl TryFrom<RawQ10Input> for Q10Input {
    type Error = AnalysisError;

    fn try_from(raw: RawQ10Input) -> Result<Self> {
        Self::new(
            raw.known_shelf_life_days,
            raw.known_temp_c,
            raw.target_temp_c,
            raw.q10,
        )
    }
}

impl Q10Input {
    /// Creates a Q10 input.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidConfiguration`] if the known shelf
    /// life or `q10` is not positive, or any value is non-finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_foodsci::shelf_life::Q10Input;
    ///
    /// assert!(Q10Input::new(30.0, 35.0, 25.0, 2.0).is_ok());
    /// assert!(Q10Input::new(0.0, 35.0, 25.0, 2.0).is_err());
    /// assert!(Q10Input::new(30.0, 35.0, 25.0, -1.0).is_err());
    /// ```
    pub fn new(
        known_shelf_life_days: f64,
        known_temp_c: f64,
        target_temp_c: f64,
        q10: f64,
    ) -> Result<Self> {
        if !known_shelf_life_days.is_finite() || known_shelf_life_days <= 0.0 {
            return Err(AnalysisError::invalid(format!(
                "known shelf life must be positive, got {known_shelf_life_days}"
            )));
        }
        if !q10.is_finite() || q10 <= 0.0 {
            return Err(AnalysisError::invalid(format!("Q10 must be positive, got {q10}")));
        }
        if !known_temp_c.is_finite() || !target_temp_c.is_finite() {
            return Err(AnalysisError::invalid("temperatures must be finite"));
        }
        Ok(Self {
            known_shelf_life_days,
            known_temp_c,
            target_temp_c,
            q10,
        })
    }

    /// Shelf life observed at the known temperature, in days.
    pub fn known_shelf_life_days(&self) -> f64 {
        self.known_shelf_life_days
    }

    /// Temperature of the observation, °C.
    pub fn known_temp_c(&self) -> f64 {
        self.known_temp_c
    }

    /// Storage temperature to predict for, °C.
    pub fn target_temp_c(&self) -> f64 {
        self.target_temp_c
    }

    /// Rate multiplier per 10 °C.
    pub fn q10(&self) -> f64 {
        self.q10
    }
}

/// Result of a Q10 prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Q10Result {
    /// Predicted shelf life at the target temperature, in days.
    pub predicted_days: f64,
    /// q10^((known - target)/10).
    pub factor: f64,
    /// known - target, °C.
    pub temperature_difference: f64,
}

/// Predicts shelf life at another temperature from a Q10 coefficient.
///
/// ```text
/// factor = Q10^((T_known - T_target) / 10)
/// days   = days_known · factor
/// ```
///
/// Equal temperatures give a factor of exactly 1.
///
/// # Examples
///
/// ```
/// use u_foodsci::shelf_life::{q10_predict, Q10Input};
///
/// let input = Q10Input::new(30.0, 35.0, 25.0, 2.0).unwrap();
/// let r = q10_predict(&input);
/// assert!((r.predicted_days - 60.0).abs() < 1e-12);
/// ```
pub fn q10_predict(input: &Q10Input) -> Q10Result {
    let temperature_difference = input.known_temp_c - input.target_temp_c;
    let factor = if temperature_difference == 0.0 {
        1.0
    } else {
        input.q10.powf(temperature_difference / 10.0)
    };
    Q10Result {
        predicted_days: input.known_shelf_life_days * factor,
        factor,
        temperature_difference,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predict(days: f64, known: f64, target: f64, q10: f64) -> Q10Result {
        q10_predict(&Q10Input::new(days, known, target, q10).expect("valid input"))
    }

    #[test]
    fn accelerated_test_to_room_temperature() {
        let r = predict(30.0, 35.0, 25.0, 2.0);
        assert_eq!(r.factor, 2.0);
        assert_eq!(r.predicted_days, 60.0);
        assert_eq!(r.temperature_difference, 10.0);
    }

    #[test]
    fn warmer_storage_shortens_shelf_life() {
        let r = predict(120.0, 20.0, 40.0, 3.0);
        assert!((r.factor - 1.0 / 9.0).abs() < 1e-12);
        assert!((r.predicted_days - 120.0 / 9.0).abs() < 1e-10);
    }

    #[test]
    fn same_temperature_is_identity() {
        let r = predict(17.3, 21.7, 21.7, 2.5);
        assert_eq!(r.factor, 1.0);
        assert_eq!(r.predicted_days, 17.3);
    }

    #[test]
    fn invalid_inputs() {
        for (days, q10) in [
            (0.0, 2.0),
            (-5.0, 2.0),
            (10.0, 0.0),
            (f64::NAN, 2.0),
            (10.0, f64::INFINITY),
        ] {
            let err = Q10Input::new(days, 30.0, 20.0, q10).expect_err("invalid");
            assert!(matches!(err, AnalysisError::InvalidConfiguration(_)));
        }
        assert!(Q10Input::new(10.0, f64::NAN, 20.0, 2.0).is_err());
    }

    #[test]
    fn deserialization_validates() {
        let ok: Q10Input = serde_json::from_str(
            r#"{"known_shelf_life_days":30,"known_temp_c":35,"target_temp_c":25,"q10":2}"#,
        )
        .expect("valid json");
        assert_eq!(ok.q10(), 2.0);
        let bad = serde_json::from_str::<Q10Input>(
            r#"{"known_shelf_life_days":30,"known_temp_c":35,"target_temp_c":25,"q10":0}"#,
        );
        assert!(bad.is_err());
    }
}
