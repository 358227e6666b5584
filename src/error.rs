//! Error types shared by every analysis in the crate.
//!
//! All errors are recoverable: the caller corrects the input and calls
//! again. Degenerate-but-valid situations (zero within-group variance,
//! a Beta series that used its whole term budget) are not errors and are
//! encoded in the result records instead.

use thiserror::Error;

/// Errors returned by the analysis functions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Not enough observations, groups or test points.
    #[error("insufficient data for {context}: need at least {required}, got {actual}")]
    InsufficientData {
        /// What was being computed.
        context: &'static str,
        /// Minimum count required.
        required: usize,
        /// Count actually supplied.
        actual: usize,
    },

    /// All Arrhenius test temperatures are identical, so the regression
    /// slope is undefined.
    #[error("degenerate regression: all test temperatures are identical")]
    DegenerateRegression,

    /// A parameter failed validation before any computation took place.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Post-hoc grouping was requested for an ANOVA that found no
    /// significant difference.
    #[error("post-hoc grouping requires a significant ANOVA (p = {p_value:.4})")]
    NotSignificant {
        /// p-value of the ANOVA that was passed in.
        p_value: f64,
    },
}

impl AnalysisError {
    /// Returns `true` for errors the caller should present as
    /// "not enough data" (including a zero-variance temperature set).
    ///
    /// # Examples
    ///
    /// ```
    /// use u_foodsci::AnalysisError;
    ///
    /// assert!(AnalysisError::DegenerateRegression.is_insufficient_data());
    /// assert!(!AnalysisError::InvalidConfiguration("aw".into()).is_insufficient_data());
    /// ```
    pub fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            Self::InsufficientData { .. } | Self::DegenerateRegression
        )
    }

    pub(crate) fn insufficient(context: &'static str, required: usize, actual: usize) -> Self {
        Self::InsufficientData {
            context,
            required,
            actual,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AnalysisError>;
