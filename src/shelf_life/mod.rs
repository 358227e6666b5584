//! Shelf-life prediction.
//!
//! Extrapolates accelerated storage trials to real storage conditions and
//! screens formulations by water activity.
//!
//! # Models
//!
//! - [`q10_predict`]: closed-form Q10 temperature extrapolation
//! - [`arrhenius_fit`]: Arrhenius regression over accelerated test points
//! - [`assess_water_activity`]: heuristic water activity risk scoring
//!
//! # References
//!
//! - Labuza (1982), *Shelf-Life Dating of Foods*.
//! - Beuchat (1981), "Microbial Stability as Affected by Water Activity".

mod arrhenius;
mod q10;
mod water_activity;

pub use arrhenius::{
    arrhenius_fit, ArrheniusResult, KineticTestPoint, CURVE_MAX_DAYS, GAS_CONSTANT, KELVIN_OFFSET,
};
pub use q10::{q10_predict, Q10Input, Q10Result};
pub use water_activity::{
    assess_water_activity, AwCategory, Packaging, ProductType, RiskLevel, StorageConditions,
    WaterActivityAssessment,
};
