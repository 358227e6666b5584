//! Water-activity based shelf-life and spoilage risk estimate.
//!
//! A heuristic, multiplicative model: the water activity bracket sets a
//! base shelf life and the risk level, then pH, storage temperature,
//! preservatives, packaging and product type scale the base figure. The
//! numbers are rules of thumb for screening formulations, not a validated
//! microbiological model.
//!
//! # Reference
//!
//! Beuchat (1981), "Microbial Stability as Affected by Water Activity",
//! *Cereal Foods World* 26(7), pp. 345–349.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Qualitative spoilage risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    /// aw < 0.3
    VeryLow,
    /// 0.3 ≤ aw < 0.6
    Low,
    /// 0.6 ≤ aw < 0.7
    Medium,
    /// 0.7 ≤ aw < 0.85
    High,
    /// aw ≥ 0.85
    VeryHigh,
}

impl RiskLevel {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::VeryLow => "Very low",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very high",
        }
    }

    /// Display colour as a hex RGB string.
    pub fn color(self) -> &'static str {
        match self {
            Self::VeryLow => "#16a34a",
            Self::Low => "#65a30d",
            Self::Medium => "#ca8a04",
            Self::High => "#ea580c",
            Self::VeryHigh => "#dc2626",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Packaging system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Packaging {
    /// Air, no barrier treatment.
    #[default]
    Normal,
    /// Vacuum packed.
    Vacuum,
    /// Modified atmosphere (MAP).
    ModifiedAtmosphere,
    /// Nitrogen flushed.
    Nitrogen,
}

impl Packaging {
    /// Shelf-life multiplier.
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Normal => 1.0,
            Self::Vacuum => 1.5,
            Self::ModifiedAtmosphere => 1.8,
            Self::Nitrogen => 2.0,
        }
    }

    /// Wire name, e.g. `modified-atmosphere`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Vacuum => "vacuum",
            Self::ModifiedAtmosphere => "modified-atmosphere",
            Self::Nitrogen => "nitrogen",
        }
    }
}

impl FromStr for Packaging {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        [Self::Normal, Self::Vacuum, Self::ModifiedAtmosphere, Self::Nitrogen]
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| AnalysisError::invalid(format!("unknown packaging '{s}'")))
    }
}

impl fmt::Display for Packaging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductType {
    /// Fresh product.
    Fresh,
    /// Semi-dried / intermediate product.
    #[default]
    SemiDried,
    /// Dried product.
    Dried,
    /// Frozen product.
    Frozen,
}

impl ProductType {
    /// Shelf-life multiplier.
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Fresh => 0.5,
            Self::SemiDried => 1.0,
            Self::Dried => 1.5,
            Self::Frozen => 3.0,
        }
    }

    /// Wire name, e.g. `semi-dried`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::SemiDried => "semi-dried",
            Self::Dried => "dried",
            Self::Frozen => "frozen",
        }
    }
}

impl FromStr for ProductType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        [Self::Fresh, Self::SemiDried, Self::Dried, Self::Frozen]
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| AnalysisError::invalid(format!("unknown product type '{s}'")))
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product and storage description for a risk assessment.
///
/// # Examples
///
/// ```
/// use u_foodsci::shelf_life::{StorageConditions, Packaging, ProductType};
///
/// let conditions = StorageConditions::new(0.65, 5.2, 22.0)
///     .unwrap()
///     .with_packaging(Packaging::Vacuum)
///     .with_product_type(ProductType::Dried)
///     .with_preservatives(true);
/// assert_eq!(conditions.packaging(), Packaging::Vacuum);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStorageConditions")]
pub struct StorageConditions {
    aw: f64,
    ph: f64,
    temperature_c: f64,
    preservatives: bool,
    packaging: Packaging,
    product_type: ProductType,
}

#[derive(Deserialize)]
struct RawStorageConditions {
    aw: f64,
    ph: f64,
    temperature_c: f64,
    #[serde(default)]
    preservatives: bool,
    #[serde(default)]
    packaging: Packaging,
    #[serde(default)]
    product_type: ProductType,
}

impl TryFrom<RawStorageConditions> for StorageConditions {
    type Error = AnalysisError;

    fn try_from(raw: RawStorageConditions) -> Result<Self> {
        Ok(Self::new(raw.aw, raw.ph, raw.temperature_c)?
            .with_preservatives(raw.preservatives)
            .with_packaging(raw.packaging)
            .with_product_type(raw.product_type))
    }
}

impl StorageConditions {
    /// Creates conditions with normal packaging, a semi-dried product and
    /// no preservatives.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidConfiguration`] if `aw` is outside
    /// `[0, 1]`, `ph` is outside `[0, 14]`, or any value is non-finite.
    pub fn new(aw: f64, ph: f64, temperature_c: f64) -> Result<Self> {
        if !aw.is_finite() || !(0.0..=1.0).contains(&aw) {
            return Err(AnalysisError::invalid(format!(
                "water activity must be within [0, 1], got {aw}"
            )));
        }
        if !ph.is_finite() || !(0.0..=14.0).contains(&ph) {
            return Err(AnalysisError::invalid(format!("pH must be within [0, 14], got {ph}")));
        }
        if !temperature_c.is_finite() {
            return Err(AnalysisError::invalid("storage temperature must be finite"));
        }
        Ok(Self {
            aw,
            ph,
            temperature_c,
            preservatives: false,
            packaging: Packaging::default(),
            product_type: ProductType::default(),
        })
    }

    /// Sets whether preservatives are used.
    pub fn with_preservatives(mut self, preservatives: bool) -> Self {
        self.preservatives = preservatives;
        self
    }

    /// Sets the packaging system.
    pub fn with_packaging(mut self, packaging: Packaging) -> Self {
        self.packaging = packaging;
        self
    }

    /// Sets the product category.
    pub fn with_product_type(mut self, product_type: ProductType) -> Self {
        self.product_type = product_type;
        self
    }

    /// Water activity.
    pub fn aw(&self) -> f64 {
        self.aw
    }

    /// pH.
    pub fn ph(&self) -> f64 {
        self.ph
    }

    /// Storage temperature, °C.
    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    /// Whether preservatives are used.
    pub fn preservatives(&self) -> bool {
        self.preservatives
    }

    /// Packaging system.
    pub fn packaging(&self) -> Packaging {
        self.packaging
    }

    /// Product category.
    pub fn product_type(&self) -> ProductType {
        self.product_type
    }
}

/// Water activity bracket description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwCategory {
    /// Bracket name.
    pub name: String,
    /// Organisms able to grow in the bracket.
    pub organisms_note: String,
}

struct AwBracket {
    upper: f64,
    base_days: f64,
    risk: RiskLevel,
    name: &'static str,
    organisms: &'static str,
}

/// Brackets in ascending order of their exclusive upper bound; the last one
/// also includes aw = 1.0.
static AW_BRACKETS: [AwBracket; 6] = [
    AwBracket {
        upper: 0.3,
        base_days: 365.0,
        risk: RiskLevel::VeryLow,
        name: "very dry",
        organisms: "no microbial growth; lipid oxidation limits quality",
    },
    AwBracket {
        upper: 0.5,
        base_days: 180.0,
        risk: RiskLevel::Low,
        name: "dry",
        organisms: "no microbial proliferation",
    },
    AwBracket {
        upper: 0.6,
        base_days: 90.0,
        risk: RiskLevel::Low,
        name: "low moisture",
        organisms: "practically no microbial growth; non-enzymatic browning possible",
    },
    AwBracket {
        upper: 0.7,
        base_days: 45.0,
        risk: RiskLevel::Medium,
        name: "intermediate moisture",
        organisms: "xerophilic molds and osmophilic yeasts",
    },
    AwBracket {
        upper: 0.85,
        base_days: 21.0,
        risk: RiskLevel::High,
        name: "moist",
        organisms: "most molds and yeasts, halophilic bacteria, Staphylococcus aureus near 0.85",
    },
    AwBracket {
        upper: 1.0,
        base_days: 7.0,
        risk: RiskLevel::VeryHigh,
        name: "high moisture",
        organisms: "most spoilage bacteria and pathogens, including Clostridium botulinum above 0.94",
    },
];

fn bracket_for(aw: f64) -> &'static AwBracket {
    AW_BRACKETS
        .iter()
        .find(|b| aw < b.upper)
        .unwrap_or(&AW_BRACKETS[AW_BRACKETS.len() - 1])
}

/// Result of a water activity assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterActivityAssessment {
    /// Estimated shelf life, whole days.
    pub predicted_days: u32,
    /// Estimated shelf life before rounding.
    pub unrounded_days: f64,
    /// Shelf life in weeks, one decimal.
    pub predicted_weeks: f64,
    /// Shelf life in 30-day months, one decimal.
    pub predicted_months: f64,
    /// Base shelf life of the aw bracket.
    pub base_days: f64,
    /// Risk level of the aw bracket.
    pub risk_level: RiskLevel,
    /// Conditions that shorten shelf life.
    pub risk_factors: Vec<String>,
    /// Conditions that extend shelf life: acidic pH, refrigerated storage,
    /// preservatives. Kept apart from `risk_factors` so every entry there
    /// shortens shelf life.
    pub protective_factors: Vec<String>,
    /// Suggested improvements.
    pub recommendations: Vec<String>,
    /// aw bracket description.
    pub aw_category: AwCategory,
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Estimates shelf life and spoilage risk from water activity and storage
/// conditions.
///
/// # Algorithm
/// 1. The aw bracket (0.3 / 0.5 / 0.6 / 0.7 / 0.85 / 1.0) gives base days and
///    the risk level; later steps never change the risk level.
/// 2. Multipliers: pH < 4.6 ×1.5, pH > 6.5 ×0.7, T ≤ 4 °C ×2, T ≥ 30 °C ×0.5,
///    preservatives ×1.3, then the packaging and product multipliers.
/// 3. Recommendations for aw > 0.6, normal packaging, and T > 25 °C for
///    non-frozen products.
///
/// # Examples
///
/// ```
/// use u_foodsci::shelf_life::{assess_water_activity, RiskLevel, StorageConditions};
///
/// let conditions = StorageConditions::new(0.4, 7.0, 20.0).unwrap();
/// let r = assess_water_activity(&conditions);
/// assert_eq!(r.aw_category.name, "dry");
/// assert_eq!(r.base_days, 180.0);
/// assert_eq!(r.predicted_days, 126);
/// assert_eq!(r.risk_level, RiskLevel::Low);
/// ```
pub fn assess_water_activity(conditions: &StorageConditions) -> WaterActivityAssessment {
    let bracket = bracket_for(conditions.aw);
    let mut days = bracket.base_days;
    let mut risk_factors = Vec::new();
    let mut protective_factors = Vec::new();
    let mut recommendations = Vec::new();

    if conditions.ph < 4.6 {
        days *= 1.5;
        protective_factors.push(format!(
            "Acidic product (pH {:.1} < 4.6) inhibits most pathogens",
            conditions.ph
        ));
    } else if conditions.ph > 6.5 {
        days *= 0.7;
        risk_factors.push(format!(
            "Near-neutral pH ({:.1} > 6.5) favours bacterial growth",
            conditions.ph
        ));
    }

    if conditions.temperature_c <= 4.0 {
        days *= 2.0;
        protective_factors.push(format!(
            "Refrigerated storage ({:.0} °C) slows spoilage",
            conditions.temperature_c
        ));
    } else if conditions.temperature_c >= 30.0 {
        days *= 0.5;
        risk_factors.push(format!(
            "High storage temperature ({:.0} °C) accelerates spoilage",
            conditions.temperature_c
        ));
    }

    if conditions.preservatives {
        days *= 1.3;
        protective_factors.push("Preservatives added".to_string());
    }

    days *= conditions.packaging.multiplier();
    days *= conditions.product_type.multiplier();

    if conditions.aw > 0.6 {
        recommendations.push(
            "Lower water activity below 0.6 (drying, salt or sugar) to limit microbial growth"
                .to_string(),
        );
    }
    if conditions.packaging == Packaging::Normal {
        recommendations
            .push("Use vacuum, modified-atmosphere or nitrogen packaging".to_string());
    }
    if conditions.temperature_c > 25.0 && conditions.product_type != ProductType::Frozen {
        recommendations.push("Store in a cool place, below 25 °C".to_string());
    }

    let rounded = days.round().max(0.0);
    let predicted_days = rounded as u32;

    tracing::debug!(
        aw = conditions.aw,
        risk = %bracket.risk,
        days = predicted_days,
        "water activity assessment"
    );

    WaterActivityAssessment {
        predicted_days,
        unrounded_days: days,
        predicted_weeks: round_to_tenth(rounded / 7.0),
        predicted_months: round_to_tenth(rounded / 30.0),
        base_days: bracket.base_days,
        risk_level: bracket.risk,
        risk_factors,
        protective_factors,
        recommendations,
        aw_category: AwCategory {
            name: bracket.name.to_string(),
            organisms_note: bracket.organisms.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions(aw: f64, ph: f64, temp: f64) -> StorageConditions {
        StorageConditions::new(aw, ph, temp).expect("valid conditions")
    }

    #[test]
    fn dry_bracket_with_neutral_ph() {
        let r = assess_water_activity(&conditions(0.4, 7.0, 20.0));
        assert_eq!(r.aw_category.name, "dry");
        assert_eq!(r.base_days, 180.0);
        assert!((r.unrounded_days - 126.0).abs() < 1e-9);
        assert_eq!(r.predicted_days, 126);
        assert_eq!(r.predicted_weeks, 18.0);
        assert_eq!(r.predicted_months, 4.2);
        assert_eq!(r.risk_factors.len(), 1);
    }

    #[test]
    fn brackets_are_monotone() {
        let aws = [0.1, 0.35, 0.55, 0.65, 0.8, 0.95];
        let results: Vec<_> = aws
            .iter()
            .map(|&aw| assess_water_activity(&conditions(aw, 5.5, 20.0)))
            .collect();
        for w in results.windows(2) {
            assert!(w[1].base_days < w[0].base_days);
            assert!(w[1].risk_level >= w[0].risk_level);
        }
        assert_eq!(results[0].risk_level, RiskLevel::VeryLow);
        assert_eq!(results[5].risk_level, RiskLevel::VeryHigh);
    }

    #[test]
    fn bracket_edges() {
        assert_eq!(bracket_for(0.0).name, "very dry");
        assert_eq!(bracket_for(0.3).name, "dry");
        assert_eq!(bracket_for(0.6).name, "intermediate moisture");
        assert_eq!(bracket_for(0.85).name, "high moisture");
        assert_eq!(bracket_for(1.0).name, "high moisture");
    }

    #[test]
    fn risk_level_ignores_adjustments() {
        let plain = assess_water_activity(&conditions(0.9, 7.0, 35.0));
        let protected = assess_water_activity(
            &conditions(0.9, 4.0, 2.0)
                .with_preservatives(true)
                .with_packaging(Packaging::Nitrogen)
                .with_product_type(ProductType::Frozen),
        );
        assert_eq!(plain.risk_level, RiskLevel::VeryHigh);
        assert_eq!(protected.risk_level, RiskLevel::VeryHigh);
        assert!(protected.predicted_days > plain.predicted_days);
    }

    #[test]
    fn all_multipliers_compound() {
        let r = assess_water_activity(
            &conditions(0.65, 4.0, 4.0)
                .with_preservatives(true)
                .with_packaging(Packaging::ModifiedAtmosphere)
                .with_product_type(ProductType::Dried),
        );
        let expected = 45.0 * 1.5 * 2.0 * 1.3 * 1.8 * 1.5;
        assert!((r.unrounded_days - expected).abs() < 1e-9);
        assert_eq!(r.predicted_days, expected.round() as u32);
        assert_eq!(r.protective_factors.len(), 3);
        assert!(r.protective_factors.iter().any(|f| f.contains("Acidic")));
        assert!(r.protective_factors.iter().any(|f| f.contains("Refrigerated")));
        assert!(r.protective_factors.iter().any(|f| f.contains("Preservatives")));
        assert!(r.risk_factors.is_empty());
    }

    #[test]
    fn warm_storage_halves_and_recommends_cooling() {
        let r = assess_water_activity(
            &conditions(0.2, 5.0, 32.0).with_packaging(Packaging::Vacuum),
        );
        assert!((r.unrounded_days - 365.0 * 0.5 * 1.5).abs() < 1e-9);
        assert_eq!(r.risk_factors.len(), 1);
        assert_eq!(
            r.recommendations,
            vec!["Store in a cool place, below 25 °C".to_string()]
        );
    }

    #[test]
    fn frozen_products_skip_cooling_advice() {
        let r = assess_water_activity(
            &conditions(0.7, 6.0, 28.0)
                .with_product_type(ProductType::Frozen)
                .with_packaging(Packaging::Vacuum),
        );
        assert_eq!(r.recommendations.len(), 1); // aw only
        assert!(r.recommendations[0].contains("water activity"));
    }

    #[test]
    fn general_recommendations() {
        let r = assess_water_activity(&conditions(0.9, 6.0, 27.0));
        assert_eq!(r.recommendations.len(), 3);
    }

    #[test]
    fn invalid_conditions() {
        for (aw, ph, t) in [
            (1.2, 6.0, 20.0),
            (-0.1, 6.0, 20.0),
            (f64::NAN, 6.0, 20.0),
            (0.5, 15.0, 20.0),
            (0.5, 6.0, f64::INFINITY),
        ] {
            let err = StorageConditions::new(aw, ph, t).expect_err("invalid");
            assert!(matches!(err, AnalysisError::InvalidConfiguration(_)));
        }
    }

    #[test]
    fn wire_names() {
        assert_eq!(
            "modified-atmosphere".parse::<Packaging>(),
            Ok(Packaging::ModifiedAtmosphere)
        );
        assert_eq!("semi-dried".parse::<ProductType>(), Ok(ProductType::SemiDried));
        assert!("tin".parse::<Packaging>().is_err());
        assert_eq!(
            serde_json::to_string(&RiskLevel::VeryHigh).expect("serialize"),
            "\"very-high\""
        );
        assert_eq!(Packaging::Nitrogen.to_string(), "nitrogen");
    }

    #[test]
    fn conditions_deserialize_with_defaults() {
        let c: StorageConditions =
            serde_json::from_str(r#"{"aw":0.5,"ph":5.0,"temperature_c":20.0}"#).expect("json");
        assert_eq!(c.packaging(), Packaging::Normal);
        assert_eq!(c.product_type(), ProductType::SemiDried);
        assert!(!c.preservatives());

        let c: StorageConditions = serde_json::from_str(
            r#"{"aw":0.5,"ph":5.0,"temperature_c":20.0,"packaging":"nitrogen","product_type":"frozen","preservatives":true}"#,
        )
        .expect("json");
        assert_eq!(c.packaging(), Packaging::Nitrogen);
        assert_eq!(c.product_type(), ProductType::Frozen);

        let out_of_range = r#"{"aw":1.5,"ph":5.0,"temperature_c":20.0}"#;
        assert!(serde_json::from_str::<StorageConditions>(out_of_range).is_err());
    }

    #[test]
    fn presentation_maps() {
        assert_eq!(RiskLevel::Medium.label(), "Medium");
        assert!(RiskLevel::High.color().starts_with('#'));
        assert_eq!(RiskLevel::VeryLow.to_string(), "Very low");
    }
}
