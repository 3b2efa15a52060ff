//! Shared domain types.
//!
//! These types are intentionally kept small and serializable so they can be:
//!
//! - passed through the prediction pipeline
//! - sent to the prediction collaborator as JSON
//! - printed by `premium predict --json`

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use super::field::Field;

/// A validated field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Number(_) => None,
            FieldValue::Text(s) => Some(s),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Number(v) => write!(f, "{v}"),
            FieldValue::Text(s) => write!(f, "{s:?}"),
        }
    }
}

// Whole numbers go over the wire as JSON integers; the form only produces
// integral values and the collaborator was fit on integer columns.
impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Number(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => {
                serializer.serialize_i64(*v as i64)
            }
            FieldValue::Number(v) => serializer.serialize_f64(*v),
            FieldValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// One validated value per registry field, in registry order.
///
/// Only the request builder constructs these, so every value is known to lie
/// within its field's domain.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRecord {
    values: Vec<FieldValue>,
}

impl InputRecord {
    pub(crate) fn from_validated(values: Vec<FieldValue>) -> Self {
        debug_assert_eq!(values.len(), Field::COUNT);
        Self { values }
    }

    pub fn get(&self, field: Field) -> &FieldValue {
        &self.values[field.index()]
    }

    pub fn number(&self, field: Field) -> Option<f64> {
        self.get(field).as_number()
    }

    pub fn text(&self, field: Field) -> Option<&str> {
        self.get(field).as_text()
    }

    /// Iterate `(field, value)` pairs in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        Field::ALL.into_iter().zip(self.values.iter())
    }
}

/// Serializes as the collaborator's 12-key object.
impl Serialize for InputRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.name(), value)?;
        }
        map.end()
    }
}

/// A finite, non-negative cost estimate.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct PredictionResult(f64);

impl PredictionResult {
    /// Returns `None` for negative or non-finite values.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && value >= 0.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Qualitative cost classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CostBand {
    Affordable,
    High,
}

impl CostBand {
    pub fn label(self) -> &'static str {
        match self {
            CostBand::Affordable => "affordable",
            CostBand::High => "high",
        }
    }

    /// Advice line shown under the predicted cost.
    pub fn message(self) -> &'static str {
        match self {
            CostBand::Affordable => "Your predicted premium is within an affordable range.",
            CostBand::High => {
                "This is a relatively high premium. Consider reviewing risk factors such as \
                 smoking status, age, or pre-existing conditions."
            }
        }
    }
}

/// Axis labels of the risk radar, in vector order.
pub const RISK_AXES: [&str; 5] = ["Age", "Genetical Risk", "BMI Risk", "Smoking Risk", "Medical Risk"];

/// Radar values in [0, 1], ordered as [`RISK_AXES`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RiskVector(pub [f64; 5]);

impl RiskVector {
    pub fn values(&self) -> &[f64; 5] {
        &self.0
    }

    pub fn axes(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        RISK_AXES.into_iter().zip(self.0.iter().copied())
    }
}

/// Presentation artifacts derived from one record and its prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub risk_vector: RiskVector,
    pub cost_band: CostBand,
}

/// Product policy constants for the derived metrics.
///
/// None of these are learned; they are knobs so that product changes do not
/// require touching the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskPolicy {
    /// Age is divided by this value.
    pub age_scale: f64,
    /// Genetical risk is divided by this value.
    pub genetic_scale: f64,
    /// Radar value when BMI category is not "Normal".
    pub bmi_weight: f64,
    /// Radar value when the person smokes at all.
    pub smoking_weight: f64,
    /// Radar value when any prior condition is reported.
    pub medical_weight: f64,
    /// Costs strictly above this are classified as high.
    pub high_cost_threshold: f64,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            age_scale: 100.0,
            genetic_scale: 5.0,
            bmi_weight: 0.3,
            smoking_weight: 0.4,
            medical_weight: 0.5,
            high_cost_threshold: 50_000.0,
        }
    }
}

impl RiskPolicy {
    /// Check that the policy can only produce radar values in [0, 1].
    pub fn validate(&self) -> Result<(), String> {
        for (name, scale) in [("age scale", self.age_scale), ("genetic scale", self.genetic_scale)] {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(format!("{name} must be a positive number (got {scale})."));
            }
        }
        for (name, weight) in [
            ("BMI weight", self.bmi_weight),
            ("smoking weight", self.smoking_weight),
            ("medical weight", self.medical_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(format!("{name} must be within [0, 1] (got {weight})."));
            }
        }
        if !(self.high_cost_threshold.is_finite() && self.high_cost_threshold >= 0.0) {
            return Err(format!(
                "high-cost threshold must be a non-negative number (got {}).",
                self.high_cost_threshold
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_result_rejects_negative_and_non_finite() {
        assert!(PredictionResult::new(0.0).is_some());
        assert!(PredictionResult::new(12_345.0).is_some());
        assert!(PredictionResult::new(-1.0).is_none());
        assert!(PredictionResult::new(f64::NAN).is_none());
        assert!(PredictionResult::new(f64::INFINITY).is_none());
    }

    #[test]
    fn field_values_serialize_integral_numbers_as_integers() {
        let json = serde_json::to_string(&FieldValue::Number(30.0)).unwrap();
        assert_eq!(json, "30");
        let json = serde_json::to_string(&FieldValue::Number(2.5)).unwrap();
        assert_eq!(json, "2.5");
        let json = serde_json::to_string(&FieldValue::Text(String::new())).unwrap();
        assert_eq!(json, "\"\"");
    }

    #[test]
    fn default_policy_is_valid() {
        assert!(RiskPolicy::default().validate().is_ok());
    }

    #[test]
    fn policy_rejects_zero_scale_and_heavy_weights() {
        let zero_scale = RiskPolicy { age_scale: 0.0, ..RiskPolicy::default() };
        assert!(zero_scale.validate().is_err());

        let heavy = RiskPolicy { medical_weight: 1.5, ..RiskPolicy::default() };
        assert!(heavy.validate().is_err());

        let negative = RiskPolicy { high_cost_threshold: -1.0, ..RiskPolicy::default() };
        assert!(negative.validate().is_err());
    }
}
