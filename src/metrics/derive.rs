//! Risk radar and cost band.
//!
//! Pure functions of the record, the prediction and the policy. No model call,
//! no randomness: the same inputs always give bit-identical outputs.

use crate::domain::{CostBand, DerivedMetrics, Field, InputRecord, PredictionResult, RiskPolicy, RiskVector};

/// Labels that count as "no risk" for the binary radar components.
pub const BASELINE_BMI: &str = "Normal";
pub const BASELINE_SMOKING: &str = "No Smoking";
pub const BASELINE_MEDICAL: &str = "No Disease";

pub fn derive_metrics(record: &InputRecord, result: PredictionResult, policy: &RiskPolicy) -> DerivedMetrics {
    DerivedMetrics {
        risk_vector: risk_vector(record, policy),
        cost_band: cost_band(result, policy),
    }
}

/// Build the five radar components `[age, genetic, bmi, smoking, medical]`.
pub fn risk_vector(record: &InputRecord, policy: &RiskPolicy) -> RiskVector {
    // The builder guarantees every field is present with the right kind.
    let age = record.number(Field::Age).unwrap_or_default();
    let genetic = record.number(Field::GeneticalRisk).unwrap_or_default();

    let flag = |field: Field, baseline: &str, weight: f64| {
        if record.text(field).is_some_and(|v| v != baseline) { weight } else { 0.0 }
    };

    RiskVector([
        (age / policy.age_scale).clamp(0.0, 1.0),
        (genetic / policy.genetic_scale).clamp(0.0, 1.0),
        flag(Field::BmiCategory, BASELINE_BMI, policy.bmi_weight),
        flag(Field::SmokingStatus, BASELINE_SMOKING, policy.smoking_weight),
        flag(Field::MedicalHistory, BASELINE_MEDICAL, policy.medical_weight),
    ])
}

/// Strictly above the threshold is high; the threshold itself is affordable.
pub fn cost_band(result: PredictionResult, policy: &RiskPolicy) -> CostBand {
    if result.value() > policy.high_cost_threshold {
        CostBand::High
    } else {
        CostBand::Affordable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{RawInput, build};

    fn scenario_record() -> InputRecord {
        let mut raw = RawInput::form_defaults();
        raw.set("Age", 30.0);
        raw.set("Genetical Risk", 2.0);
        raw.set("BMI Category", "Obesity");
        raw.set("Smoking Status", "Regular");
        raw.set("Medical History", "Diabetes");
        build(&raw).unwrap()
    }

    fn cost(v: f64) -> PredictionResult {
        PredictionResult::new(v).unwrap()
    }

    #[test]
    fn scenario_risk_vector() {
        let v = risk_vector(&scenario_record(), &RiskPolicy::default());
        let expected = [0.30, 0.40, 0.30, 0.40, 0.50];
        for (got, want) in v.values().iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "{:?} vs {expected:?}", v.values());
        }
    }

    #[test]
    fn baseline_labels_contribute_zero() {
        let record = build(&RawInput::form_defaults()).unwrap();
        let v = risk_vector(&record, &RiskPolicy::default());
        assert_eq!(&v.values()[2..], &[0.0, 0.0, 0.0]);
        assert!((v.values()[0] - 0.18).abs() < 1e-12);
        assert_eq!(v.values()[1], 0.0);
    }

    #[test]
    fn metrics_are_deterministic() {
        let record = scenario_record();
        let policy = RiskPolicy::default();
        let first = derive_metrics(&record, cost(42_000.0), &policy);
        for _ in 0..10 {
            let again = derive_metrics(&record, cost(42_000.0), &policy);
            assert_eq!(again, first);
            for (a, b) in again.risk_vector.values().iter().zip(first.risk_vector.values()) {
                assert_eq!(a.to_bits(), b.to_bits());
            }
        }
    }

    #[test]
    fn cost_band_threshold_is_strict() {
        let policy = RiskPolicy::default();
        assert_eq!(cost_band(cost(60_000.0), &policy), CostBand::High);
        assert_eq!(cost_band(cost(49_999.0), &policy), CostBand::Affordable);
        assert_eq!(cost_band(cost(50_000.0), &policy), CostBand::Affordable);
        assert_eq!(cost_band(cost(50_000.01), &policy), CostBand::High);
    }

    #[test]
    fn policy_changes_weights_and_threshold() {
        let policy = RiskPolicy {
            bmi_weight: 0.6,
            smoking_weight: 1.0,
            medical_weight: 0.25,
            high_cost_threshold: 10_000.0,
            ..RiskPolicy::default()
        };
        let metrics = derive_metrics(&scenario_record(), cost(20_000.0), &policy);
        assert_eq!(&metrics.risk_vector.values()[2..], &[0.6, 1.0, 0.25]);
        assert_eq!(metrics.cost_band, CostBand::High);
    }

    #[test]
    fn radar_stays_within_unit_interval_for_small_scales() {
        let policy = RiskPolicy { age_scale: 50.0, ..RiskPolicy::default() };
        let mut raw = RawInput::form_defaults();
        raw.set("Age", 90.0);
        let v = risk_vector(&build(&raw).unwrap(), &policy);
        assert_eq!(v.values()[0], 1.0);
    }
}
