//! Request builder: raw form input -> validated `InputRecord`.
//!
//! Validation is atomic. Every field is checked and every violation is
//! collected, so a front-end can flag all offending controls at once instead of
//! making the user fix them one by one.

use std::fmt;

use crate::domain::{Domain, Field, FieldKind, FieldValue, InputRecord};

use super::raw::{RawInput, RawValue};

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldViolation {
    /// The raw input named a field that is not in the registry.
    UnknownField { name: String },
    /// A registry field was not supplied.
    MissingField { field: Field },
    /// A number outside `min..=max` (or not finite).
    OutOfRange { field: Field, value: f64, min: f64, max: f64 },
    /// A label outside the field's allowed set.
    InvalidCategory { field: Field, value: String },
    /// Text supplied for a numeric field or a number for a categorical one.
    WrongKind { field: Field, expected: FieldKind },
}

impl FieldViolation {
    /// The registry field this violation refers to, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            FieldViolation::UnknownField { .. } => None,
            FieldViolation::MissingField { field }
            | FieldViolation::OutOfRange { field, .. }
            | FieldViolation::InvalidCategory { field, .. }
            | FieldViolation::WrongKind { field, .. } => Some(*field),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldViolation::UnknownField { name } => write!(f, "unknown field {name:?}"),
            FieldViolation::MissingField { field } => write!(f, "{field}: missing"),
            FieldViolation::OutOfRange { field, value, min, max } => {
                write!(f, "{field}: {value} is outside {min}..={max}")
            }
            FieldViolation::InvalidCategory { field, value } => {
                write!(f, "{field}: {value:?} is not one of {}", field.spec().domain.describe())
            }
            FieldViolation::WrongKind { field, expected } => {
                write!(f, "{field}: expected a {expected} value")
            }
        }
    }
}

/// All violations found while building one record.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Whether any violation refers to `field`.
    pub fn touches(&self, field: Field) -> bool {
        self.violations.iter().any(|v| v.field() == Some(field))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invalid field(s): ", self.violations.len())?;
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate `raw` against the registry and assemble a record.
pub fn build(raw: &RawInput) -> Result<InputRecord, ValidationErrors> {
    let mut violations = Vec::new();

    for (name, _) in raw.iter() {
        if Field::from_name(name).is_none() {
            violations.push(FieldViolation::UnknownField { name: name.to_string() });
        }
    }

    let mut values = Vec::with_capacity(Field::COUNT);
    for field in Field::ALL {
        let Some(value) = raw.get(field.name()) else {
            violations.push(FieldViolation::MissingField { field });
            continue;
        };
        match validate_value(field, value) {
            Ok(v) => values.push(v),
            Err(violation) => violations.push(violation),
        }
    }

    if violations.is_empty() {
        Ok(InputRecord::from_validated(values))
    } else {
        Err(ValidationErrors { violations })
    }
}

fn validate_value(field: Field, value: &RawValue) -> Result<FieldValue, FieldViolation> {
    match (field.spec().domain, value) {
        (Domain::Numeric { min, max, .. }, RawValue::Number(v)) => {
            // NaN fails both comparisons and lands here too.
            if v.is_finite() && *v >= min && *v <= max {
                Ok(FieldValue::Number(*v))
            } else {
                Err(FieldViolation::OutOfRange { field, value: *v, min, max })
            }
        }
        (Domain::Categorical(labels), RawValue::Text(s)) => {
            if labels.contains(&s.as_str()) {
                Ok(FieldValue::Text(s.clone()))
            } else {
                Err(FieldViolation::InvalidCategory { field, value: s.clone() })
            }
        }
        (domain, _) => Err(FieldViolation::WrongKind { field, expected: domain.kind() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_input() -> RawInput {
        let mut raw = RawInput::form_defaults();
        raw.set("Age", 30.0);
        raw.set("Genetical Risk", 2.0);
        raw.set("BMI Category", "Obesity");
        raw.set("Smoking Status", "Regular");
        raw.set("Medical History", "Diabetes");
        raw
    }

    #[test]
    fn valid_input_builds_record_with_identical_values() {
        let raw = scenario_input();
        let record = build(&raw).unwrap();

        for (field, value) in record.iter() {
            let expected = match raw.get(field.name()).unwrap() {
                RawValue::Number(v) => FieldValue::Number(*v),
                RawValue::Text(s) => FieldValue::Text(s.clone()),
            };
            assert_eq!(value, &expected, "{field}");
        }
        assert_eq!(record.number(Field::Age), Some(30.0));
        assert_eq!(record.text(Field::BmiCategory), Some("Obesity"));
    }

    #[test]
    fn every_label_of_every_categorical_field_is_accepted() {
        for field in Field::ALL {
            let Domain::Categorical(labels) = field.spec().domain else { continue };
            for label in labels {
                let mut raw = RawInput::form_defaults();
                raw.set(field.name(), *label);
                assert!(build(&raw).is_ok(), "{field} = {label:?}");
            }
        }
    }

    #[test]
    fn numeric_bounds_are_inclusive_and_one_step_outside_fails() {
        for field in Field::ALL {
            let Domain::Numeric { min, max, step } = field.spec().domain else { continue };

            for ok in [min, max] {
                let mut raw = RawInput::form_defaults();
                raw.set(field.name(), ok);
                assert!(build(&raw).is_ok(), "{field} = {ok}");
            }

            for bad in [min - step, max + step] {
                let mut raw = RawInput::form_defaults();
                raw.set(field.name(), bad);
                let err = build(&raw).unwrap_err();
                assert_eq!(
                    err.violations(),
                    &[FieldViolation::OutOfRange { field, value: bad, min, max }]
                );
            }
        }
    }

    #[test]
    fn non_finite_numbers_are_out_of_range() {
        let mut raw = RawInput::form_defaults();
        raw.set("Income in Lakhs", f64::NAN);
        let err = build(&raw).unwrap_err();
        assert!(matches!(
            err.violations(),
            [FieldViolation::OutOfRange { field: Field::IncomeInLakhs, .. }]
        ));
    }

    #[test]
    fn unknown_category_is_rejected_but_empty_employment_is_valid() {
        let mut raw = RawInput::form_defaults();
        raw.set("Employment Status", "");
        assert!(build(&raw).is_ok());

        raw.set("Region", "Central");
        let err = build(&raw).unwrap_err();
        assert_eq!(
            err.violations(),
            &[FieldViolation::InvalidCategory { field: Field::Region, value: "Central".to_string() }]
        );

        let mut raw = RawInput::form_defaults();
        raw.set("Gender", "");
        assert!(build(&raw).is_err());
    }

    #[test]
    fn all_violations_are_reported_together() {
        let mut raw = RawInput::form_defaults();
        raw.set("Age", 17.0);
        raw.set("Number of Dependants", "two");
        raw.set("Smoking Status", "Heavy");
        raw.remove("Region");
        raw.set("Blood Type", "O+");

        let err = build(&raw).unwrap_err();
        assert_eq!(err.violations().len(), 5);
        assert!(err.touches(Field::Age));
        assert!(err.touches(Field::NumberOfDependants));
        assert!(err.touches(Field::SmokingStatus));
        assert!(err.touches(Field::Region));
        assert!(err
            .violations()
            .contains(&FieldViolation::UnknownField { name: "Blood Type".to_string() }));
        assert!(err.violations().contains(&FieldViolation::WrongKind {
            field: Field::NumberOfDependants,
            expected: FieldKind::Numeric,
        }));
    }

    #[test]
    fn number_for_categorical_field_is_wrong_kind() {
        let mut raw = RawInput::form_defaults();
        raw.set("Gender", 1.0);
        let err = build(&raw).unwrap_err();
        assert_eq!(
            err.violations(),
            &[FieldViolation::WrongKind { field: Field::Gender, expected: FieldKind::Categorical }]
        );
    }

    #[test]
    fn error_message_lists_each_violation() {
        let mut raw = RawInput::form_defaults();
        raw.set("Age", 101.0);
        raw.set("Region", "Central");
        let msg = build(&raw).unwrap_err().to_string();
        assert!(msg.starts_with("2 invalid field(s)"));
        assert!(msg.contains("Age: 101 is outside 18..=100"));
        assert!(msg.contains("Region: \"Central\""));
    }
}
