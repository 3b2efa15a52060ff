//! Unvalidated form input.
//!
//! `RawInput` is what a front-end hands to the request builder: a loose map from
//! field name to value. It may contain unknown keys, miss fields, or hold values
//! of the wrong kind; the builder is responsible for catching all of that.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Domain, Field, FieldKind};
use crate::error::{AppError, EXIT_USAGE};

/// A raw value as typed or selected by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// Field name -> raw value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawInput {
    values: BTreeMap<String, RawValue>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// The form's initial state: numeric fields at their minimum, categorical
    /// fields at their first label.
    pub fn form_defaults() -> Self {
        let mut raw = Self::new();
        for field in Field::ALL {
            let value = match field.spec().domain {
                Domain::Numeric { min, .. } => RawValue::Number(min),
                Domain::Categorical(labels) => RawValue::Text(labels[0].to_string()),
            };
            raw.set(field.name(), value);
        }
        raw
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<RawValue> {
        self.values.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Apply a `KEY=VALUE` override (as passed to `premium predict --set`).
    ///
    /// Known fields take the value in their registry kind: numeric fields parse
    /// it as a number, categorical fields keep it as a label. Unknown keys are
    /// kept as a finite number or text for the builder to reject. `KEY=` sets
    /// the empty label.
    pub fn apply_override(&mut self, assignment: &str) -> Result<(), AppError> {
        let Some((key, value)) = assignment.split_once('=') else {
            return Err(AppError::new(
                EXIT_USAGE,
                format!("Invalid override '{assignment}': expected KEY=VALUE."),
            ));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::new(
                EXIT_USAGE,
                format!("Invalid override '{assignment}': empty field name."),
            ));
        }
        let value = value.trim();
        let kind = Field::from_name(key).map(|field| field.spec().kind());
        let raw = match (kind, value.parse::<f64>()) {
            (Some(FieldKind::Categorical), _) => RawValue::Text(value.to_string()),
            (Some(FieldKind::Numeric), Ok(v)) => RawValue::Number(v),
            (None, Ok(v)) if v.is_finite() => RawValue::Number(v),
            _ => RawValue::Text(value.to_string()),
        };
        self.set(key, raw);
        Ok(())
    }

    /// Read a JSON object of field name -> value.
    pub fn read_json(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)
            .map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to open input JSON '{}': {e}", path.display())))?;
        serde_json::from_reader(file).map_err(|e| AppError::new(EXIT_USAGE, format!("Invalid input JSON: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{FieldViolation, build};

    #[test]
    fn form_defaults_cover_every_field() {
        let raw = RawInput::form_defaults();
        assert_eq!(raw.len(), Field::COUNT);
        assert_eq!(raw.get("Age"), Some(&RawValue::Number(18.0)));
        assert_eq!(raw.get("Insurance Plan"), Some(&RawValue::Text("Bronze".to_string())));
        assert_eq!(raw.get("Employment Status"), Some(&RawValue::Text("Salaried".to_string())));
    }

    #[test]
    fn overrides_parse_numbers_and_text() {
        let mut raw = RawInput::new();
        raw.apply_override("Age=42").unwrap();
        raw.apply_override("Smoking Status = Regular").unwrap();
        raw.apply_override("Employment Status=").unwrap();

        assert_eq!(raw.get("Age"), Some(&RawValue::Number(42.0)));
        assert_eq!(raw.get("Smoking Status"), Some(&RawValue::Text("Regular".to_string())));
        assert_eq!(raw.get("Employment Status"), Some(&RawValue::Text(String::new())));
    }

    #[test]
    fn overrides_follow_the_field_kind() {
        let mut raw = RawInput::form_defaults();
        raw.apply_override("Region=inf").unwrap();
        raw.apply_override("Marital Status=1").unwrap();
        raw.apply_override("Age=inf").unwrap();
        assert_eq!(raw.get("Region"), Some(&RawValue::Text("inf".to_string())));
        assert_eq!(raw.get("Marital Status"), Some(&RawValue::Text("1".to_string())));
        assert_eq!(raw.get("Age"), Some(&RawValue::Number(f64::INFINITY)));

        let errors = build(&raw).unwrap_err();
        assert!(errors.violations().iter().any(|v| matches!(
            v,
            FieldViolation::InvalidCategory { field: Field::Region, .. }
        )));
        assert!(errors.violations().iter().any(|v| matches!(
            v,
            FieldViolation::InvalidCategory { field: Field::MaritalStatus, .. }
        )));
        assert!(errors.violations().iter().any(|v| matches!(
            v,
            FieldViolation::OutOfRange { field: Field::Age, .. }
        )));
        assert!(!errors.violations().iter().any(|v| matches!(v, FieldViolation::WrongKind { .. })));
    }

    #[test]
    fn non_numeric_text_for_numeric_field_stays_text() {
        let mut raw = RawInput::new();
        raw.apply_override("Age=thirty").unwrap();
        raw.apply_override("Shoe Size=nan").unwrap();
        assert_eq!(raw.get("Age"), Some(&RawValue::Text("thirty".to_string())));
        assert_eq!(raw.get("Shoe Size"), Some(&RawValue::Text("nan".to_string())));
    }

    #[test]
    fn overrides_without_equals_are_rejected() {
        let mut raw = RawInput::new();
        let err = raw.apply_override("Age").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(raw.apply_override("=5").is_err());
    }

    #[test]
    fn json_objects_deserialize_with_mixed_kinds() {
        let raw: RawInput =
            serde_json::from_str(r#"{"Age": 30, "Gender": "Female", "Genetical Risk": 2.0}"#).unwrap();
        assert_eq!(raw.get("Age"), Some(&RawValue::Number(30.0)));
        assert_eq!(raw.get("Gender"), Some(&RawValue::Text("Female".to_string())));
        assert_eq!(raw.get("Genetical Risk"), Some(&RawValue::Number(2.0)));
    }
}
