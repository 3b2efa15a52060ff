//! Serialized linear regression artifact.
//!
//! File format (JSON):
//!
//! ```text
//! {
//!   "intercept": 2500.0,
//!   "numeric": {
//!     "Age": { "weight": 9000.0, "scale": [18, 100] },
//!     "Number of Dependants": { "weight": 350.0 }
//!   },
//!   "categorical": {
//!     "Insurance Plan": { "Silver": 4000.0, "Gold": 9000.0 }
//!   }
//! }
//! ```
//!
//! Numeric terms are min-max scaled when `scale` is given, otherwise used raw.
//! Categorical terms are one-hot; a label without a weight is the reference
//! level and contributes nothing. Every field and label is checked against the
//! registry at load time, so a stale artifact fails loudly instead of silently
//! ignoring inputs.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use nalgebra::DVector;
use serde::Deserialize;

use crate::domain::{Domain, Field, FieldKind, InputRecord};
use crate::error::{AppError, EXIT_USAGE};

use super::{Predictor, PredictorFault};

/// Environment variable naming a linear model artifact.
pub const ENV_MODEL_PATH: &str = "PREMIUM_MODEL_PATH";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LinearModelFile {
    intercept: f64,
    #[serde(default)]
    numeric: BTreeMap<String, NumericTerm>,
    #[serde(default)]
    categorical: BTreeMap<String, BTreeMap<String, f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NumericTerm {
    weight: f64,
    #[serde(default)]
    scale: Option<[f64; 2]>,
}

/// How one model feature is computed from a record.
#[derive(Debug, Clone, PartialEq)]
enum Feature {
    Numeric { field: Field, offset: f64, span: f64 },
    OneHot { field: Field, label: String },
}

impl Feature {
    fn encode(&self, record: &InputRecord) -> f64 {
        match self {
            Feature::Numeric { field, offset, span } => {
                (record.number(*field).unwrap_or_default() - offset) / span
            }
            Feature::OneHot { field, label } => {
                if record.text(*field) == Some(label.as_str()) { 1.0 } else { 0.0 }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct LinearModel {
    source: String,
    intercept: f64,
    features: Vec<Feature>,
    weights: DVector<f64>,
}

impl LinearModel {
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)
            .map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to open model file '{}': {e}", path.display())))?;
        let parsed: LinearModelFile = serde_json::from_reader(file)
            .map_err(|e| AppError::new(EXIT_USAGE, format!("Invalid model file '{}': {e}", path.display())))?;
        Self::from_parsed(parsed, path.display().to_string())
    }

    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        let parsed: LinearModelFile =
            serde_json::from_str(json).map_err(|e| AppError::new(EXIT_USAGE, format!("Invalid model JSON: {e}")))?;
        Self::from_parsed(parsed, "inline".to_string())
    }

    fn from_parsed(file: LinearModelFile, source: String) -> Result<Self, AppError> {
        if !file.intercept.is_finite() {
            return Err(AppError::new(EXIT_USAGE, "Model intercept must be finite."));
        }

        let mut features = Vec::new();
        let mut weights = Vec::new();

        for (name, term) in &file.numeric {
            let field = resolve_field(name, FieldKind::Numeric)?;
            if !term.weight.is_finite() {
                return Err(AppError::new(EXIT_USAGE, format!("Weight for '{name}' must be finite.")));
            }
            let (offset, span) = match term.scale {
                Some([lo, hi]) if lo.is_finite() && hi.is_finite() && hi > lo => (lo, hi - lo),
                Some([lo, hi]) => {
                    return Err(AppError::new(
                        EXIT_USAGE,
                        format!("Scale for '{name}' must satisfy min < max (got [{lo}, {hi}])."),
                    ));
                }
                None => (0.0, 1.0),
            };
            features.push(Feature::Numeric { field, offset, span });
            weights.push(term.weight);
        }

        for (name, levels) in &file.categorical {
            let field = resolve_field(name, FieldKind::Categorical)?;
            let labels = match field.spec().domain {
                Domain::Categorical(labels) => labels,
                Domain::Numeric { .. } => &[],
            };
            for (label, weight) in levels {
                if !labels.contains(&label.as_str()) {
                    return Err(AppError::new(
                        EXIT_USAGE,
                        format!("Model references unknown {name} label {label:?}."),
                    ));
                }
                if !weight.is_finite() {
                    return Err(AppError::new(
                        EXIT_USAGE,
                        format!("Weight for {name} = {label:?} must be finite."),
                    ));
                }
                features.push(Feature::OneHot { field, label: label.clone() });
                weights.push(*weight);
            }
        }

        Ok(Self {
            source,
            intercept: file.intercept,
            features,
            weights: DVector::from_vec(weights),
        })
    }

    /// Try `PREMIUM_MODEL_PATH` (a `.env` file is honored).
    pub fn from_env() -> Result<Option<Self>, AppError> {
        dotenvy::dotenv().ok();
        match std::env::var(ENV_MODEL_PATH) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(path.trim())).map(Some),
            _ => Ok(None),
        }
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Unrounded linear score.
    pub fn score(&self, record: &InputRecord) -> f64 {
        let x = DVector::from_iterator(self.features.len(), self.features.iter().map(|f| f.encode(record)));
        self.intercept + self.weights.dot(&x)
    }
}

impl Predictor for LinearModel {
    fn predict(&self, record: &InputRecord) -> Result<f64, PredictorFault> {
        // Costs are quoted in whole currency units.
        Ok(self.score(record).round())
    }

    fn describe(&self) -> String {
        format!("linear model ({}, {} features)", self.source, self.features.len())
    }
}

fn resolve_field(name: &str, expected: FieldKind) -> Result<Field, AppError> {
    let field = Field::from_name(name)
        .ok_or_else(|| AppError::new(EXIT_USAGE, format!("Model references unknown field '{name}'.")))?;
    let kind = field.spec().kind();
    if kind != expected {
        return Err(AppError::new(
            EXIT_USAGE,
            format!("Model treats '{name}' as {expected}, but it is a {kind} field."),
        ));
    }
    Ok(field)
}
