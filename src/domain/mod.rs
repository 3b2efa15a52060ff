//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the field registry (`Field`, `FieldSpec`, `Domain`)
//! - validated records and prediction results (`InputRecord`, `PredictionResult`)
//! - derived presentation metrics and their policy (`DerivedMetrics`, `RiskPolicy`)

pub mod field;
pub mod types;

pub use field::*;
pub use types::*;
