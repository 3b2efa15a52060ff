//! Prediction collaborator boundary.
//!
//! The model itself is a black box. The pipeline only sees the [`Predictor`]
//! trait, so the concrete backend (a local linear artifact, a remote scoring
//! service, or a test double) can be swapped without touching anything else.
//!
//! - `gateway`: contract enforcement + timeout around any predictor
//! - `http`: remote scoring service over JSON
//! - `linear`: serialized linear regression artifact

use std::fmt;

use crate::domain::InputRecord;

pub mod gateway;
pub mod http;
pub mod linear;

pub use gateway::*;
pub use http::*;
pub use linear::*;

/// Anything that can turn a validated record into a raw cost estimate.
///
/// Implementations return the collaborator's number as-is; range checks are the
/// gateway's job.
pub trait Predictor: Send + Sync {
    fn predict(&self, record: &InputRecord) -> Result<f64, PredictorFault>;

    /// Short description for status lines and logs.
    fn describe(&self) -> String;
}

/// The collaborator could not produce an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictorFault {
    message: String,
}

impl PredictorFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for PredictorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PredictorFault {}
