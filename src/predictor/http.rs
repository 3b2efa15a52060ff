//! Remote scoring service over JSON.
//!
//! The request body is the record's 12-key object. The service may answer with
//! a bare JSON number or with `{"prediction": <number>}`.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::InputRecord;
use crate::error::{AppError, EXIT_IO, EXIT_USAGE};

use super::{Predictor, PredictorFault};

/// Environment variable naming the scoring endpoint.
pub const ENV_MODEL_URL: &str = "PREMIUM_MODEL_URL";

pub struct HttpPredictor {
    client: Client,
    url: String,
}

impl HttpPredictor {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let url = url.into();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::new(
                EXIT_USAGE,
                format!("Model endpoint must be an http(s) URL (got '{url}')."),
            ));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::new(EXIT_IO, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, url })
    }

    /// Build from `PREMIUM_MODEL_URL`, if set (a `.env` file is honored).
    pub fn from_env(timeout: Duration) -> Result<Option<Self>, AppError> {
        dotenvy::dotenv().ok();
        match std::env::var(ENV_MODEL_URL) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim(), timeout).map(Some),
            _ => Ok(None),
        }
    }
}

impl Predictor for HttpPredictor {
    fn predict(&self, record: &InputRecord) -> Result<f64, PredictorFault> {
        let resp = self
            .client
            .post(&self.url)
            .json(record)
            .send()
            .map_err(|e| PredictorFault::new(format!("request to {} failed: {e}", self.url)))?;

        if !resp.status().is_success() {
            return Err(PredictorFault::new(format!(
                "scoring service answered with status {}",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .map_err(|e| PredictorFault::new(format!("failed to read scoring response: {e}")))?;
        parse_prediction_body(&body)
    }

    fn describe(&self) -> String {
        format!("remote model at {}", self.url)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PredictionResponse {
    Bare(f64),
    Wrapped { prediction: f64 },
}

/// Extract the cost estimate from a scoring response body.
pub fn parse_prediction_body(body: &str) -> Result<f64, PredictorFault> {
    let parsed: PredictionResponse = serde_json::from_str(body.trim())
        .map_err(|e| PredictorFault::new(format!("unexpected scoring response: {e}")))?;
    Ok(match parsed {
        PredictionResponse::Bare(v) => v,
        PredictionResponse::Wrapped { prediction } => prediction,
    })
}
