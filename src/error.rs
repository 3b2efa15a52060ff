//! Process-level error type.
//!
//! Library components report their own error enums (`ValidationErrors`,
//! `GatewayError`, `PipelineError`); the binary folds them into `AppError`,
//! which carries the exit code `main` returns.

use crate::app::pipeline::PipelineError;
use crate::predictor::GatewayError;
use crate::request::ValidationErrors;

/// Bad flags, bad config files, or inputs that fail validation.
pub const EXIT_USAGE: u8 = 2;
/// Terminal or other local I/O failure.
pub const EXIT_IO: u8 = 4;
/// The prediction collaborator could not answer.
pub const EXIT_UNAVAILABLE: u8 = 5;
/// The prediction collaborator answered outside its contract.
pub const EXIT_CONTRACT: u8 = 6;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::new(EXIT_USAGE, format!("Invalid input: {err}"))
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        let code = match err {
            GatewayError::PredictionUnavailable { .. } => EXIT_UNAVAILABLE,
            GatewayError::ModelContractViolation { .. } => EXIT_CONTRACT,
        };
        AppError::new(code, err.to_string())
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Invalid(e) => e.into(),
            PipelineError::Gateway(e) => e.into(),
        }
    }
}
