//! Command-line parsing for the insurance cost estimator.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! prediction pipeline. Flags only describe where the model lives and which
//! policy constants to use; the pipeline never reads them directly.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::RiskPolicy;
use crate::session::DEFAULT_HISTORY_CAPACITY;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "premium", version, about = "Health insurance cost estimator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive form (default).
    Tui(TuiArgs),
    /// Validate one input, predict once, and print the result.
    Predict(PredictArgs),
    /// List the input fields and their allowed values.
    Fields,
}

/// Where the prediction collaborator lives.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Linear model artifact (JSON). Falls back to PREMIUM_MODEL_PATH.
    #[arg(long, value_name = "JSON", conflicts_with = "endpoint")]
    pub model: Option<PathBuf>,

    /// Remote scoring endpoint. Falls back to PREMIUM_MODEL_URL.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Upper bound on a single prediction call, in milliseconds.
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,
}

/// Policy constants for the risk radar and cost band.
#[derive(Debug, Args, Clone)]
pub struct PolicyArgs {
    /// Costs strictly above this are reported as high.
    #[arg(long, default_value_t = 50_000.0)]
    pub high_cost_threshold: f64,

    /// Radar value for a BMI category other than Normal.
    #[arg(long, default_value_t = 0.3)]
    pub bmi_weight: f64,

    /// Radar value for any smoking.
    #[arg(long, default_value_t = 0.4)]
    pub smoking_weight: f64,

    /// Radar value for any prior condition.
    #[arg(long, default_value_t = 0.5)]
    pub medical_weight: f64,

    /// Age is divided by this for the radar.
    #[arg(long, default_value_t = 100.0)]
    pub age_scale: f64,

    /// Genetical risk is divided by this for the radar.
    #[arg(long, default_value_t = 5.0)]
    pub genetic_scale: f64,
}

impl PolicyArgs {
    pub fn to_policy(&self) -> RiskPolicy {
        RiskPolicy {
            age_scale: self.age_scale,
            genetic_scale: self.genetic_scale,
            bmi_weight: self.bmi_weight,
            smoking_weight: self.smoking_weight,
            medical_weight: self.medical_weight,
            high_cost_threshold: self.high_cost_threshold,
        }
    }
}

#[derive(Debug, Parser, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Number of predictions kept in the session history chart.
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    pub history_cap: usize,

    /// Write logs here (the TUI is silent otherwise).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// JSON object of field name -> value. Without it the form defaults are used.
    #[arg(long, value_name = "JSON")]
    pub input: Option<PathBuf>,

    /// Override one field, e.g. --set "Age=42" --set "Smoking Status=Regular".
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    /// Print the outcome as JSON.
    #[arg(long)]
    pub json: bool,
}
