//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - resolves the prediction collaborator
//! - dispatches to the TUI or the one-shot commands

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use crate::cli::{Command, ModelArgs, PolicyArgs, PredictArgs, TuiArgs};
use crate::domain::RiskPolicy;
use crate::error::{AppError, EXIT_IO, EXIT_USAGE};
use crate::predictor::{ENV_MODEL_PATH, ENV_MODEL_URL, HttpPredictor, LinearModel, PredictionGateway, Predictor};
use crate::request::RawInput;
use crate::session::Session;

pub mod pipeline;

/// Entry point for the `premium` binary.
pub fn run() -> Result<(), AppError> {
    // We want `premium` and `premium --model m.json` to behave like `premium tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Predict(args) => handle_predict(args),
        Command::Fields => {
            print!("{}", crate::report::format_registry());
            Ok(())
        }
    }
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    if let Some(path) = &args.log_file {
        crate::logging::init_file(path)?;
    }
    let policy = policy_from_args(&args.policy)?;
    let gateway = build_gateway(&args.model)?;
    let session = Session::new(policy, args.history_cap);
    crate::tui::run(gateway, session)
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    crate::logging::init_stderr();
    let policy = policy_from_args(&args.policy)?;
    let gateway = build_gateway(&args.model)?;

    let mut raw = match &args.input {
        Some(path) => RawInput::read_json(path)?,
        None => RawInput::form_defaults(),
    };
    for assignment in &args.overrides {
        raw.apply_override(assignment)?;
    }

    let mut session = Session::new(policy, 1);
    let outcome = pipeline::run_prediction(&gateway, &mut session, &raw)?;

    if args.json {
        let json = serde_json::to_string_pretty(&outcome)
            .map_err(|e| AppError::new(EXIT_IO, format!("Failed to encode outcome: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", crate::report::format_outcome(&outcome));
    }
    Ok(())
}

fn policy_from_args(args: &PolicyArgs) -> Result<RiskPolicy, AppError> {
    let policy = args.to_policy();
    policy
        .validate()
        .map_err(|msg| AppError::new(EXIT_USAGE, format!("Invalid policy: {msg}")))?;
    Ok(policy)
}

/// Resolve the prediction collaborator.
///
/// Precedence: `--model`, `--endpoint`, then `PREMIUM_MODEL_PATH`,
/// then `PREMIUM_MODEL_URL`.
pub fn build_gateway(args: &ModelArgs) -> Result<PredictionGateway, AppError> {
    let timeout = Duration::from_millis(args.timeout_ms.max(1));

    let predictor: Arc<dyn Predictor> = if let Some(path) = &args.model {
        Arc::new(LinearModel::from_file(path)?)
    } else if let Some(url) = &args.endpoint {
        Arc::new(HttpPredictor::new(url.as_str(), timeout)?)
    } else if let Some(model) = LinearModel::from_env()? {
        Arc::new(model)
    } else if let Some(remote) = HttpPredictor::from_env(timeout)? {
        Arc::new(remote)
    } else {
        return Err(AppError::new(
            EXIT_USAGE,
            format!(
                "No prediction model configured. Pass --model <file.json> or --endpoint <url>, \
                 or set {ENV_MODEL_PATH} / {ENV_MODEL_URL}."
            ),
        ));
    };

    info!(backend = %predictor.describe(), timeout_ms = args.timeout_ms, "prediction backend ready");
    Ok(PredictionGateway::new(predictor).with_timeout(timeout))
}

/// Rewrite argv so `premium` defaults to `premium tui`.
///
/// Rules:
/// - `premium`                      -> `premium tui`
/// - `premium --model m.json ...`   -> `premium tui --model m.json ...`
/// - `premium --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "predict" | "fields");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
