//! Shared "predict" pipeline used by both the CLI and the TUI.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! validate -> predict (once) -> derive metrics -> append history
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).
//! Nothing reaches the session history unless every step succeeded.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::domain::{DerivedMetrics, InputRecord, PredictionResult};
use crate::metrics::derive_metrics;
use crate::predictor::{GatewayError, PredictionGateway};
use crate::request::{RawInput, ValidationErrors, build};
use crate::session::Session;

/// All computed outputs of one successful prediction.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionOutcome {
    pub input: InputRecord,
    pub prediction: PredictionResult,
    pub metrics: DerivedMetrics,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Rejected before the collaborator was called.
    Invalid(ValidationErrors),
    /// The collaborator call failed or broke its contract.
    Gateway(GatewayError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Invalid(e) => write!(f, "Invalid input: {e}"),
            PipelineError::Gateway(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<ValidationErrors> for PipelineError {
    fn from(err: ValidationErrors) -> Self {
        PipelineError::Invalid(err)
    }
}

impl From<GatewayError> for PipelineError {
    fn from(err: GatewayError) -> Self {
        PipelineError::Gateway(err)
    }
}

/// Run one user-triggered prediction against `session`.
pub fn run_prediction(
    gateway: &PredictionGateway,
    session: &mut Session,
    raw: &RawInput,
) -> Result<PredictionOutcome, PipelineError> {
    // 1) Validate; nothing is sent if any field is off.
    let input = build(raw).inspect_err(|e| info!(violations = e.violations().len(), "input rejected"))?;

    // 2) Exactly one collaborator call.
    let prediction = gateway.predict(&input)?;

    // 3) Derive presentation metrics from the same input/output pair.
    let metrics = derive_metrics(&input, prediction, &session.policy);

    // 4) Record only complete outcomes.
    session.history.append(prediction);

    Ok(PredictionOutcome {
        input,
        prediction,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::CostBand;
    use crate::predictor::testing::{AgePricedPredictor, ScriptedPredictor};

    #[test]
    fn successful_predictions_append_in_order() {
        let gateway = PredictionGateway::new(Arc::new(AgePricedPredictor));
        let mut session = Session::default();

        for age in [40.0, 25.0, 60.0] {
            let mut raw = RawInput::form_defaults();
            raw.set("Age", age);
            run_prediction(&gateway, &mut session, &raw).unwrap();
        }

        let costs: Vec<f64> = session.history.iter().map(|r| r.value()).collect();
        assert_eq!(costs, vec![40_000.0, 25_000.0, 60_000.0]);
    }

    #[test]
    fn outcome_carries_metrics_for_the_same_input() {
        let gateway = PredictionGateway::new(Arc::new(AgePricedPredictor));
        let mut session = Session::default();
        let mut raw = RawInput::form_defaults();
        raw.set("Age", 55.0);

        let outcome = run_prediction(&gateway, &mut session, &raw).unwrap();
        assert_eq!(outcome.prediction.value(), 55_000.0);
        assert_eq!(outcome.metrics.cost_band, CostBand::High);
        assert!((outcome.metrics.risk_vector.values()[0] - 0.55).abs() < 1e-12);
    }

    #[test]
    fn invalid_input_never_reaches_the_collaborator() {
        let predictor = Arc::new(ScriptedPredictor::returning(1_000.0));
        let gateway = PredictionGateway::new(predictor.clone());
        let mut session = Session::default();
        let mut raw = RawInput::form_defaults();
        raw.set("Age", 101.0);

        let err = run_prediction(&gateway, &mut session, &raw).unwrap_err();
        assert!(matches!(err, PipelineError::Invalid(_)));
        assert_eq!(predictor.calls(), 0);
        assert!(session.history.is_empty());
    }

    #[test]
    fn failed_predictions_do_not_touch_history() {
        let ok = PredictionGateway::new(Arc::new(ScriptedPredictor::returning(9_000.0)));
        let down = PredictionGateway::new(Arc::new(ScriptedPredictor::failing("unreachable")));
        let broken = PredictionGateway::new(Arc::new(ScriptedPredictor::returning(-1.0)));
        let mut session = Session::default();
        let raw = RawInput::form_defaults();

        run_prediction(&ok, &mut session, &raw).unwrap();
        assert!(matches!(
            run_prediction(&down, &mut session, &raw),
            Err(PipelineError::Gateway(GatewayError::PredictionUnavailable { .. }))
        ));
        assert!(matches!(
            run_prediction(&broken, &mut session, &raw),
            Err(PipelineError::Gateway(GatewayError::ModelContractViolation { .. }))
        ));
        run_prediction(&ok, &mut session, &raw).unwrap();

        assert_eq!(session.history.len(), 2);
    }

    #[test]
    fn each_action_calls_the_collaborator_exactly_once() {
        let predictor = Arc::new(ScriptedPredictor::returning(5_000.0));
        let gateway = PredictionGateway::new(predictor.clone());
        let mut session = Session::default();

        for _ in 0..3 {
            run_prediction(&gateway, &mut session, &RawInput::form_defaults()).unwrap();
        }
        assert_eq!(predictor.calls(), 3);
        assert_eq!(session.history.len(), 3);
    }

    #[test]
    fn sessions_are_isolated() {
        let gateway = PredictionGateway::new(Arc::new(AgePricedPredictor));
        let mut a = Session::default();
        let b = Session::default();

        run_prediction(&gateway, &mut a, &RawInput::form_defaults()).unwrap();
        assert_eq!(a.history.len(), 1);
        assert!(b.history.is_empty());
    }
}
