//! Prediction gateway.
//!
//! Wraps a [`Predictor`] with the collaborator contract:
//!
//! - the call is bounded by a timeout, so an unresponsive backend cannot hang
//!   the interaction
//! - faults, panics and timeouts surface as `PredictionUnavailable`; worker
//!   panics are logged, not printed
//! - negative or non-finite answers are `ModelContractViolation` and are never
//!   handed on for display

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::domain::{InputRecord, PredictionResult};

use super::{Predictor, PredictorFault};

/// Name of the thread each collaborator call runs on.
const WORKER_THREAD: &str = "premium-predict";

/// Default bound on a single collaborator call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a prediction could not be used.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Collaborator unreachable, faulted, or too slow. Retryable.
    PredictionUnavailable { reason: String },
    /// Collaborator answered with a value outside its contract.
    ModelContractViolation { value: f64 },
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::PredictionUnavailable { reason } => {
                write!(f, "Prediction unavailable: {reason}")
            }
            GatewayError::ModelContractViolation { value } => {
                write!(f, "Model returned an invalid cost estimate ({value}); result discarded.")
            }
        }
    }
}

impl std::error::Error for GatewayError {}

pub struct PredictionGateway {
    predictor: Arc<dyn Predictor>,
    timeout: Duration,
}

impl PredictionGateway {
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self {
            predictor,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn describe(&self) -> String {
        self.predictor.describe()
    }

    /// Invoke the collaborator once and check its answer.
    pub fn predict(&self, record: &InputRecord) -> Result<PredictionResult, GatewayError> {
        let started = Instant::now();
        let raw = self.call_bounded(record)?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match PredictionResult::new(raw) {
            Some(result) => {
                info!(cost = raw, elapsed_ms, backend = %self.predictor.describe(), "prediction complete");
                Ok(result)
            }
            None => {
                error!(value = raw, backend = %self.predictor.describe(), "model contract violation");
                Err(GatewayError::ModelContractViolation { value: raw })
            }
        }
    }

    /// Run the predictor on a worker thread and wait at most `timeout`.
    ///
    /// A call that times out keeps running in the background; its answer is
    /// dropped when it eventually arrives.
    fn call_bounded(&self, record: &InputRecord) -> Result<f64, GatewayError> {
        let predictor = Arc::clone(&self.predictor);
        let record = record.clone();
        let (tx, rx) = mpsc::channel();

        install_worker_panic_hook();
        thread::Builder::new()
            .name(WORKER_THREAD.to_string())
            .spawn(move || {
                let answer = panic::catch_unwind(AssertUnwindSafe(|| predictor.predict(&record)))
                    .unwrap_or_else(|payload| {
                        Err(PredictorFault::new(format!("model panicked: {}", panic_message(&*payload))))
                    });
                let _ = tx.send(answer);
            })
            .map_err(|e| GatewayError::PredictionUnavailable {
                reason: format!("failed to start prediction worker: {e}"),
            })?;

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(fault)) => {
                warn!(%fault, "prediction collaborator fault");
                Err(GatewayError::PredictionUnavailable { reason: fault.to_string() })
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "prediction timed out");
                Err(GatewayError::PredictionUnavailable {
                    reason: format!("no answer within {} ms", self.timeout.as_millis()),
                })
            }
            Err(RecvTimeoutError::Disconnected) => {
                warn!("prediction worker exited without an answer");
                Err(GatewayError::PredictionUnavailable {
                    reason: "model crashed while predicting".to_string(),
                })
            }
        }
    }
}

/// Route panics on prediction workers to the log instead of stderr.
///
/// The TUI owns the terminal while a prediction runs, so the default hook's
/// output would land on the alternate screen. Other threads keep the
/// previous hook.
fn install_worker_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if thread::current().name() == Some(WORKER_THREAD) {
                error!(panic = %info, "prediction collaborator panicked");
            } else {
                previous(info);
            }
        }));
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Test doubles shared by the gateway and pipeline tests.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::domain::{Field, InputRecord};
    use crate::predictor::{Predictor, PredictorFault};

    /// Returns a scripted answer and counts calls.
    pub struct ScriptedPredictor {
        pub answer: Result<f64, PredictorFault>,
        pub delay: Option<Duration>,
        pub calls: AtomicUsize,
    }

    impl ScriptedPredictor {
        pub fn returning(value: f64) -> Self {
            Self {
                answer: Ok(value),
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                answer: Err(PredictorFault::new(message)),
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn slow(value: f64, delay: Duration) -> Self {
            Self {
                answer: Ok(value),
                delay: Some(delay),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Predictor for ScriptedPredictor {
        fn predict(&self, _record: &InputRecord) -> Result<f64, PredictorFault> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                std::thread::sleep(delay);
            }
            self.answer.clone()
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    /// Cost grows with age; handy for checking history order.
    pub struct AgePricedPredictor;

    impl Predictor for AgePricedPredictor {
        fn predict(&self, record: &InputRecord) -> Result<f64, PredictorFault> {
            Ok(record.number(Field::Age).unwrap_or_default() * 1_000.0)
        }

        fn describe(&self) -> String {
            "age-priced".to_string()
        }
    }

    pub struct PanickingPredictor;

    impl Predictor for PanickingPredictor {
        fn predict(&self, _record: &InputRecord) -> Result<f64, PredictorFault> {
            panic!("model blew up");
        }

        fn describe(&self) -> String {
            "panicking".to_string()
        }
    }
}
