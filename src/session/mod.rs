//! Per-session state.
//!
//! A `Session` is owned by whichever front-end drives the interaction (the TUI
//! event loop, or a single `premium predict` run) and is passed into the
//! pipeline explicitly. Nothing here is global, so two sessions never see each
//! other's history.

pub mod history;

pub use history::*;

use crate::domain::RiskPolicy;

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub history: SessionHistory,
    pub policy: RiskPolicy,
}

impl Session {
    pub fn new(policy: RiskPolicy, history_capacity: usize) -> Self {
        Self {
            history: SessionHistory::with_capacity(history_capacity),
            policy,
        }
    }
}
