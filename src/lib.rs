//! `premium-estimator` library crate.
//!
//! The binary (`premium`) is a thin wrapper around this library so that:
//!
//! - the prediction pipeline is testable without a terminal
//! - prediction backends can be swapped behind one trait
//! - the TUI and the one-shot commands share the same code path

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod predictor;
pub mod report;
pub mod request;
pub mod session;
pub mod tui;
