//! Derived presentation metrics.
//!
//! Metrics are implemented as small, pure functions so the pipeline can call
//! them after every prediction without side effects.

pub mod derive;

pub use derive::*;
