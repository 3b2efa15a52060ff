//! Reporting utilities: currency formatting and printable summaries.

pub mod format;

pub use format::*;
