//! Request building: raw input (`raw`) and validation into records (`builder`).

pub mod builder;
pub mod raw;

pub use builder::*;
pub use raw::*;
