//! Command-line surface for the hamlet test converter.

pub mod args;
pub mod driver;
