//! CLI command implementations

pub mod config;
pub mod lookup;
pub mod sync;
pub mod tests;
