//! Library half of the `tsync` binary
//!
//! Snapshot replay, config loading and tree rendering live here so the
//! commands can be tested without spawning the binary.

pub mod cmd;
pub mod render;
pub mod session;
pub mod system_config;
