//! Logical test model for treesync
//!
//! This crate provides:
//! - The per-pass logical tree (`LogicalNode`) emitted by a model provider
//! - Model-level data: configurations, projects, configuration errors
//! - The `ModelProvider` seam and a `Workspace` snapshot implementing it

pub mod location;
pub mod model;
pub mod tree;
pub mod workspace;

// Re-exports
pub use location::Location;
pub use model::{ConfigError, DisabledProject, ModelConfig, Project, TestModel};
pub use tree::{LogicalNode, LogicalRef, NodeKind};
pub use workspace::{ModelProvider, Workspace};
