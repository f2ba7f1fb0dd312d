//! Incremental reconciliation of a presentation tree against a logical test model
//!
//! This crate provides:
//! - Generation-tagged ids, so reloads never collide with leftover state
//! - The tree differ that mutates presentation nodes in place
//! - Disabled-project and configuration-error sections
//! - Per-scope root lifecycle
//! - Reverse lookups by test id and file path
//! - The `TreeSync` engine tying it together

pub mod attach;
pub mod auxiliary;
pub mod config;
pub mod differ;
pub mod engine;
pub mod error;
pub mod generation;
pub mod index;
pub mod item;
pub mod roots;
pub mod tree;

// Re-exports
pub use attach::{Attachment, ConfigErrorRef};
pub use config::SyncConfig;
pub use differ::DiffStats;
pub use engine::{PassReport, TreeSync, LOADING_ID};
pub use error::TreeError;
pub use generation::Generation;
pub use item::{ItemKey, Parent, Position, Range, TestItem};
pub use roots::RootStrategy;
pub use tree::{MemoryTree, TestTree};

/// Result type for sync operations
pub type Result<T> = std::result::Result<T, TreeError>;
