//! Errors raised by the presentation tree

use crate::item::ItemKey;
use thiserror::Error;

/// A mutation the presentation tree refused
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("unknown test item {0}")]
    UnknownItem(ItemKey),

    #[error("parent item {0} does not exist")]
    UnknownParent(ItemKey),

    #[error("item {id:?} already exists under {parent}")]
    DuplicateChild { parent: String, id: String },

    #[error("item {0} is already attached to a parent")]
    AlreadyAttached(ItemKey),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
