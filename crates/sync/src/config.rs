//! Engine configuration

use crate::error::TreeError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for a [`crate::TreeSync`] engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Workspace scopes the host has open
    ///
    /// Only decides whether a loading placeholder is shown; active scopes
    /// come from the model provider on each pass.
    pub workspace_folders: Vec<PathBuf>,

    /// Label of the loading placeholder
    pub loading_label: String,

    /// Prefix of the sort text of disabled/error entries, so they sort last
    pub sort_prefix: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            workspace_folders: Vec::new(),
            loading_label: "Loading…".to_string(),
            sort_prefix: "~".to_string(),
        }
    }
}

impl SyncConfig {
    pub fn with_workspace_folders<I, P>(mut self, folders: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.workspace_folders = folders.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<(), TreeError> {
        if self.sort_prefix.is_empty() {
            return Err(TreeError::InvalidConfig(
                "sort_prefix must not be empty".to_string(),
            ));
        }
        if self.loading_label.trim().is_empty() {
            return Err(TreeError::InvalidConfig(
                "loading_label must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}
