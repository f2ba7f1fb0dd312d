//! Model provider seam and an in-memory snapshot implementing it

use crate::model::{ConfigError, DisabledProject, ModelConfig, TestModel};
use crate::tree::LogicalNode;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Source of the logical test model
///
/// Implementations compute the logical tree; the sync engine only reads it.
pub trait ModelProvider {
    /// Models that are currently enabled, in enumeration order
    fn enabled_models(&self) -> Vec<&TestModel>;

    /// The logical tree for one workspace scope
    fn scope_tree(&self, scope: &Path) -> LogicalNode;

    /// Active scopes, in first-seen order of enabled models
    fn scopes(&self) -> Vec<PathBuf> {
        let mut scopes: Vec<PathBuf> = Vec::new();
        for model in self.enabled_models() {
            if !scopes.contains(&model.config.workspace_folder) {
                scopes.push(model.config.workspace_folder.clone());
            }
        }
        scopes
    }

    /// Disabled projects of enabled models in `scope`, ordered by config file then name
    fn disabled_projects(&self, scope: &Path) -> Vec<DisabledProject> {
        let mut disabled: Vec<DisabledProject> = self
            .enabled_models()
            .into_iter()
            .filter(|m| m.config.workspace_folder == scope)
            .flat_map(|m| m.disabled_projects())
            .collect();
        disabled.sort_by_cached_key(DisabledProject::sort_key);
        disabled
    }

    /// Configuration errors of enabled models in `scope`, grouped by their config
    fn config_errors(&self, scope: &Path) -> Vec<(ModelConfig, Vec<ConfigError>)> {
        self.enabled_models()
            .into_iter()
            .filter(|m| m.config.workspace_folder == scope)
            .map(|m| (m.config.clone(), m.errors.clone()))
            .collect()
    }
}

/// A complete snapshot of every model in the workspace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub models: Vec<TestModel>,
}

impl Workspace {
    pub fn new(models: Vec<TestModel>) -> Self {
        Self { models }
    }
}

impl ModelProvider for Workspace {
    fn enabled_models(&self) -> Vec<&TestModel> {
        self.models.iter().filter(|m| m.enabled).collect()
    }

    fn scope_tree(&self, scope: &Path) -> LogicalNode {
        let mut root = LogicalNode::root(format!("scope:{}", scope.display()));
        // Top-level id -> position in root.children
        let mut positions: AHashMap<String, usize> = AHashMap::new();

        let suites = self
            .enabled_models()
            .into_iter()
            .filter(|m| m.config.workspace_folder == scope)
            .flat_map(|m| m.enabled_projects())
            .map(|p| &p.suite);

        for suite in suites {
            for entry in &suite.children {
                match positions.get(&entry.id) {
                    Some(&index) => {
                        let existing = &mut root.children[index];
                        for child in &entry.children {
                            if existing.children.iter().all(|c| c.id != child.id) {
                                existing.children.push(child.clone());
                            }
                        }
                        trace!("Merged top-level entry {} from another project", entry.id);
                    }
                    None => {
                        positions.insert(entry.id.clone(), root.children.len());
                        root.children.push(entry.clone());
                    }
                }
            }
        }

        root
    }
}
