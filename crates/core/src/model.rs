//! Model-level data consumed from the provider

use crate::location::Location;
use crate::tree::LogicalNode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn enabled_by_default() -> bool {
    true
}

/// Configuration a model was loaded from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Workspace scope this configuration belongs to
    pub workspace_folder: PathBuf,
    /// Path of the configuration file
    pub config_file: PathBuf,
}

impl ModelConfig {
    pub fn new(workspace_folder: impl Into<PathBuf>, config_file: impl Into<PathBuf>) -> Self {
        Self {
            workspace_folder: workspace_folder.into(),
            config_file: config_file.into(),
        }
    }

    /// Config file path relative to the workspace folder, or as-is when outside it
    pub fn relative_config_file(&self) -> &Path {
        self.config_file
            .strip_prefix(&self.workspace_folder)
            .unwrap_or(&self.config_file)
    }
}

/// An error produced while loading a configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl ConfigError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    pub fn at(message: impl Into<String>, location: Location) -> Self {
        Self {
            message: message.into(),
            location: Some(location),
        }
    }
}

/// A top-level grouping inside a configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub suite: LogicalNode,
}

impl Project {
    pub fn new(name: impl Into<String>, suite: LogicalNode) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            suite,
        }
    }

    pub fn disabled(name: impl Into<String>) -> Self {
        let name = name.into();
        let suite = LogicalNode::root(format!("project:{}", name));
        Self {
            name,
            enabled: false,
            suite,
        }
    }
}

/// A project that is present in a configuration but switched off
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisabledProject {
    pub name: String,
    pub config: ModelConfig,
}

impl DisabledProject {
    /// Key disabled projects are ordered by
    pub fn sort_key(&self) -> String {
        format!("{}:{}", self.config.config_file.display(), self.name)
    }
}

/// One logical model: a configuration plus what it produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestModel {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub config: ModelConfig,
    #[serde(default)]
    pub errors: Vec<ConfigError>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl TestModel {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            enabled: true,
            config,
            errors: Vec::new(),
            projects: Vec::new(),
        }
    }

    pub fn with_project(mut self, project: Project) -> Self {
        self.projects.push(project);
        self
    }

    pub fn with_error(mut self, error: ConfigError) -> Self {
        self.errors.push(error);
        self
    }

    pub fn enabled_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(|p| p.enabled)
    }

    pub fn disabled_projects(&self) -> impl Iterator<Item = DisabledProject> + '_ {
        self.projects
            .iter()
            .filter(|p| !p.enabled)
            .map(|p| DisabledProject {
                name: p.name.clone(),
                config: self.config.clone(),
            })
    }
}
