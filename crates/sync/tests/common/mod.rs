//! Fixtures shared by the integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use treesync::{ItemKey, MemoryTree, Parent, SyncConfig, TestTree, TreeSync};
use treesync_core::{ConfigError, LogicalNode, Location, ModelConfig, Project, TestModel, Workspace};

/// A file node with one case per id, cases located on consecutive lines
pub fn file(id: &str, path: &str, cases: &[&str]) -> LogicalNode {
    let children = cases
        .iter()
        .enumerate()
        .map(|(i, case)| {
            LogicalNode::case(*case, *case).with_location(Location::at(path, i as u32 + 2, 3))
        })
        .collect();
    LogicalNode::file(id, path).with_children(children)
}

pub fn suite(files: Vec<LogicalNode>) -> LogicalNode {
    LogicalNode::root("suite").with_children(files)
}

pub fn model(scope: &str, config_file: &str) -> TestModel {
    TestModel::new(ModelConfig::new(scope, config_file))
}

/// One scope, one enabled project
pub fn single_project(scope: &str, files: Vec<LogicalNode>) -> Workspace {
    let config_file = format!("{}/playwright.config.ts", scope);
    Workspace::new(vec![
        model(scope, &config_file).with_project(Project::new("default", suite(files)))
    ])
}

pub fn errors_only(scope: &str, message: &str) -> TestModel {
    let config_file = format!("{}/playwright.config.ts", scope);
    model(scope, &config_file).with_error(ConfigError::new(message))
}

/// Engine that has completed a reload for `folders`
pub fn loaded_engine(folders: &[&str]) -> TreeSync {
    let config = SyncConfig::default().with_workspace_folders(folders.iter().map(PathBuf::from));
    let mut sync = TreeSync::in_memory(config).expect("valid config");
    sync.start_reload().expect("reload");
    sync.finished_loading().expect("finish");
    sync
}

pub fn ids(tree: &MemoryTree, parent: Parent) -> Vec<String> {
    tree.children(parent)
        .expect("parent exists")
        .into_iter()
        .map(|key| tree.item(key).expect("live item").id.clone())
        .collect()
}

pub fn labels(tree: &MemoryTree, parent: Parent) -> Vec<String> {
    tree.children(parent)
        .expect("parent exists")
        .into_iter()
        .map(|key| tree.item(key).expect("live item").label.clone())
        .collect()
}

/// Every item key reachable from the top level
pub fn all_keys(tree: &MemoryTree) -> Vec<ItemKey> {
    let mut out = Vec::new();
    let mut stack = tree.children(Parent::Top).expect("top");
    while let Some(key) = stack.pop() {
        out.push(key);
        stack.extend(tree.children(Parent::Item(key)).expect("live item"));
    }
    out
}

pub fn scope_root(sync: &TreeSync, scope: &str) -> Parent {
    sync.root_for(Path::new(scope)).expect("scope has a root")
}
