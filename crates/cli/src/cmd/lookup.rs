//! Resolve a test id or file path to its presentation node

use crate::render::{self, RenderOptions};
use crate::session;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use treesync::{ItemKey, Parent, SyncConfig, TestTree, TreeSync};

/// What to look up
#[derive(Debug, Clone)]
pub enum Target {
    Test(String),
    File(PathBuf),
}

pub fn run(
    config: SyncConfig,
    snapshots: &[PathBuf],
    target: &Target,
    options: RenderOptions,
) -> Result<()> {
    let sync = session::replay(config, snapshots, |_, _, _| {})?;
    let Some(key) = resolve(&sync, target) else {
        match target {
            Target::Test(id) => bail!("No test item for test '{}'", id),
            Target::File(path) => bail!("No test item for file {}", path.display()),
        }
    };
    print!("{}", describe(&sync, key, options));
    Ok(())
}

pub fn resolve(sync: &TreeSync, target: &Target) -> Option<ItemKey> {
    match target {
        Target::Test(id) => sync.test_item_for_test(id),
        Target::File(path) => sync.test_item_for_file(path),
    }
}

/// Node line followed by its logical details
pub fn describe(sync: &TreeSync, key: ItemKey, options: RenderOptions) -> String {
    let mut out = String::new();
    let Some(item) = sync.tree().item(key) else {
        return out;
    };
    out.push_str(&render::render_item(item, options));
    out.push('\n');
    out.push_str(&format!("  id:       {}\n", item.id));
    if let Some(uri) = &item.uri {
        out.push_str(&format!("  file:     {}\n", uri.display()));
    }
    if let Some(logical) = sync.logical_ref(key) {
        out.push_str(&format!("  logical:  {} ({:?})\n", logical.id, logical.kind));
        if let Some(location) = &logical.location {
            out.push_str(&format!("  location: {}\n", location));
        }
    }
    let path = ancestry(sync, key);
    if !path.is_empty() {
        out.push_str(&format!("  path:     {}\n", path.join(" > ")));
    }
    out
}

/// Labels from the top level down to the node's parent
fn ancestry(sync: &TreeSync, key: ItemKey) -> Vec<String> {
    let mut labels = Vec::new();
    let mut current = sync.tree().parent_of(key);
    while let Some(Parent::Item(parent)) = current {
        if let Some(item) = sync.tree().item(parent) {
            labels.push(item.label.clone());
        }
        current = sync.tree().parent_of(parent);
    }
    labels.reverse();
    labels
}

/// Accept relative paths for `--file` against the current directory
pub fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
