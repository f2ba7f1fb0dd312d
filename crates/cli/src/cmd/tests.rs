//! List the test cases under a node

use crate::session;
use anyhow::{bail, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use treesync::{MemoryTree, Parent, SyncConfig, TestTree, TreeSync};

pub fn run(
    config: SyncConfig,
    snapshots: &[PathBuf],
    under: Option<&str>,
    color: bool,
) -> Result<()> {
    let sync = session::replay(config, snapshots, |_, _, _| {})?;
    let Some(root) = root_for(&sync, under) else {
        bail!("No test item with logical id '{}'", under.unwrap_or_default());
    };

    let lines = list(&sync, root);
    for line in &lines {
        println!("{}", line);
    }
    let total = format!("{} test(s)", lines.len());
    if color {
        println!("{}", total.dimmed());
    } else {
        println!("{}", total);
    }
    Ok(())
}

/// The node for a logical id, or the top level when none is given
pub fn root_for(sync: &TreeSync<MemoryTree>, under: Option<&str>) -> Option<Parent> {
    match under {
        None => Some(Parent::Top),
        Some(id) => sync
            .tree()
            .find(&sync.generation().tag(id))
            .map(Parent::Item),
    }
}

/// `logical id<TAB>location` for every case under `root`
pub fn list(sync: &TreeSync<MemoryTree>, root: Parent) -> Vec<String> {
    sync.collect_tests_inside(root)
        .filter_map(|key| {
            let logical = sync.logical_ref(key)?;
            let location = logical
                .location
                .as_ref()
                .map(ToString::to_string)
                .or_else(|| {
                    sync.tree()
                        .item(key)
                        .and_then(|item| item.uri.as_ref())
                        .map(|uri| uri.display().to_string())
                })
                .unwrap_or_default();
            Some(format!("{}\t{}", logical.id, location))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use treesync_core::{Location, LogicalNode, ModelConfig, Project, TestModel, Workspace};

    fn synced() -> TreeSync {
        let a = LogicalNode::file("a", "/ws/a.spec.ts").with_children(vec![
            LogicalNode::case("a/1", "one").with_location(Location::at("/ws/a.spec.ts", 2, 1)),
            LogicalNode::group("a/g", "g").with_children(vec![LogicalNode::case("a/g/2", "two")]),
        ]);
        let b = LogicalNode::file("b", "/ws/b.spec.ts")
            .with_children(vec![LogicalNode::case("b/3", "three")]);
        let suite = LogicalNode::root("suite").with_children(vec![a, b]);
        let ws = Workspace::new(vec![TestModel::new(ModelConfig::new("/ws", "/ws/cfg.json"))
            .with_project(Project::new("default", suite))]);

        let mut sync = TreeSync::in_memory(SyncConfig::default()).unwrap();
        sync.start_reload().unwrap();
        sync.update(&ws).unwrap();
        sync
    }

    #[test]
    fn test_list_everything() {
        let sync = synced();
        let lines = list(&sync, Parent::Top);
        assert_eq!(
            lines,
            vec!["a/1\t/ws/a.spec.ts:2", "a/g/2\t", "b/3\t"]
        );
    }

    #[test]
    fn test_list_under_group() {
        let sync = synced();
        let root = root_for(&sync, Some("a/g")).unwrap();
        assert_eq!(list(&sync, root), vec!["a/g/2\t"]);
        assert!(root_for(&sync, Some("missing")).is_none());
    }
}
