//! Replaying model snapshots through a sync engine

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use treesync::{PassReport, SyncConfig, TreeSync};
use treesync_core::Workspace;

/// Read a workspace snapshot from a JSON file
pub fn load_snapshot(path: &Path) -> Result<Workspace> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse snapshot: {}", path.display()))
}

/// Reload, then apply every snapshot as one update pass
///
/// `on_pass` sees the engine after each pass.
pub fn replay<F>(config: SyncConfig, snapshots: &[PathBuf], mut on_pass: F) -> Result<TreeSync>
where
    F: FnMut(usize, &TreeSync, &PassReport),
{
    let mut sync = TreeSync::in_memory(config).context("Invalid sync configuration")?;
    sync.start_reload()?;

    // Parse everything before touching the tree so a bad file fails fast.
    let workspaces = snapshots
        .iter()
        .map(|path| load_snapshot(path))
        .collect::<Result<Vec<_>>>()?;
    sync.finished_loading()?;

    for (index, workspace) in workspaces.iter().enumerate() {
        let report = sync
            .update(workspace)
            .with_context(|| format!("Sync pass {} failed", index + 1))?;
        debug!("Applied {}", snapshots[index].display());
        on_pass(index, &sync, &report);
    }

    Ok(sync)
}
