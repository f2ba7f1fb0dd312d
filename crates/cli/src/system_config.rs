//! Loading of `treesync.toml`

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use treesync::SyncConfig;

/// File name looked up in the current directory when no path is given
pub const CONFIG_FILE_NAME: &str = "treesync.toml";

/// Path of the config file that applies, if one exists
pub fn config_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            local.exists().then_some(local)
        }
    }
}

/// Load the effective configuration
///
/// An explicit path must exist. Without one, `./treesync.toml` is used when
/// present and defaults otherwise.
pub fn load(explicit: Option<&Path>) -> Result<SyncConfig> {
    let Some(path) = config_file_path(explicit) else {
        return Ok(SyncConfig::default());
    };
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse(&contents).with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Parse and validate TOML config text
pub fn parse(contents: &str) -> Result<SyncConfig> {
    let config: SyncConfig = toml::from_str(contents).context("Failed to parse TOML")?;
    config.validate()?;
    Ok(config)
}

/// Commented example configuration
pub fn example_config() -> &'static str {
    r#"# treesync configuration

# Workspace folders the host has open. When non-empty, a loading
# placeholder is shown while a reload is in progress.
workspace_folders = ["/path/to/workspace"]

# Label of the loading placeholder.
loading_label = "Loading…"

# Sort-text prefix for disabled-project and config-error entries,
# chosen so they sort after regular test entries.
sort_prefix = "~"
"#
}
