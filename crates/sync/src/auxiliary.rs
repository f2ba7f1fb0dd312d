//! Flat sections synced next to the logical tree: disabled projects and
//! configuration errors
//!
//! Both sections live in their own id namespace (`[disabled] …`, `[error] …`)
//! which never carries a generation prefix, so they cannot collide with
//! logical nodes. An entry's content is baked into its id: entries are only
//! ever added or removed, never edited in place.

use crate::attach::{Attachment, Attachments, ConfigErrorRef};
use crate::differ::DiffStats;
use crate::item::{Parent, Range};
use crate::tree::TestTree;
use crate::Result;
use ahash::AHashSet;
use std::path::PathBuf;
use tracing::trace;
use treesync_core::{ConfigError, DisabledProject, ModelConfig};

pub const DISABLED_PREFIX: &str = "[disabled] ";
pub const ERROR_PREFIX: &str = "[error] ";

/// Id of the entry standing for a disabled project
pub fn disabled_id(project: &DisabledProject) -> String {
    format!(
        "{}{} - {}",
        DISABLED_PREFIX,
        project.name,
        project.config.config_file.display()
    )
}

/// Id of the entry standing for a configuration error
pub fn error_id(config: &ModelConfig, error: &ConfigError) -> String {
    let location = match &error.location {
        Some(location) => location.to_string(),
        None => config.config_file.display().to_string(),
    };
    format!("{}{} - {}", ERROR_PREFIX, location, error.message)
}

/// Everything needed to create one section entry
struct SectionEntry {
    id: String,
    label: String,
    uri: Option<PathBuf>,
    description: String,
    error: Option<String>,
    range: Option<Range>,
    sort_text: String,
    attachment: Attachment,
}

pub struct SectionSync<'a, T: TestTree> {
    tree: &'a mut T,
    attachments: &'a mut Attachments,
    sort_prefix: &'a str,
}

impl<'a, T: TestTree> SectionSync<'a, T> {
    pub fn new(tree: &'a mut T, attachments: &'a mut Attachments, sort_prefix: &'a str) -> Self {
        Self {
            tree,
            attachments,
            sort_prefix,
        }
    }

    /// Sync `[disabled] …` entries under `parent`
    ///
    /// `projects` is expected in display order (config file, then name).
    pub fn sync_disabled(&mut self, parent: Parent, projects: &[DisabledProject]) -> Result<DiffStats> {
        let entries = projects
            .iter()
            .map(|project| SectionEntry {
                id: disabled_id(project),
                label: project.name.clone(),
                uri: Some(project.config.config_file.clone()),
                description: format!(
                    "{} [{}] - disabled",
                    project.config.relative_config_file().display(),
                    project.name
                ),
                error: None,
                range: None,
                sort_text: format!("{}{}", self.sort_prefix, project.sort_key()),
                attachment: Attachment::Disabled(project.clone()),
            })
            .collect();
        self.sync_section(parent, DISABLED_PREFIX, entries)
    }

    /// Sync `[error] …` entries under `parent`
    pub fn sync_errors(
        &mut self,
        parent: Parent,
        errors: &[(ModelConfig, Vec<ConfigError>)],
    ) -> Result<DiffStats> {
        let entries = errors
            .iter()
            .flat_map(|(config, errors)| errors.iter().map(move |error| (config, error)))
            .map(|(config, error)| {
                let id = error_id(config, error);
                let (uri, range) = match &error.location {
                    Some(location) => (
                        location.file.clone(),
                        Some(Range::point(
                            location.zero_based_line(),
                            location.column.saturating_sub(1),
                        )),
                    ),
                    None => (config.config_file.clone(), None),
                };
                SectionEntry {
                    label: error.message.lines().next().unwrap_or_default().to_string(),
                    uri: Some(uri),
                    description: format!(
                        "{}: {}",
                        config.relative_config_file().display(),
                        error.message
                    ),
                    error: Some(error.message.clone()),
                    range,
                    sort_text: format!("{}{}", self.sort_prefix, id),
                    attachment: Attachment::Error(ConfigErrorRef {
                        config: config.clone(),
                        error: error.clone(),
                    }),
                    id,
                }
            })
            .collect();
        self.sync_section(parent, ERROR_PREFIX, entries)
    }

    fn sync_section(
        &mut self,
        parent: Parent,
        prefix: &str,
        entries: Vec<SectionEntry>,
    ) -> Result<DiffStats> {
        let mut stats = DiffStats::default();
        let wanted: AHashSet<&str> = entries.iter().map(|e| e.id.as_str()).collect();

        let mut present: AHashSet<String> = AHashSet::new();
        for key in self.tree.children(parent)? {
            if let Some(item) = self.tree.item(key) {
                if item.id.starts_with(prefix) {
                    present.insert(item.id.clone());
                }
            }
        }

        let stale: Vec<String> = present
            .iter()
            .filter(|id| !wanted.contains(id.as_str()))
            .cloned()
            .collect();
        for id in stale {
            trace!("Removing {} from {}", id, parent);
            self.tree.delete(parent, &id)?;
            present.remove(&id);
            stats.removed += 1;
        }

        for entry in entries {
            if present.contains(&entry.id) {
                continue;
            }
            let key = self
                .tree
                .create_item(&entry.id, &entry.label, entry.uri.as_deref())?;
            self.tree.set_description(key, Some(entry.description))?;
            if entry.error.is_some() {
                self.tree.set_error(key, entry.error)?;
            }
            if entry.range.is_some() {
                self.tree.set_range(key, entry.range)?;
            }
            self.tree.set_sort_text(key, Some(entry.sort_text))?;
            self.attachments.attach(key, entry.attachment);
            self.tree.add(parent, key)?;
            trace!("Added {} under {}", entry.id, parent);
            present.insert(entry.id);
            stats.added += 1;
        }

        Ok(stats)
    }
}
