//! The sync engine: owns the presentation tree and keeps it in step with the
//! model provider

use crate::attach::{Attachments, ConfigErrorRef};
use crate::auxiliary::SectionSync;
use crate::config::SyncConfig;
use crate::differ::{DiffStats, Differ};
use crate::generation::Generation;
use crate::index::{CollectTests, ReverseIndex};
use crate::item::{ItemKey, Parent};
use crate::roots::{RootRegistry, RootStrategy};
use crate::tree::{MemoryTree, TestTree};
use crate::Result;
use std::path::Path;
use tracing::{debug, info};
use treesync_core::{DisabledProject, LogicalRef, ModelProvider};

/// Id of the loading placeholder; outside every synced namespace
pub const LOADING_ID: &str = "[loading]";

/// What one update pass did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    pub strategy: Option<RootStrategy>,
    /// Active scopes seen
    pub scopes: usize,
    /// Roots deleted because their scope became empty or inactive
    pub roots_removed: usize,
    /// Changes made by the tree differ
    pub tree: DiffStats,
    /// Changes made to disabled/error entries
    pub sections: DiffStats,
    /// Roots registered after the pass
    pub roots: usize,
    /// Test cases reachable through the test lookup
    pub indexed_tests: usize,
    /// Files reachable through the file lookup
    pub indexed_files: usize,
}

impl PassReport {
    pub fn is_noop(&self) -> bool {
        self.roots_removed == 0 && self.tree.is_empty() && self.sections.is_empty()
    }
}

/// Incremental reconciler between a model provider and a presentation tree
///
/// Single-threaded: every call runs to completion before the next begins.
pub struct TreeSync<T: TestTree = MemoryTree> {
    tree: T,
    config: SyncConfig,
    generation: Generation,
    roots: RootRegistry,
    attachments: Attachments,
    index: ReverseIndex,
    loading: Option<ItemKey>,
}

impl TreeSync<MemoryTree> {
    /// Engine over a fresh in-memory tree
    pub fn in_memory(config: SyncConfig) -> Result<Self> {
        Self::new(MemoryTree::new(), config)
    }
}

impl<T: TestTree> TreeSync<T> {
    pub fn new(tree: T, config: SyncConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tree,
            config,
            generation: Generation::mint(),
            roots: RootRegistry::new(),
            attachments: Attachments::new(),
            index: ReverseIndex::new(),
            loading: None,
        })
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    /// Begin a full reload
    ///
    /// Mints a new generation, forgets all roots and lookups, empties the tree
    /// and, when any workspace folder is configured, shows a loading placeholder.
    pub fn start_reload(&mut self) -> Result<()> {
        self.generation = Generation::mint();
        self.roots.clear();
        self.index.clear();
        self.attachments.clear();
        self.loading = None;
        self.tree.replace(Parent::Top, Vec::new())?;

        if !self.config.workspace_folders.is_empty() {
            let key = self
                .tree
                .create_item(LOADING_ID, &self.config.loading_label, None)?;
            self.tree.add(Parent::Top, key)?;
            self.loading = Some(key);
        }

        info!("Reload started (generation {})", self.generation);
        Ok(())
    }

    /// End a reload by removing the loading placeholder
    pub fn finished_loading(&mut self) -> Result<()> {
        let Some(key) = self.loading.take() else {
            return Ok(());
        };
        if let Some(id) = self.tree.item(key).map(|item| item.id.clone()) {
            let parent = self.tree.parent_of(key).unwrap_or(Parent::Top);
            self.tree.delete(parent, &id)?;
        }
        info!("Reload finished (generation {})", self.generation);
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    /// Run one sync pass against the provider's current model
    pub fn update<P: ModelProvider + ?Sized>(&mut self, provider: &P) -> Result<PassReport> {
        let scopes = provider.scopes();
        let mut report = PassReport {
            scopes: scopes.len(),
            ..PassReport::default()
        };
        report.strategy = Some(
            self.roots
                .begin_pass(&mut self.tree, &self.generation, scopes.len())?,
        );

        for scope in &scopes {
            let logical = provider.scope_tree(scope);
            let disabled = provider.disabled_projects(scope);
            let errors = provider.config_errors(scope);
            let has_errors = errors.iter().any(|(_, errors)| !errors.is_empty());

            if logical.is_empty() && disabled.is_empty() && !has_errors {
                if self.roots.remove(&mut self.tree, &self.generation, scope)? {
                    report.roots_removed += 1;
                }
                continue;
            }

            let root = self.roots.ensure(&mut self.tree, &self.generation, scope)?;
            let stats = Differ::new(&mut self.tree, &mut self.attachments, &self.generation)
                .sync(&logical, root)?;
            report.tree.merge(stats);

            let mut sections =
                SectionSync::new(&mut self.tree, &mut self.attachments, &self.config.sort_prefix);
            report.sections.merge(sections.sync_disabled(root, &disabled)?);
            report.sections.merge(sections.sync_errors(root, &errors)?);
        }

        report.roots_removed += self
            .roots
            .retain_active(&mut self.tree, &self.generation, &scopes)?;
        self.attachments.prune(&self.tree);
        self.index.rebuild(&self.tree, &self.attachments)?;
        report.roots = self.roots.len();
        report.indexed_tests = self.index.test_count();
        report.indexed_files = self.index.file_count();

        debug!(
            "Sync pass over {} scope(s): +{} -{} ~{} nodes, +{} -{} entries, {} root(s) removed, {} tests / {} files indexed",
            report.scopes,
            report.tree.added,
            report.tree.removed,
            report.tree.updated,
            report.sections.added,
            report.sections.removed,
            report.roots_removed,
            report.indexed_tests,
            report.indexed_files
        );
        Ok(report)
    }

    /// Root the given scope is synced under, if it has one
    pub fn root_for(&self, scope: &Path) -> Option<Parent> {
        self.roots.get(scope)
    }

    /// Test cases under `root`, depth first
    pub fn collect_tests_inside(&self, root: Parent) -> CollectTests<'_, T> {
        CollectTests::new(&self.tree, &self.attachments, root)
    }

    pub fn test_item_for_test(&self, logical_id: &str) -> Option<ItemKey> {
        self.index.test(logical_id)
    }

    pub fn test_item_for_file(&self, path: &Path) -> Option<ItemKey> {
        self.index.file(path)
    }

    pub fn logical_ref(&self, key: ItemKey) -> Option<&LogicalRef> {
        self.attachments.logical(key)
    }

    pub fn disabled_ref(&self, key: ItemKey) -> Option<&DisabledProject> {
        self.attachments.disabled(key)
    }

    pub fn config_error_ref(&self, key: ItemKey) -> Option<&ConfigErrorRef> {
        self.attachments.config_error(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treesync_core::{LogicalNode, ModelConfig, Project, TestModel, Workspace};

    fn workspace(cases: &[&str]) -> Workspace {
        let file = LogicalNode::file("a", "/ws/a.spec.ts")
            .with_children(cases.iter().map(|id| LogicalNode::case(*id, *id)).collect());
        let suite = LogicalNode::root("suite").with_children(vec![file]);
        Workspace::new(vec![TestModel::new(ModelConfig::new("/ws", "/ws/cfg.json"))
            .with_project(Project::new("default", suite))])
    }

    fn engine() -> TreeSync {
        TreeSync::in_memory(SyncConfig::default().with_workspace_folders(["/ws"])).unwrap()
    }

    #[test]
    fn test_start_reload_shows_placeholder() {
        let mut sync = engine();
        sync.start_reload().unwrap();
        assert!(sync.is_loading());
        let top = sync.tree().children(Parent::Top).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(sync.tree().item(top[0]).unwrap().label, "Loading…");

        sync.finished_loading().unwrap();
        assert!(!sync.is_loading());
        assert!(sync.tree().children(Parent::Top).unwrap().is_empty());
    }

    #[test]
    fn test_no_placeholder_without_workspace_folders() {
        let mut sync = TreeSync::in_memory(SyncConfig::default()).unwrap();
        sync.start_reload().unwrap();
        assert!(!sync.is_loading());
        assert!(sync.tree().is_empty());
    }

    #[test]
    fn test_placeholder_survives_update_until_finished() {
        let mut sync = engine();
        sync.start_reload().unwrap();
        sync.update(&workspace(&["x"])).unwrap();
        assert_eq!(sync.tree().children(Parent::Top).unwrap().len(), 2);

        sync.finished_loading().unwrap();
        let top = sync.tree().children(Parent::Top).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(Some(top[0]), sync.test_item_for_file(Path::new("/ws/a.spec.ts")));
    }

    #[test]
    fn test_reload_invalidates_previous_generation() {
        let mut sync = engine();
        sync.start_reload().unwrap();
        sync.update(&workspace(&["x"])).unwrap();
        let old = sync.test_item_for_test("x").unwrap();
        let old_generation = sync.generation().clone();

        sync.start_reload().unwrap();
        assert_ne!(&old_generation, sync.generation());
        assert!(sync.test_item_for_test("x").is_none());
        assert!(sync.logical_ref(old).is_none());
        assert!(sync.tree().item(old).is_none());
    }

    #[test]
    fn test_update_reports_noop_on_repeat() {
        let mut sync = engine();
        sync.start_reload().unwrap();
        let first = sync.update(&workspace(&["x", "y"])).unwrap();
        assert_eq!(first.tree.added, 3);
        assert_eq!(first.strategy, Some(RootStrategy::SingleImplicitRoot));
        assert_eq!(first.roots, 1);
        assert_eq!((first.indexed_tests, first.indexed_files), (2, 1));

        let second = sync.update(&workspace(&["x", "y"])).unwrap();
        assert!(second.is_noop());
    }

    #[test]
    fn test_empty_scope_removes_root() {
        let mut sync = engine();
        sync.start_reload().unwrap();
        sync.finished_loading().unwrap();
        sync.update(&workspace(&["x"])).unwrap();

        let empty = Workspace::new(vec![TestModel::new(ModelConfig::new("/ws", "/ws/cfg.json"))]);
        let report = sync.update(&empty).unwrap();
        assert_eq!(report.roots_removed, 1);
        assert_eq!(report.roots, 0);
        assert_eq!(report.indexed_tests, 0);
        assert!(sync.tree().is_empty());
        assert!(sync.root_for(Path::new("/ws")).is_none());
        assert!(sync.test_item_for_test("x").is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SyncConfig {
            sort_prefix: String::new(),
            ..SyncConfig::default()
        };
        assert!(TreeSync::in_memory(config).is_err());
    }
}
