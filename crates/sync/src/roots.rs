//! Root lifecycle: one presentation root per active workspace scope
//!
//! With exactly one active scope the scope's root is the tree container's top
//! level itself. With several, each scope gets its own generation-tagged root
//! node labeled with the scope's directory name.

use crate::auxiliary::{DISABLED_PREFIX, ERROR_PREFIX};
use crate::generation::Generation;
use crate::item::Parent;
use crate::tree::TestTree;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How scopes map onto presentation roots for one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootStrategy {
    /// The only scope aliases the tree's top level
    SingleImplicitRoot,
    /// Every scope owns a root node under the top level
    PerScopeRoot,
}

impl RootStrategy {
    pub fn for_scope_count(count: usize) -> Self {
        if count == 1 {
            RootStrategy::SingleImplicitRoot
        } else {
            RootStrategy::PerScopeRoot
        }
    }
}

/// Registered roots, keyed by scope path
#[derive(Debug, Default)]
pub struct RootRegistry {
    strategy: Option<RootStrategy>,
    roots: Vec<(PathBuf, Parent)>,
}

impl RootRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the strategy for a pass over `scope_count` active scopes
    ///
    /// Roots registered under a different strategy are torn down first.
    pub fn begin_pass<T: TestTree>(
        &mut self,
        tree: &mut T,
        generation: &Generation,
        scope_count: usize,
    ) -> Result<RootStrategy> {
        let strategy = RootStrategy::for_scope_count(scope_count);
        if self.strategy.is_some_and(|current| current != strategy) && !self.roots.is_empty() {
            warn!(
                "Root strategy changed to {:?}; rebuilding {} root(s)",
                strategy,
                self.roots.len()
            );
            let scopes: Vec<PathBuf> = self.roots.iter().map(|(scope, _)| scope.clone()).collect();
            for scope in scopes {
                self.remove(tree, generation, &scope)?;
            }
        }
        self.strategy = Some(strategy);
        Ok(strategy)
    }

    pub fn get(&self, scope: &Path) -> Option<Parent> {
        self.roots
            .iter()
            .find(|(registered, _)| registered == scope)
            .map(|(_, parent)| *parent)
    }

    /// Root for `scope`, created on first use
    pub fn ensure<T: TestTree>(
        &mut self,
        tree: &mut T,
        generation: &Generation,
        scope: &Path,
    ) -> Result<Parent> {
        if let Some(parent) = self.get(scope) {
            return Ok(parent);
        }

        let parent = match self.strategy.unwrap_or(RootStrategy::PerScopeRoot) {
            RootStrategy::SingleImplicitRoot => Parent::Top,
            RootStrategy::PerScopeRoot => {
                let id = generation.tag(&format!("root:{}", scope.display()));
                let label = scope
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| scope.display().to_string());
                let key = tree.create_item(&id, &label, Some(scope))?;
                tree.add(Parent::Top, key)?;
                Parent::Item(key)
            }
        };

        debug!("Created root for {} at {}", scope.display(), parent);
        self.roots.push((scope.to_path_buf(), parent));
        Ok(parent)
    }

    /// Delete the root of `scope`; returns whether one was registered
    pub fn remove<T: TestTree>(
        &mut self,
        tree: &mut T,
        generation: &Generation,
        scope: &Path,
    ) -> Result<bool> {
        let Some(index) = self.roots.iter().position(|(registered, _)| registered == scope) else {
            return Ok(false);
        };
        let (_, parent) = self.roots.remove(index);

        match parent {
            Parent::Top => {
                // Leave unrelated top-level entries (the loading placeholder) in place.
                for key in tree.children(Parent::Top)? {
                    let Some(id) = tree.item(key).map(|item| item.id.clone()) else {
                        continue;
                    };
                    if generation.owns(&id)
                        || id.starts_with(DISABLED_PREFIX)
                        || id.starts_with(ERROR_PREFIX)
                    {
                        tree.delete(Parent::Top, &id)?;
                    }
                }
            }
            Parent::Item(key) => {
                if let Some(id) = tree.item(key).map(|item| item.id.clone()) {
                    tree.delete(Parent::Top, &id)?;
                }
            }
        }

        debug!("Deleted root for {}", scope.display());
        Ok(true)
    }

    /// Delete roots of scopes that are no longer active
    pub fn retain_active<T: TestTree>(
        &mut self,
        tree: &mut T,
        generation: &Generation,
        active: &[PathBuf],
    ) -> Result<usize> {
        let inactive: Vec<PathBuf> = self
            .roots
            .iter()
            .filter(|(scope, _)| !active.contains(scope))
            .map(|(scope, _)| scope.clone())
            .collect();
        for scope in &inactive {
            self.remove(tree, generation, scope)?;
        }
        Ok(inactive.len())
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Forget every root without touching the tree
    pub fn clear(&mut self) {
        self.roots.clear();
        self.strategy = None;
    }
}
