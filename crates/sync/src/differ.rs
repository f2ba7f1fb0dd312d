//! Tree differ: reconcile presentation children against a logical tree
//!
//! Works one level at a time:
//! 1. Index logical children by id
//! 2. Index presentation children of the current generation by stripped id
//! 3. Delete presentation children with no logical counterpart
//! 4. Create presentation children for new logical ids
//! 5. Sync attributes (back-reference, tags, range) of every child
//! 6. Descend into every child
//!
//! Presentation nodes whose logical id survives are kept as the same object.
//! Child order follows the logical tree; nothing is re-sorted here.

use crate::attach::{Attachment, Attachments};
use crate::generation::Generation;
use crate::item::{ItemKey, Parent, Range, Tags};
use crate::tree::TestTree;
use crate::Result;
use ahash::{AHashMap, AHashSet};
use tracing::{trace, warn};
use treesync_core::LogicalNode;

/// Counters for one differ run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffStats {
    /// Presentation nodes created
    pub added: usize,
    /// Presentation nodes deleted (subtrees count once)
    pub removed: usize,
    /// Attribute writes on surviving or new nodes
    pub updated: usize,
}

impl DiffStats {
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0 && self.updated == 0
    }

    pub fn merge(&mut self, other: DiffStats) {
        self.added += other.added;
        self.removed += other.removed;
        self.updated += other.updated;
    }
}

pub struct Differ<'a, T: TestTree> {
    tree: &'a mut T,
    attachments: &'a mut Attachments,
    generation: &'a Generation,
    stats: DiffStats,
}

impl<'a, T: TestTree> Differ<'a, T> {
    pub fn new(tree: &'a mut T, attachments: &'a mut Attachments, generation: &'a Generation) -> Self {
        Self {
            tree,
            attachments,
            generation,
            stats: DiffStats::default(),
        }
    }

    /// Make the children of `parent` mirror the children of `logical`, recursively
    pub fn sync(mut self, logical: &LogicalNode, parent: Parent) -> Result<DiffStats> {
        let mut pending: Vec<(&LogicalNode, Parent)> = vec![(logical, parent)];
        while let Some((node, parent)) = pending.pop() {
            let synced = self.sync_level(node, parent)?;
            pending.extend(synced.into_iter().rev());
        }
        Ok(self.stats)
    }

    /// Reconcile one level; returns the child pairs to descend into
    fn sync_level<'n>(
        &mut self,
        logical: &'n LogicalNode,
        parent: Parent,
    ) -> Result<Vec<(&'n LogicalNode, Parent)>> {
        let mut logical_by_id: AHashMap<&str, &LogicalNode> =
            AHashMap::with_capacity(logical.children.len());
        for child in &logical.children {
            if logical_by_id.insert(child.id.as_str(), child).is_some() {
                warn!("Duplicate logical id {:?} under {:?}; last one wins", child.id, logical.id);
            }
        }

        // Stripped id -> (presentation id, handle). Foreign generations are left alone.
        let mut presented: AHashMap<String, (String, ItemKey)> = AHashMap::new();
        for key in self.tree.children(parent)? {
            let Some(item) = self.tree.item(key) else {
                continue;
            };
            if let Some(stripped) = self.generation.strip(&item.id) {
                presented.insert(stripped.to_string(), (item.id.clone(), key));
            }
        }

        let stale: Vec<String> = presented
            .keys()
            .filter(|id| !logical_by_id.contains_key(id.as_str()))
            .cloned()
            .collect();
        for id in stale {
            if let Some((full_id, _)) = presented.remove(&id) {
                trace!("Removing {} from {}", full_id, parent);
                self.tree.delete(parent, &full_id)?;
                self.stats.removed += 1;
            }
        }

        let mut descend = Vec::with_capacity(logical.children.len());
        for child in &logical.children {
            let key = match presented.get(&child.id) {
                Some(&(_, key)) => key,
                None => {
                    let key = self.create(child, parent)?;
                    presented.insert(child.id.clone(), (self.generation.tag(&child.id), key));
                    key
                }
            };
            self.sync_attributes(child, key)?;
            descend.push((child, Parent::Item(key)));
        }

        Ok(descend)
    }

    fn create(&mut self, child: &LogicalNode, parent: Parent) -> Result<ItemKey> {
        let id = self.generation.tag(&child.id);
        let uri = child.location.as_ref().map(|l| l.file.as_path());
        let key = self.tree.create_item(&id, &child.title, uri)?;
        if child.is_unexpanded_file() {
            self.tree.set_can_resolve_children(key, true)?;
        }
        self.attachments.attach(key, Attachment::Logical(child.to_ref()));
        self.tree.add(parent, key)?;
        trace!("Added {} under {}", id, parent);
        self.stats.added += 1;
        Ok(key)
    }

    fn sync_attributes(&mut self, child: &LogicalNode, key: ItemKey) -> Result<()> {
        self.attachments.attach(key, Attachment::Logical(child.to_ref()));

        let (tags_differ, current_range) = match self.tree.item(key) {
            Some(item) => {
                let current: AHashSet<&str> = item.tags.iter().map(String::as_str).collect();
                let wanted: AHashSet<&str> = child.tags.iter().map(String::as_str).collect();
                (current != wanted, item.range)
            }
            None => return Ok(()),
        };

        if child.is_case() && tags_differ {
            let tags: Tags = child.tags.iter().cloned().collect();
            self.tree.set_tags(key, tags)?;
            self.stats.updated += 1;
        }

        match child.location.as_ref().filter(|l| l.has_position()) {
            Some(location) => {
                let line = location.zero_based_line();
                if current_range.map(|r| r.start.line) != Some(line) {
                    self.tree.set_range(key, Some(Range::line(line)))?;
                    self.stats.updated += 1;
                }
            }
            None => {
                if current_range.is_some() {
                    self.tree.set_range(key, None)?;
                    self.stats.updated += 1;
                }
            }
        }

        Ok(())
    }
}
