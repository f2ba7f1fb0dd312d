//! Reverse lookups over the presentation tree
//!
//! Rebuilt from scratch after every pass rather than patched incrementally.

use crate::attach::Attachments;
use crate::item::{ItemKey, Parent};
use crate::tree::TestTree;
use crate::Result;
use ahash::AHashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct ReverseIndex {
    by_test: AHashMap<String, ItemKey>,
    by_file: AHashMap<PathBuf, ItemKey>,
}

impl ReverseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the index contents with a fresh walk of `tree`
    ///
    /// Test cases are indexed by logical id. Logical nodes located at a whole
    /// file (a uri but no range) are indexed by path.
    pub fn rebuild<T: TestTree>(&mut self, tree: &T, attachments: &Attachments) -> Result<()> {
        let mut by_test = AHashMap::with_capacity(self.by_test.len());
        let mut by_file = AHashMap::with_capacity(self.by_file.len());

        let mut stack: Vec<ItemKey> = tree.children(Parent::Top)?;
        stack.reverse();
        while let Some(key) = stack.pop() {
            if let Some(logical) = attachments.logical(key) {
                if logical.is_case() {
                    by_test.insert(logical.id.clone(), key);
                }
                if let Some(item) = tree.item(key).filter(|item| item.is_file_level()) {
                    if let Some(uri) = &item.uri {
                        by_file.insert(uri.clone(), key);
                    }
                }
            }
            let mut children = tree.children(Parent::Item(key))?;
            children.reverse();
            stack.extend(children);
        }

        self.by_test = by_test;
        self.by_file = by_file;
        Ok(())
    }

    pub fn test(&self, logical_id: &str) -> Option<ItemKey> {
        self.by_test.get(logical_id).copied()
    }

    pub fn file(&self, path: &Path) -> Option<ItemKey> {
        self.by_file.get(path).copied()
    }

    pub fn test_count(&self) -> usize {
        self.by_test.len()
    }

    pub fn file_count(&self) -> usize {
        self.by_file.len()
    }

    pub fn clear(&mut self) {
        self.by_test.clear();
        self.by_file.clear();
    }
}

/// Depth-first walk yielding the test cases under a node
///
/// Evaluated lazily; create a new one to walk again.
pub struct CollectTests<'a, T: TestTree> {
    tree: &'a T,
    attachments: &'a Attachments,
    stack: Vec<ItemKey>,
}

impl<'a, T: TestTree> CollectTests<'a, T> {
    /// Walk `root` itself (when it is a node) and everything below it
    pub fn new(tree: &'a T, attachments: &'a Attachments, root: Parent) -> Self {
        let stack = match root {
            Parent::Item(key) => vec![key],
            Parent::Top => {
                let mut top = tree.children(Parent::Top).unwrap_or_default();
                top.reverse();
                top
            }
        };
        Self {
            tree,
            attachments,
            stack,
        }
    }
}

impl<T: TestTree> Iterator for CollectTests<'_, T> {
    type Item = ItemKey;

    fn next(&mut self) -> Option<ItemKey> {
        while let Some(key) = self.stack.pop() {
            if let Ok(mut children) = self.tree.children(Parent::Item(key)) {
                children.reverse();
                self.stack.extend(children);
            }
            if self.attachments.logical(key).is_some_and(|node| node.is_case()) {
                return Some(key);
            }
        }
        None
    }
}
