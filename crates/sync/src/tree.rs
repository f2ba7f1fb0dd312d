//! Presentation tree container
//!
//! `TestTree` is the seam to whatever host stores and renders the tree.
//! `MemoryTree` is the in-process implementation used by the CLI and tests.

use crate::error::TreeError;
use crate::item::{ItemKey, Parent, Range, Tags, TestItem};
use crate::Result;
use ahash::AHashMap;
use std::path::Path;

/// Mutable, keyed, ordered tree of test items
///
/// Ids are unique within one child collection. Deleting a node drops its
/// whole subtree.
pub trait TestTree {
    /// Create a detached item
    fn create_item(&mut self, id: &str, label: &str, uri: Option<&Path>) -> Result<ItemKey>;

    fn item(&self, key: ItemKey) -> Option<&TestItem>;

    /// Children of `parent` in insertion order
    fn children(&self, parent: Parent) -> Result<Vec<ItemKey>>;

    /// Child of `parent` with the given id
    fn child(&self, parent: Parent, id: &str) -> Result<Option<ItemKey>>;

    /// Where `key` is attached, if anywhere
    fn parent_of(&self, key: ItemKey) -> Option<Parent>;

    /// Attach a detached item under `parent`
    fn add(&mut self, parent: Parent, key: ItemKey) -> Result<()>;

    /// Remove the child with `id` from `parent`; unknown ids are ignored
    fn delete(&mut self, parent: Parent, id: &str) -> Result<()>;

    /// Make `keys` the exact children of `parent`
    fn replace(&mut self, parent: Parent, keys: Vec<ItemKey>) -> Result<()>;

    fn set_tags(&mut self, key: ItemKey, tags: Tags) -> Result<()>;
    fn set_range(&mut self, key: ItemKey, range: Option<Range>) -> Result<()>;
    fn set_description(&mut self, key: ItemKey, description: Option<String>) -> Result<()>;
    fn set_error(&mut self, key: ItemKey, error: Option<String>) -> Result<()>;
    fn set_sort_text(&mut self, key: ItemKey, sort_text: Option<String>) -> Result<()>;
    fn set_can_resolve_children(&mut self, key: ItemKey, value: bool) -> Result<()>;
}

/// Ordered child collection keyed by id
#[derive(Debug, Default)]
struct Children {
    order: Vec<ItemKey>,
    by_id: AHashMap<String, ItemKey>,
}

impl Children {
    fn get(&self, id: &str) -> Option<ItemKey> {
        self.by_id.get(id).copied()
    }

    fn insert(&mut self, id: String, key: ItemKey) {
        self.by_id.insert(id, key);
        self.order.push(key);
    }

    fn remove(&mut self, id: &str) -> Option<ItemKey> {
        let key = self.by_id.remove(id)?;
        self.order.retain(|k| *k != key);
        Some(key)
    }
}

#[derive(Debug)]
struct Slot {
    item: TestItem,
    parent: Option<Parent>,
    children: Children,
}

/// In-memory presentation tree
#[derive(Debug, Default)]
pub struct MemoryTree {
    slots: AHashMap<ItemKey, Slot>,
    top: Children,
    next_key: u64,
    mutations: u64,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mutations applied since creation
    pub fn mutations(&self) -> u64 {
        self.mutations
    }

    /// Number of live items, attached or not
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Depth-first search for an attached item by id
    pub fn find(&self, id: &str) -> Option<ItemKey> {
        let mut stack: Vec<ItemKey> = self.top.order.iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            let slot = self.slots.get(&key)?;
            if slot.item.id == id {
                return Some(key);
            }
            stack.extend(slot.children.order.iter().rev().copied());
        }
        None
    }

    /// Children ordered the way a host displays them
    ///
    /// Items with an explicit sort text rank after every item ordered by its
    /// label, whatever characters either string starts with.
    pub fn sorted_children(&self, parent: Parent) -> Result<Vec<ItemKey>> {
        let mut keys = self.children(parent)?;
        keys.sort_by_cached_key(|key| {
            self.slots
                .get(key)
                .map(|slot| (slot.item.sort_text.is_some(), slot.item.sort_key().to_string()))
        });
        Ok(keys)
    }

    fn collection(&self, parent: Parent) -> Result<&Children> {
        match parent {
            Parent::Top => Ok(&self.top),
            Parent::Item(key) => self
                .slots
                .get(&key)
                .map(|slot| &slot.children)
                .ok_or(TreeError::UnknownParent(key)),
        }
    }

    fn collection_mut(&mut self, parent: Parent) -> Result<&mut Children> {
        match parent {
            Parent::Top => Ok(&mut self.top),
            Parent::Item(key) => self
                .slots
                .get_mut(&key)
                .map(|slot| &mut slot.children)
                .ok_or(TreeError::UnknownParent(key)),
        }
    }

    fn slot_mut(&mut self, key: ItemKey) -> Result<&mut Slot> {
        self.slots.get_mut(&key).ok_or(TreeError::UnknownItem(key))
    }

    fn drop_subtree(&mut self, key: ItemKey) {
        let mut stack = vec![key];
        while let Some(key) = stack.pop() {
            if let Some(slot) = self.slots.remove(&key) {
                stack.extend(slot.children.order);
            }
        }
    }

    fn touch(&mut self) {
        self.mutations += 1;
    }
}

impl TestTree for MemoryTree {
    fn create_item(&mut self, id: &str, label: &str, uri: Option<&Path>) -> Result<ItemKey> {
        let key = ItemKey(self.next_key);
        self.next_key += 1;
        self.slots.insert(
            key,
            Slot {
                item: TestItem::new(id, label, uri),
                parent: None,
                children: Children::default(),
            },
        );
        Ok(key)
    }

    fn item(&self, key: ItemKey) -> Option<&TestItem> {
        self.slots.get(&key).map(|slot| &slot.item)
    }

    fn children(&self, parent: Parent) -> Result<Vec<ItemKey>> {
        Ok(self.collection(parent)?.order.clone())
    }

    fn child(&self, parent: Parent, id: &str) -> Result<Option<ItemKey>> {
        Ok(self.collection(parent)?.get(id))
    }

    fn parent_of(&self, key: ItemKey) -> Option<Parent> {
        self.slots.get(&key).and_then(|slot| slot.parent)
    }

    fn add(&mut self, parent: Parent, key: ItemKey) -> Result<()> {
        let slot = self.slots.get(&key).ok_or(TreeError::UnknownItem(key))?;
        if slot.parent.is_some() || parent == Parent::Item(key) {
            return Err(TreeError::AlreadyAttached(key));
        }
        let id = slot.item.id.clone();

        let collection = self.collection_mut(parent)?;
        if collection.get(&id).is_some() {
            return Err(TreeError::DuplicateChild {
                parent: parent.to_string(),
                id,
            });
        }
        collection.insert(id, key);

        self.slot_mut(key)?.parent = Some(parent);
        self.touch();
        Ok(())
    }

    fn delete(&mut self, parent: Parent, id: &str) -> Result<()> {
        if let Some(key) = self.collection_mut(parent)?.remove(id) {
            self.drop_subtree(key);
            self.touch();
        }
        Ok(())
    }

    fn replace(&mut self, parent: Parent, keys: Vec<ItemKey>) -> Result<()> {
        let mut next = Children::default();
        for &key in &keys {
            let slot = self.slots.get(&key).ok_or(TreeError::UnknownItem(key))?;
            if slot.parent.is_some_and(|p| p != parent) {
                return Err(TreeError::AlreadyAttached(key));
            }
            if next.get(&slot.item.id).is_some() {
                return Err(TreeError::DuplicateChild {
                    parent: parent.to_string(),
                    id: slot.item.id.clone(),
                });
            }
            next.insert(slot.item.id.clone(), key);
        }

        let previous = std::mem::replace(self.collection_mut(parent)?, next);
        for key in previous.order {
            if !keys.contains(&key) {
                self.drop_subtree(key);
            }
        }
        for key in keys {
            self.slot_mut(key)?.parent = Some(parent);
        }
        self.touch();
        Ok(())
    }

    fn set_tags(&mut self, key: ItemKey, tags: Tags) -> Result<()> {
        self.slot_mut(key)?.item.tags = tags;
        self.touch();
        Ok(())
    }

    fn set_range(&mut self, key: ItemKey, range: Option<Range>) -> Result<()> {
        self.slot_mut(key)?.item.range = range;
        self.touch();
        Ok(())
    }

    fn set_description(&mut self, key: ItemKey, description: Option<String>) -> Result<()> {
        self.slot_mut(key)?.item.description = description;
        self.touch();
        Ok(())
    }

    fn set_error(&mut self, key: ItemKey, error: Option<String>) -> Result<()> {
        self.slot_mut(key)?.item.error = error;
        self.touch();
        Ok(())
    }

    fn set_sort_text(&mut self, key: ItemKey, sort_text: Option<String>) -> Result<()> {
        self.slot_mut(key)?.item.sort_text = sort_text;
        self.touch();
        Ok(())
    }

    fn set_can_resolve_children(&mut self, key: ItemKey, value: bool) -> Result<()> {
        self.slot_mut(key)?.item.can_resolve_children = value;
        self.touch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_new(tree: &mut MemoryTree, parent: Parent, id: &str) -> ItemKey {
        let key = tree.create_item(id, id, None).unwrap();
        tree.add(parent, key).unwrap();
        key
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut tree = MemoryTree::new();
        let b = add_new(&mut tree, Parent::Top, "b");
        let a = add_new(&mut tree, Parent::Top, "a");
        assert_eq!(tree.children(Parent::Top).unwrap(), vec![b, a]);
        assert_eq!(tree.sorted_children(Parent::Top).unwrap(), vec![a, b]);
        assert_eq!(tree.parent_of(a), Some(Parent::Top));
    }

    #[test]
    fn test_sort_text_ranks_after_labels() {
        let mut tree = MemoryTree::new();
        let entry = add_new(&mut tree, Parent::Top, "[disabled] p - cfg.json");
        tree.set_sort_text(entry, Some("~cfg.json:p".to_string())).unwrap();
        let umlaut = add_new(&mut tree, Parent::Top, "über");
        let tilde = add_new(&mut tree, Parent::Top, "~~~");
        let plain = add_new(&mut tree, Parent::Top, "a");
        assert_eq!(
            tree.sorted_children(Parent::Top).unwrap(),
            vec![plain, tilde, umlaut, entry]
        );
    }

    #[test]
    fn test_duplicate_child_rejected() {
        let mut tree = MemoryTree::new();
        add_new(&mut tree, Parent::Top, "x");
        let dup = tree.create_item("x", "x", None).unwrap();
        let err = tree.add(Parent::Top, dup).unwrap_err();
        assert!(matches!(err, TreeError::DuplicateChild { .. }));
    }

    #[test]
    fn test_add_twice_rejected() {
        let mut tree = MemoryTree::new();
        let parent = add_new(&mut tree, Parent::Top, "p");
        let key = add_new(&mut tree, Parent::Top, "x");
        assert_eq!(
            tree.add(Parent::Item(parent), key).unwrap_err(),
            TreeError::AlreadyAttached(key)
        );
    }

    #[test]
    fn test_delete_drops_subtree() {
        let mut tree = MemoryTree::new();
        let file = add_new(&mut tree, Parent::Top, "file");
        let case = add_new(&mut tree, Parent::Item(file), "case");
        assert_eq!(tree.len(), 2);

        tree.delete(Parent::Top, "file").unwrap();
        assert!(tree.item(file).is_none());
        assert!(tree.item(case).is_none());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let mut tree = MemoryTree::new();
        let before = tree.mutations();
        tree.delete(Parent::Top, "nope").unwrap();
        assert_eq!(tree.mutations(), before);
    }

    #[test]
    fn test_unknown_parent_is_an_error() {
        let mut tree = MemoryTree::new();
        let key = tree.create_item("x", "x", None).unwrap();
        let missing = ItemKey(999);
        assert_eq!(
            tree.add(Parent::Item(missing), key).unwrap_err(),
            TreeError::UnknownParent(missing)
        );
    }

    #[test]
    fn test_replace_keeps_listed_and_drops_rest() {
        let mut tree = MemoryTree::new();
        let a = add_new(&mut tree, Parent::Top, "a");
        let b = add_new(&mut tree, Parent::Top, "b");
        let c = tree.create_item("c", "c", None).unwrap();

        tree.replace(Parent::Top, vec![c, a]).unwrap();
        assert_eq!(tree.children(Parent::Top).unwrap(), vec![c, a]);
        assert!(tree.item(b).is_none());
        assert_eq!(tree.child(Parent::Top, "c").unwrap(), Some(c));

        tree.replace(Parent::Top, Vec::new()).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_find_searches_nested_items() {
        let mut tree = MemoryTree::new();
        let file = add_new(&mut tree, Parent::Top, "file");
        let case = add_new(&mut tree, Parent::Item(file), "case");
        assert_eq!(tree.find("case"), Some(case));
        assert_eq!(tree.find("other"), None);
    }

    #[test]
    fn test_setters_count_mutations() {
        let mut tree = MemoryTree::new();
        let key = add_new(&mut tree, Parent::Top, "x");
        let before = tree.mutations();
        tree.set_range(key, Some(Range::line(3))).unwrap();
        tree.set_tags(key, Tags::from_vec(vec!["@slow".to_string()])).unwrap();
        assert_eq!(tree.mutations(), before + 2);
        assert_eq!(tree.item(key).unwrap().range, Some(Range::line(3)));
    }
}
