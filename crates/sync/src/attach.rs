//! Back-references from presentation nodes to what they represent
//!
//! Kept as a side table keyed by node handle. A node carries at most one
//! attachment.

use crate::item::ItemKey;
use crate::tree::TestTree;
use ahash::AHashMap;
use treesync_core::{ConfigError, DisabledProject, LogicalRef, ModelConfig};

/// A configuration error together with the configuration it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigErrorRef {
    pub config: ModelConfig,
    pub error: ConfigError,
}

/// What a presentation node stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    Logical(LogicalRef),
    Disabled(DisabledProject),
    Error(ConfigErrorRef),
}

#[derive(Debug, Default)]
pub struct Attachments {
    by_key: AHashMap<ItemKey, Attachment>,
}

impl Attachments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach, replacing whatever was attached before
    pub fn attach(&mut self, key: ItemKey, attachment: Attachment) {
        self.by_key.insert(key, attachment);
    }

    pub fn get(&self, key: ItemKey) -> Option<&Attachment> {
        self.by_key.get(&key)
    }

    pub fn logical(&self, key: ItemKey) -> Option<&LogicalRef> {
        match self.by_key.get(&key)? {
            Attachment::Logical(node) => Some(node),
            _ => None,
        }
    }

    pub fn disabled(&self, key: ItemKey) -> Option<&DisabledProject> {
        match self.by_key.get(&key)? {
            Attachment::Disabled(project) => Some(project),
            _ => None,
        }
    }

    pub fn config_error(&self, key: ItemKey) -> Option<&ConfigErrorRef> {
        match self.by_key.get(&key)? {
            Attachment::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Forget attachments of nodes that no longer exist
    pub fn prune<T: TestTree>(&mut self, tree: &T) -> usize {
        let before = self.by_key.len();
        self.by_key.retain(|key, _| tree.item(*key).is_some());
        before - self.by_key.len()
    }

    pub fn clear(&mut self) {
        self.by_key.clear();
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
