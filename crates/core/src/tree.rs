//! Logical tree emitted by the model provider on every pass

use crate::location::Location;
use serde::{Deserialize, Serialize};

/// Kind of logical node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Synthetic root of a scope's tree
    Root,
    /// Describe-style grouping inside a file
    Group,
    /// A test file
    File,
    /// A single test case
    Case,
}

/// A node of the logical tree
///
/// Recreated wholesale on every pass; `id` is stable across passes for the
/// same logical entity and unique within one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalNode {
    pub id: String,
    pub kind: NodeKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LogicalNode>,
}

impl LogicalNode {
    /// Create a childless node of the given kind
    pub fn new(kind: NodeKind, id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            location: None,
            tags: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an empty scope root
    pub fn root(id: impl Into<String>) -> Self {
        Self::new(NodeKind::Root, id, "")
    }

    /// Create a file node located at `path`
    pub fn file(id: impl Into<String>, path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(NodeKind::File, id, title).with_location(Location::file(path))
    }

    /// Create a test case node
    pub fn case(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(NodeKind::Case, id, title)
    }

    /// Create a group node
    pub fn group(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(NodeKind::Group, id, title)
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_children(mut self, children: Vec<LogicalNode>) -> Self {
        self.children = children;
        self
    }

    /// Check if the node has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether this is a test case
    pub fn is_case(&self) -> bool {
        self.kind == NodeKind::Case
    }

    /// A file node that has not been expanded yet
    pub fn is_unexpanded_file(&self) -> bool {
        self.kind == NodeKind::File && self.children.is_empty()
    }

    /// Find a descendant (or self) by id
    pub fn find(&self, id: &str) -> Option<&LogicalNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// Number of nodes in this subtree, self included
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// The node's attributes without its children
    pub fn to_ref(&self) -> LogicalRef {
        LogicalRef {
            id: self.id.clone(),
            kind: self.kind,
            title: self.title.clone(),
            location: self.location.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// Non-owning back-reference to a logical node
///
/// Captures the node as it looked in the pass that last touched the
/// presentation node. Children are not carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalRef {
    pub id: String,
    pub kind: NodeKind,
    pub title: String,
    pub location: Option<Location>,
    pub tags: Vec<String>,
}

impl LogicalRef {
    pub fn is_case(&self) -> bool {
        self.kind == NodeKind::Case
    }
}
