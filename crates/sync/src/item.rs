//! Presentation tree nodes

use smallvec::SmallVec;
use std::fmt;
use std::path::{Path, PathBuf};

/// Handle to a presentation node
///
/// Keys are allocated monotonically and never reused, so two handles are
/// equal exactly when they denote the same node object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(pub(crate) u64);

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a child collection lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    /// The tree container's own top level
    Top,
    /// A node's children
    Item(ItemKey),
}

impl fmt::Display for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parent::Top => write!(f, "<top>"),
            Parent::Item(key) => write!(f, "{}", key),
        }
    }
}

/// Zero-based line/character position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Span inside a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Range covering one whole line
    pub const fn line(line: u32) -> Self {
        Self {
            start: Position::new(line, 0),
            end: Position::new(line + 1, 0),
        }
    }

    /// Zero-width range at a position
    pub const fn point(line: u32, character: u32) -> Self {
        Self {
            start: Position::new(line, character),
            end: Position::new(line, character),
        }
    }
}

/// Tag list of a presentation node
pub type Tags = SmallVec<[String; 4]>;

/// A node of the presentation tree
///
/// Fields are read-only from the outside; writes go through [`crate::TestTree`]
/// so the container can observe them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestItem {
    pub id: String,
    pub label: String,
    pub uri: Option<PathBuf>,
    pub range: Option<Range>,
    pub tags: Tags,
    pub description: Option<String>,
    pub error: Option<String>,
    pub sort_text: Option<String>,
    pub can_resolve_children: bool,
}

impl TestItem {
    pub(crate) fn new(id: &str, label: &str, uri: Option<&Path>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            uri: uri.map(Path::to_path_buf),
            range: None,
            tags: Tags::new(),
            description: None,
            error: None,
            sort_text: None,
            can_resolve_children: false,
        }
    }

    /// Text a host orders siblings by
    pub fn sort_key(&self) -> &str {
        self.sort_text.as_deref().unwrap_or(&self.label)
    }

    /// A node pointing at a whole file rather than a position in it
    pub fn is_file_level(&self) -> bool {
        self.uri.is_some() && self.range.is_none()
    }
}
