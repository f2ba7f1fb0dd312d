//! Source locations attached to logical entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A position inside a source file
///
/// `line` and `column` are 1-based. Zero in both means "the whole file".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: PathBuf,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
}

impl Location {
    /// Location covering a whole file
    pub fn file(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            line: 0,
            column: 0,
        }
    }

    /// Location pointing at a line/column inside a file
    pub fn at(file: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Whether this location points inside the file rather than at the file itself
    pub fn has_position(&self) -> bool {
        self.line != 0 || self.column != 0
    }

    /// Zero-based line the location starts on
    pub fn zero_based_line(&self) -> u32 {
        self.line.saturating_sub(1)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_position() {
            write!(f, "{}:{}", self.file.display(), self.line)
        } else {
            write!(f, "{}", self.file.display())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_line_only_when_positioned() {
        assert_eq!(Location::file("a/b.spec.ts").to_string(), "a/b.spec.ts");
        assert_eq!(Location::at("a/b.spec.ts", 12, 3).to_string(), "a/b.spec.ts:12");
    }

    #[test]
    fn test_zero_based_line_saturates() {
        assert_eq!(Location::at("f", 1, 1).zero_based_line(), 0);
        assert_eq!(Location::at("f", 0, 5).zero_based_line(), 0);
        assert_eq!(Location::at("f", 40, 0).zero_based_line(), 39);
    }

    #[test]
    fn test_column_only_counts_as_position() {
        assert!(Location::at("f", 0, 2).has_position());
        assert!(!Location::file("f").has_position());
    }
}
