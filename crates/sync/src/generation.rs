//! Session-unique id prefixes
//!
//! Every reload mints a fresh generation. Ids created during the session are
//! prefixed with it, so ids left over from an earlier session can never be
//! mistaken for current ones.

use std::fmt;
use ulid::Ulid;

/// A generation token and the prefix derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    prefix: String,
}

impl Generation {
    /// Mint a new, never before used generation
    pub fn mint() -> Self {
        Self {
            prefix: format!("{}:", Ulid::new()),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Prefix a logical id with this generation
    pub fn tag(&self, id: &str) -> String {
        let mut tagged = String::with_capacity(self.prefix.len() + id.len());
        tagged.push_str(&self.prefix);
        tagged.push_str(id);
        tagged
    }

    /// The logical id behind a presentation id, if it belongs to this generation
    pub fn strip<'a>(&self, id: &'a str) -> Option<&'a str> {
        id.strip_prefix(self.prefix.as_str())
    }

    pub fn owns(&self, id: &str) -> bool {
        id.starts_with(self.prefix.as_str())
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix.trim_end_matches(':'))
    }
}
