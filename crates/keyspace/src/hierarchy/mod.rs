//! tree shaped key spaces
//!
//! A [TreeSource] is an external, read-only hierarchy (a naming or directory
//! service) addressed by paths in its own separator. [HierarchicalConfiguration]
//! maps it onto dotted keys; [MemoryTree] is an in-memory source.
mod adapter;
mod memory;

pub use adapter::HierarchicalConfiguration;
pub use memory::MemoryTree;

use crate::value::Scalar;

/// Read-only hierarchy consumed by [HierarchicalConfiguration]
///
/// The empty path addresses the root.
pub trait TreeSource {
    /// Native path separator
    fn separator(&self) -> char {
        '/'
    }

    /// Immediate children of the sub-tree at `path`
    fn list_children(&self, path: &str) -> Result<Vec<Binding>, TreeError>;

    /// Leaf value at exactly `path`
    fn lookup(&self, path: &str) -> Result<Scalar, TreeError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub entry: Entry,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Subtree,
    Leaf(Scalar),
}

impl Binding {
    pub fn subtree(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry: Entry::Subtree,
        }
    }

    pub fn leaf(name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            name: name.into(),
            entry: Entry::Leaf(value.into()),
        }
    }

    pub fn is_subtree(&self) -> bool {
        matches!(self.entry, Entry::Subtree)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("nothing bound at '{0}'")]
    NotFound(String),
    #[error("'{0}' is a sub-tree, not a value")]
    NotALeaf(String),
    #[error("'{0}' is a value, not a sub-tree")]
    NotASubtree(String),
    #[error("tree source unavailable: {0}")]
    Unavailable(String),
}

/// `parent` + separator + `name`, where the empty path is the root
pub(crate) fn join(parent: &str, name: &str, separator: char) -> String {
    if parent.is_empty() {
        return name.to_string();
    }
    if name.is_empty() {
        return parent.to_string();
    }

    format!("{parent}{separator}{name}")
}
