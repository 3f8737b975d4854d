//! File and directory node types.

use std::borrow::Cow;
use std::ffi::OsString;

use serde::{Deserialize, Serialize};

/// Index of a node within its [`UsageTree`](crate::UsageTree).
///
/// Ids are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId from a raw index.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Position of the node in the tree arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Type of file system node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Anything that is not a directory (regular files, symlinks, devices).
    File,
    /// Directory.
    Directory,
}

impl NodeKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, NodeKind::Directory)
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File)
    }
}

/// A single file or directory in the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageNode {
    /// Local name as found on disk (not full path). The root carries the
    /// scanned path.
    pub name: OsString,

    /// Node type.
    pub kind: NodeKind,

    /// Size in bytes. Aggregate of all descendant files for directories
    /// once the tree has been processed.
    pub size: u64,

    /// Back-reference to the containing directory, `None` for the root.
    pub parent: Option<NodeId>,

    /// Visible children. After processing: pruned by size limit and
    /// sorted by size descending, then name ascending.
    pub children: Vec<NodeId>,
}

impl UsageNode {
    /// Create a new file node.
    pub fn new_file(name: impl Into<OsString>, size: u64, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::File,
            size,
            parent,
            children: Vec::new(),
        }
    }

    /// Create a new, not yet aggregated, directory node.
    pub fn new_directory(name: impl Into<OsString>, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Directory,
            size: 0,
            parent,
            children: Vec::new(),
        }
    }

    /// Name for display. Bytes that are not valid UTF-8 are replaced.
    pub fn display_name(&self) -> Cow<'_, str> {
        self.name.to_string_lossy()
    }

    /// Check if this node is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Get the number of visible children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}
