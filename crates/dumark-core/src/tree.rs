//! Usage tree arena and statistics.

use std::ffi::{OsStr, OsString};
use std::ops::Index;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ScanWarning;
use crate::node::{NodeId, UsageNode};

/// Summary statistics for a walked tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total number of files.
    pub total_files: u64,
    /// Total number of directories, including the root.
    pub total_dirs: u64,
    /// Directories that could not be listed.
    pub unreadable_dirs: u64,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file entry.
    pub fn record_file(&mut self) {
        self.total_files += 1;
    }

    /// Record a directory.
    pub fn record_dir(&mut self) {
        self.total_dirs += 1;
    }

    /// Record a directory whose listing failed.
    pub fn record_unreadable(&mut self) {
        self.unreadable_dirs += 1;
    }
}

/// In-memory hierarchy mirroring a filesystem subtree.
///
/// Nodes live in a single arena and are only ever dropped together with the
/// tree. Ownership runs parent to children through `children`; `parent` is a
/// plain index back-reference. Nodes pruned from a listing stay in the arena,
/// so ids handed out earlier remain valid for the life of the tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageTree {
    nodes: Vec<UsageNode>,

    /// Root path that was walked.
    pub root_path: PathBuf,

    /// Duration of the walk.
    pub scan_duration: Duration,

    /// Summary statistics.
    pub stats: TreeStats,

    /// Non-fatal problems encountered while walking.
    pub warnings: Vec<ScanWarning>,
}

impl UsageTree {
    /// Id of the root node of every non-empty tree.
    pub const ROOT: NodeId = NodeId(0);

    /// Create a tree holding only a root directory.
    ///
    /// The root name is used as the first component of every reconstructed
    /// path, so callers normally pass the absolute scanned path.
    pub fn new(root_name: impl Into<OsString>) -> Self {
        let root_name = root_name.into();
        Self {
            root_path: PathBuf::from(&root_name),
            nodes: vec![UsageNode::new_directory(root_name, None)],
            scan_duration: Duration::ZERO,
            stats: TreeStats::new(),
            warnings: Vec::new(),
        }
    }

    /// Root node id.
    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    /// Root node, if the tree has one.
    pub fn root_node(&self) -> Option<&UsageNode> {
        self.nodes.first()
    }

    /// Number of nodes in the arena, pruned ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree has no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node.
    pub fn get(&self, id: NodeId) -> Option<&UsageNode> {
        self.nodes.get(id.index())
    }

    /// Look up a node mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut UsageNode> {
        self.nodes.get_mut(id.index())
    }

    /// Iterate over every node id in the arena.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId::new(i as u32))
    }

    /// Visible children of a node, empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Append a file under `parent`.
    pub fn add_file(&mut self, parent: NodeId, name: impl Into<OsString>, size: u64) -> NodeId {
        self.push(parent, UsageNode::new_file(name, size, Some(parent)))
    }

    /// Append an empty directory under `parent`.
    pub fn add_directory(&mut self, parent: NodeId, name: impl Into<OsString>) -> NodeId {
        self.push(parent, UsageNode::new_directory(name, Some(parent)))
    }

    fn push(&mut self, parent: NodeId, node: UsageNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        if let Some(parent) = self.nodes.get_mut(parent.index()) {
            parent.children.push(id);
        }
        id
    }

    /// Walk the parent chain of `id`, nearest ancestor first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Check whether `ancestor` lies on the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Find a visible child by name.
    pub fn find_child(&self, id: NodeId, name: impl AsRef<OsStr>) -> Option<NodeId> {
        let name = name.as_ref();
        self.children(id)
            .iter()
            .copied()
            .find(|&c| self[c].name.as_os_str() == name)
    }

    /// Get the total size of the tree.
    pub fn total_size(&self) -> u64 {
        self.root_node().map(|n| n.size).unwrap_or(0)
    }

    /// Rebuild the full path of a node by joining names up to the root.
    pub fn path_of(&self, id: NodeId) -> PathBuf {
        let mut names: Vec<&OsStr> = Vec::new();
        if let Some(node) = self.get(id) {
            names.push(&node.name);
        }
        names.extend(self.ancestors(id).map(|a| self[a].name.as_os_str()));

        names.into_iter().rev().collect()
    }

    /// Check if there were any warnings while walking.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl Index<NodeId> for UsageTree {
    type Output = UsageNode;

    fn index(&self, id: NodeId) -> &UsageNode {
        &self.nodes[id.index()]
    }
}

/// Iterator over the ancestors of a node.
pub struct Ancestors<'a> {
    tree: &'a UsageTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
