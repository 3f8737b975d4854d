//! Navigation state published by the session engine.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use dumark_core::{NodeId, UsageNode, UsageTree};

/// One snapshot of the navigation session.
///
/// Cloning is cheap: the tree and the mark set are shared. The mark set is
/// copied on write, so a snapshot handed to a reader never changes.
#[derive(Debug, Clone)]
pub struct NavigationState {
    tree: Arc<UsageTree>,
    current_folder: NodeId,
    marked: Arc<HashSet<NodeId>>,
    quit: bool,
}

impl NavigationState {
    /// Start at the root with nothing marked.
    pub fn new(tree: Arc<UsageTree>) -> Self {
        Self {
            current_folder: tree.root(),
            tree,
            marked: Arc::new(HashSet::new()),
            quit: false,
        }
    }

    /// The processed tree being navigated.
    pub fn tree(&self) -> &UsageTree {
        &self.tree
    }

    /// Id of the folder being viewed.
    pub fn current_folder(&self) -> NodeId {
        self.current_folder
    }

    /// The folder being viewed.
    pub fn folder(&self) -> Option<&UsageNode> {
        self.tree.get(self.current_folder)
    }

    /// Full path of the folder being viewed.
    pub fn folder_path(&self) -> PathBuf {
        self.tree.path_of(self.current_folder)
    }

    /// Visible children of the current folder, in display order.
    pub fn children(&self) -> &[NodeId] {
        self.tree.children(self.current_folder)
    }

    /// Child of the current folder at a listing row.
    pub fn child(&self, index: usize) -> Option<NodeId> {
        self.children().get(index).copied()
    }

    /// Size of the whole tree, reached by climbing from the current folder.
    pub fn root_size(&self) -> u64 {
        let root = self
            .tree
            .ancestors(self.current_folder)
            .last()
            .unwrap_or(self.current_folder);
        self.tree.get(root).map(|n| n.size).unwrap_or(0)
    }

    /// Nodes marked for removal.
    pub fn marked(&self) -> &HashSet<NodeId> {
        &self.marked
    }

    pub fn is_marked(&self, id: NodeId) -> bool {
        self.marked.contains(&id)
    }

    /// Whether this is the last state of the session.
    pub fn is_quit(&self) -> bool {
        self.quit
    }

    /// Full paths of every marked node, sorted.
    pub fn marked_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.marked.iter().map(|&id| self.tree.path_of(id)).collect();
        paths.sort();
        paths
    }

    pub(crate) fn set_current_folder(&mut self, id: NodeId) {
        self.current_folder = id;
    }

    /// Add `id` to the marks, or remove it if already marked.
    pub(crate) fn toggle_mark(&mut self, id: NodeId) {
        let marked = Arc::make_mut(&mut self.marked);
        if !marked.remove(&id) {
            marked.insert(id);
        }
    }

    pub(crate) fn set_quit(&mut self) {
        self.quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Arc<UsageTree>, NodeId, NodeId) {
        let mut tree = UsageTree::new("/data");
        let root = tree.root();
        let logs = tree.add_directory(root, "logs");
        let old = tree.add_file(logs, "old.log", 40);
        tree.get_mut(logs).unwrap().size = 40;
        tree.get_mut(root).unwrap().size = 40;
        (Arc::new(tree), logs, old)
    }

    #[test]
    fn test_initial_state() {
        let (tree, logs, _) = sample();
        let state = NavigationState::new(tree);

        assert_eq!(state.current_folder(), UsageTree::ROOT);
        assert_eq!(state.children(), &[logs]);
        assert!(state.marked().is_empty());
        assert!(!state.is_quit());
        assert_eq!(state.root_size(), 40);
    }

    #[test]
    fn test_toggle_mark_copies_on_write() {
        let (tree, logs, _) = sample();
        let before = NavigationState::new(tree);
        let mut after = before.clone();
        after.toggle_mark(logs);

        assert!(after.is_marked(logs));
        assert!(!before.is_marked(logs));

        after.toggle_mark(logs);
        assert!(after.marked().is_empty());
    }

    #[test]
    fn test_root_size_from_nested_folder() {
        let (tree, logs, _) = sample();
        let mut state = NavigationState::new(tree);
        state.set_current_folder(logs);

        assert_eq!(state.root_size(), 40);
        assert_eq!(state.folder_path(), PathBuf::from("/data/logs"));
    }

    #[test]
    fn test_marked_paths_sorted() {
        let (tree, logs, old) = sample();
        let mut state = NavigationState::new(tree);
        state.toggle_mark(old);
        state.toggle_mark(logs);

        assert_eq!(
            state.marked_paths(),
            vec![PathBuf::from("/data/logs"), PathBuf::from("/data/logs/old.log")]
        );
    }
}
