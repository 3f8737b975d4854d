//! Commands accepted by the session engine.

use dumark_core::NodeId;

use super::state::NavigationState;

/// A navigation command.
///
/// Commands that cannot apply (entering a file, an out-of-range row,
/// ascending past the root) leave the state as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Open the directory at this row of the current listing.
    EnterChild(usize),
    /// Return to the parent folder.
    GoToParent,
    /// Mark a node, or unmark it if it is marked.
    ToggleMark(NodeId),
    /// End the session.
    Quit,
}

impl Command {
    /// Compute the state that follows `state`.
    pub fn apply(self, state: &NavigationState) -> NavigationState {
        let mut next = state.clone();
        match self {
            Command::EnterChild(index) => {
                let is_dir = |id: NodeId| state.tree().get(id).is_some_and(|n| n.is_dir());
                if let Some(child) = state.child(index).filter(|&c| is_dir(c)) {
                    next.set_current_folder(child);
                }
            }
            Command::GoToParent => {
                if let Some(parent) = state.tree().parent(state.current_folder()) {
                    next.set_current_folder(parent);
                }
            }
            Command::ToggleMark(node) => {
                if state.tree().get(node).is_some() {
                    next.toggle_mark(node);
                }
            }
            Command::Quit => next.set_quit(),
        }
        next
    }

    pub fn is_quit(&self) -> bool {
        matches!(self, Command::Quit)
    }
}
