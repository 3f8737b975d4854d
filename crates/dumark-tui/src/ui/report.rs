//! Text reports derived from a navigation state.

use dumark_core::NodeId;

use crate::app::NavigationState;

use super::format_size;

/// Status line with the tree total and the size selected for removal.
pub fn status_line(state: &NavigationState) -> String {
    format!(
        "Total size: {}, Total selected size: {}",
        format_size(state.root_size()),
        format_size(selected_size(state))
    )
}

/// Sum of the marked sizes, skipping nodes below another marked node.
///
/// A marked directory already accounts for everything under it.
pub fn selected_size(state: &NavigationState) -> u64 {
    let tree = state.tree();
    state
        .marked()
        .iter()
        .filter(|&&id| !tree.ancestors(id).any(|a| state.is_marked(a)))
        .filter_map(|&id| tree.get(id))
        .map(|node| node.size)
        .sum()
}

/// One row of a folder listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRow {
    pub node: NodeId,
    pub marked: bool,
    pub size: u64,
    /// Entry name, with a trailing `/` for directories.
    pub name: String,
    pub is_dir: bool,
}

impl FolderRow {
    /// Marker, formatted size and name as one line of text.
    pub fn text(&self) -> String {
        format!("{}{} {}", self.marker(), format_size(self.size), self.name)
    }

    pub fn marker(&self) -> char {
        if self.marked { '*' } else { ' ' }
    }
}

/// Rows for every visible child of the current folder.
pub fn folder_rows(state: &NavigationState) -> Vec<FolderRow> {
    let tree = state.tree();
    state
        .children()
        .iter()
        .filter_map(|&id| {
            let node = tree.get(id)?;
            let mut name = node.display_name().into_owned();
            if node.is_dir() {
                name.push(std::path::MAIN_SEPARATOR);
            }
            Some(FolderRow {
                node: id,
                marked: state.is_marked(id),
                size: node.size,
                name,
                is_dir: node.is_dir(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use dumark_core::UsageTree;

    use crate::app::Command;

    /// root 100 = D 40 (F 10, G 30) + H 60
    fn state() -> (NavigationState, NodeId, NodeId, NodeId) {
        let mut tree = UsageTree::new("/r");
        let root = tree.root();
        let d = tree.add_directory(root, "D");
        let f = tree.add_file(d, "F", 10);
        tree.add_file(d, "G", 30);
        let h = tree.add_file(root, "H", 60);
        tree.get_mut(d).unwrap().size = 40;
        tree.get_mut(root).unwrap().size = 100;
        (NavigationState::new(Arc::new(tree)), d, f, h)
    }

    #[test]
    fn test_nested_marks_counted_once() {
        let (s, d, f, _) = state();
        let s = Command::ToggleMark(d).apply(&s);
        let s = Command::ToggleMark(f).apply(&s);

        assert_eq!(selected_size(&s), 40);
    }

    #[test]
    fn test_unrelated_marks_add_up() {
        let (s, _, f, h) = state();
        let s = Command::ToggleMark(f).apply(&s);
        let s = Command::ToggleMark(h).apply(&s);

        assert_eq!(selected_size(&s), 70);
    }

    #[test]
    fn test_status_line() {
        let (s, d, _, _) = state();
        assert_eq!(status_line(&s), "Total size:  100B, Total selected size:    0B");

        let s = Command::ToggleMark(d).apply(&s);
        assert_eq!(status_line(&s), "Total size:  100B, Total selected size:   40B");
    }

    #[test]
    fn test_folder_rows() {
        let (s, d, _, h) = state();
        let s = Command::ToggleMark(h).apply(&s);
        let rows = folder_rows(&s);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].node, d);
        assert!(rows[0].is_dir);
        assert_eq!(rows[0].text(), format!("   40B D{}", std::path::MAIN_SEPARATOR));
        assert_eq!(rows[1].text(), "*  60B H");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_is_lossy_on_screen_only() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let mut tree = UsageTree::new("/r");
        let bad = tree.add_file(tree.root(), OsStr::from_bytes(b"bad\xffname"), 5);
        let s = NavigationState::new(Arc::new(tree));
        let s = Command::ToggleMark(bad).apply(&s);

        assert_eq!(folder_rows(&s)[0].text(), "*   5B bad\u{FFFD}name");
        assert_eq!(
            s.marked_paths()[0].as_os_str().as_bytes(),
            b"/r/bad\xffname"
        );
    }
}
