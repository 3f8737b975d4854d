//! View-local cursor over the rows of a folder listing.

use super::constants::PAGE_SIZE;

/// Highlighted row of the current listing.
///
/// The cursor is never part of the published navigation state. It is
/// always clamped to the current row count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    selected: usize,
    count: usize,
}

impl Cursor {
    /// Cursor on the first of `count` rows.
    pub fn new(count: usize) -> Self {
        Self { selected: 0, count }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Update the row count, clamping the selection.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        self.selected = self.selected.min(self.max_index());
    }

    pub fn set_selected(&mut self, index: usize) {
        self.selected = index.min(self.max_index());
    }

    /// Last valid row, or 0 for an empty listing.
    pub fn max_index(&self) -> usize {
        self.count.saturating_sub(1)
    }

    pub fn move_up(&mut self, count: usize) {
        self.set_selected(self.selected.saturating_sub(count));
    }

    pub fn move_down(&mut self, count: usize) {
        self.set_selected(self.selected.saturating_add(count));
    }

    pub fn page_up(&mut self) {
        self.move_up(PAGE_SIZE);
    }

    pub fn page_down(&mut self) {
        self.move_down(PAGE_SIZE);
    }

    pub fn jump_to_top(&mut self) {
        self.selected = 0;
    }

    pub fn jump_to_bottom(&mut self) {
        self.selected = self.max_index();
    }
}
