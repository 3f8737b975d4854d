//! Scrolling listing of the current folder.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, StatefulWidget};

use crate::theme::Theme;

use super::{FolderRow, format_size};

/// Folder listing widget.
///
/// Scroll position lives in the [`ListState`], which the renderer keeps
/// between frames so the highlighted row stays in view.
pub struct FolderView<'a> {
    rows: &'a [FolderRow],
    folder_size: u64,
    theme: &'a Theme,
    block: Option<Block<'a>>,
}

impl<'a> FolderView<'a> {
    pub fn new(rows: &'a [FolderRow], folder_size: u64, theme: &'a Theme) -> Self {
        Self {
            rows,
            folder_size,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn item(&self, row: &FolderRow) -> ListItem<'a> {
        let ratio = if self.folder_size == 0 {
            0.0
        } else {
            row.size as f64 / self.folder_size as f64
        };
        let name_style = match (row.marked, row.is_dir) {
            (true, _) => self.theme.marked,
            (false, true) => self.theme.directory,
            (false, false) => self.theme.file,
        };

        ListItem::new(Line::from(vec![
            Span::styled(row.marker().to_string(), self.theme.marked),
            Span::styled(
                format_size(row.size),
                Style::new().fg(self.theme.size_color(ratio)),
            ),
            Span::raw(" "),
            Span::styled(row.name.clone(), name_style),
        ]))
    }
}

impl StatefulWidget for FolderView<'_> {
    type State = ListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut ListState) {
        let items: Vec<ListItem> = self.rows.iter().map(|row| self.item(row)).collect();
        let mut list = List::new(items).highlight_style(self.theme.selected);
        if let Some(block) = self.block {
            list = list.block(block);
        }
        StatefulWidget::render(list, area, buf, state);
    }
}
