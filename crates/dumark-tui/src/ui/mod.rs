//! UI components and text reports.

mod listing;
mod report;

pub use listing::FolderView;
pub use report::{FolderRow, folder_rows, selected_size, status_line};

use ratatui::layout::{Constraint, Layout, Rect};
use unicode_width::UnicodeWidthChar;

/// Layout areas for the application.
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub footer: Rect,
}

impl AppLayout {
    /// Compute layout from terminal area.
    pub fn new(area: Rect) -> Self {
        let [header, main, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);

        Self { header, main, footer }
    }
}

const KILOBYTE: u64 = 1 << 10;
const MEGABYTE: u64 = 1 << 20;
const GIGABYTE: u64 = 1 << 30;
const TERABYTE: u64 = 1 << 40;
const PETABYTE: u64 = 1 << 50;

/// Format a byte size as a rounded amount of the largest fitting unit.
///
/// The amount is right-aligned in four columns and followed by one of
/// `P`, `T`, `G`, `M`, `K` or `B`, so every result is five columns wide
/// below 10000P.
pub fn format_size(bytes: u64) -> String {
    let (unit, divisor) = match bytes {
        b if b >= PETABYTE => ("P", PETABYTE),
        b if b >= TERABYTE => ("T", TERABYTE),
        b if b >= GIGABYTE => ("G", GIGABYTE),
        b if b >= MEGABYTE => ("M", MEGABYTE),
        b if b >= KILOBYTE => ("K", KILOBYTE),
        _ => ("B", 1),
    };
    let amount = bytes as f64 / divisor as f64;
    format!("{amount:>4.0}{unit}")
}

/// Keep the end of `text` so that it fits in `width` columns.
///
/// Cut text is prefixed with `…`.
pub fn truncate_start(text: &str, width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut kept = Vec::new();
    let mut used = 1;
    for c in text.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        kept.push(c);
    }
    std::iter::once('…').chain(kept.into_iter().rev()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(0), "   0B");
        assert_eq!(format_size(1023), "1023B");
        assert_eq!(format_size(1024), "   1K");
        assert_eq!(format_size(1_572_864), "   2M");
        assert_eq!(format_size(1_099_511_627_776), "   1T");
        assert_eq!(format_size(5 * PETABYTE), "   5P");
        assert_eq!(format_size(20_000_000), "  19M");
    }

    #[test]
    fn test_truncate_start() {
        assert_eq!(truncate_start("/var/log", 20), "/var/log");
        assert_eq!(truncate_start("/var/log/nginx", 6), "…nginx");
        assert_eq!(truncate_start("/var", 0), "");
    }

    #[test]
    fn test_truncate_start_wide_chars() {
        // each ideograph takes two columns
        assert_eq!(truncate_start("/home/日本語", 5), "…本語");
    }

    #[test]
    fn test_layout_rows() {
        let layout = AppLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.footer.y, 23);
        assert_eq!(layout.main.height, 22);
    }
}
