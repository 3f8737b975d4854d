//! Renderer: draws every published navigation state.

use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, ListState, Paragraph};
use ratatui::{Frame, Terminal};
use tokio::sync::watch;

use crate::event::footer_hints;
use crate::theme::Theme;
use crate::ui::{AppLayout, FolderView, folder_rows, status_line, truncate_start};

use super::AppResult;
use super::state::NavigationState;

/// Redraws the screen whenever the state or the cursor changes.
///
/// Intermediate states may be skipped when drawing falls behind; the
/// latest one is always drawn. Stops without drawing once the session
/// has quit or the state channel is closed.
pub struct Renderer {
    states: watch::Receiver<NavigationState>,
    cursor: watch::Receiver<usize>,
    theme: Theme,
    list_state: ListState,
}

impl Renderer {
    pub fn new(
        states: watch::Receiver<NavigationState>,
        cursor: watch::Receiver<usize>,
        theme: Theme,
    ) -> Self {
        Self {
            states,
            cursor,
            theme,
            list_state: ListState::default(),
        }
    }

    /// Draw until the session ends.
    pub async fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> AppResult<()>
    where
        B::Error: Send + Sync + 'static,
    {
        let mut cursor_open = true;
        let mut frames = 0u64;

        loop {
            let state = self.states.borrow_and_update().clone();
            if state.is_quit() {
                break;
            }
            let cursor = *self.cursor.borrow_and_update();
            terminal.draw(|frame| self.draw(frame, &state, cursor))?;
            frames += 1;

            tokio::select! {
                changed = self.states.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = self.cursor.changed(), if cursor_open => {
                    if changed.is_err() {
                        cursor_open = false;
                    }
                }
            }
        }

        tracing::debug!(frames, "renderer stopped");
        Ok(())
    }

    /// Draw one frame.
    pub fn draw(&mut self, frame: &mut Frame, state: &NavigationState, cursor: usize) {
        let area = frame.area();
        frame.buffer_mut().set_style(
            area,
            Style::default().bg(self.theme.background).fg(self.theme.foreground),
        );
        let layout = AppLayout::new(area);

        frame.render_widget(
            Paragraph::new(status_line(state)).style(self.theme.header),
            layout.header,
        );

        let rows = folder_rows(state);
        let selected = (!rows.is_empty()).then(|| cursor.min(rows.len() - 1));
        self.list_state.select(selected);

        let folder_size = state.folder().map(|f| f.size).unwrap_or(0);
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(self.theme.border)
            .title(Span::styled(
                format!(" {} entries ", rows.len()),
                self.theme.title,
            ));
        frame.render_stateful_widget(
            FolderView::new(&rows, folder_size, &self.theme).block(block),
            layout.main,
            &mut self.list_state,
        );

        self.draw_footer(frame, state, layout.footer);
    }

    fn draw_footer(&self, frame: &mut Frame, state: &NavigationState, area: Rect) {
        let mut hints = Vec::new();
        for hint in footer_hints() {
            hints.push(Span::styled(format!(" {}", hint.keys), self.theme.help_key));
            hints.push(Span::styled(format!(" {}", hint.description), self.theme.help_desc));
        }
        let hints_width = hints.iter().map(Span::width).sum::<usize>();

        let path_width = (area.width as usize).saturating_sub(hints_width + 1);
        let path = truncate_start(&state.folder_path().to_string_lossy(), path_width);

        let mut spans = vec![Span::raw(path), Span::raw(" ")];
        if hints_width < area.width as usize {
            spans.extend(hints);
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).style(self.theme.footer), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ratatui::backend::TestBackend;

    use dumark_core::UsageTree;

    use crate::app::Command;

    fn state() -> NavigationState {
        let mut tree = UsageTree::new("/srv");
        let root = tree.root();
        let cache = tree.add_directory(root, "cache");
        tree.add_file(cache, "blob", 3 << 20);
        tree.add_file(root, "db.sqlite", 1 << 20);
        tree.get_mut(cache).unwrap().size = 3 << 20;
        tree.get_mut(root).unwrap().size = 4 << 20;
        NavigationState::new(Arc::new(tree))
    }

    fn screen(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buf = terminal.backend().buffer();
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    fn renderer() -> (Renderer, watch::Sender<NavigationState>, watch::Sender<usize>) {
        let (states_tx, states_rx) = watch::channel(state());
        let (cursor_tx, cursor_rx) = watch::channel(0);
        (Renderer::new(states_rx, cursor_rx, Theme::default()), states_tx, cursor_tx)
    }

    #[test]
    fn test_draw_layout() {
        let (mut renderer, _, _) = renderer();
        let mut terminal = Terminal::new(TestBackend::new(80, 8)).unwrap();
        let s = state();
        terminal.draw(|frame| renderer.draw(frame, &s, 1)).unwrap();

        let lines = screen(&terminal);
        assert!(lines[0].starts_with("Total size:    4M, Total selected size:    0B"));
        assert!(lines[2].starts_with("    3M cache/"));
        assert!(lines[3].starts_with("    1M db.sqlite"));
        assert!(lines[7].starts_with("/srv "));
        assert!(lines[7].contains("quit"));
        assert_eq!(renderer.list_state.selected(), Some(1));
    }

    #[test]
    fn test_cursor_clamped_to_listing() {
        let (mut renderer, _, _) = renderer();
        let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();
        let s = state();
        terminal.draw(|frame| renderer.draw(frame, &s, 40)).unwrap();
        assert_eq!(renderer.list_state.selected(), Some(1));

        let inside = Command::EnterChild(0).apply(&s);
        terminal.draw(|frame| renderer.draw(frame, &inside, 40)).unwrap();
        assert_eq!(renderer.list_state.selected(), Some(0));

        let lines = screen(&terminal);
        assert!(lines[2].starts_with("    3M blob"));
        assert!(lines[7].starts_with("/srv/cache "));
    }

    #[tokio::test]
    async fn test_run_stops_on_quit_state() {
        let (renderer, states_tx, _cursor_tx) = renderer();
        let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();
        states_tx.send_replace(Command::Quit.apply(&state()));

        renderer.run(&mut terminal).await.unwrap();

        // nothing drawn for the quit state
        assert!(screen(&terminal).iter().all(|l| l.trim().is_empty()));
    }

    #[tokio::test]
    async fn test_run_stops_on_closed_channel() {
        let (renderer, states_tx, cursor_tx) = renderer();
        let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();
        drop(cursor_tx);

        let handle = async {
            tokio::task::yield_now().await;
            drop(states_tx);
        };
        let (result, ()) = tokio::join!(renderer.run(&mut terminal), handle);
        result.unwrap();

        assert!(screen(&terminal)[0].starts_with("Total size:"));
    }
}
