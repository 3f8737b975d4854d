//! Input translator: terminal events in, session commands out.

use crossterm::event::{Event, KeyEventKind};
use futures::{Stream, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use color_eyre::eyre::WrapErr;

use crate::event::KeyAction;

use super::AppResult;
use super::command::Command;
use super::navigation::Cursor;
use super::state::NavigationState;

/// Turns key presses into commands and owns the listing cursor.
///
/// After sending a command the translator waits for the state it
/// produced, so the next key is always resolved against the listing the
/// user is looking at.
pub struct InputTranslator {
    commands: mpsc::Sender<Command>,
    states: watch::Receiver<NavigationState>,
    cursor_tx: watch::Sender<usize>,
    cursor: Cursor,
    shutdown: CancellationToken,
}

impl InputTranslator {
    pub fn new(
        commands: mpsc::Sender<Command>,
        states: watch::Receiver<NavigationState>,
        shutdown: CancellationToken,
    ) -> Self {
        let count = states.borrow().children().len();
        let (cursor_tx, _) = watch::channel(0);
        Self {
            commands,
            states,
            cursor_tx,
            cursor: Cursor::new(count),
            shutdown,
        }
    }

    /// Follow the highlighted row.
    pub fn subscribe_cursor(&self) -> watch::Receiver<usize> {
        self.cursor_tx.subscribe()
    }

    /// Read events until quit, end of input or session shutdown.
    ///
    /// Returning drops the command sender, which ends the session if it
    /// is still running.
    pub async fn run<S>(mut self, mut events: S) -> AppResult<()>
    where
        S: Stream<Item = std::io::Result<Event>> + Unpin,
    {
        loop {
            let event = tokio::select! {
                biased;
                () = self.shutdown.cancelled() => break,
                event = events.next() => event,
            };
            let Some(event) = event else {
                tracing::debug!("input stream ended");
                break;
            };

            match event.wrap_err("Failed to read terminal input")? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if !self.handle_action(KeyAction::from_key_event(key)).await {
                        break;
                    }
                }
                // redraw at the new size
                Event::Resize(..) => self.cursor_tx.send_modify(|_| {}),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handle one action. Returns false once the session is over.
    async fn handle_action(&mut self, action: KeyAction) -> bool {
        let state = self.states.borrow_and_update().clone();
        self.cursor.set_count(state.children().len());

        match action {
            KeyAction::MoveUp => self.cursor.move_up(1),
            KeyAction::MoveDown => self.cursor.move_down(1),
            KeyAction::PageUp => self.cursor.page_up(),
            KeyAction::PageDown => self.cursor.page_down(),
            KeyAction::JumpToTop => self.cursor.jump_to_top(),
            KeyAction::JumpToBottom => self.cursor.jump_to_bottom(),
            KeyAction::DrillDown => {
                let Some(next) = self.submit(Command::EnterChild(self.cursor.selected())).await
                else {
                    return false;
                };
                if next.current_folder() != state.current_folder() {
                    self.cursor = Cursor::new(next.children().len());
                }
            }
            KeyAction::NavigateBack => {
                let left = state.current_folder();
                let Some(next) = self.submit(Command::GoToParent).await else {
                    return false;
                };
                if next.current_folder() != left {
                    self.cursor = Cursor::new(next.children().len());
                    if let Some(row) = next.children().iter().position(|&c| c == left) {
                        self.cursor.set_selected(row);
                    }
                }
            }
            KeyAction::ToggleMark => {
                if let Some(node) = state.child(self.cursor.selected()) {
                    if self.submit(Command::ToggleMark(node)).await.is_none() {
                        return false;
                    }
                }
            }
            KeyAction::Quit => {
                if self.commands.send(Command::Quit).await.is_err() {
                    tracing::debug!("session already finished");
                }
                return false;
            }
            KeyAction::None => {}
        }

        let selected = self.cursor.selected();
        self.cursor_tx.send_if_modified(|cursor| {
            let changed = *cursor != selected;
            *cursor = selected;
            changed
        });
        true
    }

    /// Send a command and wait for the state it produces.
    async fn submit(&mut self, command: Command) -> Option<NavigationState> {
        let _ = self.states.borrow_and_update();
        self.commands.send(command).await.ok()?;

        tokio::select! {
            biased;
            () = self.shutdown.cancelled() => None,
            changed = self.states.changed() => {
                changed.ok()?;
                Some(self.states.borrow_and_update().clone())
            }
        }
    }
}
