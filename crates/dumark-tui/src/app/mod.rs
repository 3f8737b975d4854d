//! Interactive session: engine, input translator and renderer.

mod command;
mod constants;
pub mod input;
mod navigation;
pub mod render;
mod scanning;
pub mod session;
pub mod state;

use std::sync::Arc;

use color_eyre::eyre::{WrapErr, eyre};
use crossterm::event::Event;
use futures::Stream;
use ratatui::Terminal;
use ratatui::backend::Backend;
use tokio::sync::{mpsc, oneshot};

use dumark_core::UsageTree;

use crate::theme::Theme;

pub use self::command::Command;
pub use self::input::InputTranslator;
pub use self::navigation::Cursor;
pub use self::render::Renderer;
pub use self::scanning::{scan_with_progress, show_progress};
pub use self::session::SessionEngine;
pub use self::state::NavigationState;

use self::constants::COMMAND_CHANNEL_SIZE;

/// Application result type.
pub type AppResult<T> = color_eyre::Result<T>;

/// Runs one navigation session over a processed tree.
pub struct App {
    tree: Arc<UsageTree>,
    theme: Theme,
}

impl App {
    pub fn new(tree: UsageTree) -> Self {
        Self {
            tree: Arc::new(tree),
            theme: Theme::default(),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Run the session until the user quits and return its final state.
    ///
    /// The engine runs on its own task; input and drawing share the
    /// calling task. All three have stopped when this returns.
    pub async fn run<B, S>(self, terminal: &mut Terminal<B>, events: S) -> AppResult<NavigationState>
    where
        B: Backend,
        B::Error: Send + Sync + 'static,
        S: Stream<Item = std::io::Result<Event>> + Unpin,
    {
        let engine = SessionEngine::new(self.tree);
        let shutdown = engine.shutdown_token();
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let (result_tx, result_rx) = oneshot::channel();

        let translator = InputTranslator::new(commands_tx, engine.subscribe(), shutdown.clone());
        let renderer = Renderer::new(engine.subscribe(), translator.subscribe_cursor(), self.theme);
        let session = tokio::spawn(engine.run(commands_rx, result_tx));

        let drawing = async {
            let result = renderer.run(terminal).await;
            if result.is_err() {
                // stop reading input so the session can end
                shutdown.cancel();
            }
            result
        };
        let (input, drawing) = tokio::join!(translator.run(events), drawing);

        session.await.wrap_err("Session engine failed")?;
        input?;
        drawing?;

        result_rx
            .await
            .map_err(|_| eyre!("Session ended without a final state"))
    }
}
