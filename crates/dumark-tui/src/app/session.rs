//! The session engine, sole writer of navigation state.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

use dumark_core::UsageTree;

use super::command::Command;
use super::state::NavigationState;

/// Applies commands one at a time and publishes every resulting state.
///
/// Readers get states through [`SessionEngine::subscribe`]. When the
/// session ends the final state goes to the result channel, the shutdown
/// token is cancelled and the state channel is closed.
pub struct SessionEngine {
    state: NavigationState,
    states_tx: watch::Sender<NavigationState>,
    shutdown: CancellationToken,
}

impl SessionEngine {
    /// Create an engine positioned at the root of `tree`.
    pub fn new(tree: Arc<UsageTree>) -> Self {
        let state = NavigationState::new(tree);
        let (states_tx, _) = watch::channel(state.clone());
        Self {
            state,
            states_tx,
            shutdown: CancellationToken::new(),
        }
    }

    /// Subscribe to published states. The receiver starts at the initial state.
    pub fn subscribe(&self) -> watch::Receiver<NavigationState> {
        self.states_tx.subscribe()
    }

    /// Token cancelled once the session is over.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Consume commands until `Quit`, or until every command sender is gone.
    pub async fn run(
        self,
        mut commands: mpsc::Receiver<Command>,
        result: oneshot::Sender<NavigationState>,
    ) {
        let Self {
            mut state,
            states_tx,
            shutdown,
        } = self;
        tracing::info!(nodes = state.tree().len(), "session started");

        loop {
            let command = match commands.recv().await {
                Some(command) => command,
                None => {
                    tracing::debug!("command channel closed, ending session");
                    Command::Quit
                }
            };

            tracing::trace!(?command, "applying command");
            state = command.apply(&state);
            states_tx.send_replace(state.clone());

            if state.is_quit() {
                break;
            }
        }

        tracing::info!(marked = state.marked().len(), "session finished");
        if result.send(state).is_err() {
            tracing::debug!("final state receiver dropped");
        }
        shutdown.cancel();
        // states_tx drops here, closing the channel for readers
    }
}
