//! Terminal setup and restoration.

use color_eyre::eyre::WrapErr;
use ratatui::DefaultTerminal;

use crate::app::AppResult;

/// Owns the terminal in raw mode on the alternate screen.
///
/// The terminal is restored when the guard drops, whichever way the
/// session ends. Panics are covered by the hook ratatui installs.
pub struct TerminalGuard {
    terminal: DefaultTerminal,
}

impl TerminalGuard {
    /// Enter raw mode and the alternate screen.
    pub fn new() -> AppResult<Self> {
        let terminal = ratatui::try_init().wrap_err("Failed to initialize the terminal")?;
        tracing::debug!("terminal initialized");
        Ok(Self { terminal })
    }

    pub fn terminal(&mut self) -> &mut DefaultTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        ratatui::restore();
        tracing::debug!("terminal restored");
    }
}
