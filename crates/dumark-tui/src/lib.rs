//! Interactive disk usage session for dumark.
//!
//! # Overview
//!
//! After the walk, three units share the session:
//!
//! - **Session engine** ([`SessionEngine`]) is the only writer of the
//!   [`NavigationState`]. It applies [`Command`]s in arrival order and
//!   publishes a new state after each one
//! - **Input translator** ([`InputTranslator`]) turns key presses into
//!   commands and keeps the highlighted row
//! - **Renderer** ([`Renderer`]) draws the latest state
//!
//! # Usage
//!
//! ```rust,no_run
//! use dumark_scan::ScanConfig;
//! use dumark_tui::TuiConfig;
//!
//! let config = TuiConfig::new(ScanConfig::new("/var"));
//! for path in dumark_tui::run(config).unwrap() {
//!     println!("{}", path.display());
//! }
//! ```
//!
//! # Keyboard Navigation
//!
//! - `j`/`k` - Move down/up
//! - `Enter`/`l` - Open directory
//! - `Backspace`/`h` - Back to parent
//! - `Space` - Toggle mark
//! - `q` - Quit

pub mod app;
mod event;
mod settings;
mod terminal;
mod theme;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::EventStream;

use dumark_scan::ScanConfig;

pub use app::{
    App, AppResult, Command, InputTranslator, NavigationState, Renderer, SessionEngine,
    scan_with_progress,
};
pub use event::KeyAction;
pub use settings::{DEFAULT_LIMIT_MB, UserSettings};
pub use terminal::TerminalGuard;
pub use theme::{Theme, ThemeVariant};
pub use ui::{format_size, selected_size, status_line};

/// Configuration for an interactive run.
#[derive(Debug, Clone)]
pub struct TuiConfig {
    /// What to walk and how to process it.
    pub scan: ScanConfig,
    pub theme: ThemeVariant,
}

impl TuiConfig {
    pub fn new(scan: ScanConfig) -> Self {
        Self {
            scan,
            theme: ThemeVariant::default(),
        }
    }
}

/// Walk `config.scan.root`, run a session and return the marked paths, sorted.
///
/// The terminal is restored before this returns, so the caller can print
/// the paths safely.
pub fn run(config: TuiConfig) -> AppResult<Vec<PathBuf>> {
    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(scan_and_navigate(config));

    // Shutdown runtime immediately to cancel background tasks
    rt.shutdown_timeout(Duration::from_millis(100));

    result
}

async fn scan_and_navigate(config: TuiConfig) -> AppResult<Vec<PathBuf>> {
    let tree = scan_with_progress(config.scan).await?;
    tracing::info!(
        root = %tree.root_path.display(),
        total = tree.total_size(),
        dirs = tree.stats.total_dirs,
        files = tree.stats.total_files,
        "scan complete"
    );

    let mut guard = TerminalGuard::new()?;
    let last = App::new(tree)
        .with_theme(Theme::from_variant(config.theme))
        .run(guard.terminal(), EventStream::new())
        .await;
    drop(guard);

    Ok(last?.marked_paths())
}
