//! Background walk with a progress line on stderr.

use std::io::Write;
use std::time::{Duration, Instant};

use color_eyre::eyre::WrapErr;
use tokio::sync::broadcast;

use dumark_scan::{FsReader, ScanConfig, ScanProgress, UsageTree, Walker, prepare_root, process};

use super::AppResult;
use super::constants::PROGRESS_INTERVAL_MS;

/// Walk and process `config.root` before the session starts.
///
/// The walk runs on a blocking thread while a task reports the number of
/// folders visited on stderr.
pub async fn scan_with_progress(config: ScanConfig) -> AppResult<UsageTree> {
    let root = prepare_root(&config.root)?;
    let walker = Walker::with_config(FsReader::for_config(&config), &config);
    let progress_rx = walker.subscribe();

    let display = tokio::spawn(show_progress(progress_rx, std::io::stderr()));

    // rayon blocks the calling thread
    let mut tree = tokio::task::spawn_blocking(move || walker.walk(&root))
        .await
        .wrap_err("Directory walk did not complete")?;

    if let Err(err) = display.await {
        tracing::debug!(%err, "progress display stopped early");
    }

    if tree.has_warnings() {
        tracing::warn!(count = tree.warnings.len(), "some directories could not be read");
    }

    process(&mut tree, config.min_size)?;
    Ok(tree)
}

/// Print `Walked through N folders` until the walker closes the channel.
///
/// Redraws at most once per interval and always shows the highest count
/// received. The final count is printed on a line of its own.
pub async fn show_progress<W: Write>(
    mut progress_rx: broadcast::Receiver<ScanProgress>,
    mut out: W,
) -> W {
    let interval = Duration::from_millis(PROGRESS_INTERVAL_MS);
    let mut shown = ScanProgress::new();
    let mut last_draw: Option<Instant> = None;

    loop {
        match progress_rx.recv().await {
            Ok(progress) => {
                shown.merge(progress);
                if last_draw.is_none_or(|t| t.elapsed() >= interval) {
                    let _ = write!(out, "\rWalked through {} folders", shown.dirs_scanned);
                    let _ = out.flush();
                    last_draw = Some(Instant::now());
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::trace!(skipped, "progress display lagging");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }

    let _ = writeln!(out, "\rWalked through {} folders", shown.dirs_scanned);
    let _ = out.flush();
    out
}
