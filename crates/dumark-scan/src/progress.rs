//! Walk progress reporting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Progress information during a walk.
///
/// Counts are absolute, so a consumer that misses updates only shows a
/// stale number until the next one arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanProgress {
    /// Number of directories visited so far.
    pub dirs_scanned: u64,
    /// Number of files listed so far.
    pub files_scanned: u64,
    /// Time elapsed since the walk started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the larger counts of two snapshots.
    ///
    /// Parallel workers may deliver snapshots out of order.
    pub fn merge(&mut self, other: ScanProgress) {
        self.dirs_scanned = self.dirs_scanned.max(other.dirs_scanned);
        self.files_scanned = self.files_scanned.max(other.files_scanned);
        self.elapsed = self.elapsed.max(other.elapsed);
    }
}

/// Shared counters updated by walker threads.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    dirs_scanned: AtomicU64,
    files_scanned: AtomicU64,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            dirs_scanned: AtomicU64::new(0),
            files_scanned: AtomicU64::new(0),
        }
    }

    /// Record a visited directory and the files it listed.
    pub fn record_dir(&self, files: u64) -> ScanProgress {
        let dirs_scanned = self.dirs_scanned.fetch_add(1, Ordering::Relaxed) + 1;
        let files_scanned = self.files_scanned.fetch_add(files, Ordering::Relaxed) + files;
        ScanProgress {
            dirs_scanned,
            files_scanned,
            elapsed: self.start_time.elapsed(),
        }
    }

    pub fn snapshot(&self) -> ScanProgress {
        ScanProgress {
            dirs_scanned: self.dirs_scanned.load(Ordering::Relaxed),
            files_scanned: self.files_scanned.load(Ordering::Relaxed),
            elapsed: self.start_time.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_counts_are_absolute() {
        let tracker = ProgressTracker::new();
        let first = tracker.record_dir(3);
        let second = tracker.record_dir(0);

        assert_eq!(first.dirs_scanned, 1);
        assert_eq!(first.files_scanned, 3);
        assert_eq!(second.dirs_scanned, 2);
        assert_eq!(second.files_scanned, 3);
        assert_eq!(tracker.snapshot().dirs_scanned, 2);
    }

    #[test]
    fn test_merge_keeps_maximum() {
        let mut shown = ScanProgress {
            dirs_scanned: 10,
            files_scanned: 40,
            elapsed: Duration::from_millis(5),
        };
        shown.merge(ScanProgress {
            dirs_scanned: 9,
            files_scanned: 41,
            elapsed: Duration::from_millis(4),
        });

        assert_eq!(shown.dirs_scanned, 10);
        assert_eq!(shown.files_scanned, 41);
        assert_eq!(shown.elapsed, Duration::from_millis(5));
    }
}
