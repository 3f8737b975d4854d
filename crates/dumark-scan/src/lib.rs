//! Directory walking and size processing for dumark.
//!
//! # Overview
//!
//! `dumark-scan` builds the usage tree in two steps:
//!
//! - **Walking** ([`Walker`]) lists every directory through a [`DirReader`],
//!   in parallel on rayon, skipping ignored names and recording unreadable
//!   directories as empty
//! - **Processing** ([`process`]) aggregates sizes bottom-up, hides entries
//!   below the size limit and sorts each listing for display
//!
//! # Example
//!
//! ```rust,no_run
//! use dumark_scan::{FsReader, ScanConfig, Walker, prepare_root, process};
//!
//! let config = ScanConfig::new("/var/log");
//! let root = prepare_root(&config.root).unwrap();
//! let walker = Walker::with_config(FsReader::with_hardlink_dedup(), &config);
//! let mut progress_rx = walker.subscribe();
//!
//! let mut tree = walker.walk(&root);
//! process(&mut tree, config.min_size).unwrap();
//! println!("Total size: {} bytes", tree.total_size());
//! # let _ = progress_rx.try_recv();
//! ```

mod inode;
mod processor;
mod progress;
mod reader;
mod walker;

pub use inode::{InodeKey, InodeTracker};
pub use processor::process;
pub use progress::ScanProgress;
pub use reader::{DirReader, EntryInfo, FsReader};
pub use walker::{Walker, prepare_root};

// Re-export core types for convenience
pub use dumark_core::{
    MEGABYTE, NodeId, NodeKind, ProcessError, ReadError, ScanConfig, ScanError, ScanWarning, TreeStats,
    UsageNode, UsageTree, WarningKind,
};

/// Walk and process the local directory described by `config`.
///
/// Convenience for callers that do not watch progress.
pub fn scan(config: &ScanConfig) -> Result<UsageTree, ScanError> {
    let root = prepare_root(&config.root)?;
    let mut tree = Walker::with_config(FsReader::for_config(config), config).walk(&root);
    process(&mut tree, config.min_size)?;
    Ok(tree)
}
