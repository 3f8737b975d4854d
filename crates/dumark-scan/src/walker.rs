//! Level-by-level directory walker building the raw usage tree.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use tokio::sync::broadcast;

use dumark_core::{NodeId, ReadError, ScanConfig, ScanError, ScanWarning, UsageTree};

use crate::progress::{ProgressTracker, ScanProgress};
use crate::reader::{DirReader, EntryInfo};

/// Capacity of the progress channel. Slow subscribers lag instead of
/// blocking the walk.
const PROGRESS_CHANNEL_SIZE: usize = 100;

/// Walks a directory tree through a [`DirReader`].
///
/// Directories of the same depth are listed in parallel on rayon. The walker is
/// consumed by [`Walker::walk`]; dropping it closes the progress channel,
/// which is how subscribers learn that the walk is over.
pub struct Walker<R> {
    reader: R,
    ignore_names: HashSet<String>,
    threads: usize,
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl<R: DirReader> Walker<R> {
    /// Create a walker with no ignored names on the global rayon pool.
    pub fn new(reader: R) -> Self {
        let (progress_tx, _) = broadcast::channel(PROGRESS_CHANNEL_SIZE);
        Self {
            reader,
            ignore_names: HashSet::new(),
            threads: 0,
            progress_tx,
        }
    }

    /// Create a walker using the ignore list and thread count of `config`.
    pub fn with_config(reader: R, config: &ScanConfig) -> Self {
        let mut walker = Self::new(reader);
        walker.ignore_names = config.ignore_names.clone();
        walker.threads = config.threads;
        walker
    }

    /// Skip entries with these names.
    pub fn ignore<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Subscribe to walk progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Walk `root` and build the raw, unaggregated tree.
    ///
    /// Directories that cannot be listed are kept with no children and
    /// recorded as warnings on the returned tree. The tree is read one depth
    /// level at a time, so nesting depth costs no stack.
    pub fn walk(self, root: &Path) -> UsageTree {
        let start = Instant::now();
        let tracker = ProgressTracker::new();

        let pool = match self.threads {
            0 => None,
            n => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => Some(pool),
                Err(err) => {
                    tracing::warn!(%err, threads = n, "falling back to the global thread pool");
                    None
                }
            },
        };

        let mut tree = UsageTree::new(root.as_os_str());
        tree.root_path = root.to_path_buf();
        tree.stats.record_dir();

        let mut pending = vec![(UsageTree::ROOT, root.to_path_buf())];
        while !pending.is_empty() {
            let listings = match &pool {
                Some(pool) => pool.install(|| self.read_level(pending, &tracker)),
                None => self.read_level(pending, &tracker),
            };
            pending = attach_level(&mut tree, listings);
        }
        tree.scan_duration = start.elapsed();

        let _ = self.progress_tx.send(tracker.snapshot());
        tracing::debug!(
            dirs = tree.stats.total_dirs,
            files = tree.stats.total_files,
            warnings = tree.warnings.len(),
            elapsed = ?tree.scan_duration,
            "walk finished"
        );

        tree
    }

    /// List every directory of one level in parallel, keeping their order.
    fn read_level(&self, dirs: Vec<(NodeId, PathBuf)>, tracker: &ProgressTracker) -> Vec<Listing> {
        dirs.into_par_iter()
            .map(|(dir, path)| self.read_one(dir, path, tracker))
            .collect()
    }

    fn read_one(&self, dir: NodeId, path: PathBuf, tracker: &ProgressTracker) -> Listing {
        match self.reader.read_dir(&path) {
            Ok(entries) => {
                let entries: Vec<EntryInfo> = entries
                    .into_iter()
                    .filter(|e| !self.is_ignored(e))
                    .collect();

                let files = entries.iter().filter(|e| !e.is_dir).count() as u64;
                let _ = self.progress_tx.send(tracker.record_dir(files));

                Listing {
                    dir,
                    path,
                    entries,
                    error: None,
                }
            }
            Err(err) => {
                tracing::warn!(path = %err.path.display(), source = %err.source, "cannot read directory");
                let _ = self.progress_tx.send(tracker.record_dir(0));
                Listing {
                    dir,
                    path,
                    entries: Vec::new(),
                    error: Some(err),
                }
            }
        }
    }

    /// Names that are not valid UTF-8 never match the ignore list.
    fn is_ignored(&self, entry: &EntryInfo) -> bool {
        entry
            .name
            .to_str()
            .is_some_and(|name| self.ignore_names.contains(name))
    }
}

/// Entries read from one directory already in the tree.
struct Listing {
    dir: NodeId,
    path: PathBuf,
    entries: Vec<EntryInfo>,
    error: Option<ReadError>,
}

/// Add one level of listings to the tree and return the directories to
/// read next.
fn attach_level(tree: &mut UsageTree, listings: Vec<Listing>) -> Vec<(NodeId, PathBuf)> {
    let mut next = Vec::new();

    for listing in listings {
        if let Some(err) = listing.error {
            tree.stats.record_unreadable();
            tree.warnings.push(ScanWarning::from(&err));
        }

        for info in listing.entries {
            if info.is_dir {
                tree.stats.record_dir();
                let path = listing.path.join(&info.name);
                let dir = tree.add_directory(listing.dir, info.name);
                next.push((dir, path));
            } else {
                tree.stats.record_file();
                tree.add_file(listing.dir, info.name, info.size);
            }
        }
    }

    next
}

/// Make a scan root absolute and check that it is a directory.
///
/// Symbolic links in the root are kept so printed paths start with what
/// the user typed. `.` and `..` components are resolved lexically.
pub fn prepare_root(root: &Path) -> Result<PathBuf, ScanError> {
    let absolute = std::path::absolute(root).map_err(|e| ScanError::io(root, e))?;
    let root_path = normalize(&absolute);

    let metadata = std::fs::metadata(&root_path).map_err(|e| ScanError::io(&root_path, e))?;
    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory { path: root_path });
    }

    // The root itself must be listable, unlike the directories below it
    std::fs::read_dir(&root_path).map_err(|e| ScanError::io(&root_path, e))?;

    Ok(root_path)
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
