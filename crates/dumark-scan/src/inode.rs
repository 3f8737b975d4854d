//! Inode tracking for hardlink deduplication.

use dashmap::DashSet;

/// (inode, device) pair identifying a file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InodeKey {
    /// Inode number.
    pub inode: u64,
    /// Device ID.
    pub device: u64,
}

impl InodeKey {
    /// Create a new inode key.
    pub fn new(inode: u64, device: u64) -> Self {
        Self { inode, device }
    }
}

/// Tracks seen inodes to prevent double-counting hardlinks.
///
/// Shared by every rayon worker of a walk, hence the concurrent set.
#[derive(Debug, Default)]
pub struct InodeTracker {
    seen: DashSet<InodeKey>,
}

impl InodeTracker {
    /// Create a new inode tracker.
    pub fn new() -> Self {
        Self {
            seen: DashSet::new(),
        }
    }

    /// Track an inode. Returns `true` if this is the first time seeing it.
    pub fn track(&self, key: InodeKey) -> bool {
        self.seen.insert(key)
    }

    /// Get the number of unique inodes tracked.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Check if no inodes have been tracked.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_new_inode() {
        let tracker = InodeTracker::new();
        let key = InodeKey::new(12345, 1);

        assert!(tracker.track(key));
        assert!(!tracker.track(key));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_different_devices() {
        let tracker = InodeTracker::new();

        assert!(tracker.track(InodeKey::new(12345, 1)));
        assert!(tracker.track(InodeKey::new(12345, 2)));
        assert_eq!(tracker.len(), 2);
    }
}
