//! Directory listing used by the walker.

use std::ffi::OsString;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

use dumark_core::{ReadError, ScanConfig};

use crate::inode::{InodeKey, InodeTracker};

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Entry name within its directory, exactly as listed.
    pub name: OsString,
    /// Size in bytes (ignored for directories).
    pub size: u64,
    /// Whether the entry is a directory to descend into.
    pub is_dir: bool,
}

impl EntryInfo {
    /// A file entry.
    pub fn file(name: impl Into<OsString>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            is_dir: false,
        }
    }

    /// A directory entry.
    pub fn dir(name: impl Into<OsString>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            is_dir: true,
        }
    }
}

/// Lists one directory.
///
/// The walker calls this from several rayon workers at once.
pub trait DirReader: Sync {
    /// List the entries of `path`, in the order they should be walked.
    fn read_dir(&self, path: &Path) -> Result<Vec<EntryInfo>, ReadError>;
}

impl<F> DirReader for F
where
    F: Fn(&Path) -> Result<Vec<EntryInfo>, ReadError> + Sync,
{
    fn read_dir(&self, path: &Path) -> Result<Vec<EntryInfo>, ReadError> {
        self(path)
    }
}

/// Reads directories from the local filesystem.
///
/// Symbolic links are never followed: they are listed as files sized by the
/// link itself. Entries come back sorted by name.
#[derive(Debug, Default)]
pub struct FsReader {
    hardlinks: Option<InodeTracker>,
}

impl FsReader {
    /// Reader that reports every file at its full size.
    pub fn new() -> Self {
        Self { hardlinks: None }
    }

    /// Reader that counts a multiply-linked file only the first time it is seen.
    pub fn with_hardlink_dedup() -> Self {
        Self {
            hardlinks: Some(InodeTracker::new()),
        }
    }

    /// Reader honoring `config.dedupe_hardlinks`.
    pub fn for_config(config: &ScanConfig) -> Self {
        if config.dedupe_hardlinks {
            Self::with_hardlink_dedup()
        } else {
            Self::new()
        }
    }

    fn file_size(&self, metadata: &std::fs::Metadata) -> u64 {
        if let Some(tracker) = &self.hardlinks {
            if get_nlink(metadata) > 1 {
                let key = InodeKey::new(get_ino(metadata), get_dev(metadata));
                if !tracker.track(key) {
                    return 0;
                }
            }
        }
        metadata.len()
    }
}

impl DirReader for FsReader {
    fn read_dir(&self, path: &Path) -> Result<Vec<EntryInfo>, ReadError> {
        let listing = std::fs::read_dir(path).map_err(|e| ReadError::new(path, e))?;

        let mut entries = Vec::new();
        for entry in listing {
            let entry = entry.map_err(|e| ReadError::new(path, e))?;

            // DirEntry::metadata does not traverse symlinks
            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(err) => {
                    tracing::debug!(path = %entry.path().display(), %err, "skipping entry without metadata");
                    continue;
                }
            };

            let name = entry.file_name();
            if metadata.is_dir() {
                entries.push(EntryInfo::dir(name));
            } else {
                entries.push(EntryInfo::file(name, self.file_size(&metadata)));
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

// Cross-platform metadata helpers

/// Get the device ID from metadata.
#[cfg(unix)]
fn get_dev(metadata: &std::fs::Metadata) -> u64 {
    metadata.dev()
}

#[cfg(not(unix))]
fn get_dev(_metadata: &std::fs::Metadata) -> u64 {
    0
}

/// Get the inode number from metadata.
#[cfg(unix)]
fn get_ino(metadata: &std::fs::Metadata) -> u64 {
    metadata.ino()
}

#[cfg(not(unix))]
fn get_ino(_metadata: &std::fs::Metadata) -> u64 {
    0
}

/// Get the number of hard links from metadata.
#[cfg(unix)]
fn get_nlink(metadata: &std::fs::Metadata) -> u64 {
    metadata.nlink()
}

#[cfg(not(unix))]
fn get_nlink(_metadata: &std::fs::Metadata) -> u64 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_fs_reader_lists_sorted() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("zeta.txt"), "12345").unwrap();
        fs::write(temp.path().join("alpha.txt"), "1").unwrap();
        fs::create_dir(temp.path().join("middle")).unwrap();

        let entries = FsReader::new().read_dir(temp.path()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.to_str().unwrap()).collect();
        assert_eq!(names, vec!["alpha.txt", "middle", "zeta.txt"]);

        assert_eq!(entries[0], EntryInfo::file("alpha.txt", 1));
        assert!(entries[1].is_dir);
        assert_eq!(entries[2].size, 5);
    }

    #[test]
    fn test_fs_reader_missing_dir() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("gone");

        let err = FsReader::new().read_dir(&missing).unwrap_err();
        assert_eq!(err.path, missing);
        assert_eq!(err.source.kind(), std::io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn test_fs_reader_hardlink_counted_once() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a"), "hello world").unwrap();
        fs::hard_link(temp.path().join("a"), temp.path().join("b")).unwrap();

        let entries = FsReader::with_hardlink_dedup().read_dir(temp.path()).unwrap();
        let total: u64 = entries.iter().map(|e| e.size).sum();
        assert_eq!(total, 11);

        let entries = FsReader::new().read_dir(temp.path()).unwrap();
        let total: u64 = entries.iter().map(|e| e.size).sum();
        assert_eq!(total, 22);
    }

    #[cfg(unix)]
    #[test]
    fn test_fs_reader_does_not_follow_symlinks() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("real")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("link")).unwrap();

        let entries = FsReader::new().read_dir(temp.path()).unwrap();
        let link = entries.iter().find(|e| e.name == "link").unwrap();
        assert!(!link.is_dir);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_fs_reader_keeps_raw_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        let raw = OsStr::from_bytes(b"d\xfe");
        fs::create_dir(temp.path().join(raw)).unwrap();

        let entries = FsReader::new().read_dir(temp.path()).unwrap();
        assert_eq!(entries, vec![EntryInfo::dir(raw)]);
        assert!(FsReader::new().read_dir(&temp.path().join(&entries[0].name)).is_ok());
    }

    #[test]
    fn test_closure_reader() {
        let reader = |path: &Path| -> Result<Vec<EntryInfo>, ReadError> {
            if path == Path::new("/x") {
                Ok(vec![EntryInfo::file("f", 7)])
            } else {
                Err(ReadError::new(path, std::io::ErrorKind::NotFound.into()))
            }
        };

        assert_eq!(reader.read_dir(Path::new("/x")).unwrap().len(), 1);
        assert!(reader.read_dir(Path::new("/y")).is_err());
    }
}
