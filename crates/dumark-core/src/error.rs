//! Error types for walking and processing.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::node::NodeId;

/// A directory could not be listed.
///
/// Recovered by the walker: the directory is kept with no children.
#[derive(Debug, Error)]
#[error("Cannot read {path}: {source}")]
pub struct ReadError {
    /// Directory that failed to list.
    pub path: PathBuf,
    /// Underlying I/O failure.
    #[source]
    pub source: std::io::Error,
}

impl ReadError {
    /// Create a read error for a path.
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Fatal errors while setting up a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// The walked tree could not be processed.
    #[error(transparent)]
    Process(#[from] ProcessError),
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// The tree handed to the processor is not a well-formed usage tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProcessError {
    /// The tree has no root node.
    #[error("Usage tree has no root")]
    EmptyTree,

    /// The root claims to have a parent.
    #[error("Root node has a parent")]
    RootHasParent,

    /// A child id points outside the tree.
    #[error("Node {parent:?} lists missing child {child:?}")]
    MissingChild { parent: NodeId, child: NodeId },

    /// A child's back-reference does not point at the directory listing it.
    #[error("Node {child:?} is listed by {parent:?} but its parent is {actual:?}")]
    BrokenParentLink {
        parent: NodeId,
        child: NodeId,
        actual: Option<NodeId>,
    },

    /// A node is reachable twice (shared child or cycle).
    #[error("Node {node:?} is reachable more than once")]
    DuplicateNode { node: NodeId },

    /// A file node has children.
    #[error("File node {node:?} has children")]
    FileWithChildren { node: NodeId },
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied.
    PermissionDenied,
    /// Error reading a directory.
    ReadError,
}

/// Non-fatal warning encountered during a walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }
}

impl From<&ReadError> for ScanWarning {
    fn from(err: &ReadError) -> Self {
        let kind = match err.source.kind() {
            std::io::ErrorKind::PermissionDenied => WarningKind::PermissionDenied,
            _ => WarningKind::ReadError,
        };
        Self::new(&err.path, err.to_string(), kind)
    }
}
