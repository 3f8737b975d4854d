//! Core types for dumark.
//!
//! This crate provides the usage tree shared by the walker, the processor
//! and the interactive session, together with scan configuration and the
//! error taxonomy.

mod config;
mod error;
mod node;
mod tree;

pub use config::{MEGABYTE, ScanConfig, ScanConfigBuilder};
pub use error::{ProcessError, ReadError, ScanError, ScanWarning, WarningKind};
pub use node::{NodeId, NodeKind, UsageNode};
pub use tree::{Ancestors, TreeStats, UsageTree};
