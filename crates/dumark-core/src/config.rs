//! Scan configuration types.

use std::collections::HashSet;
use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// One mebibyte, the unit of the command line size limit.
pub const MEGABYTE: u64 = 1024 * 1024;

/// Configuration for a walk and the processing that follows it.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root path to scan.
    pub root: PathBuf,

    /// Entry names that are never descended into or listed.
    #[builder(default)]
    #[serde(default)]
    pub ignore_names: HashSet<String>,

    /// Entries smaller than this many bytes are hidden from listings.
    #[builder(default = "10 * MEGABYTE")]
    #[serde(default = "default_min_size")]
    pub min_size: u64,

    /// Number of threads for walking (0 = auto-detect).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,

    /// Count a file with several hard links only once.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub dedupe_hardlinks: bool,
}

fn default_true() -> bool {
    true
}

fn default_min_size() -> u64 {
    10 * MEGABYTE
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        if let Some(ref names) = self.ignore_names {
            if names.iter().any(|n| n.is_empty()) {
                return Err("Ignored names cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignore_names: HashSet::new(),
            min_size: default_min_size(),
            threads: 0,
            dedupe_hardlinks: true,
        }
    }

    /// Check if an entry name is on the ignore list.
    pub fn should_ignore(&self, name: &str) -> bool {
        self.ignore_names.contains(name)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
