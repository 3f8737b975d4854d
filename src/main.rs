//! dumark - Find what fills your disk, mark it, print the paths.
//!
//! Usage:
//!   dumark [PATH]                 Browse PATH (default: current directory)
//!   dumark -l 100 /var            Hide entries below 100 MB
//!   dumark --print0 | xargs -0 rm -r
//!
//! Marked paths are printed to stdout after the screen is restored.

use std::collections::HashSet;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use humansize::{BINARY, format_size};
use tracing_subscriber::EnvFilter;

use dumark_core::{MEGABYTE, ScanConfig};
use dumark_tui::{TuiConfig, UserSettings};

#[derive(Parser)]
#[command(
    name = "dumark",
    version,
    about = "Interactive disk usage triage",
    long_about = "dumark walks a directory, lets you browse it sorted by size and mark \
                  files and folders. The marked paths are printed when you quit."
)]
struct Cli {
    /// Directory to analyze (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Hide entries smaller than this many megabytes [default: 10]
    #[arg(short, long, value_name = "MB")]
    limit: Option<u64>,

    /// Terminate printed paths with NUL instead of newline
    #[arg(long)]
    print0: bool,

    /// Skip entries with this name (repeatable)
    #[arg(short, long, value_name = "NAME")]
    ignore: Vec<String>,

    /// Number of walker threads (0 = one per core)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Write logs to this file (filter with DUMARK_LOG)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Merge command line options over the user settings.
    fn tui_config(&self, settings: &UserSettings) -> Result<TuiConfig> {
        let limit_mb = self.limit.unwrap_or(settings.limit_mb);
        let min_size = limit_mb
            .checked_mul(MEGABYTE)
            .ok_or_else(|| eyre!("Size limit of {limit_mb} MB is too large"))?;

        let ignore_names: HashSet<String> = settings
            .ignore
            .iter()
            .chain(&self.ignore)
            .cloned()
            .collect();

        let scan = ScanConfig::builder()
            .root(self.path.clone())
            .ignore_names(ignore_names)
            .min_size(min_size)
            .threads(self.threads)
            .build()
            .context("Invalid options")?;

        let mut config = TuiConfig::new(scan);
        config.theme = settings.theme;
        Ok(config)
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let settings = UserSettings::load();
    let config = cli.tui_config(&settings)?;
    tracing::info!(
        root = %config.scan.root.display(),
        limit = %format_size(config.scan.min_size, BINARY),
        ignored = config.scan.ignore_names.len(),
        "starting"
    );

    let marked = dumark_tui::run(config)?;
    print_marked(&marked, cli.print0).context("Failed to print marked paths")?;

    tracing::info!(count = marked.len(), "printed marked paths");
    Ok(())
}

/// Send logs to `path`. The terminal belongs to the UI, so there is no
/// console logging at all.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Cannot open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env("DUMARK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| eyre!("Cannot install logger: {err}"))
}

fn print_marked(paths: &[PathBuf], print0: bool) -> std::io::Result<()> {
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_paths(&mut out, paths, print0)?;
    out.flush()
}

fn write_paths<W: Write>(out: &mut W, paths: &[PathBuf], print0: bool) -> std::io::Result<()> {
    let terminator: &[u8] = if print0 { b"\0" } else { b"\n" };
    for path in paths {
        out.write_all(path.as_os_str().as_encoded_bytes())?;
        out.write_all(terminator)?;
    }
    Ok(())
}
