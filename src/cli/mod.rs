//! Command-line argument parsing. See spec §6 / SPEC_FULL.md §A.4.

pub mod ui;

use std::path::PathBuf;

use clap::Parser;

/// Partitions a project's PDFs across 16mm/35mm microfilm rolls and
/// records the allocation durably.
#[derive(Parser, Debug)]
#[command(name = "microfilm", version, about)]
pub struct Cli {
    /// Project folder or document subfolder to process.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long)]
    pub debug: bool,

    /// Path to the durable SQLite store. Defaults to the value in the
    /// loaded configuration file, or `microfilm.db` in the project
    /// folder.
    #[arg(long, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Path to a TOML configuration file. Defaults to the platform's
    /// per-user config directory (`<config_dir>/microfilm/config.toml`)
    /// if present, else to built-in defaults.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable colored summary output even when stdout is a terminal.
    #[arg(long)]
    pub plain: bool,
}
