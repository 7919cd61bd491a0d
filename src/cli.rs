use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed task-board CLI.
/// Snapshots default to ~/.taskboard or a directory passed via --data-dir.
#[derive(Parser)]
#[command(name = "tb", version, about = "Shared task-board with per-user profiles")]
pub struct Cli {
    /// Directory holding the per-user snapshot files.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Profile to act as (id or name). Defaults to the most recently used.
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}
