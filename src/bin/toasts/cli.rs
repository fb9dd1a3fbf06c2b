use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(author, version, about = "Drive a toast stack from a script of notifications", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// JSON-lines script to play; reads stdin when absent.
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Also print a frame on every progress tick.
    #[arg(long, action = ArgAction::SetTrue)]
    pub progress: bool,

    /// Disable ANSI colours in frames.
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_color: bool,

    /// Emit logs as JSON (requires `--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Explicit log filter (e.g. "toasts=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
