use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Interactive shell over an in-memory namespace.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Run the commands in this file instead of reading standard input
    #[clap(long, short)]
    pub script: Option<PathBuf>,

    /// Shell configuration file (defaults to ./nsh.yaml when present)
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    /// Never colorize error messages
    #[clap(long)]
    pub no_color: bool,
}
