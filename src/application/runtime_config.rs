use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub script: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub no_color: bool,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            script: cli.script,
            config: cli.config,
            no_color: cli.no_color,
        }
    }
}
