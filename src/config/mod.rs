mod shell_config;

pub use shell_config::{ShellConfig, ShellConfigError, get_config_file_path};
