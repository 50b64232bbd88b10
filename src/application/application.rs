use std::env;
use std::io::{self, Write};
use std::path::Path;

use compio::fs;
use snafu::Snafu;
use snafu::prelude::*;
use supports_color::Stream;
use tracing::{debug, info};

use nsh::config::{ShellConfig, ShellConfigError};
use nsh::shell::{Shell, ShellError};

use crate::application::RuntimeConfig;

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let working_dir = env::current_dir().context(CurrentDirSnafu)?;
        let shell_config = ShellConfig::load(app_config.config.as_deref(), &working_dir)
            .await
            .context(ConfigSnafu)?;
        debug!("Loaded config: {:?}", shell_config);

        let color = Self::use_color(&app_config, &shell_config);
        colored::control::set_override(color);

        Self::run_session(&app_config, shell_config, color, io::stdout()).await?;
        Ok(())
    }

    /// Runs the startup commands, then the script or standard input, and
    /// hands back the output sink.
    pub async fn run_session<W: Write>(
        app_config: &RuntimeConfig,
        shell_config: ShellConfig,
        color: bool,
        out: W,
    ) -> Result<W, ApplicationError> {
        let mut shell = Shell::new(out).with_color(color);

        info!("Running {} startup command(s)", shell_config.startup.len());
        shell
            .run_lines(&shell_config.startup)
            .context(SessionSnafu)?;

        match &app_config.script {
            Some(path) => {
                let script = Self::read_script(path).await?;
                info!("Running script {}", path.display());
                shell.run_lines(script.lines()).context(SessionSnafu)?;
            }
            None => {
                shell = shell.with_prompt(shell_config.prompt);
                shell
                    .run_reader(io::stdin().lock())
                    .context(SessionSnafu)?;
            }
        }

        Ok(shell.into_inner())
    }

    async fn read_script(path: &Path) -> Result<String, ApplicationError> {
        let file_path = path.display().to_string();
        let bytes = fs::read(path).await.context(ScriptReadSnafu {
            file_path: file_path.clone(),
        })?;
        String::from_utf8(bytes).context(ScriptEncodingSnafu { file_path })
    }

    fn use_color(app_config: &RuntimeConfig, shell_config: &ShellConfig) -> bool {
        if app_config.no_color {
            return false;
        }
        shell_config
            .color
            .unwrap_or_else(|| supports_color::on(Stream::Stdout).is_some())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Failed to obtain current dir"))]
    CurrentDirError { source: std::io::Error },
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigError { source: ShellConfigError },
    #[snafu(display("Failed to read the script file: {}", file_path))]
    ScriptReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Script file is not valid UTF-8: {}", file_path))]
    ScriptEncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Shell session ended abnormally"))]
    SessionError { source: ShellError },
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use tempfile::NamedTempFile;

    use super::*;

    fn script(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        write!(file, "{contents}").expect("Failed to write to temp file");
        file
    }

    #[compio::test]
    async fn runs_startup_then_script() {
        let file = script("cd home\ntouch notes\nwrite notes hi\ncat /home/notes\npwd\n");
        let app_config = RuntimeConfig {
            script: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let shell_config = ShellConfig {
            startup: vec!["mkdir /home".to_string()],
            ..Default::default()
        };

        let out = Application::run_session(&app_config, shell_config, false, Vec::new())
            .await
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hi\n/home/\n");
    }

    #[compio::test]
    async fn script_errors_do_not_stop_the_session() {
        let file = script("cat missing\nbogus\nmkdir a\nls\n");
        let app_config = RuntimeConfig {
            script: Some(file.path().to_path_buf()),
            ..Default::default()
        };

        let out = Application::run_session(&app_config, ShellConfig::default(), false, Vec::new())
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "File not found: missing\ncommand not found: bogus\na\n"
        );
    }

    #[compio::test]
    async fn missing_script_is_an_application_error() {
        let app_config = RuntimeConfig {
            script: Some("/this/script/does/not/exist.nsh".into()),
            ..Default::default()
        };

        let result =
            Application::run_session(&app_config, ShellConfig::default(), false, Vec::new()).await;
        assert!(matches!(result, Err(ApplicationError::ScriptReadError { .. })));
    }

    #[test]
    fn no_color_flag_wins_over_config() {
        let app_config = RuntimeConfig {
            no_color: true,
            ..Default::default()
        };
        let shell_config = ShellConfig {
            color: Some(true),
            ..Default::default()
        };
        assert!(!Application::use_color(&app_config, &shell_config));
        assert!(Application::use_color(&RuntimeConfig::default(), &shell_config));
    }
}
