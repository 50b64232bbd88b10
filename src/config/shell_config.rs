use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::{debug, warn};

const CONFIG_FILE_NAME: &str = "nsh.yaml";
const KNOWN_KEYS: [&str; 3] = ["prompt", "startup", "color"];

pub fn get_config_file_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Optional shell settings, read from YAML:
///
/// ```yaml
/// prompt: "nsh> "
/// color: false
/// startup:
///   - mkdir /home/guest
///   - cd /home/guest
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellConfig {
    pub prompt: Option<String>,
    pub startup: Vec<String>,
    pub color: Option<bool>,
}

impl ShellConfig {
    /// Reads `explicit` when given. Otherwise reads `nsh.yaml` from `dir`
    /// if it exists, falling back to defaults.
    pub async fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self, ShellConfigError> {
        if let Some(path) = explicit {
            return Self::from_path(path).await;
        }

        let path = get_config_file_path(dir);
        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Self::from_path(&path).await,
            _ => {
                debug!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, ShellConfigError> {
        debug!("Opening config file: {}", path.display());
        let file_path = path.display().to_string();
        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: file_path.clone(),
        })?;
        debug!("Successfully read config file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu { file_path })?;
        contents.as_str().try_into()
    }
}

impl TryFrom<&str> for ShellConfig {
    type Error = ShellConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let contents_vec = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let contents = contents_vec
            .first()
            .ok_or(ShellConfigError::MalformedConfig)?;
        let top_level = contents
            .as_mapping()
            .ok_or(ShellConfigError::TopLevelNotMap)?;

        for key in top_level.keys() {
            match key.as_str() {
                Some(name) if KNOWN_KEYS.contains(&name) => {}
                _ => debug!("Ignoring unknown config key: {:?}", key),
            }
        }

        let prompt = read_prompt(top_level)?;
        let color = read_color(top_level)?;
        let startup = read_startup(top_level)?;

        Ok(ShellConfig {
            prompt,
            startup,
            color,
        })
    }
}

fn get_setting<'a, 'input>(
    top_level: &'a LinkedHashMap<Yaml<'input>, Yaml<'input>>,
    key: &'static str,
) -> Option<&'a Yaml<'input>> {
    match top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed(key)))) {
        None | Some(Yaml::Value(Scalar::Null)) => None,
        Some(value) => Some(value),
    }
}

fn read_prompt(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Option<String>, ShellConfigError> {
    get_setting(top_level, "prompt")
        .map(|value| {
            value
                .as_str()
                .map(str::to_string)
                .ok_or(ShellConfigError::PromptNotString)
        })
        .transpose()
}

fn read_color(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Option<bool>, ShellConfigError> {
    match get_setting(top_level, "color") {
        None => Ok(None),
        Some(Yaml::Value(Scalar::Boolean(color))) => Ok(Some(*color)),
        Some(_) => Err(ShellConfigError::ColorNotBool),
    }
}

fn read_startup(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Vec<String>, ShellConfigError> {
    let Some(value) = get_setting(top_level, "startup") else {
        return Ok(Vec::new());
    };
    let lines = value
        .as_sequence()
        .ok_or(ShellConfigError::StartupNotSequence)?
        .iter()
        .filter_map(|line| match line.as_str() {
            Some(line) => Some(line.to_string()),
            None => {
                warn!("Skipping non-string startup entry: {:?}", line);
                None
            }
        })
        .collect();
    Ok(lines)
}

#[derive(Debug, Snafu)]
pub enum ShellConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Config file is not valid UTF-8: {}", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted config file"))]
    MalformedConfig,
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("'prompt' should be a string"))]
    PromptNotString,
    #[snafu(display("'startup' should be a list of command lines"))]
    StartupNotSequence,
    #[snafu(display("'color' should be true or false"))]
    ColorNotBool,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::*;
    use tempfile::{NamedTempFile, TempDir};

    use super::*;

    #[compio::test]
    async fn config_returns_error_on_nonexistent_explicit_file() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let missing = dir.path().join("missing.yaml");
        let result = ShellConfig::load(Some(&missing), dir.path()).await;
        assert!(matches!(result, Err(ShellConfigError::ReadError { .. })));
    }

    #[compio::test]
    async fn config_defaults_when_no_file_in_dir() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let config = ShellConfig::load(None, dir.path()).await.unwrap();
        assert_eq!(config, ShellConfig::default());
    }

    #[compio::test]
    async fn config_ignores_directory_named_like_config() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::create_dir(get_config_file_path(dir.path())).expect("Failed to create dir");

        let config = ShellConfig::load(None, dir.path()).await.unwrap();
        assert_eq!(config, ShellConfig::default());
    }

    #[compio::test]
    async fn config_is_discovered_in_dir() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(get_config_file_path(dir.path()), "prompt: \"> \"\n")
            .expect("Failed to write config");

        let config = ShellConfig::load(None, dir.path()).await.unwrap();
        assert_eq!(config.prompt.as_deref(), Some("> "));
    }

    #[compio::test]
    async fn config_reads_explicit_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        write!(file, "startup:\n  - mkdir /tmp\n  - cd /tmp\ncolor: true\n")
            .expect("Failed to write to temp file");

        let config = ShellConfig::from_path(file.path()).await.unwrap();
        assert_eq!(config.startup, vec!["mkdir /tmp", "cd /tmp"]);
        assert_eq!(config.color, Some(true));
        assert_eq!(config.prompt, None);
    }

    #[compio::test]
    async fn config_rejects_invalid_utf8() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(&[0xff, 0xfe, 0x00]).expect("Failed to write to temp file");

        let result = ShellConfig::from_path(file.path()).await;
        assert!(matches!(result, Err(ShellConfigError::EncodingError { .. })));
    }

    #[test]
    fn config_parses_all_keys() {
        let yaml = r#"
prompt: "nsh> "
color: false
startup:
  - mkdir /home/guest
  - cd /home/guest
"#;
        let config: ShellConfig = yaml.try_into().unwrap();
        assert_eq!(
            config,
            ShellConfig {
                prompt: Some("nsh> ".to_string()),
                startup: vec!["mkdir /home/guest".to_string(), "cd /home/guest".to_string()],
                color: Some(false),
            }
        );
    }

    #[rstest]
    #[case("other: value")]
    #[case("prompt:\nstartup:\ncolor:")]
    #[case("{}")]
    fn config_without_settings_is_default(#[case] yaml: &str) {
        let config: ShellConfig = yaml.try_into().unwrap();
        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn config_skips_non_string_startup_entries() {
        let yaml = "startup:\n  - pwd\n  - 42\n  - [nested]\n  - ls\n";
        let config: ShellConfig = yaml.try_into().unwrap();
        assert_eq!(config.startup, vec!["pwd", "ls"]);
    }

    #[test]
    fn config_returns_error_on_invalid_yaml() {
        let result: Result<ShellConfig, _> = "invalid: yaml: content: [unclosed".try_into();
        assert!(matches!(result, Err(ShellConfigError::ParseError { .. })));
    }

    #[test]
    fn config_returns_error_on_empty_file() {
        let result: Result<ShellConfig, _> = "".try_into();
        assert!(matches!(result, Err(ShellConfigError::MalformedConfig)));
    }

    #[rstest]
    #[case("- item1\n- item2")]
    #[case("just a string")]
    fn config_returns_error_when_top_level_is_not_map(#[case] yaml: &str) {
        let result: Result<ShellConfig, _> = yaml.try_into();
        assert!(matches!(result, Err(ShellConfigError::TopLevelNotMap)));
    }

    #[test]
    fn config_returns_error_on_wrong_value_types() {
        let result: Result<ShellConfig, _> = "prompt: [a, b]".try_into();
        assert!(matches!(result, Err(ShellConfigError::PromptNotString)));

        let result: Result<ShellConfig, _> = "startup: pwd".try_into();
        assert!(matches!(result, Err(ShellConfigError::StartupNotSequence)));

        let result: Result<ShellConfig, _> = "color: sometimes".try_into();
        assert!(matches!(result, Err(ShellConfigError::ColorNotBool)));
    }
}
