//! TOML configuration file loading
//!
//! The configuration file is optional. When no path is given the default
//! location under the user's config directory is tried and silently skipped
//! if absent; a path given explicitly must exist.

use crate::core::error_handling::ContextualError;
use crate::plugin::api::CycleDetection;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR_NAME: &str = "Plughost";
pub const CONFIG_FILE_NAME: &str = "plughost.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("The specified configuration file does not exist: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Error reading configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::NotFound { .. } => Some("Check the --config path"),
            ConfigError::Read { .. } => Some("Check the configuration file permissions"),
            ConfigError::Parse { .. } => Some("Fix the configuration file syntax"),
        }
    }
}

/// Either `key = "a"` or `key = ["a", "b"]`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct LogConfig {
    pub level: Option<String>,
    pub format: Option<String>,
    /// Log file; "none" or "-" disables file logging
    pub file: Option<String>,
    pub color: Option<bool>,
}

impl LogConfig {
    pub fn file_path(&self) -> Option<PathBuf> {
        match self.file.as_deref() {
            None | Some("-") => None,
            Some(file) if file.eq_ignore_ascii_case("none") => None,
            Some(file) => Some(PathBuf::from(file)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct HostConfig {
    pub plugin_dir: Option<PathBuf>,
    /// Module file extension, without the dot
    pub plugin_extension: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub exclude_plugin: Vec<String>,
    pub cycle_detection: CycleDetection,
    pub synchronous_plugin_events: bool,
    pub log: LogConfig,
}

impl HostConfig {
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `config_file`, or the default file if present, or defaults
    pub async fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match config_file {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                })
            }
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => {
                    log::debug!("No configuration file found; using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
        let config = Self::from_toml(&contents, &path)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_empty() {
        let config = HostConfig::from_toml("", Path::new("empty.toml")).unwrap();
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.cycle_detection, CycleDetection::Direct);
        assert!(!config.synchronous_plugin_events);
    }

    #[test]
    fn test_full_config() {
        let contents = r#"
            plugin-dir = "/opt/host/plugins"
            plugin-extension = "plug"
            exclude-plugin = ["ConsoleClient", "Legacy"]
            cycle-detection = "transitive"
            synchronous-plugin-events = true

            [log]
            level = "debug"
            format = "json"
            file = "none"
            color = false
        "#;
        let config = HostConfig::from_toml(contents, Path::new("full.toml")).unwrap();
        assert_eq!(config.plugin_dir, Some(PathBuf::from("/opt/host/plugins")));
        assert_eq!(config.plugin_extension.as_deref(), Some("plug"));
        assert_eq!(config.exclude_plugin, vec!["ConsoleClient", "Legacy"]);
        assert_eq!(config.cycle_detection, CycleDetection::Transitive);
        assert!(config.synchronous_plugin_events);
        assert_eq!(config.log.level.as_deref(), Some("debug"));
        assert_eq!(config.log.file_path(), None);
        assert_eq!(config.log.color, Some(false));
    }

    #[test]
    fn test_single_exclusion_string() {
        let config =
            HostConfig::from_toml(r#"exclude-plugin = "Core""#, Path::new("one.toml")).unwrap();
        assert_eq!(config.exclude_plugin, vec!["Core"]);
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let result = HostConfig::from_toml("plugins-dir = \"x\"", Path::new("typo.toml"));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_explicit_missing_file_is_error() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("missing.toml");
        let result = HostConfig::load(Some(&missing)).await;
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "exclude-plugin = [\"Core\"]").unwrap();
        writeln!(file, "[log]").unwrap();
        writeln!(file, "file = \"/tmp/plughost.log\"").unwrap();

        let config = HostConfig::load(Some(file.path())).await.unwrap();
        assert_eq!(config.exclude_plugin, vec!["Core"]);
        assert_eq!(
            config.log.file_path(),
            Some(PathBuf::from("/tmp/plughost.log"))
        );
    }
}
