//! Shell configuration.
//!
//! YAML file loaded from `$FMSH_CONFIG`, `~/.config/fmsh/fmsh.yaml`, or
//! `./fmsh.yaml`, falling back to defaults. Only ambient shell concerns are
//! configurable (history, log filter); session state is never persisted.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub history: HistoryConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub file: String,
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            file: "~/.fmsh_history".to_string(),
            max_entries: 1000,
        }
    }
}

impl HistoryConfig {
    /// The history file with `~` expanded.
    pub fn path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.file).as_ref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter; `RUST_LOG` overrides it.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    if let Ok(env_path) = std::env::var("FMSH_CONFIG") {
        let path = PathBuf::from(&env_path);
        let content = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::ReadFile { path, source })?;
        return Ok(serde_yaml::from_str(&content)?);
    }

    for path in search_paths() {
        if path.exists() {
            if let Ok(content) = std::fs::read_to_string(&path) {
                return Ok(serde_yaml::from_str(&content)?);
            }
        }
    }

    Ok(Config::default())
}

fn search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config/fmsh/fmsh.yaml"));
    }
    paths.push(PathBuf::from("./fmsh.yaml"));
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.history.max_entries, 1000);
        assert_eq!(config.logging.filter, "warn");
        assert!(config.history.file.starts_with('~'));
    }

    #[test]
    fn partial_yaml_keeps_defaults_for_the_rest() {
        let config: Config = serde_yaml::from_str("history:\n  max_entries: 50\n").unwrap();
        assert_eq!(config.history.max_entries, 50);
        assert_eq!(config.history.file, "~/.fmsh_history");
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn history_path_expands_tilde() {
        let config = HistoryConfig {
            file: "/var/tmp/fmsh_history".to_string(),
            max_entries: 10,
        };
        assert_eq!(config.path(), PathBuf::from("/var/tmp/fmsh_history"));

        let home_relative = HistoryConfig::default();
        assert!(!home_relative.path().to_string_lossy().starts_with('~'));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "history: [not, a, mapping]").unwrap();
        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(serde_yaml::from_str::<Config>(&content).is_err());
    }
}
