//! Application configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use cr_history::{DEFAULT_STORAGE_KEY, RunStore};
use serde::{Deserialize, Serialize};

use crate::client::HttpSimulationClient;
use crate::error::{AppError, AppResult};
use crate::export::DEFAULT_EXPORT_FILENAME;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "cellrun.yaml";

pub const ENV_ENDPOINT: &str = "CELLRUN_ENDPOINT";
pub const ENV_DATA_DIR: &str = "CELLRUN_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the simulation service.
    pub endpoint: String,
    /// Directory holding the history slot.
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub export_filename: String,
    /// No timeout when absent.
    pub request_timeout_s: Option<f64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000".to_string(),
            data_dir: default_data_dir(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            export_filename: DEFAULT_EXPORT_FILENAME.to_string(),
            request_timeout_s: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".cellrun"),
        None => PathBuf::from(".cellrun"),
    }
}

impl AppConfig {
    /// Defaults, then the YAML file (explicit path or `cellrun.yaml` in the
    /// working directory), then environment overrides.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::from_file(fallback)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::from_yaml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {}", e)))
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|v| !v.is_empty()) {
            self.endpoint = endpoint;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_s
            .filter(|s| s.is_finite() && *s > 0.0)
            .map(Duration::from_secs_f64)
    }

    pub fn open_store(&self) -> AppResult<RunStore> {
        Ok(RunStore::open_dir(
            self.data_dir.clone(),
            self.storage_key.clone(),
        )?)
    }

    pub fn client(&self) -> HttpSimulationClient {
        HttpSimulationClient::new(&self.endpoint, self.request_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        assert_eq!(AppConfig::from_yaml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = AppConfig::from_yaml_str(
            "endpoint: http://sim.local:8080\nrequest_timeout_s: 30\n",
        )
        .unwrap();
        assert_eq!(config.endpoint, "http://sim.local:8080");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.export_filename, DEFAULT_EXPORT_FILENAME);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(matches!(
            AppConfig::from_yaml_str("endpoint: [unclosed"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = AppConfig::from_yaml_str("endpoint: http://file:1\n").unwrap();
        config.apply_env(|key| match key {
            ENV_ENDPOINT => Some("http://env:2".to_string()),
            ENV_DATA_DIR => Some("/tmp/cellrun-env".to_string()),
            _ => None,
        });
        assert_eq!(config.endpoint, "http://env:2");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/cellrun-env"));
    }

    #[test]
    fn no_timeout_by_default() {
        assert!(AppConfig::default().request_timeout().is_none());
        let config = AppConfig {
            request_timeout_s: Some(0.0),
            ..AppConfig::default()
        };
        assert!(config.request_timeout().is_none());
    }
}
