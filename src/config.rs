//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::history::{FileStorage, DEFAULT_STORAGE_KEY};
use crate::predict::PredictionConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub prediction: PredictionServiceConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the recent history is persisted
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("sentiscope").to_string_lossy().to_string())
        .unwrap_or_else(|| "./sentiscope_data".to_string())
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
        }
    }
}

impl HistoryConfig {
    /// File-backed storage for the configured key
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(self.data_path(), &self.storage_key)
    }

    /// `data_dir` with a leading `~` resolved against the home directory
    pub fn data_path(&self) -> PathBuf {
        expand_home(&self.data_dir)
    }
}

fn expand_home(dir: &str) -> PathBuf {
    let rest = match dir.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return PathBuf::from(dir),
    };

    match dirs::home_dir() {
        Some(home) => match rest.trim_start_matches(['/', '\\']) {
            "" => home,
            rest => home.join(rest),
        },
        None => {
            tracing::warn!("No home directory to expand {:?}", dir);
            PathBuf::from(dir)
        }
    }
}

/// External prediction service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionServiceConfig {
    #[serde(default = "default_prediction_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Posts requested per social search when no limit is given
    #[serde(default = "default_query_limit")]
    pub default_limit: u32,
}

fn default_prediction_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_query_limit() -> u32 {
    crate::analysis::DEFAULT_QUERY_LIMIT
}

impl Default for PredictionServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_prediction_url(),
            request_timeout_secs: default_request_timeout(),
            default_limit: default_query_limit(),
        }
    }
}

impl PredictionServiceConfig {
    /// Client configuration for `PredictionClient`
    pub fn client_config(&self) -> PredictionConfig {
        PredictionConfig {
            base_url: self.base_url.clone(),
            request_timeout_ms: self.request_timeout_secs * 1000,
        }
    }
}

/// Dashboard API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8083
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Config file locations searched by `load_default`, in order
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("sentiscope").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load from default locations or environment
    ///
    /// Returns the file the config came from, if any. A file that exists but
    /// cannot be read or parsed is an error, not a silent fallback.
    pub fn load_default() -> Result<(Self, Option<PathBuf>), ConfigError> {
        Self::load_first(&Self::default_paths())
    }

    /// Load the first existing file in `paths`, or defaults with env overrides
    pub fn load_first(paths: &[PathBuf]) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => Ok((Self::load_with_env(path)?, Some(path.clone()))),
            None => Ok((Self::from_env(), None)),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(data_dir) = var("SENTISCOPE_DATA_DIR") {
            self.history.data_dir = data_dir;
        }

        if let Some(url) = var("SENTISCOPE_PREDICTION_URL") {
            self.prediction.base_url = url;
        }

        if let Some(host) = var("SENTISCOPE_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("SENTISCOPE_API_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!("Ignoring invalid SENTISCOPE_API_PORT: {}", port),
            }
        }

        if let Some(level) = var("SENTISCOPE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("SENTISCOPE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Sentiscope Configuration
#
# Environment variables override these settings:
# - SENTISCOPE_DATA_DIR
# - SENTISCOPE_PREDICTION_URL
# - SENTISCOPE_API_HOST
# - SENTISCOPE_API_PORT
# - SENTISCOPE_LOG_LEVEL
# - SENTISCOPE_LOG_FORMAT

[history]
# Directory holding the recent analyses file
data_dir = "~/.local/share/sentiscope"

# Name of the stored history (file is <data_dir>/<storage_key>.json)
storage_key = "recentAnalyses"

[prediction]
# Sentiment prediction service URL
base_url = "http://localhost:8000"

# Request timeout in seconds
request_timeout_secs = 30

# Posts fetched per Reddit/Twitter search when no limit is given
default_limit = 30

[api]
# Dashboard API host
host = "127.0.0.1"

# Dashboard API port
port = 8083

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.history.storage_key, "recentAnalyses");
        assert_eq!(config.prediction.base_url, "http://localhost:8000");
        assert_eq!(config.prediction.default_limit, 30);
        assert_eq!(config.api.port, 8083);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.prediction.request_timeout_secs, 30);
        assert_eq!(config.prediction.client_config().request_timeout_ms, 30_000);
        assert_eq!(config.api.host, "127.0.0.1");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse("[prediction]\nbase_url = \"http://model:9000\"\n").unwrap();
        assert_eq!(config.prediction.base_url, "http://model:9000");
        assert_eq!(config.prediction.default_limit, 30);
        assert_eq!(config.history.storage_key, "recentAnalyses");
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            Config::parse("[api]\nport = \"not a port\""),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/sentiscope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SENTISCOPE_DATA_DIR", "/tmp/senti"),
            ("SENTISCOPE_PREDICTION_URL", "http://gpu-box:8000"),
            ("SENTISCOPE_API_PORT", "9999"),
            ("SENTISCOPE_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.history.data_dir, "/tmp/senti");
        assert_eq!(config.prediction.base_url, "http://gpu-box:8000");
        assert_eq!(config.api.port, 9999);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_bad_port_override_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "SENTISCOPE_API_PORT").then(|| "http".to_string()));
        assert_eq!(config.api.port, 8083);
    }

    #[test]
    fn test_load_first_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[history]\ndata_dir = 5\n").unwrap();

        let err = Config::load_first(&[path]).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_first_picks_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[prediction]\ndefault_limit = 5\n").unwrap();

        let missing = dir.path().join("missing.toml");
        let (config, source) = Config::load_first(&[missing, path.clone()]).unwrap();
        assert_eq!(source, Some(path));
        assert_eq!(config.prediction.default_limit, 5);
    }

    #[test]
    fn test_load_first_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let (config, source) = Config::load_first(&[dir.path().join("none.toml")]).unwrap();
        assert!(source.is_none());
        assert_eq!(config.history.storage_key, "recentAnalyses");
    }

    #[test]
    fn test_generated_config_storage_is_absolute() {
        let config = Config::parse(&generate_default_config()).unwrap();
        let storage = config.history.storage();
        assert!(storage.path().is_absolute(), "{:?}", storage.path());
        assert!(storage.path().ends_with(".local/share/sentiscope/recentAnalyses.json"));
    }

    #[test]
    fn test_expand_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_home("~"), home);
        assert_eq!(expand_home("~/data"), home.join("data"));
        assert_eq!(expand_home("/srv/data"), PathBuf::from("/srv/data"));
        assert_eq!(expand_home("~other/data"), PathBuf::from("~other/data"));
    }

    #[test]
    fn test_history_storage_path() {
        let history = HistoryConfig {
            data_dir: "/var/lib/sentiscope".to_string(),
            storage_key: "recentAnalyses".to_string(),
        };
        assert_eq!(
            history.storage().path(),
            Path::new("/var/lib/sentiscope/recentAnalyses.json")
        );
    }
}
