//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::compression::{Algorithm, CompressionConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub compression: CompressionSection,

    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Compression engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CompressionSection {
    #[serde(default)]
    pub algorithm: Algorithm,

    #[serde(default = "default_deviation")]
    pub deviation: f64,

    #[serde(default)]
    pub max_interval: Option<f64>,
}

fn default_deviation() -> f64 {
    0.5
}

impl Default for CompressionSection {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            deviation: default_deviation(),
            max_interval: None,
        }
    }
}

impl CompressionSection {
    /// Engine parameters for this section
    pub fn engine_config(&self) -> CompressionConfig {
        CompressionConfig {
            deviation: self.deviation,
            max_interval: self.max_interval,
        }
    }
}

/// CSV input layout
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub time_column: usize,

    #[serde(default = "default_value_column")]
    pub value_column: usize,

    /// strftime format for datetime cells; numeric cells are always accepted
    #[serde(default = "default_time_format")]
    pub time_format: String,

    #[serde(default = "default_has_header")]
    pub has_header: bool,
}

fn default_value_column() -> usize {
    1
}

fn default_time_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

fn default_has_header() -> bool {
    true
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            time_column: 0,
            value_column: default_value_column(),
            time_format: default_time_format(),
            has_header: default_has_header(),
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

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
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

    /// First config file found in the default locations
    pub fn default_path() -> Option<PathBuf> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("historian-compression").join("config.toml")),
            Some(PathBuf::from("/etc/historian-compression/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        first_existing(config_paths.into_iter().flatten())
    }

    /// Load the given file, or fall back to environment-only config
    ///
    /// A file that exists but cannot be read or parsed is an error, never a
    /// silent fallback to defaults.
    pub fn load_or_env(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::from_env()),
        }
    }

    /// Apply environment variable overrides to an existing config
    ///
    /// Unparseable values are ignored with a warning.
    fn apply_env_overrides(&mut self) {
        if let Ok(algorithm) = std::env::var("HISTORIAN_ALGORITHM") {
            match algorithm.parse() {
                Ok(a) => self.compression.algorithm = a,
                Err(e) => tracing::warn!("Ignoring HISTORIAN_ALGORITHM: {}", e),
            }
        }
        if let Ok(deviation) = std::env::var("HISTORIAN_DEVIATION") {
            match deviation.parse() {
                Ok(d) => self.compression.deviation = d,
                Err(_) => tracing::warn!("Ignoring HISTORIAN_DEVIATION={:?}", deviation),
            }
        }
        if let Ok(interval) = std::env::var("HISTORIAN_MAX_INTERVAL") {
            match interval.parse() {
                Ok(i) => self.compression.max_interval = Some(i),
                Err(_) => tracing::warn!("Ignoring HISTORIAN_MAX_INTERVAL={:?}", interval),
            }
        }

        if let Ok(level) = std::env::var("HISTORIAN_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("HISTORIAN_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn first_existing(paths: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    paths.into_iter().find(|path| path.exists())
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
    r#"# Historian Compression Configuration
#
# Environment variables override these settings:
# - HISTORIAN_ALGORITHM
# - HISTORIAN_DEVIATION
# - HISTORIAN_MAX_INTERVAL
# - HISTORIAN_LOG_LEVEL
# - HISTORIAN_LOG_FORMAT

[compression]
# Algorithm: deadband or swinging_door
algorithm = "swinging_door"

# Maximum allowed vertical error between archived trend and discarded points
deviation = 0.5

# Longest allowed gap between archived points, in input time units (seconds
# for datetime columns). Omit for no limit.
# max_interval = 3600.0

[input]
# CSV column holding the timestamp (0-indexed)
time_column = 0

# CSV column holding the value (0-indexed)
value_column = 1

# strftime format for datetime timestamps; numeric timestamps are always accepted
time_format = "%Y-%m-%d %H:%M:%S"

# Whether the first row is a header
has_header = true

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
    use std::io::Write;

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();

        assert_eq!(config.compression.algorithm, Algorithm::SwingingDoor);
        assert_eq!(config.compression.deviation, 0.5);
        assert_eq!(config.compression.max_interval, None);
        assert_eq!(config.input.time_column, 0);
        assert_eq!(config.input.value_column, 1);
        assert!(config.input.has_header);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
[compression]
algorithm = "deadband"
max_interval = 60.0
"#,
        )
        .unwrap();

        assert_eq!(config.compression.algorithm, Algorithm::Deadband);
        assert_eq!(config.compression.deviation, 0.5);

        let engine = config.compression.engine_config();
        assert_eq!(engine.max_interval, Some(60.0));
        assert!(engine.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[compression]\ndeviation = 2.5\n\n[logging]\nformat = \"json\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.compression.deviation, 2.5);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_first_existing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let present = dir.path().join("config.toml");
        std::fs::write(&present, "[compression]\ndeviation = 1.0\n").unwrap();

        assert_eq!(first_existing([missing.clone()]), None);
        assert_eq!(
            first_existing([missing, present.clone()]),
            Some(present)
        );
    }

    #[test]
    fn test_malformed_default_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[compression]\ndeviation = \"wide\"\n").unwrap();

        let found = first_existing([path]).unwrap();
        assert!(matches!(
            Config::load_or_env(Some(&found)),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_errors() {
        let missing = Config::load(Path::new("/nonexistent/historian/config.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[compression]\nalgorithm = \"boxcar\"").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
