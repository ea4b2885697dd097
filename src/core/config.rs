use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

/// Configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "dangan.toml";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logger_name")]
    pub logger_name: String,
    /// Size-rotated log file; set to `None` to log to the console only
    #[serde(default = "default_log_file")]
    pub file: Option<PathBuf>,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default = "default_backup_count")]
    pub backup_count: usize,
    #[serde(default = "default_console_level")]
    pub console_level: String,
    #[serde(default = "default_file_level")]
    pub file_level: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            logger_name: default_logger_name(),
            file: default_log_file(),
            max_file_size: default_max_file_size(),
            backup_count: default_backup_count(),
            console_level: default_console_level(),
            file_level: default_file_level(),
        }
    }
}

// Default value functions
fn default_data_file() -> PathBuf {
    PathBuf::from("data.json")
}

fn default_logger_name() -> String {
    "UserManagementSystem".to_string()
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("dangan.log"))
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10 MiB
}

fn default_backup_count() -> usize {
    5
}

fn default_console_level() -> String {
    "info".to_string()
}

fn default_file_level() -> String {
    "debug".to_string()
}

impl LoggingConfig {
    pub fn console_filter(&self) -> Result<LevelFilter> {
        parse_level(&self.console_level)
    }

    pub fn file_filter(&self) -> Result<LevelFilter> {
        parse_level(&self.file_level)
    }
}

fn parse_level(level: &str) -> Result<LevelFilter> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&level) {
        bail!(
            "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
            level
        );
    }
    level
        .parse::<LevelFilter>()
        .context(format!("Failed to parse log level '{}'", level))
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
    }

    /// Load configuration from `path` if it exists, built-in defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.storage.data_file.as_os_str().is_empty() {
            bail!("data_file must not be empty");
        }

        if self.logging.logger_name.trim().is_empty() {
            bail!("logger_name must not be empty");
        }

        if let Some(file) = &self.logging.file {
            if file.as_os_str().is_empty() {
                bail!("log file path must not be empty");
            }
        }

        // A size limit with no backups would truncate the only log file on every rollover
        if self.logging.max_file_size > 0 && self.logging.backup_count == 0 {
            bail!("backup_count must be greater than 0 when max_file_size is set");
        }

        self.logging.console_filter()?;
        self.logging.file_filter()?;

        Ok(())
    }
}
