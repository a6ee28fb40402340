use lacto_core::ledger::PageSize;
use lacto_core::{FermentStatus, LedgerConfig, StatusPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the stored ferment collection
    pub data_dir: ConfigValue<PathBuf>,
    pub storage_key: ConfigValue<String>,
    pub status_policy: ConfigValue<StatusPolicy>,
    pub page_size: ConfigValue<PageSize>,
    /// Status filter for `ferment list`; `None` lists everything
    pub status_filter: ConfigValue<Option<FermentStatus>>,
    /// Link appended to shared ferment summaries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    share_url: Option<String>,
    ledger: LedgerSection,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct LedgerSection {
    storage_key: Option<String>,
    status_policy: Option<StatusPolicy>,
    page_size: Option<PageSize>,
    /// A status name, or `all`
    status_filter: Option<String>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let defaults = LedgerConfig::default();

        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut storage_key = ConfigValue::new(defaults.storage_key, ConfigSource::Default);
        let mut status_policy = ConfigValue::new(defaults.status_policy, ConfigSource::Default);
        let mut page_size = ConfigValue::new(defaults.page_size, ConfigSource::Default);
        let mut status_filter = ConfigValue::new(defaults.status_filter, ConfigSource::Default);
        let mut share_url = None;
        let mut config_file = None;

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            share_url = file_config.share_url;

            let ledger = file_config.ledger;
            if let Some(key) = ledger.storage_key {
                storage_key = ConfigValue::new(key, ConfigSource::File);
            }
            if let Some(policy) = ledger.status_policy {
                status_policy = ConfigValue::new(policy, ConfigSource::File);
            }
            if let Some(size) = ledger.page_size {
                page_size = ConfigValue::new(size, ConfigSource::File);
            }
            if let Some(filter) = ledger.status_filter {
                let parsed = parse_status_filter(&filter)
                    .map_err(|e| ConfigError::InvalidValue("ledger.status_filter", e))?;
                status_filter = ConfigValue::new(parsed, ConfigSource::File);
            }
        }

        if let Ok(dir) = std::env::var("LACTO_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(policy) = std::env::var("LACTO_STATUS_POLICY") {
            let parsed = policy
                .parse()
                .map_err(|e| ConfigError::InvalidValue("LACTO_STATUS_POLICY", e))?;
            status_policy = ConfigValue::new(parsed, ConfigSource::Environment);
        }
        if let Ok(size) = std::env::var("LACTO_PAGE_SIZE") {
            let parsed = size
                .parse()
                .map_err(|e| ConfigError::InvalidValue("LACTO_PAGE_SIZE", e))?;
            page_size = ConfigValue::new(parsed, ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("LACTO_SHARE_URL") {
            share_url = Some(url);
        }

        Ok(Self {
            data_dir,
            storage_key,
            status_policy,
            page_size,
            status_filter,
            share_url,
            config_file,
        })
    }

    /// Settings handed to the ferment ledger.
    pub fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig {
            storage_key: self.storage_key.value.clone(),
            status_policy: self.status_policy.value,
            page_size: self.page_size.value,
            status_filter: self.status_filter.value,
        }
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/lacto/
    /// - macOS: ~/Library/Application Support/lacto/
    /// - Windows: %APPDATA%/lacto/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lacto")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/lacto/
    /// - macOS: ~/Library/Application Support/lacto/
    /// - Windows: %APPDATA%/lacto/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lacto")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }

    /// File the ferment collection is stored in.
    pub fn data_file(&self) -> PathBuf {
        self.data_dir
            .value
            .join(format!("{}.json", self.storage_key.value))
    }
}

/// Parses a status filter value; `all` (or empty) disables the filter.
pub fn parse_status_filter(value: &str) -> Result<Option<FermentStatus>, String> {
    match value.trim().to_lowercase().as_str() {
        "" | "all" => Ok(None),
        other => other.parse().map(Some),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(key, e) => {
                write!(f, "Invalid value for {}: {}", key, e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Starter config written by `lacto config init`.
pub const DEFAULT_CONFIG_YAML: &str = r#"# lacto configuration

# Directory for the ferment log (default: platform data dir + /lacto)
# data_dir: ~/.local/share/lacto

# Link appended to shared ferment summaries
# share_url: https://example.com

ledger:
  # snapshot: keep the status computed when a ferment was logged
  # live: recompute it from the dates every time the list is shown
  status_policy: snapshot
  # 10, 20, 30, 40 or 50
  page_size: 10
  # planned, active, complete or all
  status_filter: active
"#;

pub fn write_default_config(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, DEFAULT_CONFIG_YAML)
}
