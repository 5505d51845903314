use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};

// =============================================================================
// Defaults
// =============================================================================

/// Version of the running core, checked by the registration compatibility gate
pub const DEFAULT_CORE_VERSION: &str = "1.0.0";

/// Timeout for fetch operations in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Default User-Agent header for descriptor requests
pub const DEFAULT_USER_AGENT: &str = concat!("modcheck/", env!("CARGO_PKG_VERSION"));

/// Default log level when RUST_LOG is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub registry: RegistryConfig,
    pub fetch: FetchConfig,
    pub log: LogConfig,
}

/// Registration and check behaviour
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistryConfig {
    pub core_version: String,
    /// When false every registration is refused
    pub enable_api: bool,
    /// Check pre-existing update sources when a component registers
    pub auto_check_updates: bool,
    /// When false checks never reach the network
    pub allow_remote_checks: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            core_version: DEFAULT_CORE_VERSION.to_string(),
            enable_api: true,
            auto_check_updates: true,
            allow_remote_checks: true,
        }
    }
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FetchConfig {
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: FETCH_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LogConfig {
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
    /// Write a daily-rolling log file here instead of stderr
    pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json: false,
            directory: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults when it is missing.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns the path to the data directory for modcheck.
/// Uses $XDG_DATA_HOME/modcheck if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/modcheck,
/// or ./modcheck if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the default config file.
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("modcheck")
}
