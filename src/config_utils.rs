//! Configuration file utilities
//!
//! Provides the client configuration and helpers for reading and writing it.
//! Config files are stored in the platform-specific config directory under
//! "oed-csv-uploader/".

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

const APP_DIR_NAME: &str = "oed-csv-uploader";

/// File the client configuration is read from
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const API_HOST_ENV: &str = "OED_API_HOST";
pub const API_TOKEN_ENV: &str = "OED_API_TOKEN";

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Settings for talking to an OED server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// Sent as the `token` header when present
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load the configuration.
    ///
    /// Priority: environment variable > config file > built-in default.
    pub fn load() -> Result<Self, String> {
        let config = load_config_file::<ClientConfig>(CONFIG_FILE_NAME)?.unwrap_or_default();
        Ok(config.with_env_overrides(|key| env::var(key).ok()))
    }

    /// Apply overrides looked up through `lookup` (normally the process env).
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(API_HOST_ENV).filter(|h| !h.is_empty()) {
            self.base_url = host;
        }
        if let Some(token) = lookup(API_TOKEN_ENV).filter(|t| !t.is_empty()) {
            self.token = Some(token);
        }
        self
    }
}

/// Get the app's config directory path.
///
/// Returns: `~/.config/oed-csv-uploader` (Linux)
///          `~/Library/Application Support/oed-csv-uploader` (macOS)
///          `C:\Users\<User>\AppData\Roaming\oed-csv-uploader` (Windows)
pub fn get_config_dir() -> Result<PathBuf, String> {
    let config_dir = dirs::config_dir()
        .ok_or("Could not find config directory")?;
    Ok(config_dir.join(APP_DIR_NAME))
}

/// Get the directory where debug reports and log files are written.
///
/// Returns: `~/.oed-csv-uploader/logs`
pub fn get_logs_dir() -> Result<PathBuf, String> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| "Could not find home directory".to_string())?;
    Ok(home_dir.join(format!(".{}", APP_DIR_NAME)).join("logs"))
}

/// Get the full path to a config file.
pub fn config_file_path(filename: &str) -> Result<PathBuf, String> {
    Ok(get_config_dir()?.join(filename))
}

/// Save data to a config file as JSON, returning where it was written.
pub fn save_config_file<T: Serialize>(filename: &str, data: &T) -> Result<PathBuf, String> {
    let config_dir = get_config_dir()?;
    fs::create_dir_all(&config_dir)
        .map_err(|e| format!("Failed to create config directory: {}", e))?;
    write_json(config_dir.join(filename), data)
}

/// Load data from a config file.
///
/// # Returns
/// * `Ok(Some(data))` if file exists and was parsed successfully
/// * `Ok(None)` if file doesn't exist
/// * `Err(...)` if file exists but couldn't be read/parsed
pub fn load_config_file<T: DeserializeOwned>(filename: &str) -> Result<Option<T>, String> {
    read_json(config_file_path(filename)?)
}

fn write_json<T: Serialize>(path: PathBuf, data: &T) -> Result<PathBuf, String> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(&path, json)
        .map_err(|e| format!("Failed to write config file: {}", e))?;
    Ok(path)
}

fn read_json<T: DeserializeOwned>(path: PathBuf) -> Result<Option<T>, String> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read config file: {}", e))?;

    let data = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config file: {}", e))?;

    Ok(Some(data))
}
