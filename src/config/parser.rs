use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the config directory
pub const CONFIG_DIR_ENV: &str = "PROMMA_CONFIG_DIR";

/// Environment variable that overrides the configured API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Name of the config file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Name of the database file inside the config directory
pub const DATABASE_FILE_NAME: &str = "promma.db";

/// Returns the config directory, creating it if needed
///
/// `$PROMMA_CONFIG_DIR` wins when set; otherwise `~/.promma` is used.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let dir = resolve_config_dir(std::env::var_os(CONFIG_DIR_ENV))?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        tracing::debug!("Created config directory {}", dir.display());
    }

    Ok(dir)
}

/// Picks the config directory from an override or the user's home directory
fn resolve_config_dir(override_dir: Option<OsString>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => {
            let base_dirs = directories::BaseDirs::new().ok_or(ConfigError::NoHomeDir)?;
            Ok(base_dirs.home_dir().join(".promma"))
        }
    }
}

/// Loads and parses a configuration file from the given path
///
/// A missing file is not an error: the defaults are returned instead.
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to read, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config = if path.exists() {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)?
    } else {
        tracing::debug!("No config file at {}, using defaults", path.display());
        Config::default()
    };

    validate(&config)?;

    Ok(config)
}

/// Loads the configuration from the config directory and applies environment overrides
///
/// # Returns
///
/// * `Ok((Config, PathBuf))` - The configuration and the config directory it came from
pub fn load_config_from_env() -> Result<(Config, PathBuf), ConfigError> {
    let dir = config_dir()?;
    let mut config = load_config(&dir.join(CONFIG_FILE_NAME))?;
    config.llm.api_key = merge_api_key(std::env::var(API_KEY_ENV).ok(), config.llm.api_key);
    Ok((config, dir))
}

/// Picks the effective API key: a non-empty environment value beats the file value
pub fn merge_api_key(env_value: Option<String>, file_value: Option<String>) -> Option<String> {
    env_value
        .filter(|k| !k.trim().is_empty())
        .or(file_value.filter(|k| !k.trim().is_empty()))
}

/// Writes the API key into the config file, keeping every other setting intact
pub fn save_api_key(path: &Path, api_key: &str) -> Result<(), ConfigError> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(ConfigError::Validation("API key cannot be empty".to_string()));
    }

    let mut document: toml::Table = if path.exists() {
        let content = std::fs::read_to_string(path)?;
        match content.parse::<toml::Table>() {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(
                    "Existing config at {} is unreadable ({}), rewriting it",
                    path.display(),
                    e
                );
                toml::Table::new()
            }
        }
    } else {
        toml::Table::new()
    };

    let llm = document
        .entry("llm")
        .or_insert(toml::Value::Table(toml::Table::new()));
    match llm {
        toml::Value::Table(table) => {
            table.insert("api-key".to_string(), toml::Value::String(api_key.to_string()));
        }
        other => {
            let mut table = toml::Table::new();
            table.insert("api-key".to_string(), toml::Value::String(api_key.to_string()));
            *other = toml::Value::Table(table);
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(&document)?)?;

    Ok(())
}

impl Config {
    /// Path of the SQLite database, relative paths resolved against the config directory
    pub fn database_path(&self, config_dir: &Path) -> PathBuf {
        match &self.storage.database_path {
            Some(path) => {
                let path = PathBuf::from(path);
                if path.is_absolute() {
                    path
                } else {
                    config_dir.join(path)
                }
            }
            None => config_dir.join(DATABASE_FILE_NAME),
        }
    }

    /// Returns the API key if one is configured
    pub fn api_key(&self) -> Option<&str> {
        self.llm.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}
