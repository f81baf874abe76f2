//! Configuration module for Promma
//!
//! This module handles locating, loading, validating and updating the TOML
//! configuration file that lives in the config directory.
//!
//! # Example
//!
//! ```no_run
//! use promma::config::load_config_from_env;
//!
//! let (config, dir) = load_config_from_env().unwrap();
//! println!("Database: {}", config.database_path(&dir).display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, DigestConfig, LlmConfig, ServerConfig, StorageConfig, DEFAULT_BASE_URL,
    DEFAULT_MAX_CONTENT_CHARS, DEFAULT_MODEL, DEFAULT_SINGLE_PAGE_MAX_CONTENT_CHARS,
};

// Re-export parser functions
pub use parser::{
    config_dir, load_config, load_config_from_env, merge_api_key, save_api_key, API_KEY_ENV,
    CONFIG_DIR_ENV, CONFIG_FILE_NAME, DATABASE_FILE_NAME,
};
