//! Subcommand handlers for the `promma` binary

pub mod ai;
pub mod digest;
pub mod history;
pub mod prompts;
pub mod serve;
pub mod settings;

use anyhow::Context as _;
use promma::config::{Config, CONFIG_FILE_NAME};
use promma::llm::GeminiClient;
use promma::storage::{open_storage, SqliteStorage};
use std::path::PathBuf;

/// Loaded configuration plus the directory it came from
pub struct Context {
    pub config: Config,
    pub config_dir: PathBuf,
}

impl Context {
    pub fn new(config: Config, config_dir: PathBuf) -> Self {
        Self { config, config_dir }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    pub fn database_path(&self) -> PathBuf {
        self.config.database_path(&self.config_dir)
    }

    /// Opens the library database, creating it on first use
    pub fn open_storage(&self) -> anyhow::Result<SqliteStorage> {
        let path = self.database_path();
        tracing::debug!("Opening database at {}", path.display());
        open_storage(&path).with_context(|| format!("failed to open database {}", path.display()))
    }

    pub fn llm(&self) -> anyhow::Result<GeminiClient> {
        GeminiClient::new(&self.config.llm).context("failed to build the Gemini client")
    }
}
