pub mod config;
pub mod manager;

pub use config::{
    ChatConfig, Config, ConfigError, ConfigResult, LlmConfig, LogLevel, LoggingConfig,
    StorageConfig, MAX_WORD_TARGET, MIN_WORD_TARGET, SUPPORTED_LANGUAGES, WORD_TARGET_STEP,
};
pub use manager::ConfigManager;

use std::path::PathBuf;

/// `~/.gyaan`
pub fn gyaan_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".gyaan"))
}

pub fn default_config_path() -> Option<PathBuf> {
    gyaan_dir().map(|dir| dir.join("config.json"))
}

/// Expand a leading `~/` to the home directory.
pub fn expand_tilde(path: &str) -> Option<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None if path == "~" => dirs::home_dir(),
        None => Some(PathBuf::from(path)),
    }
}

impl StorageConfig {
    /// Full path of the analytics log, with `~` expanded.
    pub fn analytics_path(&self) -> ConfigResult<PathBuf> {
        let dir = expand_tilde(&self.data_dir)
            .ok_or_else(|| ConfigError::InvalidPath(self.data_dir.clone()))?;
        Ok(dir.join(&self.analytics_file))
    }
}
