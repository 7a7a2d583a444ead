use crate::config::{
    Config, ConfigError, ConfigResult, MAX_WORD_TARGET, MIN_WORD_TARGET, SUPPORTED_LANGUAGES,
    WORD_TARGET_STEP,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

static ENV_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// Owns the configuration file and the in-memory copy loaded from it.
#[derive(Clone)]
pub struct ConfigManager {
    path: PathBuf,
    config: Arc<RwLock<Config>>,
}

impl ConfigManager {
    /// Load the config file, writing a default one first if it does not exist.
    pub async fn load(path: &Path) -> ConfigResult<Self> {
        let config = if path.exists() {
            info!("Loading config from {:?}", path);
            Self::read_file(path).await?
        } else {
            info!("Config file not found, creating default config at {:?}", path);
            let default_config = Config::default();
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let content = serde_json::to_string_pretty(&default_config)?;
            tokio::fs::write(path, &content).await?;
            default_config
        };

        Ok(Self {
            path: path.to_path_buf(),
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// Load from `~/.gyaan/config.json`
    pub async fn load_default() -> ConfigResult<Self> {
        let config_path = crate::default_config_path()
            .ok_or_else(|| ConfigError::InvalidPath("Could not find home directory".to_string()))?;
        Self::load(&config_path).await
    }

    pub fn new(config: Config, path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(config)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Arc<RwLock<Config>> {
        Arc::clone(&self.config)
    }

    /// Clone of the current configuration.
    pub async fn snapshot(&self) -> Config {
        self.config.read().await.clone()
    }

    pub async fn save(&self) -> ConfigResult<()> {
        let config = self.config.read().await;
        let content = serde_json::to_string_pretty(&*config)?;
        drop(config);

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        info!("Config saved to {:?}", self.path);
        Ok(())
    }

    /// Re-read the file. The in-memory copy is kept if the new one is invalid.
    pub async fn reload(&self) -> ConfigResult<()> {
        if !self.path.exists() {
            return Err(ConfigError::InvalidPath(format!(
                "Config file not found: {:?}",
                self.path
            )));
        }

        let new_config = Self::read_file(&self.path).await?;

        let mut config = self.config.write().await;
        *config = new_config;
        drop(config);

        info!("Config reloaded from {:?}", self.path);
        Ok(())
    }

    /// Apply `f`, validate the result and persist it. Nothing changes on
    /// validation failure.
    pub async fn update<F>(&self, f: F) -> ConfigResult<()>
    where
        F: FnOnce(&mut Config) -> ConfigResult<()>,
    {
        let mut config = self.config.write().await;
        let mut candidate = config.clone();
        f(&mut candidate)?;
        Self::validate(&candidate)?;
        *config = candidate;
        drop(config);
        self.save().await
    }

    /// Set one dotted key and save.
    pub async fn set_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        debug!(key, value, "setting config value");
        self.update(|config| config.set_value(key, value)).await
    }

    pub fn validate(config: &Config) -> ConfigResult<()> {
        if config.llm.model.trim().is_empty() {
            return Err(ConfigError::Validation("llm.model cannot be empty".to_string()));
        }

        if config.llm.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }

        let words = config.chat.word_target;
        if !(MIN_WORD_TARGET..=MAX_WORD_TARGET).contains(&words) || words % WORD_TARGET_STEP != 0 {
            return Err(ConfigError::Validation(format!(
                "chat.word_target must be a multiple of {} between {} and {}, got {}",
                WORD_TARGET_STEP, MIN_WORD_TARGET, MAX_WORD_TARGET, words
            )));
        }

        if !SUPPORTED_LANGUAGES.contains(&config.chat.language.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Unsupported chat.language '{}', expected one of {:?}",
                config.chat.language, SUPPORTED_LANGUAGES
            )));
        }

        if config.storage.analytics_file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "storage.analytics_file cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    async fn read_file(path: &Path) -> ConfigResult<Config> {
        let content = tokio::fs::read_to_string(path).await?;
        let content = Self::expand_env_vars(&content)?;
        let config: Config = serde_json::from_str(&content)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Expand `${VAR}` and `${VAR:-default}`.
    pub fn expand_env_vars(content: &str) -> ConfigResult<String> {
        let mut result = content.to_string();

        for cap in ENV_VAR.captures_iter(content) {
            let full_match = &cap[0];
            let var_expr = &cap[1];

            let (var_name, default_value) = match var_expr.split_once(":-") {
                Some((name, default)) => (name, Some(default)),
                None => (var_expr, None),
            };

            let replacement = match (std::env::var(var_name), default_value) {
                (Ok(val), _) => val,
                (Err(_), Some(default)) => default.to_string(),
                (Err(_), None) => return Err(ConfigError::EnvVarNotFound(var_name.to_string())),
            };

            result = result.replace(full_match, &replacement);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_creates_default() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.json");

        let manager = ConfigManager::load(&config_path).await.unwrap();
        assert!(config_path.exists());
        assert_eq!(manager.snapshot().await, Config::default());
    }

    #[tokio::test]
    async fn test_load_existing_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(&config_path, r#"{"chat": {"word_target": 300}}"#).unwrap();

        let manager = ConfigManager::load(&config_path).await.unwrap();
        let config = manager.snapshot().await;
        assert_eq!(config.chat.word_target, 300);
        assert_eq!(config.llm.model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(&config_path, r#"{"chat": {"language": "fr"}}"#).unwrap();

        let result = ConfigManager::load(&config_path).await;
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[tokio::test]
    async fn test_set_value_persists() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let manager = ConfigManager::load(&config_path).await.unwrap();

        manager.set_value("chat.word_target", "150").await.unwrap();

        let reloaded = ConfigManager::load(&config_path).await.unwrap();
        assert_eq!(reloaded.snapshot().await.chat.word_target, 150);
    }

    #[tokio::test]
    async fn test_invalid_update_leaves_config_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let manager = ConfigManager::load(&config_path).await.unwrap();

        let result = manager.set_value("chat.word_target", "125").await;
        assert!(matches!(result, Err(ConfigError::Validation(_))));
        assert_eq!(manager.snapshot().await.chat.word_target, 220);
    }

    #[tokio::test]
    async fn test_reload_picks_up_edits() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let manager = ConfigManager::load(&config_path).await.unwrap();

        let mut edited = Config::default();
        edited.chat.moderation_enabled = false;
        std::fs::write(&config_path, serde_json::to_string(&edited).unwrap()).unwrap();

        manager.reload().await.unwrap();
        assert!(!manager.snapshot().await.chat.moderation_enabled);
    }

    #[test]
    fn test_expand_env_vars() {
        std::env::set_var("GYAAN_TEST_MODEL", "gpt-4o");
        let expanded = ConfigManager::expand_env_vars(
            r#"{"model": "${GYAAN_TEST_MODEL}", "dir": "${GYAAN_TEST_UNSET_DIR:-/tmp/gyaan}"}"#,
        )
        .unwrap();
        assert!(expanded.contains("\"gpt-4o\""));
        assert!(expanded.contains("/tmp/gyaan"));

        let missing = ConfigManager::expand_env_vars("${GYAAN_TEST_DEFINITELY_UNSET}");
        assert!(matches!(missing, Err(ConfigError::EnvVarNotFound(_))));
    }

    #[test]
    fn test_validate_bounds() {
        let mut config = Config::default();
        assert!(ConfigManager::validate(&config).is_ok());

        config.chat.word_target = 410;
        assert!(ConfigManager::validate(&config).is_err());

        config.chat.word_target = 120;
        config.llm.timeout_secs = 0;
        assert!(ConfigManager::validate(&config).is_err());
    }
}
