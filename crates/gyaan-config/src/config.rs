use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Languages the persona and UI strings are written for.
pub const SUPPORTED_LANGUAGES: &[&str] = &["en"];

pub const MIN_WORD_TARGET: u32 = 120;
pub const MAX_WORD_TARGET: u32 = 400;
pub const WORD_TARGET_STEP: u32 = 10;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub version: String,
    pub llm: LlmConfig,
    pub chat: ChatConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            llm: LlmConfig::default(),
            chat: ChatConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Read a value by dotted key, e.g. `chat.word_target`.
    pub fn get_value(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["version"] => Some(self.version.clone()),
            ["llm", "base_url"] => Some(self.llm.base_url.clone()),
            ["llm", "model"] => Some(self.llm.model.clone()),
            ["llm", "api_key_env"] => Some(self.llm.api_key_env.clone()),
            ["llm", "timeout_secs"] => Some(self.llm.timeout_secs.to_string()),
            ["chat", "language"] => Some(self.chat.language.clone()),
            ["chat", "word_target"] => Some(self.chat.word_target.to_string()),
            ["chat", "moderation_enabled"] => Some(self.chat.moderation_enabled.to_string()),
            ["chat", "always_add_practice"] => Some(self.chat.always_add_practice.to_string()),
            ["chat", "daily_reflection"] => Some(self.chat.daily_reflection.to_string()),
            ["storage", "data_dir"] => Some(self.storage.data_dir.clone()),
            ["storage", "analytics_file"] => Some(self.storage.analytics_file.clone()),
            ["logging", "level"] => Some(self.logging.level.to_string()),
            ["logging", "file"] => self.logging.file.clone(),
            ["logging", "json_format"] => Some(self.logging.json_format.to_string()),
            _ => None,
        }
    }

    /// Set a value by dotted key. Only parses; range checks live in
    /// [`crate::ConfigManager::validate`].
    pub fn set_value(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["llm", "base_url"] => self.llm.base_url = value.to_string(),
            ["llm", "model"] => self.llm.model = value.to_string(),
            ["llm", "api_key_env"] => self.llm.api_key_env = value.to_string(),
            ["llm", "timeout_secs"] => self.llm.timeout_secs = parse(value, "number")?,
            ["chat", "language"] => self.chat.language = value.to_string(),
            ["chat", "word_target"] => self.chat.word_target = parse(value, "number")?,
            ["chat", "moderation_enabled"] => {
                self.chat.moderation_enabled = parse(value, "boolean")?
            }
            ["chat", "always_add_practice"] => {
                self.chat.always_add_practice = parse(value, "boolean")?
            }
            ["chat", "daily_reflection"] => self.chat.daily_reflection = parse(value, "boolean")?,
            ["storage", "data_dir"] => self.storage.data_dir = value.to_string(),
            ["storage", "analytics_file"] => self.storage.analytics_file = value.to_string(),
            ["logging", "level"] => self.logging.level = value.parse()?,
            ["logging", "file"] => self.logging.file = Some(value.to_string()),
            ["logging", "json_format"] => self.logging.json_format = parse(value, "boolean")?,
            _ => return Err(ConfigError::KeyNotFound(key.to_string())),
        }
        Ok(())
    }
}

fn parse<T: std::str::FromStr>(value: &str, kind: &str) -> ConfigResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Validation(format!("Invalid {}: {}", kind, value)))
}

/// Completion service settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Per-turn chat behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChatConfig {
    pub language: String,
    pub word_target: u32,
    pub moderation_enabled: bool,
    /// Ask for, and if missing append, a short micro-practice
    pub always_add_practice: bool,
    /// Show the one-minute reflection before chatting
    pub daily_reflection: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            word_target: 220,
            moderation_enabled: true,
            always_add_practice: true,
            daily_reflection: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub analytics_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.gyaan/data".to_string(),
            analytics_file: "analytics.jsonl".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub file: Option<String>,
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            file: None,
            json_format: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::Validation(format!("Invalid log level: {}", s))),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.chat.word_target, 220);
        assert!(config.chat.moderation_enabled);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_get_set_value() {
        let mut config = Config::default();
        config.set_value("chat.word_target", "300").unwrap();
        config.set_value("llm.model", "gpt-4o").unwrap();
        config.set_value("logging.level", "WARNING").unwrap();

        assert_eq!(config.get_value("chat.word_target").as_deref(), Some("300"));
        assert_eq!(config.get_value("llm.model").as_deref(), Some("gpt-4o"));
        assert_eq!(config.get_value("logging.level").as_deref(), Some("warn"));
        assert_eq!(config.get_value("logging.file"), None);
    }

    #[test]
    fn test_set_value_errors() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_value("chat.word_target", "many"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            config.set_value("server.port", "80"),
            Err(ConfigError::KeyNotFound(_))
        ));
    }

    #[test]
    fn test_sampling_keys_are_not_configurable() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_value("llm.temperature", "1.9"),
            Err(ConfigError::KeyNotFound(_))
        ));
        assert!(matches!(
            config.set_value("llm.max_tokens", "4096"),
            Err(ConfigError::KeyNotFound(_))
        ));
        assert_eq!(config.get_value("llm.temperature"), None);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"chat": {"word_target": 150}}"#).unwrap();
        assert_eq!(config.chat.word_target, 150);
        assert_eq!(config.chat.language, "en");
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
    }
}
