use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{LLMError, Result};

/// Authentication configuration
#[derive(Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// API key sent as a bearer token
    ApiKey { key: String },
    /// No authentication
    #[default]
    None,
}

impl AuthConfig {
    /// Read the API key from an environment variable.
    ///
    /// A missing or blank variable is a configuration error.
    pub fn from_env(env_var: &str) -> Result<Self> {
        match std::env::var(env_var) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::ApiKey { key }),
            _ => Err(LLMError::Config(format!(
                "Missing {} environment variable.",
                env_var
            ))),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthConfig::ApiKey { .. } => f.write_str("ApiKey { key: *** }"),
            AuthConfig::None => f.write_str("None"),
        }
    }
}

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider_id: String,
    pub base_url: String,
    #[serde(flatten)]
    pub auth: AuthConfig,
    /// Default model to use
    pub model: String,
    /// Transport timeout for a single request
    #[serde(with = "serde_duration", default = "default_timeout")]
    pub timeout: Duration,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl ProviderConfig {
    pub fn new(provider_id: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            base_url: base_url.into(),
            auth: AuthConfig::None,
            model: "gpt-4o-mini".to_string(),
            timeout: default_timeout(),
            headers: HashMap::new(),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.auth = AuthConfig::ApiKey { key: key.into() };
        self
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Endpoint for chat completions, tolerant of a trailing slash in `base_url`.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new("openai", "https://api.openai.com/v1")
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

mod serde_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_is_config_error() {
        let err = AuthConfig::from_env("GYAAN_TEST_DEFINITELY_UNSET_KEY").unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("GYAAN_TEST_DEFINITELY_UNSET_KEY"));
    }

    #[test]
    fn test_completions_url() {
        let config = ProviderConfig::new("openai", "http://localhost:1234/v1/");
        assert_eq!(config.completions_url(), "http://localhost:1234/v1/chat/completions");
    }

    #[test]
    fn test_debug_hides_key() {
        let config = ProviderConfig::default().with_api_key("sk-secret");
        assert!(!format!("{:?}", config).contains("sk-secret"));
    }

    #[test]
    fn test_config_serde() {
        let config = ProviderConfig::default().with_api_key("k");
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["type"], "api_key");
        assert_eq!(json["timeout"], 60);
        let back: ProviderConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.auth, AuthConfig::ApiKey { key: "k".into() });
    }
}
