use async_trait::async_trait;
use gyaan_core::chat::{ChatRequest, ChatResponse};

use crate::error::Result;
use crate::provider::{AuthConfig, BaseProvider, LLMProvider, ProviderConfig, ProviderMetadata};
use crate::transformer::OpenAiTransformer;

/// OpenAI API or any compatible endpoint
pub struct OpenAiProvider {
    base: BaseProvider<OpenAiTransformer>,
}

impl OpenAiProvider {
    pub fn with_config(config: ProviderConfig) -> Result<Self> {
        let metadata = ProviderMetadata::new(config.provider_id.clone(), "OpenAI");
        let base = BaseProvider::new(config, OpenAiTransformer::new(), metadata)?;
        Ok(Self { base })
    }

    /// Create a provider for the public OpenAI API
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ProviderConfig::default().with_api_key(api_key))
    }

    /// Create with custom base URL (Azure or other compatible APIs)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(ProviderConfig::new("openai", base_url).with_api_key(api_key))
    }

    /// Create a provider whose key comes from `env_var`.
    ///
    /// Fails with a config error when the variable is unset.
    pub fn from_env(base_url: impl Into<String>, env_var: &str) -> Result<Self> {
        let auth = AuthConfig::from_env(env_var)?;
        Self::with_config(ProviderConfig::new("openai", base_url).with_auth(auth))
    }

    pub fn config(&self) -> &ProviderConfig {
        self.base.config()
    }
}

#[async_trait]
impl LLMProvider for OpenAiProvider {
    fn provider_id(&self) -> &str {
        self.base.provider_id()
    }

    fn metadata(&self) -> &ProviderMetadata {
        &self.base.metadata
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.base.chat(request).await
    }
}
