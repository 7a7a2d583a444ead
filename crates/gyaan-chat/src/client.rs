use std::sync::Arc;
use std::time::Duration;

use gyaan_config::LlmConfig;
use gyaan_llm::{AuthConfig, LLMError, LLMProvider, OpenAiProvider, ProviderConfig};
use tracing::warn;

/// Whether a completion client could be built. A missing credential is not
/// fatal: chat still moderates and logs, but every allowed turn reports the
/// reason instead of calling the model.
#[derive(Clone)]
pub enum ClientState {
    Ready(Arc<dyn LLMProvider>),
    Unavailable(String),
}

impl ClientState {
    pub fn ready(provider: impl LLMProvider + 'static) -> Self {
        ClientState::Ready(Arc::new(provider))
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        match build_provider(config) {
            Ok(provider) => ClientState::Ready(Arc::new(provider)),
            Err(e) => {
                let reason = match e {
                    LLMError::Config(message) => message,
                    other => other.to_string(),
                };
                warn!("completion client unavailable: {}", reason);
                ClientState::Unavailable(reason)
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ClientState::Ready(_))
    }
}

impl std::fmt::Debug for ClientState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientState::Ready(provider) => f.debug_tuple("Ready").field(&provider.provider_id()).finish(),
            ClientState::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

fn build_provider(config: &LlmConfig) -> gyaan_llm::Result<OpenAiProvider> {
    let auth = AuthConfig::from_env(&config.api_key_env)?;
    let provider_config = ProviderConfig::new("openai", config.base_url.clone())
        .with_auth(auth)
        .with_model(config.model.clone())
        .with_timeout(Duration::from_secs(config.timeout_secs));
    OpenAiProvider::with_config(provider_config)
}
