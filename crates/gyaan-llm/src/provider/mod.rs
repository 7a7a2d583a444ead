pub mod base;
pub mod config;

pub use base::BaseProvider;
pub use config::{AuthConfig, ProviderConfig};

use async_trait::async_trait;
use gyaan_core::chat::{ChatRequest, ChatResponse};

use crate::error::Result;

/// A hosted completion service.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    fn provider_id(&self) -> &str;

    fn metadata(&self) -> &ProviderMetadata;

    /// Send a chat request and get a complete response
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;
}

/// Provider metadata
#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub id: String,
    /// Human-readable name
    pub name: String,
}

impl ProviderMetadata {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
