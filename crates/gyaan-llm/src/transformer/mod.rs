pub mod openai;

pub use openai::OpenAiTransformer;

use gyaan_core::chat::{ChatRequest, ChatResponse};
use serde_json::Value;

use crate::error::ConversionError;

/// Converts between internal chat types and a provider's wire format
pub trait SchemaTransformer: Send + Sync {
    fn provider_id(&self) -> &str;

    /// Transform request to provider-specific format
    fn transform_request(&self, request: &ChatRequest) -> Result<Value, ConversionError>;

    /// Parse a complete (non-streaming) response
    fn parse_response(&self, data: &Value) -> Result<ChatResponse, ConversionError>;
}
