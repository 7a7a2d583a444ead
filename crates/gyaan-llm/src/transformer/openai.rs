use gyaan_core::chat::{ChatRequest, ChatResponse, ChatUsage, FinishReason};
use gyaan_core::types::{Message, Role};
use serde_json::{json, Value};

use crate::error::ConversionError;
use crate::transformer::SchemaTransformer;

/// OpenAI-compatible schema transformer
#[derive(Debug, Clone, Default)]
pub struct OpenAiTransformer;

impl OpenAiTransformer {
    pub fn new() -> Self {
        Self
    }

    fn convert_message(&self, msg: &Message) -> Value {
        json!({
            "role": msg.role.as_str(),
            "content": msg.content,
        })
    }

    fn convert_finish_reason(&self, reason: Option<&str>) -> FinishReason {
        match reason {
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            _ => FinishReason::Stop,
        }
    }
}

impl SchemaTransformer for OpenAiTransformer {
    fn provider_id(&self) -> &str {
        "openai"
    }

    fn transform_request(&self, request: &ChatRequest) -> Result<Value, ConversionError> {
        if request.model.is_empty() {
            return Err(ConversionError::MissingField("model".to_string()));
        }

        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m| self.convert_message(m))
            .collect();

        let mut body = json!({
            "model": request.model,
            "messages": messages,
        });

        if let Some(temp) = request.options.temperature {
            body["temperature"] = json!(temp);
        }

        if let Some(max_tokens) = request.options.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        Ok(body)
    }

    fn parse_response(&self, data: &Value) -> Result<ChatResponse, ConversionError> {
        let id = data["id"].as_str().unwrap_or_default().to_string();
        let model = data["model"].as_str().unwrap_or_default().to_string();

        let choice = data["choices"]
            .get(0)
            .ok_or_else(|| ConversionError::MissingField("choices".to_string()))?;

        let message_data = &choice["message"];
        let role = message_data["role"]
            .as_str()
            .and_then(|r| r.parse::<Role>().ok())
            .unwrap_or(Role::Assistant);

        let content = match &message_data["content"] {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => {
                return Err(ConversionError::InvalidFormat(format!(
                    "message content is not text: {}",
                    other
                )))
            }
        };

        let usage_data = data.get("usage");
        let token = |key: &str| {
            usage_data
                .and_then(|u| u[key].as_u64())
                .map_or(0, |n| u32::try_from(n).unwrap_or(u32::MAX))
        };
        let usage = ChatUsage {
            input_tokens: token("prompt_tokens"),
            output_tokens: token("completion_tokens"),
            total_tokens: token("total_tokens"),
        };

        let finish_reason = self.convert_finish_reason(choice["finish_reason"].as_str());

        Ok(ChatResponse::new(id, model, Message::new(role, content))
            .with_usage(usage)
            .with_finish_reason(finish_reason))
    }
}
