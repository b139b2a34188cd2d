use async_trait::async_trait;
use clipix_core::Result;
use serde::{Deserialize, Serialize};

/// A single-turn request to an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// Provider-specific model name, e.g. "deepseek-chat".
    pub model: String,
    /// The user's question, sent as-is.
    pub prompt: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    pub temperature: f32,
}

impl LlmRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

/// A complete response from an LLM.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub usage: Usage,
}

/// Token usage statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl Usage {
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Trait implemented by each LLM provider.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable name, e.g. "deepseek".
    fn name(&self) -> &str;

    /// Send a non-streaming request.
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse>;
}
