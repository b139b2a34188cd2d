use async_trait::async_trait;
use clipix_core::{ClipixError, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::provider::*;

/// DeepSeek chat completions. The API is OpenAI-compatible, so any such
/// endpoint works through [`with_base_url`](DeepSeekProvider::with_base_url).
pub struct DeepSeekProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout_secs: u64,
}

impl DeepSeekProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_timeout(api_key, 15)
    }

    pub fn with_timeout(api_key: String, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "http client setup failed, using per-request timeouts only");
                reqwest::Client::new()
            });
        Self {
            client,
            api_key,
            base_url: "https://api.deepseek.com/v1".into(),
            timeout_secs,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Build the JSON body of a chat completions call.
pub fn request_body(request: &LlmRequest) -> serde_json::Value {
    serde_json::json!({
        "model": &request.model,
        "messages": [{ "role": "user", "content": &request.prompt }],
        "max_tokens": request.max_tokens,
        "temperature": request.temperature,
    })
}

/// Extract the reply from a chat completions response.
pub fn parse_response(data: &serde_json::Value) -> Result<LlmResponse> {
    let text = data["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| ClipixError::Llm("response has no message content".into()))?
        .to_string();

    let usage = &data["usage"];
    Ok(LlmResponse {
        text,
        usage: Usage {
            input_tokens: usage["prompt_tokens"].as_u64().unwrap_or(0) as u32,
            output_tokens: usage["completion_tokens"].as_u64().unwrap_or(0) as u32,
        },
    })
}

#[async_trait]
impl LlmProvider for DeepSeekProvider {
    fn name(&self) -> &str {
        "deepseek"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        info!(model = %request.model, "asking llm");

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body(request))
            .timeout(Duration::from_secs(self.timeout_secs))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClipixError::Timeout {
                        service: "deepseek".into(),
                        secs: self.timeout_secs,
                    }
                } else {
                    ClipixError::Llm(e.to_string())
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(ClipixError::Llm(format!("HTTP {status}: {text}")));
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ClipixError::Llm(e.to_string()))?;

        let response = parse_response(&data)?;
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "llm response"
        );
        Ok(response)
    }
}
