//! Mock LLM provider for deterministic testing.
//!
//! Returns pre-configured responses without making any HTTP calls.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::provider::*;
use clipix_core::{ClipixError, Result};

/// A mock LLM provider that returns pre-configured responses.
///
/// # Example
/// ```
/// use clipix_llm::mock::MockProvider;
/// let provider = MockProvider::new("test")
///     .with_response("Hello, world!");
/// ```
pub struct MockProvider {
    responses: Arc<Mutex<Vec<MockResponse>>>,
    /// Track all requests received (for assertions in tests).
    pub requests: Arc<Mutex<Vec<LlmRequest>>>,
    name: String,
}

/// A pre-configured response from the mock provider.
#[derive(Clone, Default)]
pub struct MockResponse {
    pub text: String,
    /// If set, the provider will return this error instead.
    pub error: Option<String>,
}

impl MockResponse {
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn error(msg: &str) -> Self {
        Self {
            error: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(vec![])),
            requests: Arc::new(Mutex::new(vec![])),
            name: name.into(),
        }
    }

    /// Queue a text response.
    pub fn with_response(self, text: &str) -> Self {
        self.responses.lock().push(MockResponse::text(text));
        self
    }

    /// Queue an error response.
    pub fn with_error(self, error: &str) -> Self {
        self.responses.lock().push(MockResponse::error(error));
        self
    }

    /// Get all requests that were made to this provider.
    pub fn recorded_requests(&self) -> Arc<Mutex<Vec<LlmRequest>>> {
        Arc::clone(&self.requests)
    }

    /// Pop the next queued response, or a default "no response queued" message.
    fn next_response(&self) -> MockResponse {
        let mut responses = self.responses.lock();
        if responses.is_empty() {
            MockResponse::text("(mock: no more queued responses)")
        } else {
            responses.remove(0)
        }
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        self.requests.lock().push(request.clone());
        let mock = self.next_response();

        if let Some(error) = mock.error {
            return Err(ClipixError::Llm(error));
        }

        Ok(LlmResponse {
            text: mock.text,
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
            },
        })
    }
}
