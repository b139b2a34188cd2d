//! # clipix-llm
//!
//! Abstraction over hosted LLM providers, used as the assistant's last
//! resort when memory and web search have no answer.

pub mod deepseek;
pub mod mock;
pub mod provider;

pub use deepseek::DeepSeekProvider;
pub use mock::MockProvider;
pub use provider::{LlmProvider, LlmRequest, LlmResponse, Usage};
