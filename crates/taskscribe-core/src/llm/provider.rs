//! LlmProvider trait definition.
//!
//! Uses native async fn in traits (RPITIT, Rust 2024 edition). Only the
//! non-streaming completion call is needed: the summarizer waits for the whole
//! structured reply before parsing it.

use taskscribe_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends.
///
/// Implementations live in taskscribe-infra (e.g., `AnthropicProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "anthropic").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
