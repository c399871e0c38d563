//! The `LlmClient` capability: chat completion and embedding requests.

use crate::chunk::EmbeddingModel;
use crate::context::Context;
use crate::error::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One returned completion choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    /// The generated message content.
    pub content: String,
}

/// Token accounting for a chat completion call.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ChatUsage {
    /// Tokens in the generated completion.
    pub completion_tokens: u64,
    /// Total tokens (prompt + completion).
    pub total_tokens: u64,
}

/// Response from [`LlmClient::chat_completion`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// One or more completion choices; the executor uses the first
    /// choice with non-empty content.
    pub choices: Vec<ChatChoice>,
    /// Token accounting, if the provider reports it.
    pub usage: Option<ChatUsage>,
}

impl ChatResponse {
    /// The first choice with non-empty content, if any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .iter()
            .map(|c| c.content.as_str())
            .find(|c| !c.is_empty())
    }
}

/// Response from [`LlmClient::embedding`]/[`LlmClient::embedding_async`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// The embedding vector.
    pub embedding: Vec<f32>,
    /// Total tokens billed for the embedding request, if reported.
    pub total_tokens: u64,
}

/// Optional sampling parameters beyond `temperature`, all independently
/// omittable per the external interface this models.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatOptions {
    /// Nucleus sampling probability mass.
    pub top_p: Option<f32>,
    /// Number of completions to request.
    pub n: Option<u32>,
    /// Stop sequences.
    pub stop: Option<Vec<String>>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Presence penalty.
    pub presence_penalty: Option<f32>,
    /// Frequency penalty.
    pub frequency_penalty: Option<f32>,
    /// A caller-supplied identifier, forwarded to the provider for abuse
    /// tracking.
    pub user: Option<String>,
}

/// The chat-completion and embedding capability consumed by the Agent
/// Executor and the Memory Controller. Declared as an object-safe
/// `#[async_trait]` (rather than an RPITIT method) because both
/// components, and the tool handlers, need to share one `Arc<dyn LlmClient>`
/// at once — see the workspace design notes for the full rationale.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Request a chat completion over `ctx` at the given `temperature`.
    async fn chat_completion(
        &self,
        ctx: &Context,
        temperature: f32,
        options: ChatOptions,
    ) -> Result<ChatResponse, LlmError>;

    /// Request an embedding for `text` under `model`, blocking until it
    /// is available.
    async fn embedding(&self, text: &str, model: EmbeddingModel) -> Result<EmbeddingResponse, LlmError>;

    /// Request an embedding for `text` under `model` without blocking the
    /// caller on completion. The default implementation simply awaits
    /// [`LlmClient::embedding`]; implementations backed by a real async
    /// provider API may override this to submit the request without
    /// waiting for the response.
    async fn embedding_async(
        &self,
        text: &str,
        model: EmbeddingModel,
    ) -> Result<EmbeddingResponse, LlmError> {
        self.embedding(text, model).await
    }
}
