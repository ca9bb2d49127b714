//! Provider trait — the abstraction over the model capability.
//!
//! A Provider knows how to send a conversation to an LLM and get a response
//! back, either as a complete message or as a stream of chunks carrying
//! text deltas and incremental tool-call deltas.
//!
//! Implementations: OpenAI-compatible endpoints (OpenAI, OpenRouter, Ollama).

use crate::error::ProviderError;
use crate::message::{Message, MessageToolCall};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Configuration for a provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "anthropic/claude-sonnet-4", "gpt-4o")
    pub model: String,

    /// The conversation messages (system instructions first)
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Available tools the model can call
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

fn default_temperature() -> f32 {
    0.7
}

/// A tool definition sent to the LLM so it knows what tools it can call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// A complete (non-streaming) response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated message
    pub message: Message,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Why the model stopped emitting output.
///
/// The orchestrator only needs to distinguish "stopped to call tools" from
/// a final answer; `Length` is kept so truncation is visible in traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    ToolCalls,
    Length,
}

impl FinishReason {
    /// Map an OpenAI-style finish_reason string.
    pub fn from_api(s: &str) -> Self {
        match s {
            "tool_calls" => Self::ToolCalls,
            "length" => Self::Length,
            _ => Self::Stop,
        }
    }
}

/// An incremental fragment of a tool call within a streaming response.
///
/// The id and name arrive once (first delta for a given index); argument
/// text arrives as fragments across subsequent deltas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallDelta {
    /// Which tool call this fragment belongs to, by position
    pub index: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments_fragment: Option<String>,
}

/// A single chunk in a streaming response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Partial text content
    #[serde(default)]
    pub content: Option<String>,

    /// Partial tool call deltas
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_call_deltas: Vec<ToolCallDelta>,

    /// Why the model stopped (present on the chunk that ends generation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,

    /// Whether this is the final chunk of the transport stream
    #[serde(default)]
    pub done: bool,

    /// Usage info (typically only in the final chunk)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// The core Provider trait.
///
/// The agent step calls `stream()` without knowing which backend is in use.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openrouter").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError>;

    /// Send a request and get a stream of response chunks.
    ///
    /// Default implementation calls `complete()` and decomposes the result
    /// into the chunk sequence a streaming backend would have produced:
    /// a text chunk, one delta per tool call, and a final done chunk.
    async fn stream(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<
        tokio::sync::mpsc::Receiver<std::result::Result<StreamChunk, ProviderError>>,
        ProviderError,
    > {
        let response = self.complete(request).await?;
        // All chunks are queued before the receiver is handed back, so the
        // channel must hold the whole decomposition without blocking.
        let (tx, rx) = tokio::sync::mpsc::channel(response.message.tool_calls.len() + 2);

        let finish_reason = if response.message.tool_calls.is_empty() {
            FinishReason::Stop
        } else {
            FinishReason::ToolCalls
        };

        if !response.message.content.is_empty() {
            let _ = tx
                .send(Ok(StreamChunk {
                    content: Some(response.message.content.clone()),
                    ..StreamChunk::default()
                }))
                .await;
        }

        for (index, tc) in response.message.tool_calls.iter().enumerate() {
            let _ = tx
                .send(Ok(StreamChunk {
                    tool_call_deltas: vec![ToolCallDelta {
                        index,
                        id: Some(tc.id.clone()),
                        name: Some(tc.name.clone()),
                        arguments_fragment: Some(tc.arguments.clone()),
                    }],
                    ..StreamChunk::default()
                }))
                .await;
        }

        let _ = tx
            .send(Ok(StreamChunk {
                finish_reason: Some(finish_reason),
                done: true,
                usage: response.usage,
                ..StreamChunk::default()
            }))
            .await;

        Ok(rx)
    }

    /// Health check — can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}

/// Accumulates incremental tool call deltas into complete tool calls.
///
/// Used by consumers of `stream()` to reassemble the final assistant
/// message; indexed by the delta's call index so interleaved fragments
/// land in the right call.
#[derive(Debug, Default)]
pub struct ToolCallAccumulator {
    calls: Vec<PartialToolCall>,
}

#[derive(Debug, Default)]
struct PartialToolCall {
    id: String,
    name: String,
    arguments: String,
}

impl ToolCallAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one delta into the accumulator.
    pub fn apply(&mut self, delta: &ToolCallDelta) {
        if delta.index >= self.calls.len() {
            self.calls
                .resize_with(delta.index + 1, PartialToolCall::default);
        }
        let call = &mut self.calls[delta.index];
        if let Some(id) = &delta.id {
            call.id = id.clone();
        }
        if let Some(name) = &delta.name {
            call.name = name.clone();
        }
        if let Some(fragment) = &delta.arguments_fragment {
            call.arguments.push_str(fragment);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Finish accumulation, yielding calls in index order.
    pub fn into_tool_calls(self) -> Vec<MessageToolCall> {
        self.calls
            .into_iter()
            .map(|c| MessageToolCall {
                id: c.id,
                name: c.name,
                arguments: c.arguments,
            })
            .collect()
    }
}
