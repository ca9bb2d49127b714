//! Turn-level streaming events.
//!
//! `AgentStreamEvent` multiplexes everything a turn produces — model text,
//! incremental tool-call fragments, tool results, and terminal markers —
//! into one ordered sequence a presenter can render incrementally.

use scout_core::provider::FinishReason;
use serde::{Deserialize, Serialize};

/// The sending half of a turn's event channel.
pub type EventSender = tokio::sync::mpsc::Sender<AgentStreamEvent>;

/// Events emitted while a turn executes, in arrival order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentStreamEvent {
    /// Partial text from the model.
    TextDelta { content: String },

    /// The model started a tool call (name arrives once per call index).
    ToolCallStarted { index: usize, name: String },

    /// An incremental fragment of a tool call's argument text.
    ToolCallArgsDelta { index: usize, fragment: String },

    /// One model invocation finished, with why it stopped.
    ModelFinished { reason: FinishReason },

    /// A tool finished executing (originates from the tools state).
    ToolResult {
        id: String,
        name: String,
        content: String,
        ok: bool,
    },

    /// The turn is complete — final metadata.
    Done {
        thread_id: String,
        transitions: u32,
        tool_calls_made: usize,
        error_count: u32,
    },

    /// The turn failed with a non-tool error.
    Error { message: String },
}

impl AgentStreamEvent {
    /// Stable event name for this event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TextDelta { .. } => "text_delta",
            Self::ToolCallStarted { .. } => "tool_call_started",
            Self::ToolCallArgsDelta { .. } => "tool_call_args_delta",
            Self::ModelFinished { .. } => "model_finished",
            Self::ToolResult { .. } => "tool_result",
            Self::Done { .. } => "done",
            Self::Error { .. } => "error",
        }
    }
}

/// Send an event if a channel is attached, ignoring a dropped receiver.
pub(crate) async fn emit(events: Option<&EventSender>, event: AgentStreamEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event).await;
    }
}
