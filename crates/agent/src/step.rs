//! The agent step — one model consultation, breaker included.
//!
//! Decides whether the model gets called at all: a fresh human turn always
//! earns a model response; a continuation turn first settles the failure
//! account and short-circuits to the fixed terminal message once the
//! breaker threshold is reached. No console I/O happens here — rendering
//! is the presenter's job, so the step stays testable headlessly.

use crate::failure::{self, BREAKER_MESSAGE};
use crate::stream_event::{AgentStreamEvent, EventSender, emit};
use chrono::Utc;
use scout_core::error::Error;
use scout_core::event::{DomainEvent, EventBus};
use scout_core::message::{Message, ThreadId};
use scout_core::provider::{Provider, ProviderRequest, ToolCallAccumulator, ToolDefinition};
use scout_core::state::AgentState;
use std::sync::Arc;
use tracing::{debug, warn};

/// The outcome of one agent step.
pub struct StepOutcome {
    /// The new assistant message (model response or breaker terminal).
    pub message: Message,
    /// The updated consecutive-failure count.
    pub error_count: u32,
}

/// Assembles model input and produces the next assistant message.
pub struct AgentStep {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    system_prompt: String,
    tool_definitions: Vec<ToolDefinition>,
    event_bus: Arc<EventBus>,
}

impl AgentStep {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        system_prompt: impl Into<String>,
        tool_definitions: Vec<ToolDefinition>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            system_prompt: system_prompt.into(),
            tool_definitions,
            event_bus,
        }
    }

    /// Set the default max tokens per model response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Run one step against the current state.
    pub async fn step(
        &self,
        thread_id: &ThreadId,
        state: &AgentState,
        events: Option<&EventSender>,
    ) -> Result<StepOutcome, Error> {
        // Fresh human turn: full reset, straight to the model. A human
        // message always earns a response attempt regardless of prior
        // error state.
        if state.awaiting_response() {
            let message = self.call_model(thread_id, state, events).await?;
            return Ok(StepOutcome {
                message,
                error_count: 0,
            });
        }

        // Continuation turn: settle the failure account first.
        let error_count = failure::next_error_count(&state.messages, state.error_count);
        if failure::breaker_tripped(error_count) {
            warn!(
                thread = %thread_id,
                error_count,
                "Tool-failure breaker tripped, skipping model call"
            );
            self.event_bus.publish(DomainEvent::BreakerTripped {
                thread_id: thread_id.to_string(),
                error_count,
                timestamp: Utc::now(),
            });
            emit(
                events,
                AgentStreamEvent::TextDelta {
                    content: BREAKER_MESSAGE.to_string(),
                },
            )
            .await;
            return Ok(StepOutcome {
                message: Message::assistant(BREAKER_MESSAGE),
                error_count,
            });
        }

        let message = self.call_model(thread_id, state, events).await?;
        Ok(StepOutcome {
            message,
            error_count,
        })
    }

    /// Stream one model invocation, forwarding deltas as events and
    /// aggregating them into the complete assistant message.
    async fn call_model(
        &self,
        thread_id: &ThreadId,
        state: &AgentState,
        events: Option<&EventSender>,
    ) -> Result<Message, Error> {
        let mut messages = Vec::with_capacity(state.messages.len() + 1);
        messages.push(Message::system(&self.system_prompt));
        messages.extend(state.messages.iter().cloned());

        let request = ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools: self.tool_definitions.clone(),
        };

        debug!(thread = %thread_id, model = %self.model, "Invoking model");
        let mut rx = self.provider.stream(request).await.map_err(Error::Provider)?;

        let mut content = String::new();
        let mut accumulator = ToolCallAccumulator::new();
        let mut usage = None;

        while let Some(chunk) = rx.recv().await {
            let chunk = chunk.map_err(Error::Provider)?;

            if let Some(text) = &chunk.content
                && !text.is_empty()
            {
                content.push_str(text);
                emit(
                    events,
                    AgentStreamEvent::TextDelta {
                        content: text.clone(),
                    },
                )
                .await;
            }

            for delta in &chunk.tool_call_deltas {
                if let Some(name) = &delta.name {
                    emit(
                        events,
                        AgentStreamEvent::ToolCallStarted {
                            index: delta.index,
                            name: name.clone(),
                        },
                    )
                    .await;
                }
                if let Some(fragment) = &delta.arguments_fragment
                    && !fragment.is_empty()
                {
                    emit(
                        events,
                        AgentStreamEvent::ToolCallArgsDelta {
                            index: delta.index,
                            fragment: fragment.clone(),
                        },
                    )
                    .await;
                }
                accumulator.apply(delta);
            }

            if let Some(reason) = chunk.finish_reason {
                emit(events, AgentStreamEvent::ModelFinished { reason }).await;
            }

            if chunk.usage.is_some() {
                usage = chunk.usage;
            }
        }

        if let Some(usage) = usage {
            self.event_bus.publish(DomainEvent::ResponseGenerated {
                thread_id: thread_id.to_string(),
                model: self.model.clone(),
                tokens_used: usage.total_tokens,
                timestamp: Utc::now(),
            });
        }

        Ok(Message::assistant_with_tool_calls(
            content,
            accumulator.into_tool_calls(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use scout_core::error::ProviderError;
    use scout_core::message::MessageToolCall;
    use scout_core::provider::ProviderResponse;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A provider that returns a fixed message and counts invocations.
    struct CountingProvider {
        message: Message,
        calls: AtomicUsize,
    }

    impl CountingProvider {
        fn text(content: &str) -> Self {
            Self {
                message: Message::assistant(content),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Provider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ProviderResponse {
                message: self.message.clone(),
                usage: None,
                model: "mock-model".into(),
            })
        }
    }

    fn step_with(provider: Arc<CountingProvider>) -> AgentStep {
        AgentStep::new(
            provider,
            "mock-model",
            0.7,
            "You are a test agent.",
            vec![],
            Arc::new(EventBus::default()),
        )
    }

    fn failing_tool_state(failures: u32, previous: u32) -> AgentState {
        let mut state = AgentState::new();
        state.append_human(Message::user("go"));
        state.push(Message::assistant_with_tool_calls(
            "",
            (0..failures)
                .map(|i| MessageToolCall {
                    id: format!("call_{i}"),
                    name: "read_file".into(),
                    arguments: "{}".into(),
                })
                .collect(),
        ));
        for i in 0..failures {
            state.push(Message::tool_result(
                format!("call_{i}"),
                "read_file",
                "Error: permission denied",
            ));
        }
        state.error_count = previous;
        state
    }

    #[tokio::test]
    async fn fresh_human_turn_resets_and_calls_model() {
        let provider = Arc::new(CountingProvider::text("Hello!"));
        let step = step_with(provider.clone());

        let mut state = AgentState::new();
        state.push(Message::user("hi"));
        state.error_count = 4; // stale count from a previous session

        let outcome = step
            .step(&ThreadId::from("t"), &state, None)
            .await
            .unwrap();
        assert_eq!(outcome.error_count, 0);
        assert_eq!(outcome.message.content, "Hello!");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn continuation_below_threshold_calls_model() {
        let provider = Arc::new(CountingProvider::text("Recovered."));
        let step = step_with(provider.clone());

        let state = failing_tool_state(2, 0);
        let outcome = step
            .step(&ThreadId::from("t"), &state, None)
            .await
            .unwrap();
        assert_eq!(outcome.error_count, 2);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn breaker_skips_model_and_preserves_count() {
        let provider = Arc::new(CountingProvider::text("should not be called"));
        let step = step_with(provider.clone());

        let state = failing_tool_state(2, 3); // 3 prior + 2 new = 5
        let outcome = step
            .step(&ThreadId::from("t"), &state, None)
            .await
            .unwrap();

        assert_eq!(outcome.error_count, 5);
        assert_eq!(outcome.message.content, BREAKER_MESSAGE);
        assert!(outcome.message.tool_calls.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn breaker_publishes_domain_event() {
        let provider = Arc::new(CountingProvider::text("unused"));
        let bus = Arc::new(EventBus::default());
        let step = AgentStep::new(
            provider,
            "mock-model",
            0.7,
            "prompt",
            vec![],
            bus.clone(),
        );
        let mut rx = bus.subscribe();

        let state = failing_tool_state(5, 0);
        step.step(&ThreadId::from("t"), &state, None).await.unwrap();

        let event = rx.recv().await.unwrap();
        assert!(matches!(
            event.as_ref(),
            DomainEvent::BreakerTripped { error_count: 5, .. }
        ));
    }

    #[tokio::test]
    async fn streams_text_and_tool_call_events() {
        let provider = Arc::new(CountingProvider {
            message: Message::assistant_with_tool_calls(
                "Let me check.",
                vec![MessageToolCall {
                    id: "call_1".into(),
                    name: "list_directory".into(),
                    arguments: r#"{"path":"."}"#.into(),
                }],
            ),
            calls: AtomicUsize::new(0),
        });
        let step = step_with(provider);

        let mut state = AgentState::new();
        state.append_human(Message::user("list files"));

        let (tx, mut rx) = tokio::sync::mpsc::channel(32);
        let outcome = step
            .step(&ThreadId::from("t"), &state, Some(&tx))
            .await
            .unwrap();
        drop(tx);

        let mut types = Vec::new();
        while let Some(event) = rx.recv().await {
            types.push(event.event_type());
        }
        assert_eq!(
            types,
            vec![
                "text_delta",
                "tool_call_started",
                "tool_call_args_delta",
                "model_finished",
            ]
        );

        assert_eq!(outcome.message.tool_calls.len(), 1);
        assert_eq!(outcome.message.tool_calls[0].name, "list_directory");
        assert_eq!(outcome.message.content, "Let me check.");
    }
}
