//! The two-state control loop.
//!
//! States are exactly `agent` and `tools`. The machine itself is stateless
//! and reentrant per invocation; everything that persists lives in
//! `AgentState`, which is loaded from the checkpoint at turn start and
//! saved back when the turn ends — however it ends.
//!
//! The step budget is an outer safety net independent of the failure
//! breaker: the breaker handles tool-error loops, the budget handles any
//! other runaway (e.g. endless individually-successful tool calls).

use crate::invoker::ToolInvoker;
use crate::step::AgentStep;
use crate::stream_event::{AgentStreamEvent, EventSender, emit};
use scout_core::checkpoint::CheckpointBackend;
use scout_core::error::Error;
use scout_core::message::{Message, Role, ThreadId};
use scout_core::state::AgentState;
use std::sync::Arc;
use tracing::{info, warn};

/// Default upper bound on state-machine transitions per human turn.
pub const DEFAULT_STEP_BUDGET: u32 = 300;

/// The two nodes of the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Agent,
    Tools,
}

/// The result of one completed human turn.
pub struct TurnOutcome {
    /// The final assistant message of the turn.
    pub final_message: Message,
    /// The failure count left in state (non-zero after a tripped breaker).
    pub error_count: u32,
    /// State-machine transitions consumed.
    pub transitions: u32,
    /// Total tool calls executed.
    pub tool_calls_made: usize,
}

/// Owns the conversation-state lifecycle across turns.
pub struct Orchestrator {
    step: AgentStep,
    invoker: ToolInvoker,
    checkpointer: Arc<dyn CheckpointBackend>,
    step_budget: u32,
}

impl Orchestrator {
    pub fn new(
        step: AgentStep,
        invoker: ToolInvoker,
        checkpointer: Arc<dyn CheckpointBackend>,
    ) -> Self {
        Self {
            step,
            invoker,
            checkpointer,
            step_budget: DEFAULT_STEP_BUDGET,
        }
    }

    /// Override the per-turn transition budget.
    pub fn with_step_budget(mut self, budget: u32) -> Self {
        self.step_budget = budget;
        self
    }

    /// Run one human turn to completion.
    ///
    /// Loads (or creates) the thread's state, appends the human message,
    /// and alternates agent/tools until the model answers without tool
    /// calls, the breaker emits its terminal message, or the step budget
    /// runs out. The state is checkpointed before this returns, on the
    /// error paths included, so the conversation survives a restart.
    pub async fn run_turn(
        &self,
        thread_id: &ThreadId,
        input: Message,
        events: Option<&EventSender>,
    ) -> Result<TurnOutcome, Error> {
        debug_assert_eq!(input.role, Role::User);

        let mut state = self
            .checkpointer
            .load(thread_id)
            .await
            .map_err(Error::Checkpoint)?
            .unwrap_or_default();

        info!(
            thread = %thread_id,
            history = state.messages.len(),
            "Turn started"
        );
        state.append_human(input);

        let mut node = Node::Agent;
        let mut transitions: u32 = 0;
        let mut tool_calls_made: usize = 0;
        let mut final_message: Option<Message> = None;

        loop {
            if transitions >= self.step_budget {
                warn!(
                    thread = %thread_id,
                    budget = self.step_budget,
                    "Step budget exhausted, aborting turn"
                );
                return self
                    .fail_turn(
                        thread_id,
                        &state,
                        events,
                        Error::Internal(format!(
                            "step budget of {} transitions exhausted",
                            self.step_budget
                        )),
                    )
                    .await;
            }
            transitions += 1;

            match node {
                Node::Agent => {
                    let outcome = match self.step.step(thread_id, &state, events).await {
                        Ok(outcome) => outcome,
                        Err(e) => return self.fail_turn(thread_id, &state, events, e).await,
                    };

                    state.error_count = outcome.error_count;
                    let requests_tools = outcome.message.requests_tools();
                    final_message = Some(outcome.message.clone());
                    state.push(outcome.message);

                    if requests_tools {
                        node = Node::Tools;
                    } else {
                        break;
                    }
                }
                Node::Tools => {
                    // The agent node just pushed the tool-call message.
                    let Some(request) = state.last_message().cloned() else {
                        node = Node::Agent;
                        continue;
                    };

                    let results = self.invoker.invoke_all(&request).await;
                    tool_calls_made += results.len();

                    for result in results {
                        emit(
                            events,
                            AgentStreamEvent::ToolResult {
                                id: result.tool_call_id.clone(),
                                name: result.name.clone(),
                                content: result.content.clone(),
                                ok: result.ok,
                            },
                        )
                        .await;
                        state.push(Message::tool_result(
                            result.tool_call_id,
                            result.name,
                            result.content,
                        ));
                    }

                    // Unconditionally back to the agent — routing to the
                    // model or to the breaker happens on the next entry.
                    node = Node::Agent;
                }
            }
        }

        self.checkpointer
            .save(thread_id, &state)
            .await
            .map_err(Error::Checkpoint)?;

        let final_message = final_message.ok_or_else(|| {
            Error::Internal("turn ended without an assistant message".into())
        })?;

        info!(
            thread = %thread_id,
            transitions,
            tool_calls = tool_calls_made,
            error_count = state.error_count,
            "Turn completed"
        );
        emit(
            events,
            AgentStreamEvent::Done {
                thread_id: thread_id.to_string(),
                transitions,
                tool_calls_made,
                error_count: state.error_count,
            },
        )
        .await;

        Ok(TurnOutcome {
            final_message,
            error_count: state.error_count,
            transitions,
            tool_calls_made,
        })
    }

    /// Persist what we have, surface the error event, then propagate.
    async fn fail_turn(
        &self,
        thread_id: &ThreadId,
        state: &AgentState,
        events: Option<&EventSender>,
        error: Error,
    ) -> Result<TurnOutcome, Error> {
        if let Err(save_err) = self.checkpointer.save(thread_id, state).await {
            warn!(thread = %thread_id, error = %save_err, "Failed to checkpoint after error");
        }
        emit(
            events,
            AgentStreamEvent::Error {
                message: error.to_string(),
            },
        )
        .await;
        Err(error)
    }
}
