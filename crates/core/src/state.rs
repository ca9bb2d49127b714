//! Per-thread conversation state.
//!
//! `AgentState` is the only mutable shared state in the system. The
//! orchestrator exclusively owns mutation; external callers may only append
//! human input and read rendered output.

use crate::message::{Message, Role};
use serde::{Deserialize, Serialize};

/// The conversation state of one thread.
///
/// Invariant: `error_count` is the number of consecutive tool failures
/// within the current tool-use burst, accumulated across bursts until a
/// success or a new human turn; it is 0 whenever a human message is the
/// most recent message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentState {
    /// Append-only ordered conversation history
    pub messages: Vec<Message>,

    /// Consecutive tool failures since the last human turn or last success
    pub error_count: u32,
}

impl AgentState {
    /// Create a fresh state: empty history, zero failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a human message, resetting the failure count.
    ///
    /// A new human request forgives prior tool-use failures, so the
    /// fresh-turn invariant holds the moment the message lands.
    pub fn append_human(&mut self, message: Message) {
        debug_assert_eq!(message.role, Role::User);
        self.error_count = 0;
        self.messages.push(message);
    }

    /// Append any other message without touching the failure count.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Whether the most recent message is human input awaiting a response.
    pub fn awaiting_response(&self) -> bool {
        matches!(self.last_message(), Some(m) if m.role == Role::User)
    }
}
