//! Checkpoint trait — durable per-thread state.
//!
//! The conversation state is checkpointed after each full turn so a process
//! restart can resume mid-conversation with history and the error-count
//! invariant intact. The storage format is the backend's concern; the
//! contract is exact resume keyed by `ThreadId`.

use crate::error::CheckpointError;
use crate::message::ThreadId;
use crate::state::AgentState;
use async_trait::async_trait;

/// Persistence backend for `AgentState`, keyed by thread.
#[async_trait]
pub trait CheckpointBackend: Send + Sync {
    /// A human-readable name for this backend (e.g., "file").
    fn name(&self) -> &str;

    /// Load the state for a thread, or `None` if the thread is new.
    async fn load(&self, thread: &ThreadId) -> Result<Option<AgentState>, CheckpointError>;

    /// Persist the state for a thread, replacing any prior checkpoint.
    async fn save(&self, thread: &ThreadId, state: &AgentState) -> Result<(), CheckpointError>;

    /// Delete a thread's checkpoint. Returns whether one existed.
    async fn delete(&self, thread: &ThreadId) -> Result<bool, CheckpointError>;

    /// List all threads with a checkpoint.
    async fn list_threads(&self) -> Result<Vec<ThreadId>, CheckpointError>;
}
