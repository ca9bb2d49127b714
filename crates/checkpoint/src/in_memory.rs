//! In-memory backend — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use scout_core::checkpoint::CheckpointBackend;
use scout_core::error::CheckpointError;
use scout_core::message::ThreadId;
use scout_core::state::AgentState;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// An in-memory backend that stores thread state in a HashMap.
/// State is lost when the process exits.
pub struct InMemoryCheckpointer {
    threads: Arc<RwLock<HashMap<ThreadId, AgentState>>>,
}

impl InMemoryCheckpointer {
    pub fn new() -> Self {
        Self {
            threads: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryCheckpointer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CheckpointBackend for InMemoryCheckpointer {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self, thread: &ThreadId) -> Result<Option<AgentState>, CheckpointError> {
        Ok(self.threads.read().await.get(thread).cloned())
    }

    async fn save(&self, thread: &ThreadId, state: &AgentState) -> Result<(), CheckpointError> {
        self.threads
            .write()
            .await
            .insert(thread.clone(), state.clone());
        Ok(())
    }

    async fn delete(&self, thread: &ThreadId) -> Result<bool, CheckpointError> {
        Ok(self.threads.write().await.remove(thread).is_some())
    }

    async fn list_threads(&self) -> Result<Vec<ThreadId>, CheckpointError> {
        Ok(self.threads.read().await.keys().cloned().collect())
    }
}
