//! File-based checkpoint backend — one JSON document per thread.
//!
//! Storage location: `~/.scout/threads/<thread>.json`
//!
//! Each document embeds the thread id alongside the serialized state, so
//! listing recovers exact ids even though filenames are sanitized. Writes
//! replace the whole document; reads happen on demand, which keeps the
//! backend stateless across calls and safe to reopen after a restart.

use async_trait::async_trait;
use scout_core::checkpoint::CheckpointBackend;
use scout_core::error::CheckpointError;
use scout_core::message::ThreadId;
use scout_core::state::AgentState;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

/// On-disk document wrapping a thread's state.
#[derive(Serialize, Deserialize)]
struct StoredCheckpoint {
    thread_id: String,
    state: AgentState,
}

/// A file-backed checkpoint store.
pub struct FileCheckpointer {
    dir: PathBuf,
}

impl FileCheckpointer {
    /// Create a backend rooted at the given directory.
    /// The directory is created on first write.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Filename-safe encoding of a thread id.
    fn path_for(&self, thread: &ThreadId) -> PathBuf {
        let sanitized: String = thread
            .0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{sanitized}.json"))
    }
}

#[async_trait]
impl CheckpointBackend for FileCheckpointer {
    fn name(&self) -> &str {
        "file"
    }

    async fn load(&self, thread: &ThreadId) -> Result<Option<AgentState>, CheckpointError> {
        let path = self.path_for(thread);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CheckpointError::Storage(format!(
                    "Failed to read checkpoint {}: {e}",
                    path.display()
                )));
            }
        };

        let stored: StoredCheckpoint =
            serde_json::from_str(&content).map_err(|e| CheckpointError::Corrupted {
                thread: thread.to_string(),
                reason: e.to_string(),
            })?;

        debug!(
            thread = %thread,
            messages = stored.state.messages.len(),
            "Loaded thread checkpoint"
        );
        Ok(Some(stored.state))
    }

    async fn save(&self, thread: &ThreadId, state: &AgentState) -> Result<(), CheckpointError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            CheckpointError::Storage(format!("Failed to create checkpoint directory: {e}"))
        })?;

        let stored = StoredCheckpoint {
            thread_id: thread.to_string(),
            state: state.clone(),
        };
        let content = serde_json::to_string_pretty(&stored).map_err(|e| {
            CheckpointError::Storage(format!("Failed to serialize checkpoint: {e}"))
        })?;

        let path = self.path_for(thread);
        std::fs::write(&path, content).map_err(|e| {
            CheckpointError::Storage(format!(
                "Failed to write checkpoint {}: {e}",
                path.display()
            ))
        })?;

        debug!(thread = %thread, messages = state.messages.len(), "Saved thread checkpoint");
        Ok(())
    }

    async fn delete(&self, thread: &ThreadId) -> Result<bool, CheckpointError> {
        let path = self.path_for(thread);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CheckpointError::Storage(format!(
                "Failed to delete checkpoint {}: {e}",
                path.display()
            ))),
        }
    }

    async fn list_threads(&self) -> Result<Vec<ThreadId>, CheckpointError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CheckpointError::Storage(format!(
                    "Failed to read checkpoint directory: {e}"
                )));
            }
        };

        let mut threads = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match std::fs::read_to_string(&path)
                .ok()
                .and_then(|c| serde_json::from_str::<StoredCheckpoint>(&c).ok())
            {
                Some(stored) => threads.push(ThreadId(stored.thread_id)),
                None => {
                    warn!(path = %path.display(), "Skipping unreadable checkpoint file");
                }
            }
        }
        Ok(threads)
    }
}
