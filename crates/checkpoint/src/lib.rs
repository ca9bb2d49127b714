//! Checkpoint backend implementations for Scout.
//!
//! A checkpoint backend persists per-thread `AgentState` so a later human
//! turn — or a restarted process — resumes the same conversation.

pub mod file_backend;
pub mod in_memory;

pub use file_backend::FileCheckpointer;
pub use in_memory::InMemoryCheckpointer;
