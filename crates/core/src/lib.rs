//! # Scout Core
//!
//! Domain types, traits, and error definitions for the Scout agent
//! orchestrator. This crate has **zero framework dependencies** — it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is defined as a trait here: the model
//! capability (`Provider`), the tool capability-set (`Tool` / `ToolRegistry`),
//! and thread-state persistence (`CheckpointBackend`). Implementations live in
//! their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod checkpoint;
pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod state;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use checkpoint::CheckpointBackend;
pub use error::{Error, Result};
pub use event::{DomainEvent, EventBus};
pub use message::{Message, MessageToolCall, Role, ThreadId};
pub use provider::{
    FinishReason, Provider, ProviderRequest, ProviderResponse, StreamChunk, ToolCallDelta,
};
pub use state::AgentState;
pub use tool::{ERROR_MARKER, Tool, ToolRegistry, ToolResult};
