//! # Scout Agent
//!
//! The orchestration core: a two-state machine that alternates between
//! consulting the model and executing requested tools until the model
//! produces a final answer, with a bounded-failure circuit breaker, an
//! argument normalization layer, and a streaming event multiplexer.

pub mod failure;
pub mod invoker;
pub mod normalize;
pub mod orchestrator;
pub mod presenter;
pub mod prompt;
pub mod step;
pub mod stream_event;

pub use failure::{BREAKER_MESSAGE, MAX_CONSECUTIVE_TOOL_FAILURES};
pub use invoker::ToolInvoker;
pub use normalize::{FILESYSTEM_TOOL_NAMES, normalize_tool_args};
pub use orchestrator::{DEFAULT_STEP_BUDGET, Orchestrator, TurnOutcome};
pub use presenter::TurnRenderer;
pub use prompt::build_system_prompt;
pub use step::{AgentStep, StepOutcome};
pub use stream_event::{AgentStreamEvent, EventSender};
