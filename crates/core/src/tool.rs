//! Tool trait — the abstraction over the agent's capability-set.
//!
//! Tools are what give the agent the ability to act on the workspace:
//! list directories, read and write files, search, etc. The orchestrator
//! only ever sees this uniform invoke interface.

use crate::error::ToolError;
use crate::provider::ToolDefinition;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The literal marker that signals a failed tool result.
///
/// This is an external-boundary protocol: tool outputs that begin with this
/// marker are failures, everything else is a success. It is parsed exactly
/// once, when a `ToolResult` is constructed; downstream logic reads the
/// typed `ok` field instead of re-scanning text.
pub const ERROR_MARKER: &str = "Error:";

/// The result of executing one tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The call ID this result is for
    pub tool_call_id: String,

    /// Name of the tool that ran (or failed to resolve)
    pub name: String,

    /// The output content, always text
    pub content: String,

    /// Derived success flag: false iff `content` starts with `Error:`
    pub ok: bool,
}

impl ToolResult {
    /// Build a result from raw output text, deriving `ok` from the marker.
    pub fn from_content(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let content = content.into();
        let ok = !content.starts_with(ERROR_MARKER);
        Self {
            tool_call_id: tool_call_id.into(),
            name: name.into(),
            content,
            ok,
        }
    }
}

/// The core Tool trait.
///
/// Each tool implements this trait and is registered in the `ToolRegistry`.
/// `invoke` may return text or structured JSON; the caller coerces the value
/// to text. Expected operational failures (file missing, etc.) may be
/// returned as `Err` — the invoker converts them into `Error:`-marked
/// results rather than letting them propagate.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "list_directory").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn invoke(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the LLM.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available tools, keyed by name.
///
/// The orchestrator uses this to:
/// 1. Get tool definitions to send to the LLM
/// 2. Look up and execute tools when the LLM requests them
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get all tool definitions (for sending to the LLM).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
