//! Metadata tools — file info and the sandbox roots listing.

use crate::sandbox::Sandbox;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scout_core::error::ToolError;
use scout_core::tool::Tool;

pub struct GetFileInfoTool {
    sandbox: Sandbox,
}

impl GetFileInfoTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for GetFileInfoTool {
    fn name(&self) -> &str {
        "get_file_info"
    }

    fn description(&self) -> &str {
        "Get metadata for a file or directory: size, timestamps, and type."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The path to inspect, relative to the workspace root"
                }
            },
            "required": ["path"]
        })
    }

    async fn invoke(
        &self,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let path = arguments["path"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'path' argument".into()))?;

        let resolved = self.sandbox.resolve(self.name(), path)?;

        let meta = tokio::fs::metadata(&resolved).await.map_err(|e| {
            ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: format!("Failed to stat '{path}': {e}"),
            }
        })?;

        let kind = if meta.is_dir() { "directory" } else { "file" };
        let modified = meta.modified().ok().map(fmt_time).unwrap_or_default();
        let created = meta.created().ok().map(fmt_time).unwrap_or_default();

        Ok(serde_json::Value::String(format!(
            "path: {path}\ntype: {kind}\nsize: {}\ncreated: {created}\nmodified: {modified}",
            meta.len()
        )))
    }
}

fn fmt_time(t: std::time::SystemTime) -> String {
    DateTime::<Utc>::from(t).to_rfc3339()
}

/// Reports the directories the agent may touch. There is exactly one: the
/// workspace root.
pub struct ListAllowedDirectoriesTool {
    sandbox: Sandbox,
}

impl ListAllowedDirectoriesTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for ListAllowedDirectoriesTool {
    fn name(&self) -> &str {
        "list_allowed_directories"
    }

    fn description(&self) -> &str {
        "List the directories this agent is allowed to access."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn invoke(
        &self,
        _arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        Ok(serde_json::Value::String(format!(
            "Allowed directories:\n{}",
            self.sandbox.root().display()
        )))
    }
}
