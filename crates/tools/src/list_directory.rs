//! Directory listing tool.

use crate::sandbox::Sandbox;
use async_trait::async_trait;
use scout_core::error::ToolError;
use scout_core::tool::Tool;

pub struct ListDirectoryTool {
    sandbox: Sandbox,
}

impl ListDirectoryTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for ListDirectoryTool {
    fn name(&self) -> &str {
        "list_directory"
    }

    fn description(&self) -> &str {
        "List the entries of a directory. Each line is prefixed with [FILE] or [DIR]."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The directory path to list, relative to the workspace root"
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

        let mut read_dir = tokio::fs::read_dir(&resolved).await.map_err(|e| {
            ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: format!("Failed to read directory '{path}': {e}"),
            }
        })?;

        let mut entries = Vec::new();
        while let Ok(Some(entry)) = read_dir.next_entry().await {
            let name = entry.file_name().to_string_lossy().to_string();
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);
            entries.push(if is_dir {
                format!("[DIR] {name}")
            } else {
                format!("[FILE] {name}")
            });
        }
        entries.sort();

        let listing = if entries.is_empty() {
            "(empty directory)".to_string()
        } else {
            entries.join("\n")
        };
        Ok(serde_json::Value::String(listing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn tool_definition() {
        let tool = ListDirectoryTool::new(Sandbox::new(PathBuf::from("/tmp")));
        assert_eq!(tool.name(), "list_directory");
        let schema = tool.parameters_schema();
        assert_eq!(schema["required"], serde_json::json!(["path"]));
    }

    #[tokio::test]
    async fn lists_files_and_dirs_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::create_dir(dir.path().join("a_dir")).unwrap();

        let tool = ListDirectoryTool::new(Sandbox::new(dir.path().to_path_buf()));
        let out = tool
            .invoke(serde_json::json!({"path": "."}))
            .await
            .unwrap();

        let listing = out.as_str().unwrap();
        assert_eq!(listing, "[DIR] a_dir\n[FILE] b.txt");
    }

    #[tokio::test]
    async fn empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ListDirectoryTool::new(Sandbox::new(dir.path().to_path_buf()));
        let out = tool
            .invoke(serde_json::json!({"path": "."}))
            .await
            .unwrap();
        assert_eq!(out.as_str().unwrap(), "(empty directory)");
    }

    #[tokio::test]
    async fn missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ListDirectoryTool::new(Sandbox::new(dir.path().to_path_buf()));
        let err = tool
            .invoke(serde_json::json!({"path": "nope"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
    }
}
