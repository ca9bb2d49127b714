//! File reading tools — single file and batched reads.

use crate::sandbox::Sandbox;
use async_trait::async_trait;
use scout_core::error::ToolError;
use scout_core::tool::Tool;

pub struct ReadFileTool {
    sandbox: Sandbox,
}

impl ReadFileTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the complete contents of a file as text."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The file path to read, relative to the workspace root"
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

        let content = tokio::fs::read_to_string(&resolved).await.map_err(|e| {
            ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: format!("Failed to read file '{path}': {e}"),
            }
        })?;
        Ok(serde_json::Value::String(content))
    }
}

/// Reads several files in one call; per-file failures are reported inline
/// so one missing file doesn't hide the others.
pub struct ReadMultipleFilesTool {
    sandbox: Sandbox,
}

impl ReadMultipleFilesTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for ReadMultipleFilesTool {
    fn name(&self) -> &str {
        "read_multiple_files"
    }

    fn description(&self) -> &str {
        "Read several files at once. Returns each file's contents under a path header; \
         unreadable files are reported inline."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "paths": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "The file paths to read, relative to the workspace root"
                }
            },
            "required": ["paths"]
        })
    }

    async fn invoke(
        &self,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let paths = arguments["paths"]
            .as_array()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'paths' array argument".into()))?;

        let mut sections = Vec::new();
        for value in paths {
            let Some(path) = value.as_str() else {
                sections.push(format!("{value}: skipped (not a string)"));
                continue;
            };

            let section = match self.sandbox.resolve(self.name(), path) {
                Ok(resolved) => match tokio::fs::read_to_string(&resolved).await {
                    Ok(content) => format!("{path}:\n{content}"),
                    Err(e) => format!("{path}: failed to read: {e}"),
                },
                Err(e) => format!("{path}: {e}"),
            };
            sections.push(section);
        }

        Ok(serde_json::Value::String(sections.join("\n---\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn read_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("test.txt");
        let mut f = std::fs::File::create(&file_path).unwrap();
        writeln!(f, "Hello, world!").unwrap();

        let tool = ReadFileTool::new(Sandbox::new(dir.path().to_path_buf()));
        let out = tool
            .invoke(serde_json::json!({"path": "test.txt"}))
            .await
            .unwrap();
        assert!(out.as_str().unwrap().contains("Hello, world!"));
    }

    #[tokio::test]
    async fn read_nonexistent_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ReadFileTool::new(Sandbox::new(dir.path().to_path_buf()));
        let err = tool
            .invoke(serde_json::json!({"path": "missing.txt"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
    }

    #[tokio::test]
    async fn missing_path_argument() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ReadFileTool::new(Sandbox::new(dir.path().to_path_buf()));
        let result = tool.invoke(serde_json::json!({})).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[tokio::test]
    async fn read_multiple_reports_failures_inline() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "alpha").unwrap();

        let tool = ReadMultipleFilesTool::new(Sandbox::new(dir.path().to_path_buf()));
        let out = tool
            .invoke(serde_json::json!({"paths": ["a.txt", "missing.txt"]}))
            .await
            .unwrap();

        let text = out.as_str().unwrap();
        assert!(text.contains("a.txt:\nalpha"));
        assert!(text.contains("missing.txt: failed to read"));
    }
}
