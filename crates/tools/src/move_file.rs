//! File/directory move tool.

use crate::sandbox::Sandbox;
use async_trait::async_trait;
use scout_core::error::ToolError;
use scout_core::tool::Tool;

pub struct MoveFileTool {
    sandbox: Sandbox,
}

impl MoveFileTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for MoveFileTool {
    fn name(&self) -> &str {
        "move_file"
    }

    fn description(&self) -> &str {
        "Move or rename a file or directory. Fails if the destination already exists."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "source": {
                    "type": "string",
                    "description": "The path to move from, relative to the workspace root"
                },
                "destination": {
                    "type": "string",
                    "description": "The path to move to, relative to the workspace root"
                }
            },
            "required": ["source", "destination"]
        })
    }

    async fn invoke(
        &self,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let source = arguments["source"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'source' argument".into()))?;
        let destination = arguments["destination"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'destination' argument".into()))?;

        let from = self.sandbox.resolve(self.name(), source)?;
        let to = self.sandbox.resolve(self.name(), destination)?;

        if tokio::fs::try_exists(&to).await.unwrap_or(false) {
            return Err(ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: format!("Destination '{destination}' already exists"),
            });
        }

        tokio::fs::rename(&from, &to).await.map_err(|e| {
            ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: format!("Failed to move '{source}' to '{destination}': {e}"),
            }
        })?;

        Ok(serde_json::Value::String(format!(
            "Successfully moved {source} to {destination}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn moves_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("old.txt"), "data").unwrap();

        let tool = MoveFileTool::new(Sandbox::new(dir.path().to_path_buf()));
        tool.invoke(serde_json::json!({"source": "old.txt", "destination": "new.txt"}))
            .await
            .unwrap();

        assert!(!dir.path().join("old.txt").exists());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("new.txt")).unwrap(),
            "data"
        );
    }

    #[tokio::test]
    async fn refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();

        let tool = MoveFileTool::new(Sandbox::new(dir.path().to_path_buf()));
        let err = tool
            .invoke(serde_json::json!({"source": "a.txt", "destination": "b.txt"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("b.txt")).unwrap(),
            "b"
        );
    }
}
