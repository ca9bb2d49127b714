//! Recursive filename search tool.

use crate::sandbox::Sandbox;
use async_trait::async_trait;
use scout_core::error::ToolError;
use scout_core::tool::Tool;
use std::path::{Path, PathBuf};

pub struct SearchFilesTool {
    sandbox: Sandbox,
}

impl SearchFilesTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for SearchFilesTool {
    fn name(&self) -> &str {
        "search_files"
    }

    fn description(&self) -> &str {
        "Recursively search for files and directories whose name contains the given \
         pattern (case-insensitive). Returns workspace-relative paths."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The directory to search from, relative to the workspace root"
                },
                "pattern": {
                    "type": "string",
                    "description": "Substring to match against entry names, case-insensitive"
                }
            },
            "required": ["path", "pattern"]
        })
    }

    async fn invoke(
        &self,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let path = arguments["path"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'path' argument".into()))?;
        let pattern = arguments["pattern"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'pattern' argument".into()))?;

        let start = self.sandbox.resolve(self.name(), path)?;
        let needle = pattern.to_lowercase();

        let mut matches = Vec::new();
        let mut pending: Vec<PathBuf> = vec![start];
        while let Some(dir) = pending.pop() {
            let Ok(mut read_dir) = tokio::fs::read_dir(&dir).await else {
                continue;
            };
            while let Ok(Some(entry)) = read_dir.next_entry().await {
                let entry_path = entry.path();
                let name = entry.file_name().to_string_lossy().to_lowercase();
                if name.contains(&needle) {
                    matches.push(relative_display(&entry_path, self.sandbox.root()));
                }
                if entry
                    .file_type()
                    .await
                    .map(|t| t.is_dir())
                    .unwrap_or(false)
                {
                    pending.push(entry_path);
                }
            }
        }
        matches.sort();

        let output = if matches.is_empty() {
            "No matches found".to_string()
        } else {
            matches.join("\n")
        };
        Ok(serde_json::Value::String(output))
    }
}

fn relative_display(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_matches_recursively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("inputs/data")).unwrap();
        std::fs::write(dir.path().join("inputs/data/sales.csv"), "").unwrap();
        std::fs::write(dir.path().join("notes.md"), "").unwrap();

        let tool = SearchFilesTool::new(Sandbox::new(dir.path().to_path_buf()));
        let out = tool
            .invoke(serde_json::json!({"path": ".", "pattern": "SALES"}))
            .await
            .unwrap();
        assert_eq!(out.as_str().unwrap(), "inputs/data/sales.csv");
    }

    #[tokio::test]
    async fn no_matches_message() {
        let dir = tempfile::tempdir().unwrap();
        let tool = SearchFilesTool::new(Sandbox::new(dir.path().to_path_buf()));
        let out = tool
            .invoke(serde_json::json!({"path": ".", "pattern": "zzz"}))
            .await
            .unwrap();
        assert_eq!(out.as_str().unwrap(), "No matches found");
    }
}
