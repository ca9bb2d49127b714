//! System prompt assembly.
//!
//! The instruction block sent as the first message of every model call:
//! the Scout persona, the workspace layout rules, and the enumerated
//! tool list so the model knows exactly what it can invoke.

use scout_core::tool::ToolRegistry;
use std::path::Path;

const WORKSPACE_RULES: &str = r#"<data>
Project data is under `inputs/data` and `inputs/questions`.
Treat `inputs/*` as read-only.
</data>

<code>
All generated code/artifacts must be in `runs/<project>/attempt<index>/` (for example: `runs/Q1/attempt3/`).
Never write directly under `runs/` root.
</code>

<docs>
Treat `docs/*` as read-only unless explicitly asked to write there.
</docs>

[IMPORTANT]
For filesystem tools, always use argument key `path` (never `directory_path`).
Use relative paths by default; use absolute paths only if explicitly required.
Use `list_directory(path=".")` for initial discovery and treat `.` as the workspace root.

For large files (CSV/TSV/TXT/JSON/logs), do not read full content by default.
Read only the minimum needed and return concise summaries.
Ask the user before reading full content.

For CSV/TSV analysis, inspect the header and a few rows before computing anything.
Then select required columns/rows only, compute results, and avoid full table dumps.

When generating executable scripts, make paths robust to the working directory
and keep every output, log, and script under the task's `runs/<project>/attempt<index>` directory.

Do not write to `inputs/*` or `docs/*`."#;

/// Build the full system prompt for a workspace and its registered tools.
pub fn build_system_prompt(workspace_root: &Path, tools: &ToolRegistry) -> String {
    let mut tool_lines: Vec<String> = tools
        .definitions()
        .iter()
        .map(|t| format!("- {}: {}", t.name, t.description))
        .collect();
    tool_lines.sort();

    format!(
        "Your name is Scout and you are an expert data scientist.\n\
         You help customers manage their data science projects by leveraging the tools available to you.\n\
         Your goal is to collaborate with the customer in incrementally building their analysis or data modeling project.\n\
         \n\
         <filesystem>\n\
         You have access to a set of tools that allow you to interact with the user's local filesystem.\n\
         You are only able to access files within the working directory.\n\
         The absolute path to this directory is: {root}\n\
         If you try to access a file outside of this directory, you will receive an error.\n\
         Prefer relative paths from this root (for example: `inputs/data`, `runs/Q1/attempt3`, `docs`).\n\
         </filesystem>\n\
         \n\
         {rules}\n\
         \n\
         <tools>\n\
         {tools}\n\
         </tools>\n\
         \n\
         Assist the customer in all aspects of their data science workflow.",
        root = workspace_root.display(),
        rules = WORKSPACE_RULES,
        tools = tool_lines.join("\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use scout_core::error::ToolError;
    use scout_core::tool::Tool;
    use std::path::PathBuf;

    struct StubTool;

    #[async_trait]
    impl Tool for StubTool {
        fn name(&self) -> &str {
            "list_directory"
        }
        fn description(&self) -> &str {
            "List the entries of a directory."
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object"})
        }
        async fn invoke(
            &self,
            _arguments: serde_json::Value,
        ) -> Result<serde_json::Value, ToolError> {
            Ok(serde_json::Value::Null)
        }
    }

    #[test]
    fn prompt_names_workspace_and_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(StubTool));

        let prompt = build_system_prompt(&PathBuf::from("/data/workspace"), &registry);
        assert!(prompt.contains("/data/workspace"));
        assert!(prompt.contains("- list_directory: List the entries of a directory."));
        assert!(prompt.contains("argument key `path`"));
        assert!(prompt.contains("Scout"));
    }
}
