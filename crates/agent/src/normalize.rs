//! Tool-argument normalization.
//!
//! Models name the same logical argument inconsistently (`file_path`,
//! `directory_path`, ...). Normalizing to the `path` key the filesystem
//! tools actually accept prevents spurious "unknown argument" failures
//! from inflating the failure count.

use serde_json::Value;

/// The filesystem tools whose arguments get normalized.
pub const FILESYSTEM_TOOL_NAMES: [&str; 9] = [
    "list_directory",
    "read_file",
    "write_file",
    "create_directory",
    "move_file",
    "search_files",
    "get_file_info",
    "list_allowed_directories",
    "read_multiple_files",
];

/// Aliases the model uses for `path`, tried in this order.
const PATH_ALIASES: [&str; 4] = ["directory_path", "dir_path", "file_path", "folder_path"];

/// Rewrite a tool call's arguments into the shape the tool expects.
///
/// Pure function. Unknown tools and non-mapping arguments pass through
/// unchanged. When `path` is missing, the first string-valued alias is
/// copied into `path` (the alias itself is kept). For `list_directory`,
/// an absent, non-string, or empty `path` becomes the current-directory
/// sentinel `"."`.
pub fn normalize_tool_args(tool_name: &str, args: Value) -> Value {
    if !FILESYSTEM_TOOL_NAMES.contains(&tool_name) {
        return args;
    }
    let mut map = match args {
        Value::Object(map) => map,
        other => return other,
    };

    if !map.contains_key("path") {
        for alias in PATH_ALIASES {
            if let Some(Value::String(value)) = map.get(alias) {
                map.insert("path".into(), Value::String(value.clone()));
                break;
            }
        }
    }

    if tool_name == "list_directory" {
        let usable = matches!(map.get("path"), Some(Value::String(s)) if !s.is_empty());
        if !usable {
            map.insert("path".into(), Value::String(".".into()));
        }
    }

    Value::Object(map)
}
