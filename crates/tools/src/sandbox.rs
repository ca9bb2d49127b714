//! Path containment — every filesystem tool resolves paths through here.
//!
//! The agent is only allowed to touch files under a single workspace root.
//! Relative paths are resolved against the root; absolute paths must already
//! be inside it. Traversal components are rejected outright rather than
//! resolved, so a path that *would* escape fails before any I/O happens.

use scout_core::error::ToolError;
use std::path::{Component, Path, PathBuf};

/// The workspace root all filesystem tools are confined to.
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The root directory itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a tool-supplied path to a real path inside the root.
    ///
    /// `.` and empty paths resolve to the root. Returns `PermissionDenied`
    /// for traversal components or absolute paths outside the root.
    pub fn resolve(&self, tool_name: &str, path: &str) -> Result<PathBuf, ToolError> {
        let denied = |reason: String| ToolError::PermissionDenied {
            tool_name: tool_name.to_string(),
            reason,
        };

        let candidate = Path::new(path);

        if candidate.is_absolute() {
            if candidate.starts_with(&self.root) && !has_traversal(candidate) {
                return Ok(candidate.to_path_buf());
            }
            return Err(denied(format!(
                "absolute path '{path}' is outside the workspace root"
            )));
        }

        if has_traversal(candidate) {
            return Err(denied(format!("path '{path}' contains traversal components")));
        }

        let mut resolved = self.root.clone();
        for component in candidate.components() {
            if let Component::Normal(part) = component {
                resolved.push(part);
            }
        }
        Ok(resolved)
    }
}

fn has_traversal(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::ParentDir))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sandbox() -> Sandbox {
        Sandbox::new(PathBuf::from("/work/space"))
    }

    #[test]
    fn relative_path_resolves_under_root() {
        let resolved = sandbox().resolve("read_file", "inputs/data.csv").unwrap();
        assert_eq!(resolved, PathBuf::from("/work/space/inputs/data.csv"));
    }

    #[test]
    fn dot_resolves_to_root() {
        let resolved = sandbox().resolve("list_directory", ".").unwrap();
        assert_eq!(resolved, PathBuf::from("/work/space"));
    }

    #[test]
    fn empty_path_resolves_to_root() {
        let resolved = sandbox().resolve("list_directory", "").unwrap();
        assert_eq!(resolved, PathBuf::from("/work/space"));
    }

    #[test]
    fn traversal_rejected() {
        let err = sandbox().resolve("read_file", "../../etc/passwd").unwrap_err();
        assert!(matches!(err, ToolError::PermissionDenied { .. }));

        let err = sandbox().resolve("read_file", "inputs/../../secret").unwrap_err();
        assert!(matches!(err, ToolError::PermissionDenied { .. }));
    }

    #[test]
    fn absolute_path_inside_root_allowed() {
        let resolved = sandbox().resolve("read_file", "/work/space/docs/a.md").unwrap();
        assert_eq!(resolved, PathBuf::from("/work/space/docs/a.md"));
    }

    #[test]
    fn absolute_path_outside_root_rejected() {
        let err = sandbox().resolve("read_file", "/etc/passwd").unwrap_err();
        assert!(matches!(err, ToolError::PermissionDenied { .. }));
    }
}
