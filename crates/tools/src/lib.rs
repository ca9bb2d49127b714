//! Built-in filesystem capability-set for Scout.
//!
//! All tools operate inside a single workspace root enforced by `Sandbox`;
//! a path that would escape the root is rejected before any I/O happens.
//! The registry these tools populate is what the orchestrator enumerates
//! and executes against.

pub mod create_directory;
pub mod file_info;
pub mod list_directory;
pub mod move_file;
pub mod read_file;
pub mod sandbox;
pub mod search_files;
pub mod write_file;

pub use sandbox::Sandbox;

use scout_core::tool::ToolRegistry;
use std::path::PathBuf;

/// Create the default tool registry, sandboxed to the given workspace root.
pub fn default_registry(workspace_root: PathBuf) -> ToolRegistry {
    let sandbox = Sandbox::new(workspace_root);

    let mut registry = ToolRegistry::new();
    registry.register(Box::new(list_directory::ListDirectoryTool::new(
        sandbox.clone(),
    )));
    registry.register(Box::new(read_file::ReadFileTool::new(sandbox.clone())));
    registry.register(Box::new(read_file::ReadMultipleFilesTool::new(
        sandbox.clone(),
    )));
    registry.register(Box::new(write_file::WriteFileTool::new(sandbox.clone())));
    registry.register(Box::new(create_directory::CreateDirectoryTool::new(
        sandbox.clone(),
    )));
    registry.register(Box::new(move_file::MoveFileTool::new(sandbox.clone())));
    registry.register(Box::new(search_files::SearchFilesTool::new(
        sandbox.clone(),
    )));
    registry.register(Box::new(file_info::GetFileInfoTool::new(sandbox.clone())));
    registry.register(Box::new(file_info::ListAllowedDirectoriesTool::new(
        sandbox,
    )));
    registry
}
