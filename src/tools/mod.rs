//! Tool system for the agent.
//!
//! Tools are the agent's hands: they run commands, edit files, and track task
//! progress inside the workspace directory. The set is fixed - every agent
//! gets exactly the same three tools, in the same order:
//!
//! 1. `terminal` - shell command execution
//! 2. `file_editor` - file viewing and editing
//! 3. `task_tracker` - task list management
//!
//! Relative paths resolve from the workspace; absolute paths pass through.

mod file_editor;
mod task_tracker;
mod terminal;

pub use file_editor::FileEditor;
pub use task_tracker::TaskTracker;
pub use terminal::Terminal;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::llm::{FunctionDefinition, ToolDefinition};

/// Resolve a path relative to the workspace.
///
/// Relative paths are joined with `workspace`; absolute paths are used as-is.
pub fn resolve_path(path_str: &str, workspace: &Path) -> PathBuf {
    let path = Path::new(path_str);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace.join(path)
    }
}

/// Trait for implementing tools.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool.
    fn name(&self) -> &str;

    /// A description of what this tool does.
    fn description(&self) -> &str;

    /// JSON schema for the tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the given arguments.
    ///
    /// `workspace` is the default directory for relative paths.
    async fn execute(&self, args: Value, workspace: &Path) -> anyhow::Result<String>;
}

/// The fixed tool set, in its fixed order.
pub fn default_toolset() -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(Terminal),
        Arc::new(FileEditor),
        Arc::new(TaskTracker),
    ]
}

/// Tool schemas in LLM-compatible format, preserving tool order.
pub fn tool_schemas(tools: &[Arc<dyn Tool>]) -> Vec<ToolDefinition> {
    tools
        .iter()
        .map(|tool| ToolDefinition {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters_schema(),
            },
        })
        .collect()
}
