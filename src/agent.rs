//! Agent handle: an LLM client bound to the fixed tool set.

use std::path::Path;
use std::sync::Arc;

use crate::llm::{LlmClient, ToolCall, ToolDefinition};
use crate::tools::{self, Tool};

/// An autonomous task-execution unit.
///
/// Binds one LLM client handle to exactly three tools - terminal, file
/// editor, task tracker - in that fixed order. The tool set is never
/// configurable per call.
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    tools: Vec<Arc<dyn Tool>>,
}

impl Agent {
    /// Create an agent over the given client, with the standard coding tools.
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            tools: tools::default_toolset(),
        }
    }

    /// The model identifier of the underlying client.
    pub fn model(&self) -> &str {
        self.llm.model()
    }

    /// The agent's tools, in their fixed order.
    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// The underlying LLM client.
    pub(crate) fn llm(&self) -> &dyn LlmClient {
        self.llm.as_ref()
    }

    /// Tool schemas in LLM-compatible format.
    pub(crate) fn tool_schemas(&self) -> Vec<ToolDefinition> {
        tools::tool_schemas(&self.tools)
    }

    /// Build the system prompt for a run over `workspace`.
    pub(crate) fn system_prompt(&self, workspace: &Path) -> String {
        let tool_descriptions = self
            .tools
            .iter()
            .map(|tool| format!("- **{}**: {}", tool.name(), tool.description()))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are an autonomous coding agent with access to tools.
You operate in the workspace: {workspace}

## Available Tools
{tool_descriptions}

## Rules
1. Use tools to accomplish the task - don't just describe what to do
2. Read files before editing them
3. Verify your work when possible
4. If stuck, explain what's blocking you
5. When done, summarize what you accomplished"#,
            workspace = workspace.display(),
            tool_descriptions = tool_descriptions
        )
    }

    /// Execute a single tool call.
    ///
    /// Failures are folded into the returned string so the model can see what
    /// went wrong and recover on its next turn.
    pub(crate) async fn execute_tool(&self, call: &ToolCall, workspace: &Path) -> String {
        let args: serde_json::Value =
            serde_json::from_str(&call.function.arguments).unwrap_or(serde_json::Value::Null);

        let tool = match self
            .tools
            .iter()
            .find(|tool| tool.name() == call.function.name)
        {
            Some(tool) => tool,
            None => return format!("Error: unknown tool: {}", call.function.name),
        };

        match tool.execute(args, workspace).await {
            Ok(output) => output,
            Err(e) => format!("Error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::OpenRouterClient;
    use crate::models;

    fn test_agent(key: &str) -> Agent {
        let profile = models::lookup_profile(key).unwrap();
        Agent::new(Arc::new(OpenRouterClient::new(profile, "sk-or-test")))
    }

    #[test]
    fn agent_has_exactly_three_tools_in_order() {
        for key in ["gpt-oss", "qwen"] {
            let agent = test_agent(key);
            let names: Vec<&str> = agent.tools().iter().map(|tool| tool.name()).collect();
            assert_eq!(names, vec!["terminal", "file_editor", "task_tracker"]);
        }
    }

    #[test]
    fn system_prompt_names_workspace_and_tools() {
        let agent = test_agent("qwen");
        let prompt = agent.system_prompt(Path::new("/tmp/ws"));
        assert!(prompt.contains("/tmp/ws"));
        assert!(prompt.contains("**terminal**"));
        assert!(prompt.contains("**file_editor**"));
        assert!(prompt.contains("**task_tracker**"));
    }

    #[tokio::test]
    async fn unknown_tool_call_reports_error_text() {
        let agent = test_agent("qwen");
        let call = ToolCall {
            id: "call_1".to_string(),
            call_type: "function".to_string(),
            function: crate::llm::FunctionCall {
                name: "browser".to_string(),
                arguments: "{}".to_string(),
            },
        };
        let output = agent.execute_tool(&call, Path::new("/tmp")).await;
        assert!(output.contains("unknown tool: browser"));
    }
}
