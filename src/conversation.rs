//! Conversation handle: an agent paired with a workspace and message history.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::llm::{ChatMessage, Role};

/// How a conversation run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The agent produced a final message without further tool calls.
    Completed,
    /// The turn budget ran out before the agent finished.
    TurnBudgetExhausted,
}

/// A stateful session pairing an agent with a workspace.
///
/// The caller sends a message and invokes [`run`](Conversation::run); the loop
/// calls the model, executes requested tool calls, feeds results back, and
/// stops on a final assistant message or when the turn budget is exhausted.
pub struct Conversation {
    id: Uuid,
    agent: crate::agent::Agent,
    workspace: PathBuf,
    messages: Vec<ChatMessage>,
    max_turns: usize,
    outcome: Option<RunOutcome>,
}

impl std::fmt::Debug for Conversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversation")
            .field("id", &self.id)
            .field("workspace", &self.workspace)
            .field("messages", &self.messages)
            .field("max_turns", &self.max_turns)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

impl Conversation {
    /// Default turn budget when the caller does not pick one.
    pub const DEFAULT_MAX_TURNS: usize = 50;

    /// Pair `agent` with a workspace directory.
    ///
    /// The history starts with the agent's system prompt. No existence check
    /// is performed on the workspace; the tools surface that on first use.
    pub fn new(agent: crate::agent::Agent, workspace: impl Into<PathBuf>) -> Self {
        Self::with_max_turns(agent, workspace, Self::DEFAULT_MAX_TURNS)
    }

    /// Same as [`new`](Conversation::new) with an explicit turn budget.
    pub fn with_max_turns(
        agent: crate::agent::Agent,
        workspace: impl Into<PathBuf>,
        max_turns: usize,
    ) -> Self {
        let workspace = workspace.into();
        let system_prompt = agent.system_prompt(&workspace);
        Self {
            id: Uuid::new_v4(),
            agent,
            workspace,
            messages: vec![ChatMessage::system(system_prompt)],
            max_turns,
            outcome: None,
        }
    }

    /// Unique id of this conversation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The workspace directory the agent's tools are scoped to.
    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// The agent driving this conversation.
    pub fn agent(&self) -> &crate::agent::Agent {
        &self.agent
    }

    /// Full message history, system prompt included.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// How the last [`run`](Conversation::run) ended, if it has run.
    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    /// The last assistant message content, if any.
    pub fn last_assistant_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|message| message.role == Role::Assistant)
            .and_then(|message| message.content.as_deref())
    }

    /// Append a user message to the history.
    pub fn send_message(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::user(text));
    }

    /// Drive the conversation to completion.
    ///
    /// Blocks until the agent produces a final message, the turn budget is
    /// exhausted, or the LLM client reports an unrecovered error. Tool
    /// failures are reported back to the model as tool results rather than
    /// aborting the run.
    pub async fn run(&mut self) -> anyhow::Result<RunOutcome> {
        let tool_schemas = self.agent.tool_schemas();

        for turn in 0..self.max_turns {
            tracing::debug!("Conversation {} turn {}", self.id, turn + 1);

            let response = self
                .agent
                .llm()
                .chat_completion(&self.messages, Some(&tool_schemas))
                .await?;

            if let Some(usage) = &response.usage {
                tracing::debug!(
                    "Turn {}: {} prompt + {} completion tokens",
                    turn + 1,
                    usage.prompt_tokens,
                    usage.completion_tokens
                );
            }

            if response.has_tool_calls() {
                let tool_calls = response.tool_calls.unwrap_or_default();
                self.messages.push(ChatMessage::assistant_with_tool_calls(
                    response.content,
                    tool_calls.clone(),
                ));

                for call in &tool_calls {
                    tracing::info!(
                        "Tool call: {} {}",
                        call.function.name,
                        call.function.arguments
                    );
                    let result = self.agent.execute_tool(call, &self.workspace).await;
                    self.messages
                        .push(ChatMessage::tool_result(call.id.clone(), result));
                }

                continue;
            }

            // No tool calls - this is the final message.
            let content = response.content.unwrap_or_default();
            self.messages
                .push(ChatMessage::new(Role::Assistant, content));
            self.outcome = Some(RunOutcome::Completed);
            return Ok(RunOutcome::Completed);
        }

        tracing::warn!(
            "Conversation {} exhausted its {} turn budget",
            self.id,
            self.max_turns
        );
        self.outcome = Some(RunOutcome::TurnBudgetExhausted);
        Ok(RunOutcome::TurnBudgetExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::llm::{
        ChatResponse, FunctionCall, LlmClient, ToolCall, ToolDefinition,
    };
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::Mutex;

    /// Scripted client: returns canned responses in order.
    struct ScriptedLlm {
        responses: Mutex<Vec<ChatResponse>>,
    }

    impl ScriptedLlm {
        fn new(mut responses: Vec<ChatResponse>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        fn model(&self) -> &str {
            "scripted/test-model"
        }

        async fn chat_completion(
            &self,
            _messages: &[ChatMessage],
            _tools: Option<&[ToolDefinition]>,
        ) -> anyhow::Result<ChatResponse> {
            self.responses
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| anyhow::anyhow!("script exhausted"))
        }
    }

    fn text_response(content: &str) -> ChatResponse {
        ChatResponse {
            content: Some(content.to_string()),
            tool_calls: None,
            finish_reason: Some("stop".to_string()),
            usage: None,
            model: None,
        }
    }

    fn tool_call_response(name: &str, arguments: serde_json::Value) -> ChatResponse {
        ChatResponse {
            content: None,
            tool_calls: Some(vec![ToolCall {
                id: "call_1".to_string(),
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: name.to_string(),
                    arguments: arguments.to_string(),
                },
            }]),
            finish_reason: Some("tool_calls".to_string()),
            usage: None,
            model: None,
        }
    }

    #[tokio::test]
    async fn run_executes_tool_calls_then_completes() {
        let dir = tempfile::tempdir().unwrap();
        let llm = ScriptedLlm::new(vec![
            tool_call_response(
                "file_editor",
                serde_json::json!({
                    "command": "create",
                    "path": "test_output.txt",
                    "file_text": "Hello from the scripted run\n"
                }),
            ),
            text_response("Created test_output.txt with the greeting."),
        ]);

        let agent = Agent::new(Arc::new(llm));
        let mut conversation = Conversation::with_max_turns(agent, dir.path(), 10);
        conversation.send_message("Create a file called test_output.txt with the text 'Hello'");

        let outcome = conversation.run().await.unwrap();
        assert_eq!(outcome, RunOutcome::Completed);

        let written = std::fs::read_to_string(dir.path().join("test_output.txt")).unwrap();
        assert!(written.contains("Hello"));
        assert!(conversation
            .last_assistant_message()
            .unwrap()
            .contains("test_output.txt"));
    }

    #[tokio::test]
    async fn tool_failure_is_fed_back_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let llm = ScriptedLlm::new(vec![
            tool_call_response(
                "file_editor",
                serde_json::json!({"command": "view", "path": "missing.txt"}),
            ),
            text_response("The file does not exist."),
        ]);

        let agent = Agent::new(Arc::new(llm));
        let mut conversation = Conversation::with_max_turns(agent, dir.path(), 10);
        conversation.send_message("Look at missing.txt");

        let outcome = conversation.run().await.unwrap();
        assert_eq!(outcome, RunOutcome::Completed);

        let tool_result = conversation
            .messages()
            .iter()
            .find(|message| message.role == Role::Tool)
            .unwrap();
        assert!(tool_result.content.as_deref().unwrap().contains("Error"));
    }

    #[tokio::test]
    async fn turn_budget_exhaustion_is_an_outcome_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let llm = ScriptedLlm::new(vec![
            tool_call_response("task_tracker", serde_json::json!({"command": "view"})),
            tool_call_response("task_tracker", serde_json::json!({"command": "view"})),
            tool_call_response("task_tracker", serde_json::json!({"command": "view"})),
        ]);

        let agent = Agent::new(Arc::new(llm));
        let mut conversation = Conversation::with_max_turns(agent, dir.path(), 3);
        conversation.send_message("Loop forever");

        let outcome = conversation.run().await.unwrap();
        assert_eq!(outcome, RunOutcome::TurnBudgetExhausted);
        assert_eq!(
            conversation.outcome(),
            Some(&RunOutcome::TurnBudgetExhausted)
        );
    }

    #[tokio::test]
    async fn llm_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let llm = ScriptedLlm::new(vec![]);

        let agent = Agent::new(Arc::new(llm));
        let mut conversation = Conversation::with_max_turns(agent, dir.path(), 3);
        conversation.send_message("anything");

        assert!(conversation.run().await.is_err());
    }

    #[test]
    fn history_starts_with_system_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let agent = Agent::new(Arc::new(ScriptedLlm::new(vec![])));
        let conversation = Conversation::with_max_turns(agent, dir.path(), 3);

        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].role, Role::System);
    }
}
