//! The agent runner facade.
//!
//! Translates a (model key, task, workspace) triple into one completed agent
//! run: resolve the profile, resolve the credential, build the client and
//! agent, attach a conversation over the workspace, send the task, and drive
//! the run loop to completion. A single straight-line sequence - no retries,
//! no timeouts of its own.

use std::path::PathBuf;
use std::sync::Arc;

use crate::agent::Agent;
use crate::config;
use crate::conversation::{Conversation, RunOutcome};
use crate::llm::OpenRouterClient;
use crate::models;

/// One agent invocation.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Registry key of the model profile to run under.
    pub model_key: String,
    /// The task description sent as the conversation's only message.
    pub task: String,
    /// Workspace directory; defaults to the current working directory.
    pub workspace: Option<PathBuf>,
    /// Whether to print progress lines.
    pub verbose: bool,
}

impl RunRequest {
    /// A verbose request with the default workspace.
    pub fn new(model_key: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            model_key: model_key.into(),
            task: task.into(),
            workspace: None,
            verbose: true,
        }
    }

    /// Set the workspace directory.
    pub fn with_workspace(mut self, workspace: impl Into<PathBuf>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    /// Silence the progress lines.
    pub fn quiet(mut self) -> Self {
        self.verbose = false;
        self
    }
}

/// Run an agent with the specified model and task.
///
/// Returns the completed conversation; the caller owns it and may inspect the
/// message history or the artifacts the tools wrote into the workspace.
///
/// # Errors
///
/// - [`models::UnknownModelError`] if `model_key` is not in the registry.
/// - [`config::ConfigError::MissingEnvVar`] if the API key is absent/empty.
/// - Any error the LLM client reports during the run, unchanged.
pub async fn run(request: RunRequest) -> anyhow::Result<Conversation> {
    let profile = models::lookup_profile(&request.model_key)?;
    let api_key = config::resolve_api_key()?;

    // LLM_MODEL overrides the identifier for ad hoc runs; the profile's
    // output ceiling still applies.
    let client = match config::model_override() {
        Some(model) => {
            tracing::info!("Model override from environment: {}", model);
            OpenRouterClient::for_model(model, api_key, profile.max_output_tokens)
        }
        None => OpenRouterClient::new(profile, api_key),
    };

    let agent = Agent::new(Arc::new(client));

    let workspace = match request.workspace {
        Some(workspace) => workspace,
        None => std::env::current_dir()?,
    };

    let max_turns = config::max_turns()?;
    let mut conversation = Conversation::with_max_turns(agent, workspace, max_turns);

    if request.verbose {
        println!("Sending task to agent: {}", request.task);
        println!(
            "Using model: {} ({})",
            profile.name,
            conversation.agent().model()
        );
    }

    conversation.send_message(&request.task);
    let outcome = conversation.run().await?;

    if request.verbose {
        match outcome {
            RunOutcome::Completed => println!("All done."),
            RunOutcome::TurnBudgetExhausted => println!("Stopped: turn budget exhausted."),
        }
    }

    Ok(conversation)
}

/// Run a task under the `gpt-oss` profile.
pub async fn run_gpt_oss(task: impl Into<String>) -> anyhow::Result<Conversation> {
    run(RunRequest::new("gpt-oss", task)).await
}

/// Run a task under the `qwen` profile.
pub async fn run_qwen(task: impl Into<String>) -> anyhow::Result<Conversation> {
    run(RunRequest::new("qwen", task)).await
}
