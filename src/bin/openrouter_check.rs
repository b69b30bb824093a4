//! One-shot OpenRouter connectivity check.
//!
//! Sends a single plain chat completion (no tools, no agent loop) against the
//! default model or the `LLM_MODEL` override, and prints the reply, the model
//! actually used, and token usage. Useful for validating credentials and
//! routing before letting an agent loose.

use agent_runner::config;
use agent_runner::llm::{ChatMessage, LlmClient, OpenRouterClient};
use agent_runner::models;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agent_runner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_key = config::resolve_api_key()?;
    let profile = models::lookup_profile(models::DEFAULT_MODEL_KEY)?;

    let client = match config::model_override() {
        Some(model) => OpenRouterClient::for_model(model, api_key, profile.max_output_tokens),
        None => OpenRouterClient::new(profile, api_key),
    };

    println!("Testing OpenRouter with model: {}", client.model());

    let messages = vec![ChatMessage::user(
        "Say 'Hello from Qwen3 Coder!' in exactly 5 words.",
    )];
    let response = client.chat_completion(&messages, None).await?;

    println!(
        "Response: {}",
        response.content.as_deref().unwrap_or("(empty)")
    );
    if let Some(model) = &response.model {
        println!("Model used: {}", model);
    }
    if let Some(usage) = &response.usage {
        println!(
            "Tokens: {} in, {} out",
            usage.prompt_tokens, usage.completion_tokens
        );
    }

    Ok(())
}
