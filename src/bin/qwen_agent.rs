//! Run a directory-summary task with Qwen3 Coder via OpenRouter.
//!
//! Zero-argument entry point; exits non-zero with a diagnostic on failure.

use agent_runner::runner;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const TASK: &str = "List the files in the current directory and write a summary to SUMMARY.txt";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agent_runner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    runner::run_qwen(TASK).await?;

    Ok(())
}
