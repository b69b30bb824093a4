//! # agent-runner
//!
//! Run autonomous coding agents against OpenRouter-hosted models.
//!
//! The crate resolves a logical model key to a [`models::ModelProfile`],
//! validates the `OPENROUTER_API_KEY` credential, builds an LLM client bound
//! to that profile, wires up an [`agent::Agent`] with a fixed three-tool set
//! (terminal, file editor, task tracker), and drives a
//! [`conversation::Conversation`] over a workspace directory to completion.
//!
//! ## Task Flow
//! 1. Look up the model profile (`"gpt-oss"` or `"qwen"`)
//! 2. Resolve the credential (environment, seeded from `.env` if present)
//! 3. Build client + agent, attach a conversation over the workspace
//! 4. Send one task message and run the tool-calling loop to completion
//!
//! ## Modules
//! - `config`: environment and credential resolution
//! - `models`: the static model-profile registry
//! - `llm`: chat wire types and the OpenRouter client
//! - `tools`: the fixed tool set
//! - `agent` / `conversation`: the opaque run handles
//! - `runner`: the facade tying it all together

pub mod agent;
pub mod config;
pub mod conversation;
pub mod llm;
pub mod models;
pub mod runner;
pub mod tools;

pub use agent::Agent;
pub use config::ConfigError;
pub use conversation::{Conversation, RunOutcome};
pub use models::{lookup_profile, ModelProfile, UnknownModelError, DEFAULT_MODEL_KEY, PROFILES};
pub use runner::{run, run_gpt_oss, run_qwen, RunRequest};
