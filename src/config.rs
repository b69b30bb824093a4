//! Configuration and credential resolution.
//!
//! Configuration is environment-driven:
//! - `OPENROUTER_API_KEY` - Required. Your OpenRouter API key.
//! - `LLM_MODEL` - Optional. Overrides the selected profile's model identifier
//!   for ad hoc runs.
//! - `MAX_TURNS` - Optional. Turn budget for the conversation loop. Defaults to `50`.
//!
//! A `.env` file in the working directory, if present, is merged into the
//! process environment before any variable is read. Variables already set in
//! the environment always win over the file.

use std::path::Path;
use thiserror::Error;

/// Environment variable holding the OpenRouter API key.
pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";

/// Environment variable overriding the model identifier.
pub const MODEL_VAR: &str = "LLM_MODEL";

/// Environment variable overriding the conversation turn budget.
pub const MAX_TURNS_VAR: &str = "MAX_TURNS";

const DEFAULT_MAX_TURNS: usize = 50;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Merge `KEY=VALUE` pairs from an env-style file into the process environment.
///
/// Variables already present in the environment are left untouched. Blank
/// lines and `#` comments are skipped; so are malformed lines, with a warning,
/// since the file is an optional convenience and must not make startup fail.
/// A missing file is not an error.
pub fn load_env_file(path: &Path) {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return,
    };

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            tracing::warn!(
                "Skipping malformed line {}:{}: {}",
                path.display(),
                line_num + 1,
                line
            );
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            tracing::warn!(
                "Skipping malformed line {}:{}: empty key",
                path.display(),
                line_num + 1
            );
            continue;
        }

        // Existing environment wins over the file.
        if std::env::var_os(key).is_some() {
            continue;
        }

        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
            .unwrap_or(value);

        std::env::set_var(key, value);
    }
}

/// Resolve the OpenRouter API key.
///
/// Merges `./.env` into the environment first, then reads [`API_KEY_VAR`].
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` if the variable is unset or empty.
pub fn resolve_api_key() -> Result<String, ConfigError> {
    load_env_file(Path::new(".env"));

    std::env::var(API_KEY_VAR)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(API_KEY_VAR.to_string()))
}

/// Model identifier override from [`MODEL_VAR`], if set and non-empty.
pub fn model_override() -> Option<String> {
    std::env::var(MODEL_VAR)
        .ok()
        .filter(|model| !model.trim().is_empty())
}

/// Turn budget for the conversation loop.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if [`MAX_TURNS_VAR`] is set but not a
/// positive integer.
pub fn max_turns() -> Result<usize, ConfigError> {
    match std::env::var(MAX_TURNS_VAR) {
        Err(_) => Ok(DEFAULT_MAX_TURNS),
        Ok(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|turns| *turns > 0)
            .ok_or_else(|| ConfigError::InvalidValue(MAX_TURNS_VAR.to_string(), raw)),
    }
}
