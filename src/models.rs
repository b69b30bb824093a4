//! Model profile registry.
//!
//! Profiles bundle an OpenRouter model identifier with its invocation limits.
//! The registry is fixed at compile time and queried by exact key; there is no
//! fuzzy matching and no case normalization.

use thiserror::Error;

/// A named model configuration.
///
/// `model_id` uses the `openrouter/<provider>/<model>` routing form and is
/// passed through to the LLM client untouched; the client owns any
/// wire-format normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelProfile {
    /// Registry key, unique within [`PROFILES`].
    pub key: &'static str,
    /// Human-readable display name.
    pub name: &'static str,
    /// Model identifier in OpenRouter routing form.
    pub model_id: &'static str,
    /// Output token ceiling applied to every request under this profile.
    pub max_output_tokens: u64,
    /// Free-text description.
    pub description: &'static str,
}

/// Registry key used when the caller does not pick a profile.
pub const DEFAULT_MODEL_KEY: &str = "qwen";

/// All known profiles, in registry order.
pub const PROFILES: &[ModelProfile] = &[
    ModelProfile {
        key: "gpt-oss",
        name: "GPT-OSS-120B",
        model_id: "openrouter/openai/gpt-oss-120b",
        max_output_tokens: 8192,
        description: "OpenAI's open-source MoE model (117B total, 5.1B activated). \
                      Cost-effective: $0.039/M input, $0.19/M output",
    },
    ModelProfile {
        key: "qwen",
        name: "Qwen3 Coder",
        model_id: "openrouter/qwen/qwen3-coder",
        max_output_tokens: 16384,
        description: "Qwen3 Coder 480B (35B activated). High quality: \
                      $0.22/M input, $0.95/M output",
    },
];

/// Lookup of a key that is not in the registry.
#[derive(Debug, Error)]
#[error("Unknown model: {key}. Available: {}", .available.join(", "))]
pub struct UnknownModelError {
    /// The key that was requested.
    pub key: String,
    /// The keys that are actually defined, in registry order.
    pub available: Vec<&'static str>,
}

/// All registry keys, in registry order.
pub fn available_keys() -> Vec<&'static str> {
    PROFILES.iter().map(|profile| profile.key).collect()
}

/// Look up a profile by exact key.
///
/// # Errors
///
/// Returns [`UnknownModelError`] listing the available keys if `key` is not
/// in the registry.
pub fn lookup_profile(key: &str) -> Result<&'static ModelProfile, UnknownModelError> {
    PROFILES
        .iter()
        .find(|profile| profile.key == key)
        .ok_or_else(|| UnknownModelError {
            key: key.to_string(),
            available: available_keys(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_profile_is_well_formed() {
        for profile in PROFILES {
            assert!(!profile.key.is_empty());
            assert!(!profile.model_id.is_empty());
            assert!(profile.max_output_tokens > 0, "profile {}", profile.key);
        }
    }

    #[test]
    fn registry_keys_are_unique() {
        let keys = available_keys();
        let mut deduped = keys.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), keys.len());
    }

    #[test]
    fn gpt_oss_profile() {
        let profile = lookup_profile("gpt-oss").unwrap();
        assert_eq!(profile.name, "GPT-OSS-120B");
        assert_eq!(profile.model_id, "openrouter/openai/gpt-oss-120b");
        assert_eq!(profile.max_output_tokens, 8192);
    }

    #[test]
    fn qwen_profile() {
        let profile = lookup_profile("qwen").unwrap();
        assert_eq!(profile.name, "Qwen3 Coder");
        assert_eq!(profile.model_id, "openrouter/qwen/qwen3-coder");
        assert_eq!(profile.max_output_tokens, 16384);
    }

    #[test]
    fn default_key_is_registered() {
        assert!(lookup_profile(DEFAULT_MODEL_KEY).is_ok());
    }

    #[test]
    fn unknown_key_lists_available() {
        let err = lookup_profile("nonexistent-key").unwrap_err();
        assert_eq!(err.key, "nonexistent-key");
        assert_eq!(err.available, vec!["gpt-oss", "qwen"]);
        let message = err.to_string();
        assert!(message.contains("nonexistent-key"));
        assert!(message.contains("gpt-oss"));
        assert!(message.contains("qwen"));
    }

    #[test]
    fn lookup_is_exact_match_only() {
        assert!(lookup_profile("Qwen").is_err());
        assert!(lookup_profile("qwen ").is_err());
        assert!(lookup_profile("").is_err());
    }
}
