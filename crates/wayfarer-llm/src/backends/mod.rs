/// Anthropic messages API backend.
pub mod anthropic;
/// OpenAI-compatible chat completions backend.
pub mod openai;

use async_trait::async_trait;
use wayfarer_core::{FailureReason, ProviderFailure};

/// A single completion request: system instructions plus the user prompt.
///
/// Generation parameters (temperature, max tokens) live in the provider's
/// [`crate::ModelConfig`], not here — the same request can be replayed
/// against every provider in a chain.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instructions guiding the model's behaviour.
    pub system_prompt: String,
    /// The user-facing prompt.
    pub user_prompt: String,
}

impl CompletionRequest {
    /// Build a request from system and user prompts.
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
        }
    }
}

/// Trait for language-model vendor backends.
///
/// Each vendor implements this to handle its own wire format; everything
/// above the backend (timeout, retries, fallback) is vendor-agnostic.
/// To add a vendor: implement `LlmBackend` in `backends/`, add the
/// variant to [`crate::LlmVendor`], and wire it up in
/// [`crate::LlmClient::new`].
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Perform one completion call. Transport and protocol failures are
    /// returned as a [`ProviderFailure`] with a machine-readable reason.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderFailure>;
}

/// Map a non-success HTTP status onto a failure reason.
pub(crate) fn classify_status(status: reqwest::StatusCode, body: &str) -> ProviderFailure {
    let reason = match status.as_u16() {
        429 => FailureReason::RateLimited,
        401 | 403 => FailureReason::Unauthorized,
        500..=599 => FailureReason::Unreachable,
        _ => FailureReason::Unknown,
    };
    ProviderFailure::new(reason, format!("{status}: {body}"))
}

/// Map a reqwest transport error onto a failure reason.
pub(crate) fn classify_transport(err: &reqwest::Error) -> ProviderFailure {
    let reason = if err.is_connect() || err.is_timeout() {
        FailureReason::Unreachable
    } else {
        FailureReason::Unknown
    };
    ProviderFailure::new(reason, err.to_string())
}
