use serde::{Deserialize, Serialize};

/// Supported language-model vendor wire formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmVendor {
    /// Anthropic messages API.
    Anthropic,
    /// OpenAI chat completions API.
    OpenAi,
    /// OpenRouter — OpenAI-compatible API over many upstream models.
    OpenRouter,
}

/// Retry behaviour for a single provider client.
///
/// Retries happen *inside* the client, before the fallback chain moves on
/// to the next provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Extra attempts after the first, for retryable outcomes only.
    pub max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    pub backoff_base_ms: u64,
    /// Cap for the exponential backoff delay, in milliseconds.
    pub backoff_max_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff_base_ms: 500,
            backoff_max_ms: 8_000,
        }
    }
}

/// Configuration for one language-model provider.
///
/// Loaded once at startup and read-only thereafter; chain priority is the
/// position in the configured provider list, never load-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Stable identifier used in attempt histories and evaluation records.
    pub id: String,
    /// Which wire format to speak.
    pub vendor: LlmVendor,
    /// Vendor-specific model name.
    pub model: String,
    /// API key for the vendor.
    pub api_key: String,
    /// Base URL override, for proxies and tests.
    pub api_base_url: Option<String>,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate per call.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Per-attempt time budget in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Retry policy applied inside the client.
    #[serde(default)]
    pub retry: RetryPolicy,
    /// Approximate cost per call in USD, used as the ranking tie-breaker.
    #[serde(default)]
    pub cost_per_call: f64,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl ModelConfig {
    /// Resolve the base URL, preferring the configured override.
    pub fn base_url(&self) -> &str {
        if let Some(url) = &self.api_base_url {
            url
        } else {
            match self.vendor {
                LlmVendor::Anthropic => "https://api.anthropic.com",
                LlmVendor::OpenAi => "https://api.openai.com",
                LlmVendor::OpenRouter => "https://openrouter.ai/api",
            }
        }
    }
}
