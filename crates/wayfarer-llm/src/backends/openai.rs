use super::{classify_status, classify_transport, CompletionRequest, LlmBackend};
use crate::config::ModelConfig;
use async_trait::async_trait;
use wayfarer_core::{FailureReason, ProviderFailure};

/// OpenAI chat completions backend. Also speaks for OpenRouter, whose API
/// is wire-compatible.
pub struct OpenAiBackend {
    config: ModelConfig,
    http: reqwest::Client,
}

impl OpenAiBackend {
    /// Build a backend for the given provider configuration.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderFailure> {
        let url = format!("{}/v1/chat/completions", self.config.base_url());

        let body = serde_json::json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.user_prompt }
            ],
        });

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| classify_transport(&e))?;

        if !status.is_success() {
            return Err(classify_status(status, &text));
        }

        let parsed: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
            ProviderFailure::new(FailureReason::MalformedResponse, e.to_string())
        })?;

        parse_completion_text(&parsed)
    }
}

/// Extract the first choice's message content.
pub(crate) fn parse_completion_text(body: &serde_json::Value) -> Result<String, ProviderFailure> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            ProviderFailure::new(
                FailureReason::MalformedResponse,
                "missing choices[0].message.content in chat completion",
            )
        })
}
