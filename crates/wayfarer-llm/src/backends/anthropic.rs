use super::{classify_status, classify_transport, CompletionRequest, LlmBackend};
use crate::config::ModelConfig;
use async_trait::async_trait;
use wayfarer_core::{FailureReason, ProviderFailure};

/// Anthropic messages API backend.
pub struct AnthropicBackend {
    config: ModelConfig,
    http: reqwest::Client,
}

impl AnthropicBackend {
    /// Build a backend for the given provider configuration.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LlmBackend for AnthropicBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderFailure> {
        let url = format!("{}/v1/messages", self.config.base_url());

        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": request.system_prompt,
            "messages": [
                { "role": "user", "content": request.user_prompt }
            ],
        });

        let resp = self
            .http
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
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

        parse_message_text(&parsed)
    }
}

/// Extract the concatenated text blocks of a messages API response.
pub(crate) fn parse_message_text(body: &serde_json::Value) -> Result<String, ProviderFailure> {
    let content = body["content"].as_array().ok_or_else(|| {
        ProviderFailure::new(
            FailureReason::MalformedResponse,
            "missing content array in messages response",
        )
    })?;

    let text: Vec<&str> = content
        .iter()
        .filter(|block| block["type"].as_str() == Some("text"))
        .filter_map(|block| block["text"].as_str())
        .collect();

    if text.is_empty() {
        return Err(ProviderFailure::new(
            FailureReason::MalformedResponse,
            "messages response contained no text blocks",
        ));
    }

    Ok(text.join("\n"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_blocks() {
        let body = serde_json::json!({
            "content": [
                { "type": "text", "text": "first" },
                { "type": "text", "text": "second" }
            ],
            "stop_reason": "end_turn"
        });
        assert_eq!(parse_message_text(&body).unwrap(), "first\nsecond");
    }

    #[test]
    fn missing_content_is_malformed() {
        let body = serde_json::json!({ "stop_reason": "end_turn" });
        let err = parse_message_text(&body).unwrap_err();
        assert_eq!(err.reason, FailureReason::MalformedResponse);
    }

    #[test]
    fn empty_content_is_malformed() {
        let body = serde_json::json!({ "content": [] });
        let err = parse_message_text(&body).unwrap_err();
        assert_eq!(err.reason, FailureReason::MalformedResponse);
    }
}
