use crate::backends::anthropic::AnthropicBackend;
use crate::backends::openai::OpenAiBackend;
use crate::backends::{CompletionRequest, LlmBackend};
use crate::config::{LlmVendor, ModelConfig, RetryPolicy};
use rand::Rng;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use wayfarer_core::ProviderResult;

/// A language-model provider client: one backend wrapped with the
/// per-attempt timeout and the retry policy.
///
/// `invoke` never returns an error — timeouts and failures are data in
/// the returned [`ProviderResult`], and retries for retryable outcomes
/// happen here, inside the client, before a fallback chain ever moves on
/// to the next provider.
pub struct LlmClient {
    config: ModelConfig,
    backend: Box<dyn LlmBackend>,
}

impl LlmClient {
    /// Build a client, resolving the vendor tag into a typed backend.
    pub fn new(config: ModelConfig) -> Self {
        let backend: Box<dyn LlmBackend> = match config.vendor {
            LlmVendor::Anthropic => Box::new(AnthropicBackend::new(config.clone())),
            LlmVendor::OpenAi | LlmVendor::OpenRouter => {
                Box::new(OpenAiBackend::new(config.clone()))
            }
        };
        Self { config, backend }
    }

    /// Build a client from a pre-built backend (tests, custom vendors).
    pub fn from_backend(config: ModelConfig, backend: Box<dyn LlmBackend>) -> Self {
        Self { config, backend }
    }

    /// Stable identifier of the wrapped provider.
    pub fn id(&self) -> &str {
        &self.config.id
    }

    /// The provider configuration this client was built from.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Perform one completion, bounded by the configured timeout and
    /// retried per the configured policy for retryable outcomes only.
    ///
    /// Latency in the returned result covers the whole invocation,
    /// backoff sleeps included.
    pub async fn invoke(&self, request: &CompletionRequest) -> ProviderResult<String> {
        let started = Instant::now();
        let budget = Duration::from_millis(self.config.timeout_ms);
        let policy = &self.config.retry;
        let mut attempt = 0u32;

        loop {
            let outcome = match tokio::time::timeout(budget, self.backend.complete(request)).await {
                Ok(Ok(text)) => {
                    let latency = elapsed_ms(started);
                    debug!(provider = %self.config.id, latency_ms = latency, "completion ok");
                    return ProviderResult::ok(text, latency);
                }
                Ok(Err(failure)) => ProviderResult::error(failure, elapsed_ms(started)),
                Err(_) => ProviderResult::timeout(elapsed_ms(started)),
            };

            if !outcome.is_retryable() || attempt >= policy.max_retries {
                warn!(
                    provider = %self.config.id,
                    status = ?outcome.status,
                    attempts = attempt + 1,
                    "completion failed"
                );
                return outcome;
            }

            let delay = backoff_with_jitter(policy, attempt);
            info!(
                provider = %self.config.id,
                attempt,
                delay_ms = delay,
                "retryable failure, backing off"
            );
            tokio::time::sleep(Duration::from_millis(delay)).await;
            attempt += 1;
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

/// Exponential backoff capped at `backoff_max_ms`.
fn compute_backoff(policy: &RetryPolicy, attempt: u32) -> u64 {
    let delay = policy
        .backoff_base_ms
        .saturating_mul(2u64.saturating_pow(attempt));
    delay.min(policy.backoff_max_ms)
}

/// Backoff plus uniform jitter of up to a quarter of the delay, so
/// concurrent retriers do not fall into lockstep against a rate limiter.
fn backoff_with_jitter(policy: &RetryPolicy, attempt: u32) -> u64 {
    let delay = compute_backoff(policy, attempt);
    delay + rand::thread_rng().gen_range(0..=delay / 4)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use wayfarer_core::{FailureReason, ProviderFailure, ProviderStatus};

    /// A mock backend that returns a scripted sequence of results.
    struct ScriptedBackend {
        results: tokio::sync::Mutex<Vec<Result<String, ProviderFailure>>>,
        calls: Arc<AtomicU32>,
    }

    impl ScriptedBackend {
        fn new(results: Vec<Result<String, ProviderFailure>>) -> Self {
            Self {
                results: tokio::sync::Mutex::new(results),
                calls: Arc::new(AtomicU32::new(0)),
            }
        }
    }

    #[async_trait]
    impl crate::backends::LlmBackend for ScriptedBackend {
        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<String, ProviderFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut results = self.results.lock().await;
            if results.is_empty() {
                Err(ProviderFailure::new(
                    FailureReason::Unknown,
                    "scripted backend exhausted",
                ))
            } else {
                results.remove(0)
            }
        }
    }

    /// A backend that never answers within any reasonable budget.
    struct StallingBackend;

    #[async_trait]
    impl crate::backends::LlmBackend for StallingBackend {
        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<String, ProviderFailure> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("never".to_string())
        }
    }

    fn test_config(max_retries: u32) -> ModelConfig {
        ModelConfig {
            id: "test-provider".to_string(),
            vendor: LlmVendor::Anthropic,
            model: "test-model".to_string(),
            api_key: "key".to_string(),
            api_base_url: None,
            temperature: 0.0,
            max_tokens: 128,
            timeout_ms: 50,
            retry: RetryPolicy {
                max_retries,
                backoff_base_ms: 0,
                backoff_max_ms: 0,
            },
            cost_per_call: 0.0,
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new("system", "user")
    }

    #[tokio::test]
    async fn retryable_failure_is_retried_then_succeeds() {
        let backend = ScriptedBackend::new(vec![
            Err(ProviderFailure::new(FailureReason::RateLimited, "429")),
            Ok("recovered".to_string()),
        ]);
        let client = LlmClient::from_backend(test_config(2), Box::new(backend));

        let result = client.invoke(&request()).await;
        assert_eq!(result.status, ProviderStatus::Ok);
        assert_eq!(result.payload.as_deref(), Some("recovered"));
    }

    #[tokio::test]
    async fn permanent_failure_consumes_exactly_one_attempt() {
        let backend = ScriptedBackend::new(vec![
            Err(ProviderFailure::new(FailureReason::Unauthorized, "401")),
            Ok("should not be reached".to_string()),
        ]);
        let client = LlmClient::from_backend(test_config(3), Box::new(backend));

        let result = client.invoke(&request()).await;
        assert_eq!(result.status, ProviderStatus::Error);
        assert_eq!(
            result.failure.unwrap().reason,
            FailureReason::Unauthorized
        );
    }

    #[tokio::test]
    async fn retries_stop_at_configured_count() {
        let failures: Vec<Result<String, ProviderFailure>> = (0..10)
            .map(|_| {
                Err(ProviderFailure::new(
                    FailureReason::Unreachable,
                    "502 Bad Gateway",
                ))
            })
            .collect();
        let backend = ScriptedBackend::new(failures);
        let calls = Arc::clone(&backend.calls);
        let client = LlmClient::from_backend(test_config(2), Box::new(backend));

        let result = client.invoke(&request()).await;
        assert_eq!(result.status, ProviderStatus::Error);
        // 1 initial + 2 retries
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn timeout_comes_back_as_data() {
        let client = LlmClient::from_backend(test_config(0), Box::new(StallingBackend));
        let result = client.invoke(&request()).await;
        assert_eq!(result.status, ProviderStatus::Timeout);
        assert!(result.payload.is_none());
        assert!(result.latency_ms >= 50);
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_retries: 5,
            backoff_base_ms: 500,
            backoff_max_ms: 4_000,
        };
        assert_eq!(compute_backoff(&policy, 0), 500);
        assert_eq!(compute_backoff(&policy, 1), 1_000);
        assert_eq!(compute_backoff(&policy, 2), 2_000);
        assert_eq!(compute_backoff(&policy, 3), 4_000);
        assert_eq!(compute_backoff(&policy, 4), 4_000); // capped
    }

    #[test]
    fn jitter_stays_within_a_quarter_of_the_delay() {
        let policy = RetryPolicy {
            max_retries: 1,
            backoff_base_ms: 400,
            backoff_max_ms: 8_000,
        };
        for _ in 0..100 {
            let delay = backoff_with_jitter(&policy, 1);
            assert!((800..=1_000).contains(&delay), "delay {delay} out of range");
        }
    }
}
