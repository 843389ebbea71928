use crate::backends::CompletionRequest;
use crate::client::LlmClient;
use tracing::{info, warn};
use wayfarer_core::{LlmAttempt, WayfarerError, WayfarerResult};

/// The result of a successful chain invocation: the winning provider's
/// text plus the full ordered attempt history, failed attempts included.
#[derive(Debug)]
pub struct ChainOutput {
    /// Generated text from the first provider that succeeded.
    pub text: String,
    /// Every attempt made, in configured order.
    pub attempts: Vec<LlmAttempt>,
}

impl ChainOutput {
    /// Identifier of the provider that produced the text.
    pub fn winning_provider(&self) -> Option<&str> {
        self.attempts
            .iter()
            .find(|a| a.status == wayfarer_core::ProviderStatus::Ok)
            .map(|a| a.provider.as_str())
    }
}

/// An ordered fallback chain over language-model provider clients.
///
/// Providers are tried strictly in configured order — never reordered,
/// never called speculatively in parallel. Per-provider timeout and retry
/// live inside each [`LlmClient`]; the chain only decides when to move on.
/// Trying the next provider never cancels a previous one mid-flight: each
/// client is simply abandoned once its own budget fires.
pub struct FallbackChain {
    clients: Vec<LlmClient>,
}

impl std::fmt::Debug for FallbackChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackChain")
            .field("providers", &self.provider_ids())
            .finish()
    }
}

impl FallbackChain {
    /// Build a chain from an ordered list of clients.
    pub fn new(clients: Vec<LlmClient>) -> WayfarerResult<Self> {
        if clients.is_empty() {
            return Err(WayfarerError::Config(
                "fallback chain requires at least one provider".to_string(),
            ));
        }
        Ok(Self { clients })
    }

    /// A chain of exactly one provider — no fallback. Used by the
    /// evaluation harness so a measured provider can never silently be
    /// substituted by another.
    pub fn single(client: LlmClient) -> Self {
        Self {
            clients: vec![client],
        }
    }

    /// Provider identifiers in chain order.
    pub fn provider_ids(&self) -> Vec<&str> {
        self.clients.iter().map(LlmClient::id).collect()
    }

    /// Number of providers in the chain.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether the chain has no providers. Always false for a constructed
    /// chain; present for API completeness.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Generate text, trying providers in order until one succeeds.
    ///
    /// Returns the winning text together with the full attempt history.
    /// If every provider fails, returns
    /// [`WayfarerError::AllProvidersExhausted`] carrying that history —
    /// the one hard failure on the planning path.
    pub async fn generate(&self, request: &CompletionRequest) -> WayfarerResult<ChainOutput> {
        let mut attempts = Vec::with_capacity(self.clients.len());

        for (index, client) in self.clients.iter().enumerate() {
            let result = client.invoke(request).await;
            let attempt = LlmAttempt::from_result(client.id(), index, &result);

            if result.is_ok() {
                info!(
                    provider = client.id(),
                    index,
                    latency_ms = result.latency_ms,
                    "chain succeeded"
                );
                attempts.push(attempt);
                return Ok(ChainOutput {
                    text: result.payload.unwrap_or_default(),
                    attempts,
                });
            }

            warn!(
                provider = client.id(),
                index,
                status = ?result.status,
                "chain link failed, moving to next provider"
            );
            attempts.push(attempt);
        }

        Err(WayfarerError::AllProvidersExhausted { attempts })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::backends::LlmBackend;
    use crate::config::{LlmVendor, ModelConfig, RetryPolicy};
    use async_trait::async_trait;
    use wayfarer_core::{FailureReason, ProviderFailure, ProviderStatus};

    struct FixedBackend {
        response: Result<String, ProviderFailure>,
    }

    #[async_trait]
    impl LlmBackend for FixedBackend {
        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<String, ProviderFailure> {
            self.response.clone()
        }
    }

    fn client(id: &str, response: Result<String, ProviderFailure>) -> LlmClient {
        let config = ModelConfig {
            id: id.to_string(),
            vendor: LlmVendor::Anthropic,
            model: "test".to_string(),
            api_key: "key".to_string(),
            api_base_url: None,
            temperature: 0.0,
            max_tokens: 64,
            timeout_ms: 1_000,
            retry: RetryPolicy {
                max_retries: 0,
                backoff_base_ms: 0,
                backoff_max_ms: 0,
            },
            cost_per_call: 0.0,
        };
        LlmClient::from_backend(config, Box::new(FixedBackend { response }))
    }

    fn unreachable() -> ProviderFailure {
        ProviderFailure::new(FailureReason::Unreachable, "503 Service Unavailable")
    }

    #[tokio::test]
    async fn first_success_short_circuits() {
        let chain = FallbackChain::new(vec![
            client("primary", Ok("from primary".to_string())),
            client("secondary", Ok("from secondary".to_string())),
        ])
        .unwrap();

        let output = chain
            .generate(&CompletionRequest::new("s", "u"))
            .await
            .unwrap();
        assert_eq!(output.text, "from primary");
        assert_eq!(output.attempts.len(), 1);
        assert_eq!(output.winning_provider(), Some("primary"));
    }

    #[tokio::test]
    async fn falls_through_to_third_provider() {
        let chain = FallbackChain::new(vec![
            client("first", Err(unreachable())),
            client(
                "second",
                Err(ProviderFailure::new(FailureReason::Unauthorized, "401")),
            ),
            client("third", Ok("third wins".to_string())),
        ])
        .unwrap();

        let output = chain
            .generate(&CompletionRequest::new("s", "u"))
            .await
            .unwrap();
        assert_eq!(output.text, "third wins");
        assert_eq!(output.attempts.len(), 3);
        assert_eq!(output.attempts[0].provider, "first");
        assert_eq!(output.attempts[1].provider, "second");
        assert_eq!(output.attempts[2].provider, "third");
        assert_eq!(output.attempts[2].status, ProviderStatus::Ok);
    }

    #[tokio::test]
    async fn exhaustion_carries_full_history() {
        let chain = FallbackChain::new(vec![
            client("a", Err(unreachable())),
            client("b", Err(unreachable())),
            client("c", Err(unreachable())),
            client("d", Err(unreachable())),
        ])
        .unwrap();

        let err = chain
            .generate(&CompletionRequest::new("s", "u"))
            .await
            .unwrap_err();
        match err {
            WayfarerError::AllProvidersExhausted { attempts } => {
                assert_eq!(attempts.len(), 4);
                let ids: Vec<_> = attempts.iter().map(|a| a.provider.as_str()).collect();
                assert_eq!(ids, vec!["a", "b", "c", "d"]);
            }
            other => panic!("expected AllProvidersExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_chain_is_a_config_error() {
        let err = FallbackChain::new(vec![]).unwrap_err();
        assert!(matches!(err, WayfarerError::Config(_)));
    }

    #[tokio::test]
    async fn single_provider_chain_never_falls_back() {
        let chain = FallbackChain::single(client("only", Err(unreachable())));
        assert_eq!(chain.len(), 1);

        let err = chain
            .generate(&CompletionRequest::new("s", "u"))
            .await
            .unwrap_err();
        match err {
            WayfarerError::AllProvidersExhausted { attempts } => {
                assert_eq!(attempts.len(), 1);
                assert_eq!(attempts[0].provider, "only");
            }
            other => panic!("expected AllProvidersExhausted, got {other:?}"),
        }
    }
}
