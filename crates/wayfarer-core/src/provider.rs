use serde::{Deserialize, Serialize};

/// The kind of external dependency a provider client wraps.
///
/// A closed set resolved at configuration load time — no string-keyed
/// dispatch at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderCategory {
    /// A language-model vendor used for plan generation.
    Llm,
    /// A language model used solely to score another model's output.
    Judge,
    /// Weather forecast service.
    Weather,
    /// Geocoding / maps service.
    Maps,
    /// Web search service.
    Search,
    /// Page scraping / extraction service.
    Scrape,
}

/// The four categories the context aggregator fans out to.
pub const DATA_SOURCE_CATEGORIES: [ProviderCategory; 4] = [
    ProviderCategory::Weather,
    ProviderCategory::Maps,
    ProviderCategory::Search,
    ProviderCategory::Scrape,
];

impl std::fmt::Display for ProviderCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderCategory::Llm => write!(f, "llm"),
            ProviderCategory::Judge => write!(f, "judge"),
            ProviderCategory::Weather => write!(f, "weather"),
            ProviderCategory::Maps => write!(f, "maps"),
            ProviderCategory::Search => write!(f, "search"),
            ProviderCategory::Scrape => write!(f, "scrape"),
        }
    }
}

/// Outcome status of a single provider invocation.
///
/// Timeouts and errors are data from the caller's perspective, never
/// exceptional control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    /// The call succeeded and the payload is usable.
    Ok,
    /// The call produced partial or fallback data.
    Degraded,
    /// The call exceeded its configured time budget.
    Timeout,
    /// The call failed with a transport or protocol error.
    Error,
}

/// Machine-readable reason for a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The provider rejected the call with a rate limit (HTTP 429).
    RateLimited,
    /// Authentication or authorization failed (HTTP 401/403).
    Unauthorized,
    /// The provider could not be reached or answered with a server error.
    Unreachable,
    /// The provider answered, but the body violated the expected contract.
    MalformedResponse,
    /// Anything that does not fit the categories above.
    Unknown,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::RateLimited => write!(f, "rate_limited"),
            FailureReason::Unauthorized => write!(f, "unauthorized"),
            FailureReason::Unreachable => write!(f, "unreachable"),
            FailureReason::MalformedResponse => write!(f, "malformed_response"),
            FailureReason::Unknown => write!(f, "unknown"),
        }
    }
}

/// A provider failure: machine-readable reason plus free-text detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{reason}: {detail}")]
pub struct ProviderFailure {
    /// Why the call failed, as a closed reason code.
    pub reason: FailureReason,
    /// Human-readable detail (upstream status line, parse error, ...).
    pub detail: String,
}

impl ProviderFailure {
    /// Create a failure with the given reason and detail.
    pub fn new(reason: FailureReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: detail.into(),
        }
    }

    /// Whether retrying this failure could plausibly succeed.
    ///
    /// Rate limits and unreachable hosts are transient; a rejected key or
    /// a contract violation will fail the same way every time.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.reason,
            FailureReason::RateLimited | FailureReason::Unreachable
        )
    }
}

/// The write-once outcome of one provider invocation.
///
/// Constructed exactly once per call via the constructors below and never
/// mutated afterwards. The payload is present only for [`ProviderStatus::Ok`]
/// and [`ProviderStatus::Degraded`] outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResult<T> {
    /// Outcome status of the invocation.
    pub status: ProviderStatus,
    /// Typed payload, when the invocation produced one.
    pub payload: Option<T>,
    /// Wall-clock latency of the invocation in milliseconds.
    pub latency_ms: u64,
    /// Failure detail for non-`Ok` outcomes.
    pub failure: Option<ProviderFailure>,
}

impl<T> ProviderResult<T> {
    /// A successful invocation with a usable payload.
    pub fn ok(payload: T, latency_ms: u64) -> Self {
        Self {
            status: ProviderStatus::Ok,
            payload: Some(payload),
            latency_ms,
            failure: None,
        }
    }

    /// A degraded invocation: partial or fallback data, still usable.
    pub fn degraded(payload: Option<T>, failure: ProviderFailure, latency_ms: u64) -> Self {
        Self {
            status: ProviderStatus::Degraded,
            payload,
            latency_ms,
            failure: Some(failure),
        }
    }

    /// An invocation that exceeded its time budget.
    pub fn timeout(budget_ms: u64) -> Self {
        Self {
            status: ProviderStatus::Timeout,
            payload: None,
            latency_ms: budget_ms,
            failure: None,
        }
    }

    /// A failed invocation with a machine-readable reason.
    pub fn error(failure: ProviderFailure, latency_ms: u64) -> Self {
        Self {
            status: ProviderStatus::Error,
            payload: None,
            latency_ms,
            failure: Some(failure),
        }
    }

    /// Whether the invocation produced a usable payload.
    pub fn is_ok(&self) -> bool {
        self.status == ProviderStatus::Ok
    }

    /// Whether this outcome would be worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self.status {
            ProviderStatus::Timeout => true,
            ProviderStatus::Error => self
                .failure
                .as_ref()
                .is_some_and(ProviderFailure::is_retryable),
            ProviderStatus::Ok | ProviderStatus::Degraded => false,
        }
    }

    /// Map the payload type, preserving status, latency, and failure.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ProviderResult<U> {
        ProviderResult {
            status: self.status,
            payload: self.payload.map(f),
            latency_ms: self.latency_ms,
            failure: self.failure,
        }
    }
}

/// One ordered try of a language-model provider within a fallback chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmAttempt {
    /// Identifier of the provider that was tried.
    pub provider: String,
    /// Zero-based position within the chain invocation.
    pub index: usize,
    /// Outcome status of the attempt.
    pub status: ProviderStatus,
    /// Latency of the attempt in milliseconds, retries included.
    pub latency_ms: u64,
    /// Failure detail for non-`Ok` attempts.
    pub failure: Option<ProviderFailure>,
}

impl LlmAttempt {
    /// Record a successful attempt.
    pub fn ok(provider: impl Into<String>, index: usize, latency_ms: u64) -> Self {
        Self {
            provider: provider.into(),
            index,
            status: ProviderStatus::Ok,
            latency_ms,
            failure: None,
        }
    }

    /// Record a failed attempt.
    pub fn failed(
        provider: impl Into<String>,
        index: usize,
        failure: ProviderFailure,
        latency_ms: u64,
    ) -> Self {
        Self {
            provider: provider.into(),
            index,
            status: ProviderStatus::Error,
            latency_ms,
            failure: Some(failure),
        }
    }

    /// Record an attempt that exceeded its time budget.
    pub fn timed_out(provider: impl Into<String>, index: usize, budget_ms: u64) -> Self {
        Self {
            provider: provider.into(),
            index,
            status: ProviderStatus::Timeout,
            latency_ms: budget_ms,
            failure: None,
        }
    }

    /// Fold a [`ProviderResult`] into an attempt record.
    pub fn from_result<T>(
        provider: impl Into<String>,
        index: usize,
        result: &ProviderResult<T>,
    ) -> Self {
        Self {
            provider: provider.into(),
            index,
            status: result.status,
            latency_ms: result.latency_ms,
            failure: result.failure.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ok_result_carries_payload() {
        let result = ProviderResult::ok("payload", 42);
        assert_eq!(result.status, ProviderStatus::Ok);
        assert_eq!(result.payload.as_deref(), Some("payload"));
        assert_eq!(result.latency_ms, 42);
        assert!(result.failure.is_none());
        assert!(result.is_ok());
    }

    #[test]
    fn timeout_result_has_no_payload() {
        let result: ProviderResult<String> = ProviderResult::timeout(500);
        assert_eq!(result.status, ProviderStatus::Timeout);
        assert!(result.payload.is_none());
        assert!(result.is_retryable());
    }

    #[test]
    fn retryability_follows_reason_codes() {
        for (reason, retryable) in [
            (FailureReason::RateLimited, true),
            (FailureReason::Unreachable, true),
            (FailureReason::Unauthorized, false),
            (FailureReason::MalformedResponse, false),
            (FailureReason::Unknown, false),
        ] {
            let failure = ProviderFailure::new(reason, "detail");
            assert_eq!(failure.is_retryable(), retryable, "reason {reason}");
            let result: ProviderResult<()> = ProviderResult::error(failure, 1);
            assert_eq!(result.is_retryable(), retryable);
        }
    }

    #[test]
    fn degraded_result_keeps_fallback_payload() {
        let failure = ProviderFailure::new(FailureReason::Unreachable, "502 Bad Gateway");
        let result = ProviderResult::degraded(Some(vec![1, 2]), failure, 90);
        assert_eq!(result.status, ProviderStatus::Degraded);
        assert!(result.payload.is_some());
        assert!(!result.is_retryable());
    }

    #[test]
    fn map_preserves_outcome_metadata() {
        let result = ProviderResult::ok(3u32, 17).map(|n| n * 2);
        assert_eq!(result.payload, Some(6));
        assert_eq!(result.latency_ms, 17);
        assert_eq!(result.status, ProviderStatus::Ok);
    }

    #[test]
    fn failure_reason_serializes_snake_case() {
        let json = serde_json::to_string(&FailureReason::MalformedResponse).unwrap();
        assert_eq!(json, "\"malformed_response\"");
        let parsed: FailureReason = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, FailureReason::MalformedResponse);
    }

    #[test]
    fn category_display_matches_serde() {
        for category in DATA_SOURCE_CATEGORIES {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{category}\""));
        }
    }

    #[test]
    fn attempt_from_result_copies_outcome() {
        let failure = ProviderFailure::new(FailureReason::RateLimited, "429 Too Many Requests");
        let result: ProviderResult<String> = ProviderResult::error(failure.clone(), 33);
        let attempt = LlmAttempt::from_result("claude-primary", 0, &result);
        assert_eq!(attempt.provider, "claude-primary");
        assert_eq!(attempt.status, ProviderStatus::Error);
        assert_eq!(attempt.latency_ms, 33);
        assert_eq!(attempt.failure, Some(failure));
    }
}
