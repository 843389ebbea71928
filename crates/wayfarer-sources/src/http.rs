//! Shared status/transport classification for the source clients.

use wayfarer_core::{FailureReason, ProviderFailure};

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

/// A contract violation: the provider answered, the body did not parse.
pub(crate) fn malformed(detail: impl Into<String>) -> ProviderFailure {
    ProviderFailure::new(FailureReason::MalformedResponse, detail)
}

pub(crate) fn elapsed_ms(started: std::time::Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

/// Run a fetch future under the client's time budget, folding the three
/// possible endings (payload, failure, deadline) into a `ProviderResult`.
pub(crate) async fn bounded<T, F>(timeout_ms: u64, fut: F) -> wayfarer_core::ProviderResult<T>
where
    F: std::future::Future<Output = Result<T, ProviderFailure>>,
{
    let started = std::time::Instant::now();
    match tokio::time::timeout(std::time::Duration::from_millis(timeout_ms), fut).await {
        Ok(Ok(payload)) => wayfarer_core::ProviderResult::ok(payload, elapsed_ms(started)),
        Ok(Err(failure)) => wayfarer_core::ProviderResult::error(failure, elapsed_ms(started)),
        Err(_) => wayfarer_core::ProviderResult::timeout(elapsed_ms(started)),
    }
}
