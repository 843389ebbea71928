//! Core types and error definitions for the Wayfarer travel-planning engine.
//!
//! This crate provides the foundational types shared across all Wayfarer
//! crates: the error taxonomy, provider categories, and the write-once
//! [`ProviderResult`] that threads degradation through every layer as data
//! rather than control flow.
//!
//! # Main types
//!
//! - [`WayfarerError`] — Unified error enum for all Wayfarer subsystems.
//! - [`WayfarerResult`] — Convenience alias for `Result<T, WayfarerError>`.
//! - [`ProviderCategory`] — Closed set of external dependency kinds.
//! - [`ProviderResult`] — Outcome of a single provider invocation.
//! - [`ProviderFailure`] — Machine-readable failure reason plus detail.
//! - [`LlmAttempt`] — One ordered try within a fallback chain.

/// Provider invocation outcomes and categories.
pub mod provider;
/// Helpers for parsing model output.
pub mod text;

pub use provider::{
    FailureReason, LlmAttempt, ProviderCategory, ProviderFailure, ProviderResult, ProviderStatus,
    DATA_SOURCE_CATEGORIES,
};

/// Top-level error type for the Wayfarer engine.
///
/// Provider-level failures (`Timeout`, `TransientProvider`,
/// `PermanentProvider`) are normally absorbed into a [`ProviderResult`]
/// before they reach a caller; the only fatal condition on the planning
/// path is [`WayfarerError::AllProvidersExhausted`].
#[derive(Debug, thiserror::Error)]
pub enum WayfarerError {
    /// A provider exceeded its configured time budget.
    #[error("provider '{0}' timed out")]
    Timeout(String),

    /// A retryable provider failure (rate limit, transient network).
    #[error("transient provider error: {0}")]
    TransientProvider(ProviderFailure),

    /// A non-retryable provider failure (auth, malformed contract).
    #[error("permanent provider error: {0}")]
    PermanentProvider(ProviderFailure),

    /// Every language-model provider in the fallback chain failed.
    ///
    /// Carries the full ordered attempt history for observability.
    #[error("all language-model providers exhausted after {} attempts", attempts.len())]
    AllProvidersExhausted {
        /// Ordered history of every attempt made before giving up.
        attempts: Vec<LlmAttempt>,
    },

    /// The inbound request was rejected before any provider was contacted.
    #[error("validation error: {0}")]
    Validation(String),

    /// An error in configuration parsing or validation.
    #[error("config error: {0}")]
    Config(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WayfarerError {
    /// Classify a provider failure into the transient/permanent split.
    pub fn from_failure(failure: ProviderFailure) -> Self {
        if failure.is_retryable() {
            WayfarerError::TransientProvider(failure)
        } else {
            WayfarerError::PermanentProvider(failure)
        }
    }
}

/// A convenience `Result` alias using [`WayfarerError`].
pub type WayfarerResult<T> = Result<T, WayfarerError>;
