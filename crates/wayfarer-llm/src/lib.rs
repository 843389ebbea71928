//! Language-model provider clients and the deterministic fallback chain.
//!
//! Each vendor wire format lives behind the [`LlmBackend`] trait; the
//! [`LlmClient`] wraps one backend with the per-call timeout and the
//! retry-with-backoff policy; the [`FallbackChain`] iterates clients in
//! strict configured order until one succeeds.
//!
//! # Main types
//!
//! - [`ModelConfig`] — Immutable per-provider configuration.
//! - [`LlmClient`] — Timeout/retry wrapper; timeouts come back as data.
//! - [`FallbackChain`] — Ordered, non-speculative provider iteration.
//! - [`ChainOutput`] — Generated text plus the full attempt history.

/// Vendor wire-format implementations.
pub mod backends;
/// Fallback chain over an ordered list of clients.
pub mod chain;
/// Timeout and retry wrapper around a single backend.
pub mod client;
/// Provider configuration types.
pub mod config;

pub use backends::{CompletionRequest, LlmBackend};
pub use chain::{ChainOutput, FallbackChain};
pub use client::LlmClient;
pub use config::{LlmVendor, ModelConfig, RetryPolicy};
