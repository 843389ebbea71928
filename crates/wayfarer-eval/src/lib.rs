//! Offline evaluation harness: runs the planner against each candidate
//! provider over a fixed dataset, scores every output with a dedicated
//! judge model against a fixed rubric, and aggregates the results.
//!
//! One [`EvaluationRecord`] per (sample, candidate) pair, always —
//! failures are recorded, never skipped — appended to a JSONL store and
//! summarized per provider and rubric dimension.
//!
//! # Main types
//!
//! - [`EvalConfig`] — Judge, rubric, scale, and concurrency settings.
//! - [`EvaluationHarness`] — The bounded-concurrency driver.
//! - [`JudgeClient`] — Rubric-prompted scoring of generated plans.
//! - [`JsonlStore`] — Append-only record persistence.
//! - [`ProviderSummary`] — Ranked per-provider aggregation.

/// Evaluation configuration and validation.
pub mod config;
/// Dataset loading.
pub mod dataset;
/// The per-sample state machine and concurrent driver.
pub mod harness;
/// Judge scoring client.
pub mod judge;
/// The persisted record type.
pub mod record;
/// Aggregation and ranking.
pub mod report;
/// JSONL persistence.
pub mod store;

pub use config::{EvalConfig, RubricDimension};
pub use dataset::{load_samples, Sample};
pub use harness::EvaluationHarness;
pub use judge::{JudgeClient, JudgeScores};
pub use record::{EvaluationRecord, RecordStatus};
pub use report::{summarize, DimensionStats, ProviderSummary};
pub use store::JsonlStore;
