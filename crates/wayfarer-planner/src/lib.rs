//! The travel planner: guardrail, feature extraction, query synthesis,
//! prompt construction, and plan composition around the LLM fallback
//! chain and the context aggregator.
//!
//! The single inbound operation is [`TravelPlanner::plan`]: free text in,
//! a structured [`TravelPlan`] out. Degraded context still produces a
//! plan; the only hard failure is
//! [`wayfarer_core::WayfarerError::AllProvidersExhausted`].
//!
//! # Main types
//!
//! - [`TravelPlanner`] — End-to-end request pipeline.
//! - [`TripFeatures`] — Typed output of the feature-extraction step.
//! - [`TravelPlan`] — The three artifacts plus trip metadata.

/// Section splitting of the generated text.
pub mod compose;
/// Feature extraction from free text.
pub mod features;
/// Cheap input validation ahead of any provider call.
pub mod guardrail;
/// The end-to-end pipeline.
pub mod planner;
/// Prompt construction for plan generation.
pub mod prompt;
/// Deterministic search-query synthesis.
pub mod queries;

pub use compose::{compose, PlanSections};
pub use features::TripFeatures;
pub use planner::{TravelPlan, TravelPlanner, TripMetadata};
pub use queries::build_queries;
