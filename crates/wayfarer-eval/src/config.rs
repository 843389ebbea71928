use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use wayfarer_core::{WayfarerError, WayfarerResult};
use wayfarer_llm::ModelConfig;

/// One rubric dimension the judge scores on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricDimension {
    /// Stable identifier used as the score key ("accuracy", ...).
    pub id: String,
    /// What the judge should rate under this dimension.
    pub description: String,
}

impl RubricDimension {
    /// Build a dimension from an id and a description.
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}

/// Configuration of one evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// The judge provider. Never a candidate — validation rejects that.
    pub judge: ModelConfig,
    /// Scoring dimensions, in prompt order.
    #[serde(default = "default_rubric")]
    pub rubric: Vec<RubricDimension>,
    /// Lowest score on the scale.
    #[serde(default = "default_scale_min")]
    pub scale_min: u8,
    /// Highest score on the scale.
    #[serde(default = "default_scale_max")]
    pub scale_max: u8,
    /// Cap on dataset samples per run; `None` runs them all.
    #[serde(default)]
    pub sample_limit: Option<usize>,
    /// Maximum (sample, provider) pairs in flight at once, to respect
    /// provider rate limits.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Where evaluation records are appended.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

fn default_rubric() -> Vec<RubricDimension> {
    vec![
        RubricDimension::new(
            "accuracy",
            "How factually grounded the plan is in the provided context",
        ),
        RubricDimension::new(
            "relevance",
            "How well the plan matches the stated preferences",
        ),
        RubricDimension::new(
            "completeness",
            "Whether every requested day and artifact is covered",
        ),
        RubricDimension::new(
            "usefulness",
            "Whether a traveler could follow the plan as written",
        ),
        RubricDimension::new(
            "creativity",
            "Whether the plan goes beyond the obvious tourist checklist",
        ),
    ]
}

fn default_scale_min() -> u8 {
    1
}

fn default_scale_max() -> u8 {
    10
}

fn default_max_concurrency() -> usize {
    4
}

fn default_output_path() -> PathBuf {
    PathBuf::from("evaluation_records.jsonl")
}

impl EvalConfig {
    /// Validate the run configuration against the candidate set.
    ///
    /// The judge must not be one of the candidates: a model scoring its
    /// own output corrupts the comparison, so the coincidence is rejected
    /// here instead of silently inherited.
    pub fn validate(&self, candidates: &[ModelConfig]) -> WayfarerResult<()> {
        if candidates.is_empty() {
            return Err(WayfarerError::Config(
                "evaluation needs at least one candidate provider".to_string(),
            ));
        }
        if self.rubric.is_empty() {
            return Err(WayfarerError::Config(
                "evaluation rubric cannot be empty".to_string(),
            ));
        }
        if self.scale_min >= self.scale_max {
            return Err(WayfarerError::Config(format!(
                "scale_min ({}) must be below scale_max ({})",
                self.scale_min, self.scale_max
            )));
        }
        if self.max_concurrency == 0 {
            return Err(WayfarerError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if let Some(candidate) = candidates.iter().find(|c| c.id == self.judge.id) {
            return Err(WayfarerError::Config(format!(
                "judge provider '{}' is also a candidate; a judge cannot score itself",
                candidate.id
            )));
        }
        Ok(())
    }
}
