use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Terminal status of one (sample, candidate) evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// A plan was generated; scores are present unless the judge failed.
    Recorded,
    /// The candidate's chain was exhausted; there is no plan to score.
    Failed,
}

/// One evaluation outcome: a single (sample, candidate provider) pair.
///
/// Immutable after creation, persisted append-only. A generated plan
/// whose judging failed is still `Recorded` — the output has evidentiary
/// value even without a score — with `scores: None` and `judge_failed`
/// set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Dataset sample index.
    pub sample_id: usize,
    /// Candidate provider identifier.
    pub provider: String,
    /// The raw request text of the sample.
    pub query: String,
    /// Terminal status of this pair.
    pub status: RecordStatus,
    /// The generated plan, rendered back to text. Absent on `Failed`.
    pub plan_text: Option<String>,
    /// Judge scores per rubric dimension. Absent when judging failed.
    pub scores: Option<BTreeMap<String, u8>>,
    /// Judge rationale text, when available.
    pub rationale: Option<String>,
    /// Whether the judge failed after a successful generation.
    pub judge_failed: bool,
    /// Wall-clock time of the generation step in milliseconds.
    pub generation_ms: u64,
    /// Failure detail for `Failed` records.
    pub error: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl EvaluationRecord {
    /// A fully scored pair.
    pub fn scored(
        sample_id: usize,
        provider: impl Into<String>,
        query: impl Into<String>,
        plan_text: String,
        scores: BTreeMap<String, u8>,
        rationale: String,
        generation_ms: u64,
    ) -> Self {
        Self {
            sample_id,
            provider: provider.into(),
            query: query.into(),
            status: RecordStatus::Recorded,
            plan_text: Some(plan_text),
            scores: Some(scores),
            rationale: Some(rationale),
            judge_failed: false,
            generation_ms,
            error: None,
            created_at: Utc::now(),
        }
    }

    /// A generated but unscored pair: the judge's chain was exhausted.
    pub fn unscored(
        sample_id: usize,
        provider: impl Into<String>,
        query: impl Into<String>,
        plan_text: String,
        generation_ms: u64,
        judge_error: impl Into<String>,
    ) -> Self {
        Self {
            sample_id,
            provider: provider.into(),
            query: query.into(),
            status: RecordStatus::Recorded,
            plan_text: Some(plan_text),
            scores: None,
            rationale: None,
            judge_failed: true,
            generation_ms,
            error: Some(judge_error.into()),
            created_at: Utc::now(),
        }
    }

    /// A pair whose generation failed outright.
    pub fn failed(
        sample_id: usize,
        provider: impl Into<String>,
        query: impl Into<String>,
        error: impl Into<String>,
        generation_ms: u64,
    ) -> Self {
        Self {
            sample_id,
            provider: provider.into(),
            query: query.into(),
            status: RecordStatus::Failed,
            plan_text: None,
            scores: None,
            rationale: None,
            judge_failed: false,
            generation_ms,
            error: Some(error.into()),
            created_at: Utc::now(),
        }
    }
}
