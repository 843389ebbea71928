use crate::record::{EvaluationRecord, RecordStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wayfarer_llm::ModelConfig;

/// Distribution of one rubric dimension's scores for one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionStats {
    /// Mean score across scored samples.
    pub mean: f64,
    /// Lowest observed score.
    pub min: u8,
    /// Highest observed score.
    pub max: u8,
    /// How many scored samples contributed.
    pub count: usize,
}

/// Aggregated evaluation results for one candidate provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSummary {
    /// Candidate provider identifier.
    pub provider: String,
    /// Per-dimension score distributions.
    pub per_dimension: BTreeMap<String, DimensionStats>,
    /// Mean of the dimension means.
    pub overall_mean: f64,
    /// Samples that produced scores.
    pub scored_samples: usize,
    /// Samples whose generation failed.
    pub failed_samples: usize,
    /// Samples generated but not scored (judge failures).
    pub unscored_samples: usize,
    /// Configured cost per call, the ranking tie-breaker.
    pub cost_per_call: f64,
}

/// Aggregate records into per-provider summaries, ranked best first.
///
/// Ranking sorts by overall mean descending; ties break on the
/// configured cost per call, cheaper first — never arbitrarily.
pub fn summarize(
    records: &[EvaluationRecord],
    candidates: &[ModelConfig],
) -> Vec<ProviderSummary> {
    let mut summaries: Vec<ProviderSummary> = candidates
        .iter()
        .map(|candidate| summarize_provider(records, candidate))
        .collect();

    summaries.sort_by(|a, b| {
        b.overall_mean
            .partial_cmp(&a.overall_mean)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                a.cost_per_call
                    .partial_cmp(&b.cost_per_call)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });

    summaries
}

fn summarize_provider(records: &[EvaluationRecord], candidate: &ModelConfig) -> ProviderSummary {
    let provider_records: Vec<&EvaluationRecord> = records
        .iter()
        .filter(|r| r.provider == candidate.id)
        .collect();

    let mut scores_by_dimension: BTreeMap<&str, Vec<u8>> = BTreeMap::new();
    let mut scored_samples = 0;
    let mut failed_samples = 0;
    let mut unscored_samples = 0;

    for record in &provider_records {
        match (record.status, record.scores.as_ref()) {
            (RecordStatus::Failed, _) => failed_samples += 1,
            (RecordStatus::Recorded, None) => unscored_samples += 1,
            (RecordStatus::Recorded, Some(scores)) => {
                scored_samples += 1;
                for (dimension, score) in scores {
                    scores_by_dimension
                        .entry(dimension.as_str())
                        .or_default()
                        .push(*score);
                }
            }
        }
    }

    let per_dimension: BTreeMap<String, DimensionStats> = scores_by_dimension
        .into_iter()
        .map(|(dimension, scores)| {
            let sum: u64 = scores.iter().map(|&s| u64::from(s)).sum();
            let stats = DimensionStats {
                mean: sum as f64 / scores.len() as f64,
                min: scores.iter().copied().min().unwrap_or(0),
                max: scores.iter().copied().max().unwrap_or(0),
                count: scores.len(),
            };
            (dimension.to_string(), stats)
        })
        .collect();

    let overall_mean = if per_dimension.is_empty() {
        0.0
    } else {
        per_dimension.values().map(|s| s.mean).sum::<f64>() / per_dimension.len() as f64
    };

    ProviderSummary {
        provider: candidate.id.clone(),
        per_dimension,
        overall_mean,
        scored_samples,
        failed_samples,
        unscored_samples,
        cost_per_call: candidate.cost_per_call,
    }
}
