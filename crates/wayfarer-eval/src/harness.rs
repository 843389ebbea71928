use crate::config::EvalConfig;
use crate::dataset::Sample;
use crate::judge::JudgeClient;
use crate::record::EvaluationRecord;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};
use wayfarer_core::{WayfarerError, WayfarerResult};
use wayfarer_llm::{FallbackChain, LlmClient, ModelConfig};
use wayfarer_planner::TravelPlanner;
use wayfarer_sources::{ContextCollector, SourcesConfig};

/// The evaluation harness: every (sample, candidate) pair runs the
/// planner with a single-provider chain — no fallback, so a measured
/// provider can never silently be substituted — then the judge scores
/// the output.
///
/// Per-pair state machine: `Pending → Generating → Judging → Recorded`,
/// with `Failed` reachable from `Generating` (candidate chain exhausted)
/// and a `Recorded`-with-null-scores outcome from `Judging` (judge
/// exhausted; a generated plan still has evidentiary value). Pairs run
/// concurrently up to the configured limit. Exactly one record per pair
/// comes back, always.
pub struct EvaluationHarness {
    candidates: Vec<ModelConfig>,
    judge: Arc<JudgeClient>,
    collector: ContextCollector,
    max_concurrency: usize,
}

impl EvaluationHarness {
    /// Build a harness, validating the run configuration first.
    pub fn new(
        candidates: Vec<ModelConfig>,
        eval_config: &EvalConfig,
        sources_config: &SourcesConfig,
    ) -> WayfarerResult<Self> {
        eval_config.validate(&candidates)?;
        sources_config.validate()?;

        Ok(Self {
            candidates,
            judge: Arc::new(JudgeClient::new(eval_config)),
            collector: ContextCollector::new(sources_config),
            max_concurrency: eval_config.max_concurrency,
        })
    }

    /// Run every sample against every candidate. Returns one record per
    /// (sample, candidate) pair, ordered by provider then sample id.
    pub async fn run(&self, samples: &[Sample]) -> Vec<EvaluationRecord> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks: JoinSet<EvaluationRecord> = JoinSet::new();

        info!(
            candidates = self.candidates.len(),
            samples = samples.len(),
            max_concurrency = self.max_concurrency,
            "starting evaluation run"
        );

        for candidate in &self.candidates {
            for sample in samples {
                let semaphore = Arc::clone(&semaphore);
                let judge = Arc::clone(&self.judge);
                let collector = self.collector.clone();
                let candidate = candidate.clone();
                let sample = sample.clone();

                tasks.spawn(async move {
                    // The semaphore is never closed during a run, so a
                    // failed acquire can only mean shutdown; proceed
                    // unthrottled in that case rather than dropping the pair.
                    let _permit = semaphore.acquire_owned().await.ok();
                    evaluate_pair(&candidate, &sample, &judge, collector).await
                });
            }
        }

        let mut records = Vec::with_capacity(self.candidates.len() * samples.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(record) => records.push(record),
                Err(err) => warn!(error = %err, "evaluation task aborted"),
            }
        }

        records.sort_by(|a, b| {
            a.provider
                .cmp(&b.provider)
                .then(a.sample_id.cmp(&b.sample_id))
        });

        info!(records = records.len(), "evaluation run complete");
        records
    }
}

/// Drive one (sample, candidate) pair to its terminal state.
async fn evaluate_pair(
    candidate: &ModelConfig,
    sample: &Sample,
    judge: &JudgeClient,
    collector: ContextCollector,
) -> EvaluationRecord {
    let chain = FallbackChain::single(LlmClient::new(candidate.clone()));
    let planner = TravelPlanner::new(chain, collector);

    // Pending → Generating
    let started = Instant::now();
    let plan = match planner.plan(&sample.query).await {
        Ok(plan) => plan,
        Err(err) => {
            // Generating → Failed: record it, do not retry the sample.
            warn!(
                provider = %candidate.id,
                sample = sample.id,
                error = %err,
                "generation failed"
            );
            return EvaluationRecord::failed(
                sample.id,
                &candidate.id,
                &sample.query,
                failure_detail(&err),
                started.elapsed().as_millis() as u64,
            );
        }
    };
    let generation_ms = started.elapsed().as_millis() as u64;
    let plan_text = plan.full_text();

    // Generating → Judging
    let judgement = judge.score(&sample.query, &plan_text).await;
    match judgement.payload {
        Some(scores) => {
            info!(
                provider = %candidate.id,
                sample = sample.id,
                "pair recorded"
            );
            EvaluationRecord::scored(
                sample.id,
                &candidate.id,
                &sample.query,
                plan_text,
                scores.ratings,
                scores.rationale,
                generation_ms,
            )
        }
        None => {
            // Judging failed: keep the generated output, flag the gap.
            let detail = judgement
                .failure
                .map(|f| f.to_string())
                .unwrap_or_else(|| format!("judge {:?}", judgement.status));
            warn!(
                provider = %candidate.id,
                sample = sample.id,
                detail,
                "judge failed, recording unscored"
            );
            EvaluationRecord::unscored(
                sample.id,
                &candidate.id,
                &sample.query,
                plan_text,
                generation_ms,
                detail,
            )
        }
    }
}

fn failure_detail(err: &WayfarerError) -> String {
    match err {
        WayfarerError::AllProvidersExhausted { attempts } => {
            let summary: Vec<String> = attempts
                .iter()
                .map(|a| format!("{}#{}: {:?}", a.provider, a.index, a.status))
                .collect();
            format!("all providers exhausted [{}]", summary.join(", "))
        }
        other => other.to_string(),
    }
}
