use crate::config::{EvalConfig, RubricDimension};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;
use wayfarer_core::text::extract_json_object;
use wayfarer_core::{FailureReason, ProviderFailure, ProviderResult};
use wayfarer_llm::{CompletionRequest, LlmClient};

const JUDGE_SYSTEM_PROMPT: &str = "You are an expert travel-plan evaluator. You judge the \
     quality of an AI travel planning assistant's output against a fixed rubric.";

/// Parsed judge output: one integer score per rubric dimension plus the
/// judge's rationale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeScores {
    /// Scores keyed by rubric dimension id.
    pub ratings: BTreeMap<String, u8>,
    /// Per-dimension explanations, rendered as one text block.
    pub rationale: String,
}

/// The judge provider client: a fixed rubric prompt around a single
/// language-model client. Judge output that violates the contract
/// (missing dimension, score out of range, unparseable JSON) is a
/// `malformed_response` failure, not a partial score.
pub struct JudgeClient {
    client: LlmClient,
    rubric: Vec<RubricDimension>,
    scale_min: u8,
    scale_max: u8,
}

impl JudgeClient {
    /// Build a judge from the evaluation configuration.
    pub fn new(config: &EvalConfig) -> Self {
        Self {
            client: LlmClient::new(config.judge.clone()),
            rubric: config.rubric.clone(),
            scale_min: config.scale_min,
            scale_max: config.scale_max,
        }
    }

    /// Build a judge around a pre-built client (tests).
    pub fn from_client(
        client: LlmClient,
        rubric: Vec<RubricDimension>,
        scale_min: u8,
        scale_max: u8,
    ) -> Self {
        Self {
            client,
            rubric,
            scale_min,
            scale_max,
        }
    }

    /// Identifier of the underlying judge provider.
    pub fn id(&self) -> &str {
        self.client.id()
    }

    /// Score one generated plan against the rubric.
    pub async fn score(&self, query: &str, plan_text: &str) -> ProviderResult<JudgeScores> {
        let request = CompletionRequest::new(JUDGE_SYSTEM_PROMPT, self.build_prompt(query, plan_text));
        let result = self.client.invoke(&request).await;

        let latency_ms = result.latency_ms;
        match (result.status, result.payload) {
            (wayfarer_core::ProviderStatus::Ok, Some(text)) => {
                match self.parse_scores(&text) {
                    Ok(scores) => {
                        debug!(dimensions = scores.ratings.len(), "judge scored output");
                        ProviderResult::ok(scores, latency_ms)
                    }
                    Err(failure) => ProviderResult::error(failure, latency_ms),
                }
            }
            _ => ProviderResult {
                status: result.status,
                payload: None,
                latency_ms,
                failure: result.failure,
            },
        }
    }

    fn build_prompt(&self, query: &str, plan_text: &str) -> String {
        let mut prompt = format!(
            "## Original User Query\n\"{query}\"\n\n## Generated Travel Plan\n{plan_text}\n\n\
Evaluate the generated travel plan against the original query using the \
following dimensions, each on a scale from {} (worst) to {} (best):\n\n",
            self.scale_min, self.scale_max
        );

        for dimension in &self.rubric {
            prompt.push_str(&format!("- {}: {}\n", dimension.id, dimension.description));
        }

        prompt.push_str(
            "\nRespond with a JSON object containing integer ratings and a brief \
explanation per dimension:\n\
{\n  \"ratings\": { \"<dimension>\": <integer>, ... },\n  \
\"explanations\": { \"<dimension>\": \"<why>\", ... }\n}\n\
Provide only the JSON, with no additional text.",
        );

        prompt
    }

    fn parse_scores(&self, text: &str) -> Result<JudgeScores, ProviderFailure> {
        #[derive(Deserialize)]
        struct RawJudgement {
            ratings: BTreeMap<String, i64>,
            #[serde(default)]
            explanations: BTreeMap<String, String>,
        }

        let json = extract_json_object(text).ok_or_else(|| {
            ProviderFailure::new(
                FailureReason::MalformedResponse,
                "judge response contained no JSON object",
            )
        })?;
        let raw: RawJudgement = serde_json::from_str(json).map_err(|e| {
            ProviderFailure::new(FailureReason::MalformedResponse, e.to_string())
        })?;

        let mut ratings = BTreeMap::new();
        for dimension in &self.rubric {
            let value = *raw.ratings.get(&dimension.id).ok_or_else(|| {
                ProviderFailure::new(
                    FailureReason::MalformedResponse,
                    format!("judge omitted dimension '{}'", dimension.id),
                )
            })?;
            if value < i64::from(self.scale_min) || value > i64::from(self.scale_max) {
                return Err(ProviderFailure::new(
                    FailureReason::MalformedResponse,
                    format!(
                        "score {value} for '{}' outside scale {}..={}",
                        dimension.id, self.scale_min, self.scale_max
                    ),
                ));
            }
            ratings.insert(dimension.id.clone(), value as u8);
        }

        let rationale = self
            .rubric
            .iter()
            .filter_map(|d| {
                raw.explanations
                    .get(&d.id)
                    .map(|text| format!("{}: {text}", d.id))
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(JudgeScores { ratings, rationale })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wayfarer_llm::{LlmVendor, ModelConfig, RetryPolicy};

    fn judge() -> JudgeClient {
        let config = ModelConfig {
            id: "judge".to_string(),
            vendor: LlmVendor::Anthropic,
            model: "m".to_string(),
            api_key: "k".to_string(),
            api_base_url: None,
            temperature: 0.0,
            max_tokens: 64,
            timeout_ms: 1_000,
            retry: RetryPolicy::default(),
            cost_per_call: 0.0,
        };
        JudgeClient::from_client(
            LlmClient::new(config),
            vec![
                RubricDimension::new("accuracy", "grounding"),
                RubricDimension::new("completeness", "coverage"),
            ],
            1,
            10,
        )
    }

    #[test]
    fn parses_a_complete_judgement() {
        let text = r#"{
            "ratings": { "accuracy": 8, "completeness": 6 },
            "explanations": { "accuracy": "well grounded", "completeness": "missing a day" }
        }"#;
        let scores = judge().parse_scores(text).unwrap();
        assert_eq!(scores.ratings["accuracy"], 8);
        assert_eq!(scores.ratings["completeness"], 6);
        assert!(scores.rationale.contains("well grounded"));
    }

    #[test]
    fn missing_dimension_is_malformed() {
        let text = r#"{ "ratings": { "accuracy": 8 } }"#;
        let err = judge().parse_scores(text).unwrap_err();
        assert_eq!(err.reason, FailureReason::MalformedResponse);
        assert!(err.detail.contains("completeness"));
    }

    #[test]
    fn out_of_range_score_is_malformed() {
        let text = r#"{ "ratings": { "accuracy": 14, "completeness": 6 } }"#;
        let err = judge().parse_scores(text).unwrap_err();
        assert!(err.detail.contains("14"));
    }

    #[test]
    fn prose_around_the_json_is_tolerated() {
        let text = "Here is my evaluation:\n{ \"ratings\": { \"accuracy\": 5, \"completeness\": 5 } }";
        let scores = judge().parse_scores(text).unwrap();
        assert_eq!(scores.ratings.len(), 2);
        assert!(scores.rationale.is_empty());
    }

    #[test]
    fn prompt_embeds_rubric_and_scale() {
        let j = judge();
        let prompt = j.build_prompt("3 days in Kyoto", "## Itinerary\n...");
        assert!(prompt.contains("accuracy: grounding"));
        assert!(prompt.contains("completeness: coverage"));
        assert!(prompt.contains("from 1 (worst) to 10 (best)"));
        assert!(prompt.contains("3 days in Kyoto"));
    }
}
