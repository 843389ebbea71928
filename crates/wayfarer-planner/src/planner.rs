use crate::compose;
use crate::features::{self, TripFeatures};
use crate::guardrail;
use crate::prompt::{self, DEFAULT_DURATION_DAYS};
use crate::queries;
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use wayfarer_core::{LlmAttempt, WayfarerResult};
use wayfarer_llm::FallbackChain;
use wayfarer_sources::{CollectRequest, ContextCollector};

/// Trips are planned this many days out when no dates are given.
const LEAD_DAYS: i64 = 14;

/// Trip metadata derived from the extracted features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripMetadata {
    /// The travel destination.
    pub destination: String,
    /// Trip length in days.
    pub duration_days: u32,
    /// First day of the trip.
    pub start_date: NaiveDate,
    /// Last day of the trip.
    pub end_date: NaiveDate,
}

impl TripMetadata {
    fn from_features(features: &TripFeatures) -> Self {
        let duration_days = features.duration_days.unwrap_or(DEFAULT_DURATION_DAYS);
        let start_date = Utc::now().date_naive() + Duration::days(LEAD_DAYS);
        let end_date = start_date + Duration::days(i64::from(duration_days));
        Self {
            destination: features.destination.clone(),
            duration_days,
            start_date,
            end_date,
        }
    }
}

/// A structured travel plan: the three artifacts, trip metadata, and the
/// generator attempt history for observability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelPlan {
    /// Day-by-day itinerary; `None` when the model produced no section.
    pub itinerary: Option<String>,
    /// Packing list; `None` when the model produced no section.
    pub packing_list: Option<String>,
    /// Budget breakdown; `None` when the model produced no section.
    pub budget: Option<String>,
    /// Trip metadata for downstream consumers (calendar export, UI).
    pub metadata: TripMetadata,
    /// Every language-model attempt made while generating, in order.
    pub attempts: Vec<LlmAttempt>,
}

impl TravelPlan {
    /// Render the available sections back into one document, headers
    /// included. Unavailable sections are omitted entirely.
    pub fn full_text(&self) -> String {
        let mut parts = Vec::new();
        if let Some(itinerary) = &self.itinerary {
            parts.push(format!("{}\n{itinerary}", compose::ITINERARY_HEADER));
        }
        if let Some(packing) = &self.packing_list {
            parts.push(format!("{}\n{packing}", compose::PACKING_LIST_HEADER));
        }
        if let Some(budget) = &self.budget {
            parts.push(format!("{}\n{budget}", compose::BUDGET_HEADER));
        }
        parts.join("\n\n")
    }
}

/// The end-to-end planner: guardrail → feature extraction → query
/// synthesis → context aggregation → generation → composition.
///
/// Degraded context never fails a request; the one hard failure on this
/// path is [`wayfarer_core::WayfarerError::AllProvidersExhausted`], when
/// the whole fallback chain came up empty.
pub struct TravelPlanner {
    chain: FallbackChain,
    collector: ContextCollector,
}

impl TravelPlanner {
    /// Build a planner over a fallback chain and a context collector.
    pub fn new(chain: FallbackChain, collector: ContextCollector) -> Self {
        Self { chain, collector }
    }

    /// Turn a free-text travel request into a structured plan.
    pub async fn plan(&self, raw_text: &str) -> WayfarerResult<TravelPlan> {
        guardrail::validate_input(raw_text)?;

        let features = features::extract(&self.chain, raw_text).await?;
        let queries = queries::build_queries(&features);
        info!(
            destination = %features.destination,
            queries = queries.len(),
            "planning trip"
        );

        let collect_request = CollectRequest {
            destination: features.destination.clone(),
            queries,
        };
        let context = self.collector.collect(&collect_request).await;

        let request = prompt::generation_request(&features, &context);
        let output = self.chain.generate(&request).await?;
        info!(
            provider = output.winning_provider().unwrap_or("unknown"),
            attempts = output.attempts.len(),
            "plan generated"
        );

        let sections = compose::compose(&output.text);
        Ok(TravelPlan {
            itinerary: sections.itinerary,
            packing_list: sections.packing_list,
            budget: sections.budget,
            metadata: TripMetadata::from_features(&features),
            attempts: output.attempts,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn features() -> TripFeatures {
        TripFeatures {
            destination: "Kyoto".to_string(),
            duration_days: Some(5),
            cuisine_preferences: Vec::new(),
            place_preferences: Vec::new(),
            transport_preference: None,
        }
    }

    #[test]
    fn metadata_spans_the_stated_duration() {
        let metadata = TripMetadata::from_features(&features());
        assert_eq!(metadata.duration_days, 5);
        assert_eq!(metadata.end_date - metadata.start_date, Duration::days(5));
        assert!(metadata.start_date > Utc::now().date_naive());
    }

    #[test]
    fn metadata_defaults_duration_when_unstated() {
        let mut f = features();
        f.duration_days = None;
        let metadata = TripMetadata::from_features(&f);
        assert_eq!(metadata.duration_days, DEFAULT_DURATION_DAYS);
    }

    #[test]
    fn full_text_skips_unavailable_sections() {
        let plan = TravelPlan {
            itinerary: Some("Day 1: arrive.".to_string()),
            packing_list: None,
            budget: Some("Cheap.".to_string()),
            metadata: TripMetadata::from_features(&features()),
            attempts: Vec::new(),
        };
        let text = plan.full_text();
        assert!(text.contains("## Itinerary"));
        assert!(text.contains("## Budget"));
        assert!(!text.contains("## Packing List"));
    }
}
