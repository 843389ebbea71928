use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use wayfarer_core::text::extract_json_object;
use wayfarer_core::{WayfarerError, WayfarerResult};
use wayfarer_llm::{CompletionRequest, FallbackChain};

/// Typed travel features extracted from the raw request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripFeatures {
    /// The travel destination. Always present — extraction fails without one.
    pub destination: String,
    /// Length of stay in days, when stated.
    pub duration_days: Option<u32>,
    /// Food and drink preferences.
    pub cuisine_preferences: Vec<String>,
    /// Activity or place preferences (museums, beaches, ...).
    pub place_preferences: Vec<String>,
    /// Preferred mode of transport, when stated.
    pub transport_preference: Option<String>,
}

const EXTRACTION_SYSTEM_PROMPT: &str = "\
You are a feature extraction step for a travel planning assistant. \
Identify the key travel information in the user's text and return a JSON \
object with these fields:

- place_to_visit: the main destination (city, country, or region) - REQUIRED
- duration_days: length of stay as an integer, or null
- cuisine_preferences: list of food and drink preferences, or null
- place_preferences: list of activity or place preferences, or null
- transport_preferences: preferred mode of transport, or null

Use null for anything the text does not mention. Respond with only the \
JSON object, no additional text.";

/// Extract features from the raw request, preferring the language model
/// and falling back to pattern matching when the chain or the parse
/// fails. The pipeline continues on degraded extraction; only a missing
/// destination is fatal.
pub async fn extract(chain: &FallbackChain, user_input: &str) -> WayfarerResult<TripFeatures> {
    match extract_with_llm(chain, user_input).await {
        Ok(features) => {
            info!(destination = %features.destination, "extracted features");
            Ok(features)
        }
        Err(err) => {
            warn!(error = %err, "model-based extraction failed, using pattern fallback");
            extract_fallback(user_input)
        }
    }
}

async fn extract_with_llm(
    chain: &FallbackChain,
    user_input: &str,
) -> WayfarerResult<TripFeatures> {
    let request = CompletionRequest::new(
        EXTRACTION_SYSTEM_PROMPT,
        format!("Extract travel features from the following text:\n\n{user_input}"),
    );
    let output = chain.generate(&request).await?;
    parse_raw_features(&output.text)
}

/// Wire shape of the extraction response; everything optional so a
/// sparse answer still parses.
#[derive(Debug, Deserialize)]
struct RawFeatures {
    place_to_visit: Option<String>,
    duration_days: Option<u32>,
    cuisine_preferences: Option<Vec<String>>,
    place_preferences: Option<Vec<String>>,
    transport_preferences: Option<serde_json::Value>,
}

fn parse_raw_features(text: &str) -> WayfarerResult<TripFeatures> {
    let json = extract_json_object(text).ok_or_else(|| {
        WayfarerError::Validation("extraction response contained no JSON object".to_string())
    })?;
    let raw: RawFeatures = serde_json::from_str(json)?;

    let destination = raw
        .place_to_visit
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| {
            WayfarerError::Validation("extraction response had no destination".to_string())
        })?;

    Ok(TripFeatures {
        destination: destination.trim().to_string(),
        duration_days: raw.duration_days,
        cuisine_preferences: raw.cuisine_preferences.unwrap_or_default(),
        place_preferences: raw.place_preferences.unwrap_or_default(),
        transport_preference: normalize_transport(raw.transport_preferences),
    })
}

/// The model sometimes answers with a string, sometimes a list.
fn normalize_transport(value: Option<serde_json::Value>) -> Option<String> {
    match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(serde_json::Value::Array(items)) => {
            let joined = items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}

/// Pattern-based fallback when the model is unavailable: a capitalized
/// phrase after a travel preposition, and a "N days" span.
fn extract_fallback(user_input: &str) -> WayfarerResult<TripFeatures> {
    #[allow(clippy::expect_used)]
    let destination_re = Regex::new(
        r"\b(?:[Tt]o|[Ii]n|[Vv]isit(?:ing)?|[Aa]round)\s+([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)*)",
    )
    .expect("static regex");
    #[allow(clippy::expect_used)]
    let duration_re = Regex::new(r"(\d+)[\s-]*(?:day|days|night|nights)").expect("static regex");

    let destination = destination_re
        .captures(user_input)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| {
            WayfarerError::Validation(
                "could not determine a destination from the request".to_string(),
            )
        })?;

    let duration_days = duration_re
        .captures(user_input)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok());

    Ok(TripFeatures {
        destination,
        duration_days,
        cuisine_preferences: Vec::new(),
        place_preferences: Vec::new(),
        transport_preference: None,
    })
}
