use crate::features::TripFeatures;
use wayfarer_sources::SearchQuery;

/// Build search queries from extracted features.
///
/// Deterministic templates, one query per feature value, destination
/// first. Keeping this off the model makes evaluation runs reproducible
/// and saves a paid call per request.
pub fn build_queries(features: &TripFeatures) -> Vec<SearchQuery> {
    let destination = &features.destination;
    let mut queries = vec![SearchQuery {
        feature_type: "place_to_visit".to_string(),
        feature_value: destination.clone(),
        query: format!("top attractions and travel guide {destination}"),
    }];

    for cuisine in &features.cuisine_preferences {
        queries.push(SearchQuery {
            feature_type: "cuisine_preferences".to_string(),
            feature_value: cuisine.clone(),
            query: format!("best {cuisine} restaurants in {destination}"),
        });
    }

    for preference in &features.place_preferences {
        queries.push(SearchQuery {
            feature_type: "place_preferences".to_string(),
            feature_value: preference.clone(),
            query: format!("best {preference} in {destination} for visitors"),
        });
    }

    if let Some(transport) = &features.transport_preference {
        queries.push(SearchQuery {
            feature_type: "transport_preferences".to_string(),
            feature_value: transport.clone(),
            query: format!("getting around {destination} by {transport}"),
        });
    }

    queries
}
