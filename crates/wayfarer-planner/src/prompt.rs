use crate::compose::{BUDGET_HEADER, ITINERARY_HEADER, PACKING_LIST_HEADER};
use crate::features::TripFeatures;
use wayfarer_llm::CompletionRequest;
use wayfarer_sources::RequestContext;

/// Default trip length in days when the request does not state one.
pub const DEFAULT_DURATION_DAYS: u32 = 3;

/// Build the plan-generation request from the features and the collected
/// context. Degraded context entries are rendered as explicit
/// "unavailable" notes so the model can acknowledge the gap instead of
/// inventing data.
pub fn generation_request(
    features: &TripFeatures,
    context: &RequestContext,
) -> CompletionRequest {
    let destination = &features.destination;
    let duration = features.duration_days.unwrap_or(DEFAULT_DURATION_DAYS);

    let system_prompt = format!(
        "You are Wayfarer, a personalized travel planning assistant. You create \
detailed, realistic travel plans from user preferences and live context data.\n\
\n\
Respond with exactly three markdown sections, using these exact headers and \
nothing before the first header:\n\
\n\
{ITINERARY_HEADER}\n\
A day-by-day plan with '### Day N' subheadings for days 1 through {duration}, \
each with morning, afternoon, and evening entries naming real attractions and \
restaurants in {destination}.\n\
\n\
{PACKING_LIST_HEADER}\n\
A packing list grouped by documents, clothing, toiletries, and electronics, \
adjusted to the forecast when one is given.\n\
\n\
{BUDGET_HEADER}\n\
A cost breakdown for accommodation, food, transport, and activities with \
realistic price ranges in the local currency.\n\
\n\
Never use placeholder text in square brackets; name real places only. If \
context data was unavailable, note it briefly rather than inventing it."
    );

    let user_prompt = format!(
        "Create a travel plan for the following trip.\n\
\n\
## Trip Details\n\
Destination: {destination}\n\
Duration: {duration} days\n\
Place preferences: {places}\n\
Cuisine preferences: {cuisines}\n\
Transport: {transport}\n\
\n\
## Weather Forecast\n\
{weather}\n\
\n\
## Destination Information\n\
{location}\n\
\n\
## Places Worth Considering\n\
{context}\n",
        places = join_or(&features.place_preferences, "general sightseeing"),
        cuisines = join_or(&features.cuisine_preferences, "local cuisine"),
        transport = features
            .transport_preference
            .as_deref()
            .unwrap_or("public transport and walking"),
        weather = render_weather(context),
        location = render_location(context),
        context = render_places(context),
    );

    CompletionRequest::new(system_prompt, user_prompt)
}

fn join_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

fn render_weather(context: &RequestContext) -> String {
    match context.weather() {
        Some(report) => report
            .daily
            .iter()
            .map(|d| {
                format!(
                    "Day {}: {}, {:.0}-{:.0}F, wind {:.0} mph",
                    d.day, d.description, d.min_temp_f, d.max_temp_f, d.wind_speed_mph
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        None => "(forecast unavailable)".to_string(),
    }
}

fn render_location(context: &RequestContext) -> String {
    match context.maps() {
        Some(info) => format!(
            "{} ({:.4}, {:.4})",
            info.formatted_address, info.lat, info.lng
        ),
        None => "(location data unavailable)".to_string(),
    }
}

fn render_places(context: &RequestContext) -> String {
    let mut lines = Vec::new();

    if let Some(places) = context.places() {
        for place in places {
            lines.push(format!("- {}: {}", place.name, place.description));
        }
    }
    if let Some(results) = context.search() {
        for entry in &results.entries {
            if let Some(link) = entry.links.first() {
                lines.push(format!("- [{}] {}", entry.query.feature_value, link));
            }
        }
    }

    if lines.is_empty() {
        "(no destination research available)".to_string()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use wayfarer_core::{ProviderCategory, ProviderResult};
    use wayfarer_sources::{ContextPayload, DailyForecast, PlaceInfo, WeatherReport};

    fn features() -> TripFeatures {
        TripFeatures {
            destination: "Kyoto".to_string(),
            duration_days: Some(4),
            cuisine_preferences: vec!["ramen".to_string()],
            place_preferences: Vec::new(),
            transport_preference: None,
        }
    }

    fn context_with_weather_and_places() -> RequestContext {
        let mut entries = BTreeMap::new();
        entries.insert(
            ProviderCategory::Weather,
            ProviderResult::ok(
                ContextPayload::Weather(WeatherReport {
                    location: "Kyoto".to_string(),
                    daily: vec![DailyForecast {
                        day: 1,
                        min_temp_f: 55.0,
                        max_temp_f: 68.0,
                        feels_like_f: 56.0,
                        description: "clear sky".to_string(),
                        wind_speed_mph: 5.0,
                    }],
                }),
                10,
            ),
        );
        entries.insert(
            ProviderCategory::Scrape,
            ProviderResult::ok(
                ContextPayload::Scrape(vec![PlaceInfo {
                    name: "Fushimi Inari".to_string(),
                    description: "Torii gate trails.".to_string(),
                }]),
                10,
            ),
        );
        RequestContext::from_entries(entries, 1_000)
    }

    #[test]
    fn prompt_embeds_context_and_format_contract() {
        let request = generation_request(&features(), &context_with_weather_and_places());

        assert!(request.system_prompt.contains("## Itinerary"));
        assert!(request.system_prompt.contains("## Packing List"));
        assert!(request.system_prompt.contains("## Budget"));
        assert!(request.system_prompt.contains("4 days") || request.system_prompt.contains('4'));

        assert!(request.user_prompt.contains("Kyoto"));
        assert!(request.user_prompt.contains("clear sky"));
        assert!(request.user_prompt.contains("Fushimi Inari"));
        assert!(request.user_prompt.contains("ramen"));
    }

    #[test]
    fn degraded_context_renders_unavailable_notes() {
        let context = RequestContext::from_entries(BTreeMap::new(), 1_000);
        let request = generation_request(&features(), &context);

        assert!(request.user_prompt.contains("(forecast unavailable)"));
        assert!(request.user_prompt.contains("(location data unavailable)"));
        assert!(request
            .user_prompt
            .contains("(no destination research available)"));
    }

    #[test]
    fn missing_duration_defaults() {
        let mut f = features();
        f.duration_days = None;
        let context = RequestContext::from_entries(BTreeMap::new(), 1_000);
        let request = generation_request(&f, &context);
        assert!(request
            .user_prompt
            .contains(&format!("Duration: {DEFAULT_DURATION_DAYS} days")));
    }
}
