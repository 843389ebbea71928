//! End-to-end planner tests: mock LLM vendor + mock data sources, real
//! HTTP, exercising the full request pipeline and its two failure
//! surfaces (validation, chain exhaustion).

use wayfarer_core::WayfarerError;
use wayfarer_llm::{FallbackChain, LlmClient, LlmVendor, ModelConfig, RetryPolicy};
use wayfarer_planner::TravelPlanner;
use wayfarer_sources::{ContextCollector, SourceConfig, SourcesConfig};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PLAN_TEXT: &str = "\
## Itinerary
### Day 1
- Morning: Fushimi Inari shrine hike
- Afternoon: Nishiki Market street food
- Evening: Gion district walk

### Day 2
- Morning: Arashiyama bamboo grove

## Packing List
- Walking shoes
- Light rain jacket

## Budget
- Accommodation: 12,000-30,000 JPY per night
- Meals: 3,000-8,000 JPY per day";

fn anthropic_text_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "content": [ { "type": "text", "text": text } ],
        "stop_reason": "end_turn"
    })
}

async fn mount_llm(server: &MockServer) {
    // Extraction calls carry the extraction system prompt; match them
    // first so the general mock only serves generation calls.
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_string_contains("feature extraction"))
        .respond_with(ResponseTemplate::new(200).set_body_json(anthropic_text_body(
            r#"{"place_to_visit": "Kyoto", "duration_days": 2,
                 "cuisine_preferences": ["ramen"], "place_preferences": null,
                 "transport_preferences": "train"}"#,
        )))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(anthropic_text_body(PLAN_TEXT)))
        .mount(server)
        .await;
}

async fn mount_sources(weather_ok: bool) -> (MockServer, SourcesConfig) {
    let server = MockServer::start().await;

    let weather_template = if weather_ok {
        let slots: Vec<_> = (0..40)
            .map(|_| {
                serde_json::json!({
                    "main": { "temp_min": 55.0, "temp_max": 68.0, "feels_like": 56.0 },
                    "weather": [ { "description": "clear sky" } ],
                    "wind": { "speed": 5.0 }
                })
            })
            .collect();
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "list": slots }))
    } else {
        ResponseTemplate::new(500).set_body_string("weather upstream down")
    };

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(weather_template)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OK",
                "results": [ {
                    "formatted_address": "Kyoto, Japan",
                    "geometry": { "location": { "lat": 35.0116, "lng": 135.7681 } },
                    "place_id": "kyoto"
                } ]
            })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "organic": [ { "link": "https://guide.example/kyoto" } ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": { "json": { "places": [
                { "name": "Fushimi Inari", "description": "Torii gate trails." }
            ] } }
        })))
        .mount(&server)
        .await;

    let source = SourceConfig {
        endpoint: Some(server.uri()),
        api_key: "test-key".to_string(),
        timeout_ms: 2_000,
    };
    let config = SourcesConfig {
        weather: source.clone(),
        maps: source.clone(),
        search: source.clone(),
        scrape: source,
        overall_budget_ms: 5_000,
    };
    (server, config)
}

fn llm_config(id: &str, base_url: &str) -> ModelConfig {
    ModelConfig {
        id: id.to_string(),
        vendor: LlmVendor::Anthropic,
        model: "test-model".to_string(),
        api_key: "test-key".to_string(),
        api_base_url: Some(base_url.to_string()),
        temperature: 0.0,
        max_tokens: 1024,
        timeout_ms: 2_000,
        retry: RetryPolicy {
            max_retries: 0,
            backoff_base_ms: 0,
            backoff_max_ms: 0,
        },
        cost_per_call: 0.0,
    }
}

#[tokio::test]
async fn free_text_request_becomes_a_structured_plan() {
    let llm = MockServer::start().await;
    mount_llm(&llm).await;
    let (_sources, sources_config) = mount_sources(true).await;

    let chain = FallbackChain::single(LlmClient::new(llm_config("claude", &llm.uri())));
    let planner = TravelPlanner::new(chain, ContextCollector::new(&sources_config));

    let plan = planner
        .plan("Plan a 2 day trip to Kyoto, I love ramen and trains")
        .await
        .expect("plan");

    let itinerary = plan.itinerary.expect("itinerary");
    assert!(itinerary.contains("Fushimi Inari"));
    assert!(plan.packing_list.is_some());
    assert!(plan.budget.is_some());

    assert_eq!(plan.metadata.destination, "Kyoto");
    assert_eq!(plan.metadata.duration_days, 2);
    assert_eq!(plan.attempts.len(), 1);
    assert_eq!(plan.attempts[0].provider, "claude");
}

#[tokio::test]
async fn degraded_weather_still_produces_a_plan() {
    let llm = MockServer::start().await;
    mount_llm(&llm).await;
    let (_sources, sources_config) = mount_sources(false).await;

    let chain = FallbackChain::single(LlmClient::new(llm_config("claude", &llm.uri())));
    let planner = TravelPlanner::new(chain, ContextCollector::new(&sources_config));

    let plan = planner
        .plan("Plan a 2 day trip to Kyoto, I love ramen")
        .await
        .expect("plan despite degraded weather");

    let itinerary = plan.itinerary.expect("itinerary");
    assert!(!itinerary.is_empty());
}

#[tokio::test]
async fn exhausted_chain_is_the_one_hard_failure() {
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&llm)
        .await;
    let (_sources, sources_config) = mount_sources(true).await;

    let chain = FallbackChain::new(vec![
        LlmClient::new(llm_config("claude-primary", &llm.uri())),
        LlmClient::new(llm_config("claude-backup", &llm.uri())),
    ])
    .expect("chain");
    let planner = TravelPlanner::new(chain, ContextCollector::new(&sources_config));

    // Extraction falls back to pattern matching, so the failure surfaces
    // from generation with the full attempt history.
    let err = planner
        .plan("Plan a 2 day trip to Kyoto for me please")
        .await
        .expect_err("generation should fail");

    match err {
        WayfarerError::AllProvidersExhausted { attempts } => {
            assert_eq!(attempts.len(), 2);
            assert_eq!(attempts[0].provider, "claude-primary");
            assert_eq!(attempts[1].provider, "claude-backup");
        }
        other => panic!("expected AllProvidersExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn short_input_is_rejected_before_any_provider_call() {
    let llm = MockServer::start().await;
    let (_sources, sources_config) = mount_sources(true).await;

    let chain = FallbackChain::single(LlmClient::new(llm_config("claude", &llm.uri())));
    let planner = TravelPlanner::new(chain, ContextCollector::new(&sources_config));

    let err = planner.plan("Kyoto").await.expect_err("validation");
    assert!(matches!(err, WayfarerError::Validation(_)));

    // No LLM call was made.
    let requests = llm.received_requests().await.expect("recorded requests");
    assert!(requests.is_empty());
}
