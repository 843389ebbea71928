use crate::config::SourceConfig;
use crate::http::{classify_status, classify_transport, elapsed_ms, malformed};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use wayfarer_core::{ProviderFailure, ProviderResult};

const EXTRACTION_PROMPT: &str = "Extract the list of top 5 places to visit mentioned in the \
     website along with a two line description about each of them.";

/// A place of interest extracted from a scraped page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceInfo {
    /// Name of the place.
    pub name: String,
    /// Short description.
    pub description: String,
}

/// Page-extraction client against the Firecrawl scrape API: each URL is
/// submitted with a structured-extraction prompt and the returned places
/// are accumulated across URLs.
///
/// Like search, a URL that fails is recorded and the rest still run.
#[derive(Clone)]
pub struct ScrapeClient {
    config: SourceConfig,
    http: reqwest::Client,
}

impl ScrapeClient {
    /// Build a client for the given source configuration.
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn base_url(&self) -> &str {
        self.config
            .endpoint
            .as_deref()
            .unwrap_or("https://api.firecrawl.dev")
    }

    /// Extract places from every URL, bounded by the configured timeout
    /// for the whole batch. Never returns an error to the caller.
    pub async fn extract(&self, urls: &[String]) -> ProviderResult<Vec<PlaceInfo>> {
        let started = Instant::now();
        let budget = Duration::from_millis(self.config.timeout_ms);

        match tokio::time::timeout(budget, self.run(urls)).await {
            Ok((places, failures)) => fold_batch(places, failures, elapsed_ms(started)),
            Err(_) => ProviderResult::timeout(elapsed_ms(started)),
        }
    }

    async fn run(&self, urls: &[String]) -> (Vec<PlaceInfo>, Vec<ProviderFailure>) {
        let mut places = Vec::new();
        let mut failures = Vec::new();

        for url in urls {
            match self.scrape_one(url).await {
                Ok(found) => {
                    debug!(url, places = found.len(), "page extracted");
                    places.extend(found);
                }
                Err(failure) => {
                    warn!(url, error = %failure, "page extraction failed");
                    failures.push(failure);
                }
            }
        }

        (places, failures)
    }

    async fn scrape_one(&self, url: &str) -> Result<Vec<PlaceInfo>, ProviderFailure> {
        let endpoint = format!("{}/v1/scrape", self.base_url());
        let resp = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&serde_json::json!({
                "url": url,
                "formats": ["json"],
                "jsonOptions": { "prompt": EXTRACTION_PROMPT },
            }))
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| classify_transport(&e))?;
        if !status.is_success() {
            return Err(classify_status(status, &text));
        }

        let body: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| malformed(e.to_string()))?;
        parse_places(&body)
    }
}

fn parse_places(body: &serde_json::Value) -> Result<Vec<PlaceInfo>, ProviderFailure> {
    if body["success"].as_bool() != Some(true) {
        return Err(malformed("scrape response did not report success"));
    }

    let places = body["data"]["json"]["places"]
        .as_array()
        .ok_or_else(|| malformed("missing data.json.places in scrape response"))?;

    Ok(places
        .iter()
        .filter_map(|place| {
            let name = place["name"].as_str()?;
            Some(PlaceInfo {
                name: name.to_string(),
                description: place["description"].as_str().unwrap_or("").to_string(),
            })
        })
        .collect())
}

fn fold_batch(
    places: Vec<PlaceInfo>,
    mut failures: Vec<ProviderFailure>,
    latency_ms: u64,
) -> ProviderResult<Vec<PlaceInfo>> {
    match (places.is_empty(), failures.pop()) {
        (_, None) => ProviderResult::ok(places, latency_ms),
        (true, Some(failure)) => ProviderResult::error(failure, latency_ms),
        (false, Some(failure)) => ProviderResult::degraded(Some(places), failure, latency_ms),
    }
}
