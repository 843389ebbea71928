use crate::config::SourceConfig;
use crate::context::{SearchEntry, SearchQuery, SearchResults};
use crate::http::{classify_status, classify_transport, elapsed_ms, malformed};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use wayfarer_core::{ProviderFailure, ProviderResult};

const RESULTS_PER_QUERY: usize = 3;

/// Web-search client against a JSON search API (Serper-style wire format:
/// `POST /search` with an `X-API-KEY` header, results under `organic`).
///
/// Queries run sequentially within the one invocation budget; a query
/// that fails is recorded and the rest still run, so partial results come
/// back as a degraded payload rather than nothing.
#[derive(Clone)]
pub struct SearchClient {
    config: SourceConfig,
    http: reqwest::Client,
}

impl SearchClient {
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
            .unwrap_or("https://google.serper.dev")
    }

    /// Resolve every query to result links, bounded by the configured
    /// timeout for the whole batch. Never returns an error to the caller.
    pub async fn search(&self, queries: &[SearchQuery]) -> ProviderResult<SearchResults> {
        let started = Instant::now();
        let budget = Duration::from_millis(self.config.timeout_ms);

        match tokio::time::timeout(budget, self.run(queries)).await {
            Ok((results, failures)) => fold_batch(results, failures, elapsed_ms(started)),
            Err(_) => ProviderResult::timeout(elapsed_ms(started)),
        }
    }

    async fn run(&self, queries: &[SearchQuery]) -> (SearchResults, Vec<ProviderFailure>) {
        let mut entries = Vec::with_capacity(queries.len());
        let mut failures = Vec::new();

        for query in queries {
            match self.run_query(query).await {
                Ok(links) => {
                    debug!(query = %query.query, links = links.len(), "search query resolved");
                    entries.push(SearchEntry {
                        query: query.clone(),
                        links,
                    });
                }
                Err(failure) => {
                    warn!(query = %query.query, error = %failure, "search query failed");
                    failures.push(failure);
                }
            }
        }

        (SearchResults { entries }, failures)
    }

    async fn run_query(&self, query: &SearchQuery) -> Result<Vec<String>, ProviderFailure> {
        let url = format!("{}/search", self.base_url());
        let resp = self
            .http
            .post(&url)
            .header("X-API-KEY", &self.config.api_key)
            .json(&serde_json::json!({
                "q": query.query,
                "num": RESULTS_PER_QUERY,
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
        let organic = body["organic"]
            .as_array()
            .ok_or_else(|| malformed("missing organic array in search response"))?;

        Ok(organic
            .iter()
            .filter_map(|hit| hit["link"].as_str().map(str::to_string))
            .take(RESULTS_PER_QUERY)
            .collect())
    }
}

/// Fold a batch of per-query outcomes into one provider result: all good
/// is `ok`, all failed is `error`, a mix is `degraded` with the partial
/// payload kept.
fn fold_batch(
    results: SearchResults,
    mut failures: Vec<ProviderFailure>,
    latency_ms: u64,
) -> ProviderResult<SearchResults> {
    match (results.entries.is_empty(), failures.pop()) {
        (_, None) => ProviderResult::ok(results, latency_ms),
        (true, Some(failure)) => ProviderResult::error(failure, latency_ms),
        (false, Some(failure)) => ProviderResult::degraded(Some(results), failure, latency_ms),
    }
}
