use crate::config::SourcesConfig;
use crate::context::{ContextPayload, RequestContext, SearchQuery, SearchResults};
use crate::maps::MapsClient;
use crate::scrape::ScrapeClient;
use crate::search::SearchClient;
use crate::weather::WeatherClient;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{info, warn};
use wayfarer_core::{
    FailureReason, ProviderCategory, ProviderFailure, ProviderResult,
};

/// The typed input to one context aggregation.
#[derive(Debug, Clone)]
pub struct CollectRequest {
    /// The trip destination, used by the weather and maps providers.
    pub destination: String,
    /// Synthesized queries, used by the search and scrape providers.
    pub queries: Vec<SearchQuery>,
}

/// The context aggregator: fans out to every configured data-source
/// client concurrently and folds the outcomes into a [`RequestContext`].
///
/// `collect` always returns a context, never an error — "no weather data"
/// is a degraded entry, not a rejected call. The whole aggregation is
/// bounded by an overall wall-clock budget strictly greater than any
/// single source timeout; when it expires, still-pending invocations are
/// aborted and recorded as timeouts, and anything that completes after
/// the deadline is discarded rather than merged into the returned
/// context.
#[derive(Clone)]
pub struct ContextCollector {
    weather: WeatherClient,
    maps: MapsClient,
    search: SearchClient,
    scrape: ScrapeClient,
    overall_budget_ms: u64,
}

impl ContextCollector {
    /// Build a collector with one client per configured source.
    pub fn new(config: &SourcesConfig) -> Self {
        Self {
            weather: WeatherClient::new(config.weather.clone()),
            maps: MapsClient::new(config.maps.clone()),
            search: SearchClient::new(config.search.clone()),
            scrape: ScrapeClient::new(config.scrape.clone()),
            overall_budget_ms: config.overall_budget_ms,
        }
    }

    /// Gather context for one request. Weather, maps, and the
    /// search→scrape pipeline run as independent concurrent tasks; the
    /// failure of one never cancels the others. Scrape consumes the links
    /// search found, so it follows search inside their shared task — if
    /// search comes back empty-handed, scrape is recorded as failed
    /// immediately instead of being invoked with nothing to do.
    pub async fn collect(&self, request: &CollectRequest) -> RequestContext {
        let deadline =
            tokio::time::Instant::now() + Duration::from_millis(self.overall_budget_ms);

        type TaskOutput = Vec<(ProviderCategory, ProviderResult<ContextPayload>)>;
        let mut tasks: JoinSet<TaskOutput> = JoinSet::new();

        {
            let weather = self.weather.clone();
            let destination = request.destination.clone();
            tasks.spawn(async move {
                let result = weather.forecast(&destination).await;
                vec![(
                    ProviderCategory::Weather,
                    result.map(ContextPayload::Weather),
                )]
            });
        }

        {
            let maps = self.maps.clone();
            let destination = request.destination.clone();
            tasks.spawn(async move {
                let result = maps.locate(&destination).await;
                vec![(ProviderCategory::Maps, result.map(ContextPayload::Maps))]
            });
        }

        {
            let search = self.search.clone();
            let scrape = self.scrape.clone();
            let queries = request.queries.clone();
            tasks.spawn(async move {
                let search_result = search.search(&queries).await;
                let links = search_result
                    .payload
                    .as_ref()
                    .map(SearchResults::top_links)
                    .unwrap_or_default();

                let scrape_result = if links.is_empty() {
                    ProviderResult::error(
                        ProviderFailure::new(
                            FailureReason::Unknown,
                            "no search links to extract places from",
                        ),
                        0,
                    )
                } else {
                    scrape.extract(&links).await
                };

                vec![
                    (
                        ProviderCategory::Search,
                        search_result.map(ContextPayload::Search),
                    ),
                    (
                        ProviderCategory::Scrape,
                        scrape_result.map(ContextPayload::Scrape),
                    ),
                ]
            });
        }

        let mut entries = BTreeMap::new();
        loop {
            match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(Ok(results))) => {
                    for (category, result) in results {
                        info!(
                            %category,
                            status = ?result.status,
                            latency_ms = result.latency_ms,
                            "source invocation completed"
                        );
                        entries.insert(category, result);
                    }
                }
                Ok(Some(Err(join_err))) => {
                    warn!(error = %join_err, "source task aborted");
                }
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        budget_ms = self.overall_budget_ms,
                        "overall budget expired, discarding pending sources"
                    );
                    tasks.abort_all();
                    break;
                }
            }
        }

        RequestContext::from_entries(entries, self.overall_budget_ms)
    }
}
