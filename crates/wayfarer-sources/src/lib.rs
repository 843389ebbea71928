//! Data-source provider clients and the request-scoped context aggregator.
//!
//! One client per external data category (weather, maps, search, scrape),
//! each behind the same contract: a typed input in, a
//! [`wayfarer_core::ProviderResult`] out, bounded by the client's own
//! timeout, never an error to the caller. The [`ContextCollector`] fans
//! out to all of them concurrently and folds the outcomes into a
//! [`RequestContext`] with exactly one entry per category, no matter how
//! many providers failed.
//!
//! # Main types
//!
//! - [`SourcesConfig`] — Per-category endpoints, keys, and timeouts.
//! - [`ContextCollector`] — Concurrent fan-out with an overall deadline.
//! - [`RequestContext`] — Frozen aggregate of all per-category outcomes.
//! - [`ContextPayload`] — Closed set of typed per-category payloads.

/// Context aggregation: fan-out, deadline, and the frozen result.
pub mod collector;
/// Per-category configuration.
pub mod config;
/// The aggregate context types.
pub mod context;
mod http;
/// Geocoding client.
pub mod maps;
/// Page-extraction client.
pub mod scrape;
/// Web-search client.
pub mod search;
/// Forecast client.
pub mod weather;

pub use collector::{CollectRequest, ContextCollector};
pub use config::{SourceConfig, SourcesConfig};
pub use context::{ContextPayload, RequestContext, SearchEntry, SearchQuery, SearchResults};
pub use maps::{LocationInfo, MapsClient};
pub use scrape::{PlaceInfo, ScrapeClient};
pub use search::SearchClient;
pub use weather::{DailyForecast, WeatherClient, WeatherReport};
