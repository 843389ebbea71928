use crate::maps::LocationInfo;
use crate::scrape::PlaceInfo;
use crate::weather::WeatherReport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wayfarer_core::{ProviderCategory, ProviderResult, ProviderStatus, DATA_SOURCE_CATEGORIES};

/// One synthesized search query, tagged with the trip feature it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Which trip feature this query targets (destination, cuisine, ...).
    pub feature_type: String,
    /// The concrete feature value the query was built from.
    pub feature_value: String,
    /// The query string to send to the search provider.
    pub query: String,
}

/// The links a single query resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    /// The query this entry answers.
    pub query: SearchQuery,
    /// Result URLs, best first.
    pub links: Vec<String>,
}

/// All search outcomes for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    /// One entry per synthesized query.
    pub entries: Vec<SearchEntry>,
}

impl SearchResults {
    /// The top link of every entry, in entry order.
    pub fn top_links(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|e| e.links.first().cloned())
            .collect()
    }
}

/// The typed payload of one data-source category.
///
/// A closed set: adding a category means adding a variant here, a client
/// crate-side, and an arm in the prompt renderer — no string keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextPayload {
    /// Forecast data for the destination.
    Weather(WeatherReport),
    /// Geocoding data for the destination.
    Maps(LocationInfo),
    /// Search results for the synthesized queries.
    Search(SearchResults),
    /// Places extracted from the top search links.
    Scrape(Vec<PlaceInfo>),
}

/// The frozen aggregate of all data-source outcomes for one request.
///
/// Invariant: exactly one entry per category in
/// [`DATA_SOURCE_CATEGORIES`], even on total failure — a failed provider
/// contributes a timeout/error entry, never an absent key. The
/// constructor enforces this; the struct is read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    entries: BTreeMap<ProviderCategory, ProviderResult<ContextPayload>>,
}

impl RequestContext {
    /// Freeze a set of collected entries into a context.
    ///
    /// Categories the collector never reported (a task panicked, or the
    /// overall deadline fired first) are filled with a timeout entry so
    /// the cardinality invariant holds structurally.
    pub fn from_entries(
        mut entries: BTreeMap<ProviderCategory, ProviderResult<ContextPayload>>,
        budget_ms: u64,
    ) -> Self {
        for category in DATA_SOURCE_CATEGORIES {
            entries
                .entry(category)
                .or_insert_with(|| ProviderResult::timeout(budget_ms));
        }
        entries.retain(|category, _| DATA_SOURCE_CATEGORIES.contains(category));
        Self { entries }
    }

    /// The outcome recorded for a category.
    pub fn get(&self, category: ProviderCategory) -> Option<&ProviderResult<ContextPayload>> {
        self.entries.get(&category)
    }

    /// The status recorded for a category.
    pub fn status(&self, category: ProviderCategory) -> Option<ProviderStatus> {
        self.entries.get(&category).map(|r| r.status)
    }

    /// Number of entries; equals the number of data-source categories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the context has no entries. Never true for a constructed
    /// context; present for API completeness.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in category order.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (ProviderCategory, &ProviderResult<ContextPayload>)> {
        self.entries.iter().map(|(c, r)| (*c, r))
    }

    /// The weather payload, when the provider produced one.
    pub fn weather(&self) -> Option<&WeatherReport> {
        match self.payload(ProviderCategory::Weather) {
            Some(ContextPayload::Weather(report)) => Some(report),
            _ => None,
        }
    }

    /// The geocoding payload, when the provider produced one.
    pub fn maps(&self) -> Option<&LocationInfo> {
        match self.payload(ProviderCategory::Maps) {
            Some(ContextPayload::Maps(info)) => Some(info),
            _ => None,
        }
    }

    /// The search payload, when the provider produced one.
    pub fn search(&self) -> Option<&SearchResults> {
        match self.payload(ProviderCategory::Search) {
            Some(ContextPayload::Search(results)) => Some(results),
            _ => None,
        }
    }

    /// The extracted places, when the provider produced them.
    pub fn places(&self) -> Option<&[PlaceInfo]> {
        match self.payload(ProviderCategory::Scrape) {
            Some(ContextPayload::Scrape(places)) => Some(places.as_slice()),
            _ => None,
        }
    }

    fn payload(&self, category: ProviderCategory) -> Option<&ContextPayload> {
        self.entries
            .get(&category)
            .and_then(|r| r.payload.as_ref())
    }
}
