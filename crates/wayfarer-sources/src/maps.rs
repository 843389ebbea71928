use crate::config::SourceConfig;
use crate::http::{bounded, classify_status, classify_transport, malformed};
use serde::{Deserialize, Serialize};
use tracing::debug;
use wayfarer_core::{FailureReason, ProviderFailure, ProviderResult};

/// Geocoding data for a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    /// Full formatted address string.
    pub formatted_address: String,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
    /// Provider-assigned place identifier.
    pub place_id: String,
}

/// Geocoding client against the Google Maps geocode API.
#[derive(Clone)]
pub struct MapsClient {
    config: SourceConfig,
    http: reqwest::Client,
}

impl MapsClient {
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
            .unwrap_or("https://maps.googleapis.com")
    }

    /// Geocode a location name, bounded by the configured timeout.
    /// Never returns an error to the caller.
    pub async fn locate(&self, location: &str) -> ProviderResult<LocationInfo> {
        debug!(location, "geocoding destination");
        bounded(self.config.timeout_ms, self.fetch(location)).await
    }

    async fn fetch(&self, location: &str) -> Result<LocationInfo, ProviderFailure> {
        let url = format!("{}/maps/api/geocode/json", self.base_url());
        let resp = self
            .http
            .get(&url)
            .query(&[("address", location), ("key", self.config.api_key.as_str())])
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
        parse_geocode(&body)
    }
}

fn parse_geocode(body: &serde_json::Value) -> Result<LocationInfo, ProviderFailure> {
    let geocode_status = body["status"].as_str().unwrap_or("MISSING");
    if geocode_status != "OK" {
        return Err(ProviderFailure::new(
            FailureReason::Unknown,
            format!("geocode status: {geocode_status}"),
        ));
    }

    let result = body["results"]
        .get(0)
        .ok_or_else(|| malformed("geocode response had status OK but no results"))?;
    let location = &result["geometry"]["location"];

    Ok(LocationInfo {
        formatted_address: result["formatted_address"]
            .as_str()
            .unwrap_or("")
            .to_string(),
        lat: location["lat"]
            .as_f64()
            .ok_or_else(|| malformed("geocode result missing geometry.location.lat"))?,
        lng: location["lng"]
            .as_f64()
            .ok_or_else(|| malformed("geocode result missing geometry.location.lng"))?,
        place_id: result["place_id"].as_str().unwrap_or("").to_string(),
    })
}
