use crate::config::SourceConfig;
use crate::http::{bounded, classify_status, classify_transport, malformed};
use serde::{Deserialize, Serialize};
use tracing::debug;
use wayfarer_core::{ProviderFailure, ProviderResult};

/// One day of forecast data, flattened from the upstream 3-hour slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Day number within the forecast window, starting at 1.
    pub day: u32,
    /// Minimum temperature in degrees Fahrenheit.
    pub min_temp_f: f64,
    /// Maximum temperature in degrees Fahrenheit.
    pub max_temp_f: f64,
    /// Feels-like temperature in degrees Fahrenheit.
    pub feels_like_f: f64,
    /// Short weather description ("few clouds", "clear sky", ...).
    pub description: String,
    /// Wind speed in miles per hour.
    pub wind_speed_mph: f64,
}

/// A five-day forecast for a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// The location the forecast covers.
    pub location: String,
    /// Daily forecasts, up to five days.
    pub daily: Vec<DailyForecast>,
}

/// Weather forecast client against the OpenWeatherMap forecast feed.
///
/// The feed reports in 3-hour intervals; one entry in eight is kept to
/// produce a per-day series.
#[derive(Clone)]
pub struct WeatherClient {
    config: SourceConfig,
    http: reqwest::Client,
}

impl WeatherClient {
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
            .unwrap_or("https://api.openweathermap.org")
    }

    /// Fetch a five-day forecast for the location, bounded by the
    /// configured timeout. Never returns an error to the caller.
    pub async fn forecast(&self, location: &str) -> ProviderResult<WeatherReport> {
        debug!(location, "fetching weather forecast");
        bounded(self.config.timeout_ms, self.fetch(location)).await
    }

    async fn fetch(&self, location: &str) -> Result<WeatherReport, ProviderFailure> {
        let url = format!("{}/data/2.5/forecast", self.base_url());
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("q", location),
                ("appid", self.config.api_key.as_str()),
                ("units", "imperial"),
            ])
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
        parse_forecast(location, &body)
    }
}

/// Flatten the 3-hour slot list into one forecast per day.
fn parse_forecast(
    location: &str,
    body: &serde_json::Value,
) -> Result<WeatherReport, ProviderFailure> {
    let slots = body["list"]
        .as_array()
        .ok_or_else(|| malformed("missing list array in forecast response"))?;

    let daily: Vec<DailyForecast> = slots
        .iter()
        .step_by(8)
        .take(5)
        .enumerate()
        .map(|(i, slot)| {
            let main = &slot["main"];
            DailyForecast {
                day: i as u32 + 1,
                min_temp_f: main["temp_min"].as_f64().unwrap_or(0.0),
                max_temp_f: main["temp_max"].as_f64().unwrap_or(0.0),
                feels_like_f: main["feels_like"].as_f64().unwrap_or(0.0),
                description: slot["weather"][0]["description"]
                    .as_str()
                    .unwrap_or("")
                    .to_string(),
                wind_speed_mph: slot["wind"]["speed"].as_f64().unwrap_or(0.0),
            }
        })
        .collect();

    if daily.is_empty() {
        return Err(malformed("forecast response contained no slots"));
    }

    Ok(WeatherReport {
        location: location.to_string(),
        daily,
    })
}
