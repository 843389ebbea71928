use serde::{Deserialize, Serialize};
use wayfarer_core::{WayfarerError, WayfarerResult};

/// Configuration for one data-source provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL override, for proxies and tests.
    pub endpoint: Option<String>,
    /// API key for the provider.
    #[serde(default)]
    pub api_key: String,
    /// Per-invocation time budget in milliseconds.
    #[serde(default = "default_source_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_source_timeout_ms() -> u64 {
    10_000
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: String::new(),
            timeout_ms: default_source_timeout_ms(),
        }
    }
}

/// Configuration for the full data-source set plus the aggregator budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Weather forecast provider.
    #[serde(default)]
    pub weather: SourceConfig,
    /// Geocoding provider.
    #[serde(default)]
    pub maps: SourceConfig,
    /// Web-search provider.
    #[serde(default)]
    pub search: SourceConfig,
    /// Page-extraction provider.
    #[serde(default)]
    pub scrape: SourceConfig,
    /// Overall wall-clock budget for one aggregation, in milliseconds.
    ///
    /// Bounds the worst case when a provider ignores its own timeout
    /// contract; must be strictly greater than every source timeout.
    #[serde(default = "default_overall_budget_ms")]
    pub overall_budget_ms: u64,
}

fn default_overall_budget_ms() -> u64 {
    20_000
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            weather: SourceConfig::default(),
            maps: SourceConfig::default(),
            search: SourceConfig::default(),
            scrape: SourceConfig::default(),
            overall_budget_ms: default_overall_budget_ms(),
        }
    }
}

impl SourcesConfig {
    /// The largest configured per-source timeout.
    pub fn max_source_timeout_ms(&self) -> u64 {
        [
            self.weather.timeout_ms,
            self.maps.timeout_ms,
            self.search.timeout_ms,
            self.scrape.timeout_ms,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Validate the cross-field invariants.
    pub fn validate(&self) -> WayfarerResult<()> {
        let max_timeout = self.max_source_timeout_ms();
        if self.overall_budget_ms <= max_timeout {
            return Err(WayfarerError::Config(format!(
                "overall budget ({} ms) must be strictly greater than the largest source timeout ({} ms)",
                self.overall_budget_ms, max_timeout
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_budget_exceeds_default_timeouts() {
        let config = SourcesConfig::default();
        config.validate().unwrap();
        assert!(config.overall_budget_ms > config.max_source_timeout_ms());
    }

    #[test]
    fn budget_not_above_largest_timeout_is_rejected() {
        let config = SourcesConfig {
            weather: SourceConfig {
                timeout_ms: 5_000,
                ..SourceConfig::default()
            },
            overall_budget_ms: 5_000,
            ..SourcesConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(WayfarerError::Config(_))
        ));
    }

    #[test]
    fn toml_with_partial_fields_fills_defaults() {
        let parsed: SourcesConfig = toml::from_str(
            r#"
            [weather]
            api_key = "w-key"
            timeout_ms = 4000
        "#,
        )
        .unwrap();
        assert_eq!(parsed.weather.timeout_ms, 4_000);
        assert_eq!(parsed.maps.timeout_ms, 10_000);
        assert_eq!(parsed.overall_budget_ms, 20_000);
    }
}
