//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files. Every
//! field has a default, so an empty file reproduces the built-in scenarios.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the demonstration program.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DemoConfig {
    /// Remote endpoint settings.
    pub endpoint: EndpointConfig,

    /// Scenario timings and identifiers.
    pub scenario: ScenarioConfig,

    /// Logging settings.
    pub logging: LoggingConfig,

    /// Result display settings.
    pub display: DisplayConfig,
}

/// Remote endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL; todos are fetched from `{base_url}/todos/{id}`.
    pub base_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "https://jsonplaceholder.typicode.com".to_string(),
        }
    }
}

/// Scenario configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Artificial delay before each request, in milliseconds.
    pub stage_delay_ms: u64,

    /// Upper bound of a random extra delay per batch operation.
    pub stage_jitter_ms: u64,

    /// Deadline of the single-request scenario.
    pub single_timeout_ms: u64,

    /// Identifier fetched by the single-request scenario.
    pub single_id: u64,

    /// Shared deadline of the batch scenario.
    pub batch_timeout_ms: u64,

    /// Identifiers fetched by the batch scenario.
    pub batch_ids: Vec<u64>,

    /// Report operations still pending at the batch deadline as cancelled.
    pub report_pending: bool,
}

impl ScenarioConfig {
    pub fn stage_delay(&self) -> Duration {
        Duration::from_millis(self.stage_delay_ms)
    }

    pub fn stage_jitter(&self) -> Duration {
        Duration::from_millis(self.stage_jitter_ms)
    }

    pub fn single_timeout(&self) -> Duration {
        Duration::from_millis(self.single_timeout_ms)
    }

    pub fn batch_timeout(&self) -> Duration {
        Duration::from_millis(self.batch_timeout_ms)
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            stage_delay_ms: 3_000,
            stage_jitter_ms: 0,
            single_timeout_ms: 2_000,
            single_id: 1,
            batch_timeout_ms: 5_000,
            batch_ids: (1..=10).collect(),
            report_pending: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,

    /// Filter directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            filter: "bounded_fetch=info".to_string(),
        }
    }
}

/// Display configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Titles longer than this many characters are truncated.
    pub title_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { title_width: 30 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_builtin_scenarios() {
        let config = DemoConfig::default();

        assert_eq!(config.endpoint.base_url, "https://jsonplaceholder.typicode.com");
        assert_eq!(config.scenario.stage_delay(), Duration::from_secs(3));
        assert_eq!(config.scenario.single_timeout(), Duration::from_secs(2));
        assert_eq!(config.scenario.batch_timeout(), Duration::from_secs(5));
        assert_eq!(config.scenario.batch_ids, (1..=10).collect::<Vec<_>>());
        assert!(!config.scenario.report_pending);
        assert_eq!(config.display.title_width, 30);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: DemoConfig = toml::from_str(
            r#"
            [scenario]
            stage_delay_ms = 500
            batch_ids = [3, 3, 7]

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.scenario.stage_delay_ms, 500);
        assert_eq!(config.scenario.batch_ids, vec![3, 3, 7]);
        assert_eq!(config.scenario.single_timeout_ms, 2_000);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.filter, "bounded_fetch=info");
    }
}
