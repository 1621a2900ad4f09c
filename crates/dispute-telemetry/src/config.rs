//! Telemetry configuration from environment variables.

use std::env;

const DEFAULT_SERVICE_NAME: &str = "dispute-indexer";

/// Configuration for logging and metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Component within the service (indexer, replay, ...)
    pub component: Option<String>,

    /// Log filter directive (trace, debug, info, warn, error, or full `EnvFilter` syntax)
    pub log_level: String,

    /// Whether to write logs to stdout at all
    pub console_output: bool,

    /// Whether to format logs as JSON
    pub json_logs: bool,

    /// Chain the indexer follows (mainnet, sepolia, devnet)
    pub network: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            component: None,
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            network: "devnet".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OTEL_SERVICE_NAME`: Service name (default: dispute-indexer)
    /// - `DT_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `DT_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `DT_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `DT_NETWORK`: Network name (default: devnet)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        Self {
            service_name: lookup("OTEL_SERVICE_NAME")
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),

            component: None,

            log_level: lookup("DT_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),

            console_output: lookup("DT_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: lookup("DT_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            network: lookup("DT_NETWORK").unwrap_or_else(|| "devnet".to_string()),
        }
    }

    /// Create configuration for one component of the service.
    pub fn for_component(component: &str) -> Self {
        let mut config = Self::from_env();
        config.component = Some(component.to_string());
        config
    }

    /// Service name including the component, if any.
    pub fn full_service_name(&self) -> String {
        match &self.component {
            Some(component) => format!("{}-{}", self.service_name, component),
            None => self.service_name.clone(),
        }
    }
}
