//! # Dispute Telemetry
//!
//! Logging (and optionally metrics exposition) for the dispute tree
//! indexer.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dispute_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::for_component("indexer");
//!     let _guard = init_telemetry(config).expect("Failed to init telemetry");
//!
//!     // Events dispatched from here on are logged
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `dispute-indexer` | Service name in logs |
//! | `DT_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `DT_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `DT_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |
//! | `DT_NETWORK` | `devnet` | Network label |

mod config;
mod logging;
#[cfg(feature = "metrics")]
mod metrics;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging, init_test_logging};
#[cfg(feature = "metrics")]
pub use metrics::encode_metrics;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Failed to encode metrics: {0}")]
    MetricsEncode(String),
}

/// Install logging for the lifetime of the returned guard.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    init_logging(&config)?;

    tracing::info!(
        service = %config.full_service_name(),
        network = %config.network,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        service_name: config.full_service_name(),
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}
