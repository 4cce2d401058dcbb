//! # Heartbeat Telemetry
//!
//! Observability for processes that host a heartbeat bus.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` with an `EnvFilter` and a pretty or JSON
//!   formatter
//! - **Metrics**: Prometheus gauges and counters fed from `BusSnapshot`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use heartbeat_telemetry::{init_logging, BusMetrics, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//!
//! let metrics = BusMetrics::register_default("agents")?;
//! metrics.observe(&bus.snapshot());
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HEARTBEAT_SERVICE_NAME` | `heartbeat` | Service name on log lines |
//! | `HEARTBEAT_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` also honoured) |
//! | `HEARTBEAT_JSON_LOGS` | `false` | Emit JSON log lines |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{encode_metrics, BusMetrics, REGISTRY};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}
