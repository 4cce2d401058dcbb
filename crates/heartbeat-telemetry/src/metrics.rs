//! Prometheus metrics for heartbeat buses.
//!
//! Metric names follow `heartbeat_bus_<metric>[_total]`, with a `bus` const
//! label so several buses can share one registry.
//!
//! Counters are fed from `BusSnapshot` totals; each `observe` adds the delta
//! since the previous call.

use heartbeat_types::BusSnapshot;
use lazy_static::lazy_static;
use parking_lot::Mutex;
use prometheus::{Encoder, IntCounter, IntGauge, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Default process-wide registry.
    pub static ref REGISTRY: Registry = Registry::new();
}

/// Gauges and counters for one bus.
pub struct BusMetrics {
    keys: IntGauge,
    buffered_events: IntGauge,
    active_subscriptions: IntGauge,
    published: IntCounter,
    delivered: IntCounter,
    dropped: IntCounter,
    last: Mutex<BusSnapshot>,
}

impl BusMetrics {
    /// Create metrics for the bus called `bus` and register them in `registry`.
    ///
    /// # Errors
    ///
    /// `TelemetryError::MetricsInit` if a metric with the same name and label
    /// is already registered.
    pub fn register(registry: &Registry, bus: &str) -> Result<Self, TelemetryError> {
        let opts = |name: &str, help: &str| Opts::new(name, help).const_label("bus", bus);

        let metrics = Self {
            keys: IntGauge::with_opts(opts(
                "heartbeat_bus_keys",
                "Agent keys with at least one stored heartbeat",
            ))
            .map_err(init_err)?,
            buffered_events: IntGauge::with_opts(opts(
                "heartbeat_bus_buffered_events",
                "Heartbeats held across all history buffers",
            ))
            .map_err(init_err)?,
            active_subscriptions: IntGauge::with_opts(opts(
                "heartbeat_bus_active_subscriptions",
                "Registered subscriptions, wildcard included",
            ))
            .map_err(init_err)?,
            published: IntCounter::with_opts(opts(
                "heartbeat_bus_published_total",
                "Heartbeats published",
            ))
            .map_err(init_err)?,
            delivered: IntCounter::with_opts(opts(
                "heartbeat_bus_delivered_total",
                "Heartbeats enqueued onto subscriber queues",
            ))
            .map_err(init_err)?,
            dropped: IntCounter::with_opts(opts(
                "heartbeat_bus_dropped_total",
                "Heartbeats dropped because a subscriber queue was full",
            ))
            .map_err(init_err)?,
            last: Mutex::new(BusSnapshot::default()),
        };

        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(metrics.keys.clone()),
            Box::new(metrics.buffered_events.clone()),
            Box::new(metrics.active_subscriptions.clone()),
            Box::new(metrics.published.clone()),
            Box::new(metrics.delivered.clone()),
            Box::new(metrics.dropped.clone()),
        ];

        for collector in collectors {
            registry.register(collector).map_err(init_err)?;
        }

        Ok(metrics)
    }

    /// Register in the default process-wide `REGISTRY`.
    ///
    /// # Errors
    ///
    /// See `register`.
    pub fn register_default(bus: &str) -> Result<Self, TelemetryError> {
        Self::register(&REGISTRY, bus)
    }

    /// Update all metrics from a fresh snapshot.
    ///
    /// A snapshot whose totals went backwards (another bus, or a restart)
    /// resets the baseline without decrementing counters.
    pub fn observe(&self, snapshot: &BusSnapshot) {
        self.keys.set(to_i64(snapshot.keys));
        self.buffered_events.set(to_i64(snapshot.buffered_events));
        self.active_subscriptions
            .set(to_i64(snapshot.active_subscriptions));

        let mut last = self.last.lock();
        self.published
            .inc_by(snapshot.events_published.saturating_sub(last.events_published));
        self.delivered
            .inc_by(snapshot.deliveries.saturating_sub(last.deliveries));
        self.dropped
            .inc_by(snapshot.drops.saturating_sub(last.drops));
        *last = *snapshot;
    }

    /// Total heartbeats dropped as seen by these metrics.
    #[must_use]
    pub fn dropped_total(&self) -> u64 {
        self.dropped.get()
    }

    /// Total heartbeats published as seen by these metrics.
    #[must_use]
    pub fn published_total(&self) -> u64 {
        self.published.get()
    }
}

/// Encode everything in `registry` in the Prometheus text format.
///
/// # Errors
///
/// `TelemetryError::MetricsInit` if encoding fails.
pub fn encode_metrics(registry: &Registry) -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(init_err)?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

fn init_err(e: prometheus::Error) -> TelemetryError {
    TelemetryError::MetricsInit(e.to_string())
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
