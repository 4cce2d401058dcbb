//! Point-in-time view of bus state, consumed by telemetry.

use serde::{Deserialize, Serialize};

/// Counters and sizes of one bus at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusSnapshot {
    /// Keys with at least one stored event.
    pub keys: usize,
    /// Events held across all history buffers.
    pub buffered_events: usize,
    /// Registered subscriptions, wildcard included.
    pub active_subscriptions: usize,
    /// Events accepted by `publish` since construction.
    pub events_published: u64,
    /// Successful enqueues onto subscriber queues.
    pub deliveries: u64,
    /// Enqueues given up because the queue was full.
    pub drops: u64,
}
