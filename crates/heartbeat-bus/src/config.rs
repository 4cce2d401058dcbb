//! # Bus Configuration
//!
//! Capacities are fixed at construction. Both must be at least one: a history
//! that keeps nothing or a queue that holds nothing is rejected up front. Queue
//! capacity is also capped at what a bounded channel can represent.

use crate::{DEFAULT_HISTORY_CAPACITY, DEFAULT_QUEUE_CAPACITY};
use std::env;
use thiserror::Error;
use tokio::sync::Semaphore;

/// Largest subscriber queue capacity a bounded channel accepts.
pub const MAX_QUEUE_CAPACITY: usize = Semaphore::MAX_PERMITS;

/// Invalid bus configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `history_capacity_per_key` was zero.
    #[error("history capacity per key must be at least 1")]
    ZeroHistoryCapacity,

    /// `subscriber_queue_capacity` was zero.
    #[error("subscriber queue capacity must be at least 1")]
    ZeroQueueCapacity,

    /// `subscriber_queue_capacity` exceeded `MAX_QUEUE_CAPACITY`.
    #[error("subscriber queue capacity {0} exceeds maximum {max}", max = MAX_QUEUE_CAPACITY)]
    QueueCapacityTooLarge(usize),
}

/// Construction-time capacities of a `HeartbeatBus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    /// Maximum events retained per agent key.
    pub history_capacity_per_key: usize,

    /// Bounded capacity of each subscriber queue.
    pub subscriber_queue_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            history_capacity_per_key: DEFAULT_HISTORY_CAPACITY,
            subscriber_queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl BusConfig {
    /// Create a configuration with explicit capacities.
    #[must_use]
    pub fn new(history_capacity_per_key: usize, subscriber_queue_capacity: usize) -> Self {
        Self {
            history_capacity_per_key,
            subscriber_queue_capacity,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `HEARTBEAT_HISTORY_CAPACITY`: events kept per key (default: 100)
    /// - `HEARTBEAT_QUEUE_CAPACITY`: subscriber queue capacity (default: 10)
    ///
    /// Missing or unparsable values fall back to the default.
    pub fn from_env() -> Self {
        Self {
            history_capacity_per_key: env::var("HEARTBEAT_HISTORY_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_HISTORY_CAPACITY),

            subscriber_queue_capacity: env::var("HEARTBEAT_QUEUE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_QUEUE_CAPACITY),
        }
    }

    /// Reject capacities the bus cannot honour.
    ///
    /// # Errors
    ///
    /// - `ConfigError::ZeroHistoryCapacity` - history capacity is zero
    /// - `ConfigError::ZeroQueueCapacity` - queue capacity is zero
    /// - `ConfigError::QueueCapacityTooLarge` - queue capacity above `MAX_QUEUE_CAPACITY`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity_per_key == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        if self.subscriber_queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        if self.subscriber_queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(ConfigError::QueueCapacityTooLarge(
                self.subscriber_queue_capacity,
            ));
        }
        Ok(())
    }
}
