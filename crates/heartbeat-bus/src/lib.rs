//! # Heartbeat Bus - Liveness Events from Agents to Monitors
//!
//! One long-lived `HeartbeatBus` instance accepts heartbeats from any number of
//! producers, keeps a bounded history per agent key, and fans each event out to
//! the subscribers registered for that key and to every wildcard subscriber.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────┐  report()   ┌──────────────────────────────┐  try_send   ┌────────────┐
//! │  Agent   │ ──────────▶ │  Dispatcher                  │ ──────────▶ │ Subscriber │
//! └──────────┘             │   ├─ EventStore (append)     │             └────────────┘
//!                          │   └─ SubscriptionRegistry    │  try_send   ┌────────────┐
//!                          │        (exact + "*")         │ ──────────▶ │  Wildcard  │
//!                          └──────────────────────────────┘             └────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - **Producers never block:** enqueue is `try_send`; a full queue drops the
//!   event for that subscriber only.
//! - **No delivery after unsubscribe:** registry mutation and fan-out run under
//!   the same exclusive lock, and a queue is closed only after its entry left
//!   the registry.
//! - **Bounded history:** each key retains at most `history_capacity_per_key`
//!   events, oldest evicted first.
//!
//! The push stream is lossy. Consumers that cannot afford gaps poll `recent`.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod config;
pub mod publisher;
pub mod registry;
pub mod store;
pub mod subscriber;

pub use config::{BusConfig, ConfigError, MAX_QUEUE_CAPACITY};
pub use heartbeat_types::{AgentStatus, BusSnapshot, HeartbeatEvent, WILDCARD_KEY};
pub use publisher::{Delivery, HeartbeatBus, HeartbeatPublisher};
pub use registry::SubscriptionRegistry;
pub use store::EventStore;
pub use subscriber::{
    EventStream, HeartbeatSubscriber, Subscription, SubscriptionError, SubscriptionId,
};

/// Events retained per agent key unless configured otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Events buffered per subscriber queue before drops start.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;
