//! # Heartbeat Types
//!
//! Value types that flow through the heartbeat bus.
//!
//! ## Design Principles
//!
//! - **Immutable events**: a `HeartbeatEvent` is built once by its producer and
//!   shared as `Arc<HeartbeatEvent>` after publication.
//! - **Open status**: the bus carries `status` as a plain string; `AgentStatus`
//!   is a convenience for consumers that want the closed set.

pub mod event;
pub mod snapshot;
pub mod status;

pub use event::{HeartbeatEvent, Metadata};
pub use snapshot::BusSnapshot;
pub use status::{AgentStatus, ParseStatusError};

/// Key under which a subscription observes every agent.
pub const WILDCARD_KEY: &str = "*";

/// Returns true if `key` is the wildcard marker.
#[must_use]
pub fn is_wildcard(key: &str) -> bool {
    key == WILDCARD_KEY
}
