//! # Event Store
//!
//! Per-key ring of the most recent heartbeats. Order is arrival order, not the
//! order of the events' own timestamps.

use heartbeat_types::HeartbeatEvent;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Arc;

/// Bounded history of events, keyed by agent.
///
/// Not synchronised on its own; the bus guards it together with the
/// subscription registry.
#[derive(Debug)]
pub struct EventStore {
    /// Maximum events retained per key.
    capacity: usize,

    /// Buffers by agent key, oldest at the front.
    buffers: HashMap<String, VecDeque<Arc<HeartbeatEvent>>>,
}

impl EventStore {
    /// Create an empty store keeping at most `capacity` events per key.
    ///
    /// A capacity of zero is treated as one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            buffers: HashMap::new(),
        }
    }

    /// Maximum events retained per key.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append `event` to the buffer for `key`, evicting from the front on overflow.
    pub fn append(&mut self, key: &str, event: Arc<HeartbeatEvent>) {
        let capacity = self.capacity;

        if let Some(buffer) = self.buffers.get_mut(key) {
            buffer.push_back(event);
            while buffer.len() > capacity {
                buffer.pop_front();
            }
            return;
        }

        // First event for this key; capacity >= 1 so nothing to evict.
        let mut buffer = VecDeque::with_capacity(capacity.min(16));
        buffer.push_back(event);
        self.buffers.insert(key.to_owned(), buffer);
    }

    /// The last `count` events stored for `key`, oldest first.
    ///
    /// Asking for more than is stored returns everything; an unknown key
    /// returns an empty vector.
    #[must_use]
    pub fn recent(&self, key: &str, count: usize) -> Vec<Arc<HeartbeatEvent>> {
        let Some(buffer) = self.buffers.get(key) else {
            return Vec::new();
        };

        let skip = buffer.len().saturating_sub(count);
        buffer.iter().skip(skip).cloned().collect()
    }

    /// Everything retained for `key`, oldest first.
    #[must_use]
    pub fn history(&self, key: &str) -> Vec<Arc<HeartbeatEvent>> {
        self.buffers
            .get(key)
            .map(|buffer| buffer.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Most recently appended event for `key`.
    #[must_use]
    pub fn latest(&self, key: &str) -> Option<Arc<HeartbeatEvent>> {
        self.buffers.get(key).and_then(|buffer| buffer.back().cloned())
    }

    /// Keys with at least one stored event.
    #[must_use]
    pub fn keys(&self) -> BTreeSet<String> {
        self.buffers
            .iter()
            .filter(|(_, buffer)| !buffer.is_empty())
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Number of events stored for `key`.
    #[must_use]
    pub fn len_of(&self, key: &str) -> usize {
        self.buffers.get(key).map_or(0, VecDeque::len)
    }

    /// Number of keys with stored events.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.buffers.values().filter(|b| !b.is_empty()).count()
    }

    /// Total events held across all keys.
    #[must_use]
    pub fn total_events(&self) -> usize {
        self.buffers.values().map(VecDeque::len).sum()
    }
}
